//! JSON representations returned by the document endpoints.

use chrono::{DateTime, Utc};
use docvault_core::{document::Document, store::OwnerSummary};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct OwnerDto {
  pub id:    Uuid,
  pub name:  String,
  pub email: String,
}

impl From<OwnerSummary> for OwnerDto {
  fn from(o: OwnerSummary) -> Self {
    OwnerDto {
      id:    o.id,
      name:  o.name,
      email: o.email,
    }
  }
}

/// The document wire representation. The expiry flags are computed against
/// the request's reference time, never stored.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentDto {
  pub id:               Uuid,
  pub name:             String,
  pub path:             String,
  pub expires_at:       DateTime<Utc>,
  pub archived_at:      Option<DateTime<Utc>>,
  pub is_expired:       bool,
  pub is_expiring_soon: bool,
  pub download_url:     String,
  pub owner:            OwnerDto,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
}

impl DocumentDto {
  pub fn new(
    document: Document,
    owner: OwnerSummary,
    base_url: &str,
    now: DateTime<Utc>,
  ) -> Self {
    let download_url = format!(
      "{}/api/documents/{}/download",
      base_url.trim_end_matches('/'),
      document.id
    );
    DocumentDto {
      id: document.id,
      name: document.name.clone(),
      path: document.path.clone(),
      expires_at: document.expires_at,
      archived_at: document.archived_at,
      is_expired: document.is_expired(now),
      is_expiring_soon: document.is_expiring_soon(now),
      download_url,
      owner: owner.into(),
      created_at: document.created_at,
      updated_at: document.updated_at,
    }
  }
}
