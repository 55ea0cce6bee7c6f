//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings (which compare correctly as
//! text for a fixed UTC offset — the expiry-window queries rely on this).
//! UUIDs are stored as hyphenated lowercase strings.

use chrono::{DateTime, Utc};
use docvault_core::{
  document::Document,
  store::{DocumentWithOwner, OwnerSummary},
  user::User,
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── Timestamps ──────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn decode_opt_dt(s: Option<&str>) -> Result<Option<DateTime<Utc>>> {
  s.map(decode_dt).transpose()
}

// ─── Raw row types ───────────────────────────────────────────────────────────

/// A `users` row exactly as it comes off the wire.
pub struct RawUser {
  pub id:            String,
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      id:            decode_uuid(&self.id)?,
      name:          self.name,
      email:         self.email,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// A `documents` row exactly as it comes off the wire.
pub struct RawDocument {
  pub id:          String,
  pub name:        String,
  pub path:        String,
  pub owner_id:    String,
  pub expires_at:  String,
  pub archived_at: Option<String>,
  pub created_at:  String,
  pub updated_at:  String,
}

impl RawDocument {
  pub fn into_document(self) -> Result<Document> {
    Ok(Document {
      id:          decode_uuid(&self.id)?,
      name:        self.name,
      path:        self.path,
      owner_id:    decode_uuid(&self.owner_id)?,
      expires_at:  decode_dt(&self.expires_at)?,
      archived_at: decode_opt_dt(self.archived_at.as_deref())?,
      created_at:  decode_dt(&self.created_at)?,
      updated_at:  decode_dt(&self.updated_at)?,
    })
  }
}

/// A document row joined with the three owner-summary columns.
pub struct RawDocumentWithOwner {
  pub document:    RawDocument,
  pub owner_name:  String,
  pub owner_email: String,
}

impl RawDocumentWithOwner {
  pub fn into_document_with_owner(self) -> Result<DocumentWithOwner> {
    let owner_id = decode_uuid(&self.document.owner_id)?;
    Ok(DocumentWithOwner {
      document: self.document.into_document()?,
      owner:    OwnerSummary {
        id:    owner_id,
        name:  self.owner_name,
        email: self.owner_email,
      },
    })
  }
}
