//! Document — the fundamental unit of the vault.
//!
//! A document carries two independent state axes: an expiry status, computed
//! against a caller-supplied `now`, and an archive status, stored as a
//! nullable timestamp. Archiving is one-way; there is no unarchive.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Width of the "expiring soon" window, in days. Inclusive at both ends.
pub const EXPIRY_WINDOW_DAYS: i64 = 7;

// ─── Expiry status ───────────────────────────────────────────────────────────

/// Where a document's expiry date falls relative to `now`. Computed, never
/// stored. Only meaningful while the document is live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpiryStatus {
  /// `expires_at > now + 7 days`.
  Active,
  /// `now <= expires_at <= now + 7 days`.
  ExpiringSoon,
  /// `expires_at < now`.
  Expired,
}

// ─── Document ────────────────────────────────────────────────────────────────

/// A single uploaded file's metadata. `id`, `path`, and `owner_id` are
/// immutable after creation; the only mutation the store ever performs is
/// setting `archived_at` (and bumping `updated_at`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
  pub id:          Uuid,
  pub name:        String,
  /// Opaque locator into the blob store. Never reinterpreted here.
  pub path:        String,
  pub owner_id:    Uuid,
  pub expires_at:  DateTime<Utc>,
  /// `None` means live. Once set, never cleared.
  pub archived_at: Option<DateTime<Utc>>,
  pub created_at:  DateTime<Utc>,
  pub updated_at:  DateTime<Utc>,
}

impl Document {
  /// `true` iff the expiry date is strictly in the past, independent of
  /// archive status.
  pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
    self.expires_at < now
  }

  /// `true` iff the expiry date falls within the next seven days, inclusive
  /// at both ends.
  pub fn is_expiring_soon(&self, now: DateTime<Utc>) -> bool {
    self.expires_at >= now
      && self.expires_at <= now + Duration::days(EXPIRY_WINDOW_DAYS)
  }

  pub fn expiry_status(&self, now: DateTime<Utc>) -> ExpiryStatus {
    if self.is_expired(now) {
      ExpiryStatus::Expired
    } else if self.is_expiring_soon(now) {
      ExpiryStatus::ExpiringSoon
    } else {
      ExpiryStatus::Active
    }
  }

  pub fn is_archived(&self) -> bool {
    self.archived_at.is_some()
  }
}

// ─── NewDocument ─────────────────────────────────────────────────────────────

/// Input to [`crate::store::DocumentStore::create_document`].
/// `id` and the audit timestamps are always assigned by the store.
#[derive(Debug, Clone)]
pub struct NewDocument {
  pub name:       String,
  pub path:       String,
  pub owner_id:   Uuid,
  pub expires_at: DateTime<Utc>,
}
