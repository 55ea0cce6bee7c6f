//! The `DocumentStore` trait and supporting read-model types.
//!
//! The trait is implemented by storage backends (e.g.
//! `docvault-store-sqlite`). Higher layers (`docvault-server`,
//! `docvault-notify`) depend on this abstraction, not on any concrete
//! backend. Every expiry-scoped query takes an explicit reference time —
//! there is no ambient clock in the query layer.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  document::{Document, NewDocument},
  user::{NewUser, User},
};

// ─── Read-model types ────────────────────────────────────────────────────────

/// The subset of owner fields exposed alongside a document for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnerSummary {
  pub id:    Uuid,
  pub name:  String,
  pub email: String,
}

/// A document joined with its owner summary, as returned by list queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentWithOwner {
  pub document: Document,
  pub owner:    OwnerSummary,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a docvault persistence backend.
///
/// Documents are mutated in exactly one way after creation: the archive
/// transition. All listing queries are owner-scoped — callers pass the owner
/// id, and results never cross ownership boundaries.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait DocumentStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Create and persist a new user. Fails if the email is already taken.
  fn add_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Retrieve a user by email — the credential-resolution lookup.
  fn get_user_by_email(
    &self,
    email: String,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// List all users. Driven by the notification batch job.
  fn list_users(
    &self,
  ) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  // ── Documents — writes ────────────────────────────────────────────────

  /// Persist a new document. The store assigns the id and both audit
  /// timestamps.
  fn create_document(
    &self,
    input: NewDocument,
  ) -> impl Future<Output = Result<Document, Self::Error>> + Send + '_;

  /// The one-way archive transition: sets `archived_at = now` and bumps
  /// `updated_at`. Fails if the document is missing or already archived.
  fn archive_document(
    &self,
    id: Uuid,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Document, Self::Error>> + Send + '_;

  // ── Documents — reads ─────────────────────────────────────────────────

  /// Retrieve a document by id. Returns `None` if not found.
  fn get_document(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Document>, Self::Error>> + Send + '_;

  /// All of one owner's documents, ordered by `expires_at` ascending
  /// (soonest-expiring first), each with its owner summary.
  fn list_for_owner(
    &self,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<Vec<DocumentWithOwner>, Self::Error>> + Send + '_;

  /// Live documents with `now <= expires_at <= now + 7 days`.
  fn list_expiring_soon(
    &self,
    owner_id: Uuid,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + '_;

  /// Live documents with `expires_at < now`.
  fn list_expired(
    &self,
    owner_id: Uuid,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + '_;

  /// Live documents, no expiry constraint.
  fn list_not_archived(
    &self,
    owner_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + '_;

  /// Live documents that are either expiring soon or already expired —
  /// the union the batch job needs, fetched in a single query rather than
  /// two.
  fn list_needing_notice(
    &self,
    owner_id: Uuid,
    now: DateTime<Utc>,
  ) -> impl Future<Output = Result<Vec<Document>, Self::Error>> + Send + '_;
}
