//! User — the owning principal for documents.
//!
//! User lifecycle (registration flows, deletion) is out of scope; the store
//! only needs enough to resolve credentials and address digests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered user. `password_hash` is an argon2 PHC string and never
/// leaves the server process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub id:            Uuid,
  pub name:          String,
  pub email:         String,
  #[serde(skip_serializing)]
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
}

/// Input to [`crate::store::DocumentStore::add_user`].
#[derive(Debug, Clone)]
pub struct NewUser {
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
}

/// An authenticated caller, as resolved by the server's auth layer.
/// Existence of a `Principal` value means the request was authenticated.
#[derive(Debug, Clone)]
pub struct Principal {
  pub id:    Uuid,
  pub name:  String,
  pub email: String,
}

impl From<&User> for Principal {
  fn from(u: &User) -> Self {
    Principal {
      id:    u.id,
      name:  u.name.clone(),
      email: u.email.clone(),
    }
  }
}
