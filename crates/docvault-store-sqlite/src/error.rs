//! Error type for `docvault-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("document not found: {0}")]
  DocumentNotFound(uuid::Uuid),

  #[error("user not found: {0}")]
  UserNotFound(uuid::Uuid),

  /// The one-way archive transition was attempted a second time.
  #[error("document {0} is already archived")]
  AlreadyArchived(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
