//! Error types for `docvault-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::validate::ValidationErrors;

#[derive(Debug, Error)]
pub enum Error {
  #[error("document not found: {0}")]
  DocumentNotFound(Uuid),

  #[error("user not found: {0}")]
  UserNotFound(Uuid),

  #[error("document {0} is already archived")]
  AlreadyArchived(Uuid),

  #[error("forbidden")]
  Forbidden,

  #[error("validation failed")]
  Validation(ValidationErrors),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
