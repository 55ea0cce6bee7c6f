//! Server error type and axum `IntoResponse` implementation.
//!
//! Status mapping: validation and already-archived are 422 (the former with
//! a per-field error map), authorization failures are 403 — never disguised
//! as 404 — and storage or store failures are logged here and surfaced as
//! an opaque 500.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use docvault_core::validate::ValidationErrors;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unauthorized")]
  Unauthorized,

  #[error("forbidden")]
  Forbidden,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("document is already archived")]
  AlreadyArchived,

  #[error("validation failed")]
  Validation(ValidationErrors),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Error::Store(Box::new(e))
  }

  pub fn storage(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Error::Storage(Box::new(e))
  }
}

impl From<docvault_core::Error> for Error {
  fn from(e: docvault_core::Error) -> Self {
    match e {
      docvault_core::Error::Forbidden => Error::Forbidden,
      docvault_core::Error::AlreadyArchived(_) => Error::AlreadyArchived,
      docvault_core::Error::Validation(errors) => Error::Validation(errors),
      docvault_core::Error::DocumentNotFound(id) => {
        Error::NotFound(format!("document {id} not found"))
      }
      docvault_core::Error::UserNotFound(id) => {
        Error::NotFound(format!("user {id} not found"))
      }
    }
  }
}

/// Render `errors` as `{"field": ["message", ...], ...}`.
fn field_map(errors: &ValidationErrors) -> serde_json::Value {
  let mut map = serde_json::Map::new();
  for e in &errors.errors {
    let entry = map.entry(e.field.to_string()).or_insert_with(|| json!([]));
    if let serde_json::Value::Array(messages) = entry {
      messages.push(json!(e.message));
    }
  }
  serde_json::Value::Object(map)
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    match self {
      Error::Unauthorized => {
        let mut res = (
          StatusCode::UNAUTHORIZED,
          Json(json!({ "error": "unauthorized" })),
        )
          .into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"docvault\""),
        );
        res
      }
      Error::Forbidden => (
        StatusCode::FORBIDDEN,
        Json(json!({ "error": "forbidden" })),
      )
        .into_response(),
      Error::NotFound(msg) => {
        (StatusCode::NOT_FOUND, Json(json!({ "error": msg })))
          .into_response()
      }
      Error::AlreadyArchived => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "message": "Document is already archived" })),
      )
        .into_response(),
      Error::Validation(errors) => (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({
          "message": "The given data was invalid.",
          "errors": field_map(&errors),
        })),
      )
        .into_response(),
      Error::BadRequest(msg) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": msg })))
          .into_response()
      }
      Error::Store(e) => {
        tracing::error!(error = %e, "store failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "internal server error" })),
        )
          .into_response()
      }
      Error::Storage(e) => {
        tracing::error!(error = %e, "blob storage failure");
        (
          StatusCode::INTERNAL_SERVER_ERROR,
          Json(json!({ "error": "internal server error" })),
        )
          .into_response()
      }
    }
  }
}
