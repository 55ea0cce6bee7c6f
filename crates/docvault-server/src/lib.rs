//! HTTP layer for the docvault document service.
//!
//! Exposes an axum [`Router`] over any [`DocumentStore`] and [`BlobStore`]
//! pair. Requests authenticate with HTTP Basic (email + password) and every
//! document endpoint is scoped to the authenticated owner.

pub mod auth;
pub mod documents;
pub mod dto;
pub mod error;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  extract::DefaultBodyLimit,
  routing::{get, post},
};
use docvault_core::{
  blob::BlobStore, store::DocumentStore, validate::MAX_UPLOAD_BYTES,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

/// Request body cap for uploads: the 10 MB file limit plus multipart
/// framing headroom, so an oversized file reaches the validator and gets a
/// field-level 422 instead of a bare 413.
const UPLOAD_BODY_LIMIT: usize = MAX_UPLOAD_BYTES as usize + 64 * 1024;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml`.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub base_url:   String,
  pub store_path: PathBuf,
  pub blob_dir:   PathBuf,
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S, B> {
  pub store:  Arc<S>,
  pub blobs:  Arc<B>,
  pub config: Arc<ServerConfig>,
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the document API.
pub fn router<S, B>(state: AppState<S, B>) -> Router
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  S::Error: std::error::Error + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
  B::Error: std::error::Error + Send + Sync + 'static,
{
  Router::new()
    .route(
      "/api/documents",
      get(documents::list::<S, B>).post(documents::create::<S, B>),
    )
    .route("/api/documents/{id}", get(documents::show::<S, B>))
    .route(
      "/api/documents/{id}/archive",
      post(documents::archive::<S, B>),
    )
    .route(
      "/api/documents/{id}/download",
      get(documents::download::<S, B>),
    )
    .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Integration tests ────────────────────────────────────────────────────────
