//! HTTP Basic-auth principal resolution.
//!
//! The username is the account email; credentials are verified against the
//! argon2 PHC hash stored on the user row. Handlers take [`AuthPrincipal`]
//! as an extractor — holding one means the request was authenticated.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use docvault_core::{
  blob::BlobStore, store::DocumentStore, user::Principal,
};

use crate::{AppState, error::Error};

/// The authenticated caller, resolved from the Authorization header.
pub struct AuthPrincipal(pub Principal);

fn basic_credentials(headers: &HeaderMap) -> Result<(String, String), Error> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(Error::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(Error::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| Error::Unauthorized)?;
  let creds =
    std::str::from_utf8(&decoded).map_err(|_| Error::Unauthorized)?;

  let (email, password) = creds.split_once(':').ok_or(Error::Unauthorized)?;
  Ok((email.to_string(), password.to_string()))
}

/// Resolve and verify credentials against the user store.
pub async fn verify_auth<S>(
  headers: &HeaderMap,
  store: &S,
) -> Result<Principal, Error>
where
  S: DocumentStore,
{
  let (email, password) = basic_credentials(headers)?;

  let user = store
    .get_user_by_email(email)
    .await
    .map_err(Error::store)?
    .ok_or(Error::Unauthorized)?;

  let parsed_hash =
    PasswordHash::new(&user.password_hash).map_err(|_| Error::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| Error::Unauthorized)?;

  Ok(Principal::from(&user))
}

impl<S, B> FromRequestParts<AppState<S, B>> for AuthPrincipal
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
{
  type Rejection = Error;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S, B>,
  ) -> Result<Self, Self::Rejection> {
    let principal = verify_auth(&parts.headers, state.store.as_ref()).await?;
    Ok(AuthPrincipal(principal))
  }
}
