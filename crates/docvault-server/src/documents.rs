//! Handlers for the `/api/documents` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/api/documents` | Owner-scoped list, `expires_at` ascending |
//! | `POST` | `/api/documents` | Multipart: `name`, `expires_at`, `file` (PDF, ≤10 MB); 201 + DTO |
//! | `GET`  | `/api/documents/:id` | DTO, owner only |
//! | `POST` | `/api/documents/:id/archive` | One-way; 422 if already archived |
//! | `GET`  | `/api/documents/:id/download` | PDF bytes as `{name}.pdf`; 404 if blob missing |
//!
//! Every handler authorizes explicitly through the core policy before
//! touching a document.

use axum::{
  Json,
  extract::{Multipart, Path, State},
  http::{HeaderMap, HeaderValue, StatusCode, header},
  response::IntoResponse,
};
use chrono::{DateTime, NaiveDate, Utc};
use docvault_core::{
  blob::BlobStore,
  document::{Document, NewDocument},
  policy::{DocumentAction, authorize},
  store::{DocumentStore, OwnerSummary},
  user::Principal,
  validate::{
    self, FieldError, ValidationErrors, validate_expires_at, validate_name,
    validate_pdf_file,
  },
};
use serde_json::json;
use uuid::Uuid;

use crate::{AppState, auth::AuthPrincipal, dto::DocumentDto, error::Error};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /api/documents`
pub async fn list<S, B>(
  AuthPrincipal(principal): AuthPrincipal,
  State(state): State<AppState<S, B>>,
) -> Result<Json<Vec<DocumentDto>>, Error>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
{
  authorize(&principal, DocumentAction::ViewAny, None)?;
  let now = Utc::now();

  let documents = state
    .store
    .list_for_owner(principal.id)
    .await
    .map_err(Error::store)?;

  let dtos = documents
    .into_iter()
    .map(|d| DocumentDto::new(d.document, d.owner, &state.config.base_url, now))
    .collect();
  Ok(Json(dtos))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// The three multipart fields of a create request, as received.
#[derive(Default)]
struct UploadForm {
  name:       Option<String>,
  expires_at: Option<String>,
  file:       Option<Vec<u8>>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, Error> {
  let mut form = UploadForm::default();

  while let Some(field) = multipart
    .next_field()
    .await
    .map_err(|e| Error::BadRequest(format!("multipart error: {e}")))?
  {
    let field_name = field.name().map(str::to_string);
    match field_name.as_deref() {
      Some("name") => {
        form.name = Some(
          field
            .text()
            .await
            .map_err(|e| Error::BadRequest(format!("cannot read name: {e}")))?,
        );
      }
      Some("expires_at") => {
        form.expires_at = Some(field.text().await.map_err(|e| {
          Error::BadRequest(format!("cannot read expires_at: {e}"))
        })?);
      }
      Some("file") => {
        form.file = Some(
          field
            .bytes()
            .await
            .map_err(|e| Error::BadRequest(format!("cannot read file: {e}")))?
            .to_vec(),
        );
      }
      _ => {} // Ignore unknown fields.
    }
  }

  Ok(form)
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (midnight UTC).
fn parse_expires_at(raw: &str) -> Option<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
    return Some(dt.with_timezone(&Utc));
  }
  NaiveDate::parse_from_str(raw, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
    .map(|dt| dt.and_utc())
}

/// Observability hook for the five-year cap: a rejected expiry that far out
/// is an operator-visible event, not just a 422.
fn warn_expiry_beyond_cap(
  principal: &Principal,
  name: Option<&str>,
  requested: DateTime<Utc>,
  now: DateTime<Utc>,
) {
  let max_allowed = validate::max_expiry_date(now);
  if requested.date_naive() > max_allowed {
    tracing::warn!(
      user_id = %principal.id,
      email = %principal.email,
      requested_expiry = %requested.date_naive(),
      max_allowed = %max_allowed,
      document_name = name.unwrap_or(""),
      "document creation attempted with expiry date beyond 5 years"
    );
  }
}

fn validate_upload(
  form: UploadForm,
  principal: &Principal,
  now: DateTime<Utc>,
) -> Result<(String, DateTime<Utc>, Vec<u8>), ValidationErrors> {
  let mut errors = ValidationErrors::default();

  match &form.name {
    None => errors.push(Err(FieldError::new(
      "name",
      "The name field is required.",
    ))),
    Some(name) => errors.push(validate_name(name)),
  }

  let expires_at = match form.expires_at.as_deref() {
    None => {
      errors.push(Err(FieldError::new(
        "expires_at",
        "The expires_at field is required.",
      )));
      None
    }
    Some(raw) => match parse_expires_at(raw) {
      None => {
        errors.push(Err(FieldError::new(
          "expires_at",
          "The expires_at field must be a valid date.",
        )));
        None
      }
      Some(parsed) => {
        errors.push(validate_expires_at(parsed, now));
        Some(parsed)
      }
    },
  };

  match form.file.as_deref() {
    None => errors.push(Err(FieldError::new(
      "file",
      "The file field is required.",
    ))),
    Some(bytes) => errors.push(validate_pdf_file(bytes)),
  }

  if !errors.is_empty() {
    if let Some(requested) = expires_at {
      warn_expiry_beyond_cap(principal, form.name.as_deref(), requested, now);
    }
    return Err(errors);
  }

  match (form.name, expires_at, form.file) {
    (Some(name), Some(expires_at), Some(file)) => Ok((name, expires_at, file)),
    // Unreachable: a missing field always produced an error above.
    _ => Err(errors),
  }
}

/// `POST /api/documents` — multipart form; returns 201 + the stored DTO.
pub async fn create<S, B>(
  AuthPrincipal(principal): AuthPrincipal,
  State(state): State<AppState<S, B>>,
  multipart: Multipart,
) -> Result<impl IntoResponse, Error>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
{
  authorize(&principal, DocumentAction::Create, None)?;
  let now = Utc::now();

  let form = read_upload_form(multipart).await?;
  let (name, expires_at, file) =
    validate_upload(form, &principal, now).map_err(Error::Validation)?;

  let path = state.blobs.put(file).await.map_err(|e| {
    tracing::error!(user_id = %principal.id, error = %e, "document upload failed to reach blob store");
    Error::storage(e)
  })?;

  let document = state
    .store
    .create_document(NewDocument {
      name,
      path,
      owner_id: principal.id,
      expires_at,
    })
    .await
    .map_err(|e| {
      tracing::error!(user_id = %principal.id, error = %e, "document creation failed");
      Error::store(e)
    })?;

  let dto = DocumentDto::new(
    document,
    owner_summary(&principal),
    &state.config.base_url,
    now,
  );
  Ok((StatusCode::CREATED, Json(dto)))
}

// ─── Show ─────────────────────────────────────────────────────────────────────

/// `GET /api/documents/:id`
pub async fn show<S, B>(
  AuthPrincipal(principal): AuthPrincipal,
  State(state): State<AppState<S, B>>,
  Path(id): Path<Uuid>,
) -> Result<Json<DocumentDto>, Error>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
{
  let now = Utc::now();
  let document = fetch_document(&state, id).await?;
  authorize(&principal, DocumentAction::View, Some(&document))?;

  Ok(Json(DocumentDto::new(
    document,
    owner_summary(&principal),
    &state.config.base_url,
    now,
  )))
}

// ─── Archive ──────────────────────────────────────────────────────────────────

/// `POST /api/documents/:id/archive`
pub async fn archive<S, B>(
  AuthPrincipal(principal): AuthPrincipal,
  State(state): State<AppState<S, B>>,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Error>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
{
  let now = Utc::now();
  let document = fetch_document(&state, id).await?;
  authorize(&principal, DocumentAction::Update, Some(&document))?;

  if document.archived_at.is_some() {
    return Err(Error::AlreadyArchived);
  }

  let archived = state
    .store
    .archive_document(id, now)
    .await
    .map_err(Error::store)?;

  let dto = DocumentDto::new(
    archived,
    owner_summary(&principal),
    &state.config.base_url,
    now,
  );
  Ok(Json(json!({
    "message": "Document archived successfully",
    "data": dto,
  })))
}

// ─── Download ─────────────────────────────────────────────────────────────────

/// `GET /api/documents/:id/download`
pub async fn download<S, B>(
  AuthPrincipal(principal): AuthPrincipal,
  State(state): State<AppState<S, B>>,
  Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, Error>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
{
  let document = fetch_document(&state, id).await?;
  authorize(&principal, DocumentAction::View, Some(&document))?;

  let bytes = state
    .blobs
    .get(document.path.clone())
    .await
    .map_err(Error::storage)?
    .ok_or_else(|| Error::NotFound("File not found".to_string()))?;

  let mut headers = HeaderMap::new();
  headers.insert(
    header::CONTENT_TYPE,
    HeaderValue::from_static("application/pdf"),
  );
  let disposition = format!(
    "attachment; filename=\"{}.pdf\"",
    disposition_filename(&document.name)
  );
  headers.insert(
    header::CONTENT_DISPOSITION,
    HeaderValue::from_str(&disposition)
      .map_err(|e| Error::BadRequest(format!("unrepresentable filename: {e}")))?,
  );

  Ok((headers, bytes::Bytes::from(bytes)))
}

/// Document names may legitimately contain characters that are unsafe inside
/// an HTTP quoted-string. Drop quotes, backslashes, and control characters;
/// anything else (including non-ASCII) passes through as-is.
fn disposition_filename(name: &str) -> String {
  name
    .chars()
    .filter(|c| !c.is_control() && *c != '"' && *c != '\\')
    .collect()
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

async fn fetch_document<S, B>(
  state: &AppState<S, B>,
  id: Uuid,
) -> Result<Document, Error>
where
  S: DocumentStore + Clone + Send + Sync + 'static,
  B: BlobStore + Clone + Send + Sync + 'static,
{
  state
    .store
    .get_document(id)
    .await
    .map_err(Error::store)?
    .ok_or_else(|| Error::NotFound(format!("document {id} not found")))
}

/// Owner summary for endpoints where the authorized principal *is* the
/// owner — the ownership check has already passed.
fn owner_summary(principal: &Principal) -> OwnerSummary {
  OwnerSummary {
    id:    principal.id,
    name:  principal.name.clone(),
    email: principal.email.clone(),
  }
}
