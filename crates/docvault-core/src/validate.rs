//! Validation rules for document creation.
//!
//! Each rule is a standalone function taking an explicit `now` where time is
//! involved, so the boundary cases (yesterday, exactly five years out) are
//! directly testable. The server composes them into a [`ValidationErrors`]
//! value, surfaced as a 422 with per-field messages.

use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::Serialize;

/// Maximum display-name length, in characters.
pub const MAX_NAME_CHARS: usize = 255;

/// Maximum upload size: 10 MB.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Expiry may be at most this many months (5 years) past today.
pub const MAX_EXPIRY_MONTHS: u32 = 60;

/// Leading bytes of every PDF file.
const PDF_MAGIC: &[u8] = b"%PDF-";

// ─── Error collection ────────────────────────────────────────────────────────

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub field:   &'static str,
  pub message: String,
}

impl FieldError {
  pub fn new(field: &'static str, message: impl Into<String>) -> Self {
    FieldError {
      field,
      message: message.into(),
    }
  }
}

/// All field failures for one request, in field order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationErrors {
  pub errors: Vec<FieldError>,
}

impl ValidationErrors {
  pub fn push(&mut self, result: Result<(), FieldError>) {
    if let Err(e) = result {
      self.errors.push(e);
    }
  }

  pub fn is_empty(&self) -> bool {
    self.errors.is_empty()
  }

  pub fn has_field(&self, field: &str) -> bool {
    self.errors.iter().any(|e| e.field == field)
  }
}

// ─── Field rules ─────────────────────────────────────────────────────────────

pub fn validate_name(name: &str) -> Result<(), FieldError> {
  if name.trim().is_empty() {
    return Err(FieldError::new("name", "The name field is required."));
  }
  if name.chars().count() > MAX_NAME_CHARS {
    return Err(FieldError::new(
      "name",
      format!("The name may not be greater than {MAX_NAME_CHARS} characters."),
    ));
  }
  Ok(())
}

/// The latest acceptable expiry date: today plus five years.
pub fn max_expiry_date(now: DateTime<Utc>) -> NaiveDate {
  now
    .date_naive()
    .checked_add_months(Months::new(MAX_EXPIRY_MONTHS))
    .unwrap_or(NaiveDate::MAX)
}

/// Date-granular: the expiry must fall strictly after today and on or
/// before today + 5 years. A date exactly five years out is accepted.
pub fn validate_expires_at(
  expires_at: DateTime<Utc>,
  now: DateTime<Utc>,
) -> Result<(), FieldError> {
  let date = expires_at.date_naive();
  if date <= now.date_naive() {
    return Err(FieldError::new(
      "expires_at",
      "The expiry date must be in the future.",
    ));
  }
  if date > max_expiry_date(now) {
    return Err(FieldError::new(
      "expires_at",
      "The expiry date cannot be more than 5 years in the future.",
    ));
  }
  Ok(())
}

/// Content-sniffing PDF check plus the size bound. The declared MIME type is
/// not trusted; the file must actually begin with `%PDF-`.
pub fn validate_pdf_file(bytes: &[u8]) -> Result<(), FieldError> {
  if !bytes.starts_with(PDF_MAGIC) {
    return Err(FieldError::new("file", "Only PDF files are allowed."));
  }
  if bytes.len() as u64 > MAX_UPLOAD_BYTES {
    return Err(FieldError::new(
      "file",
      "The file may not be greater than 10 MB.",
    ));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;

  #[test]
  fn name_must_be_present_and_bounded() {
    assert!(validate_name("Contract").is_ok());
    assert!(validate_name("").is_err());
    assert!(validate_name("   ").is_err());
    assert!(validate_name(&"x".repeat(255)).is_ok());
    assert!(validate_name(&"x".repeat(256)).is_err());
  }

  #[test]
  fn expiry_yesterday_and_today_are_rejected() {
    let now = Utc::now();
    assert!(validate_expires_at(now - Duration::days(1), now).is_err());
    assert!(validate_expires_at(now, now).is_err());
    assert!(validate_expires_at(now + Duration::days(1), now).is_ok());
  }

  #[test]
  fn expiry_exactly_five_years_out_is_accepted() {
    let now = Utc::now();
    let max = max_expiry_date(now).and_hms_opt(0, 0, 0).unwrap().and_utc();
    assert!(validate_expires_at(max, now).is_ok());
    assert!(validate_expires_at(max + Duration::days(1), now).is_err());
  }

  #[test]
  fn only_pdf_content_is_accepted() {
    assert!(validate_pdf_file(b"%PDF-1.7 rest of file").is_ok());
    assert!(validate_pdf_file(b"\x89PNG\r\n").is_err());
    assert!(validate_pdf_file(b"").is_err());
  }

  #[test]
  fn oversized_pdf_is_rejected() {
    let mut big = b"%PDF-".to_vec();
    big.resize(MAX_UPLOAD_BYTES as usize + 1, 0u8);
    assert!(validate_pdf_file(&big).is_err());
  }

  #[test]
  fn validation_errors_collects_in_field_order() {
    let mut errors = ValidationErrors::default();
    errors.push(validate_name(""));
    errors.push(validate_pdf_file(b"nope"));
    assert_eq!(errors.errors.len(), 2);
    assert!(errors.has_field("name"));
    assert!(errors.has_field("file"));
    assert!(!errors.has_field("expires_at"));
  }
}
