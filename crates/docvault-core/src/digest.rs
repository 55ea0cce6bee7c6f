//! Daily expiry digest composition.
//!
//! Pure functions over an already-fetched document set — the batch service
//! in `docvault-notify` does the fetching and dispatching. Everything takes
//! an explicit `now` so the rendered day counts are deterministic in tests.

use chrono::{DateTime, Utc};

use crate::{
  document::{Document, ExpiryStatus},
  user::User,
};

// ─── Day arithmetic and formatting ───────────────────────────────────────────

/// Whole days until `expires_at`, rounded up. Callers only invoke this for
/// documents at or past `now`, so the result is never negative.
pub fn days_until_expiry(
  expires_at: DateTime<Utc>,
  now: DateTime<Utc>,
) -> i64 {
  let seconds = (expires_at - now).num_seconds().max(0);
  (seconds as u64).div_ceil(86_400) as i64
}

/// Whole days since `expires_at`, rounded down.
pub fn days_since_expiry(
  expires_at: DateTime<Utc>,
  now: DateTime<Utc>,
) -> i64 {
  (now - expires_at).num_days().max(0)
}

/// Human-readable expiry date, e.g. `Mar 04, 2026`.
pub fn format_expiry_date(expires_at: DateTime<Utc>) -> String {
  expires_at.format("%b %d, %Y").to_string()
}

// ─── Outbound message ────────────────────────────────────────────────────────

/// A fully-composed message ready for an opaque mail transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
  pub to:      String,
  pub subject: String,
  pub body:    String,
}

// ─── Digest ──────────────────────────────────────────────────────────────────

/// One user's consolidated expiry digest: the expiring-soon and expired
/// subsets of their live documents, already partitioned.
#[derive(Debug, Clone)]
pub struct ExpiryDigest {
  pub user_name:     String,
  pub user_email:    String,
  pub expiring_soon: Vec<Document>,
  pub expired:       Vec<Document>,
}

impl ExpiryDigest {
  /// Partition `documents` by expiry status as of `now` and build the
  /// digest. Returns `None` when neither subset has any member — no message
  /// is owed to that user. Archived documents are ignored outright, though
  /// the batch query never hands us any.
  pub fn build(
    user: &User,
    documents: &[Document],
    now: DateTime<Utc>,
  ) -> Option<Self> {
    let mut expiring_soon = Vec::new();
    let mut expired = Vec::new();

    for doc in documents {
      if doc.is_archived() {
        continue;
      }
      match doc.expiry_status(now) {
        ExpiryStatus::ExpiringSoon => expiring_soon.push(doc.clone()),
        ExpiryStatus::Expired => expired.push(doc.clone()),
        ExpiryStatus::Active => {}
      }
    }

    if expiring_soon.is_empty() && expired.is_empty() {
      return None;
    }

    Some(ExpiryDigest {
      user_name: user.name.clone(),
      user_email: user.email.clone(),
      expiring_soon,
      expired,
    })
  }

  /// Render the digest into a plain-text [`OutboundEmail`]. Either section
  /// is omitted when its subset is empty; `build` guarantees at least one is
  /// populated.
  pub fn into_email(self, now: DateTime<Utc>) -> OutboundEmail {
    let mut body = String::new();
    body.push_str(&format!("Hello {},\n\n", self.user_name));
    body.push_str("This is your daily document expiry reminder.\n");

    if !self.expiring_soon.is_empty() {
      body.push_str("\nDocuments expiring within the next 7 days:\n");
      for doc in &self.expiring_soon {
        body.push_str(&format!(
          "- {} (expires in {} days on {})\n",
          doc.name,
          days_until_expiry(doc.expires_at, now),
          format_expiry_date(doc.expires_at),
        ));
      }
    }

    if !self.expired.is_empty() {
      body.push_str("\nDocuments that have expired and need attention:\n");
      for doc in &self.expired {
        body.push_str(&format!(
          "- {} (expired {} days ago on {})\n",
          doc.name,
          days_since_expiry(doc.expires_at, now),
          format_expiry_date(doc.expires_at),
        ));
      }
    }

    body.push_str("\nPlease review these documents and take appropriate action.\n");

    OutboundEmail {
      to: self.user_email,
      subject: "Document Expiry Reminder".to_string(),
      body,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;
  use uuid::Uuid;

  fn user() -> User {
    User {
      id:            Uuid::new_v4(),
      name:          "Alice".into(),
      email:         "alice@example.com".into(),
      password_hash: "$argon2id$stub".into(),
      created_at:    Utc::now(),
    }
  }

  fn doc(
    name: &str,
    expires_at: DateTime<Utc>,
    archived_at: Option<DateTime<Utc>>,
  ) -> Document {
    let now = Utc::now();
    Document {
      id: Uuid::new_v4(),
      name: name.into(),
      path: format!("documents/{}.pdf", Uuid::new_v4()),
      owner_id: Uuid::new_v4(),
      expires_at,
      archived_at,
      created_at: now,
      updated_at: now,
    }
  }

  #[test]
  fn day_counts_round_the_right_way() {
    let now = Utc::now();
    // 2.5 days out rounds up to 3; 2.5 days past rounds down to 2.
    let ahead = now + Duration::hours(60);
    let behind = now - Duration::hours(60);
    assert_eq!(days_until_expiry(ahead, now), 3);
    assert_eq!(days_since_expiry(behind, now), 2);
    assert_eq!(days_until_expiry(now, now), 0);
  }

  #[test]
  fn build_partitions_and_archived_documents_never_appear() {
    let now = Utc::now();
    let u = user();
    let a = doc("A", now + Duration::days(3), None);
    let b = doc("B", now - Duration::days(5), None);
    let c = doc("C", now - Duration::days(10), Some(now));
    let d = doc("D", now + Duration::days(30), None);

    let digest =
      ExpiryDigest::build(&u, &[a, b, c, d], now).expect("non-empty digest");
    assert_eq!(digest.expiring_soon.len(), 1);
    assert_eq!(digest.expiring_soon[0].name, "A");
    assert_eq!(digest.expired.len(), 1);
    assert_eq!(digest.expired[0].name, "B");
  }

  #[test]
  fn build_returns_none_when_nothing_qualifies() {
    let now = Utc::now();
    let u = user();
    let only_active = doc("D", now + Duration::days(30), None);
    assert!(ExpiryDigest::build(&u, &[only_active], now).is_none());
    assert!(ExpiryDigest::build(&u, &[], now).is_none());
  }

  #[test]
  fn email_contains_both_sections_with_day_counts() {
    let now = Utc::now();
    let u = user();
    let a = doc("Lease", now + Duration::days(3), None);
    let b = doc("Permit", now - Duration::days(5), None);

    let email = ExpiryDigest::build(&u, &[a, b], now)
      .unwrap()
      .into_email(now);

    assert_eq!(email.to, "alice@example.com");
    assert_eq!(email.subject, "Document Expiry Reminder");
    assert!(email.body.starts_with("Hello Alice,"));
    assert!(email.body.contains("Documents expiring within the next 7 days:"));
    assert!(email.body.contains("- Lease (expires in 3 days on "));
    assert!(
      email
        .body
        .contains("Documents that have expired and need attention:")
    );
    assert!(email.body.contains("- Permit (expired 5 days ago on "));
  }

  #[test]
  fn email_omits_an_empty_section() {
    let now = Utc::now();
    let u = user();
    let a = doc("Lease", now + Duration::days(2), None);

    let email = ExpiryDigest::build(&u, &[a], now).unwrap().into_email(now);
    assert!(email.body.contains("expiring within the next 7 days"));
    assert!(!email.body.contains("have expired and need attention"));
  }
}
