//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, Duration, Utc};
use docvault_core::{
  document::NewDocument,
  store::DocumentStore,
  user::{NewUser, User},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn add_user(s: &SqliteStore, name: &str, email: &str) -> User {
  s.add_user(NewUser {
    name:          name.into(),
    email:         email.into(),
    password_hash: "$argon2id$stub".into(),
  })
  .await
  .unwrap()
}

fn new_document(
  owner_id: Uuid,
  name: &str,
  expires_at: DateTime<Utc>,
) -> NewDocument {
  NewDocument {
    name: name.into(),
    path: format!("documents/{}.pdf", Uuid::new_v4()),
    owner_id,
    expires_at,
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn add_and_get_user() {
  let s = store().await;

  let user = add_user(&s, "Alice", "alice@example.com").await;
  let fetched = s.get_user(user.id).await.unwrap().expect("user exists");
  assert_eq!(fetched.id, user.id);
  assert_eq!(fetched.email, "alice@example.com");
  assert_eq!(fetched.password_hash, "$argon2id$stub");
}

#[tokio::test]
async fn get_user_by_email() {
  let s = store().await;
  let user = add_user(&s, "Alice", "alice@example.com").await;

  let fetched = s
    .get_user_by_email("alice@example.com".into())
    .await
    .unwrap()
    .expect("user exists");
  assert_eq!(fetched.id, user.id);

  let missing = s
    .get_user_by_email("nobody@example.com".into())
    .await
    .unwrap();
  assert!(missing.is_none());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  add_user(&s, "Alice", "alice@example.com").await;

  let result = s
    .add_user(NewUser {
      name:          "Impostor".into(),
      email:         "alice@example.com".into(),
      password_hash: "$argon2id$other".into(),
    })
    .await;
  assert!(result.is_err());
}

#[tokio::test]
async fn list_users_returns_everyone() {
  let s = store().await;
  add_user(&s, "Alice", "alice@example.com").await;
  add_user(&s, "Bob", "bob@example.com").await;

  let users = s.list_users().await.unwrap();
  assert_eq!(users.len(), 2);
}

// ─── Document creation and retrieval ─────────────────────────────────────────

#[tokio::test]
async fn create_and_get_document() {
  let s = store().await;
  let user = add_user(&s, "Alice", "alice@example.com").await;
  let expires = Utc::now() + Duration::days(30);

  let doc = s
    .create_document(new_document(user.id, "Contract", expires))
    .await
    .unwrap();
  assert_eq!(doc.owner_id, user.id);
  assert!(doc.archived_at.is_none());
  assert_eq!(doc.created_at, doc.updated_at);

  let fetched = s.get_document(doc.id).await.unwrap().expect("exists");
  assert_eq!(fetched.id, doc.id);
  assert_eq!(fetched.name, "Contract");
  assert_eq!(fetched.path, doc.path);
  assert_eq!(fetched.expires_at, doc.expires_at);
}

#[tokio::test]
async fn get_document_missing_returns_none() {
  let s = store().await;
  assert!(s.get_document(Uuid::new_v4()).await.unwrap().is_none());
}

// ─── Owner-scoped listing ────────────────────────────────────────────────────

#[tokio::test]
async fn list_for_owner_is_sorted_by_expiry_ascending() {
  let s = store().await;
  let user = add_user(&s, "Alice", "alice@example.com").await;
  let now = Utc::now();

  s.create_document(new_document(user.id, "Later", now + Duration::days(60)))
    .await
    .unwrap();
  s.create_document(new_document(user.id, "Soonest", now + Duration::days(2)))
    .await
    .unwrap();
  s.create_document(new_document(user.id, "Middle", now + Duration::days(20)))
    .await
    .unwrap();

  let listed = s.list_for_owner(user.id).await.unwrap();
  let names: Vec<&str> =
    listed.iter().map(|d| d.document.name.as_str()).collect();
  assert_eq!(names, ["Soonest", "Middle", "Later"]);

  // Every entry carries the owner summary for display.
  for entry in &listed {
    assert_eq!(entry.owner.id, user.id);
    assert_eq!(entry.owner.name, "Alice");
    assert_eq!(entry.owner.email, "alice@example.com");
  }
}

#[tokio::test]
async fn list_for_owner_never_crosses_ownership() {
  let s = store().await;
  let alice = add_user(&s, "Alice", "alice@example.com").await;
  let bob = add_user(&s, "Bob", "bob@example.com").await;
  let now = Utc::now();

  s.create_document(new_document(alice.id, "Hers", now + Duration::days(5)))
    .await
    .unwrap();
  s.create_document(new_document(bob.id, "His", now + Duration::days(5)))
    .await
    .unwrap();

  let hers = s.list_for_owner(alice.id).await.unwrap();
  assert_eq!(hers.len(), 1);
  assert_eq!(hers[0].document.name, "Hers");
}

// ─── Expiry-window predicates ────────────────────────────────────────────────

#[tokio::test]
async fn expiry_predicates_classify_and_exclude_archived() {
  let s = store().await;
  let user = add_user(&s, "Alice", "alice@example.com").await;
  let now = Utc::now();

  let soon = s
    .create_document(new_document(user.id, "Soon", now + Duration::days(3)))
    .await
    .unwrap();
  let expired = s
    .create_document(new_document(user.id, "Expired", now - Duration::days(5)))
    .await
    .unwrap();
  let archived = s
    .create_document(new_document(
      user.id,
      "ArchivedExpired",
      now - Duration::days(10),
    ))
    .await
    .unwrap();
  s.archive_document(archived.id, now).await.unwrap();
  s.create_document(new_document(user.id, "Active", now + Duration::days(30)))
    .await
    .unwrap();

  let expiring = s.list_expiring_soon(user.id, now).await.unwrap();
  assert_eq!(expiring.len(), 1);
  assert_eq!(expiring[0].id, soon.id);

  let past = s.list_expired(user.id, now).await.unwrap();
  assert_eq!(past.len(), 1);
  assert_eq!(past[0].id, expired.id);

  let live = s.list_not_archived(user.id).await.unwrap();
  assert_eq!(live.len(), 3);
  assert!(live.iter().all(|d| d.id != archived.id));
}

#[tokio::test]
async fn expiring_soon_window_boundary_is_inclusive() {
  let s = store().await;
  let user = add_user(&s, "Alice", "alice@example.com").await;
  let now = Utc::now();

  let at_edge = s
    .create_document(new_document(user.id, "Edge", now + Duration::days(7)))
    .await
    .unwrap();
  s.create_document(new_document(
    user.id,
    "Past edge",
    now + Duration::days(7) + Duration::seconds(1),
  ))
  .await
  .unwrap();

  let expiring = s.list_expiring_soon(user.id, now).await.unwrap();
  assert_eq!(expiring.len(), 1);
  assert_eq!(expiring[0].id, at_edge.id);
}

#[tokio::test]
async fn needing_notice_is_the_single_pass_union() {
  let s = store().await;
  let user = add_user(&s, "Alice", "alice@example.com").await;
  let now = Utc::now();

  let a = s
    .create_document(new_document(user.id, "A", now + Duration::days(3)))
    .await
    .unwrap();
  let b = s
    .create_document(new_document(user.id, "B", now - Duration::days(5)))
    .await
    .unwrap();
  let c = s
    .create_document(new_document(user.id, "C", now - Duration::days(10)))
    .await
    .unwrap();
  s.archive_document(c.id, now).await.unwrap();
  s.create_document(new_document(user.id, "D", now + Duration::days(30)))
    .await
    .unwrap();

  let notice = s.list_needing_notice(user.id, now).await.unwrap();
  let ids: Vec<Uuid> = notice.iter().map(|d| d.id).collect();
  assert_eq!(ids.len(), 2);
  assert!(ids.contains(&a.id));
  assert!(ids.contains(&b.id));
}

// ─── Archiving ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn archive_sets_timestamps_once() {
  let s = store().await;
  let user = add_user(&s, "Alice", "alice@example.com").await;
  let now = Utc::now();

  let doc = s
    .create_document(new_document(user.id, "Old", now + Duration::days(3)))
    .await
    .unwrap();

  let archived = s.archive_document(doc.id, now).await.unwrap();
  assert_eq!(archived.archived_at, Some(now));
  assert_eq!(archived.updated_at, now);

  let fetched = s.get_document(doc.id).await.unwrap().unwrap();
  assert_eq!(fetched.archived_at, Some(now));
}

#[tokio::test]
async fn second_archive_fails_and_preserves_the_first_timestamp() {
  let s = store().await;
  let user = add_user(&s, "Alice", "alice@example.com").await;
  let now = Utc::now();

  let doc = s
    .create_document(new_document(user.id, "Old", now + Duration::days(3)))
    .await
    .unwrap();
  s.archive_document(doc.id, now).await.unwrap();

  let later = now + Duration::hours(6);
  let result = s.archive_document(doc.id, later).await;
  assert!(matches!(result, Err(Error::AlreadyArchived(id)) if id == doc.id));

  let fetched = s.get_document(doc.id).await.unwrap().unwrap();
  assert_eq!(fetched.archived_at, Some(now), "first timestamp retained");
}

#[tokio::test]
async fn archive_missing_document_is_not_found() {
  let s = store().await;
  let id = Uuid::new_v4();
  let result = s.archive_document(id, Utc::now()).await;
  assert!(matches!(result, Err(Error::DocumentNotFound(got)) if got == id));
}
