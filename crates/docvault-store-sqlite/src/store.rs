//! [`SqliteStore`] — the SQLite implementation of [`DocumentStore`].

use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use docvault_core::{
  document::{Document, EXPIRY_WINDOW_DAYS, NewDocument},
  store::{DocumentStore, DocumentWithOwner},
  user::{NewUser, User},
};

use crate::{
  Error, Result,
  encode::{RawDocument, RawDocumentWithOwner, RawUser, encode_dt, encode_uuid},
  schema::SCHEMA,
};

// ─── Row mapping ─────────────────────────────────────────────────────────────

const DOCUMENT_COLUMNS: &str =
  "id, name, path, owner_id, expires_at, archived_at, created_at, updated_at";

fn raw_document(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawDocument> {
  Ok(RawDocument {
    id:          row.get(0)?,
    name:        row.get(1)?,
    path:        row.get(2)?,
    owner_id:    row.get(3)?,
    expires_at:  row.get(4)?,
    archived_at: row.get(5)?,
    created_at:  row.get(6)?,
    updated_at:  row.get(7)?,
  })
}

fn raw_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    id:            row.get(0)?,
    name:          row.get(1)?,
    email:         row.get(2)?,
    password_hash: row.get(3)?,
    created_at:    row.get(4)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A docvault store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run an owner-scoped document query. `conditions` is appended to the
  /// owner-id filter; `?1` is the owner, `?2`/`?3` the optional time bounds.
  async fn list_documents_where(
    &self,
    owner_id: Uuid,
    conditions: &'static str,
    bounds: Vec<String>,
  ) -> Result<Vec<Document>> {
    let owner_str = encode_uuid(owner_id);

    let raws: Vec<RawDocument> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {DOCUMENT_COLUMNS} FROM documents
           WHERE owner_id = ?1 {conditions}
           ORDER BY expires_at ASC"
        );
        let mut stmt = conn.prepare(&sql)?;

        let mut params: Vec<&dyn rusqlite::ToSql> = vec![&owner_str];
        for b in &bounds {
          params.push(b);
        }

        let rows = stmt
          .query_map(params.as_slice(), raw_document)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawDocument::into_document).collect()
  }
}

// ─── DocumentStore impl ──────────────────────────────────────────────────────

impl DocumentStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn add_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      id:            Uuid::new_v4(),
      name:          input.name,
      email:         input.email,
      password_hash: input.password_hash,
      created_at:    Utc::now(),
    };

    let id_str = encode_uuid(user.id);
    let at_str = encode_dt(user.created_at);
    let (name, email, hash) =
      (user.name.clone(), user.email.clone(), user.password_hash.clone());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (id, name, email, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, name, email, hash, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, email, password_hash, created_at
               FROM users WHERE id = ?1",
              rusqlite::params![id_str],
              raw_user,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn get_user_by_email(&self, email: String) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, email, password_hash, created_at
               FROM users WHERE email = ?1",
              rusqlite::params![email],
              raw_user,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, name, email, password_hash, created_at
           FROM users ORDER BY created_at ASC",
        )?;
        let rows = stmt
          .query_map([], raw_user)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  // ── Documents — writes ────────────────────────────────────────────────────

  async fn create_document(&self, input: NewDocument) -> Result<Document> {
    let now = Utc::now();
    let document = Document {
      id:          Uuid::new_v4(),
      name:        input.name,
      path:        input.path,
      owner_id:    input.owner_id,
      expires_at:  input.expires_at,
      archived_at: None,
      created_at:  now,
      updated_at:  now,
    };

    let id_str = encode_uuid(document.id);
    let owner_str = encode_uuid(document.owner_id);
    let expires_str = encode_dt(document.expires_at);
    let at_str = encode_dt(now);
    let (name, path) = (document.name.clone(), document.path.clone());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO documents
             (id, name, path, owner_id, expires_at, archived_at,
              created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, NULL, ?6, ?6)",
          rusqlite::params![id_str, name, path, owner_str, expires_str, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(document)
  }

  async fn archive_document(
    &self,
    id: Uuid,
    now: DateTime<Utc>,
  ) -> Result<Document> {
    let mut document = self
      .get_document(id)
      .await?
      .ok_or(Error::DocumentNotFound(id))?;

    if document.archived_at.is_some() {
      return Err(Error::AlreadyArchived(id));
    }

    let id_str = encode_uuid(id);
    let at_str = encode_dt(now);

    // The `archived_at IS NULL` guard makes the transition race-safe even
    // though the caller-side check above has already passed.
    let updated: usize = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE documents SET archived_at = ?2, updated_at = ?2
           WHERE id = ?1 AND archived_at IS NULL",
          rusqlite::params![id_str, at_str],
        )?)
      })
      .await?;

    if updated == 0 {
      return Err(Error::AlreadyArchived(id));
    }

    document.archived_at = Some(now);
    document.updated_at = now;
    Ok(document)
  }

  // ── Documents — reads ─────────────────────────────────────────────────────

  async fn get_document(&self, id: Uuid) -> Result<Option<Document>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawDocument> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {DOCUMENT_COLUMNS} FROM documents WHERE id = ?1"
              ),
              rusqlite::params![id_str],
              raw_document,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawDocument::into_document).transpose()
  }

  async fn list_for_owner(
    &self,
    owner_id: Uuid,
  ) -> Result<Vec<DocumentWithOwner>> {
    let owner_str = encode_uuid(owner_id);

    let raws: Vec<RawDocumentWithOwner> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT
             d.id, d.name, d.path, d.owner_id, d.expires_at, d.archived_at,
             d.created_at, d.updated_at,
             u.name  AS owner_name,
             u.email AS owner_email
           FROM documents d
           JOIN users u ON u.id = d.owner_id
           WHERE d.owner_id = ?1
           ORDER BY d.expires_at ASC",
        )?;

        let rows = stmt
          .query_map(rusqlite::params![owner_str], |row| {
            Ok(RawDocumentWithOwner {
              document:    raw_document(row)?,
              owner_name:  row.get(8)?,
              owner_email: row.get(9)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawDocumentWithOwner::into_document_with_owner)
      .collect()
  }

  async fn list_expiring_soon(
    &self,
    owner_id: Uuid,
    now: DateTime<Utc>,
  ) -> Result<Vec<Document>> {
    let window_end = now + Duration::days(EXPIRY_WINDOW_DAYS);
    self
      .list_documents_where(
        owner_id,
        "AND archived_at IS NULL AND expires_at >= ?2 AND expires_at <= ?3",
        vec![encode_dt(now), encode_dt(window_end)],
      )
      .await
  }

  async fn list_expired(
    &self,
    owner_id: Uuid,
    now: DateTime<Utc>,
  ) -> Result<Vec<Document>> {
    self
      .list_documents_where(
        owner_id,
        "AND archived_at IS NULL AND expires_at < ?2",
        vec![encode_dt(now)],
      )
      .await
  }

  async fn list_not_archived(&self, owner_id: Uuid) -> Result<Vec<Document>> {
    self
      .list_documents_where(owner_id, "AND archived_at IS NULL", vec![])
      .await
  }

  async fn list_needing_notice(
    &self,
    owner_id: Uuid,
    now: DateTime<Utc>,
  ) -> Result<Vec<Document>> {
    // Expired and expiring-soon are disjoint and their union is exactly
    // "expires on or before the window end", so one range check covers both.
    let window_end = now + Duration::days(EXPIRY_WINDOW_DAYS);
    self
      .list_documents_where(
        owner_id,
        "AND archived_at IS NULL AND expires_at <= ?2",
        vec![encode_dt(window_end)],
      )
      .await
  }
}
