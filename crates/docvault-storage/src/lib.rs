//! Filesystem backend for the docvault blob store.
//!
//! Blobs live under a base directory at the opaque path assigned on `put`
//! (`documents/{uuid}.pdf`). Writes go through a temp file and a rename so a
//! crashed upload never leaves a partial blob at a resolvable path.

use std::path::{Component, Path, PathBuf};

use docvault_core::blob::BlobStore;
use thiserror::Error;
use tokio::fs;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  #[error("storage IO error: {0}")]
  Io(#[from] std::io::Error),

  #[error("invalid blob path: {0:?}")]
  InvalidPath(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A blob store rooted at a single directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
  base_dir: PathBuf,
}

impl FsBlobStore {
  /// Create the store, making the base directory (and its temp area) if
  /// needed.
  pub async fn open(base_dir: impl Into<PathBuf>) -> Result<Self> {
    let base_dir = base_dir.into();
    fs::create_dir_all(base_dir.join("documents")).await?;
    fs::create_dir_all(base_dir.join(".tmp")).await?;
    Ok(Self { base_dir })
  }

  /// Resolve an opaque path under the base directory, rejecting anything
  /// that would escape it.
  fn resolve(&self, path: &str) -> Result<PathBuf> {
    let relative = Path::new(path);
    let escapes = relative.components().any(|c| {
      !matches!(c, Component::Normal(_))
    });
    if path.is_empty() || escapes {
      return Err(Error::InvalidPath(path.to_string()));
    }
    Ok(self.base_dir.join(relative))
  }

  fn temp_path(&self) -> PathBuf {
    self.base_dir.join(".tmp").join(Uuid::new_v4().to_string())
  }
}

impl BlobStore for FsBlobStore {
  type Error = Error;

  async fn put(&self, data: Vec<u8>) -> Result<String> {
    let path = format!("documents/{}.pdf", Uuid::new_v4());
    let target = self.resolve(&path)?;
    let temp = self.temp_path();

    if let Err(e) = fs::write(&temp, &data).await {
      let _ = fs::remove_file(&temp).await;
      return Err(e.into());
    }
    if let Err(e) = fs::rename(&temp, &target).await {
      let _ = fs::remove_file(&temp).await;
      return Err(e.into());
    }

    Ok(path)
  }

  async fn get(&self, path: String) -> Result<Option<Vec<u8>>> {
    let target = self.resolve(&path)?;
    match fs::read(&target).await {
      Ok(bytes) => Ok(Some(bytes)),
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
      Err(e) => Err(e.into()),
    }
  }

  async fn exists(&self, path: String) -> Result<bool> {
    let target = self.resolve(&path)?;
    Ok(fs::try_exists(&target).await?)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  async fn temp_store() -> FsBlobStore {
    let dir = std::env::temp_dir().join(format!("docvault-test-{}", Uuid::new_v4()));
    FsBlobStore::open(dir).await.expect("temp blob store")
  }

  #[tokio::test]
  async fn put_then_get_round_trips_bytes() {
    let store = temp_store().await;
    let content = b"%PDF-1.7 test content".to_vec();

    let path = store.put(content.clone()).await.unwrap();
    assert!(path.starts_with("documents/"));
    assert!(path.ends_with(".pdf"));

    let fetched = store.get(path.clone()).await.unwrap().expect("blob exists");
    assert_eq!(fetched, content);
    assert!(store.exists(path).await.unwrap());
  }

  #[tokio::test]
  async fn get_missing_returns_none() {
    let store = temp_store().await;
    let missing = format!("documents/{}.pdf", Uuid::new_v4());
    assert!(store.get(missing.clone()).await.unwrap().is_none());
    assert!(!store.exists(missing).await.unwrap());
  }

  #[tokio::test]
  async fn paths_escaping_the_base_dir_are_rejected() {
    let store = temp_store().await;
    for bad in ["../outside.pdf", "/etc/passwd", "", "documents/../../x"] {
      assert!(
        matches!(store.get(bad.to_string()).await, Err(Error::InvalidPath(_))),
        "{bad:?} should be rejected"
      );
    }
  }

  #[tokio::test]
  async fn each_put_assigns_a_distinct_path() {
    let store = temp_store().await;
    let a = store.put(b"%PDF-a".to_vec()).await.unwrap();
    let b = store.put(b"%PDF-b".to_vec()).await.unwrap();
    assert_ne!(a, b);
  }
}
