//! The `BlobStore` trait — an opaque byte store keyed by path.
//!
//! The vault treats file content as opaque: `put` assigns and returns the
//! locator, and documents carry it around as an immutable string. Backends
//! live elsewhere (`docvault-storage` provides the filesystem one).

use std::future::Future;

/// Abstraction over the file-content backend.
///
/// Paths returned by `put` are opaque to callers; the only contract is that
/// `get` with the same path yields the same bytes until the blob is removed
/// out-of-band.
pub trait BlobStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Store `data` and return the assigned opaque path.
  fn put(
    &self,
    data: Vec<u8>,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + '_;

  /// Retrieve the bytes at `path`. Returns `None` if no blob exists there.
  fn get(
    &self,
    path: String,
  ) -> impl Future<Output = Result<Option<Vec<u8>>, Self::Error>> + Send + '_;

  /// Whether a blob exists at `path`.
  fn exists(
    &self,
    path: String,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
