//! Image store trait definition.

use async_trait::async_trait;
use imgbed_core::{RepositoryTarget, StoredObject};
use imgbed_error::{StoreError, StoreErrorKind, StoreResult};
use std::path::Path;
use tracing::{debug, instrument};

/// Current revision and bytes of a remote file.
///
/// Fetched immediately before a destructive operation; the hash is never reused from an
/// earlier, unrelated call.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct ObjectMetadata {
    /// Repository path the metadata was read from
    path: String,
    /// Revision token authorizing overwrite or delete
    content_hash: String,
    /// Raw file bytes
    bytes: Vec<u8>,
}

impl ObjectMetadata {
    /// Creates metadata for a path.
    pub fn new(path: impl Into<String>, content_hash: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            content_hash: content_hash.into(),
            bytes,
        }
    }

    /// Consumes the metadata, returning the file bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Remote operations on a repository used as an image store.
///
/// Every method validates the target first and fails with `MisconfiguredTarget` before
/// any network attempt when the repository identifier or credential is missing.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Creates `path` with `bytes`, or overwrites it when `overwrite_hash` is the current
    /// revision.
    ///
    /// # Errors
    ///
    /// `RemoteRejected` carries the store's message verbatim (conflicts, authentication,
    /// size limits); `RemoteUnavailable` covers server and network failures.
    async fn put_object(
        &self,
        target: &RepositoryTarget,
        path: &str,
        bytes: &[u8],
        overwrite_hash: Option<&str>,
    ) -> StoreResult<StoredObject>;

    /// Uploads a local file to `path` as a new object.
    ///
    /// File size is not checked locally; store-side limits surface as `RemoteRejected`.
    #[instrument(skip(self, target), fields(repo = %target.repo(), local_file = %local_file.display()))]
    async fn upload(
        &self,
        target: &RepositoryTarget,
        local_file: &Path,
        path: &str,
    ) -> StoreResult<StoredObject> {
        target.ensure_remote_ready()?;

        let bytes = tokio::fs::read(local_file).await.map_err(|e| {
            StoreError::new(StoreErrorKind::LocalIo(format!(
                "{}: {}",
                local_file.display(),
                e
            )))
        })?;
        debug!(size = bytes.len(), "Read local file");

        self.put_object(target, path, &bytes, None).await
    }

    /// Lists the files directly under the target's root path, in the store's order.
    ///
    /// # Errors
    ///
    /// `RemoteUnavailable` on any non-200 response, `UnexpectedShape` when the response is
    /// not a directory listing.
    async fn list(&self, target: &RepositoryTarget) -> StoreResult<Vec<StoredObject>>;

    /// Reads the current revision and bytes of `path`.
    ///
    /// # Errors
    ///
    /// `NotFound` when the path no longer exists.
    async fn fetch_metadata(
        &self,
        target: &RepositoryTarget,
        path: &str,
    ) -> StoreResult<ObjectMetadata>;

    /// Deletes `path`, authorized by the revision obtained from
    /// [`fetch_metadata`](Self::fetch_metadata) in the same logical operation.
    ///
    /// # Errors
    ///
    /// `NotFound` when the path is already gone, `RemoteRejected` when the store refuses
    /// (for example a stale revision).
    async fn delete(
        &self,
        target: &RepositoryTarget,
        path: &str,
        content_hash: &str,
    ) -> StoreResult<()>;
}
