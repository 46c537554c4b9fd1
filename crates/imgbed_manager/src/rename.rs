//! Create-before-delete rename.

use imgbed_core::{RepositoryTarget, StoredObject, join_path, validate_file_name};
use imgbed_error::StoreError;
use imgbed_store::ImageStore;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Steps of a rename, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum RenameStage {
    /// Reading the current revision and bytes of the old object
    #[display("fetching")]
    Fetching,
    /// Writing the bytes under the new name
    #[display("creating")]
    Creating,
    /// Removing the old object
    #[display("deleting")]
    Deleting,
    /// Both objects handled
    #[display("done")]
    Done,
}

/// Why a rename stopped before the new object existed.
///
/// In every case the store is unchanged.
#[derive(Debug, Clone, derive_more::Display)]
pub enum RenameFailure {
    /// The new name was rejected locally; nothing was sent
    #[display("invalid name: {}", _0.kind)]
    InvalidName(StoreError),
    /// The old object no longer exists
    #[display("source gone: {}", _0.kind)]
    SourceGone(StoreError),
    /// Reading the old object failed for another reason
    #[display("fetch failed: {}", _0.kind)]
    FetchFailed(StoreError),
    /// Writing the new object failed
    #[display("create failed: {}", _0.kind)]
    CreateFailed(StoreError),
}

impl RenameFailure {
    /// The stage the rename stopped in.
    pub fn stage(&self) -> RenameStage {
        match self {
            RenameFailure::InvalidName(_)
            | RenameFailure::SourceGone(_)
            | RenameFailure::FetchFailed(_) => RenameStage::Fetching,
            RenameFailure::CreateFailed(_) => RenameStage::Creating,
        }
    }

    /// The underlying store error.
    pub fn error(&self) -> &StoreError {
        match self {
            RenameFailure::InvalidName(e)
            | RenameFailure::SourceGone(e)
            | RenameFailure::FetchFailed(e)
            | RenameFailure::CreateFailed(e) => e,
        }
    }
}

/// Terminal result of a rename.
#[derive(Debug, Clone)]
pub enum RenameOutcome {
    /// The object now lives under the new name only.
    Done(StoredObject),
    /// The new object exists but the old one could not be deleted.
    ///
    /// The store holds both; `orphan_path` names the leftover old object.
    OrphanWarning {
        /// The newly created object
        object: StoredObject,
        /// Path of the old object that is still present
        orphan_path: String,
        /// Why the delete failed
        error: StoreError,
    },
    /// Nothing was created.
    Failed(RenameFailure),
}

impl RenameOutcome {
    /// The object to show after the rename, if one was created (or kept, for a no-op).
    pub fn object(&self) -> Option<&StoredObject> {
        match self {
            RenameOutcome::Done(object) | RenameOutcome::OrphanWarning { object, .. } => {
                Some(object)
            }
            RenameOutcome::Failed(_) => None,
        }
    }

    /// Whether the rename completed without leaving anything behind.
    pub fn is_done(&self) -> bool {
        matches!(self, RenameOutcome::Done(_))
    }
}

/// Renames objects by copying to the new path and then deleting the old one.
///
/// The store has no rename primitive. The new object is always created before the old one
/// is deleted, so a failure never loses data: at worst both objects exist and the caller
/// gets [`RenameOutcome::OrphanWarning`].
#[derive(Debug)]
pub struct RenameCoordinator<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for RenameCoordinator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ImageStore + ?Sized> RenameCoordinator<S> {
    /// Creates a coordinator over a store.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Renames `object` to `new_name` within its directory.
    ///
    /// Renaming to the current name returns `Done` with the object unchanged and makes no
    /// store calls.
    #[instrument(skip(self, target, object), fields(from = %object.path()))]
    pub async fn rename(
        &self,
        target: &RepositoryTarget,
        object: &StoredObject,
        new_name: &str,
    ) -> RenameOutcome {
        if new_name == object.name() {
            debug!("New name equals current name");
            return RenameOutcome::Done(object.clone());
        }
        if let Err(e) = validate_file_name(new_name) {
            return RenameOutcome::Failed(RenameFailure::InvalidName(e));
        }

        let old_path = object.path().as_str();
        let new_path = join_path(object.dir(), new_name);

        debug!(stage = %RenameStage::Fetching);
        let metadata = match self.store.fetch_metadata(target, old_path).await {
            Ok(metadata) => metadata,
            Err(e) if e.is_not_found() => {
                return RenameOutcome::Failed(RenameFailure::SourceGone(e));
            }
            Err(e) => return RenameOutcome::Failed(RenameFailure::FetchFailed(e)),
        };

        debug!(stage = %RenameStage::Creating, to = %new_path);
        let created = match self
            .store
            .put_object(target, &new_path, metadata.bytes(), None)
            .await
        {
            Ok(created) => created,
            Err(e) => return RenameOutcome::Failed(RenameFailure::CreateFailed(e)),
        };

        debug!(stage = %RenameStage::Deleting);
        if let Err(e) = self
            .store
            .delete(target, old_path, metadata.content_hash())
            .await
        {
            warn!(orphan = %old_path, error = %e.kind, "Old object left behind after rename");
            return RenameOutcome::OrphanWarning {
                object: created,
                orphan_path: old_path.to_string(),
                error: e,
            };
        }

        info!(to = %created.path(), "Renamed object");
        RenameOutcome::Done(created)
    }
}
