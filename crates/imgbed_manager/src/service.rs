//! Facade exposed to presentation layers.

use crate::{
    BatchReport, BatchUploader, ListingCursor, RenameCoordinator, RenameOutcome, UploadProgress,
};
use imgbed_core::{RepositoryTarget, StoredObject, is_image_name, resolve_path};
use imgbed_error::StoreResult;
use imgbed_store::ImageStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

/// Default number of entries revealed per batch.
pub const DEFAULT_BATCH_SIZE: usize = 30;

/// Default number of uploads in flight.
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// How listings are filtered and revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default)]
pub struct ListingOptions {
    /// Reveal entries batch by batch instead of all at once
    incremental: bool,
    /// Entries per revealed batch
    batch_size: usize,
    /// Drop entries whose names lack an image extension
    images_only: bool,
}

impl Default for ListingOptions {
    fn default() -> Self {
        Self {
            incremental: true,
            batch_size: DEFAULT_BATCH_SIZE,
            images_only: true,
        }
    }
}

impl ListingOptions {
    /// Creates listing options. A batch size of zero is raised to one.
    pub fn new(incremental: bool, batch_size: usize, images_only: bool) -> Self {
        Self {
            incremental,
            batch_size: batch_size.max(1),
            images_only,
        }
    }
}

/// How batch uploads are run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
#[serde(default)]
pub struct UploadOptions {
    /// Uploads in flight at once; `0` means unbounded
    max_concurrent: usize,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            max_concurrent: DEFAULT_MAX_CONCURRENT,
        }
    }
}

impl UploadOptions {
    /// Creates upload options.
    pub fn new(max_concurrent: usize) -> Self {
        Self { max_concurrent }
    }
}

/// Entry point for listing, uploading, renaming, deleting and downloading images.
///
/// The target is passed to every call as an immutable snapshot; the manager itself holds no
/// repository configuration.
///
/// # Example
///
/// ```rust,no_run
/// use imgbed_core::RepositoryTarget;
/// use imgbed_manager::ImageManager;
/// use imgbed_store::GitHubStore;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let manager = ImageManager::new(Arc::new(GitHubStore::new()?));
/// let target = RepositoryTarget::builder()
///     .repo("octocat/images")
///     .token("ghp_example")
///     .build();
///
/// let mut cursor = manager.cursor(manager.list_images(&target).await?);
/// let (first, _) = cursor.reveal_next();
/// for object in first {
///     println!("{}", object.display_url());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ImageManager<S: ?Sized> {
    store: Arc<S>,
    listing: ListingOptions,
    upload: UploadOptions,
}

impl<S: ?Sized> Clone for ImageManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            listing: self.listing.clone(),
            upload: self.upload.clone(),
        }
    }
}

impl<S: ImageStore + ?Sized + 'static> ImageManager<S> {
    /// Creates a manager with default options.
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            listing: ListingOptions::default(),
            upload: UploadOptions::default(),
        }
    }

    /// Replaces the listing options.
    pub fn with_listing(mut self, listing: ListingOptions) -> Self {
        self.listing = listing;
        self
    }

    /// Replaces the upload options.
    pub fn with_upload(mut self, upload: UploadOptions) -> Self {
        self.upload = upload;
        self
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Listing options in effect.
    pub fn listing_options(&self) -> &ListingOptions {
        &self.listing
    }

    /// Upload options in effect.
    pub fn upload_options(&self) -> &UploadOptions {
        &self.upload
    }

    /// Lists the objects under the target's root path.
    ///
    /// When `images_only` is set, entries without an image extension are dropped.
    #[instrument(skip(self, target), fields(repo = %target.repo()))]
    pub async fn list_images(&self, target: &RepositoryTarget) -> StoreResult<Vec<StoredObject>> {
        let mut objects = self.store.list(target).await?;
        if self.listing.images_only {
            let before = objects.len();
            objects.retain(|object| is_image_name(object.name()));
            debug!(dropped = before - objects.len(), "Filtered non-image entries");
        }
        info!(count = objects.len(), "Listed images");
        Ok(objects)
    }

    /// Wraps a listing in a cursor configured by the listing options.
    ///
    /// With incremental reveal disabled, every entry is revealed up front.
    pub fn cursor(&self, objects: Vec<StoredObject>) -> ListingCursor {
        if self.listing.incremental {
            ListingCursor::new(objects, self.listing.batch_size)
        } else {
            let total = objects.len();
            ListingCursor::eager(objects, total)
        }
    }

    /// Uploads local files under the target's root path.
    ///
    /// See [`BatchUploader::run`] for ordering and isolation guarantees.
    pub async fn upload_batch(
        &self,
        target: &RepositoryTarget,
        files: Vec<PathBuf>,
        progress: Option<mpsc::UnboundedSender<UploadProgress>>,
    ) -> BatchReport {
        BatchUploader::new(Arc::clone(&self.store))
            .with_max_concurrent(self.upload.max_concurrent)
            .run(target, files, progress)
            .await
    }

    /// Renames an object within its directory.
    pub async fn rename_image(
        &self,
        target: &RepositoryTarget,
        object: &StoredObject,
        new_name: &str,
    ) -> RenameOutcome {
        RenameCoordinator::new(Arc::clone(&self.store))
            .rename(target, object, new_name)
            .await
    }

    /// Deletes an object, authorized by a freshly fetched revision.
    #[instrument(skip(self, target, object), fields(path = %object.path()))]
    pub async fn delete_image(
        &self,
        target: &RepositoryTarget,
        object: &StoredObject,
    ) -> StoreResult<()> {
        let metadata = self.store.fetch_metadata(target, object.path()).await?;
        self.store
            .delete(target, object.path(), metadata.content_hash())
            .await?;
        info!("Deleted image");
        Ok(())
    }

    /// Reads the current bytes of an object.
    #[instrument(skip(self, target, object), fields(path = %object.path()))]
    pub async fn download_image(
        &self,
        target: &RepositoryTarget,
        object: &StoredObject,
    ) -> StoreResult<Vec<u8>> {
        let metadata = self.store.fetch_metadata(target, object.path()).await?;
        Ok(metadata.into_bytes())
    }

    /// Builds an object reference from a raw URL, custom-domain URL or repository path.
    ///
    /// No store call is made, so the returned object carries no revision; operations that
    /// need one fetch it themselves.
    pub fn locate(
        &self,
        target: &RepositoryTarget,
        url_or_path: &str,
    ) -> StoreResult<StoredObject> {
        let path = resolve_path(url_or_path, target)?;
        Ok(StoredObject::new(path, "", target))
    }
}
