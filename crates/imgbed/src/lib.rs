//! imgbed - use a GitHub repository as an image host
//!
//! Images are files in a repository branch, addressed by their repository-relative path.
//! This crate ties the workspace together: configuration loading, logging setup and
//! re-exports of the store client and workflows.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use imgbed::ImgbedConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = ImgbedConfig::load()?;
//!     let manager = config.manager()?;
//!
//!     for image in manager.list_images(config.repository()).await? {
//!         println!("{}", image.markdown());
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `imgbed_error` - Error types
//! - `imgbed_core` - Repository target, stored objects, URL/path resolution
//! - `imgbed_store` - Content API client behind the `ImageStore` trait
//! - `imgbed_manager` - Rename, batch upload, listing cursor and the `ImageManager` facade
//!
//! This crate (`imgbed`) re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod telemetry;

pub use config::{ENV_PREFIX, ImgbedConfig};
pub use telemetry::{DEFAULT_FILTER, VERBOSE_FILTER, init_tracing};

// Re-export error types
pub use imgbed_error::{
    ConfigError, ImgbedError, ImgbedErrorKind, ImgbedResult, StoreError, StoreErrorKind,
    StoreResult,
};

// Re-export core types
pub use imgbed_core::{
    CatalogStats, DEFAULT_BRANCH, IMAGE_EXTENSIONS, RepositoryTarget, RepositoryTargetBuilder,
    SortMode, StoredObject, is_image_name, raw_url, resolve_path, search_objects, sort_objects,
    to_display_url, validate_file_name,
};

// Re-export store client
pub use imgbed_store::{
    ContentTransport, GitHubStore, ImageStore, ObjectMetadata, ReqwestTransport,
};

// Re-export workflows
pub use imgbed_manager::{
    BatchReport, BatchUploader, ImageManager, ListingCursor, ListingOptions, RenameCoordinator,
    RenameFailure, RenameOutcome, UploadOptions, UploadOutcome, UploadProgress, UploadTask,
};
