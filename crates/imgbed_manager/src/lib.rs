//! Multi-step workflows over an [`ImageStore`](imgbed_store::ImageStore).
//!
//! - [`RenameCoordinator`]: create-before-delete rename with a distinct orphan outcome
//! - [`BatchUploader`]: isolated, bounded-parallel uploads with cumulative throughput
//! - [`ListingCursor`]: pull-based reveal of an already-fetched listing
//! - [`ImageManager`]: the facade a presentation layer talks to
//!
//! None of these retry. Each store call is made once and its outcome is reported as is.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod batch;
mod cursor;
mod rename;
mod service;

pub use batch::{BatchReport, BatchUploader, UploadOutcome, UploadProgress, UploadTask};
pub use cursor::ListingCursor;
pub use rename::{RenameCoordinator, RenameFailure, RenameOutcome, RenameStage};
pub use service::{
    DEFAULT_BATCH_SIZE, DEFAULT_MAX_CONCURRENT, ImageManager, ListingOptions, UploadOptions,
};
