//! Core data types for the imgbed image store client.
//!
//! This crate provides the repository target, the stored object record and the pure
//! functions that map between canonical repository paths and the URLs users see.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod naming;
mod object;
mod resolver;
mod target;

pub use catalog::{CatalogStats, SortMode, search_objects, sort_objects};
pub use naming::{
    IMAGE_EXTENSIONS, MAX_NAME_LEN, file_name, is_image_name, join_path, parent_dir,
    validate_file_name,
};
pub use object::StoredObject;
pub use resolver::{RAW_HOST, raw_url, resolve_path, to_display_url};
pub use target::{DEFAULT_BRANCH, RepositoryTarget, RepositoryTargetBuilder};
