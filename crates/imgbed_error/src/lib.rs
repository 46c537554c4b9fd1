//! Error types for the imgbed image store client.
//!
//! This crate provides the foundation error types used throughout the imgbed workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use imgbed_error::{ImgbedResult, StoreError, StoreErrorKind};
//!
//! fn delete_image() -> ImgbedResult<()> {
//!     Err(StoreError::new(StoreErrorKind::NotFound("img/cat.png".to_string())))?
//! }
//!
//! match delete_image() {
//!     Ok(()) => println!("Deleted"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod store;

pub use config::ConfigError;
pub use error::{ImgbedError, ImgbedErrorKind, ImgbedResult};
pub use store::{StoreError, StoreErrorKind, StoreResult};
