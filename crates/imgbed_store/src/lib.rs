//! Content API client for repositories used as image stores.
//!
//! The store speaks to a version-controlled repository through its REST content API:
//! files are created, read and deleted by repository-relative path on one branch.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐
//! │   ImageStore    │  ← upload / list / fetch_metadata / delete
//! ├─────────────────┤
//! │   GitHubStore   │  ← request/response mapping, error classification
//! ├─────────────────┤
//! │ContentTransport │  ← one HTTP exchange (reqwest, or a mock in tests)
//! └─────────────────┘
//! ```
//!
//! No operation retries. Every call is a single attempt and retry policy belongs to the
//! caller.
//!
//! # Example
//!
//! ```rust,no_run
//! use imgbed_core::RepositoryTarget;
//! use imgbed_store::{GitHubStore, ImageStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = GitHubStore::new()?;
//! let target = RepositoryTarget::builder()
//!     .repo("octocat/images")
//!     .root_path("blog")
//!     .token(std::env::var("GITHUB_TOKEN")?)
//!     .build();
//!
//! for object in store.list(&target).await? {
//!     println!("{} -> {}", object.path(), object.display_url());
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod dto;
mod github;
mod store;
mod transport;

pub use github::{GITHUB_API_BASE, GitHubStore};
pub use store::{ImageStore, ObjectMetadata};
pub use transport::{
    ContentFormat, ContentMethod, ContentRequest, ContentResponse, ContentTransport,
    GITHUB_ACCEPT, GITHUB_RAW_ACCEPT, ReqwestTransport, USER_AGENT,
};
