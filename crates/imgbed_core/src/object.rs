//! Stored object records.

use crate::{RepositoryTarget, file_name, parent_dir, raw_url, to_display_url};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One remote file.
///
/// The repository path is the only canonical identity; both URLs are derived from it and
/// the target at construction time. `observed_at` is the local time the object was seen,
/// because the store does not report upload times.
///
/// # Examples
///
/// ```
/// use imgbed_core::{RepositoryTarget, StoredObject};
///
/// let target = RepositoryTarget::builder()
///     .repo("octocat/images")
///     .custom_domain("https://img.example.com")
///     .build();
/// let object = StoredObject::new("blog/cat.png", "3d21ec53", &target);
///
/// assert_eq!(object.name(), "cat.png");
/// assert_eq!(object.display_url(), "https://img.example.com/blog/cat.png");
/// assert_eq!(object.markdown(), "![cat.png](https://img.example.com/blog/cat.png)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct StoredObject {
    /// Repository-relative path
    path: String,
    /// Native download URL
    raw_url: String,
    /// URL rewritten through the custom domain, or the raw URL
    display_url: String,
    /// Final path segment
    name: String,
    /// Revision token required to overwrite or delete
    content_hash: String,
    /// Local capture time
    observed_at: DateTime<Utc>,
}

impl StoredObject {
    /// Builds a record for `path`, observed now.
    pub fn new(
        path: impl Into<String>,
        content_hash: impl Into<String>,
        target: &RepositoryTarget,
    ) -> Self {
        let path = path.into().trim_matches('/').to_string();
        Self {
            raw_url: raw_url(&path, target),
            display_url: to_display_url(&path, target),
            name: file_name(&path).to_string(),
            content_hash: content_hash.into(),
            observed_at: Utc::now(),
            path,
        }
    }

    /// Overrides the capture time.
    pub fn with_observed_at(mut self, observed_at: DateTime<Utc>) -> Self {
        self.observed_at = observed_at;
        self
    }

    /// Directory containing the object, empty at the repository root.
    pub fn dir(&self) -> &str {
        parent_dir(&self.path)
    }

    /// Markdown image snippet pointing at the display URL.
    pub fn markdown(&self) -> String {
        format!("![{}]({})", self.name, self.display_url)
    }
}
