//! Repository target configuration.

use imgbed_error::{StoreError, StoreErrorKind, StoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Branch used when none is configured.
pub const DEFAULT_BRANCH: &str = "main";

/// Where images live: repository, branch, root prefix, credential and display domain.
///
/// A target is an immutable snapshot passed to every store operation. Accessors normalize
/// what they return (blank branch falls back to [`DEFAULT_BRANCH`], the root prefix is
/// returned without surrounding slashes, a blank custom domain counts as unset).
///
/// # Examples
///
/// ```
/// use imgbed_core::RepositoryTarget;
///
/// let target = RepositoryTarget::builder()
///     .repo("octocat/images")
///     .root_path("/blog/")
///     .token("ghp_secret")
///     .build();
///
/// assert_eq!(target.branch(), "main");
/// assert_eq!(target.root_path(), "blog");
/// assert_eq!(target.object_path("cat.png"), "blog/cat.png");
/// assert!(!format!("{:?}", target).contains("ghp_secret"));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RepositoryTarget {
    /// `owner/repo` identifier.
    #[serde(default)]
    repo: String,

    /// Branch all reads and writes are gated on.
    #[serde(default)]
    branch: String,

    /// Directory prefix under which images are stored.
    #[serde(default, alias = "path")]
    root_path: String,

    /// Access credential.
    #[serde(default)]
    token: String,

    /// Domain that rewrites raw download URLs for display.
    #[serde(default)]
    custom_domain: Option<String>,
}

impl RepositoryTarget {
    /// Creates a new target builder.
    pub fn builder() -> RepositoryTargetBuilder {
        RepositoryTargetBuilder::default()
    }

    /// The `owner/repo` identifier as configured.
    pub fn repo(&self) -> &str {
        self.repo.trim()
    }

    /// The configured branch, or [`DEFAULT_BRANCH`] when blank.
    pub fn branch(&self) -> &str {
        let branch = self.branch.trim();
        if branch.is_empty() {
            DEFAULT_BRANCH
        } else {
            branch
        }
    }

    /// Root prefix without leading or trailing slashes (may be empty).
    pub fn root_path(&self) -> &str {
        self.root_path.trim().trim_matches('/')
    }

    /// The access credential.
    pub fn token(&self) -> &str {
        self.token.trim()
    }

    /// Custom display domain, if one is configured.
    pub fn custom_domain(&self) -> Option<&str> {
        self.custom_domain
            .as_deref()
            .map(str::trim)
            .filter(|domain| !domain.is_empty())
    }

    /// Splits the identifier into owner and repository name.
    ///
    /// Returns `None` unless the identifier is exactly two non-empty segments.
    pub fn owner_and_repo(&self) -> Option<(&str, &str)> {
        let (owner, repo) = self.repo().split_once('/')?;
        if owner.is_empty() || repo.is_empty() || repo.contains('/') {
            return None;
        }
        Some((owner, repo))
    }

    /// Checks the invariants every remote operation depends on.
    ///
    /// # Errors
    ///
    /// Returns `MisconfiguredTarget` if the repository identifier is not `owner/repo` or the
    /// credential is blank.
    pub fn ensure_remote_ready(&self) -> StoreResult<()> {
        if self.owner_and_repo().is_none() {
            return Err(StoreError::new(StoreErrorKind::MisconfiguredTarget(format!(
                "repository must be given as owner/repo, got '{}'",
                self.repo()
            ))));
        }
        if self.token().is_empty() {
            return Err(StoreError::new(StoreErrorKind::MisconfiguredTarget(
                "access token is empty".to_string(),
            )));
        }
        Ok(())
    }

    /// Repository path for a file name placed under the root prefix.
    pub fn object_path(&self, file_name: &str) -> String {
        crate::join_path(self.root_path(), file_name)
    }
}

impl fmt::Debug for RepositoryTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RepositoryTarget")
            .field("repo", &self.repo())
            .field("branch", &self.branch())
            .field("root_path", &self.root_path())
            .field("token", &if self.token().is_empty() { "<empty>" } else { "<redacted>" })
            .field("custom_domain", &self.custom_domain())
            .finish()
    }
}

/// Builder for [`RepositoryTarget`].
#[derive(Debug, Default)]
pub struct RepositoryTargetBuilder {
    repo: Option<String>,
    branch: Option<String>,
    root_path: Option<String>,
    token: Option<String>,
    custom_domain: Option<String>,
}

impl RepositoryTargetBuilder {
    /// Sets the `owner/repo` identifier.
    pub fn repo(mut self, value: impl Into<String>) -> Self {
        self.repo = Some(value.into());
        self
    }

    /// Sets the branch.
    pub fn branch(mut self, value: impl Into<String>) -> Self {
        self.branch = Some(value.into());
        self
    }

    /// Sets the root path prefix.
    pub fn root_path(mut self, value: impl Into<String>) -> Self {
        self.root_path = Some(value.into());
        self
    }

    /// Sets the access credential.
    pub fn token(mut self, value: impl Into<String>) -> Self {
        self.token = Some(value.into());
        self
    }

    /// Sets the custom display domain.
    pub fn custom_domain(mut self, value: impl Into<String>) -> Self {
        self.custom_domain = Some(value.into());
        self
    }

    /// Builds the `RepositoryTarget`.
    pub fn build(self) -> RepositoryTarget {
        RepositoryTarget {
            repo: self.repo.unwrap_or_default(),
            branch: self.branch.unwrap_or_else(|| DEFAULT_BRANCH.to_string()),
            root_path: self.root_path.unwrap_or_default(),
            token: self.token.unwrap_or_default(),
            custom_domain: self.custom_domain,
        }
    }
}
