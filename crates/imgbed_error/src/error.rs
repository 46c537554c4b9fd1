//! Top-level error wrapper types.

use crate::{ConfigError, StoreError};

/// Every error the imgbed crates can surface at the facade boundary.
///
/// # Examples
///
/// ```
/// use imgbed_error::{ImgbedError, ConfigError};
///
/// let err: ImgbedError = ConfigError::new("repository.repo is empty").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum ImgbedErrorKind {
    /// Remote store error
    #[from(StoreError)]
    Store(StoreError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// imgbed error with kind discrimination.
///
/// # Examples
///
/// ```
/// use imgbed_error::{ImgbedResult, ConfigError};
///
/// fn might_fail() -> ImgbedResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("imgbed Error: {}", _0)]
pub struct ImgbedError(Box<ImgbedErrorKind>);

impl ImgbedError {
    /// Create a new error from a kind.
    pub fn new(kind: ImgbedErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ImgbedErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to ImgbedErrorKind
impl<T> From<T> for ImgbedError
where
    T: Into<ImgbedErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for imgbed operations.
pub type ImgbedResult<T> = std::result::Result<T, ImgbedError>;
