//! Remote store error types.

/// Kinds of remote store errors.
///
/// Every variant that originates from a store response keeps the store's own message text
/// so the presentation layer can show it verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum StoreErrorKind {
    /// Repository identifier or credential missing; no request was sent.
    #[display("Misconfigured target: {}", _0)]
    MisconfiguredTarget(String),
    /// Non-success response or network failure.
    #[display("Store unavailable{}: {}", http_status(status), message)]
    RemoteUnavailable {
        /// HTTP status, if a response was received at all
        status: Option<u16>,
        /// Store-provided message or transport error text
        message: String,
    },
    /// The store understood the request and declined it.
    #[display("Rejected by store (HTTP {}): {}", status, message)]
    RemoteRejected {
        /// HTTP status of the rejection
        status: u16,
        /// Store-provided message, verbatim
        message: String,
    },
    /// The object no longer exists at the given path.
    #[display("Object not found: {}", _0)]
    NotFound(String),
    /// A URL could not be mapped to a repository path.
    #[display("Cannot resolve repository path from: {}", _0)]
    NotResolvable(String),
    /// The response did not match the documented structure.
    #[display("Unexpected response: {}", _0)]
    UnexpectedShape(String),
    /// Reading a local file failed.
    #[display("Local file error: {}", _0)]
    LocalIo(String),
    /// A proposed object name violates the naming rules.
    #[display("Invalid file name: {}", _0)]
    InvalidName(String),
}

impl StoreErrorKind {
    /// The store-provided message, when the error came from a store response.
    pub fn store_message(&self) -> Option<&str> {
        match self {
            StoreErrorKind::RemoteUnavailable { message, .. }
            | StoreErrorKind::RemoteRejected { message, .. } => Some(message),
            _ => None,
        }
    }
}

/// ` (HTTP 503)` when a response was received, empty otherwise.
fn http_status(status: &Option<u16>) -> String {
    status
        .map(|status| format!(" (HTTP {})", status))
        .unwrap_or_default()
}


/// Store error with location tracking.
///
/// # Examples
///
/// ```
/// use imgbed_error::{StoreError, StoreErrorKind};
///
/// let err = StoreError::new(StoreErrorKind::NotFound("img/cat.png".to_string()));
/// assert!(err.is_not_found());
/// assert!(format!("{}", err).contains("not found"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Store Error: {} at line {} in {}", kind, line, file)]
pub struct StoreError {
    /// The kind of error that occurred
    pub kind: StoreErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl StoreError {
    /// Create a new store error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoreErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoreErrorKind {
        &self.kind
    }

    /// Whether the object vanished between observation and action.
    pub fn is_not_found(&self) -> bool {
        matches!(self.kind, StoreErrorKind::NotFound(_))
    }
}

impl From<StoreErrorKind> for StoreError {
    #[track_caller]
    fn from(kind: StoreErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Result type for remote store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;
