//! Object naming rules and repository path helpers.

use imgbed_error::{StoreError, StoreErrorKind, StoreResult};

/// Longest file name accepted for a rename.
pub const MAX_NAME_LEN: usize = 255;

/// Extensions the listing treats as images (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

/// Whether a file name carries one of the [`IMAGE_EXTENSIONS`].
///
/// # Examples
///
/// ```
/// use imgbed_core::is_image_name;
///
/// assert!(is_image_name("Holiday.JPG"));
/// assert!(!is_image_name("README.md"));
/// assert!(!is_image_name("png"));
/// ```
pub fn is_image_name(name: &str) -> bool {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => IMAGE_EXTENSIONS
            .iter()
            .any(|candidate| ext.eq_ignore_ascii_case(candidate)),
        _ => false,
    }
}

/// Checks a proposed object name before it is used as a rename target.
///
/// Names must be non-blank, at most [`MAX_NAME_LEN`] characters, and made of word
/// characters, `-` and `.` only. A name of nothing but dots is rejected.
///
/// # Errors
///
/// Returns `InvalidName` describing the violated rule.
pub fn validate_file_name(name: &str) -> StoreResult<()> {
    if name.trim().is_empty() {
        return Err(StoreError::new(StoreErrorKind::InvalidName(
            "file name must not be empty".to_string(),
        )));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(StoreError::new(StoreErrorKind::InvalidName(format!(
            "file name must not exceed {} characters",
            MAX_NAME_LEN
        ))));
    }
    let allowed = |c: char| c.is_alphanumeric() || c == '_' || c == '-' || c == '.';
    if !name.chars().all(allowed) {
        return Err(StoreError::new(StoreErrorKind::InvalidName(format!(
            "'{}' may only contain letters, digits, underscores, hyphens and dots",
            name
        ))));
    }
    if name.chars().all(|c| c == '.') {
        return Err(StoreError::new(StoreErrorKind::InvalidName(format!(
            "'{}' is not a file name",
            name
        ))));
    }
    Ok(())
}

/// Joins a directory prefix and a name with exactly one slash.
///
/// # Examples
///
/// ```
/// use imgbed_core::join_path;
///
/// assert_eq!(join_path("", "a.png"), "a.png");
/// assert_eq!(join_path("img/", "/a.png"), "img/a.png");
/// ```
pub fn join_path(dir: &str, name: &str) -> String {
    let dir = dir.trim_matches('/');
    let name = name.trim_start_matches('/');
    if dir.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", dir, name)
    }
}

/// Final segment of a repository path.
pub fn file_name(path: &str) -> &str {
    let path = path.trim_end_matches('/');
    path.rsplit_once('/').map_or(path, |(_, name)| name)
}

/// Directory part of a repository path, empty for top-level objects.
pub fn parent_dir(path: &str) -> &str {
    path.trim_end_matches('/')
        .rsplit_once('/')
        .map_or("", |(dir, _)| dir)
}
