//! Mapping between canonical repository paths and user-facing URLs.
//!
//! Three URL shapes reach the resolver:
//!
//! - native download URLs, `https://raw.githubusercontent.com/<owner>/<repo>/<branch>/<path>`
//! - custom-domain URLs, `<domain>/<path>`, sometimes still carrying a `<branch>/` segment
//! - anything else with a path component, or a path already relative to the repository root
//!
//! Paths are percent-encoded segment by segment when they become URLs and decoded when
//! they are resolved, so `resolve_path(to_display_url(p, t), t) == p`.

use crate::RepositoryTarget;
use imgbed_error::{StoreError, StoreErrorKind, StoreResult};
use tracing::{debug, instrument};
use url::Url;

/// Host serving native download URLs.
pub const RAW_HOST: &str = "raw.githubusercontent.com";

/// Native download URL of a repository path.
///
/// # Examples
///
/// ```
/// use imgbed_core::{RepositoryTarget, raw_url};
///
/// let target = RepositoryTarget::builder().repo("octocat/images").build();
/// assert_eq!(
///     raw_url("blog/my cat.png", &target),
///     "https://raw.githubusercontent.com/octocat/images/main/blog/my%20cat.png"
/// );
/// ```
pub fn raw_url(path: &str, target: &RepositoryTarget) -> String {
    format!(
        "https://{}/{}/{}/{}",
        RAW_HOST,
        target.repo().trim_matches('/'),
        encode_path(target.branch()),
        encode_path(path)
    )
}

/// URL shown to users for a repository path.
///
/// Without a custom domain this is the [`raw_url`]. With one it is `<domain>/<path>`. A path
/// whose first segments spell the branch name keeps an explicit `<branch>/` segment so that
/// [`resolve_path`] strips exactly that one and recovers the path unchanged.
///
/// # Examples
///
/// ```
/// use imgbed_core::{RepositoryTarget, to_display_url};
///
/// let target = RepositoryTarget::builder()
///     .repo("octocat/images")
///     .custom_domain("https://img.example.com/")
///     .build();
/// assert_eq!(to_display_url("/blog/cat.png", &target), "https://img.example.com/blog/cat.png");
/// ```
pub fn to_display_url(path: &str, target: &RepositoryTarget) -> String {
    let path = path.trim_start_matches('/');
    match target.custom_domain() {
        None => raw_url(path, target),
        Some(domain) => {
            let domain = domain.trim_end_matches('/');
            if starts_with_branch(path, target.branch()) {
                format!(
                    "{}/{}/{}",
                    domain,
                    encode_path(target.branch()),
                    encode_path(path)
                )
            } else {
                format!("{}/{}", domain, encode_path(path))
            }
        }
    }
}

/// Canonical repository path behind a URL.
///
/// Tries, in order: the native download URL pattern, the configured custom domain, and
/// finally the URL's own path component (dropping everything up to the first branch
/// segment). Input without a scheme is taken as a path relative to the repository root.
///
/// # Errors
///
/// Returns `NotResolvable` if the input is empty, unparseable, or yields an empty path.
///
/// # Examples
///
/// ```
/// use imgbed_core::{RepositoryTarget, resolve_path};
///
/// let target = RepositoryTarget::builder()
///     .repo("octocat/images")
///     .branch("gh-pages")
///     .custom_domain("https://img.example.com")
///     .build();
///
/// let raw = "https://raw.githubusercontent.com/octocat/images/gh-pages/blog/cat.png";
/// assert_eq!(resolve_path(raw, &target).unwrap(), "blog/cat.png");
///
/// let custom = "https://img.example.com/gh-pages/blog/cat.png";
/// assert_eq!(resolve_path(custom, &target).unwrap(), "blog/cat.png");
/// ```
#[instrument(skip(target), fields(branch = %target.branch()))]
pub fn resolve_path(url: &str, target: &RepositoryTarget) -> StoreResult<String> {
    let input = url.trim();
    if input.is_empty() {
        return Err(not_resolvable(url));
    }

    if let Some(path) = native_path(input, target) {
        debug!("Resolved native download URL");
        return finish(&path, url);
    }

    if let Some(domain) = target.custom_domain() {
        let domain = domain.trim_end_matches('/');
        let rest = input
            .strip_prefix(domain)
            .filter(|rest| rest.is_empty() || rest.starts_with('/'));
        if let Some(rest) = rest {
            let decoded = decode(strip_query(rest.trim_start_matches('/')), url)?;
            let branch_prefix = format!("{}/", target.branch());
            let path = decoded
                .strip_prefix(&branch_prefix)
                .unwrap_or(decoded.as_str());
            debug!("Resolved custom-domain URL");
            return finish(path, url);
        }
    }

    match Url::parse(input) {
        Ok(parsed) => {
            if parsed.cannot_be_a_base() {
                return Err(not_resolvable(url));
            }
            let decoded = decode(parsed.path().trim_start_matches('/'), url)?;
            let path = after_branch_segment(&decoded, target.branch());
            debug!(host = ?parsed.host_str(), "Resolved URL path component");
            finish(path, url)
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            let decoded = decode(strip_query(input.trim_start_matches('/')), url)?;
            finish(&decoded, url)
        }
        Err(_) => Err(not_resolvable(url)),
    }
}

/// Path of a native download URL, with owner, repository and branch removed.
fn native_path(input: &str, target: &RepositoryTarget) -> Option<String> {
    let parsed = Url::parse(input).ok()?;
    if parsed.host_str()? != RAW_HOST {
        return None;
    }
    let segments: Vec<&str> = parsed.path_segments()?.collect();
    if segments.len() < 4 {
        return None;
    }

    // Branch names may themselves contain slashes; prefer the configured one when it matches.
    let after_repo = &segments[2..];
    let branch: Vec<&str> = target.branch().split('/').collect();
    let encoded_branch: Vec<String> = branch.iter().map(|s| encode_path(s)).collect();
    let skip = if after_repo.len() > branch.len()
        && after_repo
            .iter()
            .zip(encoded_branch.iter())
            .all(|(segment, expected)| segment == expected)
    {
        branch.len()
    } else {
        1
    };

    let rest = after_repo[skip..].join("/");
    urlencoding::decode(&rest).ok().map(|path| path.into_owned())
}

fn starts_with_branch(path: &str, branch: &str) -> bool {
    path.strip_prefix(branch)
        .is_some_and(|rest| rest.starts_with('/'))
}

fn after_branch_segment<'a>(path: &'a str, branch: &str) -> &'a str {
    if let Some(rest) = path.strip_prefix(branch).and_then(|r| r.strip_prefix('/')) {
        return rest;
    }
    let needle = format!("/{}/", branch);
    match path.find(&needle) {
        Some(idx) => &path[idx + needle.len()..],
        None => path,
    }
}

fn strip_query(value: &str) -> &str {
    value
        .split_once(['?', '#'])
        .map_or(value, |(before, _)| before)
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn decode(value: &str, original: &str) -> StoreResult<String> {
    urlencoding::decode(value)
        .map(|decoded| decoded.into_owned())
        .map_err(|_| not_resolvable(original))
}

fn finish(path: &str, original: &str) -> StoreResult<String> {
    let path = path.trim_matches('/');
    if path.is_empty() {
        return Err(not_resolvable(original));
    }
    Ok(path.to_string())
}

#[track_caller]
fn not_resolvable(url: &str) -> StoreError {
    StoreError::new(StoreErrorKind::NotResolvable(url.to_string()))
}
