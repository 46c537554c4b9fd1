//! Tests for URL ↔ repository path resolution.

use imgbed_core::{RepositoryTarget, raw_url, resolve_path, to_display_url};
use imgbed_error::StoreErrorKind;

fn plain_target() -> RepositoryTarget {
    RepositoryTarget::builder()
        .repo("octocat/images")
        .token("t")
        .build()
}

fn domain_target(domain: &str) -> RepositoryTarget {
    RepositoryTarget::builder()
        .repo("octocat/images")
        .branch("main")
        .token("t")
        .custom_domain(domain)
        .build()
}

const PATHS: &[&str] = &[
    "cat.png",
    "blog/2024/cat.png",
    "blog/my cat (1).png",
    "截图/猫.jpg",
    "weird/100%real#tag?.gif",
    "main/cat.png",
    "main",
    "nested/main/cat.png",
];

#[test]
fn round_trips_without_custom_domain() {
    let target = plain_target();
    for path in PATHS {
        let url = to_display_url(path, &target);
        assert_eq!(resolve_path(&url, &target).unwrap(), *path, "url: {}", url);
    }
}

#[test]
fn round_trips_with_custom_domain() {
    for domain in ["https://img.example.com", "https://img.example.com/", "https://cdn.example.com/pics"] {
        let target = domain_target(domain);
        for path in PATHS {
            let url = to_display_url(path, &target);
            assert!(!url["https://".len()..].contains("//"), "url: {}", url);
            assert_eq!(resolve_path(&url, &target).unwrap(), *path, "url: {}", url);
        }
    }
}

#[test]
fn round_trips_on_branch_with_slash() {
    let target = RepositoryTarget::builder()
        .repo("octocat/images")
        .branch("release/v2")
        .token("t")
        .build();
    for path in PATHS {
        let url = to_display_url(path, &target);
        assert_eq!(resolve_path(&url, &target).unwrap(), *path, "url: {}", url);
    }
}

#[test]
fn display_url_normalizes_slashes_once() {
    let target = domain_target("https://img.example.com/");
    assert_eq!(
        to_display_url("/blog/cat.png", &target),
        "https://img.example.com/blog/cat.png"
    );
}

#[test]
fn raw_url_uses_configured_branch() {
    let target = RepositoryTarget::builder()
        .repo("octocat/images")
        .branch("gh-pages")
        .build();
    assert_eq!(
        raw_url("cat.png", &target),
        "https://raw.githubusercontent.com/octocat/images/gh-pages/cat.png"
    );
}

#[test]
fn resolves_api_download_url() {
    let target = plain_target();
    let url = "https://raw.githubusercontent.com/octocat/images/main/blog/my%20cat.png";
    assert_eq!(resolve_path(url, &target).unwrap(), "blog/my cat.png");
}

#[test]
fn custom_domain_strips_configured_branch_not_main() {
    let target = RepositoryTarget::builder()
        .repo("octocat/images")
        .branch("gh-pages")
        .custom_domain("https://img.example.com")
        .build();

    assert_eq!(
        resolve_path("https://img.example.com/gh-pages/blog/cat.png", &target).unwrap(),
        "blog/cat.png"
    );
    // A literal main segment is an ordinary directory on this branch.
    assert_eq!(
        resolve_path("https://img.example.com/main/cat.png", &target).unwrap(),
        "main/cat.png"
    );
}

#[test]
fn falls_back_to_url_path_component() {
    let target = plain_target();
    assert_eq!(
        resolve_path("https://github.com/octocat/images/raw/main/blog/cat.png", &target).unwrap(),
        "blog/cat.png"
    );
    assert_eq!(
        resolve_path("https://mirror.example.org/cat.png?x=1", &target).unwrap(),
        "cat.png"
    );
}

#[test]
fn accepts_repository_relative_paths() {
    let target = plain_target();
    assert_eq!(resolve_path("blog/cat.png", &target).unwrap(), "blog/cat.png");
    assert_eq!(resolve_path("/blog/cat.png", &target).unwrap(), "blog/cat.png");
}

#[test]
fn rejects_unresolvable_input() {
    let target = plain_target();
    for input in ["", "   ", "https://img.example.com/", "mailto:someone@example.com"] {
        let err = resolve_path(input, &target).unwrap_err();
        assert!(
            matches!(err.kind(), StoreErrorKind::NotResolvable(_)),
            "input {:?} gave {:?}",
            input,
            err
        );
    }
}
