//! Tests for create-before-delete rename.

mod test_utils;

use imgbed_core::{RepositoryTarget, StoredObject};
use imgbed_error::StoreErrorKind;
use imgbed_manager::{RenameCoordinator, RenameFailure, RenameOutcome, RenameStage};
use std::sync::Arc;
use test_utils::{MemoryStore, StoreOp};

fn target() -> RepositoryTarget {
    RepositoryTarget::builder()
        .repo("octocat/images")
        .root_path("blog")
        .token("ghp_secret")
        .build()
}

fn seeded() -> (MemoryStore, StoredObject) {
    let store = MemoryStore::new();
    let sha = store.seed("blog/cat.png", b"meow");
    let object = StoredObject::new("blog/cat.png", sha, &target());
    (store, object)
}

#[tokio::test]
async fn rename_moves_object_within_directory() {
    let (store, object) = seeded();
    let coordinator = RenameCoordinator::new(Arc::new(store.clone()));

    let outcome = coordinator.rename(&target(), &object, "kitten.png").await;

    let RenameOutcome::Done(renamed) = outcome else {
        panic!("expected Done, got {:?}", outcome);
    };
    assert_eq!(renamed.path(), "blog/kitten.png");
    assert_eq!(store.paths(), ["blog/kitten.png"]);
    assert_eq!(store.bytes("blog/kitten.png").unwrap(), b"meow");
}

#[tokio::test]
async fn failed_create_leaves_store_unchanged() {
    let (store, object) = seeded();
    store.fail(
        StoreOp::Put,
        "blog/kitten.png",
        StoreErrorKind::RemoteRejected {
            status: 422,
            message: "file too large".to_string(),
        },
    );
    let coordinator = RenameCoordinator::new(Arc::new(store.clone()));

    let outcome = coordinator.rename(&target(), &object, "kitten.png").await;

    match &outcome {
        RenameOutcome::Failed(failure @ RenameFailure::CreateFailed(e)) => {
            assert_eq!(failure.stage(), RenameStage::Creating);
            assert_eq!(e.kind().store_message(), Some("file too large"));
            assert_eq!(
                failure.to_string(),
                "create failed: Rejected by store (HTTP 422): file too large"
            );
        }
        other => panic!("expected CreateFailed, got {:?}", other),
    }
    assert_eq!(store.paths(), ["blog/cat.png"]);
    assert_eq!(store.calls(StoreOp::Delete), 0);
    assert!(outcome.object().is_none());
}

#[tokio::test]
async fn failed_delete_reports_exact_orphan() {
    let (store, object) = seeded();
    store.fail(
        StoreOp::Delete,
        "blog/cat.png",
        StoreErrorKind::RemoteUnavailable {
            status: Some(503),
            message: "try later".to_string(),
        },
    );
    let coordinator = RenameCoordinator::new(Arc::new(store.clone()));

    let outcome = coordinator.rename(&target(), &object, "kitten.png").await;

    match outcome {
        RenameOutcome::OrphanWarning {
            object: created,
            orphan_path,
            ..
        } => {
            assert_eq!(orphan_path, "blog/cat.png");
            assert_eq!(created.path(), "blog/kitten.png");
        }
        other => panic!("expected OrphanWarning, got {:?}", other),
    }
    assert_eq!(store.paths(), ["blog/cat.png", "blog/kitten.png"]);
}

#[tokio::test]
async fn vanished_source_is_source_gone() {
    let store = MemoryStore::new();
    let object = StoredObject::new("blog/ghost.png", "sha-x", &target());
    let coordinator = RenameCoordinator::new(Arc::new(store.clone()));

    let outcome = coordinator.rename(&target(), &object, "kitten.png").await;

    assert!(matches!(
        outcome,
        RenameOutcome::Failed(RenameFailure::SourceGone(_))
    ));
    assert_eq!(store.calls(StoreOp::Put), 0);
    assert!(store.paths().is_empty());
}

#[tokio::test]
async fn other_fetch_errors_are_fetch_failed() {
    let (store, object) = seeded();
    store.fail(
        StoreOp::Fetch,
        "blog/cat.png",
        StoreErrorKind::RemoteRejected {
            status: 401,
            message: "Bad credentials".to_string(),
        },
    );
    let coordinator = RenameCoordinator::new(Arc::new(store.clone()));

    let outcome = coordinator.rename(&target(), &object, "kitten.png").await;

    let RenameOutcome::Failed(failure) = outcome else {
        panic!("expected failure");
    };
    assert!(matches!(failure, RenameFailure::FetchFailed(_)));
    assert_eq!(
        failure.to_string(),
        "fetch failed: Rejected by store (HTTP 401): Bad credentials"
    );
}

#[tokio::test]
async fn invalid_names_never_reach_the_store() {
    let (store, object) = seeded();
    let coordinator = RenameCoordinator::new(Arc::new(store.clone()));

    let too_long = format!("{}.png", "a".repeat(252));
    for name in ["", "   ", "cat one.png", "../cat.png", "cat?.png", too_long.as_str()] {
        let outcome = coordinator.rename(&target(), &object, name).await;
        match outcome {
            RenameOutcome::Failed(RenameFailure::InvalidName(e)) => {
                assert!(matches!(e.kind(), StoreErrorKind::InvalidName(_)), "{:?}", name);
            }
            other => panic!("{:?} should be rejected, got {:?}", name, other),
        }
    }
    assert_eq!(store.total_calls(), 0);
}

#[tokio::test]
async fn same_name_is_a_no_op() {
    let (store, object) = seeded();
    let coordinator = RenameCoordinator::new(Arc::new(store.clone()));

    let outcome = coordinator.rename(&target(), &object, "cat.png").await;

    assert!(outcome.is_done());
    assert_eq!(outcome.object(), Some(&object));
    assert_eq!(store.total_calls(), 0);
}
