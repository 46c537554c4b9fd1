//! Tests for incremental listing reveal.

use imgbed_core::{RepositoryTarget, StoredObject};
use imgbed_manager::ListingCursor;

fn objects(count: usize) -> Vec<StoredObject> {
    let target = RepositoryTarget::builder().repo("octocat/images").build();
    (0..count)
        .map(|i| StoredObject::new(format!("img{}.png", i), format!("sha{}", i), &target))
        .collect()
}

fn names(slice: &[StoredObject]) -> Vec<String> {
    slice.iter().map(|o| o.name().clone()).collect()
}

#[test]
fn reveals_seven_in_batches_of_three() {
    let mut cursor = ListingCursor::new(objects(7), 3);
    assert_eq!(cursor.revealed_count(), 0);
    assert!(!cursor.is_exhausted());

    let (batch, exhausted) = cursor.reveal_next();
    assert_eq!(names(batch), ["img0.png", "img1.png", "img2.png"]);
    assert!(!exhausted);

    let (batch, exhausted) = cursor.reveal_next();
    assert_eq!(names(batch), ["img3.png", "img4.png", "img5.png"]);
    assert!(!exhausted);

    let (batch, exhausted) = cursor.reveal_next();
    assert_eq!(names(batch), ["img6.png"]);
    assert!(exhausted);

    for _ in 0..3 {
        let (batch, exhausted) = cursor.reveal_next();
        assert!(batch.is_empty());
        assert!(exhausted);
    }
    assert_eq!(cursor.revealed_count(), 7);
    assert_eq!(cursor.revealed().len(), cursor.total());
}

#[test]
fn eager_cursor_starts_with_first_batch() {
    let cursor = ListingCursor::eager(objects(7), 3);
    assert_eq!(cursor.revealed_count(), 3);

    let cursor = ListingCursor::eager(objects(2), 3);
    assert_eq!(cursor.revealed_count(), 2);
    assert!(cursor.is_exhausted());
}

#[test]
fn empty_listing_is_exhausted_immediately() {
    let mut cursor = ListingCursor::new(Vec::new(), 30);
    assert!(cursor.is_exhausted());
    let (batch, exhausted) = cursor.reveal_next();
    assert!(batch.is_empty());
    assert!(exhausted);
}

#[test]
fn zero_batch_size_is_treated_as_one() {
    let mut cursor = ListingCursor::new(objects(2), 0);
    assert_eq!(cursor.batch_size(), 1);
    assert_eq!(cursor.reveal_next().0.len(), 1);
}

#[test]
fn only_the_last_revealed_entry_triggers_a_reveal() {
    let mut cursor = ListingCursor::new(objects(7), 3);

    // Nothing revealed yet, so nothing can be observed.
    assert!(cursor.observe(0).0.is_empty());

    cursor.reveal_next();
    assert!(cursor.observe(0).0.is_empty());
    assert!(cursor.observe(1).0.is_empty());
    assert!(cursor.observe(5).0.is_empty());
    assert_eq!(cursor.revealed_count(), 3);

    let (batch, _) = cursor.observe(2);
    assert_eq!(names(batch), ["img3.png", "img4.png", "img5.png"]);

    let (batch, exhausted) = cursor.observe(5);
    assert_eq!(names(batch), ["img6.png"]);
    assert!(exhausted);

    let (batch, exhausted) = cursor.observe(6);
    assert!(batch.is_empty());
    assert!(exhausted);
}

#[test]
fn observing_out_of_range_indices_reveals_nothing() {
    let mut cursor = ListingCursor::new(objects(4), 2);
    assert!(cursor.observe(usize::MAX).0.is_empty());

    cursor.reveal_next();
    let (batch, exhausted) = cursor.observe(usize::MAX);
    assert!(batch.is_empty());
    assert!(!exhausted);
    assert_eq!(cursor.revealed_count(), 2);
}
