//! Pull-based incremental reveal of a fetched listing.

use imgbed_core::StoredObject;

/// Reveals an already-fetched listing in fixed-size batches.
///
/// The cursor never touches the network; it only releases more of the entries it was
/// built with. The revealed count only grows and never exceeds the number of entries.
///
/// # Examples
///
/// ```
/// use imgbed_core::{RepositoryTarget, StoredObject};
/// use imgbed_manager::ListingCursor;
///
/// let target = RepositoryTarget::default();
/// let objects = (0..7)
///     .map(|i| StoredObject::new(format!("{}.png", i), "sha", &target))
///     .collect();
///
/// let mut cursor = ListingCursor::new(objects, 3);
/// assert_eq!(cursor.reveal_next().0.len(), 3);
/// assert_eq!(cursor.reveal_next().0.len(), 3);
/// let (last, exhausted) = cursor.reveal_next();
/// assert_eq!(last.len(), 1);
/// assert!(exhausted);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingCursor {
    entries: Vec<StoredObject>,
    revealed: usize,
    batch_size: usize,
}

impl ListingCursor {
    /// Creates a cursor with nothing revealed. A batch size of zero is treated as one.
    pub fn new(entries: Vec<StoredObject>, batch_size: usize) -> Self {
        Self {
            entries,
            revealed: 0,
            batch_size: batch_size.max(1),
        }
    }

    /// Creates a cursor with the first batch already revealed.
    pub fn eager(entries: Vec<StoredObject>, batch_size: usize) -> Self {
        let mut cursor = Self::new(entries, batch_size);
        cursor.revealed = cursor.batch_size.min(cursor.entries.len());
        cursor
    }

    /// Releases the next batch.
    ///
    /// Returns the newly revealed entries and whether everything is now revealed. Once
    /// exhausted, every call returns an empty slice and `true`.
    pub fn reveal_next(&mut self) -> (&[StoredObject], bool) {
        let start = self.revealed;
        let end = (start + self.batch_size).min(self.entries.len());
        self.revealed = end;
        (&self.entries[start..end], self.is_exhausted())
    }

    /// Visibility signal: the entry at `index` came into view.
    ///
    /// Only the last revealed entry triggers the next batch; any other index reveals
    /// nothing.
    pub fn observe(&mut self, index: usize) -> (&[StoredObject], bool) {
        if self.revealed.checked_sub(1) == Some(index) {
            self.reveal_next()
        } else {
            (&[], self.is_exhausted())
        }
    }

    /// Entries revealed so far.
    pub fn revealed(&self) -> &[StoredObject] {
        &self.entries[..self.revealed]
    }

    /// Number of entries revealed so far.
    pub fn revealed_count(&self) -> usize {
        self.revealed
    }

    /// Number of entries known to the cursor.
    pub fn total(&self) -> usize {
        self.entries.len()
    }

    /// Entries released per reveal.
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Whether every entry has been revealed.
    pub fn is_exhausted(&self) -> bool {
        self.revealed == self.entries.len()
    }
}
