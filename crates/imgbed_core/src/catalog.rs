//! Ordering and filtering of listed objects.

use crate::StoredObject;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// How a listing is ordered for display.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Name, A to Z (case-insensitive)
    #[display("name-asc")]
    NameAsc,
    /// Name, Z to A (case-insensitive)
    #[display("name-desc")]
    NameDesc,
    /// Oldest observation first
    #[display("date-asc")]
    DateAsc,
    /// Newest observation first
    #[default]
    #[display("date-desc")]
    DateDesc,
}

impl SortMode {
    /// Convert to its configuration string.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortMode::NameAsc => "name-asc",
            SortMode::NameDesc => "name-desc",
            SortMode::DateAsc => "date-asc",
            SortMode::DateDesc => "date-desc",
        }
    }
}

impl std::str::FromStr for SortMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name-asc" => Ok(SortMode::NameAsc),
            "name-desc" => Ok(SortMode::NameDesc),
            "date-asc" => Ok(SortMode::DateAsc),
            "date-desc" => Ok(SortMode::DateDesc),
            _ => Err(format!("Unknown sort mode: {}", s)),
        }
    }
}

/// Sorts objects in place. The sort is stable, so ties keep listing order.
pub fn sort_objects(objects: &mut [StoredObject], mode: SortMode) {
    match mode {
        SortMode::NameAsc => objects.sort_by_key(|o| o.name().to_lowercase()),
        SortMode::NameDesc => {
            objects.sort_by_key(|o| std::cmp::Reverse(o.name().to_lowercase()))
        }
        SortMode::DateAsc => objects.sort_by_key(|o| *o.observed_at()),
        SortMode::DateDesc => objects.sort_by_key(|o| std::cmp::Reverse(*o.observed_at())),
    }
}

/// Objects whose name contains `term`, ignoring case. A blank term matches everything.
pub fn search_objects<'a>(objects: &'a [StoredObject], term: &str) -> Vec<&'a StoredObject> {
    let term = term.trim().to_lowercase();
    objects
        .iter()
        .filter(|o| term.is_empty() || o.name().to_lowercase().contains(&term))
        .collect()
}

/// Count and most recent observation time of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, derive_getters::Getters)]
pub struct CatalogStats {
    /// Number of objects
    count: usize,
    /// Newest `observed_at`, absent for an empty listing
    latest: Option<DateTime<Utc>>,
}

impl CatalogStats {
    /// Summarizes `objects`.
    pub fn of(objects: &[StoredObject]) -> Self {
        Self {
            count: objects.len(),
            latest: objects.iter().map(|o| *o.observed_at()).max(),
        }
    }
}
