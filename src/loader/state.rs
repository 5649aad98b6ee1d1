use std::sync::Arc;

use crate::catalog::{CatalogError, CatalogItem, ErrorKind};

/// Observable phase of a loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoaderPhase {
    Idle,
    Loading,
    Exhausted,
    Failed,
}

/// Renderable record of the last failed fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&CatalogError> for LoadFailure {
    fn from(err: &CatalogError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Result of a single fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// A fetch was already in flight, or the scope is exhausted.
    Skipped,
    /// A batch was applied.
    Loaded { received: usize, exhausted: bool },
    /// The fetch failed; `recovered_from_cache` is set when an empty list
    /// was replaced with the cached snapshot.
    Failed {
        kind: ErrorKind,
        recovered_from_cache: bool,
    },
    /// The filter changed while this fetch was in flight; its result was
    /// discarded.
    Stale,
}

/// Point-in-time copy of loader state for rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderSnapshot {
    pub items: Vec<CatalogItem>,
    pub cursor: usize,
    pub loading: bool,
    pub exhausted: bool,
    pub error: Option<LoadFailure>,
    pub filter: Option<String>,
}

impl LoaderSnapshot {
    pub fn phase(&self) -> LoaderPhase {
        if self.loading {
            LoaderPhase::Loading
        } else if self.error.is_some() {
            LoaderPhase::Failed
        } else if self.exhausted {
            LoaderPhase::Exhausted
        } else {
            LoaderPhase::Idle
        }
    }

    pub fn has_more(&self) -> bool {
        !self.exhausted
    }
}

#[derive(Debug, Default)]
pub(crate) struct LoaderState {
    pub items: Vec<CatalogItem>,
    pub cursor: usize,
    pub loading: bool,
    pub exhausted: bool,
    pub error: Option<LoadFailure>,
    pub filter: Option<String>,
    /// Bumped on every scope change; fetches from older generations are void.
    pub generation: u64,
    /// Full type membership, fetched once per filter session.
    pub membership: Option<Arc<Vec<CatalogItem>>>,
}

impl LoaderState {
    pub fn snapshot(&self) -> LoaderSnapshot {
        LoaderSnapshot {
            items: self.items.clone(),
            cursor: self.cursor,
            loading: self.loading,
            exhausted: self.exhausted,
            error: self.error.clone(),
            filter: self.filter.clone(),
        }
    }
}
