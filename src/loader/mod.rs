//! Incremental fetch-and-merge of list pages.
//!
//! One loader owns one accumulated list for one filter scope. Unfiltered
//! scopes page through the upstream list endpoint; filtered scopes fetch the
//! full type membership once and slice it locally, because the membership
//! endpoint is not paginated.
//!
//! # Concurrency
//!
//! The `loading` flag is the only guard: at most one fetch per loader is in
//! flight. Every fetch captures the scope generation when it starts; a scope
//! change bumps the generation, so a response that arrives afterwards is
//! discarded instead of overwriting the new scope.
//!
//! # Offline snapshot
//!
//! Only the unfiltered scope writes and reads the `LastList` cache entry.
//! A filtered list never replaces it, and a failed filtered fetch never
//! adopts it.

mod merge;
mod state;


use std::sync::Arc;

use parking_lot::Mutex;

use crate::cache::{CacheKey, LocalCache};
use crate::catalog::{
    CatalogError, CatalogItem, CatalogSource, ListPageRequest, TypeMembershipRequest,
};

pub use merge::{dedup_by_name, merge_by_name};
pub use state::{LoadFailure, LoadOutcome, LoaderPhase, LoaderSnapshot};

use state::LoaderState;

/// Items requested per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FetchMode {
    /// Next page, merged into the accumulated list.
    Append,
    /// First page, replacing the accumulated list.
    Replace,
}

/// What a fetch needs from state, captured under the lock.
struct FetchTicket {
    generation: u64,
    filter: Option<String>,
    offset: usize,
    membership: Option<Arc<Vec<CatalogItem>>>,
}

struct Batch {
    items: Vec<CatalogItem>,
    exhausted: bool,
    membership: Option<Arc<Vec<CatalogItem>>>,
}

pub struct PaginatedListLoader<S: ?Sized> {
    source: Arc<S>,
    cache: LocalCache,
    page_size: usize,
    state: Mutex<LoaderState>,
}

impl<S: CatalogSource + ?Sized> PaginatedListLoader<S> {
    pub fn new(source: Arc<S>, cache: LocalCache) -> Self {
        Self {
            source,
            cache,
            page_size: DEFAULT_PAGE_SIZE,
            state: Mutex::new(LoaderState::default()),
        }
    }

    /// Override the page size. Zero is treated as one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn snapshot(&self) -> LoaderSnapshot {
        self.state.lock().snapshot()
    }

    pub fn filter(&self) -> Option<String> {
        self.state.lock().filter.clone()
    }

    /// Fetch the next page for the current scope and merge it.
    ///
    /// No-op while another fetch is in flight or once the scope is exhausted.
    pub async fn load_more(&self) -> LoadOutcome {
        self.fetch(FetchMode::Append).await
    }

    /// Reload the first page of the current scope and replace the list.
    ///
    /// Only an in-flight fetch blocks a refresh; exhaustion is reset.
    pub async fn refresh(&self) -> LoadOutcome {
        self.fetch(FetchMode::Replace).await
    }

    /// Switch to a new filter scope, discarding accumulated items.
    ///
    /// Returns `false` when `filter` is already the active scope.
    pub fn reset_scope(&self, filter: Option<String>) -> bool {
        let mut state = self.state.lock();
        if state.filter == filter {
            return false;
        }

        let generation = state.generation + 1;
        tracing::info!(
            old_filter = ?state.filter,
            new_filter = ?filter,
            generation,
            "List scope changed"
        );
        *state = LoaderState {
            filter,
            generation,
            ..LoaderState::default()
        };
        true
    }

    async fn fetch(&self, mode: FetchMode) -> LoadOutcome {
        let ticket = {
            let mut state = self.state.lock();
            if state.loading || (mode == FetchMode::Append && state.exhausted) {
                tracing::debug!(
                    loading = state.loading,
                    exhausted = state.exhausted,
                    "Fetch skipped"
                );
                return LoadOutcome::Skipped;
            }

            if mode == FetchMode::Replace {
                state.cursor = 0;
                state.exhausted = false;
                state.membership = None;
            }
            state.loading = true;
            state.error = None;

            FetchTicket {
                generation: state.generation,
                filter: state.filter.clone(),
                offset: state.cursor,
                membership: state.membership.clone(),
            }
        };

        let generation = ticket.generation;
        let _loading = scopeguard::guard((), |_| {
            let mut state = self.state.lock();
            if state.generation == generation {
                state.loading = false;
            }
        });

        let result = match ticket.filter.as_deref() {
            None => self.fetch_page(ticket.offset).await,
            Some(type_name) => {
                self.fetch_type_window(type_name, ticket.offset, ticket.membership)
                    .await
            }
        };

        match result {
            Ok(batch) => self.apply_batch(generation, mode, batch).await,
            Err(err) => self.apply_failure(generation, &err).await,
        }
    }

    async fn fetch_page(&self, offset: usize) -> Result<Batch, CatalogError> {
        let page = self
            .source
            .list_page(ListPageRequest::new(self.page_size, offset))
            .await?;

        Ok(Batch {
            exhausted: page.exhausted,
            items: page.items,
            membership: None,
        })
    }

    async fn fetch_type_window(
        &self,
        type_name: &str,
        offset: usize,
        cached: Option<Arc<Vec<CatalogItem>>>,
    ) -> Result<Batch, CatalogError> {
        let membership = match cached {
            Some(membership) => membership,
            None => {
                let members = self
                    .source
                    .items_of_type(&TypeMembershipRequest::new(type_name))
                    .await?;
                tracing::debug!(type_name, count = members.len(), "Type membership fetched");
                Arc::new(members)
            }
        };

        let start = offset.min(membership.len());
        let end = (start + self.page_size).min(membership.len());

        Ok(Batch {
            items: membership[start..end].to_vec(),
            exhausted: end >= membership.len(),
            membership: Some(membership),
        })
    }

    async fn apply_batch(&self, generation: u64, mode: FetchMode, batch: Batch) -> LoadOutcome {
        let received = batch.items.len();
        let (persisted, exhausted) = {
            let mut state = self.state.lock();
            if state.generation != generation {
                tracing::info!(generation, "Discarding stale page");
                return LoadOutcome::Stale;
            }

            if let Some(membership) = batch.membership {
                state.membership = Some(membership);
            }
            match mode {
                FetchMode::Append => {
                    merge_by_name(&mut state.items, batch.items);
                }
                FetchMode::Replace => state.items = dedup_by_name(batch.items),
            }
            state.cursor += received;
            state.exhausted = batch.exhausted;

            tracing::info!(
                filter = ?state.filter,
                received,
                total = state.items.len(),
                cursor = state.cursor,
                exhausted = state.exhausted,
                "Page loaded"
            );
            let persisted = state.filter.is_none().then(|| state.items.clone());
            (persisted, state.exhausted)
        };

        if let Some(items) = persisted {
            self.cache.write(CacheKey::LastList, &items).await;
        }

        LoadOutcome::Loaded {
            received,
            exhausted,
        }
    }

    async fn apply_failure(&self, generation: u64, err: &CatalogError) -> LoadOutcome {
        let failure = LoadFailure::from(err);
        let kind = failure.kind;

        let can_recover = {
            let mut state = self.state.lock();
            if state.generation != generation {
                tracing::info!(generation, error = %err, "Discarding stale failure");
                return LoadOutcome::Stale;
            }
            tracing::warn!(
                filter = ?state.filter,
                cursor = state.cursor,
                error = %err,
                "Page fetch failed"
            );
            state.error = Some(failure);
            state.filter.is_none() && state.items.is_empty()
        };

        if !can_recover {
            return LoadOutcome::Failed {
                kind,
                recovered_from_cache: false,
            };
        }

        let recovered_from_cache = match self
            .cache
            .read_as::<Vec<CatalogItem>>(CacheKey::LastList)
            .await
        {
            Some(cached) if !cached.is_empty() => {
                let mut state = self.state.lock();
                if state.generation == generation && state.items.is_empty() {
                    state.items = dedup_by_name(cached);
                    tracing::info!(count = state.items.len(), "Recovered list from cache");
                    true
                } else {
                    false
                }
            }
            _ => false,
        };

        LoadOutcome::Failed {
            kind,
            recovered_from_cache,
        }
    }
}
