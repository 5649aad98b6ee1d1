//! Type filter selection.
//!
//! The coordinator holds no state of its own; the active filter lives in the
//! loader's scope.

use std::fmt;
use std::sync::Arc;

use crate::catalog::CatalogSource;
use crate::loader::{LoadOutcome, PaginatedListLoader};

/// Which slice of the catalog the list shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TypeFilter {
    #[default]
    All,
    Type(String),
}

impl TypeFilter {
    pub fn type_name(&self) -> Option<&str> {
        match self {
            TypeFilter::All => None,
            TypeFilter::Type(name) => Some(name),
        }
    }

    pub fn into_scope(self) -> Option<String> {
        match self {
            TypeFilter::All => None,
            TypeFilter::Type(name) => Some(name),
        }
    }
}

impl From<Option<String>> for TypeFilter {
    fn from(scope: Option<String>) -> Self {
        match scope {
            Some(name) => TypeFilter::Type(name),
            None => TypeFilter::All,
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeFilter::All => f.write_str("all"),
            TypeFilter::Type(name) => f.write_str(name),
        }
    }
}

pub struct TypeFilterCoordinator<S: ?Sized> {
    loader: Arc<PaginatedListLoader<S>>,
}

impl<S: CatalogSource + ?Sized> TypeFilterCoordinator<S> {
    pub fn new(loader: Arc<PaginatedListLoader<S>>) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &Arc<PaginatedListLoader<S>> {
        &self.loader
    }

    pub fn active(&self) -> TypeFilter {
        self.loader.filter().into()
    }

    /// Apply `filter`: clear the list and load its first page.
    ///
    /// Returns `None` when `filter` is already active.
    pub async fn select(&self, filter: TypeFilter) -> Option<LoadOutcome> {
        if !self.loader.reset_scope(filter.into_scope()) {
            return None;
        }
        Some(self.loader.load_more().await)
    }
}
