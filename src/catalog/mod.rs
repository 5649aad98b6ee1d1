//! Read-only access to the remote catalog.
//!
//! [`RemoteCatalogClient`] talks HTTP; [`CatalogSource`] is the seam the
//! loader and the favorites view depend on, so they can run against any
//! source that answers the same four questions.

mod client;
mod error;
mod request;
mod types;

use async_trait::async_trait;

pub use client::{RemoteCatalogClient, SENTINEL_TYPES};
pub use error::{CatalogError, ErrorKind};
pub use request::{normalize_name, ItemRef, ListPageRequest, TypeMembershipRequest};
pub use types::{id_from_url, CatalogDetail, CatalogItem, ListPage, PageCursor, Stat};

/// Anything that can answer catalog queries.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// One unfiltered page.
    async fn list_page(&self, request: ListPageRequest) -> Result<ListPage, CatalogError>;

    /// Single-item detail lookup.
    async fn detail(&self, item: &ItemRef) -> Result<CatalogDetail, CatalogError>;

    /// Browsable type names, sentinel types excluded.
    async fn type_names(&self) -> Result<Vec<String>, CatalogError>;

    /// Full membership of a type. Not paginated upstream.
    async fn items_of_type(
        &self,
        request: &TypeMembershipRequest,
    ) -> Result<Vec<CatalogItem>, CatalogError>;
}
