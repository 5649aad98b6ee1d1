//! The favorites set: persisted, shared, observable.

mod set;
mod store;
mod subscription;
mod view;

pub use set::FavoritesSet;
pub use store::FavoritesStore;
pub use subscription::Subscription;
pub use view::{filter_by_query, resolve_favorites, FavoriteEntry};
