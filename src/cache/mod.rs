//! Durable last-known-good storage for list snapshots and favorites.

mod key;
mod store;

pub use key::CacheKey;
pub use store::{CacheError, LocalCache};
