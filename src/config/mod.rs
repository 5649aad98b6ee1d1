//! TOML configuration for the API endpoint, cache location and paging.

mod loader;
mod types;

pub use loader::ConfigError;
pub use types::{ApiConfig, CacheConfig, Config, ListConfig};
