//! Catalog browsing core: paginated list loading with offline fallback and
//! a persisted, observable favorites set, backed by the PokéAPI.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod favorites;
pub mod filter;
pub mod loader;
pub mod logging;
