//! Registry crate for apifetch API profiles.
//!
//! Holds the fixed table of built-in profiles and the fetch configuration
//! loaded once at startup.

pub mod builtin;
pub mod config;
pub mod models;

pub use apifetch_types::{ApiProfile, RegistryError};
pub use builtin::{COINGECKO, JSONPLACEHOLDER, RANDOMUSER, builtin_profiles};
pub use config::{FetchConfig, default_config_path};
pub use models::ApiRegistry;
