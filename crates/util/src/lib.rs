//! Utility helpers shared across apifetch crates.

pub mod async_runtime;
pub mod field_paths;
pub mod http;
pub mod path_processing;
pub mod text_processing;

pub use async_runtime::{RuntimeError, block_on_future};
pub use field_paths::*;
pub use path_processing::expand_tilde;
pub use text_processing::{format_currency, group_thousands};
