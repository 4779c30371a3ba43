//! Shared type definitions for apifetch: API profiles, records and the error taxonomy.

pub mod error;
pub mod profile;
pub mod record;

pub use error::{FetchError, FetchErrorKind, FetchResult, FieldError, RegistryError};
pub use profile::{ApiProfile, FieldFormat, FieldSource, FieldSpec, ResponseEnvelope};
pub use record::{PathLookup, Record, lookup_path, value_at_path};
