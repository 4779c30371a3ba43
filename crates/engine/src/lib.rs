//! # apifetch engine
//!
//! The fetch → normalize → filter → present pipeline.
//!
//! ## Usage
//!
//! ```rust no_run
//! use apifetch_engine::{DisplayOptions, FieldFilter, Fetcher};
//! use apifetch_registry::FetchConfig;
//!
//! let mut fetcher = Fetcher::for_profile("jsonplaceholder", FetchConfig::default())?;
//! if fetcher.fetch().is_ok() {
//!     let city_filter: FieldFilter = "address.city^=S".parse()?;
//!     let outcome = fetcher.display(&DisplayOptions::default().with_filter(city_filter).with_limit(5));
//!     for block in outcome.blocks() {
//!         println!("{block}");
//!     }
//!     println!("Total records processed: {}", fetcher.count());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - **`fetch`**: one async GET with failure classification
//! - **`normalize`**: unwraps the response envelope into records
//! - **`filter`**: record predicates
//! - **`presenter`**: filter, limit and render records
//! - **`fetcher`**: blocking state machine that retains the last outcome

pub mod fetch;
pub mod fetcher;
pub mod filter;
pub mod normalize;
pub mod presenter;

pub use fetch::fetch_profile;
pub use fetcher::{FetchState, Fetcher};
pub use filter::{FieldFilter, FilterOp, FilterParseError, RecordFilter};
pub use normalize::normalize;
pub use presenter::{
    DisplayOptions, DisplayOutcome, MISSING_VALUE, Presenter, RenderedListing, RenderedRecord, SkippedRecord, select,
};
