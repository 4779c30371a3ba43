//! Filtering, limiting and rendering of fetched records.

use std::fmt;

use apifetch_types::{ApiProfile, FieldError, FieldFormat, FieldSource, FieldSpec, PathLookup, Record};
use apifetch_util::{format_currency, is_scalar_json_value, json_type_name, scalar_text};
use serde_json::Value;
use tracing::{debug, warn};

use crate::filter::RecordFilter;

/// Placeholder for optional fields a record does not carry.
pub const MISSING_VALUE: &str = "N/A";

/// Options for one display call.
#[derive(Default)]
pub struct DisplayOptions {
    /// Maximum number of records to render, applied after the filter.
    pub limit: Option<usize>,
    pub filter: Option<Box<dyn RecordFilter>>,
}

impl DisplayOptions {
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_filter(mut self, filter: impl RecordFilter + 'static) -> Self {
        self.filter = Some(Box::new(filter));
        self
    }
}

impl fmt::Debug for DisplayOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayOptions")
            .field("limit", &self.limit)
            .field("filter", &self.filter.as_ref().map(|_| "<predicate>"))
            .finish()
    }
}

/// One rendered record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedRecord {
    /// 1-based position of the record in the source response.
    pub position: usize,
    pub heading: String,
    /// `(label, value)` pairs in field-map order.
    pub fields: Vec<(String, String)>,
}

impl RenderedRecord {
    pub fn value(&self, label: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field_label, _)| field_label == label)
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Display for RenderedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.heading)?;
        for (label, value) in &self.fields {
            write!(f, "\n{label}: {value}")?;
        }
        Ok(())
    }
}

/// A record left out of a listing and the reason why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub position: usize,
    pub error: FieldError,
}

impl fmt::Display for SkippedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error processing record {}: {}", self.position, self.error)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedListing {
    pub blocks: Vec<RenderedRecord>,
    pub skipped: Vec<SkippedRecord>,
    /// Records that passed the filter, before the limit was applied.
    pub matched: usize,
}

impl RenderedListing {
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Result of asking a fetcher to display its records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayOutcome {
    /// Nothing was fetched successfully; there is nothing to show.
    NoData,
    Listing(RenderedListing),
}

impl DisplayOutcome {
    pub fn listing(&self) -> Option<&RenderedListing> {
        match self {
            DisplayOutcome::NoData => None,
            DisplayOutcome::Listing(listing) => Some(listing),
        }
    }

    /// Rendered blocks, empty for [`DisplayOutcome::NoData`].
    pub fn blocks(&self) -> &[RenderedRecord] {
        self.listing().map(|listing| listing.blocks.as_slice()).unwrap_or_default()
    }
}

/// Apply the filter then the limit, keeping source order.
///
/// Returns the surviving records with their 1-based source positions and the
/// number of records that matched the filter before limiting.
pub fn select<'r>(records: &'r [Record], options: &DisplayOptions) -> (Vec<(usize, &'r Record)>, usize) {
    let mut selected: Vec<(usize, &Record)> = records
        .iter()
        .enumerate()
        .filter(|(_, record)| options.filter.as_ref().is_none_or(|filter| filter.matches(record)))
        .map(|(index, record)| (index + 1, record))
        .collect();
    let matched = selected.len();
    if let Some(limit) = options.limit {
        selected.truncate(limit);
    }
    (selected, matched)
}

/// Renders records using a profile's field-extraction map.
#[derive(Debug, Clone, Copy)]
pub struct Presenter<'p> {
    profile: &'p ApiProfile,
}

impl<'p> Presenter<'p> {
    pub fn new(profile: &'p ApiProfile) -> Self {
        Self { profile }
    }

    /// Filter, limit and render `records`.
    ///
    /// A record whose required field is missing or malformed, or whose shape
    /// breaks any field path, is reported in [`RenderedListing::skipped`] and
    /// the remaining records are still rendered.
    pub fn render(&self, records: &[Record], options: &DisplayOptions) -> RenderedListing {
        let (selected, matched) = select(records, options);
        let mut listing = RenderedListing {
            matched,
            ..RenderedListing::default()
        };

        for (position, record) in selected {
            match self.render_record(position, record) {
                Ok(block) => listing.blocks.push(block),
                Err(error) => {
                    warn!(profile = %self.profile.name, position, %error, "skipping record");
                    listing.skipped.push(SkippedRecord { position, error });
                }
            }
        }
        listing
    }

    /// Render one record, or explain why it cannot be rendered.
    pub fn render_record(&self, position: usize, record: &Record) -> Result<RenderedRecord, FieldError> {
        let mut fields = Vec::with_capacity(self.profile.fields.len());
        for field in &self.profile.fields {
            let value = match resolve_field(field, record) {
                Ok(Some(text)) => text,
                Ok(None) if field.required => {
                    return Err(FieldError::Missing {
                        label: field.label.clone(),
                        path: field.source.describe(),
                    });
                }
                Ok(None) => MISSING_VALUE.to_string(),
                Err(FieldFault::Shape(error)) => return Err(error),
                Err(FieldFault::Leaf(error)) if field.required => return Err(error),
                Err(FieldFault::Leaf(error)) => {
                    debug!(profile = %self.profile.name, position, %error, "optional field unreadable");
                    MISSING_VALUE.to_string()
                }
            };
            fields.push((field.label.clone(), value));
        }

        Ok(RenderedRecord {
            position,
            heading: format!("{} {}:", self.profile.record_label, position),
            fields,
        })
    }
}

enum FieldFault {
    /// The path steps through a value that has no fields. The record does not
    /// have the profile's shape, so it is skipped even for optional fields.
    Shape(FieldError),
    /// The value is present but not a scalar.
    Leaf(FieldError),
}

/// Resolve one field against a record.
///
/// `Ok(None)` means absent (missing key or `null`). Joined sources skip absent
/// parts and are absent only when every part is.
fn resolve_field(field: &FieldSpec, record: &Record) -> Result<Option<String>, FieldFault> {
    match &field.source {
        FieldSource::Path(path) => {
            let Some(value) = leaf(field, path, record)? else {
                return Ok(None);
            };
            Ok(Some(format_value(value, field.format)))
        }
        FieldSource::Join(paths) => {
            let mut parts = Vec::with_capacity(paths.len());
            for path in paths {
                if let Some(value) = leaf(field, path, record)?
                    && let Some(text) = scalar_text(value)
                    && !text.trim().is_empty()
                {
                    parts.push(text);
                }
            }
            if parts.is_empty() {
                return Ok(None);
            }
            Ok(Some(apply_text_format(parts.join(" "), field.format)))
        }
    }
}

fn leaf<'r>(field: &FieldSpec, path: &str, record: &'r Record) -> Result<Option<&'r Value>, FieldFault> {
    let malformed = |expected: &'static str, found: &Value| FieldError::Malformed {
        label: field.label.clone(),
        path: path.to_string(),
        expected,
        found: json_type_name(found),
    };
    match record.lookup(path) {
        PathLookup::Absent | PathLookup::Found(Value::Null) => Ok(None),
        PathLookup::Found(value) if is_scalar_json_value(value) => Ok(Some(value)),
        PathLookup::Found(value) => Err(FieldFault::Leaf(malformed("a scalar", value))),
        PathLookup::Blocked(value) => Err(FieldFault::Shape(malformed("an object", value))),
    }
}

fn format_value(value: &Value, format: FieldFormat) -> String {
    if let FieldFormat::Currency { decimals } = format
        && let Some(amount) = value.as_f64()
    {
        return format_currency(amount, decimals);
    }
    apply_text_format(scalar_text(value).unwrap_or_default(), format)
}

fn apply_text_format(text: String, format: FieldFormat) -> String {
    match format {
        FieldFormat::Uppercase => text.to_uppercase(),
        FieldFormat::Text | FieldFormat::Currency { .. } => text,
    }
}
