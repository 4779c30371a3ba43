//! API profile definitions.
//!
//! A profile describes one external JSON API: where to send the GET request,
//! how to find the record array inside the response, and which record fields
//! to render for each entry.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Where the record array lives in a response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResponseEnvelope {
    /// The response root is the record array (`[{...}, {...}]`).
    RootArray,
    /// The record array sits under a dotted path inside an object (`{"results": [...]}`).
    Nested(String),
}

impl ResponseEnvelope {
    pub fn is_root_array(&self) -> bool {
        matches!(self, ResponseEnvelope::RootArray)
    }
}

/// How a field's raw JSON value is turned into display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FieldFormat {
    #[default]
    Text,
    Uppercase,
    /// Dollar amount with thousands separators, e.g. `$1,234.57`.
    Currency { decimals: u8 },
}

/// One or more record key paths that feed a single display field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldSource {
    /// A single dotted key path (`address.city`).
    Path(String),
    /// Several paths whose scalar values are joined with a space (`name.first name.last`).
    Join(Vec<String>),
}

impl FieldSource {
    /// Human-readable path description used in diagnostics.
    pub fn describe(&self) -> String {
        match self {
            FieldSource::Path(path) => path.clone(),
            FieldSource::Join(paths) => paths.join(" + "),
        }
    }
}

/// A display label bound to a record key path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub label: String,
    pub source: FieldSource,
    #[serde(default)]
    pub format: FieldFormat,
    /// Records missing a required field are skipped at display time;
    /// optional fields render as `N/A`.
    pub required: bool,
}

impl FieldSpec {
    pub fn required(label: &str, path: &str) -> Self {
        Self {
            label: label.to_string(),
            source: FieldSource::Path(path.to_string()),
            format: FieldFormat::Text,
            required: true,
        }
    }

    pub fn optional(label: &str, path: &str) -> Self {
        Self {
            required: false,
            ..Self::required(label, path)
        }
    }

    pub fn joined(label: &str, paths: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            source: FieldSource::Join(paths.iter().map(|path| path.to_string()).collect()),
            format: FieldFormat::Text,
            required: true,
        }
    }

    pub fn with_format(mut self, format: FieldFormat) -> Self {
        self.format = format;
        self
    }
}

/// Endpoint configuration for one named API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiProfile {
    /// Registry key, e.g. `jsonplaceholder`.
    pub name: String,
    /// Human-readable API name.
    pub title: String,
    pub base_url: String,
    /// Query parameters appended to every request, in declaration order.
    #[serde(default)]
    pub query: IndexMap<String, String>,
    pub envelope: ResponseEnvelope,
    /// Heading noun for rendered blocks ("User", "Crypto").
    pub record_label: String,
    /// Ordered field-extraction map.
    pub fields: Vec<FieldSpec>,
}

impl ApiProfile {
    /// Returns a copy of this profile that targets a different endpoint.
    ///
    /// Query parameters, envelope and field map are kept.
    pub fn with_base_url(&self, base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..self.clone()
        }
    }

    /// Query parameters as owned key/value pairs, ready for the request builder.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query.iter().map(|(key, value)| (key.clone(), value.clone())).collect()
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldSpec> {
        self.fields.iter().filter(|field| field.required)
    }
}
