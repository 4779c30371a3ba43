//! Response envelope normalization.
//!
//! Turns a parsed response body into the ordered record sequence described by
//! the profile's [`ResponseEnvelope`].

use apifetch_types::{ApiProfile, FetchError, Record, ResponseEnvelope};
use apifetch_util::{array_at_path, json_type_name};
use serde_json::Value;

/// Extract the record sequence from `payload`.
///
/// Source order is preserved. The payload is not modified, so calling this
/// twice on the same value yields the same records.
///
/// # Errors
/// [`FetchError::MalformedResponse`] when the root is not an array for a
/// root-array profile, or the nested field is missing or not an array.
pub fn normalize(profile: &ApiProfile, payload: &Value) -> Result<Vec<Record>, FetchError> {
    let items = match &profile.envelope {
        ResponseEnvelope::RootArray => payload.as_array().ok_or_else(|| {
            FetchError::malformed_response(format!(
                "{} expected a JSON array at the response root, found {}",
                profile.name,
                json_type_name(payload)
            ))
        })?,
        ResponseEnvelope::Nested(path) => array_at_path(payload, path).ok_or_else(|| {
            let found = apifetch_types::value_at_path(payload, path)
                .map(json_type_name)
                .unwrap_or("nothing");
            FetchError::malformed_response(format!(
                "{} expected a JSON array at '{}', found {}",
                profile.name, path, found
            ))
        })?,
    };

    Ok(items.iter().cloned().map(Record::new).collect())
}
