//! Single-request fetch pipeline: GET, classify, parse, normalize.

use std::error::Error as StdError;
use std::time::Instant;

use apifetch_api::ApiClient;
use apifetch_types::{ApiProfile, FetchError, FetchResult};
use apifetch_util::http::{parse_json_body, status_error_message};
use tracing::{debug, warn};

use crate::normalize::normalize;

/// Fetch and normalize the records for `profile`.
///
/// Issues exactly one GET to the profile's base URL with its query parameters.
/// Every failure is classified into one [`FetchError`] variant:
///
/// - deadline exceeded while connecting or reading: `Timeout`
/// - DNS, refused or reset connections, invalid URLs: `ConnectionFailure`
/// - any non-2xx final status: `HttpStatus`
/// - a 2xx body that is not JSON (including an empty body): `Parse`
/// - JSON without the expected record array: `MalformedResponse`
pub async fn fetch_profile(client: &ApiClient, profile: &ApiProfile) -> FetchResult {
    let start = Instant::now();
    let url = profile.base_url.as_str();
    debug!(profile = %profile.name, %url, "http request started");

    let request = client
        .get(url, &profile.query_pairs())
        .map_err(|error| FetchError::connection_failure(url, error.to_string()))?;

    let response = request.send().await.map_err(|error| {
        let classified = classify_transport_error(client, url, &error);
        warn!(
            profile = %profile.name,
            %url,
            error = %classified,
            duration_ms = start.elapsed().as_millis(),
            "http request failed"
        );
        classified
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        warn!(
            profile = %profile.name,
            %url,
            status = %status,
            duration_ms = start.elapsed().as_millis(),
            "http request returned an error status"
        );
        return Err(FetchError::http_status(status.as_u16(), status_error_message(status, &body)));
    }

    let body = response
        .text()
        .await
        .map_err(|error| classify_transport_error(client, url, &error))?;

    let payload = parse_json_body(&body, status).map_err(|error| {
        warn!(
            profile = %profile.name,
            %url,
            status = %status,
            body_len = body.len(),
            error = %error,
            "http response JSON parse failed"
        );
        FetchError::parse(error.to_string())
    })?;

    let records = normalize(profile, &payload).inspect_err(|error| {
        warn!(profile = %profile.name, %url, error = %error, "http response has an unexpected shape");
    })?;

    debug!(
        profile = %profile.name,
        %url,
        status = %status,
        record_count = records.len(),
        duration_ms = start.elapsed().as_millis(),
        "http request completed"
    );
    Ok(records)
}

fn classify_transport_error(client: &ApiClient, url: &str, error: &reqwest::Error) -> FetchError {
    if error.is_timeout() {
        return FetchError::timeout(url, client.timeout.as_millis() as u64);
    }
    FetchError::connection_failure(url, error_chain(error))
}

/// Flatten an error and its sources into one line (`outer: inner: root`).
fn error_chain(error: &dyn StdError) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        let cause_message = cause.to_string();
        if !message.contains(&cause_message) {
            message.push_str(": ");
            message.push_str(&cause_message);
        }
        source = cause.source();
    }
    message
}
