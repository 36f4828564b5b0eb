/// USGS Earthquake Feed Client
///
/// Retrieves GeoJSON feature collections from the USGS earthquake feeds and
/// extracts the most recent event for tsunami alert monitoring. The pipeline
/// is strictly sequential: endpoint validation, a bounded-timeout GET,
/// line-by-line stream decoding, and shallow extraction of
/// `features[0].properties`.
///
/// Feed documentation: https://earthquake.usgs.gov/earthquakes/feed/v1.0/geojson.php
/// FDSN event service: https://earthquake.usgs.gov/fdsnws/event/1/

use std::io::{BufRead, BufReader, Read};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::logging::{LogSink, log_feed_failure};
use crate::model::{Event, FeedError};

/// Base URL of the FDSN event web service used by `build_query_url`.
const USGS_FDSN_BASE_URL: &str = "https://earthquake.usgs.gov/fdsnws/event/1";

/// Maximum time allowed to establish a connection.
pub const CONNECT_TIMEOUT: Duration = Duration::from_millis(15_000);

/// Maximum time allowed for the request once issued, which bounds the body
/// read.
pub const READ_TIMEOUT: Duration = Duration::from_millis(10_000);

// ============================================================================
// Feed Response Structures
// ============================================================================

/// The `properties` object of a feed's first feature.
///
/// Only the three fields of interest are declared; serde ignores the rest of
/// the object (magnitude, place, detail URL, and so on).
#[derive(Debug, Deserialize)]
struct EventProperties {
    title: String,
    time: i64,
    tsunami: i32,
}

// ============================================================================
// HTTP Client
// ============================================================================

/// Build the blocking HTTP client used for all feed requests, with the
/// service's fixed connect and read timeouts applied.
pub fn feed_client() -> reqwest::Result<reqwest::blocking::Client> {
    reqwest::blocking::Client::builder()
        .connect_timeout(CONNECT_TIMEOUT)
        .timeout(READ_TIMEOUT)
        .build()
}

// ============================================================================
// Endpoint Validation
// ============================================================================

/// Validate a feed endpoint string before any network activity.
///
/// Empty or whitespace-only input is a normal "nothing to fetch" signal and
/// yields `Ok(None)`. Anything else that does not parse as an absolute
/// http(s) URL with a host yields `Err(InvalidUrl)`. A malformed endpoint
/// never reaches the network.
pub fn validate_endpoint(input: &str) -> Result<Option<Url>, FeedError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let url = Url::parse(trimmed)
        .map_err(|e| FeedError::InvalidUrl(format!("{} ({})", trimmed, e)))?;

    if !matches!(url.scheme(), "http" | "https") || !url.has_host() {
        return Err(FeedError::InvalidUrl(trimmed.to_string()));
    }

    Ok(Some(url))
}

// ============================================================================
// Stream Decoding
// ============================================================================

/// Read a response body line by line as UTF-8, concatenating lines without
/// inserting line-break characters.
///
/// The original line boundaries are discarded. That would corrupt a format
/// where line breaks are significant, but whitespace between JSON tokens is
/// not, so the joined text parses identically. Invalid UTF-8 surfaces as an
/// I/O error, which the fetcher reports as a transport failure.
pub fn decode_stream<R: Read>(stream: R) -> std::io::Result<String> {
    let mut body = String::new();
    for line in BufReader::new(stream).lines() {
        body.push_str(&line?);
    }
    Ok(body)
}

// ============================================================================
// Fetching
// ============================================================================

/// Issue a GET against a validated feed endpoint and return the decoded body.
///
/// Only an exact 200 is read; any other status code becomes `HttpError`
/// carrying the code, regardless of what the body contained. Connect
/// failures, timeouts, and read errors mid-body all surface as
/// `RequestFailed`. The connection is released on every exit path when the
/// response drops.
pub fn fetch_feed(
    client: &reqwest::blocking::Client,
    url: &Url,
) -> Result<String, FeedError> {
    let response = client
        .get(url.as_str())
        .header("Accept", "application/json")
        .send()
        .map_err(|e| FeedError::RequestFailed(e.to_string()))?;

    let status = response.status().as_u16();
    if status != 200 {
        return Err(FeedError::HttpError(status));
    }

    decode_stream(response).map_err(|e| FeedError::RequestFailed(e.to_string()))
}

// ============================================================================
// Extraction
// ============================================================================

/// Extract the first event from a feed body.
///
/// Parses the body as a JSON object, requires a `features` array, and reads
/// `features[0].properties.{title,time,tsunami}`. Only the first feature is
/// inspected — malformed entries later in the array cannot fail the
/// extraction. A missing array, a missing `properties` object, or a
/// missing/mistyped required field is a `ParseError`; an empty array is
/// `NoFeatures`.
pub fn extract_first_event(body: &str) -> Result<Event, FeedError> {
    let feed: serde_json::Value =
        serde_json::from_str(body).map_err(|e| FeedError::ParseError(e.to_string()))?;

    let features = feed
        .get("features")
        .and_then(|f| f.as_array())
        .ok_or_else(|| FeedError::ParseError("no features array in response".to_string()))?;

    let first = features.first().ok_or(FeedError::NoFeatures)?;

    let properties = first.get("properties").cloned().ok_or_else(|| {
        FeedError::ParseError("first feature has no properties object".to_string())
    })?;

    let properties: EventProperties = serde_json::from_value(properties)
        .map_err(|e| FeedError::ParseError(e.to_string()))?;

    Ok(Event {
        title: properties.title,
        time_ms: properties.time,
        tsunami: properties.tsunami,
    })
}

// ============================================================================
// Pipeline
// ============================================================================

/// Fetch a feed and extract its most recent event, end to end.
///
/// Composes validation, fetch, and extraction sequentially. Every failure is
/// reported to `sink` with its context and converted to `None` — no error
/// crosses this boundary, so callers handle only "record present" versus
/// "record absent". An empty endpoint string returns `None` without touching
/// the network, and an empty body from a successful response returns `None`
/// without a parse attempt.
///
/// Each call is independent: no state is shared between invocations, and a
/// stable remote response yields an identical record on every call.
pub fn fetch_first_event(
    client: &reqwest::blocking::Client,
    sink: &dyn LogSink,
    endpoint: &str,
) -> Option<Event> {
    let url = match validate_endpoint(endpoint) {
        Ok(Some(url)) => url,
        Ok(None) => return None,
        Err(e) => {
            log_feed_failure(sink, endpoint, "Endpoint validation", &e);
            return None;
        }
    };

    let body = match fetch_feed(client, &url) {
        Ok(body) => body,
        Err(e) => {
            log_feed_failure(sink, endpoint, "Feed request", &e);
            return None;
        }
    };

    if body.is_empty() {
        return None;
    }

    match extract_first_event(&body) {
        Ok(event) => Some(event),
        Err(e) => {
            log_feed_failure(sink, endpoint, "Event extraction", &e);
            None
        }
    }
}

// ============================================================================
// Query URL Construction
// ============================================================================

/// Build an FDSN event-service query URL for a date window and minimum
/// magnitude, ordered newest first so the first feature is the most recent
/// matching event.
///
/// Dates are `YYYY-MM-DD`; the window is `[start_date, end_date)` in UTC.
pub fn build_query_url(start_date: &str, end_date: &str, min_magnitude: f64) -> String {
    format!(
        "{}/query?format=geojson&starttime={}&endtime={}&minmagnitude={}&orderby=time",
        USGS_FDSN_BASE_URL, start_date, end_date, min_magnitude
    )
}

// ============================================================================
// Tests
// ============================================================================
