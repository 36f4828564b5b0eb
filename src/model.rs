/// Core data types for the seismic feed monitoring service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O and no logic beyond simple accessors — only types.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Event record
// ---------------------------------------------------------------------------

/// A single seismic event extracted from a USGS GeoJSON feed.
///
/// Corresponds to `features[0].properties` of a feed response: the event
/// title, the origin time in milliseconds since the Unix epoch, and the
/// tsunami alert flag (0 = no alert, 1 = alert issued). An `Event` is only
/// constructed when all three fields parsed successfully — partial records
/// are never produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub title: String,
    pub time_ms: i64,
    pub tsunami: i32,
}

impl Event {
    /// Origin time as a UTC datetime. Returns `None` for epoch values
    /// outside the range chrono can represent.
    pub fn occurred_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.time_ms).single()
    }

    /// Whether a tsunami alert was issued for this event.
    pub fn tsunami_alert(&self) -> bool {
        self.tsunami != 0
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or extracting a seismic event feed.
///
/// Every variant is non-fatal to the pipeline caller: `fetch_first_event`
/// reports the failure to its log sink and returns `None`. The variants
/// exist so each stage can say precisely what went wrong.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedError {
    /// The endpoint string could not be parsed as an http(s) URL.
    InvalidUrl(String),
    /// Non-200 HTTP response from the feed endpoint.
    HttpError(u16),
    /// Connect failure, timeout, or a read error mid-body.
    RequestFailed(String),
    /// The response body could not be parsed, or a required field was
    /// missing or mistyped.
    ParseError(String),
    /// The response parsed but its `features` array was empty.
    NoFeatures,
}

impl std::fmt::Display for FeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeedError::InvalidUrl(url) => write!(f, "Invalid URL: {}", url),
            FeedError::HttpError(code) => write!(f, "HTTP error: {}", code),
            FeedError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            FeedError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            FeedError::NoFeatures => write!(f, "No features in response"),
        }
    }
}

impl std::error::Error for FeedError {}
