/// Feed registry for the seismic event monitoring service.
///
/// Defines the canonical list of USGS real-time GeoJSON feeds this service
/// monitors, along with their metadata. This is the single source of truth
/// for feed URLs — all other modules should reference feeds from here rather
/// than hardcoding endpoints. A deployment can override the registry with a
/// `feeds.toml` file loaded by `load_feeds`.

use serde::Deserialize;
use std::error::Error;
use std::path::Path;

// ---------------------------------------------------------------------------
// Feed metadata
// ---------------------------------------------------------------------------

/// Metadata for a single USGS GeoJSON feed.
pub struct Feed {
    /// Short identifier used in log context and report rows.
    pub id: &'static str,
    /// Official USGS feed name.
    pub name: &'static str,
    /// Human-readable description of the feed's role in monitoring.
    pub description: &'static str,
    /// Feed endpoint. All registry feeds are GeoJSON feature collections.
    pub url: &'static str,
}

/// All USGS feeds monitored for tsunami-relevant seismic activity, ordered
/// roughly from most to least selective.
///
/// Sources:
///   - Feed catalog: USGS real-time feeds (earthquake.usgs.gov/earthquakes/feed)
///   - Update cadence: summary feeds regenerate every minute
pub static FEED_REGISTRY: &[Feed] = &[
    Feed {
        id: "significant_hour",
        name: "Significant Earthquakes, Past Hour",
        description: "Tightest window over significant events. Empty almost \
                      all of the time; a non-empty response warrants attention.",
        url: "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/significant_hour.geojson",
    },
    Feed {
        id: "significant_day",
        name: "Significant Earthquakes, Past Day",
        description: "Primary monitoring feed. Significant events carry the \
                      tsunami flag reliably and the feed stays small.",
        url: "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/significant_day.geojson",
    },
    Feed {
        id: "significant_week",
        name: "Significant Earthquakes, Past Week",
        description: "Wider window used when the daily feed is quiet. Usually \
                      non-empty, so it doubles as a liveness reference.",
        url: "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/significant_week.geojson",
    },
    Feed {
        id: "significant_month",
        name: "Significant Earthquakes, Past Month",
        description: "Widest significant-event window. A whole month without \
                      an entry would itself indicate a feed problem.",
        url: "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/significant_month.geojson",
    },
    Feed {
        id: "m45_day",
        name: "M4.5+ Earthquakes, Past Day",
        description: "Magnitude-filtered feed covering events below the \
                      significance threshold that can still be tsunamigenic \
                      near coastlines.",
        url: "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/4.5_day.geojson",
    },
    Feed {
        id: "all_hour",
        name: "All Earthquakes, Past Hour",
        description: "Unfiltered firehose, small because of the one-hour \
                      window. Useful for verifying the pipeline end to end.",
        url: "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_hour.geojson",
    },
];

/// Returns the endpoint URLs for all registry feeds.
pub fn all_feed_urls() -> Vec<&'static str> {
    FEED_REGISTRY.iter().map(|f| f.url).collect()
}

/// Looks up a feed by id. Returns `None` if not found.
pub fn find_feed(id: &str) -> Option<&'static Feed> {
    FEED_REGISTRY.iter().find(|f| f.id == id)
}

/// The feed used when a caller wants exactly one: significant events over
/// the past month, the widest window that still filters for significance.
pub fn default_feed() -> &'static Feed {
    find_feed("significant_month").expect("significant_month is in the registry")
}

// ---------------------------------------------------------------------------
// Configuration file loading
// ---------------------------------------------------------------------------

/// One feed entry from a `feeds.toml` override file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedConfig {
    pub id: String,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct FeedFile {
    #[serde(default)]
    feeds: Vec<FeedConfig>,
}

/// Load feed definitions from a TOML file.
///
/// Expected shape:
/// ```toml
/// [[feeds]]
/// id = "significant_day"
/// name = "Significant Earthquakes, Past Day"
/// url = "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/significant_day.geojson"
/// ```
pub fn load_feeds(path: &Path) -> Result<Vec<FeedConfig>, Box<dyn Error>> {
    let raw = std::fs::read_to_string(path)?;
    let file: FeedFile = toml::from_str(&raw)?;
    Ok(file.feeds)
}

/// The built-in registry in `FeedConfig` form, for callers that treat
/// configured and registry feeds uniformly.
pub fn registry_feeds() -> Vec<FeedConfig> {
    FEED_REGISTRY
        .iter()
        .map(|f| FeedConfig {
            id: f.id.to_string(),
            name: f.name.to_string(),
            url: f.url.to_string(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
