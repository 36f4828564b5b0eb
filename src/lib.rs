//! Seismic event feed monitoring service.
//!
//! Fetches USGS GeoJSON earthquake feeds, extracts the most recent event
//! from each (title, origin time, tsunami alert flag), and reports it. The
//! fetch-and-extract pipeline lives in [`ingest::usgs`]; everything it can
//! fail on degrades to an absent record after a diagnostic to the caller's
//! [`logging::LogSink`].

pub mod feeds;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod verify;
