/// Feed ingestion clients.
///
/// Submodules:
/// - `usgs` — USGS earthquake feed client: endpoint validation, bounded
///   HTTP fetch, stream decoding, and first-event extraction.

pub mod usgs;
