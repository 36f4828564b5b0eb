//! Service entry point: fetch the latest event from each monitored feed and
//! print one line per feed. `--verify` probes every registry feed and prints
//! a verification report instead.

use std::path::Path;
use std::process::ExitCode;

use quakemon_service::feeds;
use quakemon_service::ingest::usgs;
use quakemon_service::logging::{ConsoleSink, DataSource, LogLevel, LogSink};
use quakemon_service::verify;

fn main() -> ExitCode {
    if std::env::args().any(|arg| arg == "--verify") {
        return run_verification();
    }

    let sink = ConsoleSink::new(LogLevel::Info).with_timestamps();

    let client = match usgs::feed_client() {
        Ok(client) => client,
        Err(e) => {
            sink.error(
                DataSource::System,
                None,
                &format!("Failed to build HTTP client: {}", e),
            );
            return ExitCode::FAILURE;
        }
    };

    for feed in &monitored_feeds(&sink) {
        match usgs::fetch_first_event(&client, &sink, &feed.url) {
            Some(event) => {
                let when = event
                    .occurred_at()
                    .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
                    .unwrap_or_else(|| format!("{} ms", event.time_ms));
                let alert = if event.tsunami_alert() {
                    "  ** TSUNAMI ALERT **"
                } else {
                    ""
                };
                println!("{:<18} {} ({}){}", feed.id, event.title, when, alert);
            }
            None => {
                println!("{:<18} no events", feed.id);
            }
        }
    }

    ExitCode::SUCCESS
}

/// Feeds to monitor: the `feeds.toml` override when present and non-empty,
/// the built-in registry otherwise.
fn monitored_feeds(sink: &dyn LogSink) -> Vec<feeds::FeedConfig> {
    let config_path = Path::new("feeds.toml");
    if config_path.exists() {
        match feeds::load_feeds(config_path) {
            Ok(loaded) if !loaded.is_empty() => return loaded,
            Ok(_) => {
                sink.warn(
                    DataSource::Config,
                    Some("feeds.toml"),
                    "No feeds defined, using built-in registry",
                );
            }
            Err(e) => {
                sink.warn(
                    DataSource::Config,
                    Some("feeds.toml"),
                    &format!("Unreadable, using built-in registry: {}", e),
                );
            }
        }
    }
    feeds::registry_feeds()
}

fn run_verification() -> ExitCode {
    match verify::run_full_verification() {
        Ok(report) => {
            verify::print_summary(&report);
            if report.summary.failed == 0 {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("Verification failed to run: {}", e);
            ExitCode::FAILURE
        }
    }
}
