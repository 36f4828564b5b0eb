/// Structured logging for the seismic feed monitoring service.
///
/// Diagnostics flow through a `LogSink` capability handed to the pipeline
/// rather than a process-global logger, so the pipeline stays independently
/// testable. `ConsoleSink` is the production sink with optional file-based
/// logging for daemon operations; `MemorySink` records entries for
/// assertions in tests.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use crate::model::FeedError;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Usgs,
    Config,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Usgs => write!(f, "USGS"),
            DataSource::Config => write!(f, "CONFIG"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Log Sink Capability
// ---------------------------------------------------------------------------

/// Destination for diagnostic messages.
///
/// The pipeline receives one of these instead of writing to a global, so a
/// test can hand in a `MemorySink` and assert exactly which diagnostics were
/// reported. `context` carries the identifier the message is about — a feed
/// id or the offending endpoint.
pub trait LogSink {
    fn write(&self, level: LogLevel, source: DataSource, context: Option<&str>, message: &str);

    fn debug(&self, source: DataSource, context: Option<&str>, message: &str) {
        self.write(LogLevel::Debug, source, context, message);
    }

    fn info(&self, source: DataSource, context: Option<&str>, message: &str) {
        self.write(LogLevel::Info, source, context, message);
    }

    fn warn(&self, source: DataSource, context: Option<&str>, message: &str) {
        self.write(LogLevel::Warning, source, context, message);
    }

    fn error(&self, source: DataSource, context: Option<&str>, message: &str) {
        self.write(LogLevel::Error, source, context, message);
    }
}

// ---------------------------------------------------------------------------
// Console Sink
// ---------------------------------------------------------------------------

/// Console sink with a minimum-level filter, optional timestamps, and
/// optional append-to-file output.
pub struct ConsoleSink {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl ConsoleSink {
    pub fn new(min_level: LogLevel) -> Self {
        ConsoleSink {
            min_level,
            log_file: None,
            console_timestamps: false,
        }
    }

    pub fn with_timestamps(mut self) -> Self {
        self.console_timestamps = true;
        self
    }

    pub fn with_log_file(mut self, path: &str) -> Self {
        self.log_file = Some(path.to_string());
        self
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

impl LogSink for ConsoleSink {
    fn write(&self, level: LogLevel, source: DataSource, context: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
        let context_part = context.map(|c| format!(" [{}]", c)).unwrap_or_default();
        let log_entry = format!(
            "{} {} {}{}: {}",
            timestamp, level, source, context_part, message
        );

        // Console output
        if self.console_timestamps {
            match level {
                LogLevel::Error | LogLevel::Warning => eprintln!("{}", log_entry),
                LogLevel::Info => println!("{}", log_entry),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", source, context_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", source, context_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => {} // Skip debug in non-timestamp mode
            }
        }

        // File output
        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Memory Sink
// ---------------------------------------------------------------------------

/// A captured log entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub source: DataSource,
    pub context: Option<String>,
    pub message: String,
}

/// Sink that records every entry in memory, regardless of level.
///
/// Interior mutability keeps `write` at `&self` so the same trait object
/// works for both sinks.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<LogEntry>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

impl LogSink for MemorySink {
    fn write(&self, level: LogLevel, source: DataSource, context: Option<&str>, message: &str) {
        self.entries.lock().unwrap().push(LogEntry {
            level,
            source,
            context: context.map(String::from),
            message: message.to_string(),
        });
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - a quiet feed period, nothing to report yet
    Expected,
    /// Unexpected failure - indicates service degradation or an API change
    Unexpected,
    /// Unknown - likely transient, cannot be determined from the error alone
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// Classify a feed failure by its error variant.
///
/// Significant-event feeds are legitimately empty most of the time, so an
/// empty `features` array is an expected outcome. Transport failures are
/// usually transient. HTTP, parse, and URL failures point at configuration
/// problems or upstream API changes.
pub fn classify_feed_failure(err: &FeedError) -> FailureType {
    match err {
        FeedError::NoFeatures => FailureType::Expected,
        FeedError::RequestFailed(_) => FailureType::Unknown,
        FeedError::InvalidUrl(_) | FeedError::HttpError(_) | FeedError::ParseError(_) => {
            FailureType::Unexpected
        }
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log a feed failure with automatic classification.
pub fn log_feed_failure(sink: &dyn LogSink, feed: &str, operation: &str, err: &FeedError) {
    let failure_type = classify_feed_failure(err);

    let message = format!("{} failed [{}]: {}", operation, failure_type, err);

    match failure_type {
        FailureType::Expected => sink.debug(DataSource::Usgs, Some(feed), &message),
        FailureType::Unexpected => sink.error(DataSource::Usgs, Some(feed), &message),
        FailureType::Unknown => sink.warn(DataSource::Usgs, Some(feed), &message),
    }
}
