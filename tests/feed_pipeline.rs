//! Offline pipeline integration tests.
//!
//! These exercise the full fetch-and-extract pipeline over real sockets
//! without external network access: each test serves a canned HTTP response
//! from a loopback listener and drives the pipeline against it. Covers the
//! transport behaviors the unit tests cannot reach — status codes, body
//! decoding, connection failures.

use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use quakemon_service::ingest::usgs;
use quakemon_service::logging::{LogLevel, MemorySink};
use quakemon_service::model::{Event, FeedError};

// ---------------------------------------------------------------------------
// Loopback stub server
// ---------------------------------------------------------------------------

/// Serve `response` verbatim to the next `connections` connections on a
/// fresh loopback port, then stop. Returns the endpoint URL for the stub.
fn serve(response: String, connections: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
    let addr = listener.local_addr().expect("listener address");

    thread::spawn(move || {
        for _ in 0..connections {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            // Drain the request before answering so the client never sees a
            // reset while still sending.
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });

    format!("http://{}/events.json", addr)
}

fn response_with_status(status_line: &str, body: &str) -> String {
    format!(
        "HTTP/1.0 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status_line,
        body.len(),
        body
    )
}

fn ok_response(body: &str) -> String {
    response_with_status("200 OK", body)
}

const MINIMAL_FEED_BODY: &str = r#"{"features":[{"properties":{"title":"M 5.0 - 10km N of Example","time":1500000000000,"tsunami":1}}]}"#;

// ---------------------------------------------------------------------------
// Success path
// ---------------------------------------------------------------------------

#[test]
fn test_success_returns_first_event_record() {
    let endpoint = serve(ok_response(MINIMAL_FEED_BODY), 1);
    let client = usgs::feed_client().expect("client should build");
    let sink = MemorySink::new();

    let event = usgs::fetch_first_event(&client, &sink, &endpoint);

    assert_eq!(
        event,
        Some(Event {
            title: "M 5.0 - 10km N of Example".to_string(),
            time_ms: 1_500_000_000_000,
            tsunami: 1,
        })
    );
    assert!(sink.is_empty(), "successful fetch should not diagnose anything");
}

#[test]
fn test_multiline_body_is_joined_and_still_parses() {
    let body = "{\n  \"features\": [\n    {\n      \"properties\": {\n        \"title\": \"M 4.6 - near the coast\",\n        \"time\": 1500000000000,\n        \"tsunami\": 0\n      }\n    }\n  ]\n}";
    let endpoint = serve(ok_response(body), 1);
    let client = usgs::feed_client().expect("client should build");
    let sink = MemorySink::new();

    let event = usgs::fetch_first_event(&client, &sink, &endpoint);

    let event = event.expect("pretty-printed feed should extract");
    assert_eq!(event.title, "M 4.6 - near the coast");
    assert!(!event.tsunami_alert());
}

#[test]
fn test_repeated_fetch_of_stable_response_is_idempotent() {
    let endpoint = serve(ok_response(MINIMAL_FEED_BODY), 2);
    let client = usgs::feed_client().expect("client should build");
    let sink = MemorySink::new();

    let first = usgs::fetch_first_event(&client, &sink, &endpoint);
    let second = usgs::fetch_first_event(&client, &sink, &endpoint);

    assert!(first.is_some());
    assert_eq!(first, second, "stable remote response should yield identical records");
}

// ---------------------------------------------------------------------------
// Transport failures
// ---------------------------------------------------------------------------

#[test]
fn test_non_200_yields_absence_regardless_of_body() {
    // The 404 body is itself a perfectly valid feed document; the status
    // check must win.
    let endpoint = serve(response_with_status("404 Not Found", MINIMAL_FEED_BODY), 1);
    let client = usgs::feed_client().expect("client should build");
    let sink = MemorySink::new();

    assert_eq!(usgs::fetch_first_event(&client, &sink, &endpoint), None);

    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, LogLevel::Error);
    assert!(entries[0].message.contains("404"), "diagnostic should carry the status code");
}

#[test]
fn test_server_error_yields_absence() {
    let endpoint = serve(response_with_status("500 Internal Server Error", "oops"), 1);
    let client = usgs::feed_client().expect("client should build");
    let sink = MemorySink::new();

    assert_eq!(usgs::fetch_first_event(&client, &sink, &endpoint), None);
    assert!(sink.entries()[0].message.contains("500"));
}

#[test]
fn test_fetch_feed_reports_exact_status_code() {
    let endpoint = serve(response_with_status("503 Service Unavailable", ""), 1);
    let client = usgs::feed_client().expect("client should build");
    let url = usgs::validate_endpoint(&endpoint)
        .expect("stub endpoint should validate")
        .expect("stub endpoint is not empty");

    assert_eq!(usgs::fetch_feed(&client, &url), Err(FeedError::HttpError(503)));
}

#[test]
fn test_connection_refused_yields_absence_with_transient_diagnostic() {
    // Bind a port, then drop the listener so nothing answers on it.
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback listener");
        listener.local_addr().expect("listener address")
    };
    let endpoint = format!("http://{}/events.json", addr);
    let client = usgs::feed_client().expect("client should build");
    let sink = MemorySink::new();

    assert_eq!(usgs::fetch_first_event(&client, &sink, &endpoint), None);

    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].level,
        LogLevel::Warning,
        "connect failures are transient and should warn, not error"
    );
    assert!(entries[0].message.contains("Feed request"));
}

// ---------------------------------------------------------------------------
// Degenerate bodies
// ---------------------------------------------------------------------------

#[test]
fn test_malformed_json_body_yields_absence() {
    let endpoint = serve(ok_response("{\"features\": ["), 1);
    let client = usgs::feed_client().expect("client should build");
    let sink = MemorySink::new();

    assert_eq!(usgs::fetch_first_event(&client, &sink, &endpoint), None);

    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].level, LogLevel::Error);
    assert!(entries[0].message.contains("Event extraction"));
}

#[test]
fn test_empty_features_yields_absence_as_expected_condition() {
    let endpoint = serve(ok_response("{\"features\": []}"), 1);
    let client = usgs::feed_client().expect("client should build");
    let sink = MemorySink::new();

    assert_eq!(usgs::fetch_first_event(&client, &sink, &endpoint), None);

    let entries = sink.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(
        entries[0].level,
        LogLevel::Debug,
        "a quiet feed is expected and should not raise above debug"
    );
}

#[test]
fn test_empty_body_yields_absence_without_diagnostic() {
    let endpoint = serve(ok_response(""), 1);
    let client = usgs::feed_client().expect("client should build");
    let sink = MemorySink::new();

    assert_eq!(usgs::fetch_first_event(&client, &sink, &endpoint), None);
    assert!(
        sink.is_empty(),
        "an empty 200 body is treated as no data, not a failure: {:?}",
        sink.entries()
    );
}
