//! Integration tests for HttpFetcher using wiremock
//!
//! These tests validate the HTTP fetcher's behavior with mock servers.

use std::time::Duration;

use feed_digest::app::{ErrorKind, FeedDigestError};
use feed_digest::fetcher::{Fetcher, HttpFetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const FEED: &str = include_str!("fixtures/feed.xml");

fn fetcher(timeout: Duration, max_bytes: usize) -> HttpFetcher {
    HttpFetcher::new(timeout, max_bytes, "feed-digest-test").unwrap()
}

/// Test successful fetch from mock server
#[tokio::test]
async fn test_fetch_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rss"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/rss+xml")
                .set_body_string(FEED),
        )
        .mount(&mock_server)
        .await;

    let body = fetcher(Duration::from_secs(5), 1 << 20)
        .fetch(&format!("{}/rss", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(body, FEED.as_bytes());
}

/// Test that an error status is reported once, without retries
#[tokio::test]
async fn test_error_status_no_retry() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rss"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let err = fetcher(Duration::from_secs(5), 1 << 20)
        .fetch(&format!("{}/rss", mock_server.uri()))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Fetch);
    assert!(
        matches!(err, FeedDigestError::HttpStatus(status) if status.as_u16() == 503),
        "unexpected error: {err}"
    );
}

/// Test 404 is a fetch error
#[tokio::test]
async fn test_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let result = fetcher(Duration::from_secs(5), 1 << 20)
        .fetch(&format!("{}/missing", mock_server.uri()))
        .await;

    assert!(matches!(result, Err(FeedDigestError::HttpStatus(_))));
}

/// Test that oversized bodies are rejected
#[tokio::test]
async fn test_response_too_large() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/big"))
        .respond_with(ResponseTemplate::new(200).set_body_string("x".repeat(4096)))
        .mount(&mock_server)
        .await;

    let err = fetcher(Duration::from_secs(5), 1024)
        .fetch(&format!("{}/big", mock_server.uri()))
        .await
        .unwrap_err();

    assert!(matches!(err, FeedDigestError::ResponseTooLarge { limit: 1024 }));
}

/// Test that a body exactly at the limit is accepted
#[tokio::test]
async fn test_response_at_limit() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/exact"))
        .respond_with(ResponseTemplate::new(200).set_body_string("y".repeat(1024)))
        .mount(&mock_server)
        .await;

    let body = fetcher(Duration::from_secs(5), 1024)
        .fetch(&format!("{}/exact", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(body.len(), 1024);
}

/// Test that slow servers hit the request timeout
#[tokio::test]
async fn test_timeout() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(FEED)
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&mock_server)
        .await;

    let err = fetcher(Duration::from_millis(200), 1 << 20)
        .fetch(&format!("{}/slow", mock_server.uri()))
        .await
        .unwrap_err();

    match err {
        FeedDigestError::Http(e) => assert!(e.is_timeout()),
        other => panic!("expected timeout, got {other}"),
    }
}

/// Test that non-HTTP URLs never reach the network
#[tokio::test]
async fn test_rejects_non_http_url() {
    let err = fetcher(Duration::from_secs(5), 1024)
        .fetch("file:///etc/passwd")
        .await
        .unwrap_err();

    assert!(matches!(err, FeedDigestError::UnsupportedScheme(ref s) if s == "file"));
}
