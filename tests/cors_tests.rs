//! Origin allow-list behaviour as seen by a browser.

mod common;

use common::{sample_movies, TestServer};
use movies_api::app::AppConfig;
use movies_api::middleware::DEFAULT_ALLOWED_ORIGINS;

const ALLOWED: &str = DEFAULT_ALLOWED_ORIGINS[0];

#[test]
fn test_allowed_origin_is_echoed() {
    let server = TestServer::start(sample_movies());
    let resp = server.call("GET", "/movies", &[("Origin", ALLOWED)], None);
    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("access-control-allow-origin"), Some(ALLOWED));
    assert_eq!(resp.header("vary"), Some("Origin"));
}

#[test]
fn test_foreign_origin_gets_no_cors_headers() {
    let server = TestServer::start(sample_movies());
    let resp = server.call("GET", "/movies", &[("Origin", "https://evil.example")], None);
    assert_eq!(resp.status, 200);
    assert_eq!(resp.json().as_array().unwrap().len(), 2);
    assert!(resp.header("access-control-allow-origin").is_none());
}

#[test]
fn test_request_without_origin_gets_no_cors_headers() {
    let server = TestServer::start(sample_movies());
    let resp = server.call("GET", "/movies", &[], None);
    assert!(resp.header("access-control-allow-origin").is_none());
    assert!(resp.header("vary").is_none());
}

#[test]
fn test_get_by_id_never_carries_cors_headers() {
    let server = TestServer::start(sample_movies());
    let resp = server.call("GET", "/movies/a1", &[("Origin", ALLOWED)], None);
    assert_eq!(resp.status, 200);
    assert!(resp.header("access-control-allow-origin").is_none());
}

#[test]
fn test_error_responses_are_decorated_too() {
    let server = TestServer::start(sample_movies());
    let resp = server.call("DELETE", "/movies/zzz", &[("Origin", ALLOWED)], None);
    assert_eq!(resp.status, 404);
    assert_eq!(resp.header("access-control-allow-origin"), Some(ALLOWED));
}

#[test]
fn test_preflight_allowed_origin() {
    let server = TestServer::start(sample_movies());
    let resp = server.call("OPTIONS", "/movies/a1", &[("Origin", ALLOWED)], None);
    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("access-control-allow-origin"), Some(ALLOWED));
    assert_eq!(
        resp.header("access-control-allow-methods"),
        Some("GET, POST, PATCH, DELETE")
    );
}

#[test]
fn test_preflight_without_origin_still_lists_methods() {
    let server = TestServer::start(sample_movies());
    let resp = server.call("OPTIONS", "/movies/anything", &[], None);
    assert_eq!(resp.status, 200);
    assert!(resp.header("access-control-allow-origin").is_none());
    assert!(resp.header("access-control-allow-methods").is_some());
}

#[test]
fn test_preflight_foreign_origin_gets_nothing() {
    let server = TestServer::start(sample_movies());
    let resp = server.call("OPTIONS", "/movies/a1", &[("Origin", "https://evil.example")], None);
    assert_eq!(resp.status, 200);
    assert!(resp.header("access-control-allow-origin").is_none());
    assert!(resp.header("access-control-allow-methods").is_none());
}

#[test]
fn test_configured_allow_list_replaces_defaults() {
    let config = AppConfig {
        allowed_origins: Some(vec!["https://app.example.com".to_string()]),
        ..AppConfig::default()
    };
    let server = TestServer::with_config(sample_movies(), config);
    let custom = server.call("GET", "/movies", &[("Origin", "https://app.example.com")], None);
    assert_eq!(
        custom.header("access-control-allow-origin"),
        Some("https://app.example.com")
    );
    let default = server.call("GET", "/movies", &[("Origin", ALLOWED)], None);
    assert!(default.header("access-control-allow-origin").is_none());
}
