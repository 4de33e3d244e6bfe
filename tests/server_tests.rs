//! Service-level behaviour outside the movie handlers.

mod common;

use common::{sample_movies, TestServer};
use serde_json::json;

#[test]
fn test_health_endpoint() {
    let server = TestServer::start(Vec::new());
    let resp = server.call("GET", "/health", &[], None);
    assert_eq!(resp.status, 200);
    assert_eq!(resp.json(), json!({ "status": "ok" }));
}

#[test]
fn test_unknown_route_is_404() {
    let server = TestServer::start(sample_movies());
    let resp = server.call("GET", "/nope", &[], None);
    assert_eq!(resp.status, 404);
    assert_eq!(resp.json()["error"], "Not Found");
    assert_eq!(resp.json()["path"], "/nope");
}

#[test]
fn test_unsupported_method_is_404() {
    let server = TestServer::start(sample_movies());
    let resp = server.call("PUT", "/movies/a1", &[], None);
    assert_eq!(resp.status, 404);
}

#[test]
fn test_trailing_segment_does_not_match() {
    let server = TestServer::start(sample_movies());
    assert_eq!(server.call("GET", "/movies/a1/extra", &[], None).status, 404);
}

#[test]
fn test_non_json_body_is_treated_as_empty() {
    let server = TestServer::start(sample_movies());
    let raw = "PATCH /movies/a1 HTTP/1.1\r\nHost: localhost\r\nContent-Type: text/plain\r\nContent-Length: 5\r\n\r\nhello";
    let resp = server.request(raw);
    assert_eq!(resp.status, 200);
    assert_eq!(resp.json()["title"], "X");
}

#[test]
fn test_sequential_requests_share_state() {
    let server = TestServer::start(sample_movies());
    for _ in 0..5 {
        let resp = server.call(
            "POST",
            "/movies",
            &[],
            Some(r#"{"title":"T","year":2001,"director":"D","duration":1,"poster":"https://e.com/p.png","genre":["Horror"]}"#),
        );
        assert_eq!(resp.status, 201);
    }
    let all = server.call("GET", "/movies?genre=horror", &[], None).json();
    assert_eq!(all.as_array().unwrap().len(), 5);
}

#[test]
fn test_trailing_slash_matches_route() {
    let server = TestServer::start(sample_movies());
    let list = server.call("GET", "/movies/", &[], None);
    assert_eq!(list.status, 200);
    assert_eq!(list.json().as_array().unwrap().len(), 2);
    assert_eq!(server.call("GET", "/movies/a1/", &[], None).json()["id"], "a1");
}

#[test]
fn test_head_on_get_route() {
    let server = TestServer::start(sample_movies());
    let found = server.call("HEAD", "/movies/a1", &[], None);
    assert_eq!(found.status, 200);
    assert!(found.body.is_empty());
    assert_eq!(found.header("content-type"), Some("application/json"));
    assert_eq!(server.call("HEAD", "/movies/zzz", &[], None).status, 404);
}
