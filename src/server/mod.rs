//! HTTP plumbing on top of `may_minihttp`.
//!
//! [`AppService`] parses each request, applies the JSON body contract, answers
//! `GET /health`, routes and dispatches everything else, and writes the
//! response. [`HttpServer`] / [`ServerHandle`] start and stop the listener.

pub mod http_server;
pub mod request;
pub mod response;
pub mod service;

pub use http_server::{HttpServer, ServerHandle};
pub use request::{decode_body, parse_request, ParsedRequest};
pub use service::{health_endpoint, AppService, DEFAULT_MAX_BODY_BYTES};
