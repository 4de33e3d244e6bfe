use super::request::{parse_request, ParsedRequest};
use super::response::{write_api_error, write_handler_response, write_json};
use crate::dispatcher::{Dispatcher, HandlerResponse};
use crate::error::ApiError;
use crate::router::Router;
use http::Method;
use may_minihttp::{HttpService, Request, Response};
use serde_json::{json, Value};
use std::io;
use std::sync::Arc;
use tracing::{error, warn};

/// Default request body limit (100 KiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 100 * 1024;

/// The `may_minihttp` service: parse, route, dispatch, write.
#[derive(Clone)]
pub struct AppService {
    pub router: Arc<Router>,
    pub dispatcher: Arc<Dispatcher>,
    pub max_body_bytes: usize,
}

impl AppService {
    #[must_use]
    pub fn new(router: Router, dispatcher: Dispatcher) -> Self {
        Self {
            router: Arc::new(router),
            dispatcher: Arc::new(dispatcher),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    #[must_use]
    pub fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }
}

/// Basic health check endpoint returning `{ "status": "ok" }`.
pub fn health_endpoint(res: &mut Response) -> io::Result<()> {
    write_json(res, 200, &json!({ "status": "ok" }));
    Ok(())
}

/// `HEAD` answers carry the `GET` status and headers without the body.
fn strip_body(hr: &mut HandlerResponse) {
    if !hr.body.is_null() && hr.get_header("content-type").is_none() {
        hr.set_header("content-type", "application/json".to_string());
    }
    hr.body = Value::Null;
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let ParsedRequest {
            request_id,
            method,
            path,
            headers,
            query_params,
            body,
        } = parse_request(req, self.max_body_bytes);

        if method == "GET" && path == "/health" {
            return health_endpoint(res);
        }

        let body = match body {
            Ok(body) => body,
            Err(err) => {
                warn!(request_id = %request_id, method = %method, path = %path, error = %err, "Request body refused");
                write_api_error(res, &err);
                return Ok(());
            }
        };

        let route_match = Method::from_bytes(method.as_bytes())
            .ok()
            .and_then(|m| self.router.route(m, &path));
        let Some(mut route_match) = route_match else {
            write_api_error(res, &ApiError::RouteNotFound { method, path });
            return Ok(());
        };
        route_match.query_params = query_params;

        match self
            .dispatcher
            .dispatch(route_match, path, body, headers, request_id)
        {
            Some(mut hr) => {
                if method == "HEAD" {
                    strip_body(&mut hr);
                }
                write_handler_response(res, hr);
            }
            None => {
                error!(request_id = %request_id, method = %method, "Handler failed or not registered");
                write_api_error(res, &ApiError::Internal);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_body_keeps_status_and_content_type() {
        let mut hr = HandlerResponse::json(200, json!({ "id": "a1" }));
        strip_body(&mut hr);
        assert_eq!(hr.status, 200);
        assert_eq!(hr.body, Value::Null);
        assert_eq!(hr.get_header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_strip_body_on_empty_response_adds_nothing() {
        let mut hr = HandlerResponse::empty(200);
        strip_body(&mut hr);
        assert!(hr.headers.is_empty());
    }
}
