use crate::error::ApiError;
use crate::ids::RequestId;
use crate::middleware::Middleware;
use crate::router::{ParamVec, RouteMatch};
use http::Method;
use may::coroutine;
use may::sync::mpsc;
use serde_json::Value;
use smallvec::SmallVec;
use std::collections::HashMap;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Maximum inline headers before heap allocation
pub const MAX_INLINE_HEADERS: usize = 16;

/// Header storage for requests and responses. Names are lower-case on requests.
pub type HeaderVec = SmallVec<[(Arc<str>, String); MAX_INLINE_HEADERS]>;

/// Request data passed to a handler coroutine
#[derive(Debug, Clone)]
pub struct HandlerRequest {
    /// Unique request ID for tracing and correlation
    pub request_id: RequestId,
    pub method: Method,
    /// Concrete request path (without query string)
    pub path: String,
    /// Name of the handler that should process this request
    pub handler_name: String,
    pub path_params: ParamVec,
    pub query_params: ParamVec,
    pub headers: HeaderVec,
    /// Parsed JSON body; `{}` when the request carried none
    pub body: Value,
    /// Channel for sending the response back to the dispatcher
    pub reply_tx: mpsc::Sender<HandlerResponse>,
}

impl HandlerRequest {
    /// Get a path parameter by name. Last occurrence wins.
    #[inline]
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a query parameter by name. Last occurrence wins.
    #[inline]
    #[must_use]
    pub fn get_query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .rfind(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v.as_str())
    }

    /// Get a header by name (case-insensitive per RFC 7230)
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Response data sent back from a handler coroutine
#[derive(Debug, Clone, PartialEq)]
pub struct HandlerResponse {
    pub status: u16,
    pub headers: HeaderVec,
    /// JSON body; `Value::Null` means "no body"
    pub body: Value,
}

impl HandlerResponse {
    #[must_use]
    pub fn new(status: u16, headers: HeaderVec, body: Value) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// JSON response without extra headers. Content-Type is added by the writer.
    #[must_use]
    pub fn json(status: u16, body: Value) -> Self {
        Self::new(status, HeaderVec::new(), body)
    }

    /// Status-only response with an empty body
    #[must_use]
    pub fn empty(status: u16) -> Self {
        Self::new(status, HeaderVec::new(), Value::Null)
    }

    /// Get a header by name
    #[inline]
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Add or update a header
    pub fn set_header(&mut self, name: &str, value: String) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((Arc::from(name), value));
    }
}

impl From<ApiError> for HandlerResponse {
    fn from(err: ApiError) -> Self {
        HandlerResponse::json(err.status(), err.body())
    }
}

/// Type alias for a channel sender that dispatches requests to a handler
pub type HandlerSender = mpsc::Sender<HandlerRequest>;

/// Routes matched requests to registered handler coroutines
#[derive(Clone)]
pub struct Dispatcher {
    /// Map of handler names to their channel senders
    pub handlers: HashMap<String, HandlerSender>,
    /// Ordered list of middleware to apply to requests/responses
    pub middlewares: Vec<Arc<dyn Middleware>>,
    stack_size: usize,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Create a new empty dispatcher with the default coroutine stack size.
    #[must_use]
    pub fn new() -> Self {
        Self::with_stack_size(crate::runtime_config::DEFAULT_STACK_SIZE)
    }

    #[must_use]
    pub fn with_stack_size(stack_size: usize) -> Self {
        Dispatcher {
            handlers: HashMap::new(),
            middlewares: Vec::new(),
            stack_size,
        }
    }

    /// Add middleware to the processing pipeline
    ///
    /// Middleware runs in insertion order, both before and after the handler.
    pub fn add_middleware(&mut self, mw: Arc<dyn Middleware>) {
        self.middlewares.push(mw);
    }

    /// Registers a handler that answers requests routed to `name`.
    ///
    /// Spawns a coroutine that consumes requests from a channel and replies with
    /// whatever `handler_fn` returns. A panic inside `handler_fn` is caught and
    /// answered with a 500; the coroutine keeps serving. Registering a name twice
    /// replaces the earlier handler, whose coroutine exits once its channel closes.
    ///
    /// # Errors
    ///
    /// Returns the spawn error if the coroutine could not be started.
    pub fn register_handler<F>(&mut self, name: &str, handler_fn: F) -> io::Result<()>
    where
        F: Fn(&HandlerRequest) -> HandlerResponse + Send + 'static,
    {
        let (tx, rx) = mpsc::channel::<HandlerRequest>();
        let handler_name = name.to_string();
        let stack_size = self.stack_size;

        // SAFETY: `may` marks spawning unsafe because coroutines must not hold
        // thread-local state across yields. The handler loop owns everything it
        // touches (the receiver and a `Send + 'static` closure) and never relies
        // on thread-locals.
        #[allow(unsafe_code)]
        let spawned = unsafe {
            coroutine::Builder::new()
                .name(format!("handler-{handler_name}"))
                .stack_size(stack_size)
                .spawn(move || {
                    debug!(handler_name = %handler_name, stack_size, "Handler coroutine start");
                    for req in rx.iter() {
                        let reply_tx = req.reply_tx.clone();
                        let request_id = req.request_id;
                        let started = Instant::now();

                        let response = match std::panic::catch_unwind(
                            std::panic::AssertUnwindSafe(|| handler_fn(&req)),
                        ) {
                            Ok(response) => {
                                debug!(
                                    request_id = %request_id,
                                    handler_name = %handler_name,
                                    status = response.status,
                                    execution_time_ms = started.elapsed().as_millis() as u64,
                                    "Handler execution complete"
                                );
                                response
                            }
                            Err(panic) => {
                                let panic_message = panic
                                    .downcast_ref::<&str>()
                                    .map(|s| (*s).to_string())
                                    .or_else(|| panic.downcast_ref::<String>().cloned())
                                    .unwrap_or_else(|| "non-string panic payload".to_string());
                                error!(
                                    request_id = %request_id,
                                    handler_name = %handler_name,
                                    panic_message = %panic_message,
                                    "Handler panicked"
                                );
                                HandlerResponse::from(ApiError::Internal)
                            }
                        };

                        if reply_tx.send(response).is_err() {
                            warn!(
                                request_id = %request_id,
                                handler_name = %handler_name,
                                "Reply channel closed before the response was sent"
                            );
                        }
                    }
                    debug!(handler_name = %handler_name, "Handler coroutine exit");
                })
        };

        if let Err(e) = spawned {
            error!(handler_name = %name, error = %e, stack_size, "Failed to spawn handler coroutine");
            return Err(e);
        }

        if self.handlers.insert(name.to_string(), tx).is_some() {
            warn!(handler_name = %name, "Replaced existing handler");
        }
        info!(
            handler_name = %name,
            total_handlers = self.handlers.len(),
            "Handler registered"
        );
        Ok(())
    }

    /// Dispatch a matched request to its handler and run the middleware chain.
    ///
    /// Returns `None` if no handler is registered under the route's handler name
    /// or the handler coroutine is gone.
    #[must_use]
    pub fn dispatch(
        &self,
        route_match: RouteMatch,
        path: String,
        body: Value,
        headers: HeaderVec,
        request_id: RequestId,
    ) -> Option<HandlerResponse> {
        let Some(tx) = self.handlers.get(&route_match.handler_name) else {
            let available_handlers: Vec<&String> = self.handlers.keys().collect();
            error!(
                handler_name = %route_match.handler_name,
                available_handlers = ?available_handlers,
                "Handler not found"
            );
            return None;
        };

        let (reply_tx, reply_rx) = mpsc::channel();
        let request = HandlerRequest {
            request_id,
            method: route_match.route.method.clone(),
            path,
            handler_name: route_match.handler_name,
            path_params: route_match.path_params,
            query_params: route_match.query_params,
            headers,
            body,
            reply_tx,
        };

        let mut early_resp: Option<HandlerResponse> = None;
        for mw in &self.middlewares {
            if early_resp.is_none() {
                early_resp = mw.before(&request);
            } else {
                // Later middleware still observe the request.
                drop(mw.before(&request));
            }
        }

        let (mut resp, latency) = if let Some(r) = early_resp {
            debug!(request_id = %request_id, "Middleware returned early response");
            (r, Duration::ZERO)
        } else {
            let start = Instant::now();
            if let Err(e) = tx.send(request.clone()) {
                error!(
                    request_id = %request_id,
                    handler_name = %request.handler_name,
                    error = %e,
                    "Failed to send request to handler"
                );
                return None;
            }
            match reply_rx.recv() {
                Ok(r) => (r, start.elapsed()),
                Err(e) => {
                    error!(
                        request_id = %request_id,
                        handler_name = %request.handler_name,
                        error = %e,
                        "Handler channel closed without a response"
                    );
                    return None;
                }
            }
        };

        for mw in &self.middlewares {
            mw.after(&request, &mut resp, latency);
        }

        Some(resp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::RouteCorsPolicy;
    use crate::router::{RouteMeta, Router};
    use serde_json::json;
    use std::sync::Once;

    fn setup_may() {
        static ONCE: Once = Once::new();
        ONCE.call_once(|| {
            may::config().set_stack_size(0x8000);
        });
    }

    fn route(handler: &str) -> RouteMatch {
        let router = Router::new(vec![RouteMeta::new(
            Method::GET,
            "/things/{id}",
            handler,
            RouteCorsPolicy::Disabled,
        )])
        .unwrap();
        router.route(Method::GET, "/things/7").unwrap()
    }

    fn dispatch(d: &Dispatcher, handler: &str) -> Option<HandlerResponse> {
        d.dispatch(
            route(handler),
            "/things/7".to_string(),
            json!({}),
            HeaderVec::new(),
            RequestId::new(),
        )
    }

    struct Stamp;

    impl Middleware for Stamp {
        fn after(&self, _req: &HandlerRequest, res: &mut HandlerResponse, _latency: Duration) {
            res.set_header("x-stamp", "1".to_string());
        }
    }

    struct ShortCircuit;

    impl Middleware for ShortCircuit {
        fn before(&self, _req: &HandlerRequest) -> Option<HandlerResponse> {
            Some(HandlerResponse::json(418, json!({ "short": true })))
        }
    }

    #[test]
    fn test_dispatch_reaches_handler() {
        setup_may();
        let mut d = Dispatcher::new();
        d.register_handler("echo_id", |req| {
            HandlerResponse::json(200, json!({ "id": req.get_path_param("id") }))
        })
        .unwrap();
        let resp = dispatch(&d, "echo_id").unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.body, json!({ "id": "7" }));
    }

    #[test]
    fn test_missing_handler_returns_none() {
        setup_may();
        let d = Dispatcher::new();
        assert!(dispatch(&d, "nobody").is_none());
    }

    #[test]
    fn test_panic_becomes_generic_500_and_handler_survives() {
        setup_may();
        let mut d = Dispatcher::new();
        d.register_handler("boom", |req| {
            if req.get_path_param("id") == Some("7") {
                panic!("secret detail");
            }
            HandlerResponse::empty(200)
        })
        .unwrap();
        let resp = dispatch(&d, "boom").unwrap();
        assert_eq!(resp.status, 500);
        assert_eq!(resp.body, json!({ "error": "Internal Server Error" }));
        assert!(!resp.body.to_string().contains("secret"));
        // Same coroutine still answers.
        assert_eq!(dispatch(&d, "boom").unwrap().status, 500);
    }

    #[test]
    fn test_after_middleware_decorates_response() {
        setup_may();
        let mut d = Dispatcher::new();
        d.register_handler("plain", |_| HandlerResponse::empty(204))
            .unwrap();
        d.add_middleware(Arc::new(Stamp));
        let resp = dispatch(&d, "plain").unwrap();
        assert_eq!(resp.get_header("X-Stamp"), Some("1"));
    }

    #[test]
    fn test_before_middleware_short_circuits() {
        setup_may();
        let mut d = Dispatcher::new();
        d.register_handler("never", |_| panic!("must not run")).unwrap();
        d.add_middleware(Arc::new(ShortCircuit));
        d.add_middleware(Arc::new(Stamp));
        let resp = dispatch(&d, "never").unwrap();
        assert_eq!(resp.status, 418);
        assert_eq!(resp.get_header("x-stamp"), Some("1"));
    }

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut resp = HandlerResponse::empty(200);
        resp.set_header("Vary", "Origin".to_string());
        resp.set_header("vary", "Accept".to_string());
        assert_eq!(resp.headers.len(), 1);
        assert_eq!(resp.get_header("VARY"), Some("Accept"));
    }

    #[test]
    fn test_api_error_conversion() {
        let resp = HandlerResponse::from(ApiError::NotFound);
        assert_eq!(resp.status, 404);
        assert_eq!(resp.body, json!({ "message": "Movie not found" }));
    }
}
