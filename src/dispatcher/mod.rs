//! # Dispatcher Module
//!
//! Coroutine-based handler dispatch. Each registered handler runs in its own `may`
//! coroutine and receives requests over a channel; the dispatcher sends a matched
//! request to the right coroutine, waits for the reply and runs the middleware chain
//! around it.
//!
//! ## Request Flow
//!
//! 1. Router matches the incoming request → [`RouteMatch`](crate::router::RouteMatch)
//! 2. Middleware `before` hooks run; any of them may answer early
//! 3. The request is sent to the handler coroutine registered under the route's
//!    handler name
//! 4. The handler replies over a one-shot channel
//! 5. Middleware `after` hooks decorate the response (CORS headers, tracing)
//!
//! ## Error Handling
//!
//! - A route whose handler was never registered yields `None`; the server turns
//!   that into a 500.
//! - A panicking handler is caught inside its coroutine and answered with a 500
//!   `{"error": "Internal Server Error"}`. The panic message is logged, never sent.
//!
//! ## Stack Size
//!
//! Handler coroutines use the stack size from
//! [`RuntimeConfig`](crate::runtime_config::RuntimeConfig) (`MOVIES_STACK_SIZE`).

mod core;

pub use core::{
    Dispatcher, HandlerRequest, HandlerResponse, HandlerSender, HeaderVec, MAX_INLINE_HEADERS,
};
