//! Middleware layer.
//!
//! A middleware wraps every routed request with two hooks:
//!
//! - [`Middleware::before`] sees the request first and may answer it on the
//!   spot (a `429` from the rate limiter, a CORS preflight). The handler and
//!   the remaining `before` hooks are skipped.
//! - [`Middleware::after`] sees every outgoing response, short-circuited or
//!   not, in reverse registration order.
//!
//! Register the outermost concern first:
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use masterblog::Router;
//! use masterblog::middleware::{Cors, RateLimit, Trace};
//!
//! let app = Router::new()
//!     .layer(Trace)
//!     .layer(Cors::permissive())
//!     .layer(RateLimit::new(10, Duration::from_secs(60)).route("/api/posts"));
//! ```

mod cors;
mod rate_limit;
mod trace;

pub use cors::Cors;
pub use rate_limit::RateLimit;
pub use trace::Trace;

use crate::request::{Request, RequestHead};
use crate::response::Response;

/// A before/after hook pair applied to every routed request.
pub trait Middleware: Send + Sync + 'static {
    fn before(&self, _req: &Request) -> Option<Response> {
        None
    }

    fn after(&self, _head: &RequestHead, _res: &mut Response) {}
}
