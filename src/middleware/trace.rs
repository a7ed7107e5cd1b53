//! Per-request access log.

use tracing::info;

use crate::middleware::Middleware;
use crate::request::RequestHead;
use crate::response::Response;

/// Emits one `info` event per request once its response is ready.
pub struct Trace;

impl Middleware for Trace {
    fn after(&self, head: &RequestHead, res: &mut Response) {
        let latency = head.received.elapsed();
        info!(
            method = %head.method,
            path = %head.path,
            status = res.status_code(),
            peer = %head.peer,
            latency_ms = latency.as_secs_f64() * 1000.0,
            "request"
        );
    }
}
