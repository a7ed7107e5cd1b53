//! Per-client request throttling.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use parking_lot::Mutex;
use serde_json::json;
use tracing::warn;

use crate::middleware::Middleware;
use crate::request::Request;
use crate::response::{Json, Response};
use crate::status::Status;

/// Sliding-window rate limiter keyed by client IP address and path.
///
/// Only paths registered with [`RateLimit::route`] are counted; every
/// method on such a path draws from the same budget.
#[derive(Debug, Clone)]
pub struct RateLimit {
    window: Duration,
    max_requests: u32,
    routes: Vec<String>,
    buckets: Arc<DashMap<(IpAddr, String), Vec<Instant>>>,
    last_sweep: Arc<Mutex<Instant>>,
}

impl RateLimit {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            window,
            max_requests,
            routes: Vec::new(),
            buckets: Arc::new(DashMap::new()),
            last_sweep: Arc::new(Mutex::new(Instant::now())),
        }
    }

    /// Apply the limit to requests whose path equals `path`.
    pub fn route(mut self, path: &str) -> Self {
        self.routes.push(path.to_owned());
        self
    }

    /// Records one request and reports whether it fits in the window.
    pub fn allow(&self, client: IpAddr, path: &str, now: Instant) -> bool {
        self.sweep(now);

        let mut entry = self.buckets.entry((client, path.to_owned())).or_default();
        entry.retain(|seen| now.saturating_duration_since(*seen) < self.window);

        if entry.len() >= self.max_requests as usize {
            return false;
        }
        entry.push(now);
        true
    }

    /// Drops clients with no request inside the window, at most once per
    /// window. Must not run while an entry guard is held.
    fn sweep(&self, now: Instant) {
        {
            let mut last = self.last_sweep.lock();
            if now.saturating_duration_since(*last) < self.window {
                return;
            }
            *last = now;
        }
        self.buckets.retain(|_, seen| {
            seen.last().is_some_and(|t| now.saturating_duration_since(*t) < self.window)
        });
    }

    pub fn retry_after_secs(&self) -> u64 {
        self.window.as_secs().max(1)
    }

    /// Human-readable limit, e.g. `10 per 1 minute`.
    fn describe(&self) -> String {
        let secs = self.window.as_secs();
        if secs >= 60 && secs % 60 == 0 {
            format!("{} per {} minute", self.max_requests, secs / 60)
        } else {
            format!("{} per {} second", self.max_requests, secs.max(1))
        }
    }
}

impl Middleware for RateLimit {
    fn before(&self, req: &Request) -> Option<Response> {
        if !self.routes.iter().any(|route| route == req.path()) {
            return None;
        }
        let client = req.peer().ip();
        if self.allow(client, req.path(), Instant::now()) {
            return None;
        }

        warn!(peer = %client, path = req.path(), "rate limit exceeded");
        let mut res = Json(json!({ "error": format!("Too Many Requests: {}", self.describe()) }))
            .with_status(Status::TooManyRequests);
        res.set_header("retry-after", self.retry_after_secs().to_string());
        Some(res)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;
    use crate::method::Method;

    fn request(method: Method, path: &str, peer: &str) -> Request {
        Request::from_target(method, path, Vec::new(), Bytes::new(), peer.parse().unwrap())
    }

    #[test]
    fn eleventh_request_in_window_is_rejected() {
        let limit = RateLimit::new(10, Duration::from_secs(60)).route("/api/posts");
        for i in 0..10 {
            let method = if i % 2 == 0 { Method::Get } else { Method::Post };
            assert!(limit.before(&request(method, "/api/posts", "1.2.3.4:100")).is_none());
        }

        let res = limit
            .before(&request(Method::Get, "/api/posts", "1.2.3.4:200"))
            .expect("limited");
        assert_eq!(res.status_code(), 429);
        assert_eq!(res.header("retry-after"), Some("60"));
        assert_eq!(res.body(), br#"{"error":"Too Many Requests: 10 per 1 minute"}"#);
    }

    #[test]
    fn other_clients_and_paths_are_unaffected() {
        let limit = RateLimit::new(1, Duration::from_secs(60)).route("/api/posts");
        assert!(limit.before(&request(Method::Get, "/api/posts", "1.2.3.4:1")).is_none());
        assert!(limit.before(&request(Method::Get, "/api/posts", "1.2.3.4:1")).is_some());

        assert!(limit.before(&request(Method::Get, "/api/posts", "5.6.7.8:1")).is_none());
        for _ in 0..5 {
            assert!(limit.before(&request(Method::Get, "/api/posts/search", "1.2.3.4:1")).is_none());
        }
    }

    #[test]
    fn window_slides() {
        let limit = RateLimit::new(2, Duration::from_secs(60));
        let client: IpAddr = "9.9.9.9".parse().unwrap();
        let start = Instant::now();

        assert!(limit.allow(client, "/p", start));
        assert!(limit.allow(client, "/p", start + Duration::from_secs(30)));
        assert!(!limit.allow(client, "/p", start + Duration::from_secs(59)));
        assert!(limit.allow(client, "/p", start + Duration::from_secs(61)));
    }

    #[test]
    fn idle_clients_are_forgotten() {
        let limit = RateLimit::new(1, Duration::from_secs(60));
        let start = Instant::now();
        for ip in ["1.1.1.1", "2.2.2.2", "3.3.3.3"] {
            assert!(limit.allow(ip.parse().unwrap(), "/p", start));
        }
        assert_eq!(limit.buckets.len(), 3);

        let later = start + Duration::from_secs(120);
        assert!(limit.allow("4.4.4.4".parse().unwrap(), "/p", later));
        assert_eq!(limit.buckets.len(), 1);
        assert!(!limit.allow("4.4.4.4".parse().unwrap(), "/p", later));
    }
}
