//! Incoming HTTP request type.

use std::borrow::Cow;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::time::Instant;

use bytes::Bytes;
use url::form_urlencoded;

use crate::method::Method;

/// An incoming HTTP request with its body fully buffered.
///
/// Built by the server once per request; the router fills in path
/// parameters after a successful lookup.
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
    pub(crate) peer: SocketAddr,
    pub(crate) received: Instant,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        path: String,
        query: String,
        headers: Vec<(String, String)>,
        body: Bytes,
        peer: SocketAddr,
    ) -> Self {
        Self {
            method,
            path,
            query,
            headers,
            body,
            params: HashMap::new(),
            peer,
            received: Instant::now(),
        }
    }

    /// Splits a request target such as `/api/posts?sort=title` into its
    /// path and raw query string.
    #[cfg(test)]
    pub(crate) fn from_target(
        method: Method,
        target: &str,
        headers: Vec<(String, String)>,
        body: Bytes,
        peer: SocketAddr,
    ) -> Self {
        let (path, query) = target.split_once('?').unwrap_or((target, ""));
        Self::new(method, path.to_owned(), query.to_owned(), headers, body, peer)
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }
    pub fn peer(&self) -> SocketAddr { self.peer }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/api/posts/{id}`, `req.param("id")` on `/api/posts/42`
    /// returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Returns the first value of a query-string parameter, percent- and
    /// `+`-decoded.
    pub fn query(&self, key: &str) -> Option<Cow<'_, str>> {
        form_urlencoded::parse(self.query.as_bytes())
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Copies out the parts middleware still needs after the handler has
    /// consumed the request.
    pub fn head(&self) -> RequestHead {
        RequestHead {
            method: self.method.as_str().to_owned(),
            path: self.path.clone(),
            peer: self.peer,
            received: self.received,
        }
    }

    pub(crate) fn set_params(&mut self, params: HashMap<String, String>) {
        self.params = params;
    }
}

/// Request metadata handed to [`Middleware::after`](crate::middleware::Middleware::after).
#[derive(Clone, Debug)]
pub struct RequestHead {
    /// Wire name of the method, including ones that have no [`Method`] variant.
    pub method: String,
    pub path: String,
    pub peer: SocketAddr,
    pub received: Instant,
}

impl RequestHead {
    /// Metadata for a request that never became a [`Request`]: an
    /// unroutable method or an unreadable body.
    pub(crate) fn new(method: &str, path: &str, peer: SocketAddr) -> Self {
        Self {
            method: method.to_owned(),
            path: path.to_owned(),
            peer,
            received: Instant::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(target: &str) -> Request {
        Request::from_target(
            Method::Get,
            target,
            vec![("Content-Type".into(), "application/json".into())],
            Bytes::new(),
            "127.0.0.1:9000".parse().unwrap(),
        )
    }

    #[test]
    fn splits_path_and_query() {
        let req = get("/api/posts?sort=title&direction=desc");
        assert_eq!(req.path(), "/api/posts");
        assert_eq!(req.query("sort").as_deref(), Some("title"));
        assert_eq!(req.query("direction").as_deref(), Some("desc"));
        assert_eq!(req.query("missing"), None);
    }

    #[test]
    fn decodes_query_escapes_and_keeps_first_value() {
        let req = get("/api/posts/search?query=first+p%C3%B6st&query=second");
        assert_eq!(req.query("query").as_deref(), Some("first pöst"));
    }

    #[test]
    fn header_lookup_ignores_case() {
        let req = get("/");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.query("anything"), None);
    }
}
