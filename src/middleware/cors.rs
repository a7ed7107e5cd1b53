//! Cross-origin resource sharing.

use crate::method::Method;
use crate::middleware::Middleware;
use crate::request::{Request, RequestHead};
use crate::response::Response;
use crate::status::Status;

const ALLOWED_METHODS: &str = "GET, HEAD, POST, OPTIONS, PUT, PATCH, DELETE";

/// Adds `access-control-allow-origin` to every response and answers
/// preflight requests before they reach the router.
pub struct Cors {
    origin: String,
}

impl Cors {
    /// Any origin may call any route.
    pub fn permissive() -> Self {
        Self { origin: "*".to_owned() }
    }
}

impl Middleware for Cors {
    fn before(&self, req: &Request) -> Option<Response> {
        if req.method() != Method::Options {
            return None;
        }
        req.header("access-control-request-method")?;

        let mut res = Response::builder()
            .status(Status::Ok)
            .header("access-control-allow-methods", ALLOWED_METHODS);
        if let Some(headers) = req.header("access-control-request-headers") {
            res = res.header("access-control-allow-headers", headers);
        }
        Some(res.no_body())
    }

    fn after(&self, _head: &RequestHead, res: &mut Response) {
        res.set_header("access-control-allow-origin", self.origin.as_str());
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    fn request(method: Method, headers: Vec<(String, String)>) -> Request {
        Request::from_target(method, "/api/posts", headers, Bytes::new(), "127.0.0.1:1".parse().unwrap())
    }

    #[test]
    fn answers_preflight() {
        let req = request(
            Method::Options,
            vec![
                ("Access-Control-Request-Method".into(), "PUT".into()),
                ("Access-Control-Request-Headers".into(), "content-type".into()),
            ],
        );
        let res = Cors::permissive().before(&req).expect("preflight response");
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.header("access-control-allow-methods"), Some(ALLOWED_METHODS));
        assert_eq!(res.header("access-control-allow-headers"), Some("content-type"));
    }

    #[test]
    fn plain_options_and_other_methods_pass_through() {
        let cors = Cors::permissive();
        assert!(cors.before(&request(Method::Options, Vec::new())).is_none());
        assert!(cors.before(&request(Method::Get, Vec::new())).is_none());
    }

    #[test]
    fn every_response_gets_the_origin_header() {
        let req = request(Method::Get, Vec::new());
        let mut res = Response::status(Status::NotFound);
        Cors::permissive().after(&req.head(), &mut res);
        assert_eq!(res.header("access-control-allow-origin"), Some("*"));
    }
}
