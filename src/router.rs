//! Radix-tree request router with a middleware chain.
//!
//! One matchit tree per HTTP method. A request that finds no tree, or no
//! match in its tree, gets an empty `404 Not Found`.

use std::collections::HashMap;
use std::sync::Arc;

use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::middleware::Middleware;
use crate::request::{Request, RequestHead};
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Build it once at startup; pass it to [`Server::serve`](crate::Server::serve).
/// Each registration returns `self` so calls chain naturally.
pub struct Router {
    routes: HashMap<Method, MatchitRouter<BoxedHandler>>,
    layers: Vec<Arc<dyn Middleware>>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: HashMap::new(), layers: Vec::new() }
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax; `req.param("name")` retrieves them.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid matchit route or conflicts with a
    /// route already registered for `method`.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Post, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Put, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler) -> Self {
        self.on(Method::Delete, path, handler)
    }

    /// Append a middleware. The first registered runs outermost.
    pub fn layer(mut self, middleware: impl Middleware) -> Self {
        self.layers.push(Arc::new(middleware));
        self
    }

    /// Runs one request through the middleware chain and its handler.
    pub async fn dispatch(&self, mut req: Request) -> Response {
        let head = req.head();

        let short_circuit = self.layers.iter().find_map(|layer| layer.before(&req));
        let response = match short_circuit {
            Some(res) => res,
            None => match self.lookup(req.method, &req.path) {
                Some((handler, params)) => {
                    req.set_params(params);
                    handler.call(req).await
                }
                None => Response::status(Status::NotFound),
            },
        };
        self.finish(&head, response)
    }

    /// Runs the `after` hooks, innermost first. The server calls this
    /// directly for requests it answers without dispatching.
    pub(crate) fn finish(&self, head: &RequestHead, mut response: Response) -> Response {
        for layer in self.layers.iter().rev() {
            layer.after(head, &mut response);
        }
        response
    }

    fn lookup(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(BoxedHandler, HashMap<String, String>)> {
        let tree = self.routes.get(&method)?;
        let matched = tree.at(path).ok()?;
        let handler = Arc::clone(matched.value);
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some((handler, params))
    }
}

impl Default for Router {
    fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    fn request(method: Method, target: &str) -> Request {
        Request::from_target(method, target, Vec::new(), Bytes::new(), "10.0.0.1:4000".parse().unwrap())
    }

    async fn echo_id(req: Request) -> String {
        req.param("id").unwrap_or_default().to_owned()
    }

    struct Deny;

    impl Middleware for Deny {
        fn before(&self, _req: &Request) -> Option<Response> {
            Some(Response::status(Status::TooManyRequests))
        }
    }

    struct Stamp(&'static str);

    impl Middleware for Stamp {
        fn after(&self, _head: &RequestHead, res: &mut Response) {
            let seen = res.header("x-order").unwrap_or_default().to_owned();
            res.set_header("x-order", format!("{seen}{}", self.0));
        }
    }

    #[tokio::test]
    async fn routes_by_method_and_extracts_params() {
        let router = Router::new().put("/api/posts/{id}", echo_id);

        let res = router.dispatch(request(Method::Put, "/api/posts/7")).await;
        assert_eq!(res.status_code(), 200);
        assert_eq!(res.body(), b"7");

        let res = router.dispatch(request(Method::Get, "/api/posts/7")).await;
        assert_eq!(res.status_code(), 404);

        let res = router.dispatch(request(Method::Put, "/api/nowhere")).await;
        assert_eq!(res.status_code(), 404);
    }

    #[tokio::test]
    async fn static_segment_wins_over_parameter() {
        let router = Router::new()
            .get("/api/posts/search", |_req: Request| async { "search" })
            .get("/api/posts/{id}", echo_id);

        let res = router.dispatch(request(Method::Get, "/api/posts/search?query=x")).await;
        assert_eq!(res.body(), b"search");
    }

    #[tokio::test]
    async fn short_circuit_skips_handler_but_runs_after_hooks_in_reverse() {
        let router = Router::new()
            .get("/", |_req: Request| async { "handler" })
            .layer(Stamp("a"))
            .layer(Stamp("b"))
            .layer(Deny);

        let res = router.dispatch(request(Method::Get, "/")).await;
        assert_eq!(res.status_code(), 429);
        assert_eq!(res.header("x-order"), Some("ba"));
    }

    #[test]
    fn finish_runs_after_hooks_for_undispatched_requests() {
        let router = Router::new().layer(Stamp("a")).layer(Stamp("b"));
        let head = RequestHead::new("PROPFIND", "/api/posts", "10.0.0.1:4000".parse().unwrap());

        let res = router.finish(&head, Response::status(Status::NotFound));
        assert_eq!(res.status_code(), 404);
        assert_eq!(res.header("x-order"), Some("ba"));
    }
}
