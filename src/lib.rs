//! # masterblog
//!
//! A small JSON API over an in-memory collection of blog posts: list,
//! create, update, delete, search and sort. Nothing is persisted; every
//! start comes back to the two seed posts.
//!
//! ## Routes
//!
//! | Method | Path | Success | Failure |
//! |---|---|---|---|
//! | GET | `/api/posts[?sort=title\|content&direction=asc\|desc]` | 200, array | 429 |
//! | POST | `/api/posts` | 200, the **whole** collection | 400, 429 |
//! | PUT | `/api/posts/{id}` | 200, the updated post | 400, 404 |
//! | DELETE | `/api/posts/{id}` | 200, `{"message": "Post deleted successfully"}` | 404 |
//! | GET | `/api/posts/search?query=` | 200, array | 404 |
//!
//! Errors are `{"error": "<message>"}`. Every response allows any origin;
//! the collection endpoint is rate limited per client address.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use masterblog::middleware::{Cors, RateLimit, Trace};
//! use masterblog::{PostStore, Server, api};
//!
//! #[tokio::main]
//! async fn main() {
//!     let app = api::router(Arc::new(PostStore::seeded()))
//!         .layer(Trace)
//!         .layer(Cors::permissive())
//!         .layer(RateLimit::new(10, Duration::from_secs(60)).route(api::POSTS_PATH));
//!
//!     Server::bind("0.0.0.0:5002".parse().unwrap()).serve(app).await.unwrap();
//! }
//! ```

mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod server;
mod status;

pub mod api;
pub mod config;
pub mod docs;
pub mod health;
pub mod middleware;
pub mod post;
pub mod store;
pub mod telemetry;

pub use error::Error;
pub use handler::{Handler, with_state};
pub use method::Method;
pub use post::{Post, PostPayload, SortDirection, SortField, SortOrder};
pub use request::{Request, RequestHead};
pub use response::{ContentType, IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use server::Server;
pub use status::Status;
pub use store::PostStore;

use std::sync::Arc;

use config::RateLimitSettings;
use middleware::{Cors, RateLimit, Trace};

/// The full service: every route plus access logging, permissive CORS and
/// rate limiting on the collection endpoint.
pub fn app(store: Arc<PostStore>, limits: &RateLimitSettings) -> Router {
    api::router(store)
        .layer(Trace)
        .layer(Cors::permissive())
        .layer(RateLimit::new(limits.max_requests.get(), limits.window).route(api::POSTS_PATH))
}
