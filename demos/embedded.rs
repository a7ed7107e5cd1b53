//! Serve the posts API from inside another program, with custom seed posts
//! and no rate limiting.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example embedded
//!
//! Try:
//!   curl http://localhost:3000/api/posts?sort=title&direction=desc
//!   curl -X POST http://localhost:3000/api/posts \
//!        -H 'content-type: application/json' \
//!        -d '{"title":"Hello","content":"From curl"}'
//!   curl -X PUT http://localhost:3000/api/posts/1 -d '{"content":"edited"}'
//!   curl -X DELETE http://localhost:3000/api/posts/2
//!   curl 'http://localhost:3000/api/posts/search?query=hello'

use std::sync::Arc;

use masterblog::middleware::{Cors, Trace};
use masterblog::{Post, PostStore, Server, api};

#[tokio::main]
async fn main() -> Result<(), masterblog::Error> {
    tracing_subscriber::fmt::init();

    let store = Arc::new(PostStore::with_posts(vec![
        Post::new(1, "Zebra crossings", "Stripes, mostly."),
        Post::new(2, "Apple pie", "Flour, butter, apples."),
    ]));

    let app = api::router(store)
        .layer(Trace)
        .layer(Cors::permissive());

    Server::bind(([127, 0, 0, 1], 3000).into()).serve(app).await
}
