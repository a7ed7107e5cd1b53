//! masterblog server: the posts API with access logs, CORS and rate
//! limiting, seeded with two posts.
//!
//! Run with:
//!   MASTERBLOG_LOG_LEVEL=info cargo run -- --port 5002
//!
//! Try:
//!   curl http://localhost:5002/api/posts
//!   curl 'http://localhost:5002/api/posts/search?query=first'
//!   open http://localhost:5002/api/docs

use std::sync::Arc;

use tracing::info;

use masterblog::config::Settings;
use masterblog::{Error, PostStore, Server, telemetry};

#[tokio::main]
async fn main() -> Result<(), Error> {
    let settings = Settings::load()?;
    telemetry::init(&settings.logging)?;

    let store = Arc::new(PostStore::seeded());
    info!(posts = store.len(), "seeded post store");

    let app = masterblog::app(store, &settings.rate_limit);
    Server::bind(settings.listen).serve(app).await
}
