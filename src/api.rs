//! The posts API: route table, handlers and their error type.
//!
//! | Method | Path | Handler |
//! |---|---|---|
//! | GET | `/api/posts` | [`list_posts`]: stored order, or sorted by `sort` / `direction` |
//! | POST | `/api/posts` | [`create_post`]: returns the whole collection |
//! | GET | `/api/posts/search` | [`search_posts`]: `query` substring match |
//! | PUT | `/api/posts/{id}` | [`update_post`]: partial overwrite |
//! | DELETE | `/api/posts/{id}` | [`delete_post`] |

use std::sync::Arc;

use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::handler::with_state;
use crate::post::{PostPayload, SortOrder};
use crate::request::Request;
use crate::response::{IntoResponse, Json, Response};
use crate::router::Router;
use crate::status::Status;
use crate::store::PostStore;
use crate::{docs, health};

/// Path of the collection endpoint, shared with the rate limiter.
pub const POSTS_PATH: &str = "/api/posts";

/// Request failures surfaced to the caller as `{"error": "<message>"}`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ApiError {
    /// Missing or malformed payload (400).
    #[error("{0}")]
    Validation(&'static str),

    /// No post with the requested id (404).
    #[error("Post not found")]
    NotFound,

    /// A search matched nothing (404). The trailing space is part of the
    /// wire contract.
    #[error("Post not found ")]
    NoMatch,
}

impl ApiError {
    const NO_DATA: Self = Self::Validation("No data provided");
    const NO_TITLE: Self = Self::Validation("No title provided");
    const NO_CONTENT: Self = Self::Validation("No content provided");

    fn status(&self) -> Status {
        match self {
            Self::Validation(_) => Status::BadRequest,
            Self::NotFound | Self::NoMatch => Status::NotFound,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        Json(json!({ "error": self.to_string() })).with_status(self.status())
    }
}

/// Every route the service answers, without middleware.
pub fn router(store: Arc<PostStore>) -> Router {
    Router::new()
        .get(POSTS_PATH, with_state(&store, list_posts))
        .post(POSTS_PATH, with_state(&store, create_post))
        .get("/api/posts/search", with_state(&store, search_posts))
        .put("/api/posts/{id}", with_state(&store, update_post))
        .delete("/api/posts/{id}", with_state(&store, delete_post))
        .get(docs::DOCS_PATH, docs::page)
        .get(docs::DOCUMENT_PATH, docs::document)
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness)
}

/// `GET /api/posts[?sort=title|content&direction=asc|desc]`
pub async fn list_posts(store: Arc<PostStore>, req: Request) -> Response {
    let sort = SortOrder::from_query(
        req.query("sort").as_deref(),
        req.query("direction").as_deref(),
    );
    Json(store.list(sort)).into_response()
}

/// `POST /api/posts`
pub async fn create_post(store: Arc<PostStore>, req: Request) -> Response {
    validate_new_post(req.body())
        .map(|(title, content)| Json(store.create(title, content)))
        .into_response()
}

/// Checks a create body, first failure wins: an object with at least one
/// key, then a non-empty `title`, then a non-empty `content`.
fn validate_new_post(body: &[u8]) -> Result<(String, String), ApiError> {
    let object = json_object(body)
        .filter(|object| !object.is_empty())
        .ok_or(ApiError::NO_DATA)?;
    let payload = PostPayload::from_object(&object);
    let title = payload.title.filter(|t| !t.is_empty()).ok_or(ApiError::NO_TITLE)?;
    let content = payload.content.filter(|c| !c.is_empty()).ok_or(ApiError::NO_CONTENT)?;
    Ok((title, content))
}

/// `DELETE /api/posts/{id}`
pub async fn delete_post(store: Arc<PostStore>, req: Request) -> Response {
    let id = match post_id(&req) {
        Ok(id) => id,
        Err(res) => return res,
    };
    match store.delete(id) {
        Some(_) => Json(json!({ "message": "Post deleted successfully" })).into_response(),
        None => ApiError::NotFound.into_response(),
    }
}

/// `PUT /api/posts/{id}`
pub async fn update_post(store: Arc<PostStore>, req: Request) -> Response {
    let id = match post_id(&req) {
        Ok(id) => id,
        Err(res) => return res,
    };
    // Parsed up front so no work happens under the store lock, but an
    // unknown id still wins over a bad body.
    let patch = json_object(req.body()).map(|object| PostPayload::from_object(&object));

    let updated = match patch {
        Some(patch) => store.update(id, patch).ok_or(ApiError::NotFound),
        None if store.contains(id) => Err(ApiError::NO_DATA),
        None => Err(ApiError::NotFound),
    };
    updated.map(Json).into_response()
}

/// `GET /api/posts/search?query=<text>`
pub async fn search_posts(store: Arc<PostStore>, req: Request) -> Response {
    let query = req.query("query").unwrap_or_default();
    let found = store.search(&query);
    if found.is_empty() {
        return ApiError::NoMatch.into_response();
    }
    Json(found).into_response()
}

/// The body as a JSON object, or `None` if it is empty, unparseable, or
/// some other JSON type.
fn json_object(body: &[u8]) -> Option<Map<String, Value>> {
    match serde_json::from_slice(body).ok()? {
        Value::Object(object) => Some(object),
        _ => None,
    }
}

/// The `{id}` path segment as a post id. Anything but plain digits does
/// not route (empty 404); digits too large for an id name no stored post.
fn post_id(req: &Request) -> Result<u64, Response> {
    let raw = req.param("id").unwrap_or_default();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Response::status(Status::NotFound));
    }
    raw.parse().map_err(|_| ApiError::NotFound.into_response())
}
