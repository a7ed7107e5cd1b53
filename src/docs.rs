//! API documentation: an OpenAPI 3 document and a Swagger UI page that
//! renders it.

use serde_json::{Value, json};

use crate::request::Request;
use crate::response::{ContentType, IntoResponse, Json, Response};

/// Where the interactive documentation page is served.
pub const DOCS_PATH: &str = "/api/docs";

/// Where the OpenAPI document is served.
pub const DOCUMENT_PATH: &str = "/static/masterblog.json";

const APP_NAME: &str = "Masterblog API";

/// `GET /api/docs`
pub async fn page(_req: Request) -> Response {
    let html = format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{APP_NAME}</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {{
            window.ui = SwaggerUIBundle({{ url: "{DOCUMENT_PATH}", dom_id: "#swagger-ui" }});
        }};
    </script>
</body>
</html>"##
    );
    Response::builder().bytes(ContentType::Html, html.into_bytes())
}

/// `GET /static/masterblog.json`
pub async fn document(_req: Request) -> Response {
    Json(openapi()).into_response()
}

fn openapi() -> Value {
    let post = json!({
        "type": "object",
        "required": ["id", "title", "content"],
        "properties": {
            "id": { "type": "integer", "minimum": 1 },
            "title": { "type": "string" },
            "content": { "type": "string" }
        }
    });
    let post_list = json!({ "type": "array", "items": { "$ref": "#/components/schemas/Post" } });
    let error = |description: &str| json!({
        "description": description,
        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Error" } } }
    });
    let posts = |description: &str| json!({
        "description": description,
        "content": { "application/json": { "schema": post_list } }
    });
    let id_param = json!({
        "name": "id", "in": "path", "required": true,
        "schema": { "type": "integer" }
    });
    let body = json!({
        "required": true,
        "content": { "application/json": { "schema": {
            "type": "object",
            "properties": { "title": { "type": "string" }, "content": { "type": "string" } }
        } } }
    });

    json!({
        "openapi": "3.0.3",
        "info": { "title": APP_NAME, "version": env!("CARGO_PKG_VERSION") },
        "paths": {
            "/api/posts": {
                "get": {
                    "summary": "List posts, optionally sorted",
                    "description": "Rate limited per client address (10 per minute by default), one budget shared with POST.",
                    "parameters": [
                        { "name": "sort", "in": "query", "schema": { "type": "string", "enum": ["title", "content"] } },
                        { "name": "direction", "in": "query", "schema": { "type": "string", "enum": ["asc", "desc"], "default": "asc" } }
                    ],
                    "responses": {
                        "200": posts("All posts, in stored order unless `sort` names a field"),
                        "429": { "description": "Too many requests" }
                    }
                },
                "post": {
                    "summary": "Create a post",
                    "description": "Returns the entire collection, not just the new post. The new post is appended last and its id is one above the highest id ever assigned.",
                    "requestBody": body,
                    "responses": {
                        "200": posts("The whole collection after the insert"),
                        "400": error("No data provided / No title provided / No content provided"),
                        "429": { "description": "Too many requests" }
                    }
                }
            },
            "/api/posts/search": {
                "get": {
                    "summary": "Search titles and contents",
                    "parameters": [
                        { "name": "query", "in": "query", "schema": { "type": "string", "default": "" } }
                    ],
                    "responses": {
                        "200": posts("Matching posts in stored order"),
                        "404": error("Nothing matched")
                    }
                }
            },
            "/api/posts/{id}": {
                "put": {
                    "summary": "Update a post",
                    "description": "Fields absent from the body keep their values. Empty strings are accepted.",
                    "parameters": [id_param],
                    "requestBody": body,
                    "responses": {
                        "200": { "description": "The updated post", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Post" } } } },
                        "400": error("No data provided"),
                        "404": error("Post not found")
                    }
                },
                "delete": {
                    "summary": "Delete a post",
                    "parameters": [id_param],
                    "responses": {
                        "200": { "description": "Post deleted successfully" },
                        "404": error("Post not found")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                "Post": post,
                "Error": {
                    "type": "object",
                    "properties": { "error": { "type": "string" } }
                }
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;

    use bytes::Bytes;

    use super::*;
    use crate::method::Method;

    fn request(path: &str) -> Request {
        let peer: SocketAddr = "127.0.0.1:1".parse().unwrap();
        Request::from_target(Method::Get, path, Vec::new(), Bytes::new(), peer)
    }

    #[tokio::test]
    async fn document_covers_every_route() {
        let res = document(request(DOCUMENT_PATH)).await;
        assert_eq!(res.status_code(), 200);

        let doc: Value = serde_json::from_slice(res.body()).unwrap();
        let paths = doc["paths"].as_object().unwrap();
        assert!(paths["/api/posts"].get("get").is_some());
        assert!(paths["/api/posts"].get("post").is_some());
        assert!(paths["/api/posts/search"].get("get").is_some());
        assert!(paths["/api/posts/{id}"].get("put").is_some());
        assert!(paths["/api/posts/{id}"].get("delete").is_some());
        assert!(paths["/api/posts"]["post"]["description"].as_str().unwrap().contains("entire collection"));
    }

    #[tokio::test]
    async fn page_points_at_document() {
        let res = page(request(DOCS_PATH)).await;
        assert_eq!(res.header("content-type"), Some("text/html; charset=utf-8"));
        assert!(String::from_utf8_lossy(res.body()).contains(DOCUMENT_PATH));
    }
}
