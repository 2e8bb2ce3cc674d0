#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use dapur_core::{Role, User};
use dapur_server::auth::create_session;
use dapur_server::storage::ThumbnailStorage;
use dapur_server::store::{MemoryStore, RecipeStore, UserStore};
use dapur_server::{app, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const PUBLIC_URL: &str = "http://localhost:3000";
pub const BOUNDARY: &str = "dapur-test-boundary";

pub const PNG_BYTES: &[u8] = &[
    0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D, b'I', b'H', b'D', b'R',
];
pub const GIF_BYTES: &[u8] = b"GIF89a\x01\x00\x01\x00\x00\x00\x00";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub storage_dir: TempDir,
    pub category_id: i64,
}

impl TestApp {
    pub async fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let category = store.create_category("Main Course").await.unwrap();
        let storage_dir = tempfile::tempdir().unwrap();
        let thumbnails = ThumbnailStorage::new(storage_dir.path(), PUBLIC_URL);
        let router = app(AppState::new(store.clone(), thumbnails));

        TestApp {
            router,
            store,
            storage_dir,
            category_id: category.id,
        }
    }

    /// Create a user with an open session and return it with its bearer token.
    pub async fn user(&self, username: &str, role: Role) -> (User, String) {
        let user = self
            .store
            .create_user(username, "unused", role)
            .await
            .unwrap();
        let token = create_session(self.store.as_ref(), user.id).await.unwrap();
        (user, token)
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method("DELETE").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn create_json(&self, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/v1/recipes")
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn create_multipart<V: AsRef<str>>(
        &self,
        token: &str,
        fields: &[(&str, V)],
        file: Option<(&str, &[u8])>,
    ) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/v1/recipes")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(fields, file)))
            .unwrap();
        self.send(request).await
    }

    /// A complete, valid create payload for `title`.
    pub fn recipe_json(&self, title: &str) -> Value {
        json!({
            "title": title,
            "category_id": self.category_id,
            "energy": 520,
            "carbohydrate": 70.5,
            "protein": "14",
            "ingredients": "rice, egg, shallots",
            "method": "Fry everything on high heat.",
            "tips": "Use day-old rice.",
        })
    }

    pub fn recipe_fields(&self, title: &str) -> Vec<(&'static str, String)> {
        vec![
            ("title", title.to_string()),
            ("category_id", self.category_id.to_string()),
            ("energy", "520".to_string()),
            ("carbohydrate", "70.5".to_string()),
            ("protein", "14".to_string()),
            ("ingredients", "rice, egg, shallots".to_string()),
            ("method", "Fry everything on high heat.".to_string()),
            ("tips", "Use day-old rice.".to_string()),
        ]
    }
}

pub fn multipart_body<V: AsRef<str>>(fields: &[(&str, V)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        let value = value.as_ref();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((file_name, data)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"thumbnail\"; filename=\"{file_name}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}
