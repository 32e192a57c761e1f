//! Router harness shared by handler tests.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tokio::sync::broadcast;
use tower::ServiceExt;
use uuid::Uuid;

use crate::backend::memory::MemoryBackend;
use crate::backend::{tables, Session};
use crate::config::Config;
use crate::routes::api_router;
use crate::AppState;

pub struct TestApp {
    pub router: Router,
    pub backend: Arc<MemoryBackend>,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let backend = Arc::new(MemoryBackend::new());
        let (ws_tx, _) = broadcast::channel(16);
        let state = AppState {
            backend: backend.clone(),
            config: Arc::new(Config::for_tests()),
            ws_tx,
        };
        Self {
            router: api_router(state.clone()),
            backend,
            state,
        }
    }

    pub async fn session(&self) -> Session {
        self.backend
            .create_account("ana@example.com", "segredo", "Ana")
            .await
    }

    pub async fn seed_profile(&self, user_id: Uuid, full_name: Option<&str>) {
        self.backend
            .seed_row(
                tables::PROFILES,
                json!({
                    "id": Uuid::new_v4(),
                    "user_id": user_id,
                    "full_name": full_name,
                    "created_at": "2026-01-01T08:00:00Z",
                    "updated_at": null,
                }),
            )
            .await;
    }
}

/// Drive one request through the router and decode the JSON reply.
/// An empty body comes back as `Value::Null`.
pub async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, value)
}
