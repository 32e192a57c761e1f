//! HTTP client for a Supabase-compatible backend.
//!
//! Auth calls go to `{url}/auth/v1/*`, row calls to `{url}/rest/v1/{table}`.
//! Every request carries the anonymous key in `apikey`; row calls add the
//! caller's session as the bearer so the backend's row-level policies apply.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;

use super::{Backend, BackendError, BackendUser, RowQuery, Session, SignUpOutcome};
use crate::config::Config;

pub struct SupabaseBackend {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseBackend {
    pub fn new(config: &Config) -> Result<Self, BackendError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.backend_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.supabase_url.clone(),
            anon_key: config.supabase_anon_key.clone(),
        })
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn request(&self, method: Method, url: String, bearer: Option<&str>) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer.unwrap_or(&self.anon_key))
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    if !response.status().is_success() {
        return Err(error_from_response(response).await);
    }
    response
        .json::<T>()
        .await
        .map_err(|e| BackendError::Decode(e.to_string()))
}

async fn error_from_response(response: Response) -> BackendError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    BackendError::Status {
        status,
        message: extract_error_message(&body),
    }
}

/// Auth and row APIs disagree on where the message lives.
pub(crate) fn extract_error_message(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        for key in ["msg", "message", "error_description", "error"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
    }
    body.trim().to_string()
}

/// The signup endpoint returns a full session when the account is confirmed
/// on creation and a bare user object otherwise.
pub(crate) fn parse_sign_up(body: Value) -> Result<SignUpOutcome, BackendError> {
    if body.get("access_token").is_some() {
        let session: Session =
            serde_json::from_value(body).map_err(|e| BackendError::Decode(e.to_string()))?;
        return Ok(SignUpOutcome::Session(session));
    }

    let user = match body.get("user") {
        Some(user) if !user.is_null() => user.clone(),
        _ => body,
    };
    let user: BackendUser =
        serde_json::from_value(user).map_err(|e| BackendError::Decode(e.to_string()))?;
    Ok(SignUpOutcome::PendingConfirmation(user))
}

#[async_trait]
impl Backend for SupabaseBackend {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        redirect_to: &str,
    ) -> Result<SignUpOutcome, BackendError> {
        let response = self
            .request(Method::POST, self.auth_url("signup"), None)
            .query(&[("redirect_to", redirect_to)])
            .json(&json!({
                "email": email,
                "password": password,
                "data": { "full_name": full_name },
            }))
            .send()
            .await?;

        parse_sign_up(read_json(response).await?)
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        let response = self
            .request(Method::POST, self.auth_url("token"), None)
            .query(&[("grant_type", "password")])
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;

        read_json(response).await
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, BackendError> {
        let response = self
            .request(Method::POST, self.auth_url("token"), None)
            .query(&[("grant_type", "refresh_token")])
            .json(&json!({ "refresh_token": refresh_token }))
            .send()
            .await?;

        read_json(response).await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let response = self
            .request(Method::POST, self.auth_url("logout"), Some(access_token))
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }

    async fn get_user(&self, access_token: &str) -> Result<BackendUser, BackendError> {
        let response = self
            .request(Method::GET, self.auth_url("user"), Some(access_token))
            .send()
            .await?;

        read_json(response).await
    }

    async fn select(
        &self,
        query: &RowQuery,
        access_token: &str,
    ) -> Result<Vec<Value>, BackendError> {
        let response = self
            .request(Method::GET, self.rest_url(query.table), Some(access_token))
            .query(&query.to_query_pairs())
            .send()
            .await?;

        read_json(response).await
    }

    async fn insert(
        &self,
        table: &'static str,
        row: Value,
        access_token: &str,
    ) -> Result<Value, BackendError> {
        let response = self
            .request(Method::POST, self.rest_url(table), Some(access_token))
            .header("Prefer", "return=representation")
            .json(&row)
            .send()
            .await?;

        let mut rows: Vec<Value> = read_json(response).await?;
        if rows.is_empty() {
            return Err(BackendError::Decode(format!(
                "insert into {} returned no rows",
                table
            )));
        }
        Ok(rows.remove(0))
    }

    async fn update(
        &self,
        query: &RowQuery,
        patch: Value,
        access_token: &str,
    ) -> Result<Vec<Value>, BackendError> {
        // PATCH takes filters only; select/order/limit do not apply.
        let filters: Vec<(String, String)> = query
            .filters
            .iter()
            .map(|(column, value)| (column.clone(), format!("eq.{}", value)))
            .collect();

        let response = self
            .request(Method::PATCH, self.rest_url(query.table), Some(access_token))
            .header("Prefer", "return=representation")
            .query(&filters)
            .json(&patch)
            .send()
            .await?;

        read_json(response).await
    }

    async fn health(&self) -> Result<(), BackendError> {
        let response = self
            .request(Method::GET, self.auth_url("health"), None)
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(error_from_response(response).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Bytes,
        extract::{Query, State},
        http::{HeaderMap, Method as HttpMethod, StatusCode, Uri},
        Json, Router,
    };
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use uuid::Uuid;

    use crate::backend::tables;

    #[derive(Debug, Clone)]
    struct Recorded {
        method: HttpMethod,
        path: String,
        query: Vec<(String, String)>,
        headers: HeaderMap,
        body: Value,
    }

    impl Recorded {
        fn header(&self, name: &str) -> Option<&str> {
            self.headers.get(name).and_then(|v| v.to_str().ok())
        }
    }

    #[derive(Clone)]
    struct Stub {
        seen: Arc<Mutex<Vec<Recorded>>>,
        status: StatusCode,
        reply: Value,
    }

    async fn record(
        State(stub): State<Stub>,
        method: HttpMethod,
        uri: Uri,
        headers: HeaderMap,
        Query(query): Query<Vec<(String, String)>>,
        body: Bytes,
    ) -> (StatusCode, Json<Value>) {
        stub.seen.lock().await.push(Recorded {
            method,
            path: uri.path().to_string(),
            query,
            headers,
            body: serde_json::from_slice(&body).unwrap_or(Value::Null),
        });
        (stub.status, Json(stub.reply.clone()))
    }

    /// A local server answering every request with `reply`, plus the log
    /// of what it received.
    async fn stub_backend(
        status: StatusCode,
        reply: Value,
    ) -> (SupabaseBackend, Arc<Mutex<Vec<Recorded>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new().fallback(record).with_state(Stub {
            seen: seen.clone(),
            status,
            reply,
        });

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let mut config = Config::for_tests();
        config.supabase_url = format!("http://{addr}");
        (SupabaseBackend::new(&config).unwrap(), seen)
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn session_body() -> Value {
        json!({
            "access_token": "access",
            "refresh_token": "refresh",
            "expires_in": 3600,
            "token_type": "bearer",
            "user": {
                "id": "7f0c3c1e-2f59-4c5e-9d55-0e8a1b2c3d4e",
                "email": "ana@example.com",
                "user_metadata": { "full_name": "Ana" }
            }
        })
    }

    #[tokio::test]
    async fn test_sign_up_request_shape() {
        let (backend, seen) = stub_backend(
            StatusCode::OK,
            json!({ "id": "7f0c3c1e-2f59-4c5e-9d55-0e8a1b2c3d4e", "email": "ana@example.com" }),
        )
        .await;

        let outcome = backend
            .sign_up("ana@example.com", "segredo", "Ana", "http://localhost:5173/")
            .await
            .unwrap();
        assert!(matches!(outcome, SignUpOutcome::PendingConfirmation(_)));

        let seen = seen.lock().await;
        let req = &seen[0];
        assert_eq!(req.method, HttpMethod::POST);
        assert_eq!(req.path, "/auth/v1/signup");
        assert_eq!(req.query, pairs(&[("redirect_to", "http://localhost:5173/")]));
        assert_eq!(req.body["email"], "ana@example.com");
        assert_eq!(req.body["data"]["full_name"], "Ana");
        assert_eq!(req.header("apikey"), Some("anon-key"));
        assert_eq!(req.header("authorization"), Some("Bearer anon-key"));
    }

    #[tokio::test]
    async fn test_token_grants() {
        let (backend, seen) = stub_backend(StatusCode::OK, session_body()).await;

        let session = backend
            .sign_in_with_password("ana@example.com", "segredo")
            .await
            .unwrap();
        assert_eq!(session.access_token, "access");
        backend.refresh_session("refresh").await.unwrap();

        let seen = seen.lock().await;
        assert_eq!(seen[0].path, "/auth/v1/token");
        assert_eq!(seen[0].query, pairs(&[("grant_type", "password")]));
        assert_eq!(seen[0].body["password"], "segredo");

        assert_eq!(seen[1].path, "/auth/v1/token");
        assert_eq!(seen[1].query, pairs(&[("grant_type", "refresh_token")]));
        assert_eq!(seen[1].body["refresh_token"], "refresh");
    }

    #[tokio::test]
    async fn test_row_calls_use_session_bearer() {
        let (backend, seen) = stub_backend(StatusCode::OK, json!([])).await;
        let user_id = Uuid::nil();
        let query = RowQuery::table(tables::JOURNAL_ENTRIES)
            .eq("user_id", user_id)
            .order_desc("created_at")
            .limit(5);

        let rows = backend.select(&query, "user-token").await.unwrap();
        assert!(rows.is_empty());

        let seen = seen.lock().await;
        let req = &seen[0];
        assert_eq!(req.method, HttpMethod::GET);
        assert_eq!(req.path, "/rest/v1/journal_entries");
        assert_eq!(req.query, query.to_query_pairs());
        assert_eq!(req.header("apikey"), Some("anon-key"));
        assert_eq!(req.header("authorization"), Some("Bearer user-token"));
    }

    #[tokio::test]
    async fn test_insert_asks_for_representation() {
        let row = json!({ "id": "1", "title": "ler" });
        let (backend, seen) = stub_backend(StatusCode::CREATED, json!([row.clone()])).await;

        let inserted = backend
            .insert(tables::TASKS, json!({ "title": "ler" }), "user-token")
            .await
            .unwrap();
        assert_eq!(inserted, row);

        let seen = seen.lock().await;
        assert_eq!(seen[0].method, HttpMethod::POST);
        assert_eq!(seen[0].path, "/rest/v1/tasks");
        assert_eq!(seen[0].header("prefer"), Some("return=representation"));
        assert_eq!(seen[0].body["title"], "ler");
    }

    #[tokio::test]
    async fn test_insert_without_returned_row_is_an_error() {
        let (backend, _) = stub_backend(StatusCode::CREATED, json!([])).await;
        let err = backend
            .insert(tables::TASKS, json!({ "title": "ler" }), "user-token")
            .await
            .unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[tokio::test]
    async fn test_update_sends_filters_only() {
        let (backend, seen) = stub_backend(StatusCode::OK, json!([])).await;
        let query = RowQuery::table(tables::TASKS)
            .eq("id", "42")
            .eq("user_id", "7")
            .order_desc("created_at")
            .limit(1);

        backend
            .update(&query, json!({ "completed": true }), "user-token")
            .await
            .unwrap();

        let seen = seen.lock().await;
        let req = &seen[0];
        assert_eq!(req.method, HttpMethod::PATCH);
        assert_eq!(req.query, pairs(&[("id", "eq.42"), ("user_id", "eq.7")]));
        assert_eq!(req.header("prefer"), Some("return=representation"));
        assert_eq!(req.body, json!({ "completed": true }));
    }

    #[tokio::test]
    async fn test_rejections_carry_status_and_message() {
        let (backend, _) = stub_backend(
            StatusCode::BAD_REQUEST,
            json!({ "error": "invalid_grant", "msg": "Invalid login credentials" }),
        )
        .await;

        match backend.sign_in_with_password("ana@example.com", "x").await {
            Err(BackendError::Status { status, message }) => {
                assert_eq!(status, 400);
                assert_eq!(message, "Invalid login credentials");
            }
            other => panic!("expected a status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_expired_session_is_unauthorized() {
        let (backend, seen) =
            stub_backend(StatusCode::UNAUTHORIZED, json!({ "msg": "invalid JWT" })).await;

        let err = backend.get_user("stale-token").await.unwrap_err();
        assert!(err.is_unauthorized());

        let seen = seen.lock().await;
        assert_eq!(seen[0].path, "/auth/v1/user");
        assert_eq!(seen[0].header("authorization"), Some("Bearer stale-token"));
    }

    #[test]
    fn test_extract_error_message_prefers_msg() {
        let body = r#"{"code":400,"msg":"Invalid login credentials"}"#;
        assert_eq!(extract_error_message(body), "Invalid login credentials");
    }

    #[test]
    fn test_extract_error_message_row_api_shape() {
        let body = r#"{"code":"42501","details":null,"hint":null,"message":"permission denied for table tasks"}"#;
        assert_eq!(
            extract_error_message(body),
            "permission denied for table tasks"
        );
    }

    #[test]
    fn test_extract_error_message_oauth_shape() {
        let body = r#"{"error":"invalid_grant","error_description":"Email not confirmed"}"#;
        assert_eq!(extract_error_message(body), "Email not confirmed");
    }

    #[test]
    fn test_extract_error_message_plain_text() {
        assert_eq!(extract_error_message("  upstream timeout \n"), "upstream timeout");
    }

    #[test]
    fn test_parse_sign_up_with_session() {
        let body = json!({
            "access_token": "access",
            "refresh_token": "refresh",
            "expires_in": 3600,
            "token_type": "bearer",
            "user": {
                "id": "7f0c3c1e-2f59-4c5e-9d55-0e8a1b2c3d4e",
                "email": "ana@example.com",
                "user_metadata": { "full_name": "Ana" }
            }
        });

        match parse_sign_up(body).unwrap() {
            SignUpOutcome::Session(session) => {
                assert_eq!(session.access_token, "access");
                assert_eq!(session.user.full_name(), Some("Ana"));
            }
            other => panic!("expected a session, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_sign_up_pending_confirmation() {
        let body = json!({
            "id": "7f0c3c1e-2f59-4c5e-9d55-0e8a1b2c3d4e",
            "email": "ana@example.com",
            "confirmation_sent_at": "2026-10-16T10:00:00Z"
        });

        match parse_sign_up(body).unwrap() {
            SignUpOutcome::PendingConfirmation(user) => {
                assert_eq!(user.email.as_deref(), Some("ana@example.com"));
            }
            other => panic!("expected pending confirmation, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_sign_up_rejects_garbage() {
        assert!(parse_sign_up(json!({ "unexpected": true })).is_err());
    }
}
