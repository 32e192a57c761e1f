//! # Backend-as-a-service access
//!
//! Authentication and row storage live in a hosted backend (GoTrue-style auth
//! API plus a PostgREST-style row API). Handlers only see the [`Backend`]
//! trait; [`supabase::SupabaseBackend`] is the HTTP implementation.
//!
//! Row access is deliberately thin: equality filters, one ordering column and
//! a row-count limit. Rows travel as `serde_json::Value` through the trait and
//! are decoded into model types by the `*_rows` helpers below.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

#[cfg(test)]
pub mod memory;
pub mod supabase;

pub mod tables {
    pub const PROFILES: &str = "profiles";
    pub const JOURNAL_ENTRIES: &str = "journal_entries";
    pub const TASKS: &str = "tasks";
    pub const AI_CONVERSATIONS: &str = "ai_conversations";
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("row not found")]
    NotFound,
}

impl BackendError {
    /// The human-readable message the backend attached to a rejection, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            BackendError::Status { message, .. } => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, BackendError::Status { status: 401 | 403, .. })
    }
}

/// An authenticated account as the backend reports it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendUser {
    pub id: Uuid,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub user_metadata: Value,
}

impl BackendUser {
    pub fn full_name(&self) -> Option<&str> {
        self.user_metadata.get("full_name").and_then(|v| v.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub user: BackendUser,
}

/// Account creation either signs the user in right away or waits for the
/// confirmation email.
#[derive(Debug, Clone)]
pub enum SignUpOutcome {
    Session(Session),
    PendingConfirmation(BackendUser),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub column: String,
    pub descending: bool,
}

/// A read/update target: one table narrowed by equality filters.
#[derive(Debug, Clone, PartialEq)]
pub struct RowQuery {
    pub table: &'static str,
    pub filters: Vec<(String, String)>,
    pub order: Option<Order>,
    pub limit: Option<usize>,
}

impl RowQuery {
    pub fn table(table: &'static str) -> Self {
        Self {
            table,
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn eq(mut self, column: &str, value: impl ToString) -> Self {
        self.filters.push((column.to_string(), value.to_string()));
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            descending: true,
        });
        self
    }

    pub fn order_asc(mut self, column: &str) -> Self {
        self.order = Some(Order {
            column: column.to_string(),
            descending: false,
        });
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// PostgREST query-string pairs, e.g. `user_id=eq.<id>&order=created_at.desc`.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), "*".to_string())];
        for (column, value) in &self.filters {
            pairs.push((column.clone(), format!("eq.{}", value)));
        }
        if let Some(order) = &self.order {
            let direction = if order.descending { "desc" } else { "asc" };
            pairs.push(("order".into(), format!("{}.{}", order.column, direction)));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".into(), limit.to_string()));
        }
        pairs
    }
}

#[async_trait]
pub trait Backend: Send + Sync {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        redirect_to: &str,
    ) -> Result<SignUpOutcome, BackendError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError>;

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, BackendError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError>;

    async fn get_user(&self, access_token: &str) -> Result<BackendUser, BackendError>;

    async fn select(&self, query: &RowQuery, access_token: &str)
        -> Result<Vec<Value>, BackendError>;

    async fn insert(
        &self,
        table: &'static str,
        row: Value,
        access_token: &str,
    ) -> Result<Value, BackendError>;

    async fn update(
        &self,
        query: &RowQuery,
        patch: Value,
        access_token: &str,
    ) -> Result<Vec<Value>, BackendError>;

    async fn health(&self) -> Result<(), BackendError>;
}

fn decode_row<T: DeserializeOwned>(row: Value) -> Result<T, BackendError> {
    serde_json::from_value(row).map_err(|e| BackendError::Decode(e.to_string()))
}

fn encode_row<R: Serialize>(row: &R) -> Result<Value, BackendError> {
    serde_json::to_value(row).map_err(|e| BackendError::Decode(e.to_string()))
}

pub async fn fetch_rows<T: DeserializeOwned>(
    backend: &dyn Backend,
    query: &RowQuery,
    access_token: &str,
) -> Result<Vec<T>, BackendError> {
    backend
        .select(query, access_token)
        .await?
        .into_iter()
        .map(decode_row)
        .collect()
}

/// Exactly one matching row, otherwise an error.
pub async fn fetch_single<T: DeserializeOwned>(
    backend: &dyn Backend,
    query: &RowQuery,
    access_token: &str,
) -> Result<T, BackendError> {
    let mut rows = backend.select(query, access_token).await?;
    match rows.len() {
        0 => Err(BackendError::NotFound),
        1 => decode_row(rows.remove(0)),
        n => Err(BackendError::Decode(format!(
            "expected a single row from {}, got {}",
            query.table, n
        ))),
    }
}

pub async fn insert_row<T: DeserializeOwned, R: Serialize>(
    backend: &dyn Backend,
    table: &'static str,
    row: &R,
    access_token: &str,
) -> Result<T, BackendError> {
    let inserted = backend.insert(table, encode_row(row)?, access_token).await?;
    decode_row(inserted)
}

pub async fn update_rows<T: DeserializeOwned, P: Serialize>(
    backend: &dyn Backend,
    query: &RowQuery,
    patch: &P,
    access_token: &str,
) -> Result<Vec<T>, BackendError> {
    backend
        .update(query, encode_row(patch)?, access_token)
        .await?
        .into_iter()
        .map(decode_row)
        .collect()
}
