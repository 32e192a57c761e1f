//! In-process stand-in for the hosted backend, used by router tests.

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{Backend, BackendError, BackendUser, RowQuery, Session, SignUpOutcome};

struct MemoryUser {
    user: BackendUser,
    password: String,
}

struct MemoryState {
    users: Vec<MemoryUser>,
    access_tokens: HashMap<String, Uuid>,
    refresh_tokens: HashMap<String, Uuid>,
    tables: HashMap<String, Vec<Value>>,
    failing_tables: HashSet<String>,
    clock: DateTime<Utc>,
}

pub struct MemoryBackend {
    state: Mutex<MemoryState>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn rejected(status: u16, message: &str) -> BackendError {
    BackendError::Status {
        status,
        message: message.to_string(),
    }
}

fn as_filter_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn matches(row: &Value, query: &RowQuery) -> bool {
    query.filters.iter().all(|(column, expected)| {
        row.get(column)
            .map(|actual| as_filter_text(actual) == *expected)
            .unwrap_or(false)
    })
}

impl MemoryState {
    fn issue_session(&mut self, user: &BackendUser) -> Session {
        let access_token = format!("access-{}", Uuid::new_v4());
        let refresh_token = format!("refresh-{}", Uuid::new_v4());
        self.access_tokens.insert(access_token.clone(), user.id);
        self.refresh_tokens.insert(refresh_token.clone(), user.id);
        Session {
            access_token,
            refresh_token,
            expires_in: 3600,
            user: user.clone(),
        }
    }

    fn user_by_id(&self, id: Uuid) -> Option<&BackendUser> {
        self.users.iter().map(|u| &u.user).find(|u| u.id == id)
    }

    /// Each write advances the clock one second so orderings are stable.
    fn tick(&mut self) -> String {
        self.clock = self.clock + Duration::seconds(1);
        self.clock.to_rfc3339()
    }

    fn check_table(&self, table: &str) -> Result<(), BackendError> {
        if self.failing_tables.contains(table) {
            return Err(rejected(503, "table unavailable"));
        }
        Ok(())
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MemoryState {
                users: Vec::new(),
                access_tokens: HashMap::new(),
                refresh_tokens: HashMap::new(),
                tables: HashMap::new(),
                failing_tables: HashSet::new(),
                clock: Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap(),
            }),
        }
    }

    /// Register a confirmed account and return a live session for it.
    pub async fn create_account(&self, email: &str, password: &str, full_name: &str) -> Session {
        let mut state = self.state.lock().await;
        let user = BackendUser {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
            user_metadata: json!({ "full_name": full_name }),
        };
        state.users.push(MemoryUser {
            user: user.clone(),
            password: password.to_string(),
        });
        state.issue_session(&user)
    }

    pub async fn seed_row(&self, table: &str, row: Value) {
        let mut state = self.state.lock().await;
        state.tables.entry(table.to_string()).or_default().push(row);
    }

    pub async fn rows(&self, table: &str) -> Vec<Value> {
        let state = self.state.lock().await;
        state.tables.get(table).cloned().unwrap_or_default()
    }

    pub async fn fail_table(&self, table: &str) {
        let mut state = self.state.lock().await;
        state.failing_tables.insert(table.to_string());
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        full_name: &str,
        _redirect_to: &str,
    ) -> Result<SignUpOutcome, BackendError> {
        let mut state = self.state.lock().await;
        if state
            .users
            .iter()
            .any(|u| u.user.email.as_deref() == Some(email))
        {
            return Err(rejected(422, "User already registered"));
        }

        let user = BackendUser {
            id: Uuid::new_v4(),
            email: Some(email.to_string()),
            user_metadata: json!({ "full_name": full_name }),
        };
        state.users.push(MemoryUser {
            user: user.clone(),
            password: password.to_string(),
        });
        Ok(SignUpOutcome::PendingConfirmation(user))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        let mut state = self.state.lock().await;
        let user = state
            .users
            .iter()
            .find(|u| u.user.email.as_deref() == Some(email) && u.password == password)
            .map(|u| u.user.clone())
            .ok_or_else(|| rejected(400, "Invalid login credentials"))?;
        Ok(state.issue_session(&user))
    }

    async fn refresh_session(&self, refresh_token: &str) -> Result<Session, BackendError> {
        let mut state = self.state.lock().await;
        let user_id = state
            .refresh_tokens
            .remove(refresh_token)
            .ok_or_else(|| rejected(400, "Invalid Refresh Token"))?;
        let user = state
            .user_by_id(user_id)
            .cloned()
            .ok_or_else(|| rejected(400, "User not found"))?;
        Ok(state.issue_session(&user))
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), BackendError> {
        let mut state = self.state.lock().await;
        let user_id = state
            .access_tokens
            .remove(access_token)
            .ok_or_else(|| rejected(401, "invalid JWT"))?;
        state.refresh_tokens.retain(|_, id| *id != user_id);
        Ok(())
    }

    async fn get_user(&self, access_token: &str) -> Result<BackendUser, BackendError> {
        let state = self.state.lock().await;
        state
            .access_tokens
            .get(access_token)
            .and_then(|id| state.user_by_id(*id))
            .cloned()
            .ok_or_else(|| rejected(401, "invalid JWT"))
    }

    async fn select(
        &self,
        query: &RowQuery,
        _access_token: &str,
    ) -> Result<Vec<Value>, BackendError> {
        let state = self.state.lock().await;
        state.check_table(query.table)?;

        let mut rows: Vec<Value> = state
            .tables
            .get(query.table)
            .map(|rows| rows.iter().filter(|r| matches(r, query)).cloned().collect())
            .unwrap_or_default();

        if let Some(order) = &query.order {
            rows.sort_by(|a, b| {
                let a = a.get(&order.column).map(as_filter_text).unwrap_or_default();
                let b = b.get(&order.column).map(as_filter_text).unwrap_or_default();
                if order.descending {
                    b.cmp(&a)
                } else {
                    a.cmp(&b)
                }
            });
        }
        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }
        Ok(rows)
    }

    async fn insert(
        &self,
        table: &'static str,
        mut row: Value,
        _access_token: &str,
    ) -> Result<Value, BackendError> {
        let mut state = self.state.lock().await;
        state.check_table(table)?;

        let now = state.tick();
        if let Some(obj) = row.as_object_mut() {
            obj.entry("id")
                .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
            obj.entry("created_at").or_insert_with(|| Value::String(now));
        }
        state
            .tables
            .entry(table.to_string())
            .or_default()
            .push(row.clone());
        Ok(row)
    }

    async fn update(
        &self,
        query: &RowQuery,
        patch: Value,
        _access_token: &str,
    ) -> Result<Vec<Value>, BackendError> {
        let mut state = self.state.lock().await;
        state.check_table(query.table)?;

        let mut updated = Vec::new();
        if let Some(rows) = state.tables.get_mut(query.table) {
            for row in rows.iter_mut().filter(|r| matches(r, query)) {
                if let (Some(target), Some(fields)) = (row.as_object_mut(), patch.as_object()) {
                    for (key, value) in fields {
                        target.insert(key.clone(), value.clone());
                    }
                }
                updated.push(row.clone());
            }
        }
        Ok(updated)
    }

    async fn health(&self) -> Result<(), BackendError> {
        Ok(())
    }
}
