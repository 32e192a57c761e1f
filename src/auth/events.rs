//! Session-change notifications.
//!
//! Sign-in, refresh and sign-out publish a [`SessionEvent`] on the shared
//! broadcast channel; `/ws` subscribers receive the events for their own
//! user only.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::backend::BackendUser;
use crate::models::profile::Profile;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionEventKind {
    InitialSession,
    SignedIn,
    TokenRefreshed,
    SignedOut,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionEvent {
    pub user_id: Uuid,
    pub event: SessionEventKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<BackendUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Profile>,
    pub at: DateTime<Utc>,
}

impl SessionEvent {
    pub fn new(user_id: Uuid, event: SessionEventKind) -> Self {
        Self {
            user_id,
            event,
            user: None,
            profile: None,
            at: Utc::now(),
        }
    }

    pub fn with_user(mut self, user: BackendUser) -> Self {
        self.user = Some(user);
        self
    }

    pub fn with_profile(mut self, profile: Option<Profile>) -> Self {
        self.profile = profile;
        self
    }
}

/// Fire-and-forget: no subscribers is not an error.
pub fn publish(tx: &broadcast::Sender<String>, event: &SessionEvent) {
    match serde_json::to_string(event) {
        Ok(payload) => {
            let receivers = tx.send(payload).unwrap_or(0);
            tracing::debug!(
                user_id = %event.user_id,
                event = ?event.event,
                receivers,
                "Session event published"
            );
        }
        Err(e) => tracing::warn!(error = %e, "Failed to encode session event"),
    }
}

/// Whether a broadcast payload belongs to `user_id`.
pub fn is_for_user(payload: &str, user_id: Uuid) -> bool {
    serde_json::from_str::<SessionEvent>(payload)
        .map(|event| event.user_id == user_id)
        .unwrap_or(false)
}
