use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row per user; the backend owns that constraint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: Uuid,
    pub user_id: Uuid,
    pub full_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Profile {
    /// Name used in greetings, falling back to a warm default.
    pub fn display_name(profile: Option<&Profile>) -> &str {
        profile
            .and_then(|p| p.full_name.as_deref())
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_DISPLAY_NAME)
    }
}

pub const DEFAULT_DISPLAY_NAME: &str = "pessoa incrível";
