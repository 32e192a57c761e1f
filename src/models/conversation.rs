use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Conversation titles are the first characters of the opening message.
pub const TITLE_CHARS: usize = 40;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Ai,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub sender: Speaker,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            sender: Speaker::User,
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            sender: Speaker::Ai,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: Option<String>,
    #[serde(default)]
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
pub struct NewConversation<'a> {
    pub user_id: Uuid,
    pub title: String,
    pub messages: &'a [ChatMessage],
}

#[derive(Debug, Serialize)]
pub struct ConversationPatch<'a> {
    pub messages: &'a [ChatMessage],
    pub updated_at: DateTime<Utc>,
}

pub fn conversation_title(opening_message: &str) -> String {
    opening_message.chars().take(TITLE_CHARS).collect()
}
