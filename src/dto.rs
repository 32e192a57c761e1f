//! # Mindspace — Request/Response DTOs
//!
//! API contract types in one module.
//!
//! Conventions:
//! - `*Request`  → deserialized from client JSON body or query params
//! - `*Response` → serialized to client JSON
//! - "Required field" checks are expressed via `validator` derive macros;
//!   score fields are passed through unchecked

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::backend::{BackendUser, Session};
use crate::models::conversation::ChatMessage;
use crate::models::journal::JournalEntryView;
use crate::models::profile::Profile;
use crate::services::chat::ReplyTopic;
use crate::services::crisis::CrisisAssessment;

/// Rejects strings that are empty once trimmed.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

// ============================================================================
// Common
// ============================================================================

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

// ============================================================================
// Auth
// ============================================================================

/// POST /api/auth/signup
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    #[validate(custom(function = "not_blank", message = "Name is required"))]
    pub full_name: String,
}

/// POST /api/auth/login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// POST /api/auth/refresh
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub message: String,
    /// Present only when the backend confirmed the account immediately.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<Session>,
    pub user: BackendUser,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: Session,
    pub profile: Option<Profile>,
}

/// GET /api/me
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub profile: Option<Profile>,
}

// ============================================================================
// Overview
// ============================================================================

#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub name: String,
    pub encouragement: crate::services::encouragement::Encouragement,
    pub tip: &'static str,
}

// ============================================================================
// Journal
// ============================================================================

/// POST /api/journal
#[derive(Debug, Deserialize, Validate)]
pub struct CreateJournalEntryRequest {
    #[validate(custom(function = "not_blank", message = "Content is required"))]
    pub content: String,
    pub mood_score: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct JournalQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct JournalFeedResponse {
    pub entries: Vec<JournalEntryView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crisis: Option<CrisisAssessment>,
}

// ============================================================================
// Tasks
// ============================================================================

/// POST /api/tasks
#[derive(Debug, Deserialize, Validate)]
pub struct CreateTaskRequest {
    #[validate(custom(function = "not_blank", message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub effort_score: Option<i32>,
}

// ============================================================================
// Goals
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct GoalsQuery {
    pub energy: Option<i32>,
    pub mood: Option<i32>,
}

// ============================================================================
// Safety net
// ============================================================================

/// POST /api/safenet/check
#[derive(Debug, Deserialize)]
pub struct CrisisCheckRequest {
    pub content: Option<String>,
    pub mood_score: Option<i32>,
}

// ============================================================================
// Clarity
// ============================================================================

/// POST /api/clarity/chat
#[derive(Debug, Deserialize, Validate)]
pub struct ChatRequest {
    #[validate(custom(function = "not_blank", message = "Message is required"))]
    pub message: String,
    pub conversation_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    /// Absent when the conversation could not be saved.
    pub conversation_id: Option<Uuid>,
    pub topic: ReplyTopic,
    pub reply: String,
    pub messages: Vec<ChatMessage>,
}

/// POST /api/clarity/reflection
#[derive(Debug, Deserialize, Validate)]
pub struct ReflectionRequest {
    pub step: usize,
    #[validate(custom(function = "not_blank", message = "Answer is required"))]
    pub answer: String,
}

/// POST /api/clarity/brain-dump
#[derive(Debug, Deserialize)]
pub struct BrainDumpRequest {
    pub text: String,
}

/// POST /api/clarity/values
#[derive(Debug, Deserialize)]
pub struct ValueChoicesRequest {
    pub choices: Vec<String>,
}
