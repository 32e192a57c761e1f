use axum::{extract::State, Extension, Json};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::backend::{self, tables, BackendError, RowQuery};
use crate::dto::{
    BrainDumpRequest, ChatRequest, ChatResponse, MessageResponse, ReflectionRequest,
    ValueChoicesRequest,
};
use crate::error::{AppError, AppResult};
use crate::models::conversation::{
    conversation_title, ChatMessage, Conversation, ConversationPatch, NewConversation,
};
use crate::services::brain_dump::{self, OrganizedThoughts};
use crate::services::chat::{self, GREETING};
use crate::services::reflection::{self, ReflectionOutcome, ReflectionStep, REFLECTION_PATH};
use crate::services::values::{self, ValuePair, ValueResults, VALUE_PAIRS};
use crate::AppState;

// ── Chat ─────────────────────────────────────────────────────────────────

pub async fn chat_greeting() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: GREETING.into(),
    })
}

/// Saving the log is best-effort: a failed write is logged and the reply is
/// still returned, without a conversation id.
async fn start_conversation(
    state: &AppState,
    auth_user: &AuthUser,
    opening: &str,
    messages: Vec<ChatMessage>,
) -> (Option<Uuid>, Vec<ChatMessage>) {
    let new_conversation = NewConversation {
        user_id: auth_user.id,
        title: conversation_title(opening),
        messages: &messages,
    };

    let saved: Result<Conversation, BackendError> = backend::insert_row(
        state.backend.as_ref(),
        tables::AI_CONVERSATIONS,
        &new_conversation,
        &auth_user.access_token,
    )
    .await;

    match saved {
        Ok(conversation) => (Some(conversation.id), messages),
        Err(e) => {
            tracing::error!(user_id = %auth_user.id, error = %e, "Failed to save conversation");
            (None, messages)
        }
    }
}

async fn continue_conversation(
    state: &AppState,
    auth_user: &AuthUser,
    conversation_id: Uuid,
    exchange: [ChatMessage; 2],
) -> (Option<Uuid>, Vec<ChatMessage>) {
    let query = RowQuery::table(tables::AI_CONVERSATIONS)
        .eq("id", conversation_id)
        .eq("user_id", auth_user.id);

    let existing = backend::fetch_single::<Conversation>(
        state.backend.as_ref(),
        &query,
        &auth_user.access_token,
    )
    .await;

    let mut messages = match existing {
        Ok(conversation) => conversation.messages,
        Err(BackendError::NotFound) => {
            tracing::warn!(conversation_id = %conversation_id, user_id = %auth_user.id, "Conversation not found, reply not saved");
            return (None, exchange.to_vec());
        }
        Err(e) => {
            tracing::error!(conversation_id = %conversation_id, error = %e, "Failed to load conversation");
            return (Some(conversation_id), exchange.to_vec());
        }
    };
    messages.extend(exchange);

    let patch = ConversationPatch {
        messages: &messages,
        updated_at: Utc::now(),
    };
    if let Err(e) = backend::update_rows::<Conversation, _>(
        state.backend.as_ref(),
        &query,
        &patch,
        &auth_user.access_token,
    )
    .await
    {
        tracing::error!(conversation_id = %conversation_id, error = %e, "Failed to update conversation");
    }

    (Some(conversation_id), messages)
}

pub async fn chat(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<ChatRequest>,
) -> AppResult<Json<ChatResponse>> {
    body.validate()?;

    let reply = chat::reply_to(&body.message, &mut rand::thread_rng());
    let exchange = [
        ChatMessage::user(body.message.clone()),
        ChatMessage::ai(reply.content),
    ];

    let (conversation_id, messages) = match body.conversation_id {
        Some(id) => continue_conversation(&state, &auth_user, id, exchange).await,
        None => {
            let mut messages = vec![ChatMessage::ai(GREETING)];
            messages.extend(exchange);
            start_conversation(&state, &auth_user, &body.message, messages).await
        }
    };

    Ok(Json(ChatResponse {
        conversation_id,
        topic: reply.topic,
        reply: reply.content.to_string(),
        messages,
    }))
}

// ── Guided reflection ────────────────────────────────────────────────────

pub async fn reflection_steps() -> Json<&'static [ReflectionStep]> {
    Json(&REFLECTION_PATH[..])
}

pub async fn reflect(Json(body): Json<ReflectionRequest>) -> AppResult<Json<ReflectionOutcome>> {
    body.validate()?;
    reflection::answer(body.step, &body.answer)
        .map(Json)
        .ok_or_else(|| AppError::Validation(format!("Unknown reflection step {}", body.step)))
}

// ── Brain dump ───────────────────────────────────────────────────────────

pub async fn brain_dump(Json(body): Json<BrainDumpRequest>) -> Json<OrganizedThoughts> {
    Json(brain_dump::organize(&body.text))
}

// ── Value discovery ──────────────────────────────────────────────────────

pub async fn value_pairs() -> Json<&'static [ValuePair]> {
    Json(&VALUE_PAIRS[..])
}

pub async fn score_values(Json(body): Json<ValueChoicesRequest>) -> AppResult<Json<ValueResults>> {
    values::score(&body.choices)
        .map(Json)
        .map_err(|e| AppError::Validation(e.to_string()))
}
