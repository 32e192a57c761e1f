use axum::{
    extract::{Query, State},
    Extension, Json,
};
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::backend::{self, tables, RowQuery};
use crate::dto::{CreateJournalEntryRequest, JournalFeedResponse, JournalQuery};
use crate::error::AppResult;
use crate::models::journal::{JournalEntry, JournalEntryView, NewJournalEntry};
use crate::services::crisis;
use crate::AppState;

pub const RECENT_ENTRIES: usize = 5;

pub const ENTRY_INSIGHT: &str =
    "Obrigado por compartilhar. Reconhecer seus sentimentos é um ato de coragem.";

async fn recent_entries(
    state: &AppState,
    auth_user: &AuthUser,
    limit: usize,
) -> AppResult<Vec<JournalEntryView>> {
    let query = RowQuery::table(tables::JOURNAL_ENTRIES)
        .eq("user_id", auth_user.id)
        .order_desc("created_at")
        .limit(limit);

    let entries = backend::fetch_rows::<JournalEntry>(
        state.backend.as_ref(),
        &query,
        &auth_user.access_token,
    )
    .await?;

    Ok(entries.into_iter().map(JournalEntryView::from).collect())
}

pub async fn list_entries(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Query(query): Query<JournalQuery>,
) -> AppResult<Json<JournalFeedResponse>> {
    let limit = query.limit.unwrap_or(RECENT_ENTRIES);
    let entries = recent_entries(&state, &auth_user, limit).await?;
    Ok(Json(JournalFeedResponse {
        entries,
        crisis: None,
    }))
}

pub async fn create_entry(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateJournalEntryRequest>,
) -> AppResult<Json<JournalFeedResponse>> {
    body.validate()?;
    let content = body.content.trim();

    let new_entry = NewJournalEntry {
        user_id: auth_user.id,
        content,
        mood_score: body.mood_score,
        ai_insights: ENTRY_INSIGHT,
    };
    let entry: JournalEntry = backend::insert_row(
        state.backend.as_ref(),
        tables::JOURNAL_ENTRIES,
        &new_entry,
        &auth_user.access_token,
    )
    .await?;

    let assessment = crisis::assess(Some(content), body.mood_score);
    if assessment.is_crisis {
        tracing::warn!(user_id = %auth_user.id, entry_id = %entry.id, "Journal entry flagged for crisis support");
    }

    let entries = recent_entries(&state, &auth_user, RECENT_ENTRIES).await?;
    Ok(Json(JournalFeedResponse {
        entries,
        crisis: Some(assessment),
    }))
}
