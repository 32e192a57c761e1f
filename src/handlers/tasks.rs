use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;
use validator::Validate;

use crate::auth::middleware::AuthUser;
use crate::backend::{self, tables, RowQuery};
use crate::dto::CreateTaskRequest;
use crate::error::{AppError, AppResult};
use crate::models::task::{NewTask, Task, TaskBoard, TaskCompletionPatch};
use crate::AppState;

async fn load_board(state: &AppState, auth_user: &AuthUser) -> AppResult<TaskBoard> {
    let query = RowQuery::table(tables::TASKS)
        .eq("user_id", auth_user.id)
        .order_desc("created_at");

    let tasks =
        backend::fetch_rows::<Task>(state.backend.as_ref(), &query, &auth_user.access_token)
            .await?;

    Ok(TaskBoard::partition(tasks))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<TaskBoard>> {
    Ok(Json(load_board(&state, &auth_user).await?))
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(body): Json<CreateTaskRequest>,
) -> AppResult<Json<TaskBoard>> {
    body.validate()?;

    let new_task = NewTask {
        user_id: auth_user.id,
        title: body.title.trim(),
        description: body.description.as_deref(),
        completed: false,
        effort_score: body.effort_score,
    };
    let task: Task = backend::insert_row(
        state.backend.as_ref(),
        tables::TASKS,
        &new_task,
        &auth_user.access_token,
    )
    .await?;
    tracing::debug!(user_id = %auth_user.id, task_id = %task.id, "Task created");

    Ok(Json(load_board(&state, &auth_user).await?))
}

pub async fn toggle_task(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Path(task_id): Path<Uuid>,
) -> AppResult<Json<TaskBoard>> {
    let query = RowQuery::table(tables::TASKS)
        .eq("id", task_id)
        .eq("user_id", auth_user.id);

    let task = backend::fetch_single::<Task>(state.backend.as_ref(), &query, &auth_user.access_token)
        .await
        .map_err(|e| match e {
            backend::BackendError::NotFound => AppError::NotFound("Task not found".into()),
            other => AppError::Backend(other),
        })?;

    let patch = TaskCompletionPatch::toggle(&task, Utc::now());
    backend::update_rows::<Task, _>(
        state.backend.as_ref(),
        &query,
        &patch,
        &auth_user.access_token,
    )
    .await?;

    Ok(Json(load_board(&state, &auth_user).await?))
}
