use axum::{extract::State, Extension, Json};
use uuid::Uuid;
use validator::Validate;

use crate::auth::events::{publish, SessionEvent, SessionEventKind};
use crate::auth::middleware::AuthUser;
use crate::backend::{self, tables, Backend, RowQuery, SignUpOutcome};
use crate::dto::{
    LoginRequest, MeResponse, MessageResponse, RefreshRequest, SessionResponse, SignupRequest,
    SignupResponse,
};
use crate::error::{AppError, AppResult};
use crate::models::profile::Profile;
use crate::AppState;

pub const SIGNUP_MESSAGE: &str =
    "Conta criada! Verifique seu e-mail para confirmar e depois faça o login.";

/// Load the caller's profile row. Failures are logged and read as "no profile".
pub async fn fetch_profile(
    backend: &dyn Backend,
    user_id: Uuid,
    access_token: &str,
) -> Option<Profile> {
    let query = RowQuery::table(tables::PROFILES).eq("user_id", user_id);
    match backend::fetch_single::<Profile>(backend, &query, access_token).await {
        Ok(profile) => Some(profile),
        Err(e) => {
            tracing::error!(user_id = %user_id, error = %e, "Failed to load profile");
            None
        }
    }
}

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> AppResult<Json<SignupResponse>> {
    body.validate()?;

    let outcome = state
        .backend
        .sign_up(
            &body.email,
            &body.password,
            &body.full_name,
            &state.config.email_redirect_url(),
        )
        .await
        .map_err(AppError::auth)?;

    let response = match outcome {
        SignUpOutcome::Session(session) => {
            tracing::info!(user_id = %session.user.id, "Account created and signed in");
            publish(
                &state.ws_tx,
                &SessionEvent::new(session.user.id, SessionEventKind::SignedIn)
                    .with_user(session.user.clone()),
            );
            SignupResponse {
                message: SIGNUP_MESSAGE.into(),
                user: session.user.clone(),
                session: Some(session),
            }
        }
        SignUpOutcome::PendingConfirmation(user) => {
            tracing::info!(user_id = %user.id, "Account created, awaiting email confirmation");
            SignupResponse {
                message: SIGNUP_MESSAGE.into(),
                session: None,
                user,
            }
        }
    };

    Ok(Json(response))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<SessionResponse>> {
    body.validate()?;

    let session = state
        .backend
        .sign_in_with_password(&body.email, &body.password)
        .await
        .map_err(AppError::auth)?;

    let profile = fetch_profile(
        state.backend.as_ref(),
        session.user.id,
        &session.access_token,
    )
    .await;

    publish(
        &state.ws_tx,
        &SessionEvent::new(session.user.id, SessionEventKind::SignedIn)
            .with_user(session.user.clone())
            .with_profile(profile.clone()),
    );

    Ok(Json(SessionResponse { session, profile }))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> AppResult<Json<SessionResponse>> {
    let session = state
        .backend
        .refresh_session(&body.refresh_token)
        .await
        .map_err(|e| {
            tracing::debug!(error = %e, "Session refresh rejected");
            AppError::Unauthorized
        })?;

    let profile = fetch_profile(
        state.backend.as_ref(),
        session.user.id,
        &session.access_token,
    )
    .await;

    publish(
        &state.ws_tx,
        &SessionEvent::new(session.user.id, SessionEventKind::TokenRefreshed)
            .with_user(session.user.clone()),
    );

    Ok(Json(SessionResponse { session, profile }))
}

pub async fn logout(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<MessageResponse>> {
    state
        .backend
        .sign_out(&auth_user.access_token)
        .await
        .map_err(AppError::auth)?;

    publish(
        &state.ws_tx,
        &SessionEvent::new(auth_user.id, SessionEventKind::SignedOut),
    );

    Ok(Json(MessageResponse {
        message: "Logged out successfully".into(),
    }))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> AppResult<Json<MeResponse>> {
    let profile = fetch_profile(
        state.backend.as_ref(),
        auth_user.id,
        &auth_user.access_token,
    )
    .await;

    Ok(Json(MeResponse {
        id: auth_user.id,
        email: auth_user.email,
        profile,
    }))
}
