use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::jwt::verify_token;
use crate::error::AppError;
use crate::AppState;

/// The caller's identity plus the session token that row calls forward to
/// the backend.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub access_token: String,
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
}

/// Resolve a session token to a user, locally when a JWT secret is
/// configured and through the backend otherwise.
pub async fn authenticate(state: &AppState, token: &str) -> Result<AuthUser, AppError> {
    if let Some(secret) = state.config.supabase_jwt_secret.as_deref() {
        let data = verify_token(token, secret)?;
        return Ok(AuthUser {
            id: data.claims.sub,
            email: data.claims.email,
            access_token: token.to_string(),
        });
    }

    let user = state.backend.get_user(token).await.map_err(|e| {
        if e.is_unauthorized() {
            AppError::Unauthorized
        } else {
            AppError::Backend(e)
        }
    })?;

    Ok(AuthUser {
        id: user.id,
        email: user.email,
        access_token: token.to_string(),
    })
}

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())
        .ok_or(AppError::Unauthorized)?
        .to_string();

    let auth_user = authenticate(&state, &token).await?;

    req.extensions_mut().insert(auth_user);
    Ok(next.run(req).await)
}
