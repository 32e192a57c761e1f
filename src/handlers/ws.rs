use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

use crate::auth::events::{is_for_user, SessionEvent, SessionEventKind};
use crate::auth::middleware::{authenticate, AuthUser};
use crate::error::AppError;
use crate::handlers::auth::fetch_profile;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct WsQuery {
    token: Option<String>,
}

/// The token is checked before the upgrade itself, so an unauthenticated
/// caller gets 401 whatever headers it sent.
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(query): Query<WsQuery>,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let token = match query.token.as_deref().filter(|t| !t.is_empty()) {
        Some(token) => token,
        None => return AppError::Unauthorized.into_response(),
    };

    let auth_user = match authenticate(&state, token).await {
        Ok(user) => user,
        Err(e) => {
            tracing::warn!(error = %e, "WebSocket auth failed");
            return e.into_response();
        }
    };

    let ws = match ws {
        Ok(ws) => ws,
        Err(rejection) => return rejection.into_response(),
    };

    ws.on_upgrade(move |socket| handle_socket(socket, state, auth_user))
}

/// The first frame a subscriber sees: who is signed in right now.
async fn initial_session(state: &AppState, auth_user: &AuthUser) -> SessionEvent {
    let mut event = SessionEvent::new(auth_user.id, SessionEventKind::InitialSession);

    match state.backend.get_user(&auth_user.access_token).await {
        Ok(user) => event = event.with_user(user),
        Err(e) => tracing::debug!(user_id = %auth_user.id, error = %e, "No user for initial session"),
    }

    let profile = fetch_profile(
        state.backend.as_ref(),
        auth_user.id,
        &auth_user.access_token,
    )
    .await;
    event.with_profile(profile)
}

/// Next payload addressed to `user_id`. A lagging receiver skips what it
/// missed instead of dropping the connection; `None` once the channel closes.
async fn next_for_user(rx: &mut broadcast::Receiver<String>, user_id: Uuid) -> Option<String> {
    loop {
        match rx.recv().await {
            Ok(payload) if is_for_user(&payload, user_id) => return Some(payload),
            Ok(_) => continue,
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(user_id = %user_id, skipped, "WebSocket subscriber lagged");
            }
            Err(RecvError::Closed) => return None,
        }
    }
}

async fn handle_socket(socket: WebSocket, state: AppState, auth_user: AuthUser) {
    let user_id = auth_user.id;
    let (mut sender, mut receiver) = socket.split();

    // Subscribe before the initial frame so nothing published in between is lost.
    let mut rx = state.ws_tx.subscribe();

    tracing::debug!(user_id = %user_id, "WebSocket connection established");

    let initial = initial_session(&state, &auth_user).await;
    match serde_json::to_string(&initial) {
        Ok(payload) => {
            if sender.send(Message::Text(payload)).await.is_err() {
                return;
            }
        }
        Err(e) => tracing::warn!(error = %e, "Failed to encode initial session"),
    }

    let mut send_task = tokio::spawn(async move {
        while let Some(payload) = next_for_user(&mut rx, user_id).await {
            if sender.send(Message::Text(payload)).await.is_err() {
                break;
            }
        }
    });

    // Clients never send anything meaningful; read only to notice the close.
    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(msg)) = receiver.next().await {
            if let Message::Close(_) = msg {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    tracing::debug!(user_id = %user_id, "WebSocket connection closed");
}
