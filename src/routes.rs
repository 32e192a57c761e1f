use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth;
use crate::handlers;
use crate::AppState;

/// Every route the API serves, without the CORS/trace/compression layers.
pub fn api_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .route("/ws", get(handlers::ws::ws_handler))
        .route("/api/auth/signup", post(handlers::auth::signup))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/refresh", post(handlers::auth::refresh));

    let protected_routes = Router::new()
        .route("/api/me", get(handlers::auth::me))
        .route("/api/overview", get(handlers::overview::overview))
        .route("/api/progress", get(handlers::overview::progress))
        // Journal
        .route(
            "/api/journal",
            get(handlers::journal::list_entries).post(handlers::journal::create_entry),
        )
        // Tasks
        .route(
            "/api/tasks",
            get(handlers::tasks::list_tasks).post(handlers::tasks::create_task),
        )
        .route("/api/tasks/:id/toggle", post(handlers::tasks::toggle_task))
        // Goals
        .route("/api/goals", get(handlers::goals::get_goals))
        // Clarity
        .route("/api/clarity/chat", post(handlers::clarity::chat))
        .route(
            "/api/clarity/chat/greeting",
            get(handlers::clarity::chat_greeting),
        )
        .route(
            "/api/clarity/reflection",
            get(handlers::clarity::reflection_steps).post(handlers::clarity::reflect),
        )
        .route("/api/clarity/brain-dump", post(handlers::clarity::brain_dump))
        .route(
            "/api/clarity/values",
            get(handlers::clarity::value_pairs).post(handlers::clarity::score_values),
        )
        // Safety net
        .route("/api/safenet/check", post(handlers::safenet::check))
        .route("/api/safenet/resources", get(handlers::safenet::resources))
        // Auth actions requiring a session
        .route("/api/auth/logout", post(handlers::auth::logout))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
