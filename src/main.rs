use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use tokio::sync::broadcast;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

mod auth;
mod backend;
mod config;
mod dto;
mod error;
mod handlers;
mod models;
mod routes;
mod services;
#[cfg(test)]
mod test_support;

use backend::supabase::SupabaseBackend;
use backend::Backend;
use config::Config;

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn Backend>,
    pub config: Arc<Config>,
    pub ws_tx: broadcast::Sender<String>,
}

fn cors_layer(config: &Config) -> CorsLayer {
    let mut origins = Vec::new();
    match config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => origins.push(origin),
        Err(_) => tracing::warn!(frontend_url = %config.frontend_url, "FRONTEND_URL is not a valid origin"),
    }
    // Extra origins, e.g. a LAN address for testing from another device
    if let Ok(extra) = std::env::var("CORS_EXTRA_ORIGINS") {
        for o in extra.split(',').map(str::trim).filter(|o| !o.is_empty()) {
            if let Ok(hv) = o.parse::<HeaderValue>() {
                origins.push(hv);
            }
        }
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mindspace_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env());

    if config.supabase_url.is_empty() || config.supabase_anon_key.is_empty() {
        tracing::warn!("SUPABASE_URL or SUPABASE_ANON_KEY is not set; backend calls will fail");
    }
    if config.supabase_jwt_secret.is_none() {
        tracing::info!("SUPABASE_JWT_SECRET not set, sessions are verified through the backend");
    }

    let backend = SupabaseBackend::new(&config).context("failed to build backend client")?;

    let (ws_tx, _) = broadcast::channel::<String>(256);

    let state = AppState {
        backend: Arc::new(backend),
        config: config.clone(),
        ws_tx,
    };

    let app = routes::api_router(state)
        .layer(cors_layer(&config))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
