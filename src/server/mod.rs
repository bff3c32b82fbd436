//! HTTP server: webhook endpoint, health check and the layers around them

pub mod error;
pub mod health;
pub mod webhook;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::info;

use crate::bot::BotClient;
use crate::config::Settings;
use crate::middleware::log_requests;
use crate::utils::errors::Result;

pub use error::{ApiError, INTERNAL_SERVER_ERROR_BODY};

/// Shared handles injected into every route
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub bot: Arc<BotClient>,
}

impl AppState {
    pub fn new(settings: Arc<Settings>, bot: Arc<BotClient>) -> Self {
        Self { settings, bot }
    }
}

/// Application router with all routes and layers
pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route(&state.settings.webhook_url_path, post(webhook::handle_webhook))
        .route(&state.settings.health_url_path(), get(health::health))
        .with_state(state);

    with_http_layers(routes)
}

/// Wrap routes with panic recovery and request logging
///
/// Logging is the outer layer so the request id is still in scope when a
/// panic is turned into a response.
pub fn with_http_layers(routes: Router) -> Router {
    routes
        .layer(CatchPanicLayer::custom(error::handle_panic))
        .layer(middleware::from_fn(log_requests))
}

/// Bind `APP_HOST:APP_PORT` and serve until `shutdown` resolves
pub async fn serve<F>(state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let address = format!("{}:{}", state.settings.app_host, state.settings.app_port);
    let listener = TcpListener::bind(&address).await?;
    info!(
        address = %address,
        webhook_path = %state.settings.webhook_url_path,
        "Webhook server listening"
    );

    axum::serve(
        listener,
        router(state).into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await?;

    info!("Webhook server stopped");
    Ok(())
}
