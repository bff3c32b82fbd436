//! Telegram webhook endpoint

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use teloxide::types::Update;
use tracing::{debug, warn};

use super::error::ApiError;
use super::AppState;

pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Whether the request carries the configured secret; always true without one
pub fn secret_matches(expected: Option<&str>, headers: &HeaderMap) -> bool {
    match expected {
        Some(secret) => headers
            .get(SECRET_TOKEN_HEADER)
            .is_some_and(|provided| provided.as_bytes() == secret.as_bytes()),
        None => true,
    }
}

/// Accept one update from Telegram and dispatch it
///
/// Answers 200 once the update is dispatched, whatever the handlers did.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    if !secret_matches(state.settings.webhook_secret.as_deref(), &headers) {
        warn!(
            header_present = headers.contains_key(SECRET_TOKEN_HEADER),
            "Rejected webhook call with invalid secret token"
        );
        return Ok(StatusCode::FORBIDDEN);
    }

    let update: Update = serde_json::from_slice(&body)?;
    debug!(update_id = update.id.0, "Webhook update received");

    state.bot.process_new_updates(vec![update]).await;
    Ok(StatusCode::OK)
}
