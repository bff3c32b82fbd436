//! Telegram bot client, handler dispatch and webhook registration

pub mod client;
pub mod dispatch;
pub mod webhook;

use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::config::get_settings;
use crate::services::redis::get_redis_storage;
use crate::utils::errors::Result;

pub use client::BotClient;
pub use dispatch::{BotHandler, DispatchError, DispatchErrorHandler, UpdateErrorLogger};
pub use webhook::{setup_bot_webhook, WebhookParams};

static BOT: OnceCell<Arc<BotClient>> = OnceCell::new();

/// Process-wide bot client running the built-in handler tree
pub fn get_bot() -> Result<Arc<BotClient>> {
    BOT.get_or_try_init(|| {
        let settings = get_settings()?;
        Ok(Arc::new(BotClient::from_settings(&settings, get_redis_storage()?)))
    })
    .cloned()
}
