//! MyBot Telegram Bot
//!
//! A webhook-driven Telegram bot service. Telegram delivers updates to an
//! HTTP endpoint, which validates them and dispatches each through the bot's
//! handler tree. PostgreSQL and Redis handles are wired in
//! for handlers to build on.

pub mod bot;
pub mod config;
pub mod database;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{MyBotError, Result};

// Re-export main components for easy access
pub use bot::{get_bot, setup_bot_webhook, BotClient};
pub use database::{get_pg_storage, PgStorage};
pub use server::AppState;
pub use services::{get_redis_storage, get_service, RedisStorage, Service};
pub use state::StateStorage;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

