//! Test helpers module
//!
//! This module provides utilities and helpers for testing MyBot: a mock
//! Telegram API, update builders, settings, log capture and a recording
//! error handler.

#![allow(dead_code)]

pub mod telegram_mock;
pub mod test_data;

pub use telegram_mock::*;
pub use test_data::*;

use std::io;
use std::sync::{Arc, Mutex};

use axum::Router;
use futures::future::BoxFuture;
use teloxide::error_handlers::ErrorHandler;
use teloxide::Bot;
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;

use mybot::bot::{BotClient, DispatchError};
use mybot::config::Settings;
use mybot::server::{router, AppState};
use mybot::services::RedisStorage;
use mybot::state::StateStorage;

/// Settings with test defaults plus `overrides` (lowercase keys)
pub fn test_settings(overrides: &[(&str, &str)]) -> Settings {
    let mut builder = config::Config::builder()
        .set_override("bot_token", TEST_BOT_TOKEN)
        .unwrap()
        .set_override("webhook_base_url", "https://bot.example.com")
        .unwrap()
        .set_override("log_level", "debug")
        .unwrap();
    for (key, value) in overrides {
        builder = builder.set_override(*key, *value).unwrap();
    }
    Settings::from_config(builder.build().unwrap()).unwrap()
}

/// Bot client with the built-in handler tree; no Redis connection is opened
pub fn test_bot_client(bot: Bot, settings: &Settings) -> BotClient {
    let redis = RedisStorage::from_settings(settings).unwrap();
    BotClient::new(bot, settings.parse_mode(), StateStorage::new(Arc::new(redis)))
}

/// Application router over the given settings and bot
pub fn test_app(settings: Settings, bot: BotClient) -> Router {
    router(AppState::new(Arc::new(settings), Arc::new(bot)))
}

/// One failed dispatch as the error handler saw it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedError {
    pub kind: String,
    pub message: String,
    pub update_id: u32,
    pub chat_id: Option<i64>,
}

/// Error handler that remembers what it was given
#[derive(Default)]
pub struct RecordingErrorHandler {
    pub calls: Mutex<Vec<RecordedError>>,
}

impl RecordingErrorHandler {
    pub fn calls(&self) -> Vec<RecordedError> {
        self.calls.lock().unwrap().clone()
    }
}

impl ErrorHandler<DispatchError> for RecordingErrorHandler {
    fn handle_error(self: Arc<Self>, error: DispatchError) -> BoxFuture<'static, ()> {
        self.calls.lock().unwrap().push(RecordedError {
            kind: error.error.kind().to_string(),
            message: error.error.to_string(),
            update_id: error.update_id,
            chat_id: error.chat_id.map(|id| id.0),
        });
        Box::pin(async {})
    }
}

/// In-memory log sink for asserting on emitted log lines
#[derive(Clone, Default)]
pub struct LogCapture {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl LogCapture {
    /// Route this thread's tracing output into the capture until the guard drops
    pub fn install(&self) -> DefaultGuard {
        let subscriber = tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        tracing::subscriber::set_default(subscriber)
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock().unwrap()).into_owned()
    }

    pub fn lines_containing(&self, needle: &str) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|line| line.contains(needle))
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
