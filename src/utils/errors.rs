//! Error handling for MyBot
//!
//! This module defines the main error type used throughout the application
//! and a unified `Result` alias.

use thiserror::Error;

/// Main error type for the MyBot application
#[derive(Error, Debug)]
pub enum MyBotError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Configuration loading error: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    #[error("Logging setup error: {0}")]
    Logging(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Handler panicked: {0}")]
    HandlerPanic(String),
}

/// Result type alias for MyBot operations
pub type Result<T> = std::result::Result<T, MyBotError>;

impl MyBotError {
    /// Short name of the error variant, used as the error "class" in logs
    pub fn kind(&self) -> &'static str {
        match self {
            MyBotError::Database(_) => "Database",
            MyBotError::Telegram(_) => "Telegram",
            MyBotError::Redis(_) => "Redis",
            MyBotError::Config(_) => "Config",
            MyBotError::ConfigLoad(_) => "ConfigLoad",
            MyBotError::Serialization(_) => "Serialization",
            MyBotError::Io(_) => "Io",
            MyBotError::UrlParse(_) => "UrlParse",
            MyBotError::Logging(_) => "Logging",
            MyBotError::InvalidInput(_) => "InvalidInput",
            MyBotError::ServiceUnavailable(_) => "ServiceUnavailable",
            MyBotError::HandlerPanic(_) => "HandlerPanic",
        }
    }
}
