//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from an optional config file, `.env` and environment
//! variables. Variable names map to fields by lowercasing (`BOT_TOKEN` ->
//! `bot_token`).

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use teloxide::types::ParseMode;

use crate::utils::errors::{MyBotError, Result};

static SETTINGS: OnceCell<Arc<Settings>> = OnceCell::new();

/// Process-wide settings, loaded from the environment on first access
pub fn get_settings() -> Result<Arc<Settings>> {
    SETTINGS
        .get_or_try_init(|| Settings::new().map(Arc::new))
        .cloned()
}

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    // === Logging ===
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_json: bool,
    #[serde(default)]
    pub log_file_dir: Option<PathBuf>,

    // === Sentry ===
    #[serde(default)]
    pub sentry_dsn: Option<String>,
    #[serde(default = "default_sentry_sample_rate")]
    pub sentry_sample_rate: f32,
    #[serde(default = "default_true")]
    pub sentry_enable_tracing: bool,
    #[serde(default = "default_sentry_traces_sample_rate")]
    pub sentry_traces_sample_rate: f32,

    // === App ===
    #[serde(default = "default_app_name")]
    pub app_name: String,
    #[serde(default = "default_app_description")]
    pub app_description: String,
    #[serde(default = "default_app_version")]
    pub app_version: String,
    #[serde(default = "default_app_host")]
    pub app_host: String,
    #[serde(default = "default_app_port")]
    pub app_port: u16,
    #[serde(default = "default_app_url_path_prefix")]
    pub app_url_path_prefix: String,

    // === Bot ===
    pub bot_token: String,
    #[serde(default = "default_bot_parse_mode")]
    pub bot_parse_mode: String,
    pub webhook_base_url: String,
    #[serde(default)]
    pub webhook_sert_pub: Option<PathBuf>,
    #[serde(default)]
    pub webhook_secret: Option<String>,
    #[serde(default = "default_webhook_url_path")]
    pub webhook_url_path: String,

    // === Redis ===
    #[serde(default)]
    pub redis_db: u32,
    #[serde(default)]
    pub redis_user: String,
    #[serde(default)]
    pub redis_pswd: String,
    #[serde(default = "default_localhost")]
    pub redis_host: String,
    #[serde(default = "default_redis_port")]
    pub redis_port: u16,
    #[serde(default = "default_true")]
    pub redis_decode_responses: bool,
    #[serde(default = "default_redis_retries")]
    pub redis_retries: u32,

    // === Postgres ===
    #[serde(default = "default_postgres")]
    pub postgres_db: String,
    #[serde(default = "default_postgres")]
    pub postgres_user: String,
    #[serde(default = "default_postgres")]
    pub postgres_pswd: String,
    #[serde(default = "default_localhost")]
    pub postgres_host: String,
    #[serde(default = "default_postgres_port")]
    pub postgres_port: u16,
    #[serde(default = "default_postgres_max_connections")]
    pub postgres_max_connections: u32,
    #[serde(default = "default_postgres_min_connections")]
    pub postgres_min_connections: u32,
}

impl Settings {
    /// Load settings from configuration file, `.env` and environment variables
    pub fn new() -> Result<Self> {
        dotenv::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::default())
            .build()?;

        Self::from_config(config)
    }

    /// Build settings from an already assembled configuration
    pub fn from_config(config: config::Config) -> Result<Self> {
        let mut settings: Settings = config.try_deserialize()?;
        settings.normalize();
        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<()> {
        super::validation::validate_settings(self)
    }

    fn normalize(&mut self) {
        self.webhook_secret = self.webhook_secret.take().filter(|secret| !secret.is_empty());
        self.webhook_sert_pub = self
            .webhook_sert_pub
            .take()
            .filter(|path| !path.as_os_str().is_empty());
        self.sentry_dsn = self.sentry_dsn.take().filter(|dsn| !dsn.trim().is_empty());
    }

    /// Share of transactions sent to Sentry; zero with tracing disabled
    pub fn sentry_traces_rate(&self) -> f32 {
        if self.sentry_enable_tracing {
            self.sentry_traces_sample_rate
        } else {
            0.0
        }
    }

    /// Identifier of the request currently being handled by this task, if any
    pub fn request_id(&self) -> Option<String> {
        super::context::current_request_id()
    }

    /// Full URL Telegram should deliver updates to
    pub fn webhook_url(&self) -> String {
        format!(
            "{}{}",
            self.webhook_base_url.trim_end_matches('/'),
            self.webhook_url_path
        )
    }

    /// Prefix for all keys written to Redis
    pub fn app_keyprefix(&self) -> String {
        self.app_name.to_uppercase()
    }

    pub fn health_url_path(&self) -> String {
        format!("{}/health", self.app_url_path_prefix.trim_end_matches('/'))
    }

    pub fn redis_dsn(&self) -> String {
        format!(
            "redis://{}:{}@{}:{}/{}",
            self.redis_user, self.redis_pswd, self.redis_host, self.redis_port, self.redis_db
        )
    }

    pub fn postgres_dsn(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.postgres_user,
            self.postgres_pswd,
            self.postgres_host,
            self.postgres_port,
            self.postgres_db
        )
    }

    /// Parse mode applied to outgoing messages
    pub fn parse_mode(&self) -> Option<ParseMode> {
        parse_mode_from_str(&self.bot_parse_mode).ok().flatten()
    }

    /// `LOG_LEVEL` normalized to a tracing level name
    pub fn log_filter(&self) -> &'static str {
        normalize_log_level(&self.log_level).unwrap_or("info")
    }
}

/// Map a `BOT_PARSE_MODE` value to a teloxide parse mode
pub fn parse_mode_from_str(value: &str) -> Result<Option<ParseMode>> {
    match value.trim().to_lowercase().as_str() {
        "" | "none" => Ok(None),
        "html" => Ok(Some(ParseMode::Html)),
        "markdownv2" => Ok(Some(ParseMode::MarkdownV2)),
        other => Err(MyBotError::Config(format!(
            "Unsupported bot parse mode: {}. Valid modes: HTML, MarkdownV2, none",
            other
        ))),
    }
}

/// Map a log level name or numeric level (10, 20, ...) to a tracing level
pub fn normalize_log_level(value: &str) -> Option<&'static str> {
    match value.trim().to_lowercase().as_str() {
        "trace" | "5" => Some("trace"),
        "debug" | "10" => Some("debug"),
        "info" | "20" => Some("info"),
        "warn" | "warning" | "30" => Some("warn"),
        "error" | "critical" | "40" | "50" => Some("error"),
        _ => None,
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_sentry_sample_rate() -> f32 {
    1.0
}

fn default_sentry_traces_sample_rate() -> f32 {
    0.2
}

fn default_app_name() -> String {
    "MyBot".to_string()
}

fn default_app_description() -> String {
    "My awesome bot 🚀".to_string()
}

fn default_app_version() -> String {
    "0.1.0".to_string()
}

fn default_app_host() -> String {
    "localhost".to_string()
}

fn default_app_port() -> u16 {
    8000
}

fn default_app_url_path_prefix() -> String {
    "/v1/mybot".to_string()
}

fn default_bot_parse_mode() -> String {
    "HTML".to_string()
}

fn default_webhook_url_path() -> String {
    "/callbacks/telegram/mybot".to_string()
}

fn default_localhost() -> String {
    "localhost".to_string()
}

fn default_redis_port() -> u16 {
    6379
}

fn default_true() -> bool {
    true
}

fn default_redis_retries() -> u32 {
    3
}

fn default_postgres() -> String {
    "postgres".to_string()
}

fn default_postgres_port() -> u16 {
    5432
}

fn default_postgres_max_connections() -> u32 {
    10
}

fn default_postgres_min_connections() -> u32 {
    1
}
