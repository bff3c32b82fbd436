//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use crate::utils::errors::{MyBotError, Result};
use super::settings::{normalize_log_level, parse_mode_from_str};
use super::Settings;

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_bot_config(settings)?;
    validate_app_config(settings)?;
    validate_redis_config(settings)?;
    validate_postgres_config(settings)?;
    validate_logging_config(settings)?;
    validate_sentry_config(settings)?;

    Ok(())
}

/// Validate bot and webhook configuration
fn validate_bot_config(settings: &Settings) -> Result<()> {
    if settings.bot_token.trim().is_empty() {
        return Err(MyBotError::Config(
            "Bot token is required".to_string()
        ));
    }

    let base_url = url::Url::parse(&settings.webhook_base_url)?;
    if !matches!(base_url.scheme(), "http" | "https") {
        return Err(MyBotError::Config(
            format!("Webhook base URL must use http or https, got: {}", base_url.scheme())
        ));
    }

    if !settings.webhook_url_path.starts_with('/') {
        return Err(MyBotError::Config(
            "Webhook URL path must start with '/'".to_string()
        ));
    }

    parse_mode_from_str(&settings.bot_parse_mode)?;

    Ok(())
}

/// Validate HTTP application configuration
fn validate_app_config(settings: &Settings) -> Result<()> {
    if settings.app_name.trim().is_empty() {
        return Err(MyBotError::Config(
            "App name is required".to_string()
        ));
    }

    if settings.app_port == 0 {
        return Err(MyBotError::Config(
            "App port must be greater than 0".to_string()
        ));
    }

    if !settings.app_url_path_prefix.is_empty() && !settings.app_url_path_prefix.starts_with('/') {
        return Err(MyBotError::Config(
            "App URL path prefix must be empty or start with '/'".to_string()
        ));
    }

    if settings.health_url_path() == settings.webhook_url_path {
        return Err(MyBotError::Config(
            "Webhook URL path collides with the health endpoint".to_string()
        ));
    }

    Ok(())
}

/// Validate Redis configuration
fn validate_redis_config(settings: &Settings) -> Result<()> {
    if settings.redis_host.is_empty() {
        return Err(MyBotError::Config(
            "Redis host is required".to_string()
        ));
    }

    Ok(())
}

/// Validate Postgres configuration
fn validate_postgres_config(settings: &Settings) -> Result<()> {
    if settings.postgres_host.is_empty() {
        return Err(MyBotError::Config(
            "Postgres host is required".to_string()
        ));
    }

    if settings.postgres_max_connections == 0 {
        return Err(MyBotError::Config(
            "Max connections must be greater than 0".to_string()
        ));
    }

    if settings.postgres_min_connections > settings.postgres_max_connections {
        return Err(MyBotError::Config(
            "Min connections cannot be greater than max connections".to_string()
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(settings: &Settings) -> Result<()> {
    if normalize_log_level(&settings.log_level).is_none() {
        return Err(MyBotError::Config(
            format!("Invalid log level: {}", settings.log_level)
        ));
    }

    Ok(())
}

/// Validate crash reporting configuration
fn validate_sentry_config(settings: &Settings) -> Result<()> {
    if let Some(ref dsn) = settings.sentry_dsn {
        dsn.parse::<sentry::types::Dsn>()
            .map_err(|e| MyBotError::Config(format!("Invalid Sentry DSN: {}", e)))?;
    }

    let rates = [
        ("sample", settings.sentry_sample_rate),
        ("traces sample", settings.sentry_traces_sample_rate),
    ];
    for (name, rate) in rates {
        if !(0.0..=1.0).contains(&rate) {
            return Err(MyBotError::Config(
                format!("Sentry {} rate must be between 0 and 1, got: {}", name, rate)
            ));
        }
    }

    Ok(())
}
