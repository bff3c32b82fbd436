//! Configuration management module
//!
//! This module handles loading and validation of application configuration
//! from config files and environment variables, plus the per-request context.

pub mod context;
pub mod settings;
pub mod validation;

pub use context::{current_request_id, scope_request_id};
pub use settings::{get_settings, Settings};
