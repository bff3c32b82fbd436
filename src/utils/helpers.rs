//! Helper functions and utilities
//!
//! This module contains common helper functions used throughout the application.

use std::any::Any;
use uuid::Uuid;

/// Generate a new request identifier (UUID v4)
pub fn generate_request_id() -> String {
    Uuid::new_v4().to_string()
}

/// Extract a readable message from a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Join first and optional last name, skipping empty parts
pub fn full_name(first_name: &str, last_name: Option<&str>) -> String {
    [Some(first_name), last_name]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
