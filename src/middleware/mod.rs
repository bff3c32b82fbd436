//! HTTP middleware
//!
//! This module provides middleware for the webhook server.

pub mod logging;

pub use logging::{client_ip, log_requests, request_id_from_headers, REQUEST_ID_HEADER};
