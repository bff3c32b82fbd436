//! Global error handling for the HTTP server
//!
//! Anything a route fails with, and any panic while a request is handled,
//! is logged with the current request id and answered with a bare 500.

use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::config::current_request_id;
use crate::utils::errors::MyBotError;
use crate::utils::helpers::panic_message;

pub const INTERNAL_SERVER_ERROR_BODY: &str = "Internal Server Error";

/// Error returned by route handlers
#[derive(Debug)]
pub struct ApiError(pub MyBotError);

impl<E> From<E> for ApiError
where
    E: Into<MyBotError>,
{
    fn from(error: E) -> Self {
        Self(error.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(
            error_kind = self.0.kind(),
            error = %self.0,
            request_id = ?current_request_id(),
            "Unhandled error while processing request"
        );
        internal_server_error()
    }
}

/// Panic hook for `CatchPanicLayer`
pub fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    error!(
        error_kind = "Panic",
        error = %panic_message(payload.as_ref()),
        request_id = ?current_request_id(),
        "Panic while processing request"
    );
    internal_server_error()
}

fn internal_server_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR_BODY).into_response()
}
