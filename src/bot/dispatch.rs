//! Handler tree types and dispatch error reporting
//!
//! Updates are routed through a dptree [`UpdateHandler`]. Anything an endpoint
//! returns as an error, or panics with, is wrapped in a [`DispatchError`] and
//! given to a teloxide [`ErrorHandler`].

use std::sync::Arc;

use futures::future::BoxFuture;
use teloxide::dispatching::UpdateHandler;
use teloxide::error_handlers::ErrorHandler;
use teloxide::types::{ChatId, Update};
use tracing::error;

use crate::utils::errors::MyBotError;

/// Handler tree run for every update
pub type BotHandler = UpdateHandler<MyBotError>;

/// Receives every failed dispatch
pub type DispatchErrorHandler = Arc<dyn ErrorHandler<DispatchError> + Send + Sync>;

/// A handler failure and the update it happened on
#[derive(Debug)]
pub struct DispatchError {
    pub update_id: u32,
    pub chat_id: Option<ChatId>,
    pub error: MyBotError,
}

impl DispatchError {
    pub fn new(update: &Update, error: MyBotError) -> Self {
        Self {
            update_id: update.id.0,
            chat_id: update.chat().map(|chat| chat.id),
            error,
        }
    }
}

/// Default error handler: log at error level and carry on
///
/// teloxide's `LoggingErrorHandler` also accepts [`DispatchError`], but logs
/// through `log` with the whole value as one Debug string.
#[derive(Debug, Default, Clone, Copy)]
pub struct UpdateErrorLogger;

impl UpdateErrorLogger {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

impl ErrorHandler<DispatchError> for UpdateErrorLogger {
    fn handle_error(self: Arc<Self>, error: DispatchError) -> BoxFuture<'static, ()> {
        error!(
            update_id = error.update_id,
            chat_id = ?error.chat_id.map(|id| id.0),
            error_kind = error.error.kind(),
            error = %error.error,
            "Handler failed"
        );
        Box::pin(async {})
    }
}
