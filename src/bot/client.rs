//! Telegram bot client
//!
//! Wraps a teloxide [`Bot`] with the configured parse mode, chat state
//! storage and the dptree handler tree fed by the webhook endpoint.

use std::ops::ControlFlow;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::future::join_all;
use futures::FutureExt;
use teloxide::dptree;
use teloxide::error_handlers::ErrorHandler;
use teloxide::payloads::{SendMessageSetters, SetWebhookSetters};
use teloxide::requests::Requester;
use teloxide::types::{
    ChatId, InputFile, Me, Message, ParseMode, ReplyParameters, Update, WebhookInfo,
};
use teloxide::Bot;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::bot::dispatch::{BotHandler, DispatchError, DispatchErrorHandler, UpdateErrorLogger};
use crate::bot::webhook::WebhookParams;
use crate::config::Settings;
use crate::services::redis::RedisStorage;
use crate::state::StateStorage;
use crate::utils::errors::{MyBotError, Result};
use crate::utils::helpers::panic_message;

#[derive(Clone)]
pub struct BotClient {
    bot: Bot,
    parse_mode: Option<ParseMode>,
    state: StateStorage,
    me: Arc<OnceCell<Me>>,
    handler: BotHandler,
    error_handler: DispatchErrorHandler,
}

impl std::fmt::Debug for BotClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotClient")
            .field("parse_mode", &self.parse_mode)
            .field("me", &self.me.get().and_then(|me| me.user.username.as_deref()))
            .finish()
    }
}

impl BotClient {
    /// Client running the built-in handler tree
    pub fn new(bot: Bot, parse_mode: Option<ParseMode>, state: StateStorage) -> Self {
        Self {
            bot,
            parse_mode,
            state,
            me: Arc::new(OnceCell::new()),
            handler: crate::handlers::schema(),
            error_handler: UpdateErrorLogger::new(),
        }
    }

    pub fn from_settings(settings: &Settings, redis: Arc<RedisStorage>) -> Self {
        Self::new(
            Bot::new(&settings.bot_token),
            settings.parse_mode(),
            StateStorage::new(redis),
        )
    }

    /// Replace the handler tree updates are dispatched to
    pub fn with_handler(mut self, handler: BotHandler) -> Self {
        self.handler = handler;
        self
    }

    /// Replace the error handler that receives handler errors and panics
    pub fn with_error_handler(mut self, error_handler: DispatchErrorHandler) -> Self {
        self.error_handler = error_handler;
        self
    }

    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    pub fn parse_mode(&self) -> Option<ParseMode> {
        self.parse_mode
    }

    pub fn state(&self) -> &StateStorage {
        &self.state
    }

    /// The bot's own account, fetched once; command filters need its username
    pub async fn me(&self) -> Result<Me> {
        let me = self
            .me
            .get_or_try_init(|| async { self.bot.get_me().await })
            .await?;
        Ok(me.clone())
    }

    /// Dispatch a batch of updates concurrently
    ///
    /// Never fails: handler errors and panics end up in the error handler.
    pub async fn process_new_updates(&self, updates: Vec<Update>) {
        join_all(updates.into_iter().map(|update| self.process_update(update))).await;
    }

    async fn process_update(&self, update: Update) {
        let me = match self.me().await {
            Ok(me) => me,
            Err(error) => {
                self.report(DispatchError::new(&update, error)).await;
                return;
            }
        };

        let update_id = update.id.0;
        let chat_id = update.chat().map(|chat| chat.id);
        debug!(update_id, "Dispatching update");

        let deps = dptree::deps![update, me, self.clone()];
        let outcome = AssertUnwindSafe(self.handler.dispatch(deps))
            .catch_unwind()
            .await;

        let error = match outcome {
            Ok(ControlFlow::Break(Ok(()))) => return,
            Ok(ControlFlow::Break(Err(error))) => error,
            Ok(ControlFlow::Continue(_)) => {
                debug!(update_id, "No handler matched");
                return;
            }
            Err(payload) => MyBotError::HandlerPanic(panic_message(payload.as_ref())),
        };
        self.report(DispatchError { update_id, chat_id, error }).await;
    }

    async fn report(&self, error: DispatchError) {
        self.error_handler.clone().handle_error(error).await;
    }

    /// Send a text message, applying the configured parse mode
    pub async fn send_message(&self, chat_id: ChatId, text: impl Into<String>) -> Result<Message> {
        let mut request = self.bot.send_message(chat_id, text);
        if let Some(mode) = self.parse_mode {
            request = request.parse_mode(mode);
        }
        Ok(request.await?)
    }

    /// Reply to a message in its chat
    pub async fn reply_to(&self, message: &Message, text: impl Into<String>) -> Result<Message> {
        let mut request = self
            .bot
            .send_message(message.chat.id, text)
            .reply_parameters(ReplyParameters::new(message.id));
        if let Some(mode) = self.parse_mode {
            request = request.parse_mode(mode);
        }
        Ok(request.await?)
    }

    pub async fn webhook_info(&self) -> Result<WebhookInfo> {
        Ok(self.bot.get_webhook_info().await?)
    }

    pub async fn remove_webhook(&self) -> Result<()> {
        self.bot.delete_webhook().await?;
        info!("Webhook removed");
        Ok(())
    }

    pub async fn set_webhook(&self, params: WebhookParams) -> Result<()> {
        let mut request = self.bot.set_webhook(params.url.clone());
        if let Some(certificate) = params.certificate {
            let file = InputFile::memory(certificate).file_name("certificate.pem");
            request = request.certificate(file);
        }
        if let Some(secret) = params.secret_token {
            request = request.secret_token(secret);
        }
        request.await?;

        info!(url = %params.url, "Webhook registered");
        Ok(())
    }
}
