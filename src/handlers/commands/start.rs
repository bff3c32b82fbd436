//! Start command handler
//!
//! Greets the sender by full name.

use teloxide::types::Message;
use tracing::debug;

use crate::bot::BotClient;
use crate::utils::errors::{MyBotError, Result};
use crate::utils::helpers::full_name;

/// Handle /start command
pub async fn handle_start(bot: BotClient, msg: Message) -> Result<()> {
    let user = msg
        .from
        .as_ref()
        .ok_or_else(|| MyBotError::InvalidInput("No user in message".to_string()))?;

    debug!(user_id = user.id.0, chat_id = msg.chat.id.0, "Processing /start command");

    let name = full_name(&user.first_name, user.last_name.as_deref());
    bot.send_message(msg.chat.id, greeting(&name)).await?;
    Ok(())
}

pub fn greeting(name: &str) -> String {
    format!("Hello, {}!", name)
}
