//! Message handlers module
//!
//! Catch-all handling for messages no command claimed.

use teloxide::types::Message;
use tracing::debug;

use crate::bot::BotClient;
use crate::utils::errors::Result;

/// Reply with the received text verbatim
pub async fn handle_echo(bot: BotClient, msg: Message) -> Result<()> {
    let Some(text) = msg.text() else {
        debug!(chat_id = msg.chat.id.0, message_id = msg.id.0, "Skipping message without text");
        return Ok(());
    };

    debug!(chat_id = msg.chat.id.0, message_id = msg.id.0, "Echoing message");
    bot.reply_to(&msg, text).await?;
    Ok(())
}
