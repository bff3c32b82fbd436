//! Command handlers module
//!
//! This module contains handlers for bot commands like /start.

pub mod start;

pub use start::handle_start;

use teloxide::types::Message;
use teloxide::utils::command::BotCommands;

use crate::bot::BotClient;
use crate::utils::errors::Result;

/// All available bot commands
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "MyBot commands:")]
pub enum Command {
    #[command(description = "Start the bot and get a greeting")]
    Start,
}

/// Main command dispatcher
pub async fn handle_command(bot: BotClient, msg: Message, cmd: Command) -> Result<()> {
    match cmd {
        Command::Start => handle_start(bot, msg).await,
    }
}
