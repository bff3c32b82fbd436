//! Bot handlers module
//!
//! This module contains the built-in Telegram bot handlers:
//! - Command handlers for bot commands
//! - Message handlers for everything else

pub mod commands;
pub mod messages;

pub use commands::{handle_command, handle_start, Command};
pub use messages::handle_echo;

use teloxide::dispatching::{HandlerExt, UpdateFilterExt};
use teloxide::dptree;
use teloxide::types::Update;

use crate::bot::BotHandler;

/// Built-in handler tree; the command branch must precede the catch-all
pub fn schema() -> BotHandler {
    Update::filter_message()
        .branch(
            // Handle commands
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(handle_command),
        )
        .branch(
            // Echo everything else
            dptree::endpoint(handle_echo),
        )
}
