//! Bot initialization and command definitions.

use reqwest::ClientBuilder;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;

use crate::core::config;

/// Bot commands enum with descriptions
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "I can:")]
pub enum Command {
    #[command(description = "show the main menu")]
    Start,
    #[command(description = "usage guide")]
    Help,
    #[command(description = "about the bot")]
    About,
    #[command(description = "bot statistics (admin only)")]
    Stats,
}

/// Creates a Bot instance from the TELOXIDE_TOKEN environment variable,
/// with an HTTP client timeout sized for large file uploads.
pub fn create_bot() -> anyhow::Result<Bot> {
    let client = ClientBuilder::new().timeout(config::network::timeout()).build()?;
    Ok(Bot::from_env_with_client(client))
}

/// Registers the command list in the Telegram UI.
pub async fn setup_bot_commands(bot: &Bot) -> Result<(), teloxide::RequestError> {
    use teloxide::types::BotCommand;

    bot.set_my_commands(vec![
        BotCommand::new("start", "show the main menu"),
        BotCommand::new("help", "usage guide"),
        BotCommand::new("about", "about the bot"),
        BotCommand::new("stats", "bot statistics (admin only)"),
    ])
    .await?;

    Ok(())
}
