use async_trait::async_trait;
use poise::serenity_prelude::CreateCommand;

use crate::{
    dispatch::{Command, CommandInteraction},
    models::Error,
};

/// Check that the bot is alive
pub struct Ping;

#[async_trait]
impl<I: CommandInteraction> Command<I> for Ping {
    fn name(&self) -> &str {
        "ping"
    }

    fn definition(&self) -> CreateCommand {
        CreateCommand::new("ping").description("Check that the bot is responding")
    }

    async fn execute(&self, interaction: &I) -> Result<(), Error> {
        interaction.reply("🏓 Pong!".to_string(), true).await
    }
}
