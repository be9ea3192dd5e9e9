use async_trait::async_trait;
use poise::serenity_prelude::{
    self as serenity, CommandDataOption, CommandDataOptionValue, CreateInteractionResponse,
    CreateInteractionResponseMessage, UserId,
};

use tracing::debug;

use crate::{
    dispatch::CommandInteraction,
    models::{Data, Error},
};

/// A slash command received over the gateway
pub struct SlashInteraction {
    ctx: serenity::Context,
    interaction: serenity::CommandInteraction,
    group: Option<String>,
    subcommand: Option<String>,
}

impl SlashInteraction {
    pub fn new(ctx: serenity::Context, interaction: serenity::CommandInteraction) -> Self {
        let (group, subcommand) = resolve_subcommand(&interaction.data.options);
        Self {
            ctx,
            interaction,
            group,
            subcommand,
        }
    }
}

/// Pull the sub-command group and sub-command names out of the options
fn resolve_subcommand(options: &[CommandDataOption]) -> (Option<String>, Option<String>) {
    let Some(first) = options.first() else {
        return (None, None);
    };

    match &first.value {
        CommandDataOptionValue::SubCommandGroup(inner) => (
            Some(first.name.clone()),
            inner.first().map(|option| option.name.clone()),
        ),
        CommandDataOptionValue::SubCommand(_) => (None, Some(first.name.clone())),
        _ => (None, None),
    }
}

#[async_trait]
impl CommandInteraction for SlashInteraction {
    fn command_name(&self) -> &str {
        &self.interaction.data.name
    }

    fn subcommand_group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    fn subcommand(&self) -> Option<&str> {
        self.subcommand.as_deref()
    }

    fn user_id(&self) -> UserId {
        self.interaction.user.id
    }

    async fn reply(&self, content: String, ephemeral: bool) -> Result<(), Error> {
        let response = CreateInteractionResponse::Message(
            CreateInteractionResponseMessage::new()
                .content(content)
                .ephemeral(ephemeral),
        );
        self.interaction
            .create_response(&self.ctx, response)
            .await?;
        Ok(())
    }
}

/// Handle slash command interactions
pub async fn handle_command_interaction(
    ctx: &serenity::Context,
    interaction: serenity::CommandInteraction,
    data: &Data,
) {
    let slash = SlashInteraction::new(ctx.clone(), interaction);
    let outcome = data.dispatcher.dispatch(&slash).await;
    debug!(
        "Dispatched /{} for {}: {:?}",
        slash.command_name(),
        slash.user_id(),
        outcome
    );
}
