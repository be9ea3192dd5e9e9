use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude::{CommandOptionType, CreateCommand, CreateCommandOption};

use crate::{
    dispatch::{Command, CommandInteraction, SubCommand},
    models::Error,
    rooms::VoiceRoomManager,
    utils::messages::format_info,
};

/// Inspect personal voice rooms
pub struct Rooms;

#[async_trait]
impl<I: CommandInteraction> Command<I> for Rooms {
    fn name(&self) -> &str {
        "rooms"
    }

    fn cooldown_secs(&self) -> Option<u64> {
        Some(5)
    }

    fn definition(&self) -> CreateCommand {
        CreateCommand::new("rooms")
            .description("Personal voice rooms")
            .add_option(CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "status",
                "Show how many personal voice rooms are active",
            ))
            .add_option(CreateCommandOption::new(
                CommandOptionType::SubCommand,
                "mine",
                "Show your personal voice room",
            ))
    }

    async fn execute(&self, interaction: &I) -> Result<(), Error> {
        interaction
            .reply(
                format_info("Use `/rooms status` or `/rooms mine`."),
                true,
            )
            .await
    }
}

/// `/rooms status`
pub struct RoomsStatus {
    rooms: Arc<VoiceRoomManager>,
}

impl RoomsStatus {
    pub fn new(rooms: Arc<VoiceRoomManager>) -> Self {
        Self { rooms }
    }
}

#[async_trait]
impl<I: CommandInteraction> SubCommand<I> for RoomsStatus {
    fn key(&self) -> String {
        "rooms.status".to_string()
    }

    async fn execute(&self, interaction: &I) -> Result<(), Error> {
        let registry = self.rooms.registry();
        let limit = registry
            .max_rooms()
            .map_or_else(|| "unlimited".to_string(), |max| max.to_string());

        interaction
            .reply(
                format_info(&format!(
                    "Managing {} voice room(s) (limit: {}).",
                    registry.len(),
                    limit
                )),
                true,
            )
            .await
    }
}

/// `/rooms mine`
pub struct RoomsMine {
    rooms: Arc<VoiceRoomManager>,
}

impl RoomsMine {
    pub fn new(rooms: Arc<VoiceRoomManager>) -> Self {
        Self { rooms }
    }
}

#[async_trait]
impl<I: CommandInteraction> SubCommand<I> for RoomsMine {
    fn key(&self) -> String {
        "rooms.mine".to_string()
    }

    async fn execute(&self, interaction: &I) -> Result<(), Error> {
        let message = match (
            self.rooms.registry().room_of(interaction.user_id()),
            self.rooms.config().hub_channel_id,
        ) {
            (Some(room_id), _) => format!("Your voice room is <#{}>.", room_id),
            (None, Some(hub_channel_id)) => format!(
                "You don't have a voice room right now. Join <#{}> to get one.",
                hub_channel_id
            ),
            (None, None) => "Personal voice rooms are not set up on this server.".to_string(),
        };

        interaction.reply(format_info(&message), true).await
    }
}
