// Command modules
mod ping;
mod rooms;

use std::sync::Arc;

use crate::{
    dispatch::{CommandInteraction, CommandRegistry},
    rooms::VoiceRoomManager,
};

use ping::Ping;
use rooms::{Rooms, RoomsMine, RoomsStatus};

/// Build the registry of every command the bot serves
pub fn load_commands<I: CommandInteraction + 'static>(
    rooms: Arc<VoiceRoomManager>,
) -> CommandRegistry<I> {
    let registry = CommandRegistry::new();

    registry.register(Arc::new(Ping));
    registry.register(Arc::new(Rooms));
    registry.register_subcommand(Arc::new(RoomsStatus::new(Arc::clone(&rooms))));
    registry.register_subcommand(Arc::new(RoomsMine::new(rooms)));

    registry
}
