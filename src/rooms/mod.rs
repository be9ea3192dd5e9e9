/// Personal voice room lifecycle
mod manager;
mod registry;

pub use manager::VoiceRoomManager;
