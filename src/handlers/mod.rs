/// Handler modules for Discord events and interactions
mod guild;
mod interaction;
mod voice;

// Re-export main handler functions
pub use guild::handle_guild_create;
pub use interaction::{SlashInteraction, handle_command_interaction};
pub use voice::handle_voice_state_update;
