/// Slash command routing and rate limiting
mod cooldown;
mod dispatcher;
mod registry;

pub use cooldown::spawn_cooldown_sweeper;
pub use dispatcher::CommandDispatcher;
pub use registry::{Command, CommandInteraction, CommandRegistry, SubCommand};
