use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, warn};

use crate::{
    constants::DEFAULT_COOLDOWN_SECS,
    utils::messages::{build_command_not_found, build_cooldown_message},
};

use super::{
    cooldown::CooldownLedger,
    registry::{CommandInteraction, CommandRegistry, subcommand_key},
};

/// Which handler ran for an interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Command,
    SubCommand(String),
}

/// Result of dispatching one interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    NotFound,
    CoolingDown(Duration),
    Executed(Route),
    Failed(Route),
}

/// Routes slash commands to their handlers behind a per-user cooldown
pub struct CommandDispatcher<I> {
    registry: CommandRegistry<I>,
    cooldowns: Arc<CooldownLedger>,
}

impl<I: CommandInteraction> CommandDispatcher<I> {
    pub fn new(registry: CommandRegistry<I>) -> Self {
        Self {
            registry,
            cooldowns: Arc::new(CooldownLedger::new()),
        }
    }

    pub fn registry(&self) -> &CommandRegistry<I> {
        &self.registry
    }

    pub fn cooldowns(&self) -> Arc<CooldownLedger> {
        Arc::clone(&self.cooldowns)
    }

    pub async fn dispatch(&self, interaction: &I) -> DispatchOutcome {
        self.dispatch_at(interaction, Instant::now()).await
    }

    /// Dispatch as if the interaction arrived at `now`
    pub async fn dispatch_at(&self, interaction: &I, now: Instant) -> DispatchOutcome {
        let name = interaction.command_name();

        let Some(command) = self.registry.command(name) else {
            warn!("Received unknown command {}", name);
            if let Err(e) = interaction.reply(build_command_not_found(), true).await {
                error!("Failed to reply to unknown command {}: {}", name, e);
            }
            self.registry.remove(name);
            return DispatchOutcome::NotFound;
        };

        let cooldown = Duration::from_secs(command.cooldown_secs().unwrap_or(DEFAULT_COOLDOWN_SECS));
        if let Err(remaining) =
            self.cooldowns
                .try_acquire(name, interaction.user_id(), cooldown, now)
        {
            if let Err(e) = interaction
                .reply(build_cooldown_message(name, remaining), true)
                .await
            {
                error!("Failed to send cooldown notice for {}: {}", name, e);
            }
            return DispatchOutcome::CoolingDown(remaining);
        }

        let subcommand = interaction.subcommand().and_then(|subcommand| {
            let key = subcommand_key(name, interaction.subcommand_group(), subcommand);
            self.registry
                .subcommand(&key)
                .map(|handler| (key, handler))
        });

        let (route, result) = match subcommand {
            Some((key, handler)) => (Route::SubCommand(key), handler.execute(interaction).await),
            None => (Route::Command, command.execute(interaction).await),
        };

        match result {
            Ok(()) => DispatchOutcome::Executed(route),
            Err(e) => {
                error!("Command {} failed for {}: {}", name, interaction.user_id(), e);
                DispatchOutcome::Failed(route)
            }
        }
    }
}
