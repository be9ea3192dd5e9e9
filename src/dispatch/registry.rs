use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use poise::serenity_prelude::{CreateCommand, UserId};

use crate::models::Error;

/// An inbound slash command invocation
#[async_trait]
pub trait CommandInteraction: Send + Sync {
    fn command_name(&self) -> &str;

    fn subcommand_group(&self) -> Option<&str>;

    fn subcommand(&self) -> Option<&str>;

    fn user_id(&self) -> UserId;

    async fn reply(&self, content: String, ephemeral: bool) -> Result<(), Error>;
}

/// A top-level slash command
#[async_trait]
pub trait Command<I>: Send + Sync {
    fn name(&self) -> &str;

    /// Seconds between uses per user; `None` uses the default
    fn cooldown_secs(&self) -> Option<u64> {
        None
    }

    /// Definition pushed to the platform at startup
    fn definition(&self) -> CreateCommand;

    async fn execute(&self, interaction: &I) -> Result<(), Error>;
}

/// A sub-command, keyed by `command[.group].subcommand`
#[async_trait]
pub trait SubCommand<I>: Send + Sync {
    fn key(&self) -> String;

    async fn execute(&self, interaction: &I) -> Result<(), Error>;
}

/// Build the lookup key for a sub-command
pub fn subcommand_key(command: &str, group: Option<&str>, subcommand: &str) -> String {
    match group {
        Some(group) => format!("{}.{}.{}", command, group, subcommand),
        None => format!("{}.{}", command, subcommand),
    }
}

/// Registered command and sub-command handlers
pub struct CommandRegistry<I> {
    commands: DashMap<String, Arc<dyn Command<I>>>,
    subcommands: DashMap<String, Arc<dyn SubCommand<I>>>,
}

impl<I> Default for CommandRegistry<I> {
    fn default() -> Self {
        Self {
            commands: DashMap::new(),
            subcommands: DashMap::new(),
        }
    }
}

impl<I> CommandRegistry<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, command: Arc<dyn Command<I>>) {
        self.commands.insert(command.name().to_string(), command);
    }

    pub fn register_subcommand(&self, subcommand: Arc<dyn SubCommand<I>>) {
        self.subcommands.insert(subcommand.key(), subcommand);
    }

    pub fn command(&self, name: &str) -> Option<Arc<dyn Command<I>>> {
        self.commands.get(name).map(|entry| Arc::clone(entry.value()))
    }

    pub fn subcommand(&self, key: &str) -> Option<Arc<dyn SubCommand<I>>> {
        self.subcommands
            .get(key)
            .map(|entry| Arc::clone(entry.value()))
    }

    /// Drop a command and every sub-command registered under it
    pub fn remove(&self, name: &str) {
        self.commands.remove(name);
        let prefix = format!("{}.", name);
        self.subcommands.retain(|key, _| !key.starts_with(&prefix));
    }

    pub fn definitions(&self) -> Vec<CreateCommand> {
        self.commands
            .iter()
            .map(|entry| entry.value().definition())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }
}
