mod commands;
mod config;
mod constants;
mod directory;
mod dispatch;
mod error;
mod handlers;
mod models;
mod rooms;
mod utils;

#[cfg(test)]
mod test_support;

use poise::serenity_prelude as serenity;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use crate::{
    commands::load_commands,
    config::Config,
    constants::{COOLDOWN_SWEEP_INTERVAL_SECS, LOG_DIRECTIVE},
    dispatch::{CommandDispatcher, spawn_cooldown_sweeper},
    handlers::{handle_command_interaction, handle_guild_create, handle_voice_state_update},
    models::{Data, Error},
    rooms::VoiceRoomManager,
};

#[tokio::main]
async fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    // Initialize logging
    initialize_logging();

    // Load configuration from environment
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    if config.rooms.hub_channel_id.is_none() {
        warn!("HUB_CHANNEL_ID not set, personal voice rooms are disabled");
    }

    // Initialize bot data
    let rooms = Arc::new(VoiceRoomManager::new(config.rooms.clone()));
    let dispatcher = Arc::new(CommandDispatcher::new(load_commands(Arc::clone(&rooms))));
    info!("Loaded {} commands", dispatcher.registry().len());
    let data = Data { rooms, dispatcher };

    // Create and start the bot
    if let Err(e) = start_bot(config.discord_token, data, config.guild_id).await {
        error!("Bot error: {}", e);
        std::process::exit(1);
    }
}

/// Initialize the logging system
fn initialize_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(LOG_DIRECTIVE.parse().expect("valid log directive")),
        )
        .init();
}

/// Framework errors. Slash commands never reach poise's own command table.
async fn on_error(error: poise::FrameworkError<'_, Data, Error>) {
    match error {
        poise::FrameworkError::UnknownInteraction { interaction, .. } => {
            debug!(
                "Interaction /{} left to the command dispatcher",
                interaction.data.name
            );
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Create and start the Discord bot
async fn start_bot(token: String, data: Data, guild_id: Option<u64>) -> Result<(), Error> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            event_handler: |ctx, event, _framework, data| {
                Box::pin(async move {
                    match event {
                        serenity::FullEvent::VoiceStateUpdate { old, new } => {
                            handle_voice_state_update(ctx, old.clone(), new.clone(), data).await;
                        }
                        serenity::FullEvent::InteractionCreate {
                            interaction: serenity::Interaction::Command(command),
                        } => {
                            handle_command_interaction(ctx, command.clone(), data).await;
                        }
                        serenity::FullEvent::GuildCreate { guild, .. } => {
                            handle_guild_create(ctx, guild, data).await;
                        }
                        _ => {}
                    }
                    Ok(())
                })
            },
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, _ready, _framework| {
            Box::pin(async move {
                let definitions = data.dispatcher.registry().definitions();

                // Register commands based on guild_id
                if let Some(guild_id) = guild_id {
                    info!("Registering commands in guild: {}", guild_id);
                    serenity::GuildId::new(guild_id)
                        .set_commands(&ctx.http, definitions)
                        .await?;
                    info!("Commands registered in guild {} (instant updates)", guild_id);
                } else {
                    info!("Registering commands globally (may take up to 1 hour)");
                    serenity::Command::set_global_commands(&ctx.http, definitions).await?;
                    info!("Commands registered globally");
                }

                spawn_cooldown_sweeper(
                    data.dispatcher.cooldowns(),
                    Duration::from_secs(COOLDOWN_SWEEP_INTERVAL_SECS),
                );
                info!("Cooldown sweeper task started");

                info!("Bot is ready!");
                Ok(data)
            })
        })
        .build();

    // Create client with required intents
    let intents = serenity::GatewayIntents::non_privileged()
        | serenity::GatewayIntents::GUILD_VOICE_STATES
        | serenity::GatewayIntents::GUILD_MEMBERS;

    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    // Start the bot
    info!("Starting bot...");
    client.start().await?;

    Ok(())
}
