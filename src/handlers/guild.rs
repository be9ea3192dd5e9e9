use poise::serenity_prelude::{self as serenity, Guild};
use tracing::info;

use crate::{directory::SerenityDirectory, models::Data};

/// Reconcile leftover rooms once the guild owning the hub channel is cached
pub async fn handle_guild_create(ctx: &serenity::Context, guild: &Guild, data: &Data) {
    let Some(hub_channel_id) = data.rooms.config().hub_channel_id else {
        return;
    };
    if !guild.channels.contains_key(&hub_channel_id) {
        return;
    }

    let directory = SerenityDirectory::new(ctx);
    let report = data.rooms.reconcile(&directory, guild.id).await;
    if report.adopted + report.deleted + report.skipped > 0 {
        info!(
            "Reconciled voice rooms in guild {}: {} adopted, {} deleted, {} skipped",
            guild.id, report.adopted, report.deleted, report.skipped
        );
    }
}
