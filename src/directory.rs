use async_trait::async_trait;
use poise::serenity_prelude::{
    self as serenity, ChannelId, ChannelType, CreateChannel, EditMember, Guild, GuildChannel,
    GuildId, UserId,
};

use crate::{error::DirectoryError, utils::channel_utils::max_bitrate_for_tier};

/// Cached view of a guild channel
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelSnapshot {
    pub id: ChannelId,
    pub name: String,
    pub parent_id: Option<ChannelId>,
    pub is_voice: bool,
    pub occupants: usize,
}

/// Parameters for a new personal room
#[derive(Clone, Debug, PartialEq)]
pub struct RoomSpec {
    pub name: String,
    pub category_id: Option<ChannelId>,
    pub user_limit: Option<u32>,
    pub bitrate: Option<u32>,
    pub reason: String,
}

/// The guild's channels and members as seen by the room manager.
///
/// Reads come from a local cache and may be stale; writes go to the platform
/// and can fail at any time.
#[async_trait]
pub trait ChannelDirectory: Send + Sync {
    fn channel(&self, channel_id: ChannelId) -> Option<ChannelSnapshot>;

    fn voice_channels(&self, guild_id: GuildId) -> Vec<ChannelSnapshot>;

    fn max_bitrate(&self, guild_id: GuildId) -> Option<u32>;

    async fn create_voice_channel(
        &self,
        guild_id: GuildId,
        room: &RoomSpec,
    ) -> Result<ChannelId, DirectoryError>;

    async fn move_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        channel_id: ChannelId,
        reason: &str,
    ) -> Result<(), DirectoryError>;

    async fn delete_channel(&self, channel_id: ChannelId, reason: &str)
    -> Result<(), DirectoryError>;
}

/// Directory backed by the serenity cache and HTTP client
pub struct SerenityDirectory<'a> {
    ctx: &'a serenity::Context,
}

impl<'a> SerenityDirectory<'a> {
    pub fn new(ctx: &'a serenity::Context) -> Self {
        Self { ctx }
    }
}

fn snapshot(guild: &Guild, channel: &GuildChannel) -> ChannelSnapshot {
    let occupants = guild
        .voice_states
        .values()
        .filter(|state| state.channel_id == Some(channel.id))
        .count();

    ChannelSnapshot {
        id: channel.id,
        name: channel.name.clone(),
        parent_id: channel.parent_id,
        is_voice: channel.kind == ChannelType::Voice,
        occupants,
    }
}

#[async_trait]
impl<'a> ChannelDirectory for SerenityDirectory<'a> {
    fn channel(&self, channel_id: ChannelId) -> Option<ChannelSnapshot> {
        // Release the channel ref before taking the guild ref
        let guild_id = self.ctx.cache.channel(channel_id)?.guild_id;
        let guild = self.ctx.cache.guild(guild_id)?;
        let channel = guild.channels.get(&channel_id)?;
        Some(snapshot(&guild, channel))
    }

    fn voice_channels(&self, guild_id: GuildId) -> Vec<ChannelSnapshot> {
        match self.ctx.cache.guild(guild_id) {
            Some(guild) => guild
                .channels
                .values()
                .filter(|channel| channel.kind == ChannelType::Voice)
                .map(|channel| snapshot(&guild, channel))
                .collect(),
            None => Vec::new(),
        }
    }

    fn max_bitrate(&self, guild_id: GuildId) -> Option<u32> {
        self.ctx
            .cache
            .guild(guild_id)
            .map(|guild| max_bitrate_for_tier(guild.premium_tier))
    }

    async fn create_voice_channel(
        &self,
        guild_id: GuildId,
        room: &RoomSpec,
    ) -> Result<ChannelId, DirectoryError> {
        let mut create_channel = CreateChannel::new(&room.name)
            .kind(ChannelType::Voice)
            .audit_log_reason(&room.reason);

        if let Some(category_id) = room.category_id {
            create_channel = create_channel.category(category_id);
        }
        if let Some(user_limit) = room.user_limit {
            create_channel = create_channel.user_limit(user_limit);
        }
        if let Some(bitrate) = room.bitrate {
            create_channel = create_channel.bitrate(bitrate);
        }

        let channel = guild_id.create_channel(self.ctx, create_channel).await?;
        if channel.kind != ChannelType::Voice {
            return Err(DirectoryError::Rejected(format!(
                "channel {} was created as {:?}",
                channel.id, channel.kind
            )));
        }

        Ok(channel.id)
    }

    async fn move_member(
        &self,
        guild_id: GuildId,
        user_id: UserId,
        channel_id: ChannelId,
        reason: &str,
    ) -> Result<(), DirectoryError> {
        guild_id
            .edit_member(
                self.ctx,
                user_id,
                EditMember::new()
                    .voice_channel(channel_id)
                    .audit_log_reason(reason),
            )
            .await?;
        Ok(())
    }

    async fn delete_channel(
        &self,
        channel_id: ChannelId,
        reason: &str,
    ) -> Result<(), DirectoryError> {
        self.ctx
            .http
            .delete_channel(channel_id, Some(reason))
            .await?;
        Ok(())
    }
}
