use std::sync::Arc;

use poise::serenity_prelude::{ChannelId, GuildId, UserId};

use crate::{
    dispatch::CommandDispatcher, handlers::SlashInteraction, rooms::VoiceRoomManager,
};

/// A voice channel created (or adopted) and tracked by the room manager
#[derive(Clone, Debug, PartialEq)]
pub struct ManagedRoom {
    pub room_id: ChannelId,
    /// `None` for rooms adopted during reconciliation
    pub owner_id: Option<UserId>,
}

/// The parts of a member the room manager cares about
#[derive(Clone, Debug)]
pub struct MemberInfo {
    pub display_name: String,
    pub is_bot: bool,
}

/// A member moving between voice channels, including to or from no channel
#[derive(Clone, Debug)]
pub struct VoiceTransition {
    pub guild_id: GuildId,
    pub user_id: UserId,
    pub member: Option<MemberInfo>,
    pub old_channel: Option<ChannelId>,
    pub new_channel: Option<ChannelId>,
}

/// Bot state shared across all handlers
pub struct Data {
    pub rooms: Arc<VoiceRoomManager>,
    pub dispatcher: Arc<CommandDispatcher<SlashInteraction>>,
}

pub type Error = Box<dyn std::error::Error + Send + Sync>;
