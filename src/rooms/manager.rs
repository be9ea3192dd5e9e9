use poise::serenity_prelude::{ChannelId, GuildId, UserId};
use tracing::{debug, error, info, warn};

use crate::{
    config::RoomConfig,
    constants::{REASON_EMPTY, REASON_MOVE_EXISTING, REASON_MOVE_NEW, REASON_ORPHANED},
    directory::{ChannelDirectory, ChannelSnapshot, RoomSpec},
    models::{MemberInfo, VoiceTransition},
    utils::channel_utils::{build_room_name, clamp_bitrate, is_room_name},
};

use super::registry::{AdmissionError, RoomRegistry};

/// Outcome of a startup reconciliation pass
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub adopted: usize,
    pub deleted: usize,
    pub skipped: usize,
}

/// Creates a personal voice room when a member joins the hub channel and
/// deletes it once everyone has left.
pub struct VoiceRoomManager {
    config: RoomConfig,
    registry: RoomRegistry,
}

impl VoiceRoomManager {
    pub fn new(config: RoomConfig) -> Self {
        let registry = RoomRegistry::new(config.max_rooms);
        Self { config, registry }
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn registry(&self) -> &RoomRegistry {
        &self.registry
    }

    /// React to a member moving between voice channels
    pub async fn handle_transition(
        &self,
        directory: &dyn ChannelDirectory,
        transition: &VoiceTransition,
    ) {
        let Some(hub_channel_id) = self.config.hub_channel_id else {
            warn!("No hub channel configured, ignoring voice state update");
            return;
        };

        if let Some(old_channel_id) = transition.old_channel {
            self.handle_vacated_channel(directory, old_channel_id, hub_channel_id)
                .await;
        }

        // Mute/deafen updates keep the member where they are
        if transition.new_channel != Some(hub_channel_id)
            || transition.old_channel == transition.new_channel
        {
            return;
        }

        let Some(member) = &transition.member else {
            debug!(
                "Voice state for {} carried no member, skipping hub join",
                transition.user_id
            );
            return;
        };
        if member.is_bot {
            return;
        }

        self.handle_hub_join(directory, transition.guild_id, transition.user_id, member)
            .await;
    }

    async fn handle_vacated_channel(
        &self,
        directory: &dyn ChannelDirectory,
        channel_id: ChannelId,
        hub_channel_id: ChannelId,
    ) {
        let managed = self.registry.is_managed(channel_id);
        let snapshot = directory.channel(channel_id);

        let Some(snapshot) = snapshot else {
            if managed && self.registry.forget_room(channel_id) {
                debug!("Managed room {} no longer exists, forgetting it", channel_id);
            }
            return;
        };

        if !managed && !self.is_orphaned_room(&snapshot, hub_channel_id) {
            return;
        }

        if snapshot.occupants == 0 {
            if !managed {
                info!("Reclaiming orphaned voice room {}", snapshot.name);
            }
            self.destroy_room(directory, channel_id, REASON_EMPTY).await;
        }
    }

    async fn handle_hub_join(
        &self,
        directory: &dyn ChannelDirectory,
        guild_id: GuildId,
        user_id: UserId,
        member: &MemberInfo,
    ) {
        if let Some(existing_room_id) = self.registry.room_of(user_id) {
            match directory.channel(existing_room_id) {
                Some(existing) if existing.is_voice => {
                    if let Err(e) = directory
                        .move_member(guild_id, user_id, existing_room_id, REASON_MOVE_EXISTING)
                        .await
                    {
                        error!("Failed to move member {} to their room: {}", user_id, e);
                    }
                    return;
                }
                _ => {
                    self.registry.forget_room(existing_room_id);
                    debug!(
                        "Purged stale room {} recorded for member {}",
                        existing_room_id, user_id
                    );
                }
            }
        }

        let reservation = match self.registry.try_reserve(user_id) {
            Ok(reservation) => reservation,
            Err(AdmissionError::AtCapacity) => {
                warn!(
                    "Maximum number of managed voice rooms reached, {} stays in the hub",
                    user_id
                );
                return;
            }
            Err(AdmissionError::AlreadyProvisioning) => {
                debug!("Room for member {} is already being created", user_id);
                return;
            }
        };

        let room = RoomSpec {
            name: build_room_name(&member.display_name),
            category_id: self.config.category_id,
            user_limit: self.config.user_limit,
            bitrate: clamp_bitrate(self.config.bitrate, directory.max_bitrate(guild_id)),
            reason: format!("Auto-generated voice room for {}", member.display_name),
        };

        let room_id = match directory.create_voice_channel(guild_id, &room).await {
            Ok(room_id) => room_id,
            Err(e) => {
                error!("Failed to create voice room for {}: {}", user_id, e);
                return;
            }
        };
        reservation.commit(room_id);

        info!(
            "Created voice room {} ({}) for user {} in guild {}",
            room_id, room.name, user_id, guild_id
        );

        if let Err(e) = directory
            .move_member(guild_id, user_id, room_id, REASON_MOVE_NEW)
            .await
        {
            error!("Failed to move member {} to their new room: {}", user_id, e);

            // Nobody will ever leave a room nobody entered
            if directory
                .channel(room_id)
                .is_some_and(|snapshot| snapshot.occupants == 0)
            {
                self.destroy_room(directory, room_id, REASON_EMPTY).await;
            }
        }
    }

    /// Deregister a room, then delete it. Deletion failures are only logged.
    async fn destroy_room(&self, directory: &dyn ChannelDirectory, room_id: ChannelId, reason: &str) {
        self.registry.forget_room(room_id);

        match directory.delete_channel(room_id, reason).await {
            Ok(()) => info!("Deleted empty voice room {}", room_id),
            Err(e) => error!("Failed to delete voice room {}: {}", room_id, e),
        }
    }

    /// Name-based fallback for rooms this process did not record
    fn is_orphaned_room(&self, snapshot: &ChannelSnapshot, hub_channel_id: ChannelId) -> bool {
        self.config.reclaim_orphans
            && snapshot.is_voice
            && snapshot.id != hub_channel_id
            && is_room_name(&snapshot.name)
            && self
                .config
                .category_id
                .is_none_or(|category_id| snapshot.parent_id == Some(category_id))
    }

    /// Rebuild room tracking after a restart: empty orphaned rooms in the room
    /// category are deleted and occupied ones are adopted without an owner.
    pub async fn reconcile(
        &self,
        directory: &dyn ChannelDirectory,
        guild_id: GuildId,
    ) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        let (Some(hub_channel_id), Some(_)) = (self.config.hub_channel_id, self.config.category_id)
        else {
            return report;
        };
        if !self.config.reclaim_orphans {
            return report;
        }

        for snapshot in directory.voice_channels(guild_id) {
            if self.registry.is_managed(snapshot.id)
                || !self.is_orphaned_room(&snapshot, hub_channel_id)
            {
                continue;
            }

            if snapshot.occupants == 0 {
                match directory.delete_channel(snapshot.id, REASON_ORPHANED).await {
                    Ok(()) => {
                        info!("Deleted orphaned voice room {}", snapshot.name);
                        report.deleted += 1;
                    }
                    Err(e) => {
                        error!("Failed to delete orphaned voice room {}: {}", snapshot.id, e);
                        report.skipped += 1;
                    }
                }
            } else if self.registry.adopt(snapshot.id).is_ok() {
                info!("Adopted orphaned voice room {}", snapshot.name);
                report.adopted += 1;
            } else {
                warn!(
                    "Room ceiling reached, leaving orphaned voice room {} unmanaged",
                    snapshot.name
                );
                report.skipped += 1;
            }
        }

        report
    }
}
