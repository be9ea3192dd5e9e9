use poise::serenity_prelude::{self as serenity, VoiceState};

use crate::{
    directory::SerenityDirectory,
    models::{Data, MemberInfo, VoiceTransition},
};

/// Handle voice state updates (user joins/leaves voice channels)
pub async fn handle_voice_state_update(
    ctx: &serenity::Context,
    old_state: Option<VoiceState>,
    new_state: VoiceState,
    data: &Data,
) {
    let Some(transition) = build_transition(old_state.as_ref(), &new_state) else {
        return;
    };

    let directory = SerenityDirectory::new(ctx);
    data.rooms.handle_transition(&directory, &transition).await;
}

fn build_transition(old_state: Option<&VoiceState>, new_state: &VoiceState) -> Option<VoiceTransition> {
    let guild_id = new_state.guild_id?;

    Some(VoiceTransition {
        guild_id,
        user_id: new_state.user_id,
        member: new_state.member.as_ref().map(|member| MemberInfo {
            display_name: member.display_name().to_string(),
            is_bot: member.user.bot,
        }),
        old_channel: old_state.and_then(|state| state.channel_id),
        new_channel: new_state.channel_id,
    })
}
