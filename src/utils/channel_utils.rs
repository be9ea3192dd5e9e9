/// Pure functions for room naming and channel settings (Discord-agnostic)
use poise::serenity_prelude::PremiumTier;

use crate::constants::{FALLBACK_ROOM_NAME, MAX_CHANNEL_NAME_LENGTH, ROOM_NAME_SUFFIX};

/// Build a room name from a member's display name.
///
/// Line breaks become a single space, anything other than letters, digits,
/// whitespace, apostrophes and hyphens is dropped, and the result is trimmed
/// before the suffix is appended. The final name never exceeds the channel
/// name limit.
pub fn build_room_name(display_name: &str) -> String {
    let mut base = String::with_capacity(display_name.len());
    let mut in_line_break = false;

    for c in display_name.chars() {
        if c == '\n' || c == '\r' {
            if !in_line_break {
                base.push(' ');
            }
            in_line_break = true;
            continue;
        }
        in_line_break = false;

        if c.is_alphabetic() || c.is_numeric() || c.is_whitespace() || c == '\'' || c == '-' {
            base.push(c);
        }
    }

    let base = base.trim();
    let name = if base.is_empty() {
        FALLBACK_ROOM_NAME.to_string()
    } else {
        format!("{}{}", base, ROOM_NAME_SUFFIX)
    };

    name.chars().take(MAX_CHANNEL_NAME_LENGTH).collect()
}

/// Check if a channel name looks like a personal room
pub fn is_room_name(channel_name: &str) -> bool {
    channel_name.ends_with(ROOM_NAME_SUFFIX)
}

/// Highest bitrate a guild may use for voice channels at its boost tier
pub fn max_bitrate_for_tier(tier: PremiumTier) -> u32 {
    match tier {
        PremiumTier::Tier1 => 128_000,
        PremiumTier::Tier2 => 256_000,
        PremiumTier::Tier3 => 384_000,
        _ => 96_000,
    }
}

/// Clamp a requested bitrate to the guild maximum. Zero means "use the default".
pub fn clamp_bitrate(requested: Option<u32>, maximum: Option<u32>) -> Option<u32> {
    requested
        .filter(|rate| *rate > 0)
        .map(|rate| maximum.map_or(rate, |max| rate.min(max)))
}
