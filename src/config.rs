use poise::serenity_prelude::ChannelId;
use thiserror::Error;
use tracing::info;

/// Configuration errors raised at startup
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("{key} environment variable not set. {hint}")]
    Missing { key: &'static str, hint: &'static str },

    #[error("Invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub guild_id: Option<u64>,
    pub rooms: RoomConfig,
}

/// Settings for the personal voice room manager
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomConfig {
    /// Joining this channel provisions a room; `None` disables the manager
    pub hub_channel_id: Option<ChannelId>,
    pub category_id: Option<ChannelId>,
    pub bitrate: Option<u32>,
    pub user_limit: Option<u32>,
    /// `None` means unbounded
    pub max_rooms: Option<usize>,
    /// Treat unmanaged channels named like rooms as reclaimable
    pub reclaim_orphans: bool,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let discord_token = lookup("DISCORD_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::Missing {
                key: "DISCORD_TOKEN",
                hint: "Set it with: export DISCORD_TOKEN=your_bot_token",
            })?;

        // Optional: guild ID for faster command registration
        let guild_id = parse_u64(&lookup, "GUILD_ID")?.filter(|id| *id != 0);
        if guild_id.is_some() {
            info!("Development mode: Commands will be registered to guild only");
        }

        Ok(Config {
            discord_token,
            guild_id,
            rooms: RoomConfig::from_lookup(&lookup)?,
        })
    }
}

impl RoomConfig {
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(RoomConfig {
            hub_channel_id: parse_channel(&lookup, "HUB_CHANNEL_ID")?,
            category_id: parse_channel(&lookup, "CATEGORY_ID")?,
            bitrate: parse_u64(&lookup, "ROOM_BITRATE")?
                .filter(|rate| *rate != 0)
                .map(|rate| to_u32(rate, "ROOM_BITRATE"))
                .transpose()?,
            user_limit: parse_u64(&lookup, "ROOM_USER_LIMIT")?
                .filter(|limit| *limit != 0)
                .map(|limit| to_u32(limit, "ROOM_USER_LIMIT"))
                .transpose()?,
            max_rooms: parse_u64(&lookup, "MAX_ROOMS")?
                .filter(|max| *max != 0)
                .map(|max| max as usize),
            reclaim_orphans: parse_flag(&lookup, "RECLAIM_ORPHANED_ROOMS")?,
        })
    }
}

fn parse_u64(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<u64>, ConfigError> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid { key, value: raw }),
    }
}

fn parse_channel(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<ChannelId>, ConfigError> {
    match parse_u64(lookup, key)? {
        None => Ok(None),
        Some(0) => Err(ConfigError::Invalid {
            key,
            value: "0".to_string(),
        }),
        Some(id) => Ok(Some(ChannelId::new(id))),
    }
}

fn parse_flag(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<bool, ConfigError> {
    let Some(raw) = lookup(key) else {
        return Ok(false);
    };

    match raw.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        _ => Err(ConfigError::Invalid { key, value: raw }),
    }
}

fn to_u32(value: u64, key: &'static str) -> Result<u32, ConfigError> {
    u32::try_from(value).map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_missing_token_is_an_error() {
        let result = Config::from_lookup(lookup(&[("HUB_CHANNEL_ID", "1")]));
        assert!(matches!(
            result,
            Err(ConfigError::Missing {
                key: "DISCORD_TOKEN",
                ..
            })
        ));
    }

    #[test]
    fn test_full_room_config() {
        let config = Config::from_lookup(lookup(&[
            ("DISCORD_TOKEN", "token"),
            ("GUILD_ID", "42"),
            ("HUB_CHANNEL_ID", "100"),
            ("CATEGORY_ID", "200"),
            ("ROOM_BITRATE", "64000"),
            ("ROOM_USER_LIMIT", "15"),
            ("MAX_ROOMS", "15"),
            ("RECLAIM_ORPHANED_ROOMS", "true"),
        ]))
        .unwrap();

        assert_eq!(config.guild_id, Some(42));
        assert_eq!(
            config.rooms,
            RoomConfig {
                hub_channel_id: Some(ChannelId::new(100)),
                category_id: Some(ChannelId::new(200)),
                bitrate: Some(64000),
                user_limit: Some(15),
                max_rooms: Some(15),
                reclaim_orphans: true,
            }
        );
    }

    #[test]
    fn test_zero_means_unset() {
        let rooms = RoomConfig::from_lookup(lookup(&[
            ("HUB_CHANNEL_ID", "100"),
            ("ROOM_BITRATE", "0"),
            ("ROOM_USER_LIMIT", "0"),
            ("MAX_ROOMS", "0"),
        ]))
        .unwrap();

        assert_eq!(rooms.bitrate, None);
        assert_eq!(rooms.user_limit, None);
        assert_eq!(rooms.max_rooms, None);
        assert!(!rooms.reclaim_orphans);
    }

    #[test]
    fn test_absent_hub_is_not_an_error() {
        let rooms = RoomConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(rooms.hub_channel_id, None);
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        assert!(RoomConfig::from_lookup(lookup(&[("MAX_ROOMS", "ten")])).is_err());
        assert!(RoomConfig::from_lookup(lookup(&[("HUB_CHANNEL_ID", "0")])).is_err());
        assert!(RoomConfig::from_lookup(lookup(&[("ROOM_BITRATE", "99999999999")])).is_err());
        assert!(RoomConfig::from_lookup(lookup(&[("RECLAIM_ORPHANED_ROOMS", "maybe")])).is_err());
    }
}
