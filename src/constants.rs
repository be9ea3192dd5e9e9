/// Suffix appended to a member's sanitized display name for their room
pub const ROOM_NAME_SUFFIX: &str = "'s Room";

/// Room name used when nothing survives sanitization
pub const FALLBACK_ROOM_NAME: &str = "Private Room";

/// Maximum length for channel names
pub const MAX_CHANNEL_NAME_LENGTH: usize = 100;

/// Cooldown applied to commands that don't declare one
pub const DEFAULT_COOLDOWN_SECS: u64 = 3;

/// How often expired cooldown entries are swept
pub const COOLDOWN_SWEEP_INTERVAL_SECS: u64 = 60;

/// Audit log reasons
pub const REASON_MOVE_EXISTING: &str = "Moving member to their existing voice room.";
pub const REASON_MOVE_NEW: &str = "Moving member to their personal voice room.";
pub const REASON_EMPTY: &str = "Channel empty after members left.";
pub const REASON_ORPHANED: &str = "Orphaned voice room found empty on startup.";

/// Log directive for the application
pub const LOG_DIRECTIVE: &str = "roombot=info";
