/// Pure functions for formatting user-facing replies (Discord-agnostic)
use std::time::Duration;

/// Format an error message with emoji
pub fn format_error(message: &str) -> String {
    format!("❌ {}", message)
}

/// Format an info message with emoji
pub fn format_info(message: &str) -> String {
    format!("ℹ️ {}", message)
}

/// Reply for an interaction naming a command the bot no longer knows
pub fn build_command_not_found() -> String {
    format_error("Command not found.")
}

/// Reply for a command invoked again before its cooldown elapsed
pub fn build_cooldown_message(command_name: &str, remaining: Duration) -> String {
    format_error(&format!(
        "Please wait another `{:.1}` seconds before using `{}` again.",
        remaining.as_secs_f64(),
        command_name
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error() {
        assert_eq!(format_error("Something failed"), "❌ Something failed");
    }

    #[test]
    fn test_format_info() {
        assert_eq!(format_info("FYI"), "ℹ️ FYI");
    }

    #[test]
    fn test_build_cooldown_message() {
        assert_eq!(
            build_cooldown_message("ping", Duration::from_millis(1500)),
            "❌ Please wait another `1.5` seconds before using `ping` again."
        );
        assert!(build_cooldown_message("ping", Duration::from_millis(2960)).contains("`3.0`"));
        assert!(build_cooldown_message("ping", Duration::from_millis(40)).contains("`0.0`"));
    }
}
