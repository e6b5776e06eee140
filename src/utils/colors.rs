/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// GREY for an empty optional cell, RESET otherwise.
pub fn color_for_optional_field<T: AsRef<str>>(value: Option<T>) -> &'static str {
    match value {
        Some(v) if !v.as_ref().trim().is_empty() => RESET,
        _ => GREY,
    }
}

/// Action labels written by older logbooks, still found in migrated databases.
pub const LEGACY_CHECK_IN: &str = "Anmeldung";
pub const LEGACY_CHECK_OUT: &str = "Abmeldung";

/// Check-in labels in green, check-out labels in red, anything else plain.
/// The legacy labels count as well, whatever is configured.
pub fn colorize_action(action: &str, check_in: &str, check_out: &str) -> String {
    if action == check_in || action == LEGACY_CHECK_IN {
        format!("{GREEN}{action}{RESET}")
    } else if action == check_out || action == LEGACY_CHECK_OUT {
        format!("{RED}{action}{RESET}")
    } else {
        action.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_are_colored_by_label() {
        assert_eq!(colorize_action("check-in", "check-in", "check-out"), format!("{GREEN}check-in{RESET}"));
        assert_eq!(colorize_action("Pause", "check-in", "check-out"), "Pause");
        assert_eq!(color_for_optional_field(None::<&str>), GREY);
        assert_eq!(color_for_optional_field(Some("5a")), RESET);
    }

    #[test]
    fn legacy_labels_keep_their_colors() {
        assert_eq!(colorize_action("Anmeldung", "check-in", "check-out"), format!("{GREEN}Anmeldung{RESET}"));
        assert_eq!(colorize_action("Abmeldung", "check-in", "check-out"), format!("{RED}Abmeldung{RESET}"));
    }
}
