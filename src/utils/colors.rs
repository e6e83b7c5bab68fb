/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

/// Target marker for a history row:
/// met → green ✓
/// missed → red ✗
pub fn target_mark(met: bool) -> String {
    if met {
        format!("{GREEN}✓{RESET}")
    } else {
        format!("{RED}✗{RESET}")
    }
}
