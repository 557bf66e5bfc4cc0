//! Supporting helpers for terminal message prefixes.

use owo_colors::OwoColorize;

fn use_colors() -> bool {
    std::env::var_os("NO_COLOR").is_none()
}

/// Prefix for fatal/usage errors on stderr.
pub fn error_prefix() -> String {
    if use_colors() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

/// Prefix for friendly notes on stderr.
pub fn note_prefix() -> String {
    if use_colors() {
        "note:".blue().bold().to_string()
    } else {
        "note:".to_string()
    }
}

/// Prefix for informational hints on stderr.
pub fn info_prefix() -> String {
    if use_colors() {
        "info:".cyan().bold().to_string()
    } else {
        "info:".to_string()
    }
}
