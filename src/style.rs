//! ANSI terminal color styling for diagnostics.
//!
//! Simple escape-code wrappers for colorizing error and help output. Colors
//! reset at the end of each wrapped string, and the whole layer can be
//! switched off at runtime (`set nocolor`, `--color=never`, `NO_COLOR`).

use std::sync::atomic::{AtomicBool, Ordering};

static COLOR_ENABLED: AtomicBool = AtomicBool::new(true);

/// ANSI escape code styling utilities.
pub struct Style;

impl Style {
    pub const RESET: &'static str = "\x1b[0m";
    pub const BOLD: &'static str = "\x1b[1m";
    pub const RED: &'static str = "\x1b[31m";
    pub const GREEN: &'static str = "\x1b[32m";
    pub const YELLOW: &'static str = "\x1b[33m";
    pub const BLUE: &'static str = "\x1b[34m";
    pub const CYAN: &'static str = "\x1b[36m";

    pub fn set_enabled(on: bool) {
        COLOR_ENABLED.store(on, Ordering::Relaxed);
    }

    pub fn enabled() -> bool {
        COLOR_ENABLED.load(Ordering::Relaxed)
    }

    fn wrap(code: &str, s: &str) -> String {
        if Self::enabled() {
            format!("{}{}{}", code, s, Self::RESET)
        } else {
            s.to_string()
        }
    }

    pub fn red(s: &str) -> String {
        Self::wrap(Self::RED, s)
    }

    pub fn green(s: &str) -> String {
        Self::wrap(Self::GREEN, s)
    }

    pub fn yellow(s: &str) -> String {
        Self::wrap(Self::YELLOW, s)
    }

    pub fn blue(s: &str) -> String {
        Self::wrap(Self::BLUE, s)
    }

    pub fn cyan(s: &str) -> String {
        Self::wrap(Self::CYAN, s)
    }

    pub fn bold(s: &str) -> String {
        Self::wrap(Self::BOLD, s)
    }

    pub fn bold_red(s: &str) -> String {
        if Self::enabled() {
            format!("{}{}{}{}", Self::BOLD, Self::RED, s, Self::RESET)
        } else {
            s.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn red_wraps_string() {
        Style::set_enabled(true);
        let result = Style::red("error");
        assert!(result.contains("\x1b[31m"));
        assert!(result.contains("error"));
        assert!(result.contains("\x1b[0m"));
    }

    #[test]
    fn bold_red_combines_codes() {
        Style::set_enabled(true);
        let result = Style::bold_red("Error");
        assert!(result.contains("\x1b[1m"));
        assert!(result.contains("\x1b[31m"));
    }

    #[test]
    fn disabled_passes_through() {
        Style::set_enabled(false);
        assert_eq!(Style::red("plain"), "plain");
        Style::set_enabled(true);
    }
}
