//! Terminal styling helpers
//!
//! Output goes through `anstream`, which strips the escapes when stdout isn't
//! a terminal, so styling here never checks for color support itself.

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;
use std::fmt::Display;

/// Check mark used in summaries
pub const CHECK: &str = "✓";
/// Cross used for failing signals
pub const CROSS: &str = "✗";

/// Semantic styles for CLI output
pub trait Stylize: Display + Sized {
    /// Headings and important names
    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    /// Counts, branch names, PR numbers
    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    /// Secondary information
    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    /// Completed work
    fn success(&self) -> String {
        self.green().to_string()
    }

    /// Non-fatal problems
    fn warn(&self) -> String {
        self.yellow().to_string()
    }

    /// Failures
    fn error(&self) -> String {
        self.red().bold().to_string()
    }
}

impl<T: Display> Stylize for T {}

/// Green check mark
pub fn check() -> String {
    CHECK.success()
}

/// Red cross
pub fn cross() -> String {
    CROSS.error()
}

/// Bullet arrow for step lists
pub fn arrow() -> String {
    "→".muted()
}

/// Spinner style for long-running steps
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
}
