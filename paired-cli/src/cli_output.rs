// ABOUTME: Centralized CLI output utilities for consistent user-facing messages
// ABOUTME: Provides standardized formatting for errors and saved-file notices on stderr

use owo_colors::OwoColorize;
use std::path::Path;

/// Stderr messages that sit beside the fetch output on stdout
pub struct CliOutput {
    use_color: bool,
}

impl CliOutput {
    /// Create CLI output utility with explicit color setting
    pub fn with_color(use_color: bool) -> Self {
        Self { use_color }
    }

    fn tagged(&self, tag: &str, message: &str) -> String {
        if !self.use_color {
            return format!("{} {}", tag, message);
        }
        let tag = match tag {
            "error:" => tag.red().bold().to_string(),
            "saved:" => tag.green().bold().to_string(),
            _ => tag.to_string(),
        };
        format!("{} {}", tag, message)
    }

    /// Display an error message
    pub fn error(&self, message: &str) {
        eprintln!("{}", self.tagged("error:", message));
    }

    /// Note where the decoded image was written
    pub fn saved(&self, path: &Path) {
        eprintln!("{}", self.tagged("saved:", &path.display().to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_tags() {
        let cli = CliOutput::with_color(false);
        assert_eq!(cli.tagged("error:", "boom"), "error: boom");
        assert_eq!(cli.tagged("saved:", "goku.png"), "saved: goku.png");
    }

    #[test]
    fn test_colored_tags() {
        let cli = CliOutput::with_color(true);
        let line = cli.tagged("saved:", "goku.png");
        assert!(line.contains("\x1b["));
        assert!(line.ends_with(" goku.png"));
    }

    #[test]
    fn test_messages_can_be_emitted() {
        let cli = CliOutput::with_color(false);
        cli.error("test error");
        cli.saved(Path::new("out.png"));
    }
}
