// ABOUTME: Centralized constants for the paired CLI application
// ABOUTME: Contains environment variable names, config locations, and UI timings

/// Environment variables read by the CLI
pub mod env {
    /// Overrides the resource base URL from any config file
    pub const BASE_URL: &str = "PAIRED_BASE_URL";

    /// Suppresses progress spinners when set
    pub const QUIET: &str = "PAIRED_QUIET";
}

/// Configuration file locations
pub mod config {
    /// Project-local config file name
    pub const PROJECT_FILE: &str = "paired.toml";

    /// Directory name under the XDG config home
    pub const APP_DIR: &str = "paired";

    /// Config file name inside the app directory
    pub const FILE_NAME: &str = "config.toml";
}

/// Timeout configurations for various operations
pub mod timeouts {
    /// Progress spinner tick interval for smooth animation
    pub const PROGRESS_TICK_MS: u64 = 80;
}

/// Output formats accepted in config files
pub const OUTPUT_FORMATS: &[&str] = &["text", "json"];
