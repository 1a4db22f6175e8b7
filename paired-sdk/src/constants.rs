// ABOUTME: Centralized constants for the paired fetch SDK
// ABOUTME: Contains timeouts, default endpoints, and resource naming

/// HTTP and request timeouts
pub mod timeouts {
    use std::time::Duration;

    /// Default timeout for HTTP requests
    pub const HTTP_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Maximum number of redirects followed per request
    pub const MAX_REDIRECTS: usize = 3;
}

/// Resource locations
pub mod urls {
    /// Base URL the tutorial images and metadata are served from
    pub const DEFAULT_RESOURCE_BASE: &str =
        "https://www.andyibanez.com/fairesepages.github.io/tutorials/async-await/part1/";

    /// File extension of the image leg
    pub const IMAGE_EXTENSION: &str = "png";

    /// File extension of the metadata leg
    pub const METADATA_EXTENSION: &str = "json";
}

/// Default User-Agent header
pub const USER_AGENT: &str = concat!("paired-sdk/", env!("CARGO_PKG_VERSION"));
