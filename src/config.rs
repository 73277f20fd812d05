//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the list cache can hold
    pub max_entries: usize,
    /// TTL in seconds for cached list pages, 0 = never expire
    pub default_ttl: u64,
    /// HTTP server port
    pub server_port: u16,
    /// Background expiry sweep interval in seconds
    pub cleanup_interval: u64,
    /// Page size used when the request does not specify one
    pub default_page_limit: u32,
    /// Upper bound for the page size, larger requests are clamped
    pub max_page_limit: u32,
    /// When false the service runs with an always-miss cache
    pub cache_enabled: bool,
    /// SQLite URL, None = in-memory repository
    pub database_url: Option<String>,
    /// Absolute base URL used to build `Location` headers
    pub public_base_url: String,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `DEFAULT_TTL` - Cache TTL in seconds, 0 disables expiry (default: 300)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `CLEANUP_INTERVAL` - Expiry sweep frequency in seconds (default: 1)
    /// - `DEFAULT_PAGE_LIMIT` - Page size when `limit` is omitted (default: 15)
    /// - `MAX_PAGE_LIMIT` - Largest accepted page size (default: 100)
    /// - `CACHE_ENABLED` - `false` to bypass the cache (default: true)
    /// - `DATABASE_URL` - SQLite URL, e.g. `sqlite:data/authors.db` (default: unset)
    /// - `PUBLIC_BASE_URL` - Base for `Location` headers (default: `http://localhost:{port}`)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let server_port = parse_var::<u16>("SERVER_PORT").unwrap_or(defaults.server_port);

        let default_page_limit = parse_var::<u32>("DEFAULT_PAGE_LIMIT")
            .filter(|limit| *limit > 0)
            .unwrap_or(defaults.default_page_limit);
        let max_page_limit = parse_var::<u32>("MAX_PAGE_LIMIT")
            .filter(|limit| *limit > 0)
            .unwrap_or(defaults.max_page_limit)
            .max(default_page_limit);

        Self {
            max_entries: parse_var::<usize>("MAX_ENTRIES")
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_entries),
            default_ttl: parse_var::<u64>("DEFAULT_TTL").unwrap_or(defaults.default_ttl),
            server_port,
            cleanup_interval: parse_var::<u64>("CLEANUP_INTERVAL")
                .filter(|secs| *secs > 0)
                .unwrap_or(defaults.cleanup_interval),
            default_page_limit,
            max_page_limit,
            cache_enabled: parse_var::<bool>("CACHE_ENABLED").unwrap_or(defaults.cache_enabled),
            database_url: env::var("DATABASE_URL").ok().filter(|url| !url.is_empty()),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .ok()
                .filter(|url| !url.is_empty())
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| format!("http://localhost:{}", server_port)),
        }
    }

    /// Cache TTL as a Duration, None when expiry is disabled.
    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.default_ttl > 0).then(|| Duration::from_secs(self.default_ttl))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            default_ttl: 300,
            server_port: 3000,
            cleanup_interval: 1,
            default_page_limit: 15,
            max_page_limit: 100,
            cache_enabled: true,
            database_url: None,
            public_base_url: "http://localhost:3000".to_string(),
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
