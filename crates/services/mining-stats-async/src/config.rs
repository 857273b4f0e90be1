use std::time::Duration;

/// Default statistics API base URL
pub const MINING_STATS_DEFAULT_BASE: &str = "https://mempool.space";
/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Environment variable overriding the base URL
pub const ENV_BASE_URL: &str = "MINING_STATS_BASE_URL";
/// Environment variable overriding the request timeout
pub const ENV_TIMEOUT_SECS: &str = "MINING_STATS_TIMEOUT_SECS";

/// Configuration for the statistics client
#[derive(Clone, Debug)]
pub struct MiningStatsConfig {
    api_base: String,
    timeout: Duration,
}

impl Default for MiningStatsConfig {
    fn default() -> Self {
        let api_base = std::env::var(ENV_BASE_URL)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| MINING_STATS_DEFAULT_BASE.into());

        // Unparsable or zero values fall back to the default
        let timeout_secs = std::env::var(ENV_TIMEOUT_SECS)
            .ok()
            .and_then(|v| v.trim().parse::<u64>().ok())
            .filter(|&secs| secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            api_base,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl MiningStatsConfig {
    /// Creates a new configuration with default settings
    ///
    /// Reads from environment variables:
    /// - `MINING_STATS_BASE_URL` for the API base URL (defaults to `https://mempool.space`)
    /// - `MINING_STATS_TIMEOUT_SECS` for the per-request timeout (defaults to 15)
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API base URL
    #[must_use]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Sets the per-request timeout; a zero duration keeps the current value
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.timeout = timeout;
        }
        self
    }

    /// Returns the configured API base URL
    #[must_use]
    pub fn api_base(&self) -> &str {
        &self.api_base
    }
}

/// Configuration trait for the statistics client
pub trait Config: Send + Sync {
    /// Constructs the full URL for an API endpoint
    fn url(&self, path: &str) -> String;

    /// Bound on one logical request, connect through body
    fn timeout(&self) -> Duration;
}

impl Config for MiningStatsConfig {
    fn url(&self, path: &str) -> String {
        let base = self.api_base.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}
