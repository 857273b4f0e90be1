use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::{Config, MiningStatsConfig};
use crate::error::MiningStatsError;

/// Statistics API client
///
/// The client is generic over a [`Config`] implementation that provides the
/// base URL and the per-request timeout. Cloning is cheap; the connection
/// pool is shared.
#[derive(Debug, Clone)]
pub struct Client<C: Config = MiningStatsConfig> {
    http: reqwest::Client,
    config: C,
}

impl Client<MiningStatsConfig> {
    /// Creates a new client with configuration from the environment
    ///
    /// - `MINING_STATS_BASE_URL` for the API base URL
    /// - `MINING_STATS_TIMEOUT_SECS` for the per-request timeout
    pub fn new() -> Result<Self, MiningStatsError> {
        Self::with_config(MiningStatsConfig::new())
    }
}

impl<C: Config> Client<C> {
    /// Creates a new client with the given configuration.
    pub fn with_config(config: C) -> Result<Self, MiningStatsError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| MiningStatsError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { http, config })
    }

    /// Returns a reference to the client's configuration
    #[must_use]
    pub const fn config(&self) -> &C {
        &self.config
    }

    /// One GET, one status check, one typed parse.
    pub(crate) async fn get<O>(&self, path: &str) -> Result<O, MiningStatsError>
    where
        O: DeserializeOwned,
    {
        let url = self.config.url(path);
        debug!(path, "GET");

        let http_err = |source| MiningStatsError::Http {
            path: path.to_string(),
            source,
        };

        let response = self.http.get(&url).send().await.map_err(http_err)?;
        let status = response.status();
        debug!(path, status = status.as_u16(), "response");

        if !status.is_success() {
            return Err(MiningStatsError::Api {
                status: status.as_u16(),
                path: path.to_string(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let bytes = response.bytes().await.map_err(http_err)?;
        serde_json::from_slice(&bytes).map_err(|e| MiningStatsError::Shape {
            path: path.to_string(),
            message: e.to_string(),
        })
    }
}
