use stats_tools_core::ToolError;
use thiserror::Error;

/// Errors that can occur when using the statistics client
#[derive(Debug, Error)]
pub enum MiningStatsError {
    /// Transport failure, including timeouts
    #[error("request to {path} failed: {source}")]
    Http {
        /// Endpoint path that was requested
        path: String,
        /// Underlying reqwest error
        #[source]
        source: reqwest::Error,
    },

    /// Non-success HTTP status
    #[error("API error {status} {reason} from {path}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Endpoint path that was requested
        path: String,
        /// Canonical reason phrase for the status
        reason: String,
    },

    /// The body was not JSON or did not have the expected structure
    #[error("unexpected response shape from {path}: {message}")]
    Shape {
        /// Endpoint path that was requested
        path: String,
        /// Deserializer message, including the offending location
        message: String,
    },

    /// The HTTP client could not be built
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl MiningStatsError {
    /// Whether the request never produced a response
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http { .. })
    }

    /// Short transport message for a reqwest failure
    fn transport_message(path: &str, e: &reqwest::Error) -> String {
        if e.is_timeout() {
            format!("request to {path} timed out")
        } else if e.is_connect() {
            format!("could not connect for {path}")
        } else {
            format!("request to {path} failed")
        }
    }
}

/// Renders an error and its `source()` chain as `a: b: c`
#[must_use]
pub fn cause_chain(e: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![e.to_string()];
    let mut next = e.source();
    while let Some(inner) = next {
        let text = inner.to_string();
        if parts.last() != Some(&text) {
            parts.push(text);
        }
        next = inner.source();
    }
    parts.join(": ")
}

impl From<MiningStatsError> for ToolError {
    fn from(e: MiningStatsError) -> Self {
        match e {
            MiningStatsError::Http { path, source } => ToolError::network(
                MiningStatsError::transport_message(&path, &source),
                Some(cause_chain(&source)),
            ),
            MiningStatsError::Api {
                status,
                path,
                reason,
            } => ToolError::upstream(status, &path, reason),
            MiningStatsError::Shape { path, message } => {
                ToolError::invalid_response(&path, message)
            }
            MiningStatsError::Config(msg) => ToolError::internal(msg),
        }
    }
}
