//! Error taxonomy and the tool-boundary error handler.

use std::any::Any;
use std::fmt::Write as _;
use thiserror::Error;

/// Error type returned by tool operations.
///
/// Every failure inside a tool invocation ends up as exactly one of these
/// four kinds before it crosses the tool boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ToolError {
    /// Caller input or an upstream body did not satisfy its declared shape.
    #[error("invalid {subject}: {}", violations.join("; "))]
    Validation {
        /// What was being validated (`input`, or a response from an endpoint).
        subject: String,
        /// Every violated constraint, one entry each.
        violations: Vec<String>,
    },

    /// Transport-level failure, including timeouts.
    #[error("network failure: {message}")]
    Network {
        /// Short description of the failure.
        message: String,
        /// Rendered lower-level cause chain, when one was available.
        cause: Option<String>,
    },

    /// The remote service answered with a non-success status.
    #[error("upstream API error {status} {reason} from {endpoint}")]
    UpstreamApi {
        /// HTTP status code.
        status: u16,
        /// Endpoint path that was requested.
        endpoint: String,
        /// Reason phrase for the status.
        reason: String,
    },

    /// Anything that could not be classified.
    #[error("unexpected internal error: {0}")]
    Internal(String),
}

/// Discriminant of [`ToolError`], used for logging and assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Network,
    UpstreamApi,
    UnexpectedInternal,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Network => "network",
            Self::UpstreamApi => "upstream_api",
            Self::UnexpectedInternal => "unexpected_internal",
        }
    }
}

impl ToolError {
    /// Create a validation error for caller input.
    pub fn invalid_input<I, S>(violations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self::Validation {
            subject: "input".to_string(),
            violations: violations.into_iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Create a validation error for a malformed upstream response body.
    pub fn invalid_response<S: ToString>(endpoint: &str, violation: S) -> Self {
        Self::Validation {
            subject: format!("response from {endpoint}"),
            violations: vec![violation.to_string()],
        }
    }

    /// Create a network error.
    pub fn network<S: ToString>(message: S, cause: Option<String>) -> Self {
        Self::Network {
            message: message.to_string(),
            cause,
        }
    }

    /// Create an upstream API error.
    pub fn upstream<S: ToString>(status: u16, endpoint: &str, reason: S) -> Self {
        Self::UpstreamApi {
            status,
            endpoint: endpoint.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an internal error.
    pub fn internal<S: ToString>(s: S) -> Self {
        Self::Internal(s.to_string())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Network { .. } => ErrorKind::Network,
            Self::UpstreamApi { .. } => ErrorKind::UpstreamApi,
            Self::Internal(_) => ErrorKind::UnexpectedInternal,
        }
    }

    /// Short, kind-specific message with the relevant diagnostic field.
    ///
    /// The result always starts with [`crate::envelope::FAILURE_MARKER`].
    pub fn render(&self) -> String {
        let marker = crate::envelope::FAILURE_MARKER;
        match self {
            Self::Validation {
                subject,
                violations,
            } => {
                let mut out = format!("{marker} Invalid {subject}:");
                for v in violations {
                    let _ = write!(out, "\n- {v}");
                }
                out
            }
            Self::Network { message, cause } => {
                let mut out = format!("{marker} Network failure: {message}");
                if let Some(cause) = cause {
                    let _ = write!(out, "\nCause: {cause}");
                }
                out.push_str("\nThe statistics service could not be reached. Try again later.");
                out
            }
            Self::UpstreamApi {
                status,
                endpoint,
                reason,
            } => format!("{marker} Upstream API error {status} {reason} from {endpoint}"),
            Self::Internal(msg) => format!("{marker} Unexpected internal error: {msg}"),
        }
    }
}

/// A fault caught at the tool boundary.
pub enum Fault {
    /// A typed error returned through `Result`.
    Tool(ToolError),
    /// A panic payload caught while the tool was running.
    Panic(Box<dyn Any + Send>),
}

impl std::fmt::Debug for Fault {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tool(e) => f.debug_tuple("Tool").field(e).finish(),
            Self::Panic(_) => f.write_str("Panic(..)"),
        }
    }
}

/// Map any caught fault to exactly one [`ToolError`] kind.
///
/// Classification is structural: typed errors keep their variant, panic
/// payloads are downcast. Unknown payload shapes become `Internal`.
pub fn classify(fault: Fault) -> ToolError {
    match fault {
        Fault::Tool(e) => e,
        Fault::Panic(payload) => {
            if let Some(e) = payload.downcast_ref::<ToolError>() {
                e.clone()
            } else if let Some(s) = payload.downcast_ref::<&'static str>() {
                ToolError::Internal((*s).to_string())
            } else if let Some(s) = payload.downcast_ref::<String>() {
                ToolError::Internal(s.clone())
            } else {
                ToolError::Internal("panic with non-string payload".to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_render_lists_every_violation() {
        let e = ToolError::invalid_input(["limit: must be <= 15 (got 99)", "period: is required"]);
        let text = e.render();
        assert!(text.starts_with("Error:"));
        assert!(text.contains("- limit: must be <= 15 (got 99)"));
        assert!(text.contains("- period: is required"));
        assert_eq!(e.kind(), ErrorKind::Validation);
    }

    #[test]
    fn upstream_render_includes_status_and_path() {
        let e = ToolError::upstream(429, "/api/v1/prices", "Too Many Requests");
        assert_eq!(
            e.render(),
            "Error: Upstream API error 429 Too Many Requests from /api/v1/prices"
        );
    }

    #[test]
    fn network_render_includes_cause() {
        let e = ToolError::network("request timed out", Some("operation timed out".into()));
        let text = e.render();
        assert!(text.contains("Network failure: request timed out"));
        assert!(text.contains("Cause: operation timed out"));
    }

    #[test]
    fn classify_keeps_typed_errors() {
        let e = ToolError::network("down", None);
        assert_eq!(classify(Fault::Tool(e.clone())), e);
    }

    #[test]
    fn classify_panic_payloads() {
        let s: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(
            classify(Fault::Panic(s)),
            ToolError::Internal("boom".into())
        );

        let owned: Box<dyn Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(
            classify(Fault::Panic(owned)),
            ToolError::Internal("owned boom".into())
        );

        let typed: Box<dyn Any + Send> = Box::new(ToolError::upstream(500, "/x", "Internal"));
        assert_eq!(classify(Fault::Panic(typed)).kind(), ErrorKind::UpstreamApi);

        let other: Box<dyn Any + Send> = Box::new(42_u8);
        assert_eq!(
            classify(Fault::Panic(other)).kind(),
            ErrorKind::UnexpectedInternal
        );
    }
}
