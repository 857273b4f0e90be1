//! Uniform success/error wrapper returned by every tool invocation.

use crate::error::ToolError;
use serde::{Deserialize, Serialize};

/// Prefix that starts the text of every error envelope, and only those.
pub const FAILURE_MARKER: &str = "Error:";

/// A single block of tool output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
}

impl ContentBlock {
    pub fn text(&self) -> &str {
        match self {
            Self::Text { text } => text,
        }
    }
}

/// Wire shape: `{ "content": [{ "type": "text", "text": ... }], "isError": bool }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub content: Vec<ContentBlock>,
    pub is_error: bool,
}

impl ResponseEnvelope {
    /// Wrap a rendered report.
    ///
    /// An empty report still yields a non-empty block, and a report that
    /// would collide with the failure marker is indented by one space.
    pub fn success(text: impl Into<String>) -> Self {
        let mut text = text.into();
        if text.trim().is_empty() {
            text = "(no data)".to_string();
        } else if text.starts_with(FAILURE_MARKER) {
            text.insert(0, ' ');
        }
        Self {
            content: vec![ContentBlock::Text { text }],
            is_error: false,
        }
    }

    pub fn error(err: &ToolError) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: err.render() }],
            is_error: true,
        }
    }

    /// Text of the first block; every envelope has one.
    pub fn text(&self) -> &str {
        self.content.first().map_or("", ContentBlock::text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_shape_matches_host_contract() {
        let env = ResponseEnvelope::success("# Report");
        let v = serde_json::to_value(&env).unwrap();
        assert_eq!(
            v,
            serde_json::json!({
                "content": [{ "type": "text", "text": "# Report" }],
                "isError": false
            })
        );
    }

    #[test]
    fn error_envelope_starts_with_marker() {
        let env = ResponseEnvelope::error(&ToolError::internal("oops"));
        assert!(env.is_error);
        assert!(env.text().starts_with(FAILURE_MARKER));
        assert_eq!(env.content.len(), 1);
    }

    #[test]
    fn success_never_looks_like_failure() {
        let env = ResponseEnvelope::success("Error: not really");
        assert!(!env.text().starts_with(FAILURE_MARKER));

        let empty = ResponseEnvelope::success("   ");
        assert_eq!(empty.text(), "(no data)");
    }
}
