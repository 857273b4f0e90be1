//! Tool execution context.

use crate::fmt::TextOptions;

/// Context passed to tool executions.
///
/// Carries the per-call rendering options; tools that only fetch data can
/// ignore it.
#[derive(Clone, Default, Debug)]
pub struct ToolContext {
    text: TextOptions,
}

impl ToolContext {
    /// Create a new default context.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_text_options(mut self, text: TextOptions) -> Self {
        self.text = text;
        self
    }

    pub fn text_options(&self) -> &TextOptions {
        &self.text
    }
}
