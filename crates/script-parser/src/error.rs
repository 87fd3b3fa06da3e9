//! Error types for script parsing.

use source_text::Span;
use thiserror::Error;

/// Result type for script parsing.
pub type ParseResult<T> = Result<T, ScriptParseError>;

/// A script file that swc could not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at byte {}", span.start)]
pub struct ScriptParseError {
    /// The parser's message.
    pub message: String,
    /// Where in the file the parser gave up.
    pub span: Span,
}

impl ScriptParseError {
    /// Create a new parse error.
    pub fn new(message: impl Into<String>, span: Span) -> Self {
        Self {
            message: message.into(),
            span,
        }
    }
}
