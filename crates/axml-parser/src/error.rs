//! Error types for mustache expressions.

use source_text::Span;
use thiserror::Error;

/// Result type for expression parsing.
pub type ExpressionResult<T> = Result<T, ExpressionError>;

/// A mustache expression that failed to parse.
///
/// This never aborts markup parsing. It is stored on the attribute or text
/// node it came from, in place of the parsed expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid expression `{raw}`: {message}")]
pub struct ExpressionError {
    /// The expression text that was handed to the parser.
    pub raw: String,
    /// The parser's message.
    pub message: String,
    /// Span of the owning attribute value or text node.
    pub span: Span,
}

impl ExpressionError {
    /// Create a new expression error.
    pub fn new(raw: impl Into<String>, message: impl Into<String>, span: Span) -> Self {
        Self {
            raw: raw.into(),
            message: message.into(),
            span,
        }
    }
}
