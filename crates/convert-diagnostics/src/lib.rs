//! Conversion diagnostics.
//!
//! The markup and script transformers never abort a file for a construct
//! they cannot carry over faithfully. They degrade it and record a
//! [`Diagnostic`] instead, which the command line reports next to the
//! offending file.

use source_text::Span;
use std::fmt;

/// A diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// The diagnostic message.
    pub message: String,
    /// The span in the source file where the diagnostic applies.
    pub span: Span,
    /// The severity level.
    pub severity: Severity,
    /// The diagnostic code.
    pub code: DiagnosticCode,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    pub fn error(message: impl Into<String>, span: Span, code: DiagnosticCode) -> Self {
        Self {
            message: message.into(),
            span,
            severity: Severity::Error,
            code,
        }
    }

    /// Create a new warning diagnostic.
    pub fn warning(message: impl Into<String>, span: Span, code: DiagnosticCode) -> Self {
        Self {
            message: message.into(),
            span,
            severity: Severity::Warning,
            code,
        }
    }

    /// Create a new hint diagnostic.
    pub fn hint(message: impl Into<String>, span: Span, code: DiagnosticCode) -> Self {
        Self {
            message: message.into(),
            span,
            severity: Severity::Hint,
            code,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]: {}", self.severity, self.code, self.message)
    }
}

/// Diagnostic severity levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// The converted output is known to be wrong.
    Error,
    /// Part of the input was dropped or approximated.
    Warning,
    /// The output is correct but differs from a literal translation.
    Hint,
}

impl Severity {
    /// Get the severity as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Hint => "hint",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Diagnostic codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticCode {
    // Markup diagnostics
    /// A mustache expression that does not parse.
    InvalidExpression,
    /// A loop directive whose value is not a mustache expression.
    InvalidLoopDirective,
    /// A module-import element without `from` or `name`.
    IncompleteModuleImport,
    /// An attribute mixing literal text and mustache spans.
    MixedInterpolation,

    // Script diagnostics
    /// A configuration-object key that is not carried over.
    UnsupportedOption,
    /// A data initializer that is not a literal.
    NonLiteralData,
    /// Several source hooks folded into one target hook.
    MergedLifecycle,
    /// A path observer converted to a deep watcher without its body.
    DeepWatchPlaceholder,
}

impl DiagnosticCode {
    /// Get the code as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidExpression => "invalid-expression",
            Self::InvalidLoopDirective => "invalid-loop-directive",
            Self::IncompleteModuleImport => "incomplete-module-import",
            Self::MixedInterpolation => "mixed-interpolation",
            Self::UnsupportedOption => "unsupported-option",
            Self::NonLiteralData => "non-literal-data",
            Self::MergedLifecycle => "merged-lifecycle",
            Self::DeepWatchPlaceholder => "deep-watch-placeholder",
        }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Count diagnostics at or above warning level.
pub fn warning_count(diagnostics: &[Diagnostic]) -> usize {
    diagnostics
        .iter()
        .filter(|d| d.severity <= Severity::Warning)
        .count()
}
