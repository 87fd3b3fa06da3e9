//! Parsing of mustache expressions with swc.

use crate::error::{ExpressionError, ExpressionResult};
use crate::mustache::{self, Segment};
use source_text::Span;
use std::sync::Arc;
use swc_common::{FileName, SourceMap, Spanned};
use swc_ecma_ast::Expr;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax};

/// Parse a standalone JavaScript expression.
///
/// Input left over after the expression is an error, so `a b` fails instead
/// of silently yielding `a`.
pub fn parse_expression(source: &str) -> Result<Box<Expr>, String> {
    let cm: Arc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        FileName::Custom("mustache.js".into()).into(),
        source.to_string(),
    );
    let file_start = fm.start_pos.0;

    let mut parser = Parser::new(
        Syntax::Es(EsSyntax::default()),
        StringInput::from(&*fm),
        None,
    );
    let expr = parser
        .parse_expr()
        .map_err(|e| e.kind().msg().into_owned())?;

    let consumed = (expr.span().hi.0 - file_start) as usize;
    match source.get(consumed..) {
        Some(rest) if !rest.trim().is_empty() => {
            Err(format!("unexpected `{}` after expression", rest.trim()))
        }
        _ => Ok(expr),
    }
}

/// Parse the interpolation carried by an attribute value or text node.
///
/// Returns `None` when the value has no mustache span. A value that is a
/// single `{{ expr }}` parses as `expr`; a value mixing literal text and
/// spans parses as the equivalent template literal.
pub fn parse_interpolation(value: &str, span: Span) -> Option<ExpressionResult<Box<Expr>>> {
    if !mustache::has_mustache(value) {
        return None;
    }
    let source = match mustache::whole_expression(value) {
        Some(inner) => inner.to_string(),
        None => to_template_literal(value),
    };
    Some(parse_expression(&source).map_err(|message| ExpressionError::new(source, message, span)))
}

/// Rewrite a mixed value as a JavaScript template literal.
pub fn to_template_literal(value: &str) -> String {
    let mut out = String::from("`");
    for segment in mustache::segments(value) {
        match segment {
            Segment::Literal(text) => out.push_str(&escape_template_text(text)),
            Segment::Expression(expr) => {
                out.push_str("${");
                out.push_str(expr.trim());
                out.push('}');
            }
        }
    }
    out.push('`');
    out
}

/// Escape text for the literal part of a template string.
pub fn escape_template_text(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('`', "\\`")
        .replace("${", "\\${")
}
