//! Scanning of `{{ ... }}` interpolation spans.
//!
//! A span opens at `{{` and closes at the first `}}` after it. An opener
//! without a closer is literal text.

/// A piece of a value split at mustache boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Text outside any `{{ ... }}`.
    Literal(&'a str),
    /// The text between `{{` and `}}`, untrimmed.
    Expression(&'a str),
}

/// Find the byte range of the next complete mustache span at or after `from`.
pub fn next_span(value: &str, from: usize) -> Option<(usize, usize)> {
    let open = from + value.get(from..)?.find("{{")?;
    let close = open + 2 + value[open + 2..].find("}}")?;
    Some((open, close + 2))
}

/// Check whether a value contains at least one complete `{{ ... }}` span.
pub fn has_mustache(value: &str) -> bool {
    next_span(value, 0).is_some()
}

/// Split a value into literal and expression segments, in order.
/// Empty literal segments are omitted.
pub fn segments(value: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut pos = 0;
    while let Some((start, end)) = next_span(value, pos) {
        if start > pos {
            out.push(Segment::Literal(&value[pos..start]));
        }
        out.push(Segment::Expression(&value[start + 2..end - 2]));
        pos = end;
    }
    if pos < value.len() {
        out.push(Segment::Literal(&value[pos..]));
    }
    out
}

/// If the whole value is exactly one `{{ expr }}` span, return `expr` trimmed.
pub fn whole_expression(value: &str) -> Option<&str> {
    match segments(value).as_slice() {
        [Segment::Expression(inner)] => Some(inner.trim()),
        _ => None,
    }
}

/// Remove one pair of enclosing mustache delimiters, if present, and trim.
///
/// `"{{ items }}"` becomes `"items"`; `"items"` is returned trimmed.
pub fn strip_delimiters(value: &str) -> &str {
    whole_expression(value).unwrap_or_else(|| value.trim())
}
