//! Source position tracking and indented text building for axml2vue.
//!
//! Every stage of the converter works on byte offsets into the original
//! file. This crate holds the shared [`Span`] type, a [`LineIndex`] for
//! turning offsets into human-readable positions, and the [`CodeBuilder`]
//! the generators use to lay out nested output.

use std::ops::Range;

/// A span in the source text, representing a half-open range [start, end).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Start offset (inclusive)
    pub start: u32,
    /// End offset (exclusive)
    pub end: u32,
}

impl Span {
    /// Create a new span from start and end offsets.
    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create an empty span at the given offset.
    #[inline]
    pub const fn empty(offset: u32) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// Create a span from a byte range.
    #[inline]
    pub fn from_range(range: Range<usize>) -> Self {
        Self {
            start: range.start as u32,
            end: range.end as u32,
        }
    }

    /// Convert to a `Range<usize>`.
    #[inline]
    pub fn to_range(self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    /// Borrow the text this span covers, if it lies inside `source`.
    pub fn slice(self, source: &str) -> Option<&str> {
        source.get(self.to_range())
    }
}

/// A line index for converting byte offsets to line/column positions.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offsets of the start of each line.
    line_starts: Vec<u32>,
    /// Total length of the source.
    len: u32,
}

impl LineIndex {
    /// Create a new line index from source text.
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push((i + 1) as u32);
            }
        }
        Self {
            line_starts,
            len: text.len() as u32,
        }
    }

    /// Get the line and column for a byte offset.
    /// Line and column are 0-indexed; offsets past the end clamp to it.
    pub fn line_col(&self, offset: u32) -> LineCol {
        let offset = offset.min(self.len);
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        LineCol {
            line: line as u32,
            col: offset - self.line_starts[line],
        }
    }
}

/// A line and column position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LineCol {
    /// 0-indexed line number.
    pub line: u32,
    /// 0-indexed column (byte offset within line).
    pub col: u32,
}

impl LineCol {
    /// Convert to 1-indexed for display.
    #[inline]
    pub const fn to_display(self) -> (u32, u32) {
        (self.line + 1, self.col + 1)
    }
}

/// Builder for generated text with a running indentation level.
#[derive(Debug, Default)]
pub struct CodeBuilder {
    code: String,
    level: usize,
}

impl CodeBuilder {
    const INDENT: &'static str = "  ";

    /// Create a builder that indents by two spaces per level.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increase the indentation level.
    pub fn indent(&mut self) {
        self.level += 1;
    }

    /// Decrease the indentation level.
    pub fn dedent(&mut self) {
        self.level = self.level.saturating_sub(1);
    }

    /// Append a newline.
    pub fn newline(&mut self) {
        self.code.push('\n');
    }

    /// Append one indented line followed by a newline.
    ///
    /// Empty input produces an empty line with no trailing indentation.
    /// Only the first line of multi-line input is indented.
    pub fn line(&mut self, text: &str) {
        if !text.is_empty() {
            for _ in 0..self.level {
                self.code.push_str(Self::INDENT);
            }
            self.code.push_str(text);
        }
        self.code.push('\n');
    }

    /// Append each line of `text` at the current indentation level.
    pub fn lines(&mut self, text: &str) {
        for line in text.lines() {
            self.line(line);
        }
    }

    /// Consume the builder and return the generated code.
    pub fn finish(self) -> String {
        self.code
    }
}
