//! Character-level scanner for AXML markup.
//!
//! Mustache spans are opaque to every scan that looks for a delimiter, so
//! `{{ a < b }}` in text and `"{{ x ? "a" : "b" }}"` in an attribute value
//! stay in one piece.

use crate::mustache;
use source_text::Span;

/// A scanner over markup source.
pub struct MarkupLexer<'a> {
    source: &'a str,
    pos: usize,
}

impl<'a> MarkupLexer<'a> {
    /// Create a new lexer for the given source.
    pub fn new(source: &'a str) -> Self {
        Self { source, pos: 0 }
    }

    /// Get the current position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Move back to an earlier position.
    pub fn reset(&mut self, pos: usize) {
        self.pos = pos.min(self.source.len());
    }

    /// Get the full source.
    pub fn source(&self) -> &'a str {
        self.source
    }

    /// Get the remaining source.
    pub fn remaining(&self) -> &'a str {
        &self.source[self.pos..]
    }

    /// Check if the whole input has been consumed.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    /// Peek at the next character.
    pub fn peek_char(&self) -> Option<char> {
        self.remaining().chars().next()
    }

    /// Peek at the character after the next one.
    pub fn peek_second(&self) -> Option<char> {
        let mut chars = self.remaining().chars();
        chars.next();
        chars.next()
    }

    /// Consume and return the next character.
    pub fn next_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Skip whitespace.
    pub fn skip_whitespace(&mut self) {
        while matches!(self.peek_char(), Some(c) if c.is_whitespace()) {
            self.next_char();
        }
    }

    /// Check if the remaining source starts with the given string.
    pub fn starts_with(&self, s: &str) -> bool {
        self.remaining().starts_with(s)
    }

    /// Consume a string if the remaining source starts with it.
    pub fn consume(&mut self, s: &str) -> bool {
        if self.starts_with(s) {
            self.pos += s.len();
            true
        } else {
            false
        }
    }

    /// Consume characters while the predicate is true.
    pub fn consume_while<F>(&mut self, pred: F) -> &'a str
    where
        F: Fn(char) -> bool,
    {
        let start = self.pos;
        while matches!(self.peek_char(), Some(c) if pred(c)) {
            self.next_char();
        }
        &self.source[start..self.pos]
    }

    /// Consume until the given string is found, or to the end of input.
    pub fn consume_until(&mut self, s: &str) -> &'a str {
        let start = self.pos;
        match self.remaining().find(s) {
            Some(offset) => self.pos += offset,
            None => self.pos = self.source.len(),
        }
        &self.source[start..self.pos]
    }

    /// Skip over a complete mustache span at the current position.
    fn skip_mustache(&mut self) -> bool {
        if !self.starts_with("{{") {
            return false;
        }
        match mustache::next_span(self.source, self.pos) {
            Some((start, end)) if start == self.pos => {
                self.pos = end;
                true
            }
            _ => false,
        }
    }

    /// Whether the current `<` begins a tag, close tag, comment or declaration.
    pub fn at_markup(&self) -> bool {
        if !self.starts_with("<") {
            return false;
        }
        matches!(
            self.peek_second(),
            Some(c) if c.is_ascii_alphabetic() || c == '/' || c == '!' || c == '?'
        )
    }

    /// Read text up to the next markup construct.
    pub fn read_text(&mut self) -> &'a str {
        let start = self.pos;
        while !self.is_eof() {
            if self.skip_mustache() {
                continue;
            }
            if self.at_markup() {
                break;
            }
            self.next_char();
        }
        &self.source[start..self.pos]
    }

    /// Read a tag name.
    pub fn read_tag_name(&mut self) -> &'a str {
        self.consume_while(|c| !c.is_whitespace() && c != '/' && c != '>')
    }

    /// Read an attribute name.
    pub fn read_attr_name(&mut self) -> &'a str {
        self.consume_while(|c| {
            !c.is_whitespace() && !matches!(c, '=' | '>' | '/' | '"' | '\'')
        })
    }

    /// Read an attribute value after `=`, returning the raw value and its span.
    ///
    /// Quoted values end at the matching quote outside any mustache span.
    /// Unquoted values end at whitespace or `>`.
    pub fn read_attr_value(&mut self) -> (&'a str, Span) {
        match self.peek_char() {
            Some(quote @ ('"' | '\'')) => {
                self.next_char();
                let start = self.pos;
                while !self.is_eof() {
                    if self.skip_mustache() {
                        continue;
                    }
                    if self.peek_char() == Some(quote) {
                        break;
                    }
                    self.next_char();
                }
                let end = self.pos;
                self.next_char();
                (&self.source[start..end], Span::from_range(start..end))
            }
            _ => {
                let start = self.pos;
                while !self.is_eof() {
                    if self.skip_mustache() {
                        continue;
                    }
                    match self.peek_char() {
                        Some(c) if c.is_whitespace() || c == '>' => break,
                        _ => {
                            self.next_char();
                        }
                    }
                }
                (&self.source[start..self.pos], Span::from_range(start..self.pos))
            }
        }
    }

    /// Create a span from a start position to the current position.
    pub fn span_from(&self, start: usize) -> Span {
        Span::from_range(start..self.pos)
    }
}
