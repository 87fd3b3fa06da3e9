//! Event-driven AXML parser.
//!
//! The scan emits open-tag, close-tag, text and comment events. An explicit
//! stack of open elements receives them, and each finished node is attached
//! to whatever element is on top of the stack. Unbalanced input heals
//! deterministically:
//! - a close tag with no open match is ignored;
//! - a close tag matching a deeper element closes everything above it;
//! - anything still open at the end of input is closed there.

use crate::ast::*;
use crate::expression::parse_interpolation;
use crate::lexer::MarkupLexer;
use crate::mustache;
use smol_str::SmolStr;
use source_text::Span;

/// Elements that never have children, whether or not they are written `/>`.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Parse AXML source into a markup tree.
pub fn parse_markup(source: &str) -> MarkupRoot {
    MarkupParser::new(source).parse()
}

/// Stack-driven markup parser.
pub struct MarkupParser<'a> {
    lexer: MarkupLexer<'a>,
    stack: Vec<Element>,
    root: Vec<MarkupNode>,
}

impl<'a> MarkupParser<'a> {
    /// Create a new parser.
    pub fn new(source: &'a str) -> Self {
        Self {
            lexer: MarkupLexer::new(source),
            stack: Vec::new(),
            root: Vec::new(),
        }
    }

    /// Run the scan to the end of input and return the tree.
    pub fn parse(mut self) -> MarkupRoot {
        while !self.lexer.is_eof() {
            if self.lexer.starts_with("<!--") {
                self.parse_comment();
            } else if self.lexer.starts_with("</") {
                self.parse_close_tag();
            } else if self.lexer.starts_with("<!") || self.lexer.starts_with("<?") {
                self.lexer.consume_until(">");
                self.lexer.consume(">");
            } else if self.lexer.at_markup() {
                self.parse_open_tag();
            } else {
                self.parse_text();
            }
        }

        let len = self.lexer.source().len() as u32;
        while let Some(mut element) = self.stack.pop() {
            element.span.end = len;
            self.attach(MarkupNode::Element(element));
        }

        MarkupRoot {
            children: self.root,
            span: Span::new(0, len),
        }
    }

    /// Attach a finished node to the innermost open element.
    fn attach(&mut self, node: MarkupNode) {
        match self.stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => self.root.push(node),
        }
    }

    fn parse_comment(&mut self) {
        let start = self.lexer.pos();
        self.lexer.consume("<!--");
        let value = self.lexer.consume_until("-->").to_string();
        self.lexer.consume("-->");
        let span = self.lexer.span_from(start);
        self.attach(MarkupNode::Comment(Comment { value, span }));
    }

    fn parse_text(&mut self) {
        let start = self.lexer.pos();
        let raw = self.lexer.read_text();
        if raw.trim().is_empty() {
            return;
        }
        let span = self.lexer.span_from(start);
        let is_mustache = mustache::has_mustache(raw);
        let expression = parse_interpolation(&decode_entities(raw), span);
        self.attach(MarkupNode::Text(Text {
            value: raw.to_string(),
            is_mustache,
            expression,
            span,
        }));
    }

    fn parse_open_tag(&mut self) {
        let start = self.lexer.pos();
        self.lexer.consume("<");
        let tag = SmolStr::new(self.lexer.read_tag_name().to_ascii_lowercase());

        let mut attrs = Vec::new();
        let mut explicit_self_close = false;
        loop {
            self.lexer.skip_whitespace();
            if self.lexer.is_eof() {
                break;
            }
            if self.lexer.consume("/>") {
                explicit_self_close = true;
                break;
            }
            if self.lexer.consume(">") {
                break;
            }
            match self.parse_attribute() {
                Some(attr) => attrs.push(attr),
                None => {
                    // Stray `/`, quote or `=`.
                    self.lexer.next_char();
                }
            }
        }

        let self_closing = explicit_self_close || VOID_ELEMENTS.contains(&tag.as_str());
        let element = Element {
            tag,
            attrs,
            children: Vec::new(),
            self_closing,
            span: self.lexer.span_from(start),
        };
        if self_closing {
            self.attach(MarkupNode::Element(element));
        } else {
            self.stack.push(element);
        }
    }

    fn parse_attribute(&mut self) -> Option<Attribute> {
        let start = self.lexer.pos();
        let name = self.lexer.read_attr_name();
        if name.is_empty() {
            return None;
        }

        let after_name = self.lexer.pos();
        self.lexer.skip_whitespace();
        let (raw, value_span) = if self.lexer.consume("=") {
            self.lexer.skip_whitespace();
            self.lexer.read_attr_value()
        } else {
            self.lexer.reset(after_name);
            ("", Span::empty(after_name as u32))
        };

        let is_mustache = mustache::has_mustache(raw);
        let expression = parse_interpolation(&decode_entities(raw), value_span);
        Some(Attribute {
            name: SmolStr::new(name),
            value: raw.to_string(),
            is_mustache,
            expression,
            span: self.lexer.span_from(start),
            value_span,
        })
    }

    fn parse_close_tag(&mut self) {
        let start = self.lexer.pos();
        self.lexer.consume("</");
        let name = self.lexer.read_tag_name().to_ascii_lowercase();
        self.lexer.consume_until(">");
        self.lexer.consume(">");
        let end = self.lexer.pos() as u32;

        let Some(index) = self.stack.iter().rposition(|e| e.tag == name) else {
            return;
        };
        while self.stack.len() > index {
            let Some(mut element) = self.stack.pop() else {
                break;
            };
            element.span.end = if self.stack.len() == index {
                end
            } else {
                start as u32
            };
            self.attach(MarkupNode::Element(element));
        }
    }
}

/// Entity-decoded text handed to the expression parser. Node values keep
/// the text as written.
fn decode_entities(raw: &str) -> String {
    htmlize::unescape(raw).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tags(nodes: &[MarkupNode]) -> Vec<String> {
        nodes
            .iter()
            .filter_map(MarkupNode::as_element)
            .map(|e| e.tag.to_string())
            .collect()
    }

    #[test]
    fn test_nesting_mirrors_input() {
        let root = parse_markup("<view><text>a</text><view><image /></view></view><button />");
        assert_eq!(tags(&root.children), vec!["view", "button"]);

        let outer = root.elements().next().unwrap();
        assert_eq!(tags(&outer.children), vec!["text", "view"]);
        let inner = outer.children[1].as_element().unwrap();
        assert_eq!(tags(&inner.children), vec!["image"]);
        assert!(inner.children[0].as_element().unwrap().self_closing);
    }

    #[test]
    fn test_whitespace_only_text_is_dropped() {
        let root = parse_markup("<view>\n   <text> hi </text>\n</view>");
        let view = root.elements().next().unwrap();
        assert_eq!(view.children.len(), 1);
        let text = view.children[0].as_element().unwrap();
        assert_eq!(text.children[0].as_text().unwrap().value, " hi ");
    }

    #[test]
    fn test_attributes() {
        let root = parse_markup(r#"<view class="box" a:if="{{ show }}" onTap="handleTap" hidden />"#);
        let view = root.elements().next().unwrap();
        let names: Vec<_> = view.attrs.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["class", "a:if", "onTap", "hidden"]);

        let cond = view.attr("a:if").unwrap();
        assert!(cond.is_mustache);
        assert!(matches!(cond.expression, Some(Ok(_))));
        assert_eq!(cond.value_span.slice(r#"<view class="box" a:if="{{ show }}""#), Some("{{ show }}"));

        assert!(!view.attr("class").unwrap().is_mustache);
        assert!(view.attr("class").unwrap().expression.is_none());
        assert_eq!(view.attr_value("hidden"), Some(""));
    }

    #[test]
    fn test_expression_error_is_isolated_to_attribute() {
        let root = parse_markup(r#"<view a:if="{{ a ? }}" class="{{ ok }}">x</view>"#);
        let view = root.elements().next().unwrap();
        assert!(matches!(view.attr("a:if").unwrap().expression, Some(Err(_))));
        assert!(matches!(view.attr("class").unwrap().expression, Some(Ok(_))));
        assert_eq!(view.children.len(), 1);
    }

    #[test]
    fn test_comment() {
        let root = parse_markup("<!-- note --><view/>");
        match &root.children[0] {
            MarkupNode::Comment(c) => assert_eq!(c.value, " note "),
            other => panic!("expected comment, got {:?}", other),
        }
        assert_eq!(tags(&root.children), vec!["view"]);
    }

    #[test]
    fn test_stray_close_tag_is_ignored() {
        let root = parse_markup("<view>a</text></view>");
        assert_eq!(root.children.len(), 1);
        let view = root.elements().next().unwrap();
        assert_eq!(view.children.len(), 1);
    }

    #[test]
    fn test_close_tag_closes_inner_elements() {
        let root = parse_markup("<view><text>a</view><button/>");
        assert_eq!(tags(&root.children), vec!["view", "button"]);
        let view = root.elements().next().unwrap();
        assert_eq!(tags(&view.children), vec!["text"]);
    }

    #[test]
    fn test_unclosed_elements_close_at_end() {
        let source = "<view><text>a";
        let root = parse_markup(source);
        let view = root.elements().next().unwrap();
        assert_eq!(view.span, Span::new(0, source.len() as u32));
        assert_eq!(tags(&view.children), vec!["text"]);
    }

    #[test]
    fn test_void_element_without_slash() {
        let root = parse_markup("<view><input value=\"1\"><text>b</text></view>");
        let view = root.elements().next().unwrap();
        assert_eq!(tags(&view.children), vec!["input", "text"]);
    }

    #[test]
    fn test_tag_lowercased_attr_case_kept() {
        let root = parse_markup(r#"<View onLongPress="hold"></View>"#);
        let view = root.elements().next().unwrap();
        assert_eq!(view.tag, "view");
        assert_eq!(view.attrs[0].name, "onLongPress");
    }

    #[test]
    fn test_entities_kept_as_written() {
        let root = parse_markup(r#"<text title="a &amp; b">&lt;b&gt; &amp;amp;</text>"#);
        let text = root.elements().next().unwrap();
        assert_eq!(text.attr_value("title"), Some("a &amp; b"));
        let child = text.children[0].as_text().unwrap();
        assert_eq!(child.value, "&lt;b&gt; &amp;amp;");
        assert!(!child.is_mustache);
    }

    #[test]
    fn test_expressions_parse_decoded_entities() {
        let root = parse_markup(r#"<text a:if="{{ a &amp;&amp; b }}">{{ x &lt; 1 }}</text>"#);
        let text = root.elements().next().unwrap();
        let cond = text.attr("a:if").unwrap();
        assert_eq!(cond.value, "{{ a &amp;&amp; b }}");
        assert!(matches!(cond.expression, Some(Ok(_))));

        let child = text.children[0].as_text().unwrap();
        assert_eq!(child.value, "{{ x &lt; 1 }}");
        assert!(child.is_mustache);
        assert!(matches!(child.expression, Some(Ok(_))));
    }

    #[test]
    fn test_doctype_skipped() {
        let root = parse_markup("<!DOCTYPE html><view/>");
        assert_eq!(root.children.len(), 1);
    }
}
