//! AST types for parsed AXML markup.

use crate::error::ExpressionResult;
use smol_str::SmolStr;
use source_text::Span;
use swc_ecma_ast::Expr;

/// The result of parsing a markup file.
#[derive(Debug, Clone, Default)]
pub struct MarkupRoot {
    /// Top-level nodes in document order.
    pub children: Vec<MarkupNode>,
    /// Span of the whole document.
    pub span: Span,
}

impl MarkupRoot {
    /// Iterate over top-level elements, skipping text and comments.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(MarkupNode::as_element)
    }
}

/// A node in the markup tree.
#[derive(Debug, Clone)]
pub enum MarkupNode {
    /// An element with attributes and children.
    Element(Element),
    /// Non-blank text.
    Text(Text),
    /// An HTML comment.
    Comment(Comment),
}

impl MarkupNode {
    /// Get the span of this node.
    pub fn span(&self) -> Span {
        match self {
            MarkupNode::Element(e) => e.span,
            MarkupNode::Text(t) => t.span,
            MarkupNode::Comment(c) => c.span,
        }
    }

    /// Get this node as an element.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            MarkupNode::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get this node as text.
    pub fn as_text(&self) -> Option<&Text> {
        match self {
            MarkupNode::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// An element node.
#[derive(Debug, Clone)]
pub struct Element {
    /// Tag name, lower-cased.
    pub tag: SmolStr,
    /// Attributes in source order.
    pub attrs: Vec<Attribute>,
    /// Child nodes.
    pub children: Vec<MarkupNode>,
    /// Whether the element was written `<tag />` or is a void element.
    pub self_closing: bool,
    /// Span from the opening `<` to the end of the close tag.
    pub span: Span,
}

impl Element {
    /// Find an attribute by exact name.
    pub fn attr(&self, name: &str) -> Option<&Attribute> {
        self.attrs.iter().find(|a| a.name == name)
    }

    /// Get an attribute's raw value by exact name.
    pub fn attr_value(&self, name: &str) -> Option<&str> {
        self.attr(name).map(|a| a.value.as_str())
    }

    /// Check if the element has exactly one child and that child is text.
    pub fn has_single_text_child(&self) -> bool {
        matches!(self.children.as_slice(), [MarkupNode::Text(_)])
    }
}

/// An attribute on an element.
#[derive(Debug, Clone)]
pub struct Attribute {
    /// Attribute name, case preserved.
    pub name: SmolStr,
    /// Value as written, entities undecoded; empty for valueless attributes.
    pub value: String,
    /// Whether the value contains a `{{ ... }}` span.
    pub is_mustache: bool,
    /// The parsed mustache expression, present only when `is_mustache`.
    pub expression: Option<ExpressionResult<Box<Expr>>>,
    /// Span of the whole attribute.
    pub span: Span,
    /// Span of the value without quotes, or an empty span after the name.
    pub value_span: Span,
}

/// A text node.
#[derive(Debug, Clone)]
pub struct Text {
    /// Text as written, entities and whitespace untouched.
    pub value: String,
    /// Whether the text contains a `{{ ... }}` span.
    pub is_mustache: bool,
    /// The parsed interpolation, present only when `is_mustache`.
    pub expression: Option<ExpressionResult<Box<Expr>>>,
    /// Span of the text.
    pub span: Span,
}

/// A comment node.
#[derive(Debug, Clone)]
pub struct Comment {
    /// Text between `<!--` and `-->`.
    pub value: String,
    /// Span including the delimiters.
    pub span: Span,
}
