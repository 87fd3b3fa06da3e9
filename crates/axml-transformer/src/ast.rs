//! AST types for generated Vue templates.

use smol_str::SmolStr;
use source_text::Span;

/// The transformed template content, before the root wrapper is added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VueTemplate {
    /// Top-level nodes.
    pub children: Vec<VueNode>,
}

/// A node in the Vue template tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VueNode {
    /// An element.
    Element(VueElement),
    /// Text, possibly containing `{{ }}` interpolations.
    Text(VueText),
    /// A comment.
    Comment(VueComment),
}

impl VueNode {
    /// Get this node as an element.
    pub fn as_element(&self) -> Option<&VueElement> {
        match self {
            VueNode::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get this node as text.
    pub fn as_text(&self) -> Option<&VueText> {
        match self {
            VueNode::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// An element in the Vue template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VueElement {
    /// Target tag name.
    pub tag: SmolStr,
    /// Attributes in emission order: directives, static, events.
    pub attrs: Vec<VueAttribute>,
    /// Child nodes.
    pub children: Vec<VueNode>,
    /// Span of the source element.
    pub span: Span,
}

impl VueElement {
    /// Find an attribute by its emitted name.
    pub fn attr(&self, name: &str) -> Option<&VueAttribute> {
        self.attrs.iter().find(|a| a.name == name)
    }
}

/// An emitted attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VueAttribute {
    /// Emitted name, including any `v-`, `:` or `@` prefix.
    pub name: String,
    /// Emitted value.
    pub value: AttrValue,
    /// Which group the attribute belongs to.
    pub kind: AttrKind,
}

/// Attribute groups, in emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AttrKind {
    /// `v-*` and `:key`.
    Directive,
    /// Plain or bound attributes.
    Static,
    /// `@event` handlers.
    Event,
}

/// The value side of an attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Valueless, rendered as a bare name.
    None,
    /// Literal text.
    Literal(String),
    /// A JavaScript expression.
    Expression(String),
    /// A boolean literal.
    Boolean(bool),
    /// A handler reference, rendered as a zero-argument call.
    Call(String),
}

impl AttrValue {
    /// Render the value as it appears between the quotes.
    pub fn render(&self) -> Option<String> {
        match self {
            AttrValue::None => None,
            AttrValue::Literal(s) | AttrValue::Expression(s) => Some(s.clone()),
            AttrValue::Boolean(b) => Some(b.to_string()),
            AttrValue::Call(handler) => Some(format!("{}()", handler)),
        }
    }
}

/// A text node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VueText {
    /// Text with the receiver prefix removed from interpolations.
    pub value: String,
    /// Span of the source text.
    pub span: Span,
}

/// A comment node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VueComment {
    /// Comment body without delimiters.
    pub value: String,
}
