//! Markup-to-template transformation.

use crate::ast::*;
use crate::classify::{classify, AttributeClass, Directive};
use crate::tables::{map_event, map_tag, MODULE_IMPORT_TAG, TEXT_TAG};
use axml_parser::expression::escape_template_text;
use axml_parser::mustache::{self, Segment};
use axml_parser::{Attribute, Element, MarkupNode, MarkupRoot, Text};
use convert_diagnostics::{Diagnostic, DiagnosticCode};
use smol_str::SmolStr;

/// A helper module imported by the markup and exposed to the sibling script.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleBinding {
    /// Module path as written in the `from` attribute.
    pub from: String,
    /// Local name the markup refers to it by.
    pub name: String,
}

/// Everything one markup file produces.
#[derive(Debug, Clone, Default)]
pub struct TransformOutput {
    /// The transformed template.
    pub template: VueTemplate,
    /// Module bindings in document order.
    pub module_bindings: Vec<ModuleBinding>,
    /// Conversion diagnostics.
    pub diagnostics: Vec<Diagnostic>,
}

/// Accumulator threaded through one `transform` call.
#[derive(Debug, Default)]
pub struct TransformContext {
    /// Module bindings seen so far.
    pub module_bindings: Vec<ModuleBinding>,
    /// Diagnostics reported so far.
    pub diagnostics: Vec<Diagnostic>,
}

/// Transform a markup tree into a Vue template tree.
pub fn transform(root: &MarkupRoot) -> TransformOutput {
    let mut ctx = TransformContext::default();
    let children = transform_nodes(&root.children, &mut ctx);
    TransformOutput {
        template: VueTemplate { children },
        module_bindings: ctx.module_bindings,
        diagnostics: ctx.diagnostics,
    }
}

fn transform_nodes(nodes: &[MarkupNode], ctx: &mut TransformContext) -> Vec<VueNode> {
    nodes
        .iter()
        .filter_map(|node| transform_node(node, ctx))
        .collect()
}

fn transform_node(node: &MarkupNode, ctx: &mut TransformContext) -> Option<VueNode> {
    match node {
        MarkupNode::Element(el) if el.tag == MODULE_IMPORT_TAG => transform_module_import(el, ctx),
        MarkupNode::Element(el) => Some(VueNode::Element(transform_element(el, ctx))),
        MarkupNode::Text(text) => Some(VueNode::Text(transform_text(text, ctx))),
        MarkupNode::Comment(_) => None,
    }
}

fn transform_module_import(el: &Element, ctx: &mut TransformContext) -> Option<VueNode> {
    let from = el.attr_value("from").map(str::trim).unwrap_or_default();
    let name = el.attr_value("name").map(str::trim).unwrap_or_default();
    if from.is_empty() || name.is_empty() {
        ctx.diagnostics.push(Diagnostic::warning(
            format!("<{}> needs both `from` and `name`", MODULE_IMPORT_TAG),
            el.span,
            DiagnosticCode::IncompleteModuleImport,
        ));
        return None;
    }

    ctx.module_bindings.push(ModuleBinding {
        from: from.to_string(),
        name: name.to_string(),
    });
    Some(VueNode::Comment(VueComment {
        value: format!(" sjs import: {} from {} ", name, from),
    }))
}

fn transform_element(el: &Element, ctx: &mut TransformContext) -> VueElement {
    let tag = if el.has_single_text_child() {
        SmolStr::new(TEXT_TAG)
    } else {
        SmolStr::new(map_tag(&el.tag))
    };
    let attrs = transform_attributes(el, ctx);
    let children = transform_nodes(&el.children, ctx);
    VueElement {
        tag,
        attrs,
        children,
        span: el.span,
    }
}

fn transform_text(text: &Text, ctx: &mut TransformContext) -> VueText {
    if let Some(Err(error)) = &text.expression {
        ctx.diagnostics.push(Diagnostic::error(
            error.to_string(),
            text.span,
            DiagnosticCode::InvalidExpression,
        ));
    }
    VueText {
        value: strip_receiver(&text.value),
        span: text.span,
    }
}

/// Loop variable names declared on one element.
struct LoopNames {
    item: String,
    index: String,
    active: bool,
}

impl LoopNames {
    fn from_element(el: &Element) -> Self {
        let mut names = LoopNames {
            item: "item".to_string(),
            index: "index".to_string(),
            active: false,
        };
        for attr in &el.attrs {
            if let AttributeClass::Directive(directive) = classify(&attr.name) {
                let value = mustache::strip_delimiters(&attr.value);
                match directive {
                    Directive::For => names.active = true,
                    Directive::ForItem if !value.is_empty() => names.item = value.to_string(),
                    Directive::ForIndex if !value.is_empty() => names.index = value.to_string(),
                    _ => {}
                }
            }
        }
        names
    }
}

fn transform_attributes(el: &Element, ctx: &mut TransformContext) -> Vec<VueAttribute> {
    let names = LoopNames::from_element(el);
    let mut attrs = Vec::with_capacity(el.attrs.len());

    for attr in &el.attrs {
        if let Some(Err(error)) = &attr.expression {
            ctx.diagnostics.push(Diagnostic::error(
                error.to_string(),
                attr.value_span,
                DiagnosticCode::InvalidExpression,
            ));
        }

        let converted = match classify(&attr.name) {
            AttributeClass::Event { event, .. } => Some(event_attribute(event, attr)),
            AttributeClass::Directive(directive) => {
                directive_attribute(directive, attr, &names, ctx)
            }
            AttributeClass::Static => Some(static_attribute(attr, ctx)),
        };
        attrs.extend(converted);
    }

    attrs.sort_by_key(|a| a.kind);
    attrs
}

fn event_attribute(event: &str, attr: &Attribute) -> VueAttribute {
    let handler = mustache::strip_delimiters(&attr.value);
    let handler = handler.strip_prefix("this.").unwrap_or(handler);
    VueAttribute {
        name: format!("@{}", map_event(event)),
        value: AttrValue::Call(handler.to_string()),
        kind: AttrKind::Event,
    }
}

fn directive_attribute(
    directive: Directive,
    attr: &Attribute,
    names: &LoopNames,
    ctx: &mut TransformContext,
) -> Option<VueAttribute> {
    let expression = mustache::strip_delimiters(&attr.value);
    let (name, value) = match directive {
        Directive::If => ("v-if".to_string(), AttrValue::Expression(expression.to_string())),
        Directive::ElseIf => (
            "v-else-if".to_string(),
            AttrValue::Expression(expression.to_string()),
        ),
        Directive::Else => ("v-else".to_string(), AttrValue::None),
        Directive::For => {
            let iterable = match mustache::whole_expression(&attr.value) {
                Some(inner) => inner,
                None => {
                    ctx.diagnostics.push(Diagnostic::warning(
                        format!(
                            "loop directive `{}` should be a single {{{{ }}}} expression",
                            attr.value
                        ),
                        attr.value_span,
                        DiagnosticCode::InvalidLoopDirective,
                    ));
                    expression
                }
            };
            (
                "v-for".to_string(),
                AttrValue::Expression(format!("({}, {}) in {}", names.item, names.index, iterable)),
            )
        }
        Directive::ForItem | Directive::ForIndex => return None,
        Directive::Key => (":key".to_string(), AttrValue::Expression(key_expression(attr, names))),
        Directive::Other(suffix) => {
            let value = if expression.is_empty() {
                AttrValue::None
            } else {
                AttrValue::Expression(expression.to_string())
            };
            (format!("v-{}", suffix), value)
        }
    };
    Some(VueAttribute {
        name,
        value,
        kind: AttrKind::Directive,
    })
}

/// `a:key` names a field of the loop item unless it is an expression.
fn key_expression(attr: &Attribute, names: &LoopNames) -> String {
    if let Some(inner) = mustache::whole_expression(&attr.value) {
        return inner.to_string();
    }
    let raw = attr.value.trim();
    if raw == "*this" {
        return names.item.clone();
    }
    if names.active && is_identifier(raw) {
        return format!("{}.{}", names.item, raw);
    }
    raw.to_string()
}

fn static_attribute(attr: &Attribute, ctx: &mut TransformContext) -> VueAttribute {
    let value = &attr.value;

    if attr.name == "class" && mustache::has_mustache(value) {
        return VueAttribute {
            name: ":class".to_string(),
            value: AttrValue::Expression(class_template(value)),
            kind: AttrKind::Static,
        };
    }

    if let Some(expr) = mustache::whole_expression(value) {
        let value = match expr {
            "true" => AttrValue::Boolean(true),
            "false" => AttrValue::Boolean(false),
            _ => AttrValue::Expression(expr.to_string()),
        };
        return VueAttribute {
            name: format!(":{}", attr.name),
            value,
            kind: AttrKind::Static,
        };
    }

    if mustache::has_mustache(value) {
        ctx.diagnostics.push(Diagnostic::hint(
            format!("attribute `{}` mixes text and interpolation; kept as written", attr.name),
            attr.value_span,
            DiagnosticCode::MixedInterpolation,
        ));
    }

    VueAttribute {
        name: attr.name.to_string(),
        value: if value.is_empty() {
            AttrValue::None
        } else {
            AttrValue::Literal(value.clone())
        },
        kind: AttrKind::Static,
    }
}

/// Build the template-literal expression for an interpolated class list.
///
/// Literal segments keep their position next to the expressions, with runs
/// of whitespace collapsed to one space.
pub fn class_template(value: &str) -> String {
    let mut body = String::new();
    for segment in mustache::segments(value) {
        match segment {
            Segment::Literal(text) => body.push_str(&escape_template_text(&collapse_whitespace(text))),
            Segment::Expression(expr) => {
                body.push_str("${");
                body.push_str(expr.trim());
                body.push('}');
            }
        }
    }
    format!("`{}`", body.trim())
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Rewrite `{{this.x}}` and `{{ this.x }}` to `{{ x }}`.
pub fn strip_receiver(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let trimmed = after.trim_start();
        match trimmed.strip_prefix("this.") {
            Some(tail) => {
                out.push_str("{{ ");
                rest = tail;
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
