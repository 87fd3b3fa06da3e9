//! Template generation.

use crate::helpers::ROOT_CLASS;
use axml_parser::mustache;
use axml_transformer::{VueAttribute, VueElement, VueNode, VueTemplate};
use source_text::CodeBuilder;

/// Render template nodes at the builder's current indentation.
pub fn generate_template(builder: &mut CodeBuilder, template: &VueTemplate) {
    for node in &template.children {
        generate_node(builder, node);
    }
}

fn generate_node(builder: &mut CodeBuilder, node: &VueNode) {
    match node {
        VueNode::Element(el) => generate_element(builder, el),
        VueNode::Text(text) => {
            for line in text_lines(&text.value).into_iter().map(str::trim).filter(|l| !l.is_empty()) {
                builder.line(line);
            }
        }
        VueNode::Comment(comment) => builder.line(&format!("<!--{}-->", comment.value)),
    }
}

/// Split text at newlines that fall outside `{{ }}` spans.
fn text_lines(value: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let mut pos = 0;
    while let Some(newline) = value[pos..].find('\n').map(|at| pos + at) {
        match mustache::next_span(value, pos) {
            Some((open, close)) if open < newline => pos = close,
            _ => {
                lines.push(value[start..newline].trim_end_matches('\r'));
                start = newline + 1;
                pos = start;
            }
        }
    }
    lines.push(&value[start..]);
    lines
}

fn generate_element(builder: &mut CodeBuilder, el: &VueElement) {
    let open = open_tag(el);
    match el.children.as_slice() {
        [] => builder.line(&format!("{open} />")),
        [VueNode::Text(text)] if !text.value.trim().contains('\n') => {
            builder.line(&format!("{open}>{}</{}>", text.value.trim(), el.tag));
        }
        children => {
            builder.line(&format!("{open}>"));
            builder.indent();
            for child in children {
                generate_node(builder, child);
            }
            builder.dedent();
            builder.line(&format!("</{}>", el.tag));
        }
    }
}

fn open_tag(el: &VueElement) -> String {
    let mut tag = format!("<{}", el.tag);
    for attr in &el.attrs {
        tag.push(' ');
        tag.push_str(&render_attribute(attr));
    }
    tag
}

/// Render one attribute as `name`, `name="value"` or `name='value'`.
pub fn render_attribute(attr: &VueAttribute) -> String {
    match attr.value.render() {
        None => attr.name.clone(),
        Some(value) if value.contains('"') && !value.contains('\'') => {
            format!("{}='{}'", attr.name, value)
        }
        Some(value) => format!("{}=\"{}\"", attr.name, value.replace('"', "&quot;")),
    }
}

/// Render a complete `.vue` file for the markup file `<base>.axml`.
///
/// The script block re-exports the sibling `./<base>` module and the style
/// block links `./<base>.css`.
pub fn generate_vue_file(template: &VueTemplate, base: &str) -> String {
    let mut builder = CodeBuilder::new();
    builder.line("<template>");
    builder.indent();
    builder.line(&format!("<div class=\"{ROOT_CLASS}\">"));
    builder.indent();
    generate_template(&mut builder, template);
    builder.dedent();
    builder.line("</div>");
    builder.dedent();
    builder.line("</template>");
    builder.newline();
    builder.line("<script>");
    builder.line(&format!("import component from './{base}';"));
    builder.line("export default component;");
    builder.line("</script>");
    builder.newline();
    builder.line(&format!("<style src=\"./{base}.css\"></style>"));
    builder.finish()
}
