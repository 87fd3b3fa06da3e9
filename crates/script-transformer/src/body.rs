//! Function body reconstruction.
//!
//! Bodies are copied from the original text rather than printed from the
//! tree. The only rewrite applied is flattening `this.data.x` and
//! `this.props.x` to `this.x`.

use crate::description::MethodSource;
use once_cell::sync::Lazy;
use regex::Regex;
use script_parser::{FunctionBody, FunctionNode, ScriptAst};
use swc_common::{Span, Spanned};
use swc_ecma_ast::Tpl;
use swc_ecma_visit::{Visit, VisitWith};

static NESTED_ACCESS: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"\bthis\.(?:data|props)\.").ok());

/// Rewrite nested data/props access to flat instance access.
pub fn flatten_access(line: &str) -> String {
    match NESTED_ACCESS.as_ref() {
        Some(re) => re.replace_all(line, "this.").into_owned(),
        None => line.to_string(),
    }
}

/// Rebuild a method under `name` with flattened instance access.
pub fn method_source(ast: &ScriptAst, name: &str, function: &FunctionNode) -> MethodSource {
    MethodSource {
        name: name.to_string(),
        is_async: function.is_async(),
        is_generator: function.is_generator(),
        params: function
            .params(ast)
            .into_iter()
            .map(str::to_string)
            .collect(),
        body: body_lines(ast, function)
            .iter()
            .map(|line| flatten_access(line))
            .collect(),
    }
}

/// The body of a function as dedented, non-blank source lines.
///
/// An expression body becomes a single `return` statement. A template
/// literal spanning several lines stays inside one entry, with its inner
/// lines exactly as written.
pub fn body_lines(ast: &ScriptAst, function: &FunctionNode) -> Vec<String> {
    let mut literals = TemplateSpans::default();
    match function.body() {
        FunctionBody::Block(block) => match (block.stmts.first(), block.stmts.last()) {
            (Some(first), Some(last)) => {
                block.visit_with(&mut literals);
                source_lines(ast, first.span().with_hi(last.span().hi), &literals.0)
            }
            _ => Vec::new(),
        },
        FunctionBody::Expr(expr) => {
            expr.visit_with(&mut literals);
            let mut lines = source_lines(ast, expr.span(), &literals.0);
            if let Some(first) = lines.first_mut() {
                first.insert_str(0, "return ");
            }
            if let Some(last) = lines.last_mut() {
                last.push(';');
            }
            lines
        }
        FunctionBody::Empty => Vec::new(),
    }
}

/// Spans of every template literal in a body.
#[derive(Default)]
struct TemplateSpans(Vec<Span>);

impl Visit for TemplateSpans {
    fn visit_tpl(&mut self, tpl: &Tpl) {
        self.0.push(tpl.span);
        tpl.visit_children_with(self);
    }
}

/// Cut a span out of the source and dedent it.
///
/// The slice starts mid-line, so the indentation to remove is taken from
/// the text preceding it on its first line. When that text is not pure
/// whitespace the smallest indentation of the following lines is used.
/// Lines that begin inside a template literal are appended to the entry
/// before them untouched.
fn source_lines(ast: &ScriptAst, span: Span, literals: &[Span]) -> Vec<String> {
    let range = ast.span_of(span);
    let source = ast.source();
    let Some(text) = range.slice(source) else {
        return Vec::new();
    };

    let before = source.get(..range.start as usize).unwrap_or_default();
    let prefix = match before.rfind('\n') {
        Some(newline) => &before[newline + 1..],
        None => before,
    };

    let literals: Vec<_> = literals.iter().map(|l| ast.span_of(*l)).collect();
    let in_literal = |offset: u32| literals.iter().any(|l| l.start < offset && offset < l.end);

    let mut physical = Vec::new();
    let mut offset = range.start;
    for line in text.split('\n') {
        physical.push((in_literal(offset), line.strip_suffix('\r').unwrap_or(line)));
        offset += line.len() as u32 + 1;
    }

    let indent = if prefix.trim().is_empty() {
        prefix.chars().count()
    } else {
        physical
            .iter()
            .skip(1)
            .filter(|(continued, line)| !continued && !line.trim().is_empty())
            .map(|(_, line)| leading_whitespace(line))
            .min()
            .unwrap_or(0)
    };

    let mut lines: Vec<String> = Vec::new();
    for (index, (continued, line)) in physical.into_iter().enumerate() {
        if let (true, Some(last)) = (continued, lines.last_mut()) {
            last.push('\n');
            last.push_str(line);
        } else if index == 0 {
            lines.push(line.to_string());
        } else {
            lines.push(dedent(line, indent));
        }
    }

    lines
        .into_iter()
        .map(|line| line.trim_end().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn dedent(line: &str, indent: usize) -> String {
    let strip = leading_whitespace(line).min(indent);
    line.chars().skip(strip).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use script_parser::{analyze, parse_script, ScriptKind};

    fn first_method(source: &str) -> MethodSource {
        let ast = parse_script(source, ScriptKind::JavaScript).unwrap();
        let structure = analyze(&ast).unwrap();
        let (name, function) = structure
            .methods
            .iter()
            .next()
            .expect("at least one method");
        method_source(&ast, name, function)
    }

    #[test]
    fn test_flatten_access() {
        assert_eq!(flatten_access("this.data.count + 1"), "this.count + 1");
        assert_eq!(flatten_access("this.props.title"), "this.title");
        assert_eq!(flatten_access("that.data.x"), "that.data.x");
        assert_eq!(flatten_access("_this.data.x"), "_this.data.x");
        assert_eq!(
            flatten_access("this.setData({ n: this.data.n + this.props.step })"),
            "this.setData({ n: this.n + this.step })"
        );
    }

    #[test]
    fn test_block_body_dedented() {
        let method = first_method(
            r#"Page({
  load(id, opts) {
    const a = this.data.list;

    if (a) {
      this.setData({ a });
    }
  },
});"#,
        );
        assert_eq!(method.signature(), "load(id, opts)");
        assert_eq!(
            method.body,
            vec![
                "const a = this.list;",
                "if (a) {",
                "  this.setData({ a });",
                "}",
            ]
        );
    }

    #[test]
    fn test_interior_comments_kept() {
        let method = first_method("Page({ run() {\n    a();\n    // keep\n    b();\n  } });");
        assert_eq!(method.body, vec!["a();", "// keep", "b();"]);
    }

    #[test]
    fn test_expression_arrow() {
        let method = first_method("Page({ total: async (x) => x * 2 });");
        assert_eq!(method.signature(), "async total(x)");
        assert_eq!(method.body, vec!["return x * 2;"]);
    }

    #[test]
    fn test_empty_body() {
        let method = first_method("Page({ noop() {} });");
        assert!(method.body.is_empty());
    }

    #[test]
    fn test_multiline_template_literal_kept() {
        let method = first_method(
            "Page({\n  render() {\n    const html = `<ul>\n  <li>${this.data.a}</li>\n\n</ul>`;\n    return html;\n  },\n});",
        );
        assert_eq!(
            method.body,
            vec![
                "const html = `<ul>\n  <li>${this.a}</li>\n\n</ul>`;",
                "return html;",
            ]
        );
    }

    #[test]
    fn test_generator() {
        let method = first_method("Page({ *ids() { yield 1; } });");
        assert_eq!(method.signature(), "*ids()");
        assert_eq!(method.body, vec!["yield 1;"]);
    }
}
