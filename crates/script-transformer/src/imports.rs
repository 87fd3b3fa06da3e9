//! Import retargeting and the verbatim preamble.

use script_parser::ScriptAst;
use swc_common::{Span, Spanned};
use swc_ecma_ast::{ImportDecl, ModuleDecl, ModuleItem};

/// Script extensions dropped from relative specifiers.
const SCRIPT_EXTENSIONS: &[&str] = &[".js", ".ts"];

/// Strip a script extension from a relative specifier.
///
/// `./util.js` becomes `./util`; package specifiers are left alone.
pub fn retarget(specifier: &str) -> String {
    let relative = specifier.starts_with("./") || specifier.starts_with("../");
    if relative {
        for ext in SCRIPT_EXTENSIONS {
            if let Some(stem) = specifier.strip_suffix(ext) {
                return stem.to_string();
            }
        }
    }
    specifier.to_string()
}

/// Every import statement, rebuilt with a retargeted specifier.
pub fn collect_imports(ast: &ScriptAst) -> Vec<String> {
    ast.module()
        .body
        .iter()
        .filter_map(|item| match item {
            ModuleItem::ModuleDecl(ModuleDecl::Import(import)) => Some(rebuild_import(ast, import)),
            _ => None,
        })
        .collect()
}

fn rebuild_import(ast: &ScriptAst, import: &ImportDecl) -> String {
    let source = ast.source();
    let item = ast.span_of(import.span);
    let src = ast.span_of(import.src.span);
    let head = source
        .get(item.start as usize..src.start as usize)
        .unwrap_or_default();
    let tail = source
        .get(src.end as usize..item.end as usize)
        .unwrap_or_default();

    let specifier = match import.src.value.as_str() {
        Some(value) => value.to_string(),
        None => ast
            .text(&*import.src)
            .trim_matches(|c| c == '\'' || c == '"')
            .to_string(),
    };

    let mut statement = format!("{head}'{}'{tail}", retarget(&specifier))
        .trim_end()
        .to_string();
    if !statement.ends_with(';') {
        statement.push(';');
    }
    statement
}

/// Top-level items other than imports and the one holding the declaration call.
pub fn collect_preamble(ast: &ScriptAst, call_span: Span) -> Vec<String> {
    ast.module()
        .body
        .iter()
        .filter(|item| !matches!(item, ModuleItem::ModuleDecl(ModuleDecl::Import(_))))
        .filter(|item| {
            let span = item.span();
            !(span.lo <= call_span.lo && call_span.hi <= span.hi)
        })
        .map(|item| ast.text(item).to_string())
        .collect()
}
