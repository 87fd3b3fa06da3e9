//! Parsed script files.

use crate::error::{ParseResult, ScriptParseError};
use source_text::Span;
use std::path::Path;
use std::sync::Arc;
use swc_common::{FileName, SourceMap, Spanned};
use swc_ecma_ast::Module;
use swc_ecma_parser::{EsSyntax, Parser, StringInput, Syntax, TsSyntax};

/// The dialect a script is parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptKind {
    /// `.js`
    JavaScript,
    /// `.ts`
    TypeScript,
}

impl ScriptKind {
    /// Pick the dialect for a file extension, without the dot.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "js" => Some(ScriptKind::JavaScript),
            "ts" => Some(ScriptKind::TypeScript),
            _ => None,
        }
    }

    /// Pick the dialect for a path.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    fn syntax(self) -> Syntax {
        match self {
            ScriptKind::JavaScript => Syntax::Es(EsSyntax::default()),
            ScriptKind::TypeScript => Syntax::Typescript(TsSyntax {
                tsx: false,
                ..Default::default()
            }),
        }
    }
}

/// A parsed script together with the text it was parsed from.
///
/// swc nodes carry byte spans; [`ScriptAst::text`] turns any of them back
/// into the exact original substring.
#[derive(Debug, Clone)]
pub struct ScriptAst {
    source: String,
    module: Module,
    file_start: u32,
    kind: ScriptKind,
}

impl ScriptAst {
    /// The original source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// The parsed module.
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// The dialect the file was parsed with.
    pub fn kind(&self) -> ScriptKind {
        self.kind
    }

    /// Convert an swc span to a file-relative span.
    pub fn span_of(&self, span: swc_common::Span) -> Span {
        Span::new(
            span.lo.0.saturating_sub(self.file_start),
            span.hi.0.saturating_sub(self.file_start),
        )
    }

    /// The original text of an swc span, or `""` if it lies outside the file.
    pub fn slice(&self, span: swc_common::Span) -> &str {
        self.span_of(span).slice(&self.source).unwrap_or_default()
    }

    /// The original text of a node.
    pub fn text<N: Spanned>(&self, node: &N) -> &str {
        self.slice(node.span())
    }
}

/// Parse a script file.
pub fn parse_script(source: &str, kind: ScriptKind) -> ParseResult<ScriptAst> {
    let cm: Arc<SourceMap> = Default::default();
    let fm = cm.new_source_file(
        FileName::Custom("script".into()).into(),
        source.to_string(),
    );
    let file_start = fm.start_pos.0;

    let mut parser = Parser::new(kind.syntax(), StringInput::from(&*fm), None);
    let module = parser.parse_module().map_err(|e| {
        let span = e.span();
        ScriptParseError::new(
            e.kind().msg().into_owned(),
            Span::new(
                span.lo.0.saturating_sub(file_start),
                span.hi.0.saturating_sub(file_start),
            ),
        )
    })?;

    Ok(ScriptAst {
        source: source.to_string(),
        module,
        file_start,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use swc_ecma_ast::{ModuleItem, Stmt};

    #[test]
    fn test_slice_statement() {
        let source = "const a = 1;\nPage({ data: {} });\n";
        let ast = parse_script(source, ScriptKind::JavaScript).unwrap();
        let ModuleItem::Stmt(stmt @ Stmt::Expr(_)) = &ast.module().body[1] else {
            panic!("expected expression statement");
        };
        assert_eq!(ast.text(stmt), "Page({ data: {} });");
    }

    #[test]
    fn test_typescript() {
        let source = "const n: number = 1;\nexport interface A { x: string }\n";
        let ast = parse_script(source, ScriptKind::TypeScript).unwrap();
        assert_eq!(ast.module().body.len(), 2);
        assert_eq!(ast.kind(), ScriptKind::TypeScript);
    }

    #[test]
    fn test_parse_error() {
        let error = parse_script("Page({ data: { ", ScriptKind::JavaScript).unwrap_err();
        assert!(!error.message.is_empty());
    }

    #[test]
    fn test_kind_from_path() {
        assert_eq!(
            ScriptKind::from_path(Path::new("pages/index.ts")),
            Some(ScriptKind::TypeScript)
        );
        assert_eq!(ScriptKind::from_path(Path::new("utils.sjs")), None);
    }
}
