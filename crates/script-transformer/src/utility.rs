//! Utility modules: scripts made only of exports and declarations.

use crate::body::body_lines;
use crate::description::UtilityModule;
use script_parser::{analyze, FunctionNode, ScriptAst};
use swc_ecma_ast::*;

/// Re-emit a utility module.
///
/// Returns `None` when the script has a declaration call, is empty, or
/// contains any top-level item other than an export, a function
/// declaration or a variable declaration.
pub fn transform_utility_module(ast: &ScriptAst) -> Option<UtilityModule> {
    let body = &ast.module().body;
    if body.is_empty() || !body.iter().all(is_utility_item) || analyze(ast).is_some() {
        return None;
    }
    let items = body
        .iter()
        .map(|item| match item {
            ModuleItem::ModuleDecl(ModuleDecl::ExportDecl(ExportDecl {
                decl: Decl::Var(var),
                ..
            })) => rebuild_arrow_exports(ast, var).unwrap_or_else(|| ast.text(item).to_string()),
            _ => ast.text(item).to_string(),
        })
        .collect();
    Some(UtilityModule { items })
}

fn is_utility_item(item: &ModuleItem) -> bool {
    match item {
        ModuleItem::ModuleDecl(decl) => matches!(
            decl,
            ModuleDecl::ExportDecl(_)
                | ModuleDecl::ExportNamed(_)
                | ModuleDecl::ExportDefaultDecl(_)
                | ModuleDecl::ExportDefaultExpr(_)
                | ModuleDecl::ExportAll(_)
        ),
        ModuleItem::Stmt(Stmt::Decl(Decl::Fn(_) | Decl::Var(_))) => true,
        _ => false,
    }
}

/// Rebuild `export const f = (..) => ..` when every declarator is an arrow.
fn rebuild_arrow_exports(ast: &ScriptAst, var: &VarDecl) -> Option<String> {
    let keyword = match var.kind {
        VarDeclKind::Var => "var",
        VarDeclKind::Let => "let",
        VarDeclKind::Const => "const",
    };
    let mut rebuilt = Vec::with_capacity(var.decls.len());
    for declarator in &var.decls {
        let Pat::Ident(binding) = &declarator.name else {
            return None;
        };
        let Some(Expr::Arrow(arrow)) = declarator.init.as_deref() else {
            return None;
        };
        let function = FunctionNode::Arrow(arrow.clone());
        let params = function.params(ast).join(", ");
        let asyncness = if arrow.is_async { "async " } else { "" };
        let generics = arrow.type_params.as_deref().map(|tp| ast.text(tp)).unwrap_or_default();
        let returns = arrow
            .return_type
            .as_deref()
            .map(|rt| format!(": {}", ast.text(&*rt.type_ann)))
            .unwrap_or_default();
        let body = body_lines(ast, &function);

        let mut text = format!(
            "export {keyword} {} = {asyncness}{generics}({params}){returns} => {{",
            binding.id.sym.as_str()
        );
        if body.is_empty() {
            text.push_str("};");
        } else {
            text.push('\n');
            for line in &body {
                text.push_str("  ");
                text.push_str(line);
                text.push('\n');
            }
            text.push_str("};");
        }
        rebuilt.push(text);
    }
    Some(rebuilt.join("\n\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use script_parser::{parse_script, ScriptKind};

    fn utility(source: &str) -> Option<UtilityModule> {
        let ast = parse_script(source, ScriptKind::JavaScript).unwrap();
        transform_utility_module(&ast)
    }

    #[test]
    fn test_scenario_d_arrow_exports() {
        let module = utility(
            r#"export const add = (a, b) => a + b;

export const load = async (id) => {
  const res = await fetch(id);
  return res.json();
};
"#,
        )
        .unwrap();
        assert_eq!(
            module.items,
            vec![
                "export const add = (a, b) => {\n  return a + b;\n};",
                "export const load = async (id) => {\n  const res = await fetch(id);\n  return res.json();\n};",
            ]
        );
    }

    #[test]
    fn test_other_items_verbatim() {
        let module = utility(
            "function helper() { return 1; }\nexport default helper;\nexport { helper as h };",
        )
        .unwrap();
        assert_eq!(
            module.items,
            vec![
                "function helper() { return 1; }",
                "export default helper;",
                "export { helper as h };",
            ]
        );
    }

    #[test]
    fn test_not_a_utility_module() {
        assert!(utility("").is_none());
        assert!(utility("import a from './a';\nexport const b = a;").is_none());
        assert!(utility("console.log(1);").is_none());
    }

    #[test]
    fn test_declaration_call_is_not_utility() {
        assert!(utility("const page = Page({ data: {} });").is_none());
    }

    #[test]
    fn test_typed_arrow_params() {
        let ast = parse_script(
            "export const twice = (n: number) => n * 2;",
            ScriptKind::TypeScript,
        )
        .unwrap();
        let module = transform_utility_module(&ast).unwrap();
        assert_eq!(
            module.items,
            vec!["export const twice = (n: number) => {\n  return n * 2;\n};"]
        );
    }

    #[test]
    fn test_generic_arrow_signature_kept() {
        let ast = parse_script(
            "export const id = <T>(x: T): T => x;\nexport const load = async (url: string): Promise<string> => {\n  return fetch(url);\n};",
            ScriptKind::TypeScript,
        )
        .unwrap();
        let module = transform_utility_module(&ast).unwrap();
        assert_eq!(
            module.items,
            vec![
                "export const id = <T>(x: T): T => {\n  return x;\n};",
                "export const load = async (url: string): Promise<string> => {\n  return fetch(url);\n};",
            ]
        );
    }
}
