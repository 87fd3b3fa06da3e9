//! Conversion of literal initializers to JSON values.

use serde_json::{Map, Number, Value};
use swc_ecma_ast::{Expr, Lit, Prop, PropOrSpread, UnaryOp};

/// A JSON value converted from an initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralConversion {
    /// The converted value; non-literal parts are `null`.
    pub value: Value,
    /// Whether every part of the initializer was a literal.
    pub exact: bool,
}

/// Convert an initializer expression to JSON.
///
/// Strings, numbers, booleans, `null`, `undefined`, negated numbers,
/// templates without substitutions, arrays and object literals convert.
/// Anything else (calls, identifiers, functions) becomes `null` and clears
/// [`LiteralConversion::exact`].
pub fn literal_to_json(expr: &Expr) -> LiteralConversion {
    let mut exact = true;
    let value = convert(expr, &mut exact);
    LiteralConversion { value, exact }
}

fn convert(expr: &Expr, exact: &mut bool) -> Value {
    match expr {
        Expr::Lit(Lit::Str(s)) => match s.value.as_str() {
            Some(text) => Value::String(text.to_string()),
            None => inexact(exact),
        },
        Expr::Lit(Lit::Num(n)) => number(n.value),
        Expr::Lit(Lit::Bool(b)) => Value::Bool(b.value),
        Expr::Lit(Lit::Null(_)) => Value::Null,
        Expr::Ident(ident) if ident.sym.as_str() == "undefined" => Value::Null,
        Expr::Unary(unary) => match (unary.op, &*unary.arg) {
            (UnaryOp::Minus, Expr::Lit(Lit::Num(n))) => number(-n.value),
            (UnaryOp::Plus, Expr::Lit(Lit::Num(n))) => number(n.value),
            _ => inexact(exact),
        },
        Expr::Tpl(tpl) if tpl.exprs.is_empty() => {
            let cooked = tpl.quasis.first().and_then(|quasi| quasi.cooked.as_ref());
            match cooked.and_then(|text| text.as_str()) {
                Some(text) => Value::String(text.to_string()),
                None => inexact(exact),
            }
        }
        Expr::Array(array) => Value::Array(
            array
                .elems
                .iter()
                .map(|elem| match elem {
                    Some(e) if e.spread.is_none() => convert(&e.expr, exact),
                    Some(_) => inexact(exact),
                    None => Value::Null,
                })
                .collect(),
        ),
        Expr::Object(object) => {
            let mut map = Map::new();
            for prop in &object.props {
                let PropOrSpread::Prop(prop) = prop else {
                    *exact = false;
                    continue;
                };
                match &**prop {
                    Prop::KeyValue(kv) => match crate::structure::prop_name(&kv.key) {
                        Some(key) => {
                            map.insert(key, convert(&kv.value, exact));
                        }
                        None => *exact = false,
                    },
                    _ => *exact = false,
                }
            }
            Value::Object(map)
        }
        Expr::Paren(paren) => convert(&paren.expr, exact),
        Expr::TsAs(e) => convert(&e.expr, exact),
        Expr::TsConstAssertion(e) => convert(&e.expr, exact),
        Expr::TsSatisfies(e) => convert(&e.expr, exact),
        _ => inexact(exact),
    }
}

fn inexact(exact: &mut bool) -> Value {
    *exact = false;
    Value::Null
}

/// Integral values stay integral so `1` is not written back as `1.0`.
fn number(n: f64) -> Value {
    if n.is_finite() && n.fract() == 0.0 && n.abs() < 9_007_199_254_740_992.0 {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{parse_script, ScriptKind};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use swc_ecma_ast::{Decl, ModuleItem, Stmt};

    fn convert_init(init: &str) -> LiteralConversion {
        let source = format!("const v = {};", init);
        let ast = parse_script(&source, ScriptKind::TypeScript).unwrap();
        let ModuleItem::Stmt(Stmt::Decl(Decl::Var(var))) = &ast.module().body[0] else {
            panic!("expected declaration");
        };
        let init = var.decls[0].init.as_ref().unwrap();
        literal_to_json(init)
    }

    #[test]
    fn test_flat_literals() {
        assert_eq!(convert_init("'hi'").value, json!("hi"));
        assert_eq!(convert_init("42").value, json!(42));
        assert_eq!(convert_init("-1.5").value, json!(-1.5));
        assert_eq!(convert_init("true").value, json!(true));
        assert_eq!(convert_init("null").value, json!(null));
        assert_eq!(convert_init("`plain`").value, json!("plain"));
    }

    #[test]
    fn test_template_escapes_cooked() {
        assert_eq!(convert_init(r"`a\nb`").value, json!("a\nb"));
        assert_eq!(convert_init(r"`tab\t\u0041 \`q\``").value, json!("tab\tA `q`"));
        assert_eq!(convert_init("`two\nlines`").value, json!("two\nlines"));
    }

    #[test]
    fn test_nested() {
        let conversion = convert_init("{ list: [{ id: 1, name: 'a' }], meta: { ok: false } }");
        assert!(conversion.exact);
        assert_eq!(
            conversion.value,
            json!({ "list": [{ "id": 1, "name": "a" }], "meta": { "ok": false } })
        );
    }

    #[test]
    fn test_non_literal_collapses_to_null() {
        let conversion = convert_init("{ now: Date.now(), n: 1 }");
        assert!(!conversion.exact);
        assert_eq!(conversion.value, json!({ "now": null, "n": 1 }));
    }

    #[test]
    fn test_as_const() {
        assert_eq!(convert_init("['a', 'b'] as const").value, json!(["a", "b"]));
    }
}
