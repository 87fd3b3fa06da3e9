//! Structural extraction of `Page({...})` and `Component({...})` calls.

use crate::ast::ScriptAst;
use crate::literal::literal_to_json;
use indexmap::IndexMap;
use serde_json::Value;
use swc_common::{Span, Spanned};
use swc_ecma_ast::*;
use swc_ecma_visit::{Visit, VisitWith};

/// Lifecycle hooks of the `Page` form.
pub const PAGE_LIFECYCLES: &[&str] = &["onLoad", "onShow", "onReady", "onHide", "onUnload"];

/// Lifecycle hooks of the `Component` form.
pub const COMPONENT_LIFECYCLES: &[&str] = &[
    "onInit",
    "created",
    "attached",
    "ready",
    "detached",
    "error",
    "didMount",
    "didUpdate",
    "didUnmount",
    "didHide",
    "didShow",
];

/// Check if a key names a lifecycle hook of either declaration form.
pub fn is_lifecycle(name: &str) -> bool {
    PAGE_LIFECYCLES.contains(&name) || COMPONENT_LIFECYCLES.contains(&name)
}

/// Which declaration call a script uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationKind {
    /// `Page({...})`
    Page,
    /// `Component({...})`
    Component,
}

impl DeclarationKind {
    fn from_callee(name: &str) -> Option<Self> {
        match name {
            "Page" => Some(DeclarationKind::Page),
            "Component" => Some(DeclarationKind::Component),
            _ => None,
        }
    }
}

/// A function value taken from the configuration object.
#[derive(Debug, Clone)]
pub enum FunctionNode {
    /// A method or `function` expression.
    Function(Box<Function>),
    /// An arrow function.
    Arrow(ArrowExpr),
}

/// The body of a [`FunctionNode`].
#[derive(Debug, Clone, Copy)]
pub enum FunctionBody<'a> {
    /// A block of statements.
    Block(&'a BlockStmt),
    /// An arrow function's expression body.
    Expr(&'a Expr),
    /// A bodyless declaration.
    Empty,
}

impl FunctionNode {
    /// Extract a function from a property value, looking through parentheses.
    pub fn from_expr(expr: &Expr) -> Option<Self> {
        match expr {
            Expr::Fn(f) => Some(FunctionNode::Function(f.function.clone())),
            Expr::Arrow(arrow) => Some(FunctionNode::Arrow(arrow.clone())),
            Expr::Paren(paren) => Self::from_expr(&paren.expr),
            _ => None,
        }
    }

    /// Whether the function is `async`.
    pub fn is_async(&self) -> bool {
        match self {
            FunctionNode::Function(f) => f.is_async,
            FunctionNode::Arrow(a) => a.is_async,
        }
    }

    /// Whether the function is a generator.
    pub fn is_generator(&self) -> bool {
        match self {
            FunctionNode::Function(f) => f.is_generator,
            FunctionNode::Arrow(a) => a.is_generator,
        }
    }

    /// Spans of each parameter, in order.
    pub fn param_spans(&self) -> Vec<Span> {
        match self {
            FunctionNode::Function(f) => f.params.iter().map(|p| p.span).collect(),
            FunctionNode::Arrow(a) => a.params.iter().map(pattern_span).collect(),
        }
    }

    /// Parameter source text, in order.
    pub fn params<'a>(&self, ast: &'a ScriptAst) -> Vec<&'a str> {
        self.param_spans()
            .into_iter()
            .map(|span| ast.slice(span))
            .collect()
    }

    /// The function body.
    pub fn body(&self) -> FunctionBody<'_> {
        match self {
            FunctionNode::Function(f) => match &f.body {
                Some(block) => FunctionBody::Block(block),
                None => FunctionBody::Empty,
            },
            FunctionNode::Arrow(a) => match &*a.body {
                BlockStmtOrExpr::BlockStmt(block) => FunctionBody::Block(block),
                BlockStmtOrExpr::Expr(expr) => FunctionBody::Expr(expr),
            },
        }
    }

    /// Span of the whole function.
    pub fn span(&self) -> Span {
        match self {
            FunctionNode::Function(f) => f.span,
            FunctionNode::Arrow(a) => a.span,
        }
    }
}

/// Span of an arrow parameter, stretched over its type annotation.
fn pattern_span(pat: &Pat) -> Span {
    let span = pat.span();
    match pat {
        Pat::Ident(binding) => match &binding.type_ann {
            Some(ann) if ann.span.hi > span.hi => span.with_hi(ann.span.hi),
            _ => span,
        },
        _ => span,
    }
}

/// One entry of `properties`/`props`.
#[derive(Debug, Clone)]
pub struct PropertyEntry {
    /// Property name.
    pub name: String,
    /// Constructor name such as `String`, or `"unknown"`.
    pub declared_type: String,
    /// The value node as written.
    pub value: Box<Expr>,
    /// Span of the key/value pair.
    pub span: Span,
}

/// One entry of `observers`.
#[derive(Debug, Clone)]
pub struct ObserverEntry {
    /// Observed path as written, e.g. `count`, `user.name` or `a, b`.
    pub path: String,
    /// Handler parameter source text.
    pub params: Vec<String>,
    /// The handler.
    pub handler: FunctionNode,
    /// Span of the key/value pair.
    pub span: Span,
}

/// A configuration key that fits no bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedKey {
    /// Key as written, or `...` for spreads.
    pub name: String,
    /// Span of the property.
    pub span: Span,
}

/// Everything extracted from one declaration call.
#[derive(Debug, Clone)]
pub struct ScriptStructure {
    /// Which call was found.
    pub kind: DeclarationKind,
    /// Span of the call expression.
    pub call_span: Span,
    /// Literal data, in source order.
    pub data: IndexMap<String, Value>,
    /// Data keys whose initializer was not entirely literal.
    pub non_literal_data: Vec<(String, Span)>,
    /// Methods, in source order.
    pub methods: IndexMap<String, FunctionNode>,
    /// Lifecycle hooks under their source names, in source order.
    pub life_cycles: IndexMap<String, FunctionNode>,
    /// Declared properties.
    pub properties: Vec<PropertyEntry>,
    /// Value observers.
    pub observers: Vec<ObserverEntry>,
    /// Keys that were not classified.
    pub unsupported: Vec<UnsupportedKey>,
}

/// Get the static name of a property key.
pub fn prop_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.as_str().to_string()),
        PropName::Str(s) => s.value.as_str().map(str::to_string),
        PropName::Num(n) => Some(n.value.to_string()),
        _ => None,
    }
}

/// Finds the first declaration call in source order.
#[derive(Default)]
struct DeclarationFinder {
    found: Option<(DeclarationKind, CallExpr)>,
}

impl Visit for DeclarationFinder {
    fn visit_call_expr(&mut self, call: &CallExpr) {
        if self.found.is_some() {
            return;
        }
        if let Some(kind) = declaration_kind(call) {
            self.found = Some((kind, call.clone()));
            return;
        }
        call.visit_children_with(self);
    }
}

/// Match `Page(<object>)` or `Component(<object>)` with exactly one argument.
fn declaration_kind(call: &CallExpr) -> Option<DeclarationKind> {
    let Callee::Expr(callee) = &call.callee else {
        return None;
    };
    let Expr::Ident(ident) = &**callee else {
        return None;
    };
    let kind = DeclarationKind::from_callee(ident.sym.as_str())?;
    match call.args.as_slice() {
        [arg] if arg.spread.is_none() && matches!(&*arg.expr, Expr::Object(_)) => Some(kind),
        _ => None,
    }
}

/// Locate the declaration call and classify its configuration object.
///
/// Returns `None` when the script has no `Page`/`Component` call with a
/// single object-literal argument.
pub fn analyze(ast: &ScriptAst) -> Option<ScriptStructure> {
    let mut finder = DeclarationFinder::default();
    ast.module().visit_with(&mut finder);
    let (kind, call) = finder.found?;
    let Expr::Object(config) = &*call.args[0].expr else {
        return None;
    };

    let mut structure = ScriptStructure {
        kind,
        call_span: call.span,
        data: IndexMap::new(),
        non_literal_data: Vec::new(),
        methods: IndexMap::new(),
        life_cycles: IndexMap::new(),
        properties: Vec::new(),
        observers: Vec::new(),
        unsupported: Vec::new(),
    };

    for prop in &config.props {
        let PropOrSpread::Prop(prop) = prop else {
            structure.reject(String::from("..."), prop.span());
            continue;
        };
        match &**prop {
            Prop::KeyValue(kv) => match prop_name(&kv.key) {
                Some(key) => classify_value(ast, &mut structure, key, &kv.value, kv.span()),
                None => structure.reject(ast.text(&kv.key).to_string(), kv.span()),
            },
            Prop::Method(method) => match prop_name(&method.key) {
                Some(key) => classify_function(
                    &mut structure,
                    key,
                    FunctionNode::Function(method.function.clone()),
                ),
                None => structure.reject(ast.text(&method.key).to_string(), method.span()),
            },
            other => structure.reject(ast.text(other).to_string(), other.span()),
        }
    }

    Some(structure)
}

impl ScriptStructure {
    fn reject(&mut self, name: String, span: Span) {
        self.unsupported.push(UnsupportedKey { name, span });
    }
}

fn classify_value(
    ast: &ScriptAst,
    structure: &mut ScriptStructure,
    key: String,
    value: &Expr,
    span: Span,
) {
    match key.as_str() {
        "data" => match data_object(value) {
            Some(object) => {
                for (name, (value, exact, entry_span)) in object_entries(ast, object) {
                    if !exact {
                        structure.non_literal_data.push((name.clone(), entry_span));
                    }
                    structure.data.insert(name, value);
                }
            }
            None => structure.reject(key, span),
        },
        "methods" => match value {
            Expr::Object(object) => collect_methods(ast, structure, object),
            _ => structure.reject(key, span),
        },
        "properties" | "props" => match value {
            Expr::Object(object) => collect_properties(ast, structure, object),
            _ => structure.reject(key, span),
        },
        "observers" => match value {
            Expr::Object(object) => collect_observers(ast, structure, object),
            _ => structure.reject(key, span),
        },
        _ => match FunctionNode::from_expr(value) {
            Some(function) => classify_function(structure, key, function),
            None => structure.reject(key, span),
        },
    }
}

fn classify_function(structure: &mut ScriptStructure, key: String, function: FunctionNode) {
    if is_lifecycle(&key) {
        structure.life_cycles.insert(key, function);
    } else {
        structure.methods.insert(key, function);
    }
}

/// The object literal holding initial data: either the value itself or the
/// object returned by a `data()` function.
fn data_object(value: &Expr) -> Option<&ObjectLit> {
    match value {
        Expr::Object(object) => Some(object),
        Expr::Paren(paren) => data_object(&paren.expr),
        Expr::Fn(f) => f.function.body.as_ref().and_then(returned_object),
        Expr::Arrow(arrow) => match &*arrow.body {
            BlockStmtOrExpr::BlockStmt(block) => returned_object(block),
            BlockStmtOrExpr::Expr(expr) => data_object(expr),
        },
        _ => None,
    }
}

/// Find the object literal returned at the top level of a block.
pub fn returned_object(block: &BlockStmt) -> Option<&ObjectLit> {
    block.stmts.iter().find_map(|stmt| match stmt {
        Stmt::Return(ReturnStmt { arg: Some(arg), .. }) => match &**arg {
            Expr::Object(object) => Some(object),
            Expr::Paren(paren) => match &*paren.expr {
                Expr::Object(object) => Some(object),
                _ => None,
            },
            _ => None,
        },
        _ => None,
    })
}

/// Convert each static key of an object literal, in order.
///
/// Each entry is `(key, (value, exact, span))`.
pub fn object_entries(ast: &ScriptAst, object: &ObjectLit) -> Vec<(String, (Value, bool, Span))> {
    let mut entries = Vec::new();
    for prop in &object.props {
        let PropOrSpread::Prop(prop) = prop else {
            continue;
        };
        match &**prop {
            Prop::KeyValue(kv) => {
                if let Some(key) = prop_name(&kv.key) {
                    let conversion = literal_to_json(&kv.value);
                    entries.push((key, (conversion.value, conversion.exact, kv.span())));
                }
            }
            Prop::Shorthand(ident) => {
                entries.push((ident.sym.as_str().to_string(), (Value::Null, false, ident.span)));
            }
            _ => {}
        }
    }
    entries
}

fn collect_methods(ast: &ScriptAst, structure: &mut ScriptStructure, object: &ObjectLit) {
    for prop in &object.props {
        let PropOrSpread::Prop(prop) = prop else {
            structure.reject(String::from("methods. ..."), prop.span());
            continue;
        };
        let entry = match &**prop {
            Prop::Method(method) => prop_name(&method.key)
                .map(|key| (key, FunctionNode::Function(method.function.clone()))),
            Prop::KeyValue(kv) => prop_name(&kv.key)
                .and_then(|key| FunctionNode::from_expr(&kv.value).map(|f| (key, f))),
            _ => None,
        };
        match entry {
            Some((key, function)) => {
                structure.methods.insert(key, function);
            }
            None => structure.reject(format!("methods.{}", ast.text(&**prop)), prop.span()),
        }
    }
}

fn collect_properties(ast: &ScriptAst, structure: &mut ScriptStructure, object: &ObjectLit) {
    for prop in &object.props {
        let PropOrSpread::Prop(prop) = prop else {
            continue;
        };
        let Prop::KeyValue(kv) = &**prop else {
            structure.reject(format!("properties.{}", ast.text(&**prop)), prop.span());
            continue;
        };
        let Some(name) = prop_name(&kv.key) else {
            continue;
        };
        structure.properties.push(PropertyEntry {
            name,
            declared_type: declared_type(&kv.value).unwrap_or_else(|| "unknown".to_string()),
            value: kv.value.clone(),
            span: kv.span(),
        });
    }
}

/// `title: String` or `title: { type: String, ... }`.
fn declared_type(value: &Expr) -> Option<String> {
    match value {
        Expr::Ident(ident) => Some(ident.sym.as_str().to_string()),
        Expr::Object(object) => object.props.iter().find_map(|prop| {
            let PropOrSpread::Prop(prop) = prop else {
                return None;
            };
            let Prop::KeyValue(kv) = &**prop else {
                return None;
            };
            match (prop_name(&kv.key).as_deref(), &*kv.value) {
                (Some("type"), Expr::Ident(ident)) => Some(ident.sym.as_str().to_string()),
                _ => None,
            }
        }),
        _ => None,
    }
}

fn collect_observers(ast: &ScriptAst, structure: &mut ScriptStructure, object: &ObjectLit) {
    for prop in &object.props {
        let PropOrSpread::Prop(prop) = prop else {
            continue;
        };
        let entry = match &**prop {
            Prop::Method(method) => prop_name(&method.key)
                .map(|key| (key, FunctionNode::Function(method.function.clone()))),
            Prop::KeyValue(kv) => prop_name(&kv.key)
                .and_then(|key| FunctionNode::from_expr(&kv.value).map(|f| (key, f))),
            _ => None,
        };
        match entry {
            Some((path, handler)) => {
                let params = handler.params(ast).into_iter().map(str::to_string).collect();
                structure.observers.push(ObserverEntry {
                    path,
                    params,
                    handler,
                    span: prop.span(),
                });
            }
            None => structure.reject(format!("observers.{}", ast.text(&**prop)), prop.span()),
        }
    }
}
