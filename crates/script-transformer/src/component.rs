//! Component transformation.

use crate::body::method_source;
use crate::description::*;
use crate::imports::{collect_imports, collect_preamble};
use axml_transformer::ModuleBinding;
use convert_diagnostics::{Diagnostic, DiagnosticCode};
use indexmap::IndexMap;
use script_parser::structure::prop_name;
use script_parser::{analyze, FunctionNode, ObserverEntry, PropertyEntry, ScriptAst};
use swc_ecma_ast::{Expr, Lit, Prop, PropOrSpread, UnaryOp};

/// Lifecycle hook renames. Hooks not listed keep their name.
pub const LIFECYCLE_MAP: &[(&str, &str)] = &[
    ("onLoad", "created"),
    ("onInit", "created"),
    ("onShow", "mounted"),
    ("onReady", "mounted"),
    ("attached", "mounted"),
    ("didMount", "mounted"),
    ("onHide", "beforeDestroy"),
    ("onUnload", "destroyed"),
    ("detached", "destroyed"),
    ("didUnmount", "destroyed"),
    ("didUpdate", "updated"),
    ("didHide", "deactivated"),
    ("didShow", "activated"),
];

/// Map a source hook name to its target hook name.
pub fn map_lifecycle(name: &str) -> &str {
    LIFECYCLE_MAP
        .iter()
        .find(|(from, _)| *from == name)
        .map(|(_, to)| *to)
        .unwrap_or(name)
}

/// Transform a script into a component description.
///
/// Returns `None` when the script has no declaration call; such files are
/// copied through unchanged.
pub fn transform_script(
    ast: &ScriptAst,
    module_bindings: &[ModuleBinding],
) -> Option<ComponentDescription> {
    let structure = analyze(ast)?;
    let mut diagnostics = Vec::new();

    for (name, span) in &structure.non_literal_data {
        diagnostics.push(Diagnostic::warning(
            format!("data field `{name}` is not a literal and was set to null"),
            ast.span_of(*span),
            DiagnosticCode::NonLiteralData,
        ));
    }
    for key in &structure.unsupported {
        diagnostics.push(Diagnostic::warning(
            format!("option `{}` is not converted", key.name),
            ast.span_of(key.span),
            DiagnosticCode::UnsupportedOption,
        ));
    }

    let methods = structure
        .methods
        .iter()
        .map(|(name, function)| (name.clone(), method_source(ast, name, function)))
        .collect();

    let life_cycles = convert_life_cycles(ast, &structure.life_cycles, &mut diagnostics);

    let props = structure
        .properties
        .iter()
        .map(|entry| (entry.name.clone(), convert_prop(ast, entry)))
        .collect();

    let watch = convert_observers(ast, &structure.observers, &mut diagnostics);

    Some(ComponentDescription {
        kind: structure.kind,
        imports: collect_imports(ast),
        preamble: collect_preamble(ast, structure.call_span),
        data: structure.data,
        methods,
        computed: IndexMap::new(),
        props,
        watch,
        life_cycles,
        module_bindings: module_bindings.to_vec(),
        diagnostics,
    })
}

fn convert_life_cycles(
    ast: &ScriptAst,
    hooks: &IndexMap<String, FunctionNode>,
    diagnostics: &mut Vec<Diagnostic>,
) -> IndexMap<String, MethodSource> {
    let mut grouped: IndexMap<String, Vec<MethodSource>> = IndexMap::new();
    for (source_name, function) in hooks {
        let target = map_lifecycle(source_name);
        let parts = grouped.entry(target.to_string()).or_default();
        if !parts.is_empty() {
            diagnostics.push(Diagnostic::hint(
                format!("`{source_name}` was merged into the `{target}` hook"),
                ast.span_of(function.span()),
                DiagnosticCode::MergedLifecycle,
            ));
        }
        parts.push(method_source(ast, target, function));
    }
    grouped
        .into_iter()
        .filter_map(|(target, parts)| merge_hooks(parts).map(|method| (target, method)))
        .collect()
}

/// Combine hooks that map to the same lifecycle into one method.
///
/// Each body runs in its own immediately invoked function that receives the
/// hook's arguments, so `return` and parameter names stay local to the hook
/// they came from. Arrow functions keep `this`; generator bodies are
/// delegated to with `yield*`.
fn merge_hooks(mut parts: Vec<MethodSource>) -> Option<MethodSource> {
    if parts.len() <= 1 {
        return parts.pop();
    }
    let first = &parts[0];
    let mut merged = MethodSource {
        name: first.name.clone(),
        is_async: parts.iter().any(|part| part.is_async),
        is_generator: parts.iter().any(|part| part.is_generator),
        params: first.params.clone(),
        body: Vec::new(),
    };
    for part in parts.iter().filter(|part| !part.body.is_empty()) {
        let params = part.params.join(", ");
        let asyncness = if part.is_async { "async " } else { "" };
        let (open, close) = match (part.is_generator, part.is_async) {
            (true, _) => (
                format!("yield* ({asyncness}function* ({params}) {{"),
                "}).apply(this, arguments);",
            ),
            (false, true) => (
                format!("await (async ({params}) => {{"),
                "})(...arguments);",
            ),
            (false, false) => (format!("(({params}) => {{"), "})(...arguments);"),
        };
        merged.body.push(open);
        merged
            .body
            .extend(part.body.iter().map(|line| format!("  {line}")));
        merged.body.push(close.to_string());
    }
    Some(merged)
}

fn convert_prop(ast: &ScriptAst, entry: &PropertyEntry) -> PropDefinition {
    match &*entry.value {
        Expr::Object(object) => {
            let mut definition = PropDefinition::default();
            for prop in &object.props {
                let PropOrSpread::Prop(prop) = prop else {
                    continue;
                };
                let Prop::KeyValue(kv) = &**prop else {
                    continue;
                };
                match prop_name(&kv.key).as_deref() {
                    Some("type") => definition.type_name = Some(ast.text(&*kv.value).to_string()),
                    Some("default") | Some("value") if definition.default.is_none() => {
                        definition.default = Some(ast.text(&*kv.value).to_string());
                    }
                    _ => {}
                }
            }
            definition
        }
        Expr::Ident(ident) if ident.sym.as_str() == "undefined" => PropDefinition::default(),
        Expr::Ident(_) => PropDefinition {
            type_name: Some(entry.declared_type.clone()),
            default: None,
        },
        value => match literal_type(value) {
            Some(type_name) => PropDefinition {
                type_name: type_name.map(str::to_string),
                default: Some(ast.text(value).to_string()),
            },
            None => PropDefinition::default(),
        },
    }
}

/// Constructor name for a bare literal, or `Some(None)` for `null`.
fn literal_type(value: &Expr) -> Option<Option<&'static str>> {
    match value {
        Expr::Lit(Lit::Str(_)) | Expr::Tpl(_) => Some(Some("String")),
        Expr::Lit(Lit::Num(_)) => Some(Some("Number")),
        Expr::Lit(Lit::Bool(_)) => Some(Some("Boolean")),
        Expr::Lit(Lit::Null(_)) => Some(None),
        Expr::Array(_) => Some(Some("Array")),
        Expr::Unary(unary) if matches!(unary.op, UnaryOp::Minus | UnaryOp::Plus) => {
            match &*unary.arg {
                Expr::Lit(Lit::Num(_)) => Some(Some("Number")),
                _ => None,
            }
        }
        Expr::Paren(paren) => literal_type(&paren.expr),
        _ => None,
    }
}

fn convert_observers(
    ast: &ScriptAst,
    observers: &[ObserverEntry],
    diagnostics: &mut Vec<Diagnostic>,
) -> IndexMap<String, WatchEntry> {
    let mut watch: IndexMap<String, WatchEntry> = IndexMap::new();
    for observer in observers {
        let path = observer.path.trim();
        if !path.contains('.') && !path.contains(',') {
            let method = MethodSource {
                params: observer.params.clone(),
                ..method_source(ast, path, &observer.handler)
            };
            watch.insert(
                path.to_string(),
                WatchEntry {
                    handler: WatchHandler::Method(method),
                    deep: false,
                },
            );
            continue;
        }

        let mut roots: Vec<&str> = Vec::new();
        for segment in path.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let root = segment.split('.').next().unwrap_or(segment);
            if !roots.contains(&root) {
                roots.push(root);
            }
        }

        for root in &roots {
            let entry = watch.entry(root.to_string()).or_insert(WatchEntry {
                handler: WatchHandler::Placeholder { paths: Vec::new() },
                deep: true,
            });
            entry.deep = true;
            if let WatchHandler::Placeholder { paths } = &mut entry.handler {
                paths.push(path.to_string());
            }
        }

        diagnostics.push(Diagnostic::warning(
            format!(
                "observer `{path}` became a deep watcher on `{}` without its body",
                roots.join("`, `")
            ),
            ast.span_of(observer.span),
            DiagnosticCode::DeepWatchPlaceholder,
        ));
    }
    watch
}

#[cfg(test)]
mod tests {
    use super::*;
    use convert_diagnostics::Severity;
    use pretty_assertions::assert_eq;
    use script_parser::{parse_script, DeclarationKind, ScriptKind};
    use serde_json::json;

    fn transform_source(source: &str) -> Option<ComponentDescription> {
        let ast = parse_script(source, ScriptKind::JavaScript).unwrap();
        transform_script(&ast, &[])
    }

    #[test]
    fn test_scenario_b_page() {
        let description = transform_source(
            r#"Page({
  data: { x: 1 },
  onLoad(query) {
    this.setData({ x: this.data.x + 1 });
  },
  methods: {
    foo() {},
  },
});"#,
        )
        .unwrap();

        assert_eq!(description.kind, DeclarationKind::Page);
        assert_eq!(description.data.get("x"), Some(&json!(1)));
        assert!(description.methods.contains_key("foo"));
        assert!(description.computed.is_empty());

        let created = &description.life_cycles["created"];
        assert_eq!(created.signature(), "created(query)");
        assert_eq!(created.body, vec!["this.setData({ x: this.x + 1 });"]);
        assert!(!description.life_cycles.contains_key("onLoad"));
    }

    #[test]
    fn test_no_declaration_is_none() {
        assert!(transform_source("export const a = 1;").is_none());
        assert!(transform_source("console.log(Page);").is_none());
    }

    #[test]
    fn test_lifecycle_rename_and_passthrough() {
        let description =
            transform_source("Component({ didMount() {}, didUnmount() {}, ready() {}, error(e) {} });")
                .unwrap();
        let hooks: Vec<_> = description.life_cycles.keys().cloned().collect();
        assert_eq!(hooks, vec!["mounted", "destroyed", "ready", "error"]);
    }

    #[test]
    fn test_merged_hooks_keep_their_own_scope() {
        let description = transform_source(
            "Component({\n  onInit(query) {\n    if (!query) return;\n    load(query.id);\n  },\n  created(options) {\n    setup(options);\n  },\n  didMount() {},\n  attached() {\n    ready();\n  },\n});",
        )
        .unwrap();
        let created = &description.life_cycles["created"];
        assert!(!created.is_async);
        assert_eq!(created.params, vec!["query"]);
        assert_eq!(
            created.body,
            vec![
                "((query) => {",
                "  if (!query) return;",
                "  load(query.id);",
                "})(...arguments);",
                "((options) => {",
                "  setup(options);",
                "})(...arguments);",
            ]
        );
        let mounted = &description.life_cycles["mounted"];
        assert_eq!(mounted.body, vec!["(() => {", "  ready();", "})(...arguments);"]);
        assert_eq!(description.diagnostics.len(), 2);
    }

    #[test]
    fn test_lifecycle_merge() {
        let description = transform_source(
            "Page({\n  onShow() {\n    a();\n  },\n  onReady: async function () {\n    await b();\n  },\n});",
        )
        .unwrap();
        let mounted = &description.life_cycles["mounted"];
        assert!(mounted.is_async);
        assert_eq!(
            mounted.body,
            vec![
                "(() => {",
                "  a();",
                "})(...arguments);",
                "await (async () => {",
                "  await b();",
                "})(...arguments);",
            ]
        );
        assert_eq!(description.diagnostics.len(), 1);
        assert_eq!(description.diagnostics[0].code, DiagnosticCode::MergedLifecycle);
        assert_eq!(description.diagnostics[0].severity, Severity::Hint);
    }

    #[test]
    fn test_props() {
        let description = transform_source(
            r#"Component({
  props: {
    title: String,
    count: 3,
    label: 'ok',
    list: { type: Array, default: () => [] },
    mode: { value: 'a' },
    empty: null,
    onChange: () => {},
  },
});"#,
        )
        .unwrap();
        let def = |type_name: Option<&str>, default: Option<&str>| PropDefinition {
            type_name: type_name.map(str::to_string),
            default: default.map(str::to_string),
        };
        let props: Vec<_> = description.props.into_iter().collect();
        assert_eq!(
            props,
            vec![
                ("title".to_string(), def(Some("String"), None)),
                ("count".to_string(), def(Some("Number"), Some("3"))),
                ("label".to_string(), def(Some("String"), Some("'ok'"))),
                ("list".to_string(), def(Some("Array"), Some("() => []"))),
                ("mode".to_string(), def(None, Some("'a'"))),
                ("empty".to_string(), def(None, Some("null"))),
                ("onChange".to_string(), def(None, None)),
            ]
        );
    }

    #[test]
    fn test_single_segment_observer() {
        let description = transform_source(
            "Component({ observers: { count(val) { this.total = val * this.data.rate; } } });",
        )
        .unwrap();
        let entry = &description.watch["count"];
        assert!(!entry.deep);
        match &entry.handler {
            WatchHandler::Method(method) => {
                assert_eq!(method.signature(), "count(val)");
                assert_eq!(method.body, vec!["this.total = val * this.rate;"]);
            }
            other => panic!("expected a method handler, got {:?}", other),
        }
    }

    #[test]
    fn test_dotted_observer_placeholder() {
        let description = transform_source(
            "Component({ observers: { 'user.name': function (n) {}, 'user.age, size': function () {} } });",
        )
        .unwrap();
        let keys: Vec<_> = description.watch.keys().cloned().collect();
        assert_eq!(keys, vec!["user", "size"]);
        assert_eq!(
            description.watch["user"],
            WatchEntry {
                handler: WatchHandler::Placeholder {
                    paths: vec!["user.name".to_string(), "user.age, size".to_string()],
                },
                deep: true,
            }
        );
        assert!(description
            .diagnostics
            .iter()
            .all(|d| d.code == DiagnosticCode::DeepWatchPlaceholder));
        assert_eq!(description.diagnostics.len(), 2);
    }

    #[test]
    fn test_scenario_c_bindings_threaded() {
        let ast = parse_script("Page({ data: {} });", ScriptKind::JavaScript).unwrap();
        let binding = ModuleBinding {
            from: "./a.sjs".to_string(),
            name: "b".to_string(),
        };
        let description = transform_script(&ast, std::slice::from_ref(&binding)).unwrap();
        assert_eq!(description.module_bindings, vec![binding]);
    }

    #[test]
    fn test_diagnostics_for_dropped_options() {
        let description =
            transform_source("Page({ data: { now: Date.now() }, mixins: [] });").unwrap();
        let codes: Vec<_> = description.diagnostics.iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec![DiagnosticCode::NonLiteralData, DiagnosticCode::UnsupportedOption]
        );
        assert_eq!(description.data.get("now"), Some(&serde_json::Value::Null));
    }
}
