//! Component script generation.

use crate::helpers::{object_key, SET_DATA_HELPER};
use script_transformer::{
    ComponentDescription, MethodSource, PropDefinition, UtilityModule, WatchEntry, WatchHandler,
};
use source_text::CodeBuilder;

/// Suffix of the local name a helper module is imported under.
pub const MODULE_SUFFIX: &str = "Module";

/// Render a component description as a module with an `export default`
/// options object.
pub fn generate_component(desc: &ComponentDescription) -> String {
    let mut builder = CodeBuilder::new();

    for import in &desc.imports {
        builder.lines(import);
    }
    for binding in &desc.module_bindings {
        builder.line(&format!(
            "import {}{MODULE_SUFFIX} from '{}';",
            binding.name, binding.from
        ));
    }
    if !desc.imports.is_empty() || !desc.module_bindings.is_empty() {
        builder.newline();
    }

    for item in &desc.preamble {
        builder.lines(item);
        builder.newline();
    }

    builder.line("export default {");
    builder.indent();

    if !desc.props.is_empty() {
        builder.line("props: {");
        builder.indent();
        for (name, prop) in &desc.props {
            builder.line(&format!("{}: {},", object_key(name), prop_object(prop)));
        }
        builder.dedent();
        builder.line("},");
        builder.newline();
    }

    generate_data(&mut builder, desc);

    if !desc.life_cycles.is_empty() {
        for hook in desc.life_cycles.values() {
            generate_method(&mut builder, hook);
        }
        builder.newline();
    }

    builder.line("methods: {");
    builder.indent();
    builder.lines(SET_DATA_HELPER);
    for method in desc.methods.values() {
        generate_method(&mut builder, method);
    }
    builder.dedent();
    builder.line("},");

    if !desc.watch.is_empty() {
        builder.newline();
        builder.line("watch: {");
        builder.indent();
        for (key, entry) in &desc.watch {
            generate_watch(&mut builder, key, entry);
        }
        builder.dedent();
        builder.line("},");
    }

    builder.dedent();
    builder.line("};");
    builder.finish()
}

fn prop_object(prop: &PropDefinition) -> String {
    let mut parts = Vec::new();
    if let Some(type_name) = &prop.type_name {
        parts.push(format!("type: {type_name}"));
    }
    if let Some(default) = &prop.default {
        parts.push(format!("default: {default}"));
    }
    if parts.is_empty() {
        parts.push("default: null".to_string());
    }
    format!("{{ {} }}", parts.join(", "))
}

fn generate_data(builder: &mut CodeBuilder, desc: &ComponentDescription) {
    builder.line("data() {");
    builder.indent();
    builder.line("return {");
    builder.indent();
    for (key, value) in &desc.data {
        let json = serde_json::to_string(value).unwrap_or_else(|_| "null".to_string());
        builder.line(&format!("{}: {json},", object_key(key)));
    }
    for binding in &desc.module_bindings {
        builder.line(&format!(
            "{}: {}{MODULE_SUFFIX},",
            object_key(&binding.name),
            binding.name
        ));
    }
    builder.dedent();
    builder.line("};");
    builder.dedent();
    builder.line("},");
    builder.newline();
}

fn generate_method(builder: &mut CodeBuilder, method: &MethodSource) {
    let signature = MethodSource {
        name: object_key(&method.name),
        ..method.clone()
    }
    .signature();
    if method.body.is_empty() {
        builder.line(&format!("{signature} {{}},"));
        return;
    }
    builder.line(&format!("{signature} {{"));
    builder.indent();
    for line in &method.body {
        builder.line(line);
    }
    builder.dedent();
    builder.line("},");
}

fn generate_watch(builder: &mut CodeBuilder, key: &str, entry: &WatchEntry) {
    match &entry.handler {
        WatchHandler::Method(method) if !entry.deep => generate_method(builder, method),
        handler => {
            builder.line(&format!("{}: {{", object_key(key)));
            builder.indent();
            match handler {
                WatchHandler::Method(method) => generate_method(
                    builder,
                    &MethodSource {
                        name: "handler".to_string(),
                        ..method.clone()
                    },
                ),
                WatchHandler::Placeholder { paths } => {
                    builder.line("handler(newVal, oldVal) {");
                    builder.indent();
                    for path in paths {
                        builder.line(&format!("// observer `{path}` was not converted"));
                    }
                    builder.dedent();
                    builder.line("},");
                }
            }
            builder.line("deep: true,");
            builder.dedent();
            builder.line("},");
        }
    }
}

/// Render a utility module, separating items with blank lines.
pub fn generate_utility(module: &UtilityModule) -> String {
    let mut code = module.items.join("\n\n");
    code.push('\n');
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use axml_transformer::ModuleBinding;
    use pretty_assertions::assert_eq;
    use script_parser::literal::literal_to_json;
    use script_parser::structure::{object_entries, returned_object};
    use script_parser::{parse_script, ScriptKind};
    use script_transformer::{transform_script, transform_utility_module};
    use swc_ecma_ast::{Expr, ModuleDecl, ModuleItem, Prop, PropOrSpread};

    fn component(source: &str, bindings: &[ModuleBinding]) -> String {
        let ast = parse_script(source, ScriptKind::JavaScript).unwrap();
        generate_component(&transform_script(&ast, bindings).unwrap())
    }

    #[test]
    fn test_scenario_b_output() {
        let output = component(
            r#"import util from './util.js';
Page({
  data: { x: 1 },
  onLoad(query) {
    this.setData({ x: this.data.x + 1 });
  },
  methods: {
    foo() {},
  },
});"#,
            &[],
        );
        assert_eq!(
            output,
            r#"import util from './util';

export default {
  data() {
    return {
      x: 1,
    };
  },

  created(query) {
    this.setData({ x: this.x + 1 });
  },

  methods: {
    setData(data, callback) {
      for (const key in data) {
        this[key] = data[key];
      }
      if (typeof callback === 'function') {
        this.$nextTick(callback);
      }
    },
    foo() {},
  },
};
"#
        );
    }

    #[test]
    fn test_scenario_c_module_binding_in_data() {
        let binding = ModuleBinding {
            from: "./a.sjs".to_string(),
            name: "b".to_string(),
        };
        let output = component("Page({ data: { n: 0 } });", &[binding]);
        assert!(output.starts_with("import bModule from './a.sjs';\n"));
        assert!(output.contains("      n: 0,\n      b: bModule,\n"));
    }

    #[test]
    fn test_props_and_watch() {
        let output = component(
            r#"Component({
  props: { title: String, size: 2, cb: () => {} },
  observers: {
    title(v) { this.t = v; },
    'user.name': function () {},
  },
});"#,
            &[],
        );
        assert!(output.contains(
            "  props: {\n    title: { type: String },\n    size: { type: Number, default: 2 },\n    cb: { default: null },\n  },\n"
        ));
        assert!(output.contains(
            r#"  watch: {
    title(v) {
      this.t = v;
    },
    user: {
      handler(newVal, oldVal) {
        // observer `user.name` was not converted
      },
      deep: true,
    },
  },
};
"#
        ));
    }

    #[test]
    fn test_multiline_template_literal_untouched() {
        let output = component(
            "Page({\n  methods: {\n    banner() {\n      return `\n  Total:\n    ${this.data.total}\n`;\n    },\n  },\n});",
            &[],
        );
        assert!(
            output.contains("    banner() {\n      return `\n  Total:\n    ${this.total}\n`;\n    },\n"),
            "{output}"
        );
    }

    #[test]
    fn test_preamble_kept() {
        let output = component("const app = getApp();\nPage({});", &[]);
        assert!(output.starts_with("const app = getApp();\n\nexport default {\n"));
    }

    #[test]
    fn test_data_round_trip() {
        let source = r#"Page({
  data: {
    title: 'Hello "world"',
    count: 3,
    ratio: 0.5,
    ok: true,
    missing: null,
    list: [1, 'two', { three: 3 }],
    nested: { a: { b: [] } },
  },
});"#;
        let ast = parse_script(source, ScriptKind::JavaScript).unwrap();
        let description = transform_script(&ast, &[]).unwrap();
        let output = generate_component(&description);

        let regenerated = parse_script(&output, ScriptKind::JavaScript).unwrap();
        let object = regenerated
            .module()
            .body
            .iter()
            .find_map(|item| match item {
                ModuleItem::ModuleDecl(ModuleDecl::ExportDefaultExpr(export)) => {
                    match &*export.expr {
                        Expr::Object(object) => Some(object),
                        _ => None,
                    }
                }
                _ => None,
            })
            .expect("export default object");
        let data_fn = object
            .props
            .iter()
            .find_map(|prop| match prop {
                PropOrSpread::Prop(prop) => match &**prop {
                    Prop::Method(method) => Some(method),
                    _ => None,
                },
                _ => None,
            })
            .expect("data method");
        let returned = data_fn
            .function
            .body
            .as_ref()
            .and_then(returned_object)
            .expect("returned object");

        let round_trip: serde_json::Map<String, serde_json::Value> = object_entries(&regenerated, returned)
            .into_iter()
            .map(|(key, (value, exact, _))| {
                assert!(exact, "{key} should be literal");
                (key, value)
            })
            .collect();
        let original: serde_json::Map<String, serde_json::Value> =
            description.data.clone().into_iter().collect();
        assert_eq!(round_trip, original);

        assert_eq!(
            literal_to_json(&Expr::Object(returned.clone())).value,
            serde_json::Value::Object(original)
        );
    }

    #[test]
    fn test_scenario_d_utility() {
        let ast = parse_script(
            "export const add = (a, b) => a + b;\nexport const noop = () => {};",
            ScriptKind::JavaScript,
        )
        .unwrap();
        let module = transform_utility_module(&ast).unwrap();
        assert_eq!(
            generate_utility(&module),
            "export const add = (a, b) => {\n  return a + b;\n};\n\nexport const noop = () => {};\n"
        );
    }
}
