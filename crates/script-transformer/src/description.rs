//! The component description handed to the generator.

use axml_transformer::ModuleBinding;
use convert_diagnostics::Diagnostic;
use indexmap::IndexMap;
use script_parser::DeclarationKind;
use serde_json::Value;

/// A method rebuilt from its original source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSource {
    /// Method name in the generated object.
    pub name: String,
    pub is_async: bool,
    pub is_generator: bool,
    /// Parameter source text, in order.
    pub params: Vec<String>,
    /// Body lines, dedented to column zero.
    pub body: Vec<String>,
}

impl MethodSource {
    /// The method head, e.g. `async load(id)`.
    pub fn signature(&self) -> String {
        let mut head = String::new();
        if self.is_async {
            head.push_str("async ");
        }
        if self.is_generator {
            head.push('*');
        }
        head.push_str(&self.name);
        head.push('(');
        head.push_str(&self.params.join(", "));
        head.push(')');
        head
    }
}

/// One entry of `props`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropDefinition {
    /// Constructor expression such as `String` or `[String, Number]`.
    pub type_name: Option<String>,
    /// Default value source text.
    pub default: Option<String>,
}

/// The handler side of a `watch` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchHandler {
    /// A handler rebuilt from a single-field observer.
    Method(MethodSource),
    /// A handler standing in for observers of nested paths.
    Placeholder {
        /// Original observer paths collapsed into this entry.
        paths: Vec<String>,
    },
}

/// One entry of `watch`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WatchEntry {
    pub handler: WatchHandler,
    pub deep: bool,
}

/// Everything the script generator needs for one component file.
#[derive(Debug, Clone)]
pub struct ComponentDescription {
    /// Which declaration call the source used.
    pub kind: DeclarationKind,
    /// Import statements, retargeted.
    pub imports: Vec<String>,
    /// Other top-level statements, kept verbatim.
    pub preamble: Vec<String>,
    pub data: IndexMap<String, Value>,
    pub methods: IndexMap<String, MethodSource>,
    /// Reserved; never populated.
    pub computed: IndexMap<String, MethodSource>,
    pub props: IndexMap<String, PropDefinition>,
    pub watch: IndexMap<String, WatchEntry>,
    /// Hooks under their target names.
    pub life_cycles: IndexMap<String, MethodSource>,
    /// Helper modules imported by the sibling markup file.
    pub module_bindings: Vec<ModuleBinding>,
    pub diagnostics: Vec<Diagnostic>,
}

/// A script with no declaration call, made only of exports and declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UtilityModule {
    /// Top-level items in source order, each possibly spanning several lines.
    pub items: Vec<String>,
}
