//! Mini-program script parser.
//!
//! Scripts are parsed with swc. [`analyze`] then finds the `Page({...})` or
//! `Component({...})` call and sorts its configuration object into data,
//! methods, lifecycle hooks, properties and observers. Function bodies are
//! later rebuilt by slicing the original text through [`ScriptAst::text`],
//! not by re-printing the tree.

pub mod ast;
pub mod error;
pub mod literal;
pub mod structure;

pub use ast::{parse_script, ScriptAst, ScriptKind};
pub use error::{ParseResult, ScriptParseError};
pub use literal::{literal_to_json, LiteralConversion};
pub use structure::{
    analyze, is_lifecycle, DeclarationKind, FunctionBody, FunctionNode, ObserverEntry,
    PropertyEntry, ScriptStructure, UnsupportedKey,
};
