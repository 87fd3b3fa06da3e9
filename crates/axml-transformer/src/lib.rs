//! AXML to Vue template transformation.
//!
//! Walks a parsed markup tree and produces a Vue template tree:
//! - tags are renamed through a fixed table;
//! - `on*`/`catch*` attributes become `@event` handlers;
//! - `a:` directives become `v-*` directives;
//! - mustache attribute values become bindings.
//!
//! `import-sjs` elements are collected as [`ModuleBinding`]s and returned
//! alongside the template, for the sibling script to pick up.

pub mod ast;
pub mod classify;
pub mod tables;
pub mod transform;

pub use ast::*;
pub use transform::{transform, ModuleBinding, TransformContext, TransformOutput};
