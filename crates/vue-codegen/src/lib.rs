//! Vue output generation.
//!
//! Serializes the template tree from `axml-transformer` into a `.vue`
//! single-file component, and a [`ComponentDescription`] from
//! `script-transformer` into the sibling script module the component
//! imports. No conversion decisions are made here.
//!
//! [`ComponentDescription`]: script_transformer::ComponentDescription

pub mod helpers;
pub mod script;
pub mod template;

pub use helpers::{DECLARE_DTS, DECLARE_DTS_FILE, STYLE_PLACEHOLDER};
pub use script::{generate_component, generate_utility};
pub use template::{generate_template, generate_vue_file};
