//! Script transformation.
//!
//! Turns the structure extracted from a `Page({...})` or `Component({...})`
//! call into a [`ComponentDescription`] shaped like a Vue options object.
//! Module bindings found by the markup pass are threaded in by the caller.
//!
//! Scripts without a declaration call that consist only of exports and
//! declarations go through [`transform_utility_module`] instead.

pub mod body;
pub mod component;
pub mod description;
pub mod imports;
pub mod utility;

pub use component::{map_lifecycle, transform_script, LIFECYCLE_MAP};
pub use description::*;
pub use utility::transform_utility_module;
