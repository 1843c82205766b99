//! Spec layer: fixed-width column layouts and the catalog that holds them.
//!
//! This module is intentionally separate from decoding and SQL rendering.
//! It owns:
//! - Column/Spec types (what a line looks like)
//! - Spec file loading (CSV definitions on disk)

pub mod catalog;
pub mod column;

pub use catalog::{SpecCatalog, load_all};
pub use column::{Column, Datatype, Spec};
