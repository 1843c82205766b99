use crate::spec::Spec;
use std::path::{Path, PathBuf};

/// A data file bound to the spec that describes its lines.
///
/// Only built by the locator once the format name has resolved, so `spec` is
/// always present. The spec is borrowed from the catalog.
#[derive(Debug, Clone)]
pub struct DataFile<'c> {
    /// Logical name, taken from the file name.
    pub name: String,
    /// Format name the file declares; the catalog key `spec` was found under.
    pub format: String,
    pub path: PathBuf,
    pub spec: &'c Spec,
}

impl<'c> DataFile<'c> {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Destination table for this file's rows.
    pub fn table(&self) -> &str {
        &self.spec.name
    }
}
