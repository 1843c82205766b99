//! Spec files and the catalog built from them.
//!
//! A spec file is CSV with a header row. Columns are looked up by header name,
//! so they may appear in any order:
//!
//! ```text
//! "column name",width,datatype
//! name,10,TEXT
//! valid,1,BOOLEAN
//! count,3,INTEGER
//! ```
//!
//! The spec name is the file name minus its final extension
//! (`testformat1.csv` => `testformat1`).

use crate::dir;
use crate::error::SpecError;
use crate::spec::column::UnknownDatatype;
use crate::spec::{Column, Datatype, Spec};

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

pub const SPEC_EXTENSION: &str = "csv";

/// One spec record as it appears in the file. Values stay raw so each can be
/// validated with a precise error.
#[derive(Debug, Deserialize)]
struct ColumnRecord {
    #[serde(rename = "column name")]
    name: String,
    width: String,
    datatype: String,
}

/// Name-keyed set of loaded specs. Passed explicitly to whoever needs lookups.
#[derive(Debug, Clone, Default)]
pub struct SpecCatalog {
    specs: BTreeMap<String, Spec>,
}

impl SpecCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a spec, returning the one it replaced. Last insert wins.
    pub fn insert(&mut self, spec: Spec) -> Option<Spec> {
        self.specs.insert(spec.name.clone(), spec)
    }

    pub fn get(&self, name: &str) -> Option<&Spec> {
        self.specs.get(name)
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    /// Specs in name order.
    pub fn iter(&self) -> impl Iterator<Item = &Spec> {
        self.specs.values()
    }
}

impl FromIterator<Spec> for SpecCatalog {
    fn from_iter<I: IntoIterator<Item = Spec>>(iter: I) -> Self {
        let mut catalog = SpecCatalog::new();
        for spec in iter {
            catalog.insert(spec);
        }
        catalog
    }
}

/// Load every `*.csv` spec in `root`.
///
/// Only an unreadable `root` is an error. A spec that fails to load is logged
/// and left out; the rest still load.
pub fn load_all(root: &Path) -> Result<SpecCatalog, SpecError> {
    let paths =
        dir::candidate_files(root, SPEC_EXTENSION, "spec").map_err(|source| SpecError::Io {
            path: root.to_path_buf(),
            source,
        })?;

    let mut catalog = SpecCatalog::new();
    for path in paths {
        info!("loading spec: {}", path.display());
        let spec = match load_one(&path) {
            Ok(spec) => spec,
            Err(e) => {
                warn!("couldn't read {}: {}", path.display(), e);
                continue;
            }
        };
        if let Some(prev) = catalog.insert(spec) {
            warn!("spec {:?} from {} replaces an earlier definition", prev.name, path.display());
        }
    }

    Ok(catalog)
}

/// Load a single spec file.
pub fn load_one(path: &Path) -> Result<Spec, SpecError> {
    let name = strip_extension(&dir::file_name(path)).to_string();

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(|e| csv_error(path, e))?;

    let headers = reader.headers().map_err(|e| csv_error(path, e))?.clone();
    if headers.is_empty() {
        return Err(malformed(path, 1, "missing header row"));
    }

    let mut columns = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(path, e))?;
        let line = record.position().map_or(0, |p| p.line());

        let raw: ColumnRecord = record
            .deserialize(Some(&headers))
            .map_err(|e| malformed(path, line, deserialize_reason(&e)))?;
        columns.push(parse_column(path, line, raw)?);
    }

    if columns.is_empty() {
        return Err(malformed(path, 1, "no columns defined"));
    }

    let spec = Spec::new(name, columns);
    debug!(
        "spec {:?}: {} columns, {} characters per line",
        spec.name,
        spec.columns.len(),
        spec.width()
    );
    Ok(spec)
}

fn parse_column(path: &Path, line: u64, raw: ColumnRecord) -> Result<Column, SpecError> {
    let width: usize = raw
        .width
        .parse()
        .map_err(|_| malformed(path, line, format!("width {:?} is not an integer", raw.width)))?;
    if width == 0 {
        return Err(malformed(path, line, "width must be positive"));
    }

    let datatype = raw
        .datatype
        .parse::<Datatype>()
        .map_err(|UnknownDatatype(token)| SpecError::UnknownDatatype {
            path: path.to_path_buf(),
            line,
            token,
        })?;

    Ok(Column::new(raw.name, width, datatype))
}

/// Strip the final `.`-delimited segment of `name`.
///
/// `"baz.biz.csv"` => `"baz.biz"`, `"foo"` => `"foo"`.
pub fn strip_extension(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) => &name[..idx],
        None => name,
    }
}

fn malformed(path: &Path, line: u64, reason: impl Into<String>) -> SpecError {
    SpecError::MalformedSpec {
        path: path.to_path_buf(),
        line,
        reason: reason.into(),
    }
}

fn deserialize_reason(err: &csv::Error) -> String {
    match err.kind() {
        csv::ErrorKind::Deserialize { err, .. } => err.to_string(),
        _ => err.to_string(),
    }
}

fn csv_error(path: &Path, err: csv::Error) -> SpecError {
    let line = err.position().map_or(0, |p| p.line());
    if let csv::ErrorKind::UnequalLengths {
        expected_len, len, ..
    } = err.kind()
    {
        return malformed(
            path,
            line,
            format!("record has {} fields, header has {}", len, expected_len),
        );
    }

    let reason = err.to_string();
    match err.into_kind() {
        csv::ErrorKind::Io(source) => SpecError::Io {
            path: path.to_path_buf(),
            source,
        },
        _ => malformed(path, line, reason),
    }
}
