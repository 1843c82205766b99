//! Find data files and resolve their declared format.
//!
//! File names follow `<format>[.<anything>]_<anything>.txt`:
//!
//! ```text
//! testformat1_2015-06-28.txt        => format "testformat1"
//! testformat1.v2_2015-06-28.txt     => format "testformat1"
//! testformat1_2015_06_28.txt        => rejected (more than one '_')
//! ```

use crate::data::DataFile;
use crate::dir;
use crate::error::LocateError;
use crate::spec::SpecCatalog;

use std::path::Path;
use tracing::{info, warn};

pub const DATA_EXTENSION: &str = "txt";
const NAME_SEPARATOR: char = '_';

/// Names derived from a data file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileName {
    /// Catalog key.
    pub format: String,
    pub logical: String,
}

/// Split a data file name into its format selector.
pub fn parse_file_name(name: &str) -> Result<FileName, LocateError> {
    let parts: Vec<&str> = name.split(NAME_SEPARATOR).collect();
    if parts.len() != 2 {
        return Err(LocateError::UnrecognizedFilenameFormat {
            name: name.to_string(),
        });
    }

    // split always yields at least one item.
    let selector = parts[0].split('.').next().unwrap_or_default();
    Ok(FileName {
        format: selector.to_string(),
        logical: selector.to_string(),
    })
}

/// Find every `*.txt` data file in `root` whose format is in `catalog`.
///
/// Only an unreadable `root` is an error. Files with a bad name or an unknown
/// format are logged and left out.
pub fn find_all<'c>(catalog: &'c SpecCatalog, root: &Path) -> Result<Vec<DataFile<'c>>, LocateError> {
    let paths =
        dir::candidate_files(root, DATA_EXTENSION, "data").map_err(|source| LocateError::Io {
            path: root.to_path_buf(),
            source,
        })?;

    let mut out = Vec::new();
    for path in paths {
        info!("opening data file: {}", path.display());
        match bind(catalog, &path) {
            Ok(df) => out.push(df),
            Err(e) => warn!("skipping {}: {}", path.display(), e),
        }
    }

    Ok(out)
}

fn bind<'c>(catalog: &'c SpecCatalog, path: &Path) -> Result<DataFile<'c>, LocateError> {
    let FileName { format, logical } = parse_file_name(&dir::file_name(path))?;
    let spec = catalog
        .get(&format)
        .ok_or_else(|| LocateError::UnrecognizedFormat {
            format: format.clone(),
        })?;

    Ok(DataFile {
        name: logical,
        format,
        path: path.to_path_buf(),
        spec,
    })
}
