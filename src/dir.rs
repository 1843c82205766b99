//! Directory scanning shared by the spec catalog and the data file locator.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

/// List regular files in `dir` whose extension is `extension`, sorted by name.
///
/// Only an unreadable `dir` is an error. Entries that cannot be inspected are
/// logged as warnings; directories and files with other extensions are
/// logged at info level. Both are left out of the result.
pub fn candidate_files(dir: &Path, extension: &str, kind: &str) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir)? {
        match entry {
            Ok(entry) => paths.push(entry.path()),
            Err(e) => warn!("couldn't read entry in {}: {}", dir.display(), e),
        }
    }
    paths.sort();

    let mut out = Vec::with_capacity(paths.len());
    for path in paths {
        // Follows symlinks, so a link to a data file is loaded like the file.
        let meta = match fs::metadata(&path) {
            Ok(m) => m,
            Err(e) => {
                warn!("couldn't stat {}: {}", path.display(), e);
                continue;
            }
        };
        let matches = path.extension().is_some_and(|ext| ext == extension);
        if !meta.is_file() || !matches {
            info!("skipping unrecognized {} file: {}", kind, path.display());
            continue;
        }
        out.push(path);
    }

    Ok(out)
}

/// Final path component as UTF-8, or the lossy rendering of the whole path.
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
