//! Drive decoded rows into a sink: one insert execution per row.
//!
//! Files are loaded one after another. Within a file the decoder runs on its
//! own thread (see `RowStream`) while this thread executes inserts. There is
//! no transaction around a file: rows executed before a failure stay loaded.

use crate::data::DataFile;
use crate::decode::{FieldPolicy, RowDecoder, RowStream};
use crate::error::LoadError;
use crate::load::sink::{PreparedInsert, Sink};
use crate::render::{create_table_sql, insert_sql};
use crate::spec::SpecCatalog;

use serde::Serialize;
use std::thread;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadSummary {
    pub loaded: Vec<FileReport>,
    pub failed: Vec<FileFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub file: String,
    pub table: String,
    pub rows: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    pub file: String,
    pub table: String,
    /// Rows loaded before the failure.
    pub rows: u64,
    pub error: String,
}

impl LoadSummary {
    pub fn total_rows(&self) -> u64 {
        self.loaded.iter().map(|f| f.rows).sum::<u64>() + self.failed.iter().map(|f| f.rows).sum::<u64>()
    }
}

/// Create a table for every spec in the catalog, named after the spec.
pub fn create_tables<S: Sink + ?Sized>(sink: &S, catalog: &SpecCatalog) -> Result<usize, LoadError> {
    for spec in catalog.iter() {
        info!("creating table {:?}", spec.name);
        sink.execute(&create_table_sql(&spec.name, spec))
            .map_err(|source| LoadError::CreateTable {
                table: spec.name.clone(),
                source,
            })?;
    }
    Ok(catalog.len())
}

/// Load every file, continuing past files that fail.
pub fn load<S: Sink + ?Sized>(sink: &S, files: &[DataFile<'_>], policy: FieldPolicy) -> LoadSummary {
    let mut summary = LoadSummary::default();
    for df in files {
        let file = df.path().display().to_string();
        match load_file(sink, df, policy) {
            Ok(rows) => {
                info!("loaded {} rows from {} into {:?}", rows, file, df.table());
                summary.loaded.push(FileReport {
                    file,
                    table: df.table().to_string(),
                    rows,
                });
            }
            Err(e) => {
                error!("failed to load {}: {}", file, e);
                summary.failed.push(FileFailure {
                    file,
                    table: df.table().to_string(),
                    rows: e.rows_loaded(),
                    error: e.to_string(),
                });
            }
        }
    }
    summary
}

/// Load one file into the table named after its spec. Returns rows loaded.
///
/// The first prepare, decode or execute failure ends the file.
pub fn load_file<S: Sink + ?Sized>(sink: &S, df: &DataFile<'_>, policy: FieldPolicy) -> Result<u64, LoadError> {
    let table = df.table();
    let dml = insert_sql(table, df.spec);
    debug!("{}: {}", df.name, dml);

    let mut insert = sink.prepare(&dml).map_err(|source| LoadError::Prepare {
        table: table.to_string(),
        source,
    })?;

    let outcome = RowDecoder::open(df, policy)
        .map_err(|source| LoadError::Open {
            path: df.path.clone(),
            source,
        })
        .and_then(|decoder| {
            thread::scope(|scope| {
                let mut rows = RowStream::spawn(scope, decoder);
                let drained = drain(&mut rows, insert.as_mut(), df);
                match rows.finish() {
                    Ok(()) => drained,
                    Err(_) => Err(LoadError::ProducerPanicked {
                        path: df.path.clone(),
                    }),
                }
            })
        });

    match (outcome, insert.close()) {
        (Ok(n), Ok(())) => Ok(n),
        (Ok(_), Err(source)) => Err(LoadError::Close {
            table: table.to_string(),
            source,
        }),
        (Err(e), close) => {
            if let Err(ce) = close {
                warn!("closing insert for {:?} after failure: {}", table, ce);
            }
            Err(e)
        }
    }
}

fn drain(rows: &mut RowStream<'_>, insert: &mut dyn PreparedInsert, df: &DataFile<'_>) -> Result<u64, LoadError> {
    let mut loaded = 0u64;
    for item in rows {
        let row = item.map_err(|source| LoadError::Decode {
            path: df.path.clone(),
            loaded,
            source,
        })?;
        insert
            .execute(&row.values)
            .map_err(|source| LoadError::Execute {
                table: df.table().to_string(),
                line: row.line,
                loaded,
                source,
            })?;
        loaded += 1;
    }
    Ok(loaded)
}
