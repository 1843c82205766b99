//! Error types for each stage of the load.
//!
//! Recoverable conditions (a bad spec file, an unrecognized data file name) are
//! still modelled here so the caller can log them uniformly before skipping.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures while reading a format definition.
#[derive(Debug, Error)]
pub enum SpecError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed spec {path} (line {line}): {reason}")]
    MalformedSpec {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("unknown datatype {token:?} in {path} (line {line})")]
    UnknownDatatype {
        path: PathBuf,
        line: u64,
        token: String,
    },
}

/// Failures while binding data files to specs.
#[derive(Debug, Error)]
pub enum LocateError {
    #[error("I/O error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("unrecognized data file name format: {name}")]
    UnrecognizedFilenameFormat { name: String },

    #[error("unrecognized format: {format:?}")]
    UnrecognizedFormat { format: String },
}

/// Failures while decoding a fixed-width data file. All of these end the
/// decode of the current file.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("read fault at line {line}: {source}")]
    Io {
        line: u64,
        #[source]
        source: io::Error,
    },

    #[error("line {line} too short for column {column:?}: need {needed} characters, have {actual}")]
    RowTooShort {
        line: u64,
        column: String,
        needed: usize,
        actual: usize,
    },

    #[error("line {line}: column {column:?} expected an integer, got {raw:?}")]
    InvalidField {
        line: u64,
        column: String,
        raw: String,
    },
}

/// Failure reported by the persistence sink.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct SinkError {
    pub message: String,
    #[source]
    pub source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl SinkError {
    pub fn with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Failures that abort loading a single data file (or, for table creation,
/// the whole run).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("create table {table}: {source}")]
    CreateTable {
        table: String,
        #[source]
        source: SinkError,
    },

    #[error("prepare insert for {table}: {source}")]
    Prepare {
        table: String,
        #[source]
        source: SinkError,
    },

    #[error("insert into {table} (line {line}, after {loaded} rows): {source}")]
    Execute {
        table: String,
        line: u64,
        loaded: u64,
        #[source]
        source: SinkError,
    },

    #[error("decode {path} (after {loaded} rows): {source}")]
    Decode {
        path: PathBuf,
        loaded: u64,
        #[source]
        source: DecodeError,
    },

    #[error("close insert for {table}: {source}")]
    Close {
        table: String,
        #[source]
        source: SinkError,
    },

    #[error("open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("decoder thread for {path} panicked")]
    ProducerPanicked { path: PathBuf },
}

impl LoadError {
    /// Rows already executed against the sink when the error occurred. Those
    /// rows stay committed.
    pub fn rows_loaded(&self) -> u64 {
        match self {
            LoadError::Execute { loaded, .. } | LoadError::Decode { loaded, .. } => *loaded,
            _ => 0,
        }
    }
}
