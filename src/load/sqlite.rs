//! SQLite-backed sink.

use crate::decode::Value;
use crate::error::SinkError;
use crate::load::sink::{PreparedInsert, Sink};
use crate::render::quote_ident;

use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};
use rusqlite::{Connection, Statement, params_from_iter};
use std::path::Path;

pub struct SqliteSink {
    conn: Connection,
}

impl SqliteSink {
    pub fn open(path: &Path) -> Result<Self, SinkError> {
        let conn = Connection::open(path).map_err(|e| {
            SinkError::with_source(format!("open database {}", path.display()), e)
        })?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, SinkError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| SinkError::with_source("open in-memory database", e))?;
        Ok(Self { conn })
    }

    #[cfg(test)]
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Number of rows currently in `table`.
    pub fn row_count(&self, table: &str) -> Result<u64, SinkError> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(table));
        let n: i64 = self
            .conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(|e| SinkError::with_source(format!("count rows in {}", table), e))?;
        Ok(n as u64)
    }
}

impl Sink for SqliteSink {
    fn execute(&self, ddl: &str) -> Result<(), SinkError> {
        self.conn
            .execute_batch(ddl)
            .map_err(|e| SinkError::with_source("execute statement", e))
    }

    fn prepare<'s>(&'s self, dml: &str) -> Result<Box<dyn PreparedInsert + 's>, SinkError> {
        let stmt = self
            .conn
            .prepare(dml)
            .map_err(|e| SinkError::with_source(format!("prepare {:?}", dml), e))?;
        Ok(Box::new(SqliteInsert { stmt }))
    }
}

struct SqliteInsert<'c> {
    stmt: Statement<'c>,
}

impl PreparedInsert for SqliteInsert<'_> {
    fn execute(&mut self, values: &[Value]) -> Result<(), SinkError> {
        self.stmt
            .execute(params_from_iter(values.iter()))
            .map(|_| ())
            .map_err(|e| SinkError::with_source("execute insert", e))
    }

    fn close(self: Box<Self>) -> Result<(), SinkError> {
        self.stmt
            .finalize()
            .map_err(|e| SinkError::with_source("finalize insert", e))
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Value::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            Value::Integer(i) => ToSqlOutput::Owned(SqlValue::Integer(*i)),
        })
    }
}
