use crate::decode::Value;
use crate::error::SinkError;

/// A relational store that can run DDL and prepared inserts.
///
/// Calls come from one thread at a time; at most one insert executes at once.
pub trait Sink {
    /// Run a schema statement such as `CREATE TABLE`.
    fn execute(&self, ddl: &str) -> Result<(), SinkError>;

    /// Prepare a positional insert. The handle borrows the sink.
    fn prepare<'s>(&'s self, dml: &str) -> Result<Box<dyn PreparedInsert + 's>, SinkError>;
}

pub trait PreparedInsert {
    /// Execute once with `values` bound positionally.
    fn execute(&mut self, values: &[Value]) -> Result<(), SinkError>;

    fn close(self: Box<Self>) -> Result<(), SinkError>;
}
