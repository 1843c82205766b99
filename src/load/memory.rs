//! Recording sink for tests.

use crate::decode::Value;
use crate::error::SinkError;
use crate::load::sink::{PreparedInsert, Sink};

use std::cell::{Cell, RefCell};

#[derive(Default)]
pub struct MemorySink {
    pub ddl: RefCell<Vec<String>>,
    /// (insert statement, values) per executed row.
    pub rows: RefCell<Vec<(String, Vec<Value>)>>,
    pub closed: Cell<usize>,
    /// Fail the execute that would record the n-th row (0-based, across files).
    pub fail_at_row: Option<usize>,
    pub fail_prepare: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn row_count(&self) -> usize {
        self.rows.borrow().len()
    }
}

impl Sink for MemorySink {
    fn execute(&self, ddl: &str) -> Result<(), SinkError> {
        self.ddl.borrow_mut().push(ddl.to_string());
        Ok(())
    }

    fn prepare<'s>(&'s self, dml: &str) -> Result<Box<dyn PreparedInsert + 's>, SinkError> {
        if self.fail_prepare {
            return Err(refused("prepare"));
        }
        Ok(Box::new(MemoryInsert {
            sink: self,
            dml: dml.to_string(),
        }))
    }
}

struct MemoryInsert<'s> {
    sink: &'s MemorySink,
    dml: String,
}

impl PreparedInsert for MemoryInsert<'_> {
    fn execute(&mut self, values: &[Value]) -> Result<(), SinkError> {
        if self.sink.fail_at_row == Some(self.sink.row_count()) {
            return Err(refused("execute"));
        }
        self.sink
            .rows
            .borrow_mut()
            .push((self.dml.clone(), values.to_vec()));
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<(), SinkError> {
        self.sink.closed.set(self.sink.closed.get() + 1);
        Ok(())
    }
}

fn refused(op: &str) -> SinkError {
    SinkError {
        message: format!("{} refused", op),
        source: None,
    }
}
