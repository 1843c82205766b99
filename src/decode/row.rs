/// A decoded field. Booleans are carried as `Integer` 0/1, matching the
/// `INTEGER` column they load into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Integer(i64),
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

/// One decoded line: a value per spec column, in column order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based line number in the source file.
    pub line: u64,
    pub values: Vec<Value>,
}

/// What to do with a numeric field that does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FieldPolicy {
    /// Log a warning and load 0 in its place.
    #[default]
    Substitute,
    /// Fail the file.
    Reject,
}
