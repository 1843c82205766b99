//! Column layout types.
//!
//! A `Spec` is an ordered list of fixed-width columns. Column order is the
//! layout: the first column starts at character 0 and each following column
//! starts where the previous one ended.

use std::str::FromStr;

/// Field type of a column. Drives both decode coercion and the SQL column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datatype {
    Text,
    Boolean,
    Integer,
}

impl Datatype {
    /// Boolean and Integer fields are both decoded as signed integers.
    pub fn is_numeric(&self) -> bool {
        matches!(self, Datatype::Boolean | Datatype::Integer)
    }
}

/// Returned when a token is not one of `TEXT`, `BOOLEAN`, `INTEGER`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDatatype(pub String);

impl FromStr for Datatype {
    type Err = UnknownDatatype;

    // Case-sensitive: "text" is not a datatype.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TEXT" => Ok(Datatype::Text),
            "BOOLEAN" => Ok(Datatype::Boolean),
            "INTEGER" => Ok(Datatype::Integer),
            other => Err(UnknownDatatype(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub name: String,
    /// Number of characters the field occupies in a line. Always > 0.
    pub width: usize,
    pub datatype: Datatype,
}

impl Column {
    pub fn new(name: impl Into<String>, width: usize, datatype: Datatype) -> Self {
        Self {
            name: name.into(),
            width,
            datatype,
        }
    }
}

/// A named fixed-width file format. The name doubles as the destination table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spec {
    pub name: String,
    pub columns: Vec<Column>,
}

impl Spec {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self {
            name: name.into(),
            columns,
        }
    }

    /// Total characters a line must have for every column to be read.
    pub fn width(&self) -> usize {
        self.columns.iter().map(|c| c.width).sum()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}
