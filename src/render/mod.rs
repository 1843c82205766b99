//! SQL rendering from specs.

pub mod sql;

pub use sql::{create_table_sql, insert_sql, quote_ident};
