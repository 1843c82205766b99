//! Loading decoded rows into a relational sink.

#[cfg(test)]
pub mod memory;
pub mod pipeline;
pub mod sink;
pub mod sqlite;

pub use pipeline::{create_tables, load};
pub use sqlite::SqliteSink;
