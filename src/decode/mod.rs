//! Fixed-width decoding of data files into typed rows.

pub mod decoder;
pub mod row;
pub mod stream;

pub use decoder::RowDecoder;
pub use row::{FieldPolicy, Value};
pub use stream::RowStream;
