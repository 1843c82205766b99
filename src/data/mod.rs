//! Data files: locating them on disk and binding them to their spec.

pub mod file;
pub mod locate;

pub use file::DataFile;
pub use locate::find_all;
