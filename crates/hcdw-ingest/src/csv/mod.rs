//! CSV reading utilities.

mod reader;

pub use reader::read_raw_table;
