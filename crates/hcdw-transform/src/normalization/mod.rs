//! Normalization functions for single raw column values.
//!
//! - **text**: free-text cleanup and title casing
//! - **gender**: categorical gender normalization
//! - **numeric**: integer key and billing amount coercion
//! - **date**: lenient calendar date parsing
//!
//! Every function takes the raw cell as `Option<&str>` (absent when the column
//! is missing or the cell is blank) and signals failure with `None`.

pub mod date;
pub mod gender;
pub mod numeric;
pub mod text;

// Re-export commonly used items
pub use date::parse_date;
pub use gender::normalize_gender;
pub use numeric::{coerce_amount, coerce_integer};
pub use text::{expand_department, normalize_optional_text, normalize_text};
