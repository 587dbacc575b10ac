//! Email parsing: line-based header extraction, date layouts, and record construction.

pub mod email;
pub mod header;

pub use email::parse_email;
pub use header::{extract_header, parse_date};
