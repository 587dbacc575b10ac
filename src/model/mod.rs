//! Core data model types: the parsed email record and the index mapping.

pub mod email;
pub mod schema;

pub use email::EmailRecord;
pub use schema::IndexMapping;
