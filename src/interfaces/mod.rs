//! Inbound and outbound wire formats: the CSV action submitter and the JSON
//! lines event sink.

pub mod csv;
pub mod json;
