pub mod dialect;
pub mod error;
pub mod query;
pub mod requests;
pub mod source;
pub mod table;
