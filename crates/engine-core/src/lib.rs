pub mod error;
pub mod retry;
pub mod settings;
pub mod sink;
