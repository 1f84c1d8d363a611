use connectors::sql::base::error::{ConnectorError, DbError};
use engine_core::error::ConfigError;
use engine_processing::error::PollError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid table reference: {0}")]
    Table(#[from] DbError),

    #[error("Failed to connect to the database: {0}")]
    Connect(#[from] ConnectorError),

    #[error("Polling failed: {0}")]
    Poll(#[from] PollError),
}
