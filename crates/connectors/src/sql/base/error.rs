use thiserror::Error;

/// All errors coming from the database/query layer.
#[derive(Debug, Error)]
pub enum DbError {
    /// Any MySQL driver error raised while querying.
    #[error("MySQL error: {0}")]
    MySql(#[from] mysql_async::Error),

    /// A column could not be converted into the expected Rust type.
    #[error("Failed to decode column '{column}': {message}")]
    Decode { column: String, message: String },

    /// A table or column name that cannot be safely quoted into SQL.
    #[error("Invalid identifier: '{0}'")]
    InvalidIdentifier(String),

    /// The source was already closed and will not reconnect.
    #[error("Connection is closed")]
    Closed,
}

/// Errors happening during connection setup.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The driver failed to open the connection.
    #[error("MySQL connection failed: {0}")]
    MySql(#[from] mysql_async::Error),

    /// The server answered the liveness check with something unexpected.
    #[error("Connection check failed: {0}")]
    Ping(String),
}
