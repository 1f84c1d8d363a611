use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Polling interval must be a positive number of seconds, got {0}")]
    InvalidInterval(u64),

    #[error("Batch limit must be a positive integer, got {0}")]
    InvalidLimit(usize),
}

#[derive(Error, Debug)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output closed by downstream consumer")]
    Closed,
}
