use connectors::sql::base::error::DbError;
use engine_core::error::SinkError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PollError {
    #[error("Fetch failed at watermark {watermark}: {source}")]
    Fetch {
        watermark: u64,
        #[source]
        source: DbError,
    },

    #[error("Fetch failed at watermark {watermark} after {attempts} attempts: {source}")]
    RetriesExhausted {
        watermark: u64,
        attempts: usize,
        #[source]
        source: DbError,
    },

    #[error("Failed to emit row {id}: {source}")]
    Emit {
        id: u64,
        #[source]
        source: SinkError,
    },
}
