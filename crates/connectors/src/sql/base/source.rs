use crate::sql::base::{error::DbError, requests::FetchRequest};
use async_trait::async_trait;
use model::records::row::Row;

/// A read-only view of an append-only table, keyed by a monotonically
/// increasing id.
#[async_trait]
pub trait RowSource: Send {
    /// Returns up to `request.limit` rows ordered by id descending.
    async fn fetch(&mut self, request: FetchRequest) -> Result<Vec<Row>, DbError>;

    /// Releases the underlying connection. Further fetches fail with
    /// [`DbError::Closed`].
    async fn close(&mut self) -> Result<(), DbError>;
}
