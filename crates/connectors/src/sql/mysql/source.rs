use crate::sql::{
    base::{
        dialect::MySql,
        error::{ConnectorError, DbError},
        query::QueryGenerator,
        requests::FetchRequest,
        source::RowSource,
        table::TableRef,
    },
    mysql::{config::MySqlConfig, params::MySqlParamStore},
};
use async_trait::async_trait;
use model::records::row::Row;
use mysql_async::{Conn, Opts, Row as MySqlRow, prelude::*};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Reads the polled table over exactly one connection.
///
/// After an I/O or driver failure the connection is dropped and a fresh one
/// is opened on the next fetch, so at most one connection is ever held.
pub struct MySqlRowSource {
    opts: Opts,
    conn: Option<Conn>,
    table: TableRef,
    dialect: MySql,
    closed: bool,
}

impl MySqlRowSource {
    /// Opens the connection and checks it answers `SELECT 1`.
    pub async fn connect(config: &MySqlConfig, table: TableRef) -> Result<Self, ConnectorError> {
        info!("Connecting to MySQL at '{}'", config.display_target());

        let opts = config.opts();
        let mut conn = Conn::new(opts.clone()).await?;

        let val: Option<i32> = conn.query_first("SELECT 1").await?;
        if val != Some(1) {
            let msg = format!(
                "'{}' returned unexpected ping result: {:?}",
                config.display_target(),
                val
            );
            conn.disconnect().await.ok();
            return Err(ConnectorError::Ping(msg));
        }

        info!(
            server_version = ?conn.server_version(),
            "Connected to '{}'",
            config.display_target()
        );

        Ok(MySqlRowSource {
            opts,
            conn: Some(conn),
            table,
            dialect: MySql,
            closed: false,
        })
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }

    async fn conn(&mut self) -> Result<&mut Conn, DbError> {
        if self.closed {
            return Err(DbError::Closed);
        }

        if self.conn.is_none() {
            warn!("Reopening MySQL connection");
            self.conn = Some(Conn::new(self.opts.clone()).await?);
        }

        self.conn.as_mut().ok_or(DbError::Closed)
    }

    fn decode_row(&self, mut row: MySqlRow) -> Result<Row, DbError> {
        let id = match row.take_opt::<u64, usize>(0) {
            Some(Ok(id)) => id,
            Some(Err(err)) => {
                return Err(DbError::Decode {
                    column: self.table.id_column.clone(),
                    message: err.to_string(),
                });
            }
            None => {
                return Err(DbError::Decode {
                    column: self.table.id_column.clone(),
                    message: "missing column".to_string(),
                });
            }
        };

        let content = match row.take_opt::<Option<Vec<u8>>, usize>(1) {
            Some(Ok(content)) => content,
            Some(Err(err)) => {
                return Err(DbError::Decode {
                    column: self.table.content_column.clone(),
                    message: err.to_string(),
                });
            }
            None => {
                return Err(DbError::Decode {
                    column: self.table.content_column.clone(),
                    message: "missing column".to_string(),
                });
            }
        };

        Ok(Row::from_raw(id, content))
    }
}

#[async_trait]
impl RowSource for MySqlRowSource {
    async fn fetch(&mut self, request: FetchRequest) -> Result<Vec<Row>, DbError> {
        let start = Instant::now();
        let query = QueryGenerator::new(&self.dialect).select(&self.table, &request);
        let params = MySqlParamStore::from_values(&query.params).params();

        debug!(sql = %query.sql, params = ?query.params, "Executing fetch");

        let result = self
            .conn()
            .await?
            .exec::<MySqlRow, _, _>(query.sql.as_str(), params)
            .await;

        let rows = match result {
            Ok(rows) => rows,
            Err(err) => {
                if matches!(err, mysql_async::Error::Io(_) | mysql_async::Error::Driver(_)) {
                    // The connection state is unknown; never reuse it.
                    self.conn = None;
                }
                return Err(err.into());
            }
        };

        let rows = rows
            .into_iter()
            .map(|row| self.decode_row(row))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            rows = rows.len(),
            took_ms = start.elapsed().as_millis() as u64,
            "Fetch complete"
        );

        Ok(rows)
    }

    async fn close(&mut self) -> Result<(), DbError> {
        self.closed = true;

        if let Some(conn) = self.conn.take() {
            conn.disconnect().await?;
            info!("MySQL connection closed");
        }

        Ok(())
    }
}
