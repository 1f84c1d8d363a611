use async_trait::async_trait;
use connectors::sql::base::{error::DbError, requests::FetchRequest, source::RowSource};
use engine_core::{error::SinkError, sink::LineSink};
use model::records::row::Row;
use std::sync::{Arc, Mutex};

/// Shared in-memory append-only table. Clones see the same rows, so a test
/// can keep inserting while a poller owns another handle.
#[derive(Clone, Default)]
pub struct MemoryTable {
    rows: Arc<Mutex<Vec<Row>>>,
    next_id: Arc<Mutex<u64>>,
    fetches: Arc<Mutex<usize>>,
    closed: Arc<Mutex<bool>>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends rows with auto-incremented ids, returning the ids assigned.
    pub fn insert(&self, contents: &[&str]) -> Vec<u64> {
        let mut next_id = self.next_id.lock().unwrap();
        let mut rows = self.rows.lock().unwrap();

        contents
            .iter()
            .map(|content| {
                *next_id += 1;
                rows.push(Row::new(*next_id, *content));
                *next_id
            })
            .collect()
    }

    /// Appends `count` rows whose content is `msg-<id>`.
    pub fn insert_numbered(&self, count: usize) -> Vec<u64> {
        let mut next_id = self.next_id.lock().unwrap();
        let mut rows = self.rows.lock().unwrap();

        (0..count)
            .map(|_| {
                *next_id += 1;
                rows.push(Row::new(*next_id, format!("msg-{}", *next_id)));
                *next_id
            })
            .collect()
    }

    pub fn fetches(&self) -> usize {
        *self.fetches.lock().unwrap()
    }

    pub fn is_closed(&self) -> bool {
        *self.closed.lock().unwrap()
    }
}

#[async_trait]
impl RowSource for MemoryTable {
    async fn fetch(&mut self, request: FetchRequest) -> Result<Vec<Row>, DbError> {
        if self.is_closed() {
            return Err(DbError::Closed);
        }
        *self.fetches.lock().unwrap() += 1;

        let mut rows: Vec<Row> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|row| request.after.is_none_or(|after| row.id > after))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.id.cmp(&a.id));
        rows.truncate(request.limit);
        Ok(rows)
    }

    async fn close(&mut self) -> Result<(), DbError> {
        *self.closed.lock().unwrap() = true;
        Ok(())
    }
}

/// Sink that keeps every emitted line, shared across clones.
#[derive(Clone, Default)]
pub struct CaptureSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl CaptureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

#[async_trait]
impl LineSink for CaptureSink {
    async fn emit(&mut self, line: &str) -> Result<(), SinkError> {
        self.lines.lock().unwrap().push(line.to_string());
        Ok(())
    }
}

pub fn numbered(ids: &[u64]) -> Vec<String> {
    ids.iter().map(|id| format!("msg-{id}")).collect()
}
