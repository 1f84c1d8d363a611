use crate::{error::PollError, retry::classify_db_error};
use connectors::sql::base::{requests::FetchRequest, source::RowSource};
use engine_core::{retry::RetryError, settings::PollSettings, sink::LineSink};
use model::{pagination::watermark::WatermarkTracker, records::batch::Batch};
use std::fmt;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace, warn};

/// Lifecycle of a [`Poller`].
///
/// `Init -> Priming -> Polling -> ShuttingDown -> Terminated`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Init,
    Priming,
    Polling,
    ShuttingDown,
    Terminated,
}

impl fmt::Display for PollState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PollState::Init => "init",
            PollState::Priming => "priming",
            PollState::Polling => "polling",
            PollState::ShuttingDown => "shutting_down",
            PollState::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// What a run did before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollSummary {
    /// Steady-state cycles completed (priming not included).
    pub cycles: u64,
    pub rows_emitted: u64,
    pub watermark: u64,
}

/// Tails an append-only table: one priming fetch, then a fetch / emit /
/// advance / sleep cycle until cancelled.
///
/// Rows are emitted newest first, exactly as the query returns them. When
/// more than `limit` rows arrive between two cycles only the newest `limit`
/// are emitted; the watermark still jumps past the older ones, which are
/// never emitted.
pub struct Poller<S, K> {
    source: S,
    sink: K,
    settings: PollSettings,
    watermark: WatermarkTracker,
    cancel: CancellationToken,
    state: PollState,
    cycles: u64,
    rows_emitted: u64,
}

impl<S, K> Poller<S, K>
where
    S: RowSource,
    K: LineSink,
{
    pub fn new(source: S, sink: K, settings: PollSettings, cancel: CancellationToken) -> Self {
        let watermark = settings
            .start_after
            .map(WatermarkTracker::starting_at)
            .unwrap_or_default();

        Poller {
            source,
            sink,
            settings,
            watermark,
            cancel,
            state: PollState::Init,
            cycles: 0,
            rows_emitted: 0,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn watermark(&self) -> u64 {
        self.watermark.current()
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn summary(&self) -> PollSummary {
        PollSummary {
            cycles: self.cycles,
            rows_emitted: self.rows_emitted,
            watermark: self.watermark.current(),
        }
    }

    /// Runs until the cancellation token fires or an error occurs.
    ///
    /// The source is closed on every exit path. A fetch already in flight
    /// when cancellation arrives is allowed to finish.
    pub async fn run(&mut self) -> Result<PollSummary, PollError> {
        let result = self.drive().await;
        self.shutdown().await;

        let summary = self.summary();
        match &result {
            Ok(()) => info!(
                cycles = summary.cycles,
                rows = summary.rows_emitted,
                watermark = summary.watermark,
                "Poller stopped"
            ),
            Err(err) => warn!(
                cycles = summary.cycles,
                rows = summary.rows_emitted,
                watermark = summary.watermark,
                "Poller failed: {err}"
            ),
        }

        result.map(|()| summary)
    }

    async fn drive(&mut self) -> Result<(), PollError> {
        if self.cancel.is_cancelled() {
            info!("Cancellation requested before priming");
            return Ok(());
        }

        self.prime().await?;

        loop {
            if self.cancel.is_cancelled() {
                info!("Cancellation requested. Stopping poller.");
                break;
            }

            self.poll_once().await?;

            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!("Cancellation requested during sleep. Stopping poller.");
                    break;
                }
                _ = sleep(self.settings.interval) => {}
            }
        }

        Ok(())
    }

    /// Fetches the newest `limit` rows to establish the starting watermark.
    /// Emits them newest first unless `skip_exists` is set.
    pub async fn prime(&mut self) -> Result<usize, PollError> {
        self.transition(PollState::Priming);

        let request = match self.settings.start_after {
            Some(after) => FetchRequest::after(after, self.settings.limit),
            None => FetchRequest::latest(self.settings.limit),
        };
        let Some(batch) = self.fetch(request).await? else {
            return Ok(0);
        };

        let emitted = if self.settings.skip_exists {
            debug!(rows = batch.len(), "Skipping emission of existing rows");
            0
        } else {
            self.emit(&batch).await?
        };

        let watermark = self.watermark.observe(&batch);
        info!(
            rows = batch.len(),
            emitted,
            watermark,
            "Priming complete"
        );

        self.transition(PollState::Polling);
        Ok(emitted)
    }

    /// One steady-state cycle without the trailing sleep: fetch rows above
    /// the watermark, emit them, advance the watermark.
    pub async fn poll_once(&mut self) -> Result<usize, PollError> {
        let previous = self.watermark.current();
        let Some(batch) = self
            .fetch(FetchRequest::after(previous, self.settings.limit))
            .await?
        else {
            return Ok(0);
        };

        if batch.is_full() {
            warn!(
                limit = self.settings.limit,
                watermark = previous,
                oldest_fetched = batch.min_id(),
                "Batch limit reached; older rows in the gap are skipped"
            );
        }

        let emitted = self.emit(&batch).await?;
        let watermark = self.watermark.observe(&batch);
        self.cycles += 1;

        if emitted > 0 {
            debug!(cycle = self.cycles, rows = emitted, watermark, "Cycle emitted rows");
        } else {
            trace!(cycle = self.cycles, watermark, "Cycle found no new rows");
        }

        Ok(emitted)
    }

    /// Runs one query under the retry policy. `None` means shutdown was
    /// requested while waiting to retry; the caller stops without emitting.
    async fn fetch(&mut self, request: FetchRequest) -> Result<Option<Batch>, PollError> {
        let watermark = self.watermark.current();

        let result = self
            .settings
            .retry
            .run(
                &mut self.source,
                &self.cancel,
                move |source: &mut S| source.fetch(request),
                classify_db_error,
            )
            .await;

        match result {
            Ok(rows) => Ok(Some(Batch::new(rows, request.limit))),
            Err(RetryError::Cancelled { attempts, source }) => {
                info!(
                    attempts,
                    watermark, "Cancellation requested during retry backoff: {source}"
                );
                Ok(None)
            }
            Err(RetryError::Fatal(source)) => Err(PollError::Fetch { watermark, source }),
            Err(RetryError::AttemptsExceeded { attempts, source }) if attempts > 1 => {
                Err(PollError::RetriesExhausted {
                    watermark,
                    attempts,
                    source,
                })
            }
            Err(RetryError::AttemptsExceeded { source, .. }) => {
                Err(PollError::Fetch { watermark, source })
            }
        }
    }

    async fn emit(&mut self, batch: &Batch) -> Result<usize, PollError> {
        for row in batch {
            self.sink
                .emit(&row.content)
                .await
                .map_err(|source| PollError::Emit { id: row.id, source })?;
            trace!(row = %row, "Emitted row");
        }

        self.rows_emitted += batch.len() as u64;
        Ok(batch.len())
    }

    async fn shutdown(&mut self) {
        self.transition(PollState::ShuttingDown);

        if let Err(err) = self.source.close().await {
            warn!("Failed to close source cleanly: {err}");
        }

        self.transition(PollState::Terminated);
    }

    fn transition(&mut self, next: PollState) {
        debug!(from = %self.state, to = %next, "Poller state change");
        self.state = next;
    }
}
