use crate::{error::ConfigError, retry::RetryPolicy};
use std::time::Duration;

pub const DEFAULT_BATCH_LIMIT: usize = 100;
pub const DEFAULT_INTERVAL_SECS: u64 = 1;

/// Tunables for the poll loop, validated before any connection is opened.
#[derive(Debug, Clone)]
pub struct PollSettings {
    pub interval: Duration,
    pub limit: usize,
    pub skip_exists: bool,
    pub start_after: Option<u64>,
    pub retry: RetryPolicy,
}

impl PollSettings {
    pub fn new(interval_secs: u64, limit: usize, skip_exists: bool) -> Result<Self, ConfigError> {
        if interval_secs == 0 {
            return Err(ConfigError::InvalidInterval(interval_secs));
        }
        if limit == 0 {
            return Err(ConfigError::InvalidLimit(limit));
        }

        Ok(PollSettings {
            interval: Duration::from_secs(interval_secs),
            limit,
            skip_exists,
            start_after: None,
            retry: RetryPolicy::none(),
        })
    }

    pub fn with_start_after(mut self, start_after: Option<u64>) -> Self {
        self.start_after = start_after;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

impl Default for PollSettings {
    fn default() -> Self {
        PollSettings {
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            limit: DEFAULT_BATCH_LIMIT,
            skip_exists: false,
            start_after: None,
            retry: RetryPolicy::none(),
        }
    }
}
