/// One bounded, newest-first fetch.
///
/// `after` is the exclusive lower bound on the id column; `None` means no
/// lower bound, which is what the priming fetch uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub after: Option<u64>,
    pub limit: usize,
}

impl FetchRequest {
    /// The most recent `limit` rows, whatever their id.
    pub fn latest(limit: usize) -> Self {
        FetchRequest { after: None, limit }
    }

    /// Rows with an id strictly greater than `watermark`.
    pub fn after(watermark: u64, limit: usize) -> Self {
        FetchRequest {
            after: Some(watermark),
            limit,
        }
    }
}
