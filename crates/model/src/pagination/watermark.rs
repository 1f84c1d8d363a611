use crate::records::row::Row;

/// Highest row id seen so far by this process.
///
/// The value only ever moves forward. It lives in memory and is lost on
/// restart, so a restarted poller may re-emit up to one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WatermarkTracker {
    value: u64,
}

impl WatermarkTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker that treats every id up to and including `id` as already seen.
    pub fn starting_at(id: u64) -> Self {
        WatermarkTracker { value: id }
    }

    pub fn current(&self) -> u64 {
        self.value
    }

    /// Folds the batch into the watermark and returns the new value.
    ///
    /// The max is computed over every row: result ordering is not trusted to
    /// put the newest row first.
    pub fn observe<'a, I>(&mut self, batch: I) -> u64
    where
        I: IntoIterator<Item = &'a Row>,
    {
        self.value = batch
            .into_iter()
            .map(|row| row.id)
            .fold(self.value, u64::max);
        self.value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::batch::Batch;

    fn rows(ids: &[u64]) -> Vec<Row> {
        ids.iter().map(|id| Row::new(*id, id.to_string())).collect()
    }

    #[test]
    fn test_starts_at_zero() {
        assert_eq!(WatermarkTracker::new().current(), 0);
    }

    #[test]
    fn test_observe_takes_max() {
        let mut wm = WatermarkTracker::new();
        assert_eq!(wm.observe(&rows(&[3, 2, 1])), 3);
        assert_eq!(wm.current(), 3);
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let mut wm = WatermarkTracker::starting_at(5);
        assert_eq!(wm.observe(&rows(&[])), 5);
        assert_eq!(wm.current(), 5);
    }

    #[test]
    fn test_never_moves_backwards() {
        let mut wm = WatermarkTracker::new();
        let mut previous = wm.current();

        for ids in [
            vec![5, 4],
            vec![2, 1],
            vec![],
            vec![9],
            vec![7, 8, 6],
            vec![9, 9],
            vec![10, 3],
        ] {
            let current = wm.observe(&rows(&ids));
            assert!(current >= previous, "{current} < {previous}");
            previous = current;
        }

        assert_eq!(wm.current(), 10);
    }

    #[test]
    fn test_unsorted_matches_sorted_descending() {
        let orders: [&[u64]; 4] = [&[9, 8, 7, 6], &[6, 7, 8, 9], &[7, 9, 6, 8], &[8, 6, 9, 7]];

        for order in orders {
            let mut unsorted = WatermarkTracker::starting_at(5);
            let mut sorted = WatermarkTracker::starting_at(5);

            let mut desc = order.to_vec();
            desc.sort_unstable_by(|a, b| b.cmp(a));

            assert_eq!(
                unsorted.observe(&rows(order)),
                sorted.observe(&rows(&desc)),
                "order {order:?}"
            );
        }
    }

    #[test]
    fn test_first_row_is_not_assumed_max() {
        let mut wm = WatermarkTracker::new();
        assert_eq!(wm.observe(&rows(&[1, 2, 3])), 3);
    }

    #[test]
    fn test_observe_batch() {
        let mut wm = WatermarkTracker::starting_at(2);
        let batch = Batch::new(rows(&[4, 3]), 100);
        assert_eq!(wm.observe(&batch), 4);
    }
}
