use crate::records::row::Row;

/// Rows returned by one bounded fetch, in the order the query produced them
/// (newest first). Never re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    pub rows: Vec<Row>,
    pub limit: usize,
}

impl Batch {
    pub fn new(rows: Vec<Row>, limit: usize) -> Self {
        Batch { rows, limit }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// A batch that hit the limit may have left older rows behind.
    pub fn is_full(&self) -> bool {
        self.limit > 0 && self.rows.len() >= self.limit
    }

    /// Smallest id in the batch.
    pub fn min_id(&self) -> Option<u64> {
        self.rows.iter().map(|row| row.id).min()
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(ids: &[u64]) -> Vec<Row> {
        ids.iter().map(|id| Row::new(*id, format!("row-{id}"))).collect()
    }

    #[test]
    fn test_min_id_ignores_order() {
        let batch = Batch::new(rows(&[4, 9, 1, 7]), 100);
        assert_eq!(batch.min_id(), Some(1));
    }

    #[test]
    fn test_empty_batch() {
        let batch = Batch::new(Vec::new(), 100);
        assert!(batch.is_empty());
        assert!(!batch.is_full());
        assert_eq!(batch.min_id(), None);
    }

    #[test]
    fn test_is_full_at_limit() {
        assert!(Batch::new(rows(&[9, 8]), 2).is_full());
        assert!(!Batch::new(rows(&[9]), 2).is_full());
    }
}
