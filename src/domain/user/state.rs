//! Per-viewer history containers: app-owned, SDK-provided update logic.

use chrono::{DateTime, Utc};

/// Entries that can be ordered newest-first.
pub trait Timestamped {
    fn timestamp(&self) -> DateTime<Utc>;
}

/// Newest-first list fed by a snapshot-then-incremental channel.
///
/// A snapshot message replaces the whole list; an incremental message is
/// prepended.
#[derive(Debug, Clone)]
pub struct UserHistory<T> {
    entries: Vec<T>,
    received_snapshot: bool,
}

impl<T: Timestamped> UserHistory<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            received_snapshot: false,
        }
    }

    pub fn apply(&mut self, is_snapshot: bool, mut batch: Vec<T>) {
        batch.sort_by_key(|e| std::cmp::Reverse(e.timestamp()));

        if is_snapshot {
            self.entries = batch;
            self.received_snapshot = true;
        } else {
            batch.append(&mut self.entries);
            self.entries = batch;
        }
    }

    pub fn entries(&self) -> &[T] {
        &self.entries
    }

    /// Whether the snapshot for the current viewer has arrived yet.
    pub fn is_loaded(&self) -> bool {
        self.received_snapshot
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.received_snapshot = false;
    }
}

impl<T: Timestamped> Default for UserHistory<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry(i64);

    impl Timestamped for Entry {
        fn timestamp(&self) -> DateTime<Utc> {
            Utc.timestamp_millis_opt(self.0).unwrap()
        }
    }

    #[test]
    fn test_snapshot_then_incremental() {
        let mut history = UserHistory::new();
        history.apply(true, vec![Entry(1), Entry(3), Entry(2)]);
        history.apply(false, vec![Entry(4)]);
        assert_eq!(history.len(), 4);
        assert_eq!(history.entries(), [Entry(4), Entry(3), Entry(2), Entry(1)]);
        assert!(history.is_loaded());
    }

    #[test]
    fn test_snapshot_replaces() {
        let mut history = UserHistory::new();
        history.apply(true, vec![Entry(1), Entry(2)]);
        history.apply(true, vec![Entry(9)]);
        assert_eq!(history.entries(), [Entry(9)]);
    }

    #[test]
    fn test_clear_resets_loaded() {
        let mut history = UserHistory::new();
        history.apply(true, vec![Entry(1)]);
        history.clear();
        assert!(history.is_empty());
        assert!(!history.is_loaded());
    }
}
