use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// A cell as it was right before an action touched it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub coords: Coord2,
    pub prior: Cell,
}

/// Every cell mutation caused by one logical action.
///
/// Each position appears at most once, so restoring the snapshots is order-independent.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    entries: SmallVec<[Snapshot; 4]>,
}

impl Batch {
    pub fn record(&mut self, coords: Coord2, prior: Cell) {
        self.entries.push(Snapshot { coords, prior });
    }

    /// Drops the most recent snapshot, used when a mutation is rolled back in place.
    pub fn discard_last(&mut self) -> Option<Snapshot> {
        self.entries.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.entries.iter()
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.entries.iter().any(|entry| entry.coords == coords)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UndoLog {
    stack: Vec<Batch>,
}

impl UndoLog {
    /// Empty batches are not worth an undo charge and are dropped.
    pub fn push_batch(&mut self, batch: Batch) {
        if batch.is_empty() {
            return;
        }
        log::trace!("Undo log push, {} cells", batch.len());
        self.stack.push(batch);
    }

    pub fn pop(&mut self) -> Option<Batch> {
        self.stack.pop()
    }

    pub fn peek(&self) -> Option<&Batch> {
        self.stack.last()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_batches_are_not_logged() {
        let mut log = UndoLog::default();

        log.push_batch(Batch::default());

        assert!(log.is_empty());
    }

    #[test]
    fn pop_returns_latest_batch() {
        let mut log = UndoLog::default();
        let mut first = Batch::default();
        first.record((0, 0), Cell::default());
        let mut second = Batch::default();
        second.record((1, 1), Cell::default());
        second.record((1, 2), Cell::default());

        log.push_batch(first.clone());
        log.push_batch(second.clone());

        assert_eq!(log.len(), 2);
        assert_eq!(log.pop(), Some(second));
        assert_eq!(log.pop(), Some(first));
        assert_eq!(log.pop(), None);
    }

    #[test]
    fn discard_last_rolls_back_one_entry() {
        let mut batch = Batch::default();
        batch.record((0, 0), Cell::default());
        batch.record((0, 1), Cell::default());

        let dropped = batch.discard_last();

        assert_eq!(dropped.map(|entry| entry.coords), Some((0, 1)));
        assert!(batch.contains((0, 0)));
        assert!(!batch.contains((0, 1)));
    }
}
