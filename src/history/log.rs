/*!
 * History Log
 * Bounded, most-recent-first append log with its own id sequence
 */

use super::types::Sequenced;
use crate::core::limits::HISTORY_CAPACITY;
use crate::core::types::RecordId;
use parking_lot::RwLock;
use std::collections::VecDeque;

struct LogState<T> {
    entries: VecDeque<T>,
    next_id: RecordId,
}

/// Bounded history log
///
/// Ids start at 1 and keep increasing after old entries are evicted, so
/// `recent()` always yields strictly decreasing ids.
pub struct HistoryLog<T> {
    state: RwLock<LogState<T>>,
    capacity: usize,
}

impl<T: Sequenced + Clone> HistoryLog<T> {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: RwLock::new(LogState {
                entries: VecDeque::with_capacity(capacity.min(HISTORY_CAPACITY)),
                next_id: 1,
            }),
            capacity: capacity.max(1),
        }
    }

    /// Sequence `item` and insert it at the front, evicting the oldest entries
    pub fn append(&self, mut item: T) -> RecordId {
        let mut state = self.state.write();
        let id = state.next_id;
        state.next_id += 1;

        item.set_id(id);
        state.entries.push_front(item);
        state.entries.truncate(self.capacity);
        id
    }

    /// Up to `limit` entries, most recent first
    pub fn recent(&self, limit: usize) -> Vec<T> {
        self.state
            .read()
            .entries
            .iter()
            .take(limit)
            .cloned()
            .collect()
    }

    pub fn latest(&self) -> Option<T> {
        self.state.read().entries.front().cloned()
    }

    pub fn len(&self) -> usize {
        self.state.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T: Sequenced + Clone> Default for HistoryLog<T> {
    fn default() -> Self {
        Self::new()
    }
}
