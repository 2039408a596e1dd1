use std::collections::HashMap;

use crate::Record;

/// The offset counter and the buffer of records not yet read, guarded
/// together so that no one observes an offset without its record.
#[derive(Debug, Default)]
pub(crate) struct LedgerState {
    /// The highest offset handed out. 0 means none ever have been.
    current_offset: i64,
    /// Records which haven't been moved to the durable store yet.
    buffer: HashMap<i64, Record>,
}

impl LedgerState {
    /// Resume numbering after `offset`.
    pub fn with_offset(offset: i64) -> Self {
        Self {
            current_offset: offset,
            buffer: HashMap::new(),
        }
    }

    /// Assign the next offset to `record`, buffer it and return the offset.
    pub fn stamp(&mut self, record: Record) -> i64 {
        self.current_offset += 1;
        self.buffer.insert(self.current_offset, record);
        self.current_offset
    }

    pub fn current_offset(&self) -> i64 {
        self.current_offset
    }

    pub fn get(&self, offset: i64) -> Option<&Record> {
        self.buffer.get(&offset)
    }

    /// Drop the buffered copy of `offset` once it's durable.
    pub fn evict(&mut self, offset: i64) -> Option<Record> {
        self.buffer.remove(&offset)
    }

    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_stamp() {
        let record = Record::new("a", Utc::now());
        let mut state = LedgerState::default();
        assert_eq!(state.stamp(record.clone()), 1);
        assert_eq!(state.stamp(record.clone()), 2);
        assert_eq!(state.stamp(record.clone()), 3);
        assert_eq!(state.buffered(), 3);
        let mut state = LedgerState::with_offset(10);
        assert_eq!(state.stamp(record.clone()), 11);
        assert_eq!(state.stamp(record.clone()), 12);
        assert_eq!(state.get(11), Some(&record));
        assert_eq!(state.get(10), None);
    }

    #[test]
    fn test_evict() {
        let mut state = LedgerState::default();
        let offset = state.stamp(Record::new("a", Utc::now()));
        assert!(state.evict(offset).is_some());
        assert!(state.evict(offset).is_none());
        assert_eq!(state.buffered(), 0);
        assert_eq!(state.current_offset(), 1);
    }
}
