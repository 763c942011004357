//! Bounded stack of recently visited state-action pairs.

use std::collections::{HashSet, VecDeque};

use crate::value_table::ValueTable;

/// One visited `(state, action)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TraceEntry {
    pub state: usize,
    pub action: usize,
}

impl TraceEntry {
    pub fn new(state: usize, action: usize) -> Self {
        Self { state, action }
    }
}

/// Eligibility trace stored as an ordered history, oldest first.
///
/// The stack never holds more than `capacity` entries; pushing onto a full
/// stack evicts the oldest entry.
#[derive(Debug, Clone)]
pub struct TraceStack {
    entries: VecDeque<TraceEntry>,
    capacity: usize,
}

impl TraceStack {
    /// Default maximum trace length.
    pub const DEFAULT_CAPACITY: usize = 20;

    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Appends a pair, evicting the oldest entry if the stack is full.
    pub fn push(&mut self, entry: TraceEntry) {
        if self.capacity == 0 {
            return;
        }
        while self.entries.len() >= self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// The most recently pushed pair.
    pub fn most_recent(&self) -> Option<TraceEntry> {
        self.entries.back().copied()
    }

    /// Entries from oldest to most recent.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &TraceEntry> {
        self.entries.iter()
    }

    /// Applies one shared set of TD errors backwards through the trace.
    ///
    /// The most recent entry receives eligibility 1. An older entry at
    /// distance `d` receives `lambda^d`, unless a more recent entry holds the
    /// same pair, in which case it is skipped (replacing traces). The decay
    /// still advances past skipped entries.
    pub fn apply_backward(&self, table: &mut ValueTable, td_errors: &[f64], lambda: f64, alpha: f64) {
        let mut seen = HashSet::with_capacity(self.entries.len());
        let mut eligibility = 1.0;
        for entry in self.entries.iter().rev() {
            if seen.insert(*entry) {
                table.update(entry.action, entry.state, eligibility, alpha, td_errors);
            }
            eligibility *= lambda;
        }
    }
}

impl Default for TraceStack {
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_respects_capacity() {
        let mut stack = TraceStack::new(3);
        for s in 0..10 {
            stack.push(TraceEntry::new(s, 0));
            assert!(stack.len() <= 3);
        }
        let states: Vec<usize> = stack.iter().map(|e| e.state).collect();
        assert_eq!(states, vec![7, 8, 9]);
        assert_eq!(stack.most_recent(), Some(TraceEntry::new(9, 0)));
    }

    #[test]
    fn default_capacity_is_twenty() {
        let mut stack = TraceStack::default();
        for s in 0..25 {
            stack.push(TraceEntry::new(s, 1));
        }
        assert_eq!(stack.len(), 20);
        assert_eq!(stack.iter().next().map(|e| e.state), Some(5));
    }

    #[test]
    fn clear_empties_stack() {
        let mut stack = TraceStack::new(4);
        stack.push(TraceEntry::new(1, 1));
        stack.clear();
        assert!(stack.is_empty());
        assert_eq!(stack.most_recent(), None);
    }

    #[test]
    fn backward_pass_decays_eligibility() {
        let mut table = ValueTable::new(1, 1, 3, 0.0);
        let mut stack = TraceStack::new(5);
        stack.push(TraceEntry::new(0, 0));
        stack.push(TraceEntry::new(1, 0));
        stack.push(TraceEntry::new(2, 0));
        stack.apply_backward(&mut table, &[1.0], 0.5, 1.0);
        assert!((table.get(0, 0, 2) - 1.0).abs() < 1e-12);
        assert!((table.get(0, 0, 1) - 0.5).abs() < 1e-12);
        assert!((table.get(0, 0, 0) - 0.25).abs() < 1e-12);
    }

    #[test]
    fn repeated_pair_only_credited_once() {
        let mut table = ValueTable::new(2, 2, 2, 0.0);
        let mut stack = TraceStack::new(5);
        stack.push(TraceEntry::new(0, 1));
        stack.push(TraceEntry::new(1, 0));
        stack.push(TraceEntry::new(0, 1));
        stack.apply_backward(&mut table, &[2.0, -1.0], 0.9, 0.5);

        // most-recent update only: α·1·δ
        assert!((table.get(0, 1, 0) - 1.0).abs() < 1e-12);
        assert!((table.get(1, 1, 0) + 0.5).abs() < 1e-12);
        // middle entry at distance 1
        assert!((table.get(0, 0, 1) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn skipped_entries_still_advance_decay() {
        let mut table = ValueTable::new(1, 1, 3, 0.0);
        let mut stack = TraceStack::new(5);
        stack.push(TraceEntry::new(2, 0)); // distance 2
        stack.push(TraceEntry::new(1, 0)); // distance 1 (skipped)
        stack.push(TraceEntry::new(1, 0)); // distance 0
        stack.apply_backward(&mut table, &[1.0], 0.5, 1.0);
        assert!((table.get(0, 0, 1) - 1.0).abs() < 1e-12);
        assert!((table.get(0, 0, 2) - 0.25).abs() < 1e-12);
    }
}
