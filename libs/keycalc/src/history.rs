//! Evaluation history
//!
//! Successful evaluations are recorded as `"<expr> = <result>"` strings.
//! The log keeps the most recent [`HISTORY_CAPACITY`] records and drops the
//! oldest one first. History lives for the process only.

use serde::Serialize;
use std::collections::VecDeque;

/// Maximum number of records kept
pub const HISTORY_CAPACITY: usize = 20;

/// Bounded FIFO log of evaluation records, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct HistoryLog {
    records: VecDeque<String>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, evicting the oldest one when the log is full
    pub fn push(&mut self, record: impl Into<String>) {
        if self.records.len() == HISTORY_CAPACITY {
            self.records.pop_front();
        }
        self.records.push_back(record.into());
    }

    /// Up to `n` most recent records, newest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &str> {
        self.records.iter().rev().take(n).map(String::as_str)
    }

    /// All records, oldest first
    pub fn records(&self) -> impl DoubleEndedIterator<Item = &str> + ExactSizeIterator {
        self.records.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
