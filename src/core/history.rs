//! Append-only ledger of completed sessions.

use crate::models::session::DailySession;
use serde::{Deserialize, Serialize};

/// Completed sessions in insertion (chronological) order.
///
/// Entries can only be appended; there is no way to edit, remove, or reorder
/// a single entry. The whole ledger is dropped only by a tracker reset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLedger {
    entries: Vec<DailySession>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, session: DailySession) {
        self.entries.push(session);
    }

    /// The last `n` entries, oldest first. Borrowed view; calling it again
    /// yields the same entries.
    pub fn recent_window(&self, n: usize) -> &[DailySession] {
        let start = self.entries.len().saturating_sub(n);
        &self.entries[start..]
    }

    pub fn entries(&self) -> &[DailySession] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DailySession> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&DailySession> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_duration_ms(&self) -> u64 {
        self.entries.iter().map(|s| s.duration_ms).sum()
    }
}

impl From<Vec<DailySession>> for HistoryLedger {
    fn from(entries: Vec<DailySession>) -> Self {
        Self { entries }
    }
}

impl<'a> IntoIterator for &'a HistoryLedger {
    type Item = &'a DailySession;
    type IntoIter = std::slice::Iter<'a, DailySession>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
