use std::collections::HashSet;
use std::sync::Mutex;

use super::domain::{RewardEntry, RewardSource, UserId};

/// Storage abstraction over the append-only reward history so the workflow
/// can be exercised against an in-memory store in tests.
///
/// Entries are never updated or deleted; corrections are new offsetting
/// entries appended by the caller.
pub trait RewardLedger: Send + Sync {
    /// Append one entry. Each [`RewardSource`] may be awarded at most once;
    /// a repeat append fails with [`LedgerError::DuplicateSource`].
    fn append(&self, entry: RewardEntry) -> Result<RewardEntry, LedgerError>;

    fn entries_for_user(&self, user_id: &UserId) -> Result<Vec<RewardEntry>, LedgerError>;

    /// Running total for one account holder, summed from history.
    fn total_for_user(&self, user_id: &UserId) -> Result<u64, LedgerError> {
        let total = self
            .entries_for_user(user_id)?
            .iter()
            .map(|entry| u64::from(entry.points))
            .sum();
        Ok(total)
    }
}

/// Error enumeration for ledger failures.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("reward already recorded for {0}")]
    DuplicateSource(RewardSource),
    #[error("reward ledger unavailable: {0}")]
    Unavailable(String),
}

/// Mutex-guarded ledger backing tests and the demo CLI.
#[derive(Default)]
pub struct InMemoryLedger {
    inner: Mutex<LedgerState>,
}

#[derive(Default)]
struct LedgerState {
    entries: Vec<RewardEntry>,
    seen_sources: HashSet<RewardSource>,
}

impl InMemoryLedger {
    pub fn entries(&self) -> Vec<RewardEntry> {
        self.inner
            .lock()
            .expect("ledger mutex poisoned")
            .entries
            .clone()
    }
}

impl RewardLedger for InMemoryLedger {
    fn append(&self, entry: RewardEntry) -> Result<RewardEntry, LedgerError> {
        let mut state = self.inner.lock().expect("ledger mutex poisoned");
        if state.seen_sources.contains(&entry.source) {
            return Err(LedgerError::DuplicateSource(entry.source));
        }
        state.seen_sources.insert(entry.source.clone());
        state.entries.push(entry.clone());
        Ok(entry)
    }

    fn entries_for_user(&self, user_id: &UserId) -> Result<Vec<RewardEntry>, LedgerError> {
        let state = self.inner.lock().expect("ledger mutex poisoned");
        Ok(state
            .entries
            .iter()
            .filter(|entry| &entry.user_id == user_id)
            .cloned()
            .collect())
    }
}
