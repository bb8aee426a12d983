//! Bounded, most-recent-first conversion history.

use crate::dialect::Dialect;
use crate::storage::{bounded, KvStore, DEFAULT_STORE_TIMEOUT};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tracing::{debug, warn};

/// Collection the history is persisted under
pub const HISTORY_KEY: &str = "history";

/// Oldest entries are evicted beyond this many
pub const MAX_HISTORY: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// Millisecond timestamp, bumped to stay strictly increasing
    pub id: i64,
    pub input: String,
    pub output: String,
    pub source: Dialect,
    pub target: Dialect,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default)]
struct HistoryState {
    /// Newest first
    entries: VecDeque<HistoryEntry>,
    last_id: i64,
    /// Bumped on every change that should reach the store
    revision: u64,
}

/// Keeps the last [`MAX_HISTORY`] conversions, optionally persisted.
///
/// Store failures and timeouts are logged and never fail a call; the in-memory
/// history stays authoritative.
pub struct HistoryRecorder {
    // Never held across an await
    state: Mutex<HistoryState>,
    store: Option<Arc<dyn KvStore>>,
    timeout: Duration,
    /// Highest revision written to the store
    persisted: AtomicU64,
}

impl HistoryRecorder {
    /// History that lives only in memory
    #[must_use]
    pub fn in_memory() -> Self {
        Self::build(None)
    }

    #[must_use]
    pub fn with_store(store: Arc<dyn KvStore>) -> Self {
        Self::build(Some(store))
    }

    fn build(store: Option<Arc<dyn KvStore>>) -> Self {
        Self {
            state: Mutex::new(HistoryState::default()),
            store,
            timeout: DEFAULT_STORE_TIMEOUT,
            persisted: AtomicU64::new(0),
        }
    }

    /// Time limit for each store call.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn state(&self) -> MutexGuard<'_, HistoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record a conversion and return the stored entry.
    pub async fn record(&self, input: &str, output: &str, source: Dialect) -> HistoryEntry {
        let entry = {
            let now = Utc::now();
            let mut state = self.state();

            let id = now.timestamp_millis().max(state.last_id + 1);
            state.last_id = id;

            let entry = HistoryEntry {
                id,
                input: input.to_string(),
                output: output.to_string(),
                source,
                target: source.other(),
                created_at: now,
            };
            state.entries.push_front(entry.clone());
            state.entries.truncate(MAX_HISTORY);
            state.revision += 1;
            entry
        };

        self.persist().await;
        entry
    }

    /// Entries, newest first.
    pub async fn list(&self) -> Vec<HistoryEntry> {
        self.state().entries.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.state().entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.state().entries.is_empty()
    }

    /// Drop every entry, in memory and in the store.
    pub async fn clear(&self) {
        let revision = {
            let mut state = self.state();
            state.entries.clear();
            state.revision += 1;
            state.revision
        };

        let Some(store) = &self.store else {
            return;
        };
        match bounded(self.timeout, "clear", store.clear(HISTORY_KEY)).await {
            Ok(()) => {
                self.persisted.fetch_max(revision, Ordering::SeqCst);
            }
            Err(e) => warn!("Failed to clear stored history: {:#}", e),
        }
    }

    /// Restore the stored history, keeping entries recorded since. Returns the
    /// number of stored entries restored; on failure the current history is
    /// kept.
    pub async fn load(&self) -> usize {
        let Some(store) = &self.store else {
            return 0;
        };

        let stored = match bounded(self.timeout, "load", store.load(HISTORY_KEY)).await {
            Ok(Some(value)) => value,
            Ok(None) => return 0,
            Err(e) => {
                warn!("Failed to load history: {:#}", e);
                return 0;
            }
        };

        let mut restored: Vec<HistoryEntry> = match serde_json::from_value(stored) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Stored history is corrupt, ignoring it: {}", e);
                return 0;
            }
        };
        restored.sort_by(|a, b| b.id.cmp(&a.id));
        restored.truncate(MAX_HISTORY);
        let count = restored.len();

        let mut state = self.state();
        restored.retain(|entry| state.entries.iter().all(|current| current.id != entry.id));
        let mut entries: Vec<HistoryEntry> = state.entries.drain(..).chain(restored).collect();
        entries.sort_by(|a, b| b.id.cmp(&a.id));
        entries.truncate(MAX_HISTORY);

        state.last_id = state.last_id.max(entries.first().map_or(0, |e| e.id));
        state.entries = entries.into();
        debug!("Restored {} history entries", count);
        count
    }

    fn snapshot(&self) -> Option<(u64, Value)> {
        let state = self.state();
        match serde_json::to_value(&state.entries) {
            Ok(value) => Some((state.revision, value)),
            Err(e) => {
                warn!("Failed to serialize history: {}", e);
                None
            }
        }
    }

    /// Write the newest snapshot. A save that lands after a newer one is
    /// followed by a save of the current state.
    async fn persist(&self) {
        let Some(store) = &self.store else {
            return;
        };

        loop {
            let Some((revision, value)) = self.snapshot() else {
                return;
            };
            if revision < self.persisted.load(Ordering::SeqCst) {
                return;
            }

            if let Err(e) = bounded(self.timeout, "save", store.save(HISTORY_KEY, value)).await {
                warn!("Failed to persist history, keeping it in memory: {:#}", e);
                return;
            }
            if self.persisted.fetch_max(revision, Ordering::SeqCst) <= revision {
                return;
            }
        }
    }
}
