//! Remote lookup for commands the local tables do not know.
//!
//! [`LookupCoordinator`] puts a cache, request coalescing, a timeout and
//! cancellation in front of any [`RemoteLookup`]. Concurrent requests for the
//! same `(dialect, command)` share one in-flight call: the first caller runs it
//! and publishes the outcome on a `watch` channel the others subscribe to.

use crate::dialect::Dialect;
use crate::error::LookupError;
use crate::translator::tables::{CMD_DOCS_BASE, POWERSHELL_DOCS_BASE};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

const LEARN_SEARCH_URL: &str = "https://learn.microsoft.com/en-us/search/?terms=";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupResponse {
    pub found: bool,
    /// Converted command, when `found`
    pub target: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub documentation_links: Vec<String>,
}

/// An external source of conversions.
#[async_trait]
pub trait RemoteLookup: Send + Sync {
    async fn lookup(&self, command: &str, source: Dialect) -> Result<LookupResponse, LookupError>;
}

/// Offline lookup that only produces Microsoft Learn links. Never reports a
/// conversion.
#[derive(Debug, Clone, Copy, Default)]
pub struct LearnDocsLookup;

#[async_trait]
impl RemoteLookup for LearnDocsLookup {
    async fn lookup(&self, command: &str, source: Dialect) -> Result<LookupResponse, LookupError> {
        let terms = match source {
            Dialect::Cmd => format!("{command} powershell equivalent"),
            Dialect::PowerShell => format!("{command} cmd equivalent"),
        };
        let reference = match source {
            Dialect::Cmd => format!("{CMD_DOCS_BASE}{}", command.to_lowercase()),
            Dialect::PowerShell => POWERSHELL_DOCS_BASE.to_string(),
        };

        Ok(LookupResponse {
            found: false,
            target: None,
            description: None,
            documentation_links: vec![format!("{LEARN_SEARCH_URL}{}", encode_query(&terms)), reference],
        })
    }
}

/// Percent-encode a search query, spaces as `+`.
fn encode_query(terms: &str) -> String {
    let mut encoded = String::with_capacity(terms.len());
    for byte in terms.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => encoded.push(byte as char),
            b' ' => encoded.push('+'),
            _ => encoded.push_str(&format!("%{byte:02X}")),
        }
    }
    encoded
}

type LookupKey = (Dialect, String);
type SharedOutcome = Result<LookupResponse, LookupError>;

/// Cache counters for display and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub capacity: usize,
    pub hits: u64,
    pub misses: u64,
    /// Callers that joined an in-flight lookup
    pub coalesced: u64,
}

#[derive(Default)]
struct CoordinatorState {
    cache: HashMap<LookupKey, LookupResponse>,
    /// Insertion order for eviction
    order: VecDeque<LookupKey>,
    pending: HashMap<LookupKey, watch::Receiver<Option<SharedOutcome>>>,
    hits: u64,
    misses: u64,
    coalesced: u64,
}

enum Role {
    Leader(watch::Sender<Option<SharedOutcome>>),
    Follower(watch::Receiver<Option<SharedOutcome>>),
}

/// Removes the pending entry when the leading call ends, including when its
/// future is dropped mid-flight.
struct PendingGuard<'a> {
    coordinator: &'a LookupCoordinator,
    key: LookupKey,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.coordinator.state().pending.remove(&self.key);
    }
}

/// Caching, coalescing front for a [`RemoteLookup`].
pub struct LookupCoordinator {
    remote: Arc<dyn RemoteLookup>,
    timeout: Duration,
    cache_capacity: usize,
    // Never held across an await
    state: Mutex<CoordinatorState>,
}

impl LookupCoordinator {
    #[must_use]
    pub fn new(remote: Arc<dyn RemoteLookup>, timeout: Duration, cache_capacity: usize) -> Self {
        Self {
            remote,
            timeout,
            cache_capacity,
            state: Mutex::new(CoordinatorState::default()),
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn state(&self) -> MutexGuard<'_, CoordinatorState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Look up the base command of `command`.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Timeout`] when the remote does not answer in time,
    /// [`LookupError::Cancelled`] when `cancel` fires first,
    /// [`LookupError::Abandoned`] when a shared call ended without an answer,
    /// and whatever the remote itself reports.
    pub async fn lookup(
        &self,
        command: &str,
        source: Dialect,
        cancel: &CancellationToken,
    ) -> Result<LookupResponse, LookupError> {
        let Some(key) = normalize(command, source) else {
            return Ok(LookupResponse::default());
        };

        let role = {
            let mut state = self.state();
            if let Some(hit) = state.cache.get(&key).cloned() {
                state.hits += 1;
                trace!("Lookup cache hit for {:?}", key);
                return Ok(hit);
            }
            if let Some(rx) = state.pending.get(&key).cloned() {
                state.coalesced += 1;
                Role::Follower(rx)
            } else {
                state.misses += 1;
                let (tx, rx) = watch::channel(None);
                state.pending.insert(key.clone(), rx);
                Role::Leader(tx)
            }
        };

        match role {
            Role::Leader(tx) => self.lead(key, tx, cancel).await,
            Role::Follower(rx) => self.follow(rx, cancel).await,
        }
    }

    async fn lead(
        &self,
        key: LookupKey,
        tx: watch::Sender<Option<SharedOutcome>>,
        cancel: &CancellationToken,
    ) -> SharedOutcome {
        let guard = PendingGuard {
            coordinator: self,
            key: key.clone(),
        };
        debug!("Remote lookup for {} `{}`", key.0, key.1);

        let outcome = tokio::select! {
            biased;
            () = cancel.cancelled() => Err(LookupError::Cancelled),
            result = tokio::time::timeout(self.timeout, self.remote.lookup(&key.1, key.0)) => {
                result.unwrap_or(Err(LookupError::Timeout(self.timeout)))
            }
        };

        match &outcome {
            Ok(response) => self.remember(key, response.clone()),
            Err(e) => warn!("Remote lookup for `{}` failed: {}", key.1, e),
        }

        // Followers did not cancel; they only lost their leader
        let shared = match &outcome {
            Err(LookupError::Cancelled) => Err(LookupError::Abandoned),
            other => other.clone(),
        };
        tx.send_replace(Some(shared));
        drop(guard);

        outcome
    }

    async fn follow(
        &self,
        mut rx: watch::Receiver<Option<SharedOutcome>>,
        cancel: &CancellationToken,
    ) -> SharedOutcome {
        let wait = async move {
            loop {
                let current = rx.borrow_and_update().clone();
                if let Some(outcome) = current {
                    return outcome;
                }
                if rx.changed().await.is_err() {
                    // Sender dropped; it may still have published first
                    return rx.borrow().clone().unwrap_or(Err(LookupError::Abandoned));
                }
            }
        };

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(LookupError::Cancelled),
            result = tokio::time::timeout(self.timeout, wait) => {
                result.unwrap_or(Err(LookupError::Timeout(self.timeout)))
            }
        }
    }

    fn remember(&self, key: LookupKey, response: LookupResponse) {
        if self.cache_capacity == 0 {
            return;
        }

        let mut state = self.state();
        if state.cache.insert(key.clone(), response).is_none() {
            state.order.push_back(key);
        }
        while state.cache.len() > self.cache_capacity {
            let Some(oldest) = state.order.pop_front() else {
                break;
            };
            state.cache.remove(&oldest);
        }
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        let state = self.state();
        CacheStats {
            entries: state.cache.len(),
            capacity: self.cache_capacity,
            hits: state.hits,
            misses: state.misses,
            coalesced: state.coalesced,
        }
    }

    /// Drop cached responses. In-flight lookups are unaffected.
    pub fn clear_cache(&self) {
        let mut state = self.state();
        state.cache.clear();
        state.order.clear();
    }

    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.state().pending.len()
    }
}

/// `(dialect, first token lowercased)`, or `None` for blank input.
fn normalize(command: &str, source: Dialect) -> Option<LookupKey> {
    command
        .split_whitespace()
        .next()
        .map(|base| (source, base.to_lowercase()))
}
