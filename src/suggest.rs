//! "Did you mean" suggestions for unrecognized commands.

use crate::dialect::Dialect;
use crate::mappings::MappingStore;
use serde::Serialize;
use std::sync::Arc;

/// Suggestions below this similarity are discarded.
const MIN_SIMILARITY: f64 = 0.5;
const MAX_SUGGESTIONS: usize = 5;

/// A known command that is close to the one the user typed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Suggestion {
    pub command: String,
    /// What `command` converts to
    pub target: String,
    /// Similarity as a rounded percentage
    pub similarity_percent: u8,
}

/// Ranks known source commands by edit distance.
#[derive(Debug, Clone)]
pub struct SuggestionEngine {
    store: Arc<MappingStore>,
}

impl SuggestionEngine {
    #[must_use]
    pub fn new(store: Arc<MappingStore>) -> Self {
        Self { store }
    }

    /// Suggestions among known CMD commands.
    #[must_use]
    pub fn suggest(&self, unknown: &str) -> Vec<Suggestion> {
        self.suggest_for(unknown, Dialect::Cmd)
    }

    /// Suggestions among known commands of the given source dialect, best
    /// first. Ties keep table order.
    #[must_use]
    pub fn suggest_for(&self, unknown: &str, dialect: Dialect) -> Vec<Suggestion> {
        let needle = unknown.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(f64, &str, &str)> = self
            .store
            .source_commands(dialect)
            .filter_map(|(command, target)| {
                let score = similarity(&needle, &command.to_lowercase());
                (score > MIN_SIMILARITY).then_some((score, command, target))
            })
            .collect();

        // sort_by is stable
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        scored
            .into_iter()
            .take(MAX_SUGGESTIONS)
            .map(|(score, command, target)| Suggestion {
                command: command.to_string(),
                target: target.to_string(),
                similarity_percent: (score * 100.0).round() as u8,
            })
            .collect()
    }
}

/// `(max_len - distance) / max_len`, in `[0, 1]`.
#[must_use]
pub fn similarity(a: &str, b: &str) -> f64 {
    let max_len = a.chars().count().max(b.chars().count());
    if max_len == 0 {
        return 1.0;
    }
    (max_len - levenshtein(a, b)) as f64 / max_len as f64
}

/// Levenshtein distance over chars, two-row DP.
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j] + cost).min(prev[j + 1] + 1).min(curr[j] + 1);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
