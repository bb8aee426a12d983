//! Public entry points.
//!
//! [`Converter`] is the synchronous, local-only converter. [`ConversionService`]
//! runs a pluggable [`ConversionStrategy`] per command and records history.

use crate::config::Config;
use crate::detector::DirectionDetector;
use crate::dialect::{Dialect, Direction};
use crate::error::MappingError;
use crate::history::HistoryRecorder;
use crate::lookup::{LearnDocsLookup, LookupCoordinator, RemoteLookup};
use crate::mappings::MappingStore;
use crate::splitter;
use crate::storage::{JsonFileStore, KvStore};
use crate::translator::{CommandTranslator, ConversionResult, SourceKind};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Converts a single command written in `source`.
#[async_trait]
pub trait ConversionStrategy: Send + Sync {
    async fn convert_one(&self, command: &str, source: Dialect) -> ConversionResult;
}

/// Local tables only.
#[derive(Debug, Clone)]
pub struct LocalStrategy {
    translator: CommandTranslator,
}

impl LocalStrategy {
    #[must_use]
    pub fn new(translator: CommandTranslator) -> Self {
        Self { translator }
    }
}

#[async_trait]
impl ConversionStrategy for LocalStrategy {
    async fn convert_one(&self, command: &str, source: Dialect) -> ConversionResult {
        self.translator.convert_one(command, source)
    }
}

/// Wraps a strategy and asks the remote lookup when it returns
/// [`SourceKind::FallbackUnknown`]. Lookup failures keep the inner result.
pub struct LookupFallback<S> {
    inner: S,
    coordinator: Arc<LookupCoordinator>,
    cancel: CancellationToken,
}

impl<S: ConversionStrategy> LookupFallback<S> {
    #[must_use]
    pub fn new(inner: S, coordinator: Arc<LookupCoordinator>, cancel: CancellationToken) -> Self {
        Self {
            inner,
            coordinator,
            cancel,
        }
    }

    #[must_use]
    pub fn coordinator(&self) -> &Arc<LookupCoordinator> {
        &self.coordinator
    }
}

#[async_trait]
impl<S: ConversionStrategy> ConversionStrategy for LookupFallback<S> {
    async fn convert_one(&self, command: &str, source: Dialect) -> ConversionResult {
        let mut local = self.inner.convert_one(command, source).await;
        if !local.is_unknown() {
            return local;
        }

        let response = match self.coordinator.lookup(command, source, &self.cancel).await {
            Ok(response) => response,
            Err(e) => {
                debug!("Keeping local fallback for `{}`: {}", command, e);
                return local;
            }
        };

        match response.target {
            Some(target) if response.found => ConversionResult {
                output: target,
                suggestions: response
                    .description
                    .into_iter()
                    .chain(response.documentation_links.iter().map(|link| format!("See {link}")))
                    .collect(),
                similar: Vec::new(),
                documentation: None,
                kind: SourceKind::Remote,
                source: Some(source),
                target: Some(source.other()),
            },
            _ => {
                for link in response.documentation_links {
                    local.suggestions.push(format!("See {link}"));
                }
                local
            }
        }
    }
}

/// Synchronous local converter.
#[derive(Debug, Clone)]
pub struct Converter {
    translator: CommandTranslator,
    detector: DirectionDetector,
}

impl Converter {
    #[must_use]
    pub fn new(store: Arc<MappingStore>) -> Self {
        Self {
            translator: CommandTranslator::new(store),
            detector: DirectionDetector::new(),
        }
    }

    /// Converter over the built-in tables.
    ///
    /// # Errors
    ///
    /// Returns an error if a built-in pattern fails to compile.
    pub fn with_builtin_mappings() -> Result<Self, MappingError> {
        Ok(Self::new(Arc::new(MappingStore::new()?)))
    }

    #[must_use]
    pub fn translator(&self) -> &CommandTranslator {
        &self.translator
    }

    #[must_use]
    pub fn detect(&self, input: &str) -> Dialect {
        self.detector.detect(input)
    }

    /// Convert possibly chained commands.
    #[must_use]
    pub fn convert(&self, input: &str, direction: Direction) -> ConversionResult {
        let input = input.trim();
        if input.is_empty() {
            return ConversionResult::empty();
        }

        let source = direction.source().unwrap_or_else(|| self.detector.detect(input));
        let parts = splitter::split(input, source)
            .iter()
            .map(|command| self.translator.convert_one(command, source))
            .collect();

        ConversionResult::merge(parts, source)
    }
}

/// Async converter with a pluggable strategy and history.
pub struct ConversionService {
    strategy: Arc<dyn ConversionStrategy>,
    detector: DirectionDetector,
    history: Arc<HistoryRecorder>,
    record_history: bool,
    default_direction: Direction,
    cancel: CancellationToken,
}

impl ConversionService {
    #[must_use]
    pub fn new(strategy: Arc<dyn ConversionStrategy>, history: Arc<HistoryRecorder>) -> Self {
        Self {
            strategy,
            detector: DirectionDetector::new(),
            history,
            record_history: true,
            default_direction: Direction::Auto,
            cancel: CancellationToken::new(),
        }
    }

    /// Direction used when a call passes [`Direction::Auto`]. `Auto` here
    /// means detect.
    #[must_use]
    pub fn with_default_direction(mut self, direction: Direction) -> Self {
        self.default_direction = direction;
        self
    }

    #[must_use]
    pub fn with_history_recording(mut self, enabled: bool) -> Self {
        self.record_history = enabled;
        self
    }

    /// Token cancelled by [`shutdown`](Self::shutdown).
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Wire a service from configuration: custom mappings, optional remote
    /// lookup and history storage. Call [`HistoryRecorder::load`] on
    /// [`history`](Self::history) to restore persisted entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the mapping tables are invalid or the data
    /// directory cannot be resolved or created.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::from_config_with_remote(config, Arc::new(LearnDocsLookup))
    }

    /// Like [`from_config`](Self::from_config) with a caller-supplied remote.
    ///
    /// # Errors
    ///
    /// Same as [`from_config`](Self::from_config).
    pub fn from_config_with_remote(config: &Config, remote: Arc<dyn RemoteLookup>) -> Result<Self> {
        let store = config
            .custom_mappings
            .iter()
            .fold(MappingStore::builder(), |builder, m| {
                builder.custom_mapping(m.cmd.clone(), m.powershell.clone())
            })
            .build()
            .context("Failed to build mapping tables")?;

        let local = LocalStrategy::new(CommandTranslator::new(Arc::new(store)));
        let cancel = CancellationToken::new();

        let strategy: Arc<dyn ConversionStrategy> = if config.lookup.enabled {
            let coordinator = Arc::new(LookupCoordinator::new(
                remote,
                config.lookup.timeout(),
                config.lookup.cache_capacity,
            ));
            Arc::new(LookupFallback::new(local, coordinator, cancel.child_token()))
        } else {
            Arc::new(local)
        };

        let history = if config.storage.persist {
            let data_dir = config.storage.resolved_data_dir()?;
            let kv: Arc<dyn KvStore> = Arc::new(JsonFileStore::new(&data_dir)?);
            info!("Persisting history under {}", data_dir.display());
            HistoryRecorder::with_store(kv).with_timeout(config.storage.timeout())
        } else {
            HistoryRecorder::in_memory()
        };

        Ok(Self::new(strategy, Arc::new(history))
            .with_default_direction(config.conversion.default_direction)
            .with_history_recording(config.conversion.record_history)
            .with_cancellation(cancel))
    }

    #[must_use]
    pub fn history(&self) -> &Arc<HistoryRecorder> {
        &self.history
    }

    /// Cancel in-flight remote lookups; conversions fall back to local results.
    pub fn shutdown(&self) {
        self.cancel.cancel();
    }

    /// Convert possibly chained commands and record the result.
    ///
    /// Nothing is recorded for empty input or when no command was recognized.
    pub async fn convert(&self, input: &str, direction: Direction) -> ConversionResult {
        let input = input.trim();
        if input.is_empty() {
            return ConversionResult::empty();
        }

        let source = direction
            .source()
            .or_else(|| self.default_direction.source())
            .unwrap_or_else(|| self.detector.detect(input));

        let mut parts = Vec::new();
        for command in splitter::split(input, source) {
            parts.push(self.strategy.convert_one(&command, source).await);
        }
        let all_unknown = parts.iter().all(ConversionResult::is_unknown);
        let result = ConversionResult::merge(parts, source);

        if self.record_history && !result.is_empty() && !all_unknown {
            self.history.record(input, &result.output, source).await;
        } else if all_unknown && !result.is_empty() {
            warn!("No conversion found for `{}`", input);
        }

        result
    }
}
