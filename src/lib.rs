//! psconvert - CMD <-> PowerShell command conversion engine
//!
//! This library converts Windows CMD command lines into PowerShell and back,
//! with "did you mean" suggestions for unknown commands, a bounded conversion
//! history and an optional remote lookup for commands the local tables miss.
//!
//! # Modules
//!
//! - [`engine`]: [`Converter`] (sync, local) and [`ConversionService`] (async, history)
//! - [`translator`]: Single-command conversion and result types
//! - [`mappings`]: Immutable mapping tables shared across converters
//! - [`detector`]: Source dialect detection
//! - [`splitter`]: Multi-command splitting and joining
//! - [`suggest`]: Similarity suggestions
//! - [`history`]: Conversion history
//! - [`storage`]: Key/value persistence, settings, export and import
//! - [`lookup`]: Cached, coalescing remote lookup
//! - [`config`]: Configuration management and serialization
//!
//! # Example
//!
//! ```
//! use psconvert::{Converter, Direction};
//!
//! let converter = Converter::with_builtin_mappings().unwrap();
//! let result = converter.convert("taskkill /im notepad.exe /f", Direction::Auto);
//! assert_eq!(result.output, "Stop-Process -Name \"notepad\" -Force");
//! ```

pub mod config;
pub mod detector;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod history;
pub mod lookup;
pub mod mappings;
pub mod splitter;
pub mod storage;
pub mod suggest;
pub mod translator;

pub use config::Config;
pub use detector::{DetectionScore, DirectionDetector};
pub use dialect::{Dialect, Direction};
pub use engine::{ConversionService, ConversionStrategy, Converter, LocalStrategy, LookupFallback};
pub use error::{LookupError, MappingError};
pub use history::{HistoryEntry, HistoryRecorder};
pub use lookup::{LearnDocsLookup, LookupCoordinator, LookupResponse, RemoteLookup};
pub use mappings::{MappingStore, MappingStoreBuilder};
pub use storage::{ExportBundle, JsonFileStore, KvStore, MemoryStore, SettingsStore};
pub use suggest::{Suggestion, SuggestionEngine};
pub use translator::{CommandTranslator, ConversionResult, Documentation, SourceKind};

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Install a stderr `tracing` subscriber for embedding applications.
///
/// `RUST_LOG` takes precedence over `debug` when set. The library never
/// installs a subscriber on its own.
///
/// # Errors
/// Returns an error if a global subscriber is already installed
pub fn init_tracing(debug: bool) -> Result<()> {
    let log_level = if debug { Level::DEBUG } else { Level::INFO };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level.as_str()));

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).context("Failed to set global default subscriber")?;

    Ok(())
}
