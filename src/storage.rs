//! Key/value persistence with JSON files, user settings and export/import.

use crate::history::{HistoryEntry, HISTORY_KEY};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Collection holding user settings as one JSON object
pub const SETTINGS_KEY: &str = "settings";

/// Format version written into exports
pub const EXPORT_VERSION: u32 = 1;

/// Files larger than this are refused on read (10 MB)
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Time limit for a single store call unless configured otherwise
pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(2);

/// Await a store call for at most `limit`.
pub(crate) async fn bounded<T>(
    limit: Duration,
    operation: &str,
    call: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(limit, call).await {
        Ok(result) => result,
        Err(_) => bail!("Store {} timed out after {:?}", operation, limit),
    }
}

/// Key/value persistence for history and settings.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Replace the value stored under `key`.
    async fn save(&self, key: &str, value: Value) -> Result<()>;

    /// Value stored under `key`, if any.
    async fn load(&self, key: &str) -> Result<Option<Value>>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn clear(&self, key: &str) -> Result<()>;
}

/// One pretty-printed JSON file per key in a data directory
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    data_dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `data_dir`, creating the directory if needed
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created
    pub fn new<P: Into<PathBuf>>(data_dir: P) -> Result<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir).context("Failed to create data directory")?;

        Ok(Self { data_dir })
    }

    #[must_use]
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            bail!("Invalid storage key: {key:?}");
        }
        Ok(self.data_dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KvStore for JsonFileStore {
    async fn save(&self, key: &str, value: Value) -> Result<()> {
        let path = self.path_for(key)?;
        let json = serde_json::to_string_pretty(&value).context("Failed to serialize value")?;

        tokio::fs::write(&path, json)
            .await
            .with_context(|| format!("Failed to write {}", path.display()))?;

        debug!("Saved {} to {}", key, path.display());
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<Value>> {
        let path = self.path_for(key)?;

        let metadata = match tokio::fs::metadata(&path).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).context("Failed to stat storage file"),
        };
        if metadata.len() > MAX_FILE_SIZE {
            bail!(
                "Storage file {} is too large ({} bytes, max {} bytes)",
                path.display(),
                metadata.len(),
                MAX_FILE_SIZE
            );
        }

        let json = tokio::fs::read_to_string(&path)
            .await
            .context("Failed to read storage file")?;
        let value = serde_json::from_str(&json).context("Failed to parse storage file")?;

        Ok(Some(value))
    }

    async fn clear(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("Failed to delete storage file"),
        }
    }
}

/// In-memory store for tests and non-persistent embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, Value>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn save(&self, key: &str, value: Value) -> Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn load(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn clear(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// Backup of everything the engine persists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub version: u32,
    pub export_date: DateTime<Utc>,
    pub data: ExportData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportData {
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    #[serde(default)]
    pub settings: Map<String, Value>,
}

/// Settings plus export/import on top of a [`KvStore`]
#[derive(Clone)]
pub struct SettingsStore {
    store: Arc<dyn KvStore>,
    timeout: Duration,
}

impl SettingsStore {
    #[must_use]
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self {
            store,
            timeout: DEFAULT_STORE_TIMEOUT,
        }
    }

    /// Time limit applied to each store call
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn load(&self, key: &str) -> Result<Option<Value>> {
        bounded(self.timeout, "load", self.store.load(key)).await
    }

    async fn save(&self, key: &str, value: Value) -> Result<()> {
        bounded(self.timeout, "save", self.store.save(key, value)).await
    }

    async fn clear(&self, key: &str) -> Result<()> {
        bounded(self.timeout, "clear", self.store.clear(key)).await
    }

    async fn settings(&self) -> Result<Map<String, Value>> {
        match self.load(SETTINGS_KEY).await? {
            Some(Value::Object(map)) => Ok(map),
            Some(_) => bail!("Settings collection is not a JSON object"),
            None => Ok(Map::new()),
        }
    }

    /// Store one setting
    ///
    /// # Errors
    /// Returns an error if the value cannot be serialized or the store fails
    pub async fn save_setting<T: Serialize + Sync>(&self, key: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value).context("Failed to serialize setting")?;
        let mut settings = self.settings().await?;
        settings.insert(key.to_string(), value);
        self.save(SETTINGS_KEY, Value::Object(settings)).await
    }

    /// Load one setting, falling back to `default` when it is missing or unreadable
    pub async fn load_setting<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let settings = match self.settings().await {
            Ok(settings) => settings,
            Err(e) => {
                warn!("Failed to load settings: {:#}", e);
                return default;
            }
        };

        match settings.get(key).cloned().map(serde_json::from_value) {
            Some(Ok(value)) => value,
            Some(Err(e)) => {
                warn!("Setting {} has an unexpected type: {}", key, e);
                default
            }
            None => default,
        }
    }

    /// Snapshot history and settings
    ///
    /// # Errors
    /// Returns an error if either collection cannot be read
    pub async fn export_data(&self) -> Result<ExportBundle> {
        let history = match self.load(HISTORY_KEY).await? {
            Some(value) => serde_json::from_value(value).context("Failed to parse stored history")?,
            None => Vec::new(),
        };
        let settings = self.settings().await?;

        Ok(ExportBundle {
            version: EXPORT_VERSION,
            export_date: Utc::now(),
            data: ExportData { history, settings },
        })
    }

    /// Restore a bundle produced by [`export_data`](Self::export_data).
    ///
    /// Imported settings are merged over existing ones; a non-empty history
    /// replaces the stored history.
    ///
    /// # Errors
    /// Returns an error if the bundle version is newer than supported or the store fails
    pub async fn import_data(&self, bundle: &ExportBundle) -> Result<()> {
        if bundle.version > EXPORT_VERSION {
            bail!(
                "Unsupported export version {} (this build reads up to {})",
                bundle.version,
                EXPORT_VERSION
            );
        }

        if !bundle.data.history.is_empty() {
            let history = serde_json::to_value(&bundle.data.history).context("Failed to serialize history")?;
            self.save(HISTORY_KEY, history).await?;
        }

        if !bundle.data.settings.is_empty() {
            let mut settings = self.settings().await?;
            settings.extend(bundle.data.settings.clone());
            self.save(SETTINGS_KEY, Value::Object(settings)).await?;
        }

        debug!(
            "Imported {} history entries and {} settings",
            bundle.data.history.len(),
            bundle.data.settings.len()
        );
        Ok(())
    }

    /// Remove all persisted history and settings
    ///
    /// # Errors
    /// Returns an error if the store fails
    pub async fn clear_all(&self) -> Result<()> {
        self.clear(HISTORY_KEY).await?;
        self.clear(SETTINGS_KEY).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_json_file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("data")).unwrap();

        assert!(store.load("history").await.unwrap().is_none());
        store.save("history", json!([1, 2, 3])).await.unwrap();
        assert_eq!(store.load("history").await.unwrap(), Some(json!([1, 2, 3])));

        store.clear("history").await.unwrap();
        store.clear("history").await.unwrap();
        assert!(store.load("history").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_json_file_store_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        assert!(store.save("../escape", json!(1)).await.is_err());
        assert!(store.load("").await.is_err());
    }

    #[tokio::test]
    async fn test_settings_default_and_overwrite() {
        let settings = SettingsStore::new(Arc::new(MemoryStore::new()));
        assert_eq!(settings.load_setting("theme", "dark".to_string()).await, "dark");

        settings.save_setting("theme", &"light").await.unwrap();
        settings.save_setting("font_size", &14).await.unwrap();
        assert_eq!(settings.load_setting("theme", String::new()).await, "light");
        assert_eq!(settings.load_setting("font_size", 0u32).await, 14);
        // wrong type falls back
        assert_eq!(settings.load_setting("theme", 7u32).await, 7);
    }

    #[tokio::test]
    async fn test_export_import() {
        let source = SettingsStore::new(Arc::new(MemoryStore::new()));
        source.save_setting("direction", &"auto").await.unwrap();
        let bundle = source.export_data().await.unwrap();
        assert_eq!(bundle.version, EXPORT_VERSION);
        assert!(bundle.data.history.is_empty());

        let target = SettingsStore::new(Arc::new(MemoryStore::new()));
        target.import_data(&bundle).await.unwrap();
        assert_eq!(target.load_setting("direction", String::new()).await, "auto");

        let mut future = bundle.clone();
        future.version = EXPORT_VERSION + 1;
        assert!(target.import_data(&future).await.is_err());
    }

    #[tokio::test]
    async fn test_settings_calls_are_time_limited() {
        struct SlowStore;

        #[async_trait]
        impl KvStore for SlowStore {
            async fn save(&self, _key: &str, _value: Value) -> Result<()> {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            }

            async fn load(&self, _key: &str) -> Result<Option<Value>> {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(None)
            }

            async fn clear(&self, _key: &str) -> Result<()> {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(())
            }
        }

        let settings = SettingsStore::new(Arc::new(SlowStore)).with_timeout(Duration::from_millis(20));
        let err = settings.save_setting("theme", &"dark").await.unwrap_err();
        assert!(err.to_string().contains("timed out"));
        assert_eq!(settings.load_setting("theme", 3u8).await, 3);
        assert!(settings.clear_all().await.is_err());
    }
}
