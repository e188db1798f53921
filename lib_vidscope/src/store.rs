//! # Persisted Local State
//!
//! A small key-value store shared by the relay worker and the interface.
//!
//! ## Access points
//! - The relay worker writes [`LAST_ANALYSIS_KEY`] after each page analysis
//!   that came back with a decodable body, failed ones included.
//! - [`seed_settings`](crate::configs::settings::seed_settings) writes
//!   [`SETTINGS_KEY`] once if it is absent.
//! - The interface reads both at open.
//!
//! Values are plain `serde_json::Value`s so the store stays agnostic of the
//! records kept in it.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::Value;

use crate::errors::{AnalyzerError, Result};
use crate::model::AnalysisResult;

/// Key of the most recent page analysis.
pub const LAST_ANALYSIS_KEY: &str = "lastAnalysis";
/// Key of the user settings record.
pub const SETTINGS_KEY: &str = "settings";

/// Process-wide key-value persistence.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn set(&self, key: &str, value: Value) -> Result<()>;
}

/// Volatile store, used by tests and when no store path is configured.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<BTreeMap<String, Value>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Value>> {
        self.entries.lock().expect("MemoryStore lock poisoned")
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        self.lock().insert(key.to_string(), value);
        Ok(())
    }
}

/// # JSON File Store
///
/// Keeps every entry in one JSON object on disk. Each `set` writes the whole
/// object to a temporary file next to the store and renames it into place, so
/// an interrupted write never leaves a truncated store behind. Reads go to the
/// file so separate processes see each other's writes.
///
/// A store file that cannot be parsed is an error for `get`. `set` logs it and
/// starts over from an empty object.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl JsonFileStore {
    /// Opens (or prepares) the store at `path`, creating parent directories.
    ///
    /// # Arguments
    /// * `path` - Location of the JSON file. It is created on first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        log::debug!("Using store file {}", path.display());
        Ok(Self { path, guard: Mutex::new(()) })
    }

    /// Default location under the platform data directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|d| d.join("vidscope").join("store.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, Value>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let text = fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&text).map_err(|e| {
            AnalyzerError::Store(format!("Corrupt store file {}: {}", self.path.display(), e))
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, Value>) -> Result<()> {
        let text = serde_json::to_string_pretty(entries)
            .map_err(|e| AnalyzerError::Store(e.to_string()))?;
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = tempfile::NamedTempFile::new_in(dir)?;
        file.write_all(text.as_bytes())?;
        file.as_file().sync_all()?;
        file.persist(&self.path).map_err(|e| {
            AnalyzerError::Store(format!("Failed to replace {}: {}", self.path.display(), e.error))
        })?;
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let _guard = self.guard.lock().expect("JsonFileStore lock poisoned");
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: Value) -> Result<()> {
        let _guard = self.guard.lock().expect("JsonFileStore lock poisoned");
        let mut entries = self.read_all().unwrap_or_else(|e| {
            log::warn!("{}. Starting a fresh store.", e);
            BTreeMap::new()
        });
        entries.insert(key.to_string(), value);
        self.write_all(&entries)
    }
}

/// Persists the latest page analysis.
pub fn save_last_analysis(store: &dyn KeyValueStore, result: &AnalysisResult) -> Result<()> {
    let value = serde_json::to_value(result).map_err(|e| AnalyzerError::Store(e.to_string()))?;
    store.set(LAST_ANALYSIS_KEY, value)
}

/// Reads the latest page analysis. An undecodable entry is logged and ignored.
pub fn load_last_analysis(store: &dyn KeyValueStore) -> Result<Option<AnalysisResult>> {
    let Some(value) = store.get(LAST_ANALYSIS_KEY)? else {
        return Ok(None);
    };
    match serde_json::from_value::<AnalysisResult>(value) {
        Ok(result) => Ok(Some(result)),
        Err(e) => {
            log::warn!("Ignoring unreadable '{}' entry: {}", LAST_ANALYSIS_KEY, e);
            Ok(None)
        }
    }
}
