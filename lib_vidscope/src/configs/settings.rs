use serde::{Deserialize, Serialize};

use crate::errors::{AnalyzerError, Result};
use crate::store::{KeyValueStore, SETTINGS_KEY};

/// Placeholder written until the user supplies a real key.
pub const API_KEY_PLACEHOLDER: &str = "your-api-key-here";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
/// # Settings
///
/// User settings kept under the `settings` key.
pub struct Settings {
    /// API key forwarded to the analysis service.
    pub api_key: String,
    /// Whether page analysis starts automatically when a video page opens.
    pub auto_analyze: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_key: API_KEY_PLACEHOLDER.to_string(),
            auto_analyze: true,
        }
    }
}

impl Settings {
    /// True while the placeholder key is still in place.
    pub fn has_placeholder_key(&self) -> bool {
        self.api_key.trim().is_empty() || self.api_key == API_KEY_PLACEHOLDER
    }
}

/// Writes the default settings unless a `settings` entry already exists.
///
/// Returns `true` when this call seeded the store. An unreadable store is
/// treated as empty and gets seeded.
pub fn seed_settings(store: &dyn KeyValueStore) -> Result<bool> {
    match store.get(SETTINGS_KEY) {
        Ok(Some(_)) => return Ok(false),
        Ok(None) => {}
        Err(e) => log::warn!("Settings unreadable ({}), seeding defaults", e),
    }
    let value = serde_json::to_value(Settings::default())
        .map_err(|e| AnalyzerError::Store(e.to_string()))?;
    store.set(SETTINGS_KEY, value)?;
    log::info!("Seeded default settings");
    Ok(true)
}

/// Reads the settings, falling back to defaults when absent or unreadable.
pub fn load_settings(store: &dyn KeyValueStore) -> Result<Settings> {
    Ok(store
        .get(SETTINGS_KEY)?
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{JsonFileStore, MemoryStore};
    use serde_json::json;

    #[test]
    fn seeds_only_once() {
        let store = MemoryStore::new();
        assert!(seed_settings(&store).unwrap());
        assert_eq!(
            store.get(SETTINGS_KEY).unwrap(),
            Some(json!({"apiKey": "your-api-key-here", "autoAnalyze": true}))
        );

        store.set(SETTINGS_KEY, json!({"apiKey": "real", "autoAnalyze": false})).unwrap();
        assert!(!seed_settings(&store).unwrap());
        let settings = load_settings(&store).unwrap();
        assert_eq!(settings.api_key, "real");
        assert!(!settings.auto_analyze);
        assert!(!settings.has_placeholder_key());
    }

    #[test]
    fn corrupt_store_file_is_reseeded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "{\"lastAnalysis\": {\"workf").unwrap();
        let store = JsonFileStore::open(&path).unwrap();

        assert!(seed_settings(&store).unwrap());
        assert!(load_settings(&store).unwrap().has_placeholder_key());
        assert!(!seed_settings(&store).unwrap());
    }
}
