//! Settings store
//!
//! Loads and persists the active region and the per-region endpoint
//! configuration. On first load, values from the legacy single-endpoint
//! keys are migrated into the then-current region.

use jimeng_domain::{ConfigMap, Region, Settings};
use tracing::{debug, warn};

use crate::keys;
use crate::ports::{KeyValueStore, StorageError};

/// Settings persistence over a key-value store.
#[derive(Debug)]
pub struct SettingsStore<S> {
    store: S,
}

impl<S: KeyValueStore> SettingsStore<S> {
    /// Creates a settings store.
    #[must_use]
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Loads settings, never failing.
    ///
    /// Unreadable or invalid values fall back to defaults. When no
    /// configuration object is stored (or it cannot be parsed), the legacy
    /// keys are migrated into the current region. The migrated value is
    /// written on the next change, legacy keys are left in place.
    pub fn load(&self) -> Settings {
        let region = self.load_region();
        let config = self
            .load_config()
            .or_else(|| self.migrate_legacy(region))
            .unwrap_or_default();
        Settings::new(region, config)
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(e) => {
                warn!(key, error = %e, "failed to read setting");
                None
            }
        }
    }

    fn load_region(&self) -> Region {
        let Some(raw) = self.read(keys::REGION).filter(|r| !r.is_empty()) else {
            return Region::default();
        };
        raw.parse().unwrap_or_else(|e| {
            warn!(error = %e, "ignoring stored region");
            Region::default()
        })
    }

    fn load_config(&self) -> Option<ConfigMap> {
        let raw = self.read(keys::CONFIG)?;
        match serde_json::from_str(&raw) {
            Ok(config) => Some(config),
            Err(e) => {
                warn!(error = %e, "failed to parse stored configuration");
                None
            }
        }
    }

    fn migrate_legacy(&self, region: Region) -> Option<ConfigMap> {
        let base_url = self.read(keys::LEGACY_BASE_URL);
        let token = self.read(keys::LEGACY_TOKEN);
        let migrated = ConfigMap::from_legacy(region, base_url.as_deref(), token.as_deref());
        if migrated.is_some() {
            debug!(%region, "migrated legacy endpoint settings");
        }
        migrated
    }

    /// Persists the per-region configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be written.
    pub fn save_config(&self, config: &ConfigMap) -> Result<(), StorageError> {
        let json =
            serde_json::to_string(config).map_err(|e| StorageError::Corrupt(e.to_string()))?;
        self.store.set(keys::CONFIG, &json)
    }

    /// Persists the selected region.
    ///
    /// # Errors
    ///
    /// Returns an error if the region cannot be written.
    pub fn save_region(&self, region: Region) -> Result<(), StorageError> {
        self.store.set(keys::REGION, region.as_str())
    }

    /// Sets the active region's base URL and persists the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be written; the
    /// in-memory settings are updated regardless.
    pub fn set_base_url(
        &self,
        settings: &mut Settings,
        base_url: impl Into<String>,
    ) -> Result<(), StorageError> {
        settings.set_base_url(base_url);
        self.save_config(&settings.config)
    }

    /// Sets the active region's token and persists the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be written; the
    /// in-memory settings are updated regardless.
    pub fn set_token(
        &self,
        settings: &mut Settings,
        token: impl Into<String>,
    ) -> Result<(), StorageError> {
        settings.set_token(token);
        self.save_config(&settings.config)
    }

    /// Switches the active region and persists the choice.
    ///
    /// # Errors
    ///
    /// Returns an error if the region cannot be written; the in-memory
    /// settings are updated regardless.
    pub fn switch_region(&self, settings: &mut Settings, region: Region) -> Result<(), StorageError> {
        settings.switch_region(region);
        self.save_region(region)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::ports::MemoryStore;
    use jimeng_domain::{DEFAULT_BASE_URL, EnvConfig};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    #[test]
    fn empty_store_loads_defaults() {
        let store = SettingsStore::new(MemoryStore::new());
        assert_eq!(store.load(), Settings::default());
    }

    #[test]
    fn migrates_legacy_keys_into_current_region() {
        let store = SettingsStore::new(MemoryStore::with_entries([
            (keys::LEGACY_BASE_URL, "http://legacy:8000"),
            (keys::LEGACY_TOKEN, "legacy-token"),
            (keys::REGION, "CN"),
        ]));

        let settings = store.load();
        assert_eq!(settings.region, Region::Cn);
        assert_eq!(settings.config.cn, EnvConfig::new("http://legacy:8000", "legacy-token"));
        assert_eq!(settings.config.international, EnvConfig::default());
    }

    #[test]
    fn migration_targets_stored_international_region() {
        let store = SettingsStore::new(MemoryStore::with_entries([
            (keys::LEGACY_TOKEN, "legacy-token"),
            (keys::REGION, "International"),
        ]));

        let settings = store.load();
        assert_eq!(settings.region, Region::International);
        assert_eq!(settings.active(), &EnvConfig::new(DEFAULT_BASE_URL, "legacy-token"));
        assert_eq!(settings.config.cn, EnvConfig::default());
    }

    #[test]
    fn stored_config_wins_over_legacy_keys() {
        let store = SettingsStore::new(MemoryStore::with_entries([
            (keys::CONFIG, r#"{"CN":{"baseUrl":"http://new","token":"new"}}"#),
            (keys::LEGACY_TOKEN, "legacy-token"),
        ]));

        let settings = store.load();
        assert_eq!(settings.config.cn, EnvConfig::new("http://new", "new"));
        assert_eq!(settings.config.international, EnvConfig::default());
    }

    #[test]
    fn corrupt_config_falls_back_to_migration() {
        let store = SettingsStore::new(MemoryStore::with_entries([
            (keys::CONFIG, "{not json"),
            (keys::LEGACY_BASE_URL, "http://legacy"),
        ]));
        assert_eq!(store.load().config.cn.base_url, "http://legacy");
    }

    #[test]
    fn unknown_region_defaults_to_cn() {
        let store = SettingsStore::new(MemoryStore::with_entries([(keys::REGION, "Mars")]));
        assert_eq!(store.load().region, Region::Cn);
    }

    #[test]
    fn changes_survive_reload_per_region() {
        let backing = Arc::new(MemoryStore::new());
        let store = SettingsStore::new(Arc::clone(&backing));

        let mut settings = store.load();
        store.set_token(&mut settings, "cn-token").unwrap();
        store.switch_region(&mut settings, Region::International).unwrap();
        store.set_base_url(&mut settings, "https://intl.example").unwrap();
        store.set_token(&mut settings, "intl-token").unwrap();

        let reloaded = SettingsStore::new(backing).load();
        assert_eq!(reloaded.region, Region::International);
        assert_eq!(reloaded.config.cn, EnvConfig::new(DEFAULT_BASE_URL, "cn-token"));
        assert_eq!(
            reloaded.config.international,
            EnvConfig::new("https://intl.example", "intl-token")
        );
    }

    #[test]
    fn failed_write_still_updates_memory() {
        let store = SettingsStore::new(MemoryStore::with_quota(4));
        let mut settings = store.load();
        let result = store.set_token(&mut settings, "a-long-token");
        assert!(matches!(result, Err(StorageError::QuotaExceeded { .. })));
        assert_eq!(settings.active().token, "a-long-token");
    }
}
