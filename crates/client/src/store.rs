//! File-backed persistence of the dashboard configuration, its metadata, and
//! the deploy connection settings (one file per key, mirroring the three
//! browser-local-storage slots of the deployed site).

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fanboard_core::config::DashboardConfig;
use fanboard_core::{DashboardError, Result};

use crate::deploy::DeploySettings;

const CONFIG_FILE: &str = "fanboard_config.json";
const META_FILE: &str = "fanboard_config_meta.json";
const DEPLOY_FILE: &str = "fanboard_deploy.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StoreMeta {
    pub last_modified: Option<DateTime<Utc>>,
}

pub struct LocalStore {
    dir: PathBuf,
}

impl LocalStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Locally persisted config overrides, if any. An unreadable file is
    /// treated as absent rather than failing the load.
    pub fn load_overrides(&self) -> Option<serde_json::Value> {
        let content = fs::read_to_string(self.dir.join(CONFIG_FILE)).ok()?;
        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!("ignoring unreadable local config: {}", e);
                None
            }
        }
    }

    /// Persist the merged config and stamp the metadata file.
    pub fn save_config(&self, config: &DashboardConfig) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(config)
            .map_err(|e| DashboardError::InvalidDataStructure(e.to_string()))?;
        fs::write(self.dir.join(CONFIG_FILE), json)?;
        let meta = StoreMeta {
            last_modified: Some(Utc::now()),
        };
        let meta_json = serde_json::to_string_pretty(&meta)
            .map_err(|e| DashboardError::InvalidDataStructure(e.to_string()))?;
        fs::write(self.dir.join(META_FILE), meta_json)?;
        Ok(())
    }

    pub fn load_meta(&self) -> StoreMeta {
        fs::read_to_string(self.dir.join(META_FILE))
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    pub fn load_deploy_settings(&self) -> DeploySettings {
        fs::read_to_string(self.dir.join(DEPLOY_FILE))
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    pub fn save_deploy_settings(&self, settings: &DeploySettings) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        let json = serde_json::to_string_pretty(settings)
            .map_err(|e| DashboardError::InvalidDataStructure(e.to_string()))?;
        fs::write(self.dir.join(DEPLOY_FILE), json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_round_trips_and_stamps_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        assert!(store.load_overrides().is_none());
        assert_eq!(store.load_meta(), StoreMeta::default());

        let mut config = DashboardConfig::default();
        config.branding.site_title = "My Bar".to_string();
        store.save_config(&config).unwrap();

        let overrides = store.load_overrides().unwrap();
        assert_eq!(overrides["branding"]["site_title"], "My Bar");
        assert!(store.load_meta().last_modified.is_some());
    }

    #[test]
    fn deploy_settings_are_stored_in_their_own_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = LocalStore::new(dir.path());
        let settings = DeploySettings {
            owner: "someone".to_string(),
            repo: "site".to_string(),
            token: "ghp_secret".to_string(),
            ..DeploySettings::default()
        };
        store.save_deploy_settings(&settings).unwrap();
        assert_eq!(store.load_deploy_settings(), settings);
        // Saving deploy settings must not create or touch the config slot.
        assert!(store.load_overrides().is_none());
    }

    #[test]
    fn corrupt_local_config_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "{not json").unwrap();
        let store = LocalStore::new(dir.path());
        assert!(store.load_overrides().is_none());
    }
}
