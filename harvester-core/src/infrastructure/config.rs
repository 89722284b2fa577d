// /////////////////////////////////////////////////////////////////////////////
// Metadata Harvester
// Copyright (c) 2026 The Harvester Authors
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Configuration
//!
//! Layered configuration (§10.3): built-in defaults, then `config.toml` (or
//! the path passed via `--config`), then environment variables prefixed
//! `HARVESTER_` with `__` nesting — e.g. `HARVESTER_SUBMISSION__URL`. The
//! loaded snapshot is immutable (`Arc<HarvesterConfig>`); a reload publishes
//! `ConfigurationChanged` rather than mutating shared state in place.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use config::{Config, Environment, File};
use harvester_domain::events::ConfigurationChanged;
use harvester_domain::{DomainEvent, HarvestError};
use serde::{Deserialize, Serialize};

use super::event_bus::{Event, EventBus};

const ENV_PREFIX: &str = "HARVESTER";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub enabled: bool,
    pub start_index: u64,
    pub end_index: u64,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            start_index: 0,
            end_index: u64::MAX,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionSettings {
    pub url: String,
    pub user_name: String,
    pub password: String,
    pub size: u64,
}

impl Default for SubmissionSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            user_name: String::new(),
            password: String::new(),
            size: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HarvesterConfig {
    pub force_harvest: bool,
    pub concurrent: bool,
    pub auto_save: bool,
    pub auto_submit: bool,
    pub read_http_from_disk: bool,
    pub write_http_to_disk: bool,
    pub submission: SubmissionSettings,
    pub pipelines: std::collections::HashMap<String, PipelineSettings>,
}

impl Default for HarvesterConfig {
    fn default() -> Self {
        Self {
            force_harvest: false,
            concurrent: false,
            auto_save: false,
            auto_submit: false,
            read_http_from_disk: true,
            write_http_to_disk: true,
            submission: SubmissionSettings::default(),
            pipelines: std::collections::HashMap::new(),
        }
    }
}

impl HarvesterConfig {
    pub fn pipeline(&self, name: &str) -> PipelineSettings {
        self.pipelines.get(name).cloned().unwrap_or_default()
    }

    /// Writes this snapshot to `<module_dir>/config.json` (§6's persisted
    /// state layout).
    pub async fn snapshot_to(&self, module_dir: &Path) -> Result<(), HarvestError> {
        let bytes = serde_json::to_vec_pretty(self)?;
        tokio::fs::create_dir_all(module_dir).await?;
        tokio::fs::write(module_dir.join("config.json"), bytes).await?;
        Ok(())
    }
}

/// Loads the layered configuration: defaults < `config_path` (if present) <
/// `HARVESTER_*` environment variables.
pub fn load(config_path: Option<&Path>) -> Result<Arc<HarvesterConfig>, HarvestError> {
    let mut builder = Config::builder().add_source(Config::try_from(&HarvesterConfig::default())?);

    if let Some(path) = config_path {
        builder = builder.add_source(File::from(PathBuf::from(path)).required(false));
    } else {
        builder = builder.add_source(File::with_name("config").required(false));
    }

    builder = builder.add_source(Environment::with_prefix(ENV_PREFIX).separator("__"));

    let config = builder
        .build()
        .map_err(|err| HarvestError::InvalidConfiguration(err.to_string()))?;
    let settings: HarvesterConfig = config
        .try_deserialize()
        .map_err(|err| HarvestError::InvalidConfiguration(err.to_string()))?;
    Ok(Arc::new(settings))
}

/// Reloads configuration and, if it differs from `previous`, publishes
/// `ConfigurationChanged` on `bus`.
pub fn reload(previous: &Arc<HarvesterConfig>, config_path: Option<&Path>, bus: &EventBus) -> Result<Arc<HarvesterConfig>, HarvestError> {
    let reloaded = load(config_path)?;
    if serde_json::to_vec(reloaded.as_ref())? != serde_json::to_vec(previous.as_ref())? {
        bus.send_event(Event::ConfigurationChanged(DomainEvent::new(ConfigurationChanged {
            key: "*".to_string(),
        })));
    }
    Ok(reloaded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_load_without_a_config_file() {
        let config = load(Some(Path::new("/nonexistent/config.toml"))).unwrap();
        assert!(!config.force_harvest);
        assert!(config.write_http_to_disk);
    }

    #[test]
    fn unknown_pipeline_falls_back_to_default_settings() {
        let config = load(None).unwrap();
        let settings = config.pipeline("open-library");
        assert!(settings.enabled);
        assert_eq!(settings.start_index, 0);
    }

    #[tokio::test]
    async fn snapshot_writes_config_json() {
        let dir = tempfile::tempdir().unwrap();
        let config = HarvesterConfig::default();
        config.snapshot_to(dir.path()).await.unwrap();
        assert!(dir.path().join("config.json").exists());
    }
}
