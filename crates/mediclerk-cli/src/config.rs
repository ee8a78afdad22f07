use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::store::write_private;

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

pub const DEFAULT_SUGGESTION_MODEL: &str = "gemini-1.5-flash";

/// Overrides the platform config directory.
pub const CONFIG_DIR_ENV: &str = "MEDICLERK_CONFIG_DIR";

const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediclerkConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    pub api_base_url: String,
    /// Gemini model used for follow-up questions. Added in v1.
    pub suggestion_model: String,
    /// Per-request HTTP timeout. `None` keeps the transport default.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    pub created_at: jiff::Timestamp,
}

impl Default for MediclerkConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            suggestion_model: DEFAULT_SUGGESTION_MODEL.to_string(),
            request_timeout_secs: None,
            created_at: jiff::Timestamp::now(),
        }
    }
}

impl MediclerkConfig {
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs
            .filter(|s| *s > 0)
            .map(Duration::from_secs)
    }
}

pub fn config_dir() -> eyre::Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("com.mediclerk.cli"))
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join(CONFIG_FILE)
}

pub fn load_config(dir: &Path) -> eyre::Result<MediclerkConfig> {
    let path = config_path(dir);
    let contents = std::fs::read_to_string(&path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    let config: MediclerkConfig = serde_json::from_value(migrated)?;
    Ok(config)
}

/// Load the config, or the defaults when none has been saved yet.
pub fn load_or_default(dir: &Path) -> eyre::Result<MediclerkConfig> {
    if config_path(dir).exists() {
        load_config(dir)
    } else {
        tracing::debug!(dir = %dir.display(), "no config file, using defaults");
        Ok(MediclerkConfig::default())
    }
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
///
/// Each migration is a pure transform on the raw JSON value.
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION}). \
             Please update mediclerk."
        ));
    }

    // v0 → v1: add suggestion_model
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("suggestion_model")
            .or_insert(serde_json::Value::String(DEFAULT_SUGGESTION_MODEL.to_string()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 → v1 (added suggestion_model)");
    }

    Ok(json)
}

pub fn save_config(dir: &Path, config: &MediclerkConfig) -> eyre::Result<()> {
    // Always write the current version, regardless of what was loaded.
    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;

    let path = config_path(dir);
    write_private(&path, &serde_json::to_string_pretty(&stamped)?)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
