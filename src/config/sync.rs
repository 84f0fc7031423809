//! Cursor sync configuration.
//!
//! One typed struct for the poll loop and the input dispatcher, persisted as
//! camelCase JSON in the platform config directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{OptionExt, PointerPadError, PointerPadResult, ResultExt};
use crate::sync::Direction;

/// Pixels moved per directional key press.
pub const DEFAULT_STEP: i32 = 8;

/// Poll cadence when the host does not drive frames itself.
pub const DEFAULT_REFRESH_RATE_HZ: u32 = 60;

const MAX_STEP: i32 = 256;
const MAX_REFRESH_RATE_HZ: u32 = 240;

const CONFIG_DIR_NAME: &str = "pointerpad";
const CONFIG_FILE_NAME: &str = "sync.json";

/// Settings for the position sync subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase", default)]
#[ts(export, export_to = "../types/generated/")]
pub struct SyncConfig {
    /// Register the frontend key listener that issues `move_cursor` calls.
    pub enable_local_input_dispatch: bool,

    /// The backend captures movement keys globally on its own.
    /// Mutually exclusive with `enable_local_input_dispatch`, otherwise every
    /// key press would move the cursor twice.
    pub backend_global_capture: bool,

    /// Movement per key press in backend units (1-256).
    pub step: i32,

    /// Frames per second of the built-in refresh clock (1-240).
    pub refresh_rate_hz: u32,

    /// Key name (case-insensitive) to movement direction.
    pub key_bindings: BTreeMap<String, Direction>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enable_local_input_dispatch: true,
            backend_global_capture: false,
            step: DEFAULT_STEP,
            refresh_rate_hz: DEFAULT_REFRESH_RATE_HZ,
            key_bindings: Self::default_key_bindings(),
        }
    }
}

impl SyncConfig {
    /// h/j/k/l, vi style.
    pub fn default_key_bindings() -> BTreeMap<String, Direction> {
        BTreeMap::from([
            ("h".to_string(), Direction::Left),
            ("j".to_string(), Direction::Down),
            ("k".to_string(), Direction::Up),
            ("l".to_string(), Direction::Right),
        ])
    }

    /// Clamp numeric settings, normalize key names and check that the
    /// settings are consistent with each other.
    pub fn validate(&mut self) -> PointerPadResult<()> {
        if self.enable_local_input_dispatch && self.backend_global_capture {
            return Err(PointerPadError::ConfigError(
                "local input dispatch and backend global capture cannot both be enabled"
                    .to_string(),
            ));
        }

        self.step = self.step.clamp(1, MAX_STEP);
        self.refresh_rate_hz = self.refresh_rate_hz.clamp(1, MAX_REFRESH_RATE_HZ);

        let mut normalized = BTreeMap::new();
        for (key, direction) in std::mem::take(&mut self.key_bindings) {
            let name = key.trim().to_lowercase();
            if name.is_empty() {
                log::warn!("[CONFIG] Ignoring empty key binding for {:?}", direction);
                continue;
            }
            match normalized.insert(name.clone(), direction) {
                Some(previous) if previous != direction => {
                    return Err(PointerPadError::ConfigError(format!(
                        "key '{}' is bound to both {:?} and {:?}",
                        name, previous, direction
                    )));
                },
                _ => {},
            }
        }
        self.key_bindings = normalized;

        Ok(())
    }

    /// Reset all settings to defaults.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// `<config dir>/pointerpad/sync.json`.
    pub fn default_path() -> PointerPadResult<PathBuf> {
        let dir = dirs::config_dir().context("no config directory on this platform")?;
        Ok(dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load and validate a config file. Missing fields take their defaults.
    pub fn load_from_file(path: &Path) -> PointerPadResult<Self> {
        let json = std::fs::read_to_string(path)?;
        let mut config: Self = serde_json::from_str(&json)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty JSON, creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> PointerPadResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::debug!("[CONFIG] Saved sync config to {}", path.display());
        Ok(())
    }

    /// Load from the default location, falling back to defaults.
    pub fn load_or_default() -> Self {
        let path = match Self::default_path() {
            Ok(path) => path,
            Err(e) => {
                log::warn!("[CONFIG] {}; using defaults", e);
                return Self::default();
            },
        };

        if !path.exists() {
            log::debug!("[CONFIG] No config at {}; using defaults", path.display());
            return Self::default();
        }

        match Self::load_from_file(&path) {
            Ok(config) => {
                log::info!("[CONFIG] Loaded sync config from {}", path.display());
                config
            },
            Err(e) => {
                log::warn!("[CONFIG] Invalid config at {}: {}; using defaults", path.display(), e);
                Self::default()
            },
        }
    }
}
