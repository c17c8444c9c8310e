//! Application settings

use std::fs;
use std::path::{Path, PathBuf};

use rf_switch::SwitchPinout;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while saving settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to create settings directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to write settings {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// GPIO pins of the filter bank switches
    #[serde(default = "default_filter_pins")]
    pub filter_pins: SwitchPinout,
    /// GPIO pins of the LNA bypass switches
    #[serde(default = "default_lna_pins")]
    pub lna_pins: SwitchPinout,
    /// Drive simulated lines instead of the GPIO header
    #[serde(default)]
    pub simulate_gpio: bool,
    /// Saved board configurations (default: `<config dir>/configs`)
    #[serde(default)]
    pub configs_dir: Option<PathBuf>,
    /// Component catalogs (default: `<config dir>/catalog`)
    #[serde(default)]
    pub catalog_dir: Option<PathBuf>,
}

fn default_filter_pins() -> SwitchPinout {
    SwitchPinout::filter()
}

fn default_lna_pins() -> SwitchPinout {
    SwitchPinout::lna()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            filter_pins: default_filter_pins(),
            lna_pins: default_lna_pins(),
            simulate_gpio: false,
            configs_dir: None,
            catalog_dir: None,
        }
    }
}

impl Settings {
    /// Get the XDG config directory for rpitx-control
    /// Uses $XDG_CONFIG_HOME/rpitx-control, falls back to ~/.config/rpitx-control
    pub fn config_dir() -> Option<PathBuf> {
        if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_config);
            if path.is_absolute() {
                return Some(path.join("rpitx-control"));
            }
        }

        dirs::home_dir().map(|h| h.join(".config").join("rpitx-control"))
    }

    /// Settings file inside `config_dir`
    pub fn settings_path(config_dir: &Path) -> PathBuf {
        config_dir.join("settings.json")
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                debug!("No settings read from {}: {}", path.display(), e);
                return Self::default();
            }
        };

        serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!("Ignoring invalid settings file {}: {}", path.display(), e);
            Self::default()
        })
    }

    /// Save settings to `path`
    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| SettingsError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).map_err(|source| SettingsError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Directory of saved board configurations
    pub fn configs_dir(&self, config_dir: &Path) -> PathBuf {
        self.configs_dir
            .clone()
            .unwrap_or_else(|| config_dir.join("configs"))
    }

    /// Directory holding `filters/` and `amplifiers/` catalog files
    pub fn catalog_dir(&self, config_dir: &Path) -> PathBuf {
        self.catalog_dir
            .clone()
            .unwrap_or_else(|| config_dir.join("catalog"))
    }
}
