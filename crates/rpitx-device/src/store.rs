//! On-disk store of device configurations
//!
//! One pretty-printed JSON file per board model, named after the model.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::board::BoardModel;
use crate::error::StoreError;
use crate::snapshot::DeviceConfig;

const EXTENSION: &str = "json";

/// Directory of saved board configurations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding the configuration of `model`
    pub fn path_for(&self, model: BoardModel) -> PathBuf {
        self.dir.join(format!("{}.{}", model.name(), EXTENSION))
    }

    /// Write `config`, replacing any earlier one for the same board
    pub fn save(&self, config: &DeviceConfig) -> Result<PathBuf, StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let path = self.path_for(config.model);
        let json = serde_json::to_string_pretty(config).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;

        info!("Configuration saved: {}", path.display());
        Ok(path)
    }

    /// Read the saved configuration of `model`
    pub fn load(&self, model: BoardModel) -> Result<DeviceConfig, StoreError> {
        let path = self.path_for(model);
        let json = match fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => return Err(StoreError::NotFound(model)),
            Err(source) => return Err(StoreError::Io { path, source }),
        };

        let config: DeviceConfig =
            serde_json::from_str(&json).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?;
        if config.model != model {
            return Err(StoreError::ModelMismatch {
                expected: model,
                found: config.model,
            });
        }

        info!("Configuration loaded: {}", path.display());
        Ok(config)
    }

    /// Boards with a saved configuration, in menu order
    ///
    /// A store directory that does not exist yet holds no configurations.
    pub fn saved_models(&self) -> Result<Vec<BoardModel>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Configuration directory {} does not exist", self.dir.display());
                return Ok(Vec::new());
            }
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.dir.clone(),
                    source,
                })
            }
        };

        let mut models = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            if let Some(model) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(BoardModel::from_name)
            {
                models.push(model);
            }
        }
        models.sort();
        Ok(models)
    }
}
