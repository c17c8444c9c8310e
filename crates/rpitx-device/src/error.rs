//! Error types for device configuration and persistence

use std::io;
use std::path::PathBuf;

use rf_switch::{PairError, SwitchError};
use thiserror::Error;

use crate::board::BoardModel;
use crate::device::SwitchRole;

/// Errors that can occur while configuring or operating a device
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DeviceError {
    /// Activation requested before the switch pair was built
    #[error("{0} switches are not initialized")]
    NotInitialized(SwitchRole),

    /// Switch pair could not be built
    #[error("failed to set up {role} switches: {source}")]
    SwitchSetup { role: SwitchRole, source: SwitchError },

    /// One or both switches of the pair failed to select the path
    #[error("RF path activation failed: {0}")]
    Activation(#[from] PairError),

    /// Filter slot outside the board's filter count
    #[error("filter {index} out of range, board has {count} filters")]
    FilterIndexOutOfRange { index: u8, count: u8 },

    /// Amplifier assigned to a board without an LNA footprint
    #[error("board {0} has no LNA")]
    LnaUnsupported(BoardModel),

    /// Saved configuration does not fit the board model
    #[error("{model} has {expected} filter slots, configuration has {found}")]
    FilterCountMismatch {
        model: BoardModel,
        expected: u8,
        found: usize,
    },

    /// Model name not in the board database
    #[error("unknown board model: {0}")]
    UnknownBoard(String),
}

/// Errors that can occur while loading component catalogs
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Reading a catalog file or directory failed
    #[error("failed to read {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    /// Catalog file is not a valid record list
    #[error("invalid catalog file {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Directory has no catalog files
    #[error("no catalog files found in {}", .0.display())]
    NoCatalogFiles(PathBuf),
}

/// Errors that can occur while saving or loading device configurations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error
    #[error("I/O error on {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },

    /// Configuration file could not be encoded or decoded
    #[error("invalid configuration file {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// No configuration saved for this board
    #[error("no saved configuration for {0}")]
    NotFound(BoardModel),

    /// File holds a configuration for a different board
    #[error("configuration file is for {found}, expected {expected}")]
    ModelMismatch {
        expected: BoardModel,
        found: BoardModel,
    },
}
