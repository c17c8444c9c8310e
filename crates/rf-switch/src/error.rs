//! Error types for RF switch control

use thiserror::Error;

/// Errors reported by a GPIO backend
///
/// Switch logic does not interpret these beyond "the switch degrades" at
/// construction time and "the activation failed" afterwards.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HardwareError {
    /// No compatible pin controller on this host
    #[error("GPIO controller unavailable: {0}")]
    Unavailable(String),

    /// Pin already claimed by another output line
    #[error("GPIO {0} is busy or in use")]
    PinBusy(u8),

    /// Driving a level onto the pin failed
    #[error("failed to write GPIO {pin}: {reason}")]
    Write { pin: u8, reason: String },
}

/// Errors that can occur while driving a single RF switch
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SwitchError {
    /// Pins could not be allocated when the switch was built
    #[error("pin control unavailable, switch is degraded")]
    Degraded,

    /// Requested path has no row in the truth table
    #[error("RF path {0} is not in the truth table")]
    UnknownPath(u8),

    /// A pin write failed part way through an activation
    #[error("failed to activate RF path {path}: {source}")]
    WriteFailure { path: u8, source: HardwareError },

    /// Truth table rows do not match the number of controlled pins
    #[error("truth table drives {table} pins but the switch has {pins}")]
    ArityMismatch { table: usize, pins: usize },

    /// Truth table is empty or has rows of different length
    #[error("invalid truth table: {0}")]
    InvalidTruthTable(String),
}

/// Failure of a coordinated input/output activation
///
/// Each side keeps its own bookkeeping: a side that succeeded has already
/// advanced its active path.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PairError {
    /// Only the input switch failed
    #[error("input switch: {0}")]
    Input(SwitchError),

    /// Only the output switch failed
    #[error("output switch: {0}")]
    Output(SwitchError),

    /// Both switches failed
    #[error("input switch: {input}; output switch: {output}")]
    Both {
        input: SwitchError,
        output: SwitchError,
    },
}

impl PairError {
    /// Error reported by the input switch, if it failed
    pub fn input(&self) -> Option<&SwitchError> {
        match self {
            Self::Input(e) | Self::Both { input: e, .. } => Some(e),
            Self::Output(_) => None,
        }
    }

    /// Error reported by the output switch, if it failed
    pub fn output(&self) -> Option<&SwitchError> {
        match self {
            Self::Output(e) | Self::Both { output: e, .. } => Some(e),
            Self::Input(_) => None,
        }
    }
}
