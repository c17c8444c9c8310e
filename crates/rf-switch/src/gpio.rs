//! GPIO backend abstraction
//!
//! RF switches only ever need digital outputs. A backend hands out
//! [`OutputLine`]s, one per BCM pin number, already driven to an initial
//! level.

use std::fmt;

use crate::error::HardwareError;

/// Logic level of a digital output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Level {
    Low,
    High,
}

impl Level {
    /// Level every pin is allocated with; no RF path is selected at this level
    pub const INACTIVE: Level = Level::High;

    pub fn is_high(self) -> bool {
        self == Level::High
    }
}

impl From<bool> for Level {
    fn from(value: bool) -> Self {
        if value {
            Level::High
        } else {
            Level::Low
        }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> Self {
        level.is_high()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Low => f.write_str("LOW"),
            Level::High => f.write_str("HIGH"),
        }
    }
}

/// A single allocated digital output
///
/// Dropping the line releases the pin but leaves it at its last level.
pub trait OutputLine: Send {
    /// BCM pin number of this line
    fn pin(&self) -> u8;

    /// Drive the line to `level`
    fn set_level(&mut self, level: Level) -> Result<(), HardwareError>;
}

/// Source of output lines
pub trait GpioBackend: Send + Sync {
    /// Short name for logging
    fn name(&self) -> &str;

    /// Claim `pin` as an output driven to `initial`
    fn init_pin(&self, pin: u8, initial: Level) -> Result<Box<dyn OutputLine>, HardwareError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_from_bool() {
        assert_eq!(Level::from(true), Level::High);
        assert_eq!(Level::from(false), Level::Low);
        assert!(bool::from(Level::High));
        assert!(!bool::from(Level::Low));
    }

    #[test]
    fn test_inactive_level_is_high() {
        assert!(Level::INACTIVE.is_high());
        assert_eq!(Level::Low.to_string(), "LOW");
    }
}
