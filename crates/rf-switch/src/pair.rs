//! Input/output switch pairs
//!
//! An RF path through a filter or amplifier leg is open only when the
//! switch in front of it and the switch behind it select the same path.
//! [`SwitchPair`] drives both at the same time so there is no window in
//! which one end has moved and the other has not started.

use std::panic;
use std::thread;

use tracing::{debug, warn};

use crate::error::{PairError, SwitchError};
use crate::gpio::GpioBackend;
use crate::switch::RfSwitch;
use crate::truth_table::TruthTable;

/// BCM pins of the input and output switch of a pair
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SwitchPinout {
    /// Pins of the switch in front of the filters/amplifier
    pub input: Vec<u8>,
    /// Pins of the switch behind the filters/amplifier
    pub output: Vec<u8>,
}

impl SwitchPinout {
    pub const FILTER_INPUT_PINS: [u8; 3] = [17, 27, 22];
    pub const FILTER_OUTPUT_PINS: [u8; 3] = [0, 5, 6];
    pub const LNA_INPUT_PINS: [u8; 2] = [23, 24];
    pub const LNA_OUTPUT_PINS: [u8; 2] = [16, 26];

    pub fn new(input: Vec<u8>, output: Vec<u8>) -> Self {
        Self { input, output }
    }

    /// Filter bank switches as wired on the expansion board
    pub fn filter() -> Self {
        Self::new(
            Self::FILTER_INPUT_PINS.to_vec(),
            Self::FILTER_OUTPUT_PINS.to_vec(),
        )
    }

    /// LNA bypass switches as wired on the expansion board
    pub fn lna() -> Self {
        Self::new(Self::LNA_INPUT_PINS.to_vec(), Self::LNA_OUTPUT_PINS.to_vec())
    }
}

/// Two switches that always select the same path
#[derive(Debug)]
pub struct SwitchPair {
    input: RfSwitch,
    output: RfSwitch,
}

impl SwitchPair {
    /// Build both switches of a pair from one truth table
    pub fn new(
        backend: &dyn GpioBackend,
        pinout: &SwitchPinout,
        table: TruthTable,
    ) -> Result<Self, SwitchError> {
        let input = RfSwitch::new(backend, &pinout.input, table.clone())?;
        let output = RfSwitch::new(backend, &pinout.output, table)?;
        Ok(Self::from_switches(input, output))
    }

    pub fn from_switches(input: RfSwitch, output: RfSwitch) -> Self {
        Self { input, output }
    }

    /// Select `path` on both switches concurrently
    ///
    /// Waits for both sides. Succeeds only if both succeed; a side that
    /// succeeded is not reverted when the other fails.
    pub fn activate_path(&mut self, path: u8) -> Result<(), PairError> {
        let Self { input, output } = self;

        let (input_result, output_result) = thread::scope(|s| {
            let input_task = s.spawn(move || input.activate(path));
            let output_task = s.spawn(move || output.activate(path));
            (
                input_task.join().unwrap_or_else(|e| panic::resume_unwind(e)),
                output_task.join().unwrap_or_else(|e| panic::resume_unwind(e)),
            )
        });

        let result = match (input_result, output_result) {
            (Ok(()), Ok(())) => Ok(()),
            (Err(e), Ok(())) => Err(PairError::Input(e)),
            (Ok(()), Err(e)) => Err(PairError::Output(e)),
            (Err(input), Err(output)) => Err(PairError::Both { input, output }),
        };

        match &result {
            Ok(()) => debug!("RF path {} active on both switches", path),
            Err(e) => warn!("RF path {} not activated: {}", path, e),
        }
        result
    }

    /// Path selected on both switches, if they agree
    pub fn active_path(&self) -> Option<u8> {
        match (self.input.active_path(), self.output.active_path()) {
            (Some(a), Some(b)) if a == b => Some(a),
            _ => None,
        }
    }

    pub fn input(&self) -> &RfSwitch {
        &self.input
    }

    pub fn output(&self) -> &RfSwitch {
        &self.output
    }

    /// Whether either switch lost pin control
    pub fn is_degraded(&self) -> bool {
        self.input.is_degraded() || self.output.is_degraded()
    }
}
