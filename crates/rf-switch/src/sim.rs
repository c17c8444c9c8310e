//! Simulated GPIO backend
//!
//! Records every level written so switch behavior can be inspected
//! without a Raspberry Pi. Clones share state: keep one handle for
//! assertions and pass another to the switches.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::error::HardwareError;
use crate::gpio::{GpioBackend, Level, OutputLine};

/// A single recorded pin write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PinWrite {
    pub pin: u8,
    pub level: Level,
}

#[derive(Debug, Default)]
struct SimState {
    levels: BTreeMap<u8, Level>,
    allocated: BTreeSet<u8>,
    write_counts: BTreeMap<u8, usize>,
    /// Writes in the order they were issued (for test verification)
    write_log: Vec<PinWrite>,
    fail_allocation: bool,
    failing_pins: BTreeSet<u8>,
}

/// In-memory GPIO controller with fault injection
#[derive(Debug, Clone, Default)]
pub struct SimulatedGpio {
    state: Arc<Mutex<SimState>>,
}

impl SimulatedGpio {
    /// Create a controller with no pins allocated
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, SimState> {
        lock(&self.state)
    }

    /// Make every following allocation fail, as on a host without GPIO
    pub fn fail_allocation(&self) {
        self.state().fail_allocation = true;
    }

    /// Make every following write to `pin` fail
    pub fn fail_writes_on(&self, pin: u8) {
        self.state().failing_pins.insert(pin);
    }

    /// Remove all injected faults
    pub fn clear_faults(&self) {
        let mut state = self.state();
        state.fail_allocation = false;
        state.failing_pins.clear();
    }

    /// Current level of `pin`, if it was ever allocated
    pub fn level(&self, pin: u8) -> Option<Level> {
        self.state().levels.get(&pin).copied()
    }

    /// Current levels of `pins`, in order
    pub fn levels(&self, pins: &[u8]) -> Vec<Option<Level>> {
        let state = self.state();
        pins.iter().map(|pin| state.levels.get(pin).copied()).collect()
    }

    /// Whether `pin` is currently claimed by a line
    pub fn is_allocated(&self, pin: u8) -> bool {
        self.state().allocated.contains(&pin)
    }

    /// Successful writes to `pin`; the initial level set at allocation is not counted
    pub fn write_count(&self, pin: u8) -> usize {
        self.state().write_counts.get(&pin).copied().unwrap_or(0)
    }

    /// Successful writes across all pins
    pub fn total_writes(&self) -> usize {
        self.state().write_log.len()
    }

    /// All successful writes in issue order
    pub fn write_log(&self) -> Vec<PinWrite> {
        self.state().write_log.clone()
    }
}

impl GpioBackend for SimulatedGpio {
    fn name(&self) -> &str {
        "simulated"
    }

    fn init_pin(&self, pin: u8, initial: Level) -> Result<Box<dyn OutputLine>, HardwareError> {
        let mut state = self.state();
        if state.fail_allocation {
            return Err(HardwareError::Unavailable(
                "simulated controller refused allocation".to_string(),
            ));
        }
        if !state.allocated.insert(pin) {
            return Err(HardwareError::PinBusy(pin));
        }
        state.levels.insert(pin, initial);
        debug!("Simulated GPIO {} allocated at {}", pin, initial);

        Ok(Box::new(SimulatedLine {
            pin,
            state: Arc::clone(&self.state),
        }))
    }
}

/// Output line handed out by [`SimulatedGpio`]
struct SimulatedLine {
    pin: u8,
    state: Arc<Mutex<SimState>>,
}

impl OutputLine for SimulatedLine {
    fn pin(&self) -> u8 {
        self.pin
    }

    fn set_level(&mut self, level: Level) -> Result<(), HardwareError> {
        let mut state = lock(&self.state);
        if state.failing_pins.contains(&self.pin) {
            return Err(HardwareError::Write {
                pin: self.pin,
                reason: "injected fault".to_string(),
            });
        }
        state.levels.insert(self.pin, level);
        *state.write_counts.entry(self.pin).or_insert(0) += 1;
        state.write_log.push(PinWrite {
            pin: self.pin,
            level,
        });
        Ok(())
    }
}

impl Drop for SimulatedLine {
    fn drop(&mut self) {
        lock(&self.state).allocated.remove(&self.pin);
    }
}

// A panicking test thread must not hide the recorded state from the others
fn lock(state: &Mutex<SimState>) -> MutexGuard<'_, SimState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocation_sets_initial_level() {
        let gpio = SimulatedGpio::new();
        let _line = gpio.init_pin(17, Level::High).unwrap();

        assert_eq!(gpio.level(17), Some(Level::High));
        assert!(gpio.is_allocated(17));
        assert_eq!(gpio.write_count(17), 0);
    }

    #[test]
    fn test_pin_busy_until_dropped() {
        let gpio = SimulatedGpio::new();
        let line = gpio.init_pin(5, Level::High).unwrap();

        assert_eq!(
            gpio.init_pin(5, Level::High).err(),
            Some(HardwareError::PinBusy(5))
        );

        drop(line);
        assert!(!gpio.is_allocated(5));
        // Level survives release
        assert_eq!(gpio.level(5), Some(Level::High));
        assert!(gpio.init_pin(5, Level::Low).is_ok());
    }

    #[test]
    fn test_writes_are_logged() {
        let gpio = SimulatedGpio::new();
        let mut line = gpio.init_pin(22, Level::High).unwrap();

        line.set_level(Level::Low).unwrap();
        line.set_level(Level::High).unwrap();

        assert_eq!(gpio.write_count(22), 2);
        assert_eq!(
            gpio.write_log(),
            vec![
                PinWrite { pin: 22, level: Level::Low },
                PinWrite { pin: 22, level: Level::High },
            ]
        );
    }

    #[test]
    fn test_injected_faults() {
        let gpio = SimulatedGpio::new();
        let mut line = gpio.init_pin(6, Level::High).unwrap();

        gpio.fail_writes_on(6);
        assert!(matches!(
            line.set_level(Level::Low),
            Err(HardwareError::Write { pin: 6, .. })
        ));
        assert_eq!(gpio.level(6), Some(Level::High));

        gpio.fail_allocation();
        assert!(matches!(
            gpio.init_pin(7, Level::High),
            Err(HardwareError::Unavailable(_))
        ));

        gpio.clear_faults();
        assert!(line.set_level(Level::Low).is_ok());
        assert!(gpio.init_pin(7, Level::High).is_ok());
    }
}
