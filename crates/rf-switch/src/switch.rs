//! Single RF switch
//!
//! An [`RfSwitch`] owns the control pins of one physical switch and
//! expresses exactly one RF path of its truth table at a time.

use std::fmt;

use tracing::{debug, info, warn};

use crate::error::{HardwareError, SwitchError};
use crate::gpio::{GpioBackend, Level, OutputLine};
use crate::truth_table::TruthTable;

/// A group of GPIO outputs driven from a truth table
pub struct RfSwitch {
    pins: Vec<u8>,
    table: TruthTable,
    /// `None` when the pins could not be allocated
    lines: Option<Vec<Box<dyn OutputLine>>>,
    active_path: Option<u8>,
}

impl fmt::Debug for RfSwitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RfSwitch")
            .field("pins", &self.pins)
            .field("table", &self.table)
            .field("degraded", &self.is_degraded())
            .field("active_path", &self.active_path)
            .finish()
    }
}

impl RfSwitch {
    /// Allocate `pins` as outputs at [`Level::INACTIVE`]
    ///
    /// Only a mismatch between the number of pins and the table arity is an
    /// error. If the backend cannot allocate the pins the switch is still
    /// returned, degraded: every later activation fails.
    pub fn new(
        backend: &dyn GpioBackend,
        pins: &[u8],
        table: TruthTable,
    ) -> Result<Self, SwitchError> {
        if table.arity() != pins.len() {
            return Err(SwitchError::ArityMismatch {
                table: table.arity(),
                pins: pins.len(),
            });
        }

        let lines = match allocate(backend, pins) {
            Ok(lines) => {
                info!("RF switch initialized on GPIO {:?} ({})", pins, backend.name());
                Some(lines)
            }
            Err(e) => {
                warn!("RF switch on GPIO {:?} is degraded: {}", pins, e);
                None
            }
        };

        Ok(Self {
            pins: pins.to_vec(),
            table,
            lines,
            active_path: None,
        })
    }

    /// Drive the pins to the levels of `path`
    ///
    /// Requesting the active path again succeeds without touching the pins.
    /// On a write failure the pins written so far keep their new level and
    /// the active path is left unchanged. The pins may then match no row of
    /// the table while `active_path()` still names the old path; requesting
    /// that path again is a no-op and does not repair them. Only selecting a
    /// different path rewrites every pin.
    pub fn activate(&mut self, path: u8) -> Result<(), SwitchError> {
        let Some(lines) = self.lines.as_mut() else {
            return Err(SwitchError::Degraded);
        };
        let levels = self
            .table
            .levels(path)
            .ok_or(SwitchError::UnknownPath(path))?;

        if self.active_path == Some(path) {
            debug!("RF path {} already active on GPIO {:?}", path, self.pins);
            return Ok(());
        }

        debug!("Activating RF path {} on GPIO {:?}", path, self.pins);
        for (line, &level) in lines.iter_mut().zip(levels) {
            if let Err(source) = line.set_level(level) {
                warn!(
                    "RF path {} on GPIO {:?} left incomplete: {}",
                    path, self.pins, source
                );
                return Err(SwitchError::WriteFailure { path, source });
            }
            debug!("GPIO {}: {}", line.pin(), level);
        }

        self.active_path = Some(path);
        Ok(())
    }

    /// Path asserted by the last successful activation
    pub fn active_path(&self) -> Option<u8> {
        self.active_path
    }

    /// Whether pin control is unavailable
    pub fn is_degraded(&self) -> bool {
        self.lines.is_none()
    }

    /// Controlled BCM pins in declaration order
    pub fn pins(&self) -> &[u8] {
        &self.pins
    }

    pub fn truth_table(&self) -> &TruthTable {
        &self.table
    }
}

// Lines already claimed are released again if a later pin fails
fn allocate(
    backend: &dyn GpioBackend,
    pins: &[u8],
) -> Result<Vec<Box<dyn OutputLine>>, HardwareError> {
    pins.iter()
        .map(|&pin| backend.init_pin(pin, Level::INACTIVE))
        .collect()
}
