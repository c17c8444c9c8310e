//! GPIO backend selection

use rf_switch::{GpioBackend, HardwareError, Level, OutputLine, SimulatedGpio};
use tracing::{info, warn};

/// Backend for hosts without usable GPIO
///
/// Every allocation fails, so all switches come up degraded.
struct UnavailableGpio {
    reason: String,
}

impl GpioBackend for UnavailableGpio {
    fn name(&self) -> &str {
        "unavailable"
    }

    fn init_pin(&self, _pin: u8, _initial: Level) -> Result<Box<dyn OutputLine>, HardwareError> {
        Err(HardwareError::Unavailable(self.reason.clone()))
    }
}

/// Pick the backend the switches are built on
pub fn select(simulate: bool) -> Box<dyn GpioBackend> {
    if simulate {
        info!("Using simulated GPIO, the header pins are not driven");
        return Box::new(SimulatedGpio::new());
    }

    #[cfg(feature = "rppal")]
    let backend: Box<dyn GpioBackend> = match rf_switch::RppalGpio::new() {
        Ok(gpio) => Box::new(gpio),
        Err(e) => {
            warn!("{}; RF switches will not respond", e);
            Box::new(UnavailableGpio {
                reason: e.to_string(),
            })
        }
    };

    #[cfg(not(feature = "rppal"))]
    let backend: Box<dyn GpioBackend> = {
        warn!("Built without Raspberry Pi GPIO support; use --simulate-gpio");
        Box::new(UnavailableGpio {
            reason: "built without the rppal feature".to_string(),
        })
    };

    backend
}

#[cfg(test)]
mod tests {
    use super::*;
    use rf_switch::{SwitchKind, SwitchPair, SwitchPinout};

    #[test]
    fn test_simulated_backend_drives_switches() {
        let backend = select(true);
        let mut pair = SwitchPair::new(
            backend.as_ref(),
            &SwitchPinout::filter(),
            SwitchKind::Sp3t.truth_table(),
        )
        .unwrap();

        assert_eq!(backend.name(), "simulated");
        assert!(pair.activate_path(1).is_ok());
    }

    #[test]
    fn test_unavailable_backend_degrades_switches() {
        let backend = UnavailableGpio {
            reason: "no controller".to_string(),
        };
        let pair = SwitchPair::new(
            &backend,
            &SwitchPinout::lna(),
            SwitchKind::Spdt.truth_table(),
        )
        .unwrap();

        assert!(pair.is_degraded());
    }
}
