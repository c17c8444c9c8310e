//! Raspberry Pi GPIO backend built on `rppal`

use rppal::gpio::{self, Gpio, OutputPin};
use tracing::info;

use crate::error::HardwareError;
use crate::gpio::{GpioBackend, Level, OutputLine};

/// GPIO controller of the host Raspberry Pi (BCM numbering)
pub struct RppalGpio {
    gpio: Gpio,
}

impl RppalGpio {
    /// Open the GPIO peripheral
    ///
    /// Fails on hosts without a supported pin controller.
    pub fn new() -> Result<Self, HardwareError> {
        let gpio = Gpio::new().map_err(|e| HardwareError::Unavailable(e.to_string()))?;
        info!("Opened Raspberry Pi GPIO controller");
        Ok(Self { gpio })
    }
}

impl GpioBackend for RppalGpio {
    fn name(&self) -> &str {
        "rppal"
    }

    fn init_pin(&self, pin: u8, initial: Level) -> Result<Box<dyn OutputLine>, HardwareError> {
        let handle = self.gpio.get(pin).map_err(|e| match e {
            gpio::Error::PinUsed(p) => HardwareError::PinBusy(p),
            other => HardwareError::Unavailable(other.to_string()),
        })?;

        let mut output = match initial {
            Level::High => handle.into_output_high(),
            Level::Low => handle.into_output_low(),
        };
        // Pins keep their last level when the process exits
        output.set_reset_on_drop(false);

        Ok(Box::new(RppalLine { pin, output }))
    }
}

struct RppalLine {
    pin: u8,
    output: OutputPin,
}

impl OutputLine for RppalLine {
    fn pin(&self) -> u8 {
        self.pin
    }

    fn set_level(&mut self, level: Level) -> Result<(), HardwareError> {
        match level {
            Level::High => self.output.set_high(),
            Level::Low => self.output.set_low(),
        }
        Ok(())
    }
}
