//! RF Switch Control Library
//!
//! This crate drives the GPIO-controlled RF switches of the rpitx expansion
//! board. A switch selects one RF path by setting its control pins to the
//! levels listed in a truth table; a pair of switches in front of and
//! behind a filter bank (or the LNA) opens a signal path through one leg.
//!
//! - **RfSwitch**: one switch, idempotent and fail-safe path activation
//! - **SwitchPair**: input and output switch driven concurrently
//! - **SimulatedGpio**: in-memory backend for running without a Raspberry Pi
//! - **RppalGpio**: Raspberry Pi backend (`rppal` feature)
//!
//! # Example
//!
//! ```rust
//! use rf_switch::{SimulatedGpio, SwitchKind, SwitchPair, SwitchPinout};
//!
//! let gpio = SimulatedGpio::new();
//! let mut filters = SwitchPair::new(
//!     &gpio,
//!     &SwitchPinout::filter(),
//!     SwitchKind::Sp3t.truth_table(),
//! )
//! .unwrap();
//!
//! filters.activate_path(2).unwrap();
//! assert_eq!(filters.active_path(), Some(2));
//! ```

pub mod error;
pub mod gpio;
pub mod pair;
#[cfg(feature = "rppal")]
pub mod rpi;
pub mod sim;
pub mod switch;
pub mod truth_table;

pub use error::{HardwareError, PairError, SwitchError};
pub use gpio::{GpioBackend, Level, OutputLine};
pub use pair::{SwitchPair, SwitchPinout};
#[cfg(feature = "rppal")]
pub use rpi::RppalGpio;
pub use sim::{PinWrite, SimulatedGpio};
pub use switch::RfSwitch;
pub use truth_table::{SwitchKind, TruthTable};
