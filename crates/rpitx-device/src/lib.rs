//! rpitx Expansion Board Device Model
//!
//! This crate binds an expansion board model to its switch topology and to
//! the components a user fitted on it, and keeps that selection on disk.
//!
//! # Lifecycle
//!
//! A [`Device`] is created empty for a board model, populated with filters
//! (and, on LNA boards, an amplifier), has its switch pairs initialized
//! once, and is then used for any number of activations. Only the
//! component selection ([`DeviceConfig`]) is saved; switches are rebuilt
//! after loading.
//!
//! # Example
//!
//! ```rust
//! use rf_switch::{SimulatedGpio, SwitchPinout};
//! use rpitx_device::{BoardModel, Device};
//!
//! let gpio = SimulatedGpio::new();
//! let mut device = Device::new(BoardModel::Sp4t);
//!
//! device.init_filter_switches(&gpio, &SwitchPinout::filter()).unwrap();
//! device.enable_filter(3).unwrap();
//! assert_eq!(device.active_filter(), Some(3));
//!
//! println!("{}", device.describe_configuration());
//! ```

pub mod board;
pub mod component;
pub mod device;
pub mod error;
pub mod snapshot;
pub mod store;

pub use board::{BoardModel, BoardSpec};
pub use component::{Amplifier, Catalog, Component, Filter, FilterSlot};
pub use device::{Device, SwitchRole, LNA_ACTIVE_PATH, LNA_BYPASS_PATH};
pub use error::{CatalogError, DeviceError, StoreError};
pub use snapshot::DeviceConfig;
pub use store::ConfigStore;
