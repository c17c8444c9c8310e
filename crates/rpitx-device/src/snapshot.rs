//! Device configuration snapshots
//!
//! Only the data part of a [`Device`] is persisted. Switch pairs wrap live
//! GPIO lines and are rebuilt after loading.

use serde::{Deserialize, Serialize};

use crate::board::BoardModel;
use crate::component::{Amplifier, FilterSlot};
use crate::device::Device;
use crate::error::DeviceError;

/// Saved component selection of a board
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceConfig {
    /// Board model; also names the saved file
    pub model: BoardModel,
    /// Filter slots, slot 1 first
    pub filters: Vec<FilterSlot>,
    /// Amplifier of the LNA stage
    #[serde(default)]
    pub amplifier: Option<Amplifier>,
}

impl Device {
    /// Data snapshot of this device
    pub fn snapshot(&self) -> DeviceConfig {
        DeviceConfig {
            model: self.model(),
            filters: self.filters().to_vec(),
            amplifier: self.amplifier().cloned(),
        }
    }

    /// Rebuild a device from a snapshot
    ///
    /// The snapshot must have one slot per filter of its board. Switches of
    /// the returned device are uninitialized.
    pub fn from_config(config: DeviceConfig) -> Result<Self, DeviceError> {
        Device::from_parts(config.model, config.filters, config.amplifier)
    }
}
