//! Expansion board device
//!
//! A [`Device`] binds a board model to its installed components and, once
//! initialized, to the switch pairs that route the RF signal through them.
//!
//! Each switch pair goes `uninitialized → ready → path active`. It is built
//! at most once and never torn down; a failed activation leaves the pair at
//! the path it had before.

use std::fmt;

use rf_switch::{GpioBackend, SwitchPair, SwitchPinout};
use tracing::{debug, info, warn};

use crate::board::BoardModel;
use crate::component::{Amplifier, Filter, FilterSlot};
use crate::error::DeviceError;

/// LNA bypass path: signal goes around the amplifier
pub const LNA_BYPASS_PATH: u8 = 1;
/// LNA path: signal goes through the amplifier
pub const LNA_ACTIVE_PATH: u8 = 2;

/// Which switch pair of the board an operation concerns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchRole {
    Filter,
    Lna,
}

impl fmt::Display for SwitchRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Filter => f.write_str("filter"),
            Self::Lna => f.write_str("LNA"),
        }
    }
}

/// A configured expansion board
#[derive(Debug)]
pub struct Device {
    model: BoardModel,
    /// Always `model.filter_count()` slots
    filters: Vec<FilterSlot>,
    amplifier: Option<Amplifier>,
    filter_switch: Option<SwitchPair>,
    lna_switch: Option<SwitchPair>,
    lna_active: bool,
}

impl Device {
    /// Create a device with every filter slot marked not installed
    pub fn new(model: BoardModel) -> Self {
        Self {
            model,
            filters: vec![FilterSlot::NotInstalled; usize::from(model.filter_count())],
            amplifier: None,
            filter_switch: None,
            lna_switch: None,
            lna_active: false,
        }
    }

    /// Rebuild a device from its parts; switches start uninitialized
    pub(crate) fn from_parts(
        model: BoardModel,
        filters: Vec<FilterSlot>,
        amplifier: Option<Amplifier>,
    ) -> Result<Self, DeviceError> {
        if filters.len() != usize::from(model.filter_count()) {
            return Err(DeviceError::FilterCountMismatch {
                model,
                expected: model.filter_count(),
                found: filters.len(),
            });
        }
        if amplifier.is_some() && !model.supports_lna() {
            return Err(DeviceError::LnaUnsupported(model));
        }

        Ok(Self {
            filters,
            amplifier,
            ..Self::new(model)
        })
    }

    pub fn model(&self) -> BoardModel {
        self.model
    }

    /// Filter slots, slot 1 first
    pub fn filters(&self) -> &[FilterSlot] {
        &self.filters
    }

    pub fn amplifier(&self) -> Option<&Amplifier> {
        self.amplifier.as_ref()
    }

    /// Installed filters with their 1-based slot index, for activation menus
    pub fn installed_filters(&self) -> impl Iterator<Item = (u8, &Filter)> {
        (1..=self.model.filter_count())
            .zip(&self.filters)
            .filter_map(|(index, slot)| slot.filter().map(|filter| (index, filter)))
    }

    /// Put a component (or the not-installed marker) into filter slot `index`
    pub fn assign_filter(&mut self, index: u8, slot: FilterSlot) -> Result<(), DeviceError> {
        let count = self.model.filter_count();
        let target = usize::from(index)
            .checked_sub(1)
            .and_then(|i| self.filters.get_mut(i))
            .ok_or(DeviceError::FilterIndexOutOfRange { index, count })?;
        *target = slot;
        Ok(())
    }

    /// Fit the amplifier of the LNA stage
    pub fn assign_amplifier(&mut self, amplifier: Amplifier) -> Result<(), DeviceError> {
        if !self.model.supports_lna() {
            return Err(DeviceError::LnaUnsupported(self.model));
        }
        self.amplifier = Some(amplifier);
        Ok(())
    }

    /// Build the filter switch pair; later calls do nothing
    ///
    /// The pinout is not checked against the filter count beyond matching
    /// the switch's control pins.
    pub fn init_filter_switches(
        &mut self,
        backend: &dyn GpioBackend,
        pinout: &SwitchPinout,
    ) -> Result<(), DeviceError> {
        if self.filter_switch.is_some() {
            debug!("Filter switches of {} already initialized", self.model);
            return Ok(());
        }

        let kind = self.model.filter_switch();
        let pair = SwitchPair::new(backend, pinout, kind.truth_table()).map_err(|source| {
            DeviceError::SwitchSetup {
                role: SwitchRole::Filter,
                source,
            }
        })?;
        info!("{} filter switches ready for {}", kind, self.model);
        self.filter_switch = Some(pair);
        Ok(())
    }

    /// Build the LNA switch pair
    ///
    /// Does nothing for boards without an LNA, while no amplifier is
    /// assigned, or when the pair already exists.
    pub fn init_lna(
        &mut self,
        backend: &dyn GpioBackend,
        pinout: &SwitchPinout,
    ) -> Result<(), DeviceError> {
        let Some(kind) = self.model.lna_switch() else {
            debug!("{} has no LNA switch", self.model);
            return Ok(());
        };
        if self.amplifier.is_none() {
            debug!("No amplifier assigned on {}, LNA switch not initialized", self.model);
            return Ok(());
        }
        if self.lna_switch.is_some() {
            debug!("LNA switches of {} already initialized", self.model);
            return Ok(());
        }

        let pair = SwitchPair::new(backend, pinout, kind.truth_table()).map_err(|source| {
            DeviceError::SwitchSetup {
                role: SwitchRole::Lna,
                source,
            }
        })?;
        info!("{} LNA switches ready for {}", kind, self.model);
        self.lna_switch = Some(pair);
        Ok(())
    }

    /// Route the signal through filter slot `index` (1-based)
    ///
    /// Slots marked not installed can still be selected; nothing checks
    /// that a component sits in the slot.
    pub fn enable_filter(&mut self, index: u8) -> Result<(), DeviceError> {
        let pair = self
            .filter_switch
            .as_mut()
            .ok_or(DeviceError::NotInitialized(SwitchRole::Filter))?;

        pair.activate_path(index)?;
        info!("Filter {} enabled on {}", index, self.model);
        Ok(())
    }

    /// Switch the LNA in or out of the signal path
    ///
    /// Returns the new LNA state. If the switches fail the LNA is recorded
    /// as off, whatever it was before.
    pub fn toggle_lna(&mut self) -> Result<bool, DeviceError> {
        let pair = self
            .lna_switch
            .as_mut()
            .ok_or(DeviceError::NotInitialized(SwitchRole::Lna))?;

        let target = !self.lna_active;
        let path = if target {
            LNA_ACTIVE_PATH
        } else {
            LNA_BYPASS_PATH
        };

        match pair.activate_path(path) {
            Ok(()) => {
                self.lna_active = target;
                info!(
                    "LNA {} on {}",
                    if target { "enabled" } else { "bypassed" },
                    self.model
                );
                Ok(target)
            }
            Err(e) => {
                self.lna_active = false;
                warn!("LNA toggle failed on {}, treating LNA as off", self.model);
                Err(e.into())
            }
        }
    }

    /// Whether the LNA is in the signal path
    pub fn lna_active(&self) -> bool {
        self.lna_active
    }

    /// Filter slot selected on both filter switches
    pub fn active_filter(&self) -> Option<u8> {
        self.filter_switch.as_ref().and_then(SwitchPair::active_path)
    }

    pub fn filter_switch(&self) -> Option<&SwitchPair> {
        self.filter_switch.as_ref()
    }

    pub fn lna_switch(&self) -> Option<&SwitchPair> {
        self.lna_switch.as_ref()
    }

    /// Human-readable report of the board and its components
    pub fn describe_configuration(&self) -> String {
        ConfigurationInfo(self).to_string()
    }
}

const DELIMITER: &str = "============================================================";

struct ConfigurationInfo<'a>(&'a Device);

impl fmt::Display for ConfigurationInfo<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let device = self.0;

        writeln!(f, "{DELIMITER}")?;
        writeln!(f, "Active board configuration:")?;
        writeln!(f, "{DELIMITER}")?;
        writeln!(f, "Board: {}", device.model)?;

        if let Some(amp) = &device.amplifier {
            writeln!(f, "{DELIMITER}")?;
            writeln!(f, "Amplifier:")?;
            writeln!(f, "Model Number: {}", amp.model_number)?;
            writeln!(f, "Case Style: {}", amp.case_style)?;
            writeln!(f, "Description: {}", amp.description)?;
            writeln!(f, "F Low: {} MHz", amp.f_low)?;
            writeln!(f, "F High: {} MHz", amp.f_high)?;
            writeln!(f, "Gain Typ: {} dB", amp.gain)?;
        }

        writeln!(f, "{DELIMITER}")?;
        writeln!(f, "Filters:")?;
        write!(f, "{DELIMITER}")?;

        for (index, slot) in device.filters.iter().enumerate() {
            let index = index + 1;
            match slot {
                FilterSlot::NotInstalled => {
                    writeln!(f)?;
                    writeln!(f, "Filter {}: Not installed!", index)?;
                }
                FilterSlot::Installed(filter) => {
                    writeln!(f)?;
                    writeln!(f, "Filter {}:", index)?;
                    writeln!(f, "Model Number: {}", filter.model_number)?;
                    writeln!(f, "Case Style: {}", filter.case_style)?;
                    writeln!(f, "Description: {}", filter.description)?;
                    writeln!(f, "Filter Type: {}", filter.filter_type)?;
                    writeln!(f, "Passband F1: {} MHz", filter.passband_f1)?;
                    writeln!(f, "Passband F2: {} MHz", filter.passband_f2)?;
                    writeln!(f, "Stopband F3: {} MHz", filter.stopband_f3)?;
                    writeln!(f, "Stopband F4: {} MHz", filter.stopband_f4)?;
                }
            }
            write!(f, "{DELIMITER}")?;
        }
        Ok(())
    }
}
