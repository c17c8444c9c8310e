//! Supported expansion boards
//!
//! Board variants differ only in data: how many filters they carry, which
//! switch selects between them, and whether an LNA bypass switch is fitted.

use std::fmt;
use std::str::FromStr;

use rf_switch::SwitchKind;
use serde::{Deserialize, Serialize};

use crate::error::DeviceError;

/// Expansion board model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BoardModel {
    #[serde(rename = "rpitx-expansion-board-SP3T")]
    Sp3t,
    #[serde(rename = "rpitx-expansion-board-SP4T")]
    Sp4t,
    #[serde(rename = "rpitx-expansion-board-SP6T")]
    Sp6t,
    #[serde(rename = "rpitx-expansion-board-SP3T-LNA")]
    Sp3tLna,
    #[serde(rename = "rpitx-expansion-board-SP4T-LNA")]
    Sp4tLna,
    #[serde(rename = "rpitx-expansion-board-SP6T-LNA")]
    Sp6tLna,
}

/// Switch topology of a board model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSpec {
    pub model: BoardModel,
    /// Model name as printed on the board
    pub name: &'static str,
    /// Filter footprints on the board
    pub filter_count: u8,
    /// Switch selecting between the filters
    pub filter_switch: SwitchKind,
    /// LNA bypass switch, if the board has an LNA footprint
    pub lna_switch: Option<SwitchKind>,
}

static BOARDS: [BoardSpec; 6] = [
    // Boards without LNA
    BoardSpec {
        model: BoardModel::Sp3t,
        name: "rpitx-expansion-board-SP3T",
        filter_count: 3,
        filter_switch: SwitchKind::Sp3t,
        lna_switch: None,
    },
    BoardSpec {
        model: BoardModel::Sp4t,
        name: "rpitx-expansion-board-SP4T",
        filter_count: 4,
        filter_switch: SwitchKind::Sp4t,
        lna_switch: None,
    },
    BoardSpec {
        model: BoardModel::Sp6t,
        name: "rpitx-expansion-board-SP6T",
        filter_count: 6,
        filter_switch: SwitchKind::Sp6t,
        lna_switch: None,
    },
    // Boards with LNA
    BoardSpec {
        model: BoardModel::Sp3tLna,
        name: "rpitx-expansion-board-SP3T-LNA",
        filter_count: 3,
        filter_switch: SwitchKind::Sp3t,
        lna_switch: Some(SwitchKind::Spdt),
    },
    BoardSpec {
        model: BoardModel::Sp4tLna,
        name: "rpitx-expansion-board-SP4T-LNA",
        filter_count: 4,
        filter_switch: SwitchKind::Sp4t,
        lna_switch: Some(SwitchKind::Spdt),
    },
    BoardSpec {
        model: BoardModel::Sp6tLna,
        name: "rpitx-expansion-board-SP6T-LNA",
        filter_count: 6,
        filter_switch: SwitchKind::Sp6t,
        lna_switch: Some(SwitchKind::Spdt),
    },
];

impl BoardModel {
    /// All supported boards, in menu order
    pub const ALL: [BoardModel; 6] = [
        BoardModel::Sp3t,
        BoardModel::Sp4t,
        BoardModel::Sp6t,
        BoardModel::Sp3tLna,
        BoardModel::Sp4tLna,
        BoardModel::Sp6tLna,
    ];

    /// Topology of this board
    pub fn spec(&self) -> &'static BoardSpec {
        // BOARDS is laid out in declaration order
        &BOARDS[*self as usize]
    }

    pub fn name(&self) -> &'static str {
        self.spec().name
    }

    /// Look up a board by its model name
    pub fn from_name(name: &str) -> Option<BoardModel> {
        BOARDS.iter().find(|b| b.name == name).map(|b| b.model)
    }

    pub fn filter_count(&self) -> u8 {
        self.spec().filter_count
    }

    pub fn filter_switch(&self) -> SwitchKind {
        self.spec().filter_switch
    }

    pub fn lna_switch(&self) -> Option<SwitchKind> {
        self.spec().lna_switch
    }

    pub fn supports_lna(&self) -> bool {
        self.lna_switch().is_some()
    }
}

impl fmt::Display for BoardModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BoardModel {
    type Err = DeviceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s.trim()).ok_or_else(|| DeviceError::UnknownBoard(s.to_string()))
    }
}
