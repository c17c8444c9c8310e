//! Switch truth tables
//!
//! A truth table maps a 1-based RF path index to the level of every
//! control pin of a switch, in pin declaration order.

use std::fmt;

use crate::error::SwitchError;
use crate::gpio::Level::{self, High as H, Low as L};

// RF common to RF1..RFn
const SPDT_PATHS: &[&[Level]] = &[&[L, L], &[L, H]];
const SP3T_PATHS: &[&[Level]] = &[&[L, L, L], &[L, L, H], &[H, L, L]];
const SP4T_PATHS: &[&[Level]] = &[&[L, L, L], &[L, L, H], &[H, L, L], &[H, L, H]];
const SP6T_PATHS: &[&[Level]] = &[
    &[L, L, L],
    &[L, L, H],
    &[L, H, L],
    &[L, H, H],
    &[H, L, L],
    &[H, L, H],
];

/// Validated, immutable path → pin levels mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTable {
    arity: usize,
    paths: Vec<Vec<Level>>,
}

impl TruthTable {
    /// Build a table whose first row is path 1
    ///
    /// Rejects an empty table, rows of unequal length and tables with more
    /// paths than a path index can address.
    pub fn new(paths: Vec<Vec<Level>>) -> Result<Self, SwitchError> {
        let arity = match paths.first() {
            Some(row) if !row.is_empty() => row.len(),
            Some(_) => {
                return Err(SwitchError::InvalidTruthTable(
                    "path 1 drives no pins".to_string(),
                ))
            }
            None => {
                return Err(SwitchError::InvalidTruthTable(
                    "table has no paths".to_string(),
                ))
            }
        };

        if paths.len() > usize::from(u8::MAX) {
            return Err(SwitchError::InvalidTruthTable(format!(
                "{} paths exceed the maximum of {}",
                paths.len(),
                u8::MAX
            )));
        }

        if let Some(index) = paths.iter().position(|row| row.len() != arity) {
            return Err(SwitchError::InvalidTruthTable(format!(
                "path {} drives {} pins, expected {}",
                index + 1,
                paths[index].len(),
                arity
            )));
        }

        Ok(Self { arity, paths })
    }

    /// Number of pins every path drives
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Number of paths; valid indices are `1..=path_count()`
    pub fn path_count(&self) -> u8 {
        // Bounded by the check in `new`
        self.paths.len() as u8
    }

    /// Pin levels for `path`, or `None` if the table has no such path
    pub fn levels(&self, path: u8) -> Option<&[Level]> {
        let index = usize::from(path).checked_sub(1)?;
        self.paths.get(index).map(Vec::as_slice)
    }

    /// All valid path indices in ascending order
    pub fn paths(&self) -> impl Iterator<Item = u8> {
        1..=self.path_count()
    }
}

/// RF switch variants fitted to the expansion boards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SwitchKind {
    /// Single pole, double throw (LNA bypass)
    Spdt,
    /// Single pole, triple throw
    Sp3t,
    /// Single pole, four throw
    Sp4t,
    /// Single pole, six throw
    Sp6t,
}

impl SwitchKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Spdt => "SPDT",
            Self::Sp3t => "SP3T",
            Self::Sp4t => "SP4T",
            Self::Sp6t => "SP6T",
        }
    }

    fn rows(&self) -> &'static [&'static [Level]] {
        match self {
            Self::Spdt => SPDT_PATHS,
            Self::Sp3t => SP3T_PATHS,
            Self::Sp4t => SP4T_PATHS,
            Self::Sp6t => SP6T_PATHS,
        }
    }

    /// Number of RF paths this switch can select
    pub fn path_count(&self) -> u8 {
        self.rows().len() as u8
    }

    /// Number of control pins
    pub fn control_pins(&self) -> usize {
        self.rows()[0].len()
    }

    /// Truth table of this switch
    pub fn truth_table(&self) -> TruthTable {
        TruthTable {
            arity: self.control_pins(),
            paths: self.rows().iter().map(|row| row.to_vec()).collect(),
        }
    }
}

impl fmt::Display for SwitchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
