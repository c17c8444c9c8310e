//! Filter and amplifier records
//!
//! Records come from vendor catalogs and are only read here: model number
//! and case style drive selection, the numeric fields are passed through
//! for display.

use std::ffi::OsStr;
use std::fs;
use std::panic;
use std::path::{Path, PathBuf};
use std::thread;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::CatalogError;

/// Common fields of catalog records
pub trait Component {
    fn model_number(&self) -> &str;
    fn case_style(&self) -> &str;
    fn description(&self) -> &str;

    /// One-line label for pick lists
    fn summary(&self) -> String {
        format!("{}, {}", self.model_number(), self.description())
    }
}

/// Band-pass filter (frequencies in MHz)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub model_number: String,
    pub case_style: String,
    pub description: String,
    pub filter_type: String,
    pub passband_f1: f64,
    pub passband_f2: f64,
    pub stopband_f3: f64,
    pub stopband_f4: f64,
}

/// Low-noise amplifier (frequencies in MHz, gain in dB)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amplifier {
    pub model_number: String,
    pub case_style: String,
    pub description: String,
    pub f_low: f64,
    pub f_high: f64,
    pub gain: f64,
}

impl Component for Filter {
    fn model_number(&self) -> &str {
        &self.model_number
    }

    fn case_style(&self) -> &str {
        &self.case_style
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl Component for Amplifier {
    fn model_number(&self) -> &str {
        &self.model_number
    }

    fn case_style(&self) -> &str {
        &self.case_style
    }

    fn description(&self) -> &str {
        &self.description
    }
}

/// A filter footprint on the board
///
/// `NotInstalled` is still a valid RF path on the switch; it just leads
/// nowhere useful.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FilterSlot {
    Installed(Filter),
    #[default]
    NotInstalled,
}

impl FilterSlot {
    pub fn filter(&self) -> Option<&Filter> {
        match self {
            Self::Installed(filter) => Some(filter),
            Self::NotInstalled => None,
        }
    }

    pub fn is_installed(&self) -> bool {
        matches!(self, Self::Installed(_))
    }
}

impl From<Filter> for FilterSlot {
    fn from(filter: Filter) -> Self {
        Self::Installed(filter)
    }
}

/// Read-only list of catalog records
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog<T> {
    records: Vec<T>,
}

impl<T> Catalog<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<T: Component> Catalog<T> {
    /// Distinct case styles, sorted
    pub fn case_styles(&self) -> Vec<&str> {
        let mut styles: Vec<&str> = self.records.iter().map(|r| r.case_style()).collect();
        styles.sort_unstable();
        styles.dedup();
        styles
    }

    /// Records available in `case_style`, in catalog order
    pub fn models_in_case<'a>(&'a self, case_style: &'a str) -> impl Iterator<Item = &'a T> {
        self.records
            .iter()
            .filter(move |r| r.case_style() == case_style)
    }

    /// Record with this model number and case style
    pub fn find(&self, model_number: &str, case_style: &str) -> Option<&T> {
        self.records
            .iter()
            .find(|r| r.model_number() == model_number && r.case_style() == case_style)
    }
}

impl<T: DeserializeOwned + Send> Catalog<T> {
    /// Load every `*.json` catalog file in `dir`
    ///
    /// Each file is parsed on its own thread into its own list; the lists
    /// are merged in file-name order after all threads have finished.
    pub fn load_dir(dir: &Path) -> Result<Self, CatalogError> {
        let files = catalog_files(dir)?;
        if files.is_empty() {
            return Err(CatalogError::NoCatalogFiles(dir.to_path_buf()));
        }

        let per_file: Vec<Result<Vec<T>, CatalogError>> = thread::scope(|s| {
            let tasks: Vec<_> = files
                .iter()
                .map(|path| s.spawn(move || load_file::<T>(path)))
                .collect();
            tasks
                .into_iter()
                .map(|task| task.join().unwrap_or_else(|e| panic::resume_unwind(e)))
                .collect()
        });

        let mut records = Vec::new();
        for result in per_file {
            records.extend(result?);
        }

        info!(
            "Loaded {} catalog record(s) from {} file(s) in {}",
            records.len(),
            files.len(),
            dir.display()
        );
        Ok(Self { records })
    }
}

fn catalog_files(dir: &Path) -> Result<Vec<PathBuf>, CatalogError> {
    let entries = fs::read_dir(dir).map_err(|source| CatalogError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|source| CatalogError::Io {
                path: dir.to_path_buf(),
                source,
            })?
            .path();
        if path.is_file() && path.extension() == Some(OsStr::new("json")) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn load_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CatalogError> {
    let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let records: Vec<T> = serde_json::from_str(&text).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Parsed {} record(s) from {}", records.len(), path.display());
    Ok(records)
}
