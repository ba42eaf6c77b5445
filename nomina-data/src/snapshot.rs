//! Fiscal-year snapshots stored as TOML.
//!
//! A snapshot is the serde form of [`FiscalYearConfig`]. Amounts and rates
//! should be written as strings (`rate = "0.095"`) so they are read as exact
//! decimals. A bracket without `upper_bound` is open-ended.

use std::path::Path;

use thiserror::Error;
use tracing::info;

use nomina_core::{FiscalYearConfig, FiscalYearConfigError};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("cannot read snapshot {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid snapshot TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("cannot serialize snapshot: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("snapshot failed validation: {0}")]
    Invalid(#[from] FiscalYearConfigError),
}

/// Parses and validates a snapshot.
///
/// Bracket schedules are checked while parsing; the remaining constants are
/// checked with [`FiscalYearConfig::validate`].
pub fn load_from_str(input: &str) -> Result<FiscalYearConfig, SnapshotError> {
    let config: FiscalYearConfig = toml::from_str(input)?;
    config.validate()?;
    Ok(config)
}

pub fn load_from_file(path: &Path) -> Result<FiscalYearConfig, SnapshotError> {
    let contents = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config = load_from_str(&contents)?;
    info!(path = %path.display(), tax_year = config.tax_year, "loaded fiscal-year snapshot");
    Ok(config)
}

/// Renders `config` as a snapshot that [`load_from_str`] reads back.
pub fn to_toml_string(config: &FiscalYearConfig) -> Result<String, SnapshotError> {
    Ok(toml::to_string_pretty(config)?)
}
