use std::fs::read_to_string;
use std::path::Path;

use menrich_stats::CorrectionMethod;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config value out of range: {key} = {value}")]
    OutOfRange { key: &'static str, value: String },
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Toml(#[from] toml::de::Error),
}

///
/// Settings of an enrichment run. Every key is optional in a TOML file and
/// falls back to its default.
///
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct EnrichmentConfig {
    /// Bases upstream of a TSS forming its promoter window.
    pub promoter_length: u32,
    /// Regions further than this from every promoter window get no gene.
    pub max_association_length: u32,
    /// False discovery rate used to flag significant motifs.
    pub alpha: f64,
    /// Corrected p-value cutoff for writing binding sites.
    pub print_thresh: f64,
    /// Worker count for motif batches.
    pub processes: usize,
    pub correction_method: CorrectionMethod,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        EnrichmentConfig {
            promoter_length: 1000,
            max_association_length: 50000,
            alpha: 0.05,
            print_thresh: 0.05,
            processes: 1,
            correction_method: CorrectionMethod::Independent,
        }
    }
}

impl TryFrom<&Path> for EnrichmentConfig {
    type Error = ConfigError;

    fn try_from(path: &Path) -> Result<Self, Self::Error> {
        let toml_str = read_to_string(path)?;
        let config: EnrichmentConfig = toml::from_str(&toml_str)?;
        config.validate()?;
        Ok(config)
    }
}

impl EnrichmentConfig {
    ///
    /// Check every value against its allowed range.
    ///
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.alpha > 0.0 && self.alpha < 1.0) {
            return Err(ConfigError::OutOfRange {
                key: "alpha",
                value: self.alpha.to_string(),
            });
        }
        if !(0.0..=1.0).contains(&self.print_thresh) {
            return Err(ConfigError::OutOfRange {
                key: "print_thresh",
                value: self.print_thresh.to_string(),
            });
        }
        if self.processes < 1 {
            return Err(ConfigError::OutOfRange {
                key: "processes",
                value: self.processes.to_string(),
            });
        }
        Ok(())
    }
}
