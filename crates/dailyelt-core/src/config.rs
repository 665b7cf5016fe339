//! Pipeline configuration
//!
//! Loaded from TOML; every field has a default matching the stock daily run.
//!
//! ```toml
//! sources = ["pos_system", "mobile_events", "web_events"]
//! fail_fast = true
//! min_delay_ms = 1000
//! max_delay_ms = 5000
//! log_file = "main.log"
//! profile = "development"
//! ```

use crate::errors::{ElError, Result};
use crate::extract::{DelayRange, Source};
use crate::logging_facility::Profile;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Source names, extracted in this order
    pub sources: Vec<String>,
    /// Abort the run on the first failing source
    pub fail_fast: bool,
    pub min_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Also append log lines to this file
    pub log_file: Option<PathBuf>,
    pub profile: Profile,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let delay = DelayRange::default();
        let (min_delay_ms, max_delay_ms) = delay.bounds_ms();
        Self {
            sources: Source::ALL.iter().map(|s| s.as_str().to_string()).collect(),
            fail_fast: true,
            min_delay_ms,
            max_delay_ms,
            log_file: None,
            profile: Profile::Development,
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a TOML document
    ///
    /// # Errors
    ///
    /// [`ElError::Config`] for malformed TOML or invalid values.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).map_err(|e| ElError::Config {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate the TOML file at `path`
    ///
    /// # Errors
    ///
    /// [`ElError::Io`] if the file cannot be read, otherwise as
    /// [`PipelineConfig::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ElError::io(path, e))?;
        Self::from_toml_str(&contents)
    }

    /// Source names are not checked here: an unknown name fails the run when
    /// it is dispatched.
    ///
    /// # Errors
    ///
    /// [`ElError::Config`] for an empty source list or an inverted delay
    /// range.
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(ElError::Config {
                reason: "at least one source is required".to_string(),
            });
        }
        self.delay()?;
        Ok(())
    }

    /// # Errors
    ///
    /// [`ElError::Config`] if `min_delay_ms > max_delay_ms`.
    pub fn delay(&self) -> Result<DelayRange> {
        DelayRange::new(self.min_delay_ms, self.max_delay_ms)
    }

    /// Disable the simulated source latency
    pub fn without_delay(mut self) -> Self {
        self.min_delay_ms = 0;
        self.max_delay_ms = 0;
        self
    }
}
