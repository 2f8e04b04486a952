//! Configuration handling for the matching and sampling kernels
//!
//! Supports loading options from a TOML file with `[matcher]` and
//! `[sampling]` tables. Missing keys fall back to the defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::matcher::{MatchOptions, PatternMatcher};
use crate::sampling::SampleOptions;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KernelConfig {
    /// Pattern to search for, if the run includes matching
    pub pattern: Option<String>,

    pub matcher: MatchOptions,

    pub sampling: SampleOptions,
}

impl KernelConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: KernelConfig =
            toml::from_str(content).context("Failed to parse kernel configuration")?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        log::info!("Loading configuration from: {}", path.display());
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;

        let config: KernelConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse configuration file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_toml_string()?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write configuration file: {}", path.display()))?;
        Ok(())
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    /// Run the checks the matcher and sampler constructors would run.
    ///
    /// The sampling table is only checked when it carries a size or a
    /// fraction, since a matching-only run leaves it empty.
    pub fn validate(&self) -> Result<()> {
        let matcher_check = match &self.pattern {
            Some(pattern) => self.matcher.validate_for(pattern),
            None => self.matcher.validate(),
        };
        matcher_check.context("Invalid [matcher] configuration")?;

        if self.has_sampling() {
            self.sampling.validate().context("Invalid [sampling] configuration")?;
        }

        Ok(())
    }

    /// Build the matcher for the configured pattern
    pub fn build_matcher(&self) -> Result<PatternMatcher> {
        let pattern = self
            .pattern
            .as_deref()
            .context("No pattern configured")?;
        let matcher = PatternMatcher::new(pattern, self.matcher.clone())
            .with_context(|| format!("Failed to build matcher for pattern '{}'", pattern))?;
        Ok(matcher)
    }

    fn has_sampling(&self) -> bool {
        self.sampling.size.is_some()
            || self.sampling.fraction.is_some()
            || self.sampling.interval.is_some()
    }
}
