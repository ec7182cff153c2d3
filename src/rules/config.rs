//! Rule configuration
//!
//! The rule document is YAML with five recognized keys: `required_columns`,
//! `min_tonnage`, `max_tonnage`, `allowed_states`, `product_thresholds`.
//! Absent keys take their defaults, so an empty document is a valid,
//! restriction-free configuration.

use std::{collections::HashMap, path::Path};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Per-product override thresholds.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductThreshold {
    /// Product-specific tonnage ceiling; `None` disables the check.
    pub max_tonnage: Option<f64>,
}

/// Parsed rule parameters.
///
/// Treated as immutable by the pipeline: every entry point takes
/// `&RuleConfig`, so one loaded configuration can be shared read-only across
/// many invocations.
///
/// Product threshold keys are matched against the row's `product_name` after
/// trimming and uppercasing the row value; the keys themselves are used
/// exactly as written in the config document, so they are expected to be
/// pre-uppercased there.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Columns that must exist in the input table; any absence fails the run.
    pub required_columns: Vec<String>,
    /// Global tonnage floor.
    pub min_tonnage: f64,
    /// Global tonnage ceiling.
    pub max_tonnage: f64,
    /// Permitted state codes; an empty list means no restriction.
    pub allowed_states: Vec<String>,
    /// Per-product overrides keyed by product name.
    pub product_thresholds: HashMap<String, ProductThreshold>,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            required_columns: Vec::new(),
            min_tonnage: 0.0,
            max_tonnage: f64::INFINITY,
            allowed_states: Vec::new(),
            product_thresholds: HashMap::new(),
        }
    }
}

impl RuleConfig {
    /// Parses a rule configuration from a YAML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML or the parsed
    /// configuration is inconsistent.
    pub fn from_yaml(document: &str) -> Result<Self> {
        if document.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(document)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks internal consistency.
    ///
    /// # Errors
    ///
    /// Returns an error if `min_tonnage` exceeds `max_tonnage`.
    pub fn validate(&self) -> Result<()> {
        if self.min_tonnage > self.max_tonnage {
            return Err(Error::invalid_config(format!(
                "min_tonnage ({}) must not exceed max_tonnage ({})",
                self.min_tonnage, self.max_tonnage
            )));
        }
        Ok(())
    }
}

/// Loads a rule configuration from a YAML file.
///
/// # Errors
///
/// Returns an error if the file cannot be read, is not valid YAML, or the
/// configuration is inconsistent.
pub fn load_rule_config(path: impl AsRef<Path>) -> Result<RuleConfig> {
    let path = path.as_ref();
    let document = std::fs::read_to_string(path).map_err(|e| Error::io(e, path))?;
    RuleConfig::from_yaml(&document)
}
