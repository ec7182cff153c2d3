//! Declarative rule checks for shipment tables
//!
//! Classifies each row against structural and numeric constraints from a
//! [`RuleConfig`]: tonnage presence and range, allowed states, and
//! per-product tonnage overrides. Evaluation is a pure per-row function
//! mapped over the table; [`apply_rules`] appends the `issues` and
//! `has_rule_issue` columns without touching any existing cell.
//!
//! # Example
//!
//! ```ignore
//! use tonelaje::rules::{apply_rules, load_rule_config};
//!
//! let config = load_rule_config("config/rules.yml")?;
//! let checked = apply_rules(&table, &config)?;
//! ```

mod config;
mod engine;

#[cfg(test)]
mod tests;

pub use config::{load_rule_config, ProductThreshold, RuleConfig};
pub use engine::{apply_rules, evaluate_row, render_issues, RuleIssue};
