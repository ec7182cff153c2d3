//! Rule evaluation
//!
//! One pure function per row, mapped over the table. Check order is fixed
//! and determines the order of the rendered issue list: tonnage presence and
//! coercion, numeric range, state membership, product override.

use std::fmt;

use crate::{
    error::{Error, Result},
    table::{RowRef, Table, Value},
};

use super::config::RuleConfig;

/// One failed constraint on a row.
#[derive(Debug, Clone, PartialEq)]
pub enum RuleIssue {
    /// Tonnage cell is missing or null.
    MissingTonnage,
    /// Tonnage cell is present but does not coerce to a number.
    NonNumericTonnage,
    /// Tonnage is below the configured global minimum.
    BelowMinimum,
    /// Tonnage is above the configured global maximum.
    AboveMaximum,
    /// Tonnage is exactly zero.
    ZeroTonnage,
    /// State is not in the configured allow-list.
    DisallowedState,
    /// Tonnage exceeds the product-specific ceiling.
    AboveProductMax {
        /// The product's configured ceiling.
        limit: f64,
    },
}

impl fmt::Display for RuleIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingTonnage => write!(f, "Missing tonnage"),
            Self::NonNumericTonnage => write!(f, "Non-numeric tonnage"),
            Self::BelowMinimum => write!(f, "Tonnage below minimum"),
            Self::AboveMaximum => write!(f, "Tonnage above global maximum"),
            Self::ZeroTonnage => write!(f, "Zero tonnage"),
            Self::DisallowedState => write!(f, "State not in allowed list"),
            Self::AboveProductMax { limit } => {
                write!(f, "Tonnage above product max ({limit})")
            }
        }
    }
}

/// Evaluates one row against the configuration.
///
/// Returns the row's issues in evaluation order; an empty list means the row
/// passed every applicable check. Missing or malformed cells degrade per
/// check and never abort the row.
pub fn evaluate_row(row: RowRef<'_>, config: &RuleConfig) -> Vec<RuleIssue> {
    let mut issues = Vec::new();

    // A NaN (or infinite) float cell counts as missing, same as a null.
    let tonnage_cell = row.get("tonnage");
    let tonnage_missing = tonnage_cell.map_or(true, |v| match v {
        Value::Float(f) => !f.is_finite(),
        other => other.is_null(),
    });
    let tonnage = if tonnage_missing {
        issues.push(RuleIssue::MissingTonnage);
        None
    } else {
        let coerced = tonnage_cell.and_then(Value::as_f64);
        match coerced {
            Some(t) => {
                if t < config.min_tonnage {
                    issues.push(RuleIssue::BelowMinimum);
                }
                if t > config.max_tonnage {
                    issues.push(RuleIssue::AboveMaximum);
                }
                if t == 0.0 {
                    issues.push(RuleIssue::ZeroTonnage);
                }
            }
            None => issues.push(RuleIssue::NonNumericTonnage),
        }
        coerced
    };

    if !config.allowed_states.is_empty() {
        let state = row
            .get("state")
            .map(Value::render)
            .unwrap_or_default();
        let state = state.trim();
        if !config.allowed_states.iter().any(|s| s == state) {
            issues.push(RuleIssue::DisallowedState);
        }
    }

    let product = row
        .get("product_name")
        .map(Value::render)
        .unwrap_or_default()
        .trim()
        .to_uppercase();
    if !product.is_empty() {
        if let (Some(threshold), Some(t)) = (config.product_thresholds.get(&product), tonnage) {
            if let Some(limit) = threshold.max_tonnage {
                if t > limit {
                    issues.push(RuleIssue::AboveProductMax { limit });
                }
            }
        }
    }

    issues
}

/// Renders an issue list as the comma-space-joined `issues` cell.
pub fn render_issues(issues: &[RuleIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Classifies every row of `table` against `config`.
///
/// Returns a new table with two appended columns: `issues` (the rendered
/// issue list, empty when clean) and `has_rule_issue` (true iff the row has
/// at least one issue). Rows are never reordered, dropped, or duplicated.
///
/// # Errors
///
/// Returns [`Error::ColumnNotFound`] if any `required_columns` entry is
/// absent from the table; no output is produced in that case.
pub fn apply_rules(table: &Table, config: &RuleConfig) -> Result<Table> {
    for column in &config.required_columns {
        if !table.has_column(column) {
            return Err(Error::column_not_found(column));
        }
    }

    let per_row: Vec<Vec<RuleIssue>> = table
        .rows()
        .map(|row| evaluate_row(row, config))
        .collect();

    let mut out = table.clone();
    out.append_column(
        "issues",
        per_row
            .iter()
            .map(|issues| Value::Text(render_issues(issues)))
            .collect(),
    )?;
    out.append_column(
        "has_rule_issue",
        per_row
            .iter()
            .map(|issues| Value::Bool(!issues.is_empty()))
            .collect(),
    )?;
    Ok(out)
}
