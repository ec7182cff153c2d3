//! Straight-line composition of the three pipeline stages.
//!
//! Rule checks, anomaly scoring, then annotation; each stage returns a new
//! table with extra columns and the row order never changes. There is one
//! fatal exit (a missing column) and no partial output: a failing stage
//! yields an error, not a half-annotated table.

use crate::{
    anomaly::detect_anomalies,
    error::Result,
    report::{annotate, Summary},
    rules::{apply_rules, RuleConfig},
    table::Table,
};

/// Runs the full validation-and-scoring pipeline over one batch.
///
/// Equivalent to `apply_rules` → `detect_anomalies` → `annotate`, returning
/// the fully annotated table and its summary.
///
/// # Errors
///
/// Returns [`Error::ColumnNotFound`](crate::Error::ColumnNotFound) if a
/// required column or the `tonnage` column is absent.
///
/// # Example
///
/// ```
/// use tonelaje::{pipeline, RuleConfig, Table, Value, DEFAULT_SEED};
///
/// let mut table = Table::new(vec!["tonnage".into()]).unwrap();
/// table.push_row(vec![Value::Float(120.0)]).unwrap();
///
/// let (annotated, summary) =
///     pipeline::run(&table, &RuleConfig::default(), DEFAULT_SEED).unwrap();
/// assert_eq!(summary.total_rows, 1);
/// assert!(annotated.has_column("explanation"));
/// ```
pub fn run(table: &Table, config: &RuleConfig, seed: u64) -> Result<(Table, Summary)> {
    let with_rules = apply_rules(table, config)?;
    let with_scores = detect_anomalies(&with_rules, seed)?;
    annotate(&with_scores)
}
