//! Per-row explanations and the batch summary
//!
//! Reconciles the rule-engine and anomaly-scorer signals into one
//! human-readable explanation per row plus a fixed-shape [`Summary`] over the
//! whole batch. Pure function of the annotated columns produced by the
//! earlier stages; recomputed on every call, never persisted.

use serde::Serialize;

use crate::{
    error::{Error, Result},
    table::{RowRef, Table, Value},
};

/// Batch-level issue counts over a fully annotated table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Number of rows in the batch.
    pub total_rows: usize,
    /// Rows with at least one rule issue.
    pub rows_with_rule_issues: usize,
    /// Rows flagged by the anomaly scorer.
    pub rows_with_anomalies: usize,
    /// Rows with a rule issue, an anomaly flag, or both.
    pub rows_with_any_issue: usize,
}

fn flag(row: RowRef<'_>, column: &str) -> bool {
    row.get(column).and_then(Value::as_bool).unwrap_or(false)
}

/// Builds one row's explanation from its annotation columns.
///
/// Rule-issue message first, then the anomaly message, joined with `" | "`;
/// exactly `"No issues detected"` when neither signal fired.
pub fn build_explanation(
    has_rule_issue: bool,
    issues: &str,
    is_anomaly: bool,
    anomaly_score: f64,
) -> String {
    let mut messages = Vec::new();
    if has_rule_issue {
        messages.push(format!("Rule issues: {issues}"));
    }
    if is_anomaly {
        messages.push(format!("Anomaly flagged (score={anomaly_score:.3})"));
    }
    if messages.is_empty() {
        return "No issues detected".to_string();
    }
    messages.join(" | ")
}

/// Annotates a scored table with explanations and computes the summary.
///
/// Appends `explanation` (text) and `has_any_issue` (bool) columns and counts
/// the batch totals. Row order and count are preserved.
///
/// # Errors
///
/// Returns [`Error::ColumnNotFound`] if any of the expected upstream columns
/// (`issues`, `has_rule_issue`, `anomaly_score`, `is_anomaly`) is absent;
/// well-formed output of the earlier stages never fails.
pub fn annotate(table: &Table) -> Result<(Table, Summary)> {
    for column in ["issues", "has_rule_issue", "anomaly_score", "is_anomaly"] {
        if !table.has_column(column) {
            return Err(Error::column_not_found(column));
        }
    }

    let mut explanations = Vec::with_capacity(table.num_rows());
    let mut any_issue = Vec::with_capacity(table.num_rows());
    let mut summary = Summary {
        total_rows: table.num_rows(),
        rows_with_rule_issues: 0,
        rows_with_anomalies: 0,
        rows_with_any_issue: 0,
    };

    for row in table.rows() {
        let has_rule_issue = flag(row, "has_rule_issue");
        let is_anomaly = flag(row, "is_anomaly");
        let issues = row
            .get("issues")
            .and_then(Value::as_text)
            .unwrap_or_default();
        let score = row
            .get("anomaly_score")
            .and_then(Value::as_f64)
            .unwrap_or(0.0);

        let has_any = has_rule_issue || is_anomaly;
        summary.rows_with_rule_issues += usize::from(has_rule_issue);
        summary.rows_with_anomalies += usize::from(is_anomaly);
        summary.rows_with_any_issue += usize::from(has_any);

        explanations.push(Value::Text(build_explanation(
            has_rule_issue,
            issues,
            is_anomaly,
            score,
        )));
        any_issue.push(Value::Bool(has_any));
    }

    let mut out = table.clone();
    out.append_column("explanation", explanations)?;
    out.append_column("has_any_issue", any_issue)?;
    Ok((out, summary))
}
