//! tonelaje - Tonnage shipment validation in pure Rust
//!
//! Validates tabular shipment records (tonnage by product and state) against
//! declarative business rules and flags statistically unusual tonnage
//! values, producing a per-row explanation and a batch summary.
//!
//! # Design Principles
//!
//! 1. **Row-stable** - no stage reorders, drops, or duplicates rows; every
//!    per-row result re-attaches by positional index
//! 2. **Pure transformations** - each stage takes a table by reference and
//!    returns a new table with extra columns; no shared mutable state
//! 3. **Batch-local** - every invocation fits and scores against only the
//!    rows passed in that call; no persisted models, no history
//!
//! # Quick Start
//!
//! ```no_run
//! use tonelaje::{load_rule_config, pipeline, Table, DEFAULT_SEED};
//!
//! let table = Table::from_csv("data/shipments.csv").unwrap();
//! let config = load_rule_config("config/rules.yml").unwrap();
//!
//! let (annotated, summary) = pipeline::run(&table, &config, DEFAULT_SEED).unwrap();
//! println!(
//!     "{} of {} rows need attention",
//!     summary.rows_with_any_issue, summary.total_rows
//! );
//! annotated.to_csv("shipments_annotated.csv").unwrap();
//! ```

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
// Allow common test patterns
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::redundant_clone,
        clippy::similar_names,
        clippy::unreadable_literal
    )
)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::map_unwrap_or)]

pub mod anomaly;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod rules;
pub mod table;

// Re-exports for convenience
pub use anomaly::{
    detect_anomalies, AnomalyDetector, IsolationForest, ScoreMethod, Scorer, ZScoreScorer,
    DEFAULT_CONTAMINATION, DEFAULT_SEED,
};
pub use error::{Error, Result};
pub use report::{annotate, build_explanation, Summary};
pub use rules::{apply_rules, evaluate_row, load_rule_config, ProductThreshold, RuleConfig, RuleIssue};
pub use table::{RowRef, Table, Value};
