//! Tests for the rules module.

use std::collections::HashMap;

use super::*;
use crate::{
    error::Error,
    table::{Table, Value},
};

fn shipment_table() -> Table {
    let mut table = Table::new(vec![
        "tonnage".to_string(),
        "state".to_string(),
        "product_name".to_string(),
    ])
    .unwrap();
    table
        .push_row(vec![Value::Float(120.0), "TX".into(), "COAL".into()])
        .unwrap();
    table
        .push_row(vec![Value::Null, "CA".into(), "GRAIN".into()])
        .unwrap();
    table
        .push_row(vec![Value::from("n/a"), "TX".into(), "COAL".into()])
        .unwrap();
    table
}

fn row_with(tonnage: Value, state: &str, product: &str) -> Table {
    let mut table = Table::new(vec![
        "tonnage".to_string(),
        "state".to_string(),
        "product_name".to_string(),
    ])
    .unwrap();
    table
        .push_row(vec![tonnage, state.into(), product.into()])
        .unwrap();
    table
}

fn issues_of(table: &Table, config: &RuleConfig, index: usize) -> Vec<RuleIssue> {
    evaluate_row(table.row(index).unwrap(), config)
}

// ========== RuleConfig tests ==========

#[test]
fn test_config_defaults() {
    let config = RuleConfig::default();
    assert!(config.required_columns.is_empty());
    assert_eq!(config.min_tonnage, 0.0);
    assert_eq!(config.max_tonnage, f64::INFINITY);
    assert!(config.allowed_states.is_empty());
    assert!(config.product_thresholds.is_empty());
}

#[test]
fn test_config_from_yaml_partial_document() {
    let config = RuleConfig::from_yaml("min_tonnage: 5\n").unwrap();
    assert_eq!(config.min_tonnage, 5.0);
    assert_eq!(config.max_tonnage, f64::INFINITY);
    assert!(config.allowed_states.is_empty());
    assert!(config.required_columns.is_empty());
}

#[test]
fn test_config_from_yaml_full_document() {
    let document = "\
required_columns:
  - tonnage
  - state
min_tonnage: 1
max_tonnage: 50000
allowed_states:
  - TX
  - CA
product_thresholds:
  COAL:
    max_tonnage: 40000
  GRAIN: {}
";
    let config = RuleConfig::from_yaml(document).unwrap();
    assert_eq!(config.required_columns, vec!["tonnage", "state"]);
    assert_eq!(config.max_tonnage, 50000.0);
    assert_eq!(
        config.product_thresholds["COAL"].max_tonnage,
        Some(40000.0)
    );
    assert_eq!(config.product_thresholds["GRAIN"].max_tonnage, None);
}

#[test]
fn test_config_from_yaml_empty_document() {
    let config = RuleConfig::from_yaml("").unwrap();
    assert_eq!(config.min_tonnage, 0.0);
    assert_eq!(config.max_tonnage, f64::INFINITY);
}

#[test]
fn test_config_rejects_inverted_range() {
    let result = RuleConfig::from_yaml("min_tonnage: 10\nmax_tonnage: 5\n");
    assert!(matches!(result, Err(Error::InvalidConfig { .. })));
}

#[test]
fn test_load_rule_config_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rules.yml");
    std::fs::write(&path, "min_tonnage: 2\nallowed_states: [TX]\n").unwrap();

    let config = load_rule_config(&path).unwrap();
    assert_eq!(config.min_tonnage, 2.0);
    assert_eq!(config.allowed_states, vec!["TX"]);
}

#[test]
fn test_load_rule_config_missing_file() {
    let result = load_rule_config("/nonexistent/rules.yml");
    assert!(matches!(result, Err(Error::Io { .. })));
}

// ========== RuleIssue tests ==========

#[test]
fn test_issue_messages() {
    assert_eq!(RuleIssue::MissingTonnage.to_string(), "Missing tonnage");
    assert_eq!(
        RuleIssue::NonNumericTonnage.to_string(),
        "Non-numeric tonnage"
    );
    assert_eq!(
        RuleIssue::BelowMinimum.to_string(),
        "Tonnage below minimum"
    );
    assert_eq!(
        RuleIssue::AboveMaximum.to_string(),
        "Tonnage above global maximum"
    );
    assert_eq!(RuleIssue::ZeroTonnage.to_string(), "Zero tonnage");
    assert_eq!(
        RuleIssue::DisallowedState.to_string(),
        "State not in allowed list"
    );
    assert_eq!(
        RuleIssue::AboveProductMax { limit: 40000.0 }.to_string(),
        "Tonnage above product max (40000)"
    );
}

// ========== evaluate_row tests ==========

#[test]
fn test_missing_tonnage() {
    let table = row_with(Value::Null, "TX", "COAL");
    let issues = issues_of(&table, &RuleConfig::default(), 0);
    assert_eq!(issues, vec![RuleIssue::MissingTonnage]);
}

#[test]
fn test_nan_tonnage_treated_as_missing() {
    // a NaN float cell is a missing value, not a numeric one
    let config = RuleConfig {
        min_tonnage: 1.0,
        ..RuleConfig::default()
    };
    let table = row_with(Value::Float(f64::NAN), "TX", "COAL");
    let issues = issues_of(&table, &config, 0);
    assert_eq!(issues, vec![RuleIssue::MissingTonnage]);

    let out = apply_rules(&table, &config).unwrap();
    assert_eq!(
        out.row(0).unwrap().get("issues"),
        Some(&Value::Text("Missing tonnage".to_string()))
    );
}

#[test]
fn test_infinite_tonnage_treated_as_missing() {
    let table = row_with(Value::Float(f64::INFINITY), "TX", "COAL");
    let issues = issues_of(&table, &RuleConfig::default(), 0);
    assert_eq!(issues, vec![RuleIssue::MissingTonnage]);
}

#[test]
fn test_non_numeric_tonnage_skips_range_checks() {
    let config = RuleConfig {
        min_tonnage: 100.0,
        ..RuleConfig::default()
    };
    let table = row_with(Value::from("n/a"), "TX", "COAL");
    let issues = issues_of(&table, &config, 0);
    assert_eq!(issues, vec![RuleIssue::NonNumericTonnage]);
}

#[test]
fn test_below_minimum_never_above_maximum() {
    let config = RuleConfig {
        min_tonnage: 10.0,
        max_tonnage: 1000.0,
        ..RuleConfig::default()
    };
    let table = row_with(Value::Float(5.0), "TX", "COAL");
    let issues = issues_of(&table, &config, 0);
    assert_eq!(issues, vec![RuleIssue::BelowMinimum]);
    assert!(!issues.contains(&RuleIssue::AboveMaximum));
}

#[test]
fn test_above_maximum() {
    let config = RuleConfig {
        max_tonnage: 100.0,
        ..RuleConfig::default()
    };
    let table = row_with(Value::Float(250.0), "TX", "COAL");
    let issues = issues_of(&table, &config, 0);
    assert_eq!(issues, vec![RuleIssue::AboveMaximum]);
}

#[test]
fn test_zero_tonnage_flagged_regardless_of_range() {
    let table = row_with(Value::Float(0.0), "TX", "COAL");
    let issues = issues_of(&table, &RuleConfig::default(), 0);
    assert!(issues.contains(&RuleIssue::ZeroTonnage));

    // zero also accumulates with a range violation
    let config = RuleConfig {
        min_tonnage: 1.0,
        ..RuleConfig::default()
    };
    let issues = issues_of(&table, &config, 0);
    assert_eq!(
        issues,
        vec![RuleIssue::BelowMinimum, RuleIssue::ZeroTonnage]
    );
}

#[test]
fn test_empty_allowed_states_never_flags() {
    let table = row_with(Value::Float(5.0), "ZZ", "COAL");
    let issues = issues_of(&table, &RuleConfig::default(), 0);
    assert!(!issues.contains(&RuleIssue::DisallowedState));
}

#[test]
fn test_state_check_trims_whitespace() {
    let config = RuleConfig {
        allowed_states: vec!["TX".to_string()],
        ..RuleConfig::default()
    };
    let table = row_with(Value::Float(5.0), " TX ", "COAL");
    let issues = issues_of(&table, &config, 0);
    assert!(!issues.contains(&RuleIssue::DisallowedState));

    let table = row_with(Value::Float(5.0), "CA", "COAL");
    let issues = issues_of(&table, &config, 0);
    assert!(issues.contains(&RuleIssue::DisallowedState));
}

#[test]
fn test_product_threshold_uppercases_row_name() {
    let mut thresholds = HashMap::new();
    thresholds.insert(
        "COAL".to_string(),
        ProductThreshold {
            max_tonnage: Some(100.0),
        },
    );
    let config = RuleConfig {
        product_thresholds: thresholds,
        ..RuleConfig::default()
    };

    let table = row_with(Value::Float(150.0), "TX", " coal ");
    let issues = issues_of(&table, &config, 0);
    assert_eq!(issues, vec![RuleIssue::AboveProductMax { limit: 100.0 }]);
}

#[test]
fn test_product_threshold_skipped_without_override() {
    let mut thresholds = HashMap::new();
    thresholds.insert("COAL".to_string(), ProductThreshold { max_tonnage: None });
    let config = RuleConfig {
        product_thresholds: thresholds,
        ..RuleConfig::default()
    };

    let table = row_with(Value::Float(1e9), "TX", "COAL");
    let issues = issues_of(&table, &config, 0);
    assert!(issues.is_empty());
}

#[test]
fn test_product_threshold_skipped_for_unlisted_or_empty_product() {
    let mut thresholds = HashMap::new();
    thresholds.insert(
        "COAL".to_string(),
        ProductThreshold {
            max_tonnage: Some(1.0),
        },
    );
    let config = RuleConfig {
        product_thresholds: thresholds,
        ..RuleConfig::default()
    };

    let table = row_with(Value::Float(100.0), "TX", "GRAIN");
    assert!(issues_of(&table, &config, 0).is_empty());

    let table = row_with(Value::Float(100.0), "TX", "  ");
    assert!(issues_of(&table, &config, 0).is_empty());
}

#[test]
fn test_product_threshold_skipped_for_non_numeric_tonnage() {
    let mut thresholds = HashMap::new();
    thresholds.insert(
        "COAL".to_string(),
        ProductThreshold {
            max_tonnage: Some(1.0),
        },
    );
    let config = RuleConfig {
        product_thresholds: thresholds,
        ..RuleConfig::default()
    };

    let table = row_with(Value::from("n/a"), "TX", "COAL");
    let issues = issues_of(&table, &config, 0);
    assert_eq!(issues, vec![RuleIssue::NonNumericTonnage]);
}

#[test]
fn test_spec_example_zero_tonnage_in_texas() {
    let config = RuleConfig {
        min_tonnage: 1.0,
        allowed_states: vec!["TX".to_string()],
        ..RuleConfig::default()
    };
    let table = row_with(Value::Float(0.0), "TX", "X");
    let issues = issues_of(&table, &config, 0);
    assert_eq!(
        render_issues(&issues),
        "Tonnage below minimum, Zero tonnage"
    );
}

// ========== apply_rules tests ==========

#[test]
fn test_apply_rules_appends_columns_and_preserves_rows() {
    let table = shipment_table();
    let config = RuleConfig::default();
    let out = apply_rules(&table, &config).unwrap();

    assert_eq!(out.num_rows(), table.num_rows());
    assert_eq!(out.num_columns(), table.num_columns() + 2);
    assert!(out.has_column("issues"));
    assert!(out.has_column("has_rule_issue"));
    // input untouched
    assert!(!table.has_column("issues"));

    // row 0 clean, rows 1 and 2 flagged
    assert_eq!(
        out.row(0).unwrap().get("has_rule_issue"),
        Some(&Value::Bool(false))
    );
    assert_eq!(
        out.row(0).unwrap().get("issues"),
        Some(&Value::Text(String::new()))
    );
    assert_eq!(
        out.row(1).unwrap().get("issues"),
        Some(&Value::Text("Missing tonnage".to_string()))
    );
    assert_eq!(
        out.row(2).unwrap().get("issues"),
        Some(&Value::Text("Non-numeric tonnage".to_string()))
    );
    assert_eq!(
        out.row(2).unwrap().get("has_rule_issue"),
        Some(&Value::Bool(true))
    );
}

#[test]
fn test_apply_rules_missing_required_column_is_fatal() {
    let table = shipment_table();
    let config = RuleConfig {
        required_columns: vec!["tonnage".to_string(), "shipment_id".to_string()],
        ..RuleConfig::default()
    };
    let result = apply_rules(&table, &config);
    match result {
        Err(Error::ColumnNotFound { name }) => assert_eq!(name, "shipment_id"),
        other => panic!("expected ColumnNotFound, got {other:?}"),
    }
}

#[test]
fn test_apply_rules_present_required_columns_pass() {
    let table = shipment_table();
    let config = RuleConfig {
        required_columns: vec![
            "tonnage".to_string(),
            "state".to_string(),
            "product_name".to_string(),
        ],
        ..RuleConfig::default()
    };
    assert!(apply_rules(&table, &config).is_ok());
}
