//! Tests for separating and encoding features

use wellcast::pipeline::{split_features_target, ColumnEncoding, PipelineError};

#[path = "common/mod.rs"]
mod common;

use common::{create_well_dataframe, FORMATIONS};

#[test]
fn test_feature_names_follow_column_order() {
    let df = create_well_dataframe(30, 7);
    let set = split_features_target(&df, "oil_180", &["api_number".to_string()]).unwrap();

    let mut expected = vec!["lateral_length".to_string(), "proppant_per_ft".to_string()];
    expected.extend(FORMATIONS.iter().map(|f| format!("formation_{}", f)));
    expected.push("noise".to_string());

    assert_eq!(set.features.names(), expected.as_slice());
    assert_eq!(set.features.n_rows(), 30);
    assert_eq!(set.target.len(), 30);
}

#[test]
fn test_one_hot_rows_sum_to_one() {
    let df = create_well_dataframe(30, 8);
    let set = split_features_target(&df, "oil_180", &[]).unwrap();

    let indicator_idx: Vec<usize> = FORMATIONS
        .iter()
        .filter_map(|f| set.features.index_of(&format!("formation_{}", f)))
        .collect();
    for row in set.features.rows() {
        let total: f64 = indicator_idx.iter().map(|&i| row[i]).sum();
        assert_eq!(total, 1.0);
    }

    let (_, encoding) = set
        .encodings
        .iter()
        .find(|(name, _)| name == "formation")
        .unwrap();
    assert!(matches!(encoding, ColumnEncoding::OneHot { categories } if categories.len() <= 3));
}

#[test]
fn test_missing_target_reported_before_encoding() {
    let df = create_well_dataframe(10, 9);
    let err = split_features_target(&df, "gas_180", &[]).unwrap_err();
    match err {
        PipelineError::MissingColumn { column, available } => {
            assert_eq!(column, "gas_180");
            assert!(available.contains(&"oil_180".to_string()));
        }
        other => panic!("expected MissingColumn, got {:?}", other),
    }
}
