//! Tests for dataset loading

use wellcast::pipeline::{
    get_column_names, load_dataset, load_dataset_with_progress, PipelineError,
};

#[path = "common/mod.rs"]
mod common;

use common::{
    assert_shape, create_temp_csv, create_temp_file, create_temp_parquet, create_well_dataframe,
};

#[test]
fn test_load_csv_file() {
    let mut df = create_well_dataframe(25, 1);
    let (_dir, path) = create_temp_csv(&mut df);

    let loaded = load_dataset(&path, 10000).unwrap();
    assert_shape(&loaded, 25, 6);
}

#[test]
fn test_load_parquet_file() {
    let mut df = create_well_dataframe(25, 2);
    let (_dir, path) = create_temp_parquet(&mut df);

    let (loaded, rows, cols, memory_mb) = load_dataset_with_progress(&path, 10000).unwrap();
    assert_shape(&loaded, 25, 6);
    assert_eq!((rows, cols), (25, 6));
    assert!(memory_mb > 0.0);
}

#[test]
fn test_missing_file() {
    let err = load_dataset(std::path::Path::new("/nonexistent/wells.csv"), 10000).unwrap_err();
    assert!(matches!(err, PipelineError::FileNotFound { .. }));
}

#[test]
fn test_unsupported_extension() {
    let (_dir, path) = create_temp_file("wells.xlsx", "a,b\n1,2\n");
    let err = load_dataset(&path, 10000).unwrap_err();
    assert!(
        matches!(err, PipelineError::UnsupportedFormat { ref extension } if extension == "xlsx")
    );
}

#[test]
fn test_unparsable_numeric_cell_is_parse_error() {
    // The first two rows type `depth` as float; the third cannot be read as one.
    let (_dir, path) = create_temp_file("wells.csv", "depth,oil\n1.5,10\n2.5,20\nabc,30\n");
    let err = load_dataset(&path, 2).unwrap_err();
    assert!(matches!(err, PipelineError::Parse { .. }), "got {:?}", err);
}

#[test]
fn test_row_with_extra_fields_is_parse_error() {
    let (_dir, path) = create_temp_file("wells.csv", "depth,oil\n1.5,10\n2.5,20,99,7\n");
    let err = load_dataset(&path, 10000).unwrap_err();
    assert!(matches!(err, PipelineError::Parse { .. }), "got {:?}", err);
}

#[test]
fn test_row_with_missing_fields_is_parse_error() {
    let (_dir, path) = create_temp_file("wells.csv", "depth,oil\n1.5,10\n2.5\n3.5,30\n");
    let err = load_dataset(&path, 10000).unwrap_err();
    assert!(matches!(err, PipelineError::Parse { .. }), "got {:?}", err);
    assert!(err.to_string().contains("row 1"), "got {}", err);
}

#[test]
fn test_get_column_names_reads_header() {
    let mut df = create_well_dataframe(5, 3);
    let (_dir, path) = create_temp_csv(&mut df);

    let names = get_column_names(&path).unwrap();
    assert_eq!(
        names,
        vec!["api_number", "lateral_length", "proppant_per_ft", "formation", "noise", "oil_180"]
    );
}
