//! Shared test utilities and fixture generators

#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;

use polars::prelude::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tempfile::TempDir;

use wellcast::pipeline::FeatureMatrix;

pub const FORMATIONS: [&str; 3] = ["Bone Spring", "Spraberry", "Wolfcamp"];

/// Create a synthetic well dataset with a strictly positive production target.
///
/// Columns:
/// - `api_number`: identifier, usually dropped
/// - `lateral_length`: strong driver of production
/// - `proppant_per_ft`: moderate driver
/// - `formation`: categorical, adds a per-formation offset
/// - `noise`: unrelated to the target
/// - `oil_180`: target, cumulative oil over the first 180 days
pub fn create_well_dataframe(rows: usize, seed: u64) -> DataFrame {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut api = Vec::with_capacity(rows);
    let mut lateral = Vec::with_capacity(rows);
    let mut proppant = Vec::with_capacity(rows);
    let mut formation = Vec::with_capacity(rows);
    let mut noise = Vec::with_capacity(rows);
    let mut oil = Vec::with_capacity(rows);

    for i in 0..rows {
        let l: f64 = rng.gen_range(4000.0..11000.0);
        let p: f64 = rng.gen_range(0.8..2.5);
        let f = rng.gen_range(0..FORMATIONS.len());
        let offset = [0.0, 1500.0, 4000.0][f];
        api.push(42_000_000i64 + i as i64);
        lateral.push(l);
        proppant.push(p);
        formation.push(FORMATIONS[f]);
        noise.push(rng.gen_range(0.0..1.0f64));
        oil.push(2000.0 + 1.5 * l + 3000.0 * p + offset + rng.gen_range(0.0..500.0));
    }

    df! {
        "api_number" => api,
        "lateral_length" => lateral,
        "proppant_per_ft" => proppant,
        "formation" => formation,
        "noise" => noise,
        "oil_180" => oil,
    }
    .unwrap()
}

/// Small numeric matrix whose target is a linear function of `depth`.
pub fn create_linear_matrix(rows: usize) -> (FeatureMatrix, Vec<f64>) {
    let names = vec!["depth".to_string(), "spacing".to_string()];
    let data: Vec<Vec<f64>> = (0..rows)
        .map(|i| vec![i as f64, ((i * 13) % 7) as f64])
        .collect();
    let targets = data.iter().map(|r| 100.0 + 5.0 * r[0]).collect();
    (FeatureMatrix::new(names, data).unwrap(), targets)
}

/// Create a temporary directory with a test CSV file
pub fn create_temp_csv(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("wells.csv");

    let mut file = std::fs::File::create(&csv_path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();

    (temp_dir, csv_path)
}

/// Create a temporary directory with a test Parquet file
pub fn create_temp_parquet(df: &mut DataFrame) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let parquet_path = temp_dir.path().join("wells.parquet");

    let file = std::fs::File::create(&parquet_path).unwrap();
    ParquetWriter::new(file).finish(df).unwrap();

    (temp_dir, parquet_path)
}

/// Write raw text to a file with the given name in a fresh temporary directory
pub fn create_temp_file(name: &str, content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(name);
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(content.as_bytes()).unwrap();
    (temp_dir, path)
}

/// Assert that a DataFrame has expected shape
pub fn assert_shape(df: &DataFrame, expected_rows: usize, expected_cols: usize) {
    let (rows, cols) = df.shape();
    assert_eq!(
        rows, expected_rows,
        "Row count mismatch: expected {}, got {}",
        expected_rows, rows
    );
    assert_eq!(
        cols, expected_cols,
        "Column count mismatch: expected {}, got {}",
        expected_cols, cols
    );
}
