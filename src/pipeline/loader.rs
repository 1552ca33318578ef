//! Dataset loader for CSV and Parquet files

use std::fs::File;
use std::path::Path;

use polars::prelude::*;

use crate::pipeline::error::{PipelineError, Result};
use crate::utils::{create_spinner, finish_with_success};

/// Lower-cased file extension, or an empty string.
fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn ensure_exists(path: &Path) -> Result<()> {
    if !path.is_file() {
        return Err(PipelineError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

fn parse_error(path: &Path) -> impl FnOnce(PolarsError) -> PipelineError + '_ {
    move |source| PipelineError::Parse {
        path: path.to_path_buf(),
        source,
    }
}

/// Reject CSV rows whose field count differs from the header's.
///
/// polars pads short rows with nulls, which would surface later as a
/// missing value instead of a malformed file.
fn check_row_widths(path: &Path) -> Result<()> {
    let file = File::open(path)
        .map_err(PolarsError::from)
        .map_err(parse_error(path))?;
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let csv_error = |e: csv::Error| PolarsError::ComputeError(e.to_string().into());
    let expected = rdr
        .byte_headers()
        .map_err(csv_error)
        .map_err(parse_error(path))?
        .len();

    for (row, record) in rdr.byte_records().enumerate() {
        let record = record.map_err(csv_error).map_err(parse_error(path))?;
        if record.len() != expected {
            let line = record.position().map_or(row + 2, |p| p.line() as usize);
            let message = format!(
                "row {} (line {}) has {} fields, header has {}",
                row,
                line,
                record.len(),
                expected
            );
            return Err(parse_error(path)(PolarsError::ShapeMismatch(message.into())));
        }
    }
    Ok(())
}

/// Load a dataset into memory (CSV or Parquet based on extension).
///
/// `infer_schema_length` bounds how many CSV rows are used to type columns;
/// 0 scans the whole file. A cell that does not parse as its column's
/// inferred type, or a row with more or fewer fields than the header, is
/// reported as [`PipelineError::Parse`].
pub fn load_dataset(path: &Path, infer_schema_length: usize) -> Result<DataFrame> {
    ensure_exists(path)?;

    let extension = extension_of(path);
    match extension.as_str() {
        "csv" => {
            check_row_widths(path)?;
            let schema_rows = (infer_schema_length > 0).then_some(infer_schema_length);
            CsvReadOptions::default()
                .with_has_header(true)
                .with_infer_schema_length(schema_rows)
                .try_into_reader_with_file_path(Some(path.to_path_buf()))
                .and_then(|reader| reader.finish())
                .map_err(parse_error(path))
        }
        "parquet" => {
            let file = File::open(path)
                .map_err(PolarsError::from)
                .map_err(parse_error(path))?;
            ParquetReader::new(file).finish().map_err(parse_error(path))
        }
        _ => Err(PipelineError::UnsupportedFormat { extension }),
    }
}

/// Load a dataset behind a spinner and return it with its shape statistics.
///
/// Returns `(df, rows, columns, estimated_memory_mb)`.
pub fn load_dataset_with_progress(
    path: &Path,
    infer_schema_length: usize,
) -> Result<(DataFrame, usize, usize, f64)> {
    let spinner = create_spinner(&format!("Reading {}...", path.display()));
    let result = load_dataset(path, infer_schema_length);
    match result {
        Ok(df) => {
            finish_with_success(&spinner, "Dataset read");
            let (rows, cols) = df.shape();
            let memory_mb = df.estimated_size() as f64 / (1024.0 * 1024.0);
            Ok((df, rows, cols, memory_mb))
        }
        Err(err) => {
            spinner.finish_and_clear();
            Err(err)
        }
    }
}

/// Read only the column names of a dataset, without loading its rows.
pub fn get_column_names(path: &Path) -> Result<Vec<String>> {
    ensure_exists(path)?;

    let extension = extension_of(path);
    let mut lf = match extension.as_str() {
        "csv" => LazyCsvReader::new(path)
            .with_has_header(true)
            .finish()
            .map_err(parse_error(path))?,
        "parquet" => LazyFrame::scan_parquet(path, Default::default())
            .map_err(parse_error(path))?,
        _ => return Err(PipelineError::UnsupportedFormat { extension }),
    };

    let schema = lf.collect_schema().map_err(parse_error(path))?;
    Ok(schema.iter_names().map(|name| name.to_string()).collect())
}
