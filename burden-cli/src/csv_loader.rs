//! CSV loader for batches of calculation inputs.
//!
//! ## CSV Format
//!
//! One header row naming the input fields, then one row per report. Column
//! order does **not** matter (headers are matched by name) and any column
//! except `turnover_total` and `gross_profit` may be left out. Cells are
//! read exactly like form fields, so `"1 000 000,50"` is a valid amount.
//!
//! | Column                   | Required | Notes |
//! |--------------------------|----------|-------|
//! | `turnover_total`         | yes      | ≥ 0 |
//! | `gross_profit`           | yes      | may be negative |
//! | `turnover_aggregator`    | no       | ≥ 0, at most `turnover_total` |
//! | `subrent`                | no       | may be negative |
//! | `inventory_result`       | no       | may be negative |
//! | `white_payroll_override` | no       | empty cell for no override |
//! | any other input field    | no       | ≥ 0, empty cell means 0 |
//!
//! ### Minimal example
//!
//! ```csv
//! turnover_total,gross_profit
//! 1000000,300000
//! ```
use std::collections::BTreeMap;
use std::path::Path;

use burden_core::{CalculationInput, ValidationErrors, parse_form};
use tracing::debug;

// ---------------------------------------------------------------------------
// Public error type
// ---------------------------------------------------------------------------

/// Errors that can occur while loading or converting CSV data.
#[derive(Debug, thiserror::Error)]
pub enum CsvLoadError {
    /// The underlying CSV reader failed (bad structure, ragged rows, I/O).
    #[error("CSV parse error: {0}")]
    Parse(#[from] csv::Error),

    /// A header names no known input field.
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// A row failed form validation. `row` is 1-based (header = row 0).
    #[error("row {row}: {errors}")]
    InvalidRow {
        row: usize,
        errors: ValidationErrors,
    },

    #[error("cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Core loader
// ---------------------------------------------------------------------------

fn check_headers(headers: &csv::StringRecord) -> Result<(), CsvLoadError> {
    match headers
        .iter()
        .find(|name| !CalculationInput::FIELD_NAMES.iter().any(|field| field == name))
    {
        Some(unknown) => Err(CsvLoadError::UnknownColumn(unknown.to_string())),
        None => Ok(()),
    }
}

/// Convert a single CSV record into a CalculationInput.
///
/// row_number is 1-based (for error messages).
fn convert_record(
    headers: &csv::StringRecord,
    record: &csv::StringRecord,
    row_number: usize,
) -> Result<CalculationInput, CsvLoadError> {
    let fields: BTreeMap<String, String> = headers
        .iter()
        .zip(record.iter())
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect();

    parse_form(&fields).map_err(|errors| CsvLoadError::InvalidRow {
        row: row_number,
        errors,
    })
}

/// Parse CSV text and return one validated input per data row, in file order.
///
/// # Errors
///
/// * [CsvLoadError::Parse] – if the CSV is structurally invalid.
/// * [CsvLoadError::UnknownColumn] – if a header is not an input field.
/// * [CsvLoadError::InvalidRow] – for the first row that fails validation.
pub fn load_from_str(input: &str) -> Result<Vec<CalculationInput>, CsvLoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All) // tolerate whitespace around values
        .flexible(false) // strict column count
        .from_reader(input.as_bytes());

    let headers = reader.headers()?.clone();
    check_headers(&headers)?;

    let inputs = reader
        .records()
        .enumerate()
        .map(|(idx, result)| {
            let record = result?;
            let row_number = idx + 1; // 1-based for user-facing messages
            convert_record(&headers, &record, row_number)
        })
        .collect::<Result<Vec<_>, _>>()?;

    debug!(rows = inputs.len(), "Loaded calculation inputs from CSV");
    Ok(inputs)
}

/// Convenience wrapper: read a file from disk and delegate to [load_from_str].
pub fn load_from_file(path: &Path) -> Result<Vec<CalculationInput>, CsvLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CsvLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    load_from_str(&contents)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
