use chrono::NaiveDate;
use polars::prelude::*;
use std::io::Cursor;
use std::path::Path;

use crate::core::domain::DailyRecord;
use crate::error::{HeatmapError, HeatmapResult, MalformedRow};

pub const DATE_COLUMN: &str = "date";
pub const MAX_TEMPERATURE_COLUMN: &str = "max_temperature";
pub const MIN_TEMPERATURE_COLUMN: &str = "min_temperature";

const REQUIRED_COLUMNS: [&str; 3] = [DATE_COLUMN, MAX_TEMPERATURE_COLUMN, MIN_TEMPERATURE_COLUMN];

/// Outcome of validating one CSV row.
pub type ParsedRow = Result<DailyRecord, MalformedRow>;

/// Every column is read as a string so validation happens row by row here,
/// not in the reader's type inference.
fn string_csv_options() -> CsvReadOptions {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
}

/// Parse a temperature CSV file into a string-typed DataFrame
pub fn read_temperature_csv(csv_path: &Path) -> HeatmapResult<DataFrame> {
    let df = string_csv_options()
        .try_into_reader_with_file_path(Some(csv_path.into()))?
        .finish()?;
    check_required_columns(&df)?;
    Ok(df)
}

/// Parse temperature CSV text into a string-typed DataFrame
pub fn read_temperature_csv_str(text: &str) -> HeatmapResult<DataFrame> {
    let df = string_csv_options()
        .into_reader_with_file_handle(Cursor::new(text.as_bytes().to_vec()))
        .finish()?;
    check_required_columns(&df)?;
    Ok(df)
}

fn check_required_columns(df: &DataFrame) -> HeatmapResult<()> {
    let names = df.get_column_names();
    for required in REQUIRED_COLUMNS {
        if !names.iter().any(|name| name.as_str() == required) {
            return Err(HeatmapError::MissingColumn(required.to_string()));
        }
    }
    Ok(())
}

/// Validate every row of a string-typed DataFrame.
///
/// The result has one entry per row, in input order. Row `i` is reported as
/// line `i + 2` since line 1 is the header.
pub fn dataframe_to_records(df: &DataFrame) -> HeatmapResult<Vec<ParsedRow>> {
    let dates = df.column(DATE_COLUMN)?.str()?;
    let max_temps = df.column(MAX_TEMPERATURE_COLUMN)?.str()?;
    let min_temps = df.column(MIN_TEMPERATURE_COLUMN)?.str()?;

    let rows = (0..df.height())
        .map(|i| parse_row(i + 2, dates.get(i), max_temps.get(i), min_temps.get(i)))
        .collect();

    Ok(rows)
}

/// Validate one row's raw fields into a [`DailyRecord`].
///
/// Fields are checked in column order and the first failure is reported.
pub fn parse_row(
    line: usize,
    date: Option<&str>,
    max_temperature: Option<&str>,
    min_temperature: Option<&str>,
) -> ParsedRow {
    let raw_date = date.unwrap_or_default();
    let date = parse_date(raw_date)
        .map_err(|reason| MalformedRow::new(line, DATE_COLUMN, raw_date, reason))?;

    let raw_max = max_temperature.unwrap_or_default();
    let max = parse_temperature(raw_max)
        .map_err(|reason| MalformedRow::new(line, MAX_TEMPERATURE_COLUMN, raw_max, reason))?;

    let raw_min = min_temperature.unwrap_or_default();
    let min = parse_temperature(raw_min)
        .map_err(|reason| MalformedRow::new(line, MIN_TEMPERATURE_COLUMN, raw_min, reason))?;

    Ok(DailyRecord::new(date, max, min))
}

/// Parse a `YYYY-MM-DD` date.
///
/// The value must split on `-` into exactly three integers that form a real
/// calendar date.
///
/// # Examples
///
/// ```
/// use tempmap::parsing::csv_parser::parse_date;
///
/// assert!(parse_date("2024-02-29").is_ok());
/// assert!(parse_date("2023-02-29").is_err());
/// assert!(parse_date("2024/02/01").is_err());
/// ```
pub fn parse_date(value: &str) -> Result<NaiveDate, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("missing value".to_string());
    }

    let parts: Vec<&str> = value.split('-').collect();
    if parts.len() != 3 {
        return Err("expected YYYY-MM-DD".to_string());
    }

    let year: i32 = parts[0]
        .trim()
        .parse()
        .map_err(|_| "year is not a number".to_string())?;
    let month: u32 = parts[1]
        .trim()
        .parse()
        .map_err(|_| "month is not a number".to_string())?;
    let day: u32 = parts[2]
        .trim()
        .parse()
        .map_err(|_| "day is not a number".to_string())?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| "not a calendar date".to_string())
}

/// Parse a temperature in °C. `NaN` and infinities are rejected.
pub fn parse_temperature(value: &str) -> Result<f64, String> {
    let value = value.trim();
    if value.is_empty() {
        return Err("missing value".to_string());
    }

    let parsed: f64 = value
        .parse()
        .map_err(|_| "not a number".to_string())?;

    if !parsed.is_finite() {
        return Err("not a finite number".to_string());
    }

    Ok(parsed)
}
