//! Error types for loading, aggregating and exporting temperature data.

use polars::prelude::PolarsError;
use serde::Serialize;

/// Result type for heatmap operations
pub type HeatmapResult<T> = Result<T, HeatmapError>;

/// A single CSV row rejected during validation.
///
/// `line` is the 1-based line number in the source text (the header is line 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("line {line}: invalid {column} value '{value}': {reason}")]
pub struct MalformedRow {
    pub line: usize,
    pub column: String,
    pub value: String,
    pub reason: String,
}

impl MalformedRow {
    pub fn new(
        line: usize,
        column: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            line,
            column: column.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}

/// Error type for heatmap operations
#[derive(Debug, thiserror::Error)]
pub enum HeatmapError {
    /// Every rejected row, in input order. Never empty.
    #[error("{} malformed row(s) in {origin}{}", .rows.len(), first_row(.rows))]
    MalformedRows {
        origin: String,
        rows: Vec<MalformedRow>,
    },

    #[error("Missing required column: {0}")]
    MissingColumn(String),

    #[error("Empty dataset: {0}")]
    EmptyDataset(String),

    #[error("Load error: {0}")]
    Load(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Export error: {0}")]
    Export(String),
}

fn first_row(rows: &[MalformedRow]) -> String {
    rows.first()
        .map(|row| format!(", first at {}", row))
        .unwrap_or_default()
}

impl From<PolarsError> for HeatmapError {
    fn from(e: PolarsError) -> Self {
        match e {
            PolarsError::NoData(msg) => HeatmapError::EmptyDataset(msg.to_string()),
            other => HeatmapError::Load(other.to_string()),
        }
    }
}

impl From<std::io::Error> for HeatmapError {
    fn from(e: std::io::Error) -> Self {
        HeatmapError::Load(e.to_string())
    }
}
