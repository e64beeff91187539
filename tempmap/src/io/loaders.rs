use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;
use tracing::{info, warn};

use crate::core::domain::DailyRecord;
use crate::error::{HeatmapError, HeatmapResult, MalformedRow};
use crate::parsing::csv_parser::{self, ParsedRow};

/// What to do with rows that fail validation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedRowPolicy {
    /// Any malformed row fails the whole load
    #[default]
    Reject,
    /// Malformed rows are dropped and logged
    Skip,
}

impl FromStr for MalformedRowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reject" => Ok(MalformedRowPolicy::Reject),
            "skip" => Ok(MalformedRowPolicy::Skip),
            other => Err(format!(
                "Unknown malformed row policy '{}', expected reject or skip",
                other
            )),
        }
    }
}

/// Result of loading temperature data
#[derive(Debug, Clone)]
pub struct LoadReport {
    /// Where the data came from (a path or a caller-supplied label)
    pub origin: String,
    pub records: Vec<DailyRecord>,
    /// Rows dropped under [`MalformedRowPolicy::Skip`]
    pub malformed: Vec<MalformedRow>,
    /// Records whose max is below their min; kept, only counted
    pub inverted_rows: usize,
    pub total_rows: usize,
}

impl LoadReport {
    fn from_rows(origin: impl Into<String>, rows: Vec<ParsedRow>) -> Self {
        let total_rows = rows.len();
        let mut records = Vec::with_capacity(total_rows);
        let mut malformed = Vec::new();

        for row in rows {
            match row {
                Ok(record) => records.push(record),
                Err(bad) => malformed.push(bad),
            }
        }

        let inverted_rows = records.iter().filter(|r| r.is_inverted()).count();

        Self {
            origin: origin.into(),
            records,
            malformed,
            inverted_rows,
            total_rows,
        }
    }

    /// `true` when every row was valid
    pub fn is_clean(&self) -> bool {
        self.malformed.is_empty()
    }

    fn apply_policy(self, policy: MalformedRowPolicy) -> HeatmapResult<Self> {
        if self.malformed.is_empty() {
            return Ok(self);
        }

        match policy {
            MalformedRowPolicy::Reject => Err(HeatmapError::MalformedRows {
                origin: self.origin,
                rows: self.malformed,
            }),
            MalformedRowPolicy::Skip => {
                for bad in &self.malformed {
                    warn!("Skipping malformed row in {}: {}", self.origin, bad);
                }
                warn!(
                    "Skipped {} of {} rows in {}",
                    self.malformed.len(),
                    self.total_rows,
                    self.origin
                );
                Ok(self)
            }
        }
    }

    fn log_summary(&self) {
        if self.inverted_rows > 0 {
            warn!(
                "{} row(s) in {} have max_temperature below min_temperature",
                self.inverted_rows, self.origin
            );
        }
        info!(
            "Loaded {} daily records from {}",
            self.records.len(),
            self.origin
        );
    }
}

/// Unified interface for loading daily temperature data from CSV
#[derive(Debug, Clone, Copy, Default)]
pub struct TemperatureLoader {
    policy: MalformedRowPolicy,
}

impl TemperatureLoader {
    pub fn new(policy: MalformedRowPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MalformedRowPolicy {
        self.policy
    }

    /// Load temperature data from CSV text
    pub fn load_from_str(&self, text: &str, origin: &str) -> HeatmapResult<LoadReport> {
        let df = csv_parser::read_temperature_csv_str(text)?;
        let rows = csv_parser::dataframe_to_records(&df)?;
        self.finish(origin, rows)
    }

    /// Load temperature data from a CSV file
    pub fn load_from_file(&self, path: &Path) -> HeatmapResult<LoadReport> {
        let origin = path.display().to_string();
        let df = csv_parser::read_temperature_csv(path).map_err(|e| with_origin(e, &origin))?;
        let rows = csv_parser::dataframe_to_records(&df)?;
        self.finish(&origin, rows)
    }

    /// Read a CSV file without blocking the runtime, then parse it.
    ///
    /// There is no retry: a read failure is returned as [`HeatmapError::Load`].
    pub async fn fetch(&self, path: &Path) -> HeatmapResult<LoadReport> {
        let origin = path.display().to_string();
        let text = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| HeatmapError::Load(format!("Failed to read {}: {}", origin, e)))?;
        self.load_from_str(&text, &origin)
            .map_err(|e| with_origin(e, &origin))
    }

    fn finish(&self, origin: &str, rows: Vec<ParsedRow>) -> HeatmapResult<LoadReport> {
        let report = LoadReport::from_rows(origin, rows).apply_policy(self.policy)?;
        report.log_summary();
        Ok(report)
    }
}

/// Prefix the message with `origin` unless it already names it.
fn with_origin(error: HeatmapError, origin: &str) -> HeatmapError {
    let prefixed = |msg: String| {
        if msg.contains(origin) {
            msg
        } else {
            format!("{}: {}", origin, msg)
        }
    };
    match error {
        HeatmapError::Load(msg) => HeatmapError::Load(prefixed(msg)),
        HeatmapError::EmptyDataset(msg) => HeatmapError::EmptyDataset(prefixed(msg)),
        other => other,
    }
}
