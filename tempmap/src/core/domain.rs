//! Domain models for daily temperature readings and their monthly summaries.
//!
//! This module provides the core data structures shared by the loader, the
//! aggregator and the renderer: parsed daily records, per-month aggregates,
//! the metric selector and temperature ranges.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// One day of readings, validated and immutable once parsed.
///
/// `year`, `month` and `day` are the calendar components of `date`, kept
/// alongside it so grouping never has to re-derive them.
///
/// # Examples
///
/// ```
/// use tempmap::core::domain::DailyRecord;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2020, 1, 15).unwrap();
/// let record = DailyRecord::new(date, 10.0, -2.0);
///
/// assert_eq!(record.year, 2020);
/// assert_eq!(record.month, 1);
/// assert_eq!(record.day, 15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub max_temperature: f64,
    pub min_temperature: f64,
}

impl DailyRecord {
    /// Creates a record from a calendar date and the day's extremes in °C.
    pub fn new(date: NaiveDate, max_temperature: f64, min_temperature: f64) -> Self {
        Self {
            date,
            year: date.year(),
            month: date.month(),
            day: date.day(),
            max_temperature,
            min_temperature,
        }
    }

    /// Grouping key of the month this record belongs to.
    pub fn year_month(&self) -> YearMonth {
        YearMonth::new(self.year, self.month)
    }

    /// Returns `true` when the day's maximum is below its minimum.
    ///
    /// Such rows are kept; the loader only counts them.
    pub fn is_inverted(&self) -> bool {
        self.max_temperature < self.min_temperature
    }

    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::MaxTemperature => self.max_temperature,
            Metric::MinTemperature => self.min_temperature,
        }
    }
}

/// A (year, month) pair. Orders by year, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Reduced max/min summary of one calendar month.
///
/// `max_temperature` is the highest daily maximum of the month and
/// `min_temperature` the lowest daily minimum. `days` holds the month's
/// readings ordered by date; it is empty when the caller did not ask to keep
/// them (the basic heatmap has no sparklines).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthAggregate {
    pub year: i32,
    pub month: u32,
    pub max_temperature: f64,
    pub min_temperature: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub days: Vec<DailyRecord>,
}

impl MonthAggregate {
    pub fn year_month(&self) -> YearMonth {
        YearMonth::new(self.year, self.month)
    }

    /// Value of the aggregate for the selected metric.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempmap::core::domain::{Metric, MonthAggregate};
    ///
    /// let cell = MonthAggregate {
    ///     year: 2020,
    ///     month: 1,
    ///     max_temperature: 15.0,
    ///     min_temperature: -5.0,
    ///     days: vec![],
    /// };
    /// assert_eq!(cell.value(Metric::MaxTemperature), 15.0);
    /// assert_eq!(cell.value(Metric::MinTemperature), -5.0);
    /// ```
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::MaxTemperature => self.max_temperature,
            Metric::MinTemperature => self.min_temperature,
        }
    }
}

/// Which monthly extreme colors the heatmap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[default]
    MaxTemperature,
    MinTemperature,
}

impl Metric {
    /// Column name of the metric in the input CSV.
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::MaxTemperature => "max_temperature",
            Metric::MinTemperature => "min_temperature",
        }
    }

    /// Short label used in the page's toggle control.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::MaxTemperature => "Max",
            Metric::MinTemperature => "Min",
        }
    }

    /// The other metric.
    pub fn toggled(self) -> Self {
        match self {
            Metric::MaxTemperature => Metric::MinTemperature,
            Metric::MinTemperature => Metric::MaxTemperature,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "max_temperature" | "max" => Ok(Metric::MaxTemperature),
            "min_temperature" | "min" => Ok(Metric::MinTemperature),
            other => Err(format!(
                "Unknown metric '{}', expected max_temperature or min_temperature",
                other
            )),
        }
    }
}

/// Temperature interval in °C.
///
/// Ranges folded from one series of values have `min <= max`. The global
/// range pairs the lowest monthly min with the highest monthly max, so it can
/// come out inverted when every record has its max below its min.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureRange {
    pub min: f64,
    pub max: f64,
}

impl TemperatureRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Folds a sequence of values into the range that covers them.
    ///
    /// Returns `None` for an empty sequence instead of an infinite range.
    ///
    /// # Examples
    ///
    /// ```
    /// use tempmap::core::domain::TemperatureRange;
    ///
    /// let range = TemperatureRange::from_values([3.0, -1.5, 7.25]).unwrap();
    /// assert_eq!(range, TemperatureRange::new(-1.5, 7.25));
    /// assert!(TemperatureRange::from_values(Vec::<f64>::new()).is_none());
    /// ```
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        values.into_iter().fold(None, |acc, v| match acc {
            None => Some(Self::new(v, v)),
            Some(r) => Some(Self::new(r.min.min(v), r.max.max(v))),
        })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

impl fmt::Display for TemperatureRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.1}, {:.1}]", self.min, self.max)
    }
}

/// Set of calendar years a heatmap is restricted to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct YearFilter {
    years: BTreeSet<i32>,
}

impl YearFilter {
    pub fn new<I>(years: I) -> Self
    where
        I: IntoIterator<Item = i32>,
    {
        Self {
            years: years.into_iter().collect(),
        }
    }

    pub fn contains(&self, year: i32) -> bool {
        self.years.contains(&year)
    }

    pub fn len(&self) -> usize {
        self.years.len()
    }

    pub fn is_empty(&self) -> bool {
        self.years.is_empty()
    }

    /// Years in ascending order, as they appear along the x axis.
    pub fn years_ascending(&self) -> Vec<i32> {
        self.years.iter().copied().collect()
    }
}
