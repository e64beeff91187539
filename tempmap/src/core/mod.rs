//! Core domain types.

pub mod domain;

pub use domain::{DailyRecord, Metric, MonthAggregate, TemperatureRange, YearFilter, YearMonth};
