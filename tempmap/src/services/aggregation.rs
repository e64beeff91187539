use std::collections::{BTreeMap, BTreeSet};

use crate::core::domain::{
    DailyRecord, Metric, MonthAggregate, TemperatureRange, YearFilter, YearMonth,
};
use crate::error::{HeatmapError, HeatmapResult};

/// Running max/min of one month while records are folded in.
#[derive(Debug, Clone)]
struct MonthAccumulator {
    max: f64,
    min: f64,
    days: Vec<DailyRecord>,
}

impl MonthAccumulator {
    fn new(record: &DailyRecord) -> Self {
        Self {
            max: record.max_temperature,
            min: record.min_temperature,
            days: vec![*record],
        }
    }

    fn update(&mut self, record: &DailyRecord) {
        self.max = f64::max(self.max, record.max_temperature);
        self.min = f64::min(self.min, record.min_temperature);
        self.days.push(*record);
    }

    fn finish(mut self, key: YearMonth) -> MonthAggregate {
        // Duplicate dates are ordered by value so the output is permutation-free
        self.days.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then(a.max_temperature.total_cmp(&b.max_temperature))
                .then(a.min_temperature.total_cmp(&b.min_temperature))
        });
        MonthAggregate {
            year: key.year,
            month: key.month,
            max_temperature: self.max,
            min_temperature: self.min,
            days: self.days,
        }
    }
}

/// Group daily records by (year, month) and reduce each group to its extremes.
///
/// Records outside `year_filter` are dropped before grouping. Only months that
/// have at least one record are produced. The output is ordered by year, then
/// month, and each month's `days` are ordered by date, so the result does not
/// depend on the order of `records`.
///
/// # Examples
///
/// ```
/// use tempmap::core::domain::DailyRecord;
/// use tempmap::services::aggregation::aggregate;
/// use chrono::NaiveDate;
///
/// let day = |d| NaiveDate::from_ymd_opt(2020, 1, d).unwrap();
/// let records = vec![
///     DailyRecord::new(day(1), 10.0, -2.0),
///     DailyRecord::new(day(2), 15.0, -5.0),
/// ];
/// let cells = aggregate(&records, None);
/// assert_eq!(cells[0].max_temperature, 15.0);
/// assert_eq!(cells[0].min_temperature, -5.0);
/// ```
pub fn aggregate(records: &[DailyRecord], year_filter: Option<&YearFilter>) -> Vec<MonthAggregate> {
    let mut groups: BTreeMap<YearMonth, MonthAccumulator> = BTreeMap::new();

    for record in records {
        if let Some(filter) = year_filter {
            if !filter.contains(record.year) {
                continue;
            }
        }

        groups
            .entry(record.year_month())
            .and_modify(|acc| acc.update(record))
            .or_insert_with(|| MonthAccumulator::new(record));
    }

    groups
        .into_iter()
        .map(|(key, acc)| acc.finish(key))
        .collect()
}

/// The `n` most recent distinct years present in `records`.
///
/// If fewer than `n` distinct years exist, all of them are kept.
pub fn most_recent_years(records: &[DailyRecord], n: usize) -> YearFilter {
    let distinct: BTreeSet<i32> = records.iter().map(|r| r.year).collect();
    YearFilter::new(distinct.into_iter().rev().take(n))
}

/// Shared scale for the sparklines: lowest monthly min to highest monthly max.
pub fn global_range(cells: &[MonthAggregate]) -> HeatmapResult<TemperatureRange> {
    let min = TemperatureRange::from_values(cells.iter().map(|c| c.min_temperature));
    let max = TemperatureRange::from_values(cells.iter().map(|c| c.max_temperature));

    match (min, max) {
        (Some(min), Some(max)) => Ok(TemperatureRange::new(min.min, max.max)),
        _ => Err(HeatmapError::EmptyDataset(
            "cannot compute a temperature range without any month".to_string(),
        )),
    }
}

/// Range of the selected metric over all months; drives the color scale.
pub fn metric_range(cells: &[MonthAggregate], metric: Metric) -> HeatmapResult<TemperatureRange> {
    TemperatureRange::from_values(cells.iter().map(|c| c.value(metric))).ok_or_else(|| {
        HeatmapError::EmptyDataset(format!(
            "cannot compute the {} range without any month",
            metric
        ))
    })
}
