//! Heatmap data assembly and the metric view state.
//!
//! [`build_heatmap_data`] turns parsed records into everything the renderer
//! reads: the month cells, the ordered axes and the global range.
//! [`HeatmapView`] owns that data together with the selected metric and
//! recomputes the color range on every metric change.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::core::domain::{DailyRecord, Metric, MonthAggregate, TemperatureRange, YearFilter};
use crate::error::{HeatmapError, HeatmapResult};
use crate::services::aggregation::{aggregate, global_range, metric_range, most_recent_years};

/// Number of years the extended heatmap keeps.
pub const DEFAULT_RECENT_YEARS: usize = 10;

/// How records are turned into heatmap cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeatmapOptions {
    /// Keep only the N most recent years; `None` keeps every year
    pub recent_years: Option<usize>,
    /// Retain daily records per cell (needed for sparklines)
    pub keep_days: bool,
    pub initial_metric: Metric,
}

impl HeatmapOptions {
    /// Every year, no daily records.
    pub fn basic() -> Self {
        Self {
            recent_years: None,
            keep_days: false,
            initial_metric: Metric::MaxTemperature,
        }
    }

    /// The last decade, with daily records for sparklines.
    pub fn extended() -> Self {
        Self {
            recent_years: Some(DEFAULT_RECENT_YEARS),
            keep_days: true,
            initial_metric: Metric::MaxTemperature,
        }
    }

    pub fn with_recent_years(mut self, years: Option<usize>) -> Self {
        self.recent_years = years;
        self
    }

    pub fn with_initial_metric(mut self, metric: Metric) -> Self {
        self.initial_metric = metric;
        self
    }
}

impl Default for HeatmapOptions {
    fn default() -> Self {
        Self::extended()
    }
}

/// Aggregated cells plus the axes and global range, ready for rendering.
///
/// Always holds at least one cell.
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapData {
    cells: Vec<MonthAggregate>,
    years: Vec<i32>,
    months: Vec<u32>,
    global_range: TemperatureRange,
    initial_metric: Metric,
    #[serde(skip_serializing_if = "Option::is_none")]
    year_filter: Option<YearFilter>,
}

impl HeatmapData {
    /// Cells ordered by year, then month. Absent months have no cell.
    pub fn cells(&self) -> &[MonthAggregate] {
        &self.cells
    }

    /// Years along the x axis, ascending.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// Months along the y axis, always 1 through 12.
    pub fn months(&self) -> &[u32] {
        &self.months
    }

    /// Lowest monthly min to highest monthly max over all cells.
    pub fn global_range(&self) -> TemperatureRange {
        self.global_range
    }

    pub fn initial_metric(&self) -> Metric {
        self.initial_metric
    }

    pub fn year_filter(&self) -> Option<&YearFilter> {
        self.year_filter.as_ref()
    }

    pub fn has_days(&self) -> bool {
        self.cells.iter().any(|c| !c.days.is_empty())
    }
}

/// Compute heatmap data from parsed daily records.
///
/// Fails with [`HeatmapError::EmptyDataset`] when no month survives the year
/// filter, so the renderer never sees an empty or infinite scale domain.
pub fn build_heatmap_data(
    records: &[DailyRecord],
    options: &HeatmapOptions,
) -> HeatmapResult<HeatmapData> {
    let year_filter = options.recent_years.map(|n| most_recent_years(records, n));

    let mut cells = aggregate(records, year_filter.as_ref());
    if cells.is_empty() {
        return Err(HeatmapError::EmptyDataset(
            "no daily records to aggregate".to_string(),
        ));
    }

    if !options.keep_days {
        for cell in &mut cells {
            cell.days.clear();
        }
    }

    let years = match &year_filter {
        Some(filter) => filter.years_ascending(),
        None => cells
            .iter()
            .map(|c| c.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
    };

    let global_range = global_range(&cells)?;

    info!(
        "Aggregated {} records into {} months across {} years, global range {}",
        records.len(),
        cells.len(),
        years.len(),
        global_range
    );

    Ok(HeatmapData {
        cells,
        years,
        months: (1..=12).collect(),
        global_range,
        initial_metric: options.initial_metric,
        year_filter,
    })
}

/// Heatmap data plus the currently selected metric.
///
/// This is the only place the metric changes; the renderer reads it through
/// [`metric`](Self::metric) and [`metric_range`](Self::metric_range).
#[derive(Debug, Clone, Serialize)]
pub struct HeatmapView {
    #[serde(flatten)]
    data: HeatmapData,
    metric: Metric,
    metric_range: TemperatureRange,
}

impl HeatmapView {
    /// Starts on the data's initial metric.
    pub fn new(data: HeatmapData) -> HeatmapResult<Self> {
        let metric = data.initial_metric;
        let metric_range = metric_range(&data.cells, metric)?;
        Ok(Self {
            data,
            metric,
            metric_range,
        })
    }

    pub fn data(&self) -> &HeatmapData {
        &self.data
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn metric_range(&self) -> TemperatureRange {
        self.metric_range
    }

    /// Select `metric` and recompute the color range from the cells.
    pub fn set_metric(&mut self, metric: Metric) -> HeatmapResult<TemperatureRange> {
        let range = metric_range(&self.data.cells, metric)?;
        debug!("Metric set to {}, range {}", metric, range);
        self.metric = metric;
        self.metric_range = range;
        Ok(range)
    }

    /// Switch between max and min, as the page's toggle does.
    pub fn toggle(&mut self) -> HeatmapResult<TemperatureRange> {
        self.set_metric(self.metric.toggled())
    }

    /// Selected metric's value for one cell.
    pub fn cell_value(&self, cell: &MonthAggregate) -> f64 {
        cell.value(self.metric)
    }
}
