//! Export of aggregated heatmap data.

use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use tracing::info;

use crate::core::domain::MonthAggregate;
use crate::error::{HeatmapError, HeatmapResult};
use crate::services::heatmap::HeatmapView;

/// Convert month aggregates to a Polars DataFrame.
///
/// Columns: `year`, `month`, `max_temperature`, `min_temperature` and `days`
/// (number of daily records retained for the month, 0 when days were not kept).
pub fn aggregates_to_dataframe(cells: &[MonthAggregate]) -> HeatmapResult<DataFrame> {
    let n = cells.len();
    let mut years = Vec::with_capacity(n);
    let mut months = Vec::with_capacity(n);
    let mut max_temps = Vec::with_capacity(n);
    let mut min_temps = Vec::with_capacity(n);
    let mut day_counts = Vec::with_capacity(n);

    for cell in cells {
        years.push(cell.year);
        months.push(cell.month);
        max_temps.push(cell.max_temperature);
        min_temps.push(cell.min_temperature);
        day_counts.push(cell.days.len() as u32);
    }

    let df = df!(
        "year" => years,
        "month" => months,
        "max_temperature" => max_temps,
        "min_temperature" => min_temps,
        "days" => day_counts,
    )?;

    Ok(df)
}

/// Write month aggregates as CSV
pub fn write_aggregates_csv(cells: &[MonthAggregate], path: &Path) -> HeatmapResult<()> {
    let mut df = aggregates_to_dataframe(cells)?;
    let mut file = File::create(path)
        .map_err(|e| HeatmapError::Export(format!("Failed to create {}: {}", path.display(), e)))?;

    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .map_err(|e| HeatmapError::Export(format!("Failed to write {}: {}", path.display(), e)))?;

    info!("Wrote {} month aggregates to {}", cells.len(), path.display());
    Ok(())
}

/// Write the heatmap view (cells, axes, ranges, selected metric) as pretty JSON
pub fn write_heatmap_json(view: &HeatmapView, path: &Path) -> HeatmapResult<()> {
    let json = serde_json::to_string_pretty(view)
        .map_err(|e| HeatmapError::Export(format!("Failed to serialize heatmap data: {}", e)))?;
    std::fs::write(path, json)
        .map_err(|e| HeatmapError::Export(format!("Failed to write {}: {}", path.display(), e)))?;

    info!("Wrote heatmap data to {}", path.display());
    Ok(())
}
