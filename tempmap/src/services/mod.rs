//! Service layer: aggregation and heatmap assembly.
//!
//! These services sit between the loaders and the renderer. They reduce daily
//! records to monthly cells, compute the color and sparkline ranges, and hold
//! the selected metric.

pub mod aggregation;
pub mod heatmap;

pub use aggregation::{aggregate, global_range, metric_range, most_recent_years};
pub use heatmap::{build_heatmap_data, HeatmapData, HeatmapOptions, HeatmapView};
