//! # tempmap
//!
//! Year × month temperature heatmaps from daily temperature readings.
//!
//! The crate reads a CSV of daily readings (`date,max_temperature,min_temperature`),
//! validates every row, groups the readings by calendar month and renders a
//! standalone HTML page with an inline SVG heatmap, a color legend, tooltips and
//! a max/min metric toggle. The extended variant restricts the map to the most
//! recent decade and draws a daily sparkline inside every cell.
//!
//! ## Architecture
//!
//! - [`core`]: Domain types (`DailyRecord`, `MonthAggregate`, `Metric`, ranges)
//! - [`parsing`]: CSV reading and per-row validation
//! - [`io`]: Loaders producing a [`io::LoadReport`], plus aggregate export
//! - [`services`]: Aggregation, range computation and the metric view state
//! - [`render`]: Scales, color ramp and the HTML/SVG renderer
//! - [`config`]: TOML configuration
//!
//! ## Example
//!
//! ```no_run
//! use tempmap::io::{MalformedRowPolicy, TemperatureLoader};
//! use tempmap::render::HeatmapRenderer;
//! use tempmap::services::heatmap::{build_heatmap_data, HeatmapOptions, HeatmapView};
//! use std::path::Path;
//!
//! let report = TemperatureLoader::new(MalformedRowPolicy::Reject)
//!     .load_from_file(Path::new("temperature_daily.csv"))
//!     .expect("Failed to load");
//! let options = HeatmapOptions::extended();
//! let data = build_heatmap_data(&report.records, &options).expect("Empty dataset");
//! let view = HeatmapView::new(data).expect("Empty dataset");
//! let html = HeatmapRenderer::extended().render_html(&view).expect("Render failed");
//! std::fs::write("heatmap.html", html).expect("Failed to write");
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod parsing;
pub mod render;
pub mod services;

pub use error::{HeatmapError, HeatmapResult, MalformedRow};
