//! High-level data loading and export.
//!
//! Loaders combine the CSV parser with row validation and the malformed-row
//! policy, producing a [`LoadReport`]. Export writes aggregated cells as CSV
//! or the whole heatmap view as JSON.
//!
//! # Example
//!
//! ```no_run
//! use tempmap::io::{MalformedRowPolicy, TemperatureLoader};
//! use std::path::Path;
//!
//! let report = TemperatureLoader::new(MalformedRowPolicy::Skip)
//!     .load_from_file(Path::new("temperature_daily.csv"))
//!     .expect("Failed to load");
//! println!("Loaded {} records", report.records.len());
//! ```

pub mod export;
pub mod loaders;


pub use export::{aggregates_to_dataframe, write_aggregates_csv, write_heatmap_json};
pub use loaders::{LoadReport, MalformedRowPolicy, TemperatureLoader};
