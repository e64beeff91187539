//! Parsers for daily temperature CSV files.
//!
//! - [`csv_parser`]: read CSV text into a string-typed DataFrame and validate
//!   each row into a [`DailyRecord`](crate::core::domain::DailyRecord)
//!
//! # Example
//!
//! ```no_run
//! use tempmap::parsing::csv_parser::{dataframe_to_records, read_temperature_csv};
//! use std::path::Path;
//!
//! let df = read_temperature_csv(Path::new("temperature_daily.csv"))
//!     .expect("Failed to read CSV");
//! let rows = dataframe_to_records(&df).expect("Missing columns");
//! ```

pub mod csv_parser;


pub use csv_parser::{dataframe_to_records, parse_row, ParsedRow};
