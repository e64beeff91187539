//! Configuration file support.
//!
//! Settings are read from a TOML file with four optional sections:
//!
//! ```toml
//! [input]
//! path = "temperature_daily.csv"
//! on_malformed = "reject"
//!
//! [heatmap]
//! variant = "extended"
//! recent_years = 10
//! initial_metric = "max_temperature"
//!
//! [layout]
//! width = 800
//! legend_width = 300
//! legend_height = 20
//!
//! [output]
//! path = "heatmap.html"
//! export_csv = "aggregates.csv"
//! ```
//!
//! Command line flags are applied on top through [`ConfigOverrides`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::core::domain::Metric;
use crate::error::{HeatmapError, HeatmapResult};
use crate::io::loaders::MalformedRowPolicy;
use crate::render::svg::HeatmapRenderer;
use crate::services::heatmap::HeatmapOptions;

/// File name searched for when no configuration path is given.
pub const DEFAULT_CONFIG_FILE: &str = "tempmap.toml";

/// Full configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TempmapConfig {
    #[serde(default)]
    pub input: InputSettings,
    #[serde(default)]
    pub heatmap: HeatmapSettings,
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

/// Which heatmap to draw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Every year, no sparklines
    Basic,
    /// Most recent years with daily sparklines
    #[default]
    Extended,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Basic => f.write_str("basic"),
            Variant::Extended => f.write_str("extended"),
        }
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Variant::Basic),
            "extended" => Ok(Variant::Extended),
            other => Err(format!(
                "Unknown variant '{}', expected basic or extended",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputSettings {
    #[serde(default = "default_input_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub on_malformed: MalformedRowPolicy,
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            path: default_input_path(),
            on_malformed: MalformedRowPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeatmapSettings {
    #[serde(default)]
    pub variant: Variant,
    /// Number of most recent years to keep, 0 for all.
    /// Unset means all years for `basic` and ten for `extended`.
    #[serde(default)]
    pub recent_years: Option<usize>,
    #[serde(default)]
    pub initial_metric: Metric,
}

/// Pixel sizes. An unset height follows the variant (500 basic, 600 extended).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSettings {
    #[serde(default = "default_width")]
    pub width: f64,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default = "default_legend_width")]
    pub legend_width: f64,
    #[serde(default = "default_legend_height")]
    pub legend_height: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: None,
            legend_width: default_legend_width(),
            legend_height: default_legend_height(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
    #[serde(default)]
    pub export_csv: Option<PathBuf>,
    #[serde(default)]
    pub export_json: Option<PathBuf>,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            path: default_output_path(),
            export_csv: None,
            export_json: None,
        }
    }
}

fn default_input_path() -> PathBuf {
    PathBuf::from("temperature_daily.csv")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("heatmap.html")
}

fn default_width() -> f64 {
    800.0
}

fn default_legend_width() -> f64 {
    300.0
}

fn default_legend_height() -> f64 {
    20.0
}

/// Values given on the command line. `None` leaves the file setting alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub input: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub variant: Option<Variant>,
    pub recent_years: Option<usize>,
    pub metric: Option<Metric>,
    pub skip_malformed: bool,
    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

impl TempmapConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> HeatmapResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            HeatmapError::Configuration(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::from_toml_str(&content).map_err(|e| match e {
            HeatmapError::Configuration(msg) => {
                HeatmapError::Configuration(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// Parse and validate configuration text.
    pub fn from_toml_str(content: &str) -> HeatmapResult<Self> {
        let config: TempmapConfig = toml::from_str(content).map_err(|e| {
            HeatmapError::Configuration(format!("Failed to parse config file: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load `tempmap.toml` from the working directory, or defaults when absent.
    pub fn from_default_location() -> HeatmapResult<Self> {
        let path = PathBuf::from(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check that every size is a positive finite number.
    pub fn validate(&self) -> HeatmapResult<()> {
        let sizes = [
            ("layout.width", Some(self.layout.width)),
            ("layout.height", self.layout.height),
            ("layout.legend_width", Some(self.layout.legend_width)),
            ("layout.legend_height", Some(self.layout.legend_height)),
        ];
        for (name, value) in sizes {
            if let Some(v) = value {
                if !v.is_finite() || v <= 0.0 {
                    return Err(HeatmapError::Configuration(format!(
                        "{} must be a positive number, got {}",
                        name, v
                    )));
                }
            }
        }
        Ok(())
    }

    /// Apply command line values on top of this configuration.
    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(input) = overrides.input {
            self.input.path = input;
        }
        if let Some(output) = overrides.output {
            self.output.path = output;
        }
        if let Some(variant) = overrides.variant {
            self.heatmap.variant = variant;
        }
        if let Some(years) = overrides.recent_years {
            self.heatmap.recent_years = Some(years);
        }
        if let Some(metric) = overrides.metric {
            self.heatmap.initial_metric = metric;
        }
        if overrides.skip_malformed {
            self.input.on_malformed = MalformedRowPolicy::Skip;
        }
        if overrides.export_csv.is_some() {
            self.output.export_csv = overrides.export_csv;
        }
        if overrides.export_json.is_some() {
            self.output.export_json = overrides.export_json;
        }
    }

    /// Aggregation options for the configured variant.
    pub fn heatmap_options(&self) -> HeatmapOptions {
        let base = match self.heatmap.variant {
            Variant::Basic => HeatmapOptions::basic(),
            Variant::Extended => HeatmapOptions::extended(),
        };
        let recent_years = match self.heatmap.recent_years {
            Some(0) => None,
            Some(n) => Some(n),
            None => base.recent_years,
        };
        base.with_recent_years(recent_years)
            .with_initial_metric(self.heatmap.initial_metric)
    }

    /// Renderer sized by the layout section.
    pub fn renderer(&self) -> HeatmapRenderer {
        let base = match self.heatmap.variant {
            Variant::Basic => HeatmapRenderer::basic(),
            Variant::Extended => HeatmapRenderer::extended(),
        };
        let height = self.layout.height.unwrap_or(base.height);
        base.size(self.layout.width, height)
            .legend_size(self.layout.legend_width, self.layout.legend_height)
    }
}
