//! Rendering: scales, the color ramp and the HTML/SVG heatmap renderer.

pub mod color;
pub mod scales;
pub mod svg;

pub use color::{interpolate_yl_or_rd, SequentialColor};
pub use scales::{ticks, BandScale, LinearScale};
pub use svg::{HeatmapRenderer, Margin};
