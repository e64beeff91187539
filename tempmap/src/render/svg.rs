//! Standalone HTML heatmap renderer.
//!
//! Produces one HTML document with inline SVG:
//! - one rect per month cell, colored by the selected metric
//! - a gradient legend with ticks and min/max labels
//! - hover tooltips through SVG `<title>` elements
//! - daily max/min sparklines inside each cell (extended variant)
//! - a max/min checkbox toggle driven by CSS only

use chrono::Month;

use crate::core::domain::{Metric, MonthAggregate};
use crate::error::HeatmapResult;
use crate::render::color::{interpolate_yl_or_rd, SequentialColor};
use crate::render::scales::{ticks, BandScale, LinearScale};
use crate::services::heatmap::HeatmapView;

const MAX_LINE_COLOR: &str = "#003366";
const MIN_LINE_COLOR: &str = "#66ccff";
const TEXT_COLOR: &str = "#333333";
const AXIS_COLOR: &str = "#000000";
const LEGEND_TICKS: usize = 5;

/// Space around the plotting area, in pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self {
            top: 50.0,
            right: 50.0,
            bottom: 50.0,
            left: 100.0,
        }
    }
}

/// HTML heatmap renderer configuration
#[derive(Clone, Debug)]
pub struct HeatmapRenderer {
    /// Outer width of the heatmap SVG, margins included
    pub width: f64,
    /// Outer height of the heatmap SVG, margins included
    pub height: f64,
    pub margin: Margin,
    /// Padding between bands, as a fraction of the band step
    pub band_padding: f64,
    pub legend_width: f64,
    pub legend_height: f64,
    /// Draw daily sparklines in cells that kept their days
    pub sparklines: bool,
    /// Inset of sparklines from the cell border
    pub sparkline_padding: f64,
    pub title: String,
}

impl Default for HeatmapRenderer {
    fn default() -> Self {
        Self::basic()
    }
}

impl HeatmapRenderer {
    /// Plain heatmap: 800 × 500, no sparklines.
    pub fn basic() -> Self {
        Self {
            width: 800.0,
            height: 500.0,
            margin: Margin::default(),
            band_padding: 0.05,
            legend_width: 300.0,
            legend_height: 20.0,
            sparklines: false,
            sparkline_padding: 3.0,
            title: "Temperature Heatmap by Year and Month".to_string(),
        }
    }

    /// Heatmap with daily sparklines: 800 × 600.
    pub fn extended() -> Self {
        Self {
            height: 600.0,
            sparklines: true,
            title: "Temperature Heatmap by Year and Month along with Daily Changes".to_string(),
            ..Self::basic()
        }
    }

    /// Configure outer size
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Configure legend bar size
    pub fn legend_size(mut self, width: f64, height: f64) -> Self {
        self.legend_width = width;
        self.legend_height = height;
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    fn inner_width(&self) -> f64 {
        (self.width - self.margin.left - self.margin.right).max(1.0)
    }

    fn inner_height(&self) -> f64 {
        (self.height - self.margin.top - self.margin.bottom).max(1.0)
    }

    fn x_scale(&self, view: &HeatmapView) -> BandScale<i32> {
        BandScale::new(
            view.data().years().to_vec(),
            (0.0, self.inner_width()),
            self.band_padding,
        )
    }

    fn y_scale(&self, view: &HeatmapView) -> BandScale<u32> {
        BandScale::new(
            view.data().months().to_vec(),
            (0.0, self.inner_height()),
            self.band_padding,
        )
    }

    /// Render the complete HTML page with both metric layers.
    ///
    /// The view's current metric decides the initial checkbox state; the
    /// other layer is produced by toggling a copy of the view.
    pub fn render_html(&self, view: &HeatmapView) -> HeatmapResult<String> {
        let mut layer_view = view.clone();
        let mut cells = self.render_cells(&layer_view);
        let mut legends = self.render_legend(&layer_view);
        layer_view.toggle()?;
        cells.push_str(&self.render_cells(&layer_view));
        legends.push_str(&self.render_legend(&layer_view));

        let checked = if view.metric() == Metric::MaxTemperature {
            " checked"
        } else {
            ""
        };
        let line_legend = if self.draws_sparklines(view) {
            self.render_line_legend()
        } else {
            String::new()
        };

        Ok(format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>
{css}
    </style>
</head>
<body>
    <input type="checkbox" id="tempToggle"{checked}>
    <label for="tempToggle" class="toggle"><span class="knob"></span><span class="label-max">Max</span><span class="label-min">Min</span> temperature</label>
    <div class="chart">
        <svg id="heatmap" width="{width}" height="{height}" viewBox="0 0 {width} {height}">
            <g transform="translate({left}, {top})">
{cells}{body}            </g>
        </svg>
    </div>
    <div class="legends">
{legends}{line_legend}    </div>
</body>
</html>
"#,
            title = html_escape(&self.title),
            css = self.generate_css(),
            checked = checked,
            width = self.width,
            height = self.height,
            left = self.margin.left,
            top = self.margin.top,
            cells = cells,
            body = self.render_static_layer(view),
            legends = legends,
            line_legend = line_legend,
        ))
    }

    /// Render a standalone SVG of the heatmap for the view's current metric.
    pub fn render_svg(&self, view: &HeatmapView) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}" font-family="sans-serif">
    <g transform="translate({left}, {top})">
{cells}{body}    </g>
</svg>
"#,
            width = self.width,
            height = self.height,
            left = self.margin.left,
            top = self.margin.top,
            cells = self.render_cells(view),
            body = self.render_static_layer(view),
        )
    }

    /// Everything that does not change with the metric: sparklines, axes, title.
    fn render_static_layer(&self, view: &HeatmapView) -> String {
        let mut svg = String::new();
        if self.draws_sparklines(view) {
            svg.push_str(&self.render_sparklines(view));
        }
        svg.push_str(&self.render_axes(view));
        svg.push_str(&self.render_title());
        svg
    }

    fn draws_sparklines(&self, view: &HeatmapView) -> bool {
        self.sparklines && view.data().has_days()
    }

    /// One layer of cells colored by the view's metric
    fn render_cells(&self, view: &HeatmapView) -> String {
        let x_scale = self.x_scale(view);
        let y_scale = self.y_scale(view);
        let color = SequentialColor::new(view.metric_range());
        let mut svg = String::new();

        svg.push_str(&format!(
            "                <g class=\"cells {}\">\n",
            layer_class(view.metric())
        ));

        for cell in view.data().cells() {
            let (Some(x), Some(y)) = (x_scale.position(cell.year), y_scale.position(cell.month))
            else {
                continue;
            };
            svg.push_str(&format!(
                r#"                    <rect class="cell" x="{x:.2}" y="{y:.2}" width="{w:.2}" height="{h:.2}" fill="{fill}"><title>{tooltip}</title></rect>"#,
                x = x,
                y = y,
                w = x_scale.bandwidth(),
                h = y_scale.bandwidth(),
                fill = color.color(view.cell_value(cell)),
                tooltip = tooltip(cell),
            ));
            svg.push('\n');
        }

        svg.push_str("                </g>\n");
        svg
    }

    /// Daily max/min lines inside each cell, on the shared global scale
    fn render_sparklines(&self, view: &HeatmapView) -> String {
        let x_scale = self.x_scale(view);
        let y_scale = self.y_scale(view);
        let cell_width = x_scale.bandwidth();
        let cell_height = y_scale.bandwidth();
        let pad = self.sparkline_padding;
        let temp_scale = LinearScale::from_temperature(
            view.data().global_range(),
            (cell_height - pad, pad),
        );

        let mut svg = String::new();
        svg.push_str("                <g class=\"sparklines\" pointer-events=\"none\">\n");

        for cell in view.data().cells() {
            if cell.days.is_empty() {
                continue;
            }
            let (Some(x), Some(y)) = (x_scale.position(cell.year), y_scale.position(cell.month))
            else {
                continue;
            };
            let day_scale = LinearScale::new(
                (1.0, cell.days.len() as f64),
                (pad, cell_width - pad),
            );

            svg.push_str(&format!(
                "                    <g transform=\"translate({:.2}, {:.2})\">\n",
                x, y
            ));
            for metric in [Metric::MaxTemperature, Metric::MinTemperature] {
                let stroke = match metric {
                    Metric::MaxTemperature => MAX_LINE_COLOR,
                    Metric::MinTemperature => MIN_LINE_COLOR,
                };
                svg.push_str(&format!(
                    r#"                        <path d="{d}" fill="none" stroke="{stroke}" stroke-width="2"/>"#,
                    d = sparkline_path(cell, metric, &day_scale, &temp_scale),
                    stroke = stroke,
                ));
                svg.push('\n');
            }
            svg.push_str("                    </g>\n");
        }

        svg.push_str("                </g>\n");
        svg
    }

    /// Year axis along the bottom, month axis along the left
    fn render_axes(&self, view: &HeatmapView) -> String {
        let x_scale = self.x_scale(view);
        let y_scale = self.y_scale(view);
        let inner_width = self.inner_width();
        let inner_height = self.inner_height();
        let mut svg = String::new();

        svg.push_str(&format!(
            "                <g class=\"axis axis-x\" transform=\"translate(0, {:.2})\" font-size=\"10\" text-anchor=\"middle\">\n",
            inner_height
        ));
        svg.push_str(&format!(
            r#"                    <path d="M0,6V0H{w:.2}V6" fill="none" stroke="{color}"/>"#,
            w = inner_width,
            color = AXIS_COLOR,
        ));
        svg.push('\n');
        for &year in x_scale.domain() {
            if let Some(cx) = x_scale.center(year) {
                svg.push_str(&format!(
                    r#"                    <g transform="translate({cx:.2}, 0)"><line y2="6" stroke="{color}"/><text y="9" dy="0.71em" fill="{color}">{year}</text></g>"#,
                    cx = cx,
                    color = AXIS_COLOR,
                    year = year,
                ));
                svg.push('\n');
            }
        }
        svg.push_str("                </g>\n");

        svg.push_str(
            "                <g class=\"axis axis-y\" font-size=\"10\" text-anchor=\"end\">\n",
        );
        svg.push_str(&format!(
            r#"                    <path d="M-6,0H0V{h:.2}H-6" fill="none" stroke="{color}"/>"#,
            h = inner_height,
            color = AXIS_COLOR,
        ));
        svg.push('\n');
        for &month in y_scale.domain() {
            if let Some(cy) = y_scale.center(month) {
                svg.push_str(&format!(
                    r#"                    <g transform="translate(0, {cy:.2})"><line x2="-6" stroke="{color}"/><text x="-9" dy="0.32em" fill="{color}">{name}</text></g>"#,
                    cy = cy,
                    color = AXIS_COLOR,
                    name = month_name(month),
                ));
                svg.push('\n');
            }
        }
        svg.push_str("                </g>\n");

        svg
    }

    fn render_title(&self) -> String {
        format!(
            "                <text x=\"{x:.2}\" y=\"-20\" text-anchor=\"middle\" font-size=\"16\" font-weight=\"bold\" fill=\"{color}\">{title}</text>\n",
            x = self.inner_width() / 2.0,
            color = TEXT_COLOR,
            title = html_escape(&self.title),
        )
    }

    /// Gradient legend for the view's metric range
    fn render_legend(&self, view: &HeatmapView) -> String {
        let range = view.metric_range();
        let class = layer_class(view.metric());
        let gradient_id = format!("legendGradient-{}", class);
        let axis = LinearScale::from_temperature(range, (0.0, self.legend_width));
        let lw = self.legend_width;
        let lh = self.legend_height;

        let mut svg = String::new();
        svg.push_str(&format!(
            "        <svg class=\"legend {class}\" width=\"{w}\" height=\"70\">\n",
            class = class,
            w = lw + 40.0,
        ));
        svg.push_str(&format!(
            r#"            <defs><linearGradient id="{id}" x1="0%" y1="0%" x2="100%" y2="0%"><stop offset="0%" stop-color="{c0}"/><stop offset="50%" stop-color="{c50}"/><stop offset="100%" stop-color="{c100}"/></linearGradient></defs>"#,
            id = gradient_id,
            c0 = interpolate_yl_or_rd(0.0),
            c50 = interpolate_yl_or_rd(0.5),
            c100 = interpolate_yl_or_rd(1.0),
        ));
        svg.push('\n');
        svg.push_str("            <g transform=\"translate(20, 10)\">\n");
        svg.push_str(&format!(
            "                <rect width=\"{lw}\" height=\"{lh}\" fill=\"url(#{id})\"/>\n",
            lw = lw,
            lh = lh,
            id = gradient_id,
        ));

        svg.push_str(&format!(
            "                <g transform=\"translate(0, {lh})\" font-size=\"10\" text-anchor=\"middle\">\n",
            lh = lh
        ));
        for tick in ticks(range.min, range.max, LEGEND_TICKS) {
            svg.push_str(&format!(
                r#"                    <g transform="translate({x:.2}, 0)"><line y2="6" stroke="{color}"/><text y="9" dy="0.71em" fill="{color}">{label:.1}</text></g>"#,
                x = axis.scale(tick),
                color = AXIS_COLOR,
                label = tick,
            ));
            svg.push('\n');
        }
        svg.push_str("                </g>\n");

        svg.push_str(&format!(
            "                <text class=\"legend-text\" x=\"-17\" y=\"{y}\" text-anchor=\"start\" font-size=\"10\">{min:.1}</text>\n",
            y = lh + 17.0,
            min = range.min,
        ));
        svg.push_str(&format!(
            "                <text class=\"legend-text\" x=\"{x}\" y=\"{y}\" text-anchor=\"end\" font-size=\"10\">{max:.1}</text>\n",
            x = lw + 17.0,
            y = lh + 17.0,
            max = range.max,
        ));
        svg.push_str(&format!(
            "                <text x=\"{x}\" y=\"{y}\" text-anchor=\"middle\" font-size=\"10\">Temperature Range (°C)</text>\n",
            x = lw / 2.0,
            y = lh + 35.0,
        ));
        svg.push_str("            </g>\n        </svg>\n");
        svg
    }

    /// Key for the sparkline colors
    fn render_line_legend(&self) -> String {
        format!(
            r#"        <svg id="lineLegend" class="line-legend" width="150" height="70">
            <text x="75" y="15" text-anchor="middle" font-size="12" font-weight="bold">Daily Temperature</text>
            <line x1="10" y1="35" x2="40" y2="35" stroke="{max}" stroke-width="2"/>
            <text x="45" y="38" font-size="12">Max Temperature</text>
            <line x1="10" y1="55" x2="40" y2="55" stroke="{min}" stroke-width="2"/>
            <text x="45" y="58" font-size="12">Min Temperature</text>
        </svg>
"#,
            max = MAX_LINE_COLOR,
            min = MIN_LINE_COLOR,
        )
    }

    fn generate_css(&self) -> String {
        r#"        body {
            font-family: system-ui, -apple-system, sans-serif;
            color: #333333;
            padding: 20px;
        }
        #tempToggle { position: absolute; opacity: 0; }
        .toggle {
            display: inline-flex;
            align-items: center;
            gap: 6px;
            cursor: pointer;
            user-select: none;
        }
        .toggle .knob {
            width: 34px;
            height: 18px;
            border-radius: 9px;
            background: #66ccff;
            position: relative;
        }
        .toggle .knob::after {
            content: "";
            position: absolute;
            top: 2px;
            left: 2px;
            width: 14px;
            height: 14px;
            border-radius: 50%;
            background: #ffffff;
        }
        #tempToggle:checked + .toggle .knob { background: #e31a1c; }
        #tempToggle:checked + .toggle .knob::after { left: 18px; }
        #tempToggle:checked + .toggle .label-min,
        #tempToggle:not(:checked) + .toggle .label-max { display: none; }
        #tempToggle:checked ~ .chart .metric-min,
        #tempToggle:checked ~ .legends .metric-min,
        #tempToggle:not(:checked) ~ .chart .metric-max,
        #tempToggle:not(:checked) ~ .legends .metric-max { display: none; }
        .legends { display: flex; align-items: center; gap: 40px; }
        .line-legend {
            background: #ffffff;
            border: 1px solid #dddddd;
            border-radius: 5px;
        }
        .cell:hover { stroke: #000000; stroke-width: 1; }"#
            .to_string()
    }
}

/// CSS class of the layer showing `metric`
fn layer_class(metric: Metric) -> &'static str {
    match metric {
        Metric::MaxTemperature => "metric-max",
        Metric::MinTemperature => "metric-min",
    }
}

fn tooltip(cell: &MonthAggregate) -> String {
    format!(
        "Year: {}, Month: {}\nMax: {:.1}°C\nMin: {:.1}°C",
        cell.year, cell.month, cell.max_temperature, cell.min_temperature
    )
}

fn sparkline_path(
    cell: &MonthAggregate,
    metric: Metric,
    day_scale: &LinearScale,
    temp_scale: &LinearScale,
) -> String {
    cell.days
        .iter()
        .enumerate()
        .map(|(i, day)| {
            format!(
                "{}{:.2},{:.2}",
                if i == 0 { 'M' } else { 'L' },
                day_scale.scale(day.day as f64),
                temp_scale.scale(day.value(metric))
            )
        })
        .collect()
}

/// Full English month name for 1..=12
fn month_name(month: u32) -> String {
    u8::try_from(month)
        .ok()
        .and_then(|m| Month::try_from(m).ok())
        .map(|m| m.name().to_string())
        .unwrap_or_else(|| month.to_string())
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
