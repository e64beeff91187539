//! End-to-end tests: CSV on disk through aggregation to the rendered page.

use std::fmt::Write as _;
use std::io::Write;
use tempfile::NamedTempFile;

use tempmap::config::{ConfigOverrides, TempmapConfig, Variant};
use tempmap::core::Metric;
use tempmap::io::{write_aggregates_csv, write_heatmap_json, MalformedRowPolicy, TemperatureLoader};
use tempmap::services::heatmap::{build_heatmap_data, HeatmapOptions, HeatmapView};
use tempmap::HeatmapError;

// ==================== Helper Functions ====================

/// Three readings on the 1st, 2nd and 3rd of every month in `years`.
fn csv_for_years(years: impl IntoIterator<Item = i32>) -> String {
    let mut csv = String::from("date,max_temperature,min_temperature\n");
    for year in years {
        for month in 1..=12u32 {
            for day in 1..=3u32 {
                let max = 10.0 + month as f64 + day as f64;
                let min = max - 12.0;
                writeln!(csv, "{:04}-{:02}-{:02},{:.1},{:.1}", year, month, day, max, min).unwrap();
            }
        }
    }
    csv
}

fn write_csv(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

// ==================== Pipeline ====================

#[tokio::test]
async fn extended_pipeline_keeps_last_decade_with_sparklines() {
    let years: Vec<i32> = std::iter::once(2005).chain(2015..=2024).collect();
    let file = write_csv(&csv_for_years(years));

    let report = TemperatureLoader::default().fetch(file.path()).await.unwrap();
    assert_eq!(report.records.len(), 11 * 12 * 3);

    let data = build_heatmap_data(&report.records, &HeatmapOptions::extended()).unwrap();
    assert_eq!(data.years(), (2015..=2024).collect::<Vec<_>>().as_slice());
    assert_eq!(data.cells().len(), 10 * 12);
    assert!(data.cells().iter().all(|c| c.year != 2005));
    assert!(data.cells().iter().all(|c| c.days.len() == 3));

    let view = HeatmapView::new(data).unwrap();
    let html = TempmapConfig::default().renderer().render_html(&view).unwrap();

    // one cell per month per metric layer
    assert_eq!(html.matches("class=\"cell\"").count(), 2 * 10 * 12);
    assert!(html.contains("class=\"sparklines\""));
    assert!(html.contains("id=\"tempToggle\" checked"));
    assert!(!html.contains(">2005<"));
    assert!(html.contains(">2015<"));
    assert!(html.contains(">December<"));
    assert!(html.contains("Year: 2024, Month: 12\nMax: 25.0°C\nMin: 11.0°C"));
}

#[test]
fn basic_pipeline_keeps_every_year_without_sparklines() {
    let years: Vec<i32> = std::iter::once(2005).chain(2015..=2024).collect();
    let file = write_csv(&csv_for_years(years));

    let report = TemperatureLoader::default().load_from_file(file.path()).unwrap();
    let config = TempmapConfig::from_toml_str("[heatmap]\nvariant = \"basic\"\n").unwrap();
    let data = build_heatmap_data(&report.records, &config.heatmap_options()).unwrap();
    assert_eq!(data.years().len(), 11);
    assert!(!data.has_days());

    let html = config.renderer().render_html(&HeatmapView::new(data).unwrap()).unwrap();
    assert!(html.contains(">2005<"));
    assert!(!html.contains("class=\"sparklines\""));
    assert!(html.contains("height=\"500\""));
}

#[test]
fn january_example_from_two_readings() {
    let file = write_csv(
        "date,max_temperature,min_temperature\n2020-01-01,10.0,-2.0\n2020-01-02,15.0,-5.0\n",
    );
    let report = TemperatureLoader::default().load_from_file(file.path()).unwrap();
    let data = build_heatmap_data(&report.records, &HeatmapOptions::basic()).unwrap();

    assert_eq!(data.cells().len(), 1);
    assert_eq!(data.cells()[0].max_temperature, 15.0);
    assert_eq!(data.cells()[0].min_temperature, -5.0);
    assert_eq!(data.global_range().min, -5.0);
    assert_eq!(data.global_range().max, 15.0);
}

#[test]
fn absent_months_leave_gaps() {
    let file = write_csv(
        "date,max_temperature,min_temperature\n2020-01-05,3.0,-1.0\n2020-03-05,9.0,2.0\n",
    );
    let report = TemperatureLoader::default().load_from_file(file.path()).unwrap();
    let data = build_heatmap_data(&report.records, &HeatmapOptions::basic()).unwrap();
    assert_eq!(data.cells().len(), 2);
    assert_eq!(data.months().len(), 12);

    let html = tempmap::render::HeatmapRenderer::basic()
        .render_svg(&HeatmapView::new(data).unwrap());
    assert_eq!(html.matches("class=\"cell\"").count(), 2);
    assert!(!html.contains("Month: 2\n"));
}

#[test]
fn toggle_recomputes_range_from_min_values() {
    let file = write_csv(&csv_for_years(2019..=2020));
    let report = TemperatureLoader::default().load_from_file(file.path()).unwrap();
    let data = build_heatmap_data(&report.records, &HeatmapOptions::basic()).unwrap();
    let mut view = HeatmapView::new(data).unwrap();

    assert_eq!(view.metric(), Metric::MaxTemperature);
    assert_eq!(view.metric_range().min, 14.0);
    assert_eq!(view.metric_range().max, 25.0);

    let range = view.toggle().unwrap();
    assert_eq!(view.metric(), Metric::MinTemperature);
    assert_eq!(range.min, 0.0);
    assert_eq!(range.max, 11.0);
    assert_eq!(view.metric_range(), range);
}

// ==================== Failures ====================

#[test]
fn malformed_row_aborts_under_default_policy() {
    let file = write_csv(
        "date,max_temperature,min_temperature\n2020-01-01,10.0,-2.0\n2020-01-02,NaN,-5.0\n",
    );
    let err = TemperatureLoader::default().load_from_file(file.path()).unwrap_err();
    match err {
        HeatmapError::MalformedRows { rows, .. } => {
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].line, 3);
            assert_eq!(rows[0].column, "max_temperature");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn skip_policy_drops_only_malformed_rows() {
    let file = write_csv(
        "date,max_temperature,min_temperature\n\
         2020-01-01,10.0,-2.0\n\
         2020-02-30,11.0,-1.0\n\
         2020-01-03,inf,-1.0\n\
         2020-01-04,,-1.0\n\
         2020-01-05,12.0,-3.0\n",
    );
    let report = TemperatureLoader::new(MalformedRowPolicy::Skip)
        .load_from_file(file.path())
        .unwrap();
    assert_eq!(report.records.len(), 2);
    let lines: Vec<usize> = report.malformed.iter().map(|m| m.line).collect();
    assert_eq!(lines, vec![3, 4, 5]);
}

#[test]
fn header_only_file_is_an_empty_dataset() {
    let file = write_csv("date,max_temperature,min_temperature\n");
    let result = TemperatureLoader::default()
        .load_from_file(file.path())
        .and_then(|report| build_heatmap_data(&report.records, &HeatmapOptions::basic()));
    assert!(matches!(result, Err(HeatmapError::EmptyDataset(_))));
}

#[test]
fn missing_column_is_reported() {
    let file = write_csv("date,max_temperature\n2020-01-01,10.0\n");
    let err = TemperatureLoader::default().load_from_file(file.path()).unwrap_err();
    match err {
        HeatmapError::MissingColumn(name) => assert_eq!(name, "min_temperature"),
        other => panic!("unexpected error: {other:?}"),
    }
}

// ==================== Config and export ====================

#[test]
fn cli_overrides_drive_the_pipeline() {
    let mut config = TempmapConfig::from_toml_str(
        "[heatmap]\nvariant = \"extended\"\nrecent_years = 10\n",
    )
    .unwrap();
    config.apply_overrides(ConfigOverrides {
        variant: Some(Variant::Basic),
        recent_years: Some(2),
        metric: Some(Metric::MinTemperature),
        ..Default::default()
    });

    let file = write_csv(&csv_for_years(2018..=2021));
    let report = TemperatureLoader::default().load_from_file(file.path()).unwrap();
    let data = build_heatmap_data(&report.records, &config.heatmap_options()).unwrap();
    assert_eq!(data.years(), &[2020, 2021]);

    let view = HeatmapView::new(data).unwrap();
    assert_eq!(view.metric(), Metric::MinTemperature);
    let html = config.renderer().render_html(&view).unwrap();
    assert!(html.contains("<input type=\"checkbox\" id=\"tempToggle\">"));
}

#[test]
fn exports_write_csv_and_json() {
    let file = write_csv(&csv_for_years([2021]));
    let report = TemperatureLoader::default().load_from_file(file.path()).unwrap();
    let data = build_heatmap_data(&report.records, &HeatmapOptions::basic()).unwrap();
    let view = HeatmapView::new(data).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let csv_path = dir.path().join("aggregates.csv");
    let json_path = dir.path().join("heatmap.json");
    write_aggregates_csv(view.data().cells(), &csv_path).unwrap();
    write_heatmap_json(&view, &json_path).unwrap();

    let csv = std::fs::read_to_string(&csv_path).unwrap();
    assert_eq!(csv.lines().count(), 1 + 12);

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(json["metric"], "max_temperature");
    assert_eq!(json["cells"].as_array().unwrap().len(), 12);
    assert_eq!(json["years"][0], 2021);
    assert_eq!(json["global_range"]["min"], 0.0);
}
