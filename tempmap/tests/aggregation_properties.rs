//! Property tests for monthly aggregation and range computation.

use chrono::NaiveDate;
use proptest::prelude::*;
use tempmap::core::{DailyRecord, Metric, MonthAggregate};
use tempmap::services::aggregation::{aggregate, global_range, metric_range};
use tempmap::services::heatmap::{build_heatmap_data, HeatmapOptions, HeatmapView};

// ==================== Strategies ====================

/// Daily record in 2015..=2024 with max >= min.
fn ordered_record() -> impl Strategy<Value = DailyRecord> {
    (2015i32..=2024, 1u32..=12, 1u32..=28, -40.0f64..45.0, 0.0f64..25.0).prop_map(
        |(year, month, day, max, spread)| {
            let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
            DailyRecord::new(date, max, max - spread)
        },
    )
}

/// Any finite daily record, possibly with min above max.
fn any_record() -> impl Strategy<Value = DailyRecord> {
    (2015i32..=2024, 1u32..=12, 1u32..=28, -40.0f64..45.0, -40.0f64..45.0).prop_map(
        |(year, month, day, max, min)| {
            let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
            DailyRecord::new(date, max, min)
        },
    )
}

fn records_and_shuffle() -> impl Strategy<Value = (Vec<DailyRecord>, Vec<DailyRecord>)> {
    prop::collection::vec(any_record(), 0..200)
        .prop_flat_map(|records| (Just(records.clone()), Just(records).prop_shuffle()))
}

// ==================== Properties ====================

proptest! {
    #[test]
    fn aggregate_ignores_record_order((records, shuffled) in records_and_shuffle()) {
        prop_assert_eq!(aggregate(&records, None), aggregate(&shuffled, None));
    }

    #[test]
    fn max_stays_above_min_for_ordered_input(records in prop::collection::vec(ordered_record(), 1..200)) {
        for cell in aggregate(&records, None) {
            prop_assert!(cell.max_temperature >= cell.min_temperature);
        }
    }

    #[test]
    fn cells_are_extremes_of_their_month(records in prop::collection::vec(any_record(), 1..200)) {
        let cells = aggregate(&records, None);
        for cell in &cells {
            let month: Vec<&DailyRecord> = records
                .iter()
                .filter(|r| r.year == cell.year && r.month == cell.month)
                .collect();
            prop_assert_eq!(month.len(), cell.days.len());
            let max = month.iter().map(|r| r.max_temperature).fold(f64::NEG_INFINITY, f64::max);
            let min = month.iter().map(|r| r.min_temperature).fold(f64::INFINITY, f64::min);
            prop_assert_eq!(cell.max_temperature, max);
            prop_assert_eq!(cell.min_temperature, min);
        }
        let total: usize = cells.iter().map(|c| c.days.len()).sum();
        prop_assert_eq!(total, records.len());
    }

    #[test]
    fn cells_are_sorted_and_unique(records in prop::collection::vec(any_record(), 0..200)) {
        let cells = aggregate(&records, None);
        for pair in cells.windows(2) {
            prop_assert!((pair[0].year, pair[0].month) < (pair[1].year, pair[1].month));
        }
    }

    #[test]
    fn global_range_covers_every_cell(records in prop::collection::vec(ordered_record(), 1..200)) {
        let cells = aggregate(&records, None);
        let range = global_range(&cells).unwrap();
        prop_assert!(range.min <= range.max);
        for cell in &cells {
            prop_assert!(range.contains(cell.max_temperature));
            prop_assert!(range.contains(cell.min_temperature));
        }
    }

    #[test]
    fn toggled_range_depends_only_on_cells(records in prop::collection::vec(any_record(), 1..200)) {
        let data = build_heatmap_data(&records, &HeatmapOptions::basic()).unwrap();
        let cells: Vec<MonthAggregate> = data.cells().to_vec();
        let mut view = HeatmapView::new(data).unwrap();

        let min_range = view.toggle().unwrap();
        prop_assert_eq!(min_range, metric_range(&cells, Metric::MinTemperature).unwrap());

        let max_range = view.toggle().unwrap();
        prop_assert_eq!(max_range, metric_range(&cells, Metric::MaxTemperature).unwrap());
    }
}

// ==================== Examples ====================

#[test]
fn inverted_records_give_inverted_global_range() {
    let date = NaiveDate::from_ymd_opt(2020, 5, 1).unwrap();
    let cells = aggregate(&[DailyRecord::new(date, 0.0, 24.5)], None);
    let range = global_range(&cells).unwrap();
    assert_eq!(range.min, 24.5);
    assert_eq!(range.max, 0.0);
    assert!(range.min > range.max);

    // each metric on its own is still ordered
    let max_range = metric_range(&cells, Metric::MaxTemperature).unwrap();
    assert!(max_range.min <= max_range.max);
}

#[test]
fn empty_input_has_no_cells_and_no_range() {
    let cells = aggregate(&[], None);
    assert!(cells.is_empty());
    assert!(global_range(&cells).is_err());
    assert!(metric_range(&cells, Metric::MaxTemperature).is_err());
    assert!(metric_range(&cells, Metric::MinTemperature).is_err());
}
