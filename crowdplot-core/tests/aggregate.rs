use crowdplot_core::types::MAX_SAMPLE_VALUE;
use crowdplot_core::{aggregate_day, Day, DayLayout, MetadataIndex, SnapshotCatalog};
use proptest::prelude::*;
use std::fs;
use std::path::Path;

fn write_snapshot(dir: &Path, name: &str, rows: &[&str]) {
    let mut body = String::from("id,postal,crowd\n");
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    fs::write(dir.join(name), body).unwrap();
}

#[test]
fn aggregates_one_day_across_snapshots() {
    let dir = tempfile::tempdir().unwrap();
    write_snapshot(dir.path(), "20260101-140000.csv", &["1,123456,20", "2,654321,3"]);
    write_snapshot(dir.path(), "20260101-100000.csv", &["1,123456,5"]);
    write_snapshot(dir.path(), "20260101-110000.csv", &["1,123456,abc"]);
    write_snapshot(dir.path(), "20260101-120000.csv", &["1,123456,600"]);
    write_snapshot(dir.path(), "20260102-100000.csv", &["1,123456,99"]);
    fs::write(dir.path().join("notes.csv"), "id,postal,crowd\n1,1,1\n").unwrap();
    fs::write(dir.path().join("20260101-130000.txt"), "id,postal,crowd\n1,1,1\n").unwrap();

    let catalog = SnapshotCatalog::discover(dir.path(), "csv").unwrap();
    assert_eq!(catalog.len(), 5);

    let day = Day::parse("20260101").unwrap();
    let series = aggregate_day(&catalog, &day, MAX_SAMPLE_VALUE);

    let points = series.get("123456").unwrap();
    let values: Vec<f64> = points.iter().map(|p| p.value).collect();
    assert_eq!(values, vec![5.0, 20.0]);
    assert!(points.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(series.day_max(), 20.0);
    assert!(series.get("1").is_none());
}

#[test]
fn missing_data_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope");
    assert!(SnapshotCatalog::discover(&missing, "csv").is_err());
}

#[test]
fn row_order_independent_of_file_order() {
    let metadata = MetadataIndex::from_json(
        r#"{
            "a": {"postal": "1", "name": "B", "region": "East"},
            "b": {"postal": "2", "name": "A", "region": "East"},
            "c": {"postal": "3", "name": "C", "region": "Central"}
        }"#,
    )
    .unwrap();

    let first = tempfile::tempdir().unwrap();
    write_snapshot(first.path(), "20260101-100000.csv", &["1,1,1", "2,2,2"]);
    write_snapshot(first.path(), "20260101-110000.csv", &["1,3,3"]);

    let second = tempfile::tempdir().unwrap();
    write_snapshot(second.path(), "20260101-100000.csv", &["1,3,3"]);
    write_snapshot(second.path(), "20260101-110000.csv", &["2,2,2", "1,1,1"]);

    let day = Day::parse("20260101").unwrap();
    let plan = |dir: &Path| {
        let catalog = SnapshotCatalog::discover(dir, "csv").unwrap();
        DayLayout::plan(&aggregate_day(&catalog, &day, MAX_SAMPLE_VALUE), &metadata)
    };
    let a = plan(first.path());
    let b = plan(second.path());
    assert_eq!(a.rows, b.rows);
    assert_eq!(a.regions, b.regions);

    let order: Vec<&str> = a.rows.iter().map(|r| r.location.as_str()).collect();
    assert_eq!(order, vec!["3", "2", "1"]);
}

proptest! {
    #[test]
    fn no_out_of_range_value_survives(values in proptest::collection::vec(-50.0f64..1000.0, 1..40)) {
        let mut body = String::from("id,postal,crowd\n");
        for (i, v) in values.iter().enumerate() {
            body.push_str(&format!("{},{},{}\n", i, i % 3, v));
        }
        let mut series = crowdplot_core::DaySeries::default();
        let ts = chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
        crowdplot_core::series::read_snapshot(body.as_bytes(), ts, MAX_SAMPLE_VALUE, &mut series);

        let expected = values.iter().filter(|v| **v <= 500.0).count();
        prop_assert_eq!(series.sample_count(), expected);
        for point in series.series.values().flatten() {
            prop_assert!(point.value <= 500.0);
        }
    }
}
