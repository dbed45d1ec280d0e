//! Per-day series aggregation
//!
//! Reads every snapshot file of a day and merges their rows into one series
//! per location. Bad rows and unreadable files are dropped, never fatal.

use chrono::NaiveDateTime;
use std::io::Read;

use crate::snapshot::{SnapshotCatalog, SnapshotFile};
use crate::types::{Day, DaySeries, Sample};

/// Why a row was dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum RowRejection {
    TooFewFields(usize),
    InvalidValue(String),
    OutOfRange(f64),
}

/// Parse one snapshot row `(id, postal, crowd, ...)` into a sample.
pub fn parse_row(fields: &[&str], timestamp: NaiveDateTime, max_value: f64) -> Result<Sample, RowRejection> {
    if fields.len() < 3 {
        return Err(RowRejection::TooFewFields(fields.len()));
    }
    let value = parse_value(fields[2], max_value)?;
    Ok(Sample {
        timestamp,
        location: fields[1].to_string(),
        value,
    })
}

/// Crowd value filter: finite and no greater than `max_value`
/// ([`crate::types::MAX_SAMPLE_VALUE`] by default).
///
/// Negative values pass through; the value mapping clamps them to zero.
pub fn parse_value(raw: &str, max_value: f64) -> Result<f64, RowRejection> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| RowRejection::InvalidValue(raw.to_string()))?;
    if !value.is_finite() {
        return Err(RowRejection::InvalidValue(raw.to_string()));
    }
    if value > max_value {
        return Err(RowRejection::OutOfRange(value));
    }
    Ok(value)
}

/// Append every valid row of a snapshot to `series`. Returns the number of
/// samples kept.
pub fn read_snapshot<R: Read>(
    reader: R,
    timestamp: NaiveDateTime,
    max_value: f64,
    series: &mut DaySeries,
) -> usize {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut kept = 0;
    for (line, record) in csv_reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                log::debug!("Skipping unreadable row {}: {}", line + 2, e);
                continue;
            }
        };
        let fields: Vec<&str> = record.iter().collect();
        match parse_row(&fields, timestamp, max_value) {
            Ok(sample) => {
                series.push(sample);
                kept += 1;
            }
            Err(rejection) => log::debug!("Skipping row {}: {:?}", line + 2, rejection),
        }
    }
    kept
}

fn read_snapshot_file(file: &SnapshotFile, max_value: f64, series: &mut DaySeries) -> usize {
    match std::fs::File::open(&file.path) {
        Ok(handle) => read_snapshot(handle, file.timestamp, max_value, series),
        Err(e) => {
            log::warn!("Skipping unreadable snapshot {}: {}", file.path.display(), e);
            0
        }
    }
}

/// Build the series for `day` from all of its snapshot files, in capture
/// order. Duplicate timestamps and values are kept; values above
/// `max_value` are dropped.
pub fn aggregate_day(catalog: &SnapshotCatalog, day: &Day, max_value: f64) -> DaySeries {
    let mut series = DaySeries::new(*day);
    let files = catalog.files(day);
    let mut kept = 0;
    for file in files {
        kept += read_snapshot_file(file, max_value, &mut series);
    }
    log::debug!(
        "Day {}: {} samples for {} locations from {} files",
        day,
        kept,
        series.series.len(),
        files.len()
    );
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MAX_SAMPLE_VALUE;
    use chrono::NaiveDate;

    fn ts(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn test_parse_value_filters() {
        assert_eq!(parse_value("12", MAX_SAMPLE_VALUE), Ok(12.0));
        assert_eq!(parse_value(" 7.5 ", MAX_SAMPLE_VALUE), Ok(7.5));
        assert_eq!(parse_value("500", MAX_SAMPLE_VALUE), Ok(500.0));
        assert_eq!(parse_value("-2", MAX_SAMPLE_VALUE), Ok(-2.0));
        assert_eq!(parse_value("600", MAX_SAMPLE_VALUE), Err(RowRejection::OutOfRange(600.0)));
        assert!(matches!(parse_value("abc", MAX_SAMPLE_VALUE), Err(RowRejection::InvalidValue(_))));
        assert!(matches!(parse_value("nan", MAX_SAMPLE_VALUE), Err(RowRejection::InvalidValue(_))));
        assert!(matches!(parse_value("inf", MAX_SAMPLE_VALUE), Err(RowRejection::InvalidValue(_))));
        assert!(matches!(parse_value("", MAX_SAMPLE_VALUE), Err(RowRejection::InvalidValue(_))));
    }

    #[test]
    fn test_parse_row_needs_three_fields() {
        assert_eq!(parse_row(&["1", "123456"], ts(10), MAX_SAMPLE_VALUE), Err(RowRejection::TooFewFields(2)));
        let sample = parse_row(&["1", "123456", "5", "extra"], ts(10), MAX_SAMPLE_VALUE).unwrap();
        assert_eq!(sample.location, "123456");
        assert_eq!(sample.value, 5.0);
    }

    #[test]
    fn test_read_snapshot_skips_header_and_bad_rows() {
        let data = "id,postal,crowd\n1,111111,4\n2,222222,abc\n3,333333,600\n4,444444\n5,111111,9\n";
        let mut series = DaySeries::default();
        let kept = read_snapshot(data.as_bytes(), ts(11), MAX_SAMPLE_VALUE, &mut series);
        assert_eq!(kept, 2);
        let points = series.get("111111").unwrap();
        assert_eq!(points.len(), 2);
        assert!(series.get("222222").is_none());
        assert!(series.get("333333").is_none());
        assert!(series.get("444444").is_none());
    }

    #[test]
    fn test_read_snapshot_keeps_duplicates() {
        let mut series = DaySeries::default();
        read_snapshot("id,postal,crowd\n1,1,3\n".as_bytes(), ts(12), MAX_SAMPLE_VALUE, &mut series);
        read_snapshot("id,postal,crowd\n1,1,3\n".as_bytes(), ts(12), MAX_SAMPLE_VALUE, &mut series);
        assert_eq!(series.get("1").unwrap().len(), 2);
    }

    #[test]
    fn test_custom_ceiling() {
        assert_eq!(parse_value("120", 100.0), Err(RowRejection::OutOfRange(120.0)));
        assert_eq!(parse_value("100", 100.0), Ok(100.0));

        let mut series = DaySeries::default();
        let kept = read_snapshot("id,postal,crowd\n1,1,50\n2,1,150\n".as_bytes(), ts(12), 100.0, &mut series);
        assert_eq!(kept, 1);
        assert_eq!(series.day_max(), 50.0);
    }
}
