//! Snapshot file discovery
//!
//! Snapshots are named `<YYYYMMDD>-<HHMMSS>.<ext>`. Anything in the data
//! directory that does not follow the convention is skipped.

use chrono::NaiveDateTime;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::types::Day;

/// Combined date+time format of a snapshot file name.
pub const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Data directory not found: {0}")]
    MissingDirectory(PathBuf),
    #[error("IO error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A snapshot file whose name parsed into a capture time.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SnapshotFile {
    pub timestamp: NaiveDateTime,
    pub path: PathBuf,
}

impl SnapshotFile {
    pub fn day(&self) -> Day {
        Day(self.timestamp.date())
    }
}

/// Parse a snapshot file name into its day key and capture time.
///
/// The date is everything before the first `-`; the time is what follows it
/// up to the first `.`.
pub fn parse_snapshot_name(file_name: &str) -> Option<(String, NaiveDateTime)> {
    let (date_part, rest) = file_name.split_once('-')?;
    if date_part.len() != 8 || !date_part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let time_part = rest.split('.').next().unwrap_or(rest);
    let combined = format!("{}{}", date_part, time_part);
    NaiveDateTime::parse_from_str(&combined, SNAPSHOT_TIMESTAMP_FORMAT)
        .ok()
        .map(|ts| (date_part.to_string(), ts))
}

/// Snapshot files of the data directory, grouped by day.
///
/// Files within a day are ordered by capture time, then by path, so the
/// result never depends on directory listing order.
#[derive(Debug, Clone, Default)]
pub struct SnapshotCatalog {
    days: BTreeMap<Day, Vec<SnapshotFile>>,
}

impl SnapshotCatalog {
    /// Scan `dir` for files with the given extension.
    pub fn discover<P: AsRef<Path>>(dir: P, extension: &str) -> Result<Self, SnapshotError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(SnapshotError::MissingDirectory(dir.to_path_buf()));
        }
        let entries = fs::read_dir(dir).map_err(|source| SnapshotError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| SnapshotError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(extension) {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            match parse_snapshot_name(name) {
                Some((_, timestamp)) => files.push(SnapshotFile { timestamp, path }),
                None => log::debug!("Skipping snapshot with unrecognised name: {}", name),
            }
        }

        log::info!("Discovered {} snapshot files in {}", files.len(), dir.display());
        Ok(Self::from_files(files))
    }

    pub fn from_files<I: IntoIterator<Item = SnapshotFile>>(files: I) -> Self {
        let mut days: BTreeMap<Day, Vec<SnapshotFile>> = BTreeMap::new();
        for file in files {
            days.entry(file.day()).or_default().push(file);
        }
        for files in days.values_mut() {
            files.sort();
        }
        Self { days }
    }

    pub fn days(&self) -> impl Iterator<Item = &Day> {
        self.days.keys()
    }

    pub fn files(&self, day: &Day) -> &[SnapshotFile] {
        self.days.get(day).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Days to render: all of them, or only `filter` when given.
    pub fn select(&self, filter: Option<&Day>) -> Vec<Day> {
        self.days
            .keys()
            .filter(|day| filter.map_or(true, |f| f == *day))
            .copied()
            .collect()
    }

    pub fn counts_by_day(&self) -> BTreeMap<Day, usize> {
        self.days.iter().map(|(day, files)| (*day, files.len())).collect()
    }

    pub fn len(&self) -> usize {
        self.days.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_snapshot_name() {
        let (day, ts) = parse_snapshot_name("20260203-101500.csv").unwrap();
        assert_eq!(day, "20260203");
        assert_eq!(
            ts,
            NaiveDate::from_ymd_opt(2026, 2, 3).unwrap().and_hms_opt(10, 15, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_snapshot_name_rejects_malformed() {
        assert!(parse_snapshot_name("latest.csv").is_none());
        assert!(parse_snapshot_name("20260203.csv").is_none());
        assert!(parse_snapshot_name("20260203-99.csv").is_none());
        assert!(parse_snapshot_name("2026023-101500.csv").is_none());
        assert!(parse_snapshot_name("20260203-250000.csv").is_none());
    }

    #[test]
    fn test_catalog_groups_and_orders() {
        let file = |name: &str| {
            let (_, timestamp) = parse_snapshot_name(name).unwrap();
            SnapshotFile { timestamp, path: PathBuf::from(name) }
        };
        let catalog = SnapshotCatalog::from_files(vec![
            file("20260204-120000.csv"),
            file("20260203-150000.csv"),
            file("20260203-100000.csv"),
        ]);

        let days: Vec<String> = catalog.days().map(Day::key).collect();
        assert_eq!(days, vec!["20260203", "20260204"]);

        let day = Day::parse("20260203").unwrap();
        let names: Vec<_> = catalog.files(&day).iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            names,
            vec![PathBuf::from("20260203-100000.csv"), PathBuf::from("20260203-150000.csv")]
        );
        assert_eq!(catalog.select(Some(&day)), vec![day]);
        assert_eq!(catalog.select(None).len(), 2);
        assert_eq!(catalog.counts_by_day()[&day], 2);
    }
}
