use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type LocationId = String;

/// Format used for day keys in file names and titles.
pub const DAY_FORMAT: &str = "%Y%m%d";

/// Region assigned to locations the metadata does not place anywhere.
pub const UNKNOWN_REGION: &str = "Unknown";

/// Largest crowd value accepted from a snapshot row.
pub const MAX_SAMPLE_VALUE: f64 = 500.0;

/// One parsed snapshot row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: NaiveDateTime,
    pub location: LocationId,
    pub value: f64,
}

/// A single point of a location's series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// Calendar day, rendered as `YYYYMMDD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Day(pub NaiveDate);

impl Day {
    /// Parse an 8-digit `YYYYMMDD` key.
    pub fn parse(key: &str) -> Option<Self> {
        if key.len() != 8 || !key.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        NaiveDate::parse_from_str(key, DAY_FORMAT).ok().map(Day)
    }

    pub fn key(&self) -> String {
        self.0.format(DAY_FORMAT).to_string()
    }

    /// `YYYY-MM-DD`, used in human-facing listings.
    pub fn iso(&self) -> String {
        self.0.format("%Y-%m-%d").to_string()
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl std::fmt::Display for Day {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// All series for one day, keyed by location.
///
/// Keys are kept in a `BTreeMap` so iteration order never depends on the
/// order in which snapshot files were read.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DaySeries {
    pub day: Option<Day>,
    pub series: BTreeMap<LocationId, Vec<Point>>,
}

impl DaySeries {
    pub fn new(day: Day) -> Self {
        Self { day: Some(day), series: BTreeMap::new() }
    }

    pub fn push(&mut self, sample: Sample) {
        self.series
            .entry(sample.location)
            .or_default()
            .push(Point { timestamp: sample.timestamp, value: sample.value });
    }

    pub fn get(&self, location: &str) -> Option<&[Point]> {
        self.series.get(location).map(|points| points.as_slice())
    }

    /// Locations with at least one sample.
    pub fn locations(&self) -> impl Iterator<Item = &LocationId> {
        self.series
            .iter()
            .filter(|(_, points)| !points.is_empty())
            .map(|(location, _)| location)
    }

    pub fn is_empty(&self) -> bool {
        self.locations().next().is_none()
    }

    pub fn sample_count(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    /// Shared vertical scale for the day: the largest sample value, never
    /// below zero.
    pub fn day_max(&self) -> f64 {
        self.series
            .values()
            .flatten()
            .map(|p| p.value)
            .fold(0.0, f64::max)
    }
}

/// Resolved metadata for one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationInfo {
    pub display_name: String,
    pub region: String,
    pub auxiliary_count: Option<String>,
}

impl Default for LocationInfo {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            region: UNKNOWN_REGION.to_string(),
            auxiliary_count: None,
        }
    }
}
