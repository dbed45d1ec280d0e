//! Row layout for a day image
//!
//! Locations are grouped by region (regions in ascending name order) and
//! ordered by display name inside each region. Each location gets one
//! fixed-height row.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::metadata::MetadataIndex;
use crate::types::{DaySeries, LocationId, LocationInfo};

/// Fixed vertical geometry shared by every row of a day image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowGeometry {
    pub title_height: f64,
    pub row_height: f64,
    pub row_gap: f64,
    pub axis_height: f64,
    /// Gap kept between a row's edges and its plotting area.
    pub inset: f64,
}

impl Default for RowGeometry {
    fn default() -> Self {
        Self {
            title_height: 48.0,
            row_height: 24.0,
            row_gap: 10.0,
            axis_height: 24.0,
            inset: 4.0,
        }
    }
}

impl RowGeometry {
    pub fn pitch(&self) -> f64 {
        self.row_height + self.row_gap
    }

    /// Top edge of row `index`.
    pub fn row_top(&self, index: usize) -> f64 {
        self.title_height + index as f64 * self.pitch()
    }

    pub fn row_bottom(&self, index: usize) -> f64 {
        self.row_top(index) + self.row_height
    }

    pub fn row_mid(&self, index: usize) -> f64 {
        self.row_top(index) + self.row_height / 2.0
    }

    /// Top of the plotting area of row `index`.
    pub fn interior_top(&self, index: usize) -> f64 {
        self.row_top(index) + self.inset
    }

    /// Baseline (bottom of the plotting area) of row `index`.
    pub fn interior_bottom(&self, index: usize) -> f64 {
        self.row_bottom(index) - self.inset
    }

    /// Height of the stacked rows without title and axis.
    pub fn plot_height(&self, rows: usize) -> f64 {
        rows as f64 * self.row_height + rows.saturating_sub(1) as f64 * self.row_gap
    }

    pub fn canvas_height(&self, rows: usize) -> f64 {
        self.title_height + self.plot_height(rows) + self.axis_height
    }
}

/// One planned row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSlot {
    pub location: LocationId,
    pub index: usize,
    pub info: LocationInfo,
}

/// A contiguous run of rows sharing a region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionSpan {
    pub name: String,
    pub first_row: usize,
    pub row_count: usize,
}

impl RegionSpan {
    /// `None` for a span without rows.
    pub fn last_row(&self) -> Option<usize> {
        self.row_count.checked_sub(1).map(|n| self.first_row + n)
    }
}

/// Ordered rows and region grouping for one day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DayLayout {
    pub rows: Vec<RowSlot>,
    pub regions: Vec<RegionSpan>,
}

impl DayLayout {
    /// Order the locations present in `series`.
    pub fn plan(series: &DaySeries, metadata: &MetadataIndex) -> Self {
        let mut groups: BTreeMap<String, Vec<(LocationId, LocationInfo)>> = BTreeMap::new();
        for location in series.locations() {
            let info = metadata.location(location);
            groups
                .entry(info.region.clone())
                .or_default()
                .push((location.clone(), info));
        }

        let mut layout = DayLayout::default();
        for (region, mut members) in groups {
            // Location id breaks ties so equal names still order the same way.
            members.sort_by(|(a_id, a), (b_id, b)| {
                a.display_name.cmp(&b.display_name).then_with(|| a_id.cmp(b_id))
            });
            layout.regions.push(RegionSpan {
                name: region,
                first_row: layout.rows.len(),
                row_count: members.len(),
            });
            for (location, info) in members {
                let index = layout.rows.len();
                layout.rows.push(RowSlot { location, index, info });
            }
        }
        layout
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Whether rows follow `span`, i.e. it gets a separator below it.
    pub fn has_separator(&self, span: &RegionSpan) -> bool {
        span.last_row().map_or(false, |last| last + 1 < self.rows.len())
    }

    pub fn separated_regions(&self) -> impl Iterator<Item = &RegionSpan> {
        self.regions.iter().filter(move |span| self.has_separator(span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Day, Sample};
    use chrono::NaiveDate;

    fn series_for(locations: &[&str]) -> DaySeries {
        let ts = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(12, 0, 0).unwrap();
        let mut series = DaySeries::new(Day::parse("20260101").unwrap());
        for loc in locations {
            series.push(Sample { timestamp: ts, location: loc.to_string(), value: 1.0 });
        }
        series
    }

    fn metadata() -> MetadataIndex {
        MetadataIndex::from_json(
            r#"{
                "1": {"postal": "100", "name": "Zeta", "region": "Central"},
                "2": {"postal": "200", "name": "Alpha", "region": "Central"},
                "3": {"postal": "300", "name": "Mid", "region": "Bukit"},
                "4": {"postal": "400", "region": "Central"}
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_geometry() {
        let g = RowGeometry::default();
        assert_eq!(g.row_top(0), 48.0);
        assert_eq!(g.row_top(2), 48.0 + 2.0 * 34.0);
        assert_eq!(g.interior_top(0), 52.0);
        assert_eq!(g.interior_bottom(0), 68.0);
        assert_eq!(g.canvas_height(0), 72.0);
        assert_eq!(g.canvas_height(1), 96.0);
        assert_eq!(g.canvas_height(3), 48.0 + 3.0 * 24.0 + 2.0 * 10.0 + 24.0);
    }

    #[test]
    fn test_orders_regions_then_names() {
        let layout = DayLayout::plan(&series_for(&["100", "200", "300", "400", "999"]), &metadata());
        let order: Vec<&str> = layout.rows.iter().map(|r| r.location.as_str()).collect();
        // Bukit < Central < Unknown; unnamed "400" sorts first within Central.
        assert_eq!(order, vec!["300", "400", "200", "100", "999"]);

        let regions: Vec<(&str, usize, usize)> = layout
            .regions
            .iter()
            .map(|r| (r.name.as_str(), r.first_row, r.row_count))
            .collect();
        assert_eq!(regions, vec![("Bukit", 0, 1), ("Central", 1, 3), ("Unknown", 4, 1)]);

        let separated: Vec<&str> = layout.separated_regions().map(|r| r.name.as_str()).collect();
        assert_eq!(separated, vec!["Bukit", "Central"]);

        for (i, row) in layout.rows.iter().enumerate() {
            assert_eq!(row.index, i);
        }
    }

    #[test]
    fn test_region_order_ignores_size() {
        let layout = DayLayout::plan(&series_for(&["100", "200", "400", "300"]), &metadata());
        assert_eq!(layout.regions[0].name, "Bukit");
        assert_eq!(layout.regions[0].row_count, 1);
        assert_eq!(layout.regions[1].row_count, 3);
    }

    #[test]
    fn test_empty_series_has_no_rows() {
        let layout = DayLayout::plan(&DaySeries::default(), &metadata());
        assert!(layout.is_empty());
        assert_eq!(layout.separated_regions().count(), 0);
    }

    #[test]
    fn test_empty_span_has_no_last_row() {
        let empty = RegionSpan { name: "East".into(), first_row: 0, row_count: 0 };
        assert_eq!(empty.last_row(), None);
        let span = RegionSpan { name: "West".into(), first_row: 2, row_count: 3 };
        assert_eq!(span.last_row(), Some(4));

        let layout = DayLayout { rows: Vec::new(), regions: vec![empty.clone()] };
        assert!(!layout.has_separator(&empty));
    }
}
