//! Chart configuration
//!
//! Every layout constant, colour and threshold of a day image lives in one
//! immutable [`ChartConfig`] that is passed explicitly down the pipeline.

use crowdplot_core::types::MAX_SAMPLE_VALUE;
use crowdplot_core::RowGeometry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub width: f64,
    pub padding_left: f64,
    pub padding_right: f64,
    /// Baseline of the title text.
    pub title_y: f64,
    pub top_axis_y: f64,
    pub top_label_y: f64,
    /// Offset of the bottom axis below the last row.
    pub bottom_axis_offset: f64,
    /// Offset of bottom axis labels below the bottom axis.
    pub bottom_label_offset: f64,
    pub tick_length: f64,
    pub label_x: f64,
    pub region_label_x: f64,
    pub strong_hours: Vec<u32>,
    pub font_family: String,
    pub font_size: u32,
    pub title_font_size: u32,
    pub region_font_size: u32,
    /// Symbol placed before the auxiliary count in row labels.
    pub count_marker: String,
    pub line_width: f64,
    pub separator_width: f64,
    /// Samples above this value are dropped while aggregating.
    pub max_value: f64,
    pub rows: RowGeometry,
    pub window: TimeWindow,
    pub thresholds: Thresholds,
    pub palette: Palette,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 780.0,
            padding_left: 210.0,
            padding_right: 20.0,
            title_y: 18.0,
            top_axis_y: 38.0,
            top_label_y: 32.0,
            bottom_axis_offset: 8.0,
            bottom_label_offset: 16.0,
            tick_length: 4.0,
            label_x: 60.0,
            region_label_x: 24.0,
            strong_hours: vec![12, 15, 18, 21],
            font_family: "system-ui, -apple-system, Segoe UI, sans-serif".to_string(),
            font_size: 12,
            title_font_size: 14,
            region_font_size: 11,
            count_marker: "\u{1f3e7}".to_string(),
            line_width: 1.2,
            separator_width: 1.2,
            max_value: MAX_SAMPLE_VALUE,
            rows: RowGeometry::default(),
            window: TimeWindow::default(),
            thresholds: Thresholds::default(),
            palette: Palette::default(),
        }
    }
}

impl ChartConfig {
    pub fn plot_left(&self) -> f64 {
        self.padding_left
    }

    pub fn plot_right(&self) -> f64 {
        self.width - self.padding_right
    }

    pub fn plot_width(&self) -> f64 {
        self.plot_right() - self.plot_left()
    }

    pub fn is_strong_hour(&self, hour: u32) -> bool {
        self.strong_hours.contains(&hour)
    }
}

/// Wall-clock window shown on the time axis, in whole hours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self { start_hour: 10, end_hour: 22 }
    }
}

impl TimeWindow {
    /// Hour ticks, both ends included.
    pub fn hours(&self) -> impl Iterator<Item = u32> {
        self.start_hour..=self.end_hour
    }
}

/// Crowd levels separating the severity bands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Thresholds {
    pub moderate: f64,
    pub high: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { moderate: 14.0, high: 28.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub line: String,
    pub axis: String,
    pub grid: String,
    pub grid_strong: String,
    pub text: String,
    pub separator: String,
    pub low: String,
    pub moderate: String,
    pub high: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            line: "#111111".to_string(),
            axis: "#666666".to_string(),
            grid: "#dfe6eb".to_string(),
            grid_strong: "#9aa8b3".to_string(),
            text: "#111111".to_string(),
            separator: "#222222".to_string(),
            low: "#f6e58d".to_string(),
            moderate: "#f3b562".to_string(),
            high: "#e85f5c".to_string(),
        }
    }
}
