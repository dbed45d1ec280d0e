//! Per-location row rendering
//!
//! A row is an area chart whose fill is split into three severity bands.
//! The bands are plain full-width rectangles clipped to the area under the
//! series, with the raw polyline stroked on top.

use crowdplot_core::{Day, Point, RowSlot};

use crate::config::ChartConfig;
use crate::coords::{value_to_y, TimeAxis};
use crate::scene::{Element, PathData, Pt, Text};

/// Vertical extent of one band, `top <= bottom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub top: f64,
    pub bottom: f64,
}

impl Span {
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// Severity bands of one row, listed top to bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeverityBands {
    pub high: Span,
    pub moderate: Span,
    pub low: Span,
}

/// Split the plotting area `[top, bottom]` at the pixel positions of the
/// configured thresholds. Every band stays inside the plotting area.
pub fn severity_bands(config: &ChartConfig, top: f64, bottom: f64, day_max: f64) -> SeverityBands {
    let clamp = |y: f64| y.min(bottom).max(top);
    let y_moderate = clamp(value_to_y(config.thresholds.moderate, top, bottom, day_max));
    let y_high = clamp(value_to_y(config.thresholds.high, top, bottom, day_max));

    let high = Span { top, bottom: y_high };
    let moderate = Span {
        top: high.bottom,
        bottom: y_moderate.min(bottom).max(high.bottom),
    };
    let low = Span { top: moderate.bottom, bottom };
    SeverityBands { high, moderate, low }
}

/// Clip identifier of a row, unique per day and row.
pub fn clip_id(day: &Day, row_index: usize) -> String {
    format!("clip-{}-{}", day.key(), row_index)
}

/// Everything a row needs that is shared across the day.
#[derive(Debug, Clone, Copy)]
pub struct RowContext<'a> {
    pub config: &'a ChartConfig,
    pub axis: &'a TimeAxis,
    pub day: &'a Day,
    pub day_max: f64,
}

/// Render one row. Returns `None` for a location without samples.
pub fn render_row(ctx: &RowContext<'_>, slot: &RowSlot, series: &[Point]) -> Option<Element> {
    if series.is_empty() {
        return None;
    }
    let config = ctx.config;
    let geometry = &config.rows;
    let top = geometry.interior_top(slot.index);
    let bottom = geometry.interior_bottom(slot.index);
    let mid = geometry.row_mid(slot.index);

    let mut ordered = series.to_vec();
    ordered.sort_by_key(|p| p.timestamp);
    let points: Vec<Pt> = ordered
        .iter()
        .map(|p| Pt::new(ctx.axis.x_for(p.timestamp), value_to_y(p.value, top, bottom, ctx.day_max)))
        .collect();

    let mut children = label_elements(config, slot, mid);

    let clip = clip_id(ctx.day, slot.index);
    children.push(Element::ClipPath {
        id: clip.clone(),
        path: PathData::area_under(&points, bottom),
    });

    let bands = severity_bands(config, top, bottom, ctx.day_max);
    let palette = &config.palette;
    for (span, fill) in [
        (bands.high, &palette.high),
        (bands.moderate, &palette.moderate),
        (bands.low, &palette.low),
    ] {
        children.push(Element::Rect {
            x: config.plot_left(),
            y: span.top,
            width: config.plot_width(),
            height: span.height(),
            fill: fill.clone(),
            clip: Some(clip.clone()),
        });
    }

    children.push(Element::Polyline {
        points,
        stroke: palette.line.clone(),
        width: config.line_width,
    });

    Some(Element::Group(children))
}

/// Display name above a dimmed postal code (plus auxiliary count).
fn label_elements(config: &ChartConfig, slot: &RowSlot, mid: f64) -> Vec<Element> {
    let mut detail = slot.location.clone();
    if let Some(count) = slot.info.auxiliary_count.as_deref().filter(|c| !c.is_empty()) {
        detail = format!("{} {} {}", detail, config.count_marker, count);
    }
    vec![
        Element::Text(Text::new(config.label_x, mid - 2.0, slot.info.display_name.clone()).weight(600)),
        Element::Text(
            Text::new(config.label_x, mid + 12.0, detail)
                .fill(config.palette.text.clone())
                .opacity(0.5),
        ),
    ]
}
