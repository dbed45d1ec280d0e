//! Day image composition
//!
//! Draw order: title, hour grid, top axis, rows, bottom axis, then region
//! separators and labels.

use crowdplot_core::{Day, DayLayout, DaySeries};

use crate::config::ChartConfig;
use crate::coords::{hour_label, TimeAxis};
use crate::row::{render_row, RowContext};
use crate::scene::{Document, Element, Pt, Text, TextAnchor};

/// Build the full document for one day.
pub fn compose_day(config: &ChartConfig, day: &Day, series: &DaySeries, layout: &DayLayout) -> Document {
    let rows = layout.row_count();
    let geometry = &config.rows;
    let plot_height = geometry.plot_height(rows);
    let axis = TimeAxis::new(day.date(), config.window, config.plot_left(), config.plot_right());

    let mut doc = Document {
        width: config.width,
        height: geometry.canvas_height(rows),
        aria_label: format!("{} crowd by postal", day.key()),
        font_family: config.font_family.clone(),
        font_size: config.font_size,
        text_fill: config.palette.text.clone(),
        elements: Vec::new(),
    };

    doc.push(Element::Text(
        Text::new(config.plot_left(), config.title_y, day.key())
            .size(config.title_font_size)
            .weight(600),
    ));

    let grid_top = geometry.title_height;
    let grid_bottom = geometry.title_height + plot_height;
    for hour in config.window.hours() {
        let x = axis.x_for_hour(hour);
        let color = if config.is_strong_hour(hour) {
            &config.palette.grid_strong
        } else {
            &config.palette.grid
        };
        doc.push(Element::line(Pt::new(x, grid_top), Pt::new(x, grid_bottom), color, 1.0));
    }

    doc.push(hour_axis(config, &axis, config.top_axis_y, config.top_label_y));

    let ctx = RowContext {
        config,
        axis: &axis,
        day,
        day_max: series.day_max(),
    };
    for slot in &layout.rows {
        let points = series.get(&slot.location).unwrap_or(&[]);
        if let Some(row) = render_row(&ctx, slot, points) {
            doc.push(row);
        }
    }

    let bottom_axis_y = grid_bottom + config.bottom_axis_offset;
    doc.push(hour_axis(
        config,
        &axis,
        bottom_axis_y,
        bottom_axis_y + config.bottom_label_offset,
    ));

    for element in region_markers(config, layout) {
        doc.push(element);
    }

    log::debug!("Composed {} with {} rows, height {}", day, rows, doc.height);
    doc
}

/// Axis rule with a tick and a 12-hour label at every window hour.
fn hour_axis(config: &ChartConfig, axis: &TimeAxis, axis_y: f64, label_y: f64) -> Element {
    let stroke = &config.palette.axis;
    let mut children = vec![Element::line(
        Pt::new(config.plot_left(), axis_y),
        Pt::new(config.plot_right(), axis_y),
        stroke,
        1.0,
    )];
    for hour in config.window.hours() {
        let x = axis.x_for_hour(hour);
        children.push(Element::line(
            Pt::new(x, axis_y),
            Pt::new(x, axis_y + config.tick_length),
            stroke,
            1.0,
        ));
        children.push(Element::Text(Text::new(x - 12.0, label_y, hour_label(hour))));
    }
    Element::Group(children)
}

/// Separator after every region but the last, and a rotated label centred
/// on each region's rows.
fn region_markers(config: &ChartConfig, layout: &DayLayout) -> Vec<Element> {
    let geometry = &config.rows;
    let mut out = Vec::new();
    for span in &layout.regions {
        let Some(last) = span.last_row() else {
            continue;
        };
        if layout.has_separator(span) {
            let y = geometry.row_top(last + 1) - geometry.row_gap / 2.0;
            out.push(Element::line(
                Pt::new(config.plot_left(), y),
                Pt::new(config.plot_right(), y),
                &config.palette.separator,
                config.separator_width,
            ));
        }
        let center = (geometry.row_top(span.first_row) + geometry.row_bottom(last)) / 2.0;
        out.push(Element::Text(
            Text::new(config.region_label_x, center, span.name.clone())
                .size(config.region_font_size)
                .weight(600)
                .fill(config.palette.text.clone())
                .anchor(TextAnchor::Middle)
                .rotate(-90.0),
        ));
    }
    out
}
