//! Time and value mappings shared by every row of a day image.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};

use crate::config::TimeWindow;

/// Maps wall-clock time within a day window onto the horizontal plot span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeAxis {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub left: f64,
    pub right: f64,
}

impl TimeAxis {
    pub fn new(date: NaiveDate, window: TimeWindow, left: f64, right: f64) -> Self {
        Self {
            start: hour_on(date, window.start_hour),
            end: hour_on(date, window.end_hour),
            left,
            right,
        }
    }

    fn span_seconds(&self) -> f64 {
        (self.end - self.start).num_milliseconds() as f64 / 1000.0
    }

    /// Pixel x of `ts`. Times outside the window sit on the nearest edge.
    pub fn x_for(&self, ts: NaiveDateTime) -> f64 {
        let span = self.span_seconds();
        if span <= 0.0 {
            return self.left;
        }
        let t = ((ts - self.start).num_milliseconds() as f64 / 1000.0).clamp(0.0, span);
        self.left + (t / span) * (self.right - self.left)
    }

    /// Pixel x of the full hour `hour` on the axis day.
    pub fn x_for_hour(&self, hour: u32) -> f64 {
        self.x_for(hour_on(self.start.date(), hour))
    }
}

fn hour_on(date: NaiveDate, hour: u32) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + Duration::hours(i64::from(hour))
}

/// Pixel y of `value` inside a plotting band `[top, bottom]`.
///
/// Larger values sit higher (smaller y). Negative values count as zero. A
/// `day_max` of zero puts everything on the band's mid line.
pub fn value_to_y(value: f64, top: f64, bottom: f64, day_max: f64) -> f64 {
    if day_max <= 0.0 {
        return (top + bottom) / 2.0;
    }
    let v = value.max(0.0);
    top + (day_max - v) / day_max * (bottom - top)
}

/// 12-hour clock label: `0` → `12am`, `12` → `12pm`, `15` → `3pm`.
pub fn hour_label(hour: u32) -> String {
    match hour % 24 {
        0 => "12am".to_string(),
        h @ 1..=11 => format!("{}am", h),
        12 => "12pm".to_string(),
        h => format!("{}pm", h - 12),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn axis() -> TimeAxis {
        TimeAxis::new(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), TimeWindow::default(), 210.0, 760.0)
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_time_axis_edges_and_clamp() {
        let axis = axis();
        assert_eq!(axis.x_for(at(10, 0)), 210.0);
        assert_eq!(axis.x_for(at(22, 0)), 760.0);
        assert_eq!(axis.x_for(at(16, 0)), 485.0);
        assert_eq!(axis.x_for(at(9, 0)), axis.x_for(at(10, 0)));
        assert_eq!(axis.x_for(at(23, 30)), 760.0);
        assert_eq!(axis.x_for_hour(22), 760.0);
    }

    #[test]
    fn test_window_ending_at_midnight() {
        let window = TimeWindow { start_hour: 0, end_hour: 24 };
        let axis = TimeAxis::new(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(), window, 0.0, 240.0);
        assert_eq!(axis.x_for(at(12, 0)), 120.0);
    }

    #[test]
    fn test_value_to_y() {
        assert_eq!(value_to_y(40.0, 52.0, 68.0, 40.0), 52.0);
        assert_eq!(value_to_y(0.0, 52.0, 68.0, 40.0), 68.0);
        assert_eq!(value_to_y(20.0, 52.0, 68.0, 40.0), 60.0);
        assert_eq!(value_to_y(-5.0, 52.0, 68.0, 40.0), 68.0);
    }

    #[test]
    fn test_zero_max_is_flat_mid_line() {
        for v in [0.0, 5.0, -1.0] {
            let y = value_to_y(v, 52.0, 68.0, 0.0);
            assert!(y.is_finite());
            assert_eq!(y, 60.0);
        }
    }

    #[test]
    fn test_hour_labels() {
        assert_eq!(hour_label(0), "12am");
        assert_eq!(hour_label(10), "10am");
        assert_eq!(hour_label(12), "12pm");
        assert_eq!(hour_label(15), "3pm");
        assert_eq!(hour_label(22), "10pm");
    }

    proptest! {
        #[test]
        fn time_mapping_is_monotonic(a in 0u32..86_400, b in 0u32..86_400) {
            let axis = axis();
            let day = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap().and_time(NaiveTime::MIN);
            let (lo, hi) = (a.min(b), a.max(b));
            let x_lo = axis.x_for(day + Duration::seconds(i64::from(lo)));
            let x_hi = axis.x_for(day + Duration::seconds(i64::from(hi)));
            prop_assert!(x_lo <= x_hi);
            prop_assert!((210.0..=760.0).contains(&x_lo));
            prop_assert!((210.0..=760.0).contains(&x_hi));
        }

        #[test]
        fn value_mapping_is_monotonic(a in -10.0f64..500.0, b in -10.0f64..500.0, max in 0.0f64..500.0) {
            let (lo, hi) = (a.min(b), a.max(b));
            prop_assert!(value_to_y(lo, 52.0, 68.0, max) >= value_to_y(hi, 52.0, 68.0, max));
        }
    }
}
