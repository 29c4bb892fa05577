//! Conversion between trip time and canvas pixels.
//!
//! The canvas is a linear time axis: hour `0` is the trip start and every hour
//! occupies `scale` pixels. All block geometry is derived from time through
//! [`block_position`], never the other way round.
//!
//! Glossary:
//! - Hour offset: fractional hours since the trip start, may be negative for
//!   items that precede the trip.
//! - Scale: pixels per hour, always positive (enforced by [`TripTimeline::new`]).

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::TimelineError;

/// Narrowest block the canvas will draw, in pixels.
pub const MIN_BLOCK_WIDTH: f64 = 20.0;

/// Pixels per hour used when a trip document does not specify one.
pub const DEFAULT_SCALE: f64 = 20.0;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Tolerance (in hours) for treating two range edges as the same instant.
const EDGE_EPSILON: f64 = 1e-9;

pub fn hour_to_x(hour: f64, scale: f64) -> f64 {
    hour * scale
}

/// Callers guarantee `scale > 0`.
pub fn x_to_hour(x: f64, scale: f64) -> f64 {
    x / scale
}

/// Hours between `trip_start` and `t`. Negative when `t` precedes the trip.
pub fn hours_from_trip_start(t: NaiveDateTime, trip_start: NaiveDateTime) -> f64 {
    (t - trip_start).num_milliseconds() as f64 / MS_PER_HOUR
}

/// Horizontal placement of a block derived from its time range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPosition {
    pub start_hour: f64,
    pub duration_hours: f64,
    pub x: f64,
    pub width: f64,
}

/// Derive `x` and `width` for a time range using [`MIN_BLOCK_WIDTH`].
pub fn block_position(start_hour: f64, duration_hours: f64, scale: f64) -> BlockPosition {
    block_position_with_min(start_hour, duration_hours, scale, MIN_BLOCK_WIDTH)
}

/// Same as [`block_position`] with an explicit minimum width.
pub fn block_position_with_min(
    start_hour: f64,
    duration_hours: f64,
    scale: f64,
    min_width: f64,
) -> BlockPosition {
    BlockPosition {
        start_hour,
        duration_hours,
        x: hour_to_x(start_hour, scale),
        width: (duration_hours * scale).max(min_width),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// TimeRange
// ────────────────────────────────────────────────────────────────────────────

/// Half-open interval `[start_hour, start_hour + duration_hours)` in trip hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start_hour: f64,
    pub duration_hours: f64,
}

impl TimeRange {
    pub fn new(start_hour: f64, duration_hours: f64) -> Self {
        Self {
            start_hour,
            duration_hours,
        }
    }

    pub fn end_hour(&self) -> f64 {
        self.start_hour + self.duration_hours
    }

    /// Finite start and a strictly positive, finite duration.
    pub fn is_valid(&self) -> bool {
        self.start_hour.is_finite() && self.duration_hours.is_finite() && self.duration_hours > 0.0
    }

    pub fn overlaps(&self, other: &TimeRange) -> bool {
        self.start_hour.max(other.start_hour) < self.end_hour().min(other.end_hour())
    }

    /// Length of the shared interval, `0.0` when the ranges are disjoint.
    pub fn overlap_hours(&self, other: &TimeRange) -> f64 {
        (self.end_hour().min(other.end_hour()) - self.start_hour.max(other.start_hour)).max(0.0)
    }

    /// True when `other` lies entirely inside `self` (edges inclusive).
    pub fn contains(&self, other: &TimeRange) -> bool {
        other.start_hour >= self.start_hour && other.end_hour() <= self.end_hour()
    }

    /// True when one range ends exactly where the other starts.
    pub fn abuts(&self, other: &TimeRange) -> bool {
        (self.end_hour() - other.start_hour).abs() < EDGE_EPSILON
            || (other.end_hour() - self.start_hour).abs() < EDGE_EPSILON
    }
}

// ────────────────────────────────────────────────────────────────────────────
// TripTimeline
// ────────────────────────────────────────────────────────────────────────────

/// Linear time axis of one trip document.
///
/// Fields are private so the `scale > 0` and `end > start` invariants hold for
/// every value, including deserialized ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTimeline", rename_all = "camelCase")]
pub struct TripTimeline {
    start_date: NaiveDateTime,
    end_date: NaiveDateTime,
    scale: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTimeline {
    start_date: NaiveDateTime,
    end_date: NaiveDateTime,
    #[serde(default = "default_scale")]
    scale: f64,
}

fn default_scale() -> f64 {
    DEFAULT_SCALE
}

impl TryFrom<RawTimeline> for TripTimeline {
    type Error = TimelineError;

    fn try_from(raw: RawTimeline) -> Result<Self, Self::Error> {
        TripTimeline::new(raw.start_date, raw.end_date, raw.scale)
    }
}

/// Start of a calendar day on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayMarker {
    pub date: NaiveDate,
    pub hour: f64,
    pub x: f64,
    /// e.g. `"Sun, Dec 15"`.
    pub label: String,
}

impl TripTimeline {
    pub fn new(
        start_date: NaiveDateTime,
        end_date: NaiveDateTime,
        scale: f64,
    ) -> Result<Self, TimelineError> {
        if !(scale.is_finite() && scale > 0.0) {
            return Err(TimelineError::InvalidScale(scale));
        }
        if end_date <= start_date {
            return Err(TimelineError::EmptyRange {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Self {
            start_date,
            end_date,
            scale,
        })
    }

    pub fn start_date(&self) -> NaiveDateTime {
        self.start_date
    }

    pub fn end_date(&self) -> NaiveDateTime {
        self.end_date
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn total_hours(&self) -> f64 {
        hours_from_trip_start(self.end_date, self.start_date)
    }

    pub fn hour_to_x(&self, hour: f64) -> f64 {
        hour_to_x(hour, self.scale)
    }

    pub fn x_to_hour(&self, x: f64) -> f64 {
        x_to_hour(x, self.scale)
    }

    pub fn hours_from_start(&self, t: NaiveDateTime) -> f64 {
        hours_from_trip_start(t, self.start_date)
    }

    /// Inverse of [`Self::hours_from_start`], rounded to the millisecond.
    pub fn time_at_hour(&self, hour: f64) -> NaiveDateTime {
        self.start_date + Duration::milliseconds((hour * MS_PER_HOUR).round() as i64)
    }

    /// Time range spanned by two absolute timestamps.
    pub fn range_from_times(&self, start: NaiveDateTime, end: NaiveDateTime) -> TimeRange {
        let start_hour = self.hours_from_start(start);
        TimeRange::new(start_hour, self.hours_from_start(end) - start_hour)
    }

    /// True when `range` lies within `[0, total_hours]`.
    pub fn contains_range(&self, range: &TimeRange) -> bool {
        range.start_hour >= 0.0 && range.end_hour() <= self.total_hours()
    }

    pub fn block_position(&self, start_hour: f64, duration_hours: f64) -> BlockPosition {
        block_position(start_hour, duration_hours, self.scale)
    }

    /// One marker for every calendar day that intersects the trip. The first
    /// marker is pinned to hour `0` even if the trip starts mid-day.
    pub fn day_markers(&self) -> Vec<DayMarker> {
        let mut markers = Vec::new();
        let mut date = self.start_date.date();
        loop {
            let midnight = date.and_time(NaiveTime::MIN);
            if midnight >= self.end_date {
                break;
            }
            let hour = self.hours_from_start(midnight).max(0.0);
            markers.push(DayMarker {
                date,
                hour,
                x: self.hour_to_x(hour),
                label: date.format("%a, %b %-d").to_string(),
            });
            match date.succ_opt() {
                Some(next) => date = next,
                None => break,
            }
        }
        markers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn week() -> TripTimeline {
        TripTimeline::new(dt("2024-12-15T00:00:00"), dt("2024-12-22T23:59:59"), 20.0).unwrap()
    }

    #[test]
    fn test_rejects_non_positive_scale() {
        let err = TripTimeline::new(dt("2024-12-15T00:00:00"), dt("2024-12-16T00:00:00"), 0.0);
        assert_eq!(err, Err(TimelineError::InvalidScale(0.0)));
        assert!(
            TripTimeline::new(dt("2024-12-15T00:00:00"), dt("2024-12-16T00:00:00"), -3.0).is_err()
        );
        assert!(
            TripTimeline::new(dt("2024-12-15T00:00:00"), dt("2024-12-16T00:00:00"), f64::NAN)
                .is_err()
        );
    }

    #[test]
    fn test_rejects_empty_range() {
        let start = dt("2024-12-15T00:00:00");
        assert!(matches!(
            TripTimeline::new(start, start, 20.0),
            Err(TimelineError::EmptyRange { .. })
        ));
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: TripTimeline = serde_json::from_str(
            r#"{"startDate":"2024-12-15T00:00:00","endDate":"2024-12-16T00:00:00"}"#,
        )
        .unwrap();
        assert_eq!(ok.scale(), DEFAULT_SCALE);
        assert_eq!(ok.total_hours(), 24.0);

        let bad = serde_json::from_str::<TripTimeline>(
            r#"{"startDate":"2024-12-16T00:00:00","endDate":"2024-12-15T00:00:00","scale":20}"#,
        );
        assert!(bad.is_err());
    }

    #[test]
    fn test_hours_from_trip_start_negative_before_trip() {
        let tl = week();
        assert_eq!(tl.hours_from_start(dt("2024-12-15T08:00:00")), 8.0);
        assert_eq!(tl.hours_from_start(dt("2024-12-14T22:30:00")), -1.5);
    }

    #[test]
    fn test_time_at_hour_inverts_hours_from_start() {
        let tl = week();
        let t = dt("2024-12-17T10:15:00");
        assert_eq!(tl.time_at_hour(tl.hours_from_start(t)), t);
    }

    #[test]
    fn test_block_position_min_width() {
        let p = block_position(2.0, 0.5, 20.0);
        assert_eq!(p.x, 40.0);
        assert_eq!(p.width, MIN_BLOCK_WIDTH);
        let p = block_position(0.0, 10.0, 20.0);
        assert_eq!(p.width, 200.0);
    }

    #[test]
    fn test_time_range_relations() {
        let outer = TimeRange::new(0.0, 24.0);
        let inner = TimeRange::new(5.0, 10.0);
        let after = TimeRange::new(24.0, 2.0);
        assert!(outer.contains(&inner));
        assert!(!inner.contains(&outer));
        assert!(outer.overlaps(&inner));
        assert_eq!(outer.overlap_hours(&inner), 10.0);
        assert!(!outer.overlaps(&after));
        assert_eq!(outer.overlap_hours(&after), 0.0);
        assert!(outer.abuts(&after));
        assert!(!TimeRange::new(1.0, 0.0).is_valid());
    }

    #[test]
    fn test_day_markers() {
        let tl = week();
        let markers = tl.day_markers();
        assert_eq!(markers.len(), 8);
        assert_eq!(markers[0].label, "Sun, Dec 15");
        assert_eq!(markers[0].x, 0.0);
        assert_eq!(markers[1].hour, 24.0);
        assert_eq!(markers[1].x, 480.0);
    }

    #[test]
    fn test_day_markers_mid_day_start() {
        let tl =
            TripTimeline::new(dt("2024-12-15T18:00:00"), dt("2024-12-17T00:00:00"), 10.0).unwrap();
        let markers = tl.day_markers();
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].hour, 0.0);
        assert_eq!(markers[1].hour, 6.0);
        assert_eq!(markers[1].x, 60.0);
    }
}
