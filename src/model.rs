use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::geometry::Rect;
use crate::ids::IdGenerator;
use crate::timeline::{MIN_BLOCK_WIDTH, TimeRange, TripTimeline, block_position_with_min};

// ────────────────────────────────────────────────────────────────────────────
// BlockKind
// ────────────────────────────────────────────────────────────────────────────

/// Discriminant of a [`Block`]. Every kind-specific rule (containment,
/// vertical nesting offset, labels) is an exhaustive match over this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Flight,
    Hotel,
    Activity,
    Generic,
}

impl BlockKind {
    pub fn as_str(self) -> &'static str {
        match self {
            BlockKind::Flight => "flight",
            BlockKind::Hotel => "hotel",
            BlockKind::Activity => "activity",
            BlockKind::Generic => "generic",
        }
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Kind-specific payloads
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentType {
    Outbound,
    Return,
    Connecting,
}

/// One leg of a flight booking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightSegment {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub segment_type: SegmentType,
    pub flight_number: String,
    /// Departure airport code.
    #[serde(default)]
    pub departure: String,
    /// Arrival airport code.
    #[serde(default)]
    pub arrival: String,
    /// Hours since trip start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_hour: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,
}

impl FlightSegment {
    pub fn time_range(&self) -> Option<TimeRange> {
        time_range_of(self.start_hour, self.duration_hours)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightDetails {
    #[serde(default)]
    pub departure_airport: String,
    #[serde(default)]
    pub arrival_airport: String,
    #[serde(default)]
    pub segments: Vec<FlightSegment>,
    /// Height of the header bar drawn at the top of the flight.
    #[serde(default = "default_flight_context_bar")]
    pub context_bar_height: f64,
    /// Height of the segment strip below the header bar.
    #[serde(default = "default_flight_segment_height")]
    pub segment_height: f64,
}

fn default_flight_context_bar() -> f64 {
    24.0
}

fn default_flight_segment_height() -> f64 {
    80.0
}

impl FlightDetails {
    pub fn new(departure_airport: impl Into<String>, arrival_airport: impl Into<String>) -> Self {
        Self {
            departure_airport: departure_airport.into(),
            arrival_airport: arrival_airport.into(),
            segments: Vec::new(),
            context_bar_height: default_flight_context_bar(),
            segment_height: default_flight_segment_height(),
        }
    }

    pub fn with_segment(mut self, segment: FlightSegment) -> Self {
        self.segments.push(segment);
        self
    }

    pub fn segment(&self, segment_type: SegmentType) -> Option<&FlightSegment> {
        self.segments.iter().find(|s| s.segment_type == segment_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HotelEventType {
    Checkin,
    Checkout,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelEvent {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: HotelEventType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// Hours since trip start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_hour: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelDetails {
    #[serde(default)]
    pub hotel_name: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub events: Vec<HotelEvent>,
    #[serde(default = "default_hotel_context_bar")]
    pub context_bar_height: f64,
    #[serde(default = "default_hotel_event_height")]
    pub event_height: f64,
}

fn default_hotel_context_bar() -> f64 {
    20.0
}

fn default_hotel_event_height() -> f64 {
    60.0
}

impl HotelDetails {
    pub fn new(hotel_name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            hotel_name: hotel_name.into(),
            location: location.into(),
            events: Vec::new(),
            context_bar_height: default_hotel_context_bar(),
            event_height: default_hotel_event_height(),
        }
    }

    pub fn with_event(mut self, event: HotelEvent) -> Self {
        self.events.push(event);
        self
    }

    pub fn event(&self, event_type: HotelEventType) -> Option<&HotelEvent> {
        self.events.iter().find(|e| e.event_type == event_type)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityDetails {
    #[serde(default)]
    pub activity_type: String,
    #[serde(default)]
    pub location: String,
}

/// Kind tag plus the fields only that kind carries. Flattened into [`Block`]
/// on the wire as `"kind": "flight" | "hotel" | "activity" | "generic"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BlockDetails {
    Flight(FlightDetails),
    Hotel(HotelDetails),
    Activity(ActivityDetails),
    Generic,
}

impl BlockDetails {
    pub fn kind(&self) -> BlockKind {
        match self {
            BlockDetails::Flight(_) => BlockKind::Flight,
            BlockDetails::Hotel(_) => BlockKind::Hotel,
            BlockDetails::Activity(_) => BlockKind::Activity,
            BlockDetails::Generic => BlockKind::Generic,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Block
// ────────────────────────────────────────────────────────────────────────────

/// A placeable itinerary item.
///
/// `x` and `width` are derived from `start_hour`/`duration_hours` whenever
/// both are present (see [`Block::sync_geometry`]). Blocks without time data
/// are free canvas items that only snap to the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    /// Hours since trip start.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_hour: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(flatten)]
    pub details: BlockDetails,
}

impl Block {
    /// Create a time-less block with the default size of its kind at the
    /// canvas origin. Use the `with_*` builders to place it in time.
    pub fn new(ids: &mut impl IdGenerator, title: impl Into<String>, details: BlockDetails) -> Self {
        let kind = details.kind();
        let (width, height) = default_size(kind);
        Self {
            id: ids.next_id(kind),
            title: title.into(),
            x: 0.0,
            y: 0.0,
            width,
            height,
            start_hour: None,
            duration_hours: None,
            color: None,
            details,
        }
    }

    /// Set the time range and derive `x`/`width` from it.
    pub fn with_time_range(mut self, range: TimeRange, timeline: &TripTimeline, min_width: f64) -> Self {
        self.start_hour = Some(range.start_hour);
        self.duration_hours = Some(range.duration_hours);
        self.sync_geometry(timeline, min_width);
        self
    }

    /// Set the time range from absolute timestamps.
    pub fn with_times(self, start: NaiveDateTime, end: NaiveDateTime, timeline: &TripTimeline) -> Self {
        let range = timeline.range_from_times(start, end);
        self.with_time_range(range, timeline, MIN_BLOCK_WIDTH)
    }

    pub fn with_y(mut self, y: f64) -> Self {
        self.y = y;
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    pub fn kind(&self) -> BlockKind {
        self.details.kind()
    }

    /// The block's time range, or `None` when either field is missing or the
    /// range is degenerate (non-finite, zero or negative duration).
    pub fn time_range(&self) -> Option<TimeRange> {
        time_range_of(self.start_hour, self.duration_hours)
    }

    pub fn has_time_data(&self) -> bool {
        self.time_range().is_some()
    }

    pub fn rect(&self) -> Rect {
        self.rect_at(self.x, self.y)
    }

    /// Bounding box if the block's top-left corner were at `(x, y)`.
    pub fn rect_at(&self, x: f64, y: f64) -> Rect {
        Rect::from_xywh(x, y, self.width, self.height)
    }

    /// Re-derive `x` and `width` from the time range. Blocks without time
    /// data keep their pixel geometry.
    pub fn sync_geometry(&mut self, timeline: &TripTimeline, min_width: f64) {
        if let Some(range) = self.time_range() {
            let pos = block_position_with_min(
                range.start_hour,
                range.duration_hours,
                timeline.scale(),
                min_width,
            );
            self.x = pos.x;
            self.width = pos.width;
        }
    }

    pub fn start_time(&self, timeline: &TripTimeline) -> Option<NaiveDateTime> {
        self.time_range().map(|r| timeline.time_at_hour(r.start_hour))
    }

    pub fn end_time(&self, timeline: &TripTimeline) -> Option<NaiveDateTime> {
        self.time_range().map(|r| timeline.time_at_hour(r.end_hour()))
    }

    /// Header bar height of container kinds, `0.0` for leaf kinds.
    pub fn context_bar_height(&self) -> f64 {
        match &self.details {
            BlockDetails::Flight(f) => f.context_bar_height,
            BlockDetails::Hotel(h) => h.context_bar_height,
            BlockDetails::Activity(_) | BlockDetails::Generic => 0.0,
        }
    }

    /// Segment strip height, only flights have one.
    pub fn segment_height(&self) -> f64 {
        match &self.details {
            BlockDetails::Flight(f) => f.segment_height,
            _ => 0.0,
        }
    }

    pub fn flight(&self) -> Option<&FlightDetails> {
        match &self.details {
            BlockDetails::Flight(f) => Some(f),
            _ => None,
        }
    }

    pub fn hotel(&self) -> Option<&HotelDetails> {
        match &self.details {
            BlockDetails::Hotel(h) => Some(h),
            _ => None,
        }
    }

    pub fn activity(&self) -> Option<&ActivityDetails> {
        match &self.details {
            BlockDetails::Activity(a) => Some(a),
            _ => None,
        }
    }
}

fn time_range_of(start_hour: Option<f64>, duration_hours: Option<f64>) -> Option<TimeRange> {
    let range = TimeRange::new(start_hour?, duration_hours?);
    range.is_valid().then_some(range)
}

/// Pixel size of a freshly created, time-less block.
fn default_size(kind: BlockKind) -> (f64, f64) {
    match kind {
        BlockKind::Flight => (200.0, 150.0),
        BlockKind::Hotel => (150.0, 100.0),
        BlockKind::Activity => (80.0, 60.0),
        BlockKind::Generic => (120.0, 80.0),
    }
}
