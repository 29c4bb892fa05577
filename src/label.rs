//! Text of the floating labels drawn above blocks and groups.
//!
//! Only the strings are produced here; colors, fonts and layout belong to the
//! renderer. Grouped labels describe the parent and summarize its children.

use serde::Serialize;

use crate::model::{Block, BlockDetails, BlockKind, HotelEventType};
use crate::relationships::BlockRelationship;
use crate::timeline::TripTimeline;

const SEP: &str = " • ";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelContent {
    pub title: String,
    pub subtitle: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Upper-case badge text, e.g. `FLIGHT`, `HOTEL + ACTIVITY` or `BLOCK`.
    pub type_tag: String,
}

/// Label text for `block`. Pass the relationship it parents, if any, to get
/// the grouped form.
pub fn label_content(
    block: &Block,
    relationship: Option<&BlockRelationship>,
    timeline: &TripTimeline,
) -> LabelContent {
    match relationship {
        Some(rel) => grouped(rel, timeline),
        None => individual(block, timeline),
    }
}

fn individual(block: &Block, timeline: &TripTimeline) -> LabelContent {
    let type_tag = match block.kind() {
        BlockKind::Generic => "BLOCK".to_string(),
        kind => kind.as_str().to_uppercase(),
    };
    let mut details = Vec::new();
    let subtitle = match &block.details {
        BlockDetails::Flight(flight) => {
            details.extend(first_segment(block));
            details.extend(date_range(block, timeline));
            format!(
                "{}{SEP}{}h",
                plural(flight.segments.len(), "segment", "segments"),
                fmt_hours(block.duration_hours.unwrap_or(0.0))
            )
        }
        BlockDetails::Hotel(hotel) => {
            let mut kinds: Vec<&str> = Vec::new();
            for e in &hotel.events {
                let name = match e.event_type {
                    HotelEventType::Checkin => "CHECKIN",
                    HotelEventType::Checkout => "CHECKOUT",
                };
                if !kinds.contains(&name) {
                    kinds.push(name);
                }
            }
            if !kinds.is_empty() {
                details.push(kinds.join(", "));
            }
            details.extend(date_range(block, timeline));
            let days = (block.duration_hours.unwrap_or(0.0) / 24.0).ceil() as usize;
            format!(
                "{}{SEP}{}",
                plural(hotel.events.len(), "event", "events"),
                plural(days, "day", "days")
            )
        }
        BlockDetails::Activity(activity) => {
            if !activity.activity_type.is_empty() {
                details.push(activity.activity_type.clone());
            }
            format!(
                "{}{SEP}{}h",
                activity.activity_type,
                fmt_hours(block.duration_hours.unwrap_or(0.0))
            )
        }
        BlockDetails::Generic => "Block".to_string(),
    };

    LabelContent {
        title: headline(block),
        subtitle,
        details: join(details),
        type_tag,
    }
}

fn grouped(rel: &BlockRelationship, timeline: &TripTimeline) -> LabelContent {
    let parent = &rel.parent;

    let mut summary = Vec::new();
    match &parent.details {
        BlockDetails::Flight(flight) => summary.push(format!(
            "{}{SEP}{}h",
            plural(flight.segments.len(), "segment", "segments"),
            fmt_hours(parent.duration_hours.unwrap_or(0.0))
        )),
        BlockDetails::Hotel(hotel) => {
            let days = (parent.duration_hours.unwrap_or(0.0) / 24.0).ceil() as usize;
            summary.push(format!(
                "{}{SEP}{}",
                plural(hotel.events.len(), "event", "events"),
                plural(days, "day", "days")
            ));
        }
        BlockDetails::Activity(_) | BlockDetails::Generic => {}
    }
    let count = |kind: BlockKind| rel.children.iter().filter(|c| c.kind() == kind).count();
    for (kind, one, many) in [
        (BlockKind::Flight, "flight", "flights"),
        (BlockKind::Hotel, "hotel", "hotels"),
        (BlockKind::Activity, "activity", "activities"),
        (BlockKind::Generic, "block", "blocks"),
    ] {
        let n = count(kind);
        if n > 0 {
            summary.push(plural(n, one, many));
        }
    }

    let mut details = Vec::new();
    match &parent.details {
        BlockDetails::Flight(_) => {
            details.extend(first_segment(parent));
            details.extend(date_range(parent, timeline));
        }
        BlockDetails::Hotel(hotel) => {
            details.push(hotel.hotel_name.clone());
            details.extend(date_range(parent, timeline));
        }
        BlockDetails::Activity(_) | BlockDetails::Generic => {}
    }
    if let Some(hotel) = rel.children.iter().find_map(Block::hotel) {
        details.push(format!("{} - {}", hotel.hotel_name, hotel.location));
    }
    if let Some(child) = rel.children.iter().find(|c| c.kind() == BlockKind::Activity) {
        let activity_type = child.activity().map(|a| a.activity_type.as_str()).unwrap_or("");
        details.push(format!("{} ({})", child.title, activity_type));
    }
    details.truncate(3);

    LabelContent {
        title: headline(parent),
        subtitle: summary.join(SEP),
        details: join(details),
        type_tag: rel.relationship_type.to_string().replace('-', " + ").to_uppercase(),
    }
}

fn headline(block: &Block) -> String {
    match &block.details {
        BlockDetails::Flight(f) => {
            format!("{} - {} → {}", block.title, f.departure_airport, f.arrival_airport)
        }
        BlockDetails::Hotel(h) => format!("{} - {}", h.hotel_name, h.location),
        BlockDetails::Activity(_) | BlockDetails::Generic => block.title.clone(),
    }
}

fn first_segment(block: &Block) -> Option<String> {
    let seg = block.flight()?.segments.first()?;
    Some(format!("{} ({}→{})", seg.flight_number, seg.departure, seg.arrival))
}

/// `"Dec 15 - Dec 18"`, from the block's own time range.
fn date_range(block: &Block, timeline: &TripTimeline) -> Option<String> {
    let start = block.start_time(timeline)?;
    let end = block.end_time(timeline)?;
    Some(format!("{} - {}", start.format("%b %-d"), end.format("%b %-d")))
}

fn plural(n: usize, one: &str, many: &str) -> String {
    format!("{n} {}", if n == 1 { one } else { many })
}

/// Hours rounded to one decimal, without a trailing `.0`.
fn fmt_hours(h: f64) -> String {
    let rounded = (h * 10.0).round() / 10.0;
    format!("{rounded}")
}

fn join(parts: Vec<String>) -> Option<String> {
    let parts: Vec<String> = parts.into_iter().filter(|p| !p.is_empty()).collect();
    (!parts.is_empty()).then(|| parts.join(SEP))
}
