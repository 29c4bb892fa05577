use tripsnap::model::{
    ActivityDetails, Block, BlockDetails, BlockKind, FlightDetails, HotelDetails, HotelEvent,
    HotelEventType,
};
use tripsnap::relationships::{LabelRole, group_relationships, label_role};

fn block(id: &str, details: BlockDetails, start: f64, dur: f64) -> Block {
    Block {
        id: id.to_string(),
        title: id.to_string(),
        x: start * 20.0,
        y: 0.0,
        width: dur * 20.0,
        height: 60.0,
        start_hour: Some(start),
        duration_hours: Some(dur),
        color: None,
        details,
    }
}

fn flight(id: &str, start: f64, dur: f64) -> Block {
    block(id, BlockDetails::Flight(FlightDetails::new("JFK", "CDG")), start, dur)
}

fn hotel(id: &str, start: f64, dur: f64) -> Block {
    block(id, BlockDetails::Hotel(HotelDetails::new(id, "Paris")), start, dur)
}

fn activity(id: &str, start: f64, dur: f64) -> Block {
    block(
        id,
        BlockDetails::Activity(ActivityDetails {
            activity_type: "museum".into(),
            location: "Paris".into(),
        }),
        start,
        dur,
    )
}

fn child_ids(children: &[Block]) -> Vec<&str> {
    children.iter().map(|c| c.id.as_str()).collect()
}

#[test]
fn nested_chain_groups_pairwise() {
    let blocks = vec![flight("f", 0.0, 24.0), hotel("h", 5.0, 10.0), activity("a", 7.0, 2.0)];

    let rels = group_relationships(&blocks);

    assert_eq!(rels.len(), 2);
    assert_eq!(rels[0].parent.id, "f");
    assert_eq!(child_ids(&rels[0].children), ["h"]);
    assert_eq!(rels[0].relationship_type.to_string(), "flight-hotel");
    assert_eq!(rels[1].parent.id, "h");
    assert_eq!(child_ids(&rels[1].children), ["a"]);
    assert_eq!(rels[1].relationship_type.child, BlockKind::Activity);
}

#[test]
fn childless_roots_are_omitted() {
    let blocks = vec![flight("f", 0.0, 24.0), hotel("h", 30.0, 10.0)];
    assert!(group_relationships(&blocks).is_empty());
    assert_eq!(label_role("f", &[]), LabelRole::Individual);
}

#[test]
fn partial_overlap_is_not_containment() {
    let blocks = vec![flight("f", 0.0, 10.0), hotel("h", 5.0, 10.0)];
    assert!(group_relationships(&blocks).is_empty());
}

#[test]
fn broken_parent_does_not_group() {
    let mut h = hotel("h", 0.0, 24.0);
    if let BlockDetails::Hotel(details) = &mut h.details {
        for (event_type, hour) in [(HotelEventType::Checkin, 20.0), (HotelEventType::Checkout, 2.0)] {
            details.events.push(HotelEvent {
                id: String::new(),
                event_type,
                date: None,
                start_hour: Some(hour),
            });
        }
    }
    let blocks = vec![h, activity("a", 4.0, 2.0)];
    assert!(group_relationships(&blocks).is_empty());
}

#[test]
fn untimed_blocks_never_group() {
    let mut a = activity("a", 4.0, 2.0);
    a.start_hour = None;
    let blocks = vec![flight("f", 0.0, 24.0), a];
    assert!(group_relationships(&blocks).is_empty());
}

#[test]
fn generic_container_groups_any_kind() {
    let blocks = vec![
        block("g", BlockDetails::Generic, 0.0, 100.0),
        flight("f", 10.0, 5.0),
        activity("a", 50.0, 1.0),
    ];
    let rels = group_relationships(&blocks);
    assert_eq!(rels.len(), 1);
    assert_eq!(child_ids(&rels[0].children), ["f", "a"]);
    assert_eq!(rels[0].relationship_type.to_string(), "generic-flight");
}

#[test]
fn identical_generic_blocks_form_one_group() {
    let blocks = vec![
        block("g1", BlockDetails::Generic, 0.0, 10.0),
        block("g2", BlockDetails::Generic, 0.0, 10.0),
    ];

    let rels = group_relationships(&blocks);

    assert_eq!(rels.len(), 1);
    assert_eq!(rels[0].parent.id, "g1");
    assert_eq!(child_ids(&rels[0].children), ["g2"]);
    assert!(matches!(label_role("g1", &rels), LabelRole::GroupParent(r) if r.parent.id == "g1"));
    assert_eq!(label_role("g2", &rels), LabelRole::GroupedChild { parent_id: "g1" });
}
