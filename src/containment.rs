//! Which block kinds may nest inside which.
//!
//! | parent   | allowed children        |
//! |----------|-------------------------|
//! | flight   | hotel, activity         |
//! | hotel    | activity                |
//! | generic  | any                     |
//! | activity | none                    |
//!
//! This table is consulted before any geometric or temporal check.

use crate::model::{Block, BlockKind};

pub fn can_contain(parent: BlockKind, child: BlockKind) -> bool {
    match parent {
        BlockKind::Flight => matches!(child, BlockKind::Hotel | BlockKind::Activity),
        BlockKind::Hotel => matches!(child, BlockKind::Activity),
        BlockKind::Generic => true,
        BlockKind::Activity => false,
    }
}

/// True when `outer` may contain `inner` by kind and `inner`'s time range lies
/// within `outer`'s. Blocks without time data never nest.
pub fn nests_within(outer: &Block, inner: &Block) -> bool {
    if outer.id == inner.id || !can_contain(outer.kind(), inner.kind()) {
        return false;
    }
    match (outer.time_range(), inner.time_range()) {
        (Some(o), Some(i)) => o.contains(&i),
        _ => false,
    }
}

/// Distance from a parent's top edge to the top edge of a nested child.
///
/// Hotels sit just below a parent's header bar; activities inside a flight sit
/// below both the header and the segment strip. Parents without bars (generic)
/// align the child with their own top edge.
pub fn vertical_offset(child: BlockKind, parent: &Block, gap: f64) -> f64 {
    let header = parent.context_bar_height();
    match (parent.kind(), child) {
        (BlockKind::Flight, BlockKind::Activity) => header + parent.segment_height() + gap,
        (BlockKind::Flight, _) | (BlockKind::Hotel, _) => header + gap,
        (BlockKind::Generic, _) | (BlockKind::Activity, _) => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::model::{BlockDetails, FlightDetails, HotelDetails};

    const KINDS: [BlockKind; 4] = [
        BlockKind::Flight,
        BlockKind::Hotel,
        BlockKind::Activity,
        BlockKind::Generic,
    ];

    #[test]
    fn test_table() {
        assert!(can_contain(BlockKind::Flight, BlockKind::Hotel));
        assert!(can_contain(BlockKind::Flight, BlockKind::Activity));
        assert!(!can_contain(BlockKind::Flight, BlockKind::Flight));
        assert!(can_contain(BlockKind::Hotel, BlockKind::Activity));
        assert!(!can_contain(BlockKind::Hotel, BlockKind::Flight));
        assert!(!can_contain(BlockKind::Hotel, BlockKind::Hotel));
        for k in KINDS {
            assert!(can_contain(BlockKind::Generic, k));
            assert!(!can_contain(BlockKind::Activity, k));
        }
    }

    #[test]
    fn test_antisymmetric_between_typed_kinds() {
        for a in KINDS {
            for b in KINDS {
                if a != b && a != BlockKind::Generic && b != BlockKind::Generic {
                    assert!(!(can_contain(a, b) && can_contain(b, a)), "{a} <-> {b}");
                }
            }
        }
    }

    #[test]
    fn test_vertical_offsets() {
        let mut ids = SequentialIds::default();
        let flight = Block::new(&mut ids, "f", BlockDetails::Flight(FlightDetails::new("A", "B")))
            .with_y(100.0);
        let hotel = Block::new(&mut ids, "h", BlockDetails::Hotel(HotelDetails::new("H", "L")));
        let generic = Block::new(&mut ids, "g", BlockDetails::Generic);

        assert_eq!(vertical_offset(BlockKind::Hotel, &flight, 10.0), 34.0);
        assert_eq!(vertical_offset(BlockKind::Activity, &flight, 10.0), 114.0);
        assert_eq!(vertical_offset(BlockKind::Activity, &hotel, 10.0), 30.0);
        assert_eq!(vertical_offset(BlockKind::Flight, &generic, 10.0), 0.0);
    }
}
