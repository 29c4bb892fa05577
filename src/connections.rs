//! Temporal links between blocks, drawn as connector lines on the canvas.

use serde::{Deserialize, Serialize};

use crate::model::Block;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionKind {
    /// One block ends exactly where the other starts.
    Sequential,
    /// Blocks of different kinds share time.
    Overlapping,
    /// Blocks of the same kind share time.
    Conflicting,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockConnection {
    pub from_id: String,
    pub to_id: String,
    #[serde(rename = "type")]
    pub kind: ConnectionKind,
}

/// How `a` and `b` relate in time, if at all. Symmetric.
pub fn classify(a: &Block, b: &Block) -> Option<ConnectionKind> {
    if a.id == b.id {
        return None;
    }
    let (ra, rb) = (a.time_range()?, b.time_range()?);
    if ra.abuts(&rb) {
        Some(ConnectionKind::Sequential)
    } else if ra.overlaps(&rb) {
        if a.kind() == b.kind() {
            Some(ConnectionKind::Conflicting)
        } else {
            Some(ConnectionKind::Overlapping)
        }
    } else {
        None
    }
}

/// Every connected pair once. Sequential links point from the earlier block
/// to the later one; other links follow block-set order.
pub fn connections(blocks: &[Block]) -> Vec<BlockConnection> {
    let mut out = Vec::new();
    for (i, a) in blocks.iter().enumerate() {
        for b in &blocks[i + 1..] {
            let Some(kind) = classify(a, b) else {
                continue;
            };
            let (from, to) = match (kind, a.start_hour, b.start_hour) {
                (ConnectionKind::Sequential, Some(sa), Some(sb)) if sb < sa => (b, a),
                _ => (a, b),
            };
            out.push(BlockConnection {
                from_id: from.id.clone(),
                to_id: to.id.clone(),
                kind,
            });
        }
    }
    out
}
