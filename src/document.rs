//! Trip documents: a timeline plus its ordered block set, as JSON.
//!
//! ```json
//! {
//!   "timeline": { "startDate": "2024-12-15T00:00:00", "endDate": "2024-12-22T00:00:00", "scale": 20 },
//!   "blocks": [ { "id": "f1", "kind": "flight", "startHour": 0, "durationHours": 24, ... } ]
//! }
//! ```

use anyhow::{Context, Result};
use camino::Utf8Path;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::error::StoreError;
use crate::model::Block;
use crate::store::InMemoryBlockStore;
use crate::timeline::TripTimeline;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDocument {
    pub timeline: TripTimeline,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl TripDocument {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse trip document")
    }

    pub fn load(path: impl AsRef<Utf8Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read trip document {}", path))?;
        let doc = Self::from_json_str(&contents).with_context(|| format!("In {}", path))?;
        tracing::info!(
            path = %path,
            blocks = doc.blocks.len(),
            start = %doc.timeline.start_date(),
            end = %doc.timeline.end_date(),
            "loaded trip document"
        );
        Ok(doc)
    }

    /// Re-derive `x`/`width` of every timed block from its time range.
    /// Returns the number of blocks whose geometry changed.
    pub fn normalize_geometry(&mut self, min_width: f64) -> usize {
        let mut changed = 0;
        for block in &mut self.blocks {
            let before = (block.x, block.width);
            block.sync_geometry(&self.timeline, min_width);
            if before != (block.x, block.width) {
                tracing::debug!(id = %block.id, x = block.x, width = block.width, "geometry re-derived");
                changed += 1;
            }
        }
        changed
    }

    pub fn into_store(self) -> Result<(TripTimeline, InMemoryBlockStore), StoreError> {
        let store = InMemoryBlockStore::from_blocks(self.blocks)?;
        Ok((self.timeline, store))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeline::MIN_BLOCK_WIDTH;

    const DOC: &str = r#"{
        "timeline": { "startDate": "2024-12-15T00:00:00", "endDate": "2024-12-22T00:00:00" },
        "blocks": [
            { "id": "a", "kind": "activity", "activityType": "tour",
              "x": 999, "width": 1, "startHour": 10, "durationHours": 2 },
            { "id": "n", "kind": "generic", "x": 5, "y": 5, "width": 40, "height": 40 }
        ]
    }"#;

    #[test]
    fn test_parse_and_normalize() {
        let mut doc = TripDocument::from_json_str(DOC).unwrap();
        assert_eq!(doc.timeline.scale(), 20.0);
        assert_eq!(doc.normalize_geometry(MIN_BLOCK_WIDTH), 1);
        assert_eq!((doc.blocks[0].x, doc.blocks[0].width), (200.0, 40.0));
        assert_eq!((doc.blocks[1].x, doc.blocks[1].width), (5.0, 40.0));
    }

    #[test]
    fn test_invalid_timeline_rejected() {
        let json = r#"{ "timeline": { "startDate": "2024-12-15T00:00:00",
                                       "endDate": "2024-12-14T00:00:00" } }"#;
        let err = TripDocument::from_json_str(json).unwrap_err();
        assert!(format!("{err:#}").contains("must be after"));
    }

    #[test]
    fn test_duplicate_ids_rejected_by_store() {
        let json = r#"{
            "timeline": { "startDate": "2024-12-15T00:00:00", "endDate": "2024-12-16T00:00:00" },
            "blocks": [ { "id": "x", "kind": "generic" }, { "id": "x", "kind": "generic" } ]
        }"#;
        let doc = TripDocument::from_json_str(json).unwrap();
        assert_eq!(doc.into_store().unwrap_err(), StoreError::DuplicateId("x".into()));
    }
}
