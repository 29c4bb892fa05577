//! Block repository.
//!
//! The placement engine only ever reads a snapshot of the block set; every
//! mutation goes through a [`BlockStore`] as a [`BlockUpdate`]. The in-memory
//! store keeps insertion order, which is also the order the snap resolver
//! walks candidate parents in.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::model::Block;

/// New position (and possibly new time) of one block.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockUpdate {
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_hour: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_hours: Option<f64>,
}

impl BlockUpdate {
    /// Move only, keeping size and time.
    pub fn moved(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            width: None,
            start_hour: None,
            duration_hours: None,
        }
    }

    pub fn apply_to(&self, block: &mut Block) {
        block.x = self.x;
        block.y = self.y;
        if let Some(w) = self.width {
            block.width = w;
        }
        if let Some(s) = self.start_hour {
            block.start_hour = Some(s);
        }
        if let Some(d) = self.duration_hours {
            block.duration_hours = Some(d);
        }
    }
}

pub trait BlockStore {
    fn get(&self, id: &str) -> Option<&Block>;

    /// Append a block. Ids are unique within a store.
    fn add(&mut self, block: Block) -> Result<(), StoreError>;

    fn update(&mut self, update: &BlockUpdate) -> Result<&Block, StoreError>;

    fn remove(&mut self, id: &str) -> Result<Block, StoreError>;

    /// All blocks in block-set order.
    fn snapshot(&self) -> Vec<Block>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryBlockStore {
    blocks: IndexMap<String, Block>,
}

impl InMemoryBlockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from an ordered block list, rejecting duplicate ids.
    pub fn from_blocks(blocks: impl IntoIterator<Item = Block>) -> Result<Self, StoreError> {
        let mut store = Self::new();
        for block in blocks {
            store.add(block)?;
        }
        Ok(store)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.values()
    }
}

impl BlockStore for InMemoryBlockStore {
    fn get(&self, id: &str) -> Option<&Block> {
        self.blocks.get(id)
    }

    fn add(&mut self, block: Block) -> Result<(), StoreError> {
        if self.blocks.contains_key(&block.id) {
            return Err(StoreError::DuplicateId(block.id));
        }
        tracing::debug!(id = %block.id, kind = %block.kind(), "adding block");
        self.blocks.insert(block.id.clone(), block);
        Ok(())
    }

    fn update(&mut self, update: &BlockUpdate) -> Result<&Block, StoreError> {
        let block = self
            .blocks
            .get_mut(&update.id)
            .ok_or_else(|| StoreError::NotFound(update.id.clone()))?;
        update.apply_to(block);
        tracing::debug!(
            id = %update.id,
            x = update.x,
            y = update.y,
            start_hour = ?block.start_hour,
            "updated block"
        );
        Ok(block)
    }

    fn remove(&mut self, id: &str) -> Result<Block, StoreError> {
        let block = self
            .blocks
            .shift_remove(id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        tracing::debug!(id, "removed block");
        Ok(block)
    }

    fn snapshot(&self) -> Vec<Block> {
        self.blocks.values().cloned().collect()
    }

    fn len(&self) -> usize {
        self.blocks.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SequentialIds;
    use crate::model::BlockDetails;

    fn three() -> InMemoryBlockStore {
        let mut ids = SequentialIds::default();
        InMemoryBlockStore::from_blocks(
            ["a", "b", "c"].map(|t| Block::new(&mut ids, t, BlockDetails::Generic)),
        )
        .unwrap()
    }

    #[test]
    fn test_duplicate_rejected() {
        let mut store = three();
        let dup = store.get("generic-1").unwrap().clone();
        assert_eq!(store.add(dup), Err(StoreError::DuplicateId("generic-1".into())));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut store = three();
        store.remove("generic-2").unwrap();
        let ids: Vec<String> = store.snapshot().into_iter().map(|b| b.id).collect();
        assert_eq!(ids, ["generic-1", "generic-3"]);
        assert_eq!(store.remove("generic-2"), Err(StoreError::NotFound("generic-2".into())));
    }

    #[test]
    fn test_update_applies_only_given_fields() {
        let mut store = three();
        let before = store.get("generic-1").unwrap().width;
        let b = store.update(&BlockUpdate::moved("generic-1", 40.0, 60.0)).unwrap();
        assert_eq!((b.x, b.y, b.width), (40.0, 60.0, before));
        assert!(b.start_hour.is_none());

        let update = BlockUpdate {
            start_hour: Some(2.0),
            duration_hours: Some(3.0),
            width: Some(60.0),
            ..BlockUpdate::moved("generic-1", 40.0, 60.0)
        };
        let b = store.update(&update).unwrap();
        assert_eq!(b.time_range().map(|r| r.end_hour()), Some(5.0));
        assert_eq!(b.width, 60.0);

        assert!(store.update(&BlockUpdate::moved("nope", 0.0, 0.0)).is_err());
    }
}
