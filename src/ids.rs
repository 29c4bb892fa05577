//! Injected block identifiers.
//!
//! Blocks never mint their own ids; callers pass an [`IdGenerator`]. Any
//! `FnMut(BlockKind) -> String` closure works as one.

use crate::model::BlockKind;

pub trait IdGenerator {
    fn next_id(&mut self, kind: BlockKind) -> String;
}

/// Counter-based ids of the form `"<kind>-<n>"`, `n` starting at 1 and shared
/// across kinds.
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    issued: u64,
}

impl SequentialIds {
    /// Continue numbering after `issued` ids, e.g. when reopening a document.
    pub fn starting_after(issued: u64) -> Self {
        Self { issued }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, kind: BlockKind) -> String {
        self.issued += 1;
        format!("{}-{}", kind, self.issued)
    }
}

impl<F> IdGenerator for F
where
    F: FnMut(BlockKind) -> String,
{
    fn next_id(&mut self, kind: BlockKind) -> String {
        self(kind)
    }
}
