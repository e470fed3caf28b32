//! Edit operations and results

use crate::document::{BlockId, BlockKind};
use smallvec::SmallVec;

/// An atomic structural edit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOp {
    /// Insert a new block before `index` (or append when `index == len`)
    InsertBlock {
        index: usize,
        kind: BlockKind,
        text: String,
    },
    /// Remove the block at `index`
    RemoveBlock { index: usize },
    /// Replace the text of the block at `index`
    SetText { index: usize, text: String },
    /// Change the kind of the block at `index`
    SetKind { index: usize, kind: BlockKind },
}

impl EditOp {
    /// Create an insert operation
    pub fn insert(index: usize, kind: BlockKind, text: impl Into<String>) -> Self {
        Self::InsertBlock {
            index,
            kind,
            text: text.into(),
        }
    }

    /// Create a text replacement
    pub fn set_text(index: usize, text: impl Into<String>) -> Self {
        Self::SetText {
            index,
            text: text.into(),
        }
    }

    /// Create a removal
    pub fn remove(index: usize) -> Self {
        Self::RemoveBlock { index }
    }

    /// Block index this operation targets
    pub fn index(&self) -> usize {
        match self {
            EditOp::InsertBlock { index, .. }
            | EditOp::RemoveBlock { index }
            | EditOp::SetText { index, .. }
            | EditOp::SetKind { index, .. } => *index,
        }
    }
}

/// Result of applying an edit operation
#[derive(Debug, Clone, Default)]
pub struct EditResult {
    /// Document version after this edit
    pub version: u64,
    /// Blocks that were modified
    pub affected: SmallVec<[BlockId; 4]>,
    /// Blocks that were created
    pub created: SmallVec<[BlockId; 2]>,
    /// Blocks that were deleted
    pub deleted: SmallVec<[BlockId; 2]>,
}

impl EditResult {
    /// Check if any blocks were affected
    pub fn has_changes(&self) -> bool {
        !self.affected.is_empty() || !self.created.is_empty() || !self.deleted.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_op_index() {
        assert_eq!(EditOp::insert(3, BlockKind::Paragraph, "x").index(), 3);
        assert_eq!(EditOp::remove(1).index(), 1);
        assert_eq!(EditOp::set_text(7, "y").index(), 7);
    }

    #[test]
    fn test_edit_result() {
        let result = EditResult {
            version: 1,
            affected: smallvec::smallvec![BlockId(0)],
            created: smallvec::smallvec![],
            deleted: smallvec::smallvec![],
        };
        assert!(result.has_changes());
        assert!(!EditResult::default().has_changes());
    }
}
