//! Patch protocol for spacer decorations

use crate::render::SpacerDecoration;
use serde::Serialize;

/// A single patch operation for the editing surface
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum DecorationPatch {
    /// Mount a new spacer widget
    Insert { spacer: SpacerDecoration },
    /// Move or resize the spacer with this key
    Update { spacer: SpacerDecoration },
    /// Unmount the spacer with this key
    Remove { key: usize },
}

/// Patches produced by one render pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecorationDiff {
    /// Generation of the pagination result this diff reflects
    pub generation: u64,
    /// Rendering was held back while a recompute is in flight
    pub suppressed: bool,
    pub patches: Vec<DecorationPatch>,
}

impl DecorationDiff {
    /// Create empty diff
    pub fn new(generation: u64) -> Self {
        Self {
            generation,
            suppressed: false,
            patches: Vec::new(),
        }
    }

    /// A held-back frame
    pub fn suppressed(generation: u64) -> Self {
        Self {
            suppressed: true,
            ..Self::new(generation)
        }
    }

    /// Add a patch
    pub fn add_patch(&mut self, patch: DecorationPatch) {
        self.patches.push(patch);
    }

    /// Check if there are any patches
    pub fn has_patches(&self) -> bool {
        !self.patches.is_empty()
    }

    /// Get patch count
    pub fn patch_count(&self) -> usize {
        self.patches.len()
    }
}
