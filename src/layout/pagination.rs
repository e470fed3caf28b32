//! Page break calculation: greedy first-fit packing of measured blocks

use crate::layout::measure::BlockMeasurement;
use crate::template::CanonicalGeometry;
use serde::{Deserialize, Serialize};

/// A visual page boundary inside the flowing document
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageBreak {
    /// Document position the spacer is inserted at
    pub position: usize,
    /// Height that pushes following content to the next page's content top
    pub spacer_height: f32,
}

/// One page as seen by the preview and export consumers
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    /// 1-based
    pub page_number: usize,
    pub start_pos: usize,
    pub end_pos: usize,
    /// Sum of the block heights packed onto this page
    pub content_height: f32,
}

impl PageInfo {
    /// The implicit page of an empty document
    pub fn empty() -> Self {
        Self {
            page_number: 1,
            start_pos: 0,
            end_pos: 0,
            content_height: 0.0,
        }
    }

    /// Check if this page contains a document position
    pub fn contains_position(&self, pos: usize) -> bool {
        pos >= self.start_pos && pos < self.end_pos
    }
}

/// Packing rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PackingPolicy {
    /// Measured heights below this are raised to it (empty blocks)
    pub minimum_block_height: f32,
    /// Remaining page space after a block taller than a whole page
    pub minimum_remaining: f32,
}

impl Default for PackingPolicy {
    fn default() -> Self {
        Self {
            minimum_block_height: 0.0,
            minimum_remaining: 0.0,
        }
    }
}

/// Result of a pagination pass
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageLayout {
    /// Ordered by position, strictly increasing; one fewer than pages
    pub breaks: Vec<PageBreak>,
    pub pages: Vec<PageInfo>,
}

impl PageLayout {
    /// Get page count
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }
}

/// Pack blocks into pages.
///
/// A block goes on the current page when its height is at most the space
/// left; otherwise a break is emitted at its start. A block taller than a
/// whole page is never split: it is placed on its own page and the
/// remaining space drops to `policy.minimum_remaining`.
pub fn paginate(
    measurements: &[BlockMeasurement],
    geometry: &CanonicalGeometry,
    policy: &PackingPolicy,
) -> PageLayout {
    let document_size = measurements.last().map(|m| m.end_pos).unwrap_or(0);

    if geometry.reflowable {
        let used = measurements
            .iter()
            .map(|m| m.height.max(policy.minimum_block_height))
            .sum();
        return PageLayout {
            breaks: Vec::new(),
            pages: vec![PageInfo {
                page_number: 1,
                start_pos: 0,
                end_pos: document_size,
                content_height: used,
            }],
        };
    }

    let content_height = geometry.content_height;
    let inter_page_space = geometry.inter_page_space();
    let floor = policy.minimum_remaining.max(0.0).min(content_height);

    let mut breaks = Vec::new();
    let mut page_heights = Vec::new();
    let mut remaining = content_height;
    let mut used = 0.0;
    let mut page_empty = true;

    for block in measurements {
        let height = block.height.max(policy.minimum_block_height);

        if height > remaining && !page_empty && block.start_pos < document_size {
            breaks.push(PageBreak {
                position: block.start_pos,
                spacer_height: remaining.max(0.0) + inter_page_space,
            });
            page_heights.push(used);
            remaining = content_height;
            used = 0.0;
        }

        if height > remaining {
            log::warn!(
                "Block at {} is {} px, taller than the {} px page; placing unsplit",
                block.start_pos,
                height,
                content_height
            );
            remaining = floor;
        } else {
            remaining -= height;
        }
        used += height;
        page_empty = false;
    }
    page_heights.push(used);

    let pages = pages_from_breaks(&breaks, document_size, &page_heights);
    PageLayout { breaks, pages }
}

/// Page break list only
pub fn calculate_page_breaks(
    measurements: &[BlockMeasurement],
    geometry: &CanonicalGeometry,
    policy: &PackingPolicy,
) -> Vec<PageBreak> {
    paginate(measurements, geometry, policy).breaks
}

/// Derive page records from a break list and the document bounds.
///
/// `page_heights` supplies per-page content heights; missing entries are 0.
pub fn pages_from_breaks(
    breaks: &[PageBreak],
    document_size: usize,
    page_heights: &[f32],
) -> Vec<PageInfo> {
    let mut pages = Vec::with_capacity(breaks.len() + 1);
    let mut start_pos = 0;

    for (idx, end_pos) in breaks
        .iter()
        .map(|b| b.position)
        .chain(std::iter::once(document_size))
        .enumerate()
    {
        pages.push(PageInfo {
            page_number: idx + 1,
            start_pos,
            end_pos,
            content_height: page_heights.get(idx).copied().unwrap_or(0.0),
        });
        start_pos = end_pos;
    }

    pages
}

/// 1-based page holding a document position; positions past the end map
/// to the last page
pub fn page_for_position(pages: &[PageInfo], pos: usize) -> usize {
    pages
        .iter()
        .find(|p| p.contains_position(pos))
        .or_else(|| pages.last())
        .map(|p| p.page_number)
        .unwrap_or(1)
}
