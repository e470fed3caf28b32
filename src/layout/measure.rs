//! Block height measurement against a rendering surface

use crate::document::{Block, BlockId, BlockKind, Document};
use crate::error::MeasureError;
use crate::layout::font::FontMetrics;
use crate::layout::line_break::LineBreaker;
use crate::template::{CanonicalGeometry, Typography};
use crate::units::{Length, Unit};
use rustc_hash::FxHashMap;
use serde::Serialize;

/// Indentation width per list level
pub const INDENT_WIDTH: f32 = 24.0;

/// Rendered extent of one top-level block
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockMeasurement {
    pub start_pos: usize,
    pub end_pos: usize,
    pub height: f32,
}

/// The one capability pagination needs from a view: the rendered height of
/// a block.
pub trait RenderSurface {
    /// False while the view is detached or has not rendered yet
    fn is_ready(&self) -> bool {
        true
    }

    /// Rendered height in pixels of the block at `index`
    fn block_height(&self, index: usize, block: &Block) -> Option<f32>;
}

/// Measure every top-level block in document order.
///
/// The result covers `[0, document.size())` contiguously. Nothing is
/// rendered or mutated here.
pub fn measure_blocks(
    document: &Document,
    surface: &dyn RenderSurface,
) -> Result<Vec<BlockMeasurement>, MeasureError> {
    if !surface.is_ready() {
        return Err(MeasureError::NotReady);
    }

    let mut measurements = Vec::with_capacity(document.block_count());
    let mut expected = 0;

    for (index, (block, range)) in document
        .blocks()
        .iter()
        .zip(document.block_ranges())
        .enumerate()
    {
        if range.start != expected {
            return Err(MeasureError::NonContiguous {
                index,
                expected,
                found: range.start,
            });
        }

        let height = surface
            .block_height(index, block)
            .ok_or(MeasureError::MissingBlock { index })?;
        let height = if height.is_finite() && height >= 0.0 {
            height
        } else {
            log::warn!("Block {} reported height {}, using 0", index, height);
            0.0
        };

        measurements.push(BlockMeasurement {
            start_pos: range.start,
            end_pos: range.end,
            height,
        });
        expected = range.end;
    }

    Ok(measurements)
}

/// Reference surface that typesets blocks with approximate font metrics
#[derive(Debug, Clone)]
pub struct TypesetSurface {
    metrics: FontMetrics,
    content_width: f32,
    line_height: f32,
    font_px: f32,
    attached: bool,
    breaker: LineBreaker,
}

impl TypesetSurface {
    /// Surface for the given geometry and body typography
    pub fn new(geometry: &CanonicalGeometry, typography: &Typography) -> Self {
        Self {
            metrics: FontMetrics::for_family(
                &typography.font_family,
                geometry.font_size,
                geometry.line_height,
            ),
            content_width: geometry.content_width,
            line_height: geometry.line_height,
            font_px: geometry.font_size,
            attached: true,
            breaker: LineBreaker::new(),
        }
    }

    /// Surface with explicit metrics
    pub fn with_metrics(metrics: FontMetrics, content_width: f32) -> Self {
        Self {
            line_height: metrics.line_height,
            font_px: metrics.line_height,
            metrics,
            content_width,
            attached: true,
            breaker: LineBreaker::new(),
        }
    }

    /// A surface whose view is not mounted
    pub fn detached(mut self) -> Self {
        self.attached = false;
        self
    }

    pub fn set_attached(&mut self, attached: bool) {
        self.attached = attached;
    }

    fn text_height(&self, block: &Block) -> f32 {
        let indent = match &block.kind {
            BlockKind::ListItem { indent_level, .. } => {
                (*indent_level as f32 + 1.0) * INDENT_WIDTH
            }
            _ => 0.0,
        };
        let width = (self.content_width - indent).max(self.metrics.default_width);
        let line_height = self.line_height * block.kind.line_height_multiplier();

        let lines = self
            .breaker
            .wrap(&block.text, width, &self.metrics, line_height);
        lines.iter().map(|l| l.height).sum()
    }
}

impl RenderSurface for TypesetSurface {
    fn is_ready(&self) -> bool {
        self.attached
    }

    fn block_height(&self, _index: usize, block: &Block) -> Option<f32> {
        let body = match &block.kind {
            BlockKind::Image { height } => {
                Length::parse(height, Unit::Pixel).to_px(self.font_px).max(0.0)
            }
            BlockKind::HorizontalRule => self.line_height * 0.5,
            _ => self.text_height(block),
        };
        Some(body + block.kind.spacing_after() * self.line_height)
    }
}

/// Heights reported by an external view, keyed by block
#[derive(Debug, Clone, Default)]
pub struct HeightTable {
    heights: FxHashMap<BlockId, f32>,
    mounted: bool,
}

impl HeightTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the rendered height of a block
    pub fn report(&mut self, id: BlockId, height: f32) {
        self.heights.insert(id, height);
    }

    /// Mark the view as mounted (or unmounted)
    pub fn set_mounted(&mut self, mounted: bool) {
        self.mounted = mounted;
    }

    /// Drop heights of blocks no longer in the document
    pub fn retain_document(&mut self, document: &Document) {
        self.heights.retain(|id, _| document.block(*id).is_some());
    }

    pub fn clear(&mut self) {
        self.heights.clear();
    }
}

impl RenderSurface for HeightTable {
    fn is_ready(&self) -> bool {
        self.mounted
    }

    fn block_height(&self, _index: usize, block: &Block) -> Option<f32> {
        self.heights.get(&block.id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::PageTemplate;

    struct Fixed(Vec<f32>);

    impl RenderSurface for Fixed {
        fn block_height(&self, index: usize, _block: &Block) -> Option<f32> {
            self.0.get(index).copied()
        }
    }

    #[test]
    fn test_measurements_contiguous() {
        let doc = Document::from_text("alpha\n\nbeta gamma\n---");
        let measurements = measure_blocks(&doc, &Fixed(vec![10.0, 0.0, 20.0, 5.0])).unwrap();

        assert_eq!(measurements.len(), 4);
        assert_eq!(measurements[0].start_pos, 0);
        for pair in measurements.windows(2) {
            assert_eq!(pair[0].end_pos, pair[1].start_pos);
        }
        assert_eq!(measurements.last().map(|m| m.end_pos), Some(doc.size()));
        // Empty paragraphs are kept, even at zero height
        assert_eq!(measurements[1].height, 0.0);
    }

    #[test]
    fn test_empty_document() {
        let doc = Document::new();
        assert!(measure_blocks(&doc, &Fixed(vec![])).unwrap().is_empty());
    }

    #[test]
    fn test_missing_block() {
        let doc = Document::from_text("a\nb");
        assert_eq!(
            measure_blocks(&doc, &Fixed(vec![10.0])),
            Err(MeasureError::MissingBlock { index: 1 })
        );
    }

    #[test]
    fn test_invalid_height_sanitized() {
        let doc = Document::from_text("a\nb");
        let measurements = measure_blocks(&doc, &Fixed(vec![f32::NAN, -3.0])).unwrap();
        assert_eq!(measurements[0].height, 0.0);
        assert_eq!(measurements[1].height, 0.0);
    }

    #[test]
    fn test_detached_surface_not_ready() {
        let template = PageTemplate::new("letter", "8.5in", "11in", "1in");
        let surface = TypesetSurface::new(&template.geometry(), &template.typography).detached();
        let doc = Document::from_text("hello");
        assert_eq!(measure_blocks(&doc, &surface), Err(MeasureError::NotReady));
    }

    #[test]
    fn test_typeset_wrapping_grows_height() {
        let surface = TypesetSurface::with_metrics(FontMetrics::uniform(10.0, 8.0), 80.0);
        let doc = Document::from_text("short\nthis line is long enough to wrap twice over");
        let measurements = measure_blocks(&doc, &surface).unwrap();

        // One line plus one line of spacing after
        assert_eq!(measurements[0].height, 20.0);
        assert!(measurements[1].height > measurements[0].height);
    }

    #[test]
    fn test_typeset_heading_and_image() {
        let surface = TypesetSurface::with_metrics(FontMetrics::uniform(10.0, 8.0), 400.0);
        let doc = Document::from_text("# Title\n![1in]\n");
        let measurements = measure_blocks(&doc, &surface).unwrap();

        // 1.5x line height plus half a line after
        assert_eq!(measurements[0].height, 20.0);
        assert_eq!(measurements[1].height, 101.0);
        // Empty paragraph still takes one line
        assert_eq!(measurements[2].height, 20.0);
    }

    #[test]
    fn test_height_table() {
        let doc = Document::from_text("a\nb");
        let mut table = HeightTable::new();
        assert_eq!(measure_blocks(&doc, &table), Err(MeasureError::NotReady));

        table.set_mounted(true);
        table.report(doc.blocks()[0].id, 30.0);
        assert_eq!(
            measure_blocks(&doc, &table),
            Err(MeasureError::MissingBlock { index: 1 })
        );

        table.report(doc.blocks()[1].id, 12.0);
        let measurements = measure_blocks(&doc, &table).unwrap();
        assert_eq!(measurements[1].height, 12.0);

        let mut trimmed = doc.clone();
        trimmed.apply_edit(crate::document::EditOp::remove(0));
        table.retain_document(&trimmed);
        assert!(measure_blocks(&trimmed, &table).is_ok());
    }
}
