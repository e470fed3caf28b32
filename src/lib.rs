//! Mini-Pager: pagination engine for a continuously flowing manuscript
//!
//! This crate provides:
//! - Unit normalization of page templates into pixel geometry
//! - Block measurement behind a narrow render-surface capability
//! - Greedy page break calculation that never splits a block
//! - Keyed spacer decorations for the continuous edit view
//! - A generation-tagged state store shared by the edit view and the
//!   page preview

pub mod config;
pub mod document;
pub mod error;
pub mod layout;
pub mod render;
pub mod state;
pub mod template;
pub mod units;
pub mod wasm;

// Re-export WASM types for direct use
pub use wasm::WasmPaginator;

// Re-export primary types
pub use config::PaginatorConfig;
pub use document::{Block, BlockId, BlockKind, Document, EditOp, EditResult, ListMarker};
pub use error::{ConfigError, MeasureError};
pub use layout::{
    BlockMeasurement, HeightTable, PackingPolicy, PageBreak, PageInfo, PageLayout, RenderSurface,
    TypesetSurface,
};
pub use render::{DecorationDiff, DecorationPatch, PagePreview, SpacerDecoration};
pub use state::{Generation, PaginationState, PaginationStore, StoreEvent};
pub use template::{CanonicalGeometry, PageTemplate, TemplateCatalog, Typography};

use layout::{measure_blocks, page_for_position, paginate};
use render::{page_at_offset, page_offset, DecorationRenderer};
use serde::Serialize;
use state::Debouncer;

/// Editor coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Editor rectangle
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.x + other.width
            && self.x + self.width > other.x
            && self.y < other.y + other.height
            && self.y + self.height > other.y
    }
}

/// What a recompute did
#[derive(Debug, Clone, PartialEq)]
pub enum RecomputeOutcome {
    /// New pages published; spacer patches for the edit view
    Applied(DecorationDiff),
    /// A newer recompute started meanwhile; this result was dropped
    Stale,
    /// The view could not be measured; prior pages kept
    NotReady(MeasureError),
}

/// The pagination pipeline: template geometry, measurement, break
/// calculation, state store and decorations
pub struct Paginator {
    template: PageTemplate,
    geometry: CanonicalGeometry,
    config: PaginatorConfig,
    store: PaginationStore,
    decorations: DecorationRenderer,
    debouncer: Debouncer,
    /// Document version seen by the last `observe`
    seen_version: Option<u64>,
}

impl Paginator {
    /// Create a paginator with default settings
    pub fn new(template: PageTemplate) -> Self {
        Self::with_config(template, PaginatorConfig::default())
    }

    pub fn with_config(template: PageTemplate, config: PaginatorConfig) -> Self {
        let geometry = template::resolve(&template, &config.default_page_gap);
        Self {
            template,
            geometry,
            debouncer: Debouncer::new(config.debounce_ms),
            config,
            store: PaginationStore::new(),
            decorations: DecorationRenderer::new(),
            seen_version: None,
        }
    }

    pub fn template(&self) -> &PageTemplate {
        &self.template
    }

    pub fn geometry(&self) -> &CanonicalGeometry {
        &self.geometry
    }

    pub fn config(&self) -> &PaginatorConfig {
        &self.config
    }

    /// Read-only snapshot for view consumers
    pub fn state(&self) -> &PaginationState {
        self.store.state()
    }

    pub fn breaks(&self) -> &[PageBreak] {
        self.store.breaks()
    }

    pub fn total_pages(&self) -> usize {
        self.store.state().total_pages
    }

    pub fn current_page(&self) -> usize {
        self.store.state().current_page
    }

    /// Drain store notifications
    pub fn take_events(&mut self) -> Vec<StoreEvent> {
        self.store.take_events()
    }

    /// Swap the active template. Geometry changes invalidate every
    /// measurement, so the next tick recomputes without waiting out the
    /// debounce window.
    pub fn set_template(&mut self, template: PageTemplate) {
        log::debug!("Template changed to {:?}", template.name);
        self.geometry = template::resolve(&template, &self.config.default_page_gap);
        self.template = template;
        self.debouncer.flush();
    }

    /// Note the document's current version. The first observation (document
    /// open) is due immediately; later changes wait for the edit burst to
    /// settle. Returns true when a change was noted.
    pub fn observe(&mut self, document: &Document, now_ms: u64) -> bool {
        let version = document.version();
        match self.seen_version.replace(version) {
            None => {
                self.debouncer.flush();
                true
            }
            Some(seen) if seen != version => {
                self.debouncer.notify(now_ms);
                true
            }
            Some(_) => false,
        }
    }

    /// Drive the pipeline: observe the document and recompute once changes
    /// have settled
    pub fn tick(
        &mut self,
        document: &Document,
        surface: &dyn RenderSurface,
        now_ms: u64,
    ) -> Option<RecomputeOutcome> {
        self.observe(document, now_ms);
        if self.debouncer.poll(now_ms) {
            Some(self.recompute(document, surface))
        } else {
            None
        }
    }

    /// Full recompute from the current document and geometry
    pub fn recompute(
        &mut self,
        document: &Document,
        surface: &dyn RenderSurface,
    ) -> RecomputeOutcome {
        let generation = self.begin();
        let result = self.compute(document, surface);
        self.finish(generation, result)
    }

    /// Idle -> Calculating; supersedes any recompute still in flight
    pub fn begin(&mut self) -> Generation {
        self.store.begin()
    }

    /// Measure and pack without touching the store
    pub fn compute(
        &self,
        document: &Document,
        surface: &dyn RenderSurface,
    ) -> Result<PageLayout, MeasureError> {
        let measurements = measure_blocks(document, surface)?;
        Ok(paginate(
            &measurements,
            &self.geometry,
            &self.config.packing_policy(),
        ))
    }

    /// Publish the result of a recompute started with [`Paginator::begin`]
    pub fn finish(
        &mut self,
        generation: Generation,
        result: Result<PageLayout, MeasureError>,
    ) -> RecomputeOutcome {
        match result {
            Ok(layout) => {
                if self.store.complete(generation, layout) {
                    RecomputeOutcome::Applied(self.render_decorations())
                } else {
                    RecomputeOutcome::Stale
                }
            }
            Err(err) => {
                log::warn!("Skipping recompute {:?}: {}", generation, err);
                self.store.abandon(generation);
                RecomputeOutcome::NotReady(err)
            }
        }
    }

    /// Spacer patches for the edit view; held back while calculating
    pub fn render_decorations(&mut self) -> DecorationDiff {
        let generation = self.store.applied_generation().0;
        self.decorations
            .render(self.store.breaks(), self.store.is_calculating(), generation)
    }

    /// Spacers currently mounted in the edit view
    pub fn decorations(&self) -> &[SpacerDecoration] {
        self.decorations.mounted()
    }

    /// Stacked sheets for the page preview
    pub fn preview(&self) -> PagePreview {
        PagePreview::build(self.store.state(), &self.geometry)
    }

    /// Navigate to a page; returns the scroll offset of its top in the
    /// continuous view
    pub fn scroll_to_page(&mut self, page: usize) -> f32 {
        let page = self.store.set_current_page(page);
        page_offset(page, &self.geometry)
    }

    /// 1-based page holding a document position (e.g. the cursor)
    pub fn page_for_position(&self, pos: usize) -> usize {
        page_for_position(&self.store.state().pages, pos)
    }

    /// Track the page under a scroll offset in the continuous view
    pub fn on_scroll(&mut self, y: f32) -> usize {
        let page = page_at_offset(y, &self.geometry, self.total_pages());
        self.store.set_current_page(page)
    }
}
