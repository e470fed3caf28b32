//! WASM bindings for the pagination engine

use crate::document::{BlockKind, Document, EditOp};
use crate::layout::{HeightTable, RenderSurface, TypesetSurface};
use crate::state::now_ms;
use crate::template::{PageTemplate, TemplateCatalog};
use crate::{Paginator, Point, RecomputeOutcome};
use wasm_bindgen::prelude::*;

/// Template used when a requested name is unknown
const FALLBACK_TEMPLATE: &str = "letter";

/// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// WASM-exposed pagination wrapper.
///
/// By default blocks are measured with built-in font metrics; hosts that
/// can measure their DOM switch to reported heights with
/// `useHostHeights(true)`.
#[wasm_bindgen]
pub struct WasmPaginator {
    catalog: TemplateCatalog,
    document: Document,
    paginator: Paginator,
    typeset: TypesetSurface,
    host_heights: HeightTable,
    use_host_heights: bool,
    last_patches: String,
}

#[wasm_bindgen]
impl WasmPaginator {
    /// Create a paginator for a built-in template name
    #[wasm_bindgen(constructor)]
    pub fn new(template_name: &str) -> Self {
        let catalog = TemplateCatalog::builtin();
        let template = lookup(&catalog, template_name);
        let paginator = Paginator::new(template.clone());
        let typeset = TypesetSurface::new(paginator.geometry(), &template.typography);

        Self {
            catalog,
            document: Document::new(),
            paginator,
            typeset,
            host_heights: HeightTable::new(),
            use_host_heights: false,
            last_patches: String::from("[]"),
        }
    }

    /// Register extra templates from a JSON array; returns false on bad JSON
    #[wasm_bindgen(js_name = loadTemplates)]
    pub fn load_templates(&mut self, json: &str) -> bool {
        match TemplateCatalog::from_json(json) {
            Ok(catalog) => {
                self.catalog = catalog;
                true
            }
            Err(err) => {
                log::warn!("Rejected template catalog: {}", err);
                false
            }
        }
    }

    /// Switch to a named template
    #[wasm_bindgen(js_name = setTemplate)]
    pub fn set_template(&mut self, name: &str) {
        let template = lookup(&self.catalog, name);
        self.apply_template(template);
    }

    /// Replace the whole document
    #[wasm_bindgen(js_name = setText)]
    pub fn set_text(&mut self, text: &str) {
        self.document.replace_text(text);
        self.host_heights.retain_document(&self.document);
    }

    /// Insert a paragraph before `index`
    #[wasm_bindgen(js_name = insertParagraph)]
    pub fn insert_paragraph(&mut self, index: usize, text: &str) -> bool {
        self.document
            .apply_edit(EditOp::insert(index, BlockKind::Paragraph, text))
            .has_changes()
    }

    /// Replace the text of the block at `index`
    #[wasm_bindgen(js_name = setBlockText)]
    pub fn set_block_text(&mut self, index: usize, text: &str) -> bool {
        self.document
            .apply_edit(EditOp::set_text(index, text))
            .has_changes()
    }

    /// Remove the block at `index`
    #[wasm_bindgen(js_name = removeBlock)]
    pub fn remove_block(&mut self, index: usize) -> bool {
        let changed = self.document.apply_edit(EditOp::remove(index)).has_changes();
        self.host_heights.retain_document(&self.document);
        changed
    }

    /// Measure with heights reported by the host view
    #[wasm_bindgen(js_name = useHostHeights)]
    pub fn use_host_heights(&mut self, enabled: bool) {
        self.use_host_heights = enabled;
    }

    /// Report the rendered height of the block at `index`
    #[wasm_bindgen(js_name = reportHeight)]
    pub fn report_height(&mut self, index: usize, height: f32) {
        if let Some(block) = self.document.blocks().get(index) {
            self.host_heights.report(block.id, height);
        }
    }

    /// Mark the host view as mounted or detached
    #[wasm_bindgen(js_name = setMounted)]
    pub fn set_mounted(&mut self, mounted: bool) {
        self.host_heights.set_mounted(mounted);
        self.typeset.set_attached(mounted);
    }

    /// Advance the pipeline; returns true when new pages were published
    pub fn tick(&mut self, now: f64) -> bool {
        let surface: &dyn RenderSurface = if self.use_host_heights {
            &self.host_heights
        } else {
            &self.typeset
        };
        match self.paginator.tick(&self.document, surface, now as u64) {
            Some(RecomputeOutcome::Applied(diff)) => {
                self.last_patches =
                    serde_json::to_string(&diff.patches).unwrap_or_else(|_| "[]".to_string());
                true
            }
            _ => {
                // Nothing published; never replay an earlier frame
                self.last_patches = String::from("[]");
                false
            }
        }
    }

    /// Advance the pipeline using the host clock
    #[wasm_bindgen(js_name = tickNow)]
    pub fn tick_now(&mut self) -> bool {
        self.tick(now_ms() as f64)
    }

    /// Navigate; returns the scroll offset of the page top
    #[wasm_bindgen(js_name = scrollToPage)]
    pub fn scroll_to_page(&mut self, page: usize) -> f32 {
        self.paginator.scroll_to_page(page)
    }

    /// Report a scroll offset; returns the current page
    #[wasm_bindgen(js_name = onScroll)]
    pub fn on_scroll(&mut self, y: f32) -> usize {
        self.paginator.on_scroll(y)
    }

    /// Page holding a document position
    #[wasm_bindgen(js_name = pageForPosition)]
    pub fn page_for_position(&self, pos: usize) -> usize {
        self.paginator.page_for_position(pos)
    }

    #[wasm_bindgen(js_name = getPageCount)]
    pub fn page_count(&self) -> usize {
        self.paginator.total_pages()
    }

    #[wasm_bindgen(js_name = getCurrentPage)]
    pub fn current_page(&self) -> usize {
        self.paginator.current_page()
    }

    /// Pagination state snapshot as JSON
    #[wasm_bindgen(js_name = stateJson)]
    pub fn state_json(&self) -> String {
        self.paginator.state().to_json()
    }

    /// Preview sheets as JSON
    #[wasm_bindgen(js_name = previewJson)]
    pub fn preview_json(&self) -> String {
        serde_json::to_string(&self.paginator.preview()).unwrap_or_default()
    }

    /// Preview sheet under a point, if any
    #[wasm_bindgen(js_name = previewPageAt)]
    pub fn preview_page_at(&self, x: f32, y: f32) -> Option<usize> {
        self.paginator.preview().page_at(Point { x, y })
    }

    /// Mounted spacers as JSON
    #[wasm_bindgen(js_name = decorationsJson)]
    pub fn decorations_json(&self) -> String {
        serde_json::to_string(self.paginator.decorations()).unwrap_or_default()
    }

    /// Patches from the last published recompute as JSON
    #[wasm_bindgen(js_name = patchesJson)]
    pub fn patches_json(&self) -> String {
        self.last_patches.clone()
    }

    /// Resolved page geometry as JSON
    #[wasm_bindgen(js_name = geometryJson)]
    pub fn geometry_json(&self) -> String {
        serde_json::to_string(self.paginator.geometry()).unwrap_or_default()
    }
}

impl WasmPaginator {
    fn apply_template(&mut self, template: PageTemplate) {
        self.paginator.set_template(template);
        let attached = self.typeset.is_ready();
        self.typeset = TypesetSurface::new(
            self.paginator.geometry(),
            &self.paginator.template().typography,
        );
        self.typeset.set_attached(attached);
        // Host heights were measured under the old typography
        self.host_heights.clear();
    }
}

impl Default for WasmPaginator {
    fn default() -> Self {
        Self::new(FALLBACK_TEMPLATE)
    }
}

fn lookup(catalog: &TemplateCatalog, name: &str) -> PageTemplate {
    match catalog.get(name) {
        Ok(template) => template.clone(),
        Err(err) => {
            log::warn!("{}, using {}", err, FALLBACK_TEMPLATE);
            catalog
                .get(FALLBACK_TEMPLATE)
                .cloned()
                .unwrap_or_else(|_| PageTemplate::new(FALLBACK_TEMPLATE, "8.5in", "11in", "1in"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lorem(paragraphs: usize) -> String {
        vec!["Lorem ipsum dolor sit amet, consectetur adipiscing elit."; paragraphs].join("\n")
    }

    #[test]
    fn test_unknown_template_falls_back() {
        let pager = WasmPaginator::new("tabloid");
        assert!(pager.geometry_json().contains("\"pageWidth\":816"));
    }

    #[test]
    fn test_edit_and_tick() {
        let mut pager = WasmPaginator::new("a5");
        pager.set_text(&lorem(80));
        assert!(pager.tick(0.0));
        let pages = pager.page_count();
        assert!(pages > 1);
        assert!(pager.patches_json().contains("\"op\":\"insert\""));

        assert!(pager.remove_block(0));
        assert!(!pager.tick(10.0));
        assert!(pager.tick(400.0));
        assert!(pager.state_json().contains("\"totalPages\""));
    }

    #[test]
    fn test_patches_cleared_when_nothing_published() {
        let mut pager = WasmPaginator::new("a5");
        pager.set_text(&lorem(80));
        assert!(pager.tick(0.0));
        assert_ne!(pager.patches_json(), "[]");

        pager.set_mounted(false);
        pager.remove_block(0);
        assert!(!pager.tick(10.0));
        assert_eq!(pager.patches_json(), "[]");
        // Detached view: the recompute is abandoned
        assert!(!pager.tick(400.0));
        assert_eq!(pager.patches_json(), "[]");
        assert!(pager.decorations_json().contains("\"key\":0"));
    }

    #[test]
    fn test_set_text_is_observed() {
        let mut pager = WasmPaginator::new("letter");
        pager.set_text("one");
        assert!(pager.tick(0.0));
        pager.set_text(&vec!["x"; 200].join("\n"));
        assert!(!pager.tick(1000.0));
        assert!(pager.tick(1300.0));
        assert!(pager.page_count() > 1);
    }

    #[test]
    fn test_host_heights() {
        let mut pager = WasmPaginator::new("letter");
        pager.set_text("a\nb");
        pager.use_host_heights(true);
        // Not mounted yet
        assert!(!pager.tick(0.0));

        pager.set_mounted(true);
        pager.report_height(0, 800.0);
        pager.report_height(1, 800.0);
        pager.insert_paragraph(2, "c");
        pager.report_height(2, 10.0);
        assert!(!pager.tick(1000.0));
        assert!(pager.tick(1300.0));
        assert_eq!(pager.page_count(), 2);
    }

    #[test]
    fn test_template_switch() {
        let mut pager = WasmPaginator::new("legal");
        pager.set_text(&vec!["line"; 120].join("\n"));
        pager.tick(0.0);
        let legal_pages = pager.page_count();

        pager.set_template("a5");
        assert!(pager.tick(1.0));
        assert!(pager.page_count() > legal_pages);

        pager.set_template("web");
        assert!(pager.tick(2.0));
        assert_eq!(pager.page_count(), 1);
        assert!(pager.preview_json().contains("\"chrome\":false"));
        assert_eq!(pager.decorations_json(), "[]");
    }
}
