//! Discrete page preview: the same pages laid out as separate sheets

use crate::layout::PageInfo;
use crate::state::PaginationState;
use crate::template::CanonicalGeometry;
use crate::{Point, Rect};
use serde::Serialize;

/// One sheet in the preview
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewPage {
    pub page_number: usize,
    pub start_pos: usize,
    pub end_pos: usize,
    /// Whole sheet, in stacked-preview coordinates
    pub bounds: Rect,
    pub content_rect: Rect,
    pub header_rect: Option<Rect>,
    pub footer_rect: Option<Rect>,
}

/// Stacked sheets for a pagination snapshot
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PagePreview {
    pub pages: Vec<PreviewPage>,
    /// Reflowable templates render without page chrome
    pub chrome: bool,
    pub total_height: f32,
}

impl PagePreview {
    /// Build display sheets from the store snapshot
    pub fn build(state: &PaginationState, geometry: &CanonicalGeometry) -> Self {
        if geometry.reflowable {
            let page = state.pages.first().cloned().unwrap_or_else(PageInfo::empty);
            let height = page.content_height.max(geometry.line_height);
            let bounds = Rect::new(0.0, 0.0, geometry.page_width, height);
            return Self {
                pages: vec![PreviewPage {
                    page_number: 1,
                    start_pos: page.start_pos,
                    end_pos: state.pages.last().map(|p| p.end_pos).unwrap_or(0),
                    bounds,
                    content_rect: Rect::new(
                        geometry.margin_left,
                        0.0,
                        geometry.content_width,
                        height,
                    ),
                    header_rect: None,
                    footer_rect: None,
                }],
                chrome: false,
                total_height: height,
            };
        }

        let pages: Vec<_> = state
            .pages
            .iter()
            .map(|page| {
                let y = page_offset(page.page_number, geometry);
                let content_top = y + geometry.content_top_offset;
                let content_bottom = y + geometry.page_height - geometry.content_bottom_offset;

                PreviewPage {
                    page_number: page.page_number,
                    start_pos: page.start_pos,
                    end_pos: page.end_pos,
                    bounds: Rect::new(0.0, y, geometry.page_width, geometry.page_height),
                    content_rect: Rect::new(
                        geometry.margin_left,
                        content_top,
                        geometry.content_width,
                        geometry.content_height,
                    ),
                    header_rect: (geometry.header_height > 0.0).then(|| {
                        Rect::new(
                            geometry.margin_left,
                            content_top - geometry.header_height,
                            geometry.content_width,
                            geometry.header_height,
                        )
                    }),
                    footer_rect: (geometry.footer_height > 0.0).then(|| {
                        Rect::new(
                            geometry.margin_left,
                            content_bottom,
                            geometry.content_width,
                            geometry.footer_height,
                        )
                    }),
                }
            })
            .collect();

        let total_height = pages.len() as f32 * geometry.page_stride() - geometry.page_gap;
        Self {
            pages,
            chrome: true,
            total_height: total_height.max(0.0),
        }
    }

    /// Page number of the sheet under a point, for click-to-navigate
    pub fn page_at(&self, point: Point) -> Option<usize> {
        self.pages
            .iter()
            .find(|page| page.bounds.contains_point(point))
            .map(|page| page.page_number)
    }

    /// Sheets intersecting a viewport
    pub fn visible(&self, viewport: Rect) -> impl Iterator<Item = &PreviewPage> {
        self.pages
            .iter()
            .filter(move |page| page.bounds.intersects(&viewport))
    }
}

/// Top of page `page_number` (1-based) in the continuous view
pub fn page_offset(page_number: usize, geometry: &CanonicalGeometry) -> f32 {
    page_number.saturating_sub(1) as f32 * geometry.page_stride()
}

/// 1-based page shown at a vertical scroll offset
pub fn page_at_offset(y: f32, geometry: &CanonicalGeometry, total_pages: usize) -> usize {
    let stride = geometry.page_stride();
    if geometry.reflowable || stride <= 0.0 || y <= 0.0 {
        return 1;
    }
    ((y / stride).floor() as usize + 1).clamp(1, total_pages.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{pages_from_breaks, PageBreak};
    use crate::template::PageTemplate;

    fn state(pages: usize) -> PaginationState {
        let breaks: Vec<_> = (1..pages)
            .map(|i| PageBreak {
                position: i * 10,
                spacer_height: 0.0,
            })
            .collect();
        let pages = pages_from_breaks(&breaks, pages * 10, &[]);
        PaginationState {
            total_pages: pages.len(),
            pages,
            current_page: 1,
            is_calculating: false,
        }
    }

    fn letter() -> CanonicalGeometry {
        PageTemplate::new("letter", "8.5in", "11in", "1in")
            .with_header("0.5in")
            .with_footer("0.25in")
            .geometry()
    }

    #[test]
    fn test_pages_stack_with_gap() {
        let preview = PagePreview::build(&state(3), &letter());
        assert!(preview.chrome);
        assert_eq!(preview.pages.len(), 3);
        assert_eq!(preview.pages[1].bounds.y, 1056.0 + 24.0);
        assert_eq!(preview.total_height, 3.0 * 1056.0 + 2.0 * 24.0);
    }

    #[test]
    fn test_chrome_rects() {
        let preview = PagePreview::build(&state(1), &letter());
        let page = &preview.pages[0];
        assert_eq!(page.content_rect.y, 96.0 + 48.0);
        assert_eq!(page.header_rect.map(|r| r.y), Some(96.0));
        assert_eq!(page.footer_rect.map(|r| r.y), Some(1056.0 - 96.0 - 24.0));
        assert_eq!(page.content_rect.height, 1056.0 - 192.0 - 72.0);
    }

    #[test]
    fn test_no_header_rect_when_disabled() {
        let geometry = PageTemplate::new("a4", "210mm", "297mm", "25.4mm").geometry();
        let preview = PagePreview::build(&state(2), &geometry);
        assert!(preview.pages.iter().all(|p| p.header_rect.is_none()));
        assert!(preview.pages.iter().all(|p| p.footer_rect.is_none()));
    }

    #[test]
    fn test_reflowable_has_no_chrome() {
        let geometry = PageTemplate::new("web", "100%", "auto", "0").geometry();
        let mut snapshot = state(1);
        snapshot.pages[0].content_height = 480.0;
        let preview = PagePreview::build(&snapshot, &geometry);
        assert!(!preview.chrome);
        assert_eq!(preview.pages.len(), 1);
        assert_eq!(preview.total_height, 480.0);
        assert!(preview.pages[0].header_rect.is_none());
    }

    #[test]
    fn test_visible_pages() {
        let preview = PagePreview::build(&state(4), &letter());
        let viewport = Rect::new(0.0, 1000.0, 816.0, 200.0);
        let visible: Vec<_> = preview.visible(viewport).map(|p| p.page_number).collect();
        assert_eq!(visible, vec![1, 2]);
    }

    #[test]
    fn test_page_at_point() {
        let preview = PagePreview::build(&state(3), &letter());
        assert_eq!(preview.page_at(Point { x: 100.0, y: 10.0 }), Some(1));
        assert_eq!(preview.page_at(Point { x: 100.0, y: 2200.0 }), Some(3));
        // In the gap between sheets
        assert_eq!(preview.page_at(Point { x: 100.0, y: 1060.0 }), None);
    }

    #[test]
    fn test_offsets_round_trip() {
        let geometry = letter();
        assert_eq!(page_offset(1, &geometry), 0.0);
        assert_eq!(page_offset(3, &geometry), 2.0 * 1080.0);
        assert_eq!(page_at_offset(page_offset(3, &geometry), &geometry, 5), 3);
        assert_eq!(page_at_offset(1079.0, &geometry, 5), 1);
        assert_eq!(page_at_offset(1_000_000.0, &geometry, 5), 5);
        assert_eq!(page_at_offset(-20.0, &geometry, 5), 1);
    }
}
