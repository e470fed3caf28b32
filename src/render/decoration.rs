//! Spacer decorations that make the flowing document look paged

use crate::layout::PageBreak;
use crate::render::{DecorationDiff, DecorationPatch};
use serde::Serialize;

/// A non-editable, non-selectable, empty widget inserted at a break
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpacerDecoration {
    /// Break index; stable across recomputes so the view can reuse nodes
    pub key: usize,
    /// Document position the widget is anchored at
    pub position: usize,
    pub height: f32,
}

impl SpacerDecoration {
    fn from_break(key: usize, page_break: &PageBreak) -> Self {
        Self {
            key,
            position: page_break.position,
            height: page_break.spacer_height.max(0.0),
        }
    }
}

/// Projects break lists onto the editing surface as keyed spacer patches
#[derive(Debug, Default)]
pub struct DecorationRenderer {
    /// What the surface currently shows, indexed by key
    mounted: Vec<SpacerDecoration>,
}

impl DecorationRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spacers currently on the surface
    pub fn mounted(&self) -> &[SpacerDecoration] {
        &self.mounted
    }

    /// Diff `breaks` against the mounted spacers.
    ///
    /// While a recompute is in flight nothing is emitted and the last
    /// settled frame stays mounted.
    pub fn render(
        &mut self,
        breaks: &[PageBreak],
        is_calculating: bool,
        generation: u64,
    ) -> DecorationDiff {
        if is_calculating {
            return DecorationDiff::suppressed(generation);
        }

        let mut diff = DecorationDiff::new(generation);
        let next: Vec<_> = breaks
            .iter()
            .enumerate()
            .map(|(key, b)| SpacerDecoration::from_break(key, b))
            .collect();

        for spacer in &next {
            match self.mounted.get(spacer.key) {
                Some(prev) if prev == spacer => {}
                Some(_) => diff.add_patch(DecorationPatch::Update { spacer: *spacer }),
                None => diff.add_patch(DecorationPatch::Insert { spacer: *spacer }),
            }
        }

        for prev in self.mounted.iter().skip(next.len()) {
            diff.add_patch(DecorationPatch::Remove { key: prev.key });
        }

        self.mounted = next;
        diff
    }

    /// Unmount everything (document closed or template went reflowable)
    pub fn clear(&mut self, generation: u64) -> DecorationDiff {
        self.render(&[], false, generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn breaks(pairs: &[(usize, f32)]) -> Vec<PageBreak> {
        pairs
            .iter()
            .map(|&(position, spacer_height)| PageBreak {
                position,
                spacer_height,
            })
            .collect()
    }

    #[test]
    fn test_first_render_inserts_all() {
        let mut renderer = DecorationRenderer::new();
        let diff = renderer.render(&breaks(&[(10, 50.0), (30, 75.0)]), false, 1);

        assert_eq!(diff.patch_count(), 2);
        assert_eq!(
            diff.patches[1],
            DecorationPatch::Insert {
                spacer: SpacerDecoration {
                    key: 1,
                    position: 30,
                    height: 75.0
                }
            }
        );
        assert_eq!(renderer.mounted().len(), 2);
    }

    #[test]
    fn test_unchanged_breaks_emit_nothing() {
        let mut renderer = DecorationRenderer::new();
        let list = breaks(&[(10, 50.0)]);
        renderer.render(&list, false, 1);
        assert!(!renderer.render(&list, false, 2).has_patches());
    }

    #[test]
    fn test_keyed_update_and_remove() {
        let mut renderer = DecorationRenderer::new();
        renderer.render(&breaks(&[(10, 50.0), (30, 75.0), (50, 20.0)]), false, 1);

        let diff = renderer.render(&breaks(&[(10, 50.0), (34, 60.0)]), false, 2);
        assert_eq!(
            diff.patches,
            vec![
                DecorationPatch::Update {
                    spacer: SpacerDecoration {
                        key: 1,
                        position: 34,
                        height: 60.0
                    }
                },
                DecorationPatch::Remove { key: 2 },
            ]
        );
    }

    #[test]
    fn test_suppressed_while_calculating() {
        let mut renderer = DecorationRenderer::new();
        renderer.render(&breaks(&[(10, 50.0)]), false, 1);

        let diff = renderer.render(&breaks(&[(12, 40.0), (40, 40.0)]), true, 2);
        assert!(diff.suppressed);
        assert!(!diff.has_patches());
        // The settled frame stays mounted
        assert_eq!(renderer.mounted()[0].position, 10);
        assert_eq!(renderer.mounted().len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut renderer = DecorationRenderer::new();
        renderer.render(&breaks(&[(10, 50.0), (20, 5.0)]), false, 1);
        let diff = renderer.clear(2);
        assert_eq!(diff.patch_count(), 2);
        assert!(renderer.mounted().is_empty());
    }
}
