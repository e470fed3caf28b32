//! Projections of pagination state: spacer decorations for the continuous
//! edit view and stacked sheets for the page preview

mod decoration;
mod diff;
mod preview;

pub use decoration::{DecorationRenderer, SpacerDecoration};
pub use diff::{DecorationDiff, DecorationPatch};
pub use preview::{page_at_offset, page_offset, PagePreview, PreviewPage};
