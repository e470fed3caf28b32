//! Block measurement and page break calculation

pub mod font;
mod line_break;
mod measure;
mod pagination;

pub use font::FontMetrics;
pub use line_break::{LineBreaker, LineLayout};
pub use measure::{
    measure_blocks, BlockMeasurement, HeightTable, RenderSurface, TypesetSurface, INDENT_WIDTH,
};
pub use pagination::{
    calculate_page_breaks, page_for_position, pages_from_breaks, paginate, PackingPolicy,
    PageBreak, PageInfo, PageLayout,
};
