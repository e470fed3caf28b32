//! Top-level block nodes

/// Stable identifier for blocks that survives edits
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BlockId(pub u64);

/// Type of list marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMarker {
    Bullet,
    Numbered { ordinal: u32 },
}

impl ListMarker {
    /// Get the display string for this marker
    pub fn display(&self) -> String {
        match self {
            ListMarker::Bullet => "•".to_string(),
            ListMarker::Numbered { ordinal } => format!("{}.", ordinal),
        }
    }
}

/// The kind of block element
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BlockKind {
    /// Regular paragraph
    #[default]
    Paragraph,
    /// Heading with level (1-6)
    Heading { level: u8 },
    /// List item
    ListItem { indent_level: u8, marker: ListMarker },
    /// Embedded image with an explicit rendered height (any unit)
    Image { height: String },
    /// Horizontal rule
    HorizontalRule,
}

impl BlockKind {
    /// Create a heading, clamping the level to 1-6
    pub fn heading(level: u8) -> Self {
        BlockKind::Heading {
            level: level.clamp(1, 6),
        }
    }

    /// Get the line height multiplier for this block kind
    pub fn line_height_multiplier(&self) -> f32 {
        match self {
            BlockKind::Heading { level } => match level {
                1 => 1.5,
                2 => 1.4,
                3 => 1.3,
                _ => 1.2,
            },
            _ => 1.0,
        }
    }

    /// Get the spacing after this block (in line heights)
    pub fn spacing_after(&self) -> f32 {
        match self {
            BlockKind::Paragraph => 1.0,
            BlockKind::Heading { .. } => 0.5,
            BlockKind::ListItem { .. } => 0.25,
            BlockKind::Image { .. } | BlockKind::HorizontalRule => 0.5,
        }
    }

    /// Leaf nodes with no text content
    pub fn is_atom(&self) -> bool {
        matches!(self, BlockKind::Image { .. } | BlockKind::HorizontalRule)
    }

    /// Check if this is a heading
    pub fn is_heading(&self) -> bool {
        matches!(self, BlockKind::Heading { .. })
    }

    /// Check if this is a list item
    pub fn is_list_item(&self) -> bool {
        matches!(self, BlockKind::ListItem { .. })
    }
}

/// A top-level node of the document
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub id: BlockId,
    pub kind: BlockKind,
    pub text: String,
}

impl Block {
    pub fn new(id: BlockId, kind: BlockKind, text: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            text: text.into(),
        }
    }

    /// Number of document positions this node spans.
    ///
    /// Text blocks span their content plus an opening and a closing token;
    /// atoms span a single position.
    pub fn node_size(&self) -> usize {
        if self.kind.is_atom() {
            1
        } else {
            self.text.chars().count() + 2
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_kind() {
        let para = BlockKind::Paragraph;
        assert!(!para.is_heading());
        assert!(!para.is_list_item());

        assert!(BlockKind::heading(1).is_heading());
        assert_eq!(BlockKind::heading(9), BlockKind::Heading { level: 6 });
        assert_eq!(BlockKind::heading(0), BlockKind::Heading { level: 1 });

        let list = BlockKind::ListItem {
            indent_level: 0,
            marker: ListMarker::Bullet,
        };
        assert!(list.is_list_item());
        assert!(BlockKind::HorizontalRule.is_atom());
    }

    #[test]
    fn test_node_size() {
        let para = Block::new(BlockId(0), BlockKind::Paragraph, "héllo");
        assert_eq!(para.node_size(), 7);

        let empty = Block::new(BlockId(1), BlockKind::Paragraph, "");
        assert_eq!(empty.node_size(), 2);

        let image = Block::new(
            BlockId(2),
            BlockKind::Image {
                height: "2in".to_string(),
            },
            "ignored",
        );
        assert_eq!(image.node_size(), 1);
    }

    #[test]
    fn test_list_marker_display() {
        assert_eq!(ListMarker::Bullet.display(), "•");
        assert_eq!(ListMarker::Numbered { ordinal: 1 }.display(), "1.");
        assert_eq!(ListMarker::Numbered { ordinal: 10 }.display(), "10.");
    }
}
