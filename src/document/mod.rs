//! Document tree: an ordered list of top-level blocks with stable
//! position ranges

mod block;
mod edit;

pub use block::{Block, BlockId, BlockKind, ListMarker};
pub use edit::{EditOp, EditResult};

use rustc_hash::FxHashMap;
use std::ops::Range;

/// The main document structure
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Top-level blocks in document order
    blocks: Vec<Block>,
    /// Block ID to index
    index: FxHashMap<BlockId, usize>,
    /// Monotonic version counter, bumped on every committed edit
    version: u64,
    /// Next block ID to assign
    next_block_id: u64,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a document from initial text, one block per line.
    ///
    /// Recognizes `#` headings, `-`/`*` bullets, `1.` numbered items,
    /// `![<height>]` images and `---` rules.
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::new();
        if text.is_empty() {
            return doc;
        }

        let mut ordinal = 0;
        for line in text.split('\n') {
            let (kind, content) = parse_line(line.trim_end_matches('\r'));
            match kind {
                BlockKind::ListItem {
                    marker: ListMarker::Numbered { .. },
                    indent_level,
                } => {
                    ordinal += 1;
                    doc.push(
                        BlockKind::ListItem {
                            indent_level,
                            marker: ListMarker::Numbered { ordinal },
                        },
                        content,
                    );
                }
                kind => {
                    ordinal = 0;
                    doc.push(kind, content);
                }
            }
        }

        doc
    }

    /// Append a block without bumping the version
    fn push(&mut self, kind: BlockKind, text: &str) {
        let id = self.alloc_id();
        self.index.insert(id, self.blocks.len());
        self.blocks.push(Block::new(id, kind, text));
    }

    fn alloc_id(&mut self) -> BlockId {
        let id = BlockId(self.next_block_id);
        self.next_block_id += 1;
        id
    }

    fn reindex_from(&mut self, start: usize) {
        for (idx, block) in self.blocks.iter().enumerate().skip(start) {
            self.index.insert(block.id, idx);
        }
    }

    /// Get the document version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Total number of document positions
    pub fn size(&self) -> usize {
        self.blocks.iter().map(Block::node_size).sum()
    }

    /// Check if document has no blocks
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Top-level blocks in order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Get block count
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Get a block by ID
    pub fn block(&self, id: BlockId) -> Option<&Block> {
        self.index.get(&id).and_then(|&idx| self.blocks.get(idx))
    }

    /// Position ranges of every top-level block, contiguous from 0
    pub fn block_ranges(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.blocks.iter().scan(0, |start, block| {
            let range = *start..*start + block.node_size();
            *start = range.end;
            Some(range)
        })
    }

    /// Index of the block containing a document position
    pub fn block_at_position(&self, pos: usize) -> Option<usize> {
        self.block_ranges().position(|range| range.contains(&pos))
    }

    /// Get the full document text, one block per line
    pub fn text(&self) -> String {
        self.blocks
            .iter()
            .map(|b| b.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Replace every block with those parsed from `text`
    pub fn replace_text(&mut self, text: &str) -> EditResult {
        let parsed = Self::from_text(text);
        let mut result = EditResult::default();

        result.deleted.extend(self.blocks.drain(..).map(|b| b.id));
        self.index.clear();
        for block in parsed.blocks {
            let id = self.alloc_id();
            self.index.insert(id, self.blocks.len());
            self.blocks.push(Block { id, ..block });
            result.created.push(id);
        }

        self.version += 1;
        result.version = self.version;
        result
    }

    /// Apply an edit operation. Out-of-range indices are ignored and leave
    /// the version untouched.
    pub fn apply_edit(&mut self, op: EditOp) -> EditResult {
        let len = self.blocks.len();
        let in_range = match &op {
            EditOp::InsertBlock { index, .. } => *index <= len,
            other => other.index() < len,
        };
        if !in_range {
            log::warn!("Ignoring edit at block {} of {}", op.index(), len);
            return EditResult {
                version: self.version,
                ..EditResult::default()
            };
        }

        let mut result = EditResult::default();
        match op {
            EditOp::InsertBlock { index, kind, text } => {
                let id = self.alloc_id();
                self.blocks.insert(index, Block::new(id, kind, text));
                self.reindex_from(index);
                result.created.push(id);
            }
            EditOp::RemoveBlock { index } => {
                let removed = self.blocks.remove(index);
                self.index.remove(&removed.id);
                self.reindex_from(index);
                result.deleted.push(removed.id);
            }
            EditOp::SetText { index, text } => {
                let block = &mut self.blocks[index];
                block.text = text;
                result.affected.push(block.id);
            }
            EditOp::SetKind { index, kind } => {
                let block = &mut self.blocks[index];
                block.kind = kind;
                result.affected.push(block.id);
            }
        }

        self.version += 1;
        result.version = self.version;
        result
    }
}

/// Split a source line into a block kind and its content
fn parse_line(line: &str) -> (BlockKind, &str) {
    let trimmed = line.trim_start();
    let indent_level = ((line.len() - trimmed.len()) / 2).min(u8::MAX as usize) as u8;

    if trimmed == "---" {
        return (BlockKind::HorizontalRule, "");
    }

    if let Some(rest) = trimmed.strip_prefix("![") {
        if let Some(height) = rest.strip_suffix(']') {
            return (
                BlockKind::Image {
                    height: height.to_string(),
                },
                "",
            );
        }
    }

    let hashes = trimmed.bytes().take_while(|&b| b == b'#').count();
    if (1..=6).contains(&hashes) {
        if let Some(content) = trimmed[hashes..].strip_prefix(' ') {
            return (BlockKind::heading(hashes as u8), content);
        }
    }

    if let Some(content) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        return (
            BlockKind::ListItem {
                indent_level,
                marker: ListMarker::Bullet,
            },
            content,
        );
    }

    let digits = trimmed.bytes().take_while(u8::is_ascii_digit).count();
    if digits > 0 {
        if let Some(content) = trimmed[digits..].strip_prefix(". ") {
            return (
                BlockKind::ListItem {
                    indent_level,
                    marker: ListMarker::Numbered { ordinal: 0 },
                },
                content,
            );
        }
    }

    (BlockKind::Paragraph, line)
}
