//! Line breaking for block measurement

use crate::layout::font::FontMetrics;
use std::ops::Range;
use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

/// A single wrapped line
#[derive(Debug, Clone, PartialEq)]
pub struct LineLayout {
    /// Byte range within the block text this line covers
    pub byte_range: Range<usize>,
    /// Advance width of the line content
    pub width: f32,
    /// Line height
    pub height: f32,
}

/// Greedy line breaker over UAX #14 break opportunities
#[derive(Debug, Default, Clone, Copy)]
pub struct LineBreaker;

impl LineBreaker {
    pub fn new() -> Self {
        Self
    }

    /// Wrap `text` into lines no wider than `max_width`.
    ///
    /// Always yields at least one line. Words wider than the line are split
    /// at grapheme boundaries.
    pub fn wrap(
        &self,
        text: &str,
        max_width: f32,
        metrics: &FontMetrics,
        line_height: f32,
    ) -> Vec<LineLayout> {
        let mut lines = Vec::new();
        let mut push = |range: Range<usize>, width: f32| {
            lines.push(LineLayout {
                byte_range: range,
                width,
                height: line_height,
            })
        };

        if text.is_empty() {
            push(0..0, 0.0);
            return lines;
        }

        let mut line_start = 0;
        let mut line_width = 0.0;
        let mut seg_start = 0;

        for (brk, opportunity) in linebreaks(text) {
            let segment = &text[seg_start..brk];
            let seg_width = text_width(segment, metrics);
            // Trailing spaces may hang past the margin
            let ink_width = text_width(segment.trim_end(), metrics);

            if line_width + ink_width > max_width && line_start < seg_start {
                push(line_start..seg_start, line_width);
                line_start = seg_start;
                line_width = 0.0;
            }

            if ink_width > max_width {
                // Emergency break inside an overlong word
                for (idx, grapheme) in segment.grapheme_indices(true) {
                    let w = grapheme_width(grapheme, metrics);
                    let at = seg_start + idx;
                    if line_width + w > max_width && line_start < at {
                        push(line_start..at, line_width);
                        line_start = at;
                        line_width = 0.0;
                    }
                    line_width += w;
                }
            } else {
                line_width += seg_width;
            }

            seg_start = brk;

            if opportunity == BreakOpportunity::Mandatory {
                push(line_start..brk, line_width);
                line_start = brk;
                line_width = 0.0;
            }
        }

        if line_start < text.len() {
            push(line_start..text.len(), line_width);
        }

        if text.ends_with('\n') {
            push(text.len()..text.len(), 0.0);
        }

        lines
    }
}

fn grapheme_width(grapheme: &str, metrics: &FontMetrics) -> f32 {
    if grapheme == "\t" {
        metrics.width(' ') * 4.0
    } else if grapheme.chars().all(char::is_control) {
        0.0
    } else {
        grapheme.chars().map(|c| metrics.width(c)).sum()
    }
}

fn text_width(text: &str, metrics: &FontMetrics) -> f32 {
    text.graphemes(true).map(|g| grapheme_width(g, metrics)).sum()
}
