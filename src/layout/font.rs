//! Font metrics for block measurement

/// Metrics needed for text layout
#[derive(Debug, Clone)]
pub struct FontMetrics {
    /// Line height in logical pixels
    pub line_height: f32,
    /// Width of ASCII characters (0-127)
    pub char_widths: Vec<f32>,
    /// Default width for non-ASCII characters
    pub default_width: f32,
}

impl Default for FontMetrics {
    fn default() -> Self {
        // 16px * 1.2 line height, 8.41px monospace advance
        Self::uniform(16.8, 8.41)
    }
}

impl FontMetrics {
    pub fn new(line_height: f32, char_widths: Vec<f32>, default_width: f32) -> Self {
        Self {
            line_height,
            char_widths,
            default_width,
        }
    }

    /// Every character has the same advance
    pub fn uniform(line_height: f32, width: f32) -> Self {
        Self::new(line_height, vec![width; 128], width)
    }

    /// Approximate metrics for a font family at a pixel size.
    ///
    /// Monospace families get a fixed 0.6em advance; proportional families
    /// get per-class ASCII advances.
    pub fn for_family(family: &str, font_px: f32, line_height: f32) -> Self {
        let family = family.to_ascii_lowercase();
        if family.contains("mono") || family.contains("courier") {
            return Self::uniform(line_height, font_px * 0.6);
        }

        let char_widths = (0u8..128)
            .map(|b| font_px * proportional_advance(b as char))
            .collect();
        Self::new(line_height, char_widths, font_px * 0.6)
    }

    /// Get width of a character
    pub fn width(&self, c: char) -> f32 {
        if c.is_ascii() {
            if let Some(w) = self.char_widths.get(c as usize) {
                return *w;
            }
        }
        if is_wide(c) {
            return self.default_width / 0.6;
        }
        self.default_width
    }
}

/// Advance in ems for a proportional face
fn proportional_advance(c: char) -> f32 {
    match c {
        ' ' => 0.25,
        'i' | 'j' | 'l' | '\'' | '.' | ',' | ':' | ';' | '!' | '|' => 0.28,
        'f' | 't' | 'r' | 'I' | '(' | ')' | '[' | ']' | '-' => 0.35,
        'm' | 'w' => 0.78,
        'M' | 'W' => 0.88,
        'A'..='Z' => 0.66,
        '0'..='9' => 0.5,
        c if c.is_ascii_control() => 0.0,
        _ => 0.5,
    }
}

/// East Asian wide characters take a full em
fn is_wide(c: char) -> bool {
    matches!(c as u32,
        0x1100..=0x115F
        | 0x2E80..=0xA4CF
        | 0xAC00..=0xD7A3
        | 0xF900..=0xFAFF
        | 0xFE30..=0xFE4F
        | 0xFF00..=0xFF60
        | 0xFFE0..=0xFFE6
        | 0x20000..=0x3FFFD)
}
