//! Physical unit normalization
//!
//! Every page dimension is reduced to CSS pixels at a fixed reference
//! density of 96 px per inch. Percent and `auto` lengths carry no physical
//! size; they mark a template as reflowable and convert to `0.0`.

use serde::{Deserialize, Serialize};

/// Reference density (pixels per inch)
pub const PX_PER_INCH: f32 = 96.0;

/// Base font size used for `em`/`rem` when no typography is in scope
pub const DEFAULT_FONT_PX: f32 = 16.0;

/// A physical or relative unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Inch,
    Centimeter,
    Millimeter,
    Point,
    Pica,
    #[default]
    Pixel,
    Em,
    Rem,
}

impl Unit {
    /// Parse a unit suffix (case-insensitive)
    pub fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.trim().to_ascii_lowercase().as_str() {
            "in" | "inch" | "inches" | "\"" => Some(Unit::Inch),
            "cm" => Some(Unit::Centimeter),
            "mm" => Some(Unit::Millimeter),
            "pt" => Some(Unit::Point),
            "pc" => Some(Unit::Pica),
            "px" => Some(Unit::Pixel),
            "em" => Some(Unit::Em),
            "rem" => Some(Unit::Rem),
            _ => None,
        }
    }

    /// Pixels per one of this unit, given the base font size for relative units
    pub fn px_factor(&self, font_px: f32) -> f32 {
        match self {
            Unit::Inch => PX_PER_INCH,
            Unit::Centimeter => PX_PER_INCH / 2.54,
            Unit::Millimeter => PX_PER_INCH / 25.4,
            Unit::Point => PX_PER_INCH / 72.0,
            Unit::Pica => PX_PER_INCH / 6.0,
            Unit::Pixel => 1.0,
            Unit::Em | Unit::Rem => font_px,
        }
    }
}

/// A parsed length
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    /// A fixed physical length
    Absolute { value: f32, unit: Unit },
    /// Percent or `auto`: no fixed size, content reflows
    Reflow,
}

impl Length {
    /// Parse a dimension string. Total: malformed input degrades to a bare
    /// number (or zero) in `default_unit`.
    pub fn parse(input: &str, default_unit: Unit) -> Self {
        let s = input.trim();
        if s.eq_ignore_ascii_case("auto") || s.ends_with('%') {
            return Length::Reflow;
        }

        let split = numeric_prefix_len(s);
        let value = match s[..split].parse::<f32>() {
            Ok(v) if v.is_finite() => v,
            _ => {
                log::warn!("Malformed length {:?}, treating as 0{:?}", input, default_unit);
                0.0
            }
        };

        let suffix = s[split..].trim();
        let unit = if suffix.is_empty() {
            default_unit
        } else {
            match Unit::from_suffix(suffix) {
                Some(unit) => unit,
                None => {
                    log::warn!(
                        "Unknown unit {:?} in {:?}, using {:?}",
                        suffix,
                        input,
                        default_unit
                    );
                    default_unit
                }
            }
        };

        Length::Absolute { value, unit }
    }

    /// Check for the reflow sentinel
    pub fn is_reflow(&self) -> bool {
        matches!(self, Length::Reflow)
    }

    /// Pixels at the reference density; `Reflow` and lengths too large to
    /// represent yield `0.0`
    pub fn to_px(&self, font_px: f32) -> f32 {
        match self {
            Length::Absolute { value, unit } => {
                let px = value * unit.px_factor(font_px);
                if px.is_finite() {
                    px
                } else {
                    log::warn!("Length {}{:?} overflows, treating as 0", value, unit);
                    0.0
                }
            }
            Length::Reflow => 0.0,
        }
    }
}

/// Length of the leading `[+-]digits[.digits]` run, in bytes
fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let mut end = 0;
    let mut seen_dot = false;
    let mut seen_digit = false;

    for (idx, &b) in bytes.iter().enumerate() {
        match b {
            b'+' | b'-' if idx == 0 => {}
            b'0'..=b'9' => seen_digit = true,
            b'.' if !seen_dot => seen_dot = true,
            _ => break,
        }
        end = idx + 1;
    }

    if seen_digit {
        end
    } else {
        0
    }
}

/// Convert a dimension string to pixels, defaulting bare numbers to pixels
pub fn to_px(input: &str) -> f32 {
    Length::parse(input, Unit::Pixel).to_px(DEFAULT_FONT_PX)
}

/// Convert a dimension string to pixels with an explicit default unit and
/// base font size
pub fn to_px_with(input: &str, default_unit: Unit, font_px: f32) -> f32 {
    Length::parse(input, default_unit).to_px(font_px)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 0.01
    }

    #[test]
    fn test_physical_units() {
        assert_eq!(to_px("1in"), 96.0);
        assert_eq!(to_px("72pt"), 96.0);
        assert!(approx(to_px("2.54cm"), 96.0));
        assert!(approx(to_px("25.4mm"), 96.0));
        assert_eq!(to_px("1pc"), 16.0);
        assert_eq!(to_px("10px"), 10.0);
    }

    #[test]
    fn test_a4_dimensions() {
        assert!(approx(to_px("210mm"), 793.70));
        assert!(approx(to_px("297mm"), 1122.52));
    }

    #[test]
    fn test_font_relative() {
        assert_eq!(to_px("2em"), 32.0);
        assert_eq!(to_px_with("1.5em", Unit::Pixel, 12.0), 18.0);
        assert_eq!(to_px_with("1rem", Unit::Pixel, 20.0), 20.0);
    }

    #[test]
    fn test_bare_number_uses_default_unit() {
        assert_eq!(to_px("12"), 12.0);
        assert_eq!(to_px_with("12", Unit::Point, DEFAULT_FONT_PX), 16.0);
        assert_eq!(to_px_with(" 1 IN ", Unit::Pixel, DEFAULT_FONT_PX), 96.0);
    }

    #[test]
    fn test_reflow_sentinel() {
        assert!(Length::parse("100%", Unit::Pixel).is_reflow());
        assert!(Length::parse("auto", Unit::Pixel).is_reflow());
        assert!(Length::parse("AUTO", Unit::Pixel).is_reflow());
        assert_eq!(to_px("50%"), 0.0);
        // A physical zero is not the reflow sentinel
        assert!(!Length::parse("0mm", Unit::Pixel).is_reflow());
    }

    #[test]
    fn test_malformed_never_fails() {
        assert_eq!(to_px(""), 0.0);
        assert_eq!(to_px("abc"), 0.0);
        assert_eq!(to_px("12furlongs"), 12.0);
        assert_eq!(to_px("3.5.1in"), 3.5);
        assert_eq!(to_px("-"), 0.0);
        assert_eq!(to_px("-4px"), -4.0);
    }

    #[test]
    fn test_overflow_is_zero() {
        let huge = "10000000000000000000000000000000000000in";
        assert_eq!(to_px(huge), 0.0);
        assert_eq!(to_px_with("1e3", Unit::Pixel, f32::INFINITY), 1.0);
        assert_eq!(to_px_with("2em", Unit::Pixel, f32::INFINITY), 0.0);
    }
}
