//! Color parsing utilities for CSS color strings
//!
//! Palette tables and scene styles are authored as CSS colors. Supported:
//! - Hex: `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`
//! - Functional: `rgb()`, `rgba()`, `hsl()`, `hsla()`, `hwb()`, `oklch()`
//! - Named: `white`, `black`, `transparent`, etc.

use image::Rgba;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use thiserror::Error;

/// Magenta used wherever a color string fails to parse
pub const MAGENTA: Rgba<u8> = Rgba([255, 0, 255, 255]);

/// Fully transparent pixel
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// Parse a CSS color string into an RGBA color.
///
/// # Examples
///
/// ```
/// use crosswalk::color::parse_color;
///
/// assert_eq!(parse_color("#3B82F6").unwrap(), image::Rgba([59, 130, 246, 255]));
/// assert_eq!(parse_color("#FFF").unwrap(), image::Rgba([255, 255, 255, 255]));
/// assert_eq!(parse_color("rgba(255, 255, 255, 0.15)").unwrap()[3], 38);
/// ```
///
/// # Errors
///
/// Returns `ColorError` if the input is invalid or unparseable.
pub fn parse_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    // Fast path for hex colors, the format every palette table uses
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex_color(hex);
    }

    parse_css_color(s)
}

/// Parse a color, substituting magenta for anything unparseable.
pub fn parse_color_lenient(s: &str) -> Rgba<u8> {
    parse_color(s).unwrap_or(MAGENTA)
}

/// Format an RGBA color as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
pub fn format_hex(color: Rgba<u8>) -> String {
    let [r, g, b, a] = color.0;
    if a == 255 {
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    } else {
        format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
    }
}

/// Parse the digits of a hex color (without the leading '#')
fn parse_hex_color(hex: &str) -> Result<Rgba<u8>, ColorError> {
    let digits = hex
        .chars()
        .map(|c| c.to_digit(16).map(|d| d as u8).ok_or(ColorError::InvalidHex(c)))
        .collect::<Result<Vec<u8>, _>>()?;

    match digits.as_slice() {
        // #RGB / #RGBA: each digit is doubled
        [r, g, b] => Ok(Rgba([r * 17, g * 17, b * 17, 255])),
        [r, g, b, a] => Ok(Rgba([r * 17, g * 17, b * 17, a * 17])),
        [r1, r2, g1, g2, b1, b2] => Ok(Rgba([r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2, 255])),
        [r1, r2, g1, g2, b1, b2, a1, a2] => {
            Ok(Rgba([r1 * 16 + r2, g1 * 16 + g2, b1 * 16 + b2, a1 * 16 + a2]))
        }
        other => Err(ColorError::InvalidLength(other.len())),
    }
}

/// Parse a CSS color using lightningcss (rgb, hsl, hwb, oklch, named colors)
fn parse_css_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let css_color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    css_color_to_rgba(css_color)
}

/// Convert a lightningcss CssColor to RGBA
fn css_color_to_rgba(color: CssColor) -> Result<Rgba<u8>, ColorError> {
    use lightningcss::values::color::FloatColor;

    let rgb_color = color
        .to_rgb()
        .map_err(|_| ColorError::CssParse("cannot convert color to RGB".to_string()))?;

    match rgb_color {
        CssColor::RGBA(rgba) => Ok(Rgba([rgba.red, rgba.green, rgba.blue, rgba.alpha])),
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(rgb) => {
                let channel = |v: f32| (v * 255.0).round().clamp(0.0, 255.0) as u8;
                Ok(Rgba([channel(rgb.r), channel(rgb.g), channel(rgb.b), channel(rgb.alpha)]))
            }
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_six_digit_hex() {
        assert_eq!(parse_color("#FFD5B8").unwrap(), Rgba([255, 213, 184, 255]));
        assert_eq!(parse_color("#1a1a1a").unwrap(), Rgba([26, 26, 26, 255]));
    }

    #[test]
    fn test_parse_short_hex_doubles_digits() {
        assert_eq!(parse_color("#F00").unwrap(), Rgba([255, 0, 0, 255]));
        assert_eq!(parse_color("#F008").unwrap(), Rgba([255, 0, 0, 136]));
    }

    #[test]
    fn test_parse_eight_digit_hex_alpha() {
        assert_eq!(parse_color("#00000000").unwrap(), TRANSPARENT);
    }

    #[test]
    fn test_parse_rejects_bad_hex() {
        assert_eq!(parse_color("#GG0000"), Err(ColorError::InvalidHex('G')));
        assert_eq!(parse_color("#12345"), Err(ColorError::InvalidLength(5)));
        assert_eq!(parse_color(""), Err(ColorError::Empty));
        assert_eq!(parse_color("   "), Err(ColorError::Empty));
    }

    #[test]
    fn test_parse_functional_and_named() {
        assert_eq!(parse_color("rgb(0, 255, 0)").unwrap(), Rgba([0, 255, 0, 255]));
        assert_eq!(parse_color("white").unwrap(), Rgba([255, 255, 255, 255]));
        let glow = parse_color("rgba(255, 255, 255, 0.15)").unwrap();
        assert_eq!(&glow.0[..3], &[255, 255, 255]);
        assert_eq!(glow[3], 38);
    }

    #[test]
    fn test_parse_garbage_is_css_error() {
        assert!(matches!(parse_color("not-a-color"), Err(ColorError::CssParse(_))));
    }

    #[test]
    fn test_lenient_falls_back_to_magenta() {
        assert_eq!(parse_color_lenient("nope"), MAGENTA);
        assert_eq!(parse_color_lenient("#0D1117"), Rgba([13, 17, 23, 255]));
    }

    #[test]
    fn test_format_hex() {
        assert_eq!(format_hex(Rgba([59, 130, 246, 255])), "#3B82F6");
        assert_eq!(format_hex(Rgba([255, 255, 255, 38])), "#FFFFFF26");
    }
}
