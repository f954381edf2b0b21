//! Color specification parsing and RGB to YUV conversion.
//!
//! A color spec is either a named color (the CSS palette) or a
//! `#RRGGBB[AA]` / `0xRRGGBB[AA]` hex form, with an optional `@alpha`
//! suffix taking a 0.0-1.0 opacity.

use crate::error::TrackError;

/// Fallback when a color spec fails to parse: opaque black.
pub const OPAQUE_BLACK: [u8; 4] = [0, 0, 0, 255];

/// CSS named colors, the subset worth supporting in a track file.
static NAMED_COLORS: &[(&str, [u8; 3])] = &[
    ("aqua", [0x00, 0xFF, 0xFF]),
    ("black", [0x00, 0x00, 0x00]),
    ("blue", [0x00, 0x00, 0xFF]),
    ("brown", [0xA5, 0x2A, 0x2A]),
    ("cyan", [0x00, 0xFF, 0xFF]),
    ("fuchsia", [0xFF, 0x00, 0xFF]),
    ("gray", [0x80, 0x80, 0x80]),
    ("green", [0x00, 0x80, 0x00]),
    ("grey", [0x80, 0x80, 0x80]),
    ("lime", [0x00, 0xFF, 0x00]),
    ("magenta", [0xFF, 0x00, 0xFF]),
    ("maroon", [0x80, 0x00, 0x00]),
    ("navy", [0x00, 0x00, 0x80]),
    ("olive", [0x80, 0x80, 0x00]),
    ("orange", [0xFF, 0xA5, 0x00]),
    ("pink", [0xFF, 0xC0, 0xCB]),
    ("purple", [0x80, 0x00, 0x80]),
    ("red", [0xFF, 0x00, 0x00]),
    ("silver", [0xC0, 0xC0, 0xC0]),
    ("teal", [0x00, 0x80, 0x80]),
    ("violet", [0xEE, 0x82, 0xEE]),
    ("white", [0xFF, 0xFF, 0xFF]),
    ("yellow", [0xFF, 0xFF, 0x00]),
];

/// Parse a color specification into RGBA.
pub fn parse_color(spec: &str) -> Result<[u8; 4], TrackError> {
    let spec = spec.trim();
    let unparseable = || TrackError::UnparseableColor { spec: spec.to_string() };

    // Split off an optional `@alpha` opacity suffix.
    let (body, alpha_suffix) = match spec.split_once('@') {
        Some((body, suffix)) => (body, Some(suffix)),
        None => (spec, None),
    };
    if body.is_empty() {
        return Err(unparseable());
    }

    let mut rgba = if let Some(hex) = body
        .strip_prefix('#')
        .or_else(|| body.strip_prefix("0x"))
        .or_else(|| body.strip_prefix("0X"))
    {
        parse_hex(hex).ok_or_else(unparseable)?
    } else {
        let lower = body.to_ascii_lowercase();
        let rgb = NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, rgb)| *rgb)
            .ok_or_else(unparseable)?;
        [rgb[0], rgb[1], rgb[2], 255]
    };

    if let Some(suffix) = alpha_suffix {
        let opacity: f64 = suffix.parse().map_err(|_| unparseable())?;
        if !(0.0..=1.0).contains(&opacity) {
            return Err(unparseable());
        }
        rgba[3] = (opacity * 255.0).round() as u8;
    }
    Ok(rgba)
}

fn parse_hex(hex: &str) -> Option<[u8; 4]> {
    let byte = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        6 => Some([byte(&hex[0..2])?, byte(&hex[2..4])?, byte(&hex[4..6])?, 255]),
        8 => Some([
            byte(&hex[0..2])?,
            byte(&hex[2..4])?,
            byte(&hex[4..6])?,
            byte(&hex[6..8])?,
        ]),
        _ => None,
    }
}

/// Convert RGB to limited-range BT.601 YUV, the same CCIR conversion the
/// solid fill has always used.
pub fn yuv_from_rgb(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (r, g, b) = (i32::from(r), i32::from(g), i32::from(b));
    let y = ((66 * r + 129 * g + 25 * b + 128) >> 8) + 16;
    let u = ((-38 * r - 74 * g + 112 * b + 128) >> 8) + 128;
    let v = ((112 * r - 94 * g - 18 * b + 128) >> 8) + 128;
    (y as u8, u as u8, v as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_colors() {
        assert_eq!(parse_color("red").unwrap(), [255, 0, 0, 255]);
        assert_eq!(parse_color("Black").unwrap(), [0, 0, 0, 255]);
        // CSS green is half intensity; lime is full.
        assert_eq!(parse_color("green").unwrap(), [0, 128, 0, 255]);
        assert_eq!(parse_color("lime").unwrap(), [0, 255, 0, 255]);
    }

    #[test]
    fn test_hex_colors() {
        assert_eq!(parse_color("#FF8000").unwrap(), [255, 128, 0, 255]);
        assert_eq!(parse_color("0xff8000").unwrap(), [255, 128, 0, 255]);
        assert_eq!(parse_color("#FF800080").unwrap(), [255, 128, 0, 128]);
    }

    #[test]
    fn test_alpha_suffix() {
        assert_eq!(parse_color("red@0.5").unwrap(), [255, 0, 0, 128]);
        assert_eq!(parse_color("#000000@0.0").unwrap(), [0, 0, 0, 0]);
        assert!(parse_color("red@1.5").is_err());
        assert!(parse_color("red@oops").is_err());
    }

    #[test]
    fn test_unparseable_specs() {
        assert!(parse_color("").is_err());
        assert!(parse_color("notacolor").is_err());
        assert!(parse_color("#12345").is_err());
        assert!(parse_color("#GGGGGG").is_err());
    }

    #[test]
    fn test_yuv_conversion_anchors() {
        // Limited-range black and white.
        assert_eq!(yuv_from_rgb(0, 0, 0), (16, 128, 128));
        assert_eq!(yuv_from_rgb(255, 255, 255), (235, 128, 128));
        // Mid gray has centered chroma.
        let (_, u, v) = yuv_from_rgb(128, 128, 128);
        assert_eq!((u, v), (128, 128));
        // Red pulls luma up from black and V above center.
        let (y, _, v) = yuv_from_rgb(255, 0, 0);
        assert_eq!(y, 82);
        assert!(v > 200);
    }
}
