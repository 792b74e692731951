//! Colour strings to RGBA pixels.
//!
//! Accepts CSS-style names, `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`,
//! `rgb(r, g, b)` and `rgba(r, g, b, a)`.

use image::Rgba;

/// Drawn in place of anything `parse_color` rejects.
pub const FALLBACK: Rgba<u8> = Rgba([255, 0, 0, 255]);

static NAMED: &[(&str, [u8; 3])] = &[
    ("black", [0, 0, 0]),
    ("white", [255, 255, 255]),
    ("red", [255, 0, 0]),
    ("lime", [0, 255, 0]),
    ("green", [0, 128, 0]),
    ("blue", [0, 0, 255]),
    ("yellow", [255, 255, 0]),
    ("cyan", [0, 255, 255]),
    ("aqua", [0, 255, 255]),
    ("magenta", [255, 0, 255]),
    ("fuchsia", [255, 0, 255]),
    ("orange", [255, 165, 0]),
    ("purple", [128, 0, 128]),
    ("pink", [255, 192, 203]),
    ("brown", [165, 42, 42]),
    ("gray", [128, 128, 128]),
    ("grey", [128, 128, 128]),
    ("darkgray", [169, 169, 169]),
    ("darkgrey", [169, 169, 169]),
    ("lightgray", [211, 211, 211]),
    ("lightgrey", [211, 211, 211]),
    ("silver", [192, 192, 192]),
    ("maroon", [128, 0, 0]),
    ("olive", [128, 128, 0]),
    ("navy", [0, 0, 128]),
    ("teal", [0, 128, 128]),
    ("gold", [255, 215, 0]),
    ("darkred", [139, 0, 0]),
    ("darkgreen", [0, 100, 0]),
    ("darkblue", [0, 0, 139]),
    ("darkorange", [255, 140, 0]),
    ("crimson", [220, 20, 60]),
    ("coral", [255, 127, 80]),
    ("tomato", [255, 99, 71]),
    ("salmon", [250, 128, 114]),
    ("violet", [238, 130, 238]),
    ("indigo", [75, 0, 130]),
    ("lightblue", [173, 216, 230]),
    ("skyblue", [135, 206, 235]),
    ("steelblue", [70, 130, 180]),
    ("royalblue", [65, 105, 225]),
    ("dodgerblue", [30, 144, 255]),
    ("lightgreen", [144, 238, 144]),
    ("limegreen", [50, 205, 50]),
    ("forestgreen", [34, 139, 34]),
    ("lightyellow", [255, 255, 224]),
    ("beige", [245, 245, 220]),
    ("ivory", [255, 255, 240]),
    ("khaki", [240, 230, 140]),
    ("turquoise", [64, 224, 208]),
    ("chocolate", [210, 105, 30]),
    ("tan", [210, 180, 140]),
    ("hotpink", [255, 105, 180]),
    ("deeppink", [255, 20, 147]),
    ("orchid", [218, 112, 214]),
    ("plum", [221, 160, 221]),
    ("lavender", [230, 230, 250]),
    ("whitesmoke", [245, 245, 245]),
    ("gainsboro", [220, 220, 220]),
    ("slategray", [112, 128, 144]),
    ("slategrey", [112, 128, 144]),
    ("dimgray", [105, 105, 105]),
    ("dimgrey", [105, 105, 105]),
];

/// Resolve a colour string. Returns `None` for anything unrecognised.
pub fn parse_color(input: &str) -> Option<Rgba<u8>> {
    let s = input.trim().to_ascii_lowercase();

    if s == "transparent" {
        return Some(Rgba([0, 0, 0, 0]));
    }
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    if let Some(args) = s.strip_prefix("rgba(").and_then(|r| r.strip_suffix(')')) {
        return parse_components(args, 4);
    }
    if let Some(args) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
        return parse_components(args, 3);
    }

    NAMED
        .iter()
        .find(|(name, _)| *name == s)
        .map(|(_, [r, g, b])| Rgba([*r, *g, *b, 255]))
}

/// Like `parse_color`, but never fails: unknown colours draw as red.
pub fn resolve_color(input: &str) -> Rgba<u8> {
    parse_color(input).unwrap_or_else(|| {
        log::warn!("[RENDER] Unknown colour {:?}, drawing as red", input);
        FALLBACK
    })
}

fn parse_hex(hex: &str) -> Option<Rgba<u8>> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();

    match hex.len() {
        3 => Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, 255])),
        4 => Some(Rgba([nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?])),
        6 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, 255])),
        8 => Some(Rgba([byte(0)?, byte(2)?, byte(4)?, byte(6)?])),
        _ => None,
    }
}

fn parse_components(args: &str, expected: usize) -> Option<Rgba<u8>> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if parts.len() != expected {
        return None;
    }
    let mut px = [0u8, 0, 0, 255];
    for (slot, part) in px.iter_mut().zip(&parts[..3]) {
        *slot = part.parse().ok()?;
    }
    if expected == 4 {
        // Alpha may be 0..=1 (CSS) or 0..=255.
        let a: f32 = parts[3].parse().ok()?;
        px[3] = if a <= 1.0 { (a * 255.0).round() as u8 } else { a.min(255.0) as u8 };
    }
    Some(Rgba(px))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_colors_are_case_insensitive() {
        assert_eq!(parse_color("red"), Some(Rgba([255, 0, 0, 255])));
        assert_eq!(parse_color("  White "), Some(Rgba([255, 255, 255, 255])));
        assert_eq!(parse_color("GREEN"), Some(Rgba([0, 128, 0, 255])));
    }

    #[test]
    fn hex_forms() {
        assert_eq!(parse_color("#ff8800"), Some(Rgba([255, 136, 0, 255])));
        assert_eq!(parse_color("#f80"), Some(Rgba([255, 136, 0, 255])));
        assert_eq!(parse_color("#00ff0080"), Some(Rgba([0, 255, 0, 128])));
        assert_eq!(parse_color("#0f08"), Some(Rgba([0, 255, 0, 136])));
    }

    #[test]
    fn functional_forms() {
        assert_eq!(parse_color("rgb(1, 2, 3)"), Some(Rgba([1, 2, 3, 255])));
        assert_eq!(parse_color("rgba(1,2,3,0.5)"), Some(Rgba([1, 2, 3, 128])));
        assert_eq!(parse_color("rgba(1,2,3,200)"), Some(Rgba([1, 2, 3, 200])));
        assert_eq!(parse_color("rgb(1,2)"), None);
        assert_eq!(parse_color("rgb(300,0,0)"), None);
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_color("not-a-colour"), None);
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#gggggg"), None);
        assert_eq!(parse_color(""), None);
    }

    #[test]
    fn resolve_falls_back_to_red() {
        assert_eq!(resolve_color("definitely not a colour"), FALLBACK);
        assert_eq!(resolve_color("blue"), Rgba([0, 0, 255, 255]));
    }
}
