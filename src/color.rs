//! Color parsing and the board palette
//!
//! Accepts the usual web color notations: `#rgb`, `#rgba`, `#rrggbb`,
//! `#rrggbbaa`, `rgb()`/`rgba()` with integer or percentage channels,
//! `hsl()`/`hsla()`, and CSS color names (case-insensitive).

use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const DEFAULT_BACKGROUND: &str = "#D6BE96";
pub const DEFAULT_FOREGROUND: &str = "#99876C";

/// Parse a color spec into an RGBA pixel. Returns `None` when unparsable.
pub fn parse_color(spec: &str) -> Option<Rgba<u8>> {
    let s = spec.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = s.to_ascii_lowercase();
    if let Some(args) = function_args(&lower, "rgba").or_else(|| function_args(&lower, "rgb")) {
        return parse_rgb_args(args);
    }
    if let Some(args) = function_args(&lower, "hsla").or_else(|| function_args(&lower, "hsl")) {
        return parse_hsl_args(args);
    }

    named_color(&lower).map(|rgb| {
        let [_, r, g, b] = rgb.to_be_bytes();
        Rgba([r, g, b, 255])
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

fn function_args<'a>(s: &'a str, name: &str) -> Option<Vec<&'a str>> {
    let inner = s.strip_prefix(name)?.trim_start().strip_prefix('(')?.strip_suffix(')')?;
    Some(inner.split(',').map(str::trim).collect())
}

/// A channel as either `0..=255` or `0%..=100%`.
fn parse_channel(arg: &str) -> Option<u8> {
    if let Some(pct) = arg.strip_suffix('%') {
        let v: f64 = pct.trim().parse().ok()?;
        if !(0.0..=100.0).contains(&v) {
            return None;
        }
        return Some((v * 255.0 / 100.0 + 0.5) as u8);
    }
    let v: u32 = arg.parse().ok()?;
    u8::try_from(v).ok()
}

fn parse_alpha(arg: &str) -> Option<u8> {
    if arg.ends_with('%') {
        return parse_channel(arg);
    }
    let v: f64 = arg.parse().ok()?;
    if !(0.0..=1.0).contains(&v) {
        return None;
    }
    Some((v * 255.0 + 0.5) as u8)
}

fn parse_rgb_args(args: Vec<&str>) -> Option<Rgba<u8>> {
    match args.as_slice() {
        [r, g, b] => Some(Rgba([parse_channel(r)?, parse_channel(g)?, parse_channel(b)?, 255])),
        [r, g, b, a] => Some(Rgba([parse_channel(r)?, parse_channel(g)?, parse_channel(b)?, parse_alpha(a)?])),
        _ => None,
    }
}

fn parse_hsl_args(args: Vec<&str>) -> Option<Rgba<u8>> {
    let (h, s, l, a) = match args.as_slice() {
        [h, s, l] => (*h, *s, *l, 255),
        [h, s, l, a] => (*h, *s, *l, parse_alpha(a)?),
        _ => return None,
    };
    let h: f64 = h.trim_end_matches("deg").parse().ok()?;
    let s: f64 = s.strip_suffix('%')?.trim().parse().ok()?;
    let l: f64 = l.strip_suffix('%')?.trim().parse().ok()?;
    if !(0.0..=100.0).contains(&s) || !(0.0..=100.0).contains(&l) {
        return None;
    }
    let [r, g, b] = hsl_to_rgb(h.rem_euclid(360.0) / 360.0, s / 100.0, l / 100.0);
    Some(Rgba([r, g, b, a]))
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> [u8; 3] {
    if s == 0.0 {
        let v = (l * 255.0 + 0.5) as u8;
        return [v, v, v];
    }
    let q = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let hue = |mut t: f64| {
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        let v = if t < 1.0 / 6.0 {
            p + (q - p) * 6.0 * t
        } else if t < 0.5 {
            q
        } else if t < 2.0 / 3.0 {
            p + (q - p) * (2.0 / 3.0 - t) * 6.0
        } else {
            p
        };
        (v * 255.0 + 0.5) as u8
    };
    [hue(h + 1.0 / 3.0), hue(h), hue(h - 1.0 / 3.0)]
}

fn named_color(name: &str) -> Option<u32> {
    NAMED_COLORS
        .binary_search_by(|(n, _)| n.cmp(&name))
        .ok()
        .map(|i| NAMED_COLORS[i].1)
}

// Sorted by name for binary search.
const NAMED_COLORS: &[(&str, u32)] = &[
    ("aliceblue", 0xF0F8FF), ("antiquewhite", 0xFAEBD7), ("aqua", 0x00FFFF), ("aquamarine", 0x7FFFD4),
    ("azure", 0xF0FFFF), ("beige", 0xF5F5DC), ("bisque", 0xFFE4C4), ("black", 0x000000),
    ("blanchedalmond", 0xFFEBCD), ("blue", 0x0000FF), ("blueviolet", 0x8A2BE2), ("brown", 0xA52A2A),
    ("burlywood", 0xDEB887), ("cadetblue", 0x5F9EA0), ("chartreuse", 0x7FFF00), ("chocolate", 0xD2691E),
    ("coral", 0xFF7F50), ("cornflowerblue", 0x6495ED), ("cornsilk", 0xFFF8DC), ("crimson", 0xDC143C),
    ("cyan", 0x00FFFF), ("darkblue", 0x00008B), ("darkcyan", 0x008B8B), ("darkgoldenrod", 0xB8860B),
    ("darkgray", 0xA9A9A9), ("darkgreen", 0x006400), ("darkgrey", 0xA9A9A9), ("darkkhaki", 0xBDB76B),
    ("darkmagenta", 0x8B008B), ("darkolivegreen", 0x556B2F), ("darkorange", 0xFF8C00), ("darkorchid", 0x9932CC),
    ("darkred", 0x8B0000), ("darksalmon", 0xE9967A), ("darkseagreen", 0x8FBC8F), ("darkslateblue", 0x483D8B),
    ("darkslategray", 0x2F4F4F), ("darkslategrey", 0x2F4F4F), ("darkturquoise", 0x00CED1), ("darkviolet", 0x9400D3),
    ("deeppink", 0xFF1493), ("deepskyblue", 0x00BFFF), ("dimgray", 0x696969), ("dimgrey", 0x696969),
    ("dodgerblue", 0x1E90FF), ("firebrick", 0xB22222), ("floralwhite", 0xFFFAF0), ("forestgreen", 0x228B22),
    ("fuchsia", 0xFF00FF), ("gainsboro", 0xDCDCDC), ("ghostwhite", 0xF8F8FF), ("gold", 0xFFD700),
    ("goldenrod", 0xDAA520), ("gray", 0x808080), ("green", 0x008000), ("greenyellow", 0xADFF2F),
    ("grey", 0x808080), ("honeydew", 0xF0FFF0), ("hotpink", 0xFF69B4), ("indianred", 0xCD5C5C),
    ("indigo", 0x4B0082), ("ivory", 0xFFFFF0), ("khaki", 0xF0E68C), ("lavender", 0xE6E6FA),
    ("lavenderblush", 0xFFF0F5), ("lawngreen", 0x7CFC00), ("lemonchiffon", 0xFFFACD), ("lightblue", 0xADD8E6),
    ("lightcoral", 0xF08080), ("lightcyan", 0xE0FFFF), ("lightgoldenrodyellow", 0xFAFAD2), ("lightgray", 0xD3D3D3),
    ("lightgreen", 0x90EE90), ("lightgrey", 0xD3D3D3), ("lightpink", 0xFFB6C1), ("lightsalmon", 0xFFA07A),
    ("lightseagreen", 0x20B2AA), ("lightskyblue", 0x87CEFA), ("lightslategray", 0x778899), ("lightslategrey", 0x778899),
    ("lightsteelblue", 0xB0C4DE), ("lightyellow", 0xFFFFE0), ("lime", 0x00FF00), ("limegreen", 0x32CD32),
    ("linen", 0xFAF0E6), ("magenta", 0xFF00FF), ("maroon", 0x800000), ("mediumaquamarine", 0x66CDAA),
    ("mediumblue", 0x0000CD), ("mediumorchid", 0xBA55D3), ("mediumpurple", 0x9370DB), ("mediumseagreen", 0x3CB371),
    ("mediumslateblue", 0x7B68EE), ("mediumspringgreen", 0x00FA9A), ("mediumturquoise", 0x48D1CC), ("mediumvioletred", 0xC71585),
    ("midnightblue", 0x191970), ("mintcream", 0xF5FFFA), ("mistyrose", 0xFFE4E1), ("moccasin", 0xFFE4B5),
    ("navajowhite", 0xFFDEAD), ("navy", 0x000080), ("oldlace", 0xFDF5E6), ("olive", 0x808000),
    ("olivedrab", 0x6B8E23), ("orange", 0xFFA500), ("orangered", 0xFF4500), ("orchid", 0xDA70D6),
    ("palegoldenrod", 0xEEE8AA), ("palegreen", 0x98FB98), ("paleturquoise", 0xAFEEEE), ("palevioletred", 0xDB7093),
    ("papayawhip", 0xFFEFD5), ("peachpuff", 0xFFDAB9), ("peru", 0xCD853F), ("pink", 0xFFC0CB),
    ("plum", 0xDDA0DD), ("powderblue", 0xB0E0E6), ("purple", 0x800080), ("rebeccapurple", 0x663399),
    ("red", 0xFF0000), ("rosybrown", 0xBC8F8F), ("royalblue", 0x4169E1), ("saddlebrown", 0x8B4513),
    ("salmon", 0xFA8072), ("sandybrown", 0xF4A460), ("seagreen", 0x2E8B57), ("seashell", 0xFFF5EE),
    ("sienna", 0xA0522D), ("silver", 0xC0C0C0), ("skyblue", 0x87CEEB), ("slateblue", 0x6A5ACD),
    ("slategray", 0x708090), ("slategrey", 0x708090), ("snow", 0xFFFAFA), ("springgreen", 0x00FF7F),
    ("steelblue", 0x4682B4), ("tan", 0xD2B48C), ("teal", 0x008080), ("thistle", 0xD8BFD8),
    ("tomato", 0xFF6347), ("turquoise", 0x40E0D0), ("violet", 0xEE82EE), ("wheat", 0xF5DEB3),
    ("white", 0xFFFFFF), ("whitesmoke", 0xF5F5F5), ("yellow", 0xFFFF00), ("yellowgreen", 0x9ACD32),
];

/// Raw palette as supplied by the caller; every entry optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorSettings {
    #[serde(alias = "bg_color")]
    pub background_color: Option<String>,
    #[serde(alias = "fg_color")]
    pub foreground_color: Option<String>,
    pub line_color: Option<String>,
    pub border_color: Option<String>,
    /// Canvas area outside a centered board
    #[serde(alias = "outer_bg_color")]
    pub outer_background_color: Option<String>,
}

/// Resolved board colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Rgba<u8>,
    pub line: Rgba<u8>,
    pub border: Rgba<u8>,
    pub outer_background: Rgba<u8>,
}

impl Default for Palette {
    fn default() -> Self {
        let background = Rgba([0xD6, 0xBE, 0x96, 255]);
        let foreground = Rgba([0x99, 0x87, 0x6C, 255]);
        Self {
            background,
            line: foreground,
            border: foreground,
            outer_background: background,
        }
    }
}

/// Collects unparsable color specs so they can be reported as one batch.
#[derive(Debug, Default)]
pub struct ColorCollector {
    invalid: Vec<String>,
}

impl ColorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `spec`, remembering it on failure. The fallback keeps
    /// resolution going so every bad color is reported at once.
    pub fn parse(&mut self, spec: &str) -> Rgba<u8> {
        match parse_color(spec) {
            Some(c) => c,
            None => {
                self.invalid.push(spec.to_string());
                Rgba([0, 0, 0, 255])
            }
        }
    }

    pub fn finish(self) -> Result<()> {
        if self.invalid.is_empty() {
            Ok(())
        } else {
            Err(Error::InvalidColor(self.invalid))
        }
    }
}

fn non_empty(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.trim().is_empty())
}

impl ColorSettings {
    /// Resolve into a palette, applying defaults (line and border fall back
    /// to the foreground color; the outer background to the background).
    pub fn resolve(&self, colors: &mut ColorCollector) -> Palette {
        let background = colors.parse(non_empty(&self.background_color).unwrap_or(DEFAULT_BACKGROUND));
        let foreground = colors.parse(non_empty(&self.foreground_color).unwrap_or(DEFAULT_FOREGROUND));
        let mut or_else = |v: &Option<String>, fallback: Rgba<u8>| match non_empty(v) {
            Some(spec) => colors.parse(spec),
            None => fallback,
        };

        let line = or_else(&self.line_color, foreground);
        let border = or_else(&self.border_color, foreground);
        let outer_background = or_else(&self.outer_background_color, background);

        Palette {
            background,
            line,
            border,
            outer_background,
        }
    }
}
