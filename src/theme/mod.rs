pub mod board_color;

use serde::{Deserialize, Serialize};
use std::fmt;

/// An sRGB color with alpha, as used in CSS strings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Creates a color from a packed `0xRRGGBB` value
    pub const fn from_hex(hex: u32) -> Self {
        Self::rgb(
            ((hex >> 16) & 0xFF) as u8,
            ((hex >> 8) & 0xFF) as u8,
            (hex & 0xFF) as u8,
        )
    }

    /// Parses a CSS color string.
    ///
    /// Accepts `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()`/`rgba()` with
    /// integer or percentage channels, and named colors. Returns `None` for
    /// anything else, including a bare hex fragment without `#`.
    pub fn parse(input: &str) -> Option<Self> {
        let s = input.trim().to_ascii_lowercase();

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex);
        }
        if let Some(args) = s
            .strip_prefix("rgba(")
            .or_else(|| s.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'))
        {
            return parse_functional(args);
        }
        named_color(&s).map(Self::from_hex)
    }

    /// Darkens by reducing HSL lightness: `l -= l * ratio`
    pub fn darken(self, ratio: f32) -> Self {
        let (h, s, l) = self.to_hsl();
        let l = (l - l * ratio).clamp(0.0, 1.0);
        let (r, g, b) = hsl_to_rgb(h, s, l);
        Self { r, g, b, a: self.a }
    }

    /// CSS serialization: `rgb(r, g, b)`, or `rgba(r, g, b, a)` when translucent
    pub fn to_css(&self) -> String {
        if self.a >= 1.0 {
            format!("rgb({}, {}, {})", self.r, self.g, self.b)
        } else {
            format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }

    /// Hue in degrees, saturation and lightness in `0.0..=1.0`
    fn to_hsl(self) -> (f32, f32, f32) {
        let r = f32::from(self.r) / 255.0;
        let g = f32::from(self.g) / 255.0;
        let b = f32::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        let l = (max + min) / 2.0;

        if delta == 0.0 {
            return (0.0, 0.0, l);
        }

        let s = if l <= 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };

        let h = if max == r {
            (g - b) / delta
        } else if max == g {
            2.0 + (b - r) / delta
        } else {
            4.0 + (r - g) / delta
        };
        let h = (h * 60.0).rem_euclid(360.0);

        (h, s, l)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (u8, u8, u8) {
    if s == 0.0 {
        let v = to_channel(l);
        return (v, v, v);
    }

    let t2 = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let t1 = 2.0 * l - t2;
    let h = h / 360.0;

    let channel = |offset: f32| {
        let mut t = h + offset;
        if t < 0.0 {
            t += 1.0;
        }
        if t > 1.0 {
            t -= 1.0;
        }
        let v = if 6.0 * t < 1.0 {
            t1 + (t2 - t1) * 6.0 * t
        } else if 2.0 * t < 1.0 {
            t2
        } else if 3.0 * t < 2.0 {
            t1 + (t2 - t1) * (2.0 / 3.0 - t) * 6.0
        } else {
            t1
        };
        to_channel(v)
    };

    (channel(1.0 / 3.0), channel(0.0), channel(-1.0 / 3.0))
}

fn to_channel(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    // Short forms double each digit: "f0a" -> "ff00aa"
    let expanded: String = match hex.len() {
        3 | 4 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 | 8 => hex.to_string(),
        _ => return None,
    };

    let byte = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).ok();
    let a = if expanded.len() == 8 {
        f32::from(byte(6)?) / 255.0
    } else {
        1.0
    };

    Some(Rgba {
        r: byte(0)?,
        g: byte(2)?,
        b: byte(4)?,
        a,
    })
}

fn parse_functional(args: &str) -> Option<Rgba> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    if !(parts.len() == 3 || parts.len() == 4) {
        return None;
    }

    let channel = |p: &str| -> Option<u8> {
        if let Some(pct) = p.strip_suffix('%') {
            let v: f32 = pct.trim().parse().ok()?;
            Some(to_channel(v.clamp(0.0, 100.0) / 100.0))
        } else {
            let v: f32 = p.parse().ok()?;
            Some(v.round().clamp(0.0, 255.0) as u8)
        }
    };

    let a = match parts.get(3) {
        Some(p) => {
            let v: f32 = p.parse().ok()?;
            v.clamp(0.0, 1.0)
        }
        None => 1.0,
    };

    Some(Rgba {
        r: channel(parts[0])?,
        g: channel(parts[1])?,
        b: channel(parts[2])?,
        a,
    })
}

/// CSS named colors most often typed into board settings
fn named_color(name: &str) -> Option<u32> {
    let hex = match name {
        "black" => 0x000000,
        "silver" => 0xC0C0C0,
        "gray" | "grey" => 0x808080,
        "white" => 0xFFFFFF,
        "maroon" => 0x800000,
        "red" => 0xFF0000,
        "purple" => 0x800080,
        "fuchsia" | "magenta" => 0xFF00FF,
        "green" => 0x008000,
        "lime" => 0x00FF00,
        "olive" => 0x808000,
        "yellow" => 0xFFFF00,
        "navy" => 0x000080,
        "blue" => 0x0000FF,
        "teal" => 0x008080,
        "aqua" | "cyan" => 0x00FFFF,
        "orange" => 0xFFA500,
        "pink" => 0xFFC0CB,
        "brown" => 0xA52A2A,
        "gold" => 0xFFD700,
        "indigo" => 0x4B0082,
        "violet" => 0xEE82EE,
        "coral" => 0xFF7F50,
        "crimson" => 0xDC143C,
        "tomato" => 0xFF6347,
        "salmon" => 0xFA8072,
        "khaki" => 0xF0E68C,
        "orchid" => 0xDA70D6,
        "plum" => 0xDDA0DD,
        "tan" => 0xD2B48C,
        "chocolate" => 0xD2691E,
        "skyblue" => 0x87CEEB,
        "steelblue" => 0x4682B4,
        "royalblue" => 0x4169E1,
        "slategray" | "slategrey" => 0x708090,
        "darkgreen" => 0x006400,
        "darkred" => 0x8B0000,
        "darkblue" => 0x00008B,
        "darkorange" => 0xFF8C00,
        "lightgray" | "lightgrey" => 0xD3D3D3,
        "darkgray" | "darkgrey" => 0xA9A9A9,
        "turquoise" => 0x40E0D0,
        "seagreen" => 0x2E8B57,
        "forestgreen" => 0x228B22,
        "deepskyblue" => 0x00BFFF,
        "hotpink" => 0xFF69B4,
        "rebeccapurple" => 0x663399,
        _ => return None,
    };
    Some(hex)
}
