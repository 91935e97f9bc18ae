use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// RGBA color with components in 0.0 - 1.0.
///
/// Bodies keep the CSS spelling they were declared with so the 2D canvas can
/// take it verbatim; the float form is what the 3D instance buffer carries.
#[derive(Debug, Clone, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
    css: String,
}

/// CSS named colors the body tables use.
const NAMED: &[(&str, (u8, u8, u8))] = &[
    ("black", (0, 0, 0)),
    ("white", (255, 255, 255)),
    ("yellow", (255, 255, 0)),
    ("gold", (255, 215, 0)),
    ("gray", (128, 128, 128)),
    ("grey", (128, 128, 128)),
    ("lightgray", (211, 211, 211)),
    ("orange", (255, 165, 0)),
    ("blue", (0, 0, 255)),
    ("red", (255, 0, 0)),
    ("brown", (165, 42, 42)),
    ("khaki", (240, 230, 140)),
    ("lightblue", (173, 216, 230)),
    ("darkblue", (0, 0, 139)),
    ("tan", (210, 180, 140)),
    ("wheat", (245, 222, 179)),
    ("skyblue", (135, 206, 235)),
];

impl Color {
    /// Opaque color from float components.
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Color from float components with alpha.
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        let css = format!(
            "rgba({}, {}, {}, {})",
            (r.clamp(0.0, 1.0) * 255.0).round() as u8,
            (g.clamp(0.0, 1.0) * 255.0).round() as u8,
            (b.clamp(0.0, 1.0) * 255.0).round() as u8,
            a,
        );
        Self { r, g, b, a, css }
    }

    /// Opaque color from 0-255 components.
    pub fn rgb8(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
            css: format!("#{r:02x}{g:02x}{b:02x}"),
        }
    }

    /// Parse a CSS color: a known name or `#rrggbb` / `#rgb`.
    /// Unknown input falls back to white, keeping the original spelling for
    /// the canvas (which applies its own fallback).
    pub fn css(value: &str) -> Self {
        let trimmed = value.trim();
        let lower = trimmed.to_ascii_lowercase();
        let rgb = NAMED
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, rgb)| *rgb)
            .or_else(|| parse_hex(&lower));

        let (r, g, b) = rgb.unwrap_or_else(|| {
            log::debug!("unrecognized color {trimmed:?}, using white");
            (255, 255, 255)
        });
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: 1.0,
            css: trimmed.to_string(),
        }
    }

    /// The CSS string handed to a 2D canvas.
    pub fn as_css(&self) -> &str {
        &self.css
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::css("white")
    }
}

fn parse_hex(s: &str) -> Option<(u8, u8, u8)> {
    let hex = s.strip_prefix('#')?;
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some((r, g, b))
        }
        3 => {
            let digit = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some((digit(0)?, digit(1)?, digit(2)?))
        }
        _ => None,
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.css)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Color::css(&s))
    }
}
