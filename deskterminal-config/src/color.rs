//! sRGB color with alpha, as stored in the settings file.
//!
//! Colors serialize as `rgba(R,G,B,A)`. On input the parser also accepts
//! `rgb(R,G,B)` (opaque) and `#RRGGBB`.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static FUNCTIONAL_COLOR: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(
        r"^rgb(a?)\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*(\d{1,3})\s*)?\)$",
    )
    .ok()
});

/// A color with four 8-bit channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Build an opaque color from a `0xRRGGBB` literal
    pub const fn from_hex(rgb: u32) -> Self {
        Self::rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// Same color with the alpha channel replaced
    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    pub fn as_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parse one of `rgba(R,G,B,A)`, `rgb(R,G,B)` or `#RRGGBB`.
    ///
    /// Returns `None` for anything else, including out-of-range components
    /// and an `rgb(...)`/`rgba(...)` with the wrong number of components.
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();

        if let Some(hex) = text.strip_prefix('#') {
            if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return None;
            }
            return u32::from_str_radix(hex, 16).ok().map(Self::from_hex);
        }

        let re = FUNCTIONAL_COLOR.as_ref()?;
        let caps = re.captures(text)?;
        let channel = |i: usize| -> Option<u8> { caps.get(i)?.as_str().parse::<u8>().ok() };

        let has_alpha_suffix = !caps.get(1).map(|m| m.as_str()).unwrap_or_default().is_empty();
        let alpha = match (has_alpha_suffix, caps.get(5)) {
            (true, Some(_)) => channel(5)?,
            (false, None) => 255,
            _ => return None,
        };

        Some(Self::new(channel(2)?, channel(3)?, channel(4)?, alpha))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({},{},{},{})", self.r, self.g, self.b, self.a)
    }
}
