/// 16-color ANSI palette assembled from the settings record
use crate::color::Color;
use crate::settings::Settings;

/// Number of entries in the normal + bright ANSI palette
pub const PALETTE_SIZE: usize = 16;

/// Indexable ANSI palette.
///
/// Entries 0..8 are the normal colors and 8..16 the bright ones, each in
/// the order black, red, green, yellow, blue, magenta, cyan, white.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnsiPalette {
    colors: [Color; PALETTE_SIZE],
}

impl AnsiPalette {
    pub fn new(colors: [Color; PALETTE_SIZE]) -> Self {
        Self { colors }
    }

    /// Color used when `index` is a foreground attribute
    pub fn foreground(&self, index: usize) -> Option<Color> {
        self.colors.get(index).copied()
    }

    /// Color used when `index` is a background attribute.
    ///
    /// Identical to [`AnsiPalette::foreground`]; the emulator decides on any
    /// brightness shift.
    pub fn background(&self, index: usize) -> Option<Color> {
        self.foreground(index)
    }

    pub fn colors(&self) -> &[Color; PALETTE_SIZE] {
        &self.colors
    }
}

/// Build the palette from the sixteen color fields of `settings`.
pub fn extract_palette(settings: &Settings) -> AnsiPalette {
    AnsiPalette::new([
        settings.black,
        settings.red,
        settings.green,
        settings.yellow,
        settings.blue,
        settings.magenta,
        settings.cyan,
        settings.white,
        settings.bright_black,
        settings.bright_red,
        settings.bright_green,
        settings.bright_yellow,
        settings.bright_blue,
        settings.bright_magenta,
        settings.bright_cyan,
        settings.bright_white,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_order() {
        let settings = Settings::default();
        let palette = extract_palette(&settings);
        assert_eq!(palette.foreground(0), Some(settings.black));
        assert_eq!(palette.foreground(1), Some(settings.red));
        assert_eq!(palette.foreground(7), Some(settings.white));
        assert_eq!(palette.foreground(8), Some(settings.bright_black));
        assert_eq!(palette.foreground(12), Some(Color::from_hex(0x4682b4)));
        assert_eq!(palette.foreground(15), Some(settings.bright_white));
        assert_eq!(palette.foreground(16), None);
    }

    #[test]
    fn foreground_and_background_agree() {
        let palette = extract_palette(&Settings::default());
        for i in 0..PALETTE_SIZE {
            assert_eq!(palette.foreground(i), palette.background(i));
        }
    }

    #[test]
    fn follows_live_edits() {
        let mut settings = Settings::default();
        settings.magenta = Color::new(1, 2, 3, 4);
        assert_eq!(
            extract_palette(&settings).foreground(5),
            Some(Color::new(1, 2, 3, 4))
        );
    }
}
