//! Adapts the settings record to the emulator's [`SettingsProvider`].

use deskterminal_config::{AnsiPalette, Color, Settings, extract_palette};
use deskterminal_terminal::{SelectionStyle, SettingsProvider, TerminalFont};

/// Read-through view of the live settings.
///
/// Built fresh for every frame so edits made in the editor show up in the
/// emulator without restarting it.
#[derive(Debug, Clone, Copy)]
pub struct SettingsBridge<'a> {
    settings: &'a Settings,
}

impl<'a> SettingsBridge<'a> {
    pub fn new(settings: &'a Settings) -> Self {
        Self { settings }
    }
}

impl SettingsProvider for SettingsBridge<'_> {
    fn default_foreground(&self) -> Color {
        self.settings.foreground_color
    }

    fn default_background(&self) -> Color {
        self.settings.background_color
    }

    fn palette(&self) -> AnsiPalette {
        extract_palette(self.settings)
    }

    fn selection_style(&self) -> SelectionStyle {
        SelectionStyle {
            background: self.settings.selection_background,
            foreground: self.settings.selection_foreground,
        }
    }

    fn font(&self) -> TerminalFont {
        TerminalFont {
            family: self.settings.font_family.clone(),
            size: self.settings.font_size.max(1) as f32,
        }
    }
}
