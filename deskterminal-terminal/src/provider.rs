//! Capability traits the widget consumes from its host application.
//!
//! | Trait | Purpose |
//! |---|---|
//! | [`SettingsProvider`] | Colors, palette, selection style and font, queried every frame |
//! | [`ScrollbarFactory`] | Decides whether and how the scrollback bar is drawn |
//! | [`PopupMenuProvider`] | Appends application entries to the right-click menu |

use deskterminal_config::{AnsiPalette, Color};

/// How selected cells are painted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionStyle {
    pub background: Color,
    /// `None` lets the emulator use the cell's own background as the
    /// foreground of selected text
    pub foreground: Option<Color>,
}

/// Family name and point size of the terminal font
#[derive(Debug, Clone, PartialEq)]
pub struct TerminalFont {
    pub family: String,
    pub size: f32,
}

/// Source of everything visual the emulator needs from the host.
///
/// Implementations are queried on every frame, so they should read from the
/// live settings rather than caching.
pub trait SettingsProvider {
    fn default_foreground(&self) -> Color;
    fn default_background(&self) -> Color;
    fn palette(&self) -> AnsiPalette;
    fn selection_style(&self) -> SelectionStyle;
    fn font(&self) -> TerminalFont;
}

/// Appearance of the scrollback bar
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollbarStyle {
    Hidden,
    Thin { width: f32 },
}

/// Builds the scrollbar for a new widget
pub trait ScrollbarFactory {
    fn create_scrollbar(&self) -> ScrollbarStyle;
}

/// The emulator's own scrollbar: a thin bar on the right edge
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultScrollbar;

impl ScrollbarFactory for DefaultScrollbar {
    fn create_scrollbar(&self) -> ScrollbarStyle {
        ScrollbarStyle::Thin { width: 6.0 }
    }
}

/// Supplies application entries for the widget's right-click menu.
///
/// The widget draws its default entries (Copy, Paste, Clear Buffer) first,
/// then a separator, then whatever [`PopupMenuProvider::menu_items`] adds.
pub trait PopupMenuProvider {
    type Action;

    /// Draw the entries and return the chosen action, if any.
    ///
    /// Returning `Some` closes the menu.
    fn menu_items(&mut self, ui: &mut egui::Ui) -> Option<Self::Action>;
}

/// Provider with no application entries
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPopupEntries;

impl PopupMenuProvider for NoPopupEntries {
    type Action = ();

    fn menu_items(&mut self, _ui: &mut egui::Ui) -> Option<()> {
        None
    }
}
