//! Customizations handed to the emulator widget and the editor panel.

use crate::menu::MenuAction;
use deskterminal_terminal::{
    PopupMenuProvider, ScrollbarFactory, ScrollbarStyle, menu_check_item, menu_item,
    menu_separator,
};

/// The terminal sits on the wallpaper; a scrollbar would only be noise
#[derive(Debug, Default, Clone, Copy)]
pub struct HiddenScrollbar;

impl ScrollbarFactory for HiddenScrollbar {
    fn create_scrollbar(&self) -> ScrollbarStyle {
        ScrollbarStyle::Hidden
    }
}

/// Application entries of the terminal's right-click menu
#[derive(Debug, Default)]
pub struct TerminalMenu {
    /// Refreshed by the controller whenever the shortcut may have changed
    pub autostart_enabled: bool,
}

impl PopupMenuProvider for TerminalMenu {
    type Action = MenuAction;

    fn menu_items(&mut self, ui: &mut egui::Ui) -> Option<MenuAction> {
        if menu_item(ui, "Edit Configuration") {
            return Some(MenuAction::EditConfiguration);
        }
        if menu_check_item(ui, "Autostart", self.autostart_enabled) {
            return Some(MenuAction::ToggleAutostart);
        }
        menu_separator(ui);
        if menu_item(ui, "Exit") {
            return Some(MenuAction::Exit);
        }
        None
    }
}

/// Entries of the editor panel's right-click menu
pub fn editor_menu_items(ui: &mut egui::Ui, autostart_enabled: bool) -> Option<MenuAction> {
    if menu_item(ui, "Save Configuration") {
        return Some(MenuAction::SaveConfiguration);
    }
    if menu_item(ui, "Cancel") {
        return Some(MenuAction::CancelEdit);
    }
    if menu_check_item(ui, "Autostart", autostart_enabled) {
        return Some(MenuAction::ToggleAutostart);
    }
    menu_separator(ui);
    if menu_item(ui, "Exit") {
        return Some(MenuAction::Exit);
    }
    None
}
