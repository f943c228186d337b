//! System tray icon and its menu.
//!
//! Built on `tray-icon` and its re-exported `muda` menu types. Menu clicks
//! arrive on an arbitrary thread; [`forward_menu_events`] hands them to the
//! winit event loop, where [`TrayMenu::action_for`] maps them back to a
//! [`MenuAction`].

mod actions;

pub use actions::MenuAction;

use anyhow::{Context, Result};
use std::collections::HashMap;
use tray_icon::menu::{CheckMenuItem, Menu, MenuEvent, MenuId, MenuItem, PredefinedMenuItem};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

/// Edge length of the generated tray icon
const ICON_SIZE: u32 = 32;

/// Label of the entry that toggles between the two window states
pub fn edit_label(editing: bool) -> &'static str {
    if editing {
        "Save Configuration"
    } else {
        "Edit Configuration"
    }
}

/// The tray icon plus handles to the entries whose state changes
pub struct TrayMenu {
    _tray_icon: TrayIcon,
    edit_item: MenuItem,
    autostart_item: CheckMenuItem,
    /// Mapping from menu item IDs to actions
    action_map: HashMap<MenuId, MenuAction>,
}

impl TrayMenu {
    /// Create the tray icon with its menu.
    pub fn install(autostart_enabled: bool) -> Result<Self> {
        let menu = Menu::new();
        let mut action_map = HashMap::new();

        let edit_item = MenuItem::new(edit_label(false), true, None);
        action_map.insert(edit_item.id().clone(), MenuAction::EditConfiguration);
        menu.append(&edit_item).context("Failed to add Edit Configuration item")?;

        let settings_file = MenuItem::new("Edit Settings File", true, None);
        action_map.insert(settings_file.id().clone(), MenuAction::EditSettingsFile);
        menu.append(&settings_file)
            .context("Failed to add Edit Settings File item")?;

        let autostart_item = CheckMenuItem::new("Autostart", true, autostart_enabled, None);
        action_map.insert(autostart_item.id().clone(), MenuAction::ToggleAutostart);
        menu.append(&autostart_item)
            .context("Failed to add Autostart item")?;

        menu.append(&PredefinedMenuItem::separator())
            .context("Failed to add separator")?;

        let exit = MenuItem::new("Exit", true, None);
        action_map.insert(exit.id().clone(), MenuAction::Exit);
        menu.append(&exit).context("Failed to add Exit item")?;

        let tray_icon = TrayIconBuilder::new()
            .with_icon(tray_icon_image()?)
            .with_tooltip("Deskterminal")
            .with_menu(Box::new(menu))
            .build()
            .context("Failed to create tray icon")?;

        Ok(Self {
            _tray_icon: tray_icon,
            edit_item,
            autostart_item,
            action_map,
        })
    }

    pub fn action_for(&self, id: &MenuId) -> Option<MenuAction> {
        self.action_map.get(id).copied()
    }

    /// The single edit entry acts as Save while the editor is open.
    pub fn action_while(&self, id: &MenuId, editing: bool) -> Option<MenuAction> {
        match self.action_for(id)? {
            MenuAction::EditConfiguration if editing => Some(MenuAction::SaveConfiguration),
            action => Some(action),
        }
    }

    pub fn set_editing(&self, editing: bool) {
        self.edit_item.set_text(edit_label(editing));
    }

    pub fn set_autostart_checked(&self, enabled: bool) {
        self.autostart_item.set_checked(enabled);
    }
}

/// Route tray menu clicks through `send`, typically an event-loop proxy.
pub fn forward_menu_events(send: impl Fn(MenuId) + Send + Sync + 'static) {
    MenuEvent::set_event_handler(Some(move |event: MenuEvent| send(event.id)));
}

/// A small terminal glyph: `>_` on a dark square with a light border
fn tray_icon_image() -> Result<Icon> {
    let size = ICON_SIZE as i32;
    let mut rgba = Vec::with_capacity((ICON_SIZE * ICON_SIZE * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let border = x < 2 || y < 2 || x >= size - 2 || y >= size - 2;
            let chevron = (6..=14).contains(&x) && ((y - 16).abs() - (14 - x)).abs() <= 1;
            let underscore = (18..26).contains(&x) && (22..24).contains(&y);
            let pixel: [u8; 4] = if border {
                [200, 200, 200, 255]
            } else if chevron || underscore {
                [80, 220, 120, 255]
            } else {
                [24, 24, 24, 230]
            };
            rgba.extend_from_slice(&pixel);
        }
    }
    Icon::from_rgba(rgba, ICON_SIZE, ICON_SIZE).context("Failed to create tray icon image")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_entry_label_follows_state() {
        assert_eq!(edit_label(false), "Edit Configuration");
        assert_eq!(edit_label(true), "Save Configuration");
    }

    #[test]
    fn icon_image_is_valid() {
        assert!(tray_icon_image().is_ok());
    }
}
