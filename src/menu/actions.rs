//! Actions reachable from the tray and the popup menus.

/// Something the user picked from a menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Switch to the decorated window with the settings editor
    EditConfiguration,
    /// Persist geometry and settings, then return to the desktop
    SaveConfiguration,
    /// Reload settings from disk and return to the desktop
    CancelEdit,
    /// Create or remove the startup shortcut
    ToggleAutostart,
    /// Open the settings file in the system's default editor
    EditSettingsFile,
    Exit,
}
