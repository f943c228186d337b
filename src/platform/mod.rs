//! OS integration for deskterminal.
//!
//! Every function here has one cross-platform signature; the platform
//! branching lives inside the module. Platforms without a desktop root
//! window or a startup folder get no-ops that log at debug level.
//!
//! # Contents
//!
//! | Item | Description |
//! |---|---|
//! | [`desktop::unstyle`] | Reparent onto the desktop root and hide from the taskbar |
//! | [`desktop::send_to_bottom`] | Move to the bottom of the Z-order without activating |
//! | [`desktop::restyle`] | Undo [`desktop::unstyle`] |
//! | [`AutoStart`] | Startup-folder shortcut pointing at the installed executable |

pub mod autostart;
pub mod desktop;

pub use autostart::AutoStart;
