//! deskterminal: a transparent terminal pinned to the desktop wallpaper.
//!
//! The window shows a live shell while embedded in the desktop, and
//! switches to a decorated settings editor on demand.

pub mod app;
pub mod debug;
pub mod menu;
pub mod platform;
pub mod settings_bridge;

pub use app::App;
