//! Terminal emulator widget for deskterminal.
//!
//! Hosts an `alacritty_terminal` emulator inside an egui `Ui`, connected to a
//! shell running under a pseudo-terminal:
//!
//! - [`session::PtySessionManager`] spawns the shell and reports its exit
//! - [`connector::TtyConnector`] is the byte stream between emulator and child
//! - [`widget::TerminalWidget`] parses output, paints the grid and turns input
//!   into bytes
//! - [`provider`] holds the traits the host implements to supply colors, fonts
//!   and extra context-menu entries

pub mod connector;
pub mod context_menu;
pub mod fonts;
pub mod input;
pub mod metrics;
pub mod provider;
pub mod render;
pub mod session;
pub mod widget;

pub use connector::{PtyConnector, TtyConnector};
pub use context_menu::{ContextMenu, menu_check_item, menu_item, menu_item_enabled, menu_separator};
pub use fonts::{TerminalFonts, terminal_font_id};
pub use metrics::{CellMetrics, GridSize};
pub use provider::{
    DefaultScrollbar, NoPopupEntries, PopupMenuProvider, ScrollbarFactory, ScrollbarStyle,
    SelectionStyle, SettingsProvider, TerminalFont,
};
pub use session::{
    ChildExit, ExitPolicy, PtySessionManager, SessionError, SpawnRequest, split_command,
};
pub use widget::{TerminalWidget, Waker};
