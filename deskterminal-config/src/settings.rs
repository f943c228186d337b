//! The settings record and its defaults.

use crate::color::Color;
use std::path::PathBuf;

/// Every user-facing setting of the desktop terminal.
///
/// Field order here is the order of [`crate::schema::SCHEMA`], which is
/// also the order lines appear in the settings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Window position in pixels
    pub x: i32,
    pub y: i32,
    /// Window size in pixels
    pub width: i32,
    pub height: i32,
    pub font_size: i32,

    /// Quit the application when the shell exits instead of respawning it
    pub exit_on_exit: bool,

    /// Shell command line, split on whitespace before spawning
    pub command: String,
    pub font_family: String,

    /// Working directory of the shell; inherits ours when unset
    pub initial_directory: Option<PathBuf>,

    pub background_color: Color,
    pub foreground_color: Color,
    pub selection_background: Color,
    /// Unset means the emulator inverts the cell colors for selected text
    pub selection_foreground: Option<Color>,

    pub black: Color,
    pub red: Color,
    pub green: Color,
    pub yellow: Color,
    pub blue: Color,
    pub magenta: Color,
    pub cyan: Color,
    pub white: Color,
    pub bright_black: Color,
    pub bright_red: Color,
    pub bright_green: Color,
    pub bright_yellow: Color,
    pub bright_blue: Color,
    pub bright_magenta: Color,
    pub bright_cyan: Color,
    pub bright_white: Color,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            x: 0,
            y: 0,
            width: 600,
            height: 800,
            font_size: 14,
            exit_on_exit: false,
            command: default_command(),
            font_family: "Consolas".to_string(),
            initial_directory: None,
            background_color: Color::new(0, 0, 0, 1),
            foreground_color: Color::from_hex(0xffffff),
            selection_background: Color::new(0, 0, 0, 100),
            selection_foreground: None,
            black: Color::from_hex(0x000000),
            red: Color::from_hex(0x800000),
            green: Color::from_hex(0x008000),
            yellow: Color::from_hex(0x808000),
            blue: Color::from_hex(0x000080),
            magenta: Color::from_hex(0x800080),
            cyan: Color::from_hex(0x008080),
            white: Color::from_hex(0xc0c0c0),
            bright_black: Color::from_hex(0x808080),
            bright_red: Color::from_hex(0xff0000),
            bright_green: Color::from_hex(0x00ff00),
            bright_yellow: Color::from_hex(0xffff00),
            bright_blue: Color::from_hex(0x4682b4),
            bright_magenta: Color::from_hex(0xff00ff),
            bright_cyan: Color::from_hex(0x00ffff),
            bright_white: Color::from_hex(0xffffff),
        }
    }
}

/// The interactive shell used when the settings file does not name one.
pub fn default_command() -> String {
    #[cfg(windows)]
    {
        "powershell.exe".to_string()
    }
    #[cfg(not(windows))]
    {
        std::env::var("SHELL")
            .ok()
            .filter(|shell| !shell.trim().is_empty())
            .unwrap_or_else(|| "/bin/sh".to_string())
    }
}

/// The shell tried once when the configured command cannot be launched.
pub fn fallback_command() -> String {
    #[cfg(windows)]
    {
        std::env::var("COMSPEC")
            .ok()
            .filter(|shell| !shell.trim().is_empty())
            .unwrap_or_else(|| "cmd.exe".to_string())
    }
    #[cfg(not(windows))]
    {
        "/bin/sh".to_string()
    }
}
