//! Settings model for the deskterminal desktop terminal.
//!
//! This crate provides:
//!
//! - [`Color`] and the 16-entry [`AnsiPalette`]
//! - The [`Settings`] record and its declarative [`schema`]
//! - The `key=value` file codec ([`ini`])
//! - [`SettingsStore`], the file-backed owner of the live record

pub mod color;
pub mod error;
pub mod ini;
pub mod palette;
pub mod schema;
pub mod settings;
pub mod store;

pub use color::Color;
pub use error::SettingsError;
pub use palette::{AnsiPalette, PALETTE_SIZE, extract_palette};
pub use schema::{Constraint, FieldDescriptor, FieldKind, FieldValue, SCHEMA};
pub use settings::{Settings, default_command, fallback_command};
pub use store::{SETTINGS_FILE_NAME, SettingsStore};
