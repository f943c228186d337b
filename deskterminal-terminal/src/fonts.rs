//! Terminal font lookup and registration with egui.
//!
//! The configured family is resolved against the system font database and
//! registered under a dedicated egui family name, followed by egui's own
//! monospace fonts as fallback. The dedicated family always exists once
//! [`TerminalFonts::install`] has run, even when the configured font is not
//! installed on the system.

use fontdb::{Database, Family, Query};

/// egui family name the emulator draws with
pub const TERMINAL_FONT_FAMILY: &str = "deskterminal-terminal";

/// Key under which the resolved font bytes are stored in egui
const TERMINAL_FONT_DATA: &str = "deskterminal-terminal-primary";

pub fn terminal_font_family() -> egui::FontFamily {
    egui::FontFamily::Name(TERMINAL_FONT_FAMILY.into())
}

pub fn terminal_font_id(size: f32) -> egui::FontId {
    egui::FontId::new(size.max(1.0), terminal_font_family())
}

/// System font database plus the family currently registered with egui
pub struct TerminalFonts {
    db: Database,
    installed: Option<String>,
}

impl TerminalFonts {
    pub fn new() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        log::info!("Loaded {} system fonts", db.len());
        Self {
            db,
            installed: None,
        }
    }

    /// Family registered by the last [`TerminalFonts::install`]
    pub fn installed_family(&self) -> Option<&str> {
        self.installed.as_deref()
    }

    /// Raw font bytes and face index for `family`, if installed
    pub fn lookup(&self, family: &str) -> Option<(Vec<u8>, u32)> {
        let id = self.db.query(&Query {
            families: &[Family::Name(family)],
            ..Query::default()
        })?;
        self.db.with_face_data(id, |data, index| (data.to_vec(), index))
    }

    /// Forget the registration, e.g. after the egui context was replaced.
    pub fn invalidate(&mut self) {
        self.installed = None;
    }

    /// Register `family` with `ctx` unless it is already the active one.
    ///
    /// Must run before the egui pass that draws with it. Returns true when
    /// the font definitions changed.
    pub fn install(&mut self, ctx: &egui::Context, family: &str) -> bool {
        if self.installed.as_deref() == Some(family) {
            return false;
        }

        let mut fonts = egui::FontDefinitions::default();
        let mut chain = Vec::new();

        match self.lookup(family) {
            Some((bytes, index)) => {
                log::info!("Using terminal font {family:?}");
                let mut data = egui::FontData::from_owned(bytes);
                data.index = index;
                fonts
                    .font_data
                    .insert(TERMINAL_FONT_DATA.to_owned(), data.into());
                chain.push(TERMINAL_FONT_DATA.to_owned());
            }
            None => log::warn!("Font family {family:?} not found, using built-in monospace"),
        }

        chain.extend(
            fonts
                .families
                .get(&egui::FontFamily::Monospace)
                .cloned()
                .unwrap_or_default(),
        );
        fonts.families.insert(terminal_font_family(), chain);

        ctx.set_fonts(fonts);
        self.installed = Some(family.to_owned());
        true
    }
}

impl Default for TerminalFonts {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TerminalFonts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalFonts")
            .field("faces", &self.db.len())
            .field("installed", &self.installed)
            .finish()
    }
}
