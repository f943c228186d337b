//! File-backed owner of the live settings record.
//!
//! One `SettingsStore` exists per process. It is created at startup and
//! handed by reference to whatever needs to read or edit the settings.

use crate::error::SettingsError;
use crate::ini::{from_ini, to_ini};
use crate::settings::Settings;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the settings file inside the home directory
pub const SETTINGS_FILE_NAME: &str = "deskterminal.ini";

/// The live settings record and the file it is persisted to
#[derive(Debug)]
pub struct SettingsStore {
    path: PathBuf,
    current: Settings,
}

impl SettingsStore {
    /// `<home>/deskterminal.ini`
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        dirs::home_dir()
            .map(|home| home.join(SETTINGS_FILE_NAME))
            .ok_or(SettingsError::NoHomeDirectory)
    }

    /// Open the store at the default location.
    ///
    /// Falls back to a file in the working directory when no home directory
    /// can be found, so startup never fails on settings.
    pub fn open_default() -> Self {
        let path = Self::default_path().unwrap_or_else(|e| {
            log::error!("{e}; using ./{SETTINGS_FILE_NAME}");
            PathBuf::from(SETTINGS_FILE_NAME)
        });
        Self::open(path)
    }

    /// Load settings from `path`, or create it filled with defaults.
    ///
    /// I/O failures are logged and leave the defaults in place.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        log::info!("Settings path: {:?}", path);

        let mut store = Self {
            path,
            current: Settings::default(),
        };

        if store.path.exists() {
            store.current = store.read_from_disk();
        } else {
            log::info!(
                "Settings file not found, creating default at {:?}",
                store.path
            );
            if let Err(e) = store.store() {
                log::error!("Failed to write default settings: {e}");
            }
        }

        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current settings
    pub fn get(&self) -> &Settings {
        &self.current
    }

    /// Mutable access to the current settings for in-place edits.
    ///
    /// Changes stay in memory until [`SettingsStore::store`] is called.
    pub fn get_mut(&mut self) -> &mut Settings {
        &mut self.current
    }

    /// Persist the current settings, replacing the file contents.
    pub fn store(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SettingsError::io(parent, e))?;
        }

        let text = to_ini(&self.current);

        // Write to a sibling temp file then rename so a crash never leaves a
        // half-written settings file behind.
        let temp_path = self.path.with_extension("ini.tmp");
        fs::write(&temp_path, text).map_err(|e| SettingsError::io(&temp_path, e))?;
        fs::rename(&temp_path, &self.path).map_err(|e| SettingsError::io(&self.path, e))?;

        log::info!("Settings saved to {:?}", self.path);
        Ok(())
    }

    /// Discard in-memory edits by reloading from disk.
    pub fn reset(&mut self) {
        self.current = self.read_from_disk();
    }

    fn read_from_disk(&self) -> Settings {
        match fs::read(&self.path) {
            // Invalid UTF-8 only spoils the lines it appears on
            Ok(bytes) => from_ini(&String::from_utf8_lossy(&bytes)),
            Err(e) => {
                log::error!("{}", SettingsError::io(&self.path, e));
                Settings::default()
            }
        }
    }
}
