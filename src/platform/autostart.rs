//! Start-at-login shortcut.
//!
//! | Platform | Shortcut |
//! |---|---|
//! | Windows | `Deskterminal.lnk` in the per-user Startup folder |
//! | Linux | `deskterminal.desktop` in `$XDG_CONFIG_HOME/autostart` |
//! | others | unsupported, never enabled |
//!
//! Failures are only logged; callers re-query [`AutoStart::is_enabled`]
//! after [`AutoStart::toggle`].

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Executable the shortcut points at, looked up in the working directory
#[cfg(target_os = "windows")]
pub const EXECUTABLE_NAME: &str = "Deskterminal.exe";
#[cfg(not(target_os = "windows"))]
pub const EXECUTABLE_NAME: &str = "deskterminal";

#[cfg(target_os = "windows")]
const SHORTCUT_NAME: &str = "Deskterminal.lnk";
#[cfg(not(target_os = "windows"))]
const SHORTCUT_NAME: &str = "deskterminal.desktop";

/// Auto-start service over one shortcut path
#[derive(Debug, Clone)]
pub struct AutoStart {
    shortcut: Option<PathBuf>,
    executable: PathBuf,
}

impl AutoStart {
    /// `shortcut` is `None` on platforms without a startup folder.
    pub fn new(shortcut: Option<PathBuf>, executable: PathBuf) -> Self {
        Self {
            shortcut,
            executable,
        }
    }

    /// Shortcut in the current user's startup folder, targeting
    /// [`EXECUTABLE_NAME`] in the working directory
    pub fn for_current_user() -> Self {
        let executable = std::env::current_dir()
            .map(|dir| dir.join(EXECUTABLE_NAME))
            .unwrap_or_else(|_| PathBuf::from(EXECUTABLE_NAME));
        Self::new(default_shortcut_path(), executable)
    }

    pub fn shortcut_path(&self) -> Option<&Path> {
        self.shortcut.as_deref()
    }

    pub fn executable(&self) -> &Path {
        &self.executable
    }

    pub fn is_enabled(&self) -> bool {
        self.shortcut.as_deref().is_some_and(Path::exists)
    }

    /// Remove the shortcut if present, create it otherwise.
    ///
    /// Does nothing when the startup folder or the executable is missing.
    pub fn toggle(&self) {
        let Some(shortcut) = self.shortcut.as_deref() else {
            log::debug!("Auto-start is not supported on this platform");
            return;
        };

        if shortcut.exists() {
            match std::fs::remove_file(shortcut) {
                Ok(()) => log::info!("Auto-start disabled: removed {}", shortcut.display()),
                Err(e) => log::debug!("Failed to remove {}: {e}", shortcut.display()),
            }
            return;
        }

        let folder_exists = shortcut.parent().is_some_and(Path::is_dir);
        if !folder_exists || !self.executable.is_file() {
            log::debug!(
                "Auto-start unavailable (startup folder present: {folder_exists}, executable {} present: {})",
                self.executable.display(),
                self.executable.is_file()
            );
            return;
        }

        match create_shortcut(&self.executable, shortcut) {
            Ok(()) => log::info!("Auto-start enabled: created {}", shortcut.display()),
            Err(e) => log::debug!("{e:#}"),
        }
    }
}

/// Shortcut location for the current user, if the platform has one
pub fn default_shortcut_path() -> Option<PathBuf> {
    startup_folder().map(|folder| folder.join(SHORTCUT_NAME))
}

#[cfg(target_os = "windows")]
fn startup_folder() -> Option<PathBuf> {
    dirs::home_dir().map(|home| {
        home.join("AppData")
            .join("Roaming")
            .join("Microsoft")
            .join("Windows")
            .join("Start Menu")
            .join("Programs")
            .join("Startup")
    })
}

#[cfg(target_os = "linux")]
fn startup_folder() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join("autostart"))
}

#[cfg(not(any(target_os = "windows", target_os = "linux")))]
fn startup_folder() -> Option<PathBuf> {
    None
}

#[cfg(target_os = "windows")]
fn create_shortcut(target: &Path, shortcut: &Path) -> Result<()> {
    let link = mslnk::ShellLink::new(target)
        .with_context(|| format!("Failed to build shortcut to {}", target.display()))?;
    link.create_lnk(shortcut)
        .with_context(|| format!("Failed to write {}", shortcut.display()))
}

#[cfg(not(target_os = "windows"))]
fn create_shortcut(target: &Path, shortcut: &Path) -> Result<()> {
    let entry = format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name=Deskterminal\n\
         Exec=\"{}\"\n\
         X-GNOME-Autostart-enabled=true\n",
        target.display()
    );
    std::fs::write(shortcut, entry)
        .with_context(|| format!("Failed to write {}", shortcut.display()))
}
