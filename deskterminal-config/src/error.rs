//! Typed error variants for the deskterminal-config crate.

use std::path::PathBuf;

/// Errors that can occur when reading or writing the settings file.
///
/// Loading never surfaces these to the caller; they are logged and the
/// defaults are used instead. [`crate::SettingsStore::store`] returns them
/// so the caller can decide how loudly to complain.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// An I/O error occurred reading or writing the settings file.
    #[error("I/O error on settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The user's home directory could not be determined.
    #[error("could not determine the home directory")]
    NoHomeDirectory,
}

impl SettingsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SettingsError::Io {
            path: path.into(),
            source,
        }
    }
}
