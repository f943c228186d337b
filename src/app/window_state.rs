//! Embedded ↔ Decorated window state machine.
//!
//! ```text
//!          edit
//! Embedded ───► Decorated
//!          ◄───
//!          save / cancel
//! ```
//!
//! Transitions consume the state and return the next one, so no
//! intermediate state is ever observable. The emulator widget moves into
//! the `Decorated` state untouched and comes back out of it as the same
//! value. Window-system effects go through [`FrameOps`].
//!
//! A failed transition hands the prior state back inside a
//! [`TransitionError`]; [`WindowState::restore`] then shows its window
//! again.

use anyhow::Result;
use deskterminal_config::{Settings, SettingsStore};
use deskterminal_settings_ui::SettingsEditor;

/// Window geometry in physical pixels: the outer (frame) position and the
/// client-area size, the same measures a window is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Geometry {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Geometry {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            x: settings.x,
            y: settings.y,
            width: settings.width.max(1),
            height: settings.height.max(1),
        }
    }

    /// Geometry of a live window. Decorations are not part of the size, so
    /// a decorated window reports what an embedded one would be given.
    pub fn from_window(outer_position: (i32, i32), inner_size: (u32, u32)) -> Self {
        Self {
            x: outer_position.0,
            y: outer_position.1,
            width: i32::try_from(inner_size.0).unwrap_or(i32::MAX),
            height: i32::try_from(inner_size.1).unwrap_or(i32::MAX),
        }
    }

    pub fn apply_to(&self, settings: &mut Settings) {
        settings.x = self.x;
        settings.y = self.y;
        settings.width = self.width.max(1);
        settings.height = self.height.max(1);
    }
}

/// Chrome of a freshly shown window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameStyle {
    /// Undecorated and transparent, pinned to the desktop
    Embedded,
    /// Normal OS chrome, opaque
    Decorated,
}

impl FrameStyle {
    pub fn decorated(self) -> bool {
        self == FrameStyle::Decorated
    }

    pub fn transparent(self) -> bool {
        self == FrameStyle::Embedded
    }
}

/// Window-system operations driven by the state machine
pub trait FrameOps {
    /// Geometry of the current window, if one is shown
    fn geometry(&self) -> Option<Geometry>;

    /// Destroy the current window. Decoration and transparency can only be
    /// changed on a new window.
    fn dispose(&mut self);

    /// Create and show a window with `style` at `geometry`.
    fn show(&mut self, style: FrameStyle, geometry: Geometry) -> Result<()>;

    /// Pin the window to the desktop root. Returns false when embedding is
    /// unavailable.
    fn unstyle(&mut self) -> bool;

    fn send_to_bottom(&mut self);

    /// Undo [`FrameOps::unstyle`].
    fn restyle(&mut self);
}

/// A transition that could not complete. `state` is the state it started
/// from, with its terminal and editor intact.
pub struct TransitionError<T> {
    pub state: WindowState<T>,
    pub source: anyhow::Error,
}

impl<T> TransitionError<T> {
    fn new(state: WindowState<T>, source: anyhow::Error) -> Self {
        Self { state, source }
    }
}

impl<T> std::fmt::Debug for TransitionError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransitionError")
            .field("state", &self.state)
            .field("source", &self.source)
            .finish()
    }
}

impl<T> std::fmt::Display for TransitionError<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "transition from {:?} failed: {:#}", self.state.style(), self.source)
    }
}

/// Outcome of a state transition
pub type Transition<T> = std::result::Result<WindowState<T>, TransitionError<T>>;

/// What the window currently shows
pub enum WindowState<T> {
    /// The terminal, pinned to the desktop
    Embedded { terminal: T },
    /// The settings editor in a decorated window; the terminal waits
    Decorated {
        saved_terminal: T,
        editor: SettingsEditor,
    },
}

impl<T> WindowState<T> {
    pub fn embedded(terminal: T) -> Self {
        WindowState::Embedded { terminal }
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self, WindowState::Embedded { .. })
    }

    pub fn style(&self) -> FrameStyle {
        match self {
            WindowState::Embedded { .. } => FrameStyle::Embedded,
            WindowState::Decorated { .. } => FrameStyle::Decorated,
        }
    }

    /// The emulator widget, whether shown or saved
    pub fn terminal(&self) -> &T {
        match self {
            WindowState::Embedded { terminal } => terminal,
            WindowState::Decorated { saved_terminal, .. } => saved_terminal,
        }
    }

    pub fn terminal_mut(&mut self) -> &mut T {
        match self {
            WindowState::Embedded { terminal } => terminal,
            WindowState::Decorated { saved_terminal, .. } => saved_terminal,
        }
    }

    /// Embedded → Decorated. A no-op when already decorated.
    ///
    /// The decorated window opens where the embedded one was.
    pub fn edit(self, frame: &mut impl FrameOps, settings: &Settings) -> Transition<T> {
        let terminal = match self {
            WindowState::Embedded { terminal } => terminal,
            decorated => return Ok(decorated),
        };

        let geometry = frame
            .geometry()
            .unwrap_or_else(|| Geometry::from_settings(settings));
        frame.restyle();
        frame.dispose();
        if let Err(e) = frame.show(FrameStyle::Decorated, geometry) {
            return Err(TransitionError::new(WindowState::Embedded { terminal }, e));
        }

        log::info!("Editing configuration");
        Ok(WindowState::Decorated {
            saved_terminal: terminal,
            editor: SettingsEditor::new(),
        })
    }

    /// Decorated → Embedded, persisting the window geometry and every edit.
    pub fn save(self, frame: &mut impl FrameOps, store: &mut SettingsStore) -> Transition<T> {
        let (terminal, editor) = match self {
            WindowState::Decorated {
                saved_terminal,
                editor,
            } => (saved_terminal, editor),
            embedded => return Ok(embedded),
        };

        if let Some(geometry) = frame.geometry() {
            geometry.apply_to(store.get_mut());
        }
        if let Err(e) = store.store() {
            log::error!("Failed to save settings: {e}");
        }

        match Self::embed(frame, store.get()) {
            Ok(()) => Ok(WindowState::Embedded { terminal }),
            Err(e) => Err(TransitionError::new(
                WindowState::Decorated {
                    saved_terminal: terminal,
                    editor,
                },
                e,
            )),
        }
    }

    /// Decorated → Embedded, discarding edits by reloading from disk.
    pub fn cancel(self, frame: &mut impl FrameOps, store: &mut SettingsStore) -> Transition<T> {
        let (terminal, mut editor) = match self {
            WindowState::Decorated {
                saved_terminal,
                editor,
            } => (saved_terminal, editor),
            embedded => return Ok(embedded),
        };

        store.reset();
        editor.discard_pending();
        log::info!("Configuration edits discarded");

        match Self::embed(frame, store.get()) {
            Ok(()) => Ok(WindowState::Embedded { terminal }),
            Err(e) => Err(TransitionError::new(
                WindowState::Decorated {
                    saved_terminal: terminal,
                    editor,
                },
                e,
            )),
        }
    }

    fn embed(frame: &mut impl FrameOps, settings: &Settings) -> Result<()> {
        frame.dispose();
        frame.show(FrameStyle::Embedded, Geometry::from_settings(settings))?;
        frame.unstyle();
        frame.send_to_bottom();
        Ok(())
    }

    /// Show a window for this state again, e.g. after a failed transition
    /// left none. Uses the stored geometry.
    pub fn restore(&self, frame: &mut impl FrameOps, settings: &Settings) -> Result<()> {
        match self {
            WindowState::Embedded { .. } => Self::embed(frame, settings),
            WindowState::Decorated { .. } => {
                frame.dispose();
                frame.show(FrameStyle::Decorated, Geometry::from_settings(settings))
            }
        }
    }

    /// The window gained focus. While embedded it goes straight back to the
    /// bottom of the Z-order; returns true when the terminal should take
    /// keyboard focus.
    pub fn on_focused(&self, frame: &mut impl FrameOps) -> bool {
        if !self.is_embedded() {
            return false;
        }
        frame.send_to_bottom();
        true
    }
}

impl<T> std::fmt::Debug for WindowState<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("WindowState").field(&self.style()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn geometry_round_trips_through_settings() {
        let mut settings = Settings::default();
        let geometry = Geometry {
            x: -20,
            y: 40,
            width: 300,
            height: 200,
        };
        geometry.apply_to(&mut settings);
        assert_eq!(Geometry::from_settings(&settings), geometry);
    }

    #[test]
    fn geometry_never_writes_empty_sizes() {
        let mut settings = Settings::default();
        Geometry {
            x: 0,
            y: 0,
            width: 0,
            height: -5,
        }
        .apply_to(&mut settings);
        assert_eq!((settings.width, settings.height), (1, 1));
    }

    #[test]
    fn live_geometry_uses_the_client_size() {
        let geometry = Geometry::from_window((-8, 30), (600, 800));
        assert_eq!(
            geometry,
            Geometry {
                x: -8,
                y: 30,
                width: 600,
                height: 800
            }
        );
        assert_eq!(Geometry::from_window((0, 0), (u32::MAX, 1)).width, i32::MAX);
    }

    #[test]
    fn style_flags() {
        assert!(FrameStyle::Embedded.transparent());
        assert!(!FrameStyle::Embedded.decorated());
        assert!(FrameStyle::Decorated.decorated());
        assert!(!FrameStyle::Decorated.transparent());
    }
}
