//! Application entry point and event-loop plumbing.

mod controller;
pub mod frame;
pub mod terminal_hooks;
pub mod window_state;

pub use controller::Controller;

use anyhow::Result;
use deskterminal_config::SettingsStore;
use deskterminal_terminal::ChildExit;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tray_icon::menu::MenuId;
use winit::event_loop::{ControlFlow, EventLoop};

/// Notifications marshalled onto the UI thread from worker threads
#[derive(Debug, Clone)]
pub enum UserEvent {
    /// The emulator parsed new output
    Wakeup,
    /// A shell process terminated
    ChildExited(ChildExit),
    /// A tray menu entry was clicked
    Menu(MenuId),
}

/// Main application
pub struct App {
    store: SettingsStore,
    runtime: Arc<Runtime>,
}

impl App {
    /// Load settings and prepare the application.
    pub fn new(runtime: Arc<Runtime>) -> Self {
        Self {
            store: SettingsStore::open_default(),
            runtime,
        }
    }

    /// Run until the user exits or the shell policy ends the process.
    ///
    /// Returns the process exit code.
    pub fn run(self) -> Result<i32> {
        let event_loop = EventLoop::<UserEvent>::with_user_event().build()?;
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut controller = Controller::new(self.store, self.runtime, event_loop.create_proxy());
        event_loop.run_app(&mut controller)?;

        Ok(controller.exit_code())
    }
}
