//! Owns the window, the terminal and the shell, and routes every event.

use super::UserEvent;
use super::frame::{CLEAR_DECORATED, CLEAR_EMBEDDED, DeskFrame, FrameHost};
use super::terminal_hooks::{HiddenScrollbar, TerminalMenu, editor_menu_items};
use super::window_state::{FrameOps, FrameStyle, Geometry, TransitionError, WindowState};
use crate::menu::{MenuAction, TrayMenu, forward_menu_events};
use crate::platform::{AutoStart, desktop};
use crate::settings_bridge::SettingsBridge;
use anyhow::{Context, Result};
use deskterminal_config::{SettingsStore, fallback_command};
use deskterminal_terminal::{
    ChildExit, ContextMenu, ExitPolicy, GridSize, PtyConnector, PtySessionManager, SessionError,
    TerminalFonts, TerminalWidget, terminal_font_id,
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::runtime::Runtime;
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoopProxy};
use winit::window::WindowId;

type DeskTerminal = TerminalWidget<TerminalMenu>;

/// Application controller
pub struct Controller {
    store: SettingsStore,
    runtime: Arc<Runtime>,
    proxy: EventLoopProxy<UserEvent>,
    frame: Option<DeskFrame>,
    fonts: TerminalFonts,
    state: Option<WindowState<DeskTerminal>>,
    sessions: PtySessionManager,
    autostart: AutoStart,
    autostart_enabled: bool,
    tray: Option<TrayMenu>,
    editor_menu: ContextMenu,
    exit_code: i32,
    started: bool,
}

impl Controller {
    pub fn new(
        store: SettingsStore,
        runtime: Arc<Runtime>,
        proxy: EventLoopProxy<UserEvent>,
    ) -> Self {
        let exit_proxy = Mutex::new(proxy.clone());
        let sessions = PtySessionManager::new(move |exit| {
            let _ = exit_proxy.lock().send_event(UserEvent::ChildExited(exit));
        });
        let autostart = AutoStart::for_current_user();
        let autostart_enabled = autostart.is_enabled();

        Self {
            store,
            runtime,
            proxy,
            frame: None,
            fonts: TerminalFonts::new(),
            state: None,
            sessions,
            autostart,
            autostart_enabled,
            tray: None,
            editor_menu: ContextMenu::default(),
            exit_code: 0,
            started: false,
        }
    }

    pub fn exit_code(&self) -> i32 {
        self.exit_code
    }

    fn exit(&mut self, event_loop: &ActiveEventLoop, code: i32) {
        log::info!("Exiting with status {code}");
        self.exit_code = code;
        event_loop.exit();
    }

    /// Load settings → build frame → build emulator → spawn shell → embed →
    /// start emulator → tray.
    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let settings = self.store.get().clone();

        let mut frame = self
            .runtime
            .block_on(DeskFrame::new(
                event_loop,
                FrameStyle::Embedded,
                Geometry::from_settings(&settings),
            ))
            .context("Failed to create the desktop window")?;

        self.fonts.install(frame.egui_ctx(), &settings.font_family);
        let metrics = frame.measure(&terminal_font_id(settings.font_size as f32));
        let (width, height) = frame.inner_size_points();
        let size = GridSize::from_pixels(width, height, metrics);

        let wake_proxy = Mutex::new(self.proxy.clone());
        let mut terminal = TerminalWidget::new(
            size,
            &HiddenScrollbar,
            TerminalMenu {
                autostart_enabled: self.autostart_enabled,
            },
            move || {
                let _ = wake_proxy.lock().send_event(UserEvent::Wakeup);
            },
        );

        let connector = self
            .spawn_shell(size)
            .context("No shell could be started")?;

        desktop::unstyle(frame.window());
        desktop::send_to_bottom(frame.window());

        terminal.set_connector(Box::new(connector));
        terminal.start()?;
        terminal.request_focus();

        frame.request_redraw();
        self.frame = Some(frame);
        self.state = Some(WindowState::embedded(terminal));

        self.install_tray();
        Ok(())
    }

    fn spawn_shell(&mut self, size: GridSize) -> Result<PtyConnector, SessionError> {
        let settings = self.store.get();
        self.sessions.spawn_with_fallback(
            &settings.command,
            &fallback_command(),
            settings.initial_directory.as_deref(),
            size,
        )
    }

    fn install_tray(&mut self) {
        if cfg!(target_os = "linux") {
            log::info!("Tray icon is not available on this platform");
            return;
        }
        match TrayMenu::install(self.autostart_enabled) {
            Ok(tray) => {
                let menu_proxy = Mutex::new(self.proxy.clone());
                forward_menu_events(move |id| {
                    let _ = menu_proxy.lock().send_event(UserEvent::Menu(id));
                });
                self.tray = Some(tray);
            }
            Err(e) => log::warn!("Continuing without tray icon: {e:#}"),
        }
    }

    fn request_redraw(&self) {
        if let Some(frame) = &self.frame {
            frame.request_redraw();
        }
    }

    fn on_child_exit(&mut self, event_loop: &ActiveEventLoop, exit: ChildExit) {
        if !self.sessions.is_current(&exit) {
            log::debug!("Ignoring exit of replaced session {}", exit.generation);
            return;
        }

        match ExitPolicy::from_exit_on_exit(self.store.get().exit_on_exit) {
            ExitPolicy::ExitApplication => self.exit(event_loop, 0),
            ExitPolicy::Respawn => {
                if let Err(e) = self.respawn() {
                    log::error!("{e:#}");
                    self.exit(event_loop, 1);
                }
            }
        }
    }

    /// Fresh shell in the existing widget, on this thread.
    fn respawn(&mut self) -> Result<()> {
        let Some(state) = self.state.as_mut() else {
            return Ok(());
        };
        let settings = self.store.get();
        self.sessions
            .respawn(
                state.terminal_mut(),
                &settings.command,
                &fallback_command(),
                settings.initial_directory.as_deref(),
            )
            .context("No shell could be restarted")?;

        self.request_redraw();
        Ok(())
    }

    fn handle_action(&mut self, event_loop: &ActiveEventLoop, action: MenuAction) {
        log::debug!("Menu action {action:?}");
        match action {
            MenuAction::EditConfiguration => {
                self.transition(event_loop, |state, host, store| state.edit(host, store.get()));
            }
            MenuAction::SaveConfiguration => {
                self.transition(event_loop, |state, host, store| state.save(host, store));
            }
            MenuAction::CancelEdit => {
                self.transition(event_loop, |state, host, store| state.cancel(host, store));
            }
            MenuAction::ToggleAutostart => {
                self.autostart.toggle();
                self.autostart_enabled = self.autostart.is_enabled();
                if let Some(tray) = &self.tray {
                    tray.set_autostart_checked(self.autostart_enabled);
                }
                self.request_redraw();
            }
            MenuAction::EditSettingsFile => {
                if let Err(e) = open::that(self.store.path()) {
                    log::warn!("Failed to open {}: {e}", self.store.path().display());
                }
            }
            MenuAction::Exit => self.exit(event_loop, 0),
        }
    }

    fn transition(
        &mut self,
        event_loop: &ActiveEventLoop,
        step: impl FnOnce(
            WindowState<DeskTerminal>,
            &mut FrameHost<'_>,
            &mut SettingsStore,
        ) -> std::result::Result<WindowState<DeskTerminal>, TransitionError<DeskTerminal>>,
    ) {
        let Some(state) = self.state.take() else {
            return;
        };
        let mut host = FrameHost {
            event_loop,
            runtime: &self.runtime,
            frame: &mut self.frame,
            fonts: &mut self.fonts,
        };

        let mut next = match step(state, &mut host, &mut self.store) {
            Ok(next) => next,
            Err(TransitionError { state, source }) => {
                log::error!("Window transition failed: {source:#}");
                // Only fatal when not even the previous window comes back
                if let Err(e) = state.restore(&mut host, self.store.get()) {
                    log::error!("Failed to recreate the window: {e:#}");
                    self.exit(event_loop, 1);
                    return;
                }
                log::warn!("Staying in {:?} state", state.style());
                state
            }
        };

        self.editor_menu.close();
        if let Some(tray) = &self.tray {
            tray.set_editing(!next.is_embedded());
        }
        if next.is_embedded() {
            next.terminal_mut().request_focus();
        }
        self.state = Some(next);
        self.request_redraw();
    }

    /// Z-order trap: an embedded window never stays activated.
    fn on_focused(&mut self, event_loop: &ActiveEventLoop) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        let mut host = FrameHost {
            event_loop,
            runtime: &self.runtime,
            frame: &mut self.frame,
            fonts: &mut self.fonts,
        };
        if state.on_focused(&mut host) {
            state.terminal_mut().request_focus();
            self.request_redraw();
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(frame), Some(state)) = (self.frame.as_mut(), self.state.as_mut()) else {
            return;
        };

        // Picks up font edits made in the editor
        let family = self.store.get().font_family.clone();
        self.fonts.install(frame.egui_ctx(), &family);

        let clear = if state.is_embedded() {
            CLEAR_EMBEDDED
        } else {
            CLEAR_DECORATED
        };
        let autostart_enabled = self.autostart_enabled;
        let store = &mut self.store;
        let editor_menu = &mut self.editor_menu;
        let mut action = None;

        let rendered = frame.render(clear, |ctx| {
            egui::CentralPanel::default()
                .frame(egui::Frame::NONE)
                .show(ctx, |ui| match &mut *state {
                    WindowState::Embedded { terminal } => {
                        terminal.popup_provider_mut().autostart_enabled = autostart_enabled;
                        if let Some(chosen) = terminal.show(ui, &SettingsBridge::new(store.get())) {
                            action = Some(chosen);
                        }
                    }
                    WindowState::Decorated { editor, .. } => {
                        let edited = editor.show(ui, store.get_mut());
                        let panel = edited.response.interact(egui::Sense::click());
                        editor_menu.open_on_secondary_click(&panel);
                        if let Some(chosen) = editor_menu.show(
                            ctx,
                            egui::Id::new("deskterminal_editor_panel"),
                            |ui| editor_menu_items(ui, autostart_enabled),
                        ) {
                            action = Some(chosen);
                        }
                    }
                });
        });

        if let Err(e) = rendered {
            log::error!("{e:#}");
        }
        if let Some(action) = action {
            self.handle_action(event_loop, action);
        }
    }
}

impl ApplicationHandler<UserEvent> for Controller {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.started {
            return;
        }
        self.started = true;

        if let Err(e) = self.start(event_loop) {
            log::error!("Startup failed: {e:#}");
            self.exit(event_loop, 1);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(frame) = self.frame.as_mut() else {
            return;
        };
        if frame.window_id() != window_id {
            return;
        }
        let repaint = frame.handle_window_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                let embedded = self.state.as_ref().is_none_or(WindowState::is_embedded);
                if embedded {
                    self.exit(event_loop, 0);
                } else {
                    self.handle_action(event_loop, MenuAction::CancelEdit);
                }
            }
            WindowEvent::Focused(true) => self.on_focused(event_loop),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {
                if repaint {
                    self.request_redraw();
                }
            }
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: UserEvent) {
        match event {
            UserEvent::Wakeup => self.request_redraw(),
            UserEvent::ChildExited(exit) => self.on_child_exit(event_loop, exit),
            UserEvent::Menu(id) => {
                let editing = self.state.as_ref().is_some_and(|s| !s.is_embedded());
                let action = self.tray.as_ref().and_then(|t| t.action_while(&id, editing));
                if let Some(action) = action {
                    self.handle_action(event_loop, action);
                }
            }
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.frame = None;
        log::info!("Event loop exiting");
    }
}
