//! The emulator widget: an `alacritty_terminal` grid drawn with egui.
//!
//! Output from the connector is parsed on a background reader thread; all
//! painting, input and connector writes happen on the UI thread inside
//! [`TerminalWidget::show`].

use crate::connector::TtyConnector;
use crate::context_menu::{ContextMenu, menu_item, menu_item_enabled, menu_separator};
use crate::fonts::terminal_font_id;
use crate::input::{KeyModes, encode_key, paste_bytes};
use crate::metrics::{CellMetrics, GridSize};
use crate::provider::{PopupMenuProvider, ScrollbarFactory, ScrollbarStyle, SettingsProvider};
use crate::render::{ColorScheme, paint_content, to_color32};
use alacritty_terminal::event::{Event as TermEvent, EventListener};
use alacritty_terminal::grid::{Dimensions, Scroll};
use alacritty_terminal::index::{Column, Line, Point, Side};
use alacritty_terminal::selection::{Selection, SelectionType};
use alacritty_terminal::term::{Config as TermConfig, Term, TermMode};
use alacritty_terminal::vte::ansi::Processor;
use anyhow::{Context as _, Result};
use parking_lot::Mutex;
use std::io::{ErrorKind, Read};
use std::sync::Arc;
use std::sync::mpsc::{Receiver, Sender, channel};

/// Lines of scrollback kept by the emulator
const SCROLLBACK_LINES: usize = 10_000;

/// Bytes read from the connector per chunk
const READ_BUFFER_SIZE: usize = 4096;

/// Called from the reader thread whenever new output has been parsed
pub type Waker = Arc<dyn Fn() + Send + Sync>;

#[derive(Clone)]
struct EventProxy {
    sender: Sender<TermEvent>,
}

impl EventListener for EventProxy {
    fn send_event(&self, event: TermEvent) {
        let _ = self.sender.send(event);
    }
}

/// Parser state shared with the reader thread
struct Emulator {
    term: Term<EventProxy>,
    processor: Processor,
    /// Bumped whenever the connector or the buffer is replaced; a reader
    /// thread whose generation is stale stops feeding the emulator.
    generation: u64,
}

impl Emulator {
    fn new(size: GridSize, proxy: EventProxy) -> Self {
        Self {
            term: Term::new(term_config(), &size, proxy),
            processor: Processor::new(),
            generation: 0,
        }
    }

    fn rebuild(&mut self, size: GridSize, proxy: EventProxy) {
        self.term = Term::new(term_config(), &size, proxy);
        self.processor = Processor::new();
    }
}

fn term_config() -> TermConfig {
    TermConfig {
        scrolling_history: SCROLLBACK_LINES,
        ..TermConfig::default()
    }
}

/// Default entries of the right-click menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BuiltinAction {
    Copy,
    Paste,
    ClearBuffer,
}

enum MenuChoice<A> {
    Builtin(BuiltinAction),
    App(A),
}

/// Terminal emulator widget
pub struct TerminalWidget<M: PopupMenuProvider> {
    id: egui::Id,
    emulator: Arc<Mutex<Emulator>>,
    proxy: EventProxy,
    events: Receiver<TermEvent>,
    connector: Option<Box<dyn TtyConnector>>,
    size: GridSize,
    scrollbar: ScrollbarStyle,
    popup: M,
    menu: ContextMenu,
    waker: Waker,
    focus_requested: bool,
    started: bool,
    scroll_remainder: f32,
}

impl<M: PopupMenuProvider> TerminalWidget<M> {
    /// Create a widget with an empty buffer and no connector.
    ///
    /// `waker` is invoked from a background thread after new output arrives;
    /// the host should schedule a repaint from it.
    pub fn new(
        size: GridSize,
        scrollbar: &dyn ScrollbarFactory,
        popup: M,
        waker: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        let (sender, events) = channel();
        let proxy = EventProxy { sender };
        Self {
            id: egui::Id::new("deskterminal_terminal_widget"),
            emulator: Arc::new(Mutex::new(Emulator::new(size, proxy.clone()))),
            proxy,
            events,
            connector: None,
            size,
            scrollbar: scrollbar.create_scrollbar(),
            popup,
            menu: ContextMenu::default(),
            waker: Arc::new(waker),
            focus_requested: false,
            started: false,
            scroll_remainder: 0.0,
        }
    }

    pub fn grid_size(&self) -> GridSize {
        self.size
    }

    pub fn has_connector(&self) -> bool {
        self.connector.is_some()
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Name of the installed connector, if any
    pub fn connector_name(&self) -> Option<&str> {
        self.connector.as_deref().map(|c| c.name())
    }

    pub fn popup_provider_mut(&mut self) -> &mut M {
        &mut self.popup
    }

    /// Install `connector`. Output from the previous connector is no longer
    /// processed from this point on; call [`TerminalWidget::start`] to begin
    /// reading from the new one.
    pub fn set_connector(&mut self, connector: Box<dyn TtyConnector>) {
        self.emulator.lock().generation += 1;
        log::info!("Installing connector {}", connector.name());
        self.connector = Some(connector);
        self.started = false;
    }

    /// Start the reader thread for the installed connector.
    pub fn start(&mut self) -> Result<()> {
        let connector = self
            .connector
            .as_mut()
            .context("No connector installed")?;
        let mut reader = connector.take_reader()?;
        let name = connector.name().to_string();

        let emulator = Arc::clone(&self.emulator);
        let waker = Arc::clone(&self.waker);
        let generation = emulator.lock().generation;

        std::thread::Builder::new()
            .name(format!("pty-reader-{generation}"))
            .spawn(move || {
                let mut buf = [0u8; READ_BUFFER_SIZE];
                loop {
                    match reader.read(&mut buf) {
                        Ok(0) => break,
                        Ok(n) => {
                            let mut emu = emulator.lock();
                            if emu.generation != generation {
                                break;
                            }
                            let Emulator {
                                term, processor, ..
                            } = &mut *emu;
                            processor.advance(term, &buf[..n]);
                            drop(emu);
                            waker();
                        }
                        Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                        Err(e) => {
                            log::debug!("Reader for {name} stopped: {e}");
                            break;
                        }
                    }
                }
                log::debug!("Reader thread for {name} (generation {generation}) finished");
            })
            .context("Failed to start PTY reader thread")?;

        self.started = true;
        Ok(())
    }

    /// Discard the text buffer and scrollback.
    ///
    /// Also stops processing output of the installed connector, so a new
    /// connector must be installed and started afterwards.
    pub fn reset(&mut self) {
        let mut emu = self.emulator.lock();
        emu.generation += 1;
        emu.rebuild(self.size, self.proxy.clone());
        drop(emu);
        while self.events.try_recv().is_ok() {}
        self.started = false;
    }

    /// Clear the screen and scrollback while keeping the session attached,
    /// then ask the shell to redraw its prompt.
    pub fn clear_buffer(&mut self) {
        self.emulator
            .lock()
            .rebuild(self.size, self.proxy.clone());
        self.write(b"\x0c");
    }

    /// Give keyboard focus to the widget on its next frame.
    pub fn request_focus(&mut self) {
        self.focus_requested = true;
    }

    /// Resize the emulator grid and the connector's terminal.
    pub fn resize(&mut self, size: GridSize) {
        if size == self.size {
            return;
        }
        log::debug!("Terminal grid {}x{} -> {}x{}", self.size.cols, self.size.rows, size.cols, size.rows);
        self.size = size;
        self.emulator.lock().term.resize(size);
        if let Some(connector) = self.connector.as_mut() {
            if let Err(e) = connector.resize(size) {
                log::warn!("{e:#}");
            }
        }
    }

    /// Send bytes to the child process.
    pub fn write(&mut self, bytes: &[u8]) {
        let Some(connector) = self.connector.as_mut() else {
            return;
        };
        if let Err(e) = connector.write(bytes) {
            log::warn!("{e:#}");
        }
    }

    /// Paste text, honouring bracketed-paste mode.
    pub fn paste(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let bracketed = self
            .emulator
            .lock()
            .term
            .mode()
            .contains(TermMode::BRACKETED_PASTE);

        let mut bytes = Vec::with_capacity(text.len() + 12);
        if bracketed {
            bytes.extend_from_slice(b"\x1b[200~");
        }
        bytes.extend(paste_bytes(text));
        if bracketed {
            bytes.extend_from_slice(b"\x1b[201~");
        }
        self.write(&bytes);
    }

    pub fn selection_text(&self) -> Option<String> {
        self.emulator
            .lock()
            .term
            .selection_to_string()
            .filter(|s| !s.is_empty())
    }

    /// Copy the selection to the system clipboard. Returns false when
    /// nothing is selected.
    pub fn copy_selection(&mut self) -> bool {
        let Some(text) = self.selection_text() else {
            return false;
        };
        match arboard::Clipboard::new().and_then(|mut c| c.set_text(text)) {
            Ok(()) => {}
            Err(e) => log::warn!("Failed to copy to clipboard: {e}"),
        }
        self.emulator.lock().term.selection = None;
        true
    }

    fn paste_from_clipboard(&mut self) {
        match arboard::Clipboard::new().and_then(|mut c| c.get_text()) {
            Ok(text) => self.paste(&text),
            Err(e) => log::warn!("Failed to read clipboard: {e}"),
        }
    }

    /// Visible screen contents, one line per row with trailing blanks removed.
    pub fn screen_text(&self) -> String {
        let emu = self.emulator.lock();
        let grid = emu.term.grid();
        let mut lines = vec![String::new(); grid.screen_lines()];
        for indexed in grid.display_iter() {
            let row = indexed.point.line.0 + grid.display_offset() as i32;
            if let Some(line) = usize::try_from(row).ok().and_then(|r| lines.get_mut(r)) {
                line.push(indexed.cell.c);
            }
        }
        lines
            .iter()
            .map(|l| l.trim_end())
            .collect::<Vec<_>>()
            .join("\n")
            .trim_end()
            .to_string()
    }

    /// Draw the widget into the remaining space of `ui` and handle its input.
    ///
    /// Returns the application action chosen from the right-click menu.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        provider: &dyn SettingsProvider,
    ) -> Option<M::Action> {
        self.drain_terminal_events();

        let font = provider.font();
        let font_id = terminal_font_id(font.size);
        let metrics = CellMetrics::measure(ui.painter(), &font_id);
        let scheme = ColorScheme::from_provider(provider);

        let (rect, response) =
            ui.allocate_exact_size(ui.available_size(), egui::Sense::click_and_drag());
        self.resize(GridSize::from_pixels(rect.width(), rect.height(), metrics));

        if self.focus_requested || response.clicked() || response.drag_started() {
            response.request_focus();
            self.focus_requested = false;
        }
        if response.has_focus() {
            ui.memory_mut(|m| {
                m.set_focus_lock_filter(
                    response.id,
                    egui::EventFilter {
                        tab: true,
                        horizontal_arrows: true,
                        vertical_arrows: true,
                        escape: true,
                        ..Default::default()
                    },
                )
            });
            self.handle_keyboard(ui);
        }

        self.handle_mouse(ui, &response, rect, metrics);

        {
            let emu = self.emulator.lock();
            let painter = ui.painter_at(rect);
            paint_content(
                &painter,
                rect,
                emu.term.renderable_content(),
                &scheme,
                &font_id,
                metrics,
            );
            self.paint_scrollbar(&painter, rect, &emu.term);
        }

        self.menu.open_on_secondary_click(&response);
        let has_selection = self.selection_text().is_some();
        let popup = &mut self.popup;
        let choice = self.menu.show(ui.ctx(), self.id, |ui| {
            if menu_item_enabled(ui, "Copy", has_selection) {
                return Some(MenuChoice::Builtin(BuiltinAction::Copy));
            }
            if menu_item(ui, "Paste") {
                return Some(MenuChoice::Builtin(BuiltinAction::Paste));
            }
            if menu_item(ui, "Clear Buffer") {
                return Some(MenuChoice::Builtin(BuiltinAction::ClearBuffer));
            }
            menu_separator(ui);
            popup.menu_items(ui).map(MenuChoice::App)
        });

        match choice {
            Some(MenuChoice::Builtin(BuiltinAction::Copy)) => {
                self.copy_selection();
                None
            }
            Some(MenuChoice::Builtin(BuiltinAction::Paste)) => {
                self.paste_from_clipboard();
                None
            }
            Some(MenuChoice::Builtin(BuiltinAction::ClearBuffer)) => {
                self.clear_buffer();
                None
            }
            Some(MenuChoice::App(action)) => Some(action),
            None => None,
        }
    }

    /// Forward replies generated by the emulator (e.g. cursor position
    /// reports) back to the child.
    fn drain_terminal_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                TermEvent::PtyWrite(text) => self.write(text.as_bytes()),
                TermEvent::Bell => log::trace!("Terminal bell"),
                _ => {}
            }
        }
    }

    fn handle_keyboard(&mut self, ui: &egui::Ui) {
        let events = ui.input(|i| i.events.clone());
        if events.is_empty() {
            return;
        }
        let modes = KeyModes {
            app_cursor: self
                .emulator
                .lock()
                .term
                .mode()
                .contains(TermMode::APP_CURSOR),
        };

        let mut typed = false;
        for event in events {
            match event {
                egui::Event::Text(text) => {
                    self.write(text.as_bytes());
                    typed = true;
                }
                egui::Event::Key {
                    key,
                    pressed: true,
                    modifiers,
                    ..
                } => {
                    if let Some(bytes) = encode_key(key, modifiers, modes) {
                        self.write(&bytes);
                        typed = true;
                    }
                }
                egui::Event::Paste(text) => {
                    self.paste(&text);
                    typed = true;
                }
                // egui turns Ctrl+C / Ctrl+X into clipboard commands
                egui::Event::Copy => {
                    if !self.copy_selection() {
                        self.write(&[0x03]);
                        typed = true;
                    }
                }
                egui::Event::Cut => {
                    self.write(&[0x18]);
                    typed = true;
                }
                _ => {}
            }
        }

        if typed {
            self.emulator.lock().term.scroll_display(Scroll::Bottom);
        }
    }

    fn handle_mouse(
        &mut self,
        ui: &egui::Ui,
        response: &egui::Response,
        rect: egui::Rect,
        metrics: CellMetrics,
    ) {
        if response.hovered() {
            let delta = ui.input(|i| i.raw_scroll_delta.y);
            if delta != 0.0 {
                self.scroll_remainder += delta / metrics.line_height;
                let lines = self.scroll_remainder.trunc();
                self.scroll_remainder -= lines;
                if lines != 0.0 {
                    self.emulator
                        .lock()
                        .term
                        .scroll_display(Scroll::Delta(lines as i32));
                }
            }
        }

        let pointer = response.interact_pointer_pos();
        let primary = ui.input(|i| i.pointer.primary_down() || i.pointer.primary_released());

        if response.drag_started() && primary {
            if let Some(pos) = pointer {
                let mut emu = self.emulator.lock();
                let (point, side) = self.point_at(pos, rect, metrics, emu.term.grid().display_offset());
                emu.term.selection = Some(Selection::new(SelectionType::Simple, point, side));
            }
        } else if response.dragged() && primary {
            if let Some(pos) = pointer {
                let mut emu = self.emulator.lock();
                let (point, side) = self.point_at(pos, rect, metrics, emu.term.grid().display_offset());
                if let Some(selection) = emu.term.selection.as_mut() {
                    selection.update(point, side);
                }
            }
        } else if response.clicked() {
            self.emulator.lock().term.selection = None;
        }
    }

    /// Grid point and cell side under `pos`
    fn point_at(
        &self,
        pos: egui::Pos2,
        rect: egui::Rect,
        metrics: CellMetrics,
        display_offset: usize,
    ) -> (Point, Side) {
        let x = ((pos.x - rect.left()) / metrics.char_width).max(0.0);
        let y = ((pos.y - rect.top()) / metrics.line_height).max(0.0);

        let column = (x.floor() as usize).min(usize::from(self.size.cols).saturating_sub(1));
        let row = (y.floor() as usize).min(usize::from(self.size.rows).saturating_sub(1));
        let side = if x.fract() < 0.5 { Side::Left } else { Side::Right };

        (
            Point::new(Line(row as i32 - display_offset as i32), Column(column)),
            side,
        )
    }

    fn paint_scrollbar(&self, painter: &egui::Painter, rect: egui::Rect, term: &Term<EventProxy>) {
        let ScrollbarStyle::Thin { width } = self.scrollbar else {
            return;
        };
        let grid = term.grid();
        let history = grid.history_size();
        if history == 0 {
            return;
        }

        let screen = grid.screen_lines() as f32;
        let total = screen + history as f32;
        let thumb_height = (rect.height() * screen / total).max(width * 2.0);
        // display_offset counts lines scrolled up from the bottom
        let scrolled = grid.display_offset() as f32 / history as f32;
        let top = rect.top() + (rect.height() - thumb_height) * (1.0 - scrolled);

        let thumb = egui::Rect::from_min_size(
            egui::pos2(rect.right() - width, top),
            egui::vec2(width, thumb_height),
        );
        painter.rect_filled(
            thumb,
            width / 2.0,
            to_color32(deskterminal_config::Color::new(128, 128, 128, 160)),
        );
    }
}

impl<M: PopupMenuProvider> std::fmt::Debug for TerminalWidget<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalWidget")
            .field("size", &self.size)
            .field("connector", &self.connector_name())
            .field("started", &self.started)
            .finish_non_exhaustive()
    }
}
