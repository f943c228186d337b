//! Right-click popup menu drawn as a foreground `egui::Area`.

/// Minimum width of the popup menu
const MENU_MIN_WIDTH: f32 = 180.0;
/// Height of a single menu entry
const MENU_ITEM_HEIGHT: f32 = 22.0;

/// Open/closed state of a popup menu anchored at the pointer
#[derive(Debug, Default)]
pub struct ContextMenu {
    pos: Option<egui::Pos2>,
    /// Frame the menu was opened on; the opening click is not "elsewhere"
    opened_frame: u64,
}

impl ContextMenu {
    /// Open the menu when `response` was right-clicked.
    pub fn open_on_secondary_click(&mut self, response: &egui::Response) {
        if response.secondary_clicked() {
            self.pos = response.interact_pointer_pos();
            self.opened_frame = response.ctx.cumulative_frame_nr();
        }
    }

    pub fn is_open(&self) -> bool {
        self.pos.is_some()
    }

    pub fn close(&mut self) {
        self.pos = None;
    }

    /// Draw the menu if open.
    ///
    /// `add_contents` returns `Some` when an entry was chosen, which also
    /// closes the menu. Escape or a click outside closes it without a result.
    pub fn show<R>(
        &mut self,
        ctx: &egui::Context,
        id: egui::Id,
        add_contents: impl FnOnce(&mut egui::Ui) -> Option<R>,
    ) -> Option<R> {
        let pos = self.pos?;

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.close();
            return None;
        }

        let area = egui::Area::new(id.with("context_menu"))
            .fixed_pos(pos)
            .constrain(true)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style())
                    .inner_margin(egui::Margin::symmetric(1, 4))
                    .show(ui, |ui| {
                        ui.set_min_width(MENU_MIN_WIDTH);
                        ui.style_mut().spacing.item_spacing = egui::vec2(0.0, 0.0);
                        add_contents(ui)
                    })
                    .inner
            });

        let chosen = area.inner;
        let dismissed = area.response.clicked_elsewhere()
            && ctx.cumulative_frame_nr() != self.opened_frame;
        if chosen.is_some() || dismissed {
            self.close();
        }
        chosen
    }
}

/// A full-width, frameless menu entry. Returns true when clicked.
pub fn menu_item(ui: &mut egui::Ui, label: &str) -> bool {
    menu_item_enabled(ui, label, true)
}

/// Like [`menu_item`], greyed out when `enabled` is false.
pub fn menu_item_enabled(ui: &mut egui::Ui, label: &str, enabled: bool) -> bool {
    ui.add_enabled(
        enabled,
        egui::Button::new(label)
            .frame(false)
            .fill(egui::Color32::TRANSPARENT)
            .min_size(egui::vec2(ui.available_width(), MENU_ITEM_HEIGHT)),
    )
    .clicked()
}

/// A menu entry with a check mark reflecting `checked`. Returns true when clicked.
pub fn menu_check_item(ui: &mut egui::Ui, label: &str, checked: bool) -> bool {
    let text = if checked {
        format!("✔ {label}")
    } else {
        format!("    {label}")
    };
    menu_item(ui, &text)
}

/// Separator with breathing room, as used between menu groups.
pub fn menu_separator(ui: &mut egui::Ui) {
    ui.add_space(4.0);
    ui.separator();
    ui.add_space(4.0);
}
