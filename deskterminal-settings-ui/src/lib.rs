//! Settings editor for deskterminal.
//!
//! [`SettingsEditor`] renders one labelled control per schema field and
//! edits the live [`Settings`] record in place. Saving to disk is left to
//! the caller.
//!
//! | Field kind | Control | Committed |
//! |---|---|---|
//! | int | text field | each keystroke that parses and passes the field constraint |
//! | text | text field | each keystroke, verbatim |
//! | bool | check box | on toggle |
//! | color | color swatch + chooser window | on OK (or Clear for nullable fields) |
//! | path | label + "…" directory chooser | when a directory is chosen |

pub mod color_dialog;
pub mod controls;
pub mod layout;

pub use color_dialog::{ColorDialog, DialogOutcome};
pub use controls::{ControlKind, control_for, field_widget_id};
pub use layout::group_rows;

use controls::ControlRequest;
use deskterminal_config::{FieldDescriptor, FieldValue, SCHEMA, Settings};
use std::collections::HashMap;

/// Width of the white border around the editor panel
pub const BORDER_WIDTH: f32 = 3.0;

/// Result of drawing the editor for one frame
pub struct EditorResponse {
    /// Whether any field of the record changed this frame
    pub changed: bool,
    /// Area of the whole panel, for attaching a context menu
    pub response: egui::Response,
}

/// Schema-driven editor state
pub struct SettingsEditor {
    fields: &'static [FieldDescriptor],
    drafts: HashMap<&'static str, String>,
    color_dialog: Option<ColorDialog>,
}

impl SettingsEditor {
    /// Editor over the full settings schema
    pub fn new() -> Self {
        Self::with_fields(SCHEMA)
    }

    pub fn with_fields(fields: &'static [FieldDescriptor]) -> Self {
        Self {
            fields,
            drafts: HashMap::new(),
            color_dialog: None,
        }
    }

    pub fn fields(&self) -> &'static [FieldDescriptor] {
        self.fields
    }

    /// Fields grouped the way they are laid out
    pub fn rows(&self) -> Vec<&'static [FieldDescriptor]> {
        group_rows(self.fields)
    }

    pub fn color_dialog(&self) -> Option<&ColorDialog> {
        self.color_dialog.as_ref()
    }

    /// Drop drafts and close the color chooser, e.g. after the record was
    /// reloaded from disk.
    pub fn discard_pending(&mut self) {
        self.drafts.clear();
        self.color_dialog = None;
    }

    /// Open the color chooser on the current value of `field`, replacing
    /// any chooser already open.
    pub fn pick_color(&mut self, field: &'static FieldDescriptor, settings: &Settings) {
        let current = match field.get(settings) {
            FieldValue::Color(c) => c,
            _ => None,
        };
        self.color_dialog = Some(ColorDialog::new(field.name, current, field.nullable));
    }

    /// Draw the editor into `ui`, filling the available space.
    pub fn show(&mut self, ui: &mut egui::Ui, settings: &mut Settings) -> EditorResponse {
        let mut changed = false;
        let mut request = None;

        let inner = egui::Frame::new()
            .stroke(egui::Stroke::new(BORDER_WIDTH, egui::Color32::WHITE))
            .inner_margin(egui::Margin::same(8))
            .show(ui, |ui| {
                ui.set_min_size(ui.available_size());
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for row in group_rows(self.fields) {
                            ui.horizontal_wrapped(|ui| {
                                for field in row {
                                    ui.label(field.name);
                                    match control_for(field.kind) {
                                        ControlKind::IntField => {
                                            changed |= controls::int_field(ui, field, settings, &mut self.drafts);
                                        }
                                        ControlKind::TextField => {
                                            changed |= controls::text_field(ui, field, settings, &mut self.drafts);
                                        }
                                        ControlKind::CheckBox => {
                                            changed |= controls::check_box(ui, field, settings);
                                        }
                                        ControlKind::ColorSwatch => {
                                            if let Some(r) = controls::color_swatch(ui, field, settings) {
                                                request = Some(r);
                                            }
                                        }
                                        ControlKind::FolderPicker => {
                                            changed |= controls::folder_picker(ui, field, settings);
                                        }
                                    }
                                    ui.add_space(12.0);
                                }
                            });
                            ui.add_space(6.0);
                        }
                    });
            });

        if let Some(ControlRequest::PickColor(field)) = request {
            self.pick_color(field, settings);
        }

        if let Some(dialog) = self.color_dialog.as_mut() {
            match dialog.show(ui.ctx()) {
                Some(DialogOutcome::Accept(color)) => {
                    if let Some(field) = self.fields.iter().find(|f| f.name == dialog.field()) {
                        changed |= field.set(settings, FieldValue::Color(color));
                    }
                    self.color_dialog = None;
                }
                Some(DialogOutcome::Cancel) => self.color_dialog = None,
                None => {}
            }
        }

        if changed {
            log::debug!("Settings edited");
        }

        EditorResponse {
            changed,
            response: inner.response,
        }
    }
}

impl Default for SettingsEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SettingsEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsEditor")
            .field("fields", &self.fields.len())
            .field("color_dialog", &self.color_dialog)
            .finish_non_exhaustive()
    }
}
