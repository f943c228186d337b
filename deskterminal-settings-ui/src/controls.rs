//! Per-kind editor controls.
//!
//! Every control edits exactly one schema field in place through its
//! [`FieldDescriptor`]. Values the descriptor rejects are dropped silently.

use deskterminal_config::{Color, FieldDescriptor, FieldKind, FieldValue, Settings};
use std::collections::HashMap;

/// Width of the int and text fields
pub const TEXT_FIELD_WIDTH: f32 = 160.0;

/// Diameter of a color swatch
pub const SWATCH_SIZE: f32 = 18.0;

/// Widget used for a field kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlKind {
    IntField,
    TextField,
    CheckBox,
    ColorSwatch,
    FolderPicker,
}

pub fn control_for(kind: FieldKind) -> ControlKind {
    match kind {
        FieldKind::Int => ControlKind::IntField,
        FieldKind::Text => ControlKind::TextField,
        FieldKind::Bool => ControlKind::CheckBox,
        FieldKind::Color => ControlKind::ColorSwatch,
        FieldKind::Path => ControlKind::FolderPicker,
    }
}

/// Commit the text of an int or text field. Returns whether the record
/// changed.
pub fn commit_text(field: &FieldDescriptor, settings: &mut Settings, text: &str) -> bool {
    let before = field.get(settings);
    field.set_from_str(settings, text) && field.get(settings) != before
}

/// Widget id of the text control editing `field`, stable across frames
/// and layouts so focus and drafts follow the field.
pub fn field_widget_id(field: &FieldDescriptor) -> egui::Id {
    egui::Id::new(("deskterminal_field", field.name))
}

/// Something a control asks its host to do after the frame
#[derive(Debug, Clone, Copy)]
pub enum ControlRequest {
    /// Open the color chooser for a field
    PickColor(&'static FieldDescriptor),
}

/// Single-line editor over a draft buffer. The draft follows the record
/// while unfocused; while focused it keeps exactly what was typed, so an
/// unparsable or trimmed keystroke does not snap back.
fn drafted_field(
    ui: &mut egui::Ui,
    field: &'static FieldDescriptor,
    settings: &mut Settings,
    drafts: &mut HashMap<&'static str, String>,
) -> bool {
    let current = field.get(settings).to_file_string().unwrap_or_default();
    let id = field_widget_id(field);
    let focused = ui.memory(|m| m.has_focus(id));

    let draft = drafts.entry(field.name).or_insert_with(|| current.clone());
    if !focused {
        // Pick up changes from reset() or a re-layout
        *draft = current;
    }

    let response = ui.add(
        egui::TextEdit::singleline(draft)
            .id(id)
            .desired_width(TEXT_FIELD_WIDTH),
    );
    response.changed() && commit_text(field, settings, draft)
}

/// Integer field. The record only changes when the draft parses and
/// passes the field constraint.
pub fn int_field(
    ui: &mut egui::Ui,
    field: &'static FieldDescriptor,
    settings: &mut Settings,
    drafts: &mut HashMap<&'static str, String>,
) -> bool {
    drafted_field(ui, field, settings, drafts)
}

/// Free text field, committed verbatim on each keystroke.
pub fn text_field(
    ui: &mut egui::Ui,
    field: &'static FieldDescriptor,
    settings: &mut Settings,
    drafts: &mut HashMap<&'static str, String>,
) -> bool {
    drafted_field(ui, field, settings, drafts)
}

pub fn check_box(ui: &mut egui::Ui, field: &'static FieldDescriptor, settings: &mut Settings) -> bool {
    let FieldValue::Bool(mut value) = field.get(settings) else {
        return false;
    };
    ui.checkbox(&mut value, "").changed() && field.set(settings, FieldValue::Bool(value))
}

/// Filled circle in the field's color. A click asks the host to open the
/// color chooser; the record is only changed when the chooser is accepted.
pub fn color_swatch(
    ui: &mut egui::Ui,
    field: &'static FieldDescriptor,
    settings: &Settings,
) -> Option<ControlRequest> {
    let color = match field.get(settings) {
        FieldValue::Color(c) => c,
        _ => None,
    };

    let (rect, response) =
        ui.allocate_exact_size(egui::vec2(SWATCH_SIZE, SWATCH_SIZE), egui::Sense::click());
    let painter = ui.painter();
    let center = rect.center();
    let radius = SWATCH_SIZE / 2.0 - 1.0;

    match color {
        Some(Color { r, g, b, a }) => {
            painter.circle_filled(center, radius, egui::Color32::from_rgba_unmultiplied(r, g, b, a));
        }
        None => {
            // Unset: diagonal strike through an empty circle
            let offset = radius * std::f32::consts::FRAC_1_SQRT_2;
            painter.line_segment(
                [center - egui::vec2(offset, -offset), center + egui::vec2(offset, -offset)],
                egui::Stroke::new(1.0, egui::Color32::GRAY),
            );
        }
    }
    painter.circle_stroke(center, radius, egui::Stroke::new(1.0, egui::Color32::GRAY));

    let response = response.on_hover_text(
        color.map_or_else(|| "unset".to_string(), |c| c.to_string()),
    );
    response.clicked().then_some(ControlRequest::PickColor(field))
}

/// Current path as a label plus a "…" button opening a directory chooser.
pub fn folder_picker(
    ui: &mut egui::Ui,
    field: &'static FieldDescriptor,
    settings: &mut Settings,
) -> bool {
    let current = match field.get(settings) {
        FieldValue::Path(p) => p,
        _ => None,
    };

    match &current {
        Some(path) => ui.label(path.display().to_string()),
        None => ui.weak("(not set)"),
    };

    if !ui.button("…").on_hover_text("Choose directory").clicked() {
        return false;
    }

    let mut dialog = rfd::FileDialog::new().set_title(format!("Select {}", field.name));
    if let Some(start) = current.clone().or_else(dirs::home_dir) {
        dialog = dialog.set_directory(start);
    }
    match dialog.pick_folder() {
        Some(folder) => {
            log::info!("{} set to {}", field.name, folder.display());
            field.set(settings, FieldValue::Path(Some(folder)))
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deskterminal_config::schema::field;

    #[test]
    fn every_kind_has_a_control() {
        assert_eq!(control_for(FieldKind::Int), ControlKind::IntField);
        assert_eq!(control_for(FieldKind::Text), ControlKind::TextField);
        assert_eq!(control_for(FieldKind::Bool), ControlKind::CheckBox);
        assert_eq!(control_for(FieldKind::Color), ControlKind::ColorSwatch);
        assert_eq!(control_for(FieldKind::Path), ControlKind::FolderPicker);
    }

    #[test]
    fn int_commit_parses_each_keystroke() {
        let width = field("width").unwrap();
        let mut settings = Settings::default();

        assert!(commit_text(width, &mut settings, "9"));
        assert_eq!(settings.width, 9);
        assert!(commit_text(width, &mut settings, "90"));
        assert_eq!(settings.width, 90);
    }

    #[test]
    fn int_parse_failures_leave_the_field() {
        let width = field("width").unwrap();
        let mut settings = Settings::default();

        assert!(!commit_text(width, &mut settings, "9a"));
        assert!(!commit_text(width, &mut settings, ""));
        assert!(!commit_text(width, &mut settings, "0"));
        assert_eq!(settings.width, Settings::default().width);
    }

    #[test]
    fn text_commit_accepts_anything() {
        let command = field("command").unwrap();
        let mut settings = Settings::default();
        assert!(commit_text(command, &mut settings, "bash -l"));
        assert_eq!(settings.command, "bash -l");
    }

    #[test]
    fn text_commit_keeps_a_trailing_space() {
        let command = field("command").unwrap();
        let mut settings = Settings::default();
        assert!(commit_text(command, &mut settings, "bash "));
        assert_eq!(settings.command, "bash ");
        assert!(commit_text(command, &mut settings, "bash -l"));
        assert_eq!(settings.command, "bash -l");
    }

    #[test]
    fn widget_ids_are_per_field() {
        let width = field("width").unwrap();
        let command = field("command").unwrap();
        assert_eq!(field_widget_id(width), field_widget_id(field("width").unwrap()));
        assert_ne!(field_widget_id(width), field_widget_id(command));
    }

    #[test]
    fn unchanged_value_is_not_a_change() {
        let x = field("x").unwrap();
        let mut settings = Settings::default();
        let same = settings.x.to_string();
        assert!(!commit_text(x, &mut settings, &same));
    }
}
