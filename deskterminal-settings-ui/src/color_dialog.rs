//! Color chooser window used by the color swatches.

use deskterminal_config::Color;
use egui::color_picker::{Alpha, color_picker_hsva_2d};
use egui::ecolor::Hsva;

/// How the user closed the dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    /// OK, or Clear on a nullable field (`None`)
    Accept(Option<Color>),
    Cancel,
}

/// An open color chooser for one field.
///
/// The selected color is kept unmultiplied; the picker's HSVA state only
/// replaces it once the user actually moves a slider, so accepting an
/// untouched dialog returns the initial color exactly, whatever its alpha.
#[derive(Debug, Clone)]
pub struct ColorDialog {
    field: &'static str,
    color: Color,
    picker: Hsva,
    nullable: bool,
}

impl ColorDialog {
    pub fn new(field: &'static str, initial: Option<Color>, nullable: bool) -> Self {
        let color = initial.unwrap_or(Color::WHITE);
        Self {
            field,
            color,
            picker: Hsva::from_srgba_unmultiplied(color.as_array()),
            nullable,
        }
    }

    /// Field this dialog edits
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Color currently selected in the picker
    pub fn color(&self) -> Color {
        self.color
    }

    /// Enter accepts, Escape cancels
    fn keyboard_outcome(&self, ctx: &egui::Context) -> Option<DialogOutcome> {
        ctx.input(|i| {
            if i.key_pressed(egui::Key::Enter) {
                Some(DialogOutcome::Accept(Some(self.color)))
            } else if i.key_pressed(egui::Key::Escape) {
                Some(DialogOutcome::Cancel)
            } else {
                None
            }
        })
    }

    /// Draw the dialog. Returns the outcome once a button was pressed.
    pub fn show(&mut self, ctx: &egui::Context) -> Option<DialogOutcome> {
        let mut outcome = self.keyboard_outcome(ctx);
        let mut open = true;

        egui::Window::new(format!("Choose {}", self.field))
            .id(egui::Id::new("deskterminal_color_dialog"))
            .collapsible(false)
            .resizable(false)
            .open(&mut open)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ctx, |ui| {
                if color_picker_hsva_2d(ui, &mut self.picker, Alpha::OnlyBlend) {
                    let [r, g, b, a] = self.picker.to_srgba_unmultiplied();
                    self.color = Color::new(r, g, b, a);
                }
                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui.button("OK").clicked() {
                        outcome = Some(DialogOutcome::Accept(Some(self.color())));
                    }
                    if ui.button("Cancel").clicked() {
                        outcome = Some(DialogOutcome::Cancel);
                    }
                    if self.nullable && ui.button("Clear").clicked() {
                        outcome = Some(DialogOutcome::Accept(None));
                    }
                });
            });

        if !open {
            outcome = Some(DialogOutcome::Cancel);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opaque_colors_survive_the_picker_representation() {
        let dialog = ColorDialog::new("red", Some(Color::rgb(128, 0, 0)), false);
        assert_eq!(dialog.color(), Color::rgb(128, 0, 0));
    }

    #[test]
    fn translucent_colors_are_returned_exactly() {
        for color in [
            Color::new(200, 100, 50, 1),
            Color::new(30, 30, 30, 10),
            Color::new(0, 0, 0, 1),
            Color::new(255, 255, 255, 0),
            Color::new(7, 180, 99, 128),
        ] {
            let dialog = ColorDialog::new("backgroundColor", Some(color), false);
            assert_eq!(dialog.color(), color);
        }
    }

    #[test]
    fn enter_accepts_the_untouched_color() {
        let ctx = egui::Context::default();
        let color = Color::new(200, 100, 50, 1);
        let mut dialog = ColorDialog::new("backgroundColor", Some(color), false);

        let mut outcome = None;
        let input = egui::RawInput {
            events: vec![egui::Event::Key {
                key: egui::Key::Enter,
                physical_key: None,
                pressed: true,
                repeat: false,
                modifiers: egui::Modifiers::NONE,
            }],
            ..Default::default()
        };
        let _ = ctx.run(input, |ctx| outcome = dialog.show(ctx));
        assert_eq!(outcome, Some(DialogOutcome::Accept(Some(color))));
    }

    #[test]
    fn unset_color_starts_white() {
        let dialog = ColorDialog::new("selectionForeground", None, true);
        assert_eq!(dialog.color(), Color::WHITE);
        assert_eq!(dialog.field(), "selectionForeground");
    }
}
