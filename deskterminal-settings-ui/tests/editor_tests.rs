//! Headless rendering of the settings editor.

use deskterminal_config::schema::field;
use deskterminal_config::{Color, SCHEMA, Settings};
use deskterminal_settings_ui::{ControlKind, SettingsEditor, control_for, field_widget_id};

fn run_frame(editor: &mut SettingsEditor, settings: &mut Settings) -> bool {
    draw(&egui::Context::default(), editor, settings, Vec::new())
}

/// One frame on a context that lives across calls, feeding `events`.
fn draw(
    ctx: &egui::Context,
    editor: &mut SettingsEditor,
    settings: &mut Settings,
    events: Vec<egui::Event>,
) -> bool {
    let mut changed = false;
    let input = egui::RawInput {
        events,
        ..Default::default()
    };
    let _ = ctx.run(input, |ctx| {
        egui::CentralPanel::default().show(ctx, |ui| {
            changed = editor.show(ui, settings).changed;
        });
    });
    changed
}

/// Render once, then focus the text control of `name`
fn focus_field(ctx: &egui::Context, editor: &mut SettingsEditor, settings: &mut Settings, name: &str) {
    draw(ctx, editor, settings, Vec::new());
    let id = field_widget_id(field(name).unwrap());
    ctx.memory_mut(|m| m.request_focus(id));
    draw(ctx, editor, settings, Vec::new());
}

fn typed(text: &str) -> Vec<egui::Event> {
    vec![egui::Event::Text(text.to_string())]
}

fn key(key: egui::Key) -> Vec<egui::Event> {
    vec![egui::Event::Key {
        key,
        physical_key: None,
        pressed: true,
        repeat: false,
        modifiers: egui::Modifiers::NONE,
    }]
}

#[test]
fn one_control_per_field() {
    let editor = SettingsEditor::new();
    let laid_out: Vec<_> = editor
        .rows()
        .iter()
        .flat_map(|row| row.iter().map(|f| f.name))
        .collect();
    let schema: Vec<_> = SCHEMA.iter().map(|f| f.name).collect();
    assert_eq!(laid_out, schema);
}

#[test]
fn colors_use_swatches() {
    let swatches = SCHEMA
        .iter()
        .filter(|f| control_for(f.kind) == ControlKind::ColorSwatch)
        .count();
    assert_eq!(swatches, 20);
}

#[test]
fn drawing_without_input_changes_nothing() {
    let mut editor = SettingsEditor::new();
    let mut settings = Settings::default();

    assert!(!run_frame(&mut editor, &mut settings));
    assert_eq!(settings, Settings::default());
    assert!(editor.color_dialog().is_none());
}

#[test]
fn subset_schema_is_supported() {
    let mut editor = SettingsEditor::with_fields(&SCHEMA[..5]);
    assert_eq!(editor.rows().len(), 1);

    let mut settings = Settings::default();
    assert!(!run_frame(&mut editor, &mut settings));
}

#[test]
fn typing_into_an_int_field_commits() {
    let ctx = egui::Context::default();
    let mut editor = SettingsEditor::new();
    let mut settings = Settings::default();
    focus_field(&ctx, &mut editor, &mut settings, "width");

    assert!(draw(&ctx, &mut editor, &mut settings, typed("1")));
    assert_eq!(settings.width, 6001);

    // Not a number: the record keeps its last good value
    assert!(!draw(&ctx, &mut editor, &mut settings, typed("x")));
    assert_eq!(settings.width, 6001);
}

#[test]
fn typing_a_space_into_a_text_field_sticks() {
    let ctx = egui::Context::default();
    let mut editor = SettingsEditor::new();
    let mut settings = Settings {
        command: "bash".into(),
        ..Settings::default()
    };
    focus_field(&ctx, &mut editor, &mut settings, "command");

    assert!(draw(&ctx, &mut editor, &mut settings, typed(" ")));
    assert_eq!(settings.command, "bash ");
    assert!(draw(&ctx, &mut editor, &mut settings, typed("-l")));
    assert_eq!(settings.command, "bash -l");
}

#[test]
fn accepting_an_untouched_color_keeps_it() {
    let ctx = egui::Context::default();
    let mut editor = SettingsEditor::new();
    let original = Color::new(200, 100, 50, 1);
    let mut settings = Settings {
        background_color: original,
        ..Settings::default()
    };

    editor.pick_color(field("backgroundColor").unwrap(), &settings);
    assert!(editor.color_dialog().is_some());
    draw(&ctx, &mut editor, &mut settings, Vec::new());

    draw(&ctx, &mut editor, &mut settings, key(egui::Key::Enter));
    assert!(editor.color_dialog().is_none());
    assert_eq!(settings.background_color, original);
}

#[test]
fn escape_closes_the_color_chooser() {
    let ctx = egui::Context::default();
    let mut editor = SettingsEditor::new();
    let mut settings = Settings::default();

    editor.pick_color(field("foregroundColor").unwrap(), &settings);
    assert!(!draw(&ctx, &mut editor, &mut settings, key(egui::Key::Escape)));
    assert!(editor.color_dialog().is_none());
    assert_eq!(settings, Settings::default());
}
