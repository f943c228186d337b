//! The emulator sees the live settings through the bridge.

use deskterminal::settings_bridge::SettingsBridge;
use deskterminal_config::{Color, Settings};
use deskterminal_terminal::SettingsProvider;

#[test]
fn colors_and_font_come_from_settings() {
    let mut settings = Settings::default();
    settings.foreground_color = Color::rgb(1, 2, 3);
    settings.background_color = Color::new(4, 5, 6, 7);
    settings.font_family = "Fira Code".to_string();
    settings.font_size = 17;

    let bridge = SettingsBridge::new(&settings);
    assert_eq!(bridge.default_foreground(), Color::rgb(1, 2, 3));
    assert_eq!(bridge.default_background(), Color::new(4, 5, 6, 7));
    let font = bridge.font();
    assert_eq!(font.family, "Fira Code");
    assert_eq!(font.size, 17.0);
}

#[test]
fn palette_is_normal_then_bright() {
    let mut settings = Settings::default();
    settings.red = Color::rgb(200, 0, 0);
    settings.bright_white = Color::rgb(250, 250, 250);

    let palette = SettingsBridge::new(&settings).palette();
    assert_eq!(palette.foreground(1), Some(Color::rgb(200, 0, 0)));
    assert_eq!(palette.background(1), Some(Color::rgb(200, 0, 0)));
    assert_eq!(palette.foreground(15), Some(Color::rgb(250, 250, 250)));
}

#[test]
fn selection_foreground_may_be_unset() {
    let mut settings = Settings::default();
    settings.selection_background = Color::new(0, 0, 0, 100);
    settings.selection_foreground = None;

    let style = SettingsBridge::new(&settings).selection_style();
    assert_eq!(style.background, Color::new(0, 0, 0, 100));
    assert_eq!(style.foreground, None);

    settings.selection_foreground = Some(Color::WHITE);
    let style = SettingsBridge::new(&settings).selection_style();
    assert_eq!(style.foreground, Some(Color::WHITE));
}

#[test]
fn edits_are_visible_on_the_next_bridge() {
    let mut settings = Settings::default();
    settings.font_size = 10;
    assert_eq!(SettingsBridge::new(&settings).font().size, 10.0);
    settings.font_size = 22;
    assert_eq!(SettingsBridge::new(&settings).font().size, 22.0);
}
