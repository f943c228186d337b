//! Settings file creation, load, store and reset against a real file system.

use deskterminal_config::{Color, SCHEMA, Settings, SettingsStore};
use std::fs;
use tempfile::TempDir;

#[test]
fn missing_file_is_created_with_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("deskterminal.ini");

    let store = SettingsStore::open(&path);
    assert_eq!(store.get(), &Settings::default());

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("width=600\n"));
    assert!(text.contains("height=800\n"));
    assert!(text.contains("foregroundColor=rgba(255,255,255,255)\n"));
    assert!(text.contains(&format!("command={}\n", Settings::default().command)));
    #[cfg(windows)]
    assert!(text.contains("command=powershell.exe\n"));
}

#[test]
fn creates_missing_parent_directories() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("deskterminal.ini");
    let _store = SettingsStore::open(&path);
    assert!(path.exists());
}

#[test]
fn tolerant_load_from_hand_edited_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("deskterminal.ini");
    fs::write(
        &path,
        "width=abc\nheight=500\nfoo=bar\nbackgroundColor=rgb(10,20,30)\n",
    )
    .unwrap();

    let store = SettingsStore::open(&path);
    let settings = store.get();
    assert_eq!(settings.width, 600);
    assert_eq!(settings.height, 500);
    assert_eq!(settings.background_color, Color::new(10, 20, 30, 255));
    assert_eq!(
        settings,
        &Settings {
            height: 500,
            background_color: Color::new(10, 20, 30, 255),
            ..Settings::default()
        }
    );

    // Loading must not rewrite a file that exists
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "width=abc\nheight=500\nfoo=bar\nbackgroundColor=rgb(10,20,30)\n"
    );
}

#[test]
fn store_then_open_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("deskterminal.ini");

    let mut store = SettingsStore::open(&path);
    {
        let s = store.get_mut();
        s.x = 100;
        s.y = 50;
        s.width = 800;
        s.height = 400;
        s.exit_on_exit = true;
        s.initial_directory = Some(dir.path().to_path_buf());
        s.selection_foreground = Some(Color::new(200, 100, 50, 25));
    }
    store.store().unwrap();

    let reopened = SettingsStore::open(&path);
    assert_eq!(reopened.get(), store.get());

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("x=100\ny=50\nwidth=800\nheight=400\n"));
    assert!(!dir.path().join("deskterminal.ini.tmp").exists());
}

#[test]
fn reset_discards_unsaved_edits() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("deskterminal.ini");

    let mut store = SettingsStore::open(&path);
    store.get_mut().font_size = 30;
    store.get_mut().command = "fish".to_string();
    store.reset();

    assert_eq!(store.get(), &Settings::default());
}

#[test]
fn reset_picks_up_external_edits() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("deskterminal.ini");

    let mut store = SettingsStore::open(&path);
    fs::write(&path, "fontSize=18\n").unwrap();
    store.reset();
    assert_eq!(store.get().font_size, 18);
}

#[test]
fn file_lists_keys_in_schema_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("deskterminal.ini");
    let _store = SettingsStore::open(&path);

    let text = fs::read_to_string(&path).unwrap();
    let keys: Vec<&str> = text
        .lines()
        .filter_map(|line| line.split_once('=').map(|(k, _)| k))
        .collect();
    let expected: Vec<&str> = SCHEMA
        .iter()
        .map(|f| f.name)
        .filter(|name| *name != "initialDirectory" && *name != "selectionForeground")
        .collect();
    assert_eq!(keys, expected);
}

#[test]
fn invalid_utf8_only_spoils_its_line() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("deskterminal.ini");
    fs::write(&path, b"height=500\ncommand=caf\xe9.exe\nfontSize=18\n").unwrap();

    let store = SettingsStore::open(&path);
    assert_eq!(store.get().height, 500);
    assert_eq!(store.get().font_size, 18);
    assert_eq!(store.get().command, "caf\u{fffd}.exe");
}
