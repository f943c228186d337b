//! Startup shortcut creation and removal in a temporary startup folder.

use deskterminal::platform::AutoStart;
use std::path::PathBuf;
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    startup: PathBuf,
    executable: PathBuf,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let startup = dir.path().join("Startup");
    std::fs::create_dir(&startup).unwrap();
    let executable = dir.path().join("Deskterminal.exe");
    std::fs::write(&executable, b"binary").unwrap();
    Fixture {
        _dir: dir,
        startup,
        executable,
    }
}

#[cfg(any(target_os = "windows", target_os = "linux"))]
#[test]
fn toggle_creates_then_removes() {
    let f = fixture();
    let shortcut = f.startup.join("Deskterminal.lnk");
    let autostart = AutoStart::new(Some(shortcut.clone()), f.executable.clone());

    assert!(!autostart.is_enabled());
    autostart.toggle();
    assert!(autostart.is_enabled());
    assert!(shortcut.exists());

    autostart.toggle();
    assert!(!autostart.is_enabled());
    assert!(!shortcut.exists());
}

#[cfg(target_os = "linux")]
#[test]
fn desktop_entry_points_at_executable() {
    let f = fixture();
    let shortcut = f.startup.join("deskterminal.desktop");
    AutoStart::new(Some(shortcut.clone()), f.executable.clone()).toggle();

    let entry = std::fs::read_to_string(shortcut).unwrap();
    assert!(entry.starts_with("[Desktop Entry]"));
    assert!(entry.contains(&format!("Exec=\"{}\"", f.executable.display())));
}

#[test]
fn missing_executable_is_a_no_op() {
    let f = fixture();
    let shortcut = f.startup.join("Deskterminal.lnk");
    let autostart = AutoStart::new(Some(shortcut.clone()), f.startup.join("missing.exe"));

    autostart.toggle();
    assert!(!autostart.is_enabled());
    assert!(!shortcut.exists());
}

#[test]
fn missing_startup_folder_is_a_no_op() {
    let f = fixture();
    let shortcut = f.startup.join("nested").join("Deskterminal.lnk");
    let autostart = AutoStart::new(Some(shortcut.clone()), f.executable.clone());

    autostart.toggle();
    assert!(!autostart.is_enabled());
    assert!(!shortcut.exists());
}

#[test]
fn existing_shortcut_is_removed_without_executable() {
    let f = fixture();
    let shortcut = f.startup.join("Deskterminal.lnk");
    std::fs::write(&shortcut, b"stale").unwrap();
    let autostart = AutoStart::new(Some(shortcut.clone()), f.startup.join("missing.exe"));

    assert!(autostart.is_enabled());
    autostart.toggle();
    assert!(!shortcut.exists());
}
