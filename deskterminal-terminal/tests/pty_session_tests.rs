//! Spawning real children under a pseudo-terminal.
//!
//! Sandboxes without PTY support make `openpty` fail; those runs skip the
//! assertions that need a live child.

#![cfg(unix)]

use deskterminal_terminal::{
    ChildExit, DefaultScrollbar, GridSize, NoPopupEntries, PtySessionManager, SessionError,
    SpawnRequest, TerminalWidget,
};
use std::sync::mpsc::channel;
use std::time::{Duration, Instant};

fn manager() -> (PtySessionManager, std::sync::mpsc::Receiver<ChildExit>) {
    let (tx, rx) = channel();
    let tx = parking_lot::Mutex::new(tx);
    let manager = PtySessionManager::new(move |exit| {
        let _ = tx.lock().send(exit);
    });
    (manager, rx)
}

#[test]
fn exit_is_reported_with_generation() {
    let (mut manager, exits) = manager();
    let request = SpawnRequest::from_command_line("/bin/sh -c true", None, GridSize::default());

    let Ok(_connector) = manager.spawn(&request) else {
        return;
    };
    assert_eq!(manager.generation(), 1);

    let exit = exits
        .recv_timeout(Duration::from_secs(10))
        .expect("child exit was not reported");
    assert_eq!(exit.generation, 1);
    assert_eq!(exit.exit_code, Some(0));
    assert!(manager.is_current(&exit));
}

#[test]
fn respawn_makes_previous_exit_stale() {
    let (mut manager, exits) = manager();
    let request = SpawnRequest::from_command_line("/bin/sh -c true", None, GridSize::default());

    let Ok(_first) = manager.spawn(&request) else {
        return;
    };
    let first_exit = exits.recv_timeout(Duration::from_secs(10)).unwrap();

    let _second = manager.spawn(&request).unwrap();
    assert!(!manager.is_current(&first_exit));
    let second_exit = exits.recv_timeout(Duration::from_secs(10)).unwrap();
    assert!(manager.is_current(&second_exit));
}

#[test]
fn missing_program_falls_back() {
    let (mut manager, _exits) = manager();
    let result = manager.spawn_with_fallback(
        "/definitely/not/a/shell",
        "/bin/sh -c true",
        None,
        GridSize::default(),
    );
    match result {
        Ok(connector) => {
            use deskterminal_terminal::TtyConnector;
            assert_eq!(connector.name(), "/bin/sh");
        }
        // No PTY available at all
        Err(SessionError::OpenPty(_)) => {}
        Err(e) => panic!("fallback was not used: {e}"),
    }
}

#[test]
fn child_output_appears_in_widget() {
    let (mut manager, _exits) = manager();
    let request = SpawnRequest::from_command_line(
        "/bin/echo deskterminal-ready",
        Some(std::env::temp_dir().as_path()),
        GridSize::new(40, 5),
    );
    let Ok(connector) = manager.spawn(&request) else {
        return;
    };

    let (wake_tx, wake_rx) = channel();
    let wake_tx = parking_lot::Mutex::new(wake_tx);
    let mut widget = TerminalWidget::new(GridSize::new(40, 5), &DefaultScrollbar, NoPopupEntries, move || {
        let _ = wake_tx.lock().send(());
    });
    widget.set_connector(Box::new(connector));
    widget.start().unwrap();

    for _ in 0..100 {
        if widget.screen_text().contains("deskterminal-ready") {
            return;
        }
        let _ = wake_rx.recv_timeout(Duration::from_millis(100));
    }
    panic!("output never appeared: {:?}", widget.screen_text());
}

#[test]
fn respawn_after_exit_starts_a_clean_shell() {
    let (mut manager, exits) = manager();
    let request = SpawnRequest {
        argv: vec!["/bin/sh".into(), "-c".into(), "echo hi".into()],
        cwd: None,
        size: GridSize::new(40, 5),
    };
    let Ok(connector) = manager.spawn(&request) else {
        return;
    };

    let (wake_tx, wake_rx) = channel();
    let wake_tx = parking_lot::Mutex::new(wake_tx);
    let mut widget = TerminalWidget::new(GridSize::new(40, 5), &DefaultScrollbar, NoPopupEntries, move || {
        let _ = wake_tx.lock().send(());
    });
    widget.set_connector(Box::new(connector));
    widget.start().unwrap();

    for _ in 0..100 {
        if widget.screen_text().contains("hi") {
            break;
        }
        let _ = wake_rx.recv_timeout(Duration::from_millis(100));
    }
    assert!(widget.screen_text().contains("hi"));
    let exit = exits.recv_timeout(Duration::from_secs(10)).unwrap();
    assert!(manager.is_current(&exit));

    let started = Instant::now();
    manager
        .respawn(&mut widget, "/bin/cat", "/bin/sh", None)
        .unwrap();

    assert!(started.elapsed() < Duration::from_secs(1));
    assert_eq!(widget.screen_text(), "");
    assert!(widget.is_started());
    assert_eq!(manager.generation(), 2);
    assert!(!manager.is_current(&exit));
    assert!(manager.live_pid().is_some());
}
