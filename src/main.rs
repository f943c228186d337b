// Hide console window on Windows release builds
#![cfg_attr(all(windows, not(debug_assertions)), windows_subsystem = "windows")]

use deskterminal::app::App;
use std::sync::Arc;
use tokio::runtime::Runtime;

fn main() {
    deskterminal::debug::init_log_bridge();
    log::info!("Starting deskterminal");

    let code = match run() {
        Ok(code) => code,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("deskterminal: error: {e:#}");
            1
        }
    };
    log::logger().flush();
    std::process::exit(code);
}

fn run() -> anyhow::Result<i32> {
    // Drives GPU initialization
    let runtime = Arc::new(Runtime::new()?);

    let app = App::new(Arc::clone(&runtime));
    let result = app.run();

    log::info!("Event loop exited, shutting down runtime");
    if let Ok(rt) = Arc::try_unwrap(runtime) {
        rt.shutdown_timeout(std::time::Duration::from_secs(2));
    }

    result
}
