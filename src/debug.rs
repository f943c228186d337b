//! Logging backend for the `log` facade.
//!
//! All output goes to `deskterminal_debug.log` in the OS temp directory,
//! truncated at startup. This keeps log lines out of the PTY and works for
//! GUI builds without a console. The level defaults to `info`; `RUST_LOG`
//! (error|warn|info|debug|trace|off) overrides it and also mirrors every
//! line to stderr.

use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

/// Name of the log file inside the temp directory
pub const LOG_FILE_NAME: &str = "deskterminal_debug.log";

struct FileLogger {
    level: log::LevelFilter,
    file: Mutex<Option<File>>,
    mirror_to_stderr: bool,
}

impl log::Log for FileLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{}] [{:5}] [{}] {}\n",
            timestamp(),
            record.level(),
            record.target(),
            record.args()
        );
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.write_all(line.as_bytes());
        }
        if self.mirror_to_stderr {
            eprint!("{line}");
        }
    }

    fn flush(&self) {
        if let Some(file) = self.file.lock().as_mut() {
            let _ = file.flush();
        }
    }
}

static LOGGER: OnceLock<FileLogger> = OnceLock::new();

/// Location of the log file
pub fn log_path() -> PathBuf {
    std::env::temp_dir().join(LOG_FILE_NAME)
}

/// Parse a `RUST_LOG`-style level name
pub fn parse_level(value: &str) -> Option<log::LevelFilter> {
    match value.trim().to_ascii_lowercase().as_str() {
        "off" => Some(log::LevelFilter::Off),
        "error" => Some(log::LevelFilter::Error),
        "warn" => Some(log::LevelFilter::Warn),
        "info" => Some(log::LevelFilter::Info),
        "debug" => Some(log::LevelFilter::Debug),
        "trace" => Some(log::LevelFilter::Trace),
        _ => None,
    }
}

/// Install the logger. Later calls are ignored.
pub fn init_log_bridge() {
    let env_level = std::env::var("RUST_LOG").ok();
    let level = env_level
        .as_deref()
        .and_then(parse_level)
        .unwrap_or(log::LevelFilter::Info);

    let path = log_path();
    let mut file = OpenOptions::new()
        .write(true)
        .truncate(true)
        .create(true)
        .open(&path)
        .ok();
    if let Some(file) = file.as_mut() {
        let _ = writeln!(
            file,
            "{}\ndeskterminal session started at {} (level={level})\n{}",
            "=".repeat(80),
            timestamp(),
            "=".repeat(80)
        );
    }

    let logger = LOGGER.get_or_init(|| FileLogger {
        level,
        file: Mutex::new(file),
        mirror_to_stderr: env_level.is_some(),
    });
    if log::set_logger(logger).is_ok() {
        log::set_max_level(level);
    }
}

fn timestamp() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}
