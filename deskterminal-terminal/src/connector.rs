//! Byte-stream adapters between the emulator and a child process.

use crate::metrics::GridSize;
use anyhow::{Context, Result};
use portable_pty::MasterPty;
use std::io::{Read, Write};

/// What the emulator widget reads from and writes to.
///
/// Text crossing a connector is UTF-8.
pub trait TtyConnector: Send {
    /// Human-readable description, used in logs
    fn name(&self) -> &str;

    /// A blocking reader for the child's output, consumed by the widget's
    /// reader thread.
    fn take_reader(&mut self) -> Result<Box<dyn Read + Send>>;

    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    fn resize(&mut self, size: GridSize) -> Result<()>;
}

/// Connector over the master side of a pseudo-terminal
pub struct PtyConnector {
    name: String,
    master: Box<dyn MasterPty + Send>,
    writer: Box<dyn Write + Send>,
    reader: Option<Box<dyn Read + Send>>,
}

impl PtyConnector {
    pub fn new(name: impl Into<String>, master: Box<dyn MasterPty + Send>) -> Result<Self> {
        let reader = master
            .try_clone_reader()
            .context("Failed to clone PTY reader")?;
        let writer = master.take_writer().context("Failed to take PTY writer")?;
        Ok(Self {
            name: name.into(),
            master,
            writer,
            reader: Some(reader),
        })
    }
}

impl TtyConnector for PtyConnector {
    fn name(&self) -> &str {
        &self.name
    }

    fn take_reader(&mut self) -> Result<Box<dyn Read + Send>> {
        match self.reader.take() {
            Some(reader) => Ok(reader),
            None => self
                .master
                .try_clone_reader()
                .context("Failed to clone PTY reader"),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }
        self.writer
            .write_all(bytes)
            .and_then(|()| self.writer.flush())
            .with_context(|| format!("Failed to write to {}", self.name))
    }

    fn resize(&mut self, size: GridSize) -> Result<()> {
        log::debug!("Resizing {} to {}x{}", self.name, size.cols, size.rows);
        self.master
            .resize(size.pty_size())
            .with_context(|| format!("Failed to resize {}", self.name))
    }
}

impl std::fmt::Debug for PtyConnector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PtyConnector")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
