//! PTY session lifecycle: spawn, observe exit, respawn.
//!
//! The manager owns at most one live child. Each spawn gets a new
//! generation number; a dedicated waiter thread blocks on the child and
//! reports its exit through the sink supplied by the host, which is
//! expected to marshal the notification onto the UI thread.

use crate::connector::PtyConnector;
use crate::metrics::GridSize;
use crate::provider::PopupMenuProvider;
use crate::widget::TerminalWidget;
use portable_pty::{Child, ChildKiller, CommandBuilder, native_pty_system};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Errors produced while starting a child process
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("command line is empty")]
    EmptyCommand,

    #[error("failed to open a pseudo-terminal: {0}")]
    OpenPty(#[source] anyhow::Error),

    #[error("failed to spawn {program:?}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to attach to the pseudo-terminal: {0}")]
    Connector(#[source] anyhow::Error),

    #[error("failed to start the exit watcher: {0}")]
    Watch(#[source] std::io::Error),
}

/// Notification that a spawned child has terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildExit {
    /// Generation of the session the child belonged to
    pub generation: u64,
    pub exit_code: Option<u32>,
}

/// What to do once the shell is gone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitPolicy {
    /// Terminate the application with status 0
    ExitApplication,
    /// Clear the emulator and start a fresh shell
    Respawn,
}

impl ExitPolicy {
    pub fn from_exit_on_exit(exit_on_exit: bool) -> Self {
        if exit_on_exit {
            ExitPolicy::ExitApplication
        } else {
            ExitPolicy::Respawn
        }
    }
}

/// Everything needed to start one child
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRequest {
    pub argv: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub size: GridSize,
}

impl SpawnRequest {
    /// Build a request from a whitespace-separated command line.
    pub fn from_command_line(command: &str, cwd: Option<&Path>, size: GridSize) -> Self {
        Self {
            argv: split_command(command),
            cwd: cwd.map(Path::to_path_buf),
            size,
        }
    }
}

/// Split a command line on whitespace. No quoting is interpreted.
pub fn split_command(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_string).collect()
}

type ExitSink = Arc<dyn Fn(ChildExit) + Send + Sync>;

/// Owns the lifecycle of the shell child process
pub struct PtySessionManager {
    generation: u64,
    on_exit: ExitSink,
    live_pid: Option<u32>,
}

impl PtySessionManager {
    /// `on_exit` is called from the waiter thread when a child terminates.
    pub fn new(on_exit: impl Fn(ChildExit) + Send + Sync + 'static) -> Self {
        Self {
            generation: 0,
            on_exit: Arc::new(on_exit),
            live_pid: None,
        }
    }

    /// Generation of the most recently spawned child
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Whether `exit` refers to the child spawned last
    pub fn is_current(&self, exit: &ChildExit) -> bool {
        exit.generation == self.generation
    }

    pub fn live_pid(&self) -> Option<u32> {
        self.live_pid
    }

    /// Spawn `request` under a new pseudo-terminal and start watching it.
    pub fn spawn(&mut self, request: &SpawnRequest) -> Result<PtyConnector, SessionError> {
        let (program, args) = request.argv.split_first().ok_or(SessionError::EmptyCommand)?;

        log::info!(
            "Spawning {:?} with args {:?} at {}x{} in {:?}",
            program,
            args,
            request.size.cols,
            request.size.rows,
            request.cwd
        );

        let pair = native_pty_system()
            .openpty(request.size.pty_size())
            .map_err(SessionError::OpenPty)?;

        let mut command = CommandBuilder::new(program);
        command.args(args);
        if let Some(cwd) = &request.cwd {
            command.cwd(cwd);
        }
        #[cfg(unix)]
        {
            command.env("TERM", "xterm-256color");
            command.env("COLORTERM", "truecolor");
        }

        let child = pair
            .slave
            .spawn_command(command)
            .map_err(|source| SessionError::Spawn {
                program: program.clone(),
                source,
            })?;
        // The child holds its own handle; keeping ours open would prevent EOF
        drop(pair.slave);

        let connector =
            PtyConnector::new(program.clone(), pair.master).map_err(SessionError::Connector)?;

        // Only a watched child counts as live
        let generation = self.generation + 1;
        let pid = child.process_id();
        self.watch(child, generation, waiter_thread(generation))?;
        self.generation = generation;
        self.live_pid = pid;

        Ok(connector)
    }

    /// Spawn `command`; when that fails, log and try `fallback_command` once.
    pub fn spawn_with_fallback(
        &mut self,
        command: &str,
        fallback_command: &str,
        cwd: Option<&Path>,
        size: GridSize,
    ) -> Result<PtyConnector, SessionError> {
        match self.spawn(&SpawnRequest::from_command_line(command, cwd, size)) {
            Ok(connector) => Ok(connector),
            Err(e) => {
                log::error!("Shell {command:?} failed to start: {e}; trying {fallback_command:?}");
                self.spawn(&SpawnRequest::from_command_line(fallback_command, cwd, size))
            }
        }
    }

    /// Start a fresh shell in `widget`: reset → spawn (with fallback) →
    /// install → start. On error the widget is left reset and unstarted.
    pub fn respawn<M: PopupMenuProvider>(
        &mut self,
        widget: &mut TerminalWidget<M>,
        command: &str,
        fallback_command: &str,
        cwd: Option<&Path>,
    ) -> Result<(), SessionError> {
        widget.reset();
        let connector =
            self.spawn_with_fallback(command, fallback_command, cwd, widget.grid_size())?;
        widget.set_connector(Box::new(connector));
        widget.start().map_err(SessionError::Connector)?;
        log::info!("Shell restarted (generation {})", self.generation);
        Ok(())
    }

    /// Block on `child` in a thread built from `thread` and report its exit.
    /// If the thread cannot be started the child is killed, since nothing
    /// would ever observe it.
    fn watch(
        &self,
        mut child: Box<dyn Child + Send + Sync>,
        generation: u64,
        thread: std::thread::Builder,
    ) -> Result<(), SessionError> {
        let on_exit = Arc::clone(&self.on_exit);
        let mut killer = child.clone_killer();

        let spawned = thread.spawn(move || {
            let exit_code = match child.wait() {
                Ok(status) => Some(status.exit_code()),
                Err(e) => {
                    log::error!("Waiting for child failed: {e}");
                    None
                }
            };
            log::info!("Shell (generation {generation}) exited with {exit_code:?}");
            on_exit(ChildExit {
                generation,
                exit_code,
            });
        });

        match spawned {
            Ok(_) => Ok(()),
            Err(e) => {
                log::error!("Failed to start PTY waiter thread: {e}");
                if let Err(kill_err) = killer.kill() {
                    log::warn!("Failed to kill unwatched child: {kill_err}");
                }
                Err(SessionError::Watch(e))
            }
        }
    }
}

fn waiter_thread(generation: u64) -> std::thread::Builder {
    std::thread::Builder::new().name(format!("pty-waiter-{generation}"))
}

impl std::fmt::Debug for PtySessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PtySessionManager")
            .field("generation", &self.generation)
            .field("live_pid", &self.live_pid)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_on_any_whitespace() {
        assert_eq!(
            split_command("  powershell.exe   -NoLogo\t-NoExit "),
            vec!["powershell.exe", "-NoLogo", "-NoExit"]
        );
        assert!(split_command("   ").is_empty());
    }

    #[test]
    fn empty_command_is_rejected() {
        let mut manager = PtySessionManager::new(|_| {});
        let request = SpawnRequest::from_command_line("", None, GridSize::default());
        assert!(matches!(
            manager.spawn(&request),
            Err(SessionError::EmptyCommand)
        ));
        assert_eq!(manager.generation(), 0);
    }

    #[test]
    fn exit_policy_follows_setting() {
        assert_eq!(ExitPolicy::from_exit_on_exit(true), ExitPolicy::ExitApplication);
        assert_eq!(ExitPolicy::from_exit_on_exit(false), ExitPolicy::Respawn);
    }

    #[cfg(all(unix, target_pointer_width = "64"))]
    mod unwatched {
        use super::*;
        use portable_pty::ExitStatus;
        use std::sync::atomic::{AtomicBool, Ordering};

        #[derive(Debug, Clone)]
        struct FakeChild {
            killed: Arc<AtomicBool>,
        }

        impl ChildKiller for FakeChild {
            fn kill(&mut self) -> std::io::Result<()> {
                self.killed.store(true, Ordering::SeqCst);
                Ok(())
            }

            fn clone_killer(&self) -> Box<dyn ChildKiller + Send + Sync> {
                Box::new(self.clone())
            }
        }

        impl Child for FakeChild {
            fn try_wait(&mut self) -> std::io::Result<Option<ExitStatus>> {
                Ok(None)
            }

            fn wait(&mut self) -> std::io::Result<ExitStatus> {
                Ok(ExitStatus::with_exit_code(0))
            }

            fn process_id(&self) -> Option<u32> {
                None
            }
        }

        #[test]
        fn child_is_killed_when_it_cannot_be_watched() {
            let manager = PtySessionManager::new(|_| {});
            let killed = Arc::new(AtomicBool::new(false));
            let child = FakeChild {
                killed: Arc::clone(&killed),
            };

            // No thread gets a stack this large
            let thread = std::thread::Builder::new().stack_size(1 << 62);
            let result = manager.watch(Box::new(child), 1, thread);

            assert!(matches!(result, Err(SessionError::Watch(_))));
            assert!(killed.load(Ordering::SeqCst));
            assert_eq!(manager.generation(), 0);
        }

        #[test]
        fn watched_child_reports_its_exit() {
            let (tx, rx) = std::sync::mpsc::channel();
            let tx = parking_lot::Mutex::new(tx);
            let manager = PtySessionManager::new(move |exit| {
                let _ = tx.lock().send(exit);
            });
            let child = FakeChild {
                killed: Arc::new(AtomicBool::new(false)),
            };

            manager.watch(Box::new(child), 3, waiter_thread(3)).unwrap();
            let exit = rx.recv_timeout(std::time::Duration::from_secs(5)).unwrap();
            assert_eq!(
                exit,
                ChildExit {
                    generation: 3,
                    exit_code: Some(0)
                }
            );
        }
    }

    #[test]
    fn stale_exits_are_not_current() {
        let manager = PtySessionManager::new(|_| {});
        assert!(manager.is_current(&ChildExit {
            generation: 0,
            exit_code: Some(0)
        }));
        assert!(!manager.is_current(&ChildExit {
            generation: 7,
            exit_code: Some(0)
        }));
    }
}
