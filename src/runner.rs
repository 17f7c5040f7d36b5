//! Runtime invocation and supervision
//!
//! The engine runs as a child of the launcher with the launcher's standard
//! streams inherited as they are. Runtimes are tried in order; the next one is
//! only tried when the previous one could not be started at all. Once a
//! runtime has started, its exit code is the launcher's exit code, whatever
//! the engine reports.

use crate::error::LaunchError;
use std::ffi::OsString;
use std::io;
use std::process::{ExitStatus, Stdio};
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

/// Why a child run did not produce an exit code
#[derive(Debug)]
pub enum SpawnError {
    /// The runtime could not be started (missing binary, permissions, ...)
    Start(io::Error),
    /// The child started but waiting on it failed
    Wait(io::Error),
}

/// Starts one child process and waits for it
#[allow(async_fn_in_trait)]
pub trait Spawner {
    async fn run(&self, program: &str, args: &[OsString]) -> Result<i32, SpawnError>;
}

/// Spawns real processes with inherited stdio
#[derive(Debug, Clone)]
pub struct SystemSpawner {
    forward_signals: bool,
}

impl SystemSpawner {
    pub fn new(forward_signals: bool) -> Self {
        Self { forward_signals }
    }
}

impl Default for SystemSpawner {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Spawner for SystemSpawner {
    async fn run(&self, program: &str, args: &[OsString]) -> Result<i32, SpawnError> {
        // Listeners must exist before the child does
        let relay = if self.forward_signals {
            match SignalRelay::install() {
                Ok(relay) => Some(relay),
                Err(e) => {
                    warn!(error = %e, "Could not install signal handlers, signals will not be forwarded");
                    None
                }
            }
        } else {
            None
        };

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(SpawnError::Start)?;

        debug!(runtime = program, pid = child.id(), "Child process started");

        let status = match relay {
            Some(mut relay) => relay.wait(&mut child).await,
            None => child.wait().await,
        }
        .map_err(SpawnError::Wait)?;

        Ok(exit_code(status))
    }
}

/// Termination signals received by the launcher, relayed to its child
#[cfg(unix)]
struct SignalRelay {
    interrupt: tokio::signal::unix::Signal,
    terminate: tokio::signal::unix::Signal,
    hangup: tokio::signal::unix::Signal,
    quit: tokio::signal::unix::Signal,
}

#[cfg(unix)]
impl SignalRelay {
    fn install() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            terminate: signal(SignalKind::terminate())?,
            hangup: signal(SignalKind::hangup())?,
            quit: signal(SignalKind::quit())?,
        })
    }

    /// Wait for the child, relaying signals to it meanwhile
    async fn wait(&mut self, child: &mut Child) -> io::Result<ExitStatus> {
        let Some(pid) = child.id() else {
            return child.wait().await;
        };

        loop {
            let forwarded = tokio::select! {
                status = child.wait() => return status,
                _ = self.interrupt.recv() => libc::SIGINT,
                _ = self.terminate.recv() => libc::SIGTERM,
                _ = self.hangup.recv() => libc::SIGHUP,
                _ = self.quit.recv() => libc::SIGQUIT,
            };

            debug!(signal = forwarded, pid, "Forwarding signal to child");
            // SAFETY: kill(2) has no memory-safety preconditions; pid is our
            // child, which is not reaped until wait() above returns.
            let rc = unsafe { libc::kill(pid as libc::pid_t, forwarded) };
            if rc != 0 {
                warn!(signal = forwarded, pid, error = %io::Error::last_os_error(), "Failed to forward signal");
            }
        }
    }
}

/// Console interrupts reach the child directly; keep waiting for it
#[cfg(not(unix))]
struct SignalRelay;

#[cfg(not(unix))]
impl SignalRelay {
    fn install() -> io::Result<Self> {
        Ok(Self)
    }

    async fn wait(&mut self, child: &mut Child) -> io::Result<ExitStatus> {
        loop {
            tokio::select! {
                status = child.wait() => return status,
                res = tokio::signal::ctrl_c() => {
                    if res.is_err() {
                        return child.wait().await;
                    }
                    debug!("Interrupt received, waiting for child to exit");
                }
            }
        }
    }
}

/// Exit code to report for a finished child
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}

/// Ordered runtime fallback on top of a [`Spawner`]
#[derive(Debug, Clone)]
pub struct RuntimeRunner<S> {
    spawner: S,
    candidates: Vec<String>,
}

impl<S: Spawner> RuntimeRunner<S> {
    pub fn new(spawner: S, candidates: Vec<String>) -> Self {
        Self {
            spawner,
            candidates,
        }
    }

    pub fn spawner(&self) -> &S {
        &self.spawner
    }

    /// Run the engine with the first runtime that starts and return its exit code
    pub async fn run(&self, args: &[OsString]) -> Result<i32, LaunchError> {
        let mut last_error = None;

        for runtime in &self.candidates {
            match self.spawner.run(runtime, args).await {
                Ok(code) => {
                    info!(runtime = %runtime, exit_code = code, "Engine exited");
                    return Ok(code);
                }
                Err(SpawnError::Start(e)) => {
                    debug!(runtime = %runtime, error = %e, "Runtime failed to start, trying next candidate");
                    last_error = Some(e);
                }
                Err(SpawnError::Wait(e)) => {
                    return Err(LaunchError::Wait {
                        runtime: runtime.clone(),
                        source: e,
                    });
                }
            }
        }

        Err(LaunchError::RuntimeUnavailable {
            tried: self.candidates.clone(),
            source: last_error.unwrap_or_else(|| {
                io::Error::new(io::ErrorKind::NotFound, "no runtime candidates configured")
            }),
        })
    }
}
