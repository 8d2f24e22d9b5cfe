use std::path::Path;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::PlayerSettings;
use crate::error::PlaybackError;

/// Fully resolved player invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl PlayerCommand {
    /// `<program> -v <gain> <asset> repeat <count>`, the SoX `play` syntax.
    #[must_use]
    pub fn for_asset(settings: &PlayerSettings, asset: &Path) -> Self {
        Self {
            program: settings.program.clone(),
            args: vec![
                "-v".to_owned(),
                settings.gain.to_string(),
                asset.to_string_lossy().into_owned(),
                "repeat".to_owned(),
                settings.repeat.to_string(),
            ],
        }
    }
}

/// OS process control, looked up by numeric id.
pub trait ProcessSupervisor: Send + Sync {
    /// Starts `command` detached from the request and returns its pid.
    ///
    /// # Errors
    ///
    /// Returns an error when the process cannot be spawned.
    fn spawn(&self, command: &PlayerCommand) -> Result<u32, PlaybackError>;

    /// Sends a termination signal.
    ///
    /// # Errors
    ///
    /// Returns [`PlaybackError::ProcessNotFound`] when `pid` does not resolve,
    /// or [`PlaybackError::Signal`] when delivery fails otherwise.
    fn signal(&self, pid: u32) -> Result<(), PlaybackError>;

    fn is_alive(&self, pid: u32) -> bool;
}

/// Real subprocesses. Must be used from inside a tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSupervisor;

impl ProcessSupervisor for OsSupervisor {
    fn spawn(&self, command: &PlayerCommand) -> Result<u32, PlaybackError> {
        let mut process = Command::new(&command.program);
        process
            .args(&command.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(false);
        #[cfg(unix)]
        process.process_group(0);

        let mut child = process.spawn().map_err(|err| PlaybackError::Spawn {
            program: command.program.clone(),
            source: err,
        })?;
        let pid = child.id().ok_or_else(|| PlaybackError::MissingPid {
            program: command.program.clone(),
        })?;

        // Reap the child so a stopped player does not linger as a zombie.
        tokio::spawn(async move {
            match child.wait().await {
                Ok(status) => debug!("Player {} exited with {}", pid, status),
                Err(err) => warn!("Failed to wait for player {}: {}", pid, err),
            }
        });
        Ok(pid)
    }

    #[cfg(unix)]
    fn signal(&self, pid: u32) -> Result<(), PlaybackError> {
        let raw = to_raw_pid(pid).ok_or(PlaybackError::ProcessNotFound { pid })?;
        // SAFETY: kill(2) takes plain integers and touches no memory we own.
        let result = unsafe { libc::kill(raw, libc::SIGTERM) };
        if result == 0 {
            return Ok(());
        }
        let err = std::io::Error::last_os_error();
        if err.raw_os_error() == Some(libc::ESRCH) {
            return Err(PlaybackError::ProcessNotFound { pid });
        }
        Err(PlaybackError::Signal { pid, source: err })
    }

    #[cfg(not(unix))]
    fn signal(&self, pid: u32) -> Result<(), PlaybackError> {
        Err(PlaybackError::Signal {
            pid,
            source: std::io::Error::from(std::io::ErrorKind::Unsupported),
        })
    }

    #[cfg(unix)]
    fn is_alive(&self, pid: u32) -> bool {
        let Some(raw) = to_raw_pid(pid) else {
            return false;
        };
        // SAFETY: signal 0 only checks that the pid exists; nothing is delivered.
        let result = unsafe { libc::kill(raw, 0) };
        result == 0 || std::io::Error::last_os_error().raw_os_error() == Some(libc::EPERM)
    }

    #[cfg(not(unix))]
    fn is_alive(&self, _pid: u32) -> bool {
        false
    }
}

/// Rejects 0 and values past `pid_t`, which `kill` would treat as process groups.
#[cfg(unix)]
fn to_raw_pid(pid: u32) -> Option<libc::pid_t> {
    libc::pid_t::try_from(pid).ok().filter(|raw| *raw > 0)
}
