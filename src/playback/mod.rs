//! Lifecycle of the single background player process.
//!
//! No process state is cached in memory: every call re-derives it from the
//! pid marker and the OS process table, so a restarted server picks up where
//! the previous one left off.
mod marker;
mod supervisor;

#[cfg(test)]
pub(crate) mod test_support;

use std::path::PathBuf;
use std::sync::Arc;

use reqwest::{Client, Url};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::config::Settings;
use crate::download::fetch_if_missing;
use crate::error::PlaybackError;
use crate::volume::{Volume, VolumeBackend};

use marker::PidMarker;
pub use supervisor::{OsSupervisor, PlayerCommand, ProcessSupervisor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackStatus {
    Stopped,
    Running { pid: u32 },
}

impl PlaybackStatus {
    #[must_use]
    pub const fn is_running(self) -> bool {
        matches!(self, Self::Running { .. })
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Running { .. } => "running",
            Self::Stopped => "not running",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    Started { pid: u32 },
    AlreadyRunning { pid: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopOutcome {
    Stopped { pid: u32 },
    NotRunning,
}

pub struct Playback {
    marker: PidMarker,
    asset_path: PathBuf,
    asset_url: Url,
    command: PlayerCommand,
    default_volume: Volume,
    client: Client,
    supervisor: Arc<dyn ProcessSupervisor>,
    volume: Arc<dyn VolumeBackend>,
    transitions: Mutex<()>,
}

impl Playback {
    #[must_use]
    pub fn new(
        settings: &Settings,
        client: Client,
        supervisor: Arc<dyn ProcessSupervisor>,
        volume: Arc<dyn VolumeBackend>,
    ) -> Self {
        let asset_path = settings.asset_path();
        Self {
            marker: PidMarker::new(settings.pid_file()),
            command: PlayerCommand::for_asset(&settings.player, &asset_path),
            asset_path,
            asset_url: settings.asset_url.clone(),
            default_volume: settings.default_volume,
            client,
            supervisor,
            volume,
            transitions: Mutex::new(()),
        }
    }

    /// Running only if the marker names a live process. A stale or unreadable
    /// marker is removed on the way out.
    pub async fn status(&self) -> PlaybackStatus {
        match self.marker.read().await {
            Ok(None) => PlaybackStatus::Stopped,
            Ok(Some(pid)) if self.supervisor.is_alive(pid) => PlaybackStatus::Running { pid },
            Ok(Some(pid)) => {
                info!("Process {} is gone; clearing stale marker", pid);
                self.clear_marker().await;
                PlaybackStatus::Stopped
            }
            Err(err @ PlaybackError::InvalidMarker { .. }) => {
                warn!("{}; clearing marker", err);
                self.clear_marker().await;
                PlaybackStatus::Stopped
            }
            Err(err) => {
                warn!("Failed to read process marker: {}", err);
                PlaybackStatus::Stopped
            }
        }
    }

    /// Fetches the asset if needed, spawns the player, records its pid and
    /// applies the default volume. A no-op while already running.
    ///
    /// # Errors
    ///
    /// Returns an error from whichever stage failed. If only the volume step
    /// fails the player keeps running and stays recorded.
    pub async fn start(&self) -> Result<StartOutcome, PlaybackError> {
        let _transition = self.transitions.lock().await;

        if let PlaybackStatus::Running { pid } = self.status().await {
            return Ok(StartOutcome::AlreadyRunning { pid });
        }

        fetch_if_missing(&self.client, &self.asset_path, &self.asset_url).await?;

        let pid = self.supervisor.spawn(&self.command)?;
        if let Err(err) = self.marker.write(pid).await {
            if let Err(signal_err) = self.supervisor.signal(pid) {
                warn!("Failed to stop unrecorded process {}: {}", pid, signal_err);
            }
            return Err(err);
        }
        info!("Started {} with PID {}", self.command.program, pid);

        self.volume.set(self.default_volume).await?;
        Ok(StartOutcome::Started { pid })
    }

    /// Signals the recorded process and removes the marker. A no-op when
    /// nothing is running.
    ///
    /// # Errors
    ///
    /// Returns an error when the process cannot be signalled or the marker
    /// cannot be removed. A pid that no longer resolves has its marker cleared
    /// before the error is returned.
    pub async fn stop(&self) -> Result<StopOutcome, PlaybackError> {
        let _transition = self.transitions.lock().await;

        let PlaybackStatus::Running { pid } = self.status().await else {
            return Ok(StopOutcome::NotRunning);
        };

        match self.supervisor.signal(pid) {
            Ok(()) => {}
            Err(err @ PlaybackError::ProcessNotFound { .. }) => {
                self.clear_marker().await;
                return Err(err);
            }
            Err(err) => return Err(err),
        }
        self.marker.remove().await?;
        info!("Stopped process {}", pid);
        Ok(StopOutcome::Stopped { pid })
    }

    /// Stops playback on the way out. Failures are logged, not returned.
    pub async fn shutdown(&self) {
        match self.stop().await {
            Ok(StopOutcome::Stopped { pid }) => info!("Stopped player {} during shutdown", pid),
            Ok(StopOutcome::NotRunning) => {}
            Err(err) => warn!("Failed to stop player during shutdown: {}", err),
        }
    }

    async fn clear_marker(&self) {
        if let Err(err) = self.marker.remove().await {
            warn!("Failed to remove {}: {}", self.marker.path().display(), err);
        }
    }
}
