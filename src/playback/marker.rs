use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::PlaybackError;

/// On-disk record of the player's process id, the only persisted state.
#[derive(Debug, Clone)]
pub(crate) struct PidMarker {
    path: PathBuf,
}

impl PidMarker {
    pub(crate) const fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// `Ok(None)` when no marker exists.
    pub(crate) async fn read(&self) -> Result<Option<u32>, PlaybackError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(PlaybackError::ReadMarker {
                    path: self.path.clone(),
                    source: err,
                });
            }
        };
        content
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|pid| *pid > 0)
            .map(Some)
            .ok_or_else(|| PlaybackError::InvalidMarker {
                path: self.path.clone(),
                content,
            })
    }

    pub(crate) async fn write(&self, pid: u32) -> Result<(), PlaybackError> {
        tokio::fs::write(&self.path, pid.to_string())
            .await
            .map_err(|err| PlaybackError::WriteMarker {
                path: self.path.clone(),
                source: err,
            })
    }

    /// Removing an absent marker is not an error.
    pub(crate) async fn remove(&self) -> Result<(), PlaybackError> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(PlaybackError::RemoveMarker {
                path: self.path.clone(),
                source: err,
            }),
        }
    }
}
