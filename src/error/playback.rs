use std::path::PathBuf;
use thiserror::Error;

use super::{DownloadError, VolumeError};

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("failed to create base directory {path}: {source}")]
    CreateBaseDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read {path}: {source}")]
    ReadMarker {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{path} does not hold a process id: '{content}'")]
    InvalidMarker { path: PathBuf, content: String },
    #[error("failed to write {path}: {source}")]
    WriteMarker {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to remove {path}: {source}")]
    RemoveMarker {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("spawned {program} but the OS reported no process id")]
    MissingPid { program: String },
    #[error("process {pid} could not be found")]
    ProcessNotFound { pid: u32 },
    #[error("failed to signal process {pid}: {source}")]
    Signal {
        pid: u32,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Download(#[from] DownloadError),
    #[error("{0}")]
    Volume(#[from] VolumeError),
}
