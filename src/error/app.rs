use thiserror::Error;

use super::{ConfigError, DownloadError, PlaybackError, ServerError, VolumeError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
    #[error("CLI error: {source}")]
    Clap {
        #[from]
        source: clap::Error,
    },
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),
    #[error("Download error: {0}")]
    Download(#[from] DownloadError),
    #[error("Volume error: {0}")]
    Volume(#[from] VolumeError),
    #[error("Server error: {0}")]
    Server(#[from] ServerError),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn config<E>(error: E) -> Self
    where
        E: Into<ConfigError>,
    {
        error.into().into()
    }

    pub fn playback<E>(error: E) -> Self
    where
        E: Into<PlaybackError>,
    {
        error.into().into()
    }

    pub fn server<E>(error: E) -> Self
    where
        E: Into<ServerError>,
    {
        error.into().into()
    }
}
