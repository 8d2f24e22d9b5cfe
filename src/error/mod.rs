mod app;
mod config;
mod download;
mod playback;
mod server;
mod volume;

#[cfg(test)]
mod test_support;

pub use app::{AppError, AppResult};
pub use config::ConfigError;
pub use download::DownloadError;
pub use playback::PlaybackError;
pub use server::ServerError;
pub use volume::VolumeError;
