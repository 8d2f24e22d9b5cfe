//! Configuration loading and resolution into [`Settings`].
mod loader;
mod settings;
pub mod types;


pub use loader::load_config;
pub use settings::{MixerSettings, PlayerSettings, Settings};

#[cfg(test)]
pub(crate) use loader::load_config_file;
