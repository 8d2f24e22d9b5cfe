//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;

#[cfg(test)]
mod test_support;

pub use cli::ServerArgs;

pub(crate) use defaults::{
    DEFAULT_LISTEN, DEFAULT_MIXER, DEFAULT_MIXER_CONTROL, DEFAULT_PLAYER, DEFAULT_PLAYER_GAIN,
    DEFAULT_REPEAT, DEFAULT_VOLUME, default_base_dir,
};
