use clap::Parser;
use std::path::PathBuf;

use super::defaults::{
    DEFAULT_ASSET_URL, DEFAULT_LISTEN, DEFAULT_MIXER, DEFAULT_MIXER_CONTROL, DEFAULT_PLAYER,
    DEFAULT_PLAYER_GAIN, DEFAULT_REPEAT, DEFAULT_VOLUME,
};
use super::parsers::{parse_bool_env, parse_repeat, parse_volume_arg};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Small HTTP control panel that starts, stops and adjusts a looping ambient-noise player."
)]
pub struct ServerArgs {
    /// Address to listen on
    #[arg(long, env = "NOISE_LISTEN", default_value = DEFAULT_LISTEN)]
    pub listen: String,

    /// Directory holding the pid marker and cached audio (defaults to ~/noise)
    #[arg(long = "base-dir", env = "NOISE_BASE_DIR")]
    pub base_dir: Option<PathBuf>,

    /// Path to config file (TOML or JSON)
    #[arg(long, short)]
    pub config: Option<String>,

    /// Remote audio asset fetched on first start
    #[arg(long = "asset-url", env = "NOISE_ASSET_URL", default_value = DEFAULT_ASSET_URL)]
    pub asset_url: String,

    /// Volume applied after playback starts (0-100)
    #[arg(
        long = "default-volume",
        env = "NOISE_DEFAULT_VOLUME",
        default_value_t = DEFAULT_VOLUME,
        value_parser = parse_volume_arg
    )]
    pub default_volume: u8,

    /// Audio player command
    #[arg(long, env = "NOISE_PLAYER", default_value = DEFAULT_PLAYER)]
    pub player: String,

    /// Gain passed to the player (-v)
    #[arg(long = "player-gain", env = "NOISE_PLAYER_GAIN", default_value_t = DEFAULT_PLAYER_GAIN)]
    pub player_gain: u32,

    /// How many times the player loops the asset
    #[arg(
        long,
        env = "NOISE_REPEAT",
        default_value_t = DEFAULT_REPEAT,
        value_parser = parse_repeat
    )]
    pub repeat: u32,

    /// Mixer command used to read and set the volume
    #[arg(long, env = "NOISE_MIXER", default_value = DEFAULT_MIXER)]
    pub mixer: String,

    /// Mixer control name
    #[arg(long = "mixer-control", env = "NOISE_MIXER_CONTROL", default_value = DEFAULT_MIXER_CONTROL)]
    pub mixer_control: String,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}
