use std::path::PathBuf;

use serde::Deserialize;

/// Optional on-disk configuration. Every field falls back to the CLI default.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub listen: Option<String>,
    pub base_dir: Option<PathBuf>,
    pub asset_url: Option<String>,
    pub default_volume: Option<i64>,
    pub player: Option<PlayerConfig>,
    pub mixer: Option<MixerConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlayerConfig {
    pub program: Option<String>,
    pub gain: Option<u32>,
    pub repeat: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MixerConfig {
    pub program: Option<String>,
    pub control: Option<String>,
}
