use std::path::PathBuf;

use clap::ArgMatches;
use clap::parser::ValueSource;
use url::Url;

use crate::args::parsers::{ensure_repeat, ensure_volume};
use crate::args::{
    DEFAULT_LISTEN, DEFAULT_MIXER, DEFAULT_MIXER_CONTROL, DEFAULT_PLAYER, DEFAULT_PLAYER_GAIN,
    DEFAULT_REPEAT, DEFAULT_VOLUME, ServerArgs, default_base_dir,
};
use crate::error::{AppError, AppResult, ConfigError};
use crate::volume::Volume;

use super::types::{ConfigFile, MixerConfig, PlayerConfig};

/// File name of the marker holding the player's process id.
const PID_FILE_NAME: &str = "pid.txt";

/// Everything the server needs at runtime, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub listen: String,
    pub base_dir: PathBuf,
    pub asset_url: Url,
    pub asset_file_name: String,
    pub default_volume: Volume,
    pub player: PlayerSettings,
    pub mixer: MixerSettings,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSettings {
    pub program: String,
    pub gain: u32,
    pub repeat: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MixerSettings {
    pub program: String,
    pub control: String,
}

impl Default for PlayerSettings {
    fn default() -> Self {
        Self {
            program: DEFAULT_PLAYER.to_owned(),
            gain: DEFAULT_PLAYER_GAIN,
            repeat: DEFAULT_REPEAT,
        }
    }
}

impl Default for MixerSettings {
    fn default() -> Self {
        Self {
            program: DEFAULT_MIXER.to_owned(),
            control: DEFAULT_MIXER_CONTROL.to_owned(),
        }
    }
}

impl Settings {
    /// Builds settings rooted at `base_dir` with every other value at its default.
    ///
    /// # Errors
    ///
    /// Returns an error when `asset_url` is not a URL ending in a file name.
    pub fn new(base_dir: impl Into<PathBuf>, asset_url: &str) -> AppResult<Self> {
        let (asset_url, asset_file_name) = parse_asset_url(asset_url)?;
        Ok(Self {
            listen: DEFAULT_LISTEN.to_owned(),
            base_dir: base_dir.into(),
            asset_url,
            asset_file_name,
            default_volume: Volume::from_percent(DEFAULT_VOLUME),
            player: PlayerSettings::default(),
            mixer: MixerSettings::default(),
        })
    }

    /// Layers the config file under the CLI: a file value applies only when the
    /// matching flag was not given on the command line or through the environment.
    ///
    /// # Errors
    ///
    /// Returns an error when a resolved value is invalid.
    pub fn resolve(
        args: &ServerArgs,
        matches: &ArgMatches,
        file: Option<ConfigFile>,
    ) -> AppResult<Self> {
        let file = file.unwrap_or_default();
        let player_file = file.player.unwrap_or_default();
        let mixer_file = file.mixer.unwrap_or_default();

        let listen = pick(matches, "listen", &args.listen, file.listen);
        let base_dir = match (&args.base_dir, file.base_dir) {
            (Some(dir), _) => dir.clone(),
            (None, Some(dir)) => dir,
            (None, None) => default_base_dir(),
        };
        let asset_url = pick(matches, "asset_url", &args.asset_url, file.asset_url);

        let default_volume = match file.default_volume {
            Some(value) if !is_explicit(matches, "default_volume") => ensure_volume(value)?,
            Some(_) | None => args.default_volume,
        };

        let PlayerConfig {
            program: player_program,
            gain: player_gain,
            repeat: player_repeat,
        } = player_file;
        let repeat = match player_repeat {
            Some(value) if !is_explicit(matches, "repeat") => ensure_repeat(value)?,
            Some(_) | None => args.repeat,
        };
        let player = PlayerSettings {
            program: pick(matches, "player", &args.player, player_program),
            gain: pick(matches, "player_gain", &args.player_gain, player_gain),
            repeat,
        };

        let MixerConfig {
            program: mixer_program,
            control: mixer_control,
        } = mixer_file;
        let mixer = MixerSettings {
            program: pick(matches, "mixer", &args.mixer, mixer_program),
            control: pick(matches, "mixer_control", &args.mixer_control, mixer_control),
        };

        let mut settings = Self::new(base_dir, &asset_url)?;
        settings.listen = listen;
        settings.default_volume = Volume::from_percent(default_volume);
        settings.player = player;
        settings.mixer = mixer;
        Ok(settings)
    }

    #[must_use]
    pub fn pid_file(&self) -> PathBuf {
        self.base_dir.join(PID_FILE_NAME)
    }

    #[must_use]
    pub fn asset_path(&self) -> PathBuf {
        self.base_dir.join(&self.asset_file_name)
    }
}

fn parse_asset_url(raw: &str) -> AppResult<(Url, String)> {
    let url = Url::parse(raw).map_err(|err| {
        AppError::config(ConfigError::InvalidAssetUrl {
            url: raw.to_owned(),
            source: err,
        })
    })?;
    let file_name = url
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .filter(|segment| !segment.is_empty())
        .map(str::to_owned)
        .ok_or_else(|| {
            AppError::config(ConfigError::AssetUrlWithoutFileName {
                url: raw.to_owned(),
            })
        })?;
    Ok((url, file_name))
}

fn is_explicit(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn pick<T: Clone>(matches: &ArgMatches, name: &str, cli: &T, file: Option<T>) -> T {
    match file {
        Some(value) if !is_explicit(matches, name) => value,
        Some(_) | None => cli.clone(),
    }
}
