use std::path::PathBuf;

pub(crate) const DEFAULT_LISTEN: &str = "0.0.0.0:8888";
pub(crate) const DEFAULT_ASSET_URL: &str =
    "https://soundproofinglife.com/wp-content/uploads/2023/06/ambiance_brook_calm-20028.mp3";
pub(crate) const DEFAULT_VOLUME: u8 = 50;
pub(crate) const DEFAULT_PLAYER: &str = "play";
pub(crate) const DEFAULT_PLAYER_GAIN: u32 = 10;
pub(crate) const DEFAULT_REPEAT: u32 = 600;
pub(crate) const DEFAULT_MIXER: &str = "amixer";
pub(crate) const DEFAULT_MIXER_CONTROL: &str = "PCM";

pub(crate) fn default_base_dir() -> PathBuf {
    if let Some(home) = user_home_dir() {
        return home.join("noise");
    }

    PathBuf::from("noise")
}

fn user_home_dir() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        if let Some(value) = std::env::var_os("USERPROFILE") {
            return Some(PathBuf::from(value));
        }
    }

    if let Some(value) = std::env::var_os("HOME") {
        return Some(PathBuf::from(value));
    }

    None
}
