use crate::error::{AppError, AppResult, ConfigError};

pub(super) fn parse_volume_arg(s: &str) -> AppResult<u8> {
    let value: i64 = s.trim().parse().map_err(|_parse| {
        AppError::config(ConfigError::InvalidNumber {
            field: "default volume",
            value: s.to_owned(),
        })
    })?;
    ensure_volume(value)
}

pub(crate) fn ensure_volume(value: i64) -> AppResult<u8> {
    u8::try_from(value)
        .ok()
        .filter(|level| *level <= 100)
        .ok_or_else(|| AppError::config(ConfigError::InvalidDefaultVolume { value }))
}

pub(super) fn parse_repeat(s: &str) -> AppResult<u32> {
    let value: u32 = s.trim().parse().map_err(|_parse| {
        AppError::config(ConfigError::InvalidNumber {
            field: "repeat",
            value: s.to_owned(),
        })
    })?;
    ensure_repeat(value)
}

pub(crate) fn ensure_repeat(value: u32) -> AppResult<u32> {
    if value == 0 {
        return Err(AppError::config(ConfigError::RepeatZero));
    }
    Ok(value)
}

pub(crate) fn parse_bool_env(s: &str) -> AppResult<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(AppError::config(ConfigError::InvalidBoolean {
            value: s.to_owned(),
        })),
    }
}
