//! Mixer-backed volume control.
//!
//! The level lives in the OS mixer; nothing here persists it. [`Volume`] is the
//! only way to name a level, so an out-of-range request fails before any
//! backend sees it.
mod amixer;


use std::fmt;

use async_trait::async_trait;

use crate::error::VolumeError;

pub use amixer::{AmixerBackend, parse_mixer_output};

/// Mixer level as a percentage in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Volume(u8);

impl Volume {
    pub const MAX: u8 = 100;

    /// Validates a raw level.
    ///
    /// # Errors
    ///
    /// Returns [`VolumeError::OutOfRange`] unless `0 <= value <= 100`.
    pub fn new(value: i64) -> Result<Self, VolumeError> {
        u8::try_from(value)
            .ok()
            .filter(|level| *level <= Self::MAX)
            .map(Self)
            .ok_or(VolumeError::OutOfRange { value })
    }

    /// Builds a level from an already validated percentage, saturating at 100.
    #[must_use]
    pub const fn from_percent(percent: u8) -> Self {
        if percent > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(percent)
        }
    }

    #[must_use]
    pub const fn percent(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Volume {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reads and writes the system output level.
#[async_trait]
pub trait VolumeBackend: Send + Sync {
    /// # Errors
    ///
    /// Returns an error when the mixer cannot be queried or its output is not understood.
    async fn get(&self) -> Result<Volume, VolumeError>;

    /// # Errors
    ///
    /// Returns an error when the mixer rejects the new level.
    async fn set(&self, level: Volume) -> Result<(), VolumeError>;
}
