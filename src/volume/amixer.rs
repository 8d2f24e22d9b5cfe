use async_trait::async_trait;
use tokio::process::Command;
use tracing::debug;

use crate::config::MixerSettings;
use crate::error::VolumeError;

use super::{Volume, VolumeBackend};

/// Drives ALSA's `amixer` (or anything with the same CLI) on one control.
#[derive(Debug, Clone)]
pub struct AmixerBackend {
    program: String,
    control: String,
}

impl AmixerBackend {
    #[must_use]
    pub fn new(settings: &MixerSettings) -> Self {
        Self {
            program: settings.program.clone(),
            control: settings.control.clone(),
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.kill_on_drop(true);
        command
    }
}

#[async_trait]
impl VolumeBackend for AmixerBackend {
    async fn get(&self) -> Result<Volume, VolumeError> {
        let output = self
            .command()
            .args(["-M", "sget", self.control.as_str()])
            .output()
            .await
            .map_err(|err| VolumeError::Run {
                program: self.program.clone(),
                source: err,
            })?;
        if !output.status.success() {
            return Err(VolumeError::Failed {
                program: self.program.clone(),
                status: output.status,
            });
        }
        parse_mixer_output(&String::from_utf8_lossy(&output.stdout))
    }

    async fn set(&self, level: Volume) -> Result<(), VolumeError> {
        let percent = format!("{}%", level);
        debug!("{} sset {} {}", self.program, self.control, percent);
        let status = self
            .command()
            .args(["-q", "-M", "sset", self.control.as_str(), percent.as_str()])
            .status()
            .await
            .map_err(|err| VolumeError::Run {
                program: self.program.clone(),
                source: err,
            })?;
        if status.success() {
            Ok(())
        } else {
            Err(VolumeError::Failed {
                program: self.program.clone(),
                status,
            })
        }
    }
}

/// Extracts the first `[NN%]` level from mixer output.
///
/// # Errors
///
/// Returns [`VolumeError::Unparseable`] when no bracketed percentage is present,
/// or [`VolumeError::OutOfRange`] when it exceeds 100.
pub fn parse_mixer_output(output: &str) -> Result<Volume, VolumeError> {
    let mut rest = output;
    while let Some(open) = rest.find('[') {
        let candidate = rest.get(open.saturating_add(1)..).unwrap_or_default();
        if let Some(close) = candidate.find("%]") {
            let digits = candidate.get(..close).unwrap_or_default();
            if !digits.is_empty() && digits.bytes().all(|byte| byte.is_ascii_digit()) {
                let value: i64 = digits.parse().map_err(|_overflow| VolumeError::Unparseable)?;
                return Volume::new(value);
            }
        }
        rest = candidate;
    }
    Err(VolumeError::Unparseable)
}
