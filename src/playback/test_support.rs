use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::config::Settings;
use crate::download::build_client;
use crate::error::{PlaybackError, VolumeError};
use crate::volume::{Volume, VolumeBackend};

use super::{Playback, PlayerCommand, ProcessSupervisor};

/// Hands out pids from 4000 upwards and tracks which ones are "alive".
#[derive(Default)]
pub(crate) struct FakeSupervisor {
    next_pid: AtomicU32,
    pub(crate) alive: Mutex<HashSet<u32>>,
    pub(crate) spawned: Mutex<Vec<PlayerCommand>>,
    pub(crate) signalled: Mutex<Vec<u32>>,
    pub(crate) fail_spawn: AtomicBool,
    /// Reports live pids as gone once they are signalled.
    pub(crate) vanish_on_signal: AtomicBool,
}

impl FakeSupervisor {
    pub(crate) fn signalled_pids(&self) -> Vec<u32> {
        self.signalled
            .lock()
            .map(|signalled| signalled.clone())
            .unwrap_or_default()
    }

    pub(crate) fn spawn_count(&self) -> usize {
        self.spawned.lock().map(|spawned| spawned.len()).unwrap_or(0)
    }

    pub(crate) fn kill_externally(&self, pid: u32) {
        if let Ok(mut alive) = self.alive.lock() {
            alive.remove(&pid);
        }
    }
}

impl ProcessSupervisor for FakeSupervisor {
    fn spawn(&self, command: &PlayerCommand) -> Result<u32, PlaybackError> {
        if self.fail_spawn.load(Ordering::SeqCst) {
            return Err(PlaybackError::Spawn {
                program: command.program.clone(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        let pid = self.next_pid.fetch_add(1, Ordering::SeqCst).saturating_add(4000);
        if let Ok(mut alive) = self.alive.lock() {
            alive.insert(pid);
        }
        if let Ok(mut spawned) = self.spawned.lock() {
            spawned.push(command.clone());
        }
        Ok(pid)
    }

    fn signal(&self, pid: u32) -> Result<(), PlaybackError> {
        if let Ok(mut signalled) = self.signalled.lock() {
            signalled.push(pid);
        }
        let removed = self
            .alive
            .lock()
            .map(|mut alive| alive.remove(&pid))
            .unwrap_or(false);
        if removed && !self.vanish_on_signal.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(PlaybackError::ProcessNotFound { pid })
        }
    }

    fn is_alive(&self, pid: u32) -> bool {
        self.alive
            .lock()
            .map(|alive| alive.contains(&pid))
            .unwrap_or(false)
    }
}

/// Remembers every level it is asked to apply.
pub(crate) struct FakeMixer {
    pub(crate) level: Mutex<Volume>,
    pub(crate) sets: Mutex<Vec<Volume>>,
    pub(crate) fail: AtomicBool,
}

impl Default for FakeMixer {
    fn default() -> Self {
        Self {
            level: Mutex::new(Volume::from_percent(30)),
            sets: Mutex::new(Vec::new()),
            fail: AtomicBool::new(false),
        }
    }
}

impl FakeMixer {
    pub(crate) fn set_calls(&self) -> Vec<Volume> {
        self.sets.lock().map(|sets| sets.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl VolumeBackend for FakeMixer {
    async fn get(&self) -> Result<Volume, VolumeError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(VolumeError::Unparseable);
        }
        self.level
            .lock()
            .map(|level| *level)
            .map_err(|_poisoned| VolumeError::Unparseable)
    }

    async fn set(&self, level: Volume) -> Result<(), VolumeError> {
        if let Ok(mut sets) = self.sets.lock() {
            sets.push(level);
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(VolumeError::Unparseable);
        }
        if let Ok(mut current) = self.level.lock() {
            *current = level;
        }
        Ok(())
    }
}

pub(crate) struct Harness {
    pub(crate) _dir: tempfile::TempDir,
    pub(crate) settings: Settings,
    pub(crate) supervisor: Arc<FakeSupervisor>,
    pub(crate) mixer: Arc<FakeMixer>,
    pub(crate) playback: Arc<Playback>,
}

/// Temp base dir with the asset already cached, so no download happens.
pub(crate) fn harness() -> Result<Harness, String> {
    let dir = tempfile::tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    // Port 9 (discard) is never served in tests; any download attempt fails fast.
    let settings = Settings::new(dir.path(), "http://127.0.0.1:9/brook.mp3")
        .map_err(|err| err.to_string())?;
    std::fs::write(settings.asset_path(), b"cached")
        .map_err(|err| format!("write asset failed: {}", err))?;
    let supervisor = Arc::new(FakeSupervisor::default());
    let mixer = Arc::new(FakeMixer::default());
    let client = build_client().map_err(|err| err.to_string())?;
    let playback = Arc::new(Playback::new(
        &settings,
        client,
        supervisor.clone(),
        mixer.clone(),
    ));
    Ok(Harness {
        _dir: dir,
        settings,
        supervisor,
        mixer,
        playback,
    })
}

pub(crate) fn read_marker(path: &Path) -> Option<String> {
    std::fs::read_to_string(path).ok()
}
