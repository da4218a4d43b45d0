use std::fmt;

use battlescape_core::{Position, ResourcePool, SoundRef, BATTLE_SOUND_SET};
use battlescape_session::{Audio, AudioError, Presentation, SoldierStatus};

/// Presentation that narrates notifications through `tracing`.
#[derive(Debug, Default)]
pub(crate) struct LoggingPresentation {
    redraws: u64,
}

impl LoggingPresentation {
    /// Number of redraw requests received.
    pub(crate) fn redraws(&self) -> u64 {
        self.redraws
    }
}

impl Presentation for LoggingPresentation {
    fn request_redraw(&mut self) {
        self.redraws += 1;
        tracing::trace!(frame = self.redraws, "redraw requested");
    }

    fn center_view(&mut self, position: Position) {
        tracing::info!(%position, "view centred");
    }

    fn set_cursor_hidden(&mut self, hidden: bool) {
        tracing::debug!(hidden, "path cursor toggled");
    }

    fn set_view_elevation(&mut self, elevation: i32) {
        tracing::info!(elevation, "view level changed");
    }

    fn show_status(&mut self, status: &SoldierStatus) {
        tracing::info!(
            name = %status.name,
            tu = %Pool(status.time_units),
            energy = %Pool(status.energy),
            health = %Pool(status.health),
            morale = %Pool(status.morale),
            "status"
        );
    }
}

struct Pool(ResourcePool);

impl fmt::Display for Pool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.0.current(), self.0.max())
    }
}

/// Audio that logs the samples it would play.
///
/// Only the battlescape sound set is loaded; samples from any other set are
/// reported as missing.
#[derive(Debug, Default)]
pub(crate) struct LoggingAudio {
    played: u64,
}

impl LoggingAudio {
    /// Number of sounds played.
    pub(crate) fn played(&self) -> u64 {
        self.played
    }
}

impl Audio for LoggingAudio {
    fn play(&mut self, sound: SoundRef) -> Result<(), AudioError> {
        if sound.set != BATTLE_SOUND_SET {
            return Err(AudioError::MissingSound {
                set: sound.set,
                index: sound.index,
            });
        }
        self.played += 1;
        tracing::debug!(set = sound.set, index = sound.index, "sound played");
        Ok(())
    }
}
