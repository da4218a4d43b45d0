//! Boundaries toward presentation and audio.

use battlescape_core::{Position, ResourcePool, SoundRef, PLACEHOLDER_MORALE};
use thiserror::Error;

/// Contents of the soldier status panel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SoldierStatus {
    /// Display name.
    pub name: String,
    /// Time units remaining this turn.
    pub time_units: ResourcePool,
    /// Stamina.
    pub energy: ResourcePool,
    /// Hit points.
    pub health: ResourcePool,
    /// Morale; fixed until morale is simulated.
    pub morale: ResourcePool,
}

impl SoldierStatus {
    /// Builds a panel with the placeholder morale value.
    #[must_use]
    pub fn new(
        name: String,
        time_units: ResourcePool,
        energy: ResourcePool,
        health: ResourcePool,
    ) -> Self {
        Self {
            name,
            time_units,
            energy,
            health,
            morale: ResourcePool::full(PLACEHOLDER_MORALE),
        }
    }
}

/// Fire-and-forget notifications toward whatever draws the battlefield.
pub trait Presentation {
    /// Asks for the battlefield to be redrawn.
    fn request_redraw(&mut self);
    /// Scrolls the view so that `position` is centred.
    fn center_view(&mut self, position: Position);
    /// Hides or reveals the path cursor.
    fn set_cursor_hidden(&mut self, hidden: bool);
    /// Shows the level `elevation`.
    fn set_view_elevation(&mut self, elevation: i32);
    /// Replaces the contents of the status panel.
    fn show_status(&mut self, status: &SoldierStatus);
}

/// Sound playback.
pub trait Audio {
    /// Plays `sound`; callers treat failures as a skipped sound.
    fn play(&mut self, sound: SoundRef) -> Result<(), AudioError>;
}

/// Reasons a sound could not be played.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AudioError {
    /// The sound set does not contain the requested sample.
    #[error("sound {index} is missing from {set}")]
    MissingSound {
        /// Sound set that was searched.
        set: &'static str,
        /// Requested sample index.
        index: u16,
    },
}
