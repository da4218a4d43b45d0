#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the battlescape engine.
//!
//! This crate defines the message surface that connects the session
//! controller, the authoritative world, and pure systems. The controller
//! submits [`Command`] values describing desired mutations, the world executes
//! them via its `apply` entry point, and then broadcasts [`Event`] values that
//! the controller turns into presentation and audio notifications. Systems
//! such as the pathfinder read the world through immutable views like
//! [`TileGridView`] and answer with plain data.

mod direction;
mod grid;
mod path;
mod position;

pub use direction::Direction;
pub use grid::{GridSize, Terrain, Tile, TileGridView, DEFAULT_FLOOR_COST};
pub use path::Path;
pub use position::{Position, PositionError, TILE_XY, TILE_Z};

use serde::{Deserialize, Serialize};

/// Sound set holding the battlescape sound effects.
pub const BATTLE_SOUND_SET: &str = "BATTLE.CAT";

/// Offset of the first footstep sample inside [`BATTLE_SOUND_SET`].
const FOOTSTEP_SOUND_BASE: u16 = 22;

/// Morale shown for every soldier until morale is simulated.
pub const PLACEHOLDER_MORALE: u32 = 100;

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the battlefield with the provided tiles and removes every unit.
    ConfigureBattlefield {
        /// Extent of the new battlefield.
        size: GridSize,
        /// Tiles in row-major order with levels outermost.
        tiles: Vec<Tile>,
    },
    /// Places a new unit on the battlefield.
    SpawnUnit {
        /// Tile the unit starts on.
        position: Position,
        /// Compass direction the unit initially faces.
        facing: Direction,
        /// Maximum values of the unit's resource pools.
        stats: UnitStats,
        /// Soldier-specific data, absent for non-soldier units.
        soldier: Option<SoldierProfile>,
    },
    /// Makes the provided unit the active selection.
    SelectUnit {
        /// Unit to select.
        unit: UnitId,
    },
    /// Cycles the selection to the next soldier in identifier order.
    SelectNextSoldier,
    /// Replaces a unit's queued path with a freshly computed one.
    AssignPath {
        /// Unit receiving the order.
        unit: UnitId,
        /// Directions to walk, replacing any queued remainder.
        path: Path,
    },
    /// Discards a unit's queued path without touching a step in progress.
    ClearPath {
        /// Unit whose order is aborted.
        unit: UnitId,
    },
    /// Turns a standing unit to face the provided tile without moving.
    OrientUnit {
        /// Unit to turn.
        unit: UnitId,
        /// Tile the unit should face.
        toward: Position,
    },
    /// Advances every unit's movement state machine by exactly one tick.
    AdvanceMovement,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Event {
    /// Confirms that the battlefield was replaced.
    BattlefieldConfigured {
        /// Extent of the new battlefield.
        size: GridSize,
    },
    /// Confirms that a unit entered the battlefield.
    UnitSpawned {
        /// Identifier allocated to the unit.
        unit: UnitId,
        /// Tile the unit occupies.
        position: Position,
    },
    /// Reports that a spawn request was rejected.
    SpawnRejected {
        /// Requested spawn tile.
        position: Position,
        /// Specific reason the spawn failed.
        reason: SpawnError,
    },
    /// Announces a new active selection.
    UnitSelected {
        /// Unit that became selected.
        unit: UnitId,
    },
    /// Confirms that a unit's queued path was replaced.
    PathAssigned {
        /// Unit that received the path.
        unit: UnitId,
        /// Number of steps queued.
        steps: usize,
    },
    /// Confirms that a unit's queued path was discarded.
    PathCleared {
        /// Unit whose path was discarded.
        unit: UnitId,
    },
    /// Reports that an order could not be accepted.
    OrderRejected {
        /// Unit the order addressed.
        unit: UnitId,
        /// Specific reason the order failed.
        reason: OrderError,
    },
    /// Announces that a unit began turning toward a new facing.
    TurnStarted {
        /// Unit that is turning.
        unit: UnitId,
        /// Facing the unit is turning toward.
        toward: Direction,
    },
    /// Confirms that a unit rotated one octant.
    UnitTurned {
        /// Unit that rotated.
        unit: UnitId,
        /// Facing after the rotation.
        facing: Direction,
    },
    /// Announces that a unit began a tile-to-tile transition.
    WalkStarted {
        /// Unit that is walking.
        unit: UnitId,
        /// Direction of the step.
        direction: Direction,
        /// Tile the unit is leaving.
        from: Position,
        /// Tile the unit is entering.
        to: Position,
        /// Time units spent on the step.
        cost: u32,
    },
    /// Reports progress through the current transition.
    WalkProgressed {
        /// Unit that is walking.
        unit: UnitId,
        /// Walking phase reached during the tick.
        phase: u8,
    },
    /// Requests playback of a footstep sound.
    FootstepPlayed {
        /// Unit whose footfall produced the sound.
        unit: UnitId,
        /// Sound to play.
        sound: SoundRef,
    },
    /// Confirms that a unit completed a transition.
    UnitArrived {
        /// Unit that arrived.
        unit: UnitId,
        /// Tile the unit left.
        from: Position,
        /// Tile the unit now occupies.
        to: Position,
    },
    /// Requests that the view follow a unit to a new level.
    ViewElevationChanged {
        /// Unit that changed level.
        unit: UnitId,
        /// Level the unit now stands on.
        elevation: i32,
    },
    /// Reports that a standing unit has nothing left to do.
    UnitIdle {
        /// Unit that is idle.
        unit: UnitId,
    },
    /// Reports that a unit's remaining path was abandoned.
    MovementAborted {
        /// Unit that stopped.
        unit: UnitId,
        /// Specific reason the movement stopped.
        reason: AbortReason,
    },
}

/// Unique identifier assigned to a unit within a battle.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct UnitId(u32);

impl UnitId {
    /// Creates a new unit identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Movement status of a unit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitStatus {
    /// Idle or between steps.
    #[default]
    Standing,
    /// Rotating toward a desired facing.
    Turning,
    /// Crossing from one tile to the next.
    Walking,
}

/// Resource with a current value capped by a maximum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourcePool {
    current: u32,
    max: u32,
}

impl ResourcePool {
    /// Creates a full pool.
    #[must_use]
    pub const fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Creates a pool with an explicit current value, clamped to `max`.
    #[must_use]
    pub const fn new(current: u32, max: u32) -> Self {
        let current = if current > max { max } else { current };
        Self { current, max }
    }

    /// Remaining amount.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Upper bound of the pool.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Reports whether the pool is exhausted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.current == 0
    }

    /// Deducts `amount` if the pool can pay for it.
    ///
    /// Returns `false` and leaves the pool untouched otherwise.
    pub fn spend(&mut self, amount: u32) -> bool {
        match self.current.checked_sub(amount) {
            Some(remaining) => {
                self.current = remaining;
                true
            }
            None => false,
        }
    }
}

/// Maximum resource values assigned to a unit when it spawns.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UnitStats {
    /// Time units available each turn.
    pub time_units: u32,
    /// Stamina available for exertion.
    pub energy: u32,
    /// Hit points; a unit at zero cannot move.
    pub health: u32,
}

/// Soldier-specific data attached to a unit.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SoldierProfile {
    /// Name shown on the status panel.
    pub name: String,
}

/// Outcome of taking a single step from a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Step {
    /// Tile reached by the step.
    pub destination: Position,
    /// Time units spent on the step.
    pub cost: u32,
}

/// Reference to a sound inside a sound set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SoundRef {
    /// Name of the sound set.
    pub set: &'static str,
    /// Index of the sample within the set.
    pub index: u16,
}

impl SoundRef {
    /// Footstep sample for the provided tile sound identifier.
    ///
    /// Identifier zero denotes a silent tile and yields `None`.
    #[must_use]
    pub fn footstep(sound_id: u8, footfall: Footfall) -> Option<Self> {
        if sound_id == 0 {
            return None;
        }

        let second = match footfall {
            Footfall::Leading => 0,
            Footfall::Trailing => 1,
        };
        Some(Self {
            set: BATTLE_SOUND_SET,
            index: FOOTSTEP_SOUND_BASE + u16::from(sound_id) * 2 + second,
        })
    }
}

/// Which of the two footfalls within a transition is sounding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Footfall {
    /// First footfall, part way into the transition.
    Leading,
    /// Second footfall, just before arrival.
    Trailing,
}

/// Reasons a spawn request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpawnError {
    /// The requested tile lies outside the battlefield.
    OutOfBounds,
    /// The requested tile has no floor to stand on.
    NotStandable,
    /// Another unit already stands on the requested tile.
    Occupied,
}

/// Reasons an order may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderError {
    /// No unit with the provided identifier exists.
    MissingUnit,
    /// The unit cannot act because its health is exhausted.
    Incapacitated,
    /// The unit is mid-step and cannot turn in place.
    Busy,
}

/// Reasons a unit may abandon its queued path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbortReason {
    /// The unit cannot pay the time units for the next step.
    InsufficientTimeUnits,
    /// The next step is no longer legal, for example because a unit moved into it.
    Obstructed,
}
