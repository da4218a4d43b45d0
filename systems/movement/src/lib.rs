#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-unit movement state machine that turns, walks and commits steps.
//!
//! [`UnitMotion`] owns a unit's tile position, facing, queued [`Path`] and the
//! walk currently in progress. The world drives it through
//! [`UnitMotion::advance`] once per walk tick; every call runs exactly one row
//! of the transition table and reports what happened as [`Event`] values.

use battlescape_core::{
    AbortReason, Direction, Event, Footfall, OrderError, Path, Position, ResourcePool, SoundRef,
    Step, UnitId, UnitStatus,
};
use glam::Vec3;

/// Number of walk phases in a single tile-to-tile transition.
pub const WALK_PHASES: u8 = 8;

/// Phase at which the first footfall sounds.
pub const LEADING_FOOTFALL_PHASE: u8 = 3;

/// Phase at which the second footfall sounds.
pub const TRAILING_FOOTFALL_PHASE: u8 = 7;

/// Tile-to-tile transition currently being walked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Walk {
    direction: Direction,
    origin: Position,
    destination: Position,
}

impl Walk {
    /// Tile the unit is leaving.
    #[must_use]
    pub const fn origin(&self) -> Position {
        self.origin
    }

    /// Tile the unit is entering.
    #[must_use]
    pub const fn destination(&self) -> Position {
        self.destination
    }

    /// Reports whether the step crosses between levels.
    #[must_use]
    pub const fn changes_level(&self) -> bool {
        self.origin.z() != self.destination.z()
    }
}

/// Movement state of a single unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitMotion {
    position: Position,
    facing: Direction,
    desired_facing: Direction,
    status: UnitStatus,
    phase: u8,
    walk: Option<Walk>,
    path: Path,
    idle_reported: bool,
}

impl UnitMotion {
    /// Creates a standing unit at `position` facing `facing`.
    #[must_use]
    pub fn new(position: Position, facing: Direction) -> Self {
        Self {
            position,
            facing,
            desired_facing: facing,
            status: UnitStatus::Standing,
            phase: 0,
            walk: None,
            path: Path::new(),
            idle_reported: true,
        }
    }

    /// Tile the unit occupies; during a walk this is still the origin tile.
    #[must_use]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Direction the unit currently faces.
    #[must_use]
    pub const fn facing(&self) -> Direction {
        self.facing
    }

    /// Facing the unit is rotating toward; equals `facing` unless turning.
    #[must_use]
    pub const fn desired_facing(&self) -> Direction {
        self.desired_facing
    }

    /// Current movement status.
    #[must_use]
    pub const fn status(&self) -> UnitStatus {
        self.status
    }

    /// Walk phase within the current transition, zero when not walking.
    #[must_use]
    pub const fn phase(&self) -> u8 {
        self.phase
    }

    /// Transition currently being walked.
    #[must_use]
    pub const fn walk(&self) -> Option<Walk> {
        self.walk
    }

    /// Directions still queued after the current step.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Tile new orders are planned from.
    ///
    /// While walking the unit is committed to reaching the destination, so
    /// plans start there instead of at the tile being left.
    #[must_use]
    pub fn path_origin(&self) -> Position {
        self.walk.map_or(self.position, |walk| walk.destination)
    }

    /// Replaces the queued path; the old queue is discarded, never extended.
    pub fn assign_path(&mut self, path: Path) {
        self.path = path;
        self.idle_reported = false;
    }

    /// Discards every queued direction; a step in progress still completes.
    pub fn clear_path(&mut self) {
        self.path.clear();
    }

    /// Starts turning toward the tile at `target` without moving.
    ///
    /// Returns the new desired facing, or `None` when the unit already faces
    /// that way or the target shares the unit's column.
    pub fn orient(&mut self, target: Position) -> Result<Option<Direction>, OrderError> {
        if self.status == UnitStatus::Walking {
            return Err(OrderError::Busy);
        }

        let Some(toward) = Direction::toward(self.position, target) else {
            return Ok(None);
        };
        if toward == self.facing {
            self.desired_facing = toward;
            self.status = UnitStatus::Standing;
            return Ok(None);
        }

        self.desired_facing = toward;
        self.status = UnitStatus::Turning;
        self.idle_reported = false;
        Ok(Some(toward))
    }

    /// Interpolated voxel-space position used for presentation.
    #[must_use]
    pub fn voxel_position(&self) -> Vec3 {
        let origin = voxel(self.position);
        match self.walk {
            Some(walk) => {
                let delta = voxel(walk.destination - walk.origin);
                origin + delta * f32::from(self.phase) / f32::from(WALK_PHASES)
            }
            None => origin,
        }
    }

    /// Runs exactly one row of the transition table.
    ///
    /// `step_cost` prices a step the same way the pathfinder does and
    /// `footstep_sound` reports the sound identifier of a tile. Starting a
    /// walk spends the step's cost from `time_units`.
    pub fn advance<S, F>(
        &mut self,
        unit: UnitId,
        time_units: &mut ResourcePool,
        step_cost: S,
        footstep_sound: F,
        out: &mut Vec<Event>,
    ) where
        S: Fn(Position, Direction) -> Option<Step>,
        F: Fn(Position) -> u8,
    {
        match self.status {
            UnitStatus::Standing => self.advance_standing(unit, time_units, step_cost, out),
            UnitStatus::Turning => self.advance_turning(unit, out),
            UnitStatus::Walking => self.advance_walking(unit, footstep_sound, out),
        }
    }

    fn advance_standing<S>(
        &mut self,
        unit: UnitId,
        time_units: &mut ResourcePool,
        step_cost: S,
        out: &mut Vec<Event>,
    ) where
        S: Fn(Position, Direction) -> Option<Step>,
    {
        let Some(direction) = self.path.start_direction() else {
            if !self.idle_reported {
                self.idle_reported = true;
                out.push(Event::UnitIdle { unit });
            }
            return;
        };

        if !direction.is_vertical() && direction != self.facing {
            self.desired_facing = direction;
            self.status = UnitStatus::Turning;
            out.push(Event::TurnStarted {
                unit,
                toward: direction,
            });
            return;
        }

        let Some(step) = step_cost(self.position, direction) else {
            self.abort(unit, AbortReason::Obstructed, out);
            return;
        };
        if !time_units.spend(step.cost) {
            self.abort(unit, AbortReason::InsufficientTimeUnits, out);
            return;
        }

        let _ = self.path.dequeue();
        self.walk = Some(Walk {
            direction,
            origin: self.position,
            destination: step.destination,
        });
        self.status = UnitStatus::Walking;
        self.phase = 0;
        tracing::trace!(
            unit = unit.get(),
            from = %self.position,
            to = %step.destination,
            cost = step.cost,
            "walk started"
        );
        out.push(Event::WalkStarted {
            unit,
            direction,
            from: self.position,
            to: step.destination,
            cost: step.cost,
        });
    }

    fn advance_turning(&mut self, unit: UnitId, out: &mut Vec<Event>) {
        self.facing = self.facing.turned_toward(self.desired_facing);
        out.push(Event::UnitTurned {
            unit,
            facing: self.facing,
        });
        if self.facing == self.desired_facing {
            self.status = UnitStatus::Standing;
        }
    }

    fn advance_walking<F>(&mut self, unit: UnitId, footstep_sound: F, out: &mut Vec<Event>)
    where
        F: Fn(Position) -> u8,
    {
        let Some(walk) = self.walk else {
            self.status = UnitStatus::Standing;
            self.phase = 0;
            return;
        };

        self.phase += 1;
        out.push(Event::WalkProgressed {
            unit,
            phase: self.phase,
        });

        let footfall = match self.phase {
            LEADING_FOOTFALL_PHASE => Some(Footfall::Leading),
            TRAILING_FOOTFALL_PHASE => Some(Footfall::Trailing),
            _ => None,
        };
        if let Some(footfall) = footfall {
            if let Some(sound) = SoundRef::footstep(footstep_sound(walk.destination), footfall) {
                out.push(Event::FootstepPlayed { unit, sound });
            }
        }

        if self.phase < WALK_PHASES {
            return;
        }

        tracing::trace!(
            unit = unit.get(),
            direction = ?walk.direction,
            to = %walk.destination,
            "step completed"
        );
        self.position = walk.destination;
        self.phase = 0;
        self.walk = None;
        self.status = UnitStatus::Standing;
        out.push(Event::UnitArrived {
            unit,
            from: walk.origin,
            to: walk.destination,
        });
        if walk.changes_level() {
            out.push(Event::ViewElevationChanged {
                unit,
                elevation: walk.destination.z(),
            });
        }
    }

    fn abort(&mut self, unit: UnitId, reason: AbortReason, out: &mut Vec<Event>) {
        tracing::debug!(unit = unit.get(), ?reason, "movement aborted");
        self.path.clear();
        out.push(Event::MovementAborted { unit, reason });
    }
}

fn voxel(position: Position) -> Vec3 {
    let voxel = position.to_voxel();
    Vec3::new(voxel.x() as f32, voxel.y() as f32, voxel.z() as f32)
}
