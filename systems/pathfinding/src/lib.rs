#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic tile-grid pathfinder and the time-unit cost model.
//!
//! The search and the walking state machine both price steps through
//! [`step_cost`], so a path the pathfinder accepts is always a path the unit
//! can pay for one step at a time.

use std::{cmp::Reverse, collections::BinaryHeap};

use battlescape_core::{Direction, Path, Position, Step, TileGridView, UnitId};
use thiserror::Error;

/// Extra time units charged for climbing or descending one level.
pub const ELEVATION_SURCHARGE: u32 = 4;

/// Unit data the pathfinder needs to plan a route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Mover {
    /// Identifier used to ignore the unit's own tile during occupancy checks.
    pub id: UnitId,
    /// Tile the route starts from.
    pub position: Position,
    /// Whether the unit is unable to move at all.
    pub incapacitated: bool,
}

/// Reasons a route could not be produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum PathfindingError {
    /// The start or target lies outside the battlefield.
    #[error("{position} lies outside the battlefield")]
    OutOfBounds {
        /// Offending position.
        position: Position,
    },
    /// The unit cannot move.
    #[error("unit {} is incapacitated", unit.get())]
    Incapacitated {
        /// Unit that was asked to move.
        unit: UnitId,
    },
    /// No sequence of legal steps reaches the target.
    #[error("no route reaches {target}")]
    Unreachable {
        /// Requested destination.
        target: Position,
    },
}

/// Prices a single step of `unit` from `from` in `direction`.
///
/// Returns `None` when the step is illegal: the destination lies outside the
/// grid, cannot be stood on, or holds another unit; a diagonal squeezes
/// between two corner tiles that are both unstandable; or a vertical step is
/// not backed by a ramp. Every legal step costs at least one time unit.
#[must_use]
pub fn step_cost(
    grid: TileGridView<'_>,
    from: Position,
    direction: Direction,
    unit: UnitId,
) -> Option<Step> {
    let destination = from + direction.offset();
    let tile = grid.tile(destination)?;
    if !tile.admits(unit) {
        return None;
    }
    let entry = tile.terrain().entry_cost()?;

    let cost = match direction {
        Direction::Up => {
            let origin = grid.tile(from)?;
            if !origin.terrain().is_ramp() {
                return None;
            }
            entry + ELEVATION_SURCHARGE
        }
        Direction::Down => {
            if !tile.terrain().is_ramp() {
                return None;
            }
            entry + ELEVATION_SURCHARGE
        }
        _ => match direction.corners() {
            Some((first, second)) => {
                let first_open = grid.is_standable(from + first.offset());
                let second_open = grid.is_standable(from + second.offset());
                if !first_open && !second_open {
                    return None;
                }
                entry + entry / 2
            }
            None => entry,
        },
    };

    Some(Step {
        destination,
        cost: cost.max(1),
    })
}

/// Shortest-cost route planner with reusable scratch buffers.
///
/// The search runs backwards from the target so every tile learns its
/// remaining cost; the route is then read forwards from the start, taking at
/// each tile the first direction in [`Direction::ALL`] that stays on a
/// cheapest route.
#[derive(Debug, Default)]
pub struct Pathfinding {
    remaining: Vec<u32>,
    frontier: BinaryHeap<Reverse<(u32, u64, Position)>>,
}

impl Pathfinding {
    /// Creates a pathfinder with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Computes the cheapest route for `mover` to `target`.
    ///
    /// Equal-cost alternatives resolve to the direction that comes first in
    /// [`Direction::ALL`], so identical inputs always yield identical paths.
    /// A target equal to the start produces an empty path.
    pub fn calculate(
        &mut self,
        grid: TileGridView<'_>,
        mover: Mover,
        target: Position,
    ) -> Result<Path, PathfindingError> {
        let size = grid.size();
        let Some(start_index) = size.index(mover.position) else {
            return Err(PathfindingError::OutOfBounds {
                position: mover.position,
            });
        };
        let Some(target_index) = size.index(target) else {
            return Err(PathfindingError::OutOfBounds { position: target });
        };
        if mover.incapacitated {
            return Err(PathfindingError::Incapacitated { unit: mover.id });
        }
        if start_index == target_index {
            return Ok(Path::new());
        }
        if !grid.tile(target).is_some_and(|tile| tile.admits(mover.id)) {
            tracing::debug!(unit = mover.id.get(), %target, "target cannot be entered");
            return Err(PathfindingError::Unreachable { target });
        }

        self.flood_from(grid, mover.id, target, start_index);

        let total = self.remaining[start_index];
        if total == u32::MAX {
            tracing::debug!(unit = mover.id.get(), %target, "no route found");
            return Err(PathfindingError::Unreachable { target });
        }

        let path = self.trace(grid, mover, target)?;
        tracing::debug!(
            unit = mover.id.get(),
            %target,
            steps = path.len(),
            cost = total,
            "route planned"
        );
        Ok(path)
    }

    /// Prices one step exactly as the search does.
    #[must_use]
    pub fn tu_cost(
        &self,
        grid: TileGridView<'_>,
        from: Position,
        direction: Direction,
        unit: UnitId,
    ) -> Option<Step> {
        step_cost(grid, from, direction, unit)
    }

    /// Fills `remaining` with the cheapest cost from each tile to `target`.
    ///
    /// Stops as soon as the start tile is settled.
    fn flood_from(
        &mut self,
        grid: TileGridView<'_>,
        unit: UnitId,
        target: Position,
        start_index: usize,
    ) {
        let size = grid.size();
        self.remaining.clear();
        self.remaining.resize(size.tile_count(), u32::MAX);
        self.frontier.clear();

        let Some(target_index) = size.index(target) else {
            return;
        };
        self.remaining[target_index] = 0;
        let mut sequence: u64 = 0;
        self.frontier.push(Reverse((0, sequence, target)));

        while let Some(Reverse((cost, _, position))) = self.frontier.pop() {
            let Some(index) = size.index(position) else {
                continue;
            };
            if cost > self.remaining[index] {
                continue;
            }
            if index == start_index {
                break;
            }

            for direction in Direction::ALL {
                let origin = position - direction.offset();
                let Some(origin_index) = size.index(origin) else {
                    continue;
                };
                let Some(step) = step_cost(grid, origin, direction, unit) else {
                    continue;
                };
                let candidate = cost.saturating_add(step.cost);
                if candidate >= self.remaining[origin_index] {
                    continue;
                }

                self.remaining[origin_index] = candidate;
                sequence += 1;
                self.frontier.push(Reverse((candidate, sequence, origin)));
            }
        }
    }

    /// Walks the cost field from the start, preferring canonical directions.
    fn trace(
        &self,
        grid: TileGridView<'_>,
        mover: Mover,
        target: Position,
    ) -> Result<Path, PathfindingError> {
        let size = grid.size();
        let mut path = Path::new();
        let mut cursor = mover.position;

        while cursor != target {
            let here = size
                .index(cursor)
                .and_then(|index| self.remaining.get(index).copied())
                .ok_or(PathfindingError::Unreachable { target })?;

            let next = Direction::ALL.into_iter().find_map(|direction| {
                let step = step_cost(grid, cursor, direction, mover.id)?;
                let there = self.remaining.get(size.index(step.destination)?).copied()?;
                (there != u32::MAX && there.saturating_add(step.cost) == here)
                    .then_some((direction, step.destination))
            });

            let (direction, destination) =
                next.ok_or(PathfindingError::Unreachable { target })?;
            path.push(direction);
            cursor = destination;
        }

        Ok(path)
    }
}
