#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative battle state: the tile grid, the unit roster and selection.

use battlescape_core::{
    Command, Direction, Event, GridSize, OrderError, Position, ResourcePool, SoldierProfile,
    SpawnError, Tile, TileGridView, UnitId, UnitStats,
};
use battlescape_system_movement::UnitMotion;
use battlescape_system_pathfinding::step_cost;

/// Unit taking part in the battle.
///
/// Soldier-specific data is an optional payload instead of a separate unit
/// type, so every unit moves through the same fields.
#[derive(Clone, Debug)]
struct MobileUnit {
    id: UnitId,
    motion: UnitMotion,
    time_units: ResourcePool,
    energy: ResourcePool,
    health: ResourcePool,
    soldier: Option<SoldierProfile>,
}

impl MobileUnit {
    fn new(
        id: UnitId,
        position: Position,
        facing: Direction,
        stats: UnitStats,
        soldier: Option<SoldierProfile>,
    ) -> Self {
        Self {
            id,
            motion: UnitMotion::new(position, facing),
            time_units: ResourcePool::full(stats.time_units),
            energy: ResourcePool::full(stats.energy),
            health: ResourcePool::full(stats.health),
            soldier,
        }
    }

    fn is_incapacitated(&self) -> bool {
        self.health.is_empty()
    }

    fn is_soldier(&self) -> bool {
        self.soldier.is_some()
    }
}

/// Represents the authoritative battle state.
#[derive(Debug)]
pub struct World {
    size: GridSize,
    tiles: Vec<Tile>,
    units: Vec<MobileUnit>,
    next_unit_id: u32,
    selected: Option<UnitId>,
    tick_index: u64,
}

impl World {
    /// Creates a world with an empty battlefield and no units.
    #[must_use]
    pub fn new() -> Self {
        Self {
            size: GridSize::default(),
            tiles: Vec::new(),
            units: Vec::new(),
            next_unit_id: 0,
            selected: None,
            tick_index: 0,
        }
    }

    fn unit(&self, id: UnitId) -> Option<&MobileUnit> {
        self.units.iter().find(|unit| unit.id == id)
    }

    fn unit_mut(&mut self, id: UnitId) -> Option<&mut MobileUnit> {
        self.units.iter_mut().find(|unit| unit.id == id)
    }

    fn set_occupant(&mut self, position: Position, occupant: Option<UnitId>) {
        if let Some(tile) = self
            .size
            .index(position)
            .and_then(|index| self.tiles.get_mut(index))
        {
            tile.set_occupant(occupant);
        }
    }

    fn vacate(&mut self, position: Position, unit: UnitId) {
        let holds = self
            .size
            .index(position)
            .and_then(|index| self.tiles.get(index))
            .is_some_and(|tile| tile.occupant() == Some(unit));
        if holds {
            self.set_occupant(position, None);
        }
    }

    fn configure(&mut self, size: GridSize, mut tiles: Vec<Tile>, out_events: &mut Vec<Event>) {
        let expected = size.tile_count();
        if tiles.len() != expected {
            tracing::warn!(
                provided = tiles.len(),
                expected,
                "battlefield tile count mismatch, padding with empty tiles"
            );
            tiles.resize(expected, Tile::empty());
        }
        for tile in &mut tiles {
            tile.set_occupant(None);
        }

        self.size = size;
        self.tiles = tiles;
        self.units.clear();
        self.next_unit_id = 0;
        self.selected = None;
        tracing::debug!(
            width = size.width(),
            length = size.length(),
            height = size.height(),
            "battlefield configured"
        );
        out_events.push(Event::BattlefieldConfigured { size });
    }

    fn spawn(
        &mut self,
        position: Position,
        facing: Direction,
        stats: UnitStats,
        soldier: Option<SoldierProfile>,
        out_events: &mut Vec<Event>,
    ) {
        let rejection = match self.size.index(position).and_then(|index| self.tiles.get(index)) {
            None => Some(SpawnError::OutOfBounds),
            Some(tile) if !tile.terrain().is_standable() => Some(SpawnError::NotStandable),
            Some(tile) if tile.occupant().is_some() => Some(SpawnError::Occupied),
            Some(_) => None,
        };
        if let Some(reason) = rejection {
            tracing::debug!(%position, ?reason, "spawn rejected");
            out_events.push(Event::SpawnRejected { position, reason });
            return;
        }

        let id = UnitId::new(self.next_unit_id);
        self.next_unit_id = self.next_unit_id.saturating_add(1);
        self.set_occupant(position, Some(id));
        self.units.push(MobileUnit::new(id, position, facing, stats, soldier));
        tracing::debug!(unit = id.get(), %position, "unit spawned");
        out_events.push(Event::UnitSpawned { unit: id, position });
    }

    fn select_next_soldier(&mut self, out_events: &mut Vec<Event>) {
        let mut soldiers = self
            .units
            .iter()
            .filter(|unit| unit.is_soldier())
            .map(|unit| unit.id);
        let next = match self.selected {
            Some(current) => {
                let ordered: Vec<UnitId> = soldiers.collect();
                ordered
                    .iter()
                    .copied()
                    .find(|id| *id > current)
                    .or_else(|| ordered.first().copied())
            }
            None => soldiers.next(),
        };

        if let Some(unit) = next {
            self.selected = Some(unit);
            out_events.push(Event::UnitSelected { unit });
        }
    }

    fn orderable_unit(&mut self, id: UnitId) -> Result<&mut MobileUnit, OrderError> {
        let unit = self.unit_mut(id).ok_or(OrderError::MissingUnit)?;
        if unit.is_incapacitated() {
            return Err(OrderError::Incapacitated);
        }
        Ok(unit)
    }

    fn advance_movement(&mut self, out_events: &mut Vec<Event>) {
        self.tick_index = self.tick_index.saturating_add(1);

        for index in 0..self.units.len() {
            let first_new = out_events.len();
            {
                let grid = TileGridView::new(&self.tiles, self.size);
                let Some(unit) = self.units.get_mut(index) else {
                    continue;
                };
                let id = unit.id;
                unit.motion.advance(
                    id,
                    &mut unit.time_units,
                    move |from, direction| step_cost(grid, from, direction, id),
                    move |position| grid.tile(position).map_or(0, Tile::footstep_sound),
                    out_events,
                );
            }

            for event_index in first_new..out_events.len() {
                match out_events[event_index] {
                    Event::WalkStarted { unit, to, .. } => self.set_occupant(to, Some(unit)),
                    Event::UnitArrived { unit, from, to } => {
                        tracing::debug!(unit = unit.get(), %from, %to, "unit arrived");
                        self.vacate(from, unit);
                    }
                    _ => {}
                }
            }
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureBattlefield { size, tiles } => world.configure(size, tiles, out_events),
        Command::SpawnUnit {
            position,
            facing,
            stats,
            soldier,
        } => world.spawn(position, facing, stats, soldier, out_events),
        Command::SelectUnit { unit } => {
            if world.unit(unit).is_some() {
                world.selected = Some(unit);
                out_events.push(Event::UnitSelected { unit });
            } else {
                out_events.push(Event::OrderRejected {
                    unit,
                    reason: OrderError::MissingUnit,
                });
            }
        }
        Command::SelectNextSoldier => world.select_next_soldier(out_events),
        Command::AssignPath { unit, path } => match world.orderable_unit(unit) {
            Ok(mobile) => {
                let steps = path.len();
                mobile.motion.assign_path(path);
                tracing::debug!(unit = unit.get(), steps, "path assigned");
                out_events.push(Event::PathAssigned { unit, steps });
            }
            Err(reason) => out_events.push(Event::OrderRejected { unit, reason }),
        },
        Command::ClearPath { unit } => match world.unit_mut(unit) {
            Some(mobile) => {
                mobile.motion.clear_path();
                out_events.push(Event::PathCleared { unit });
            }
            None => out_events.push(Event::OrderRejected {
                unit,
                reason: OrderError::MissingUnit,
            }),
        },
        Command::OrientUnit { unit, toward } => {
            let outcome = world
                .orderable_unit(unit)
                .and_then(|mobile| mobile.motion.orient(toward));
            match outcome {
                Ok(Some(direction)) => out_events.push(Event::TurnStarted {
                    unit,
                    toward: direction,
                }),
                Ok(None) => {}
                Err(reason) => out_events.push(Event::OrderRejected { unit, reason }),
            }
        }
        Command::AdvanceMovement => world.advance_movement(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use battlescape_core::{
        Direction, GridSize, Position, ResourcePool, TileGridView, UnitId, UnitStatus,
    };
    use battlescape_system_pathfinding::Mover;
    use glam::Vec3;

    use super::{MobileUnit, World};

    /// Extent of the battlefield.
    #[must_use]
    pub fn grid_size(world: &World) -> GridSize {
        world.size
    }

    /// Read-only view of the dense tile storage.
    #[must_use]
    pub fn tile_grid_view(world: &World) -> TileGridView<'_> {
        TileGridView::new(&world.tiles, world.size)
    }

    /// Unit holding the tile, including a tile a unit is walking into.
    #[must_use]
    pub fn unit_at(world: &World, position: Position) -> Option<UnitId> {
        tile_grid_view(world).occupant(position)
    }

    /// Currently selected unit, if any.
    #[must_use]
    pub fn selected_unit(world: &World) -> Option<UnitId> {
        world.selected
    }

    /// Reports whether any unit is part way through a step.
    #[must_use]
    pub fn has_walking_units(world: &World) -> bool {
        world
            .units
            .iter()
            .any(|unit| unit.motion.status() == UnitStatus::Walking)
    }

    /// Number of movement ticks processed so far.
    #[must_use]
    pub fn tick_index(world: &World) -> u64 {
        world.tick_index
    }

    /// Snapshot of a single unit.
    #[must_use]
    pub fn unit(world: &World, id: UnitId) -> Option<UnitSnapshot> {
        world.unit(id).map(UnitSnapshot::capture)
    }

    /// Snapshots of every unit in identifier order.
    #[must_use]
    pub fn units(world: &World) -> Vec<UnitSnapshot> {
        let mut snapshots: Vec<UnitSnapshot> =
            world.units.iter().map(UnitSnapshot::capture).collect();
        snapshots.sort_by_key(|snapshot| snapshot.id);
        snapshots
    }

    /// Pathfinding input for a unit, planning from where it will next stand.
    #[must_use]
    pub fn mover(world: &World, id: UnitId) -> Option<Mover> {
        world.unit(id).map(|unit| Mover {
            id,
            position: unit.motion.path_origin(),
            incapacitated: unit.is_incapacitated(),
        })
    }

    /// Read-only snapshot describing one unit.
    #[derive(Clone, Debug, PartialEq)]
    pub struct UnitSnapshot {
        /// Identifier of the unit.
        pub id: UnitId,
        /// Soldier name, absent for non-soldier units.
        pub name: Option<String>,
        /// Tile the unit occupies.
        pub position: Position,
        /// Interpolated voxel-space position.
        pub voxel: Vec3,
        /// Direction the unit faces.
        pub facing: Direction,
        /// Movement status.
        pub status: UnitStatus,
        /// Walk phase within the current transition.
        pub phase: u8,
        /// Tile being walked into, if walking.
        pub walk_destination: Option<Position>,
        /// Directions still queued.
        pub queued_steps: usize,
        /// Time-unit pool.
        pub time_units: ResourcePool,
        /// Energy pool.
        pub energy: ResourcePool,
        /// Health pool.
        pub health: ResourcePool,
    }

    impl UnitSnapshot {
        fn capture(unit: &MobileUnit) -> Self {
            Self {
                id: unit.id,
                name: unit.soldier.as_ref().map(|soldier| soldier.name.clone()),
                position: unit.motion.position(),
                voxel: unit.motion.voxel_position(),
                facing: unit.motion.facing(),
                status: unit.motion.status(),
                phase: unit.motion.phase(),
                walk_destination: unit.motion.walk().map(|walk| walk.destination()),
                queued_steps: unit.motion.path().len(),
                time_units: unit.time_units,
                energy: unit.energy,
                health: unit.health,
            }
        }
    }
}
