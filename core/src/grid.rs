//! Tile records and read-only access to the dense battlefield grid.

use serde::{Deserialize, Serialize};

use crate::{Position, UnitId};

/// Time-unit price of entering an ordinary floor tile.
pub const DEFAULT_FLOOR_COST: u8 = 4;

/// Ground conditions of a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Open air without a floor; units cannot stand here.
    Empty,
    /// Walkable floor costing `cost` time units to enter.
    Floor {
        /// Time units spent when a unit enters the tile.
        cost: u8,
    },
    /// Stairs or ramp linking this tile with the one above.
    Ramp {
        /// Time units spent when a unit enters the tile.
        cost: u8,
    },
    /// Solid wall or object that nothing can enter.
    Blocked,
}

impl Terrain {
    /// Ordinary floor with the default entry cost.
    pub const FLOOR: Self = Self::Floor {
        cost: DEFAULT_FLOOR_COST,
    };

    /// Reports whether a unit can stand on the terrain.
    #[must_use]
    pub const fn is_standable(self) -> bool {
        matches!(self, Self::Floor { .. } | Self::Ramp { .. })
    }

    /// Reports whether the terrain links to the level above.
    #[must_use]
    pub const fn is_ramp(self) -> bool {
        matches!(self, Self::Ramp { .. })
    }

    /// Time units required to enter the terrain, if it can be entered at all.
    #[must_use]
    pub const fn entry_cost(self) -> Option<u32> {
        match self {
            Self::Floor { cost } | Self::Ramp { cost } => Some(cost as u32),
            Self::Empty | Self::Blocked => None,
        }
    }
}

/// Single addressable cell of the battlefield.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tile {
    terrain: Terrain,
    footstep_sound: u8,
    occupant: Option<UnitId>,
}

impl Tile {
    /// Creates an unoccupied tile.
    ///
    /// A `footstep_sound` of zero marks the tile as silent.
    #[must_use]
    pub const fn new(terrain: Terrain, footstep_sound: u8) -> Self {
        Self {
            terrain,
            footstep_sound,
            occupant: None,
        }
    }

    /// Tile with no floor and no sound.
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(Terrain::Empty, 0)
    }

    /// Ground conditions of the tile.
    #[must_use]
    pub const fn terrain(&self) -> Terrain {
        self.terrain
    }

    /// Footstep sound identifier, zero when silent.
    #[must_use]
    pub const fn footstep_sound(&self) -> u8 {
        self.footstep_sound
    }

    /// Unit currently standing on the tile.
    #[must_use]
    pub const fn occupant(&self) -> Option<UnitId> {
        self.occupant
    }

    /// Records the unit standing on the tile.
    pub fn set_occupant(&mut self, occupant: Option<UnitId>) {
        self.occupant = occupant;
    }

    /// Reports whether `unit` may enter the tile.
    #[must_use]
    pub fn admits(&self, unit: UnitId) -> bool {
        self.terrain.is_standable() && self.occupant.map_or(true, |other| other == unit)
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::empty()
    }
}

/// Extent of the battlefield measured in tiles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    width: u32,
    length: u32,
    height: u32,
}

impl GridSize {
    /// Creates a grid extent along x, y and z.
    #[must_use]
    pub const fn new(width: u32, length: u32, height: u32) -> Self {
        Self {
            width,
            length,
            height,
        }
    }

    /// Number of tiles along the x axis.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of tiles along the y axis.
    #[must_use]
    pub const fn length(&self) -> u32 {
        self.length
    }

    /// Number of levels along the z axis.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Total number of tiles in the grid.
    #[must_use]
    pub fn tile_count(&self) -> usize {
        let count = u64::from(self.width) * u64::from(self.length) * u64::from(self.height);
        usize::try_from(count).unwrap_or(0)
    }

    /// Reports whether the tile-space position lies inside the grid.
    #[must_use]
    pub fn contains(&self, position: Position) -> bool {
        self.index(position).is_some()
    }

    /// Row-major offset of the tile, levels outermost.
    #[must_use]
    pub fn index(&self, position: Position) -> Option<usize> {
        let x = u32::try_from(position.x()).ok()?;
        let y = u32::try_from(position.y()).ok()?;
        let z = u32::try_from(position.z()).ok()?;
        if x >= self.width || y >= self.length || z >= self.height {
            return None;
        }

        let width = usize::try_from(self.width).ok()?;
        let length = usize::try_from(self.length).ok()?;
        let level = usize::try_from(z).ok()?.checked_mul(width)?.checked_mul(length)?;
        let row = usize::try_from(y).ok()?.checked_mul(width)?;
        level.checked_add(row)?.checked_add(usize::try_from(x).ok()?)
    }
}

/// Read-only view over the dense tile storage.
#[derive(Clone, Copy, Debug)]
pub struct TileGridView<'a> {
    tiles: &'a [Tile],
    size: GridSize,
}

impl<'a> TileGridView<'a> {
    /// Captures a view backed by `tiles` laid out according to `size`.
    #[must_use]
    pub fn new(tiles: &'a [Tile], size: GridSize) -> Self {
        Self { tiles, size }
    }

    /// Extent of the viewed grid.
    #[must_use]
    pub const fn size(&self) -> GridSize {
        self.size
    }

    /// Tile at the tile-space position, if it lies inside the grid.
    #[must_use]
    pub fn tile(&self, position: Position) -> Option<&'a Tile> {
        self.size
            .index(position)
            .and_then(|index| self.tiles.get(index))
    }

    /// Unit standing at the tile-space position.
    #[must_use]
    pub fn occupant(&self, position: Position) -> Option<UnitId> {
        self.tile(position).and_then(Tile::occupant)
    }

    /// Reports whether a unit could stand at the position, ignoring occupancy.
    #[must_use]
    pub fn is_standable(&self, position: Position) -> bool {
        self.tile(position)
            .is_some_and(|tile| tile.terrain().is_standable())
    }
}
