//! Compass and vertical step directions.

use serde::{Deserialize, Serialize};

use crate::Position;

/// Direction of a single step across the tile grid.
///
/// The eight horizontal directions are listed clockwise starting at north,
/// followed by the two vertical transitions. The declaration order is the
/// canonical ordering used to break ties between equally cheap paths. North
/// points toward decreasing `y`, east toward increasing `x`, and up toward
/// increasing `z`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Direction {
    /// Toward decreasing `y`.
    North,
    /// Toward increasing `x` and decreasing `y`.
    NorthEast,
    /// Toward increasing `x`.
    East,
    /// Toward increasing `x` and increasing `y`.
    SouthEast,
    /// Toward increasing `y`.
    South,
    /// Toward decreasing `x` and increasing `y`.
    SouthWest,
    /// Toward decreasing `x`.
    West,
    /// Toward decreasing `x` and decreasing `y`.
    NorthWest,
    /// One level up.
    Up,
    /// One level down.
    Down,
}

impl Direction {
    /// Every direction in canonical order.
    pub const ALL: [Direction; 10] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
        Self::Up,
        Self::Down,
    ];

    /// The eight compass directions a unit can face, clockwise from north.
    pub const COMPASS: [Direction; 8] = [
        Self::North,
        Self::NorthEast,
        Self::East,
        Self::SouthEast,
        Self::South,
        Self::SouthWest,
        Self::West,
        Self::NorthWest,
    ];

    /// Position of the direction within the canonical ordering.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::North => 0,
            Self::NorthEast => 1,
            Self::East => 2,
            Self::SouthEast => 3,
            Self::South => 4,
            Self::SouthWest => 5,
            Self::West => 6,
            Self::NorthWest => 7,
            Self::Up => 8,
            Self::Down => 9,
        }
    }

    /// Tile-space displacement produced by one step in this direction.
    #[must_use]
    pub const fn offset(self) -> Position {
        match self {
            Self::North => Position::new(0, -1, 0),
            Self::NorthEast => Position::new(1, -1, 0),
            Self::East => Position::new(1, 0, 0),
            Self::SouthEast => Position::new(1, 1, 0),
            Self::South => Position::new(0, 1, 0),
            Self::SouthWest => Position::new(-1, 1, 0),
            Self::West => Position::new(-1, 0, 0),
            Self::NorthWest => Position::new(-1, -1, 0),
            Self::Up => Position::new(0, 0, 1),
            Self::Down => Position::new(0, 0, -1),
        }
    }

    /// Returns `true` for the up and down transitions.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Returns `true` for the four diagonal compass directions.
    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        matches!(
            self,
            Self::NorthEast | Self::SouthEast | Self::SouthWest | Self::NorthWest
        )
    }

    /// Orthogonal directions whose tiles flank a diagonal step.
    #[must_use]
    pub const fn corners(self) -> Option<(Direction, Direction)> {
        match self {
            Self::NorthEast => Some((Self::North, Self::East)),
            Self::SouthEast => Some((Self::South, Self::East)),
            Self::SouthWest => Some((Self::South, Self::West)),
            Self::NorthWest => Some((Self::North, Self::West)),
            _ => None,
        }
    }

    /// Rotates a compass direction one octant clockwise.
    ///
    /// Vertical directions are returned unchanged.
    #[must_use]
    pub const fn rotated_clockwise(self) -> Self {
        if self.is_vertical() {
            return self;
        }
        Self::COMPASS[(self.index() + 1) % 8]
    }

    /// Rotates a compass direction one octant counter-clockwise.
    ///
    /// Vertical directions are returned unchanged.
    #[must_use]
    pub const fn rotated_counter_clockwise(self) -> Self {
        if self.is_vertical() {
            return self;
        }
        Self::COMPASS[(self.index() + 7) % 8]
    }

    /// Rotates one octant toward `target` along the shorter arc.
    ///
    /// A half-turn rotates clockwise. Returns `self` when already aligned or
    /// when either direction is vertical.
    #[must_use]
    pub const fn turned_toward(self, target: Direction) -> Self {
        if self.is_vertical() || target.is_vertical() {
            return self;
        }

        let delta = (target.index() + 8 - self.index()) % 8;
        if delta == 0 {
            self
        } else if delta <= 4 {
            self.rotated_clockwise()
        } else {
            self.rotated_counter_clockwise()
        }
    }

    /// Compass direction pointing from `from` toward `to` on the horizontal plane.
    ///
    /// Returns `None` when both positions share the same column.
    #[must_use]
    pub fn toward(from: Position, to: Position) -> Option<Self> {
        let dx = f64::from(to.x()) - f64::from(from.x());
        let dy = f64::from(to.y()) - f64::from(from.y());
        if dx == 0.0 && dy == 0.0 {
            return None;
        }

        let angle = dx.atan2(-dy);
        let octant = (angle / std::f64::consts::FRAC_PI_4).round() as i32;
        let index = usize::try_from(octant.rem_euclid(8)).ok()?;
        Self::COMPASS.get(index).copied()
    }
}
