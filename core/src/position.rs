//! Integer coordinates shared by tile space and voxel space.

use std::{
    fmt,
    ops::{Add, AddAssign, Mul, MulAssign, Sub, SubAssign},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of voxels spanned by one tile along the horizontal axes.
pub const TILE_XY: i32 = 16;

/// Number of voxels spanned by one tile along the vertical axis.
pub const TILE_Z: i32 = 24;

/// Three-axis integer vector addressing either a tile or a voxel.
///
/// Tile-space positions address grid cells and are the only form accepted by
/// grid lookups. Voxel-space positions subdivide each tile and drive
/// animation interpolation. Converting voxel to tile truncates toward zero, so
/// the round trip only holds for tile-aligned voxel positions.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "Vec<i32>", into = "Vec<i32>")]
pub struct Position {
    x: i32,
    y: i32,
    z: i32,
}

impl Position {
    /// Origin of either coordinate space.
    pub const ZERO: Self = Self::new(0, 0, 0);

    /// Creates a new position from its components.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Component along the east-west axis.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Component along the north-south axis.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Elevation component.
    #[must_use]
    pub const fn z(&self) -> i32 {
        self.z
    }

    /// Converts a tile-space position into the voxel at the tile's corner.
    ///
    /// Components beyond the voxel range wrap.
    #[must_use]
    pub const fn to_voxel(self) -> Self {
        Self::new(
            self.x.wrapping_mul(TILE_XY),
            self.y.wrapping_mul(TILE_XY),
            self.z.wrapping_mul(TILE_Z),
        )
    }

    /// Converts a voxel-space position into the tile containing it.
    #[must_use]
    pub const fn to_tile(self) -> Self {
        Self::new(self.x / TILE_XY, self.y / TILE_XY, self.z / TILE_Z)
    }

    /// Component-wise division that rejects zero divisors.
    ///
    /// `i32::MIN / -1` wraps to `i32::MIN`.
    pub fn checked_div(self, divisor: Position) -> Result<Self, PositionError> {
        if divisor.x == 0 || divisor.y == 0 || divisor.z == 0 {
            return Err(PositionError::DivisionByZero { divisor });
        }

        Ok(Self::new(
            self.x.wrapping_div(divisor.x),
            self.y.wrapping_div(divisor.y),
            self.z.wrapping_div(divisor.z),
        ))
    }

    /// Divides every component by `divisor`, rejecting zero.
    pub fn checked_div_scalar(self, divisor: i32) -> Result<Self, PositionError> {
        self.checked_div(Self::new(divisor, divisor, divisor))
    }

    /// Euclidean distance in three dimensions.
    #[must_use]
    pub fn distance(a: Position, b: Position) -> f32 {
        (Self::distance_sq(a, b) as f64).sqrt() as f32
    }

    /// Squared Euclidean distance in three dimensions.
    ///
    /// Widened to `i64`, which holds the result for any pair of positions.
    #[must_use]
    pub const fn distance_sq(a: Position, b: Position) -> i64 {
        let x = a.x as i64 - b.x as i64;
        let y = a.y as i64 - b.y as i64;
        let z = a.z as i64 - b.z as i64;
        x * x + y * y + z * z
    }

    /// Horizontal distance rounded up to the next whole unit.
    #[must_use]
    pub fn distance_2d(a: Position, b: Position) -> i64 {
        (Self::distance_2d_sq(a, b) as f64).sqrt().ceil() as i64
    }

    /// Squared horizontal distance, ignoring elevation.
    #[must_use]
    pub const fn distance_2d_sq(a: Position, b: Position) -> i64 {
        let x = a.x as i64 - b.x as i64;
        let y = a.y as i64 - b.y as i64;
        x * x + y * y
    }
}

impl Add for Position {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.x.wrapping_add(rhs.x),
            self.y.wrapping_add(rhs.y),
            self.z.wrapping_add(rhs.z),
        )
    }
}

impl AddAssign for Position {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Position {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.x.wrapping_sub(rhs.x),
            self.y.wrapping_sub(rhs.y),
            self.z.wrapping_sub(rhs.z),
        )
    }
}

impl SubAssign for Position {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul for Position {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::new(
            self.x.wrapping_mul(rhs.x),
            self.y.wrapping_mul(rhs.y),
            self.z.wrapping_mul(rhs.z),
        )
    }
}

impl MulAssign for Position {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<i32> for Position {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self {
        Self::new(
            self.x.wrapping_mul(rhs),
            self.y.wrapping_mul(rhs),
            self.z.wrapping_mul(rhs),
        )
    }
}

impl MulAssign<i32> for Position {
    fn mul_assign(&mut self, rhs: i32) {
        *self = *self * rhs;
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{},{})", self.x, self.y, self.z)
    }
}

impl TryFrom<&[i32]> for Position {
    type Error = PositionError;

    fn try_from(components: &[i32]) -> Result<Self, Self::Error> {
        match components {
            [x, y, z] => Ok(Self::new(*x, *y, *z)),
            _ => Err(PositionError::WrongArity {
                found: components.len(),
            }),
        }
    }
}

impl TryFrom<Vec<i32>> for Position {
    type Error = PositionError;

    fn try_from(components: Vec<i32>) -> Result<Self, Self::Error> {
        Self::try_from(components.as_slice())
    }
}

impl From<Position> for Vec<i32> {
    fn from(position: Position) -> Self {
        vec![position.x, position.y, position.z]
    }
}

impl FromStr for Position {
    type Err = PositionError;

    /// Parses the `x,y,z` form accepted on command lines.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let components = value
            .split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<i32>()
                    .map_err(|_| PositionError::InvalidComponent {
                        component: part.to_owned(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::try_from(components)
    }
}

/// Failures raised by position arithmetic and decoding.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PositionError {
    /// A component of the divisor was zero.
    #[error("cannot divide by {divisor}: zero component")]
    DivisionByZero {
        /// Divisor that contained the zero component.
        divisor: Position,
    },
    /// A stored coordinate did not contain exactly three components.
    #[error("expected 3 position components, found {found}")]
    WrongArity {
        /// Number of components that were supplied.
        found: usize,
    },
    /// A textual component could not be parsed as an integer.
    #[error("invalid position component `{component}`")]
    InvalidComponent {
        /// Offending text.
        component: String,
    },
}
