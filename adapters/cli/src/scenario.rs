use battlescape_core::{
    Command, Direction, GridSize, Position, SoldierProfile, Terrain, Tile, UnitStats,
};
use serde::Deserialize;
use thiserror::Error;

/// Scenario bundled with the binary.
pub(crate) const BUILT_IN_SCENARIO: &str = include_str!("../scenarios/skirmish.toml");

/// Battlefield and roster loaded from a scenario file.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Scenario {
    /// Display name of the scenario.
    pub(crate) name: String,
    size: GridSize,
    tiles: Vec<Tile>,
    units: Vec<UnitSpec>,
}

impl Scenario {
    /// Parses a scenario document.
    ///
    /// Levels are listed bottom first; each level is a list of rows running
    /// north to south and each character of a row is one tile, west to east.
    pub(crate) fn parse(source: &str) -> Result<Self, ScenarioError> {
        let document: ScenarioDocument = toml::from_str(source)?;
        let (size, tiles) = parse_levels(&document.levels)?;
        Ok(Self {
            name: document.name,
            size,
            tiles,
            units: document.units,
        })
    }

    /// Extent of the battlefield.
    #[must_use]
    pub(crate) fn size(&self) -> GridSize {
        self.size
    }

    /// Commands that build the battlefield and spawn the roster.
    #[must_use]
    pub(crate) fn commands(&self) -> Vec<Command> {
        let mut commands = Vec::with_capacity(self.units.len() + 1);
        commands.push(Command::ConfigureBattlefield {
            size: self.size,
            tiles: self.tiles.clone(),
        });
        commands.extend(self.units.iter().map(|unit| Command::SpawnUnit {
            position: unit.position,
            facing: unit.facing,
            stats: UnitStats {
                time_units: unit.time_units,
                energy: unit.energy,
                health: unit.health,
            },
            soldier: unit.name.clone().map(|name| SoldierProfile { name }),
        }));
        commands
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioDocument {
    name: String,
    levels: Vec<Vec<String>>,
    #[serde(default)]
    units: Vec<UnitSpec>,
}

/// Unit listed in a scenario; units without a name are not soldiers.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
struct UnitSpec {
    #[serde(default)]
    name: Option<String>,
    position: Position,
    #[serde(default = "default_facing")]
    facing: Direction,
    time_units: u32,
    energy: u32,
    health: u32,
}

fn default_facing() -> Direction {
    Direction::South
}

fn terrain_for(symbol: char) -> Option<(Terrain, u8)> {
    let tile = match symbol {
        ' ' => (Terrain::Empty, 0),
        '.' => (Terrain::FLOOR, 1),
        ':' => (Terrain::FLOOR, 2),
        '~' => (Terrain::Floor { cost: 8 }, 3),
        '/' => (Terrain::Ramp { cost: 4 }, 1),
        '#' => (Terrain::Blocked, 0),
        _ => return None,
    };
    Some(tile)
}

fn parse_levels(levels: &[Vec<String>]) -> Result<(GridSize, Vec<Tile>), ScenarioError> {
    let first = levels.first().ok_or(ScenarioError::NoLevels)?;
    let length = first.len();
    let width = first.first().map_or(0, |row| row.chars().count());
    if length == 0 || width == 0 {
        return Err(ScenarioError::EmptyLevel { level: 0 });
    }

    let mut tiles = Vec::with_capacity(width * length * levels.len());
    for (level, rows) in levels.iter().enumerate() {
        if rows.len() != length {
            return Err(ScenarioError::RowCount {
                level,
                expected: length,
                found: rows.len(),
            });
        }
        for (row, line) in rows.iter().enumerate() {
            let found = line.chars().count();
            if found != width {
                return Err(ScenarioError::RaggedRow {
                    level,
                    row,
                    expected: width,
                    found,
                });
            }
            for (column, symbol) in line.chars().enumerate() {
                let (terrain, sound) = terrain_for(symbol).ok_or(ScenarioError::UnknownTerrain {
                    symbol,
                    level,
                    row,
                    column,
                })?;
                tiles.push(Tile::new(terrain, sound));
            }
        }
    }

    let size = GridSize::new(
        dimension(width)?,
        dimension(length)?,
        dimension(levels.len())?,
    );
    Ok((size, tiles))
}

fn dimension(value: usize) -> Result<u32, ScenarioError> {
    u32::try_from(value).map_err(|_| ScenarioError::TooLarge { value })
}

/// Errors that can occur while loading a scenario.
#[derive(Debug, Error)]
pub(crate) enum ScenarioError {
    /// The document is not valid TOML or does not match the schema.
    #[error("invalid scenario: {0}")]
    Parse(#[from] toml::de::Error),
    /// The scenario lists no levels.
    #[error("scenario has no levels")]
    NoLevels,
    /// The bottom level has no rows or no columns.
    #[error("level {level} is empty")]
    EmptyLevel {
        /// Offending level.
        level: usize,
    },
    /// A level has a different number of rows than the bottom level.
    #[error("level {level} has {found} rows, expected {expected}")]
    RowCount {
        /// Offending level.
        level: usize,
        /// Rows in the bottom level.
        expected: usize,
        /// Rows in this level.
        found: usize,
    },
    /// A row has a different width than the first row.
    #[error("row {row} of level {level} is {found} tiles wide, expected {expected}")]
    RaggedRow {
        /// Offending level.
        level: usize,
        /// Offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of this row.
        found: usize,
    },
    /// A character outside the legend was used.
    #[error("unknown terrain {symbol:?} at column {column}, row {row}, level {level}")]
    UnknownTerrain {
        /// Unrecognised character.
        symbol: char,
        /// Level containing the character.
        level: usize,
        /// Row containing the character.
        row: usize,
        /// Column of the character.
        column: usize,
    },
    /// The battlefield does not fit the grid's index range.
    #[error("battlefield dimension {value} is too large")]
    TooLarge {
        /// Offending dimension.
        value: usize,
    },
}
