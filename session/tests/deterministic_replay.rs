use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use battlescape_core::{
    Command, Direction, Event, GridSize, Position, SoldierProfile, SoundRef, Terrain, Tile,
    UnitId, UnitStats, UnitStatus,
};
use battlescape_session::{
    Audio, AudioError, BattleSession, ButtonAction, Input, PointerButton, Presentation,
    SessionConfig, SoldierStatus,
};
use battlescape_world::{query, World};

#[derive(Debug, Default)]
struct Silent;

impl Presentation for Silent {
    fn request_redraw(&mut self) {}
    fn center_view(&mut self, _position: Position) {}
    fn set_cursor_hidden(&mut self, _hidden: bool) {}
    fn set_view_elevation(&mut self, _elevation: i32) {}
    fn show_status(&mut self, _status: &SoldierStatus) {}
}

impl Audio for Silent {
    fn play(&mut self, _sound: SoundRef) -> Result<(), AudioError> {
        Ok(())
    }
}

enum Step {
    Input(Input),
    Wait { frames: usize, frame: Duration },
}

#[test]
fn deterministic_replay_produces_identical_outcomes() {
    let first = replay(script());
    let second = replay(script());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());

    let ada = first
        .units
        .iter()
        .find(|unit| unit.id == UnitId::new(0))
        .expect("Ada survives the replay");
    assert_eq!(ada.position, Position::new(6, 1, 0));
    assert_eq!(ada.status, UnitStatus::Standing);

    let bo = first
        .units
        .iter()
        .find(|unit| unit.id == UnitId::new(1))
        .expect("Bo survives the replay");
    assert_eq!(bo.facing, Direction::North);
    assert_eq!(bo.position, Position::new(2, 5, 0));
}

fn replay(script: Vec<Step>) -> ReplayOutcome {
    let mut session = BattleSession::new(World::new(), SessionConfig::default(), Silent, Silent);
    let mut log = Vec::new();

    for command in battlefield() {
        session.submit(command);
        log.extend_from_slice(session.recent_events());
    }

    for step in script {
        match step {
            Step::Input(input) => {
                session.handle_input(input);
                log.extend_from_slice(session.recent_events());
            }
            Step::Wait { frames, frame } => {
                for _ in 0..frames {
                    session.update(frame);
                    log.extend_from_slice(session.recent_events());
                }
            }
        }
    }

    let units = query::units(session.world())
        .into_iter()
        .map(|snapshot| UnitState {
            id: snapshot.id,
            position: snapshot.position,
            facing: snapshot.facing,
            status: snapshot.status,
            time_units: snapshot.time_units.current(),
        })
        .collect();

    ReplayOutcome { units, events: log }
}

fn battlefield() -> Vec<Command> {
    let size = GridSize::new(8, 7, 1);
    let mut tiles = vec![Tile::new(Terrain::FLOOR, 1); size.tile_count()];
    for y in 0..5 {
        let index = size.index(Position::new(4, y, 0)).expect("inside");
        tiles[index] = Tile::new(Terrain::Blocked, 0);
    }
    let mud = size.index(Position::new(2, 3, 0)).expect("inside");
    tiles[mud] = Tile::new(Terrain::Floor { cost: 10 }, 3);

    let stats = UnitStats {
        time_units: 80,
        energy: 60,
        health: 40,
    };
    vec![
        Command::ConfigureBattlefield { size, tiles },
        Command::SpawnUnit {
            position: Position::new(1, 1, 0),
            facing: Direction::East,
            stats,
            soldier: Some(SoldierProfile {
                name: "Ada".to_owned(),
            }),
        },
        Command::SpawnUnit {
            position: Position::new(2, 5, 0),
            facing: Direction::South,
            stats,
            soldier: Some(SoldierProfile {
                name: "Bo".to_owned(),
            }),
        },
    ]
}

fn script() -> Vec<Step> {
    let frame = Duration::from_millis(16);
    vec![
        Step::Input(Input::Button(ButtonAction::NextSoldier)),
        Step::Input(Input::MapClick {
            position: Position::new(6, 1, 0),
            button: PointerButton::Primary,
        }),
        Step::Wait { frames: 40, frame },
        Step::Input(Input::MapClick {
            position: Position::new(2, 5, 0),
            button: PointerButton::Primary,
        }),
        Step::Input(Input::MapClick {
            position: Position::new(2, 0, 0),
            button: PointerButton::Secondary,
        }),
        Step::Input(Input::Button(ButtonAction::NextSoldier)),
        Step::Wait {
            frames: 600,
            frame,
        },
    ]
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    units: Vec<UnitState>,
    events: Vec<Event>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct UnitState {
    id: UnitId,
    position: Position,
    facing: Direction,
    status: UnitStatus,
    time_units: u32,
}
