use std::time::Duration;

use battlescape_core::{
    Command, Direction, Event, GridSize, Path, Position, SoldierProfile, SoundRef, Terrain, Tile,
    UnitId, UnitStats, UnitStatus, BATTLE_SOUND_SET,
};
use battlescape_session::{
    Audio, AudioError, BattleSession, ButtonAction, Input, PointerButton, Presentation,
    ReserveMode, SessionConfig, SoldierStatus,
};
use battlescape_world::{query, World};

const WALK: Duration = Duration::from_millis(50);

#[derive(Debug, Default)]
struct RecordingPresentation {
    redraws: usize,
    centered: Vec<Position>,
    cursor: Vec<bool>,
    elevations: Vec<i32>,
    statuses: Vec<SoldierStatus>,
}

impl Presentation for RecordingPresentation {
    fn request_redraw(&mut self) {
        self.redraws += 1;
    }

    fn center_view(&mut self, position: Position) {
        self.centered.push(position);
    }

    fn set_cursor_hidden(&mut self, hidden: bool) {
        self.cursor.push(hidden);
    }

    fn set_view_elevation(&mut self, elevation: i32) {
        self.elevations.push(elevation);
    }

    fn show_status(&mut self, status: &SoldierStatus) {
        self.statuses.push(status.clone());
    }
}

#[derive(Debug, Default)]
struct RecordingAudio {
    fail: bool,
    played: Vec<SoundRef>,
}

impl Audio for RecordingAudio {
    fn play(&mut self, sound: SoundRef) -> Result<(), AudioError> {
        if self.fail {
            return Err(AudioError::MissingSound {
                set: sound.set,
                index: sound.index,
            });
        }
        self.played.push(sound);
        Ok(())
    }
}

type Session = BattleSession<RecordingPresentation, RecordingAudio>;

fn soldier(name: &str) -> Option<SoldierProfile> {
    Some(SoldierProfile {
        name: name.to_owned(),
    })
}

fn stats() -> UnitStats {
    UnitStats {
        time_units: 60,
        energy: 80,
        health: 35,
    }
}

fn session_with(config: SessionConfig, audio: RecordingAudio) -> Session {
    let mut session = BattleSession::new(
        World::new(),
        config,
        RecordingPresentation::default(),
        audio,
    );

    let size = GridSize::new(6, 6, 2);
    let mut tiles = vec![Tile::new(Terrain::FLOOR, 2); 36];
    tiles.extend(vec![Tile::empty(); 36]);
    let ramp = size.index(Position::new(4, 4, 0)).expect("inside");
    tiles[ramp] = Tile::new(Terrain::Ramp { cost: 4 }, 2);
    let landing = size.index(Position::new(4, 4, 1)).expect("inside");
    tiles[landing] = Tile::new(Terrain::FLOOR, 2);

    session.submit(Command::ConfigureBattlefield { size, tiles });
    session.submit(Command::SpawnUnit {
        position: Position::new(1, 1, 0),
        facing: Direction::East,
        stats: stats(),
        soldier: soldier("Ada"),
    });
    session.submit(Command::SpawnUnit {
        position: Position::new(5, 5, 0),
        facing: Direction::West,
        stats: stats(),
        soldier: soldier("Bo"),
    });
    session.handle_input(Input::Button(ButtonAction::NextSoldier));
    session
}

fn session() -> Session {
    session_with(SessionConfig::default(), RecordingAudio::default())
}

fn click(session: &mut Session, position: Position, button: PointerButton) {
    session.handle_input(Input::MapClick { position, button });
}

fn run_ticks(session: &mut Session, ticks: usize) -> Vec<Event> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        session.update(WALK);
        events.extend_from_slice(session.recent_events());
    }
    events
}

fn ada(session: &Session) -> query::UnitSnapshot {
    query::unit(session.world(), UnitId::new(0)).expect("Ada exists")
}

#[test]
fn next_soldier_selects_and_centres() {
    let session = session();

    assert_eq!(query::selected_unit(session.world()), Some(UnitId::new(0)));
    assert_eq!(session.presentation().centered, vec![Position::new(1, 1, 0)]);
}

#[test]
fn clicking_a_unit_selects_it_and_shows_its_status() {
    let mut session = session();

    click(&mut session, Position::new(5, 5, 0), PointerButton::Primary);

    assert_eq!(query::selected_unit(session.world()), Some(UnitId::new(1)));
    let status = session
        .presentation()
        .statuses
        .last()
        .expect("status shown");
    assert_eq!(status.name, "Bo");
    assert_eq!(status.time_units.current(), 60);
    assert_eq!(status.time_units.max(), 60);
    assert_eq!(status.energy.max(), 80);
    assert_eq!(status.health.current(), 35);
    assert_eq!(status.morale.current(), 100);
    assert_eq!(status.morale.max(), 100);
}

#[test]
fn move_order_walks_the_unit_and_toggles_the_cursor() {
    let mut session = session();

    click(&mut session, Position::new(3, 1, 0), PointerButton::Primary);
    assert!(session
        .recent_events()
        .contains(&Event::PathAssigned {
            unit: UnitId::new(0),
            steps: 2,
        }));

    let events = run_ticks(&mut session, 18);
    assert_eq!(ada(&session).position, Position::new(3, 1, 0));
    assert_eq!(ada(&session).time_units.current(), 52);
    assert!(session.cursor_hidden());
    assert!(events.contains(&Event::UnitArrived {
        unit: UnitId::new(0),
        from: Position::new(2, 1, 0),
        to: Position::new(3, 1, 0),
    }));

    let _ = run_ticks(&mut session, 1);
    assert!(!session.cursor_hidden());
    assert_eq!(session.presentation().cursor, vec![true, false]);

    let footstep = |index| SoundRef {
        set: BATTLE_SOUND_SET,
        index,
    };
    assert_eq!(
        session.audio().played,
        vec![footstep(26), footstep(27), footstep(26), footstep(27)]
    );
}

#[test]
fn status_refreshes_after_each_step() {
    let mut session = session();
    let shown_before = session.presentation().statuses.len();

    click(&mut session, Position::new(2, 1, 0), PointerButton::Primary);
    let _ = run_ticks(&mut session, 9);

    let statuses = &session.presentation().statuses[shown_before..];
    assert_eq!(
        statuses.last().map(|status| status.time_units.current()),
        Some(56)
    );
    assert!(statuses.len() >= 2, "refreshed on walk start and arrival");
}

#[test]
fn secondary_click_turns_without_moving() {
    let mut session = session();

    click(&mut session, Position::new(1, 5, 0), PointerButton::Secondary);
    assert!(session.recent_events().contains(&Event::TurnStarted {
        unit: UnitId::new(0),
        toward: Direction::South,
    }));

    let _ = run_ticks(&mut session, 2);

    let snapshot = ada(&session);
    assert_eq!(snapshot.facing, Direction::South);
    assert_eq!(snapshot.status, UnitStatus::Standing);
    assert_eq!(snapshot.position, Position::new(1, 1, 0));
    assert_eq!(snapshot.time_units.current(), 60);
}

#[test]
fn walk_cadence_only_fires_on_whole_periods() {
    let mut session = session();
    let step = Duration::from_millis(20);

    session.update(step);
    session.update(step);
    assert_eq!(query::tick_index(session.world()), 0);

    session.update(step);
    assert_eq!(query::tick_index(session.world()), 1);
}

#[test]
fn slow_motion_stretches_the_cadence() {
    let mut session = session();
    session.set_slow_motion(3);

    session.update(Duration::from_millis(100));
    assert_eq!(query::tick_index(session.world()), 0);
    session.update(Duration::from_millis(50));
    assert_eq!(query::tick_index(session.world()), 1);
    assert_eq!(session.config().walk_period(), Duration::from_millis(150));
}

#[test]
fn missing_sounds_do_not_interrupt_movement() {
    let audio = RecordingAudio {
        fail: true,
        played: Vec::new(),
    };
    let mut session = session_with(SessionConfig::default(), audio);

    click(&mut session, Position::new(2, 1, 0), PointerButton::Primary);
    let events = run_ticks(&mut session, 9);

    assert!(events
        .iter()
        .any(|event| matches!(event, Event::FootstepPlayed { .. })));
    assert!(session.audio().played.is_empty());
    assert_eq!(ada(&session).position, Position::new(2, 1, 0));
}

#[test]
fn new_order_mid_walk_replans_from_the_destination() {
    let mut session = session();
    click(&mut session, Position::new(4, 1, 0), PointerButton::Primary);
    let _ = run_ticks(&mut session, 3);
    assert_eq!(ada(&session).walk_destination, Some(Position::new(2, 1, 0)));

    click(&mut session, Position::new(2, 3, 0), PointerButton::Primary);

    assert!(session.recent_events().contains(&Event::PathAssigned {
        unit: UnitId::new(0),
        steps: 2,
    }));
    let _ = run_ticks(&mut session, 40);
    assert_eq!(ada(&session).position, Position::new(2, 3, 0));
}

#[test]
fn unreachable_clicks_leave_the_unit_idle() {
    let mut session = session();

    click(&mut session, Position::new(3, 3, 1), PointerButton::Primary);

    assert_eq!(
        session.recent_events(),
        &[Event::PathCleared {
            unit: UnitId::new(0)
        }]
    );
    let _ = run_ticks(&mut session, 3);
    assert_eq!(ada(&session).position, Position::new(1, 1, 0));
}

#[test]
fn unit_up_climbs_the_ramp_and_follows_the_view() {
    let mut session = session();
    click(&mut session, Position::new(4, 4, 0), PointerButton::Primary);
    let _ = run_ticks(&mut session, 60);
    assert_eq!(ada(&session).position, Position::new(4, 4, 0));

    session.handle_input(Input::Button(ButtonAction::UnitUp));
    let _ = run_ticks(&mut session, 9);

    assert_eq!(ada(&session).position, Position::new(4, 4, 1));
    assert_eq!(session.view_elevation(), 1);
    assert_eq!(session.presentation().elevations.last(), Some(&1));
}

#[test]
fn map_level_buttons_clamp_to_the_battlefield() {
    let mut session = session();

    session.handle_input(Input::Button(ButtonAction::MapDown));
    assert_eq!(session.view_elevation(), 0);
    session.handle_input(Input::Button(ButtonAction::MapUp));
    session.handle_input(Input::Button(ButtonAction::MapUp));
    assert_eq!(session.view_elevation(), 1);
    session.handle_input(Input::Button(ButtonAction::MapDown));
    assert_eq!(session.view_elevation(), 0);
}

#[test]
fn reserve_buttons_form_a_radio_group() {
    let mut session = session();
    assert_eq!(session.reserve_mode(), ReserveMode::None);

    session.handle_input(Input::Button(ButtonAction::Reserve(ReserveMode::Aimed)));
    session.handle_input(Input::Button(ButtonAction::Reserve(ReserveMode::Snap)));

    assert_eq!(session.reserve_mode(), ReserveMode::Snap);
}

#[test]
fn abort_stops_the_session() {
    let mut session = session();
    click(&mut session, Position::new(3, 1, 0), PointerButton::Primary);

    session.handle_input(Input::Button(ButtonAction::Abort));
    let _ = run_ticks(&mut session, 5);
    click(&mut session, Position::new(5, 5, 0), PointerButton::Primary);

    assert!(session.is_aborted());
    assert_eq!(query::tick_index(session.world()), 0);
    assert_eq!(query::selected_unit(session.world()), Some(UnitId::new(0)));
}

#[test]
fn direct_commands_replace_the_queue() {
    let mut session = session();
    session.submit(Command::AssignPath {
        unit: UnitId::new(0),
        path: Path::from(vec![Direction::East, Direction::East, Direction::East]),
    });
    let _ = run_ticks(&mut session, 1);

    session.submit(Command::AssignPath {
        unit: UnitId::new(0),
        path: Path::from(vec![Direction::South]),
    });
    let _ = run_ticks(&mut session, 30);

    assert_eq!(ada(&session).position, Position::new(2, 2, 0));
}
