#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Battle session controller.
//!
//! [`BattleSession`] turns pointer clicks and button presses into world
//! commands, runs the pathfinder for movement orders, drives the walk and
//! projectile cadences from a single external clock, and forwards world
//! events to the [`Presentation`] and [`Audio`] ports.

mod config;
mod ports;
mod timer;

pub use config::{
    ConfigError, SessionConfig, DEFAULT_PROJECTILE_PERIOD_MS, DEFAULT_WALK_PERIOD_MS,
};
pub use ports::{Audio, AudioError, Presentation, SoldierStatus};
pub use timer::CadenceTimer;

use std::time::Duration;

use battlescape_core::{Command, Event, Position, UnitId};
use battlescape_system_pathfinding::Pathfinding;
use battlescape_world::{self as world, query, World};

/// Pointer button that produced a map click.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Selects units and issues movement orders.
    Primary,
    /// Turns the selected unit toward the clicked tile.
    Secondary,
}

/// Time units held back for reaction fire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ReserveMode {
    /// Nothing is reserved.
    #[default]
    None,
    /// Enough for a snap shot.
    Snap,
    /// Enough for an aimed shot.
    Aimed,
    /// Enough for an automatic burst.
    Auto,
}

/// Buttons of the battlescape control bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    /// Orders the selected unit one level up.
    UnitUp,
    /// Orders the selected unit one level down.
    UnitDown,
    /// Shows the level above.
    MapUp,
    /// Shows the level below.
    MapDown,
    /// Centres the view on the selected unit.
    CenterOnSelected,
    /// Selects the next soldier and centres on it.
    NextSoldier,
    /// Chooses how many time units to hold back.
    ///
    /// The mode is recorded for the control bar only; movement does not
    /// consult it yet because reaction fire is not simulated.
    Reserve(ReserveMode),
    /// Leaves the battle; the session stops advancing.
    Abort,
}

/// Input delivered to the session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Input {
    /// Click on a tile of the battlefield.
    MapClick {
        /// Tile-space position under the pointer.
        position: Position,
        /// Button that was pressed.
        button: PointerButton,
    },
    /// Press of a control-bar button.
    Button(ButtonAction),
}

/// Controller that owns the world and talks to presentation and audio.
#[derive(Debug)]
pub struct BattleSession<P, A> {
    world: World,
    pathfinding: Pathfinding,
    presentation: P,
    audio: A,
    config: SessionConfig,
    walk_timer: CadenceTimer,
    projectile_timer: CadenceTimer,
    cursor_hidden: bool,
    view_elevation: i32,
    reserve: ReserveMode,
    aborted: bool,
    recent: Vec<Event>,
}

impl<P, A> BattleSession<P, A>
where
    P: Presentation,
    A: Audio,
{
    /// Creates a session around `world`.
    pub fn new(world: World, config: SessionConfig, presentation: P, audio: A) -> Self {
        Self {
            world,
            pathfinding: Pathfinding::new(),
            presentation,
            audio,
            config,
            walk_timer: CadenceTimer::new(config.walk_period()),
            projectile_timer: CadenceTimer::new(config.projectile_period()),
            cursor_hidden: false,
            view_elevation: 0,
            reserve: ReserveMode::None,
            aborted: false,
            recent: Vec::new(),
        }
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Presentation port.
    #[must_use]
    pub fn presentation(&self) -> &P {
        &self.presentation
    }

    /// Audio port.
    #[must_use]
    pub fn audio(&self) -> &A {
        &self.audio
    }

    /// Active cadence settings.
    #[must_use]
    pub fn config(&self) -> SessionConfig {
        self.config
    }

    /// Reports whether the path cursor is hidden.
    #[must_use]
    pub fn cursor_hidden(&self) -> bool {
        self.cursor_hidden
    }

    /// Level currently shown.
    #[must_use]
    pub fn view_elevation(&self) -> i32 {
        self.view_elevation
    }

    /// Selected reserve mode.
    #[must_use]
    pub fn reserve_mode(&self) -> ReserveMode {
        self.reserve
    }

    /// Reports whether the battle was abandoned.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Events produced by the most recent input, update or command.
    #[must_use]
    pub fn recent_events(&self) -> &[Event] {
        &self.recent
    }

    /// Multiplies both cadences by `factor`; zero is treated as one.
    pub fn set_slow_motion(&mut self, factor: u32) {
        self.config.slow_motion_factor = factor.max(1);
        self.walk_timer.set_period(self.config.walk_period());
        self.projectile_timer.set_period(self.config.projectile_period());
        tracing::debug!(factor = self.config.slow_motion_factor, "slow motion changed");
    }

    /// Applies a command directly, bypassing input handling.
    ///
    /// Used to set up the battlefield and its units.
    pub fn submit(&mut self, command: Command) {
        self.recent.clear();
        self.execute(command);
    }

    /// Advances both cadences by the time elapsed since the last frame.
    pub fn update(&mut self, elapsed: Duration) {
        self.recent.clear();
        if self.aborted {
            return;
        }

        if self.walk_timer.advance(elapsed) {
            self.execute(Command::AdvanceMovement);
        }
        if self.projectile_timer.advance(elapsed) {
            self.advance_projectiles();
        }
    }

    /// Handles a click or a button press.
    pub fn handle_input(&mut self, input: Input) {
        self.recent.clear();
        if self.aborted {
            return;
        }

        match input {
            Input::MapClick {
                position,
                button: PointerButton::Primary,
            } => match query::unit_at(&self.world, position) {
                Some(unit) => self.execute(Command::SelectUnit { unit }),
                None => {
                    if let Some(unit) = query::selected_unit(&self.world) {
                        self.order_move(unit, position);
                    }
                }
            },
            Input::MapClick {
                position,
                button: PointerButton::Secondary,
            } => {
                if let Some(unit) = query::selected_unit(&self.world) {
                    self.execute(Command::OrientUnit {
                        unit,
                        toward: position,
                    });
                }
            }
            Input::Button(action) => self.press(action),
        }
    }

    /// Status panel contents for `unit`.
    #[must_use]
    pub fn soldier_status(&self, unit: UnitId) -> Option<SoldierStatus> {
        query::unit(&self.world, unit).map(|snapshot| {
            let name = snapshot
                .name
                .clone()
                .unwrap_or_else(|| format!("Unit {}", snapshot.id.get()));
            SoldierStatus::new(name, snapshot.time_units, snapshot.energy, snapshot.health)
        })
    }

    fn press(&mut self, action: ButtonAction) {
        match action {
            ButtonAction::UnitUp => self.order_level_change(1),
            ButtonAction::UnitDown => self.order_level_change(-1),
            ButtonAction::MapUp => self.shift_view(1),
            ButtonAction::MapDown => self.shift_view(-1),
            ButtonAction::CenterOnSelected => self.center_on_selected(),
            ButtonAction::NextSoldier => {
                self.execute(Command::SelectNextSoldier);
                self.center_on_selected();
            }
            ButtonAction::Reserve(mode) => {
                self.reserve = mode;
                tracing::debug!(?mode, "reserve mode selected");
            }
            ButtonAction::Abort => {
                self.aborted = true;
                tracing::info!("battle aborted");
            }
        }
    }

    fn order_move(&mut self, unit: UnitId, target: Position) {
        let Some(mover) = query::mover(&self.world, unit) else {
            return;
        };
        let grid = query::tile_grid_view(&self.world);
        match self.pathfinding.calculate(grid, mover, target) {
            Ok(path) => self.execute(Command::AssignPath { unit, path }),
            Err(error) => {
                tracing::debug!(unit = unit.get(), %error, "movement order has no route");
                self.execute(Command::ClearPath { unit });
            }
        }
    }

    fn order_level_change(&mut self, delta: i32) {
        let Some(unit) = query::selected_unit(&self.world) else {
            return;
        };
        let Some(mover) = query::mover(&self.world, unit) else {
            return;
        };
        self.order_move(unit, mover.position + Position::new(0, 0, delta));
    }

    fn shift_view(&mut self, delta: i32) {
        let top = i32::try_from(query::grid_size(&self.world).height())
            .unwrap_or(i32::MAX)
            .saturating_sub(1)
            .max(0);
        let elevation = (self.view_elevation + delta).clamp(0, top);
        if elevation != self.view_elevation {
            self.view_elevation = elevation;
            self.presentation.set_view_elevation(elevation);
            self.presentation.request_redraw();
        }
    }

    fn center_on_selected(&mut self) {
        let Some(unit) = query::selected_unit(&self.world) else {
            return;
        };
        if let Some(snapshot) = query::unit(&self.world, unit) {
            self.presentation.center_view(snapshot.position);
        }
    }

    fn advance_projectiles(&mut self) {
        tracing::trace!("projectile cadence fired");
    }

    fn execute(&mut self, command: Command) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        for event in &events {
            self.dispatch(event);
        }
        self.recent.extend(events);
    }

    fn dispatch(&mut self, event: &Event) {
        let selected = query::selected_unit(&self.world);
        match *event {
            Event::BattlefieldConfigured { .. } => {
                self.view_elevation = 0;
                self.presentation.set_view_elevation(0);
                self.presentation.request_redraw();
            }
            Event::UnitSelected { unit } => self.refresh_status(unit),
            Event::WalkStarted { unit, .. } => {
                if !self.cursor_hidden {
                    self.cursor_hidden = true;
                    self.presentation.set_cursor_hidden(true);
                }
                if selected == Some(unit) {
                    self.refresh_status(unit);
                }
                self.presentation.request_redraw();
            }
            Event::UnitTurned { .. } | Event::WalkProgressed { .. } => {
                self.presentation.request_redraw();
            }
            Event::FootstepPlayed { unit, sound } => {
                if let Err(error) = self.audio.play(sound) {
                    tracing::warn!(unit = unit.get(), %error, "footstep sound skipped");
                }
            }
            Event::UnitArrived { unit, .. } => {
                if selected == Some(unit) {
                    self.refresh_status(unit);
                }
                self.presentation.request_redraw();
            }
            Event::ViewElevationChanged { unit, elevation } => {
                if selected == Some(unit) && elevation != self.view_elevation {
                    self.view_elevation = elevation;
                    self.presentation.set_view_elevation(elevation);
                }
            }
            Event::UnitIdle { .. } => {
                if self.cursor_hidden && !query::has_walking_units(&self.world) {
                    self.cursor_hidden = false;
                    self.presentation.set_cursor_hidden(false);
                }
            }
            Event::MovementAborted { unit, reason } => {
                tracing::debug!(unit = unit.get(), ?reason, "movement stopped");
            }
            Event::OrderRejected { unit, reason } => {
                tracing::debug!(unit = unit.get(), ?reason, "order rejected");
            }
            Event::SpawnRejected { position, reason } => {
                tracing::warn!(%position, ?reason, "spawn rejected");
            }
            Event::UnitSpawned { .. }
            | Event::PathAssigned { .. }
            | Event::PathCleared { .. }
            | Event::TurnStarted { .. } => {}
        }
    }

    fn refresh_status(&mut self, unit: UnitId) {
        if let Some(status) = self.soldier_status(unit) {
            self.presentation.show_status(&status);
        }
    }
}
