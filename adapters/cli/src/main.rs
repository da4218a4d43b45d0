#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a battlescape scenario headless.

mod logging;
mod scenario;

use std::{collections::VecDeque, fmt, fs, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use battlescape_core::{Event, Position, UnitId};
use battlescape_session::{BattleSession, ButtonAction, Input, PointerButton, SessionConfig};
use battlescape_world::{query, World};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::{
    logging::{LoggingAudio, LoggingPresentation},
    scenario::{Scenario, BUILT_IN_SCENARIO},
};

const DEFAULT_LOG_FILTER: &str = "battlescape=info";

type Session = BattleSession<LoggingPresentation, LoggingAudio>;

/// Runs a battlescape scenario without a window and reports where every unit ends up.
#[derive(Parser, Debug)]
#[command(name = "battlescape")]
#[command(about = "Run a battlescape scenario headless")]
struct Args {
    /// Scenario file; the built-in skirmish is used when omitted
    #[arg(long)]
    scenario: Option<PathBuf>,

    /// Session config file with timer periods
    #[arg(long)]
    config: Option<PathBuf>,

    /// Tile to send the selected soldier to, as x,y,z; repeat for waypoints
    #[arg(long = "order", value_name = "X,Y,Z")]
    orders: Vec<Position>,

    /// Tile the selected soldier turns to face before any order
    #[arg(long, value_name = "X,Y,Z")]
    orient: Option<Position>,

    /// Tile of the unit to select instead of the first soldier
    #[arg(long, value_name = "X,Y,Z")]
    select: Option<Position>,

    /// Simulated time to run, in milliseconds
    #[arg(long, default_value_t = 10_000)]
    duration_ms: u64,

    /// Simulated frame length, in milliseconds
    #[arg(long, default_value_t = 16)]
    frame_ms: u64,

    /// Slow-motion factor overriding the config file
    #[arg(long)]
    slow_motion: Option<u32>,
}

/// Entry point for the battlescape command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = load_config(&args)?;
    let scenario = load_scenario(&args)?;
    tracing::info!(scenario = %scenario.name, "starting battle");

    let summary = run(&args, config, &scenario);
    print!("{summary}");
    Ok(())
}

fn load_config(args: &Args) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            SessionConfig::from_toml_str(&source)
                .with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => SessionConfig::default(),
    };

    if let Some(factor) = args.slow_motion {
        config.slow_motion_factor = factor;
    }
    config.validate().context("invalid session settings")?;
    Ok(config)
}

fn load_scenario(args: &Args) -> Result<Scenario> {
    match &args.scenario {
        Some(path) => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read scenario {}", path.display()))?;
            Scenario::parse(&source)
                .with_context(|| format!("failed to load scenario {}", path.display()))
        }
        None => Scenario::parse(BUILT_IN_SCENARIO).context("built-in scenario is invalid"),
    }
}

fn run(args: &Args, config: SessionConfig, scenario: &Scenario) -> Summary {
    let mut session = BattleSession::new(
        World::new(),
        config,
        LoggingPresentation::default(),
        LoggingAudio::default(),
    );
    for command in scenario.commands() {
        session.submit(command);
    }

    session.handle_input(Input::Button(ButtonAction::NextSoldier));
    if let Some(position) = args.select {
        click(&mut session, position, PointerButton::Primary);
    }
    if let Some(position) = args.orient {
        click(&mut session, position, PointerButton::Secondary);
    }

    let mut orders = OrderScript::new(args.orders.iter().copied());
    orders.issue_next(&mut session);

    let frame = Duration::from_millis(args.frame_ms.max(1));
    let total = Duration::from_millis(args.duration_ms);
    let mut elapsed = Duration::ZERO;
    while elapsed < total && !session.is_aborted() {
        session.update(frame);
        elapsed += frame;
        if orders.observe(session.recent_events()) {
            orders.issue_next(&mut session);
        }
    }

    Summary::capture(scenario, &session, elapsed, orders.remaining())
}

fn click(session: &mut Session, position: Position, button: PointerButton) {
    session.handle_input(Input::MapClick { position, button });
}

/// Waypoints issued one after another to the selected soldier.
#[derive(Debug)]
struct OrderScript {
    pending: VecDeque<Position>,
    waiting_on: Option<UnitId>,
}

impl OrderScript {
    fn new(orders: impl IntoIterator<Item = Position>) -> Self {
        Self {
            pending: orders.into_iter().collect(),
            waiting_on: None,
        }
    }

    fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Clicks the next waypoint; waypoints that produce no walk are skipped.
    fn issue_next(&mut self, session: &mut Session) {
        while let Some(target) = self.pending.pop_front() {
            click(session, target, PointerButton::Primary);
            let walking = session.recent_events().iter().find_map(|event| match event {
                Event::PathAssigned { unit, steps } if *steps > 0 => Some(*unit),
                _ => None,
            });
            if let Some(unit) = walking {
                tracing::info!(unit = unit.get(), %target, "order issued");
                self.waiting_on = Some(unit);
                return;
            }
            tracing::warn!(%target, "order produced no movement, skipping");
        }
    }

    /// Reports whether the unit walking the current waypoint became idle.
    fn observe(&mut self, events: &[Event]) -> bool {
        let Some(waiting_on) = self.waiting_on else {
            return false;
        };
        let idle = events
            .iter()
            .any(|event| matches!(event, Event::UnitIdle { unit } if *unit == waiting_on));
        if idle {
            self.waiting_on = None;
        }
        idle
    }
}

/// End-of-run report printed to stdout.
#[derive(Debug)]
struct Summary {
    scenario: String,
    width: u32,
    length: u32,
    height: u32,
    elapsed: Duration,
    ticks: u64,
    redraws: u64,
    sounds: u64,
    unissued_orders: usize,
    units: Vec<query::UnitSnapshot>,
}

impl Summary {
    fn capture(
        scenario: &Scenario,
        session: &Session,
        elapsed: Duration,
        unissued_orders: usize,
    ) -> Self {
        let size = scenario.size();
        Self {
            scenario: scenario.name.clone(),
            width: size.width(),
            length: size.length(),
            height: size.height(),
            elapsed,
            ticks: query::tick_index(session.world()),
            redraws: session.presentation().redraws(),
            sounds: session.audio().played(),
            unissued_orders,
            units: query::units(session.world()),
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} ({}x{}x{}) after {} ms: {} movement ticks, {} redraws, {} sounds",
            self.scenario,
            self.width,
            self.length,
            self.height,
            self.elapsed.as_millis(),
            self.ticks,
            self.redraws,
            self.sounds,
        )?;
        for unit in &self.units {
            writeln!(
                f,
                "  #{:<2} {:<14} at {} facing {:?}, {:?}, TU {}/{}, voxel {}",
                unit.id.get(),
                unit.name.as_deref().unwrap_or("-"),
                unit.position,
                unit.facing,
                unit.status,
                unit.time_units.current(),
                unit.time_units.max(),
                unit.voxel,
            )?;
        }
        if self.unissued_orders > 0 {
            writeln!(f, "  {} orders were not reached", self.unissued_orders)?;
        }
        Ok(())
    }
}
