#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Game orchestration for the robot chase.
//!
//! [`Model`] owns the world and every system. Each external input (a player
//! move or elapsed time) is applied to the world and the resulting events are
//! fed to the systems depth first until no system has anything left to say.
//! A player move therefore always resolves as: smart robot step, pursuer
//! step, game over check. Every event the world emitted is queued for
//! adapters to drain.

mod scenario;

use std::{collections::VecDeque, path::Path, time::Duration};

use log::info;
use robot_chase_core::{
    CellPosition, Command, Direction, Event, GameOutcome, GamePhase, Layout, SeasonDescriptor,
    SeasonKind,
};
use robot_chase_system_pursuit::Pursuit;
use robot_chase_system_referee::Referee;
use robot_chase_system_seasons::{self as seasons, Seasons};
use robot_chase_world::{self as world, query, Field, Rules, World};

pub use scenario::{builtin_layout, parse_layout, read_layout, ScenarioError};

const DEFAULT_STUCK_TURNS: u8 = 3;

/// Tunables for a [`Model`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    season_interval: Duration,
    stuck_turns: u8,
    seasons: Vec<SeasonKind>,
}

impl Config {
    /// Replaces the length of a season.
    #[must_use]
    pub fn with_season_interval(mut self, interval: Duration) -> Self {
        self.season_interval = interval;
        self
    }

    /// Replaces the number of pursuer turns lost in an unfrozen mire.
    #[must_use]
    pub fn with_stuck_turns(mut self, turns: u8) -> Self {
        self.stuck_turns = turns;
        self
    }

    /// Replaces the season order.
    #[must_use]
    pub fn with_seasons(mut self, seasons: Vec<SeasonKind>) -> Self {
        self.seasons = seasons;
        self
    }

    /// Length of a season.
    #[must_use]
    pub const fn season_interval(&self) -> Duration {
        self.season_interval
    }

    /// Pursuer turns lost in an unfrozen mire.
    #[must_use]
    pub const fn stuck_turns(&self) -> u8 {
        self.stuck_turns
    }

    /// Season order, starting with the season active when a game begins.
    #[must_use]
    pub fn seasons(&self) -> &[SeasonKind] {
        &self.seasons
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            season_interval: seasons::DEFAULT_SEASON_INTERVAL,
            stuck_turns: DEFAULT_STUCK_TURNS,
            seasons: vec![SeasonKind::Summer, SeasonKind::Winter],
        }
    }
}

/// One game of robot chase together with the systems driving it.
#[derive(Debug)]
pub struct Model {
    world: World,
    pursuit: Pursuit,
    seasons: Seasons,
    referee: Referee,
    outbox: VecDeque<Event>,
}

impl Model {
    /// Creates a model with an empty, unstarted field.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let rules = Rules::new(config.stuck_turns, config.seasons.clone());
        Self {
            world: World::with_rules(rules),
            pursuit: Pursuit::new(),
            seasons: Seasons::new(seasons::Config::new(config.season_interval)),
            referee: Referee::new(),
            outbox: VecDeque::new(),
        }
    }

    /// Starts a new game on the built-in field.
    pub fn start(&mut self) -> Result<(), ScenarioError> {
        self.start_with_layout(builtin_layout())
    }

    /// Starts a new game from a scenario file.
    ///
    /// On failure the field is left empty and the model unstarted.
    pub fn start_from_path(&mut self, path: &Path) -> Result<(), ScenarioError> {
        match read_layout(path) {
            Ok(layout) => self.start_with_layout(layout),
            Err(error) => {
                self.dispatch(Command::ClearField);
                Err(error)
            }
        }
    }

    /// Starts a new game from scenario JSON.
    pub fn start_from_str(&mut self, json: &str) -> Result<(), ScenarioError> {
        match parse_layout(json) {
            Ok(layout) => self.start_with_layout(layout),
            Err(error) => {
                self.dispatch(Command::ClearField);
                Err(error)
            }
        }
    }

    /// Starts a new game from an explicit layout.
    pub fn start_with_layout(&mut self, layout: Layout) -> Result<(), ScenarioError> {
        let emitted = self.outbox.len();
        self.dispatch(Command::LoadLayout { layout });

        let rejection = self.outbox.iter().skip(emitted).find_map(|event| match event {
            Event::LayoutRejected { reason } => Some(*reason),
            _ => None,
        });
        match rejection {
            Some(reason) => Err(ScenarioError::Layout(reason)),
            None => {
                info!("new game started");
                Ok(())
            }
        }
    }

    /// Asks the smart robot to step in `direction`.
    ///
    /// Illegal moves and moves after the game ended change nothing.
    pub fn make_move(&mut self, direction: Direction) {
        self.dispatch(Command::MoveSmartRobot { direction });
    }

    /// Advances the season timer by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        self.dispatch(Command::Tick { dt });
    }

    /// Lifecycle phase of the current game.
    #[must_use]
    pub fn phase(&self) -> GamePhase {
        query::phase(&self.world)
    }

    /// Outcome of the game once it finished.
    #[must_use]
    pub fn outcome(&self) -> Option<GameOutcome> {
        match self.phase() {
            GamePhase::Finished(outcome) => Some(outcome),
            GamePhase::NotStarted | GamePhase::Running => None,
        }
    }

    /// Reports whether the game ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.outcome().is_some()
    }

    /// Read-only access to the field.
    #[must_use]
    pub fn field(&self) -> &Field {
        query::field(&self.world)
    }

    /// Read-only access to the world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Presentation data for the active season.
    #[must_use]
    pub fn active_season(&self) -> SeasonDescriptor {
        query::active_season(&self.world).descriptor()
    }

    /// Cell of the smart robot while a game is loaded.
    #[must_use]
    pub fn smart_robot(&self) -> Option<CellPosition> {
        query::smart_robot(&self.world)
    }

    /// Cell of the stupid robot while a game is loaded.
    #[must_use]
    pub fn stupid_robot(&self) -> Option<CellPosition> {
        query::stupid_robot(&self.world)
    }

    /// Cell of the target while a game is loaded.
    #[must_use]
    pub fn target(&self) -> Option<CellPosition> {
        query::target(&self.world)
    }

    /// Reports whether the season timer is armed.
    #[must_use]
    pub fn seasons_running(&self) -> bool {
        self.seasons.is_running()
    }

    /// Removes and returns every event emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.outbox.drain(..).collect()
    }

    fn dispatch(&mut self, command: Command) {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        if events.is_empty() {
            return;
        }
        self.outbox.extend(events.iter().cloned());

        let mut commands = Vec::new();
        self.pursuit.handle(
            &events,
            query::pursuit_snapshot(&self.world),
            |edge| query::has_wall(&self.world, edge),
            &mut commands,
        );
        self.seasons.handle(&events, &mut commands);
        self.referee
            .handle(&events, query::referee_snapshot(&self.world), &mut commands);

        for command in commands {
            self.dispatch(command);
        }
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
