#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the robot chase.
//!
//! The world owns the field and every occupant on it. It is mutated only
//! through [`apply`], which validates each [`Command`] against the current
//! state and reports what happened as [`Event`] values.

mod entities;
mod field;
mod seasons;

use log::{debug, info, warn};
use robot_chase_core::{
    Command, Direction, EntityId, Event, GamePhase, Layout, LayoutError, MiddlePosition, Position,
    PursuitStep, SeasonKind,
};

pub use entities::{Entity, Mire, Occupant, SmartRobot, StupidRobot, Target, Wall};
pub use field::{Field, FieldError, FieldObject};

use entities::Footing;

use seasons::SeasonCycle;

const DEFAULT_STUCK_TURNS: u8 = 3;

/// Tunable game rules.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rules {
    stuck_turns: u8,
    seasons: Vec<SeasonKind>,
}

impl Rules {
    /// Creates rules with the provided stuck duration and season order.
    #[must_use]
    pub fn new(stuck_turns: u8, seasons: Vec<SeasonKind>) -> Self {
        Self {
            stuck_turns,
            seasons,
        }
    }

    /// Pursuer turns skipped after sinking into an unfrozen mire.
    #[must_use]
    pub const fn stuck_turns(&self) -> u8 {
        self.stuck_turns
    }

    /// Order in which seasons cycle, starting from the first entry.
    #[must_use]
    pub fn seasons(&self) -> &[SeasonKind] {
        &self.seasons
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new(
            DEFAULT_STUCK_TURNS,
            vec![SeasonKind::Summer, SeasonKind::Winter],
        )
    }
}

/// Handles of the three unique occupants of a running game.
#[derive(Clone, Copy, Debug)]
struct Roster {
    target: EntityId,
    smart_robot: EntityId,
    stupid_robot: EntityId,
}

/// Represents the authoritative robot chase world state.
#[derive(Debug)]
pub struct World {
    field: Field,
    rules: Rules,
    roster: Option<Roster>,
    phase: GamePhase,
    seasons: SeasonCycle,
}

impl World {
    /// Creates an empty world using the default rules.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(Rules::default())
    }

    /// Creates an empty world using the provided rules.
    #[must_use]
    pub fn with_rules(rules: Rules) -> Self {
        let seasons = SeasonCycle::new(rules.seasons());
        Self {
            field: Field::default(),
            rules,
            roster: None,
            phase: GamePhase::NotStarted,
            seasons,
        }
    }

    fn reset(&mut self) {
        self.field.clear();
        self.roster = None;
        self.phase = GamePhase::NotStarted;
        self.seasons.reset();
    }

    fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    fn load(&mut self, layout: &Layout) -> Result<Roster, LayoutError> {
        self.field
            .set_size(layout.width, layout.height)
            .map_err(|_| LayoutError::InvalidDimensions {
                width: layout.width,
                height: layout.height,
            })?;

        let target = self.place(Position::Cell(layout.target), Entity::Target(Target))?;
        let smart_robot =
            self.place(Position::Cell(layout.smart_robot), Entity::SmartRobot(SmartRobot))?;
        let stupid_robot = self.place(
            Position::Cell(layout.stupid_robot),
            Entity::StupidRobot(StupidRobot::default()),
        )?;
        for wall in &layout.walls {
            let _ = self.place(Position::Edge(*wall), Entity::Wall(Wall))?;
        }
        for mire in &layout.mires {
            let _ = self.place(Position::Cell(*mire), Entity::Mire(Mire::new()))?;
        }

        Ok(Roster {
            target,
            smart_robot,
            stupid_robot,
        })
    }

    fn place(&mut self, position: Position, entity: Entity) -> Result<EntityId, LayoutError> {
        let kind = entity.kind();
        let anchor = position.anchor();
        if !self.field.contains(anchor) {
            return Err(LayoutError::OutOfBounds { kind, cell: anchor });
        }
        self.field
            .add_object(position, entity)
            .map_err(|reason| LayoutError::Rejected { kind, reason })
    }

    fn pursuer_mut(&mut self) -> Option<&mut StupidRobot> {
        let id = self.roster?.stupid_robot;
        self.field
            .entity_mut(id)
            .and_then(Entity::as_stupid_robot_mut)
    }

    fn pursuer(&self) -> Option<&StupidRobot> {
        let id = self.roster?.stupid_robot;
        self.field
            .object(id)
            .and_then(|object| object.entity().as_stupid_robot())
    }

    fn reevaluate_pursuer(&mut self) {
        let Some(roster) = self.roster else {
            return;
        };
        let footing = Footing::of(
            self.field
                .cell_of(roster.stupid_robot)
                .and_then(|cell| self.field.mire_at(cell)),
        );
        let stuck_turns = self.rules.stuck_turns();
        if let Some(pursuer) = self.pursuer_mut() {
            pursuer.reevaluate(footing, stuck_turns);
        }
    }

    fn move_smart_robot(&mut self, direction: Direction, out_events: &mut Vec<Event>) {
        let Some(roster) = self.roster else {
            return;
        };
        let Some(from) = self.field.cell_of(roster.smart_robot) else {
            return;
        };
        if !self.field.is_move_possible(from, direction) {
            debug!("smart robot cannot move {direction} from {from}");
            return;
        }
        if let Some(to) = self.field.move_object(roster.smart_robot, direction) {
            debug!("smart robot moved {from} -> {to}");
            out_events.push(Event::SmartRobotMoved { from, to });
        }
    }

    fn step_pursuer(&mut self, step: PursuitStep, out_events: &mut Vec<Event>) {
        let Some(roster) = self.roster else {
            return;
        };
        let (Some(from), Some(prey)) = (
            self.field.cell_of(roster.stupid_robot),
            self.field.cell_of(roster.smart_robot),
        ) else {
            return;
        };

        match step {
            PursuitStep::Skip => {
                let skipped = self.pursuer_mut().is_some_and(StupidRobot::consume_skip);
                debug!("stupid robot skipped its turn: {skipped}");
            }
            PursuitStep::Capture => {
                let reachable = from == prey
                    || from.direction_to(prey).is_some_and(|direction| {
                        self.field
                            .wall_at(MiddlePosition::new(direction, from))
                            .is_none()
                    });
                if !reachable {
                    debug!("capture from {from} toward {prey} refused");
                } else {
                    if from != prey && self.field.relocate(roster.stupid_robot, prey) {
                        out_events.push(Event::StupidRobotMoved { from, to: prey });
                    }
                    info!("stupid robot caught the smart robot at {prey}");
                    out_events.push(Event::SmartRobotCaught { at: prey });
                }
            }
            PursuitStep::Hold => debug!("stupid robot holds behind a wall at {from}"),
            PursuitStep::Approach { direction } => {
                if !self.field.is_move_possible(from, direction) {
                    debug!("stupid robot blocked moving {direction} from {from}");
                } else if let Some(to) = self.field.move_object(roster.stupid_robot, direction) {
                    out_events.push(Event::StupidRobotMoved { from, to });
                    let in_mud = self.field.is_mud(to);
                    let stuck_turns = self.rules.stuck_turns();
                    if let Some(pursuer) = self.pursuer_mut() {
                        pursuer.settle(in_mud, stuck_turns);
                    }
                    if in_mud {
                        info!("stupid robot stuck in mire at {to} for {stuck_turns} turns");
                        out_events.push(Event::StupidRobotStuck { turns: stuck_turns });
                    }
                }
            }
        }

        out_events.push(Event::PursuerTurnEnded);
    }

    fn advance_season(&mut self, out_events: &mut Vec<Event>) {
        self.seasons.clean_active(&mut self.field);
        self.reevaluate_pursuer();
        let season = self.seasons.rotate();
        self.seasons.influence_active(&mut self.field);
        self.reevaluate_pursuer();
        info!("season changed to {}", season.descriptor().name);
        out_events.push(Event::SeasonChanged { season });
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
///
/// Commands other than layout loads and clears are ignored unless a game is
/// running.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::LoadLayout { layout } => {
            world.reset();
            match world.load(&layout) {
                Ok(roster) => {
                    world.roster = Some(roster);
                    world.phase = GamePhase::Running;
                    world.reevaluate_pursuer();
                    info!("game started on a {}x{} field", layout.width, layout.height);
                    out_events.push(Event::GameStarted {
                        width: layout.width,
                        height: layout.height,
                    });
                }
                Err(reason) => {
                    world.reset();
                    warn!("layout rejected: {reason}");
                    out_events.push(Event::LayoutRejected { reason });
                }
            }
        }
        Command::ClearField => {
            world.reset();
            out_events.push(Event::FieldCleared);
        }
        Command::Tick { dt } => {
            if world.is_running() {
                out_events.push(Event::TimeAdvanced { dt });
            }
        }
        Command::MoveSmartRobot { direction } => {
            if world.is_running() {
                world.move_smart_robot(direction, out_events);
            }
        }
        Command::StepPursuer { step } => {
            if world.is_running() {
                world.step_pursuer(step, out_events);
            }
        }
        Command::AdvanceSeason => {
            if world.is_running() {
                world.advance_season(out_events);
            }
        }
        Command::FinishGame { outcome } => {
            if world.is_running() {
                world.phase = GamePhase::Finished(outcome);
                world.seasons.rewind();
                info!("game over: {}", outcome.message());
                out_events.push(Event::GameOver { outcome });
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Field, Rules, World};
    use robot_chase_core::{
        CellPosition, GamePhase, MiddlePosition, PursuitSnapshot, RefereeSnapshot, SeasonKind,
    };

    /// Provides read-only access to the field and its occupants.
    #[must_use]
    pub fn field(world: &World) -> &Field {
        &world.field
    }

    /// Lifecycle phase of the current game.
    #[must_use]
    pub fn phase(world: &World) -> GamePhase {
        world.phase
    }

    /// Rules the world was configured with.
    #[must_use]
    pub fn rules(world: &World) -> &Rules {
        &world.rules
    }

    /// Season whose influence currently applies to the field.
    #[must_use]
    pub fn active_season(world: &World) -> SeasonKind {
        world.seasons.active()
    }

    /// Cell of the smart robot, if a game was loaded.
    #[must_use]
    pub fn smart_robot(world: &World) -> Option<CellPosition> {
        world
            .roster
            .and_then(|roster| world.field.cell_of(roster.smart_robot))
    }

    /// Cell of the stupid robot, if a game was loaded.
    #[must_use]
    pub fn stupid_robot(world: &World) -> Option<CellPosition> {
        world
            .roster
            .and_then(|roster| world.field.cell_of(roster.stupid_robot))
    }

    /// Cell of the target, if a game was loaded.
    #[must_use]
    pub fn target(world: &World) -> Option<CellPosition> {
        world
            .roster
            .and_then(|roster| world.field.cell_of(roster.target))
    }

    /// Turns the stupid robot still has to skip.
    #[must_use]
    pub fn skip_turns(world: &World) -> u8 {
        world.pursuer().map_or(0, |pursuer| pursuer.skip_turns())
    }

    /// Reports whether a wall occupies the edge, under either spelling.
    #[must_use]
    pub fn has_wall(world: &World, edge: MiddlePosition) -> bool {
        world.field.wall_at(edge).is_some()
    }

    /// Captures the state the pursuit system decides from.
    #[must_use]
    pub fn pursuit_snapshot(world: &World) -> Option<PursuitSnapshot> {
        Some(PursuitSnapshot {
            smart_robot: smart_robot(world)?,
            stupid_robot: stupid_robot(world)?,
            skip_turns: skip_turns(world),
        })
    }

    /// Captures the state the referee decides from.
    #[must_use]
    pub fn referee_snapshot(world: &World) -> Option<RefereeSnapshot> {
        let smart_robot = smart_robot(world)?;
        Some(RefereeSnapshot {
            phase: world.phase,
            smart_robot,
            target: target(world)?,
            smart_robot_in_mud: world.field.is_mud(smart_robot),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robot_chase_core::{CellPosition, GameOutcome};

    fn layout() -> Layout {
        Layout {
            width: 6,
            height: 6,
            target: CellPosition::new(6, 6),
            smart_robot: CellPosition::new(3, 4),
            stupid_robot: CellPosition::new(3, 2),
            walls: vec![MiddlePosition::new(Direction::North, CellPosition::new(2, 2))],
            mires: vec![CellPosition::new(3, 3)],
        }
    }

    fn started() -> World {
        let mut world = World::new();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::LoadLayout { layout: layout() },
            &mut events,
        );
        assert_eq!(events, vec![Event::GameStarted { width: 6, height: 6 }]);
        world
    }

    #[test]
    fn pursuer_sinks_into_unfrozen_mire() {
        let mut world = started();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::StepPursuer {
                step: PursuitStep::Approach {
                    direction: Direction::South,
                },
            },
            &mut events,
        );

        assert_eq!(
            events,
            vec![
                Event::StupidRobotMoved {
                    from: CellPosition::new(3, 2),
                    to: CellPosition::new(3, 3),
                },
                Event::StupidRobotStuck { turns: 3 },
                Event::PursuerTurnEnded,
            ]
        );
        assert_eq!(query::skip_turns(&world), 3);
    }

    #[test]
    fn winter_suspends_and_summer_restores_skip_turns() {
        let mut world = started();
        let mut events = Vec::new();
        for command in [
            Command::StepPursuer {
                step: PursuitStep::Approach {
                    direction: Direction::South,
                },
            },
            Command::StepPursuer {
                step: PursuitStep::Skip,
            },
        ] {
            apply(&mut world, command, &mut events);
        }
        assert_eq!(query::skip_turns(&world), 2);

        apply(&mut world, Command::AdvanceSeason, &mut events);
        assert_eq!(query::active_season(&world), SeasonKind::Winter);
        assert_eq!(query::skip_turns(&world), 0);

        apply(&mut world, Command::AdvanceSeason, &mut events);
        assert_eq!(query::active_season(&world), SeasonKind::Summer);
        assert_eq!(query::skip_turns(&world), 2);
    }

    #[test]
    fn capture_through_a_wall_is_refused() {
        let mut world = World::new();
        let mut events = Vec::new();
        let mut walled = layout();
        walled.mires.clear();
        walled.stupid_robot = CellPosition::new(3, 3);
        walled
            .walls
            .push(MiddlePosition::new(Direction::South, CellPosition::new(3, 3)));
        apply(&mut world, Command::LoadLayout { layout: walled }, &mut events);
        events.clear();

        apply(
            &mut world,
            Command::StepPursuer {
                step: PursuitStep::Capture,
            },
            &mut events,
        );

        assert_eq!(events, vec![Event::PursuerTurnEnded]);
        assert_eq!(query::stupid_robot(&world), Some(CellPosition::new(3, 3)));
    }

    #[test]
    fn finished_games_ignore_moves() {
        let mut world = started();
        let mut events = Vec::new();
        apply(
            &mut world,
            Command::FinishGame {
                outcome: GameOutcome::Caught,
            },
            &mut events,
        );
        events.clear();

        apply(
            &mut world,
            Command::MoveSmartRobot {
                direction: Direction::East,
            },
            &mut events,
        );
        apply(&mut world, Command::AdvanceSeason, &mut events);

        assert!(events.is_empty());
        assert_eq!(query::smart_robot(&world), Some(CellPosition::new(3, 4)));
        assert_eq!(
            query::phase(&world),
            GamePhase::Finished(GameOutcome::Caught)
        );
    }
}
