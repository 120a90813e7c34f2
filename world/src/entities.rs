//! Field occupants together with their placement and movement rules.

use robot_chase_core::{CellPosition, Direction, EntityKind, PlacementError, Position};

use crate::field::Field;

/// Capabilities shared by every kind of field occupant.
pub trait Occupant {
    /// Checks whether the occupant may be placed at `position` on `field`.
    fn check_placement(&self, field: &Field, position: Position) -> Result<(), PlacementError>;

    /// Lets the occupant of cell `at` decide where an object entering it
    /// while travelling in `direction` lands.
    ///
    /// `None` means the occupant does not influence movement.
    fn mediate_move(
        &self,
        _field: &Field,
        _at: CellPosition,
        _direction: Direction,
    ) -> Option<CellPosition> {
        None
    }
}

/// Cell the smart robot has to reach. It never blocks anything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Target;

impl Occupant for Target {
    fn check_placement(&self, _field: &Field, position: Position) -> Result<(), PlacementError> {
        position
            .as_cell()
            .map(|_| ())
            .ok_or(PlacementError::PositionMismatch)
    }
}

/// Player-controlled robot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SmartRobot;

impl Occupant for SmartRobot {
    fn check_placement(&self, field: &Field, position: Position) -> Result<(), PlacementError> {
        check_robot_placement(field, position)
    }
}

/// Autonomous pursuer together with its stuck-in-mire bookkeeping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StupidRobot {
    skip_turns: u8,
    stuck: bool,
    suspended: Option<u8>,
}

impl StupidRobot {
    /// Turns the robot still has to stand still.
    #[must_use]
    pub const fn skip_turns(&self) -> u8 {
        self.skip_turns
    }

    /// Reports whether the robot is currently held by an unfrozen mire.
    #[must_use]
    pub const fn is_stuck(&self) -> bool {
        self.stuck
    }

    /// Burns one skipped turn. Returns `false` when nothing was left to skip.
    pub(crate) fn consume_skip(&mut self) -> bool {
        if self.skip_turns == 0 {
            return false;
        }
        self.skip_turns -= 1;
        true
    }

    /// Records the outcome of the robot's own step.
    pub(crate) fn settle(&mut self, in_mud: bool, stuck_turns: u8) {
        self.suspended = None;
        self.stuck = in_mud;
        self.skip_turns = if in_mud { stuck_turns } else { 0 };
    }

    /// Re-reads the ground under the robot after the environment changed.
    ///
    /// A freeze suspends the remaining skip count and a thaw restores it, so
    /// influence followed by its cleanup leaves the counter untouched. Dry
    /// ground discards any suspended count, so mud that appears later sticks
    /// the robot for the full count.
    pub(crate) fn reevaluate(&mut self, footing: Footing, stuck_turns: u8) {
        match footing {
            Footing::Mud => {
                if !self.stuck {
                    self.skip_turns = self.suspended.take().unwrap_or(stuck_turns);
                    self.stuck = true;
                }
            }
            Footing::Ice => {
                if self.stuck {
                    self.suspended = Some(self.skip_turns);
                    self.skip_turns = 0;
                    self.stuck = false;
                }
            }
            Footing::Dry => {
                self.suspended = None;
                self.skip_turns = 0;
                self.stuck = false;
            }
        }
    }
}

/// Ground a robot stands on, as far as mires are concerned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Footing {
    /// No mire in the cell.
    Dry,
    /// A frozen mire.
    Ice,
    /// An unfrozen mire.
    Mud,
}

impl Footing {
    pub(crate) fn of(mire: Option<&Mire>) -> Self {
        match mire {
            None => Self::Dry,
            Some(mire) if mire.is_frozen() => Self::Ice,
            Some(_) => Self::Mud,
        }
    }
}

impl Occupant for StupidRobot {
    fn check_placement(&self, field: &Field, position: Position) -> Result<(), PlacementError> {
        check_robot_placement(field, position)
    }
}

/// Mud obstacle. Frozen mire behaves like ice.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Mire {
    frozen: bool,
}

impl Mire {
    /// Creates an unfrozen mire.
    #[must_use]
    pub const fn new() -> Self {
        Self { frozen: false }
    }

    /// Creates a mire that is already frozen.
    #[must_use]
    pub const fn frozen() -> Self {
        Self { frozen: true }
    }

    /// Reports whether the mire is frozen.
    #[must_use]
    pub const fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub(crate) fn freeze(&mut self) {
        self.frozen = true;
    }

    pub(crate) fn unfreeze(&mut self) {
        self.frozen = false;
    }
}

impl Occupant for Mire {
    fn check_placement(&self, field: &Field, position: Position) -> Result<(), PlacementError> {
        let cell = position.as_cell().ok_or(PlacementError::PositionMismatch)?;
        if field.mire_at(cell).is_some() {
            return Err(PlacementError::MireAlreadyPresent);
        }
        Ok(())
    }

    fn mediate_move(
        &self,
        field: &Field,
        at: CellPosition,
        direction: Direction,
    ) -> Option<CellPosition> {
        if !self.frozen {
            return Some(at);
        }

        // Slide across the contiguous run of mire ahead.
        let mut landing = at;
        loop {
            let next = landing.next(direction);
            if !field.is_move_possible(landing, direction) {
                break;
            }
            let Some(mire) = field.mire_at(next) else {
                break;
            };
            landing = next;
            if !mire.is_frozen() {
                break;
            }
        }
        Some(landing)
    }
}

/// Immovable barrier between two cells.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Wall;

impl Occupant for Wall {
    fn check_placement(&self, field: &Field, position: Position) -> Result<(), PlacementError> {
        if position.as_edge().is_none() {
            return Err(PlacementError::PositionMismatch);
        }
        if !field.is_pos_free(position) {
            return Err(PlacementError::Occupied);
        }
        Ok(())
    }
}

fn check_robot_placement(field: &Field, position: Position) -> Result<(), PlacementError> {
    if position.as_cell().is_none() {
        return Err(PlacementError::PositionMismatch);
    }
    if field
        .objects_at(position)
        .any(|(_, object)| object.kind().is_robot())
    {
        return Err(PlacementError::RobotAlreadyPresent);
    }
    Ok(())
}

/// Closed set of occupants stored by the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    /// The target cell marker.
    Target(Target),
    /// The player-controlled robot.
    SmartRobot(SmartRobot),
    /// The pursuer.
    StupidRobot(StupidRobot),
    /// A mire.
    Mire(Mire),
    /// A wall.
    Wall(Wall),
}

impl Entity {
    /// Kind tag of the occupant.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Target(_) => EntityKind::Target,
            Self::SmartRobot(_) => EntityKind::SmartRobot,
            Self::StupidRobot(_) => EntityKind::StupidRobot,
            Self::Mire(_) => EntityKind::Mire,
            Self::Wall(_) => EntityKind::Wall,
        }
    }

    /// Returns the mire data when the occupant is a mire.
    #[must_use]
    pub const fn as_mire(&self) -> Option<&Mire> {
        match self {
            Self::Mire(mire) => Some(mire),
            _ => None,
        }
    }

    /// Returns the pursuer data when the occupant is the stupid robot.
    #[must_use]
    pub const fn as_stupid_robot(&self) -> Option<&StupidRobot> {
        match self {
            Self::StupidRobot(robot) => Some(robot),
            _ => None,
        }
    }

    pub(crate) fn as_mire_mut(&mut self) -> Option<&mut Mire> {
        match self {
            Self::Mire(mire) => Some(mire),
            _ => None,
        }
    }

    pub(crate) fn as_stupid_robot_mut(&mut self) -> Option<&mut StupidRobot> {
        match self {
            Self::StupidRobot(robot) => Some(robot),
            _ => None,
        }
    }
}

impl Occupant for Entity {
    fn check_placement(&self, field: &Field, position: Position) -> Result<(), PlacementError> {
        match self {
            Self::Target(target) => target.check_placement(field, position),
            Self::SmartRobot(robot) => robot.check_placement(field, position),
            Self::StupidRobot(robot) => robot.check_placement(field, position),
            Self::Mire(mire) => mire.check_placement(field, position),
            Self::Wall(wall) => wall.check_placement(field, position),
        }
    }

    fn mediate_move(
        &self,
        field: &Field,
        at: CellPosition,
        direction: Direction,
    ) -> Option<CellPosition> {
        match self {
            Self::Mire(mire) => mire.mediate_move(field, at, direction),
            _ => None,
        }
    }
}
