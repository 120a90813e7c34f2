#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the robot chase engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters submit [`Command`] values
//! describing desired mutations, the world executes those commands via its
//! `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{
    fmt,
    hash::{Hash, Hasher},
    time::Duration,
};

use serde::{Deserialize, Serialize};

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Smart and stupid robot game.";

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Replaces the field contents with the provided layout and starts a game.
    LoadLayout {
        /// Complete description of the field and its occupants.
        layout: Layout,
    },
    /// Empties the field and returns the world to its unstarted state.
    ClearField,
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the player-controlled robot step in the given direction.
    MoveSmartRobot {
        /// Direction of travel for the attempted step.
        direction: Direction,
    },
    /// Resolves the pursuer's turn using a precomputed decision.
    StepPursuer {
        /// Decision produced by the pursuit system.
        step: PursuitStep,
    },
    /// Cleans the active season's influence and activates the next season.
    AdvanceSeason,
    /// Ends the running game with the provided outcome.
    FinishGame {
        /// Reason the game ended.
        outcome: GameOutcome,
    },
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a layout was loaded and a new game is running.
    GameStarted {
        /// Width of the loaded field in cells.
        width: u32,
        /// Height of the loaded field in cells.
        height: u32,
    },
    /// Reports that a layout could not be loaded; the field is left empty.
    LayoutRejected {
        /// Specific reason the load failed.
        reason: LayoutError,
    },
    /// Confirms that the field was emptied.
    FieldCleared,
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Confirms that the smart robot moved.
    SmartRobotMoved {
        /// Cell the robot occupied before moving.
        from: CellPosition,
        /// Cell the robot occupies after the move resolved.
        to: CellPosition,
    },
    /// Confirms that the stupid robot moved.
    StupidRobotMoved {
        /// Cell the robot occupied before moving.
        from: CellPosition,
        /// Cell the robot occupies after the move resolved.
        to: CellPosition,
    },
    /// Reports that the stupid robot sank into an unfrozen mire.
    StupidRobotStuck {
        /// Number of pursuer turns that will be skipped.
        turns: u8,
    },
    /// Reports that the stupid robot caught the smart robot.
    SmartRobotCaught {
        /// Cell where the capture happened.
        at: CellPosition,
    },
    /// Marks the end of the pursuer's turn, whatever it decided.
    PursuerTurnEnded,
    /// Announces that a new season became active.
    SeasonChanged {
        /// Season that is now active.
        season: SeasonKind,
    },
    /// Announces that the game finished.
    GameOver {
        /// Reason the game ended.
        outcome: GameOutcome,
    },
}

/// Cardinal compass directions on the field.
///
/// Internally each direction corresponds to an angle measured in degrees:
/// north is 0, west 90, south 180 and east 270. Rotations operate on that
/// angle modulo 360, so they are closed over the four variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// All directions in a fixed order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Angle of the direction in degrees.
    #[must_use]
    pub const fn angle(self) -> u16 {
        match self {
            Self::North => 0,
            Self::West => 90,
            Self::South => 180,
            Self::East => 270,
        }
    }

    const fn from_angle(angle: i32) -> Self {
        match angle.rem_euclid(360) {
            90 => Self::West,
            180 => Self::South,
            270 => Self::East,
            _ => Self::North,
        }
    }

    /// Direction obtained by turning a quarter clockwise.
    #[must_use]
    pub const fn clockwise(self) -> Self {
        Self::from_angle(self.angle() as i32 - 90)
    }

    /// Direction obtained by turning a quarter anticlockwise.
    #[must_use]
    pub const fn anticlockwise(self) -> Self {
        Self::from_angle(self.angle() as i32 + 90)
    }

    /// Direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        Self::from_angle(self.angle() as i32 + 180)
    }

    /// Reports whether `other` points the other way.
    #[must_use]
    pub fn is_opposite(self, other: Direction) -> bool {
        self.opposite() == other
    }

    /// Unit offset applied to a cell when stepping in this direction.
    ///
    /// The y axis grows downward, so north decreases `y`.
    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::South => (0, 1),
            Self::East => (1, 0),
            Self::West => (-1, 0),
        }
    }

    /// Lowercase token used by scenario files.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Location of a single grid cell.
///
/// Coordinates are 1-based on a valid field, but the type is signed so that
/// neighbours of border cells can be expressed and rejected by bounds checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellPosition {
    x: i32,
    y: i32,
}

impl CellPosition {
    /// Creates a new cell position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Column of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Row of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Adjacent cell in the provided direction.
    #[must_use]
    pub const fn next(self, direction: Direction) -> Self {
        let (dx, dy) = direction.offset();
        self.offset(dx, dy)
    }

    /// Cell displaced by an arbitrary offset.
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Direction leading from this cell to an orthogonally adjacent one.
    #[must_use]
    pub fn direction_to(self, other: CellPosition) -> Option<Direction> {
        Direction::ALL
            .into_iter()
            .find(|direction| self.next(*direction) == other)
    }
}

impl fmt::Display for CellPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Edge on the `direction` side of a cell.
///
/// Every physical edge has two spellings: `(d, c)` and
/// `(opposite(d), c.next(d))`. Equality and hashing treat both as the same
/// edge.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct MiddlePosition {
    direction: Direction,
    cell: CellPosition,
}

impl MiddlePosition {
    /// Creates the edge on the `direction` side of `cell`.
    #[must_use]
    pub const fn new(direction: Direction, cell: CellPosition) -> Self {
        Self { direction, cell }
    }

    /// Side of the anchor cell the edge lies on.
    #[must_use]
    pub const fn direction(&self) -> Direction {
        self.direction
    }

    /// Cell the edge was expressed from.
    #[must_use]
    pub const fn cell(&self) -> CellPosition {
        self.cell
    }

    /// Same edge expressed from the cell on the other side.
    #[must_use]
    pub const fn mirrored(self) -> Self {
        Self::new(self.direction.opposite(), self.cell.next(self.direction))
    }

    /// The two cells separated by the edge.
    #[must_use]
    pub const fn separates(self) -> (CellPosition, CellPosition) {
        (self.cell, self.cell.next(self.direction))
    }

    fn canonical(self) -> (Direction, CellPosition) {
        match self.direction {
            Direction::North | Direction::West => {
                let mirrored = self.mirrored();
                (mirrored.direction, mirrored.cell)
            }
            Direction::South | Direction::East => (self.direction, self.cell),
        }
    }
}

impl PartialEq for MiddlePosition {
    fn eq(&self, other: &Self) -> bool {
        self.canonical() == other.canonical()
    }
}

impl Eq for MiddlePosition {}

impl Hash for MiddlePosition {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for MiddlePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} side of {}", self.direction, self.cell)
    }
}

/// Position held by a field occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    /// Occupant sits inside a cell.
    Cell(CellPosition),
    /// Occupant sits on an edge between two cells.
    Edge(MiddlePosition),
}

impl Position {
    /// Returns the cell when the position is a cell.
    #[must_use]
    pub const fn as_cell(&self) -> Option<CellPosition> {
        match self {
            Self::Cell(cell) => Some(*cell),
            Self::Edge(_) => None,
        }
    }

    /// Returns the edge when the position is an edge.
    #[must_use]
    pub const fn as_edge(&self) -> Option<MiddlePosition> {
        match self {
            Self::Cell(_) => None,
            Self::Edge(edge) => Some(*edge),
        }
    }

    /// Cell the position is anchored to.
    #[must_use]
    pub const fn anchor(&self) -> CellPosition {
        match self {
            Self::Cell(cell) => *cell,
            Self::Edge(edge) => edge.cell(),
        }
    }
}

/// Stable handle assigned to a field occupant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Kinds of occupants that can be placed on the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    /// Cell the smart robot must reach.
    Target,
    /// Player-controlled robot.
    SmartRobot,
    /// Autonomous pursuer.
    StupidRobot,
    /// Mud obstacle that can freeze.
    Mire,
    /// Barrier occupying an edge.
    Wall,
}

impl EntityKind {
    /// Reports whether the kind is one of the two robots.
    #[must_use]
    pub const fn is_robot(self) -> bool {
        matches!(self, Self::SmartRobot | Self::StupidRobot)
    }

    /// Human readable name, matching the scenario file keys.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Target => "target",
            Self::SmartRobot => "smart robot",
            Self::StupidRobot => "stupid robot",
            Self::Mire => "mire",
            Self::Wall => "wall",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Reasons a placement request may be rejected by the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, thiserror::Error)]
pub enum PlacementError {
    /// Another occupant already holds exactly that position.
    #[error("position is already occupied")]
    Occupied,
    /// A mire already covers the cell.
    #[error("cell already holds a mire")]
    MireAlreadyPresent,
    /// A robot already stands in the cell.
    #[error("cell already holds a robot")]
    RobotAlreadyPresent,
    /// The occupant kind cannot live on the supplied kind of position.
    #[error("occupant cannot be placed on that kind of position")]
    PositionMismatch,
}

/// Reasons a layout load may fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// Both field dimensions must be at least two cells.
    #[error("field size {width}x{height} is invalid, both sides must be at least 2")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },
    /// An occupant lies outside the field.
    #[error("{kind} at {cell} lies outside the field")]
    OutOfBounds {
        /// Kind of the misplaced occupant.
        kind: EntityKind,
        /// Offending cell.
        cell: CellPosition,
    },
    /// The field refused to place an occupant.
    #[error("{kind} could not be placed: {reason}")]
    Rejected {
        /// Kind of the rejected occupant.
        kind: EntityKind,
        /// Reason reported by the field.
        reason: PlacementError,
    },
}

/// Complete, validated-on-load description of a game field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Number of columns.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
    /// Cell the smart robot must reach.
    pub target: CellPosition,
    /// Starting cell of the smart robot.
    pub smart_robot: CellPosition,
    /// Starting cell of the stupid robot.
    pub stupid_robot: CellPosition,
    /// Edges blocked by walls.
    pub walls: Vec<MiddlePosition>,
    /// Cells covered by mires.
    pub mires: Vec<CellPosition>,
}

/// Decision taken by the pursuer for one turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PursuitStep {
    /// The pursuer is stuck and burns one skipped turn.
    Skip,
    /// The pursuer captures the smart robot, stepping onto its cell.
    Capture,
    /// The smart robot is adjacent behind a wall; the pursuer waits.
    Hold,
    /// The pursuer tries to step one cell closer.
    Approach {
        /// Direction of the attempted step.
        direction: Direction,
    },
}

/// Immutable view of the two robots used by the pursuit system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PursuitSnapshot {
    /// Cell of the player-controlled robot.
    pub smart_robot: CellPosition,
    /// Cell of the pursuer.
    pub stupid_robot: CellPosition,
    /// Turns the pursuer still has to skip.
    pub skip_turns: u8,
}

/// Immutable view used to detect the end of a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefereeSnapshot {
    /// Current game phase.
    pub phase: GamePhase,
    /// Cell of the player-controlled robot.
    pub smart_robot: CellPosition,
    /// Cell of the target.
    pub target: CellPosition,
    /// Whether the smart robot stands in an unfrozen mire.
    pub smart_robot_in_mud: bool,
}

/// Reasons a game can end.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    /// The smart robot reached the target.
    Won,
    /// The smart robot walked into an unfrozen mire.
    StuckInMud,
    /// The stupid robot caught the smart robot.
    Caught,
}

impl GameOutcome {
    /// Message shown to the player.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Won => "You win! The smart robot reached the target.",
            Self::StuckInMud => "You lose! The smart robot got stuck in the mud.",
            Self::Caught => "You lose! The stupid robot caught the smart one.",
        }
    }
}

/// Lifecycle of a single game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GamePhase {
    /// No layout has been loaded.
    NotStarted,
    /// The game accepts moves and season ticks.
    Running,
    /// The game ended; everything but a restart is ignored.
    Finished(GameOutcome),
}

/// Visual appearance expressed as byte RGB components.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    red: u8,
    green: u8,
    blue: u8,
}

impl Rgb {
    /// Creates a new color from byte RGB components.
    #[must_use]
    pub const fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Red component of the color.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Green component of the color.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Blue component of the color.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }
}

/// Colors a renderer should use while a season is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Palette {
    /// Background of the field.
    pub field: Rgb,
    /// Grid lines.
    pub grid: Rgb,
    /// Robot and target glyphs.
    pub font: Rgb,
    /// Mire cells.
    pub mire: Rgb,
    /// Wall segments.
    pub wall: Rgb,
}

/// Weather accompanying a season.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Downfall {
    /// Rain makes every mire spread to a neighbouring cell.
    Rain,
    /// Snow is descriptive only.
    Snow,
}

impl Downfall {
    /// Human readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Rain => "rain",
            Self::Snow => "snow",
        }
    }
}

/// Seasons that cycle over the field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SeasonKind {
    /// Rain spreads the mires.
    Summer,
    /// Frost freezes the mires.
    Winter,
}

impl SeasonKind {
    /// Describes the season for presentation purposes.
    #[must_use]
    pub const fn descriptor(self) -> SeasonDescriptor {
        match self {
            Self::Summer => SeasonDescriptor {
                kind: self,
                name: "Summer",
                temperature: 25,
                downfall: &[Downfall::Rain],
                palette: Palette {
                    field: Rgb::from_rgb(175, 255, 175),
                    grid: Rgb::from_rgb(0, 255, 0),
                    font: Rgb::from_rgb(255, 0, 0),
                    mire: Rgb::from_rgb(139, 69, 19),
                    wall: Rgb::from_rgb(0, 0, 0),
                },
            },
            Self::Winter => SeasonDescriptor {
                kind: self,
                name: "Winter",
                temperature: -15,
                downfall: &[Downfall::Snow],
                palette: Palette {
                    field: Rgb::from_rgb(235, 245, 255),
                    grid: Rgb::from_rgb(150, 180, 230),
                    font: Rgb::from_rgb(200, 0, 0),
                    mire: Rgb::from_rgb(150, 200, 240),
                    wall: Rgb::from_rgb(40, 40, 60),
                },
            },
        }
    }
}

/// Presentation data describing a season.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SeasonDescriptor {
    /// Season being described.
    pub kind: SeasonKind,
    /// Display name.
    pub name: &'static str,
    /// Temperature in degrees Celsius.
    pub temperature: i32,
    /// Weather during the season.
    pub downfall: &'static [Downfall],
    /// Colors for rendering.
    pub palette: Palette,
}

impl SeasonDescriptor {
    /// Comma separated list of downfall names.
    #[must_use]
    pub fn downfall_description(&self) -> String {
        self.downfall
            .iter()
            .map(|downfall| downfall.name())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
