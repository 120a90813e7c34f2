//! Scenario files describing a starting field.
//!
//! A scenario is a JSON object:
//!
//! ```json
//! {
//!   "field": { "size": [10, 10] },
//!   "target": { "pos": [9, 6] },
//!   "smart robot": { "pos": [3, 3] },
//!   "stupid robot": { "pos": [1, 10] },
//!   "walls": [{ "pos": [6, 2], "direction": "north" }],
//!   "mires": [{ "pos": [4, 3] }]
//! }
//! ```
//!
//! `walls` and `mires` are optional. Geometry is only checked when the world
//! loads the resulting [`Layout`].

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use robot_chase_core::{CellPosition, Direction, Layout, LayoutError, MiddlePosition};
use serde::Deserialize;

/// Reasons a scenario could not be turned into a running game.
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    /// The scenario file could not be read.
    #[error("failed to read scenario {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// The scenario is not valid JSON, misses a required key or names an
    /// unknown direction.
    #[error("malformed scenario: {0}")]
    Parse(#[from] serde_json::Error),
    /// The world refused the described layout.
    #[error("scenario rejected: {0}")]
    Layout(#[from] LayoutError),
}

#[derive(Debug, Deserialize)]
struct ScenarioFile {
    field: FieldSpec,
    target: Placement,
    #[serde(rename = "smart robot")]
    smart_robot: Placement,
    #[serde(rename = "stupid robot")]
    stupid_robot: Placement,
    #[serde(default)]
    walls: Vec<WallSpec>,
    #[serde(default)]
    mires: Vec<Placement>,
}

#[derive(Debug, Deserialize)]
struct FieldSpec {
    size: [u32; 2],
}

#[derive(Debug, Deserialize)]
struct Placement {
    pos: [i32; 2],
}

impl Placement {
    fn cell(&self) -> CellPosition {
        CellPosition::new(self.pos[0], self.pos[1])
    }
}

#[derive(Debug, Deserialize)]
struct WallSpec {
    pos: [i32; 2],
    direction: Direction,
}

impl From<ScenarioFile> for Layout {
    fn from(file: ScenarioFile) -> Self {
        let [width, height] = file.field.size;
        Layout {
            width,
            height,
            target: file.target.cell(),
            smart_robot: file.smart_robot.cell(),
            stupid_robot: file.stupid_robot.cell(),
            walls: file
                .walls
                .iter()
                .map(|wall| {
                    MiddlePosition::new(wall.direction, CellPosition::new(wall.pos[0], wall.pos[1]))
                })
                .collect(),
            mires: file.mires.iter().map(Placement::cell).collect(),
        }
    }
}

/// Parses scenario JSON into a layout.
pub fn parse_layout(json: &str) -> Result<Layout, ScenarioError> {
    let file: ScenarioFile = serde_json::from_str(json)?;
    Ok(file.into())
}

/// Reads and parses a scenario file.
pub fn read_layout(path: &Path) -> Result<Layout, ScenarioError> {
    let json = fs::read_to_string(path).map_err(|source| ScenarioError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_layout(&json)
}

/// Field the stock game starts on.
#[must_use]
pub fn builtin_layout() -> Layout {
    let cell = CellPosition::new;
    let wall = |direction, x, y| MiddlePosition::new(direction, cell(x, y));
    Layout {
        width: 10,
        height: 10,
        target: cell(9, 6),
        smart_robot: cell(3, 3),
        stupid_robot: cell(1, 10),
        walls: vec![
            wall(Direction::North, 6, 2),
            wall(Direction::South, 7, 2),
            wall(Direction::South, 6, 2),
            wall(Direction::West, 6, 1),
            wall(Direction::West, 6, 2),
            wall(Direction::East, 6, 1),
            wall(Direction::East, 6, 2),
        ],
        mires: vec![cell(4, 3), cell(5, 3), cell(5, 4)],
    }
}
