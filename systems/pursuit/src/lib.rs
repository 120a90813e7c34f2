#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure pursuit system that decides the stupid robot's turn.
//!
//! The pursuer acts exactly once for every move the smart robot makes. Its
//! decision is a greedy one-step heuristic with no randomness: capture when
//! the prey is reachable next door, otherwise close the gap along the column
//! first and the row second.

use log::debug;
use robot_chase_core::{Command, Direction, Event, MiddlePosition, PursuitSnapshot, PursuitStep};

/// Pure system that reacts to smart robot moves with pursuer decisions.
#[derive(Debug, Default)]
pub struct Pursuit;

impl Pursuit {
    /// Creates a new pursuit system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Consumes world events and emits one pursuer step per smart robot move.
    ///
    /// `has_wall` must report walls under either spelling of an edge.
    pub fn handle<F>(
        &mut self,
        events: &[Event],
        snapshot: Option<PursuitSnapshot>,
        has_wall: F,
        out: &mut Vec<Command>,
    ) where
        F: Fn(MiddlePosition) -> bool,
    {
        let Some(snapshot) = snapshot else {
            return;
        };

        for event in events {
            if let Event::SmartRobotMoved { .. } = event {
                let step = decide(&snapshot, &has_wall);
                debug!(
                    "pursuer at {} decided {step:?} toward {}",
                    snapshot.stupid_robot, snapshot.smart_robot
                );
                out.push(Command::StepPursuer { step });
            }
        }
    }
}

/// Decides the pursuer's next step from the current positions and walls.
#[must_use]
pub fn decide<F>(snapshot: &PursuitSnapshot, has_wall: F) -> PursuitStep
where
    F: Fn(MiddlePosition) -> bool,
{
    if snapshot.skip_turns > 0 {
        return PursuitStep::Skip;
    }

    let hunter = snapshot.stupid_robot;
    let prey = snapshot.smart_robot;
    if hunter == prey {
        return PursuitStep::Capture;
    }

    if let Some(direction) = hunter.direction_to(prey) {
        return if has_wall(MiddlePosition::new(direction, hunter)) {
            PursuitStep::Hold
        } else {
            PursuitStep::Capture
        };
    }

    let direction = if prey.x() == hunter.x() {
        if prey.y() < hunter.y() {
            Direction::North
        } else {
            Direction::South
        }
    } else if prey.x() > hunter.x() {
        Direction::East
    } else {
        Direction::West
    };
    PursuitStep::Approach { direction }
}
