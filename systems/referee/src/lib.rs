#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Referee system that detects the end of a game.

use log::debug;
use robot_chase_core::{Command, Event, GameOutcome, GamePhase, RefereeSnapshot};

/// Pure system that converts finished positions into game over commands.
///
/// The referee checks positions only at the end of a full turn, after a
/// season change and right after a game starts. A capture reported by the
/// world ends the game immediately and takes precedence over any other
/// outcome of the same turn.
#[derive(Debug, Default)]
pub struct Referee;

impl Referee {
    /// Creates a new referee.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Consumes world events and emits at most one finishing command.
    pub fn handle(
        &mut self,
        events: &[Event],
        snapshot: Option<RefereeSnapshot>,
        out: &mut Vec<Command>,
    ) {
        let Some(snapshot) = snapshot else {
            return;
        };
        if snapshot.phase != GamePhase::Running {
            return;
        }

        let caught = events
            .iter()
            .any(|event| matches!(event, Event::SmartRobotCaught { .. }));
        if caught {
            out.push(Command::FinishGame {
                outcome: GameOutcome::Caught,
            });
            return;
        }

        let checkpoint = events.iter().any(|event| {
            matches!(
                event,
                Event::GameStarted { .. } | Event::PursuerTurnEnded | Event::SeasonChanged { .. }
            )
        });
        if !checkpoint {
            return;
        }

        if let Some(outcome) = judge(&snapshot) {
            debug!("referee decided {outcome:?}");
            out.push(Command::FinishGame { outcome });
        }
    }
}

/// Outcome implied by the positions alone, if the game is over.
#[must_use]
pub fn judge(snapshot: &RefereeSnapshot) -> Option<GameOutcome> {
    if snapshot.smart_robot == snapshot.target {
        Some(GameOutcome::Won)
    } else if snapshot.smart_robot_in_mud {
        Some(GameOutcome::StuckInMud)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use robot_chase_core::CellPosition;

    fn snapshot(smart: (i32, i32), in_mud: bool) -> RefereeSnapshot {
        RefereeSnapshot {
            phase: GamePhase::Running,
            smart_robot: CellPosition::new(smart.0, smart.1),
            target: CellPosition::new(9, 6),
            smart_robot_in_mud: in_mud,
        }
    }

    #[test]
    fn reaching_the_target_wins_even_inside_mud() {
        assert_eq!(judge(&snapshot((9, 6), true)), Some(GameOutcome::Won));
        assert_eq!(judge(&snapshot((2, 2), true)), Some(GameOutcome::StuckInMud));
        assert_eq!(judge(&snapshot((2, 2), false)), None);
    }

    #[test]
    fn capture_beats_reaching_the_target() {
        let mut referee = Referee::new();
        let mut out = Vec::new();
        referee.handle(
            &[
                Event::SmartRobotCaught {
                    at: CellPosition::new(9, 6),
                },
                Event::PursuerTurnEnded,
            ],
            Some(snapshot((9, 6), false)),
            &mut out,
        );
        assert_eq!(
            out,
            vec![Command::FinishGame {
                outcome: GameOutcome::Caught
            }]
        );
    }

    #[test]
    fn positions_are_judged_only_at_checkpoints() {
        let mut referee = Referee::new();
        let mut out = Vec::new();
        referee.handle(
            &[Event::SmartRobotMoved {
                from: CellPosition::new(8, 6),
                to: CellPosition::new(9, 6),
            }],
            Some(snapshot((9, 6), false)),
            &mut out,
        );
        assert!(out.is_empty());

        referee.handle(&[Event::PursuerTurnEnded], Some(snapshot((9, 6), false)), &mut out);
        assert_eq!(
            out,
            vec![Command::FinishGame {
                outcome: GameOutcome::Won
            }]
        );
    }

    #[test]
    fn finished_games_are_left_alone() {
        let mut referee = Referee::new();
        let mut out = Vec::new();
        let mut finished = snapshot((9, 6), false);
        finished.phase = GamePhase::Finished(GameOutcome::StuckInMud);

        referee.handle(&[Event::PursuerTurnEnded], Some(finished), &mut out);
        referee.handle(&[Event::PursuerTurnEnded], None, &mut out);

        assert!(out.is_empty());
    }
}
