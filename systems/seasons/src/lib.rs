#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Timer system that requests season changes at a fixed cadence.

use std::time::Duration;

use log::debug;
use robot_chase_core::{Command, Event};

/// Interval between season changes used by the stock game.
pub const DEFAULT_SEASON_INTERVAL: Duration = Duration::from_secs(5);

/// Configuration parameters required to construct the seasons system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    interval: Duration,
}

impl Config {
    /// Creates a new configuration using the provided season length.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Length of a single season.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_SEASON_INTERVAL)
    }
}

/// Pure system that turns elapsed time into season change commands.
///
/// The timer is armed by a game start and disarmed by game over or a field
/// clear. Disarming also drops any partially elapsed interval, so every game
/// starts its first season with a full interval.
#[derive(Debug)]
pub struct Seasons {
    interval: Duration,
    accumulator: Duration,
    armed: bool,
}

impl Seasons {
    /// Creates a disarmed seasons system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            interval: config.interval,
            accumulator: Duration::ZERO,
            armed: false,
        }
    }

    /// Arms the timer from a fresh interval.
    pub fn start(&mut self) {
        self.accumulator = Duration::ZERO;
        self.armed = true;
    }

    /// Disarms the timer. Stopping a stopped timer does nothing.
    pub fn stop(&mut self) {
        self.accumulator = Duration::ZERO;
        self.armed = false;
    }

    /// Reports whether the timer is armed.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        self.armed
    }

    /// Consumes world events and emits one season change per elapsed interval.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        for event in events {
            match event {
                Event::GameStarted { .. } => self.start(),
                Event::GameOver { .. } | Event::FieldCleared | Event::LayoutRejected { .. } => {
                    self.stop();
                }
                Event::TimeAdvanced { dt } if self.armed => {
                    self.accumulator = self.accumulator.saturating_add(*dt);
                    let changes = self.resolve_changes();
                    if changes > 0 {
                        debug!("{changes} season change(s) due");
                    }
                    for _ in 0..changes {
                        out.push(Command::AdvanceSeason);
                    }
                }
                _ => {}
            }
        }
    }

    fn resolve_changes(&mut self) -> usize {
        if self.interval.is_zero() {
            return 0;
        }

        let mut changes = 0;
        while self.accumulator >= self.interval {
            self.accumulator -= self.interval;
            changes += 1;
        }
        changes
    }
}

impl Default for Seasons {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
