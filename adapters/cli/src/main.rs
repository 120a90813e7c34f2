#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays robot chase in the terminal.

mod board;
mod config;

use std::{io::BufRead, path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::info;
use robot_chase_core::{Direction, WELCOME_BANNER};
use robot_chase_model::{Config, Model};

use crate::config::FileConfig;

/// Smart and stupid robot chase.
#[derive(Debug, Parser)]
#[command(name = "robot-chase", version, about)]
struct Args {
    /// Scenario file in JSON. The built-in field is used when omitted.
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// TOML file overriding `season_interval_ms` and `stuck_turns`.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Moves to play as letters n, e, s, w. Read from stdin when omitted.
    #[arg(long)]
    moves: Option<String>,
    /// Simulated milliseconds that pass after every move.
    #[arg(long, default_value_t = 1_000)]
    tick_ms: u64,
}

/// Entry point for the robot chase command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut config = Config::default();
    if let Some(path) = &args.config {
        config = FileConfig::load(path)?.apply(config);
        info!("loaded config from {}", path.display());
    }

    let mut model = Model::new(config);
    println!("{WELCOME_BANNER}");
    match &args.scenario {
        Some(path) => model
            .start_from_path(path)
            .with_context(|| format!("failed to start scenario {}", path.display()))?,
        None => model.start().context("failed to start the built-in field")?,
    }
    report(&mut model);

    let tick = Duration::from_millis(args.tick_ms);
    match &args.moves {
        Some(moves) => play(&mut model, moves, tick)?,
        None => {
            for line in std::io::stdin().lock().lines() {
                let line = line.context("failed to read moves from stdin")?;
                play(&mut model, &line, tick)?;
                if model.is_finished() {
                    break;
                }
            }
        }
    }

    if !model.is_finished() {
        println!("Game abandoned.");
    }
    Ok(())
}

fn play(model: &mut Model, moves: &str, tick: Duration) -> Result<()> {
    for letter in moves.chars().filter(|letter| !letter.is_whitespace()) {
        if model.is_finished() {
            break;
        }
        model.make_move(parse_direction(letter)?);
        model.tick(tick);
        report(model);
    }
    Ok(())
}

fn parse_direction(letter: char) -> Result<Direction> {
    Ok(match letter.to_ascii_lowercase() {
        'n' => Direction::North,
        'e' => Direction::East,
        's' => Direction::South,
        'w' => Direction::West,
        other => bail!("unknown move `{other}`, expected one of n, e, s, w"),
    })
}

fn report(model: &mut Model) {
    for event in model.drain_events() {
        if let Some(line) = board::describe(&event) {
            println!("{line}");
        }
    }
    println!("{}", board::render(model.field()));
}
