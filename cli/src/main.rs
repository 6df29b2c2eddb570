use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::Parser;
use sapper_core::{Difficulty, GameState};

use command::Command;

mod command;
mod snapshot;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// beginner, intermediate, expert or custom:ROWSxCOLS:MINES
    #[arg(short, long, default_value_t = Difficulty::Beginner)]
    difficulty: Difficulty,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the state as JSON instead of a text grid
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = args.difficulty.config();
    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("difficulty: {}, seed: {}", args.difficulty, seed);

    let mut state = GameState::new(config, seed);
    let mut out = io::stdout().lock();
    print_state(&mut out, &state, args.json)?;

    for line in io::stdin().lock().lines() {
        let line = line.context("Could not read command")?;
        if line.trim().is_empty() {
            continue;
        }

        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(err) => {
                writeln!(out, "error: {err}")?;
                continue;
            }
        };

        let updated = match command {
            Command::Reveal(coords) => {
                let outcome = state.reveal(coords);
                log::info!("reveal {:?}: {:?}", coords, outcome);
                if outcome.is_final() {
                    log::info!("game over after {} moves", state.move_count());
                }
                outcome.has_update()
            }
            Command::Flag(coords) => {
                let outcome = state.toggle_flag(coords);
                log::info!("flag {:?}: {:?}", coords, outcome);
                outcome.has_update()
            }
            Command::NewGame => {
                state.reset(config);
                log::info!("new game, seed: {}", state.seed());
                true
            }
            Command::Quit => break,
        };

        if updated {
            print_state(&mut out, &state, args.json)?;
        } else {
            writeln!(out, "no change")?;
        }
    }

    Ok(())
}

fn print_state(out: &mut impl Write, state: &GameState, json: bool) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer(&mut *out, &snapshot::to_json(state))
            .context("Could not encode state")?;
        writeln!(out)?;
    } else {
        snapshot::write_text(out, state)?;
    }
    out.flush()?;
    Ok(())
}
