use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use cluedo::{Category, Game, Knowledge, PlayerSpec, SolveConfig, Status, Turn};
use log::{error, info};
use serde::Deserialize;
use strum::VariantArray;
use thiserror::Error;

/// Deduce who holds which Cluedo card from a recorded game.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON game file with `players`, optional `config` and `turns`.
    game: PathBuf,
    /// Wall-clock limit for the search, in seconds (0 for none).
    #[arg(long)]
    time_limit: Option<f64>,
    /// Stop after this many worlds.
    #[arg(long)]
    max_solutions: Option<usize>,
    /// Only show this party.
    #[arg(long)]
    party: Option<String>,
}

#[derive(Deserialize, Debug)]
struct GameFile {
    players: Vec<PlayerSpec>,
    #[serde(default)]
    config: SolveConfig,
    #[serde(default)]
    turns: Vec<Turn>,
}

#[derive(Error, Debug)]
enum CliError {
    #[error("cannot read game file: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed game file: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Game(#[from] cluedo::Error),
}

fn mark(status: Status) -> char {
    match status {
        Status::KnownTrue => '✓',
        Status::KnownFalse => '✗',
        Status::Unresolved => '–',
    }
}

fn render(category: Category, parties: &[(String, Knowledge)]) -> String {
    let width = category.cards().map(|card| card.name().len()).max().unwrap_or(0);
    let mut out = format!("{:width$}", category.to_string().to_uppercase());
    for (name, _) in parties {
        out.push_str(&format!(" {name:>8}"));
    }
    out.push('\n');

    for card in category.cards() {
        out.push_str(&format!("{:width$}", card.name()));
        for (_, knowledge) in parties {
            out.push_str(&format!(" {:>8}", mark(knowledge.status(card))));
        }
        out.push('\n');
    }
    out
}

fn run(args: Args) -> Result<(), CliError> {
    let file: GameFile = serde_json::from_str(&fs::read_to_string(&args.game)?)?;

    let mut config = file.config;
    if args.time_limit.is_some() {
        config.time_limit = args.time_limit;
    }
    if args.max_solutions.is_some() {
        config.max_solutions = args.max_solutions;
    }

    let mut game = Game::with_config(file.players, config)?;
    for turn in file.turns {
        game.record_turn(turn)?;
    }
    info!("{} turns recorded", game.history().len());

    let report = game.solve()?;
    println!("{} possible worlds ({:?}) in {:.2?}", report.solutions, report.completion, report.elapsed);
    if report.solutions == 0 {
        return Ok(());
    }

    let parties = match args.party {
        Some(party) => {
            let knowledge = game.knowledge(&party)?;
            vec![(party, knowledge)]
        }
        None => game.all_knowledge()?,
    };
    for category in Category::VARIANTS {
        println!("\n{}", render(*category, &parties));
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
