//! Command-line driver for the VGC Swiss tournament engine.
//!
//! Every command reads a JSON tournament snapshot, applies one operation
//! and writes the next snapshot, so an event can be run from a shell one
//! step at a time.

mod commands;
mod config;
mod logging;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Error, bail};
use chrono::{DateTime, Utc};
use pico_args::Arguments;
use serde::Serialize;
use vgc_swiss::drops::DropTiming;
use vgc_swiss::schedule::RoundTiming;
use vgc_swiss::{MatchResultData, TournamentFormat, TournamentSnapshot, UuidIds};

use commands::PlayerEntry;
use config::{CliConfig, OutputFormat};

const HELP: &str = "\
Run a Swiss tournament with a top cut from the command line

USAGE:
  vs_cli <COMMAND> [OPTIONS]

COMMANDS:
  init      --roster FILE --id NAME [--format F]   Create a snapshot from a roster
  standings SNAPSHOT                               Print current standings
  pair      SNAPSHOT                               Pair the next round
  report    SNAPSHOT --match ID --winner ID --score 2-1
                                                   Record a match result
  drop      SNAPSHOT --player ID [--during-match] [--reason TEXT]
                                                   Drop a player
  advance   SNAPSHOT                               Seed the top cut
  finalize  SNAPSHOT                               Close a finished Swiss-only event
  validate-result FILE                             Check a reported result
  schedule  SNAPSHOT --start RFC3339 [--timings FILE]
                                                   Project round times

OPTIONS:
  --out      FILE    Write the result here instead of stdout
  --seed     N       Pairing seed                [default: env VS_SEED or random]
  --best-of  N       Games per match             [default: env VS_BEST_OF or 3]
  --output   FORMAT  pretty or compact JSON      [default: env VS_OUTPUT or pretty]

FLAGS:
  -h, --help         Print help information

ENVIRONMENT:
  VS_SEED, VS_BEST_OF, VS_ROUND_MINUTES, VS_OUTPUT, RUST_LOG
  (A .env file in the working directory is loaded first)
";

fn main() -> Result<(), Error> {
    // Load .env file if it exists
    let _ = dotenvy::dotenv();

    let mut pargs = Arguments::from_env();

    // Help has a higher priority and should be handled separately.
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }

    logging::init();

    let config = CliConfig::from_env(
        pargs.opt_value_from_str("--seed")?,
        pargs.opt_value_from_str("--best-of")?,
        pargs.opt_value_from_str::<_, OutputFormat>("--output")?,
    )?;
    config.validate()?;

    let out: Option<PathBuf> = pargs.opt_value_from_str("--out")?;
    let Some(command) = pargs.subcommand()? else {
        print!("{HELP}");
        bail!("No command given");
    };

    let mut ids = UuidIds;
    let now = Utc::now();

    match command.as_str() {
        "init" => {
            let roster_path: PathBuf = pargs.value_from_str("--roster")?;
            let tournament_id: String = pargs.value_from_str("--id")?;
            let format = match pargs.opt_value_from_str::<_, String>("--format")? {
                Some(raw) => parse_format(&raw)?,
                None => TournamentFormat::SwissWithCut,
            };
            let roster: Vec<PlayerEntry> = read_json(&roster_path)?;
            let snapshot = commands::init(&tournament_id, &roster, format, &config, &mut ids)?;
            write_json(&snapshot, out.as_deref(), config.output)?;
        }
        "standings" => {
            let snapshot = load_snapshot(&mut pargs)?;
            print!("{}", commands::standings_table(&snapshot));
        }
        "pair" => {
            let snapshot = load_snapshot(&mut pargs)?;
            let seed = config.pairing_seed();
            let (next, round) = commands::pair(&snapshot, seed)?;
            for m in &round.matches {
                let opponent = m.player2_id.as_deref().unwrap_or("BYE");
                eprintln!("Table {:>3}: {} vs {}", m.table_number, m.player1_id, opponent);
            }
            write_json(&next, out.as_deref(), config.output)?;
        }
        "report" => {
            let match_id: String = pargs.value_from_str("--match")?;
            let winner: String = pargs.value_from_str("--winner")?;
            let score: String = pargs.value_from_str("--score")?;
            let snapshot = load_snapshot(&mut pargs)?;
            let next = commands::report(&snapshot, &match_id, &winner, commands::parse_score(&score)?)?;
            write_json(&next, out.as_deref(), config.output)?;
        }
        "drop" => {
            let player: String = pargs.value_from_str("--player")?;
            let reason: Option<String> = pargs.opt_value_from_str("--reason")?;
            let timing = if pargs.contains("--during-match") {
                DropTiming::DuringMatch
            } else {
                DropTiming::BetweenRounds
            };
            let snapshot = load_snapshot(&mut pargs)?;
            let next = commands::drop_player(&snapshot, &player, timing, reason, now, &mut ids)?;
            write_json(&next, out.as_deref(), config.output)?;
        }
        "advance" => {
            let snapshot = load_snapshot(&mut pargs)?;
            let next = commands::advance(&snapshot, &mut ids)?;
            write_json(&next, out.as_deref(), config.output)?;
        }
        "finalize" => {
            let snapshot = load_snapshot(&mut pargs)?;
            let next = commands::finalize(&snapshot)?;
            write_json(&next, out.as_deref(), config.output)?;
        }
        "validate-result" => {
            let path: PathBuf = pargs.free_from_str()?;
            let result: MatchResultData = read_json(&path)?;
            let report = commands::validate_result(&result, config.best_of);
            write_json(&report, out.as_deref(), config.output)?;
            if !report.is_valid {
                std::process::exit(1);
            }
        }
        "schedule" => {
            let start: DateTime<Utc> = pargs.value_from_str("--start")?;
            let timings_path: Option<PathBuf> = pargs.opt_value_from_str("--timings")?;
            let timings: Vec<RoundTiming> = match timings_path {
                Some(path) => read_json(&path)?,
                None => Vec::new(),
            };
            let snapshot = load_snapshot(&mut pargs)?;
            let projected = commands::schedule(&snapshot, start, timings, now);
            write_json(&projected, out.as_deref(), config.output)?;
        }
        other => {
            print!("{HELP}");
            bail!("Unknown command: {other}");
        }
    }

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        tracing::warn!("Ignoring unused arguments: {:?}", remaining);
    }

    Ok(())
}

fn parse_format(raw: &str) -> Result<TournamentFormat, Error> {
    match raw {
        "swiss_only" => Ok(TournamentFormat::SwissOnly),
        "swiss_with_cut" => Ok(TournamentFormat::SwissWithCut),
        "single_elimination" => Ok(TournamentFormat::SingleElimination),
        other => bail!("Unknown format {other}: expected swiss_only or swiss_with_cut"),
    }
}

fn load_snapshot(pargs: &mut Arguments) -> Result<TournamentSnapshot, Error> {
    let path: PathBuf = pargs.free_from_str().context("Missing SNAPSHOT path")?;
    let raw = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    TournamentSnapshot::from_json(&raw)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, Error> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

fn write_json<T: Serialize>(value: &T, out: Option<&Path>, format: OutputFormat) -> Result<(), Error> {
    let mut json = match format {
        OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        OutputFormat::Compact => serde_json::to_string(value)?,
    };
    json.push('\n');

    match out {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            print!("{json}");
            Ok(())
        }
    }
}
