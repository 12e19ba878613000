use std::{fs::File, io, path::PathBuf, sync::Mutex};

use anyhow::{Context as _, ensure};
use clap::{Parser, Subcommand};
use knister_engine::{DiceSeed, MAX_DIAGONAL_MULTIPLIER, ScoreRules};
use rand::Rng as _;
use tracing_subscriber::EnvFilter;

use crate::util;

use self::{play::PlayArg, replay::ReplayArg, simulate::SimulateArg};

mod play;
mod replay;
mod simulate;

const DEFAULT_RECORD_DIR: &str = "./data/recordings/";

#[derive(Debug, Clone, Parser)]
#[command(author, version, about, long_about = None)]
pub struct CommandArgs {
    #[command(flatten)]
    global: GlobalArg,
    /// What mode to run the program in
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Clone, Subcommand)]
enum Mode {
    /// Play a game interactively
    Play(#[clap(flatten)] PlayArg),
    /// Play many games automatically and report score statistics
    Simulate(#[clap(flatten)] SimulateArg),
    /// Re-run a recorded game and check it against the engine
    Replay(#[clap(flatten)] ReplayArg),
}

/// Options shared by every mode.
#[derive(Debug, Clone, Default, clap::Args)]
pub(crate) struct GlobalArg {
    /// Scoring rules file (JSON); missing fields use the defaults
    #[clap(long, global = true)]
    rules: Option<PathBuf>,
    /// Weight of the two diagonal lines, overriding the rules file
    #[clap(long, global = true, allow_negative_numbers = true)]
    diagonal_multiplier: Option<i32>,
    /// Dice seed as 32 hex characters (random if omitted)
    #[clap(long, global = true)]
    seed: Option<DiceSeed>,
    /// Write log output to this file instead of stderr
    #[clap(long, global = true)]
    log_file: Option<PathBuf>,
}

impl GlobalArg {
    pub(crate) fn score_rules(&self) -> anyhow::Result<ScoreRules> {
        let mut rules = match &self.rules {
            Some(path) => util::read_rules_file(path)?,
            None => ScoreRules::default(),
        };
        if let Some(multiplier) = self.diagonal_multiplier {
            rules.diagonal_multiplier = multiplier;
        }
        ensure!(
            rules.is_exact(),
            "Diagonal multiplier {} is out of range (at most {MAX_DIAGONAL_MULTIPLIER} in magnitude)",
            rules.diagonal_multiplier
        );
        Ok(rules)
    }

    pub(crate) fn seed_or_random(&self) -> DiceSeed {
        self.seed.unwrap_or_else(|| rand::rng().random())
    }

    /// Installs the global tracing subscriber.
    ///
    /// `RUST_LOG` selects the filter (default `info`). Without a log file,
    /// output goes to stderr, unless `stderr_allowed` is false, in which case
    /// logging stays off so it cannot corrupt a full-screen terminal.
    fn init_tracing(&self, stderr_allowed: bool) -> anyhow::Result<()> {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let builder = tracing_subscriber::fmt().with_env_filter(filter);
        match &self.log_file {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("Failed to create log file: {}", path.display()))?;
                builder.with_ansi(false).with_writer(Mutex::new(file)).init();
            }
            None if stderr_allowed => builder.with_writer(io::stderr).init(),
            None => {}
        }
        Ok(())
    }
}

pub fn run() -> anyhow::Result<()> {
    let args = CommandArgs::parse();
    let mode = args.mode.unwrap_or(Mode::Play(PlayArg::default()));
    args.global.init_tracing(!matches!(mode, Mode::Play(_)))?;

    match mode {
        Mode::Play(arg) => play::run(&arg, &args.global)?,
        Mode::Simulate(arg) => simulate::run(&arg, &args.global)?,
        Mode::Replay(arg) => replay::run(&arg)?,
    }
    Ok(())
}
