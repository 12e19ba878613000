use std::path::PathBuf;

use anyhow::Context as _;
use knister_engine::{Combination, DiceSeed, ScoreRules};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::{
    command::{DEFAULT_RECORD_DIR, GlobalArg},
    policy::{Policy, PolicyKind},
    record::RecordingGame,
    schema::record::{PlayerInfo, RecordedGame},
    util::Output,
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct SimulateArg {
    /// Number of games to play
    #[clap(long, default_value_t = 1000)]
    games: usize,
    /// Placement strategy
    #[clap(long, value_enum, default_value_t = PolicyKind::Greedy)]
    policy: PolicyKind,
    /// Output file path for the JSON report (stdout if omitted)
    #[clap(long)]
    output: Option<PathBuf>,
    /// Save a recording of every game
    #[clap(long)]
    save_recordings: bool,
    /// Directory to save recording files
    #[clap(long, default_value = DEFAULT_RECORD_DIR)]
    record_dir: PathBuf,
}

/// Summary of a simulation run, written as JSON.
#[derive(Debug, Clone, Serialize)]
struct SimulationReport {
    games: usize,
    policy: PolicyKind,
    rules: ScoreRules,
    /// Seed the per-game dice seeds were derived from
    seed: DiceSeed,
    scores: ScoreSummary,
    /// How many lines of the final grids ended in each combination
    combinations: Vec<CombinationCount>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
struct ScoreSummary {
    min: i32,
    max: i32,
    mean: f64,
    median: f64,
    std_dev: f64,
}

impl ScoreSummary {
    #[expect(clippy::cast_precision_loss)]
    fn from_scores(scores: &[i32]) -> Option<Self> {
        let mut sorted = scores.to_vec();
        sorted.sort_unstable();
        let (&min, &max) = (sorted.first()?, sorted.last()?);

        let n = sorted.len() as f64;
        let mean = sorted.iter().copied().map(f64::from).sum::<f64>() / n;
        let variance = sorted
            .iter()
            .map(|&score| (f64::from(score) - mean).powi(2))
            .sum::<f64>()
            / n;
        let mid = sorted.len() / 2;
        let median = if sorted.len().is_multiple_of(2) {
            f64::from(sorted[mid - 1]) / 2.0 + f64::from(sorted[mid]) / 2.0
        } else {
            f64::from(sorted[mid])
        };

        Some(Self {
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
struct CombinationCount {
    combination: Combination,
    lines: usize,
}

/// Plays `games` games and returns their recordings.
///
/// Dice seeds and policy randomness are drawn from a generator seeded with
/// `seed`, so the same arguments always produce the same games.
fn simulate(
    games: usize,
    policy: PolicyKind,
    rules: ScoreRules,
    seed: DiceSeed,
) -> Vec<RecordedGame> {
    let mut master = Pcg32::from_seed(seed.to_bytes());
    let mut records = Vec::with_capacity(games);
    for game_index in 0..games {
        let mut policy_impl = Policy::new(policy, master.random());
        let mut game = RecordingGame::new(master.random(), rules, PlayerInfo::Auto { policy });
        while let Some(index) = policy_impl.select(&game) {
            if game.play(index).is_err() {
                break;
            }
        }
        let record = game.into_record();
        tracing::debug!(game = game_index, score = record.final_score, "game finished");
        if (game_index + 1) % 100 == 0 {
            tracing::info!("Played {}/{games} games", game_index + 1);
        }
        records.push(record);
    }
    records
}

fn build_report(
    records: &[RecordedGame],
    policy: PolicyKind,
    rules: ScoreRules,
    seed: DiceSeed,
) -> anyhow::Result<SimulationReport> {
    let scores = records.iter().map(|r| r.final_score).collect::<Vec<_>>();
    let summary = ScoreSummary::from_scores(&scores).context("No games were played")?;

    let mut combinations = Combination::ALL.map(|combination| CombinationCount {
        combination,
        lines: 0,
    });
    for record in records {
        let breakdown = rules.breakdown(&record.final_grid);
        for (count, (_, lines)) in combinations.iter_mut().zip(breakdown.combination_counts()) {
            count.lines += lines;
        }
    }

    Ok(SimulationReport {
        games: records.len(),
        policy,
        rules,
        seed,
        scores: summary,
        combinations: combinations.to_vec(),
    })
}

pub(crate) fn run(arg: &SimulateArg, global: &GlobalArg) -> anyhow::Result<()> {
    let SimulateArg {
        games,
        policy,
        output,
        save_recordings,
        record_dir,
    } = arg;

    let rules = global.score_rules()?;
    let seed = global.seed_or_random();
    tracing::info!(%seed, %policy, games, "Simulating games");

    let records = simulate(*games, *policy, rules, seed);
    let report = build_report(&records, *policy, rules, seed)?;
    tracing::info!(
        mean = report.scores.mean,
        max = report.scores.max,
        "Simulation complete"
    );

    if *save_recordings {
        for (i, record) in records.iter().enumerate() {
            record.save(record_dir, Some(&i.to_string()))?;
        }
    }

    let mut output = Output::open(output.as_deref())?;
    output.write_json(&report)?;
    tracing::info!("Report written to {}", output.display_path());
    Ok(())
}
