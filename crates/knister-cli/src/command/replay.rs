use std::path::PathBuf;

use anyhow::{Context as _, bail, ensure};
use knister_engine::{CellPos, KnisterGame};

use crate::{schema::record::RecordedGame, util};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct ReplayArg {
    /// Path to the recording file (JSON format)
    recording_file: PathBuf,
}

pub(crate) fn run(arg: &ReplayArg) -> anyhow::Result<()> {
    let ReplayArg { recording_file } = arg;

    tracing::info!("Loading recording from {}", recording_file.display());
    let record = util::read_recording_file(recording_file)?;
    tracing::info!(turns = record.turns.len(), seed = %record.seed, "Loaded recording");

    let game = replay(&record, |line| println!("{line}"))?;

    println!();
    println!("{}", game.grid());
    println!();
    for line in game.rules().breakdown(game.grid()).lines() {
        if line.score != 0 {
            println!(
                "{:<14} {:<18} {:>3}",
                line.kind.to_string(),
                line.combination.to_string(),
                line.score
            );
        }
    }
    println!("Final score: {}", game.total_reward());
    tracing::info!("Recording verified");
    Ok(())
}

/// Re-plays `record` with its seed and rules, checking every recorded roll,
/// reward and total against the engine.
///
/// Each turn is reported through `report` as a human-readable line.
fn replay<F>(record: &RecordedGame, mut report: F) -> anyhow::Result<KnisterGame>
where
    F: FnMut(String),
{
    let mut game = KnisterGame::with_seed(record.seed).with_rules(record.rules);
    game.new_game();

    for (expected_turn, turn) in record.turns.iter().enumerate() {
        ensure!(
            turn.turn == expected_turn,
            "Turn {expected_turn} is numbered {} in the recording",
            turn.turn
        );
        let roll = game.current_roll();
        ensure!(
            roll == Some(turn.roll),
            "Turn {expected_turn}: recorded roll {} but the dice rolled {roll:?}",
            turn.roll
        );
        let reward = game
            .choose_action(turn.action)
            .with_context(|| {
                format!("Turn {expected_turn}: cannot place at cell {}", turn.action)
            })?;
        if reward != turn.reward || game.total_reward() != turn.total {
            bail!(
                "Turn {expected_turn}: recorded reward {} (total {}) but the engine gives {reward} (total {})",
                turn.reward,
                turn.total,
                game.total_reward(),
            );
        }

        let cell = CellPos::from_index(turn.action)
            .map_or_else(|| turn.action.to_string(), |pos| pos.to_string());
        report(format!(
            "turn {:>2}: roll {:>2} -> {cell} (reward {:+}, total {})",
            turn.turn + 1,
            turn.roll,
            reward,
            game.total_reward()
        ));

        if !game.has_finished() {
            game.roll_dice();
        }
    }

    ensure!(
        game.total_reward() == record.final_score,
        "Recorded final score {} but the engine gives {}",
        record.final_score,
        game.total_reward()
    );
    ensure!(
        game.grid() == &record.final_grid,
        "Recorded final grid does not match the replayed grid"
    );
    Ok(game)
}

#[cfg(test)]
mod tests {
    use knister_engine::{CELL_COUNT, DiceSeed, ScoreRules};

    use super::*;
    use crate::{
        policy::{Policy, PolicyKind},
        record::RecordingGame,
        schema::record::PlayerInfo,
    };

    fn recorded_game(rules: ScoreRules) -> RecordedGame {
        let seed = DiceSeed::from_bytes([9; 16]);
        let mut game = RecordingGame::new(
            seed,
            rules,
            PlayerInfo::Auto {
                policy: PolicyKind::Greedy,
            },
        );
        let mut policy = Policy::new(PolicyKind::Greedy, 0);
        while let Some(index) = policy.select(&game) {
            game.play(index).unwrap();
        }
        game.into_record()
    }

    #[test]
    fn test_replay_matches_recording() {
        let record = recorded_game(ScoreRules::new(3));
        let mut lines = Vec::new();
        let game = replay(&record, |line| lines.push(line)).unwrap();

        assert_eq!(lines.len(), CELL_COUNT);
        assert!(lines[0].starts_with("turn  1: roll "));
        assert_eq!(game.total_reward(), record.final_score);
        assert_eq!(game.rules(), &ScoreRules::new(3));
    }

    #[test]
    fn test_partial_recording_replays() {
        let mut record = recorded_game(ScoreRules::default());
        record.turns.truncate(3);
        record.final_score = record.turns[2].total;
        let mut grid = knister_engine::Grid::EMPTY;
        for turn in &record.turns {
            grid.place(turn.action, turn.roll).unwrap();
        }
        record.final_grid = grid;

        let game = replay(&record, |_| {}).unwrap();
        assert_eq!(game.grid().filled_count(), 3);
    }

    #[test]
    fn test_tampered_reward_is_detected() {
        let mut record = recorded_game(ScoreRules::default());
        record.turns[5].reward += 1;
        let err = replay(&record, |_| {}).unwrap_err();
        assert!(err.to_string().contains("Turn 5"));
    }

    #[test]
    fn test_tampered_roll_is_detected() {
        let mut record = recorded_game(ScoreRules::default());
        record.turns[0].roll = if record.turns[0].roll == 2 { 3 } else { 2 };
        let err = replay(&record, |_| {}).unwrap_err();
        assert!(err.to_string().contains("recorded roll"));
    }

    #[test]
    fn test_wrong_rules_are_detected() {
        let mut record = recorded_game(ScoreRules::default());
        record.rules = ScoreRules::new(10);
        let result = replay(&record, |_| {});
        // Diagonal scores only appear in the totals when a diagonal scored.
        let diagonal_scored = ScoreRules::new(10).total_score(&record.final_grid)
            != ScoreRules::default().total_score(&record.final_grid);
        assert_eq!(result.is_err(), diagonal_scored);
    }

    #[test]
    fn test_illegal_action_is_detected() {
        let mut record = recorded_game(ScoreRules::default());
        record.turns[1].action = record.turns[0].action;
        let err = replay(&record, |_| {}).unwrap_err();
        assert!(err.to_string().contains("cannot place"));
    }
}
