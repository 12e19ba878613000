use std::{
    fs::{self, File},
    io::{BufWriter, Write as _},
    ops::Deref,
    path::{Path, PathBuf},
};

use anyhow::Context;
use chrono::Utc;
use knister_engine::{ChooseActionError, DiceSeed, KnisterGame, ScoreRules};

use crate::schema::record::{PlayerInfo, RecordedGame, TurnRecord};

/// A wrapper around [`KnisterGame`] that records every placement.
///
/// Placing through [`play`](Self::play) also draws the next roll, so the
/// wrapped game is always either awaiting an action or finished.
#[derive(Debug)]
pub struct RecordingGame {
    game: KnisterGame,
    player: PlayerInfo,
    turns: Vec<TurnRecord>,
}

/// Provides read-only access to the underlying `KnisterGame`.
///
/// `DerefMut` is not implemented: placements must go through
/// [`RecordingGame::play`] to be recorded.
impl Deref for RecordingGame {
    type Target = KnisterGame;

    fn deref(&self) -> &Self::Target {
        &self.game
    }
}

impl RecordingGame {
    /// Starts a new game with dice seeded by `seed`.
    pub fn new(seed: DiceSeed, rules: ScoreRules, player: PlayerInfo) -> Self {
        let mut game = KnisterGame::with_seed(seed).with_rules(rules);
        game.new_game();
        Self {
            game,
            player,
            turns: Vec::with_capacity(knister_engine::CELL_COUNT),
        }
    }

    pub fn turns(&self) -> &[TurnRecord] {
        &self.turns
    }

    /// Places the pending roll at `index`, records the turn and rolls again
    /// unless the grid is full.
    pub fn play(&mut self, index: usize) -> Result<i32, ChooseActionError> {
        let pending = self.game.current_roll();
        let reward = self.game.choose_action(index)?;
        if let Some(roll) = pending {
            self.turns.push(TurnRecord {
                turn: self.turns.len(),
                roll,
                action: index,
                reward,
                total: self.game.total_reward(),
            });
        }
        if !self.game.has_finished() {
            self.game.roll_dice();
        }
        Ok(reward)
    }

    /// Consumes the game and returns the recording.
    pub fn into_record(self) -> RecordedGame {
        RecordedGame {
            recorded_at: Utc::now(),
            seed: self.game.seed(),
            player: self.player,
            rules: *self.game.rules(),
            final_score: self.game.total_reward(),
            final_grid: self.game.grid().clone(),
            turns: self.turns,
        }
    }
}

impl RecordedGame {
    /// Saves the recording as JSON under `record_dir` and returns the path.
    ///
    /// The filename is built from the player and the recording time:
    /// `{player}_{YYYYMMDD_HHMMSS}.json`, with `_{suffix}` before the
    /// extension when a suffix is given.
    pub fn save(&self, record_dir: &Path, suffix: Option<&str>) -> anyhow::Result<PathBuf> {
        fs::create_dir_all(record_dir)
            .with_context(|| format!("Failed to create directory {}", record_dir.display()))?;

        let prefix = match self.player {
            PlayerInfo::Manual => "manual".to_owned(),
            PlayerInfo::Auto { policy } => format!("auto_{policy}"),
        };
        let timestamp = self.recorded_at.format("%Y%m%d_%H%M%S");
        let filename = match suffix {
            Some(suffix) => format!("{prefix}_{timestamp}_{suffix}.json"),
            None => format!("{prefix}_{timestamp}.json"),
        };
        let filepath = record_dir.join(filename);

        let file = File::create(&filepath)
            .with_context(|| format!("Failed to create file: {}", filepath.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .with_context(|| format!("Failed to write JSON to {}", filepath.display()))?;
        writer
            .flush()
            .with_context(|| format!("Failed to flush output to {}", filepath.display()))?;

        tracing::info!(path = %filepath.display(), "saved recording");
        Ok(filepath)
    }
}
