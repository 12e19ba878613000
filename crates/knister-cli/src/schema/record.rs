use chrono::{DateTime, Utc};
use knister_engine::{DiceSeed, Grid, ScoreRules};
use serde::{Deserialize, Serialize};

use crate::policy::PolicyKind;

/// Recorded game with everything needed to replay it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordedGame {
    /// Timestamp when recording was created (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
    /// Seed of the dice that produced every roll
    pub seed: DiceSeed,
    pub player: PlayerInfo,
    pub rules: ScoreRules,
    pub final_score: i32,
    /// Grid at the time of recording, in compact form
    pub final_grid: Grid,
    /// One entry per placement, in play order
    pub turns: Vec<TurnRecord>,
}

/// A single placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnRecord {
    /// Turn number (0-indexed)
    pub turn: usize,
    /// Dice sum that was placed
    pub roll: u8,
    /// Index of the cell the roll was placed in
    pub action: usize,
    pub reward: i32,
    /// Running total after the placement
    pub total: i32,
}

/// Who made the decisions in a recorded game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerInfo {
    /// Manual play by human
    Manual,
    /// Automatic play by a built-in policy
    Auto { policy: PolicyKind },
}
