use knister_engine::{DiceSource, KnisterGame};
use rand::{SeedableRng as _, seq::IndexedRandom as _};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Built-in strategies for automatic play.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Pick the cell with the highest immediate reward
    #[default]
    #[display("greedy")]
    Greedy,
    /// Pick a uniformly random empty cell
    #[display("random")]
    Random,
}

/// Chooses where to place the pending roll.
#[derive(Debug, Clone)]
pub enum Policy {
    Greedy,
    Random(Pcg32),
}

impl Policy {
    /// Builds a policy; `rng_seed` only matters for [`PolicyKind::Random`].
    pub fn new(kind: PolicyKind, rng_seed: u64) -> Self {
        match kind {
            PolicyKind::Greedy => Self::Greedy,
            PolicyKind::Random => Self::Random(Pcg32::seed_from_u64(rng_seed)),
        }
    }

    /// Returns the chosen cell index, or `None` when no placement is possible.
    pub fn select<D>(&mut self, game: &KnisterGame<D>) -> Option<usize>
    where
        D: DiceSource,
    {
        let actions = game.available_actions();
        match self {
            Self::Greedy => {
                let mut best: Option<(usize, i32)> = None;
                for index in actions {
                    let Ok(reward) = game.preview_reward(index) else {
                        continue;
                    };
                    // Ties keep the lowest index.
                    if best.is_none_or(|(_, best_reward)| reward > best_reward) {
                        best = Some((index, reward));
                    }
                }
                best.map(|(index, _)| index)
            }
            Self::Random(rng) => {
                if game.current_roll().is_none() {
                    return None;
                }
                actions.choose(rng).copied()
            }
        }
    }
}
