//! Scoring engine and turn state machine for Knister, a dice-placement game
//! played on a 5×5 grid.
//!
//! - [`core`] holds the grid, the 12 scoring lines and the combination table.
//! - [`engine`] holds the dice sources, the scoring rules and [`KnisterGame`].
//!
//! # Example
//!
//! ```
//! use knister_engine::{KnisterGame, ScriptedDice};
//!
//! let mut game = KnisterGame::with_dice(ScriptedDice::new([7]));
//! game.new_game();
//!
//! for index in [0, 1, 2, 3, 4] {
//!     game.choose_action(index).unwrap();
//!     game.roll_dice();
//! }
//!
//! // Only the first row scores: every column and diagonal holds a single value.
//! assert_eq!(game.total_reward(), 10);
//! ```

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// A placement targeted a cell that is out of range or already filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid action: cell {index} is out of range or already filled")]
pub struct InvalidActionError {
    pub index: usize,
}

/// Reasons [`KnisterGame::choose_action`] can reject an action.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error, derive_more::IsVariant,
)]
pub enum ChooseActionError {
    #[display("game has already finished")]
    GameFinished,
    #[display("no dice roll is pending")]
    NoDice,
    #[display("{_0}")]
    InvalidAction(InvalidActionError),
}
