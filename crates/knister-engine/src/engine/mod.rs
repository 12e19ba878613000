//! Game engine: dice, scoring and the turn state machine.
//!
//! This module builds the playable game on top of the [`core`](crate::core)
//! data structures:
//!
//! - [`DiceSource`] - Where rolls come from ([`SeededDice`], [`ScriptedDice`], closures)
//! - [`ScoreRules`] - Line weighting and total score computation
//! - [`ScoreState`] - Running total and per-placement reward
//! - [`KnisterGame`] - The controller enforcing turn order and legality
//!
//! # Game Flow
//!
//! 1. [`KnisterGame::new_game`] clears the grid and draws the first roll
//! 2. The player picks one of [`KnisterGame::available_actions`]
//! 3. [`KnisterGame::choose_action`] places the roll and reports the reward
//! 4. [`KnisterGame::roll_dice`] draws the next roll
//! 5. Repeat until all 25 cells are filled
//!
//! # Example
//!
//! ```
//! use knister_engine::{ChooseActionError, GamePhase, KnisterGame, ScriptedDice};
//!
//! let mut game = KnisterGame::with_dice(ScriptedDice::new([5, 5, 9]));
//! game.new_game();
//! assert_eq!(game.phase(), GamePhase::AwaitingAction);
//!
//! assert_eq!(game.choose_action(0), Ok(0));
//! assert_eq!(game.phase(), GamePhase::AwaitingRoll);
//! assert_eq!(game.choose_action(1), Err(ChooseActionError::NoDice));
//!
//! game.roll_dice();
//! // Two fives side by side make a pair in row 1.
//! assert_eq!(game.choose_action(1), Ok(1));
//! ```

pub use self::{dice::*, game::*, score::*, score_state::*};

mod dice;
mod game;
mod score;
mod score_state;
