use arrayvec::ArrayVec;

use crate::{
    ChooseActionError,
    core::{CELL_COUNT, Grid},
};

use super::{DiceSeed, DiceSource, ScoreRules, ScoreState, SeededDice};

/// Where a game stands in its turn cycle.
///
/// The phase is derived from the grid and the pending roll, so it can never
/// disagree with them:
///
/// - `NotStarted`: empty grid, no roll
/// - `AwaitingAction`: a roll is waiting to be placed
/// - `AwaitingRoll`: the last roll was placed and no new one has been drawn
/// - `Finished`: all 25 cells are filled (terminal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum GamePhase {
    #[display("not started")]
    NotStarted,
    #[display("awaiting roll")]
    AwaitingRoll,
    #[display("awaiting action")]
    AwaitingAction,
    #[display("finished")]
    Finished,
}

/// A single game of Knister.
///
/// Owns the grid, the pending roll and the running score, and enforces the
/// turn rules: a roll must be pending to place a value, only empty cells can
/// be chosen, and nothing can be placed once the grid is full.
///
/// Rolls come from the dice source `D`. [`SeededDice`] is the default;
/// [`ScriptedDice`](super::ScriptedDice) or a closure make games fully
/// deterministic.
#[derive(Debug, Clone)]
pub struct KnisterGame<D = SeededDice> {
    dice: D,
    rules: ScoreRules,
    grid: Grid,
    current_roll: Option<u8>,
    score: ScoreState,
}

impl Default for KnisterGame {
    fn default() -> Self {
        Self::new()
    }
}

impl KnisterGame {
    /// Creates a game with randomly seeded dice and default rules.
    #[must_use]
    pub fn new() -> Self {
        Self::with_dice(SeededDice::new())
    }

    /// Creates a game whose rolls are fully determined by `seed`.
    #[must_use]
    pub fn with_seed(seed: DiceSeed) -> Self {
        Self::with_dice(SeededDice::with_seed(seed))
    }

    #[must_use]
    pub fn seed(&self) -> DiceSeed {
        self.dice.seed()
    }
}

impl<D> KnisterGame<D>
where
    D: DiceSource,
{
    /// Creates a game drawing its rolls from `dice`.
    ///
    /// The game starts in [`GamePhase::NotStarted`]; call
    /// [`Self::new_game`] to draw the first roll.
    pub fn with_dice(dice: D) -> Self {
        Self {
            dice,
            rules: ScoreRules::default(),
            grid: Grid::EMPTY,
            current_roll: None,
            score: ScoreState::new(),
        }
    }

    /// Replaces the scoring rules.
    ///
    /// Intended for construction; changing the rules mid-game leaves the
    /// running total computed under the old rules.
    #[must_use]
    pub fn with_rules(mut self, rules: ScoreRules) -> Self {
        self.rules = rules;
        self
    }

    /// Clears the grid and the score, then draws the first roll.
    pub fn new_game(&mut self) {
        self.grid = Grid::EMPTY;
        self.score = ScoreState::new();
        let roll = self.dice.roll();
        self.current_roll = Some(roll);
        tracing::debug!(roll, "new game started");
    }

    /// Draws a new roll from the dice source and makes it the pending roll.
    ///
    /// Any roll already pending is discarded.
    pub fn roll_dice(&mut self) -> u8 {
        let roll = self.dice.roll();
        if let Some(discarded) = self.current_roll.replace(roll) {
            tracing::debug!(roll, discarded, "rolled over a pending roll");
        } else {
            tracing::debug!(roll, "rolled dice");
        }
        roll
    }

    /// Overrides the pending roll without consulting the dice source.
    ///
    /// The value is not checked against the two-dice range.
    pub fn set_current_roll(&mut self, value: u8) {
        self.current_roll = Some(value);
    }

    #[must_use]
    pub fn current_roll(&self) -> Option<u8> {
        self.current_roll
    }

    /// Indices of the empty cells, in ascending order.
    #[must_use]
    pub fn available_actions(&self) -> ArrayVec<usize, CELL_COUNT> {
        self.grid.available_actions()
    }

    /// Places the pending roll at `index` and returns the reward.
    ///
    /// The reward is the change in total score, summed over every line the
    /// cell lies on. It can be zero. On success the pending roll is consumed,
    /// so the next placement needs a [`Self::roll_dice`] first.
    ///
    /// # Errors
    ///
    /// Checked in this order, and the game is left untouched on any of them:
    ///
    /// - [`ChooseActionError::GameFinished`] if the grid is already full
    /// - [`ChooseActionError::NoDice`] if no roll is pending
    /// - [`ChooseActionError::InvalidAction`] if `index` is out of range or
    ///   the cell is filled
    pub fn choose_action(&mut self, index: usize) -> Result<i32, ChooseActionError> {
        let roll = self.check_action(index)?;
        self.grid
            .place(index, roll)
            .map_err(ChooseActionError::InvalidAction)?;
        self.current_roll = None;

        let total = self.rules.total_score(&self.grid);
        let reward = self.score.record(total);
        tracing::debug!(index, roll, reward, total, "placed roll");
        if self.has_finished() {
            tracing::debug!(total, "game finished");
        }
        Ok(reward)
    }

    /// Reward [`Self::choose_action`] would return for `index`, without
    /// placing anything.
    ///
    /// # Errors
    ///
    /// Same as [`Self::choose_action`].
    pub fn preview_reward(&self, index: usize) -> Result<i32, ChooseActionError> {
        let roll = self.check_action(index)?;
        self.rules
            .placement_delta(&self.grid, index, roll)
            .map_err(ChooseActionError::InvalidAction)
    }

    fn check_action(&self, index: usize) -> Result<u8, ChooseActionError> {
        if self.has_finished() {
            tracing::debug!(index, "action rejected: game finished");
            return Err(ChooseActionError::GameFinished);
        }
        let Some(roll) = self.current_roll else {
            tracing::debug!(index, "action rejected: no dice");
            return Err(ChooseActionError::NoDice);
        };
        Ok(roll)
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Reward of the most recent placement, 0 before the first one.
    #[must_use]
    pub fn last_reward(&self) -> i32 {
        self.score.last_reward()
    }

    /// Running total score.
    #[must_use]
    pub fn total_reward(&self) -> i32 {
        self.score.current_total()
    }

    #[must_use]
    pub fn has_finished(&self) -> bool {
        self.grid.is_full()
    }

    #[must_use]
    pub fn phase(&self) -> GamePhase {
        if self.has_finished() {
            GamePhase::Finished
        } else if self.current_roll.is_some() {
            GamePhase::AwaitingAction
        } else if self.grid.is_empty() {
            GamePhase::NotStarted
        } else {
            GamePhase::AwaitingRoll
        }
    }

    #[must_use]
    pub fn rules(&self) -> &ScoreRules {
        &self.rules
    }

    #[must_use]
    pub fn score_state(&self) -> &ScoreState {
        &self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InvalidActionError, engine::ScriptedDice};

    fn scripted(rolls: &[u8]) -> KnisterGame<ScriptedDice> {
        KnisterGame::with_dice(ScriptedDice::new(rolls.iter().copied()))
    }

    fn fill_with(game: &mut KnisterGame<ScriptedDice>, order: impl IntoIterator<Item = usize>) {
        for index in order {
            if game.current_roll().is_none() {
                game.roll_dice();
            }
            game.choose_action(index).unwrap();
        }
    }

    #[test]
    fn test_new_game_is_empty() {
        let mut game = scripted(&[7]);
        assert_eq!(game.phase(), GamePhase::NotStarted);

        game.new_game();
        assert!(game.grid().is_empty());
        assert_eq!(game.total_reward(), 0);
        assert_eq!(game.last_reward(), 0);
        assert_eq!(game.current_roll(), Some(7));
        assert_eq!(game.available_actions().len(), CELL_COUNT);
        assert!(!game.has_finished());
        assert_eq!(game.phase(), GamePhase::AwaitingAction);
    }

    #[test]
    fn test_new_game_resets_progress() {
        let mut game = scripted(&[7]);
        game.new_game();
        fill_with(&mut game, 0..5);
        assert_eq!(game.total_reward(), 10);

        game.new_game();
        assert!(game.grid().is_empty());
        assert_eq!(game.total_reward(), 0);
        assert_eq!(game.score_state().placements(), 0);
    }

    #[test]
    fn test_choose_action_consumes_roll() {
        let mut game = scripted(&[4, 9]);
        game.new_game();
        assert_eq!(game.choose_action(12), Ok(0));
        assert_eq!(game.grid().cell(12), Some(4));
        assert_eq!(game.current_roll(), None);
        assert_eq!(game.phase(), GamePhase::AwaitingRoll);
        assert!(!game.available_actions().contains(&12));

        assert_eq!(game.roll_dice(), 9);
        assert_eq!(game.phase(), GamePhase::AwaitingAction);
    }

    #[test]
    fn test_reward_is_net_delta_across_lines() {
        let mut game = scripted(&[7]);
        game.new_game();
        for (index, value) in [(0, 7), (1, 7), (2, 7), (3, 5)] {
            game.set_current_roll(value);
            game.choose_action(index).unwrap();
        }
        assert_eq!(game.total_reward(), 3);

        game.set_current_roll(7);
        assert_eq!(game.preview_reward(4), Ok(3));
        assert_eq!(game.choose_action(4), Ok(3));
        assert_eq!(game.last_reward(), 3);
        assert_eq!(game.total_reward(), 6);
        assert_eq!(game.score_state().previous_total(), 3);
    }

    #[test]
    fn test_filled_cell_is_rejected_without_change() {
        let mut game = scripted(&[6, 8]);
        game.new_game();
        game.choose_action(3).unwrap();
        game.roll_dice();

        let grid = game.grid().clone();
        let total = game.total_reward();
        let last = game.last_reward();

        let err = game.choose_action(3).unwrap_err();
        assert_eq!(
            err,
            ChooseActionError::InvalidAction(InvalidActionError { index: 3 })
        );
        assert!(err.is_invalid_action());
        assert_eq!(game.grid(), &grid);
        assert_eq!(game.total_reward(), total);
        assert_eq!(game.last_reward(), last);
        assert_eq!(game.current_roll(), Some(8));
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut game = scripted(&[6]);
        game.new_game();
        assert_eq!(
            game.choose_action(CELL_COUNT),
            Err(ChooseActionError::InvalidAction(InvalidActionError {
                index: CELL_COUNT
            }))
        );
        assert_eq!(game.current_roll(), Some(6));
    }

    #[test]
    fn test_no_dice() {
        let mut game = scripted(&[6]);
        assert_eq!(game.choose_action(0), Err(ChooseActionError::NoDice));
        assert_eq!(game.preview_reward(0), Err(ChooseActionError::NoDice));

        game.new_game();
        game.choose_action(0).unwrap();
        // Even a filled cell reports the missing roll first.
        assert_eq!(game.choose_action(0), Err(ChooseActionError::NoDice));
    }

    #[test]
    fn test_game_finished_after_25_placements() {
        let mut game = scripted(&[2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12]);
        game.new_game();
        fill_with(&mut game, 0..CELL_COUNT);

        assert!(game.has_finished());
        assert_eq!(game.phase(), GamePhase::Finished);
        assert!(game.available_actions().is_empty());
        assert_eq!(game.score_state().placements(), CELL_COUNT);

        assert_eq!(game.choose_action(0), Err(ChooseActionError::GameFinished));
        game.roll_dice();
        assert!(game.has_finished());
        assert_eq!(game.phase(), GamePhase::Finished);
        assert_eq!(game.choose_action(0), Err(ChooseActionError::GameFinished));
        assert_eq!(game.preview_reward(0), Err(ChooseActionError::GameFinished));
    }

    #[test]
    fn test_final_total_matches_full_score() {
        let mut game = scripted(&[5, 7, 7, 9, 2, 12, 6, 8]);
        game.new_game();
        let mut rewards = 0;
        for index in (0..CELL_COUNT).rev() {
            if game.current_roll().is_none() {
                game.roll_dice();
            }
            rewards += game.choose_action(index).unwrap();
        }
        let expected = game.rules().total_score(game.grid());
        assert_eq!(game.total_reward(), expected);
        assert_eq!(rewards, expected);
    }

    #[test]
    fn test_roll_dice_overwrites_pending_roll() {
        let mut game = scripted(&[3, 11]);
        game.new_game();
        assert_eq!(game.current_roll(), Some(3));
        game.roll_dice();
        assert_eq!(game.current_roll(), Some(11));
        assert_eq!(game.phase(), GamePhase::AwaitingAction);
    }

    #[test]
    fn test_set_current_roll_is_not_validated() {
        let mut game = scripted(&[7]);
        game.set_current_roll(13);
        assert_eq!(game.current_roll(), Some(13));
        assert_eq!(game.choose_action(0), Ok(0));
        assert_eq!(game.grid().cell(0), Some(13));
    }

    #[test]
    fn test_custom_rules() {
        let mut game = scripted(&[9]).with_rules(ScoreRules::new(5));
        game.new_game();
        fill_with(&mut game, [0, 6]);
        // A pair on the main diagonal, weighted by 5.
        assert_eq!(game.total_reward(), 5);
        assert_eq!(game.rules().diagonal_multiplier, 5);
    }

    #[test]
    fn test_same_actions_same_outcome() {
        let rolls = [8, 3, 3, 10, 7, 6, 6, 2];
        let order = [12, 0, 24, 6, 18, 4, 20, 1, 2, 3];

        let play = || {
            let mut game = scripted(&rolls);
            game.new_game();
            let mut rewards = Vec::new();
            for index in order {
                if game.current_roll().is_none() {
                    game.roll_dice();
                }
                rewards.push(game.choose_action(index).unwrap());
            }
            (game.grid().clone(), rewards, game.total_reward())
        };
        assert_eq!(play(), play());
    }

    #[test]
    fn test_same_seed_same_game() {
        let seed = "00112233445566778899aabbccddeeff".parse().unwrap();
        let mut game1 = KnisterGame::with_seed(seed);
        let mut game2 = KnisterGame::with_seed(seed);
        game1.new_game();
        game2.new_game();
        for index in 0..CELL_COUNT {
            assert_eq!(game1.choose_action(index), game2.choose_action(index));
            game1.roll_dice();
            game2.roll_dice();
        }
        assert_eq!(game1.grid(), game2.grid());
        assert_eq!(game1.total_reward(), game2.total_reward());
        assert_eq!(game1.seed(), seed);
    }

    #[test]
    fn test_reads_are_idempotent() {
        let mut game = scripted(&[7, 7, 5]);
        game.new_game();
        fill_with(&mut game, [0, 1, 2]);

        assert_eq!(game.total_reward(), game.total_reward());
        assert_eq!(game.grid(), game.grid());
        assert_eq!(game.last_reward(), game.last_reward());
        assert_eq!(game.phase(), game.phase());
        assert_eq!(game.available_actions(), game.available_actions());

        game.roll_dice();
        let grid = game.grid().clone();
        let _ = game.preview_reward(3);
        assert_eq!(game.grid(), &grid);
        assert!(game.current_roll().is_some());
    }
}
