/// Running score of a game.
///
/// Tracks the total before and after the most recent placement, so the
/// reward of that placement is always `current_total - previous_total`.
///
/// # Example
///
/// ```
/// use knister_engine::ScoreState;
///
/// let mut state = ScoreState::new();
/// state.record(3);
/// state.record(11);
///
/// assert_eq!(state.last_reward(), 8);
/// assert_eq!(state.current_total(), 11);
/// assert_eq!(state.placements(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreState {
    previous_total: i32,
    current_total: i32,
    last_reward: i32,
    placements: usize,
}

impl ScoreState {
    /// Creates a score state with every counter at zero.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            previous_total: 0,
            current_total: 0,
            last_reward: 0,
            placements: 0,
        }
    }

    #[must_use]
    pub const fn previous_total(&self) -> i32 {
        self.previous_total
    }

    #[must_use]
    pub const fn current_total(&self) -> i32 {
        self.current_total
    }

    /// Net change in total score caused by the most recent placement.
    #[must_use]
    pub const fn last_reward(&self) -> i32 {
        self.last_reward
    }

    /// Number of placements recorded since the last reset.
    #[must_use]
    pub const fn placements(&self) -> usize {
        self.placements
    }

    /// Records the total score after a placement and returns its reward.
    pub fn record(&mut self, new_total: i32) -> i32 {
        self.previous_total = self.current_total;
        self.current_total = new_total;
        self.last_reward = self.current_total.saturating_sub(self.previous_total);
        self.placements += 1;
        self.last_reward
    }
}
