use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::{
    InvalidActionError,
    core::{Combination, Grid, LINE_COUNT, Line, LineKind},
};

/// Weight applied to diagonal line scores unless configured otherwise.
pub const DEFAULT_DIAGONAL_MULTIPLIER: i32 = 2;

/// Largest diagonal multiplier magnitude for which every total is exact.
///
/// Twelve lines of at most 12 points each, all weighted by the multiplier,
/// still fit in an `i32`.
#[expect(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub const MAX_DIAGONAL_MULTIPLIER: i32 = i32::MAX / (LINE_COUNT as i32 * 12);

/// Scoring configuration.
///
/// Row and column scores count once; the two diagonals count
/// `diagonal_multiplier` times.
///
/// Missing fields fall back to their defaults when deserializing, so `{}` is
/// a valid rules file.
///
/// Scores saturate at the `i32` bounds, so any multiplier is safe to score
/// with; results are exact while [`Self::is_exact`] holds.
///
/// ```
/// use knister_engine::{Grid, ScoreRules};
///
/// let grid: Grid = "7..../.7.../..7../...7./....7".parse().unwrap();
/// assert_eq!(ScoreRules::default().total_score(&grid), 20);
/// assert_eq!(ScoreRules::new(3).total_score(&grid), 30);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreRules {
    pub diagonal_multiplier: i32,
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self {
            diagonal_multiplier: DEFAULT_DIAGONAL_MULTIPLIER,
        }
    }
}

impl ScoreRules {
    #[must_use]
    pub const fn new(diagonal_multiplier: i32) -> Self {
        Self {
            diagonal_multiplier,
        }
    }

    /// Returns `true` if the multiplier is within
    /// ±[`MAX_DIAGONAL_MULTIPLIER`], where no score can saturate.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.diagonal_multiplier.unsigned_abs() <= MAX_DIAGONAL_MULTIPLIER.unsigned_abs()
    }

    /// Weight of a line's combination score under these rules.
    #[must_use]
    pub fn line_weight(&self, kind: LineKind) -> i32 {
        if kind.is_diagonal() {
            self.diagonal_multiplier
        } else {
            1
        }
    }

    /// Weighted score of a single line.
    #[must_use]
    pub fn line_score(&self, line: &Line) -> i32 {
        line.combination()
            .score()
            .saturating_mul(self.line_weight(line.kind()))
    }

    /// Sum of the weighted scores of all 12 lines.
    #[must_use]
    pub fn total_score(&self, grid: &Grid) -> i32 {
        grid.lines()
            .map(|line| self.line_score(&line))
            .fold(0, i32::saturating_add)
    }

    /// Change in total score caused by placing `value` at `index`.
    ///
    /// Only the lines through `index` are rescored; the result is always equal
    /// to `total_score` after the placement minus `total_score` before it.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidActionError`] if `index` is out of range or the cell
    /// is already filled.
    pub fn placement_delta(
        &self,
        grid: &Grid,
        index: usize,
        value: u8,
    ) -> Result<i32, InvalidActionError> {
        let placed = grid.with_placed(index, value)?;
        let delta = LineKind::through(index)
            .map(|kind| {
                self.line_score(&Line::extract(&placed, kind))
                    .saturating_sub(self.line_score(&Line::extract(grid, kind)))
            })
            .fold(0, i32::saturating_add);
        Ok(delta)
    }

    /// Per-line scoring details of `grid`, in [`LineKind::ALL`] order.
    #[must_use]
    pub fn breakdown(&self, grid: &Grid) -> ScoreBreakdown {
        let lines = grid
            .lines()
            .map(|line| LineScore {
                kind: line.kind(),
                combination: line.combination(),
                score: self.line_score(&line),
            })
            .collect();
        ScoreBreakdown { lines }
    }
}

/// Scoring result of one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineScore {
    pub kind: LineKind,
    pub combination: Combination,
    /// Weighted score.
    pub score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreBreakdown {
    lines: ArrayVec<LineScore, LINE_COUNT>,
}

impl ScoreBreakdown {
    #[must_use]
    pub fn lines(&self) -> &[LineScore] {
        &self.lines
    }

    #[must_use]
    pub fn total(&self) -> i32 {
        self.lines
            .iter()
            .map(|line| line.score)
            .fold(0, i32::saturating_add)
    }

    /// Number of lines scoring each combination, in [`Combination::ALL`] order.
    #[must_use]
    pub fn combination_counts(&self) -> [(Combination, usize); Combination::ALL.len()] {
        Combination::ALL.map(|combination| {
            let count = self
                .lines
                .iter()
                .filter(|line| line.combination == combination)
                .count();
            (combination, count)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CELL_COUNT;

    fn grid(s: &str) -> Grid {
        s.parse().unwrap()
    }

    fn row_score(grid: &Grid, row: usize) -> i32 {
        ScoreRules::default().line_score(&Line::extract(grid, LineKind::Row(row)))
    }

    #[test]
    fn test_empty_grid_scores_zero() {
        assert_eq!(ScoreRules::default().total_score(&Grid::EMPTY), 0);
        assert_eq!(ScoreRules::new(5).total_score(&Grid::EMPTY), 0);
    }

    #[test]
    fn test_five_sevens_in_a_row() {
        let grid = grid("77777/...../...../...../.....");
        assert_eq!(row_score(&grid, 0), 10);
        assert_eq!(ScoreRules::default().total_score(&grid), 10);
    }

    #[test]
    fn test_straights_in_a_row() {
        let grid = grid("23456/56789/...../...../.....");
        assert_eq!(row_score(&grid, 0), 12);
        assert_eq!(row_score(&grid, 1), 8);
    }

    #[test]
    fn test_full_house_becomes_four_of_a_kind() {
        let rules = ScoreRules::default();
        let before = grid("7775./...../...../...../.....");
        let full_house = before.with_placed(4, 5).unwrap();
        let four_kind = before.with_placed(4, 7).unwrap();

        assert_eq!(row_score(&full_house, 0), 8);
        assert_eq!(row_score(&four_kind, 0), 6);

        // Row 1 moves from three of a kind (3) to the final combination. The
        // last cell also sits on column 5 and the anti-diagonal, which stay
        // single-valued and score nothing.
        assert_eq!(rules.placement_delta(&before, 4, 5), Ok(5));
        assert_eq!(rules.placement_delta(&before, 4, 7), Ok(3));
    }

    #[test]
    fn test_delta_counts_every_touched_line() {
        let rules = ScoreRules::default();
        // The center cell lies on row 3, column 3 and both diagonals.
        let before = grid("7...7/...../.7.7./...../7.7.7");
        let delta = rules.placement_delta(&before, 12, 7).unwrap();
        let after = before.with_placed(12, 7).unwrap();
        assert_eq!(
            delta,
            rules.total_score(&after) - rules.total_score(&before)
        );
        // row 3: pair -> three of a kind (+2), column 3: none -> pair (+1),
        // each diagonal: pair -> three of a kind, weighted twice (+4).
        assert_eq!(delta, 2 + 1 + 8);
    }

    #[test]
    fn test_diagonal_weighting() {
        let grid = grid("7..../.7.../..7../...7./....7");
        let breakdown = ScoreRules::default().breakdown(&grid);
        let main = breakdown
            .lines()
            .iter()
            .find(|line| line.kind == LineKind::MainDiagonal)
            .unwrap();
        assert_eq!(main.combination, Combination::FiveOfAKind);
        assert_eq!(main.score, 20);
        assert_eq!(breakdown.total(), 20);

        assert_eq!(ScoreRules::new(1).total_score(&grid), 10);
        assert_eq!(ScoreRules::new(0).total_score(&grid), 0);
    }

    #[test]
    fn test_placement_delta_matches_full_recompute() {
        let rules = ScoreRules::default();
        let base = grid("7.5.9/2.3.4/..8../6...6/.c.b.");
        for index in base.empty_cell_indices() {
            for value in 2..=12 {
                let after = base.with_placed(index, value).unwrap();
                assert_eq!(
                    rules.placement_delta(&base, index, value),
                    Ok(rules.total_score(&after) - rules.total_score(&base)),
                    "index {index}, value {value}",
                );
            }
        }
    }

    #[test]
    fn test_placement_delta_rejects_filled_and_out_of_range() {
        let rules = ScoreRules::default();
        let grid = grid("7..../...../...../...../.....");
        assert_eq!(
            rules.placement_delta(&grid, 0, 7),
            Err(InvalidActionError { index: 0 })
        );
        assert_eq!(
            rules.placement_delta(&grid, CELL_COUNT, 7),
            Err(InvalidActionError { index: CELL_COUNT })
        );
    }

    #[test]
    fn test_breakdown_counts() {
        let grid = grid("77777/23456/...../...../.....");
        let breakdown = ScoreRules::default().breakdown(&grid);
        assert_eq!(breakdown.lines().len(), LINE_COUNT);
        assert_eq!(breakdown.total(), 22);

        let counts = breakdown.combination_counts();
        let count_of = |combination| {
            counts
                .iter()
                .find(|(c, _)| *c == combination)
                .map(|(_, n)| *n)
                .unwrap()
        };
        assert_eq!(count_of(Combination::FiveOfAKind), 1);
        assert_eq!(count_of(Combination::StraightNo7), 1);
        assert_eq!(count_of(Combination::None), LINE_COUNT - 2);
    }

    #[test]
    fn test_huge_multiplier_saturates() {
        let grid = grid("7..../.7.../..7../...../.....");
        let rules = ScoreRules::new(1_000_000_000);
        assert!(!rules.is_exact());
        assert_eq!(rules.total_score(&grid), i32::MAX);
        assert_eq!(rules.breakdown(&grid).total(), i32::MAX);
        assert_eq!(ScoreRules::new(i32::MIN).total_score(&grid), i32::MIN);
        assert!(rules.placement_delta(&grid, 18, 7).is_ok());
    }

    #[test]
    fn test_max_multiplier_is_exact() {
        let grid = grid("7...7/.7.7./..7../.7.7./7...7");
        for multiplier in [MAX_DIAGONAL_MULTIPLIER, -MAX_DIAGONAL_MULTIPLIER] {
            let rules = ScoreRules::new(multiplier);
            assert!(rules.is_exact());
            // Both diagonals are five of a kind; eight rows and columns hold a pair.
            let lines = rules.breakdown(&grid);
            let expected = lines
                .lines()
                .iter()
                .map(|line| i64::from(line.score))
                .sum::<i64>();
            assert_eq!(i64::from(rules.total_score(&grid)), expected);
            assert_eq!(expected, 20 * i64::from(multiplier) + 8);
        }
        assert!(!ScoreRules::new(MAX_DIAGONAL_MULTIPLIER + 1).is_exact());
    }

    #[test]
    fn test_rules_serde() {
        let rules: ScoreRules = serde_json::from_str("{}").unwrap();
        assert_eq!(rules, ScoreRules::default());

        let rules: ScoreRules = serde_json::from_str(r#"{"diagonal_multiplier":3}"#).unwrap();
        assert_eq!(rules.diagonal_multiplier, 3);
        assert_eq!(
            serde_json::to_string(&ScoreRules::default()).unwrap(),
            r#"{"diagonal_multiplier":2}"#
        );
    }
}
