use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::GRID_SIZE;

/// The value pattern a line scores for.
///
/// | Combination       | Count shape   | Score |
/// |-------------------|---------------|-------|
/// | Five of a kind    | `[5]`         | 10    |
/// | Four of a kind    | `[4, 1]`      | 6     |
/// | Full house        | `[3, 2]`      | 8     |
/// | Three of a kind   | `[3, 1, 1]`   | 3     |
/// | Two pair          | `[2, 2, 1]`   | 3     |
/// | One pair          | `[2, 1, 1, 1]`| 1     |
/// | Straight, no 7    | 5 in a row    | 12    |
/// | Straight with 7   | 5 in a row    | 8     |
/// | None              | anything else | 0     |
///
/// Partially filled lines are classified by their leading counts, so a line
/// holding only `[9, 9]` already scores a pair and `[4, 4, 4, 4]` four of a
/// kind.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum Combination {
    #[display("five of a kind")]
    FiveOfAKind,
    #[display("four of a kind")]
    FourOfAKind,
    #[display("full house")]
    FullHouse,
    #[display("three of a kind")]
    ThreeOfAKind,
    #[display("two pair")]
    TwoPair,
    #[display("one pair")]
    OnePair,
    #[display("straight without 7")]
    StraightNo7,
    #[display("straight with 7")]
    StraightWith7,
    #[display("none")]
    None,
}

impl Combination {
    pub const ALL: [Self; 9] = [
        Self::FiveOfAKind,
        Self::FourOfAKind,
        Self::FullHouse,
        Self::ThreeOfAKind,
        Self::TwoPair,
        Self::OnePair,
        Self::StraightNo7,
        Self::StraightWith7,
        Self::None,
    ];

    /// Classifies the filled values of one line.
    ///
    /// Order of `values` does not matter. More than five values never occur
    /// on a line and classify as [`Combination::None`].
    ///
    /// ```
    /// use knister_engine::Combination;
    ///
    /// assert_eq!(Combination::classify(&[7, 5, 7, 5, 7]), Combination::FullHouse);
    /// assert_eq!(Combination::classify(&[6, 2, 4, 3, 5]), Combination::StraightNo7);
    /// assert_eq!(Combination::classify(&[9, 9]), Combination::OnePair);
    /// assert_eq!(Combination::classify(&[12]), Combination::None);
    /// ```
    #[must_use]
    pub fn classify(values: &[u8]) -> Self {
        let Ok(mut sorted) = ArrayVec::<u8, GRID_SIZE>::try_from(values) else {
            return Self::None;
        };
        sorted.sort_unstable();

        if let Some(straight) = Self::straight(&sorted) {
            return straight;
        }

        let mut counts = sorted
            .chunk_by(|a, b| a == b)
            .map(<[u8]>::len)
            .collect::<ArrayVec<usize, GRID_SIZE>>();
        counts.sort_unstable_by(|a, b| b.cmp(a));

        match counts.as_slice() {
            [5] => Self::FiveOfAKind,
            [4] | [4, 1] => Self::FourOfAKind,
            [3, 2] => Self::FullHouse,
            [3, ..] => Self::ThreeOfAKind,
            [2, 2, ..] => Self::TwoPair,
            [2, ..] => Self::OnePair,
            _ => Self::None,
        }
    }

    fn straight(sorted: &[u8]) -> Option<Self> {
        let is_run = sorted.len() == GRID_SIZE
            && sorted
                .windows(2)
                .all(|pair| pair[0].checked_add(1) == Some(pair[1]));
        if !is_run {
            return None;
        }
        if sorted.contains(&7) {
            Some(Self::StraightWith7)
        } else {
            Some(Self::StraightNo7)
        }
    }

    /// Unweighted points for a line with this combination.
    #[must_use]
    pub const fn score(self) -> i32 {
        match self {
            Self::FiveOfAKind => 10,
            Self::FourOfAKind => 6,
            Self::FullHouse | Self::StraightWith7 => 8,
            Self::ThreeOfAKind | Self::TwoPair => 3,
            Self::OnePair => 1,
            Self::StraightNo7 => 12,
            Self::None => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(values: &[u8]) -> (Combination, i32) {
        let combination = Combination::classify(values);
        (combination, combination.score())
    }

    #[test]
    fn test_five_of_a_kind() {
        assert_eq!(classify(&[7, 7, 7, 7, 7]), (Combination::FiveOfAKind, 10));
        assert_eq!(classify(&[2, 2, 2, 2, 2]), (Combination::FiveOfAKind, 10));
    }

    #[test]
    fn test_four_of_a_kind() {
        assert_eq!(classify(&[7, 7, 7, 7, 5]), (Combination::FourOfAKind, 6));
        assert_eq!(classify(&[3, 11, 11, 11, 11]), (Combination::FourOfAKind, 6));
    }

    #[test]
    fn test_full_house() {
        assert_eq!(classify(&[7, 7, 7, 5, 5]), (Combination::FullHouse, 8));
        assert_eq!(classify(&[5, 7, 5, 7, 7]), (Combination::FullHouse, 8));
    }

    #[test]
    fn test_three_of_a_kind() {
        assert_eq!(classify(&[8, 8, 8, 2, 12]), (Combination::ThreeOfAKind, 3));
    }

    #[test]
    fn test_two_pair() {
        assert_eq!(classify(&[4, 4, 9, 9, 6]), (Combination::TwoPair, 3));
    }

    #[test]
    fn test_one_pair() {
        assert_eq!(classify(&[4, 4, 9, 10, 6]), (Combination::OnePair, 1));
    }

    #[test]
    fn test_straight_without_seven() {
        assert_eq!(classify(&[2, 3, 4, 5, 6]), (Combination::StraightNo7, 12));
        assert_eq!(classify(&[12, 10, 11, 9, 8]), (Combination::StraightNo7, 12));
    }

    #[test]
    fn test_straight_with_seven() {
        assert_eq!(classify(&[5, 6, 7, 8, 9]), (Combination::StraightWith7, 8));
        assert_eq!(classify(&[7, 3, 5, 4, 6]), (Combination::StraightWith7, 8));
    }

    #[test]
    fn test_distinct_without_run_scores_nothing() {
        assert_eq!(classify(&[2, 3, 4, 5, 7]), (Combination::None, 0));
        assert_eq!(classify(&[2, 4, 6, 8, 10]), (Combination::None, 0));
    }

    #[test]
    fn test_fewer_than_two_values_score_nothing() {
        assert_eq!(classify(&[]), (Combination::None, 0));
        assert_eq!(classify(&[7]), (Combination::None, 0));
    }

    #[test]
    fn test_partial_lines_use_leading_counts() {
        assert_eq!(classify(&[9, 9]), (Combination::OnePair, 1));
        assert_eq!(classify(&[9, 9, 3]), (Combination::OnePair, 1));
        assert_eq!(classify(&[9, 9, 3, 4]), (Combination::OnePair, 1));
        assert_eq!(classify(&[9, 9, 9]), (Combination::ThreeOfAKind, 3));
        assert_eq!(classify(&[9, 9, 9, 3]), (Combination::ThreeOfAKind, 3));
        assert_eq!(classify(&[9, 9, 3, 3]), (Combination::TwoPair, 3));
        assert_eq!(classify(&[9, 9, 9, 9]), (Combination::FourOfAKind, 6));
        assert_eq!(classify(&[2, 3]), (Combination::None, 0));
        assert_eq!(classify(&[2, 3, 4, 5]), (Combination::None, 0));
    }

    #[test]
    fn test_order_does_not_matter() {
        let values = [7, 5, 7, 5, 7];
        let expected = Combination::classify(&values);
        for rotation in 0..values.len() {
            let mut rotated = values;
            rotated.rotate_left(rotation);
            assert_eq!(Combination::classify(&rotated), expected);
        }
    }

    #[test]
    fn test_too_many_values() {
        assert_eq!(classify(&[7; 6]), (Combination::None, 0));
    }

    #[test]
    fn test_run_at_u8_limit_is_not_overflow() {
        assert_eq!(classify(&[251, 252, 253, 254, 255]), (Combination::StraightNo7, 12));
    }

    #[test]
    fn test_display() {
        assert_eq!(Combination::FullHouse.to_string(), "full house");
        assert_eq!(Combination::StraightWith7.to_string(), "straight with 7");
        assert_eq!(Combination::None.to_string(), "none");
    }
}
