use std::{collections::VecDeque, fmt, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Smallest sum two six-sided dice can show.
pub const MIN_ROLL: u8 = 2;
/// Largest sum two six-sided dice can show.
pub const MAX_ROLL: u8 = 12;

/// Supplies the dice sums a game places on the grid.
///
/// The game never generates randomness itself; it asks its `DiceSource` for
/// the next roll. Implementations are expected to return values in
/// [`MIN_ROLL`]`..=`[`MAX_ROLL`], but the game does not enforce it.
///
/// Any `FnMut() -> u8` closure is a dice source:
///
/// ```
/// use knister_engine::KnisterGame;
///
/// let mut next: u8 = 1;
/// let mut game = KnisterGame::with_dice(move || {
///     next = next % 11 + 2;
///     next
/// });
/// game.new_game();
/// assert_eq!(game.current_roll(), Some(3));
/// ```
pub trait DiceSource {
    fn roll(&mut self) -> u8;
}

impl<F> DiceSource for F
where
    F: FnMut() -> u8,
{
    fn roll(&mut self) -> u8 {
        self()
    }
}

/// Sum of two fair six-sided dice.
///
/// Produces values in `2..=12` with the triangular distribution peaking at 7
/// (probability 6/36) and bottoming out at 2 and 12 (1/36 each).
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoDice;

impl Distribution<u8> for TwoDice {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u8 {
        rng.random_range(1..=6) + rng.random_range(1..=6)
    }
}

/// Seed for deterministic dice rolls.
///
/// A 128-bit seed for the PCG generator behind [`SeededDice`]. The same seed
/// always produces the same roll sequence, which makes games reproducible for
/// recording, replay and testing.
///
/// Seeds serialize to, and parse from, a 32-character hex string.
///
/// ```
/// use knister_engine::{DiceSeed, DiceSource as _, SeededDice};
///
/// let seed: DiceSeed = "0123456789abcdef0123456789abcdef".parse().unwrap();
/// let mut a = SeededDice::with_seed(seed);
/// let mut b = SeededDice::with_seed(seed);
/// assert!((0..25).all(|_| a.roll() == b.roll()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiceSeed([u8; 16]);

impl DiceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub const fn to_bytes(self) -> [u8; 16] {
        self.0
    }
}

impl fmt::Display for DiceSeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:032x}", u128::from_be_bytes(self.0))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed {input:?}: expected 32 hex characters")]
pub struct ParseDiceSeedError {
    #[error(not(source))]
    pub input: String,
}

impl FromStr for DiceSeed {
    type Err = ParseDiceSeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDiceSeedError {
            input: s.to_owned(),
        };
        if s.len() != 32 || !s.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let num = u128::from_str_radix(s, 16).map_err(|_| err())?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl Serialize for DiceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DiceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `DiceSeed` values with `rng.random()`.
impl Distribution<DiceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> DiceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        DiceSeed(seed)
    }
}

/// Two-dice rolls from a seeded PCG generator.
#[derive(Debug, Clone)]
pub struct SeededDice {
    seed: DiceSeed,
    rng: Pcg32,
}

impl Default for SeededDice {
    fn default() -> Self {
        Self::new()
    }
}

impl SeededDice {
    /// Creates dice with a random seed drawn from the thread-local generator.
    ///
    /// For a reproducible roll sequence, use [`Self::with_seed`] instead.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    #[must_use]
    pub fn with_seed(seed: DiceSeed) -> Self {
        Self {
            seed,
            rng: Pcg32::from_seed(seed.0),
        }
    }

    /// The seed these dice were created with.
    #[must_use]
    pub fn seed(&self) -> DiceSeed {
        self.seed
    }
}

impl DiceSource for SeededDice {
    fn roll(&mut self) -> u8 {
        self.rng.sample(TwoDice)
    }
}

/// Replays a fixed sequence of rolls, starting over when it runs out.
///
/// Meant for tests and replays where the rolls are known in advance.
///
/// # Panics
///
/// [`ScriptedDice::new`] panics if the sequence is empty.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    rolls: VecDeque<u8>,
}

impl ScriptedDice {
    pub fn new<I>(rolls: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        let rolls = rolls.into_iter().collect::<VecDeque<_>>();
        assert!(!rolls.is_empty(), "scripted dice need at least one roll");
        Self { rolls }
    }
}

impl DiceSource for ScriptedDice {
    fn roll(&mut self) -> u8 {
        let roll = self.rolls[0];
        self.rolls.rotate_left(1);
        roll
    }
}
