use std::{array, fmt};

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use super::{CELL_COUNT, Combination, GRID_SIZE, Grid};

/// Number of scoring lines: 5 rows, 5 columns and 2 diagonals.
pub const LINE_COUNT: usize = 2 * GRID_SIZE + 2;

/// Identifies one of the 12 scoring lines.
///
/// Row and column numbers are 0-based. A `Row` or `Column` number outside
/// `0..5` names no cells.
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
    derive_more::IsVariant,
)]
pub enum LineKind {
    Row(usize),
    Column(usize),
    /// Top-left to bottom-right: cells 0, 6, 12, 18, 24.
    MainDiagonal,
    /// Top-right to bottom-left: cells 4, 8, 12, 16, 20.
    AntiDiagonal,
}

impl LineKind {
    /// All lines in scoring order: rows, then columns, then the two diagonals.
    pub const ALL: [Self; LINE_COUNT] = [
        Self::Row(0),
        Self::Row(1),
        Self::Row(2),
        Self::Row(3),
        Self::Row(4),
        Self::Column(0),
        Self::Column(1),
        Self::Column(2),
        Self::Column(3),
        Self::Column(4),
        Self::MainDiagonal,
        Self::AntiDiagonal,
    ];

    #[must_use]
    pub fn is_diagonal(self) -> bool {
        matches!(self, Self::MainDiagonal | Self::AntiDiagonal)
    }

    /// Returns the indices of the cells on this line, in line order.
    #[must_use]
    pub fn cell_indices(self) -> [usize; GRID_SIZE] {
        match self {
            Self::Row(row) => {
                array::from_fn(|col| row.saturating_mul(GRID_SIZE).saturating_add(col))
            }
            Self::Column(col) => array::from_fn(|row| (row * GRID_SIZE).saturating_add(col)),
            Self::MainDiagonal => array::from_fn(|i| i * GRID_SIZE + i),
            Self::AntiDiagonal => array::from_fn(|i| i * GRID_SIZE + (GRID_SIZE - 1 - i)),
        }
    }

    #[must_use]
    pub fn contains(self, index: usize) -> bool {
        index < CELL_COUNT && self.cell_indices().contains(&index)
    }

    /// Lines passing through the cell at `index`.
    ///
    /// Every cell lies on its row and its column; the center cell also lies on
    /// both diagonals.
    pub fn through(index: usize) -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(move |kind| kind.contains(index))
    }
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Row(row) => write!(f, "row {}", row.saturating_add(1)),
            Self::Column(col) => write!(f, "column {}", col.saturating_add(1)),
            Self::MainDiagonal => f.write_str("main diagonal"),
            Self::AntiDiagonal => f.write_str("anti-diagonal"),
        }
    }
}

/// The filled values of one line, taken from a grid snapshot.
///
/// Empty cells are skipped, so a line holds 0 to 5 values. Their order
/// follows the line but has no effect on scoring.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    kind: LineKind,
    values: ArrayVec<u8, GRID_SIZE>,
}

impl Line {
    #[must_use]
    pub fn extract(grid: &Grid, kind: LineKind) -> Self {
        let values = kind
            .cell_indices()
            .into_iter()
            .filter_map(|index| grid.cell(index))
            .collect();
        Self { kind, values }
    }

    #[must_use]
    pub fn kind(&self) -> LineKind {
        self.kind
    }

    #[must_use]
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    #[must_use]
    pub fn is_diagonal(&self) -> bool {
        self.kind.is_diagonal()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.values.is_full()
    }

    #[must_use]
    pub fn combination(&self) -> Combination {
        Combination::classify(&self.values)
    }
}

impl Grid {
    /// Extracts all 12 lines in [`LineKind::ALL`] order.
    pub fn lines(&self) -> impl Iterator<Item = Line> + '_ {
        LineKind::ALL
            .into_iter()
            .map(move |kind| Line::extract(self, kind))
    }
}
