use std::{fmt, str::FromStr};

use arrayvec::ArrayVec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::InvalidActionError;

use super::{CELL_COUNT, GRID_SIZE};

/// Row/column coordinate of a grid cell.
///
/// Cell indices map to coordinates row-major: `row = index / 5`,
/// `col = index % 5`.
///
/// Deserializing goes through [`CellPos::new`], so out-of-grid coordinates
/// are rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RawCellPos")]
pub struct CellPos {
    row: usize,
    col: usize,
}

#[derive(Deserialize)]
struct RawCellPos {
    row: usize,
    col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("cell ({row}, {col}) lies outside the 5x5 grid")]
pub struct CellOutOfRangeError {
    pub row: usize,
    pub col: usize,
}

impl TryFrom<RawCellPos> for CellPos {
    type Error = CellOutOfRangeError;

    fn try_from(RawCellPos { row, col }: RawCellPos) -> Result<Self, Self::Error> {
        Self::new(row, col).ok_or(CellOutOfRangeError { row, col })
    }
}

impl CellPos {
    pub const ORIGIN: Self = Self { row: 0, col: 0 };

    /// Returns the position at `(row, col)`, or `None` if it lies outside the grid.
    #[must_use]
    pub const fn new(row: usize, col: usize) -> Option<Self> {
        if row < GRID_SIZE && col < GRID_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        Self::new(index / GRID_SIZE, index % GRID_SIZE)
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.row * GRID_SIZE + self.col
    }

    #[must_use]
    pub const fn row(self) -> usize {
        self.row
    }

    #[must_use]
    pub const fn col(self) -> usize {
        self.col
    }

    #[must_use]
    pub fn up(self) -> Option<Self> {
        Self::new(self.row.checked_sub(1)?, self.col)
    }

    #[must_use]
    pub fn down(self) -> Option<Self> {
        Self::new(self.row + 1, self.col)
    }

    #[must_use]
    pub fn left(self) -> Option<Self> {
        Self::new(self.row, self.col.checked_sub(1)?)
    }

    #[must_use]
    pub fn right(self) -> Option<Self> {
        Self::new(self.row, self.col + 1)
    }
}

/// Formats as 1-based `row,col`, the form players type.
impl fmt::Display for CellPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row + 1, self.col + 1)
    }
}

/// The 5×5 playing grid.
///
/// Each cell is either empty or holds the dice sum placed into it. Cells are
/// only ever filled, never cleared, so a grid moves monotonically from
/// [`Grid::EMPTY`] to full.
///
/// Values are not validated against the `2..=12` dice range; the game
/// controller decides what gets placed.
///
/// # Text format
///
/// [`FromStr`] and the serde representation use a compact form: five rows
/// separated by `/`, one character per cell, `.` for an empty cell and a hex
/// digit for a value.
///
/// ```
/// use knister_engine::Grid;
///
/// let grid: Grid = "77777/...../..a../...../2....".parse().unwrap();
/// assert_eq!(grid.cell(0), Some(7));
/// assert_eq!(grid.cell(12), Some(10));
/// assert_eq!(grid.cell(20), Some(2));
/// assert_eq!(grid.filled_count(), 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    cells: [Option<u8>; CELL_COUNT],
}

impl Default for Grid {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Grid {
    pub const EMPTY: Self = Self {
        cells: [None; CELL_COUNT],
    };

    #[must_use]
    pub const fn from_cells(cells: [Option<u8>; CELL_COUNT]) -> Self {
        Self { cells }
    }

    #[must_use]
    pub const fn cells(&self) -> &[Option<u8>; CELL_COUNT] {
        &self.cells
    }

    /// Returns the value at `index`, or `None` if the cell is empty or out of range.
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<u8> {
        self.cells.get(index).copied().flatten()
    }

    #[must_use]
    pub fn cell_at(&self, pos: CellPos) -> Option<u8> {
        self.cells[pos.index()]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Option<u8>]> {
        self.cells.chunks_exact(GRID_SIZE)
    }

    /// Returns `true` if `index` is on the grid and the cell is empty.
    #[must_use]
    pub fn is_cell_empty(&self, index: usize) -> bool {
        self.cells.get(index).is_some_and(Option::is_none)
    }

    /// Iterates over the empty cell indices in ascending order.
    pub fn empty_cell_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.cells
            .iter()
            .enumerate()
            .filter_map(|(index, cell)| cell.is_none().then_some(index))
    }

    /// Collects [`Self::empty_cell_indices`].
    #[must_use]
    pub fn available_actions(&self) -> ArrayVec<usize, CELL_COUNT> {
        self.empty_cell_indices().collect()
    }

    #[must_use]
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(Option::is_none)
    }

    /// Writes `value` into the empty cell at `index`.
    ///
    /// Fails without touching the grid if `index` is out of range or the cell
    /// is already filled.
    pub fn place(&mut self, index: usize, value: u8) -> Result<(), InvalidActionError> {
        match self.cells.get_mut(index) {
            Some(cell) if cell.is_none() => {
                *cell = Some(value);
                Ok(())
            }
            _ => Err(InvalidActionError { index }),
        }
    }

    /// Like [`Self::place`], but returns the resulting grid and leaves `self` as is.
    pub fn with_placed(&self, index: usize, value: u8) -> Result<Self, InvalidActionError> {
        let mut grid = self.clone();
        grid.place(index, value)?;
        Ok(grid)
    }

    fn to_compact_string(&self) -> Option<String> {
        let mut s = String::with_capacity(CELL_COUNT + GRID_SIZE - 1);
        for (row_index, row) in self.rows().enumerate() {
            if row_index > 0 {
                s.push('/');
            }
            for cell in row {
                match cell {
                    Some(value) => s.push(char::from_digit(u32::from(*value), 16)?),
                    None => s.push('.'),
                }
            }
        }
        Some(s)
    }
}

/// Renders the grid as five lines of right-aligned values, `.` for empty cells.
impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (row_index, row) in self.rows().enumerate() {
            if row_index > 0 {
                writeln!(f)?;
            }
            for cell in row {
                match cell {
                    Some(value) => write!(f, "{value:>3}")?,
                    None => write!(f, "{:>3}", '.')?,
                }
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseGridError {
    #[display("expected 5 rows separated by '/', found {found}")]
    RowCount { found: usize },
    #[display("row {row} has {found} cells, expected 5")]
    RowLength { row: usize, found: usize },
    #[display("invalid cell {ch:?} at row {row}, column {col}")]
    InvalidCell { row: usize, col: usize, ch: char },
}

impl FromStr for Grid {
    type Err = ParseGridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s.split('/').collect::<Vec<_>>();
        if rows.len() != GRID_SIZE {
            return Err(ParseGridError::RowCount { found: rows.len() });
        }

        let mut grid = Self::EMPTY;
        for (row, text) in rows.into_iter().enumerate() {
            let found = text.chars().count();
            if found != GRID_SIZE {
                return Err(ParseGridError::RowLength { row, found });
            }
            for (col, ch) in text.chars().enumerate() {
                let cell = match ch {
                    '.' => None,
                    _ => {
                        let digit = ch
                            .to_digit(16)
                            .ok_or(ParseGridError::InvalidCell { row, col, ch })?;
                        Some(u8::try_from(digit).map_err(|_| ParseGridError::InvalidCell {
                            row,
                            col,
                            ch,
                        })?)
                    }
                };
                grid.cells[row * GRID_SIZE + col] = cell;
            }
        }
        Ok(grid)
    }
}

impl Serialize for Grid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let s = self.to_compact_string().ok_or_else(|| {
            serde::ser::Error::custom("grid holds a value above 15, which has no compact form")
        })?;
        serializer.serialize_str(&s)
    }
}

impl<'de> Deserialize<'de> for Grid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse()
            .map_err(|e| serde::de::Error::custom(format!("invalid grid {s:?}: {e}")))
    }
}
