pub use self::{combination::*, grid::*, line::*};

pub(crate) mod combination;
pub(crate) mod grid;
pub(crate) mod line;

/// Number of rows and columns of the grid, and the length of every line.
pub const GRID_SIZE: usize = 5;
/// Total number of cells on the grid.
pub const CELL_COUNT: usize = GRID_SIZE * GRID_SIZE;
