use std::iter;

use knister_engine::{CellPos, GRID_SIZE, Grid};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

const CELL_WIDTH: u16 = 4;
const LABEL_WIDTH: u16 = 2;
#[expect(clippy::cast_possible_truncation)]
const GRID_CELLS: u16 = GRID_SIZE as u16;

/// The 5×5 grid with 1-based row and column labels.
///
/// The cursor cell is highlighted; when a preview value is set and the cursor
/// cell is empty, the value is shown there before it is placed.
#[derive(Debug)]
pub struct GridDisplay<'a> {
    grid: &'a Grid,
    cursor: Option<CellPos>,
    preview: Option<u8>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> GridDisplay<'a> {
    pub fn new(grid: &'a Grid) -> Self {
        Self {
            grid,
            cursor: None,
            preview: None,
            block: None,
        }
    }

    pub fn cursor(self, cursor: CellPos) -> Self {
        Self {
            cursor: Some(cursor),
            ..self
        }
    }

    pub fn preview(self, value: Option<u8>) -> Self {
        Self {
            preview: value,
            ..self
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        LABEL_WIDTH + GRID_CELLS * CELL_WIDTH + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        // header, then one line per row with a blank line between rows
        1 + GRID_CELLS * 2 - 1 + super::block_vertical_margin(self.block.as_ref())
    }

    fn cell_line(&self, pos: CellPos) -> Line<'static> {
        let is_cursor = self.cursor == Some(pos);
        match (self.grid.cell_at(pos), self.preview) {
            (Some(value), _) => {
                let style = if is_cursor {
                    style::CURSOR
                } else {
                    style::FILLED_CELL
                };
                Line::styled(value.to_string(), style)
            }
            (None, Some(preview)) if is_cursor => Line::styled(preview.to_string(), style::PREVIEW),
            (None, _) if is_cursor => Line::styled("·", style::CURSOR),
            (None, _) => Line::styled("·", style::EMPTY_CELL),
        }
    }
}

impl Widget for GridDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer)
    where
        Self: Sized,
    {
        Widget::render(&self, area, buf);
    }
}

impl Widget for &GridDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let [header_area, rows_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Fill(1)]).areas(area);
        let vertical = Layout::vertical((0..GRID_SIZE).map(|_| Constraint::Length(1))).spacing(1);
        let horizontal = Layout::horizontal(
            iter::once(Constraint::Length(LABEL_WIDTH))
                .chain((0..GRID_SIZE).map(|_| Constraint::Length(CELL_WIDTH))),
        )
        .flex(Flex::Start);

        let header_cells = header_area.layout::<{ GRID_SIZE + 1 }>(&horizontal);
        for (col, cell_area) in header_cells.into_iter().skip(1).enumerate() {
            Line::styled((col + 1).to_string(), style::LABEL)
                .centered()
                .render(cell_area, buf);
        }

        for (row, row_area) in rows_area.layout::<GRID_SIZE>(&vertical).into_iter().enumerate() {
            let [label_area, cell_areas @ ..] = row_area.layout::<{ GRID_SIZE + 1 }>(&horizontal);
            Line::styled((row + 1).to_string(), style::LABEL)
                .left_aligned()
                .render(label_area, buf);
            for (col, cell_area) in cell_areas.into_iter().enumerate() {
                let Some(pos) = CellPos::new(row, col) else {
                    continue;
                };
                self.cell_line(pos).centered().render(cell_area, buf);
            }
        }
    }
}
