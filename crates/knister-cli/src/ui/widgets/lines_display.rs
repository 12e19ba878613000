use knister_engine::{Combination, LINE_COUNT, ScoreBreakdown};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

/// Combination and weighted score of each of the 12 lines.
#[derive(Debug)]
pub struct LinesDisplay<'a> {
    breakdown: &'a ScoreBreakdown,
    block: Option<BlockWidget<'a>>,
}

impl<'a> LinesDisplay<'a> {
    pub fn new(breakdown: &'a ScoreBreakdown) -> Self {
        Self {
            breakdown,
            block: None,
        }
    }

    pub fn block(self, block: BlockWidget<'a>) -> Self {
        Self {
            block: Some(block),
            ..self
        }
    }

    pub fn width(&self) -> u16 {
        36 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        #[expect(clippy::cast_possible_truncation)]
        let rows = LINE_COUNT as u16;
        rows + super::block_vertical_margin(self.block.as_ref())
    }
}

impl Widget for LinesDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let rows = Layout::vertical((0..LINE_COUNT).map(|_| Constraint::Length(1))).split(area);
        for (line, &row_area) in self.breakdown.lines().iter().zip(rows.iter()) {
            let [name_area, score_area] = row_area.layout(&Layout::horizontal([
                Constraint::Fill(1),
                Constraint::Length(4),
            ]));

            let combination_style = match line.combination {
                Combination::None => style::EMPTY_CELL,
                _ => style::SCORING,
            };
            let score_style = if line.score < 0 {
                style::NEGATIVE
            } else {
                style::DEFAULT
            };

            Line::from(vec![
                Span::styled(format!("{:<14}", line.kind.to_string()), style::LABEL),
                Span::styled(line.combination.to_string(), combination_style),
            ])
            .render(name_area, buf);
            Line::styled(line.score.to_string(), score_style)
                .right_aligned()
                .render(score_area, buf);
        }
    }
}
