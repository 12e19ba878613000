use std::iter;

use knister_engine::{GamePhase, KnisterGame};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::Line,
    widgets::{Block as BlockWidget, BlockExt as _, Widget},
};

use crate::ui::widgets::style;

/// Roll, rewards and running total of a game.
pub struct ScoreDisplay<'a> {
    game: &'a KnisterGame,
    preview: Option<i32>,
    block: Option<BlockWidget<'a>>,
}

impl<'a> ScoreDisplay<'a> {
    pub fn new(game: &'a KnisterGame) -> Self {
        Self {
            game,
            preview: None,
            block: None,
        }
    }

    /// Reward the cursor cell would earn.
    pub fn preview(self, reward: Option<i32>) -> Self {
        Self {
            preview: reward,
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
        20 + super::block_horizontal_margin(self.block.as_ref())
    }

    pub fn height(&self) -> u16 {
        u16::try_from(ROWS.len()).unwrap_or(u16::MAX)
            + super::block_vertical_margin(self.block.as_ref())
    }
}

fn signed(value: i32) -> String {
    format!("{value:+}")
}

#[derive(Clone, Copy)]
enum Row {
    Empty,
    FullLabel(&'static str),
    FullValue(&'static dyn Fn(&ScoreDisplay<'_>) -> String),
    LabelValue(&'static str, &'static dyn Fn(&ScoreDisplay<'_>) -> String),
}

const ROWS: &[Row] = &[
    Row::FullLabel("TOTAL:"),
    Row::FullValue(&|display| display.game.total_reward().to_string()),
    Row::Empty,
    Row::LabelValue("ROLL:", &|display| {
        display
            .game
            .current_roll()
            .map_or_else(|| "-".to_owned(), |roll| roll.to_string())
    }),
    Row::LabelValue("HERE:", &|display| {
        display.preview.map_or_else(|| "-".to_owned(), signed)
    }),
    Row::LabelValue("LAST:", &|display| signed(display.game.last_reward())),
    Row::Empty,
    Row::LabelValue("TURN:", &|display| {
        display.game.score_state().placements().to_string()
    }),
    Row::LabelValue("LEFT:", &|display| {
        display.game.available_actions().len().to_string()
    }),
    Row::LabelValue("DIAG x:", &|display| {
        display.game.rules().diagonal_multiplier.to_string()
    }),
];

impl Widget for ScoreDisplay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.block.as_ref().render(area, buf);
        let area = self.block.inner_if_some(area);

        let value_style = match self.game.phase() {
            GamePhase::Finished => style::SCORING,
            _ => style::DEFAULT,
        };

        let rows_areas =
            Layout::vertical((0..ROWS.len()).map(|_| Constraint::Length(1))).split(area);

        for (row, area) in iter::zip(ROWS.iter().copied(), rows_areas[..].iter().copied()) {
            match row {
                Row::Empty => {}
                Row::FullLabel(label) => {
                    Line::styled(label, style::LABEL)
                        .left_aligned()
                        .render(area, buf);
                }
                Row::FullValue(value) => {
                    Line::styled(value(&self), value_style)
                        .right_aligned()
                        .render(area, buf);
                }
                Row::LabelValue(label, value) => {
                    let [label_area, value_area] = area.layout(&Layout::horizontal([
                        Constraint::Fill(1),
                        Constraint::Fill(1),
                    ]));
                    Line::styled(label, style::LABEL)
                        .left_aligned()
                        .render(label_area, buf);
                    Line::styled(value(&self), style::DEFAULT)
                        .right_aligned()
                        .render(value_area, buf);
                }
            }
        }
    }
}
