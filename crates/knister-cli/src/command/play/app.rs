use crossterm::event::{Event, KeyCode};
use knister_engine::{CellPos, GamePhase};
use ratatui::{
    Frame,
    layout::{Constraint, Flex, Layout},
    style::Style,
    text::{Line, Text},
    widgets::{Block, Clear, Widget as _},
};

use crate::{
    record::RecordingGame,
    schema::record::RecordedGame,
    tui::App,
    ui::widgets::{GridDisplay, LinesDisplay, ScoreDisplay, color, style},
};

/// Interactive single-game screen.
#[derive(Debug)]
pub struct PlayApp {
    game: RecordingGame,
    cursor: CellPos,
    /// Row typed as the first half of a "row, column" jump.
    pending_row: Option<usize>,
    status: Option<String>,
    is_exiting: bool,
}

impl PlayApp {
    pub fn new(game: RecordingGame) -> Self {
        Self {
            game,
            cursor: CellPos::ORIGIN,
            pending_row: None,
            status: None,
            is_exiting: false,
        }
    }

    pub fn into_record(self) -> RecordedGame {
        self.game.into_record()
    }

    fn move_cursor(&mut self, next: fn(CellPos) -> Option<CellPos>) {
        if let Some(pos) = next(self.cursor) {
            self.cursor = pos;
        }
    }

    fn place_at_cursor(&mut self) {
        let index = self.cursor.index();
        match self.game.play(index) {
            Ok(reward) => {
                tracing::debug!(cell = %self.cursor, reward, "placed");
                self.status = None;
            }
            Err(err) => {
                tracing::debug!(cell = %self.cursor, %err, "placement rejected");
                self.status = Some(err.to_string());
            }
        }
    }

    fn enter_digit(&mut self, digit: usize) {
        match self.pending_row.take() {
            None => self.pending_row = Some(digit),
            Some(row) => {
                if let Some(pos) = CellPos::new(row, digit) {
                    self.cursor = pos;
                    self.place_at_cursor();
                }
            }
        }
    }

    fn help_text(&self) -> &'static str {
        match self.game.phase() {
            GamePhase::Finished => "Controls: Q (Quit)",
            _ if self.pending_row.is_some() => "Column 1-5 | Esc (Cancel) | Q (Quit)",
            _ => {
                "Controls: ← → ↑ ↓ / hjkl (Move) | Enter/Space (Place) | 1-5 1-5 (Row, Column) | Q (Quit)"
            }
        }
    }
}

impl App for PlayApp {
    fn should_exit(&self) -> bool {
        self.is_exiting
    }

    fn handle_event(&mut self, event: &Event) {
        let is_playing = !self.game.has_finished();

        let Some(event) = event.as_key_event() else {
            return;
        };
        match event.code {
            KeyCode::Left | KeyCode::Char('h') if is_playing => self.move_cursor(CellPos::left),
            KeyCode::Right | KeyCode::Char('l') if is_playing => self.move_cursor(CellPos::right),
            KeyCode::Up | KeyCode::Char('k') if is_playing => self.move_cursor(CellPos::up),
            KeyCode::Down | KeyCode::Char('j') if is_playing => self.move_cursor(CellPos::down),
            KeyCode::Enter | KeyCode::Char(' ') if is_playing => self.place_at_cursor(),
            KeyCode::Char(ch @ '1'..='5') if is_playing => {
                if let Some(digit) = ch.to_digit(10).and_then(|d| usize::try_from(d).ok()) {
                    self.enter_digit(digit - 1);
                }
            }
            KeyCode::Esc => self.pending_row = None,
            KeyCode::Char('q') => self.is_exiting = true,
            _ => {}
        }
    }

    fn draw(&self, frame: &mut Frame) {
        let is_finished = self.game.has_finished();
        let border_style = if is_finished {
            color::RED
        } else {
            color::WHITE
        };
        let panel = |title: &'static str| {
            Block::bordered()
                .title(Line::from(title).centered())
                .border_style(border_style)
                .style(style::DEFAULT)
        };

        let preview = self.game.preview_reward(self.cursor.index()).ok();
        let grid = GridDisplay::new(self.game.grid())
            .cursor(self.cursor)
            .preview(self.game.current_roll())
            .block(panel("GRID"));
        let score = ScoreDisplay::new(&self.game)
            .preview(preview)
            .block(panel("SCORE"));
        let breakdown = self.game.rules().breakdown(self.game.grid());
        let lines = LinesDisplay::new(&breakdown).block(panel("LINES"));

        let main_height = grid.height().max(score.height()).max(lines.height());
        let [main_area, status_area, help_area] = Layout::vertical([
            Constraint::Length(main_height),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        let [grid_area, score_area, lines_area] = Layout::horizontal([
            Constraint::Length(grid.width()),
            Constraint::Length(score.width()),
            Constraint::Length(lines.width()),
        ])
        .flex(Flex::Center)
        .spacing(1)
        .areas(main_area);

        let grid_area = grid_area.layout::<1>(&Layout::vertical([Constraint::Length(
            grid.height(),
        )]))[0];
        let score_area = score_area.layout::<1>(&Layout::vertical([Constraint::Length(
            score.height(),
        )]))[0];

        frame.render_widget(&grid, grid_area);
        frame.render_widget(score, score_area);
        frame.render_widget(lines, lines_area);

        if let Some(status) = &self.status {
            let status = Text::from(status.as_str())
                .style(Style::default().fg(color::YELLOW))
                .centered();
            frame.render_widget(status, status_area);
        }
        let help_text = Text::from(self.help_text())
            .style(Style::default().fg(color::GRAY))
            .centered();
        frame.render_widget(help_text, help_area);

        if is_finished {
            let style = Style::new().fg(color::WHITE).bg(color::RED);
            let message = format!("FINISHED: {} POINTS", self.game.total_reward());
            let block = Block::new().style(style);
            let text = Text::styled(message, style).centered();
            let area = grid_area.centered(Constraint::Length(grid.width()), Constraint::Length(3));
            let inner = block.inner(area);
            Clear.render(area, frame.buffer_mut());
            block.render(area, frame.buffer_mut());
            text.render(inner.centered_vertically(Constraint::Length(1)), frame.buffer_mut());
        }
    }
}
