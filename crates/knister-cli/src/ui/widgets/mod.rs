use ratatui::{layout::Rect, widgets::Block as BlockWidget};

pub use self::{grid_display::*, lines_display::*, score_display::*};

mod grid_display;
mod lines_display;
mod score_display;

pub mod color {
    use ratatui::style::Color;

    pub const YELLOW: Color = Color::Rgb(255, 255, 0);
    pub const GREEN: Color = Color::Rgb(0, 255, 0);
    pub const RED: Color = Color::Rgb(255, 0, 0);
    pub const CYAN: Color = Color::Rgb(0, 255, 255);
    pub const GRAY: Color = Color::Rgb(127, 127, 127);
    pub const BLACK: Color = Color::Rgb(0, 0, 0);
    pub const WHITE: Color = Color::Rgb(255, 255, 255);
}

pub mod style {
    use ratatui::style::{Color, Modifier, Style};

    use crate::ui::widgets::color;

    const fn fg_bg(fg: Color, bg: Color) -> Style {
        Style::new().fg(fg).bg(bg)
    }

    pub const DEFAULT: Style = fg_bg(color::WHITE, color::BLACK);
    pub const LABEL: Style = fg_bg(color::GRAY, color::BLACK);
    pub const EMPTY_CELL: Style = fg_bg(color::GRAY, color::BLACK);
    pub const FILLED_CELL: Style = fg_bg(color::WHITE, color::BLACK).add_modifier(Modifier::BOLD);
    pub const CURSOR: Style = fg_bg(color::BLACK, color::CYAN);
    pub const PREVIEW: Style = fg_bg(color::BLACK, color::YELLOW);
    pub const SCORING: Style = fg_bg(color::GREEN, color::BLACK);
    pub const NEGATIVE: Style = fg_bg(color::RED, color::BLACK);
}

fn block_vertical_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.height - inner_rect.height
}

fn block_horizontal_margin(block: Option<&BlockWidget>) -> u16 {
    let dummy_rect = Rect::new(0, 0, 100, 100);
    let inner_rect = block.map_or(dummy_rect, |block| block.inner(dummy_rect));
    dummy_rect.width - inner_rect.width
}
