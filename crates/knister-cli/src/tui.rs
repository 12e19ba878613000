use crossterm::event::{self, Event};
use ratatui::Frame;

/// Trait for TUI applications.
///
/// Applications executed by [`run`] must implement this trait.
pub trait App {
    /// Returns whether the application should exit.
    fn should_exit(&self) -> bool;

    /// Handles terminal events (key input, resize, etc.).
    fn handle_event(&mut self, event: &Event);

    /// Draws the screen.
    fn draw(&self, frame: &mut Frame);
}

/// Runs `app` until it asks to exit.
///
/// The game only changes in response to input, so the loop blocks on the
/// next terminal event and redraws after each one.
pub fn run<A>(app: &mut A) -> anyhow::Result<()>
where
    A: App,
{
    ratatui::run(|terminal| {
        while !app.should_exit() {
            terminal.draw(|frame| app.draw(frame))?;
            let event = event::read()?;
            app.handle_event(&event);
        }
        Ok(())
    })
}
