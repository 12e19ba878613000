mod command;
mod policy;
mod record;
mod schema;
mod tui;
mod ui;
mod util;

fn main() -> anyhow::Result<()> {
    command::run()
}
