use std::path::PathBuf;

use crate::{
    command::{DEFAULT_RECORD_DIR, GlobalArg},
    record::RecordingGame,
    schema::record::PlayerInfo,
    tui,
};

use self::app::PlayApp;

mod app;

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct PlayArg {
    /// Save the game recording to a file when the session ends
    #[clap(long)]
    save_recording: bool,
    /// Directory to save recording files
    #[clap(long, default_value = DEFAULT_RECORD_DIR)]
    record_dir: PathBuf,
}

impl Default for PlayArg {
    fn default() -> Self {
        Self {
            save_recording: false,
            record_dir: PathBuf::from(DEFAULT_RECORD_DIR),
        }
    }
}

pub(crate) fn run(arg: &PlayArg, global: &GlobalArg) -> anyhow::Result<()> {
    let PlayArg {
        save_recording,
        record_dir,
    } = arg;

    let rules = global.score_rules()?;
    let seed = global.seed_or_random();
    tracing::info!(%seed, ?rules, "starting game");

    let mut app = PlayApp::new(RecordingGame::new(seed, rules, PlayerInfo::Manual));
    tui::run(&mut app)?;

    let record = app.into_record();
    tracing::info!(
        score = record.final_score,
        turns = record.turns.len(),
        "game ended"
    );
    println!(
        "Final score: {} ({} placements, seed {})",
        record.final_score,
        record.turns.len(),
        record.seed
    );

    if *save_recording {
        let path = record.save(record_dir, None)?;
        println!("Recording saved to {}", path.display());
    }

    Ok(())
}
