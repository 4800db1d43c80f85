// src/cli.rs
use clap::Parser;
use std::path::PathBuf;

use crate::config::AppConfig;
use crate::pipeline::RunMode;

#[derive(Debug, Clone, Parser)]
#[command(
    name = "game-trends-bot",
    about = "Collect game popularity signals and publish ranked CSV/JSON snapshots",
    version
)]
pub struct Cli {
    /// Which steps of the cycle to run.
    #[arg(long, value_enum, default_value_t = RunMode::All)]
    pub mode: RunMode,
    /// Output root (overrides DATA_DIR).
    #[arg(long, value_name = "path")]
    pub data_dir: Option<PathBuf>,
    /// Scoring weights file, TOML or JSON (overrides SCORING_WEIGHTS_PATH).
    #[arg(long, value_name = "path")]
    pub weights: Option<PathBuf>,
    /// Entries per published top list (overrides TOP_N).
    #[arg(long)]
    pub top_n: Option<usize>,
    /// Twitch categories to request (overrides LIMIT_GAMES).
    #[arg(long)]
    pub limit_games: Option<usize>,
}

impl Cli {
    /// Flags take precedence over environment values.
    pub fn apply(&self, cfg: &mut AppConfig) {
        if let Some(dir) = &self.data_dir {
            cfg.data_dir = dir.clone();
        }
        if let Some(n) = self.top_n {
            cfg.top_n = n;
        }
        if let Some(n) = self.limit_games {
            cfg.limit_games = n;
        }
    }
}
