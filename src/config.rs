//! Command-line configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::runner::tuning::{DEFAULT_START_SPEED, MAX_START_SPEED, MIN_START_SPEED};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum GameChoice {
    Boneblade,
    SquigRun,
    Classic,
}

/// Terminal arcade cabinet: Boneblade, Squig Run and Squig Classic
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Jump straight into a game instead of showing the launcher
    #[arg(short, long, value_enum)]
    pub game: Option<GameChoice>,

    /// Where best scores and the log file live (default: ~/.arcade_cabinet)
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Directory holding the *.sprite files
    #[arg(long, default_value = "assets")]
    pub asset_dir: PathBuf,

    /// Frames per second of the frame driver
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u32).range(10..=120))]
    pub fps: u32,

    /// Starting speed for Squig Run (the title screen can still adjust it)
    #[arg(long, default_value_t = DEFAULT_START_SPEED)]
    pub speed: f32,

    /// Seed the random number generator for a repeatable session
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log file (default: <data-dir>/arcade.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Resolved settings with every default filled in.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub game: Option<GameChoice>,
    pub data_dir: PathBuf,
    pub asset_dir: PathBuf,
    pub fps: u32,
    pub start_speed: f32,
    pub seed: Option<u64>,
    pub log_file: PathBuf,
    pub verbose: bool,
}

/// `$HOME/.arcade_cabinet`, or `./.arcade_cabinet` when HOME is unset.
pub fn default_data_dir() -> PathBuf {
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".arcade_cabinet")
}

impl Args {
    pub fn into_settings(self) -> Settings {
        let data_dir = self.data_dir.unwrap_or_else(default_data_dir);
        let log_file = self
            .log_file
            .unwrap_or_else(|| data_dir.join("arcade.log"));
        Settings {
            game: self.game,
            data_dir,
            asset_dir: self.asset_dir,
            fps: self.fps,
            start_speed: self.speed.clamp(MIN_START_SPEED, MAX_START_SPEED),
            seed: self.seed,
            log_file,
            verbose: self.verbose,
        }
    }
}
