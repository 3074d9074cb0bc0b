//! Runner entity types: pure data, no logic.

use crate::flow::{MenuChoice, Phase};
use crate::score_store::{BestDistance, Leaderboard};

use super::tuning::{Rules, CLASSIC_RULES, SQUIG_RULES, SQUIG_RADIUS, SQUIG_X, SQUIG_Y};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunnerVariant {
    Squig,
    Classic,
}

impl RunnerVariant {
    pub fn rules(self) -> Rules {
        match self {
            RunnerVariant::Squig => SQUIG_RULES,
            RunnerVariant::Classic => CLASSIC_RULES,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Squig {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub vy: f32,
    pub on_ground: bool,
}

impl Default for Squig {
    fn default() -> Self {
        Squig {
            x: SQUIG_X,
            y: SQUIG_Y,
            radius: SQUIG_RADIUS,
            vy: 0.0,
            on_ground: true,
        }
    }
}

/// A mine. Touching one ends the run.
#[derive(Clone, Debug, PartialEq)]
pub struct Trap {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RunProgress {
    pub distance: f32,
    pub speed: f32,
    /// Last `distance / chunk` block that earned a speed-up.
    pub last_chunk: u32,
    pub trap_cooldown: f32,
    pub safe_start: u32,
    /// Steps since the last fixed-interval spawn.
    pub spawn_timer: u32,
    pub bg_x: f32,
    pub steps: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Records {
    Leaderboard(Leaderboard),
    Best(BestDistance),
}

impl Records {
    pub fn best(&self) -> u32 {
        match self {
            Records::Leaderboard(board) => board.best(),
            Records::Best(best) => best.distance,
        }
    }
}

/// What the game-over screen is showing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OverScreen {
    /// Collecting initials for a leaderboard entry.
    Entry { initials: String },
    Retry,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub variant: RunnerVariant,
    pub phase: Phase,
    pub squig: Squig,
    pub traps: Vec<Trap>,
    pub run: RunProgress,
    /// Starting speed for the next run.
    pub start_speed: f32,
    /// Unsimulated time carried to the next frame.
    pub accumulator: f32,
    pub records: Records,
    pub over: OverScreen,
    pub menu: MenuChoice,
    pub final_score: u32,
    /// Index into `TIPS` shown on the pause screen.
    pub tip: usize,
}
