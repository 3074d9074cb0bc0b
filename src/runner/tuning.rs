//! Runner tuning. The runners step at a fixed 60 Hz, so speeds are per
//! step.

pub const VIEW_W: usize = 800;
pub const VIEW_H: usize = 400;
pub const FLOOR_Y: f32 = 350.0;

pub const STEP_DT: f32 = 1.0 / 60.0;

pub const GRAVITY: f32 = 0.25;
pub const JUMP_VELOCITY: f32 = -10.0;

pub const SQUIG_X: f32 = 100.0;
pub const SQUIG_Y: f32 = 325.0;
pub const SQUIG_RADIUS: f32 = 25.0;

pub const TRAP_SIZE: f32 = 40.0;
pub const BG_SCROLL: f32 = 0.5;

// ── Starting speed (the Squig Run difficulty slider) ──────────────────────────

pub const MIN_START_SPEED: f32 = 1.0;
pub const MAX_START_SPEED: f32 = 10.0;
pub const DEFAULT_START_SPEED: f32 = 5.0;
pub const START_SPEED_STEP: f32 = 0.5;

pub const MAX_INITIALS: usize = 3;
pub const DEFAULT_INITIALS: &str = "YOU";

pub const TIPS: [&str; 4] = [
    "Tip: Press Space to jump over mines!",
    "Watch out! Speed increases every 1000m.",
    "Pause with ESC anytime.",
    "Try slower speeds if new!",
];

/// Largest mine pattern that may spawn at `speed`.
pub fn max_traps(speed: f32) -> u32 {
    if speed < 3.0 {
        1
    } else if speed < 6.0 {
        2
    } else {
        3
    }
}

// ── Variant rules ─────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SpawnRule {
    /// One mine every `every` steps.
    Fixed { every: u32, lead: f32 },
    /// After a grace period, each step off cooldown has `chance` to spawn a
    /// pattern of mines `gap` apart.
    Random {
        safe_start: u32,
        chance: f64,
        cooldown_min: f32,
        cooldown_spread: f32,
        lead: f32,
        gap: f32,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rules {
    pub title: &'static str,
    /// `None` when the player picks it on the title screen.
    pub fixed_start_speed: Option<f32>,
    /// Distance between speed-ups.
    pub chunk: f32,
    pub speed_step: f32,
    pub spawn: SpawnRule,
}

pub const SQUIG_RULES: Rules = Rules {
    title: "SQUIG RUN",
    fixed_start_speed: None,
    chunk: 1000.0,
    speed_step: 0.25,
    spawn: SpawnRule::Random {
        safe_start: 150,
        chance: 0.02,
        cooldown_min: 100.0,
        cooldown_spread: 100.0,
        lead: 100.0,
        gap: 10.0,
    },
};

pub const CLASSIC_RULES: Rules = Rules {
    title: "SQUIG CLASSIC",
    fixed_start_speed: Some(6.0),
    chunk: 1500.0,
    speed_step: 0.5,
    spawn: SpawnRule::Fixed {
        every: 80,
        lead: 10.0,
    },
};
