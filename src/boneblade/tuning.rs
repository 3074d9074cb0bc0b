//! Boneblade tuning. Per-frame speeds are authored for 60 Hz and scaled by
//! the frame's `dt`; timers are in seconds.

use std::f32::consts::PI;

// ── View / arena ──────────────────────────────────────────────────────────────

pub const VIEW_W: usize = 240;
pub const VIEW_H: usize = 135;

pub const ARENA_RADIUS: f32 = 380.0;
pub const WALL_WIDTH: f32 = 6.0;
/// Player stays this far inside the wall's inner edge.
pub const PLAYER_WALL_MARGIN: f32 = 3.0;

pub const REFERENCE_FPS: f32 = 60.0;

// ── Player ────────────────────────────────────────────────────────────────────

pub const PLAYER_RADIUS: f32 = 4.0;
pub const BASE_SPEED: f32 = 1.55;
pub const HP_MAX: u32 = 5;
pub const HIT_IFRAMES: f32 = 0.9;

pub const ATTACK_DURATION: f32 = 0.18;
pub const ATTACK_COOLDOWN: f32 = 0.28;
/// Share of the swing during which it can connect.
pub const ATTACK_ACTIVE_FRACTION: f32 = 0.6;

pub const DASH_DURATION: f32 = 0.18;
pub const DASH_SPEED: f32 = 4.2;
pub const DASH_COOLDOWN: f32 = 0.55;
pub const DASH_EASE: f32 = 0.35;
pub const DASH_IFRAME_PAD: f32 = 0.04;
pub const DASH_HIT_RADIUS: f32 = 8.0;
pub const DASH_DAMAGE: i32 = 1;
pub const DASH_KNOCKBACK: f32 = 2.2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AttackProfile {
    pub range: f32,
    /// Full arc width in radians.
    pub arc: f32,
    pub damage: i32,
    pub knockback: f32,
}

pub const SWING: AttackProfile = AttackProfile {
    range: 18.0,
    arc: PI * 0.45, // ~81°
    damage: 1,
    knockback: 1.6,
};

pub const FINISHER: AttackProfile = AttackProfile {
    range: 20.0,
    arc: PI * 0.6,
    damage: 2,
    knockback: 2.4,
};

// ── Zombies / waves ───────────────────────────────────────────────────────────

pub const ZOMBIE_RADIUS: f32 = 3.0;
pub const SPAWN_INTERVAL: f32 = 0.33;
pub const PRESPAWN: u32 = 6;
pub const SCORE_WALKER: u32 = 10;
pub const SCORE_RUNNER: u32 = 12;

pub fn wave_quota(wave: u32) -> u32 {
    10 + (wave as f32 * 2.4).floor() as u32
}

pub fn runner_chance(wave: u32) -> f64 {
    (0.15 + wave as f64 * 0.02).min(0.45)
}

pub fn tough_chance(wave: u32) -> f64 {
    (0.14 + wave as f64 * 0.02).min(0.55)
}

pub fn base_zombie_speed(wave: u32) -> f32 {
    0.38 + (wave as f32 * 0.05).min(1.0)
}

pub const RUNNER_SPEED_FACTOR: f32 = 1.65;
pub const WALKER_SPEED_SPREAD: f32 = 0.28;

// ── Effects ───────────────────────────────────────────────────────────────────

pub const PARTICLE_GRAVITY: f32 = 0.03;
/// Flash time that maps to full flash opacity.
pub const FLASH_FULL: f32 = 0.06;
pub const FLASH_MAX_ALPHA: f32 = 0.3;
