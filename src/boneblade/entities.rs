//! Boneblade entity types: pure data, no logic.

use glam::Vec2;

use crate::flow::{MenuChoice, Phase};
use crate::score_store::BestRecord;

use super::tuning::{HP_MAX, PLAYER_RADIUS, SCORE_RUNNER, SCORE_WALKER};

// ── Zombies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkerTint {
    Moss,
    Fern,
    Sprout,
    Lichen,
}

impl WalkerTint {
    pub const ALL: [WalkerTint; 4] = [
        WalkerTint::Moss,
        WalkerTint::Fern,
        WalkerTint::Sprout,
        WalkerTint::Lichen,
    ];
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZombieKind {
    Walker { tint: WalkerTint },
    /// Faster, always one hit point.
    Runner,
}

impl ZombieKind {
    /// Score awarded when this zombie dies.
    pub fn score(&self) -> u32 {
        match self {
            ZombieKind::Walker { .. } => SCORE_WALKER,
            ZombieKind::Runner => SCORE_RUNNER,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Zombie {
    pub pos: Vec2,
    pub radius: f32,
    pub hp: i32,
    pub speed: f32,
    pub kind: ZombieKind,
    /// Already hit by the current swing.
    pub struck: bool,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttackState {
    pub active: bool,
    pub timer: f32,
    pub cooldown: f32,
    /// Started while dashing.
    pub finisher: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashState {
    pub active: bool,
    pub timer: f32,
    pub cooldown: f32,
    pub dir: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    pub hp: u32,
    pub hp_max: u32,
    /// Facing angle in radians, toward the pointer.
    pub aim: f32,
    pub attack: AttackState,
    pub dash: DashState,
    /// Remaining i-frame time.
    pub invulnerable: f32,
}

impl Player {
    pub fn spawn(at: Vec2) -> Player {
        Player {
            pos: at,
            radius: PLAYER_RADIUS,
            hp: HP_MAX,
            hp_max: HP_MAX,
            aim: 0.0,
            attack: AttackState::default(),
            dash: DashState::default(),
            invulnerable: 0.0,
        }
    }
}

// ── Effects ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Splash {
    Blood,
    /// The player's own hit burst.
    Soul,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub life: f32,
    pub splash: Splash,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Camera {
    pub pos: Vec2,
    pub shake_time: f32,
    pub shake_total: f32,
    pub shake_mag: f32,
}

// ── Progress / master state ───────────────────────────────────────────────────

#[derive(Clone, Debug, Default, PartialEq)]
pub struct WaveProgress {
    pub wave: u32,
    pub score: u32,
    /// Zombies of this wave not spawned yet.
    pub spawn_left: u32,
    pub spawn_timer: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub phase: Phase,
    pub player: Player,
    pub zombies: Vec<Zombie>,
    pub particles: Vec<Particle>,
    pub progress: WaveProgress,
    pub camera: Camera,
    /// Remaining white-flash time.
    pub flash: f32,
    pub best: BestRecord,
    pub menu: MenuChoice,
    /// Last pointer position in screen space.
    pub pointer: Vec2,
    /// Seconds of play this run; drives blinking.
    pub clock: f32,
}
