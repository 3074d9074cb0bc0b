//! Boneblade game logic.
//!
//! Functions take the `GameState` by mutable reference and an injected RNG,
//! so callers control determinism (tests use a seeded `StdRng`). Nothing in
//! here does I/O; persisting a new best record is the caller's job, signalled
//! through `Outcome`.

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use log::{debug, info};
use rand::Rng;

use crate::flow::{FlowCommand, MenuChoice, Phase};
use crate::input::{Action, FrameInput};
use crate::score_store::BestRecord;

use super::entities::{
    AttackState, Camera, DashState, GameState, Particle, Player, Splash, WalkerTint, WaveProgress,
    Zombie, ZombieKind,
};
use super::tuning::*;

pub const ARENA_CENTER: Vec2 = Vec2::ZERO;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Died { new_best: bool },
}

// ── Geometry ──────────────────────────────────────────────────────────────────

/// Absolute angular distance between two angles, in `[0, π]`.
pub fn angle_diff(a: f32, b: f32) -> f32 {
    let mut d = (a - b) % TAU;
    if d > PI {
        d -= TAU;
    } else if d < -PI {
        d += TAU;
    }
    d.abs()
}

/// Whether `target` lies inside an arc of width `arc` centred on `aim`.
/// The edge itself counts as inside.
pub fn within_arc(target: f32, aim: f32, arc: f32) -> bool {
    angle_diff(target, aim) <= arc * 0.5
}

/// Unit-length movement, so diagonals are no faster than straight lines.
pub fn movement_vector(axes: Vec2) -> Vec2 {
    axes.normalize_or_zero()
}

fn clamp_to_arena(pos: Vec2, max_r: f32) -> Vec2 {
    let off = pos - ARENA_CENTER;
    let d = off.length();
    if d > max_r {
        ARENA_CENTER + off * (max_r / d)
    } else {
        pos
    }
}

/// Top-left of the view in world space.
pub fn view_origin(camera: &Camera) -> Vec2 {
    camera.pos - Vec2::new(VIEW_W as f32 / 2.0, VIEW_H as f32 / 2.0)
}

pub fn pointer_world(state: &GameState) -> Vec2 {
    view_origin(&state.camera) + state.pointer
}

// ── Constructors ──────────────────────────────────────────────────────────────

/// Title-screen state with no run in progress.
pub fn new_state(best: BestRecord) -> GameState {
    GameState {
        phase: Phase::Title,
        player: Player::spawn(ARENA_CENTER),
        zombies: Vec::new(),
        particles: Vec::new(),
        progress: WaveProgress::default(),
        camera: Camera::default(),
        flash: 0.0,
        best,
        menu: MenuChoice::Restart,
        pointer: Vec2::new(VIEW_W as f32 / 2.0, VIEW_H as f32 / 2.0),
        clock: 0.0,
    }
}

/// Resets every run field to its initial value and begins wave 1. Only the
/// best record survives.
pub fn start_run(state: &mut GameState, rng: &mut impl Rng) {
    *state = GameState {
        phase: Phase::Play,
        ..new_state(state.best)
    };
    next_wave(state, rng);
    info!("boneblade run started");
}

pub fn make_zombie(wave: u32, rng: &mut impl Rng) -> Zombie {
    let a = rng.gen_range(0.0..TAU);
    let pos = ARENA_CENTER + Vec2::new(a.cos(), a.sin()) * ARENA_RADIUS;
    let base = base_zombie_speed(wave);
    if rng.gen_bool(runner_chance(wave)) {
        Zombie {
            pos,
            radius: ZOMBIE_RADIUS,
            hp: 1,
            speed: base * RUNNER_SPEED_FACTOR,
            kind: ZombieKind::Runner,
            struck: false,
        }
    } else {
        let hp = if rng.gen_bool(tough_chance(wave)) { 2 } else { 1 };
        Zombie {
            pos,
            radius: ZOMBIE_RADIUS,
            hp,
            speed: rng.gen_range(base..base + WALKER_SPEED_SPREAD),
            kind: ZombieKind::Walker {
                tint: WalkerTint::ALL[rng.gen_range(0..WalkerTint::ALL.len())],
            },
            struck: false,
        }
    }
}

// ── Flow ──────────────────────────────────────────────────────────────────────

/// Applies a flow command; ignored (returns `false`) when the current phase
/// does not accept it.
pub fn apply_flow(state: &mut GameState, cmd: FlowCommand, rng: &mut impl Rng) -> bool {
    let Some(next) = state.phase.apply(cmd) else {
        return false;
    };
    if cmd.resets_run() {
        start_run(state, rng);
    } else {
        state.phase = next;
    }
    true
}

/// Ends the run. Returns whether the best record improved.
pub fn game_over(state: &mut GameState) -> bool {
    let Some(next) = state.phase.apply(FlowCommand::Die) else {
        return false;
    };
    state.phase = next;
    state.menu = MenuChoice::Restart;
    let improved = state.best.merge(state.progress.wave, state.progress.score);
    info!(
        "boneblade run over: wave {} score {}{}",
        state.progress.wave,
        state.progress.score,
        if improved { " (new best)" } else { "" }
    );
    improved
}

// ── Waves ─────────────────────────────────────────────────────────────────────

/// Starts a wave with `quota` zombies, up to `PRESPAWN` of them at once.
pub fn begin_wave_with_quota(state: &mut GameState, quota: u32, rng: &mut impl Rng) {
    state.progress.spawn_left = quota;
    state.progress.spawn_timer = 0.0;
    for _ in 0..PRESPAWN.min(quota) {
        let z = make_zombie(state.progress.wave, rng);
        state.zombies.push(z);
        state.progress.spawn_left -= 1;
    }
}

pub fn next_wave(state: &mut GameState, rng: &mut impl Rng) {
    state.progress.wave += 1;
    let quota = wave_quota(state.progress.wave);
    info!("wave {} ({quota} zombies)", state.progress.wave);
    begin_wave_with_quota(state, quota, rng);
}

/// Spawn pacing: at most one zombie per `SPAWN_INTERVAL`; the next wave
/// begins only once the quota is spent and nothing is left alive.
pub fn spawn_step(state: &mut GameState, dt: f32, rng: &mut impl Rng) {
    let progress = &mut state.progress;
    progress.spawn_timer += dt;
    if progress.spawn_left > 0 && progress.spawn_timer >= SPAWN_INTERVAL {
        state.zombies.push(make_zombie(progress.wave, rng));
        progress.spawn_left -= 1;
        progress.spawn_timer = 0.0;
    }
    if state.progress.spawn_left == 0 && state.zombies.is_empty() {
        next_wave(state, rng);
    }
}

// ── Abilities ─────────────────────────────────────────────────────────────────

/// Starts a dash if it is off cooldown. With no movement input the dash
/// heads toward `toward`.
pub fn try_start_dash(player: &mut Player, movement: Vec2, toward: Vec2) -> bool {
    if player.dash.active || player.dash.cooldown > 0.0 {
        return false;
    }
    let dir = if movement != Vec2::ZERO {
        movement
    } else {
        toward.normalize_or_zero()
    };
    player.dash = DashState {
        active: true,
        timer: 0.0,
        cooldown: DASH_COOLDOWN,
        dir,
    };
    player.invulnerable = player.invulnerable.max(DASH_DURATION + DASH_IFRAME_PAD);
    true
}

/// Starts a swing if it is off cooldown. A swing started mid-dash is a
/// finisher.
pub fn try_start_attack(player: &mut Player) -> bool {
    if player.attack.cooldown > 0.0 {
        return false;
    }
    player.attack = AttackState {
        active: true,
        timer: 0.0,
        cooldown: ATTACK_COOLDOWN,
        finisher: player.dash.active,
    };
    true
}

/// Arc hit test and its effect on the zombie. Returns `true` on a hit.
pub fn try_arc_hit(zombie: &mut Zombie, origin: Vec2, aim: f32, profile: &AttackProfile) -> bool {
    let offset = zombie.pos - origin;
    let d = offset.length();
    if d > profile.range + zombie.radius {
        return false;
    }
    if !within_arc(offset.y.atan2(offset.x), aim, profile.arc) {
        return false;
    }
    zombie.hp -= profile.damage;
    zombie.pos += offset.normalize_or_zero() * profile.knockback;
    zombie.struck = true;
    true
}

// ── Effects ───────────────────────────────────────────────────────────────────

pub fn add_shake(camera: &mut Camera, magnitude: f32, time: f32) {
    camera.shake_mag = camera.shake_mag.max(magnitude);
    camera.shake_time = camera.shake_time.max(time);
    camera.shake_total = camera.shake_total.max(camera.shake_time);
}

fn add_flash(state: &mut GameState, time: f32) {
    state.flash = state.flash.max(time);
}

fn bleed(particles: &mut Vec<Particle>, at: Vec2, amount: usize, splash: Splash, rng: &mut impl Rng) {
    for _ in 0..amount {
        particles.push(Particle {
            pos: at,
            vel: Vec2::new(rng.gen_range(-0.5..0.5), rng.gen_range(-0.7..0.3)),
            life: rng.gen_range(0.3..0.7),
            splash,
        });
    }
}

fn hurt_player(state: &mut GameState, rng: &mut impl Rng) {
    let player = &mut state.player;
    player.hp = player.hp.saturating_sub(1);
    player.invulnerable = HIT_IFRAMES;
    debug!("player hit, {} hp left", player.hp);
    bleed(&mut state.particles, player.pos, 12, Splash::Soul, rng);
    add_shake(&mut state.camera, 3.0, 0.12);
    add_flash(state, 0.06);
}

// ── Per-frame update ──────────────────────────────────────────────────────────

/// Advance the simulation by one frame of `dt` seconds. Does nothing
/// outside `Phase::Play`.
pub fn update(state: &mut GameState, input: &FrameInput, dt: f32, rng: &mut impl Rng) -> Outcome {
    if !state.phase.is_running() {
        return Outcome::Continue;
    }
    let k = dt * REFERENCE_FPS;
    state.clock += dt;

    // ── 1. Spawning ──────────────────────────────────────────────────────────
    spawn_step(state, dt, rng);

    // ── 2. Aim + movement input ──────────────────────────────────────────────
    if let Some(p) = input.pointer {
        state.pointer = p;
    }
    let to_pointer = pointer_world(state) - state.player.pos;
    state.player.aim = to_pointer.y.atan2(to_pointer.x);
    let movement = movement_vector(input.move_axes());

    // ── 3. Abilities ─────────────────────────────────────────────────────────
    let dash_wanted = input.is_held(Action::Dash) || input.was_pressed(Action::Dash);
    if dash_wanted && try_start_dash(&mut state.player, movement, to_pointer) {
        add_shake(&mut state.camera, 2.5, 0.1);
    }
    let attack_pressed = input.was_pressed(Action::Attack) || input.clicked.is_some();
    if attack_pressed && try_start_attack(&mut state.player) {
        for z in &mut state.zombies {
            z.struck = false;
        }
    }

    // ── 4. Movement + timers ─────────────────────────────────────────────────
    let player = &mut state.player;
    if player.dash.active {
        player.dash.timer += dt;
        let t = (player.dash.timer / DASH_DURATION).min(1.0);
        let speed = DASH_SPEED * (1.0 - t * DASH_EASE);
        player.pos += player.dash.dir * speed * k;
        if player.dash.timer >= DASH_DURATION {
            player.dash.active = false;
        }
    } else {
        player.pos += movement * BASE_SPEED * k;
    }
    player.pos = clamp_to_arena(player.pos, ARENA_RADIUS - (WALL_WIDTH + PLAYER_WALL_MARGIN));

    player.attack.cooldown = (player.attack.cooldown - dt).max(0.0);
    player.dash.cooldown = (player.dash.cooldown - dt).max(0.0);
    player.invulnerable = (player.invulnerable - dt).max(0.0);

    let mut swing = None;
    if player.attack.active {
        player.attack.timer += dt;
        if player.attack.timer <= ATTACK_DURATION * ATTACK_ACTIVE_FRACTION {
            swing = Some(if player.attack.finisher { FINISHER } else { SWING });
        }
    }

    // ── 5–7. Zombies: chase, damage, death, contact ─────────────────────────
    let origin = state.player.pos;
    let aim = state.player.aim;
    let dashing = state.player.dash.active;
    let mut outcome = Outcome::Continue;

    let mut remaining = std::mem::take(&mut state.zombies).into_iter();
    let mut kept = Vec::with_capacity(remaining.len());
    while let Some(mut z) = remaining.next() {
        z.pos += (origin - z.pos).normalize_or_zero() * z.speed * k;
        z.pos = clamp_to_arena(z.pos, ARENA_RADIUS - WALL_WIDTH);

        if dashing && z.pos.distance_squared(origin) <= DASH_HIT_RADIUS * DASH_HIT_RADIUS {
            z.hp -= DASH_DAMAGE;
            bleed(&mut state.particles, z.pos, 6, Splash::Blood, rng);
            z.pos += (z.pos - origin).normalize_or_zero() * DASH_KNOCKBACK;
            add_shake(&mut state.camera, 2.0, 0.06);
        }

        if let Some(profile) = swing {
            if !z.struck && try_arc_hit(&mut z, origin, aim, &profile) {
                bleed(&mut state.particles, z.pos, 5, Splash::Blood, rng);
                add_shake(&mut state.camera, 2.0, 0.08);
                add_flash(state, 0.03);
            }
        }

        if z.hp <= 0 {
            state.progress.score += z.kind.score();
            continue;
        }

        let reach = z.radius + state.player.radius - 1.0;
        if state.player.invulnerable <= 0.0 && z.pos.distance_squared(origin) <= reach * reach {
            hurt_player(state, rng);
            if state.player.hp == 0 {
                let new_best = game_over(state);
                outcome = Outcome::Died { new_best };
                kept.push(z);
                kept.extend(remaining.by_ref());
                break;
            }
        }
        kept.push(z);
    }
    state.zombies = kept;

    let attack = &mut state.player.attack;
    if attack.active && attack.timer >= ATTACK_DURATION {
        attack.active = false;
        if attack.finisher {
            attack.finisher = false;
            add_shake(&mut state.camera, 3.0, 0.1);
            add_flash(state, 0.05);
        }
    }

    // ── 8. Particles ─────────────────────────────────────────────────────────
    state.particles.retain_mut(|p| {
        p.life -= dt;
        if p.life <= 0.0 {
            return false;
        }
        p.vel.y += PARTICLE_GRAVITY * k;
        p.pos += p.vel * k;
        true
    });

    // ── 9. Camera + flash ────────────────────────────────────────────────────
    let cam = &mut state.camera;
    cam.pos = state.player.pos;
    if cam.shake_time > 0.0 {
        cam.shake_time = (cam.shake_time - dt).max(0.0);
        let m = cam.shake_mag * cam.shake_time / cam.shake_total.max(1e-4);
        cam.pos += Vec2::new(rng.gen_range(-1.0f32..1.0), rng.gen_range(-1.0f32..1.0)) * m;
        if cam.shake_time == 0.0 {
            cam.shake_mag = 0.0;
            cam.shake_total = 0.0;
        }
    }
    state.flash = (state.flash - dt).max(0.0);

    outcome
}
