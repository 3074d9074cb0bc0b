//! Runner game logic, shared by Squig Run and Squig Classic.
//!
//! `update` feeds real elapsed time into an accumulator and runs whole
//! fixed `step`s; `step` is one 60 Hz frame and is what the tests drive.

use log::{debug, info};
use rand::Rng;

use crate::flow::{FlowCommand, MenuChoice, Phase};

use super::entities::{GameState, OverScreen, Records, RunProgress, RunnerVariant, Squig, Trap};
use super::tuning::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    /// The run ended this step. `record_changed` is set when a stored record
    /// was updated and should be persisted.
    Died { score: u32, record_changed: bool },
}

// ── Constructors ──────────────────────────────────────────────────────────────

fn fresh_progress(variant: RunnerVariant, start_speed: f32) -> RunProgress {
    let rules = variant.rules();
    let safe_start = match rules.spawn {
        SpawnRule::Random { safe_start, .. } => safe_start,
        SpawnRule::Fixed { .. } => 0,
    };
    RunProgress {
        distance: 0.0,
        speed: rules.fixed_start_speed.unwrap_or(start_speed),
        last_chunk: 0,
        trap_cooldown: 0.0,
        safe_start,
        spawn_timer: 0,
        bg_x: 0.0,
        steps: 0,
    }
}

pub fn new_state(variant: RunnerVariant, start_speed: f32, records: Records) -> GameState {
    let start_speed = start_speed.clamp(MIN_START_SPEED, MAX_START_SPEED);
    GameState {
        variant,
        phase: Phase::Title,
        squig: Squig::default(),
        traps: Vec::new(),
        run: fresh_progress(variant, start_speed),
        start_speed,
        accumulator: 0.0,
        records,
        over: OverScreen::Retry,
        menu: MenuChoice::Restart,
        final_score: 0,
        tip: 0,
    }
}

/// Resets every run field. The chosen starting speed and the records carry
/// over.
pub fn start_run(state: &mut GameState) {
    state.squig = Squig::default();
    state.traps.clear();
    state.run = fresh_progress(state.variant, state.start_speed);
    state.accumulator = 0.0;
    state.over = OverScreen::Retry;
    state.menu = MenuChoice::Restart;
    state.final_score = 0;
    state.tip = 0;
    state.phase = Phase::Play;
    info!(
        "{} run started at speed {:.2}",
        state.variant.rules().title,
        state.run.speed
    );
}

// ── Flow ──────────────────────────────────────────────────────────────────────

pub fn apply_flow(state: &mut GameState, cmd: FlowCommand, rng: &mut impl Rng) -> bool {
    let Some(next) = state.phase.apply(cmd) else {
        return false;
    };
    if cmd.resets_run() {
        start_run(state);
        return true;
    }
    if next == Phase::Pause {
        state.tip = rng.gen_range(0..TIPS.len());
    }
    state.phase = next;
    true
}

/// Moves the title-screen starting speed by `steps` slider notches. Only
/// variants without a fixed starting speed listen.
pub fn adjust_start_speed(state: &mut GameState, steps: i32) {
    if state.phase != Phase::Title || state.variant.rules().fixed_start_speed.is_some() {
        return;
    }
    state.start_speed = (state.start_speed + steps as f32 * START_SPEED_STEP)
        .clamp(MIN_START_SPEED, MAX_START_SPEED);
    state.run.speed = state.start_speed;
}

fn game_over(state: &mut GameState) -> Outcome {
    let Some(next) = state.phase.apply(FlowCommand::Die) else {
        return Outcome::Continue;
    };
    state.phase = next;
    state.menu = MenuChoice::Restart;
    let score = state.run.distance.floor() as u32;
    state.final_score = score;

    let record_changed = match &mut state.records {
        Records::Leaderboard(board) => {
            if board.qualifies(score) {
                state.over = OverScreen::Entry {
                    initials: String::new(),
                };
            }
            false
        }
        Records::Best(best) => best.merge(score),
    };
    info!("run over at {score}m");
    Outcome::Died {
        score,
        record_changed,
    }
}

// ── Initials entry ────────────────────────────────────────────────────────────

pub fn type_initial(state: &mut GameState, c: char) {
    if let OverScreen::Entry { initials } = &mut state.over {
        if c.is_ascii_alphabetic() && initials.len() < MAX_INITIALS {
            initials.push(c.to_ascii_uppercase());
        }
    }
}

pub fn erase_initial(state: &mut GameState) {
    if let OverScreen::Entry { initials } = &mut state.over {
        initials.pop();
    }
}

/// Saves the entry to the leaderboard. Returns `true` when the board
/// changed.
pub fn submit_initials(state: &mut GameState) -> bool {
    let OverScreen::Entry { initials } = &state.over else {
        return false;
    };
    let name = if initials.is_empty() {
        DEFAULT_INITIALS.to_string()
    } else {
        initials.clone()
    };
    state.over = OverScreen::Retry;
    match &mut state.records {
        Records::Leaderboard(board) => {
            board.insert(name, state.final_score);
            true
        }
        Records::Best(_) => false,
    }
}

pub fn skip_entry(state: &mut GameState) {
    if matches!(state.over, OverScreen::Entry { .. }) {
        state.over = OverScreen::Retry;
    }
}

// ── Simulation ────────────────────────────────────────────────────────────────

fn spawn_pattern(state: &mut GameState, count: u32, lead: f32, gap: f32) {
    let start = VIEW_W as f32 + lead;
    for i in 0..count {
        state.traps.push(Trap {
            x: start + i as f32 * (TRAP_SIZE + gap),
            y: FLOOR_Y - TRAP_SIZE,
            width: TRAP_SIZE,
            height: TRAP_SIZE,
        });
    }
}

fn spawn_step(state: &mut GameState, rng: &mut impl Rng) {
    match state.variant.rules().spawn {
        SpawnRule::Fixed { every, lead } => {
            state.run.spawn_timer += 1;
            if state.run.spawn_timer >= every {
                state.run.spawn_timer = 0;
                spawn_pattern(state, 1, lead, 0.0);
            }
        }
        SpawnRule::Random {
            chance,
            cooldown_min,
            cooldown_spread,
            lead,
            gap,
            ..
        } => {
            let run = &mut state.run;
            if run.safe_start > 0 {
                run.safe_start -= 1;
            } else if run.trap_cooldown <= 0.0 && rng.gen_bool(chance) {
                let count = rng.gen_range(1..=max_traps(run.speed));
                run.trap_cooldown = cooldown_min + rng.gen_range(0.0..cooldown_spread);
                spawn_pattern(state, count, lead, gap);
            } else {
                run.trap_cooldown -= 1.0;
            }
        }
    }
}

/// Strict overlap between the squig's bounding square and a trap.
pub fn hits(squig: &Squig, trap: &Trap) -> bool {
    let in_x = squig.x + squig.radius > trap.x && squig.x - squig.radius < trap.x + trap.width;
    let in_y = squig.y + squig.radius > trap.y && squig.y - squig.radius < trap.y + trap.height;
    in_x && in_y
}

/// Adds the step's distance and applies at most one speed-up per crossed
/// milestone.
pub fn advance_distance(run: &mut RunProgress, chunk: f32, speed_step: f32) {
    run.distance += run.speed;
    let reached = (run.distance / chunk).floor() as u32;
    if reached > run.last_chunk {
        run.speed += speed_step;
        run.last_chunk = reached;
        debug!("speed up to {:.2} at {:.0}m", run.speed, run.distance);
    }
}

/// One fixed 60 Hz step. Does nothing outside `Phase::Play`.
pub fn step(state: &mut GameState, jump_held: bool, rng: &mut impl Rng) -> Outcome {
    if !state.phase.is_running() {
        return Outcome::Continue;
    }
    let rules = state.variant.rules();
    state.run.steps += 1;

    // ── 1. Background ────────────────────────────────────────────────────────
    state.run.bg_x -= state.run.speed * BG_SCROLL;
    if state.run.bg_x <= -(VIEW_W as f32) {
        state.run.bg_x = 0.0;
    }

    // ── 2. Squig physics ─────────────────────────────────────────────────────
    let squig = &mut state.squig;
    squig.vy += GRAVITY;
    squig.y += squig.vy;
    if squig.y + squig.radius >= FLOOR_Y {
        squig.y = FLOOR_Y - squig.radius;
        squig.vy = 0.0;
        squig.on_ground = true;
    } else {
        squig.on_ground = false;
    }
    if jump_held && squig.on_ground {
        squig.vy = JUMP_VELOCITY;
        squig.on_ground = false;
    }

    // ── 3. Traps scroll + cull ───────────────────────────────────────────────
    let speed = state.run.speed;
    for trap in &mut state.traps {
        trap.x -= speed;
    }
    state.traps.retain(|t| t.x + t.width > 0.0);

    // ── 4. Spawning ──────────────────────────────────────────────────────────
    spawn_step(state, rng);

    // ── 5. Collision ─────────────────────────────────────────────────────────
    if state.traps.iter().any(|t| hits(&state.squig, t)) {
        return game_over(state);
    }

    // ── 6. Distance + speed ramp ─────────────────────────────────────────────
    advance_distance(&mut state.run, rules.chunk, rules.speed_step);
    Outcome::Continue
}

/// Runs as many whole steps as `dt` (plus any carried remainder) covers.
pub fn update(state: &mut GameState, jump_held: bool, dt: f32, rng: &mut impl Rng) -> Outcome {
    if !state.phase.is_running() {
        return Outcome::Continue;
    }
    state.accumulator += dt;
    while state.accumulator >= STEP_DT {
        state.accumulator -= STEP_DT;
        let outcome = step(state, jump_held, rng);
        if outcome != Outcome::Continue {
            state.accumulator = 0.0;
            return outcome;
        }
    }
    Outcome::Continue
}
