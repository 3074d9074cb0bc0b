//! Boneblade rendering.
//!
//! `render` draws a complete frame into the canvas from an immutable view of
//! the game state. No game logic is performed here.

use std::f32::consts::TAU;

use crate::assets::Sprite;
use crate::canvas::{Align, Canvas, Rect, Rgb};
use crate::flow::{MenuChoice, Phase};

use super::compute::{view_origin, ARENA_CENTER};
use super::entities::{GameState, Player, Splash, WalkerTint, Zombie, ZombieKind};
use super::tuning::*;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BG: Rgb = Rgb::hex(0x0a0f18);
const C_RING: Rgb = Rgb::hex(0x20304c);
const C_GRID: Rgb = Rgb::hex(0x121a2a);
const C_WALL: Rgb = Rgb::hex(0x2a3b5d);
const C_SHADOW: Rgb = Rgb::hex(0x0b0f18);
const C_HEAD: Rgb = Rgb::hex(0xcdebd2);
const C_RUNNER: Rgb = Rgb::hex(0x9bf27f);
const C_BLOOD: Rgb = Rgb::hex(0xaa1100);
const C_SOUL: Rgb = Rgb::hex(0x5cf2c7);
const C_SWING: Rgb = Rgb::hex(0x9bd1ff);
const C_DASH: Rgb = Rgb::hex(0x5cf2c7);
const C_HURT: Rgb = Rgb::hex(0xff4d6d);
const C_FALLBACK_HEAD: Rgb = Rgb::hex(0xeaeff7);
const C_FALLBACK_BODY: Rgb = Rgb::hex(0xc2c8d2);
const C_PANEL: Rgb = Rgb::hex(0x0a0f18);
const C_PANEL_EDGE: Rgb = Rgb::hex(0x2f466e);
const C_TEXT: Rgb = Rgb::hex(0xcfe6ff);
const C_TEXT_DIM: Rgb = Rgb::hex(0x8fb3df);
const C_HEART: Rgb = Rgb::hex(0xff4d6d);
const C_HEART_EMPTY: Rgb = Rgb::hex(0x27324a);
const C_BAR_EDGE: Rgb = Rgb::hex(0x223049);
const C_RESTART: Rgb = Rgb::hex(0xff9bb0);
const C_MAIN: Rgb = Rgb::hex(0x5cf2c7);
const C_FLASH: Rgb = Rgb(255, 255, 255);

fn tint_color(tint: WalkerTint) -> Rgb {
    match tint {
        WalkerTint::Moss => Rgb::hex(0x7ecb6f),
        WalkerTint::Fern => Rgb::hex(0x6fb86f),
        WalkerTint::Sprout => Rgb::hex(0x86d77a),
        WalkerTint::Lichen => Rgb::hex(0x74c16a),
    }
}

// ── Layout ────────────────────────────────────────────────────────────────────

const SPRITE_SCALE: f32 = 0.9;

const MODAL: Rect = Rect::new(14.0, 26.0, VIEW_W as f32 - 28.0, 66.0);

/// Restart / main-menu buttons of the game-over panel.
pub fn game_over_buttons() -> [(MenuChoice, Rect); 2] {
    let (bw, bh, gap) = (64.0, 12.0, 14.0);
    let x0 = (VIEW_W as f32 / 2.0 - (bw * 2.0 + gap) / 2.0).floor();
    let y = 78.0;
    [
        (MenuChoice::Restart, Rect::new(x0, y, bw, bh)),
        (MenuChoice::MainMenu, Rect::new(x0 + bw + gap, y, bw, bh)),
    ]
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame. `player_sprite` is `None` until the sprite has
/// loaded (or forever, if it failed), in which case simple shapes stand in.
pub fn render(state: &GameState, player_sprite: Option<&Sprite>, canvas: &mut Canvas) {
    canvas.clear(C_BG);

    let origin = view_origin(&state.camera);
    canvas.set_offset(-origin.x, -origin.y);

    draw_ground(canvas);
    canvas.stroke_ring(
        ARENA_CENTER.x,
        ARENA_CENTER.y,
        ARENA_RADIUS - WALL_WIDTH / 2.0,
        WALL_WIDTH,
        C_WALL,
    );

    for p in &state.particles {
        let color = match p.splash {
            Splash::Blood => C_BLOOD,
            Splash::Soul => C_SOUL,
        };
        canvas.fill_rect(p.pos.x, p.pos.y, 1.0, 1.0, color);
    }
    for z in &state.zombies {
        draw_zombie(canvas, z);
    }
    if state.phase == Phase::Play {
        draw_telegraph(canvas, &state.player);
    }
    draw_player(canvas, state, player_sprite);

    canvas.reset_offset();
    draw_hud(canvas, state);

    match state.phase {
        Phase::Title => draw_modal(
            canvas,
            &[
                "BONEBLADE - COLOSSEUM",
                "WASD move  Shift/K dash (i-frames, path damage)",
                "Space/J/Click arc attack  Attack mid-dash: finisher",
                "Press SPACE or ENTER to start",
            ],
        ),
        Phase::Pause => draw_modal(canvas, &["PAUSED", "Press ESC to resume"]),
        Phase::GameOver => draw_game_over(canvas, state),
        Phase::Play => {}
    }

    if state.flash > 0.0 {
        let alpha = (state.flash / FLASH_FULL).clamp(0.0, 1.0) * FLASH_MAX_ALPHA;
        canvas.blend_all(C_FLASH, alpha);
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

fn draw_ground(canvas: &mut Canvas) {
    let (cx, cy, r) = (ARENA_CENTER.x, ARENA_CENTER.y, ARENA_RADIUS);
    let mut ring = 40.0;
    while ring < r {
        canvas.stroke_circle(cx, cy, ring, C_RING, 0.35);
        ring += 40.0;
    }
    let mut x = cx - r;
    while x <= cx + r {
        canvas.vline(x, cy - r, cy + r, C_GRID, 0.6);
        x += 20.0;
    }
    let mut y = cy - r;
    while y <= cy + r {
        canvas.hline(cx - r, cx + r, y, C_GRID, 0.6);
        y += 20.0;
    }
}

fn draw_zombie(canvas: &mut Canvas, z: &Zombie) {
    let (x, y) = (z.pos.x, z.pos.y);
    canvas.fill_rect(x - 3.0, y + 2.0, 6.0, 2.0, C_SHADOW);
    let body = match z.kind {
        ZombieKind::Walker { tint } => tint_color(tint),
        ZombieKind::Runner => C_RUNNER,
    };
    canvas.fill_rect(x - 3.0, y - 5.0, 6.0, 6.0, body);
    canvas.fill_rect(x - 2.0, y - 8.0, 4.0, 3.0, C_HEAD);
    if z.kind == ZombieKind::Runner {
        canvas.blend_rect(x - 4.0, y - 9.0, 1.0, 1.0, C_RUNNER, 0.5);
    }
}

/// Outline of the active ability's reach.
fn draw_telegraph(canvas: &mut Canvas, player: &Player) {
    let (x, y) = (player.pos.x, player.pos.y);
    if player.attack.active {
        let profile = if player.attack.finisher { FINISHER } else { SWING };
        let half = profile.arc / 2.0;
        canvas.stroke_arc(x, y, profile.range, player.aim - half, player.aim + half, C_SWING, 0.25);
    } else if player.dash.active {
        canvas.stroke_arc(x, y, DASH_HIT_RADIUS, 0.0, TAU, C_DASH, 0.25);
    }
}

fn draw_player(canvas: &mut Canvas, state: &GameState, sprite: Option<&Sprite>) {
    let p = &state.player;
    let (x, y) = (p.pos.x, p.pos.y);
    canvas.fill_rect(x - 3.0, y + 2.0, 6.0, 2.0, C_SHADOW);

    if p.dash.active {
        canvas.blend_rect(x - 5.0, y - 9.0, 10.0, 14.0, C_DASH, 0.22);
    }
    let blink_on = ((state.clock * 1000.0 / 80.0) as u32) % 2 == 0;
    if p.invulnerable > 0.0 && blink_on {
        canvas.blend_rect(x - 5.0, y - 9.0, 10.0, 14.0, C_HURT, 0.45);
    }

    match sprite {
        Some(sprite) => {
            // Anchored at the feet, mirrored when facing left.
            let w = (sprite.width() as f32 * SPRITE_SCALE).round();
            let h = (sprite.height() as f32 * SPRITE_SCALE).round();
            let facing_left = p.aim.cos() < 0.0;
            let top = y + (h * 0.25).floor() - h;
            canvas.draw_sprite_scaled(sprite, x - (w / 2.0).floor(), top, w, h, facing_left);
        }
        None => {
            canvas.fill_rect(x - 2.0, y - 6.0, 4.0, 3.0, C_FALLBACK_HEAD);
            canvas.fill_rect(x - 3.0, y - 3.0, 6.0, 6.0, C_FALLBACK_BODY);
        }
    }
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_panel(canvas: &mut Canvas, r: Rect, alpha: f32) {
    canvas.blend_rect(r.x, r.y, r.w, r.h, C_PANEL, alpha);
    canvas.stroke_rect(r.x, r.y, r.w, r.h, C_PANEL_EDGE, 0.6);
}

fn draw_bar(canvas: &mut Canvas, r: Rect, progress: f32, bg: Rgb, fg: Rgb, label: &str) {
    canvas.fill_rect(r.x, r.y, r.w, r.h, bg);
    let filled = (progress.clamp(0.0, 1.0) * r.w).floor();
    canvas.fill_rect(r.x, r.y, filled, r.h, fg);
    canvas.stroke_rect(r.x, r.y, r.w, r.h, C_BAR_EDGE, 1.0);
    canvas.text(r.x + r.w + 4.0, r.y + r.h / 2.0, label, C_TEXT_DIM, Align::Left);
}

fn draw_hud(canvas: &mut Canvas, state: &GameState) {
    let pad = 4.0;
    let w = VIEW_W as f32;
    let h = VIEW_H as f32;
    draw_panel(canvas, Rect::new(0.0, 0.0, w, 18.0), 0.55);

    canvas.text(pad, 5.0, format!("Wave {:02}", state.progress.wave), C_TEXT, Align::Left);
    canvas.text(86.0, 5.0, format!("Score {:04}", state.progress.score), C_TEXT, Align::Left);
    canvas.text(
        w - pad,
        5.0,
        format!("Best W{} S{}", state.best.wave, state.best.score),
        C_TEXT_DIM,
        Align::Right,
    );

    for i in 0..state.player.hp_max {
        let hx = pad + i as f32 * 8.0;
        let color = if i < state.player.hp { C_HEART } else { C_HEART_EMPTY };
        canvas.fill_rect(hx, 12.0, 6.0, 4.0, color);
        canvas.stroke_rect(hx, 12.0, 6.0, 4.0, C_BAR_EDGE, 1.0);
    }

    let (bh, bw, gap) = (6.0, 56.0, 10.0);
    let panel_h = bh + 8.0;
    draw_panel(canvas, Rect::new(0.0, h - panel_h, w, panel_h), 0.55);

    let attack_ready = 1.0 - (state.player.attack.cooldown / ATTACK_COOLDOWN).clamp(0.0, 1.0);
    let dash_ready = 1.0 - (state.player.dash.cooldown / DASH_COOLDOWN).clamp(0.0, 1.0);
    let start_x = (w / 2.0 - (bw * 2.0 + gap) / 2.0).floor();
    let y = h - bh - 4.0;
    draw_bar(canvas, Rect::new(start_x, y, bw, bh), attack_ready, C_HEART_EMPTY, C_SWING, "ATK");
    draw_bar(
        canvas,
        Rect::new(start_x + bw + gap, y, bw, bh),
        dash_ready,
        C_BAR_EDGE,
        C_DASH,
        "DASH",
    );
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_modal(canvas: &mut Canvas, lines: &[&str]) {
    draw_panel(canvas, MODAL, 0.8);
    for (i, line) in lines.iter().enumerate() {
        canvas.text(
            VIEW_W as f32 / 2.0,
            MODAL.y + 12.0 + i as f32 * 12.0,
            *line,
            C_TEXT,
            Align::Center,
        );
    }
}

fn draw_game_over(canvas: &mut Canvas, state: &GameState) {
    draw_panel(canvas, MODAL, 0.9);
    let cx = VIEW_W as f32 / 2.0;
    canvas.text(cx, MODAL.y + 12.0, "YOU DIED", C_TEXT, Align::Center);
    canvas.text(
        cx,
        MODAL.y + 26.0,
        format!("Wave {:02}  Score {:04}", state.progress.wave, state.progress.score),
        C_SWING,
        Align::Center,
    );

    for (choice, r) in game_over_buttons() {
        let active = state.menu == choice;
        let tint = match choice {
            MenuChoice::Restart => C_RESTART,
            MenuChoice::MainMenu => C_MAIN,
        };
        canvas.blend_rect(r.x, r.y, r.w, r.h, C_PANEL, 0.85);
        canvas.stroke_rect(r.x, r.y, r.w, r.h, if active { tint } else { C_PANEL_EDGE }, 1.0);
        canvas.text(
            r.x + r.w / 2.0,
            r.y + r.h / 2.0,
            choice.label(),
            if active { tint } else { C_TEXT_DIM },
            Align::Center,
        );
    }
}
