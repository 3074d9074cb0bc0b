//! Runner rendering. Pure function of the game state; sprites that have not
//! loaded are replaced by plain shapes.

use crate::assets::Sprite;
use crate::canvas::{Align, Canvas, Rect, Rgb};
use crate::flow::{MenuChoice, Phase};
use crate::score_store::LEADERBOARD_SIZE;

use super::entities::{GameState, OverScreen, Records, RunnerVariant, Trap};
use super::tuning::*;

// ── Colour palette ────────────────────────────────────────────────────────────

const C_SKY: Rgb = Rgb::hex(0x2b1d3a);
const C_HILL: Rgb = Rgb::hex(0x3d2a52);
const C_GROUND: Rgb = Rgb::hex(0x3a1e0b);
const C_SQUIG: Rgb = Rgb::hex(0x7fd6a1);
const C_SQUIG_EYE: Rgb = Rgb::hex(0x0a0f18);
const C_MINE: Rgb = Rgb::hex(0x5a5f6b);
const C_MINE_LIGHT: Rgb = Rgb::hex(0xff4d4d);
const C_DIM: Rgb = Rgb(0, 0, 0);
const C_PANEL: Rgb = Rgb::hex(0x140c1e);
const C_PANEL_EDGE: Rgb = Rgb::hex(0x6b4f8f);
const C_TEXT: Rgb = Rgb(255, 255, 255);
const C_TEXT_DIM: Rgb = Rgb::hex(0xb9a7d1);
const C_ACCENT: Rgb = Rgb::hex(0xffd166);

/// Sprites the runner can use; any of them may be missing.
#[derive(Clone, Copy, Default)]
pub struct RunnerSprites<'a> {
    pub squig: Option<&'a Sprite>,
    pub mine: Option<&'a Sprite>,
    pub background: Option<&'a Sprite>,
}

const PANEL: Rect = Rect::new(200.0, 70.0, 400.0, 260.0);

/// Retry / main-menu buttons on the game-over panel.
pub fn over_buttons() -> [(MenuChoice, Rect); 2] {
    let (bw, bh, gap) = (150.0, 36.0, 30.0);
    let x0 = VIEW_W as f32 / 2.0 - (bw * 2.0 + gap) / 2.0;
    let y = PANEL.y + PANEL.h - bh - 20.0;
    [
        (MenuChoice::Restart, Rect::new(x0, y, bw, bh)),
        (MenuChoice::MainMenu, Rect::new(x0 + bw + gap, y, bw, bh)),
    ]
}

// ── Public entry point ────────────────────────────────────────────────────────

pub fn render(state: &GameState, sprites: RunnerSprites<'_>, canvas: &mut Canvas) {
    canvas.clear(C_SKY);

    draw_background(canvas, state.run.bg_x, sprites.background);
    canvas.fill_rect(0.0, FLOOR_Y, VIEW_W as f32, VIEW_H as f32 - FLOOR_Y, C_GROUND);

    if state.phase != Phase::Title {
        draw_squig(canvas, state, sprites.squig);
        for trap in &state.traps {
            draw_trap(canvas, trap, sprites.mine);
        }
        draw_hud(canvas, state);
    }

    match state.phase {
        Phase::Title => draw_title(canvas, state),
        Phase::Pause => draw_pause(canvas, state),
        Phase::GameOver => match &state.over {
            OverScreen::Entry { initials } => draw_entry(canvas, state, initials),
            OverScreen::Retry => draw_retry(canvas, state),
        },
        Phase::Play => {}
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

fn draw_background(canvas: &mut Canvas, bg_x: f32, tile: Option<&Sprite>) {
    match tile {
        Some(tile) => {
            // Two copies side by side, scrolled, cover the view.
            let w = VIEW_W as f32;
            let h = VIEW_H as f32;
            canvas.draw_sprite_scaled(tile, bg_x, 0.0, w, h, false);
            canvas.draw_sprite_scaled(tile, bg_x + w, 0.0, w, h, false);
        }
        None => {
            // Rolling hills that scroll with the background offset.
            let period = 160.0;
            let shift = bg_x.rem_euclid(period);
            let mut x = shift - period;
            while x < VIEW_W as f32 {
                canvas.fill_circle(x + period / 2.0, FLOOR_Y + 20.0, 90.0, C_HILL);
                x += period;
            }
        }
    }
}

fn draw_squig(canvas: &mut Canvas, state: &GameState, sprite: Option<&Sprite>) {
    let s = &state.squig;
    let size = s.radius * 2.0;
    match sprite {
        Some(sprite) => {
            canvas.draw_sprite_scaled(sprite, s.x - s.radius, s.y - s.radius, size, size, false)
        }
        None => {
            canvas.fill_circle(s.x, s.y, s.radius, C_SQUIG);
            canvas.fill_rect(s.x + 6.0, s.y - 10.0, 6.0, 6.0, C_SQUIG_EYE);
        }
    }
}

fn draw_trap(canvas: &mut Canvas, trap: &Trap, sprite: Option<&Sprite>) {
    match sprite {
        Some(sprite) => {
            canvas.draw_sprite_scaled(sprite, trap.x, trap.y, trap.width, trap.height, false)
        }
        None => {
            let cx = trap.x + trap.width / 2.0;
            let cy = trap.y + trap.height / 2.0 + 4.0;
            canvas.fill_circle(cx, cy, trap.width / 2.0 - 4.0, C_MINE);
            canvas.fill_rect(cx - 3.0, trap.y, 6.0, 8.0, C_MINE_LIGHT);
        }
    }
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn draw_hud(canvas: &mut Canvas, state: &GameState) {
    canvas.text(
        16.0,
        16.0,
        format!("Score: {}m", state.run.distance.floor() as u32),
        C_TEXT,
        Align::Left,
    );
    canvas.text(
        VIEW_W as f32 - 16.0,
        16.0,
        format!("Best: {}m", state.records.best()),
        C_TEXT_DIM,
        Align::Right,
    );
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_panel(canvas: &mut Canvas) {
    canvas.blend_rect(PANEL.x, PANEL.y, PANEL.w, PANEL.h, C_PANEL, 0.85);
    canvas.stroke_rect(PANEL.x, PANEL.y, PANEL.w, PANEL.h, C_PANEL_EDGE, 1.0);
}

fn line(canvas: &mut Canvas, row: usize, text: impl Into<String>, color: Rgb) {
    canvas.text(
        VIEW_W as f32 / 2.0,
        PANEL.y + 24.0 + row as f32 * 26.0,
        text,
        color,
        Align::Center,
    );
}

fn draw_title(canvas: &mut Canvas, state: &GameState) {
    draw_panel(canvas);
    line(canvas, 0, state.variant.rules().title, C_ACCENT);
    line(canvas, 1, "Space / Up / W to jump, ESC to pause", C_TEXT_DIM);
    match &state.records {
        Records::Leaderboard(board) => {
            line(canvas, 2, format!("<  Speed {:.1}  >", state.start_speed), C_TEXT);
            for (i, entry) in board.entries().iter().enumerate() {
                line(
                    canvas,
                    3 + i,
                    format!("{}. {:<3} - {}m", i + 1, entry.name, entry.score),
                    C_TEXT_DIM,
                );
            }
            if board.entries().is_empty() {
                line(canvas, 3, "No scores yet", C_TEXT_DIM);
            }
        }
        Records::Best(best) => {
            line(canvas, 2, format!("Best: {}m", best.distance), C_TEXT_DIM);
        }
    }
    line(canvas, 3 + LEADERBOARD_SIZE, "Press ENTER to start", C_TEXT);
}

fn draw_pause(canvas: &mut Canvas, state: &GameState) {
    canvas.blend_all(C_DIM, 0.35);
    draw_panel(canvas);
    line(canvas, 0, "Paused", C_ACCENT);
    if state.variant == RunnerVariant::Squig {
        line(canvas, 1, TIPS[state.tip % TIPS.len()], C_TEXT_DIM);
    }
    line(canvas, 2, format!("Speed: {:.2}", state.run.speed), C_TEXT);
    line(
        canvas,
        3,
        format!("Traps: up to {}", max_traps(state.run.speed)),
        C_TEXT,
    );
    line(canvas, 5, "ESC or ENTER to resume", C_TEXT_DIM);
}

fn draw_entry(canvas: &mut Canvas, state: &GameState, initials: &str) {
    draw_panel(canvas);
    line(canvas, 0, "NEW HIGH SCORE", C_ACCENT);
    line(canvas, 1, format!("{}m", state.final_score), C_TEXT);
    let shown: String = initials
        .chars()
        .chain(std::iter::repeat('_'))
        .take(MAX_INITIALS)
        .collect();
    line(canvas, 3, format!("Initials: {shown}"), C_TEXT);
    line(canvas, 5, "ENTER save   ESC skip", C_TEXT_DIM);
}

fn draw_retry(canvas: &mut Canvas, state: &GameState) {
    draw_panel(canvas);
    line(canvas, 0, "You hit a mine!", C_ACCENT);
    line(canvas, 1, format!("Distance: {}m", state.final_score), C_TEXT);
    line(canvas, 2, format!("Best: {}m", state.records.best()), C_TEXT_DIM);

    for (choice, r) in over_buttons() {
        let active = state.menu == choice;
        let edge = if active { C_ACCENT } else { C_PANEL_EDGE };
        canvas.blend_rect(r.x, r.y, r.w, r.h, C_PANEL, 0.9);
        canvas.stroke_rect(r.x, r.y, r.w, r.h, edge, 1.0);
        canvas.text(
            r.x + r.w / 2.0,
            r.y + r.h / 2.0,
            choice.label(),
            if active { C_ACCENT } else { C_TEXT_DIM },
            Align::Center,
        );
    }
}
