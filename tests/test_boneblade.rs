use std::f32::consts::PI;

use approx::assert_relative_eq;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rstest::rstest;

use arcade_cabinet::assets::AssetHandle;
use arcade_cabinet::boneblade::compute::*;
use arcade_cabinet::boneblade::entities::*;
use arcade_cabinet::boneblade::tuning::*;
use arcade_cabinet::boneblade::{display, Boneblade};
use arcade_cabinet::canvas::Canvas;
use arcade_cabinet::flow::{FlowCommand, Phase};
use arcade_cabinet::game::Game;
use arcade_cabinet::input::{Action, FrameInput};
use arcade_cabinet::score_store::{BestRecord, ScoreStore, BONEBLADE_KEY};

const DT: f32 = 1.0 / 60.0;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// A running arena with no zombies and nothing left to spawn.
fn quiet_state() -> GameState {
    let mut s = new_state(BestRecord::default());
    s.phase = Phase::Play;
    s.progress.wave = 1;
    s
}

fn walker_at(pos: Vec2, hp: i32) -> Zombie {
    Zombie {
        pos,
        radius: ZOMBIE_RADIUS,
        hp,
        speed: 0.4,
        kind: ZombieKind::Walker {
            tint: WalkerTint::Moss,
        },
        struck: false,
    }
}

// ── Geometry ──────────────────────────────────────────────────────────────────

#[rstest]
#[case(Vec2::new(1.0, 1.0))]
#[case(Vec2::new(-1.0, 1.0))]
#[case(Vec2::new(1.0, -1.0))]
#[case(Vec2::new(-1.0, -1.0))]
fn diagonal_movement_is_unit_length(#[case] axes: Vec2) {
    assert_relative_eq!(movement_vector(axes).length(), 1.0, epsilon = 1e-6);
}

#[test]
fn no_input_means_no_movement() {
    assert_eq!(movement_vector(Vec2::ZERO), Vec2::ZERO);
}

#[test]
fn angle_diff_is_symmetric_and_wrapped() {
    assert_relative_eq!(angle_diff(0.1, -0.1), 0.2, epsilon = 1e-6);
    assert_relative_eq!(angle_diff(-0.1, 0.1), 0.2, epsilon = 1e-6);
    assert_relative_eq!(angle_diff(3.0 * PI, 0.0), PI, epsilon = 1e-5);
}

#[test]
fn arc_edge_is_inside() {
    let arc = SWING.arc;
    assert!(within_arc(arc * 0.5, 0.0, arc));
    assert!(within_arc(-arc * 0.5, 0.0, arc));
}

#[test]
fn just_beyond_arc_edge_is_outside() {
    let arc = SWING.arc;
    assert!(!within_arc(arc * 0.5 + 1e-3, 0.0, arc));
    assert!(!within_arc(-arc * 0.5 - 1e-3, 0.0, arc));
}

// ── Attack ────────────────────────────────────────────────────────────────────

#[test]
fn swing_hits_zombie_ten_units_ahead() {
    let mut z = walker_at(Vec2::new(10.0, 0.0), 3);
    assert!(try_arc_hit(&mut z, Vec2::ZERO, 0.0, &SWING));
    assert_eq!(z.hp, 2);
    assert_relative_eq!(z.pos.x, 11.6, epsilon = 1e-5);
    assert_relative_eq!(z.pos.y, 0.0);
    assert!(z.struck);
}

#[test]
fn swing_range_counts_zombie_radius() {
    let edge = SWING.range + ZOMBIE_RADIUS;
    let mut at_edge = walker_at(Vec2::new(edge, 0.0), 1);
    assert!(try_arc_hit(&mut at_edge, Vec2::ZERO, 0.0, &SWING));

    let mut beyond = walker_at(Vec2::new(edge + 0.1, 0.0), 1);
    assert!(!try_arc_hit(&mut beyond, Vec2::ZERO, 0.0, &SWING));
    assert_eq!(beyond.hp, 1);
}

#[test]
fn swing_misses_zombie_behind_the_arc() {
    let mut z = walker_at(Vec2::new(0.0, 10.0), 1);
    assert!(!try_arc_hit(&mut z, Vec2::ZERO, 0.0, &SWING));
    assert_eq!(z.pos, Vec2::new(0.0, 10.0));
}

#[test]
fn finisher_is_wider_and_harder() {
    let mut z = walker_at(Vec2::new(0.0, 10.0), 3);
    // 0.28π off-axis: outside a swing, inside a finisher.
    let aim = PI / 2.0 - 0.28 * PI;
    assert!(!try_arc_hit(&mut z.clone(), Vec2::ZERO, aim, &SWING));
    assert!(try_arc_hit(&mut z, Vec2::ZERO, aim, &FINISHER));
    assert_eq!(z.hp, 1);
}

#[test]
fn one_swing_hits_each_zombie_once() {
    let mut s = quiet_state();
    s.player.invulnerable = 10.0;
    s.zombies.push(walker_at(Vec2::new(10.0, 0.0), 3));
    let mut rng = seeded_rng();

    update(&mut s, &FrameInput::pressing(&[Action::Attack]), DT, &mut rng);
    for _ in 0..12 {
        update(&mut s, &FrameInput::default(), DT, &mut rng);
    }
    assert_eq!(s.zombies.len(), 1);
    assert_eq!(s.zombies[0].hp, 2);
}

#[test]
fn attack_respects_cooldown() {
    let mut p = Player::spawn(Vec2::ZERO);
    assert!(try_start_attack(&mut p));
    assert!(!try_start_attack(&mut p));
    assert_relative_eq!(p.attack.cooldown, ATTACK_COOLDOWN);
}

#[test]
fn attack_started_mid_dash_is_a_finisher() {
    let mut p = Player::spawn(Vec2::ZERO);
    assert!(try_start_dash(&mut p, Vec2::X, Vec2::ZERO));
    assert!(try_start_attack(&mut p));
    assert!(p.attack.finisher);
}

#[test]
fn killing_awards_score_by_kind() {
    let mut s = quiet_state();
    s.player.invulnerable = 10.0;
    s.zombies.push(walker_at(Vec2::new(10.0, 0.0), 1));
    let mut runner = walker_at(Vec2::new(10.0, 2.0), 1);
    runner.kind = ZombieKind::Runner;
    s.zombies.push(runner);
    let mut rng = seeded_rng();

    update(&mut s, &FrameInput::pressing(&[Action::Attack]), DT, &mut rng);
    assert!(s.zombies.is_empty());
    assert_eq!(s.progress.score, SCORE_WALKER + SCORE_RUNNER);
}

// ── Dash ──────────────────────────────────────────────────────────────────────

#[test]
fn dash_grants_iframes() {
    let mut p = Player::spawn(Vec2::ZERO);
    assert!(try_start_dash(&mut p, Vec2::X, Vec2::ZERO));
    assert_relative_eq!(p.invulnerable, DASH_DURATION + DASH_IFRAME_PAD);
}

#[test]
fn tapped_dash_key_still_dashes() {
    let mut s = quiet_state();
    let tap = FrameInput::pressing(&[Action::Dash]);
    update(&mut s, &tap, DT, &mut seeded_rng());
    assert!(s.player.dash.active);
}

#[test]
fn dash_never_shortens_existing_iframes() {
    let mut p = Player::spawn(Vec2::ZERO);
    p.invulnerable = HIT_IFRAMES;
    assert!(try_start_dash(&mut p, Vec2::X, Vec2::ZERO));
    assert_relative_eq!(p.invulnerable, HIT_IFRAMES);
}

#[test]
fn dash_without_movement_heads_for_pointer() {
    let mut p = Player::spawn(Vec2::ZERO);
    assert!(try_start_dash(&mut p, Vec2::ZERO, Vec2::new(0.0, -30.0)));
    assert_eq!(p.dash.dir, Vec2::new(0.0, -1.0));
}

#[test]
fn dash_on_cooldown_is_refused() {
    let mut p = Player::spawn(Vec2::ZERO);
    p.dash.cooldown = 0.2;
    assert!(!try_start_dash(&mut p, Vec2::X, Vec2::ZERO));
    assert!(!p.dash.active);
}

#[test]
fn dash_damages_zombies_along_the_path() {
    let mut s = quiet_state();
    s.zombies.push(walker_at(Vec2::new(6.0, 0.0), 5));
    let mut rng = seeded_rng();
    let input = FrameInput::holding(&[Action::Dash, Action::MoveRight]);

    update(&mut s, &input, DT, &mut rng);
    assert!(s.player.dash.active);
    assert!(s.zombies[0].hp < 5);
    assert_eq!(s.player.hp, HP_MAX);
}

// ── Damage / death ────────────────────────────────────────────────────────────

#[test]
fn contact_costs_one_hp_then_iframes_protect() {
    let mut s = quiet_state();
    s.zombies.push(walker_at(Vec2::ZERO, 3));
    let mut rng = seeded_rng();

    update(&mut s, &FrameInput::default(), DT, &mut rng);
    assert_eq!(s.player.hp, HP_MAX - 1);
    assert!(s.player.invulnerable > 0.0);

    update(&mut s, &FrameInput::default(), DT, &mut rng);
    assert_eq!(s.player.hp, HP_MAX - 1);
}

#[test]
fn last_hp_ends_the_run_exactly_once() {
    let mut s = quiet_state();
    s.player.hp = 1;
    s.zombies.push(walker_at(Vec2::ZERO, 3));
    let mut rng = seeded_rng();

    let first = update(&mut s, &FrameInput::default(), DT, &mut rng);
    assert_eq!(first, Outcome::Died { new_best: true });
    assert_eq!(s.phase, Phase::GameOver);
    assert_eq!(s.player.hp, 0);

    s.player.invulnerable = 0.0;
    let second = update(&mut s, &FrameInput::default(), DT, &mut rng);
    assert_eq!(second, Outcome::Continue);
    assert_eq!(s.player.hp, 0);
    assert!(!game_over(&mut s));
}

#[test]
fn game_over_keeps_best_fields_independently() {
    let mut s = quiet_state();
    s.best = BestRecord { wave: 5, score: 100 };
    s.progress.wave = 3;
    s.progress.score = 250;
    assert!(game_over(&mut s));
    assert_eq!(s.best, BestRecord { wave: 5, score: 250 });
}

#[test]
fn player_stays_inside_the_wall() {
    let mut s = quiet_state();
    s.player.pos = Vec2::new(ARENA_RADIUS - 1.0, 0.0);
    let mut rng = seeded_rng();
    update(&mut s, &FrameInput::holding(&[Action::MoveRight]), DT, &mut rng);
    assert!(s.player.pos.length() <= ARENA_RADIUS - (WALL_WIDTH + PLAYER_WALL_MARGIN) + 1e-3);
}

// ── Waves ─────────────────────────────────────────────────────────────────────

#[rstest]
#[case(1, 12)]
#[case(2, 14)]
#[case(5, 22)]
fn wave_quota_grows(#[case] wave: u32, #[case] quota: u32) {
    assert_eq!(wave_quota(wave), quota);
}

#[test]
fn quota_ten_prespawns_six_then_paces_four() {
    let mut s = quiet_state();
    let mut rng = seeded_rng();
    begin_wave_with_quota(&mut s, 10, &mut rng);
    assert_eq!(s.zombies.len(), 6);
    assert_eq!(s.progress.spawn_left, 4);

    spawn_step(&mut s, SPAWN_INTERVAL / 2.0, &mut rng);
    assert_eq!(s.zombies.len(), 6);

    for expected in 7..=10 {
        spawn_step(&mut s, SPAWN_INTERVAL, &mut rng);
        assert_eq!(s.zombies.len(), expected);
    }
    assert_eq!(s.progress.spawn_left, 0);

    spawn_step(&mut s, SPAWN_INTERVAL, &mut rng);
    assert_eq!(s.zombies.len(), 10);
    assert_eq!(s.progress.wave, 1);
}

#[test]
fn next_wave_waits_for_the_arena_to_clear() {
    let mut s = quiet_state();
    let mut rng = seeded_rng();
    spawn_step(&mut s, DT, &mut rng);
    assert_eq!(s.progress.wave, 2);
    assert_eq!(s.zombies.len(), PRESPAWN as usize);
    assert_eq!(s.progress.spawn_left, wave_quota(2) - PRESPAWN);
}

#[test]
fn zombies_spawn_on_the_arena_rim() {
    let mut rng = seeded_rng();
    for _ in 0..50 {
        let z = make_zombie(3, &mut rng);
        assert_relative_eq!(z.pos.length(), ARENA_RADIUS, epsilon = 1e-3);
        assert!(z.hp >= 1 && z.hp <= 2);
        if z.kind == ZombieKind::Runner {
            assert_eq!(z.hp, 1);
        }
    }
}

// ── Flow ──────────────────────────────────────────────────────────────────────

#[test]
fn start_begins_wave_one() {
    let mut s = new_state(BestRecord::default());
    let mut rng = seeded_rng();
    assert!(apply_flow(&mut s, FlowCommand::Start, &mut rng));
    assert_eq!(s.phase, Phase::Play);
    assert_eq!(s.progress.wave, 1);
    assert_eq!(s.zombies.len(), PRESPAWN as usize);
}

#[test]
fn restart_matches_a_fresh_start() {
    let mut played = new_state(BestRecord::default());
    let mut rng = seeded_rng();
    apply_flow(&mut played, FlowCommand::Start, &mut rng);
    played.progress.score = 500;
    played.player.hp = 2;
    played.particles.clear();
    assert!(game_over(&mut played));

    let mut restart_rng = StdRng::seed_from_u64(9);
    assert!(apply_flow(&mut played, FlowCommand::Restart, &mut restart_rng));

    let mut fresh = new_state(played.best);
    let mut fresh_rng = StdRng::seed_from_u64(9);
    apply_flow(&mut fresh, FlowCommand::Start, &mut fresh_rng);

    assert_eq!(played, fresh);
    assert_eq!(played.best, BestRecord { wave: 1, score: 500 });
}

#[test]
fn rejected_commands_leave_state_alone() {
    let mut s = new_state(BestRecord::default());
    let mut rng = seeded_rng();
    let before = s.clone();
    assert!(!apply_flow(&mut s, FlowCommand::TogglePause, &mut rng));
    assert!(!apply_flow(&mut s, FlowCommand::Restart, &mut rng));
    assert_eq!(s, before);
}

#[test]
fn paused_world_does_not_move() {
    let mut s = quiet_state();
    s.zombies.push(walker_at(Vec2::new(50.0, 0.0), 1));
    s.phase = Phase::Pause;
    let before = s.clone();
    let mut rng = seeded_rng();
    assert_eq!(
        update(&mut s, &FrameInput::holding(&[Action::MoveLeft]), DT, &mut rng),
        Outcome::Continue
    );
    assert_eq!(s, before);
}

// ── Effects ───────────────────────────────────────────────────────────────────

#[test]
fn shake_and_flash_decay_to_zero() {
    let mut s = quiet_state();
    add_shake(&mut s.camera, 3.0, 0.1);
    s.flash = 0.05;
    let mut rng = seeded_rng();
    for _ in 0..12 {
        update(&mut s, &FrameInput::default(), DT, &mut rng);
    }
    assert_eq!(s.camera.shake_time, 0.0);
    assert_eq!(s.camera.shake_mag, 0.0);
    assert_eq!(s.flash, 0.0);
    assert_eq!(s.camera.pos, s.player.pos);
}

#[test]
fn particles_expire() {
    let mut s = quiet_state();
    s.player.hp = 3;
    s.zombies.push(walker_at(Vec2::ZERO, 9));
    let mut rng = seeded_rng();
    update(&mut s, &FrameInput::default(), DT, &mut rng);
    assert!(!s.particles.is_empty());
    s.zombies.clear();
    s.progress.spawn_left = 0;
    for _ in 0..60 {
        update(&mut s, &FrameInput::default(), DT, &mut rng);
        s.zombies.clear();
    }
    assert!(s.particles.is_empty());
}

// ── Game wrapper ──────────────────────────────────────────────────────────────

fn game_in(dir: &tempfile::TempDir) -> Boneblade {
    Boneblade::with_sprite(ScoreStore::new(dir.path()), AssetHandle::missing())
}

#[test]
fn confirm_or_click_starts_from_title() {
    let dir = tempfile::tempdir().unwrap();
    let mut rng = seeded_rng();

    let mut g = game_in(&dir);
    g.frame(&FrameInput::pressing(&[Action::Confirm]), DT, &mut rng);
    assert_eq!(g.phase(), Phase::Play);

    let mut g = game_in(&dir);
    let click = FrameInput {
        clicked: Some(Vec2::new(10.0, 10.0)),
        ..FrameInput::default()
    };
    g.frame(&click, DT, &mut rng);
    assert_eq!(g.phase(), Phase::Play);
}

#[test]
fn new_best_is_persisted_on_death() {
    let dir = tempfile::tempdir().unwrap();
    let mut rng = seeded_rng();
    let mut g = game_in(&dir);
    g.frame(&FrameInput::pressing(&[Action::Confirm]), DT, &mut rng);

    let s = g.state_mut();
    s.player.hp = 1;
    s.progress.score = 120;
    let at = s.player.pos;
    s.zombies.push(walker_at(at, 3));
    g.frame(&FrameInput::default(), DT, &mut rng);

    assert_eq!(g.phase(), Phase::GameOver);
    let saved: BestRecord = ScoreStore::new(dir.path()).load(BONEBLADE_KEY);
    assert_eq!(saved, BestRecord { wave: 1, score: 120 });
}

#[test]
fn game_over_buttons_are_clickable() {
    let dir = tempfile::tempdir().unwrap();
    let mut rng = seeded_rng();
    let mut g = game_in(&dir);
    g.state_mut().phase = Phase::GameOver;

    let (_, menu) = display::game_over_buttons()[1];
    let click = FrameInput {
        clicked: Some(Vec2::new(menu.x + 1.0, menu.y + 1.0)),
        ..FrameInput::default()
    };
    g.frame(&click, DT, &mut rng);
    assert_eq!(g.phase(), Phase::Title);
}

#[test]
fn renders_without_a_sprite() {
    let dir = tempfile::tempdir().unwrap();
    let mut rng = seeded_rng();
    let mut g = game_in(&dir);
    g.frame(&FrameInput::pressing(&[Action::Confirm]), DT, &mut rng);

    let mut canvas = Canvas::new(VIEW_W, VIEW_H);
    g.render(&mut canvas);
    assert!(canvas.texts().iter().any(|t| t.text.starts_with("Wave")));

    g.state_mut().phase = Phase::GameOver;
    g.render(&mut canvas);
    assert!(canvas.texts().iter().any(|t| t.text == "YOU DIED"));
}

#[test]
fn flash_covers_the_game_over_panel() {
    let mut s = quiet_state();
    s.phase = Phase::GameOver;

    let mut plain = Canvas::new(VIEW_W, VIEW_H);
    display::render(&s, None, &mut plain);

    s.flash = FLASH_FULL;
    let mut flashed = Canvas::new(VIEW_W, VIEW_H);
    display::render(&s, None, &mut flashed);

    let (x, y) = (VIEW_W / 2, 30);
    let before = plain.pixel(x, y).unwrap();
    let after = flashed.pixel(x, y).unwrap();
    assert!(after.0 > before.0 && after.1 > before.1 && after.2 > before.2);
}
