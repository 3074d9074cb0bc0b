use approx::assert_relative_eq;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rstest::rstest;

use arcade_cabinet::canvas::{Canvas, Rgb};
use arcade_cabinet::flow::{FlowCommand, Phase};
use arcade_cabinet::game::Game;
use arcade_cabinet::input::{Action, FrameInput};
use arcade_cabinet::runner::compute::*;
use arcade_cabinet::runner::display::{self, RunnerSprites};
use arcade_cabinet::runner::entities::*;
use arcade_cabinet::runner::tuning::*;
use arcade_cabinet::runner::Runner;
use arcade_cabinet::score_store::{
    BestDistance, Leaderboard, ScoreStore, CLASSIC_KEY, SQUIG_LEADERBOARD_KEY,
};

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn squig_state() -> GameState {
    new_state(
        RunnerVariant::Squig,
        DEFAULT_START_SPEED,
        Records::Leaderboard(Leaderboard::default()),
    )
}

fn classic_state() -> GameState {
    new_state(
        RunnerVariant::Classic,
        DEFAULT_START_SPEED,
        Records::Best(BestDistance::default()),
    )
}

fn running(mut state: GameState) -> GameState {
    start_run(&mut state);
    state
}

/// A mine sitting right under the squig.
fn mine_on_squig() -> Trap {
    Trap {
        x: SQUIG_X - 10.0,
        y: FLOOR_Y - TRAP_SIZE,
        width: TRAP_SIZE,
        height: TRAP_SIZE,
    }
}

// ── Setup ─────────────────────────────────────────────────────────────────────

#[test]
fn squig_starts_at_the_chosen_speed() {
    let s = running(squig_state());
    assert_eq!(s.phase, Phase::Play);
    assert_eq!(s.run.speed, DEFAULT_START_SPEED);
    assert_eq!(s.run.distance, 0.0);
    assert!(s.traps.is_empty());
}

#[test]
fn classic_ignores_the_chosen_speed() {
    let s = running(classic_state());
    assert_eq!(s.run.speed, 6.0);
}

#[rstest]
#[case(1, 5.5)]
#[case(-2, 4.0)]
#[case(100, MAX_START_SPEED)]
#[case(-100, MIN_START_SPEED)]
fn title_speed_slider(#[case] steps: i32, #[case] expected: f32) {
    let mut s = squig_state();
    adjust_start_speed(&mut s, steps);
    assert_eq!(s.start_speed, expected);
}

#[test]
fn classic_title_has_no_slider() {
    let mut s = classic_state();
    adjust_start_speed(&mut s, 3);
    assert_eq!(s.start_speed, DEFAULT_START_SPEED);
}

// ── Physics ───────────────────────────────────────────────────────────────────

#[test]
fn jump_only_from_the_ground() {
    let mut s = running(squig_state());
    let mut rng = seeded_rng();

    step(&mut s, true, &mut rng);
    assert_eq!(s.squig.vy, JUMP_VELOCITY);
    assert!(!s.squig.on_ground);

    step(&mut s, true, &mut rng);
    assert!(s.squig.y < SQUIG_Y);
    assert_relative_eq!(s.squig.vy, JUMP_VELOCITY + GRAVITY);
}

#[test]
fn squig_lands_back_on_the_floor() {
    let mut s = running(squig_state());
    let mut rng = seeded_rng();
    step(&mut s, true, &mut rng);
    for _ in 0..120 {
        step(&mut s, false, &mut rng);
    }
    assert!(s.squig.on_ground);
    assert_eq!(s.squig.y, FLOOR_Y - SQUIG_RADIUS);
    assert_eq!(s.squig.vy, 0.0);
}

#[test]
fn traps_scroll_and_are_culled() {
    let mut s = running(squig_state());
    s.traps.push(Trap {
        x: 300.0,
        y: FLOOR_Y - TRAP_SIZE,
        width: TRAP_SIZE,
        height: TRAP_SIZE,
    });
    s.traps.push(Trap {
        x: -TRAP_SIZE + 1.0,
        y: FLOOR_Y - TRAP_SIZE,
        width: TRAP_SIZE,
        height: TRAP_SIZE,
    });
    let mut rng = seeded_rng();
    step(&mut s, false, &mut rng);
    assert_eq!(s.traps.len(), 1);
    assert_eq!(s.traps[0].x, 300.0 - DEFAULT_START_SPEED);
}

#[test]
fn touching_edges_is_not_a_hit() {
    let squig = Squig::default();
    let trap = Trap {
        x: squig.x + squig.radius,
        y: FLOOR_Y - TRAP_SIZE,
        width: TRAP_SIZE,
        height: TRAP_SIZE,
    };
    assert!(!hits(&squig, &trap));
    let overlapping = Trap {
        x: trap.x - 1.0,
        ..trap
    };
    assert!(hits(&squig, &overlapping));
}

// ── Distance + speed ──────────────────────────────────────────────────────────

#[test]
fn crossing_1000_ramps_speed_once() {
    let mut s = running(squig_state());
    s.run.distance = 995.0;
    s.run.speed = 6.0;
    advance_distance(&mut s.run, SQUIG_RULES.chunk, SQUIG_RULES.speed_step);
    assert_eq!(s.run.distance, 1001.0);
    assert_eq!(s.run.speed, 6.25);

    advance_distance(&mut s.run, SQUIG_RULES.chunk, SQUIG_RULES.speed_step);
    assert_eq!(s.run.speed, 6.25);
}

#[test]
fn classic_ramps_at_1500_milestones() {
    let mut s = running(classic_state());
    s.run.distance = 1495.0;
    advance_distance(&mut s.run, CLASSIC_RULES.chunk, CLASSIC_RULES.speed_step);
    assert_eq!(s.run.speed, 6.5);
    for _ in 0..100 {
        advance_distance(&mut s.run, CLASSIC_RULES.chunk, CLASSIC_RULES.speed_step);
    }
    assert_eq!(s.run.speed, 6.5);
}

#[test]
fn fixed_steps_follow_real_time() {
    let mut s = running(squig_state());
    let mut rng = seeded_rng();
    update(&mut s, false, 0.04, &mut rng);
    assert_eq!(s.run.steps, 2);
    assert_relative_eq!(s.accumulator, 0.04 - 2.0 * STEP_DT, epsilon = 1e-6);
    assert_relative_eq!(s.run.distance, 2.0 * DEFAULT_START_SPEED);
}

// ── Spawning ──────────────────────────────────────────────────────────────────

#[test]
fn squig_safe_start_has_no_mines() {
    let mut s = running(squig_state());
    let mut rng = seeded_rng();
    for _ in 0..150 {
        assert_eq!(step(&mut s, false, &mut rng), Outcome::Continue);
    }
    assert!(s.traps.is_empty());
}

#[test]
fn squig_patterns_respect_max_traps() {
    let mut s = running(squig_state());
    s.run.safe_start = 0;
    let mut rng = seeded_rng();
    let mut spawned = 0;
    for _ in 0..3000 {
        s.squig = Squig {
            y: -1000.0,
            on_ground: false,
            ..Squig::default()
        };
        let before = s.traps.len();
        step(&mut s, false, &mut rng);
        let added = s.traps.len().saturating_sub(before);
        assert!(added as u32 <= max_traps(s.run.speed));
        spawned += added;
    }
    assert!(spawned > 0);
}

#[test]
fn classic_spawns_one_mine_every_80_steps() {
    let mut s = running(classic_state());
    let mut rng = seeded_rng();
    for _ in 0..79 {
        step(&mut s, false, &mut rng);
    }
    assert!(s.traps.is_empty());
    step(&mut s, false, &mut rng);
    assert_eq!(s.traps.len(), 1);
    assert_eq!(s.traps[0].x, VIEW_W as f32 + 10.0);
}

#[rstest]
#[case(1.0, 1)]
#[case(2.9, 1)]
#[case(3.0, 2)]
#[case(5.9, 2)]
#[case(6.0, 3)]
fn pattern_size_grows_with_speed(#[case] speed: f32, #[case] traps: u32) {
    assert_eq!(max_traps(speed), traps);
}

// ── Death + records ───────────────────────────────────────────────────────────

#[test]
fn squig_death_opens_initials_entry() {
    let mut s = running(squig_state());
    s.run.distance = 420.6;
    s.traps.push(mine_on_squig());
    let mut rng = seeded_rng();

    let outcome = step(&mut s, false, &mut rng);
    assert_eq!(
        outcome,
        Outcome::Died {
            score: 420,
            record_changed: false
        }
    );
    assert_eq!(s.phase, Phase::GameOver);
    assert_eq!(
        s.over,
        OverScreen::Entry {
            initials: String::new()
        }
    );
    assert_eq!(step(&mut s, false, &mut rng), Outcome::Continue);
}

#[test]
fn initials_are_capped_and_uppercased() {
    let mut s = running(squig_state());
    s.traps.push(mine_on_squig());
    s.run.distance = 77.0;
    step(&mut s, false, &mut seeded_rng());

    for c in ['a', '1', 'b', 'c', 'd'] {
        type_initial(&mut s, c);
    }
    assert_eq!(s.over, OverScreen::Entry { initials: "ABC".into() });
    erase_initial(&mut s);
    assert_eq!(s.over, OverScreen::Entry { initials: "AB".into() });

    assert!(submit_initials(&mut s));
    assert_eq!(s.over, OverScreen::Retry);
    let Records::Leaderboard(board) = &s.records else {
        panic!("squig keeps a leaderboard");
    };
    assert_eq!(board.entries()[0].name, "AB");
    assert_eq!(board.entries()[0].score, 77);
}

#[test]
fn empty_initials_use_default_name() {
    let mut s = running(squig_state());
    s.traps.push(mine_on_squig());
    step(&mut s, false, &mut seeded_rng());
    assert!(submit_initials(&mut s));
    assert_eq!(s.records.best(), 0);
    let Records::Leaderboard(board) = &s.records else {
        panic!("squig keeps a leaderboard");
    };
    assert_eq!(board.entries()[0].name, DEFAULT_INITIALS);
}

#[test]
fn skipping_entry_leaves_board_untouched() {
    let mut s = running(squig_state());
    s.traps.push(mine_on_squig());
    step(&mut s, false, &mut seeded_rng());
    skip_entry(&mut s);
    assert_eq!(s.over, OverScreen::Retry);
    assert_eq!(s.records, Records::Leaderboard(Leaderboard::default()));
    assert!(!submit_initials(&mut s));
}

#[test]
fn classic_death_updates_best_distance() {
    let mut s = running(classic_state());
    s.run.distance = 1234.7;
    s.traps.push(mine_on_squig());
    let outcome = step(&mut s, false, &mut seeded_rng());
    assert_eq!(
        outcome,
        Outcome::Died {
            score: 1234,
            record_changed: true
        }
    );
    assert_eq!(s.over, OverScreen::Retry);
    assert_eq!(s.records.best(), 1234);
}

#[test]
fn classic_short_run_keeps_old_best() {
    let mut s = new_state(
        RunnerVariant::Classic,
        DEFAULT_START_SPEED,
        Records::Best(BestDistance { distance: 5000 }),
    );
    start_run(&mut s);
    s.traps.push(mine_on_squig());
    let outcome = step(&mut s, false, &mut seeded_rng());
    assert_eq!(
        outcome,
        Outcome::Died {
            score: 0,
            record_changed: false
        }
    );
    assert_eq!(s.records.best(), 5000);
}

// ── Flow ──────────────────────────────────────────────────────────────────────

#[test]
fn pause_picks_a_tip_and_freezes_the_run() {
    let mut s = running(squig_state());
    let mut rng = seeded_rng();
    assert!(apply_flow(&mut s, FlowCommand::TogglePause, &mut rng));
    assert_eq!(s.phase, Phase::Pause);
    assert!(s.tip < TIPS.len());

    let before = s.clone();
    assert_eq!(update(&mut s, true, 0.5, &mut rng), Outcome::Continue);
    assert_eq!(s, before);

    assert!(apply_flow(&mut s, FlowCommand::TogglePause, &mut rng));
    assert_eq!(s.phase, Phase::Play);
}

#[test]
fn restart_matches_a_fresh_start() {
    let mut played = running(squig_state());
    let mut rng = seeded_rng();
    for _ in 0..40 {
        step(&mut played, true, &mut rng);
    }
    played.traps.push(mine_on_squig());
    played.squig = Squig::default();
    step(&mut played, false, &mut rng);
    skip_entry(&mut played);
    assert!(apply_flow(&mut played, FlowCommand::Restart, &mut rng));

    let fresh = running(new_state(
        RunnerVariant::Squig,
        played.start_speed,
        played.records.clone(),
    ));
    assert_eq!(played, fresh);
}

#[test]
fn main_menu_returns_to_title() {
    let mut s = running(classic_state());
    s.traps.push(mine_on_squig());
    let mut rng = seeded_rng();
    step(&mut s, false, &mut rng);
    assert!(apply_flow(&mut s, FlowCommand::MainMenu, &mut rng));
    assert_eq!(s.phase, Phase::Title);
    assert!(!apply_flow(&mut s, FlowCommand::Restart, &mut rng));
}

// ── Game wrapper ──────────────────────────────────────────────────────────────

const DT: f32 = 1.0 / 30.0;

fn runner_in(dir: &tempfile::TempDir, variant: RunnerVariant) -> Runner {
    Runner::without_assets(variant, ScoreStore::new(dir.path()), DEFAULT_START_SPEED)
}

#[test]
fn arrows_adjust_speed_then_jump_starts() {
    let dir = tempfile::tempdir().unwrap();
    let mut g = runner_in(&dir, RunnerVariant::Squig);
    let mut rng = seeded_rng();

    g.frame(&FrameInput::pressing(&[Action::MenuRight]), DT, &mut rng);
    assert_eq!(g.state().start_speed, DEFAULT_START_SPEED + START_SPEED_STEP);
    assert_eq!(g.phase(), Phase::Title);

    g.frame(&FrameInput::pressing(&[Action::Jump]), DT, &mut rng);
    assert_eq!(g.phase(), Phase::Play);
    assert_eq!(g.state().run.speed, DEFAULT_START_SPEED + START_SPEED_STEP);
}

#[test]
fn tapped_jump_key_still_jumps() {
    let dir = tempfile::tempdir().unwrap();
    let mut g = runner_in(&dir, RunnerVariant::Squig);
    let mut rng = seeded_rng();
    g.frame(&FrameInput::pressing(&[Action::Confirm]), DT, &mut rng);

    g.frame(&FrameInput::pressing(&[Action::Jump]), DT, &mut rng);
    assert!(!g.state().squig.on_ground);
    assert!(g.state().squig.vy < 0.0);
}

#[test]
fn entry_captures_text_and_saves_on_confirm() {
    let dir = tempfile::tempdir().unwrap();
    let mut g = runner_in(&dir, RunnerVariant::Squig);
    let mut rng = seeded_rng();
    g.frame(&FrameInput::pressing(&[Action::Confirm]), DT, &mut rng);

    g.state_mut().run.distance = 321.0;
    g.state_mut().traps.push(mine_on_squig());
    g.frame(&FrameInput::default(), DT, &mut rng);
    assert!(g.captures_text());

    let typed = FrameInput {
        text: vec!['q', 'm', 'x'],
        pressed: vec![Action::Quit, Action::MainMenu],
        ..FrameInput::default()
    };
    g.frame(&typed, DT, &mut rng);
    assert_eq!(g.phase(), Phase::GameOver);

    g.frame(&FrameInput::pressing(&[Action::Confirm]), DT, &mut rng);
    assert!(!g.captures_text());

    let saved: Leaderboard = ScoreStore::new(dir.path()).load(SQUIG_LEADERBOARD_KEY);
    assert_eq!(saved.entries()[0].name, "QMX");
    assert_eq!(saved.entries()[0].score, 321);
}

#[test]
fn classic_best_is_saved_on_death() {
    let dir = tempfile::tempdir().unwrap();
    let mut g = runner_in(&dir, RunnerVariant::Classic);
    let mut rng = seeded_rng();
    g.frame(&FrameInput::pressing(&[Action::Confirm]), DT, &mut rng);
    g.state_mut().run.distance = 88.0;
    g.state_mut().traps.push(mine_on_squig());
    g.frame(&FrameInput::default(), DT, &mut rng);

    let saved: BestDistance = ScoreStore::new(dir.path()).load(CLASSIC_KEY);
    assert_eq!(saved.distance, 88);
    assert!(!g.captures_text());
}

#[test]
fn retry_button_click_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let mut g = runner_in(&dir, RunnerVariant::Classic);
    let mut rng = seeded_rng();
    g.frame(&FrameInput::pressing(&[Action::Confirm]), DT, &mut rng);
    g.state_mut().traps.push(mine_on_squig());
    g.frame(&FrameInput::default(), DT, &mut rng);
    assert_eq!(g.phase(), Phase::GameOver);

    let (_, retry) = display::over_buttons()[0];
    let click = FrameInput {
        clicked: Some(Vec2::new(retry.x + retry.w / 2.0, retry.y + retry.h / 2.0)),
        ..FrameInput::default()
    };
    g.frame(&click, DT, &mut rng);
    assert_eq!(g.phase(), Phase::Play);
    assert!(g.state().traps.is_empty());
}

// ── Rendering ─────────────────────────────────────────────────────────────────

#[test]
fn fallback_shapes_draw_the_squig() {
    let s = running(squig_state());
    let mut canvas = Canvas::new(VIEW_W, VIEW_H);
    display::render(&s, RunnerSprites::default(), &mut canvas);
    let center = canvas.pixel(SQUIG_X as usize, SQUIG_Y as usize);
    assert_eq!(center, Some(Rgb::hex(0x7fd6a1)));
    assert!(canvas.texts().iter().any(|t| t.text == "Score: 0m"));
}

#[test]
fn title_lists_the_leaderboard() {
    let mut board = Leaderboard::default();
    board.insert("ZED", 900);
    let s = new_state(
        RunnerVariant::Squig,
        DEFAULT_START_SPEED,
        Records::Leaderboard(board),
    );
    let mut canvas = Canvas::new(VIEW_W, VIEW_H);
    display::render(&s, RunnerSprites::default(), &mut canvas);
    assert!(canvas.texts().iter().any(|t| t.text.contains("ZED")));
}

#[test]
fn full_leaderboard_title_keeps_every_line_apart() {
    let mut board = Leaderboard::default();
    let scores = [("AAA", 900), ("BBB", 800), ("CCC", 700), ("DDD", 600), ("EEE", 500)];
    for (name, score) in scores {
        board.insert(name, score);
    }
    let s = new_state(
        RunnerVariant::Squig,
        DEFAULT_START_SPEED,
        Records::Leaderboard(board),
    );
    let mut canvas = Canvas::new(VIEW_W, VIEW_H);
    display::render(&s, RunnerSprites::default(), &mut canvas);

    let texts = canvas.texts();
    let fifth = texts.iter().find(|t| t.text.starts_with("5. EEE")).unwrap();
    let start = texts.iter().find(|t| t.text == "Press ENTER to start").unwrap();
    assert!(start.y - fifth.y >= 20.0);

    let mut rows: Vec<f32> = texts.iter().map(|t| t.y).collect();
    rows.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert!(rows.windows(2).all(|w| w[1] - w[0] >= 20.0));
    assert!(start.y < VIEW_H as f32);
}
