use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, PopKeyboardEnhancementFlags,
        PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use arcade_cabinet::boneblade::Boneblade;
use arcade_cabinet::canvas::Canvas;
use arcade_cabinet::config::{Args, GameChoice, Settings};
use arcade_cabinet::game::{clamp_dt, Game};
use arcade_cabinet::input::{self, Action, InputQueue, InputState};
use arcade_cabinet::logging;
use arcade_cabinet::runner::entities::RunnerVariant;
use arcade_cabinet::runner::Runner;
use arcade_cabinet::score_store::{
    BestDistance, BestRecord, Leaderboard, ScoreStore, BONEBLADE_KEY, CLASSIC_KEY,
    SQUIG_LEADERBOARD_KEY,
};
use arcade_cabinet::screen::{self, Viewport};

// ── Launcher ──────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(GameChoice),
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    store: &ScoreStore,
) -> Result<MenuResult> {
    out.queue(style::ResetColor)?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "ARCADE CABINET";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    let best: BestRecord = store.load(BONEBLADE_KEY);
    let board: Leaderboard = store.load(SQUIG_LEADERBOARD_KEY);
    let classic: BestDistance = store.load(CLASSIC_KEY);

    let options: [(&str, &str, Color, String); 3] = [
        (
            "1",
            "Boneblade",
            Color::Red,
            format!("best wave {} / score {}", best.wave, best.score),
        ),
        (
            "2",
            "Squig Run",
            Color::Green,
            format!("top {}m", board.best()),
        ),
        (
            "3",
            "Squig Classic",
            Color::Yellow,
            format!("best {}m", classic.distance),
        ),
    ];

    for (i, (key, label, color, desc)) in options.iter().enumerate() {
        let row = cy.saturating_sub(3) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(18), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{key}] ")))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(format!("{label:<14}")))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(" {desc}")))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(18), cy + 2))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print("Q : Quit   (in game: Q back to this menu)"))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        let Ok(ev) = rx.recv() else {
            return Ok(MenuResult::Quit);
        };
        if let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            modifiers,
            ..
        }) = ev
        {
            match code {
                KeyCode::Char('1') => return Ok(MenuResult::Start(GameChoice::Boneblade)),
                KeyCode::Char('2') => return Ok(MenuResult::Start(GameChoice::SquigRun)),
                KeyCode::Char('3') => return Ok(MenuResult::Start(GameChoice::Classic)),
                KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                    return Ok(MenuResult::Quit)
                }
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit)
                }
                _ => {}
            }
        }
    }
}

fn build_game(choice: GameChoice, settings: &Settings) -> Box<dyn Game> {
    let store = ScoreStore::new(settings.data_dir.clone());
    match choice {
        GameChoice::Boneblade => Box::new(Boneblade::new(store, &settings.asset_dir)),
        GameChoice::SquigRun => Box::new(Runner::new(
            RunnerVariant::Squig,
            store,
            &settings.asset_dir,
            settings.start_speed,
        )),
        GameChoice::Classic => Box::new(Runner::new(
            RunnerVariant::Classic,
            store,
            &settings.asset_dir,
            settings.start_speed,
        )),
    }
}

// ── Frame driver ──────────────────────────────────────────────────────────────

/// Why a game loop ended.
#[derive(PartialEq, Eq)]
enum LoopExit {
    /// Back to the launcher.
    Menu,
    /// Ctrl-C: leave the program.
    Interrupt,
}

/// Runs one game until the player quits it.
///
/// Every frame: drain terminal events into the input queue, snapshot them
/// into a `FrameInput`, step the game with a clamped dt, then render the
/// logical canvas and present it letterboxed into the terminal.
fn game_loop<W: Write>(
    out: &mut W,
    game: &mut dyn Game,
    rx: &mpsc::Receiver<Event>,
    rng: &mut StdRng,
    frame_time: Duration,
) -> Result<LoopExit> {
    let bindings = game.bindings();
    let (lw, lh) = game.logical_size();
    let mut canvas = Canvas::new(lw, lh);
    let mut queue = InputQueue::default();
    let mut input_state = InputState::default();

    let (cols, rows) = terminal::size()?;
    let mut viewport = Viewport::fit(lw, lh, cols, rows);
    screen::clear(out)?;
    let mut last = Instant::now();

    info!("{} started", game.name());

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            if let Event::Resize(c, r) = ev {
                let next = Viewport::fit(lw, lh, c, r);
                if next != viewport {
                    viewport = next;
                    screen::clear(out)?;
                }
                continue;
            }
            if let Some(e) = input::translate(&ev, &viewport) {
                queue.push(e);
            }
            if let Some(e) = input::shift_from_modifiers(&ev) {
                queue.push(e);
            }
        }
        let frame_input = input_state.drain(&mut queue, &bindings);

        if frame_input.interrupted {
            return Ok(LoopExit::Interrupt);
        }
        if frame_input.was_pressed(Action::Quit) && !game.captures_text() {
            return Ok(LoopExit::Menu);
        }

        let now = Instant::now();
        let dt = clamp_dt(now.duration_since(last).as_secs_f32());
        last = now;

        game.frame(&frame_input, dt, rng);
        game.poll_assets();
        game.render(&mut canvas);
        screen::present(out, &canvas, &viewport)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let settings = Args::parse().into_settings();
    logging::init(settings.verbose, &settings.log_file);
    info!("data directory {}", settings.data_dir.display());

    let mut out = BufWriter::new(stdout());

    terminal::enable_raw_mode().context("terminal does not support raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Key-release events let held keys drop immediately, and bare Shift is
    // only reported with all keys as escape codes. Terminals without the
    // protocol fall back to the hold window and shifted keys.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                | KeyboardEnhancementFlags::REPORT_ALL_KEYS_AS_ESCAPE_CODES
                | KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    if !keyboard_enhanced {
        warn!("keyboard enhancement unavailable; using key-repeat hold window");
    }

    // Dedicated thread for blocking event reads.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = run(&mut out, &rx, &settings);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(style::ResetColor);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>, settings: &Settings) -> Result<()> {
    let mut rng = match settings.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let frame_time = Duration::from_secs_f64(1.0 / settings.fps as f64);
    let mut direct = settings.game;

    loop {
        let choice = match direct.take() {
            Some(choice) => choice,
            None => match show_menu(out, rx, &ScoreStore::new(settings.data_dir.clone()))? {
                MenuResult::Quit => break,
                MenuResult::Start(choice) => choice,
            },
        };
        let mut game = build_game(choice, settings);
        let exit = game_loop(out, game.as_mut(), rx, &mut rng, frame_time)
            .with_context(|| format!("{} stopped unexpectedly", game.name()))?;
        info!("{} closed", game.name());
        if exit == LoopExit::Interrupt {
            break;
        }
    }
    Ok(())
}
