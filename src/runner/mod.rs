//! Side-scrolling runners: Squig Run (leaderboard, random mine patterns) and
//! Squig Classic (best distance, one mine at a fixed cadence).

pub mod compute;
pub mod display;
pub mod entities;
pub mod tuning;

use std::path::Path;

use rand::rngs::StdRng;

use crate::assets::AssetHandle;
use crate::canvas::Canvas;
use crate::flow::{FlowCommand, Phase};
use crate::game::Game;
use crate::input::{Action, Bindings, FrameInput, Key};
use crate::score_store::{
    BestDistance, Leaderboard, ScoreStore, CLASSIC_KEY, SQUIG_LEADERBOARD_KEY,
};

use compute::Outcome;
use display::RunnerSprites;
use entities::{GameState, OverScreen, Records, RunnerVariant};

pub struct Runner {
    state: GameState,
    store: ScoreStore,
    squig_sprite: AssetHandle,
    mine_sprite: AssetHandle,
    bg_sprite: AssetHandle,
}

fn load_records(store: &ScoreStore, variant: RunnerVariant) -> Records {
    match variant {
        RunnerVariant::Squig => {
            let mut board: Leaderboard = store.load(SQUIG_LEADERBOARD_KEY);
            board.normalize();
            Records::Leaderboard(board)
        }
        RunnerVariant::Classic => Records::Best(store.load::<BestDistance>(CLASSIC_KEY)),
    }
}

impl Runner {
    pub fn new(
        variant: RunnerVariant,
        store: ScoreStore,
        asset_dir: &Path,
        start_speed: f32,
    ) -> Runner {
        let records = load_records(&store, variant);
        Runner {
            state: compute::new_state(variant, start_speed, records),
            store,
            squig_sprite: AssetHandle::load(asset_dir.join("squig.sprite")),
            mine_sprite: AssetHandle::load(asset_dir.join("mine.sprite")),
            bg_sprite: AssetHandle::load(asset_dir.join("bg_tile.sprite")),
        }
    }

    /// A runner with no sprites; everything draws with fallback shapes.
    pub fn without_assets(variant: RunnerVariant, store: ScoreStore, start_speed: f32) -> Runner {
        let records = load_records(&store, variant);
        Runner {
            state: compute::new_state(variant, start_speed, records),
            store,
            squig_sprite: AssetHandle::missing(),
            mine_sprite: AssetHandle::missing(),
            bg_sprite: AssetHandle::missing(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    fn save_records(&self) {
        match &self.state.records {
            Records::Leaderboard(board) => self.store.save_or_warn(SQUIG_LEADERBOARD_KEY, board),
            Records::Best(best) => self.store.save_or_warn(CLASSIC_KEY, best),
        }
    }

    /// Initials entry owns the keyboard until it is submitted or skipped.
    fn entry_input(&mut self, input: &FrameInput) {
        for &c in &input.text {
            compute::type_initial(&mut self.state, c);
        }
        for action in &input.pressed {
            match action {
                Action::Erase => compute::erase_initial(&mut self.state),
                Action::Confirm => {
                    if compute::submit_initials(&mut self.state) {
                        self.save_records();
                    }
                    return;
                }
                Action::Pause => {
                    compute::skip_entry(&mut self.state);
                    return;
                }
                _ => {}
            }
        }
    }

    fn flow_command(&mut self, input: &FrameInput) -> Option<FlowCommand> {
        match self.state.phase {
            Phase::Title => {
                for action in &input.pressed {
                    match action {
                        Action::MenuLeft => compute::adjust_start_speed(&mut self.state, -1),
                        Action::MenuRight => compute::adjust_start_speed(&mut self.state, 1),
                        Action::Confirm | Action::Jump => return Some(FlowCommand::Start),
                        _ => {}
                    }
                }
                input.clicked.map(|_| FlowCommand::Start)
            }
            Phase::Play => input
                .was_pressed(Action::Pause)
                .then_some(FlowCommand::TogglePause),
            Phase::Pause => (input.was_pressed(Action::Pause)
                || input.was_pressed(Action::Confirm))
            .then_some(FlowCommand::TogglePause),
            Phase::GameOver => {
                if let Some(at) = input.clicked {
                    let hit = display::over_buttons()
                        .into_iter()
                        .find(|(_, r)| r.contains(at.x, at.y));
                    if let Some((choice, _)) = hit {
                        self.state.menu = choice;
                        return Some(choice.command());
                    }
                }
                for action in &input.pressed {
                    match action {
                        Action::MenuLeft | Action::MenuRight => {
                            self.state.menu = self.state.menu.toggle();
                        }
                        Action::Confirm => return Some(self.state.menu.command()),
                        Action::MainMenu => return Some(FlowCommand::MainMenu),
                        _ => {}
                    }
                }
                None
            }
        }
    }
}

impl Game for Runner {
    fn name(&self) -> &'static str {
        self.state.variant.rules().title
    }

    fn logical_size(&self) -> (usize, usize) {
        (tuning::VIEW_W, tuning::VIEW_H)
    }

    fn bindings(&self) -> Bindings {
        Bindings::new(&[
            (Key::Space, Action::Jump),
            (Key::Up, Action::Jump),
            (Key::Char('w'), Action::Jump),
            (Key::Enter, Action::Confirm),
            (Key::Esc, Action::Pause),
            (Key::Left, Action::MenuLeft),
            (Key::Right, Action::MenuRight),
            (Key::Char('m'), Action::MainMenu),
            (Key::Backspace, Action::Erase),
            (Key::Char('q'), Action::Quit),
        ])
    }

    fn phase(&self) -> Phase {
        self.state.phase
    }

    fn captures_text(&self) -> bool {
        self.state.phase == Phase::GameOver
            && matches!(self.state.over, OverScreen::Entry { .. })
    }

    fn frame(&mut self, input: &FrameInput, dt: f32, rng: &mut StdRng) {
        if self.captures_text() {
            self.entry_input(input);
            return;
        }
        if let Some(cmd) = self.flow_command(input) {
            compute::apply_flow(&mut self.state, cmd, rng);
            return;
        }
        let jump = input.is_held(Action::Jump) || input.was_pressed(Action::Jump);
        if let Outcome::Died {
            record_changed: true,
            ..
        } = compute::update(&mut self.state, jump, dt, rng)
        {
            self.save_records();
        }
    }

    fn render(&self, canvas: &mut Canvas) {
        let sprites = RunnerSprites {
            squig: self.squig_sprite.ready(),
            mine: self.mine_sprite.ready(),
            background: self.bg_sprite.ready(),
        };
        display::render(&self.state, sprites, canvas);
    }

    fn poll_assets(&mut self) {
        self.squig_sprite.poll();
        self.mine_sprite.poll();
        self.bg_sprite.poll();
    }
}
