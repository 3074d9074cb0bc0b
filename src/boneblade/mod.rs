//! Boneblade Colosseum: survive waves of zombies in a circular arena with a
//! dash and a directional arc attack.

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
use crate::score_store::{BestRecord, ScoreStore, BONEBLADE_KEY};

use compute::Outcome;
use entities::GameState;

pub struct Boneblade {
    state: GameState,
    store: ScoreStore,
    player_sprite: AssetHandle,
}

impl Boneblade {
    pub fn new(store: ScoreStore, asset_dir: &Path) -> Boneblade {
        let best: BestRecord = store.load(BONEBLADE_KEY);
        Boneblade {
            state: compute::new_state(best),
            store,
            player_sprite: AssetHandle::load(asset_dir.join("player_melee_idle.sprite")),
        }
    }

    /// A game with the given sprite handle, for callers that manage assets
    /// themselves.
    pub fn with_sprite(store: ScoreStore, player_sprite: AssetHandle) -> Boneblade {
        let best: BestRecord = store.load(BONEBLADE_KEY);
        Boneblade {
            state: compute::new_state(best),
            store,
            player_sprite,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    /// The flow command this frame's input asks for, if any. Menu
    /// navigation on the game-over panel is applied directly.
    fn flow_command(&mut self, input: &FrameInput) -> Option<FlowCommand> {
        match self.state.phase {
            Phase::Title => (input.was_pressed(Action::Confirm)
                || input.was_pressed(Action::Attack)
                || input.clicked.is_some())
            .then_some(FlowCommand::Start),
            Phase::Play | Phase::Pause => input
                .was_pressed(Action::Pause)
                .then_some(FlowCommand::TogglePause),
            Phase::GameOver => {
                if let Some(at) = input.clicked {
                    let hit = display::game_over_buttons()
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
                        _ => {}
                    }
                }
                None
            }
        }
    }
}

impl Game for Boneblade {
    fn name(&self) -> &'static str {
        "Boneblade"
    }

    fn logical_size(&self) -> (usize, usize) {
        (tuning::VIEW_W, tuning::VIEW_H)
    }

    fn bindings(&self) -> Bindings {
        Bindings::new(&[
            (Key::Char('w'), Action::MoveUp),
            (Key::Up, Action::MoveUp),
            (Key::Char('s'), Action::MoveDown),
            (Key::Down, Action::MoveDown),
            (Key::Char('a'), Action::MoveLeft),
            (Key::Left, Action::MoveLeft),
            (Key::Char('a'), Action::MenuLeft),
            (Key::Left, Action::MenuLeft),
            (Key::Char('d'), Action::MoveRight),
            (Key::Right, Action::MoveRight),
            (Key::Char('d'), Action::MenuRight),
            (Key::Right, Action::MenuRight),
            (Key::Space, Action::Attack),
            (Key::Char('j'), Action::Attack),
            (Key::Enter, Action::Confirm),
            (Key::Shift, Action::Dash),
            (Key::Char('k'), Action::Dash),
            (Key::Tab, Action::Dash),
            (Key::Esc, Action::Pause),
            (Key::Char('q'), Action::Quit),
        ])
    }

    fn phase(&self) -> Phase {
        self.state.phase
    }

    fn frame(&mut self, input: &FrameInput, dt: f32, rng: &mut StdRng) {
        if let Some(cmd) = self.flow_command(input) {
            // The transition owns this frame; the next update sees fresh input.
            compute::apply_flow(&mut self.state, cmd, rng);
            return;
        }
        if let Outcome::Died { new_best: true } = compute::update(&mut self.state, input, dt, rng) {
            self.store.save_or_warn(BONEBLADE_KEY, &self.state.best);
        }
    }

    fn render(&self, canvas: &mut Canvas) {
        display::render(&self.state, self.player_sprite.ready(), canvas);
    }

    fn poll_assets(&mut self) {
        self.player_sprite.poll();
    }
}
