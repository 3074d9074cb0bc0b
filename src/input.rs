//! Input sampling.
//!
//! Terminal events are translated into `InputEvent`s and pushed onto an
//! `InputQueue` as they arrive. Once per frame the queue is drained into a
//! `FrameInput`, so simulation only ever sees input at frame boundaries.
//!
//! Held keys follow a hold-window model: a key counts as held if its last
//! press or repeat arrived within `HOLD_WINDOW` frames. Terminals that report
//! key releases drop the key immediately; classic terminals only send
//! repeated presses, and those keep the key alive while it is down.

use std::collections::{HashMap, HashSet, VecDeque};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, ModifierKeyCode, MouseButton,
    MouseEvent, MouseEventKind,
};
use glam::Vec2;

use crate::screen::Viewport;

/// Frames a key stays held after its last press/repeat event.
pub const HOLD_WINDOW: u64 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Space,
    Enter,
    Esc,
    Tab,
    Backspace,
    Shift,
    Char(char),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyRepeat(Key),
    KeyUp(Key),
    /// Pointer position in logical screen coordinates.
    PointerMove(Vec2),
    PointerDown(Vec2),
    PointerUp,
    /// Ctrl-C.
    Interrupt,
}

/// Semantic actions. Games choose which keys produce which action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Jump,
    Attack,
    Dash,
    Pause,
    MenuLeft,
    MenuRight,
    Confirm,
    MainMenu,
    Erase,
    Quit,
}

#[derive(Clone, Debug, Default)]
pub struct Bindings {
    pairs: Vec<(Key, Action)>,
}

impl Bindings {
    pub fn new(pairs: &[(Key, Action)]) -> Bindings {
        Bindings {
            pairs: pairs.to_vec(),
        }
    }

    pub fn actions_for(&self, key: Key) -> impl Iterator<Item = Action> + '_ {
        self.pairs
            .iter()
            .filter(move |(k, _)| *k == key)
            .map(|(_, a)| *a)
    }
}

// ── Queue ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct InputQueue {
    events: VecDeque<InputEvent>,
}

impl InputQueue {
    pub fn push(&mut self, event: InputEvent) {
        self.events.push_back(event);
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

// ── Per-frame snapshot ────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct FrameInput {
    /// Actions whose key went down this frame, in arrival order.
    pub pressed: Vec<Action>,
    pub held: HashSet<Action>,
    /// Letters typed this frame.
    pub text: Vec<char>,
    /// Last known pointer position in logical screen coordinates.
    pub pointer: Option<Vec2>,
    /// Where the pointer was pressed this frame, if it was.
    pub clicked: Option<Vec2>,
    pub interrupted: bool,
}

impl FrameInput {
    pub fn was_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }

    pub fn is_held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    /// Raw (unnormalised) movement axes from the held directions.
    pub fn move_axes(&self) -> Vec2 {
        let axis = |neg: Action, pos: Action| {
            (self.is_held(pos) as i32 - self.is_held(neg) as i32) as f32
        };
        Vec2::new(
            axis(Action::MoveLeft, Action::MoveRight),
            axis(Action::MoveUp, Action::MoveDown),
        )
    }

    /// Convenience for tests and scripted frames.
    pub fn holding(actions: &[Action]) -> FrameInput {
        FrameInput {
            held: actions.iter().copied().collect(),
            ..FrameInput::default()
        }
    }

    pub fn pressing(actions: &[Action]) -> FrameInput {
        FrameInput {
            pressed: actions.to_vec(),
            ..FrameInput::default()
        }
    }
}

/// Held-key bookkeeping that survives between frames.
#[derive(Debug, Default)]
pub struct InputState {
    /// Each held key → the frame it was last seen (press or repeat).
    key_frame: HashMap<Key, u64>,
    frame: u64,
    pointer: Option<Vec2>,
}

impl InputState {
    fn is_held(&self, key: Key) -> bool {
        self.key_frame
            .get(&key)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    /// Drains every queued event and returns this frame's input.
    pub fn drain(&mut self, queue: &mut InputQueue, bindings: &Bindings) -> FrameInput {
        self.frame += 1;
        let mut input = FrameInput::default();

        while let Some(event) = queue.events.pop_front() {
            match event {
                InputEvent::KeyDown(key) => {
                    self.key_frame.insert(key, self.frame);
                    input.pressed.extend(bindings.actions_for(key));
                    if let Key::Char(c) = key {
                        if c.is_ascii_alphabetic() {
                            input.text.push(c);
                        }
                    }
                }
                InputEvent::KeyRepeat(key) => {
                    self.key_frame.insert(key, self.frame);
                }
                InputEvent::KeyUp(key) => {
                    self.key_frame.remove(&key);
                }
                InputEvent::PointerMove(at) => self.pointer = Some(at),
                InputEvent::PointerDown(at) => {
                    self.pointer = Some(at);
                    input.clicked = Some(at);
                }
                InputEvent::PointerUp => {}
                InputEvent::Interrupt => input.interrupted = true,
            }
        }

        let frame = self.frame;
        self.key_frame
            .retain(|_, last| frame.saturating_sub(*last) <= HOLD_WINDOW);
        input.held = bindings
            .pairs
            .iter()
            .filter(|(k, _)| self.is_held(*k))
            .map(|(_, a)| *a)
            .collect();
        input.pointer = self.pointer;
        input
    }
}

// ── Terminal translation ──────────────────────────────────────────────────────

fn key_from_code(code: KeyCode) -> Option<Key> {
    Some(match code {
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Esc,
        KeyCode::Tab | KeyCode::BackTab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char(c) => Key::Char(c.to_ascii_lowercase()),
        KeyCode::Modifier(ModifierKeyCode::LeftShift | ModifierKeyCode::RightShift) => Key::Shift,
        _ => return None,
    })
}

/// Terminals that never report a bare Shift still flag it on other keys, so
/// a shifted press or repeat also counts as Shift going down.
pub fn shift_from_modifiers(event: &Event) -> Option<InputEvent> {
    match event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            ..
        }) if modifiers.contains(KeyModifiers::SHIFT)
            && !matches!(code, KeyCode::Modifier(_)) =>
        {
            match kind {
                KeyEventKind::Press => Some(InputEvent::KeyDown(Key::Shift)),
                KeyEventKind::Repeat => Some(InputEvent::KeyRepeat(Key::Shift)),
                KeyEventKind::Release => None,
            }
        }
        _ => None,
    }
}

/// Translates a crossterm event. Unrecognised keys yield `None`.
pub fn translate(event: &Event, viewport: &Viewport) -> Option<InputEvent> {
    match event {
        Event::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) if modifiers.contains(KeyModifiers::CONTROL) => Some(InputEvent::Interrupt),
        Event::Key(KeyEvent { code, kind, .. }) => {
            let key = key_from_code(*code)?;
            Some(match kind {
                KeyEventKind::Press => InputEvent::KeyDown(key),
                KeyEventKind::Repeat => InputEvent::KeyRepeat(key),
                KeyEventKind::Release => InputEvent::KeyUp(key),
            })
        }
        Event::Mouse(MouseEvent {
            kind, column, row, ..
        }) => {
            let at = viewport.to_logical(*column, *row);
            match kind {
                MouseEventKind::Moved | MouseEventKind::Drag(MouseButton::Left) => {
                    Some(InputEvent::PointerMove(at))
                }
                MouseEventKind::Down(MouseButton::Left) => Some(InputEvent::PointerDown(at)),
                MouseEventKind::Up(MouseButton::Left) => Some(InputEvent::PointerUp),
                _ => None,
            }
        }
        _ => None,
    }
}
