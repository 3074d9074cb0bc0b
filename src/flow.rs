//! Game-flow state machine shared by every game.
//!
//! The runners call the same phases not-started / running / paused / over;
//! only the overlays differ.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Title,
    Play,
    Pause,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlowCommand {
    Start,
    TogglePause,
    Die,
    Restart,
    MainMenu,
}

impl FlowCommand {
    /// Commands whose transition must re-run the fresh-start reset.
    pub fn resets_run(self) -> bool {
        matches!(self, FlowCommand::Start | FlowCommand::Restart)
    }
}

impl Phase {
    /// The phase reached by applying `cmd`, or `None` when `cmd` is not
    /// accepted in this phase. Rejected commands are simply ignored by
    /// callers.
    pub fn apply(self, cmd: FlowCommand) -> Option<Phase> {
        match (self, cmd) {
            (Phase::Title, FlowCommand::Start) => Some(Phase::Play),
            (Phase::Play, FlowCommand::TogglePause) => Some(Phase::Pause),
            (Phase::Pause, FlowCommand::TogglePause) => Some(Phase::Play),
            (Phase::Play, FlowCommand::Die) => Some(Phase::GameOver),
            (Phase::GameOver, FlowCommand::Restart) => Some(Phase::Play),
            (Phase::GameOver, FlowCommand::MainMenu) => Some(Phase::Title),
            _ => None,
        }
    }

    pub fn is_running(self) -> bool {
        self == Phase::Play
    }
}

// ── Game-over menu ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MenuChoice {
    #[default]
    Restart,
    MainMenu,
}

impl MenuChoice {
    /// Two entries, so left and right both flip the selection.
    pub fn toggle(self) -> MenuChoice {
        match self {
            MenuChoice::Restart => MenuChoice::MainMenu,
            MenuChoice::MainMenu => MenuChoice::Restart,
        }
    }

    pub fn command(self) -> FlowCommand {
        match self {
            MenuChoice::Restart => FlowCommand::Restart,
            MenuChoice::MainMenu => FlowCommand::MainMenu,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Restart => "RESTART",
            MenuChoice::MainMenu => "MAIN",
        }
    }

    pub const ALL: [MenuChoice; 2] = [MenuChoice::Restart, MenuChoice::MainMenu];
}
