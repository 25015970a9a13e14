use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Running,
    Paused,
    /// Terminal: no event leaves this phase.
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseEvent {
    TogglePause,
    SpawnBlocked,
}

impl Phase {
    /// Pure transition function for the session phase.
    pub fn handle(self, event: PhaseEvent) -> Phase {
        match (self, event) {
            (Phase::Running, PhaseEvent::TogglePause) => Phase::Paused,
            (Phase::Paused, PhaseEvent::TogglePause) => Phase::Running,
            (Phase::Running | Phase::Paused, PhaseEvent::SpawnBlocked) => Phase::GameOver,
            (Phase::GameOver, _) => Phase::GameOver,
        }
    }

    pub fn is_running(self) -> bool {
        self == Phase::Running
    }

    pub fn is_paused(self) -> bool {
        self == Phase::Paused
    }

    pub fn is_game_over(self) -> bool {
        self == Phase::GameOver
    }
}
