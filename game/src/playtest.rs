use engine::GameLogic;
use engine::input::{ScriptedInput, SignalSet};
use engine::random::PieceRng;

use crate::settings::GameConfig;
use crate::state::{GameState, Rules};

/// Frame-stepped session rules for `HeadlessRunner`: each input is the set of signals
/// asserted during one frame.
#[derive(Debug, Clone)]
pub struct TetrisLogic {
    rng: PieceRng,
    rules: Rules,
}

impl TetrisLogic {
    pub fn new(rng: PieceRng, rules: Rules) -> Self {
        Self { rng, rules }
    }

    pub fn from_config(config: &GameConfig) -> Self {
        Self::new(config.piece_rng(), config.rules())
    }
}

impl Default for TetrisLogic {
    fn default() -> Self {
        Self::new(PieceRng::default(), Rules::default())
    }
}

impl GameLogic for TetrisLogic {
    type State = GameState;
    type Input = SignalSet;

    fn initial_state(&self) -> Self::State {
        GameState::new(self.rng, self.rules)
    }

    fn step(&self, state: &Self::State, input: Self::Input) -> Self::State {
        let mut next = state.clone();
        next.frame(&mut ScriptedInput::new([input]));
        next
    }
}
