use engine::input::{InputSource, Signal};
use engine::random::{PieceRng, RandomSource};
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::pieces::PieceKind;
use crate::placement::{ActivePiece, GravityOutcome, Vec2i};
use crate::scoring::Scoreboard;
use crate::spawn::SpawnPolicy;
use crate::view::{Phase, PhaseEvent};

pub const DEFAULT_GRAVITY_FRAMES: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    /// Running frames between gravity ticks.
    pub gravity_frames: u32,
    pub spawn: SpawnPolicy,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            gravity_frames: DEFAULT_GRAVITY_FRAMES,
            spawn: SpawnPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    MoveLeft,
    MoveRight,
    SoftDrop,
    Rotate,
    HardDrop,
}

/// Discrete actions in the order a frame applies them.
pub const ACTION_ORDER: [(Signal, Action); 5] = [
    (Signal::MoveLeft, Action::MoveLeft),
    (Signal::MoveRight, Action::MoveRight),
    (Signal::SoftDrop, Action::SoftDrop),
    (Signal::Rotate, Action::Rotate),
    (Signal::HardDrop, Action::HardDrop),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockReport {
    pub kind: PieceKind,
    pub rows_cleared: usize,
    pub points: u32,
    pub spawn_blocked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub pause_toggled: bool,
    /// Actions that changed the active piece (or, for hard drop, settled it).
    pub applied: Vec<Action>,
    pub gravity: Option<GravityOutcome>,
    pub locks: Vec<LockReport>,
    pub game_over: bool,
}

/// One play session: board, falling piece, score, phase, and the piece generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState<R = PieceRng> {
    board: Board,
    active: ActivePiece,
    scoreboard: Scoreboard,
    phase: Phase,
    gravity_counter: u32,
    rules: Rules,
    rng: R,
    frames: u64,
    pieces_spawned: u64,
}

impl<R: RandomSource> GameState<R> {
    pub fn new(rng: R, rules: Rules) -> Self {
        Self::with_board(Board::new(), rng, rules)
    }

    /// Starts a session on a pre-filled board. If the first spawn is blocked the session
    /// begins in `GameOver` with the board untouched.
    pub fn with_board(board: Board, mut rng: R, rules: Rules) -> Self {
        let outcome = rules.spawn.spawn(&board, &mut rng);
        let mut phase = Phase::Running;
        if outcome.is_blocked() {
            phase = phase.handle(PhaseEvent::SpawnBlocked);
            info!("first spawn blocked; game over with score 0");
        }
        Self {
            board,
            active: outcome.piece(),
            scoreboard: Scoreboard::default(),
            phase,
            gravity_counter: 0,
            rules,
            rng,
            frames: 0,
            pieces_spawned: 1,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> &ActivePiece {
        &self.active
    }

    pub fn score(&self) -> u32 {
        self.scoreboard.score()
    }

    pub fn lines_cleared(&self) -> u32 {
        self.scoreboard.lines()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_paused(&self) -> bool {
        self.phase.is_paused()
    }

    pub fn is_game_over(&self) -> bool {
        self.phase.is_game_over()
    }

    /// The final score, once the session has ended.
    pub fn final_score(&self) -> Option<u32> {
        self.is_game_over().then(|| self.score())
    }

    pub fn gravity_counter(&self) -> u32 {
        self.gravity_counter
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn pieces_spawned(&self) -> u64 {
        self.pieces_spawned
    }

    /// Polls `input` and advances one frame.
    pub fn frame<I: InputSource + ?Sized>(&mut self, input: &mut I) -> FrameReport {
        input.poll();
        self.update(input)
    }

    /// Advances one frame from already-polled input, consuming each signal it acts on.
    pub fn update<I: InputSource + ?Sized>(&mut self, input: &mut I) -> FrameReport {
        let mut report = FrameReport::default();
        self.frames += 1;
        if self.is_game_over() {
            report.game_over = true;
            return report;
        }

        if input.is_asserted(Signal::Pause) {
            input.consume(Signal::Pause);
            self.phase = self.phase.handle(PhaseEvent::TogglePause);
            report.pause_toggled = true;
            info!("{} at frame {}", if self.is_paused() { "paused" } else { "resumed" }, self.frames);
        }
        if !self.phase.is_running() {
            return report;
        }

        for (signal, action) in ACTION_ORDER {
            if !input.is_asserted(signal) {
                continue;
            }
            input.consume(signal);
            if self.apply(action, &mut report) {
                report.applied.push(action);
            }
            if self.is_game_over() {
                report.game_over = true;
                return report;
            }
        }

        self.gravity_counter += 1;
        if self.gravity_counter >= self.rules.gravity_frames.max(1) {
            self.gravity_counter = 0;
            let outcome = self.active.gravity_tick(&self.board);
            report.gravity = Some(outcome);
            if outcome == GravityOutcome::Resting {
                self.active.settle(&mut self.board);
                report.locks.push(self.finish_lock());
            }
        }

        report.game_over = self.is_game_over();
        report
    }

    fn apply(&mut self, action: Action, report: &mut FrameReport) -> bool {
        match action {
            Action::MoveLeft => self.active.try_translate(&self.board, Vec2i::LEFT),
            Action::MoveRight => self.active.try_translate(&self.board, Vec2i::RIGHT),
            Action::SoftDrop => self.active.try_translate(&self.board, Vec2i::DOWN),
            Action::Rotate => self.active.try_rotate(&self.board),
            Action::HardDrop => {
                let distance = self.active.hard_drop(&mut self.board);
                debug!("hard drop {:?} fell {distance} rows", self.active.kind());
                report.locks.push(self.finish_lock());
                true
            }
        }
    }

    /// Runs after the active piece has been settled: clear rows, score, spawn the next piece.
    fn finish_lock(&mut self) -> LockReport {
        let kind = self.active.kind();
        let origin = self.active.origin();
        let rows_cleared = self.board.clear_full_rows();
        let points = self.scoreboard.award(rows_cleared);
        debug!(
            "settled {kind:?} at ({}, {}); cleared {rows_cleared} rows for {points} points",
            origin.x, origin.y
        );

        let outcome = self.rules.spawn.spawn(&self.board, &mut self.rng);
        self.active = outcome.piece();
        self.pieces_spawned += 1;
        let spawn_blocked = outcome.is_blocked();
        if spawn_blocked {
            self.phase = self.phase.handle(PhaseEvent::SpawnBlocked);
            info!(
                "game over after {} pieces: score {}, {} lines",
                self.pieces_spawned,
                self.score(),
                self.lines_cleared()
            );
        } else {
            debug!("spawned {:?}", self.active.kind());
        }

        LockReport {
            kind,
            rows_cleared,
            points,
            spawn_blocked,
        }
    }
}

impl Default for GameState<PieceRng> {
    fn default() -> Self {
        Self::new(PieceRng::default(), Rules::default())
    }
}
