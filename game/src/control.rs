use engine::app::{FrameFlow, FrameHandler};
use engine::input::{InputSource, KeyboardState};
use engine::random::{PieceRng, RandomSource};
use engine::surface::{CellSurface, TextGrid};
use engine::timing::FrameClock;
use serde::Serialize;

use crate::state::{FrameReport, GameState};
use crate::tetris_ui::render_frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub frames: u64,
    pub score: u32,
    pub lines: u32,
    pub pieces: u64,
    pub game_over: bool,
}

/// Owns a session and drives it one frame at a time: poll, update, render, delay.
#[derive(Debug, Clone)]
pub struct ControlLoop<R = PieceRng> {
    state: GameState<R>,
    screen_cleared: bool,
}

impl<R: RandomSource> ControlLoop<R> {
    pub fn new(state: GameState<R>) -> Self {
        Self {
            state,
            screen_cleared: false,
        }
    }

    pub fn state(&self) -> &GameState<R> {
        &self.state
    }

    pub fn summary(&self, frames: u64) -> RunSummary {
        RunSummary {
            frames,
            score: self.state.score(),
            lines: self.state.lines_cleared(),
            pieces: self.state.pieces_spawned(),
            game_over: self.state.is_game_over(),
        }
    }

    /// Everything in a frame except the delay. The surface is cleared before the first render.
    pub fn run_frame<I, S>(&mut self, input: &mut I, surface: &mut S) -> FrameReport
    where
        I: InputSource + ?Sized,
        S: CellSurface + ?Sized,
    {
        let report = self.state.frame(input);
        if !self.screen_cleared {
            surface.clear();
            self.screen_cleared = true;
        }
        render_frame(surface, &self.state);
        report
    }

    /// Runs frames until game over or `max_frames`, delaying on `clock` between frames.
    pub fn run<I, S, C>(
        &mut self,
        input: &mut I,
        surface: &mut S,
        clock: &mut C,
        max_frames: Option<u64>,
    ) -> RunSummary
    where
        I: InputSource + ?Sized,
        S: CellSurface + ?Sized,
        C: FrameClock + ?Sized,
    {
        let mut frames = 0u64;
        while max_frames.is_none_or(|max| frames < max) {
            self.run_frame(input, surface);
            frames += 1;
            if self.state.is_game_over() {
                break;
            }
            clock.delay();
        }
        self.summary(frames)
    }
}

impl<R: RandomSource> FrameHandler for ControlLoop<R> {
    fn frame(&mut self, input: &mut KeyboardState, surface: &mut TextGrid) -> FrameFlow {
        self.run_frame(input, surface);
        if self.state.is_game_over() {
            FrameFlow::Halt
        } else {
            FrameFlow::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use engine::input::{ScriptedInput, Signal, SignalSet, scancode};
    use engine::surface::CellColor;
    use engine::timing::{BusyWaitClock, ManualClock};
    use std::time::{Duration, Instant};

    use super::*;

    #[test]
    fn first_frame_clears_then_draws_the_playfield() {
        let mut grid = TextGrid::new();
        grid.write_str(0, 24, "boot", CellColor::White, CellColor::Black);
        let mut control = ControlLoop::new(GameState::default());
        control.run_frame(&mut ScriptedInput::default(), &mut grid);
        assert_eq!(grid.row_text(24), "");
        assert_eq!(grid.cell(18, 1).map(|c| c.glyph), Some(b'+'));
        assert!(grid.row_text(2).ends_with("Score:"));
    }

    #[test]
    fn run_stops_at_frame_limit_and_delays_between_frames() {
        let mut control = ControlLoop::new(GameState::default());
        let mut clock = ManualClock::new();
        let mut grid = TextGrid::new();
        let summary = control.run(&mut ScriptedInput::default(), &mut grid, &mut clock, Some(12));
        assert_eq!(summary.frames, 12);
        assert!(!summary.game_over);
        assert_eq!(clock.frame(), 12);
    }

    #[test]
    fn busy_wait_clock_paces_the_same_session() {
        let script = "aaw_.d";
        let mut manual = ControlLoop::new(GameState::default());
        manual.run(
            &mut ScriptedInput::from_keys(script),
            &mut TextGrid::new(),
            &mut ManualClock::new(),
            Some(6),
        );

        let mut paced = ControlLoop::new(GameState::default());
        let mut clock = BusyWaitClock::new(Duration::from_millis(1));
        let start = Instant::now();
        let summary = paced.run(
            &mut ScriptedInput::from_keys(script),
            &mut TextGrid::new(),
            &mut clock,
            Some(6),
        );
        assert!(start.elapsed() >= Duration::from_millis(6));
        assert_eq!(clock.frame(), 6);
        assert_eq!(summary.frames, 6);
        assert_eq!(paced.state(), manual.state());
    }

    #[test]
    fn run_ends_on_game_over() {
        let mut control = ControlLoop::new(GameState::default());
        let mut clock = ManualClock::new();
        let mut grid = TextGrid::new();
        let drops = std::iter::repeat_n(SignalSet::of(&[Signal::HardDrop]), 200);
        let summary = control.run(&mut ScriptedInput::new(drops), &mut grid, &mut clock, None);
        assert!(summary.game_over);
        assert!(summary.frames < 200);
        assert_eq!(grid.row_text(0), "Game Over!");
        assert_eq!(grid.row_text(1), format!("Score: {}", summary.score));
    }

    #[test]
    fn keyboard_frames_halt_after_game_over() {
        let mut control = ControlLoop::new(GameState::default());
        let mut keyboard = KeyboardState::default();
        let mut grid = TextGrid::new();
        let mut flow = FrameFlow::Continue;
        for _ in 0..200 {
            keyboard.push_scancode(scancode::SPACE);
            flow = control.frame(&mut keyboard, &mut grid);
            if flow == FrameFlow::Halt {
                break;
            }
        }
        assert_eq!(flow, FrameFlow::Halt);
        assert!(control.state().is_game_over());
    }
}
