use serde::{Deserialize, Serialize};

/// Points for clearing `rows` rows with one settle. More than four is impossible with
/// tetrominoes and scores like four.
pub fn score_delta(rows: usize) -> u32 {
    match rows {
        0 => 0,
        1 => 100,
        2 => 300,
        3 => 700,
        _ => 1500,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scoreboard {
    score: u32,
    lines: u32,
}

impl Scoreboard {
    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    /// Adds the award for one settle and returns the points gained. Saturates at `u32::MAX`.
    pub fn award(&mut self, rows: usize) -> u32 {
        let delta = score_delta(rows);
        self.score = self.score.saturating_add(delta);
        self.lines = self.lines.saturating_add(rows as u32);
        delta
    }
}
