use engine::random::RandomSource;
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::pieces::{PIECE_KINDS, PieceKind};
use crate::placement::{ActivePiece, Vec2i};

pub const SPAWN_COLUMN: i32 = 3;
/// Two rows above the board, so most pieces enter partly hidden.
pub const SPAWN_ROW: i32 = -2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnOutcome {
    Spawned(ActivePiece),
    /// The new piece overlaps the stack where it would appear; the session is over.
    Blocked(ActivePiece),
}

impl SpawnOutcome {
    pub fn piece(&self) -> ActivePiece {
        match *self {
            SpawnOutcome::Spawned(piece) | SpawnOutcome::Blocked(piece) => piece,
        }
    }

    pub fn is_blocked(&self) -> bool {
        matches!(self, SpawnOutcome::Blocked(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnPolicy {
    pub origin: Vec2i,
}

impl Default for SpawnPolicy {
    fn default() -> Self {
        Self {
            origin: Vec2i::new(SPAWN_COLUMN, SPAWN_ROW),
        }
    }
}

pub fn draw_kind<R: RandomSource + ?Sized>(rng: &mut R) -> PieceKind {
    let index = rng.next_below(PIECE_KINDS as u32) as usize;
    PieceKind::from_index(index).unwrap_or(PieceKind::I)
}

impl SpawnPolicy {
    pub fn spawn<R: RandomSource + ?Sized>(&self, board: &Board, rng: &mut R) -> SpawnOutcome {
        self.spawn_kind(board, draw_kind(rng))
    }

    pub fn spawn_kind(&self, board: &Board, kind: PieceKind) -> SpawnOutcome {
        let piece = ActivePiece::new(kind, 0, self.origin);
        if piece.collides(board) {
            SpawnOutcome::Blocked(piece)
        } else {
            SpawnOutcome::Spawned(piece)
        }
    }
}
