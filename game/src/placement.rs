//! Collision and movement rules for the active piece.
//!
//! Every change to the active piece's origin or rotation goes through here, and each change
//! is checked against the board before it is applied.

use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH, Board};
use crate::pieces::{PieceKind, mask, next_rotation};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vec2i {
    pub x: i32,
    pub y: i32,
}

impl Vec2i {
    pub const ZERO: Vec2i = Vec2i { x: 0, y: 0 };
    pub const LEFT: Vec2i = Vec2i { x: -1, y: 0 };
    pub const RIGHT: Vec2i = Vec2i { x: 1, y: 0 };
    pub const DOWN: Vec2i = Vec2i { x: 0, y: 1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Vec2i {
    type Output = Vec2i;

    fn add(self, rhs: Vec2i) -> Self::Output {
        Vec2i::new(self.x + rhs.x, self.y + rhs.y)
    }
}

/// True if `kind` in `rotation` at `origin` leaves the board sideways, passes the floor,
/// or overlaps a settled cell. Cells above the top row only check the side walls.
pub fn collides(board: &Board, kind: PieceKind, rotation: u8, origin: Vec2i) -> bool {
    mask(kind, rotation).cells().any(|(px, py)| {
        let x = origin.x + px as i32;
        let y = origin.y + py as i32;
        if x < 0 || x >= BOARD_WIDTH as i32 || y >= BOARD_HEIGHT as i32 {
            return true;
        }
        y >= 0 && board.is_cell_occupied(x, y)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GravityOutcome {
    Moved,
    /// The piece cannot fall further and must be settled.
    Resting,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePiece {
    kind: PieceKind,
    rotation: u8,
    origin: Vec2i,
}

impl ActivePiece {
    pub fn new(kind: PieceKind, rotation: u8, origin: Vec2i) -> Self {
        Self {
            kind,
            rotation: rotation % crate::pieces::ROTATIONS,
            origin,
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    pub fn origin(&self) -> Vec2i {
        self.origin
    }

    /// Board coordinates of the four occupied cells, including any above row 0.
    pub fn cells(&self) -> impl Iterator<Item = Vec2i> {
        let origin = self.origin;
        mask(self.kind, self.rotation)
            .cells()
            .map(move |(px, py)| origin + Vec2i::new(px as i32, py as i32))
    }

    pub fn collides(&self, board: &Board) -> bool {
        collides(board, self.kind, self.rotation, self.origin)
    }

    /// Moves by `delta` if the destination is free. Returns whether the move happened.
    pub fn try_translate(&mut self, board: &Board, delta: Vec2i) -> bool {
        let target = self.origin + delta;
        if collides(board, self.kind, self.rotation, target) {
            return false;
        }
        self.origin = target;
        true
    }

    /// Advances to the next rotation state in place; no wall kicks.
    pub fn try_rotate(&mut self, board: &Board) -> bool {
        let target = next_rotation(self.rotation);
        if collides(board, self.kind, target, self.origin) {
            return false;
        }
        self.rotation = target;
        true
    }

    pub fn gravity_tick(&mut self, board: &Board) -> GravityOutcome {
        if self.try_translate(board, Vec2i::DOWN) {
            GravityOutcome::Moved
        } else {
            GravityOutcome::Resting
        }
    }

    /// Drops to the lowest free row and settles there. Returns the number of rows fallen.
    pub fn hard_drop(&mut self, board: &mut Board) -> u32 {
        let mut distance = 0u32;
        while self.try_translate(board, Vec2i::DOWN) {
            distance += 1;
        }
        self.settle(board);
        distance
    }

    pub fn settle(&self, board: &mut Board) {
        board.settle(self.kind, self.rotation, self.origin.x, self.origin.y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin(x: i32, y: i32) -> Vec2i {
        Vec2i::new(x, y)
    }

    #[test]
    fn cells_above_the_top_row_do_not_collide() {
        let board = Board::new();
        assert!(!collides(&board, PieceKind::I, 1, origin(3, -3)));
        assert!(!collides(&board, PieceKind::T, 0, origin(3, -2)));
    }

    #[test]
    fn side_walls_apply_above_the_top_row() {
        let board = Board::new();
        assert!(collides(&board, PieceKind::I, 0, origin(-1, -3)));
        assert!(collides(&board, PieceKind::I, 0, origin(7, -3)));
    }

    #[test]
    fn floor_collides() {
        let board = Board::new();
        // O occupies mask rows 1..=2.
        assert!(!collides(&board, PieceKind::O, 0, origin(0, 17)));
        assert!(collides(&board, PieceKind::O, 0, origin(0, 18)));
    }

    #[test]
    fn settled_cells_collide() {
        let mut board = Board::new();
        board.set_cell_for_test(4, 10, 1);
        assert!(collides(&board, PieceKind::O, 0, origin(3, 8)));
        assert!(!collides(&board, PieceKind::O, 0, origin(3, 7)));
    }

    #[test]
    fn rejected_translate_leaves_piece_untouched() {
        let board = Board::new();
        let mut piece = ActivePiece::new(PieceKind::O, 0, origin(-1, 0));
        assert!(!piece.try_translate(&board, Vec2i::LEFT));
        assert_eq!(piece.origin(), origin(-1, 0));
        assert!(piece.try_translate(&board, Vec2i::RIGHT));
        assert_eq!(piece.origin(), origin(0, 0));
    }

    #[test]
    fn rotation_against_the_wall_is_rejected() {
        let board = Board::new();
        // I rotation 1 is column 2; hugging the right wall at x=7 puts column 2 at x=9.
        let mut piece = ActivePiece::new(PieceKind::I, 1, origin(7, 5));
        assert!(!piece.try_rotate(&board));
        assert_eq!(piece.rotation(), 1);

        let mut piece = ActivePiece::new(PieceKind::I, 1, origin(3, 5));
        assert!(piece.try_rotate(&board));
        assert_eq!(piece.rotation(), 2);
    }

    #[test]
    fn rotation_cycles_through_four_states() {
        let board = Board::new();
        let mut piece = ActivePiece::new(PieceKind::T, 0, origin(3, 5));
        for expected in [1, 2, 3, 0] {
            assert!(piece.try_rotate(&board));
            assert_eq!(piece.rotation(), expected);
        }
    }

    #[test]
    fn gravity_tick_reports_resting_on_the_floor() {
        let board = Board::new();
        let mut piece = ActivePiece::new(PieceKind::O, 0, origin(0, 16));
        assert_eq!(piece.gravity_tick(&board), GravityOutcome::Moved);
        assert_eq!(piece.gravity_tick(&board), GravityOutcome::Resting);
        assert_eq!(piece.origin(), origin(0, 17));
    }

    #[test]
    fn hard_drop_from_spawn_lands_on_the_floor() {
        let mut board = Board::new();
        let mut piece = ActivePiece::new(PieceKind::I, 0, origin(3, -2));
        assert_eq!(piece.hard_drop(&mut board), 20);
        assert_eq!(piece.origin(), origin(3, 18));
        for x in 3..=6 {
            assert_eq!(board.cell(x, 19), PieceKind::I.cell_value());
        }
        assert_eq!(board.occupied_count(), 4);
    }

    #[test]
    fn hard_drop_stops_on_stack() {
        let mut board = Board::new();
        board.set_cell_for_test(1, 19, 2);
        let mut piece = ActivePiece::new(PieceKind::O, 0, origin(0, -2));
        piece.hard_drop(&mut board);
        assert_eq!(piece.origin(), origin(0, 16));
        assert!(board.is_cell_occupied(1, 18));
        assert!(board.is_cell_occupied(2, 17));
    }

    fn rotation_zero_cells(kind: PieceKind) -> impl Iterator<Item = (usize, usize)> {
        mask(kind, 0).cells()
    }

    #[test]
    fn piece_cells_are_mask_cells_offset_by_origin() {
        assert_eq!(
            rotation_zero_cells(PieceKind::T).collect::<Vec<_>>(),
            vec![(0, 1), (1, 1), (2, 1), (1, 2)]
        );

        let piece = ActivePiece::new(PieceKind::T, 0, origin(2, 5));
        let cells: Vec<Vec2i> = piece.cells().collect();
        assert_eq!(
            cells,
            vec![origin(2, 6), origin(3, 6), origin(4, 6), origin(3, 7)]
        );
    }
}
