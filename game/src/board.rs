use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pieces::{PieceKind, mask};

pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

pub const CELL_EMPTY: u8 = 0;

pub type Row = [u8; BOARD_WIDTH];

/// The settled playfield. Row 0 is the top, row 19 the floor.
///
/// Cells hold 0 for empty or a piece kind's cell value (1..=7).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    rows: [Row; BOARD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        Self {
            rows: [[CELL_EMPTY; BOARD_WIDTH]; BOARD_HEIGHT],
        }
    }

    pub fn rows(&self) -> &[Row; BOARD_HEIGHT] {
        &self.rows
    }

    pub fn contains(x: i32, y: i32) -> bool {
        (0..BOARD_WIDTH as i32).contains(&x) && (0..BOARD_HEIGHT as i32).contains(&y)
    }

    pub fn cell(&self, x: usize, y: usize) -> u8 {
        self.rows[y][x]
    }

    /// Writes a raw cell value for test fixtures. Play only changes cells through `settle`
    /// and `clear_full_rows`.
    #[doc(hidden)]
    pub fn set_cell_for_test(&mut self, x: usize, y: usize, value: u8) {
        self.rows[y][x] = value;
    }

    /// Callers must bounds-check first; out-of-range reads trip a debug assertion and report empty.
    pub fn is_cell_occupied(&self, x: i32, y: i32) -> bool {
        debug_assert!(Self::contains(x, y), "cell ({x}, {y}) is outside the board");
        if !Self::contains(x, y) {
            return false;
        }
        self.rows[y as usize][x as usize] != CELL_EMPTY
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        self.rows[y].iter().all(|&cell| cell != CELL_EMPTY)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(|&cell| cell == CELL_EMPTY)
    }

    pub fn occupied_count(&self) -> usize {
        self.rows.iter().flatten().filter(|&&cell| cell != CELL_EMPTY).count()
    }

    /// Copies a piece's cells into the board. Cells above row 0 are dropped; others are
    /// expected to be in range and free, which the placement rules guarantee.
    pub fn settle(&mut self, kind: PieceKind, rotation: u8, origin_x: i32, origin_y: i32) {
        let value = kind.cell_value();
        for (px, py) in mask(kind, rotation).cells() {
            let x = origin_x + px as i32;
            let y = origin_y + py as i32;
            if y < 0 {
                continue;
            }
            debug_assert!(Self::contains(x, y), "settled cell ({x}, {y}) is outside the board");
            if Self::contains(x, y) {
                self.rows[y as usize][x as usize] = value;
            }
        }
    }

    /// Removes every full row, shifting the rows above down and refilling the top with
    /// empty rows. Returns how many rows were removed.
    pub fn clear_full_rows(&mut self) -> usize {
        let mut write = BOARD_HEIGHT;
        let mut cleared = 0;
        for read in (0..BOARD_HEIGHT).rev() {
            if self.is_row_full(read) {
                cleared += 1;
                continue;
            }
            write -= 1;
            if write != read {
                self.rows[write] = self.rows[read];
            }
        }
        for row in &mut self.rows[..write] {
            *row = [CELL_EMPTY; BOARD_WIDTH];
        }
        cleared
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.rows {
            for &cell in row {
                let ch = PieceKind::from_cell_value(cell).map_or('.', PieceKind::letter);
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill_row(board: &mut Board, y: usize, value: u8) {
        for x in 0..BOARD_WIDTH {
            board.set_cell_for_test(x, y, value);
        }
    }

    #[test]
    fn new_board_is_empty() {
        let board = Board::new();
        assert!(board.is_empty());
        assert!(!board.is_cell_occupied(0, 0));
        assert!(!board.is_cell_occupied(9, 19));
    }

    #[test]
    fn settle_writes_cell_value_of_kind() {
        let mut board = Board::new();
        board.settle(PieceKind::O, 0, 0, 17);
        assert_eq!(board.cell(1, 18), PieceKind::O.cell_value());
        assert_eq!(board.cell(2, 19), PieceKind::O.cell_value());
        assert_eq!(board.occupied_count(), 4);
    }

    #[test]
    fn settle_drops_cells_above_the_board() {
        let mut board = Board::new();
        // I rotation 1 is column 2, rows 0..=3 of the mask.
        board.settle(PieceKind::I, 1, 0, -2);
        assert_eq!(board.occupied_count(), 2);
        assert!(board.is_cell_occupied(2, 0));
        assert!(board.is_cell_occupied(2, 1));
    }

    #[test]
    fn clear_full_rows_shifts_rows_above_down() {
        let mut board = Board::new();
        fill_row(&mut board, 19, 1);
        fill_row(&mut board, 17, 2);
        board.set_cell_for_test(4, 18, 3);
        board.set_cell_for_test(0, 16, 5);

        assert_eq!(board.clear_full_rows(), 2);
        assert_eq!(board.cell(4, 19), 3);
        assert_eq!(board.cell(0, 18), 5);
        assert_eq!(board.occupied_count(), 2);
        assert!(!board.is_row_full(19));
    }

    #[test]
    fn clear_full_rows_handles_four_adjacent_rows() {
        let mut board = Board::new();
        for y in 16..20 {
            fill_row(&mut board, y, 1);
        }
        board.set_cell_for_test(3, 15, 7);
        assert_eq!(board.clear_full_rows(), 4);
        assert_eq!(board.cell(3, 19), 7);
        assert_eq!(board.occupied_count(), 1);
    }

    #[test]
    fn clear_without_full_rows_is_a_noop() {
        let mut board = Board::new();
        board.set_cell_for_test(0, 19, 1);
        let before = board.clone();
        assert_eq!(board.clear_full_rows(), 0);
        assert_eq!(board, before);
    }

    #[test]
    fn display_uses_piece_letters() {
        let mut board = Board::new();
        board.set_cell_for_test(0, 0, PieceKind::T.cell_value());
        let text = board.to_string();
        assert!(text.starts_with("T........."));
        assert_eq!(text.lines().count(), BOARD_HEIGHT);
    }
}
