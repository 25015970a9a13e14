//! Text-mode screen layout: bordered playfield, falling piece, and score readout.
//!
//! Every draw overwrites the cells it owns, so frames can be redrawn in place without
//! clearing the whole surface first.

pub mod menus;

use engine::random::RandomSource;
use engine::surface::{Cell, CellColor, CellSurface, TextCursor};

use crate::board::{BOARD_HEIGHT, BOARD_WIDTH, Board};
use crate::pieces::PieceKind;
use crate::placement::ActivePiece;
use crate::state::GameState;

/// Playfield offset in board cells from the surface origin.
pub const BOARD_X_OFFSET: u32 = 10;
pub const BOARD_Y_OFFSET: u32 = 2;
/// Text columns per board cell; keeps cells roughly square on an 80x25 screen.
pub const CELL_COLUMNS: u32 = 2;

pub const BORDER_LEFT: u32 = (BOARD_X_OFFSET - 1) * CELL_COLUMNS;
pub const BORDER_RIGHT: u32 = (BOARD_X_OFFSET + BOARD_WIDTH as u32) * CELL_COLUMNS;
pub const BORDER_TOP: u32 = BOARD_Y_OFFSET - 1;
pub const BORDER_BOTTOM: u32 = BOARD_Y_OFFSET + BOARD_HEIGHT as u32;
pub const BORDER_COLOR: CellColor = CellColor::LightGrey;

pub const HUD_X: u32 = (BOARD_X_OFFSET + BOARD_WIDTH as u32 + 2) * CELL_COLUMNS;
pub const HUD_LABEL_Y: u32 = 2;
pub const HUD_SCORE_Y: u32 = 3;
pub const HUD_PAUSED_Y: u32 = 5;
pub const HUD_COLOR: CellColor = CellColor::White;
const HUD_SCORE_WIDTH: u32 = 10;
const PAUSED_LABEL: &str = "Paused";

/// Fills the two text columns of board cell `(x, y)` with `color`.
pub fn draw_cell<S: CellSurface + ?Sized>(surface: &mut S, x: u32, y: u32, color: CellColor) {
    let column = (x + BOARD_X_OFFSET) * CELL_COLUMNS;
    let row = y + BOARD_Y_OFFSET;
    for dx in 0..CELL_COLUMNS {
        surface.put(column + dx, row, Cell::solid(color));
    }
}

pub fn draw_border<S: CellSurface + ?Sized>(surface: &mut S) {
    let edge = |glyph: u8| Cell::new(glyph, BORDER_COLOR, CellColor::Black);
    for y in BORDER_TOP..=BORDER_BOTTOM {
        surface.put(BORDER_LEFT, y, edge(b'|'));
        surface.put(BORDER_RIGHT, y, edge(b'|'));
    }
    for x in BORDER_LEFT..=BORDER_RIGHT {
        surface.put(x, BORDER_TOP, edge(b'-'));
        surface.put(x, BORDER_BOTTOM, edge(b'-'));
    }
    for (x, y) in [
        (BORDER_LEFT, BORDER_TOP),
        (BORDER_RIGHT, BORDER_TOP),
        (BORDER_LEFT, BORDER_BOTTOM),
        (BORDER_RIGHT, BORDER_BOTTOM),
    ] {
        surface.put(x, y, edge(b'+'));
    }
}

pub fn cell_color(value: u8) -> CellColor {
    PieceKind::from_cell_value(value).map_or(CellColor::Black, PieceKind::color)
}

pub fn draw_board<S: CellSurface + ?Sized>(surface: &mut S, board: &Board) {
    for (y, row) in board.rows().iter().enumerate() {
        for (x, &value) in row.iter().enumerate() {
            draw_cell(surface, x as u32, y as u32, cell_color(value));
        }
    }
}

/// Overlays the falling piece; cells still above the board are not drawn.
pub fn draw_active_piece<S: CellSurface + ?Sized>(surface: &mut S, piece: &ActivePiece) {
    let color = piece.kind().color();
    for cell in piece.cells() {
        if !Board::contains(cell.x, cell.y) {
            continue;
        }
        draw_cell(surface, cell.x as u32, cell.y as u32, color);
    }
}

pub fn draw_hud<S: CellSurface + ?Sized>(surface: &mut S, score: u32, paused: bool) {
    surface.write_str(HUD_X, HUD_LABEL_Y, "Score:", HUD_COLOR, CellColor::Black);
    let blank = " ".repeat(HUD_SCORE_WIDTH as usize);
    surface.write_str(HUD_X, HUD_SCORE_Y, &blank, HUD_COLOR, CellColor::Black);
    surface.write_str(HUD_X, HUD_SCORE_Y, &score.to_string(), HUD_COLOR, CellColor::Black);

    let label = if paused { PAUSED_LABEL } else { "      " };
    surface.write_str(HUD_X, HUD_PAUSED_Y, label, HUD_COLOR, CellColor::Black);
}

pub fn draw_game_over<S: CellSurface + ?Sized>(surface: &mut S, score: u32) {
    surface.clear();
    let mut cursor = TextCursor::default();
    cursor.write_str(surface, "Game Over!\n");
    cursor.write_str(surface, &format!("Score: {score}"));
}

/// Draws one frame of the session: the game-over screen once the session has ended,
/// otherwise border, board, falling piece, and HUD.
pub fn render_frame<R: RandomSource, S: CellSurface + ?Sized>(surface: &mut S, state: &GameState<R>) {
    if state.is_game_over() {
        draw_game_over(surface, state.score());
        return;
    }
    draw_border(surface);
    draw_board(surface, state.board());
    draw_active_piece(surface, state.active());
    draw_hud(surface, state.score(), state.is_paused());
}
