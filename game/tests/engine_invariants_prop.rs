//! Property tests for the board, collision rules, and whole-session rollouts.

use engine::input::{ScriptedInput, Signal, SignalSet};
use engine::random::{PieceRng, RngKind};
use proptest::prelude::*;

use vgatris::board::{BOARD_HEIGHT, BOARD_WIDTH, Board};
use vgatris::pieces::{PieceKind, ROTATIONS, mask};
use vgatris::placement::{Vec2i, collides};
use vgatris::scoring::score_delta;
use vgatris::state::{GameState, Rules};

fn kind_strategy() -> impl Strategy<Value = PieceKind> {
    (0usize..PieceKind::ALL.len()).prop_map(|i| PieceKind::ALL[i])
}

fn board_strategy() -> impl Strategy<Value = Board> {
    prop::collection::vec(0u8..=7, BOARD_WIDTH * BOARD_HEIGHT).prop_map(|cells| {
        let mut board = Board::new();
        for (i, value) in cells.into_iter().enumerate() {
            board.set_cell_for_test(i % BOARD_WIDTH, i / BOARD_WIDTH, value);
        }
        board
    })
}

fn mask_cells(kind: PieceKind, rotation: u8, origin: Vec2i) -> Vec<(i32, i32)> {
    mask(kind, rotation)
        .cells()
        .map(|(px, py)| (origin.x + px as i32, origin.y + py as i32))
        .collect()
}

fn signal_set_strategy() -> impl Strategy<Value = SignalSet> {
    prop::collection::vec(any::<bool>(), Signal::ALL.len()).prop_map(|flags| {
        let mut set = SignalSet::EMPTY;
        for (signal, on) in Signal::ALL.into_iter().zip(flags) {
            set.set(signal, on);
        }
        set
    })
}

proptest! {
    #[test]
    fn out_of_bounds_cells_always_collide(
        kind in kind_strategy(),
        rotation in 0u8..ROTATIONS,
        x in -6i32..14,
        y in -6i32..26,
        board in board_strategy(),
    ) {
        let origin = Vec2i::new(x, y);
        let escapes = mask_cells(kind, rotation, origin)
            .into_iter()
            .any(|(cx, cy)| cx < 0 || cx >= BOARD_WIDTH as i32 || cy >= BOARD_HEIGHT as i32);
        prop_assume!(escapes);
        prop_assert!(collides(&board, kind, rotation, origin));
    }

    #[test]
    fn empty_board_never_collides_in_bounds(
        kind in kind_strategy(),
        rotation in 0u8..ROTATIONS,
        x in -3i32..10,
        y in -3i32..20,
    ) {
        let origin = Vec2i::new(x, y);
        let inside = mask_cells(kind, rotation, origin)
            .into_iter()
            .all(|(cx, cy)| (0..BOARD_WIDTH as i32).contains(&cx) && cy < BOARD_HEIGHT as i32);
        prop_assume!(inside);
        prop_assert!(!collides(&Board::new(), kind, rotation, origin));
    }

    #[test]
    fn settle_writes_kind_value_and_drops_hidden_cells(
        kind in kind_strategy(),
        rotation in 0u8..ROTATIONS,
        x in -3i32..10,
        y in -4i32..20,
    ) {
        let origin = Vec2i::new(x, y);
        let cells = mask_cells(kind, rotation, origin);
        prop_assume!(cells.iter().all(|&(cx, cy)| Board::contains(cx, cy.max(0))));

        let mut board = Board::new();
        board.settle(kind, rotation, origin.x, origin.y);
        let visible: Vec<_> = cells.iter().filter(|&&(_, cy)| cy >= 0).collect();
        prop_assert_eq!(board.occupied_count(), visible.len());
        for &&(cx, cy) in &visible {
            prop_assert_eq!(board.cell(cx as usize, cy as usize), kind.cell_value());
        }
    }

    #[test]
    fn two_full_rows_clear_and_shift_content_down_by_two(
        row in 1usize..BOARD_HEIGHT - 1,
        above in prop::collection::vec((0usize..BOARD_WIDTH, 1u8..=7), 0..12),
    ) {
        let mut board = Board::new();
        for x in 0..BOARD_WIDTH {
            board.set_cell_for_test(x, row, 1);
            board.set_cell_for_test(x, row + 1, 2);
        }
        // Scatter cells in the rows above; a row of at most nine cells can never be full.
        for (i, &(x, value)) in above.iter().enumerate() {
            let y = i % row;
            board.set_cell_for_test(x, y, value);
        }
        for y in 0..row {
            prop_assume!(!board.is_row_full(y));
        }
        let before = board.clone();

        prop_assert_eq!(board.clear_full_rows(), 2);
        prop_assert!(board.rows()[0].iter().all(|&c| c == 0));
        prop_assert!(board.rows()[1].iter().all(|&c| c == 0));
        for y in 0..row {
            prop_assert_eq!(board.rows()[y + 2], before.rows()[y]);
        }
        for y in row + 2..BOARD_HEIGHT {
            prop_assert_eq!(board.rows()[y], before.rows()[y]);
        }
    }

    #[test]
    fn rollouts_keep_board_and_score_consistent(
        seed in any::<u64>(),
        xorshift in any::<bool>(),
        frames in prop::collection::vec(signal_set_strategy(), 1..300),
    ) {
        let kind = if xorshift { RngKind::Xorshift } else { RngKind::Lcg };
        let rules = Rules { gravity_frames: 3, ..Rules::default() };
        let mut state = GameState::new(PieceRng::new(kind, seed), rules);
        let mut expected_score = 0u32;

        for frame in frames {
            let before_score = state.score();
            let report = state.frame(&mut ScriptedInput::new([frame]));

            prop_assert!(state.score() >= before_score);
            for lock in &report.locks {
                prop_assert_eq!(lock.points, score_delta(lock.rows_cleared));
                expected_score = expected_score.saturating_add(lock.points);
            }
            prop_assert_eq!(state.score(), expected_score);
            prop_assert!(state.board().rows().iter().flatten().all(|&c| c <= 7));
            for y in 0..BOARD_HEIGHT {
                prop_assert!(!state.board().is_row_full(y));
            }
            if state.is_game_over() {
                prop_assert!(state.active().collides(state.board()));
                break;
            }
            prop_assert!(!state.active().collides(state.board()));
        }
    }
}
