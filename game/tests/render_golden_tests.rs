use std::{
    fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use engine::input::{SignalSet, key_frame};
use engine::regression::{
    assert_or_update_golden_hashes, grid_sha256_hex,
    record_state_then_replay_and_compare_render_hashes_with, update_goldens_enabled,
};
use engine::surface::{CellSurface, TEXT_COLUMNS, TEXT_ROWS, TextGrid};

use vgatris::playtest::TetrisLogic;
use vgatris::state::GameState;
use vgatris::tetris_ui::{HUD_PAUSED_Y, HUD_X, render_frame};

fn unique_temp_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    std::env::temp_dir().join(format!("vgatris_{label}_{nanos}"))
}

fn render(state: &GameState, grid: &mut TextGrid) {
    render_frame(grid, state);
}

fn script(keys: &str) -> Vec<SignalSet> {
    keys.chars().map(key_frame).collect()
}

#[test]
fn scripted_session_render_hashes_are_stable() {
    let name = "scripted_session_render_hashes_are_stable";
    let out_dir = unique_temp_dir("render_golden");
    let inputs = script("aaw_dd_w_s..p..p_a_");

    let artifacts = record_state_then_replay_and_compare_render_hashes_with(
        name,
        &out_dir,
        TetrisLogic::default(),
        |runner| {
            runner.run(inputs.iter().copied());
        },
        render,
    )
    .expect("render hash regression run should succeed");

    assert_eq!(artifacts.live_hashes.len(), inputs.len() + 1);

    let golden_path = engine::regression_golden_path!(name);
    assert_or_update_golden_hashes(
        &golden_path,
        name,
        TEXT_COLUMNS,
        TEXT_ROWS,
        artifacts.replay_hashes,
        update_goldens_enabled(),
    )
    .unwrap_or_else(|e| {
        panic!(
            "golden check failed: {e}\n(hint: set VGATRIS_UPDATE_GOLDENS=1 to generate/update {})",
            golden_path.display()
        )
    });

    let _ = fs::remove_dir_all(out_dir);
}

#[test]
fn pause_changes_only_the_hud() {
    let out_dir = unique_temp_dir("pause_hud");
    let artifacts = record_state_then_replay_and_compare_render_hashes_with(
        "pause_hud",
        &out_dir,
        TetrisLogic::default(),
        |runner| {
            runner.run(script("pp"));
        },
        render,
    )
    .expect("render hash regression run should succeed");

    let hashes = &artifacts.live_hashes;
    assert_eq!(hashes.len(), 3);
    // Initial and resumed frames look the same; the paused frame differs.
    assert_eq!(hashes[0], hashes[2]);
    assert_ne!(hashes[0], hashes[1]);

    let mut paused = TextGrid::new();
    let state = {
        let mut runner = engine::HeadlessRunner::new(TetrisLogic::default());
        runner.run(script("p"));
        runner.state().clone()
    };
    render(&state, &mut paused);
    assert_eq!(grid_sha256_hex(&paused), hashes[1]);
    assert_eq!(paused.size().width, TEXT_COLUMNS);

    // Row 5 also crosses the playfield border, so read the label cells directly.
    let label: String = (HUD_X..HUD_X + 6)
        .filter_map(|x| paused.cell(x, HUD_PAUSED_Y))
        .map(|c| char::from(c.glyph))
        .collect();
    assert_eq!(label, "Paused");
    assert!(paused.row_text(HUD_PAUSED_Y).ends_with("Paused"));

    let mut running = TextGrid::new();
    render(&GameState::default(), &mut running);
    for y in 0..TEXT_ROWS {
        for x in 0..TEXT_COLUMNS {
            if paused.cell(x, y) != running.cell(x, y) {
                assert_eq!(y, HUD_PAUSED_Y, "cell ({x}, {y}) changed");
                assert!((HUD_X..HUD_X + 6).contains(&x), "cell ({x}, {y}) changed");
            }
        }
    }

    let _ = fs::remove_dir_all(out_dir);
}
