//! Render-hash regression helpers.
//!
//! These utilities help you:
//! - hash every rendered frame of a scenario,
//! - save the frame-by-frame `TimeMachine` as JSON and replay it from disk, and
//! - compare the hashes against a golden file kept next to the tests.
//!
//! The engine stays game-agnostic by requiring a caller-provided render closure.

use std::{
    fs, io,
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sha2::{Digest, Sha256};

use crate::{GameLogic, HeadlessRunner, TimeMachine, surface::TextGrid};

/// Environment flag helper: accepts `1/true/yes/on` (case-insensitive).
pub fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

/// If set, regression tests may update golden files in-place.
pub fn update_goldens_enabled() -> bool {
    env_flag("VGATRIS_UPDATE_GOLDENS")
}

pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[macro_export]
macro_rules! regression_golden_path {
    ($name:expr) => {{
        let base = $crate::regression::sanitize_filename($name);
        ::std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("goldens")
            .join(format!("{base}.json"))
    }};
}

/// SHA-256 over the grid's VGA words (glyph low byte, attribute high byte), little endian.
pub fn grid_sha256_hex(grid: &TextGrid) -> String {
    let mut hasher = Sha256::new();
    for word in grid.vga_words() {
        hasher.update(word.to_le_bytes());
    }
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FrameHashGolden {
    pub version: u32,
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub hash_alg: String,
    /// One hash per logical engine frame / state.
    pub hashes: Vec<String>,
}

impl FrameHashGolden {
    pub fn new(name: impl Into<String>, width: u32, height: u32, hashes: Vec<String>) -> Self {
        Self {
            version: 1,
            name: name.into(),
            width,
            height,
            hash_alg: "sha256".to_string(),
            hashes,
        }
    }
}

pub fn load_golden_json(path: impl AsRef<Path>) -> io::Result<FrameHashGolden> {
    let path = path.as_ref();
    let file = fs::File::open(path)?;
    let reader = io::BufReader::new(file);
    serde_json::from_reader(reader).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("failed parsing golden json {}: {e}", path.display()),
        )
    })
}

pub fn save_golden_json(path: impl AsRef<Path>, golden: &FrameHashGolden) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let file = fs::File::create(path)?;
    let mut writer = io::BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, golden).map_err(io::Error::other)?;
    writer.flush()?;
    Ok(())
}

pub fn assert_or_update_golden_json(
    path: impl AsRef<Path>,
    golden: &FrameHashGolden,
    update: bool,
) -> io::Result<()> {
    let path = path.as_ref();
    let exists = path.exists();

    if update {
        save_golden_json(path, golden)?;
        if exists {
            log::info!("updated golden: {}", path.display());
        } else {
            log::info!("wrote golden: {}", path.display());
        }
        return Ok(());
    }
    if !exists {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!(
                "missing golden {}\n(hint: set VGATRIS_UPDATE_GOLDENS=1 to write it)",
                path.display()
            ),
        ));
    }

    let expected = load_golden_json(path)?;
    if expected.version != golden.version
        || expected.hash_alg != golden.hash_alg
        || expected.width != golden.width
        || expected.height != golden.height
    {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!(
                "golden metadata mismatch at {}:\nexpected: v{} alg={} {}x{}\nactual:   v{} alg={} {}x{}\n(hint: set VGATRIS_UPDATE_GOLDENS=1 to rewrite)",
                path.display(),
                expected.version,
                expected.hash_alg,
                expected.width,
                expected.height,
                golden.version,
                golden.hash_alg,
                golden.width,
                golden.height
            ),
        ));
    }

    if expected.hashes.len() != golden.hashes.len() {
        return Err(io::Error::other(format!(
            "golden frame count mismatch at {}: expected {} hashes, got {}\n(hint: set VGATRIS_UPDATE_GOLDENS=1 to rewrite)",
            path.display(),
            expected.hashes.len(),
            golden.hashes.len()
        )));
    }

    for (i, (a, b)) in expected.hashes.iter().zip(golden.hashes.iter()).enumerate() {
        if a != b {
            return Err(io::Error::other(format!(
                "golden mismatch at {} (frame {i}):\nexpected: {a}\nactual:   {b}\n(hint: set VGATRIS_UPDATE_GOLDENS=1 to rewrite)",
                path.display()
            )));
        }
    }

    Ok(())
}

pub fn assert_or_update_golden_hashes(
    path: impl AsRef<Path>,
    name: &str,
    width: u32,
    height: u32,
    hashes: Vec<String>,
    update: bool,
) -> io::Result<()> {
    let golden = FrameHashGolden::new(name, width, height, hashes);
    assert_or_update_golden_json(path, &golden, update)
}

#[derive(Debug, Clone)]
pub struct RenderHashArtifacts {
    pub state_json: PathBuf,
    pub live_hashes: Vec<String>,
    pub replay_hashes: Vec<String>,
}

/// Engine-level regression helper:
/// - let `drive` step a fresh runner, hashing the rendered grid of every recorded state,
/// - save the `TimeMachine` to JSON, load it back, and replay frame by frame,
/// - fail if any replayed frame hashes differently from the live run.
pub fn record_state_then_replay_and_compare_render_hashes_with<G, Drive, Render>(
    name: &str,
    out_dir: impl AsRef<Path>,
    game: G,
    drive: Drive,
    mut render: Render,
) -> io::Result<RenderHashArtifacts>
where
    G: GameLogic + Clone,
    G::State: Serialize + DeserializeOwned,
    Drive: FnOnce(&mut HeadlessRunner<G>),
    Render: FnMut(&G::State, &mut TextGrid),
{
    let out_dir = out_dir.as_ref();
    fs::create_dir_all(out_dir)?;
    let state_json = out_dir.join(format!("{}.timemachine.json", sanitize_filename(name)));

    let mut grid = TextGrid::new();
    let mut hash_state = |state: &G::State| -> String {
        grid = TextGrid::new();
        render(state, &mut grid);
        grid_sha256_hex(&grid)
    };

    let mut live_runner = HeadlessRunner::new(game.clone());
    drive(&mut live_runner);
    let live_hashes: Vec<String> = live_runner.history().iter().map(&mut hash_state).collect();
    live_runner.timemachine().save_json_file(&state_json)?;

    let tm = TimeMachine::<G::State>::load_json_file(&state_json)?;
    let mut replay_runner = HeadlessRunner::from_timemachine(game, tm);
    let frames = replay_runner.history().len();
    let mut replay_hashes = Vec::with_capacity(frames);
    for frame in 0..frames {
        replay_runner.seek(frame);
        replay_hashes.push(hash_state(replay_runner.state()));
    }

    if live_hashes != replay_hashes {
        let first = live_hashes
            .iter()
            .zip(replay_hashes.iter())
            .position(|(a, b)| a != b)
            .unwrap_or(live_hashes.len().min(replay_hashes.len()));
        return Err(io::Error::other(format!(
            "replay of {} diverged at frame {first} ({} live frames, {} replayed)",
            state_json.display(),
            live_hashes.len(),
            replay_hashes.len()
        )));
    }

    Ok(RenderHashArtifacts {
        state_json,
        live_hashes,
        replay_hashes,
    })
}
