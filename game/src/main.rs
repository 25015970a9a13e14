use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use engine::HeadlessRunner;
use engine::app::{AppConfig, run_app};
use engine::input::{ScriptedInput, SignalSet, key_frame};
use engine::profiling::MeanTimings;
use engine::surface::TextGrid;
use engine::timing::{BusyWaitClock, FrameClock, ManualClock};

use vgatris::control::ControlLoop;
use vgatris::playtest::TetrisLogic;
use vgatris::settings::{ConfigStore, GameConfig};
use vgatris::state::GameState;

#[derive(Debug, Parser)]
#[command(name = "vgatris")]
#[command(about = "Falling-block puzzle on an 80x25 text screen")]
struct Cli {
    /// Config file; defaults to $VGATRIS_CONFIG_PATH or the XDG config dir.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Open a window and play.
    Play {
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Run scripted frames without a window and print the final screen.
    Headless {
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long, default_value_t = 600)]
        frames: u64,
        /// One character per frame: a/d move, s soft drop, w rotate, _ hard drop, p pause, . idle.
        #[arg(long, default_value = "")]
        inputs: String,
        #[arg(long, default_value_t = false)]
        profile: bool,
        /// Wait the configured frame delay between frames instead of running flat out.
        #[arg(long, default_value_t = false)]
        realtime: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let mut config = load_config(cli.config)?;

    match cli.command {
        Commands::Play { seed } => {
            if let Some(seed) = seed {
                config.seed = seed;
            }
            cmd_play(&config)
        }
        Commands::Headless {
            seed,
            frames,
            inputs,
            profile,
            realtime,
        } => {
            if let Some(seed) = seed {
                config.seed = seed;
            }
            cmd_headless(&config, frames, &inputs, profile, realtime)
        }
    }
}

fn load_config(explicit: Option<PathBuf>) -> Result<GameConfig> {
    match explicit {
        Some(path) => {
            let store = ConfigStore::new(path);
            store
                .try_load()
                .with_context(|| format!("loading config from {}", store.path().display()))
        }
        None => Ok(ConfigStore::from_env().load()),
    }
}

fn session(config: &GameConfig) -> GameState {
    GameState::new(config.piece_rng(), config.rules())
}

fn cmd_play(config: &GameConfig) -> Result<()> {
    log::info!("starting with seed {} ({:?})", config.seed, config.rng);
    let app = AppConfig {
        title: "vgatris".to_string(),
        zoom: config.window_scale,
        frame_interval: config.frame_delay(),
        key_repeat: config.key_repeat,
    };
    run_app(app, ControlLoop::new(session(config))).context("running the game window")
}

fn cmd_headless(
    config: &GameConfig,
    frames: u64,
    inputs: &str,
    profile: bool,
    realtime: bool,
) -> Result<()> {
    let mut clock: Box<dyn FrameClock> = if realtime {
        Box::new(BusyWaitClock::new(config.frame_delay()))
    } else {
        Box::new(ManualClock::new())
    };
    let mut control = ControlLoop::new(session(config));
    let mut grid = TextGrid::new();
    let summary = control.run(
        &mut ScriptedInput::from_keys(inputs),
        &mut grid,
        clock.as_mut(),
        Some(frames),
    );
    print!("{grid}");
    println!(
        "{}",
        serde_json::to_string(&summary).context("serializing run summary")?
    );

    if profile {
        profile_steps(config, frames, inputs);
    }
    Ok(())
}

/// Replays the same script through the headless runner and logs step timings.
fn profile_steps(config: &GameConfig, frames: u64, inputs: &str) {
    let mut runner = HeadlessRunner::new(TetrisLogic::from_config(config));
    let mut timings = MeanTimings::default();
    let script = inputs
        .chars()
        .map(key_frame)
        .chain(std::iter::repeat(SignalSet::EMPTY))
        .take(frames as usize);
    for input in script {
        if runner.state().is_game_over() {
            break;
        }
        runner.step_profiled(input, &mut timings);
    }
    log::info!(
        "{} steps: mean step {:?}, mean total {:?}, worst {:?}; final score {}",
        timings.steps(),
        timings.mean_step(),
        timings.mean_total(),
        timings.worst_total(),
        runner.state().score()
    );
}
