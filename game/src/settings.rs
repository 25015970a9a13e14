use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use engine::input::KeyRepeat;
use engine::random::{LCG_DEFAULT_SEED, PieceRng, RngKind};
use serde::{Deserialize, Serialize};

use crate::state::{DEFAULT_GRAVITY_FRAMES, Rules};

pub const CONFIG_PATH_ENV: &str = "VGATRIS_CONFIG_PATH";
pub const MAX_WINDOW_SCALE: u32 = 4;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to write config {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GameConfig {
    pub version: u32,
    pub seed: u64,
    pub rng: RngKind,
    pub gravity_frames: u32,
    pub frame_delay_ms: u64,
    pub key_repeat: KeyRepeat,
    pub window_scale: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            seed: u64::from(LCG_DEFAULT_SEED),
            rng: RngKind::Lcg,
            gravity_frames: DEFAULT_GRAVITY_FRAMES,
            frame_delay_ms: 33,
            key_repeat: KeyRepeat::Hardware,
            window_scale: 1,
        }
    }
}

impl GameConfig {
    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        self.gravity_frames = self.gravity_frames.max(1);
        self.window_scale = self.window_scale.clamp(1, MAX_WINDOW_SCALE);
        self
    }

    pub fn rules(&self) -> Rules {
        Rules {
            gravity_frames: self.gravity_frames.max(1),
            ..Rules::default()
        }
    }

    pub fn piece_rng(&self) -> PieceRng {
        PieceRng::new(self.rng, self.seed)
    }

    pub fn frame_delay(&self) -> Duration {
        Duration::from_millis(self.frame_delay_ms)
    }
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os(CONFIG_PATH_ENV) {
            return Self::new(explicit);
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var_os("HOME").map(|home| {
                    let mut p = PathBuf::from(home);
                    p.push(".config");
                    p
                })
            })
            .unwrap_or_else(|| PathBuf::from("."));

        let mut path = base;
        path.push("vgatris");
        path.push("config.json");
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn try_load(&self) -> Result<GameConfig, ConfigError> {
        let bytes = fs::read(&self.path).map_err(|source| ConfigError::Read {
            path: self.path.clone(),
            source,
        })?;
        serde_json::from_slice::<GameConfig>(&bytes)
            .map(GameConfig::sanitized)
            .map_err(|source| ConfigError::Parse {
                path: self.path.clone(),
                source,
            })
    }

    /// Like `try_load`, but any failure falls back to defaults.
    pub fn load(&self) -> GameConfig {
        match self.try_load() {
            Ok(config) => config,
            Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                log::warn!("no config at {}; using defaults", self.path.display());
                GameConfig::default()
            }
            Err(err) => {
                log::warn!("{err}; using defaults");
                GameConfig::default()
            }
        }
    }

    pub fn save(&self, config: &GameConfig) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        let text = serde_json::to_string_pretty(config)
            .map_err(|e| write_err(io::Error::new(io::ErrorKind::InvalidData, e)))?;
        fs::write(&self.path, text).map_err(write_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("vgatris-settings-{}-{name}", std::process::id()))
            .join("config.json")
    }

    #[test]
    fn sanitized_clamps_expected_fields() {
        let config = GameConfig {
            version: 99,
            gravity_frames: 0,
            window_scale: 12,
            ..GameConfig::default()
        }
        .sanitized();

        assert_eq!(config.version, 1);
        assert_eq!(config.gravity_frames, 1);
        assert_eq!(config.window_scale, MAX_WINDOW_SCALE);
    }

    #[test]
    fn serde_defaults_fill_missing_fields() {
        let parsed: GameConfig = serde_json::from_str(r#"{"seed":7,"key_repeat":"edge_triggered"}"#)
            .expect("config JSON should parse");
        assert_eq!(parsed.seed, 7);
        assert_eq!(parsed.key_repeat, KeyRepeat::EdgeTriggered);
        assert_eq!(parsed.gravity_frames, DEFAULT_GRAVITY_FRAMES);
        assert_eq!(parsed.rng, RngKind::Lcg);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let store = ConfigStore::new(temp_path("missing"));
        assert!(matches!(store.try_load(), Err(ConfigError::Read { .. })));
        assert_eq!(store.load(), GameConfig::default());
    }

    #[test]
    fn save_then_load_roundtrips() {
        let path = temp_path("roundtrip");
        let store = ConfigStore::new(&path);
        let config = GameConfig {
            seed: 42,
            rng: RngKind::Xorshift,
            window_scale: 3,
            ..GameConfig::default()
        };
        store.save(&config).expect("save config");
        assert_eq!(store.try_load().expect("load config"), config);
        let _ = fs::remove_dir_all(path.parent().expect("config has a parent dir"));
    }

    #[test]
    fn malformed_file_reports_parse_error() {
        let path = temp_path("malformed");
        fs::create_dir_all(path.parent().expect("parent")).expect("create dir");
        fs::write(&path, "{ not json").expect("write");
        let store = ConfigStore::new(&path);
        assert!(matches!(store.try_load(), Err(ConfigError::Parse { .. })));
        assert_eq!(store.load(), GameConfig::default());
        let _ = fs::remove_dir_all(path.parent().expect("parent"));
    }

    #[test]
    fn rules_follow_gravity_setting() {
        let config = GameConfig {
            gravity_frames: 5,
            ..GameConfig::default()
        };
        assert_eq!(config.rules().gravity_frames, 5);
        assert_eq!(config.piece_rng().kind(), RngKind::Lcg);
    }
}
