//! Simulation settings read from a small `key: value` file.
//!
//! ```text
//! # comments and blank lines are ignored
//! turns: 400
//! vps_to_win: 10
//! seed: 7
//! ```
//!
//! Anything unreadable falls back to the defaults with a warning; a bad file
//! never stops a simulation from running.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::game::state::{GameConfig, MAX_ROUNDS_CAP};

pub const DEFAULT_TURNS: u32 = 100;
pub const MIN_TURNS: u32 = 1;
pub const MAX_TURNS: u32 = MAX_ROUNDS_CAP;
pub const DEFAULT_VPS_TO_WIN: u32 = 10;
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("line {line}: expected `key: value`")]
    MissingSeparator { line: usize },
    #[error("line {line}: `{value}` is not a valid value for `{key}`")]
    InvalidValue {
        line: usize,
        key: String,
        value: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Total agent turns; always within `[MIN_TURNS, MAX_TURNS]`.
    pub turns: u32,
    pub vps_to_win: u32,
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            turns: DEFAULT_TURNS,
            vps_to_win: DEFAULT_VPS_TO_WIN,
            seed: DEFAULT_SEED,
        }
    }
}

impl SimulationConfig {
    /// Reads `path`, or returns the defaults if it cannot be read.
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(err) => {
                warn!(path = %path.display(), %err, "cannot read config, using defaults");
                Self::default()
            }
        }
    }

    /// Lenient parse: bad lines are reported and skipped, later keys win.
    pub fn parse(text: &str) -> Self {
        let mut config = Self::default();
        for (index, raw) in text.lines().enumerate() {
            if let Err(err) = config.apply_line(index + 1, raw) {
                warn!(%err, "ignoring config line");
            }
        }
        config
    }

    fn apply_line(&mut self, line: usize, raw: &str) -> Result<(), ConfigError> {
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            return Ok(());
        }
        let (key, value) = content
            .split_once(':')
            .ok_or(ConfigError::MissingSeparator { line })?;
        let (key, value) = (key.trim(), value.trim());
        let invalid = || ConfigError::InvalidValue {
            line,
            key: key.to_string(),
            value: value.to_string(),
        };
        match key {
            "turns" => {
                let turns: i64 = value.parse().map_err(|_| invalid())?;
                self.turns = clamp_turns(turns);
            }
            "vps_to_win" => self.vps_to_win = value.parse().map_err(|_| invalid())?,
            "seed" => self.seed = value.parse().map_err(|_| invalid())?,
            other => debug!(key = other, "unknown config key"),
        }
        Ok(())
    }

    pub fn with_turns(mut self, turns: i64) -> Self {
        self.turns = clamp_turns(turns);
        self
    }

    /// One round is a turn for each of the four agents.
    pub fn max_rounds(&self) -> u32 {
        self.turns / 4
    }

    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            max_rounds: self.max_rounds(),
            vps_to_win: self.vps_to_win,
            seed: self.seed,
        }
    }
}

fn clamp_turns(turns: i64) -> u32 {
    turns.clamp(MIN_TURNS as i64, MAX_TURNS as i64) as u32
}
