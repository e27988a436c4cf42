#![warn(clippy::all)]
#![deny(rust_2018_idioms)]

pub mod board;
pub mod cli;
pub mod config;
pub mod coords;
pub mod game;
pub mod players;
pub mod random;
pub mod types;

pub use board::{MapGraph, Tile};
pub use config::SimulationConfig;
pub use game::{Game, GameConfig, GameState, Outcome};
pub use players::{DecisionPolicy, RandomPolicy};
pub use random::{RandomSource, RngSource};
pub use types::{AgentId, Resource};
