pub mod action;
pub mod agents;
pub mod game;
pub mod log;
pub mod resources;
pub mod rules;
pub mod setup;
pub mod state;

pub use action::{ActionError, Move};
pub use agents::AgentState;
pub use game::{Game, GameError, GamePhase, Outcome};
pub use log::{ActionEvent, AgentSummary, EventSink, GameEvent, NullSink, RoundSummary};
pub use resources::{
    COST_CITY, COST_ROAD, COST_SETTLEMENT, ResourceError, ResourceHand, cost_of,
};
pub use rules::RuleViolation;
pub use setup::SetupError;
pub use state::{GameConfig, GameState, HAND_LIMIT, MAX_ROUNDS_CAP, Standing};
