use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::board::MapError;
use crate::game::action::Move;
use crate::game::log::{AgentSummary, EventSink, NullSink, RoundSummary};
use crate::game::setup::{self, SetupError};
use crate::game::state::{GameConfig, GameState, HAND_LIMIT, Standing};
use crate::players::DecisionPolicy;
use crate::random::RandomSource;
use crate::types::AgentId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Setup,
    Playing,
    Finished { winner: Option<AgentId> },
}

#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Setup(#[from] SetupError),
    #[error("cannot {operation} while in phase {phase:?}")]
    WrongPhase {
        operation: &'static str,
        phase: GamePhase,
    },
    #[error("expected one policy per agent ({expected}), got {got}")]
    PolicyCount { expected: usize, got: usize },
    #[error("unknown agent {0}")]
    UnknownAgent(AgentId),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub winner: Option<AgentId>,
    pub rounds_played: u32,
    /// Highest score first, ties in agent id order.
    pub standings: Vec<Standing>,
}

/// Owns one simulation run: the state, its random source and the event sink.
pub struct Game<R, S = NullSink> {
    pub id: Uuid,
    pub config: GameConfig,
    pub state: GameState,
    phase: GamePhase,
    rng: R,
    sink: S,
}

impl<R: RandomSource> Game<R, NullSink> {
    /// Game on the standard board.
    pub fn new(config: GameConfig, rng: R) -> Result<Self, GameError> {
        Ok(Self::from_state(config, GameState::standard()?, rng))
    }

    /// Game starting from an arbitrary (pre-built) state.
    pub fn from_state(config: GameConfig, state: GameState, rng: R) -> Self {
        Self {
            id: Uuid::new_v4(),
            config,
            state,
            phase: GamePhase::Setup,
            rng,
            sink: NullSink,
        }
    }
}

impl<R: RandomSource, S: EventSink> Game<R, S> {
    pub fn with_sink<T: EventSink>(self, sink: T) -> Game<R, T> {
        Game {
            id: self.id,
            config: self.config,
            state: self.state,
            phase: self.phase,
            rng: self.rng,
            sink,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, GamePhase::Finished { .. })
    }

    pub fn winner(&self) -> Option<AgentId> {
        match self.phase {
            GamePhase::Finished { winner } => winner,
            _ => None,
        }
    }

    /// Places every agent's starting pieces and moves the game to `Playing`.
    pub fn run_setup(&mut self) -> Result<(), GameError> {
        self.expect_phase(GamePhase::Setup, "run setup")?;
        setup::run_setup(&mut self.state, &mut self.rng, &mut self.sink)?;
        self.phase = GamePhase::Playing;
        info!(game = %self.id, "setup complete");
        Ok(())
    }

    /// Runs setup if needed, then full rounds until a winner emerges or the
    /// round limit is reached.
    pub fn start_simulation<P: DecisionPolicy>(
        &mut self,
        players: &[P],
    ) -> Result<Outcome, GameError> {
        self.check_policies(players.len())?;
        if self.phase == GamePhase::Setup {
            self.run_setup()?;
        }
        self.expect_phase(GamePhase::Playing, "start simulation")?;

        let max_rounds = self.config.clamped_max_rounds();
        info!(game = %self.id, max_rounds, vps_to_win = self.config.vps_to_win, "simulation started");
        if self.state.round >= max_rounds {
            self.phase = GamePhase::Finished { winner: None };
        }
        while !self.is_finished() {
            self.run_round(players)?;
        }

        let outcome = self.outcome();
        self.sink.finished(&outcome);
        match outcome.winner {
            Some(winner) => info!(winner, rounds = outcome.rounds_played, "game won"),
            None => info!(rounds = outcome.rounds_played, "round limit reached"),
        }
        Ok(outcome)
    }

    /// One full round: every agent rolls and takes a turn, then the summary
    /// is emitted and victory is checked.
    pub fn run_round<P: DecisionPolicy>(&mut self, players: &[P]) -> Result<GamePhase, GameError> {
        self.check_policies(players.len())?;
        self.expect_phase(GamePhase::Playing, "run a round")?;

        self.state.round += 1;
        for (agent, policy) in players.iter().enumerate() {
            self.run_turn(agent, policy)?;
        }
        let summary = self.round_summary();
        self.sink.round_summary(&summary);

        if let Some(winner) = self.state.leader_at_or_above(self.config.vps_to_win) {
            self.phase = GamePhase::Finished {
                winner: Some(winner),
            };
        } else if self.state.round >= self.config.clamped_max_rounds() {
            self.phase = GamePhase::Finished { winner: None };
        }
        Ok(self.phase)
    }

    /// Rolls the dice, distributes production, then lets the agent act.
    pub fn run_turn<P: DecisionPolicy + ?Sized>(
        &mut self,
        agent: AgentId,
        policy: &P,
    ) -> Result<usize, GameError> {
        self.check_agent(agent)?;
        let dice = self.rng.roll_dice();
        let roll = dice.0 + dice.1;
        debug!(round = self.state.round, agent, roll, "dice rolled");
        self.sink.dice_rolled(self.state.round, agent, dice);
        if roll != 7 {
            self.state.produce(roll);
        }
        self.take_turn(agent, policy)
    }

    /// The agent's decisions without a dice roll. While holding more than
    /// [`HAND_LIMIT`] cards every decision is forced; otherwise exactly one
    /// voluntary decision is made. Returns the number of builds.
    pub fn take_turn<P: DecisionPolicy + ?Sized>(
        &mut self,
        agent: AgentId,
        policy: &P,
    ) -> Result<usize, GameError> {
        self.check_agent(agent)?;
        let mut built = 0;
        while self.state.agent(agent).card_count() > HAND_LIMIT {
            let choice = policy.decide(&self.state, agent, true, &mut self.rng);
            if !choice.is_build() {
                if built == 0 {
                    self.perform(agent, Move::Pass);
                }
                return Ok(built);
            }
            if !self.perform(agent, choice) {
                return Ok(built);
            }
            built += 1;
        }
        if built == 0 {
            let choice = policy.decide(&self.state, agent, false, &mut self.rng);
            if self.perform(agent, choice) && choice.is_build() {
                built += 1;
            }
        }
        Ok(built)
    }

    pub fn round_summary(&self) -> RoundSummary {
        RoundSummary {
            round: self.state.round,
            agents: self
                .state
                .agents
                .iter()
                .map(|agent| AgentSummary {
                    agent: agent.id,
                    score: agent.score,
                    hand: agent.hand,
                })
                .collect(),
        }
    }

    pub fn outcome(&self) -> Outcome {
        Outcome {
            winner: self.winner(),
            rounds_played: self.state.round,
            standings: self.state.standings(),
        }
    }

    fn perform(&mut self, agent: AgentId, choice: Move) -> bool {
        match choice.apply(&mut self.state, agent) {
            Ok(event) => {
                self.sink.action(&event);
                true
            }
            Err(err) => {
                warn!(agent, %choice, %err, "policy chose an illegal move");
                false
            }
        }
    }

    fn expect_phase(&self, expected: GamePhase, operation: &'static str) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(GameError::WrongPhase {
                operation,
                phase: self.phase,
            })
        }
    }

    fn check_policies(&self, got: usize) -> Result<(), GameError> {
        let expected = self.state.agents.len();
        if got == expected {
            Ok(())
        } else {
            Err(GameError::PolicyCount { expected, got })
        }
    }

    fn check_agent(&self, agent: AgentId) -> Result<(), GameError> {
        if agent < self.state.agents.len() {
            Ok(())
        } else {
            Err(GameError::UnknownAgent(agent))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::log::{ActionEvent, GameEvent};
    use crate::game::resources::ResourceHand;
    use crate::players::RandomPolicy;
    use crate::random::{LoadedDice, RngSource};
    use rand::rngs::StdRng;

    const PLAYERS: [RandomPolicy; 4] = [RandomPolicy {
        save_probability: 0.3,
    }; 4];

    fn game(seed: u64, max_rounds: u32) -> Game<RngSource<StdRng>, Vec<GameEvent>> {
        let config = GameConfig {
            max_rounds,
            vps_to_win: 10,
            seed,
        };
        Game::new(config, RngSource::seeded(seed))
            .unwrap()
            .with_sink(Vec::new())
    }

    #[test]
    fn setup_moves_to_playing() {
        let mut game = game(1, 10);
        assert_eq!(game.phase(), GamePhase::Setup);
        game.run_setup().unwrap();
        assert_eq!(game.phase(), GamePhase::Playing);
        assert!(matches!(
            game.run_setup(),
            Err(GameError::WrongPhase { .. })
        ));
    }

    #[test]
    fn rounds_require_setup() {
        let mut game = game(1, 10);
        let err = game.run_round(&PLAYERS).unwrap_err();
        assert!(matches!(err, GameError::WrongPhase { .. }));
        assert_eq!(game.state.round, 0);
    }

    #[test]
    fn policy_count_must_match() {
        let mut game = game(1, 10);
        let err = game.start_simulation(&PLAYERS[..3]).unwrap_err();
        assert!(matches!(
            err,
            GameError::PolicyCount {
                expected: 4,
                got: 3
            }
        ));
    }

    #[test]
    fn victory_is_checked_after_the_full_round() {
        let mut game = game(3, 50);
        game.run_setup().unwrap();
        game.state.agent_mut(0).score = 10;
        let phase = game.run_round(&PLAYERS).unwrap();
        assert_eq!(phase, GamePhase::Finished { winner: Some(0) });

        let rolls = game
            .sink()
            .iter()
            .filter(|e| matches!(e, GameEvent::DiceRolled { round: 1, .. }))
            .count();
        assert_eq!(rolls, 4);
        assert!(matches!(
            game.run_round(&PLAYERS),
            Err(GameError::WrongPhase { .. })
        ));
    }

    #[test]
    fn round_limit_finishes_without_winner() {
        let mut game = game(8, 2);
        let outcome = game.start_simulation(&PLAYERS).unwrap();
        assert_eq!(outcome.rounds_played, 2);
        assert_eq!(outcome.winner, None);
        assert!(
            outcome
                .standings
                .windows(2)
                .all(|pair| pair[0].score >= pair[1].score)
        );
        assert!(matches!(game.sink().last(), Some(GameEvent::Finished(_))));
    }

    #[test]
    fn zero_rounds_plays_nothing() {
        let mut game = game(8, 0);
        let outcome = game.start_simulation(&PLAYERS).unwrap();
        assert_eq!(outcome.rounds_played, 0);
        assert_eq!(game.phase(), GamePhase::Finished { winner: None });
    }

    #[test]
    fn one_summary_per_round() {
        let mut game = game(21, 6);
        let outcome = game.start_simulation(&PLAYERS).unwrap();
        let summaries: Vec<u32> = game
            .sink()
            .iter()
            .filter_map(|e| match e {
                GameEvent::RoundSummary(summary) => Some(summary.round),
                _ => None,
            })
            .collect();
        assert_eq!(summaries, (1..=outcome.rounds_played).collect::<Vec<_>>());
    }

    #[test]
    fn forced_builds_stop_at_hand_limit() {
        let mut game = Game::new(GameConfig::default(), RngSource::seeded(4))
            .unwrap()
            .with_sink(Vec::<ActionEvent>::new());
        game.run_setup().unwrap();
        game.state.agent_mut(2).hand = ResourceHand::from_counts([8, 8, 0, 0, 0]);
        let before = game.sink().len();

        let built = game.take_turn(2, &PLAYERS[2]).unwrap();

        assert!(built >= 1);
        let hand = game.state.agent(2).hand;
        assert!(hand.total() <= HAND_LIMIT || built as u32 == 8);
        assert_eq!(hand.get(crate::types::Resource::Wood), 8 - built as u32);
        let new = &game.sink()[before..];
        assert_eq!(new.len(), built);
        assert!(new.iter().all(|e| e.message.starts_with("Built road")));
    }

    #[test]
    fn empty_hand_passes() {
        let mut game = Game::new(GameConfig::default(), RngSource::seeded(4))
            .unwrap()
            .with_sink(Vec::<ActionEvent>::new());
        let built = game.take_turn(1, &PLAYERS[1]).unwrap();
        assert_eq!(built, 0);
        assert_eq!(game.sink()[0].message, "Passed turn");
        assert!(matches!(
            game.take_turn(9, &PLAYERS[0]),
            Err(GameError::UnknownAgent(9))
        ));
    }

    #[test]
    fn sevens_produce_nothing() {
        let rng = LoadedDice::new(RngSource::seeded(6), (3, 4));
        let mut game = Game::new(GameConfig::default(), rng).unwrap();
        game.run_setup().unwrap();
        let hands: Vec<ResourceHand> = game.state.agents.iter().map(|a| a.hand).collect();
        game.run_turn(0, &RandomPolicy {
            save_probability: 1.0,
        })
        .unwrap();
        assert_eq!(game.state.agent(1).hand, hands[1]);
    }

    #[test]
    fn same_seed_same_game() {
        let mut first = game(77, 15);
        let mut second = game(77, 15);
        let a = first.start_simulation(&PLAYERS).unwrap();
        let b = second.start_simulation(&PLAYERS).unwrap();
        assert_eq!(a, b);
        assert_eq!(first.sink(), second.sink());
    }
}
