use std::fmt;

use serde::{Deserialize, Serialize};

use crate::game::log::ActionEvent;
use crate::game::resources::{ResourceError, cost_of};
use crate::game::rules::{self, RuleViolation};
use crate::game::state::GameState;
use crate::types::{AgentId, StructureKind, VertexId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    BuildRoad { from: VertexId, to: VertexId },
    BuildSettlement { at: VertexId },
    BuildCity { at: VertexId },
    Pass,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("agent {0} does not exist")]
    UnknownAgent(AgentId),
    #[error(transparent)]
    Rule(#[from] RuleViolation),
    #[error(transparent)]
    Resources(#[from] ResourceError),
}

impl Move {
    pub fn kind(&self) -> Option<StructureKind> {
        match self {
            Move::BuildRoad { .. } => Some(StructureKind::Road),
            Move::BuildSettlement { .. } => Some(StructureKind::Settlement),
            Move::BuildCity { .. } => Some(StructureKind::City),
            Move::Pass => None,
        }
    }

    pub fn is_build(&self) -> bool {
        self.kind().is_some()
    }

    pub fn describe(&self) -> String {
        match self {
            Move::BuildRoad { from, to } => {
                format!("Built road between vertices {from} and {to}")
            }
            Move::BuildSettlement { at } => format!("Built settlement at vertex {at}"),
            Move::BuildCity { at } => format!("Upgraded settlement to city at vertex {at}"),
            Move::Pass => "Passed turn".to_string(),
        }
    }

    /// Legality against the placement rules only; affordability is separate.
    pub fn check(&self, state: &GameState, agent: AgentId) -> Result<(), RuleViolation> {
        match *self {
            Move::BuildRoad { from, to } => rules::check_road(state, agent, from, to),
            Move::BuildSettlement { at } => rules::check_settlement(state, agent, at),
            Move::BuildCity { at } => rules::check_city(state, agent, at),
            Move::Pass => Ok(()),
        }
    }

    /// Debit, place, score, then describe. Nothing changes if the move is
    /// illegal or unaffordable.
    pub fn apply(&self, state: &mut GameState, agent: AgentId) -> Result<ActionEvent, ActionError> {
        if agent >= state.agents.len() {
            return Err(ActionError::UnknownAgent(agent));
        }
        self.check(state, agent)?;

        if let Some(kind) = self.kind() {
            state.agent_mut(agent).hand.spend(cost_of(kind))?;
        }

        let points = match *self {
            Move::BuildRoad { from, to } => {
                state.place_road(agent, from, to);
                0
            }
            Move::BuildSettlement { at } => {
                state.place_settlement(agent, at);
                StructureKind::Settlement.points()
            }
            Move::BuildCity { at } => {
                state.upgrade_to_city(agent, at);
                StructureKind::City.points() - StructureKind::Settlement.points()
            }
            Move::Pass => 0,
        };
        state.agent_mut(agent).score += points;

        Ok(ActionEvent {
            round: state.round,
            agent,
            message: self.describe(),
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Structure;
    use crate::game::resources::{COST_CITY, COST_ROAD, COST_SETTLEMENT, ResourceHand};

    fn fresh() -> GameState {
        GameState::standard().unwrap()
    }

    #[test]
    fn road_debits_cost_and_scores_nothing() {
        let mut state = fresh();
        state.agent_mut(0).hand = ResourceHand::from_counts([3, 2, 0, 0, 0]);
        let before = state.agent(0).hand;
        let event = Move::BuildRoad { from: 0, to: 1 }.apply(&mut state, 0).unwrap();

        let mut expected = before;
        expected.spend(&COST_ROAD).unwrap();
        assert_eq!(state.agent(0).hand, expected);
        assert_eq!(state.agent(0).score, 0);
        assert_eq!(state.map.road_owner(1, 0), Some(0));
        assert_eq!(event.message, "Built road between vertices 0 and 1");
    }

    #[test]
    fn settlement_scores_one() {
        let mut state = fresh();
        state.agent_mut(1).hand = COST_SETTLEMENT;
        Move::BuildSettlement { at: 7 }.apply(&mut state, 1).unwrap();
        assert!(state.agent(1).hand.is_empty());
        assert_eq!(state.agent(1).score, 1);
        assert_eq!(
            state.map.structure_at(7),
            Some(Structure::Settlement { owner: 1 })
        );
    }

    #[test]
    fn city_upgrade_adds_exactly_one_point() {
        let mut state = fresh();
        state.agent_mut(2).hand = COST_SETTLEMENT;
        Move::BuildSettlement { at: 20 }.apply(&mut state, 2).unwrap();
        let with_settlement = state.agent(2).score;

        state.agent_mut(2).hand = COST_CITY;
        let event = Move::BuildCity { at: 20 }.apply(&mut state, 2).unwrap();
        assert_eq!(state.agent(2).score, with_settlement + 1);
        assert!(state.agent(2).settlements.is_empty());
        assert!(state.agent(2).cities.contains(&20));
        assert_eq!(event.message, "Upgraded settlement to city at vertex 20");
    }

    #[test]
    fn unaffordable_build_changes_nothing() {
        let mut state = fresh();
        state.agent_mut(0).hand = ResourceHand::from_counts([1, 0, 0, 0, 0]);
        let err = Move::BuildRoad { from: 0, to: 1 }
            .apply(&mut state, 0)
            .unwrap_err();
        assert!(matches!(err, ActionError::Resources(_)));
        assert!(state.map.roads().is_empty());
        assert_eq!(state.agent(0).hand.total(), 1);
    }

    #[test]
    fn illegal_build_is_refused_before_debit() {
        let mut state = fresh();
        state.place_settlement(3, 0);
        state.agent_mut(0).hand = COST_CITY;
        let err = Move::BuildCity { at: 0 }.apply(&mut state, 0).unwrap_err();
        assert_eq!(err, ActionError::Rule(RuleViolation::NoOwnSettlement(0)));
        assert_eq!(state.agent(0).hand, COST_CITY);
    }

    #[test]
    fn pass_only_logs() {
        let mut state = fresh();
        state.round = 4;
        let event = Move::Pass.apply(&mut state, 3).unwrap();
        assert_eq!(event.round, 4);
        assert_eq!(event.agent, 3);
        assert_eq!(event.message, "Passed turn");
        assert!(state.agent(3).hand.is_empty());
    }
}
