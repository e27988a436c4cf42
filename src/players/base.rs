use crate::game::action::Move;
use crate::game::resources::cost_of;
use crate::game::state::GameState;
use crate::random::RandomSource;
use crate::types::{AgentId, StructureKind};

pub trait DecisionPolicy {
    /// Chooses the agent's next move. Under `must_build` the policy may only
    /// pass when no build is available.
    fn decide(
        &self,
        state: &GameState,
        agent: AgentId,
        must_build: bool,
        rng: &mut dyn RandomSource,
    ) -> Move;
}

/// Legal, affordable builds from the highest non-empty priority tier:
/// city upgrades, then settlements, then roads.
pub fn build_candidates(state: &GameState, agent: AgentId) -> Vec<Move> {
    let cities = tier(state, agent, StructureKind::City);
    if !cities.is_empty() {
        return cities;
    }
    let settlements = tier(state, agent, StructureKind::Settlement);
    if !settlements.is_empty() {
        return settlements;
    }
    tier(state, agent, StructureKind::Road)
}

fn tier(state: &GameState, agent: AgentId, kind: StructureKind) -> Vec<Move> {
    let player = state.agent(agent);
    if !player.hand.can_afford(cost_of(kind)) {
        return Vec::new();
    }
    let candidates: Vec<Move> = match kind {
        StructureKind::City => player
            .settlements
            .iter()
            .map(|&at| Move::BuildCity { at })
            .collect(),
        StructureKind::Settlement => state
            .map
            .vertices()
            .iter()
            .map(|vertex| Move::BuildSettlement { at: vertex.id })
            .collect(),
        StructureKind::Road => state
            .map
            .edges()
            .map(|(from, to)| Move::BuildRoad { from, to })
            .collect(),
    };
    candidates
        .into_iter()
        .filter(|candidate| match candidate.check(state, agent) {
            Ok(()) => true,
            Err(reason) => {
                tracing::trace!(agent, %candidate, %reason, "candidate rejected");
                false
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::resources::{COST_CITY, COST_ROAD, ResourceHand};

    #[test]
    fn empty_hand_has_no_candidates() {
        let state = GameState::standard().unwrap();
        assert!(build_candidates(&state, 0).is_empty());
    }

    #[test]
    fn city_tier_shadows_roads() {
        let mut state = GameState::standard().unwrap();
        state.place_settlement(0, 0);
        state.place_settlement(0, 9);
        let mut hand = COST_CITY;
        hand.add_hand(&COST_ROAD);
        state.agent_mut(0).hand = hand;
        let moves = build_candidates(&state, 0);
        assert_eq!(
            moves,
            vec![Move::BuildCity { at: 0 }, Move::BuildCity { at: 9 }]
        );
    }

    #[test]
    fn roads_only_extend_the_network() {
        let mut state = GameState::standard().unwrap();
        state.place_settlement(1, 0);
        state.agent_mut(1).hand = ResourceHand::from_counts([1, 1, 0, 0, 0]);
        let moves = build_candidates(&state, 1);
        assert_eq!(moves.len(), state.map.adjacent_vertices(0).len());
        assert!(moves.iter().all(|m| matches!(
            m,
            Move::BuildRoad { from, to } if *from == 0 || *to == 0
        )));
    }
}
