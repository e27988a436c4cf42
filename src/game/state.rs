use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{MapError, MapGraph, Structure};
use crate::game::agents::AgentState;
use crate::game::resources::ResourceHand;
use crate::types::{AgentId, NUM_AGENTS, VertexId, normalize_edge};

pub const MAX_ROUNDS_CAP: u32 = 8192;
pub const HAND_LIMIT: u32 = 7;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    pub max_rounds: u32,
    pub vps_to_win: u32,
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_rounds: 25,
            vps_to_win: 10,
            seed: 42,
        }
    }
}

impl GameConfig {
    pub fn clamped_max_rounds(&self) -> u32 {
        self.max_rounds.min(MAX_ROUNDS_CAP)
    }
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub round: u32,
    pub map: MapGraph,
    pub agents: Vec<AgentState>,
}

impl GameState {
    pub fn new(map: MapGraph) -> Self {
        Self {
            round: 0,
            map,
            agents: (0..NUM_AGENTS).map(AgentState::new).collect(),
        }
    }

    pub fn standard() -> Result<Self, MapError> {
        Ok(Self::new(MapGraph::standard()?))
    }

    pub fn agent(&self, id: AgentId) -> &AgentState {
        &self.agents[id]
    }

    pub fn agent_mut(&mut self, id: AgentId) -> &mut AgentState {
        &mut self.agents[id]
    }

    /// Credits every occupied vertex on tiles triggered by `roll`.
    ///
    /// Returns what each agent collected. A 7 produces nothing.
    pub fn produce(&mut self, roll: u8) -> Vec<ResourceHand> {
        let mut gained = vec![ResourceHand::zero(); self.agents.len()];
        if roll == 7 {
            return gained;
        }
        for tile in self.map.tiles() {
            let Some(resource) = tile.produces_on(roll) else {
                continue;
            };
            for &vertex in &tile.vertices {
                if let Some(structure) = self.map.structure_at(vertex) {
                    gained[structure.owner()].add(resource, structure.yield_multiplier());
                }
            }
        }
        for (agent, bundle) in self.agents.iter_mut().zip(&gained) {
            if !bundle.is_empty() {
                debug!(agent = agent.id, roll, gained = %bundle, "production");
                agent.hand.add_hand(bundle);
            }
        }
        gained
    }

    /// One card per productive tile touching `vertex`.
    pub fn starting_resources(&self, vertex: VertexId) -> ResourceHand {
        let mut bundle = ResourceHand::zero();
        for tile in self.map.tiles_covering_vertex(vertex) {
            if let Some(resource) = tile.resource {
                bundle.add(resource, 1);
            }
        }
        bundle
    }

    pub(crate) fn place_settlement(&mut self, agent: AgentId, vertex: VertexId) {
        self.map
            .set_structure(vertex, Structure::Settlement { owner: agent });
        self.agents[agent].settlements.insert(vertex);
    }

    pub(crate) fn upgrade_to_city(&mut self, agent: AgentId, vertex: VertexId) {
        self.map.set_structure(vertex, Structure::City { owner: agent });
        let owner = &mut self.agents[agent];
        owner.settlements.remove(&vertex);
        owner.cities.insert(vertex);
    }

    pub(crate) fn place_road(&mut self, agent: AgentId, a: VertexId, b: VertexId) {
        self.map.place_road(a, b, agent);
        self.agents[agent].roads.insert(normalize_edge((a, b)));
    }

    /// First agent in id order at or above `threshold`.
    pub fn leader_at_or_above(&self, threshold: u32) -> Option<AgentId> {
        self.agents
            .iter()
            .find(|agent| agent.score >= threshold)
            .map(|agent| agent.id)
    }

    /// Agents by score, highest first; ties keep id order.
    pub fn standings(&self) -> Vec<Standing> {
        let mut standings: Vec<Standing> = self
            .agents
            .iter()
            .map(|agent| Standing {
                agent: agent.id,
                score: agent.score,
                hand: agent.hand,
            })
            .collect();
        standings.sort_by(|a, b| b.score.cmp(&a.score));
        standings
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub agent: AgentId,
    pub score: u32,
    pub hand: ResourceHand,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Resource;

    fn fresh() -> GameState {
        GameState::standard().unwrap()
    }

    #[test]
    fn production_pays_settlements_once_and_cities_twice() {
        let mut state = fresh();
        // Tile 0 is the centre wheat hex on 6; tile 11 is ore on 6.
        let centre = state.map.vertices_of_tile(0).to_vec();
        state.place_settlement(0, centre[0]);
        state.place_settlement(1, centre[2]);
        state.upgrade_to_city(1, centre[2]);

        let gained = state.produce(6);

        let mut expected_zero = ResourceHand::zero();
        for tile in state.map.tiles_covering_vertex(centre[0]) {
            if let Some(resource) = tile.produces_on(6) {
                expected_zero.add(resource, 1);
            }
        }
        let mut expected_one = ResourceHand::zero();
        for tile in state.map.tiles_covering_vertex(centre[2]) {
            if let Some(resource) = tile.produces_on(6) {
                expected_one.add(resource, 2);
            }
        }
        assert!(expected_zero.get(Resource::Wheat) >= 1);
        assert_eq!(gained[0], expected_zero);
        assert_eq!(gained[1], expected_one);
        assert_eq!(state.agent(0).hand, expected_zero);
        assert!(gained[2].is_empty() && gained[3].is_empty());
    }

    #[test]
    fn seven_produces_nothing() {
        let mut state = fresh();
        for v in [0, 2, 4] {
            state.place_settlement(0, v);
        }
        let gained = state.produce(7);
        assert!(gained.iter().all(ResourceHand::is_empty));
        assert!(state.agent(0).hand.is_empty());
    }

    #[test]
    fn barren_tile_never_pays() {
        let mut state = fresh();
        let desert = state
            .map
            .tiles()
            .iter()
            .find(|t| t.is_barren())
            .map(|t| t.id)
            .unwrap();
        let corner = state.map.vertices_of_tile(desert)[0];
        state.place_settlement(3, corner);
        for roll in 2..=12 {
            let before = state.agent(3).hand;
            let gained = state.produce(roll);
            let from_other_tiles: u32 = state
                .map
                .tiles_covering_vertex(corner)
                .filter(|t| t.produces_on(roll).is_some())
                .count() as u32;
            assert_eq!(gained[3].total(), from_other_tiles);
            assert_eq!(state.agent(3).hand.total(), before.total() + from_other_tiles);
        }
    }

    #[test]
    fn standings_are_stable_on_ties() {
        let mut state = fresh();
        state.agent_mut(0).score = 3;
        state.agent_mut(1).score = 5;
        state.agent_mut(2).score = 3;
        state.agent_mut(3).score = 5;
        let order: Vec<AgentId> = state.standings().iter().map(|s| s.agent).collect();
        assert_eq!(order, vec![1, 3, 0, 2]);
    }

    #[test]
    fn city_upgrade_moves_vertex_between_collections() {
        let mut state = fresh();
        state.place_settlement(2, 10);
        state.upgrade_to_city(2, 10);
        assert!(state.agent(2).settlements.is_empty());
        assert!(state.agent(2).cities.contains(&10));
        assert_eq!(state.map.structure_at(10), Some(Structure::City { owner: 2 }));
    }
}
