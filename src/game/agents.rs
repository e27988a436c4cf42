use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::game::resources::ResourceHand;
use crate::types::{AgentId, EdgeId, VertexId, edge_contains_vertex};

/// One of the four participants. Ordered sets keep candidate enumeration,
/// and therefore seeded runs, reproducible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentState {
    pub id: AgentId,
    pub hand: ResourceHand,
    pub score: u32,
    pub roads: BTreeSet<EdgeId>,
    pub settlements: BTreeSet<VertexId>,
    pub cities: BTreeSet<VertexId>,
}

impl AgentState {
    pub fn new(id: AgentId) -> Self {
        Self {
            id,
            hand: ResourceHand::zero(),
            score: 0,
            roads: BTreeSet::new(),
            settlements: BTreeSet::new(),
            cities: BTreeSet::new(),
        }
    }

    pub fn building_count(&self) -> usize {
        self.settlements.len() + self.cities.len()
    }

    /// True until the agent places its first road or building.
    pub fn has_nothing_built(&self) -> bool {
        self.roads.is_empty() && self.building_count() == 0
    }

    pub fn owns_building_at(&self, vertex: VertexId) -> bool {
        self.settlements.contains(&vertex) || self.cities.contains(&vertex)
    }

    pub fn has_road_touching(&self, vertex: VertexId) -> bool {
        self.roads
            .iter()
            .any(|road| edge_contains_vertex(*road, vertex))
    }

    pub fn card_count(&self) -> u32 {
        self.hand.total()
    }

    /// 1-based label used in logs and standings.
    pub fn label(&self) -> String {
        format!("Player {}", self.id + 1)
    }
}
