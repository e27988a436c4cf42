//! Initial placement: two free settlements and two free roads per agent.

use tracing::{debug, warn};

use crate::game::log::{ActionEvent, EventSink};
use crate::game::rules;
use crate::game::state::GameState;
use crate::random::RandomSource;
use crate::types::{AgentId, Resource, StructureKind, VertexId};

/// After this many draws the second settlement no longer needs access to
/// [`REQUIRED_ACCESS`].
pub const RESOURCE_FALLBACK_AFTER: u32 = 200;
/// Hard cap per placement.
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;
pub const REQUIRED_ACCESS: [Resource; 3] = [Resource::Wood, Resource::Brick, Resource::Wheat];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SetupError {
    #[error("no legal starting vertex for agent {agent} after {attempts} attempts")]
    PlacementExhausted { agent: AgentId, attempts: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupStep {
    pub agent: AgentId,
    pub second_round: bool,
}

/// Snake order: 0, 1, 2, 3 then 3, 2, 1, 0.
#[derive(Debug, Clone)]
pub struct SetupState {
    steps: Vec<SetupStep>,
    cursor: usize,
}

impl SetupState {
    pub fn new(num_agents: usize) -> Self {
        let first = (0..num_agents).map(|agent| SetupStep {
            agent,
            second_round: false,
        });
        let second = (0..num_agents).rev().map(|agent| SetupStep {
            agent,
            second_round: true,
        });
        Self {
            steps: first.chain(second).collect(),
            cursor: 0,
        }
    }

    pub fn current(&self) -> Option<SetupStep> {
        self.steps.get(self.cursor).copied()
    }

    pub fn advance(&mut self) {
        if self.cursor < self.steps.len() {
            self.cursor += 1;
        }
    }

    pub fn is_complete(&self) -> bool {
        self.cursor >= self.steps.len()
    }
}

/// Places every agent's starting pieces. Events are stamped with the current
/// round, which is 0 before play starts.
pub fn run_setup(
    state: &mut GameState,
    rng: &mut dyn RandomSource,
    sink: &mut dyn EventSink,
) -> Result<(), SetupError> {
    let mut setup = SetupState::new(state.agents.len());
    while let Some(step) = setup.current() {
        place_starting_pieces(state, step, rng, sink)?;
        setup.advance();
    }
    Ok(())
}

fn place_starting_pieces(
    state: &mut GameState,
    step: SetupStep,
    rng: &mut dyn RandomSource,
    sink: &mut dyn EventSink,
) -> Result<(), SetupError> {
    let agent = step.agent;
    let vertex = sample_settlement_vertex(state, agent, step.second_round, rng)?;
    state.place_settlement(agent, vertex);
    state.agent_mut(agent).score += StructureKind::Settlement.points();
    sink.action(&ActionEvent {
        round: state.round,
        agent,
        message: format!("Placed starting settlement at vertex {vertex}"),
    });

    if step.second_round {
        let bundle = state.starting_resources(vertex);
        debug!(agent, vertex, bundle = %bundle, "starting resources");
        state.agent_mut(agent).hand.add_hand(&bundle);
    }

    let targets: Vec<VertexId> = state
        .map
        .adjacent_vertices(vertex)
        .iter()
        .copied()
        .filter(|&other| rules::can_build_road(state, agent, vertex, other))
        .collect();
    if targets.is_empty() {
        warn!(agent, vertex, "no free edge for starting road");
        return Ok(());
    }
    let other = targets[rng.below(targets.len())];
    state.place_road(agent, vertex, other);
    sink.action(&ActionEvent {
        round: state.round,
        agent,
        message: format!("Placed starting road between vertices {vertex} and {other}"),
    });
    Ok(())
}

/// Draws vertex ids until one is a legal starting spot.
pub fn sample_settlement_vertex(
    state: &GameState,
    agent: AgentId,
    second_round: bool,
    rng: &mut dyn RandomSource,
) -> Result<VertexId, SetupError> {
    let count = state.map.vertex_count();
    for attempt in 1..=MAX_PLACEMENT_ATTEMPTS {
        let candidate = rng.below(count) as VertexId;
        if state.map.adjacent_vertices(candidate).len() < 2 {
            continue;
        }
        if state.map.structure_at(candidate).is_some()
            || !rules::respects_distance_rule(state, candidate)
        {
            continue;
        }
        if second_round
            && attempt <= RESOURCE_FALLBACK_AFTER
            && !covers_required_access(state, agent, candidate)
        {
            continue;
        }
        debug!(agent, candidate, attempt, "starting vertex chosen");
        return Ok(candidate);
    }
    Err(SetupError::PlacementExhausted {
        agent,
        attempts: MAX_PLACEMENT_ATTEMPTS,
    })
}

/// Whether the agent's existing buildings plus `candidate` touch productive
/// tiles of every kind in [`REQUIRED_ACCESS`].
pub fn covers_required_access(state: &GameState, agent: AgentId, candidate: VertexId) -> bool {
    let player = state.agent(agent);
    let spots = player
        .settlements
        .iter()
        .chain(player.cities.iter())
        .copied()
        .chain(std::iter::once(candidate));
    let mut reachable = Vec::new();
    for spot in spots {
        reachable.extend(
            state
                .map
                .tiles_covering_vertex(spot)
                .filter_map(|tile| tile.resource),
        );
    }
    REQUIRED_ACCESS
        .iter()
        .all(|resource| reachable.contains(resource))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::MapGraph;
    use crate::random::RngSource;

    #[test]
    fn snake_order() {
        let mut setup = SetupState::new(4);
        let mut order = Vec::new();
        while let Some(step) = setup.current() {
            order.push((step.agent, step.second_round));
            setup.advance();
        }
        assert_eq!(
            order,
            vec![
                (0, false),
                (1, false),
                (2, false),
                (3, false),
                (3, true),
                (2, true),
                (1, true),
                (0, true),
            ]
        );
    }

    #[test]
    fn setup_places_two_of_each_and_keeps_distance() {
        for seed in 0..20 {
            let mut state = GameState::standard().unwrap();
            let mut rng = RngSource::seeded(seed);
            let mut log: Vec<ActionEvent> = Vec::new();
            run_setup(&mut state, &mut rng, &mut log).unwrap();

            for agent in &state.agents {
                assert_eq!(agent.settlements.len(), 2);
                assert_eq!(agent.roads.len(), 2);
                assert_eq!(agent.score, 2);
            }
            for vertex in state.map.occupied_vertices() {
                for &n in vertex.neighbors() {
                    assert!(state.map.structure_at(n).is_none(), "seed {seed}");
                }
            }
            assert_eq!(log.len(), 16);
            assert!(log.iter().all(|e| e.round == 0));
        }
    }

    #[test]
    fn second_settlement_is_credited() {
        let mut state = GameState::standard().unwrap();
        let mut rng = RngSource::seeded(5);
        let mut log: Vec<ActionEvent> = Vec::new();
        run_setup(&mut state, &mut rng, &mut log).unwrap();
        for agent in &state.agents {
            let second: VertexId = log
                .iter()
                .filter(|e| e.agent == agent.id)
                .filter_map(|e| e.message.strip_prefix("Placed starting settlement at vertex "))
                .last()
                .and_then(|v| v.parse().ok())
                .unwrap();
            assert_eq!(agent.hand, state.starting_resources(second));
        }
    }

    #[test]
    fn saturated_board_fails_loudly() {
        // Triangle-free 6-cycle: once two opposite corners are taken, nothing
        // else is legal.
        let tile = crate::board::Tile {
            id: 0,
            resource: Some(Resource::Wood),
            number: 5,
            vertices: vec![0, 1, 2, 3, 4, 5],
        };
        let edges = [(0, 1), (1, 2), (2, 3), (3, 4), (4, 5), (5, 0)];
        let map = MapGraph::from_parts(vec![tile], 6, &edges).unwrap();
        let mut state = GameState::new(map);
        state.place_settlement(0, 0);
        state.place_settlement(1, 2);
        state.place_settlement(2, 4);
        let mut rng = RngSource::seeded(1);
        let err = sample_settlement_vertex(&state, 3, false, &mut rng).unwrap_err();
        assert_eq!(
            err,
            SetupError::PlacementExhausted {
                agent: 3,
                attempts: MAX_PLACEMENT_ATTEMPTS,
            }
        );
    }

    #[test]
    fn access_check_unions_both_settlements() {
        let mut state = GameState::standard().unwrap();
        // Vertex 15 touches brick (tile 3), wood (tile 4) and the desert.
        state.place_settlement(0, 15);
        // Vertex 0 touches wheat (tiles 0 and 5) and sheep (tile 6).
        assert!(covers_required_access(&state, 0, 0));
        assert!(!covers_required_access(&state, 1, 0));
    }
}
