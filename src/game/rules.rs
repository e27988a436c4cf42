//! Placement legality.
//!
//! Every check is a pure function of the current state. A failed check only
//! means the move is not available right now; callers drop the candidate.

use crate::board::Structure;
use crate::game::state::GameState;
use crate::types::{AgentId, VertexId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RuleViolation {
    #[error("vertex {0} does not exist")]
    UnknownVertex(VertexId),
    #[error("vertices {0} and {1} are not adjacent")]
    NotAdjacent(VertexId, VertexId),
    #[error("a road already joins {0} and {1}")]
    RoadExists(VertexId, VertexId),
    #[error("road is not connected to the agent's network")]
    RoadDisconnected,
    #[error("vertex {0} is occupied")]
    Occupied(VertexId),
    #[error("vertex {0} is next to an occupied vertex")]
    TooClose(VertexId),
    #[error("vertex {0} is not at the end of one of the agent's roads")]
    NotOnNetwork(VertexId),
    #[error("vertex {0} holds no settlement of this agent")]
    NoOwnSettlement(VertexId),
}

pub fn check_road(
    state: &GameState,
    agent: AgentId,
    v1: VertexId,
    v2: VertexId,
) -> Result<(), RuleViolation> {
    ensure_vertex(state, v1)?;
    ensure_vertex(state, v2)?;
    if !state.map.are_adjacent(v1, v2) {
        return Err(RuleViolation::NotAdjacent(v1, v2));
    }
    if state.map.road_owner(v1, v2).is_some() {
        return Err(RuleViolation::RoadExists(v1, v2));
    }

    let player = state.agent(agent);
    let owns_endpoint = [v1, v2]
        .into_iter()
        .any(|v| state.map.vertex(v).and_then(|vx| vx.owner()) == Some(agent));
    let road_touches = player.has_road_touching(v1) || player.has_road_touching(v2);
    if owns_endpoint || road_touches || player.has_nothing_built() {
        Ok(())
    } else {
        Err(RuleViolation::RoadDisconnected)
    }
}

pub fn check_settlement(
    state: &GameState,
    agent: AgentId,
    v: VertexId,
) -> Result<(), RuleViolation> {
    ensure_vertex(state, v)?;
    if state.map.structure_at(v).is_some() {
        return Err(RuleViolation::Occupied(v));
    }
    if !respects_distance_rule(state, v) {
        return Err(RuleViolation::TooClose(v));
    }
    let player = state.agent(agent);
    if !player.has_nothing_built() && !player.has_road_touching(v) {
        return Err(RuleViolation::NotOnNetwork(v));
    }
    Ok(())
}

pub fn check_city(state: &GameState, agent: AgentId, v: VertexId) -> Result<(), RuleViolation> {
    ensure_vertex(state, v)?;
    match state.map.structure_at(v) {
        Some(Structure::Settlement { owner }) if owner == agent => Ok(()),
        _ => Err(RuleViolation::NoOwnSettlement(v)),
    }
}

pub fn can_build_road(state: &GameState, agent: AgentId, v1: VertexId, v2: VertexId) -> bool {
    check_road(state, agent, v1, v2).is_ok()
}

pub fn can_build_settlement(state: &GameState, agent: AgentId, v: VertexId) -> bool {
    check_settlement(state, agent, v).is_ok()
}

pub fn can_build_city(state: &GameState, agent: AgentId, v: VertexId) -> bool {
    check_city(state, agent, v).is_ok()
}

/// No neighbour of `v` holds a structure.
pub fn respects_distance_rule(state: &GameState, v: VertexId) -> bool {
    state
        .map
        .adjacent_vertices(v)
        .iter()
        .all(|n| state.map.structure_at(*n).is_none())
}

fn ensure_vertex(state: &GameState, v: VertexId) -> Result<(), RuleViolation> {
    if state.map.vertex(v).is_some() {
        Ok(())
    } else {
        Err(RuleViolation::UnknownVertex(v))
    }
}
