use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

pub type VertexId = u16;
pub type TileId = u16;
pub type EdgeId = (VertexId, VertexId);
pub type AgentId = usize;

pub const NUM_AGENTS: usize = 4;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    EnumIter,
)]
#[strum(serialize_all = "PascalCase", ascii_case_insensitive)]
pub enum Resource {
    Wood,
    Brick,
    Wheat,
    Sheep,
    Ore,
}

impl Resource {
    pub const ALL: [Resource; 5] = [
        Resource::Wood,
        Resource::Brick,
        Resource::Wheat,
        Resource::Sheep,
        Resource::Ore,
    ];
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString, Display, EnumIter,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum StructureKind {
    Road,
    Settlement,
    City,
}

impl StructureKind {
    pub const fn points(self) -> u32 {
        match self {
            StructureKind::Road => 0,
            StructureKind::Settlement => 1,
            StructureKind::City => 2,
        }
    }
}

/// Corner of a pointy-top hex, clockwise from the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum NodeRef {
    North,
    NorthEast,
    SouthEast,
    South,
    SouthWest,
    NorthWest,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
pub enum EdgeRef {
    East,
    SouthEast,
    SouthWest,
    West,
    NorthWest,
    NorthEast,
}

pub fn normalize_edge(edge: EdgeId) -> EdgeId {
    if edge.0 <= edge.1 {
        edge
    } else {
        (edge.1, edge.0)
    }
}

pub fn edge_contains_vertex(edge: EdgeId, vertex: VertexId) -> bool {
    edge.0 == vertex || edge.1 == vertex
}
