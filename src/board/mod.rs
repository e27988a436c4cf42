//! Board topology: tiles, vertices, and the road registry.
//!
//! Topology is fixed when the graph is built. Afterwards only vertex
//! occupancy and the road registry change.

use std::collections::{BTreeMap, HashMap};

use itertools::Itertools;
use smallvec::SmallVec;
use strum::IntoEnumIterator;

use crate::coords::{CubeCoord, Direction};
use crate::types::{
    AgentId, EdgeId, EdgeRef, NodeRef, Resource, TileId, VertexId, normalize_edge,
};

mod layout;

pub use layout::{STANDARD_LAYOUT, TileTemplate};

pub const STANDARD_VERTEX_COUNT: usize = 54;
pub const STANDARD_TILE_COUNT: usize = 19;

type NodeMap = HashMap<NodeRef, VertexId>;
type EdgeMap = HashMap<EdgeRef, EdgeId>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub id: TileId,
    /// `None` is the barren desert.
    pub resource: Option<Resource>,
    pub number: u8,
    pub vertices: Vec<VertexId>,
}

impl Tile {
    pub fn is_barren(&self) -> bool {
        self.resource.is_none()
    }

    /// The resource this tile yields on `roll`, if any.
    pub fn produces_on(&self, roll: u8) -> Option<Resource> {
        if self.number == roll { self.resource } else { None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Structure {
    Settlement { owner: AgentId },
    City { owner: AgentId },
}

impl Structure {
    pub fn owner(&self) -> AgentId {
        match self {
            Structure::Settlement { owner } | Structure::City { owner } => *owner,
        }
    }

    /// Cards of a triggered tile's resource this structure collects.
    pub fn yield_multiplier(&self) -> u32 {
        match self {
            Structure::Settlement { .. } => 1,
            Structure::City { .. } => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Vertex {
    pub id: VertexId,
    neighbors: SmallVec<[VertexId; 3]>,
    tiles: SmallVec<[TileId; 3]>,
    pub structure: Option<Structure>,
}

impl Vertex {
    fn new(id: VertexId) -> Self {
        Self {
            id,
            neighbors: SmallVec::new(),
            tiles: SmallVec::new(),
            structure: None,
        }
    }

    pub fn neighbors(&self) -> &[VertexId] {
        &self.neighbors
    }

    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    pub fn is_occupied(&self) -> bool {
        self.structure.is_some()
    }

    pub fn owner(&self) -> Option<AgentId> {
        self.structure.map(|s| s.owner())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MapError {
    #[error("vertex {vertex} has {degree} neighbours; at least 2 required")]
    DeadZone { vertex: VertexId, degree: usize },
    #[error("vertex {from} lists {to} as neighbour but not the reverse")]
    AsymmetricAdjacency { from: VertexId, to: VertexId },
    #[error("vertex {0} is adjacent to itself")]
    SelfLoop(VertexId),
    #[error("reference to vertex {vertex} but the board has only {count}")]
    UnknownVertex { vertex: VertexId, count: usize },
    #[error("tile {tile} touches {count} vertices; expected 6")]
    MalformedTile { tile: TileId, count: usize },
    #[error("tile ids must be 0..n in order; found {found} at position {position}")]
    TileIdMismatch { position: usize, found: TileId },
    #[error("tile {tile} has number {number}; expected 2..=12")]
    InvalidNumber { tile: TileId, number: u8 },
}

#[derive(Debug, Clone)]
pub struct MapGraph {
    tiles: Vec<Tile>,
    vertices: Vec<Vertex>,
    roads: BTreeMap<EdgeId, AgentId>,
}

impl MapGraph {
    /// The 19-tile, 54-vertex default board.
    pub fn standard() -> Result<Self, MapError> {
        Self::from_layout(&STANDARD_LAYOUT)
    }

    /// Lays out hexes in the given order; each hex reuses the corners and
    /// sides of hexes already placed next to it and numbers its fresh corners
    /// clockwise from the top. Placing hexes ring by ring therefore numbers
    /// vertices ring by ring.
    pub fn from_layout(layout: &[TileTemplate]) -> Result<Self, MapError> {
        let mut placed: HashMap<CubeCoord, (NodeMap, EdgeMap)> = HashMap::new();
        let mut tiles = Vec::with_capacity(layout.len());
        let mut edges: Vec<EdgeId> = Vec::new();
        let mut next_vertex: VertexId = 0;

        for (idx, template) in layout.iter().enumerate() {
            let (nodes, tile_edges, autoinc) =
                nodes_and_edges(&placed, template.coord, next_vertex);
            next_vertex = autoinc;
            tiles.push(Tile {
                id: idx as TileId,
                resource: template.resource,
                number: template.number,
                vertices: NodeRef::iter().map(|node| nodes[&node]).collect(),
            });
            edges.extend(tile_edges.values().copied());
            placed.insert(template.coord, (nodes, tile_edges));
        }

        Self::from_parts(tiles, usize::from(next_vertex), &edges)
    }

    /// Builds a graph from explicit tiles and edges and checks its invariants.
    pub fn from_parts(
        tiles: Vec<Tile>,
        vertex_count: usize,
        edges: &[EdgeId],
    ) -> Result<Self, MapError> {
        let mut vertices: Vec<Vertex> = (0..vertex_count)
            .map(|id| Vertex::new(id as VertexId))
            .collect();

        for &(a, b) in edges {
            for v in [a, b] {
                if usize::from(v) >= vertex_count {
                    return Err(MapError::UnknownVertex {
                        vertex: v,
                        count: vertex_count,
                    });
                }
            }
            if a == b {
                return Err(MapError::SelfLoop(a));
            }
            link(&mut vertices[usize::from(a)].neighbors, b);
            link(&mut vertices[usize::from(b)].neighbors, a);
        }
        for vertex in &mut vertices {
            vertex.neighbors.sort_unstable();
        }

        for (position, tile) in tiles.iter().enumerate() {
            if usize::from(tile.id) != position {
                return Err(MapError::TileIdMismatch {
                    position,
                    found: tile.id,
                });
            }
            if !(2..=12).contains(&tile.number) {
                return Err(MapError::InvalidNumber {
                    tile: tile.id,
                    number: tile.number,
                });
            }
            let distinct = tile.vertices.iter().unique().count();
            if tile.vertices.len() != 6 || distinct != 6 {
                return Err(MapError::MalformedTile {
                    tile: tile.id,
                    count: distinct,
                });
            }
            for &v in &tile.vertices {
                let Some(vertex) = vertices.get_mut(usize::from(v)) else {
                    return Err(MapError::UnknownVertex {
                        vertex: v,
                        count: vertex_count,
                    });
                };
                link(&mut vertex.tiles, tile.id);
            }
        }

        let graph = Self {
            tiles,
            vertices,
            roads: BTreeMap::new(),
        };
        graph.validate()?;
        Ok(graph)
    }

    fn validate(&self) -> Result<(), MapError> {
        for vertex in &self.vertices {
            if vertex.neighbors.len() < 2 {
                return Err(MapError::DeadZone {
                    vertex: vertex.id,
                    degree: vertex.neighbors.len(),
                });
            }
            for &other in &vertex.neighbors {
                if !self.vertices[usize::from(other)].neighbors.contains(&vertex.id) {
                    return Err(MapError::AsymmetricAdjacency {
                        from: vertex.id,
                        to: other,
                    });
                }
            }
        }
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.get(usize::from(id))
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn vertex(&self, id: VertexId) -> Option<&Vertex> {
        self.vertices.get(usize::from(id))
    }

    pub fn adjacent_vertices(&self, v: VertexId) -> &[VertexId] {
        self.vertex(v).map(Vertex::neighbors).unwrap_or(&[])
    }

    pub fn are_adjacent(&self, a: VertexId, b: VertexId) -> bool {
        self.adjacent_vertices(a).contains(&b)
    }

    pub fn tiles_covering_vertex(&self, v: VertexId) -> impl Iterator<Item = &Tile> + '_ {
        self.vertex(v)
            .map(Vertex::tiles)
            .unwrap_or(&[])
            .iter()
            .filter_map(|id| self.tile(*id))
    }

    pub fn vertices_of_tile(&self, t: TileId) -> &[VertexId] {
        self.tile(t).map(|tile| tile.vertices.as_slice()).unwrap_or(&[])
    }

    /// Every undirected edge once, ascending.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.vertices.iter().flat_map(|vertex| {
            vertex
                .neighbors
                .iter()
                .filter(move |&&other| vertex.id < other)
                .map(move |&other| (vertex.id, other))
        })
    }

    pub fn structure_at(&self, v: VertexId) -> Option<Structure> {
        self.vertex(v).and_then(|vertex| vertex.structure)
    }

    pub(crate) fn set_structure(&mut self, v: VertexId, structure: Structure) {
        if let Some(vertex) = self.vertices.get_mut(usize::from(v)) {
            vertex.structure = Some(structure);
        }
    }

    pub fn roads(&self) -> &BTreeMap<EdgeId, AgentId> {
        &self.roads
    }

    pub fn road_owner(&self, a: VertexId, b: VertexId) -> Option<AgentId> {
        self.roads.get(&normalize_edge((a, b))).copied()
    }

    pub(crate) fn place_road(&mut self, a: VertexId, b: VertexId, owner: AgentId) {
        self.roads.insert(normalize_edge((a, b)), owner);
    }

    pub fn occupied_vertices(&self) -> impl Iterator<Item = &Vertex> + '_ {
        self.vertices.iter().filter(|vertex| vertex.is_occupied())
    }
}

fn link<A: smallvec::Array>(list: &mut SmallVec<A>, item: A::Item)
where
    A::Item: PartialEq,
{
    if !list.contains(&item) {
        list.push(item);
    }
}

fn nodes_and_edges(
    placed: &HashMap<CubeCoord, (NodeMap, EdgeMap)>,
    coordinate: CubeCoord,
    mut autoinc: VertexId,
) -> (NodeMap, EdgeMap, VertexId) {
    let mut nodes: HashMap<NodeRef, VertexId> = HashMap::new();
    let mut edges: HashMap<EdgeRef, EdgeId> = HashMap::new();

    for direction in Direction::iter() {
        let Some((their_nodes, their_edges)) = placed.get(&coordinate.neighbor(direction)) else {
            continue;
        };
        let (shared, (mine, theirs)) = shared_with(direction);
        for (my_node, their_node) in shared {
            nodes.insert(my_node, their_nodes[&their_node]);
        }
        edges.insert(mine, their_edges[&theirs]);
    }

    for node in NodeRef::iter() {
        nodes.entry(node).or_insert_with(|| {
            let id = autoinc;
            autoinc += 1;
            id
        });
    }

    for edge in EdgeRef::iter() {
        edges.entry(edge).or_insert_with(|| {
            let (a, b) = edge_nodes(edge);
            normalize_edge((nodes[&a], nodes[&b]))
        });
    }

    (nodes, edges, autoinc)
}

/// Corners and side shared with the neighbour in `direction`, as
/// (mine, theirs) pairs.
fn shared_with(direction: Direction) -> ([(NodeRef, NodeRef); 2], (EdgeRef, EdgeRef)) {
    use NodeRef as N;
    match direction {
        Direction::East => (
            [(N::NorthEast, N::NorthWest), (N::SouthEast, N::SouthWest)],
            (EdgeRef::East, EdgeRef::West),
        ),
        Direction::SouthEast => (
            [(N::South, N::NorthWest), (N::SouthEast, N::North)],
            (EdgeRef::SouthEast, EdgeRef::NorthWest),
        ),
        Direction::SouthWest => (
            [(N::South, N::NorthEast), (N::SouthWest, N::North)],
            (EdgeRef::SouthWest, EdgeRef::NorthEast),
        ),
        Direction::West => (
            [(N::NorthWest, N::NorthEast), (N::SouthWest, N::SouthEast)],
            (EdgeRef::West, EdgeRef::East),
        ),
        Direction::NorthWest => (
            [(N::North, N::SouthEast), (N::NorthWest, N::South)],
            (EdgeRef::NorthWest, EdgeRef::SouthEast),
        ),
        Direction::NorthEast => (
            [(N::North, N::SouthWest), (N::NorthEast, N::South)],
            (EdgeRef::NorthEast, EdgeRef::SouthWest),
        ),
    }
}

fn edge_nodes(edge_ref: EdgeRef) -> (NodeRef, NodeRef) {
    match edge_ref {
        EdgeRef::East => (NodeRef::NorthEast, NodeRef::SouthEast),
        EdgeRef::SouthEast => (NodeRef::SouthEast, NodeRef::South),
        EdgeRef::SouthWest => (NodeRef::South, NodeRef::SouthWest),
        EdgeRef::West => (NodeRef::SouthWest, NodeRef::NorthWest),
        EdgeRef::NorthWest => (NodeRef::NorthWest, NodeRef::North),
        EdgeRef::NorthEast => (NodeRef::North, NodeRef::NorthEast),
    }
}
