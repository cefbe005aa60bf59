//! The authored room-connectivity graph.
//!
//! Nodes are rooms, edges say which rooms must be joined by a corridor.
//! Adjacency is undirected and stored on both endpoints; every mutation
//! here keeps the two lists in agreement.

use std::collections::{HashMap, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::ENTRANCE_ROOM_TYPE;
use crate::error::GraphError;

/// Category name of a room, e.g. "Entrance", "Boss" or "Generic"
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomType(String);

impl RoomType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn entrance() -> Self {
        Self::new(ENTRANCE_ROOM_TYPE)
    }

    pub fn is_entrance(&self) -> bool {
        self.0 == ENTRANCE_ROOM_TYPE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Identity of a room within one graph
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(pub u32);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Old id → new id, produced whenever a graph is cloned with fresh ids
pub type IdRemap = HashMap<RoomId, RoomId>;

/// A room in the graph and the rooms it must connect to
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoomNode {
    pub id: RoomId,
    pub room_type: RoomType,
    neighbors: Vec<RoomId>,
}

impl RoomNode {
    pub fn neighbors(&self) -> &[RoomId] {
        &self.neighbors
    }

    pub fn degree(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_adjacent(&self, other: RoomId) -> bool {
        self.neighbors.contains(&other)
    }
}

/// Ordered collection of rooms plus the level's global parameters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GraphSpec", into = "GraphSpec")]
pub struct RoomGraph {
    nodes: Vec<RoomNode>,
    next_id: u32,
    /// Width of the area rooms are placed in
    pub width: i32,
    /// Height of the area rooms are placed in
    pub height: i32,
    /// Minimum number of cells between two placed rooms
    pub min_gap: i32,
}

impl RoomGraph {
    pub fn new(width: i32, height: i32, min_gap: i32) -> Self {
        Self {
            nodes: Vec::new(),
            next_id: 0,
            width,
            height,
            min_gap,
        }
    }

    /// A graph with no placement parameters, as used for rule replacements
    pub fn fragment() -> Self {
        Self::new(0, 0, 0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[RoomNode] {
        &self.nodes
    }

    pub fn node(&self, id: RoomId) -> Option<&RoomNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn contains(&self, id: RoomId) -> bool {
        self.node(id).is_some()
    }

    fn index_of(&self, id: RoomId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    /// Add an unconnected room with a fresh id
    pub fn add_room(&mut self, room_type: impl Into<RoomType>) -> RoomId {
        let id = RoomId(self.next_id);
        self.next_id += 1;
        self.nodes.push(RoomNode {
            id,
            room_type: room_type.into(),
            neighbors: Vec::new(),
        });
        id
    }

    /// Connect two rooms, recording the edge on both ends
    pub fn connect(&mut self, a: RoomId, b: RoomId) -> Result<(), GraphError> {
        if a == b {
            return Err(GraphError::SelfLoop(a));
        }
        let ia = self.index_of(a).ok_or(GraphError::UnknownNode(a))?;
        let ib = self.index_of(b).ok_or(GraphError::UnknownNode(b))?;
        if self.nodes[ia].is_adjacent(b) {
            return Err(GraphError::DuplicateEdge(a, b));
        }
        self.nodes[ia].neighbors.push(b);
        self.nodes[ib].neighbors.push(a);
        Ok(())
    }

    /// Remove the edge between two rooms if present
    pub fn disconnect(&mut self, a: RoomId, b: RoomId) {
        if let Some(ia) = self.index_of(a) {
            self.nodes[ia].neighbors.retain(|&n| n != b);
        }
        if let Some(ib) = self.index_of(b) {
            self.nodes[ib].neighbors.retain(|&n| n != a);
        }
    }

    /// Remove a room and every edge touching it
    pub fn remove_room(&mut self, id: RoomId) -> Option<RoomNode> {
        let index = self.index_of(id)?;
        let node = self.nodes.remove(index);
        for neighbor in &node.neighbors {
            if let Some(i) = self.index_of(*neighbor) {
                self.nodes[i].neighbors.retain(|&n| n != id);
            }
        }
        Some(node)
    }

    /// Move every external edge of `from` onto `to`.
    ///
    /// Each neighbor's back-reference is rewritten in place, so its neighbor
    /// order is preserved. `from` is left with no edges.
    pub fn transfer_edges(&mut self, from: RoomId, to: RoomId) -> Result<(), GraphError> {
        let i_from = self.index_of(from).ok_or(GraphError::UnknownNode(from))?;
        let i_to = self.index_of(to).ok_or(GraphError::UnknownNode(to))?;
        let moved = std::mem::take(&mut self.nodes[i_from].neighbors);
        for neighbor in moved {
            if neighbor == to {
                self.nodes[i_to].neighbors.retain(|&n| n != from);
                continue;
            }
            let i_n = self.index_of(neighbor).ok_or(GraphError::UnknownNode(neighbor))?;
            let already = self.nodes[i_n].is_adjacent(to);
            let list = &mut self.nodes[i_n].neighbors;
            if already {
                list.retain(|&n| n != from);
            } else {
                for n in list.iter_mut().filter(|n| **n == from) {
                    *n = to;
                }
                self.nodes[i_to].neighbors.push(neighbor);
            }
        }
        Ok(())
    }

    /// Append a fresh copy of `other`, giving its rooms new ids in this graph.
    pub fn absorb(&mut self, other: &RoomGraph) -> Result<IdRemap, GraphError> {
        other.validate()?;
        let mut remap = IdRemap::with_capacity(other.len());
        for node in &other.nodes {
            let id = self.add_room(node.room_type.clone());
            remap.insert(node.id, id);
        }
        for node in &other.nodes {
            let index = self
                .index_of(remap[&node.id])
                .ok_or(GraphError::UnknownNode(node.id))?;
            self.nodes[index].neighbors = node.neighbors.iter().map(|n| remap[n]).collect();
        }
        Ok(remap)
    }

    /// The single Entrance room.
    pub fn entrance(&self) -> Result<RoomId, GraphError> {
        let mut entrances = self.nodes.iter().filter(|n| n.room_type.is_entrance());
        let first = entrances.next().ok_or(GraphError::MissingEntrance)?;
        let extra = entrances.count();
        if extra > 0 {
            return Err(GraphError::MultipleEntrances { count: extra + 1 });
        }
        Ok(first.id)
    }

    /// Every edge once, as `(lower id, higher id)`, in node order
    pub fn edges(&self) -> Vec<(RoomId, RoomId)> {
        let mut edges = Vec::new();
        for node in &self.nodes {
            for &n in &node.neighbors {
                if node.id < n {
                    edges.push((node.id, n));
                }
            }
        }
        edges
    }

    /// Check ids are unique and adjacency is loop-free, duplicate-free and symmetric.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.id) {
                return Err(GraphError::DuplicateId(node.id));
            }
        }
        for node in &self.nodes {
            let mut listed = HashSet::with_capacity(node.neighbors.len());
            for &n in &node.neighbors {
                if n == node.id {
                    return Err(GraphError::SelfLoop(n));
                }
                if !listed.insert(n) {
                    return Err(GraphError::DuplicateEdge(node.id, n));
                }
                let other = self.node(n).ok_or(GraphError::UnknownNode(n))?;
                if !other.is_adjacent(node.id) {
                    return Err(GraphError::Asymmetric { a: node.id, b: n });
                }
            }
        }
        Ok(())
    }
}

/// Deep-clone a graph with fresh ids and remapped adjacency.
///
/// The clone shares nothing with the input; ids are renumbered from zero in
/// node order, which keeps clones of the same graph identical.
pub fn clone_graph(graph: &RoomGraph) -> Result<(RoomGraph, IdRemap), GraphError> {
    let mut clone = RoomGraph::new(graph.width, graph.height, graph.min_gap);
    let remap = clone.absorb(graph)?;
    Ok((clone, remap))
}

#[derive(Serialize, Deserialize)]
struct RoomSpec {
    id: RoomId,
    #[serde(rename = "type")]
    room_type: RoomType,
}

/// Serialized graph: rooms plus an edge list
#[derive(Serialize, Deserialize)]
struct GraphSpec {
    #[serde(default)]
    width: i32,
    #[serde(default)]
    height: i32,
    #[serde(default)]
    min_gap: i32,
    rooms: Vec<RoomSpec>,
    #[serde(default)]
    edges: Vec<(RoomId, RoomId)>,
}

impl TryFrom<GraphSpec> for RoomGraph {
    type Error = GraphError;

    fn try_from(spec: GraphSpec) -> Result<Self, Self::Error> {
        let mut graph = RoomGraph::new(spec.width, spec.height, spec.min_gap);
        let mut seen = HashSet::new();
        for room in spec.rooms {
            if !seen.insert(room.id) {
                return Err(GraphError::DuplicateId(room.id));
            }
            graph.nodes.push(RoomNode {
                id: room.id,
                room_type: room.room_type,
                neighbors: Vec::new(),
            });
            graph.next_id = graph.next_id.max(room.id.0 + 1);
        }
        for (a, b) in spec.edges {
            graph.connect(a, b)?;
        }
        Ok(graph)
    }
}

impl From<RoomGraph> for GraphSpec {
    fn from(graph: RoomGraph) -> Self {
        let edges = graph.edges();
        GraphSpec {
            width: graph.width,
            height: graph.height,
            min_gap: graph.min_gap,
            rooms: graph
                .nodes
                .into_iter()
                .map(|n| RoomSpec {
                    id: n.id,
                    room_type: n.room_type,
                })
                .collect(),
            edges,
        }
    }
}
