//! Result types shared by the query and traversal operations

use crate::graph::{Edge, Node, NodeId};
use serde::Serialize;
use std::collections::HashMap;

/// Which adjacency sets a traversal follows from each node.
///
/// Filtering works on the recorded adjacency: an undirected edge is stored
/// outgoing-from-source and incoming-to-target, so under `Outgoing` it is
/// only reachable from its source side. `Both` treats every edge
/// bidirectionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Outgoing,
    Incoming,
    #[default]
    Both,
}

/// Nodes discovered by a breadth-first traversal
#[derive(Debug, Clone)]
pub struct NeighborResult {
    /// Discovered nodes, excluding the start node
    pub nodes: Vec<Node>,
    /// Hop distance from the start at first discovery
    pub distances: HashMap<NodeId, usize>,
    /// Edges traversed during discovery, when requested
    pub edges: Option<Vec<Edge>>,
}

/// An induced subgraph: a node selection plus every edge whose endpoints
/// are both in the selection
#[derive(Debug, Clone, Serialize)]
pub struct Subgraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// Aggregate view of the graph
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphStatistics {
    pub node_count: usize,
    pub edge_count: usize,
    pub nodes_by_type: HashMap<String, usize>,
    pub edges_by_type: HashMap<String, usize>,
    /// Mean incident-edge count per node (0.0 for an empty graph)
    pub average_degree: f64,
    pub max_degree: usize,
    /// Whether every node is reachable from every other, ignoring direction
    pub is_connected: bool,
}
