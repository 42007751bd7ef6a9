//! Breadth-first neighbor discovery and induced-subgraph extraction

use super::types::{Direction, NeighborResult, Subgraph};
use crate::graph::{Edge, EdgeId, GraphError, GraphResult, KnowledgeGraph, NodeId};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// Options for `get_neighbors`
#[derive(Debug, Clone)]
pub struct NeighborOptions {
    pub direction: Direction,
    /// Only follow edges of these types (None = all types)
    pub edge_types: Option<Vec<String>>,
    /// Maximum hop distance from the start node
    pub depth: usize,
    /// Include the traversed edges in the result
    pub include_edges: bool,
}

impl Default for NeighborOptions {
    fn default() -> Self {
        Self {
            direction: Direction::Both,
            edge_types: None,
            depth: 1,
            include_edges: false,
        }
    }
}

impl NeighborOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_edge_type(mut self, edge_type: impl Into<String>) -> Self {
        self.edge_types
            .get_or_insert_with(Vec::new)
            .push(edge_type.into());
        self
    }

    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn include_edges(mut self) -> Self {
        self.include_edges = true;
        self
    }

    fn allows(&self, edge: &Edge) -> bool {
        match &self.edge_types {
            Some(types) => types.iter().any(|t| *t == edge.edge_type),
            None => true,
        }
    }
}

/// Edge ids leaving `node` under the requested direction, using the
/// recorded adjacency sets
fn adjacent_edges<'a>(
    graph: &'a KnowledgeGraph,
    node: &NodeId,
    direction: Direction,
) -> Vec<&'a EdgeId> {
    let mut ids = Vec::new();
    if matches!(direction, Direction::Outgoing | Direction::Both) {
        if let Some(set) = graph.outgoing(node) {
            ids.extend(set.iter());
        }
    }
    if matches!(direction, Direction::Incoming | Direction::Both) {
        if let Some(set) = graph.incoming(node) {
            ids.extend(set.iter());
        }
    }
    ids
}

/// Breadth-first discovery of nodes within `options.depth` hops of `start`.
///
/// The start node is never part of the result; each discovered node is
/// reported once with its first-discovery distance.
pub(crate) fn neighbors(
    graph: &KnowledgeGraph,
    start: &NodeId,
    options: &NeighborOptions,
) -> GraphResult<NeighborResult> {
    if !graph.has_node(start) {
        return Err(GraphError::NodeNotFound(start.to_string()));
    }

    let mut visited: HashSet<NodeId> = HashSet::from([start.clone()]);
    let mut distances: HashMap<NodeId, usize> = HashMap::new();
    let mut traversed: Vec<Edge> = Vec::new();
    let mut seen_edges: HashSet<EdgeId> = HashSet::new();
    let mut queue: VecDeque<(NodeId, usize)> = VecDeque::from([(start.clone(), 0)]);

    while let Some((current, dist)) = queue.pop_front() {
        if dist >= options.depth {
            continue;
        }
        for edge_id in adjacent_edges(graph, &current, options.direction) {
            let Some(edge) = graph.edge_ref(edge_id) else {
                continue;
            };
            if !options.allows(edge) {
                continue;
            }
            if options.include_edges && seen_edges.insert(edge_id.clone()) {
                traversed.push(edge.clone());
            }
            let other = if edge.source == current {
                &edge.target
            } else {
                &edge.source
            };
            if visited.insert(other.clone()) {
                distances.insert(other.clone(), dist + 1);
                queue.push_back((other.clone(), dist + 1));
            }
        }
    }

    debug!(start = %start, found = distances.len(), "neighbor traversal");
    let nodes = distances
        .keys()
        .filter_map(|id| graph.node_ref(id).cloned())
        .collect();
    Ok(NeighborResult {
        nodes,
        distances,
        edges: options.include_edges.then_some(traversed),
    })
}

/// Options for `get_subgraph`
#[derive(Debug, Clone)]
pub struct SubgraphOptions {
    /// Expand the seed set this many hops outward (0 = seeds only)
    pub depth: usize,
    pub direction: Direction,
    /// Only expand along edges of these types (None = all types)
    pub edge_types: Option<Vec<String>>,
    /// Stop admitting expansion-discovered nodes once the selection
    /// reaches this size; seeds are never dropped
    pub max_nodes: Option<usize>,
}

impl Default for SubgraphOptions {
    fn default() -> Self {
        Self {
            depth: 0,
            direction: Direction::Both,
            edge_types: None,
            max_nodes: None,
        }
    }
}

impl SubgraphOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_edge_type(mut self, edge_type: impl Into<String>) -> Self {
        self.edge_types
            .get_or_insert_with(Vec::new)
            .push(edge_type.into());
        self
    }

    pub fn max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = Some(max_nodes);
        self
    }
}

/// The subgraph induced by `seeds`, optionally expanded `options.depth`
/// hops outward.
///
/// Unknown seed ids are silently dropped. The induced edge set contains
/// every edge whose endpoints are both selected, whether or not the
/// expansion walked it.
pub(crate) fn subgraph(
    graph: &KnowledgeGraph,
    seeds: &[NodeId],
    options: &SubgraphOptions,
) -> Subgraph {
    let cap = options.max_nodes.unwrap_or(usize::MAX);
    let mut selected: HashSet<NodeId> = HashSet::new();

    // seeds are always admitted; the cap only limits expansion
    for seed in seeds {
        if graph.has_node(seed) {
            selected.insert(seed.clone());
        }
    }

    if options.depth > 0 {
        let neighbor_options = NeighborOptions {
            direction: options.direction,
            edge_types: options.edge_types.clone(),
            depth: options.depth,
            include_edges: false,
        };
        // expand from the admitted seeds, capped as we go
        let frontier: Vec<NodeId> = selected.iter().cloned().collect();
        'expansion: for seed in frontier {
            let Ok(result) = neighbors(graph, &seed, &neighbor_options) else {
                continue;
            };
            let mut discovered: Vec<(NodeId, usize)> = result.distances.into_iter().collect();
            // admit closer nodes first so the cap cuts the fringe
            discovered.sort_by_key(|(_, dist)| *dist);
            for (id, _) in discovered {
                if selected.len() >= cap {
                    break 'expansion;
                }
                selected.insert(id);
            }
        }
    }

    let mut edges: Vec<Edge> = Vec::new();
    let mut seen_edges: HashSet<EdgeId> = HashSet::new();
    for id in &selected {
        if let Some(incident) = graph.incident(id) {
            for edge_id in incident {
                if !seen_edges.insert(edge_id.clone()) {
                    continue;
                }
                let Some(edge) = graph.edge_ref(edge_id) else {
                    continue;
                };
                if selected.contains(&edge.source) && selected.contains(&edge.target) {
                    edges.push(edge.clone());
                }
            }
        }
    }

    debug!(
        seeds = seeds.len(),
        nodes = selected.len(),
        edges = edges.len(),
        "subgraph extraction"
    );
    let nodes = selected
        .iter()
        .filter_map(|id| graph.node_ref(id).cloned())
        .collect();
    Subgraph { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Edge, KnowledgeGraph, Node};

    fn chain_graph() -> KnowledgeGraph {
        // 1 -> 2 -> 3 -> 4, plus a shortcut 1 -> 3
        let mut graph = KnowledgeGraph::new();
        for id in ["1", "2", "3", "4"] {
            graph.add_node(Node::new(id, "Person", id)).unwrap();
        }
        graph.add_edge(Edge::new("e12", "knows", "1", "2")).unwrap();
        graph.add_edge(Edge::new("e23", "knows", "2", "3")).unwrap();
        graph.add_edge(Edge::new("e34", "knows", "3", "4")).unwrap();
        graph.add_edge(Edge::new("e13", "knows", "1", "3")).unwrap();
        graph
    }

    fn ids(result: &NeighborResult) -> Vec<&str> {
        let mut ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
        ids.sort();
        ids
    }

    #[test]
    fn depth_one_outgoing() {
        let graph = chain_graph();
        let result = graph
            .get_neighbors(
                &"1".into(),
                &NeighborOptions::new().direction(Direction::Outgoing),
            )
            .unwrap();
        assert_eq!(ids(&result), vec!["2", "3"]);
        assert_eq!(result.distances[&"2".into()], 1);
        assert_eq!(result.distances[&"3".into()], 1);
    }

    #[test]
    fn shortest_distance_wins_over_longer_paths() {
        let graph = chain_graph();
        let result = graph
            .get_neighbors(
                &"1".into(),
                &NeighborOptions::new()
                    .direction(Direction::Outgoing)
                    .depth(3),
            )
            .unwrap();
        // node 3 is reachable at distance 2 via node 2, but the shortcut
        // discovers it at distance 1
        assert_eq!(result.distances[&"3".into()], 1);
        assert_eq!(result.distances[&"4".into()], 2);
    }

    #[test]
    fn incoming_follows_reverse_arrows() {
        let graph = chain_graph();
        let result = graph
            .get_neighbors(
                &"3".into(),
                &NeighborOptions::new().direction(Direction::Incoming),
            )
            .unwrap();
        assert_eq!(ids(&result), vec!["1", "2"]);
    }

    #[test]
    fn edge_type_filter_skips_edges_entirely() {
        let mut graph = chain_graph();
        graph
            .add_edge(Edge::new("e14", "blocks", "1", "4"))
            .unwrap();
        let result = graph
            .get_neighbors(
                &"1".into(),
                &NeighborOptions::new().with_edge_type("knows"),
            )
            .unwrap();
        assert!(!result.distances.contains_key(&"4".into()));
    }

    #[test]
    fn include_edges_reports_each_edge_once() {
        let graph = chain_graph();
        let result = graph
            .get_neighbors(&"1".into(), &NeighborOptions::new().depth(3).include_edges())
            .unwrap();
        let edges = result.edges.unwrap();
        let mut edge_ids: Vec<&str> = edges.iter().map(|e| e.id.as_str()).collect();
        edge_ids.sort();
        assert_eq!(edge_ids, vec!["e12", "e13", "e23", "e34"]);
    }

    #[test]
    fn missing_start_node_is_an_error() {
        let graph = chain_graph();
        assert_eq!(
            graph
                .get_neighbors(&"99".into(), &NeighborOptions::new())
                .unwrap_err(),
            GraphError::NodeNotFound("99".into())
        );
    }

    #[test]
    fn undirected_edges_follow_their_recorded_orientation() {
        let mut graph = KnowledgeGraph::new();
        graph.add_node(Node::new("a", "Person", "a")).unwrap();
        graph.add_node(Node::new("b", "Person", "b")).unwrap();
        graph
            .add_edge(Edge::new("e", "knows", "a", "b").undirected())
            .unwrap();

        // recorded as outgoing-from-a, so Outgoing from b finds nothing
        let from_b_out = graph
            .get_neighbors(
                &"b".into(),
                &NeighborOptions::new().direction(Direction::Outgoing),
            )
            .unwrap();
        assert!(from_b_out.nodes.is_empty());

        // Both treats the edge bidirectionally
        let from_b_both = graph
            .get_neighbors(&"b".into(), &NeighborOptions::new())
            .unwrap();
        assert_eq!(ids(&from_b_both), vec!["a"]);
    }

    #[test]
    fn seeds_only_subgraph_is_induced() {
        let graph = chain_graph();
        let result = graph.get_subgraph(&["1".into(), "3".into()], &SubgraphOptions::new());

        let mut node_ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
        node_ids.sort();
        assert_eq!(node_ids, vec!["1", "3"]);

        let edge_ids: Vec<&str> = result.edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(edge_ids, vec!["e13"]);
    }

    #[test]
    fn unknown_seeds_are_silently_dropped() {
        let graph = chain_graph();
        let result = graph.get_subgraph(&["1".into(), "99".into()], &SubgraphOptions::new());
        assert_eq!(result.nodes.len(), 1);
        assert!(result.edges.is_empty());
    }

    #[test]
    fn expansion_respects_max_nodes() {
        let graph = chain_graph();
        let result = graph.get_subgraph(
            &["1".into()],
            &SubgraphOptions::new().depth(3).max_nodes(2),
        );
        assert_eq!(result.nodes.len(), 2);
    }

    #[test]
    fn max_nodes_never_drops_seeds() {
        let graph = chain_graph();
        let seeds = ["1".into(), "2".into(), "3".into()];

        let result = graph.get_subgraph(&seeds, &SubgraphOptions::new().max_nodes(2));
        assert_eq!(result.nodes.len(), 3);

        // expansion may add nothing once the seeds exceed the cap, but the
        // seeds themselves all stay selected
        let result = graph.get_subgraph(&seeds, &SubgraphOptions::new().depth(1).max_nodes(2));
        let mut ids: Vec<&str> = result.nodes.iter().map(|n| n.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn expanded_subgraph_includes_unwalked_induced_edges() {
        let graph = chain_graph();
        let result = graph.get_subgraph(
            &["1".into()],
            &SubgraphOptions::new()
                .depth(1)
                .direction(Direction::Outgoing),
        );
        let mut edge_ids: Vec<&str> = result.edges.iter().map(|e| e.id.as_str()).collect();
        edge_ids.sort();
        // e23 connects two selected nodes even though expansion stopped at depth 1
        assert_eq!(edge_ids, vec!["e12", "e13", "e23"]);
    }
}
