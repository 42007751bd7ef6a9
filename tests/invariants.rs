//! Randomized operation sequences checking the structural invariants
//!
//! After every mutation the graph must satisfy: (1) every edge's endpoints
//! exist, and (2) the incident set of each node is exactly the union of its
//! outgoing and incoming sets. Both are observable through the public API
//! via queries and statistics.

use lattice::{Direction, Edge, EdgeQuery, KnowledgeGraph, NeighborOptions, Node};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn assert_invariants(graph: &KnowledgeGraph) {
    for edge in graph.get_edges() {
        assert!(
            graph.has_node(&edge.source),
            "edge {} has missing source {}",
            edge.id,
            edge.source
        );
        assert!(
            graph.has_node(&edge.target),
            "edge {} has missing target {}",
            edge.id,
            edge.target
        );
    }

    // per node, edges seen via Both at depth 1 must equal the edges whose
    // endpoint sets mention the node
    for node in graph.get_nodes() {
        let result = graph
            .get_neighbors(
                &node.id,
                &NeighborOptions::new()
                    .direction(Direction::Both)
                    .include_edges(),
            )
            .unwrap();
        let mut traversed: Vec<String> = result
            .edges
            .unwrap()
            .iter()
            .map(|e| e.id.to_string())
            .collect();
        traversed.sort();

        let mut incident: Vec<String> = graph
            .get_edges()
            .iter()
            .filter(|e| e.source == node.id || e.target == node.id)
            .map(|e| e.id.to_string())
            .collect();
        incident.sort();
        incident.dedup();

        assert_eq!(traversed, incident, "adjacency mismatch at node {}", node.id);
    }
}

#[test]
fn random_mutation_sequences_preserve_structure() {
    let mut rng = StdRng::seed_from_u64(0x1a77);
    let mut graph = KnowledgeGraph::new();
    let mut next_node = 0usize;
    let mut next_edge = 0usize;

    for _ in 0..300 {
        match rng.gen_range(0..10) {
            // add a node (weighted high so the graph grows)
            0..=3 => {
                let id = format!("n{next_node}");
                next_node += 1;
                graph.add_node(Node::new(id, "Thing", "thing")).unwrap();
            }
            // add an edge between two random existing nodes
            4..=6 => {
                if graph.node_count() >= 2 {
                    let nodes = graph.get_nodes();
                    let source = &nodes[rng.gen_range(0..nodes.len())].id;
                    let target = &nodes[rng.gen_range(0..nodes.len())].id;
                    let id = format!("e{next_edge}");
                    next_edge += 1;
                    graph
                        .add_edge(Edge::new(id, "linked", source.clone(), target.clone()))
                        .unwrap();
                }
            }
            // delete a random node (cascades)
            7..=8 => {
                let nodes = graph.get_nodes();
                if !nodes.is_empty() {
                    let victim = nodes[rng.gen_range(0..nodes.len())].id.clone();
                    let incident = graph
                        .get_edges()
                        .iter()
                        .filter(|e| e.source == victim || e.target == victim)
                        .count();
                    let before = graph.edge_count();
                    graph.delete_node(&victim).unwrap();
                    assert_eq!(graph.edge_count(), before - incident);
                }
            }
            // delete a random edge
            _ => {
                let edges = graph.get_edges();
                if !edges.is_empty() {
                    let victim = edges[rng.gen_range(0..edges.len())].id.clone();
                    graph.delete_edge(&victim).unwrap();
                }
            }
        }
        assert_invariants(&graph);
    }
}

#[test]
fn type_index_stays_in_sync_under_churn() {
    let mut rng = StdRng::seed_from_u64(0xbeef);
    let mut graph = KnowledgeGraph::new();
    let types = ["alpha", "beta", "gamma"];

    for i in 0..50 {
        let node_type = types[rng.gen_range(0..types.len())];
        graph
            .add_node(Node::new(format!("n{i}"), node_type, "node"))
            .unwrap();
    }
    for i in 0..40 {
        let edge_type = types[rng.gen_range(0..types.len())];
        let source = format!("n{}", rng.gen_range(0..50));
        let target = format!("n{}", rng.gen_range(0..50));
        graph
            .add_edge(Edge::new(format!("e{i}"), edge_type, source, target))
            .unwrap();
    }

    let stats = graph.statistics();
    for edge_type in types {
        let via_query = graph
            .query_edges(&EdgeQuery::new().with_type(edge_type))
            .len();
        let via_stats = stats.edges_by_type.get(edge_type).copied().unwrap_or(0);
        assert_eq!(via_query, via_stats);
    }
    let total: usize = stats.nodes_by_type.values().sum();
    assert_eq!(total, stats.node_count);
}
