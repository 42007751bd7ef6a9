//! Lattice: In-Process Indexed Property-Graph Engine
//!
//! A mutable, typed property graph with always-consistent secondary indices,
//! filtered queries, bounded-depth traversal, optional schema validation,
//! and synchronous change notifications.
//!
//! # Core Concepts
//!
//! - **Nodes**: Typed entities with a label and free-form properties
//! - **Edges**: Typed, directed-or-undirected relationships between nodes
//! - **Graphs**: Self-contained stores; a registry can hold many of them
//!
//! # Example
//!
//! ```
//! use lattice::{Edge, KnowledgeGraph, Node};
//!
//! let mut graph = KnowledgeGraph::new();
//! graph.add_node(Node::new("1", "Person", "Alice")).unwrap();
//! graph.add_node(Node::new("2", "Person", "Bob")).unwrap();
//! graph.add_edge(Edge::new("e1", "knows", "1", "2")).unwrap();
//!
//! assert_eq!(graph.node_count(), 2);
//! assert_eq!(graph.statistics().average_degree, 1.0);
//! ```

mod graph;
pub mod query;

pub use graph::{
    Edge, EdgeId, EdgePatch, EdgeTypeDefinition, GraphChange, GraphData, GraphEngine, GraphError,
    GraphEvent, GraphId, GraphMetadata, GraphResult, KnowledgeGraph, Node, NodeId, NodePatch,
    NodeTypeDefinition, Position, Properties, PropertyDefinition, PropertyValue, SchemaDefinition,
    SchemaViolation, SubscriptionId,
};
pub use query::{
    Direction, EdgeQuery, GraphStatistics, NeighborOptions, NeighborResult, NodeQuery,
    SortDirection, Subgraph, SubgraphOptions,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
