//! Error taxonomy and the multi-graph registry

use super::graph::KnowledgeGraph;
use super::schema::SchemaViolation;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

/// Errors returned by graph operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("a node with id '{0}' already exists")]
    DuplicateNodeId(String),

    #[error("an edge with id '{0}' already exists")]
    DuplicateEdgeId(String),

    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("edge not found: {0}")]
    EdgeNotFound(String),

    #[error("edge source node does not exist: {0}")]
    DanglingSource(String),

    #[error("edge target node does not exist: {0}")]
    DanglingTarget(String),

    #[error("graph not found: {0}")]
    GraphNotFound(String),

    #[error("schema violation: {0}")]
    Schema(#[from] SchemaViolation),
}

/// Result type for graph operations
pub type GraphResult<T> = Result<T, GraphError>;

/// Unique identifier for a graph held by the registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GraphId(String);

impl GraphId {
    /// Create a new random GraphId (UUID-based)
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create a GraphId from a string (semantic ID)
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for GraphId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GraphId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for GraphId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for GraphId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Registry holding multiple named graphs.
///
/// Reads return deep copies; in-place mutation goes through
/// `with_graph_mut`, which holds the map shard lock for the duration of the
/// closure.
#[derive(Debug, Default)]
pub struct GraphEngine {
    graphs: DashMap<GraphId, KnowledgeGraph>,
}

impl GraphEngine {
    pub fn new() -> Self {
        Self {
            graphs: DashMap::new(),
        }
    }

    /// Insert or replace a graph under the given id
    pub fn upsert_graph(&self, id: impl Into<GraphId>, graph: KnowledgeGraph) -> GraphId {
        let id = id.into();
        debug!(graph_id = %id, "upserting graph");
        self.graphs.insert(id.clone(), graph);
        id
    }

    /// Get a deep copy of a graph
    pub fn get_graph(&self, id: &GraphId) -> GraphResult<KnowledgeGraph> {
        self.graphs
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| GraphError::GraphNotFound(id.to_string()))
    }

    /// Run a closure against a graph in place
    pub fn with_graph_mut<T>(
        &self,
        id: &GraphId,
        f: impl FnOnce(&mut KnowledgeGraph) -> T,
    ) -> GraphResult<T> {
        let mut entry = self
            .graphs
            .get_mut(id)
            .ok_or_else(|| GraphError::GraphNotFound(id.to_string()))?;
        Ok(f(entry.value_mut()))
    }

    /// Remove a graph from the registry
    pub fn remove_graph(&self, id: &GraphId) -> GraphResult<()> {
        self.graphs
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| GraphError::GraphNotFound(id.to_string()))
    }

    /// Ids of all registered graphs
    pub fn list_graphs(&self) -> Vec<GraphId> {
        self.graphs.iter().map(|entry| entry.key().clone()).collect()
    }

    /// Number of registered graphs
    pub fn graph_count(&self) -> usize {
        self.graphs.len()
    }

    /// Whether a graph with this id exists
    pub fn has_graph(&self, id: &GraphId) -> bool {
        self.graphs.contains_key(id)
    }
}
