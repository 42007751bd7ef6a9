//! Primary in-memory graph store with derived indices
//!
//! `KnowledgeGraph` owns the node and edge maps plus five derived indices
//! (nodes by type, edges by type, incident/outgoing/incoming edges per node).
//! Every mutation keeps the indices consistent before any event is emitted,
//! so listeners always observe a coherent graph.

use super::edge::{Edge, EdgeId, EdgePatch};
use super::engine::{GraphError, GraphResult};
use super::event::{GraphChange, GraphEvent, ListenerSet, SubscriptionId};
use super::node::{Node, NodeId, NodePatch, Properties};
use super::schema::SchemaDefinition;
use crate::query::{
    neighbors, subgraph, EdgeQuery, GraphStatistics, NeighborOptions, NeighborResult, NodeQuery,
    Subgraph, SubgraphOptions,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// Descriptive metadata carried alongside the graph content
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Free-form extension fields
    #[serde(flatten)]
    pub extra: Properties,
}

/// Serializable snapshot used to seed or export a whole graph
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<SchemaDefinition>,
    #[serde(default)]
    pub metadata: GraphMetadata,
}

/// Mutable, indexed property graph.
///
/// All read operations hand out owned copies; the internal stores are never
/// exposed by reference. Mutation requires `&mut self`, so listeners can
/// never re-enter the graph during event delivery.
pub struct KnowledgeGraph {
    nodes: HashMap<NodeId, Node>,
    edges: HashMap<EdgeId, Edge>,
    nodes_by_type: HashMap<String, HashSet<NodeId>>,
    edges_by_type: HashMap<String, HashSet<EdgeId>>,
    edges_by_node: HashMap<NodeId, HashSet<EdgeId>>,
    outgoing_edges: HashMap<NodeId, HashSet<EdgeId>>,
    incoming_edges: HashMap<NodeId, HashSet<EdgeId>>,
    schema: Option<SchemaDefinition>,
    metadata: GraphMetadata,
    listeners: ListenerSet,
}

impl Default for KnowledgeGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for KnowledgeGraph {
    /// Deep copy of nodes, edges, indices, schema, and metadata.
    ///
    /// Listeners are NOT carried over: the clone starts with an empty
    /// listener set.
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            nodes_by_type: self.nodes_by_type.clone(),
            edges_by_type: self.edges_by_type.clone(),
            edges_by_node: self.edges_by_node.clone(),
            outgoing_edges: self.outgoing_edges.clone(),
            incoming_edges: self.incoming_edges.clone(),
            schema: self.schema.clone(),
            metadata: self.metadata.clone(),
            listeners: ListenerSet::default(),
        }
    }
}

impl std::fmt::Debug for KnowledgeGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KnowledgeGraph")
            .field("nodes", &self.nodes.len())
            .field("edges", &self.edges.len())
            .field("schema", &self.schema.is_some())
            .field("listeners", &self.listeners)
            .finish()
    }
}

impl KnowledgeGraph {
    /// Create an empty graph with no schema
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: HashMap::new(),
            nodes_by_type: HashMap::new(),
            edges_by_type: HashMap::new(),
            edges_by_node: HashMap::new(),
            outgoing_edges: HashMap::new(),
            incoming_edges: HashMap::new(),
            schema: None,
            metadata: GraphMetadata {
                created_at: Some(Utc::now()),
                ..Default::default()
            },
            listeners: ListenerSet::default(),
        }
    }

    /// Create an empty graph with an attached schema.
    ///
    /// The schema cannot be changed later; all subsequent inserts and
    /// updates are validated against it.
    pub fn with_schema(schema: SchemaDefinition) -> Self {
        let mut graph = Self::new();
        graph.schema = Some(schema);
        graph
    }

    /// Build a graph from a snapshot.
    ///
    /// Seed records flow through the same validated insert paths as later
    /// calls, so a snapshot that violates its own schema or references
    /// missing endpoints fails construction with the same error the live
    /// call would produce. No events are emitted (nothing can have
    /// subscribed yet).
    pub fn with_data(data: GraphData) -> GraphResult<Self> {
        let mut graph = match data.schema {
            Some(schema) => Self::with_schema(schema),
            None => Self::new(),
        };
        graph.metadata = data.metadata;
        for node in data.nodes {
            graph.add_node(node)?;
        }
        for edge in data.edges {
            graph.add_edge(edge)?;
        }
        Ok(graph)
    }

    /// Export the graph content as a snapshot
    pub fn to_data(&self) -> GraphData {
        GraphData {
            nodes: self.nodes.values().cloned().collect(),
            edges: self.edges.values().cloned().collect(),
            schema: self.schema.clone(),
            metadata: self.metadata.clone(),
        }
    }

    // ---- nodes ----

    /// Insert a new node.
    ///
    /// Fails with `DuplicateNodeId` if the id is taken, or with a schema
    /// violation if a schema is attached and rejects the node. On failure
    /// the graph is unchanged and no event is emitted.
    pub fn add_node(&mut self, node: Node) -> GraphResult<()> {
        if self.nodes.contains_key(&node.id) {
            return Err(GraphError::DuplicateNodeId(node.id.to_string()));
        }
        if let Some(schema) = &self.schema {
            schema.validate_node(&node)?;
        }

        self.nodes_by_type
            .entry(node.node_type.clone())
            .or_default()
            .insert(node.id.clone());
        self.edges_by_node.entry(node.id.clone()).or_default();
        self.outgoing_edges.entry(node.id.clone()).or_default();
        self.incoming_edges.entry(node.id.clone()).or_default();

        debug!(node_id = %node.id, node_type = %node.node_type, "node added");
        let stored = node.clone();
        self.nodes.insert(node.id.clone(), node);
        self.touch();
        self.emit(GraphChange::NodeAdded(stored));
        Ok(())
    }

    /// Apply a patch to an existing node, returning the updated copy.
    ///
    /// If the patch changes the node type, the type index is re-bucketed
    /// and empty buckets are pruned. Schema validation runs on the merged
    /// record before anything is committed.
    pub fn update_node(&mut self, id: &NodeId, patch: NodePatch) -> GraphResult<Node> {
        let mut updated = self
            .nodes
            .get(id)
            .cloned()
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;
        let old_type = updated.node_type.clone();
        patch.apply(&mut updated);

        if let Some(schema) = &self.schema {
            schema.validate_node(&updated)?;
        }

        if updated.node_type != old_type {
            if let Some(bucket) = self.nodes_by_type.get_mut(&old_type) {
                bucket.remove(id);
                if bucket.is_empty() {
                    self.nodes_by_type.remove(&old_type);
                }
            }
            self.nodes_by_type
                .entry(updated.node_type.clone())
                .or_default()
                .insert(id.clone());
        }

        debug!(node_id = %id, "node updated");
        self.nodes.insert(id.clone(), updated.clone());
        self.touch();
        self.emit(GraphChange::NodeUpdated(updated.clone()));
        Ok(updated)
    }

    /// Delete a node and every edge touching it.
    ///
    /// Each cascaded edge goes through the normal edge-deletion path and
    /// emits its own `EdgeDeleted` event before the final `NodeDeleted`.
    pub fn delete_node(&mut self, id: &NodeId) -> GraphResult<()> {
        let node = self
            .nodes
            .get(id)
            .ok_or_else(|| GraphError::NodeNotFound(id.to_string()))?;
        let node_type = node.node_type.clone();

        let incident: Vec<EdgeId> = self
            .edges_by_node
            .get(id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        debug!(node_id = %id, cascade = incident.len(), "node delete cascade");
        for edge_id in incident {
            self.delete_edge(&edge_id)?;
        }

        self.nodes.remove(id);
        if let Some(bucket) = self.nodes_by_type.get_mut(&node_type) {
            bucket.remove(id);
            if bucket.is_empty() {
                self.nodes_by_type.remove(&node_type);
            }
        }
        self.edges_by_node.remove(id);
        self.outgoing_edges.remove(id);
        self.incoming_edges.remove(id);

        self.touch();
        self.emit(GraphChange::NodeDeleted(id.clone()));
        Ok(())
    }

    /// Get a copy of a node
    pub fn get_node(&self, id: &NodeId) -> Option<Node> {
        self.nodes.get(id).cloned()
    }

    /// Whether a node with this id exists
    pub fn has_node(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Copies of every node, in no particular order
    pub fn get_nodes(&self) -> Vec<Node> {
        self.nodes.values().cloned().collect()
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    // ---- edges ----

    /// Insert a new edge.
    ///
    /// Both endpoints must already exist (`DanglingSource`/`DanglingTarget`
    /// otherwise). Schema validation sees the resolved endpoint node types.
    pub fn add_edge(&mut self, edge: Edge) -> GraphResult<()> {
        if self.edges.contains_key(&edge.id) {
            return Err(GraphError::DuplicateEdgeId(edge.id.to_string()));
        }
        let source_type = self
            .nodes
            .get(&edge.source)
            .map(|n| n.node_type.clone())
            .ok_or_else(|| GraphError::DanglingSource(edge.source.to_string()))?;
        let target_type = self
            .nodes
            .get(&edge.target)
            .map(|n| n.node_type.clone())
            .ok_or_else(|| GraphError::DanglingTarget(edge.target.to_string()))?;
        if let Some(schema) = &self.schema {
            schema.validate_edge(&edge, &source_type, &target_type)?;
        }

        self.edges_by_type
            .entry(edge.edge_type.clone())
            .or_default()
            .insert(edge.id.clone());
        self.edges_by_node
            .entry(edge.source.clone())
            .or_default()
            .insert(edge.id.clone());
        self.edges_by_node
            .entry(edge.target.clone())
            .or_default()
            .insert(edge.id.clone());
        self.outgoing_edges
            .entry(edge.source.clone())
            .or_default()
            .insert(edge.id.clone());
        self.incoming_edges
            .entry(edge.target.clone())
            .or_default()
            .insert(edge.id.clone());

        debug!(edge_id = %edge.id, edge_type = %edge.edge_type, "edge added");
        let stored = edge.clone();
        self.edges.insert(edge.id.clone(), edge);
        self.touch();
        self.emit(GraphChange::EdgeAdded(stored));
        Ok(())
    }

    /// Apply a patch to an existing edge, returning the updated copy.
    ///
    /// Endpoints cannot change (the patch type has no such fields), so only
    /// the type index may need re-bucketing.
    pub fn update_edge(&mut self, id: &EdgeId, patch: EdgePatch) -> GraphResult<Edge> {
        let mut updated = self
            .edges
            .get(id)
            .cloned()
            .ok_or_else(|| GraphError::EdgeNotFound(id.to_string()))?;
        let old_type = updated.edge_type.clone();
        patch.apply(&mut updated);

        if let Some(schema) = &self.schema {
            // endpoints are unchanged and were checked on insert
            if let (Some(source), Some(target)) = (
                self.nodes.get(&updated.source),
                self.nodes.get(&updated.target),
            ) {
                schema.validate_edge(&updated, &source.node_type, &target.node_type)?;
            }
        }

        if updated.edge_type != old_type {
            if let Some(bucket) = self.edges_by_type.get_mut(&old_type) {
                bucket.remove(id);
                if bucket.is_empty() {
                    self.edges_by_type.remove(&old_type);
                }
            }
            self.edges_by_type
                .entry(updated.edge_type.clone())
                .or_default()
                .insert(id.clone());
        }

        debug!(edge_id = %id, "edge updated");
        self.edges.insert(id.clone(), updated.clone());
        self.touch();
        self.emit(GraphChange::EdgeUpdated(updated.clone()));
        Ok(updated)
    }

    /// Delete an edge and remove it from every index
    pub fn delete_edge(&mut self, id: &EdgeId) -> GraphResult<()> {
        let edge = self
            .edges
            .remove(id)
            .ok_or_else(|| GraphError::EdgeNotFound(id.to_string()))?;

        if let Some(bucket) = self.edges_by_type.get_mut(&edge.edge_type) {
            bucket.remove(id);
            if bucket.is_empty() {
                self.edges_by_type.remove(&edge.edge_type);
            }
        }
        for index in [
            &mut self.edges_by_node,
            &mut self.outgoing_edges,
            &mut self.incoming_edges,
        ] {
            if let Some(set) = index.get_mut(&edge.source) {
                set.remove(id);
            }
            if let Some(set) = index.get_mut(&edge.target) {
                set.remove(id);
            }
        }

        debug!(edge_id = %id, "edge deleted");
        self.touch();
        self.emit(GraphChange::EdgeDeleted(id.clone()));
        Ok(())
    }

    /// Get a copy of an edge
    pub fn get_edge(&self, id: &EdgeId) -> Option<Edge> {
        self.edges.get(id).cloned()
    }

    /// Whether an edge with this id exists
    pub fn has_edge(&self, id: &EdgeId) -> bool {
        self.edges.contains_key(id)
    }

    /// Copies of every edge, in no particular order
    pub fn get_edges(&self) -> Vec<Edge> {
        self.edges.values().cloned().collect()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Remove all nodes and edges, keeping schema and metadata.
    ///
    /// Emits a single `Cleared` event regardless of how much was removed.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.nodes_by_type.clear();
        self.edges_by_type.clear();
        self.edges_by_node.clear();
        self.outgoing_edges.clear();
        self.incoming_edges.clear();
        debug!("graph cleared");
        self.touch();
        self.emit(GraphChange::Cleared);
    }

    // ---- queries ----

    /// Find nodes matching a filter, with optional sort and pagination
    pub fn query_nodes(&self, query: &NodeQuery) -> Vec<Node> {
        query.execute(self)
    }

    /// Find edges matching a filter, with optional sort and pagination
    pub fn query_edges(&self, query: &EdgeQuery) -> Vec<Edge> {
        query.execute(self)
    }

    /// Breadth-first neighbor discovery from a start node
    pub fn get_neighbors(
        &self,
        start: &NodeId,
        options: &NeighborOptions,
    ) -> GraphResult<NeighborResult> {
        neighbors(self, start, options)
    }

    /// Extract the subgraph induced by a seed set (optionally expanded)
    pub fn get_subgraph(&self, seeds: &[NodeId], options: &SubgraphOptions) -> Subgraph {
        subgraph(self, seeds, options)
    }

    /// Aggregate counts, degree statistics, and connectivity
    pub fn statistics(&self) -> GraphStatistics {
        let nodes_by_type = self
            .nodes_by_type
            .iter()
            .map(|(t, set)| (t.clone(), set.len()))
            .collect();
        let edges_by_type = self
            .edges_by_type
            .iter()
            .map(|(t, set)| (t.clone(), set.len()))
            .collect();

        let max_degree = self
            .edges_by_node
            .values()
            .map(|set| set.len())
            .max()
            .unwrap_or(0);
        let average_degree = if self.nodes.is_empty() {
            0.0
        } else {
            let total: usize = self.edges_by_node.values().map(|set| set.len()).sum();
            total as f64 / self.nodes.len() as f64
        };

        GraphStatistics {
            node_count: self.nodes.len(),
            edge_count: self.edges.len(),
            nodes_by_type,
            edges_by_type,
            average_degree,
            max_degree,
            is_connected: self.check_connectivity(),
        }
    }

    /// Flood-fill over incident edges, ignoring direction
    fn check_connectivity(&self) -> bool {
        if self.nodes.len() <= 1 {
            return true;
        }
        let Some(start) = self.nodes.keys().next() else {
            return true;
        };

        let mut visited = HashSet::new();
        visited.insert(start.clone());
        let mut queue = VecDeque::from([start.clone()]);
        while let Some(current) = queue.pop_front() {
            if let Some(incident) = self.edges_by_node.get(&current) {
                for edge_id in incident {
                    let Some(edge) = self.edges.get(edge_id) else {
                        continue;
                    };
                    let other = if edge.source == current {
                        &edge.target
                    } else {
                        &edge.source
                    };
                    if visited.insert(other.clone()) {
                        queue.push_back(other.clone());
                    }
                }
            }
        }
        visited.len() == self.nodes.len()
    }

    // ---- events ----

    /// Register a change listener, returning a handle for `unsubscribe`.
    ///
    /// Listeners run synchronously, in registration order, after each
    /// mutation commits. A panicking listener propagates to the mutating
    /// caller and skips any listeners registered after it.
    pub fn subscribe(
        &mut self,
        listener: impl Fn(&GraphEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.listeners.subscribe(listener)
    }

    /// Remove a previously registered listener. Returns false if the handle
    /// was already removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }

    fn emit(&self, change: GraphChange) {
        if self.listeners.is_empty() {
            return;
        }
        let event = GraphEvent::now(change);
        self.listeners.emit(&event);
    }

    fn touch(&mut self) {
        self.metadata.updated_at = Some(Utc::now());
    }

    // ---- accessors ----

    /// The attached schema, if any
    pub fn schema(&self) -> Option<&SchemaDefinition> {
        self.schema.as_ref()
    }

    pub fn metadata(&self) -> &GraphMetadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut GraphMetadata {
        &mut self.metadata
    }

    // ---- internal views used by the query module ----

    pub(crate) fn node_ref(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub(crate) fn edge_ref(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.get(id)
    }

    pub(crate) fn nodes_iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub(crate) fn edges_iter(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    pub(crate) fn nodes_of_type(&self, node_type: &str) -> Option<&HashSet<NodeId>> {
        self.nodes_by_type.get(node_type)
    }

    pub(crate) fn edges_of_type(&self, edge_type: &str) -> Option<&HashSet<EdgeId>> {
        self.edges_by_type.get(edge_type)
    }

    pub(crate) fn incident(&self, id: &NodeId) -> Option<&HashSet<EdgeId>> {
        self.edges_by_node.get(id)
    }

    pub(crate) fn outgoing(&self, id: &NodeId) -> Option<&HashSet<EdgeId>> {
        self.outgoing_edges.get(id)
    }

    pub(crate) fn incoming(&self, id: &NodeId) -> Option<&HashSet<EdgeId>> {
        self.incoming_edges.get(id)
    }
}
