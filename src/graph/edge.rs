//! Edge representation connecting two nodes

use super::node::{NodeId, Properties, PropertyValue};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for an edge
///
/// Serializes as a plain string (UUID or semantic ID like "edge:alice-knows-bob")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    /// Create a new random EdgeId (UUID-based)
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create an EdgeId from a string (semantic ID)
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EdgeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EdgeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A typed edge between two nodes.
///
/// Every edge is stored once under its `source`/`target` orientation; the
/// `directed` flag records whether consumers should treat the relationship
/// as one-way. Undirected edges keep their recorded orientation in the
/// adjacency indices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique identifier
    pub id: EdgeId,
    /// Type of relationship (e.g., "knows", "worksAt", "relatedTo")
    #[serde(rename = "type")]
    pub edge_type: String,
    /// Source node
    pub source: NodeId,
    /// Target node
    pub target: NodeId,
    /// Whether the relationship is one-way
    #[serde(default)]
    pub directed: bool,
    /// Human-readable label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Relationship strength (0.0 - 1.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Free-form properties
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: Properties,
}

impl Edge {
    /// Create a new directed edge
    pub fn new(
        id: impl Into<EdgeId>,
        edge_type: impl Into<String>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Self {
        Self {
            id: id.into(),
            edge_type: edge_type.into(),
            source: source.into(),
            target: target.into(),
            directed: true,
            label: None,
            weight: None,
            properties: HashMap::new(),
        }
    }

    /// Mark the edge as undirected
    pub fn undirected(mut self) -> Self {
        self.directed = false;
        self
    }

    /// Set a human-readable label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the relationship weight
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Add a property to the edge
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }
}

/// Partial update applied to an existing edge.
///
/// A patch carries no `id`, `source`, or `target` fields: identity and
/// endpoints can never change after insert (moving an endpoint would require
/// full re-indexing). `properties` entries are merged key-by-key.
#[derive(Debug, Clone, Default)]
pub struct EdgePatch {
    pub edge_type: Option<String>,
    pub directed: Option<bool>,
    pub label: Option<String>,
    pub weight: Option<f64>,
    pub properties: Properties,
}

impl EdgePatch {
    /// Create an empty patch (applies no changes)
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the edge type
    pub fn edge_type(mut self, edge_type: impl Into<String>) -> Self {
        self.edge_type = Some(edge_type.into());
        self
    }

    /// Change the directedness flag
    pub fn directed(mut self, directed: bool) -> Self {
        self.directed = Some(directed);
        self
    }

    /// Change the label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Change the weight
    pub fn weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    /// Set or overwrite a single property
    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub(crate) fn apply(&self, edge: &mut Edge) {
        if let Some(edge_type) = &self.edge_type {
            edge.edge_type = edge_type.clone();
        }
        if let Some(directed) = self.directed {
            edge.directed = directed;
        }
        if let Some(label) = &self.label {
            edge.label = Some(label.clone());
        }
        if let Some(weight) = self.weight {
            edge.weight = Some(weight);
        }
        for (key, value) in &self.properties {
            edge.properties.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_edge_is_directed_by_default() {
        let edge = Edge::new("e1", "knows", "1", "2");
        assert!(edge.directed);
        assert!(!Edge::new("e2", "knows", "1", "2").undirected().directed);
    }

    #[test]
    fn patch_cannot_touch_endpoints() {
        let mut edge = Edge::new("e1", "knows", "1", "2");
        EdgePatch::new()
            .edge_type("follows")
            .weight(0.5)
            .apply(&mut edge);

        assert_eq!(edge.edge_type, "follows");
        assert_eq!(edge.weight, Some(0.5));
        assert_eq!(edge.source, NodeId::from("1"));
        assert_eq!(edge.target, NodeId::from("2"));
    }
}
