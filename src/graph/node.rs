//! Node representation in the knowledge graph

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Unique identifier for a node
///
/// Serializes as a plain string (UUID or semantic ID like "person:alice")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Create a new random NodeId (UUID-based)
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create a NodeId from a string (semantic ID)
    pub fn from_string(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Typed property values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Array(Vec<PropertyValue>),
    Object(HashMap<String, PropertyValue>),
}

impl PropertyValue {
    /// Convert a JSON value into a property value.
    ///
    /// Returns `None` for JSON `null`, which has no property representation.
    pub fn from_json(value: serde_json::Value) -> Option<Self> {
        serde_json::from_value(value).ok()
    }

    /// Convert this property value into its JSON representation.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    /// Get the string content, if this is a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for PropertyValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        Self::Float(n)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Properties collection
pub type Properties = HashMap<String, PropertyValue>;

/// Position of a node in 2D space (consumed by layout engines)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A node in the knowledge graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier
    pub id: NodeId,
    /// Type/category of the node (e.g., "Person", "Organization", "Concept")
    #[serde(rename = "type")]
    pub node_type: String,
    /// Human-readable label
    pub label: String,
    /// Free-form properties
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub properties: Properties,
    /// Position in 2D space
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Display color (hex, rgb, or named)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Display size (radius)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<f64>,
}

impl Node {
    /// Create a new node with the given id, type, and label
    pub fn new(
        id: impl Into<NodeId>,
        node_type: impl Into<String>,
        label: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            label: label.into(),
            properties: HashMap::new(),
            position: None,
            color: None,
            size: None,
        }
    }

    /// Add a property to the node
    pub fn with_property(
        mut self,
        key: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Set the node's position
    pub fn at_position(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position { x, y });
        self
    }

    /// Set the node's display color
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }
}

/// Partial update applied to an existing node.
///
/// A patch carries no `id` field: the node id can never change after insert.
/// Unset fields leave the stored record untouched; `properties` entries are
/// merged key-by-key into the existing map.
#[derive(Debug, Clone, Default)]
pub struct NodePatch {
    pub node_type: Option<String>,
    pub label: Option<String>,
    pub position: Option<Position>,
    pub color: Option<String>,
    pub size: Option<f64>,
    pub properties: Properties,
}

impl NodePatch {
    /// Create an empty patch (applies no changes)
    pub fn new() -> Self {
        Self::default()
    }

    /// Change the node type
    pub fn node_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = Some(node_type.into());
        self
    }

    /// Change the label
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Change the position
    pub fn position(mut self, x: f64, y: f64) -> Self {
        self.position = Some(Position { x, y });
        self
    }

    /// Change the display color
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Set or overwrite a single property
    pub fn property(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub(crate) fn apply(&self, node: &mut Node) {
        if let Some(node_type) = &self.node_type {
            node.node_type = node_type.clone();
        }
        if let Some(label) = &self.label {
            node.label = label.clone();
        }
        if let Some(position) = self.position {
            node.position = Some(position);
        }
        if let Some(color) = &self.color {
            node.color = Some(color.clone());
        }
        if let Some(size) = self.size {
            node.size = Some(size);
        }
        for (key, value) in &self.properties {
            node.properties.insert(key.clone(), value.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn patch_merges_properties_without_clearing_existing() {
        let mut node = Node::new("1", "Person", "Alice")
            .with_property("email", "alice@example.com")
            .with_property("age", 30i64);

        NodePatch::new()
            .property("age", 31i64)
            .property("city", "Oslo")
            .apply(&mut node);

        assert_eq!(node.properties.get("age"), Some(&PropertyValue::Int(31)));
        assert_eq!(
            node.properties.get("email"),
            Some(&PropertyValue::String("alice@example.com".into()))
        );
        assert_eq!(
            node.properties.get("city"),
            Some(&PropertyValue::String("Oslo".into()))
        );
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let mut node = Node::new("1", "Person", "Alice").at_position(1.0, 2.0);
        let before = node.clone();
        NodePatch::new().apply(&mut node);
        assert_eq!(node, before);
    }

    #[test]
    fn property_value_json_roundtrip() {
        let value = PropertyValue::Object(
            [(
                "tags".to_string(),
                PropertyValue::Array(vec!["a".into(), "b".into()]),
            )]
            .into_iter()
            .collect(),
        );
        let json = value.to_json();
        assert_eq!(PropertyValue::from_json(json), Some(value));
    }

    #[test]
    fn json_null_has_no_property_representation() {
        assert_eq!(PropertyValue::from_json(serde_json::Value::Null), None);
    }
}
