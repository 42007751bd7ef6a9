//! Optional structural schema for validating nodes and edges
//!
//! A schema declares the allowed node types (with required properties) and
//! edge types (with endpoint-type allow-lists). Graphs built without a schema
//! accept everything; graphs built with one reject violating records before
//! any state changes.

use super::edge::Edge;
use super::node::Node;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a node or edge was rejected by the attached schema
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaViolation {
    #[error("node type '{node_type}' is not declared in the schema")]
    UndeclaredNodeType { node_type: String },

    #[error("node '{node_id}' is missing required property '{key}'")]
    MissingRequiredProperty { node_id: String, key: String },

    #[error("edge type '{edge_type}' is not declared in the schema")]
    UndeclaredEdgeType { edge_type: String },

    #[error("edge type '{edge_type}' does not allow source nodes of type '{node_type}'")]
    DisallowedSourceType {
        edge_type: String,
        node_type: String,
    },

    #[error("edge type '{edge_type}' does not allow target nodes of type '{node_type}'")]
    DisallowedTargetType {
        edge_type: String,
        node_type: String,
    },
}

/// A property expected on nodes of a given type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default)]
    pub required: bool,
}

impl PropertyDefinition {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: None,
            required: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A declared node type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeTypeDefinition {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyDefinition>,
}

impl NodeTypeDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            properties: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_property(mut self, property: PropertyDefinition) -> Self {
        self.properties.push(property);
        self
    }
}

/// A declared edge type.
///
/// Empty `source_types`/`target_types` lists mean any node type is allowed
/// at that endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeTypeDefinition {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directed: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_types: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub target_types: Vec<String>,
}

impl EdgeTypeDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
            directed: None,
            source_types: Vec::new(),
            target_types: Vec::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn from_source(mut self, node_type: impl Into<String>) -> Self {
        self.source_types.push(node_type.into());
        self
    }

    pub fn to_target(mut self, node_type: impl Into<String>) -> Self {
        self.target_types.push(node_type.into());
        self
    }
}

/// Structural contract attached to a graph at construction time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub version: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub node_types: Vec<NodeTypeDefinition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edge_types: Vec<EdgeTypeDefinition>,
}

impl SchemaDefinition {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            name: None,
            version: version.into(),
            node_types: Vec::new(),
            edge_types: Vec::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_node_type(mut self, node_type: NodeTypeDefinition) -> Self {
        self.node_types.push(node_type);
        self
    }

    pub fn with_edge_type(mut self, edge_type: EdgeTypeDefinition) -> Self {
        self.edge_types.push(edge_type);
        self
    }

    /// Check a node against the declared node types
    pub fn validate_node(&self, node: &Node) -> Result<(), SchemaViolation> {
        let definition = self
            .node_types
            .iter()
            .find(|t| t.id == node.node_type)
            .ok_or_else(|| SchemaViolation::UndeclaredNodeType {
                node_type: node.node_type.clone(),
            })?;

        for property in &definition.properties {
            if property.required && !node.properties.contains_key(&property.key) {
                return Err(SchemaViolation::MissingRequiredProperty {
                    node_id: node.id.to_string(),
                    key: property.key.clone(),
                });
            }
        }

        Ok(())
    }

    /// Check an edge and its endpoint node types against the declared edge types
    pub fn validate_edge(
        &self,
        edge: &Edge,
        source_type: &str,
        target_type: &str,
    ) -> Result<(), SchemaViolation> {
        let definition = self
            .edge_types
            .iter()
            .find(|t| t.id == edge.edge_type)
            .ok_or_else(|| SchemaViolation::UndeclaredEdgeType {
                edge_type: edge.edge_type.clone(),
            })?;

        if !definition.source_types.is_empty()
            && !definition.source_types.iter().any(|t| t == source_type)
        {
            return Err(SchemaViolation::DisallowedSourceType {
                edge_type: edge.edge_type.clone(),
                node_type: source_type.to_string(),
            });
        }

        if !definition.target_types.is_empty()
            && !definition.target_types.iter().any(|t| t == target_type)
        {
            return Err(SchemaViolation::DisallowedTargetType {
                edge_type: edge.edge_type.clone(),
                node_type: target_type.to_string(),
            });
        }

        Ok(())
    }
}
