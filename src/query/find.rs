//! Filtered, sorted, paginated lookups over nodes and edges
//!
//! Queries are plain builder structs executed against a graph. Type filters
//! use the type indices; property filters require exact equality on every
//! listed key. Built-in fields (`id`, `type`, `label`, ...) resolve as
//! filter and sort keys alongside free-form properties.

use crate::graph::{Edge, KnowledgeGraph, Node, Properties, PropertyValue};
use std::cmp::Ordering;

/// Sort order for query results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Filter, sort, and pagination options for node lookups
#[derive(Debug, Clone, Default)]
pub struct NodeQuery {
    /// Match any of these node types (empty = all types)
    pub types: Vec<String>,
    /// Every listed property must be present and equal
    pub properties: Properties,
    /// Sort results by this key before pagination
    pub sort_by: Option<String>,
    pub sort_direction: SortDirection,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl NodeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a node type to match (types combine as OR)
    pub fn with_type(mut self, node_type: impl Into<String>) -> Self {
        self.types.push(node_type.into());
        self
    }

    /// Require a property to equal a value (properties combine as AND)
    pub fn where_eq(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Sort ascending by the given key
    pub fn sort_by(mut self, key: impl Into<String>) -> Self {
        self.sort_by = Some(key.into());
        self
    }

    /// Flip the sort order to descending
    pub fn descending(mut self) -> Self {
        self.sort_direction = SortDirection::Descending;
        self
    }

    /// Skip the first `offset` results (applied after sorting)
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    /// Return at most `limit` results
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn execute(&self, graph: &KnowledgeGraph) -> Vec<Node> {
        let mut results: Vec<Node> = if self.types.is_empty() {
            graph
                .nodes_iter()
                .filter(|node| self.matches(node))
                .cloned()
                .collect()
        } else {
            // dedupe the type list so a repeated type cannot double-count
            let mut seen_types = Vec::new();
            let mut nodes = Vec::new();
            for node_type in &self.types {
                if seen_types.contains(&node_type) {
                    continue;
                }
                seen_types.push(node_type);
                if let Some(ids) = graph.nodes_of_type(node_type) {
                    for id in ids {
                        if let Some(node) = graph.node_ref(id) {
                            if self.matches(node) {
                                nodes.push(node.clone());
                            }
                        }
                    }
                }
            }
            nodes
        };

        if let Some(key) = &self.sort_by {
            sort_results(&mut results, |node| node_key(node, key), self.sort_direction);
        }
        paginate(results, self.offset, self.limit)
    }

    fn matches(&self, node: &Node) -> bool {
        self.properties
            .iter()
            .all(|(key, expected)| node_key(node, key).as_ref() == Some(expected))
    }
}

/// Filter, sort, and pagination options for edge lookups
#[derive(Debug, Clone, Default)]
pub struct EdgeQuery {
    /// Match any of these edge types (empty = all types)
    pub types: Vec<String>,
    /// Every listed property must be present and equal
    pub properties: Properties,
    pub sort_by: Option<String>,
    pub sort_direction: SortDirection,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl EdgeQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_type(mut self, edge_type: impl Into<String>) -> Self {
        self.types.push(edge_type.into());
        self
    }

    pub fn where_eq(mut self, key: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn sort_by(mut self, key: impl Into<String>) -> Self {
        self.sort_by = Some(key.into());
        self
    }

    pub fn descending(mut self) -> Self {
        self.sort_direction = SortDirection::Descending;
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub(crate) fn execute(&self, graph: &KnowledgeGraph) -> Vec<Edge> {
        let mut results: Vec<Edge> = if self.types.is_empty() {
            graph
                .edges_iter()
                .filter(|edge| self.matches(edge))
                .cloned()
                .collect()
        } else {
            let mut seen_types = Vec::new();
            let mut edges = Vec::new();
            for edge_type in &self.types {
                if seen_types.contains(&edge_type) {
                    continue;
                }
                seen_types.push(edge_type);
                if let Some(ids) = graph.edges_of_type(edge_type) {
                    for id in ids {
                        if let Some(edge) = graph.edge_ref(id) {
                            if self.matches(edge) {
                                edges.push(edge.clone());
                            }
                        }
                    }
                }
            }
            edges
        };

        if let Some(key) = &self.sort_by {
            sort_results(&mut results, |edge| edge_key(edge, key), self.sort_direction);
        }
        paginate(results, self.offset, self.limit)
    }

    fn matches(&self, edge: &Edge) -> bool {
        self.properties
            .iter()
            .all(|(key, expected)| edge_key(edge, key).as_ref() == Some(expected))
    }
}

/// Resolve a filter/sort key against a node: built-in fields first, then
/// the free-form property map
fn node_key(node: &Node, key: &str) -> Option<PropertyValue> {
    match key {
        "id" => Some(PropertyValue::String(node.id.to_string())),
        "type" => Some(PropertyValue::String(node.node_type.clone())),
        "label" => Some(PropertyValue::String(node.label.clone())),
        "color" => node.color.clone().map(PropertyValue::String),
        "size" => node.size.map(PropertyValue::Float),
        _ => node.properties.get(key).cloned(),
    }
}

fn edge_key(edge: &Edge, key: &str) -> Option<PropertyValue> {
    match key {
        "id" => Some(PropertyValue::String(edge.id.to_string())),
        "type" => Some(PropertyValue::String(edge.edge_type.clone())),
        "source" => Some(PropertyValue::String(edge.source.to_string())),
        "target" => Some(PropertyValue::String(edge.target.to_string())),
        "label" => edge.label.clone().map(PropertyValue::String),
        "weight" => edge.weight.map(PropertyValue::Float),
        "directed" => Some(PropertyValue::Bool(edge.directed)),
        _ => edge.properties.get(key).cloned(),
    }
}

/// Compare two property values for sorting.
///
/// Same-variant values compare naturally; Int and Float compare as f64.
/// Anything else (mixed variants, arrays, objects) compares equal, so the
/// stable sort leaves those items in their relative order.
fn compare_values(a: &PropertyValue, b: &PropertyValue) -> Ordering {
    match (a, b) {
        (PropertyValue::String(a), PropertyValue::String(b)) => a.cmp(b),
        (PropertyValue::Int(a), PropertyValue::Int(b)) => a.cmp(b),
        (PropertyValue::Bool(a), PropertyValue::Bool(b)) => a.cmp(b),
        (PropertyValue::Int(_) | PropertyValue::Float(_), PropertyValue::Int(_) | PropertyValue::Float(_)) => {
            let a = as_f64(a);
            let b = as_f64(b);
            a.partial_cmp(&b).unwrap_or(Ordering::Equal)
        }
        _ => Ordering::Equal,
    }
}

fn as_f64(value: &PropertyValue) -> f64 {
    match value {
        PropertyValue::Int(n) => *n as f64,
        PropertyValue::Float(n) => *n,
        _ => 0.0,
    }
}

fn sort_results<T>(
    results: &mut [T],
    key: impl Fn(&T) -> Option<PropertyValue>,
    direction: SortDirection,
) {
    results.sort_by(|a, b| {
        let ordering = match (key(a), key(b)) {
            (Some(a), Some(b)) => compare_values(&a, &b),
            // a missing sort key compares equal, so the stable sort keeps
            // those items in their relative order
            _ => Ordering::Equal,
        };
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
}

fn paginate<T>(results: Vec<T>, offset: usize, limit: Option<usize>) -> Vec<T> {
    results
        .into_iter()
        .skip(offset)
        .take(limit.unwrap_or(usize::MAX))
        .collect()
}
