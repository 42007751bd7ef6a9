//! Core graph data structures

mod edge;
mod engine;
mod event;
#[allow(clippy::module_inception)]
mod graph;
mod node;
mod schema;

#[cfg(test)]
mod tests;

pub use edge::{Edge, EdgeId, EdgePatch};
pub use engine::{GraphEngine, GraphError, GraphId, GraphResult};
pub use event::{GraphChange, GraphEvent, SubscriptionId};
pub use graph::{GraphData, GraphMetadata, KnowledgeGraph};
pub use node::{Node, NodeId, NodePatch, Position, Properties, PropertyValue};
pub use schema::{
    EdgeTypeDefinition, NodeTypeDefinition, PropertyDefinition, SchemaDefinition, SchemaViolation,
};
