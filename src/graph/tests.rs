//! Serialization tests with wire-format fixtures

use serde_json::{json, Value};

/// Wire fixture: a node as a frontend would send it
fn node_fixture() -> Value {
    json!({
        "id": "person:alice",
        "type": "Person",
        "label": "Alice",
        "properties": {
            "name": "Alice",
            "age": 30
        },
        "position": { "x": 12.5, "y": -4.0 },
        "color": "#ff0000"
    })
}

/// Wire fixture: an edge as a frontend would send it
fn edge_fixture() -> Value {
    json!({
        "id": "edge:alice-knows-bob",
        "type": "knows",
        "source": "person:alice",
        "target": "person:bob",
        "directed": true,
        "weight": 0.8,
        "properties": {
            "since": 2019
        }
    })
}

/// Wire fixture: a schema declaration
fn schema_fixture() -> Value {
    json!({
        "name": "social",
        "version": "1.0",
        "node_types": [
            {
                "id": "Person",
                "properties": [
                    { "key": "name", "required": true }
                ]
            }
        ],
        "edge_types": [
            {
                "id": "knows",
                "source_types": ["Person"],
                "target_types": ["Person"]
            }
        ]
    })
}

#[cfg(test)]
mod serialization_tests {
    use super::*;
    use crate::graph::{
        edge::Edge,
        event::{GraphChange, GraphEvent},
        graph::GraphData,
        node::{Node, NodeId, PropertyValue},
        schema::SchemaDefinition,
    };

    #[test]
    fn node_id_serializes_as_string() {
        let id = NodeId::from_string("person:alice");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"person:alice\"");
    }

    #[test]
    fn node_id_deserializes_from_string() {
        let id: NodeId = serde_json::from_str("\"person:alice\"").unwrap();
        assert_eq!(id.as_str(), "person:alice");
    }

    #[test]
    fn node_type_field_renamed() {
        let node = Node::new("1", "Person", "Alice");
        let json = serde_json::to_value(&node).unwrap();

        // Should have "type" not "node_type"
        assert!(json.get("type").is_some());
        assert!(json.get("node_type").is_none());
        assert_eq!(json["type"], "Person");
    }

    #[test]
    fn node_optional_fields_skipped_when_unset() {
        let node = Node::new("1", "Person", "Alice");
        let json = serde_json::to_value(&node).unwrap();

        assert!(json.get("properties").is_none());
        assert!(json.get("position").is_none());
        assert!(json.get("color").is_none());
        assert!(json.get("size").is_none());
    }

    #[test]
    fn can_deserialize_node_fixture() {
        let node: Node = serde_json::from_value(node_fixture()).unwrap();

        assert_eq!(node.id.as_str(), "person:alice");
        assert_eq!(node.node_type, "Person");
        assert_eq!(node.properties.get("age"), Some(&PropertyValue::Int(30)));
        assert_eq!(node.position.map(|p| p.x), Some(12.5));
        assert_eq!(node.color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn can_deserialize_edge_fixture() {
        let edge: Edge = serde_json::from_value(edge_fixture()).unwrap();

        assert_eq!(edge.id.as_str(), "edge:alice-knows-bob");
        assert_eq!(edge.edge_type, "knows");
        assert_eq!(edge.source.as_str(), "person:alice");
        assert!(edge.directed);
        assert_eq!(edge.weight, Some(0.8));
    }

    #[test]
    fn edge_directed_defaults_to_false_on_the_wire() {
        let edge: Edge = serde_json::from_value(json!({
            "id": "e",
            "type": "relatedTo",
            "source": "a",
            "target": "b"
        }))
        .unwrap();
        assert!(!edge.directed);
    }

    #[test]
    fn can_deserialize_schema_fixture() {
        let schema: SchemaDefinition = serde_json::from_value(schema_fixture()).unwrap();

        assert_eq!(schema.version, "1.0");
        assert_eq!(schema.node_types.len(), 1);
        assert!(schema.node_types[0].properties[0].required);
        assert_eq!(schema.edge_types[0].source_types, vec!["Person"]);
    }

    #[test]
    fn node_roundtrip() {
        let node = Node::new("1", "Person", "Alice")
            .with_property("name", "Alice")
            .at_position(1.0, 2.0);

        let json = serde_json::to_string(&node).unwrap();
        let node2: Node = serde_json::from_str(&json).unwrap();
        assert_eq!(node, node2);
    }

    #[test]
    fn edge_roundtrip() {
        let edge = Edge::new("e1", "knows", "1", "2")
            .with_weight(0.5)
            .with_property("since", 2019i64);

        let json = serde_json::to_string(&edge).unwrap();
        let edge2: Edge = serde_json::from_str(&json).unwrap();
        assert_eq!(edge, edge2);
    }

    #[test]
    fn graph_change_uses_tagged_envelope() {
        let change = GraphChange::NodeAdded(Node::new("1", "Person", "Alice"));
        let json = serde_json::to_value(&change).unwrap();

        assert_eq!(json["type"], "nodeAdded");
        assert_eq!(json["data"]["id"], "1");

        let json = serde_json::to_value(GraphChange::NodeDeleted("1".into())).unwrap();
        assert_eq!(json["type"], "nodeDeleted");
        assert_eq!(json["data"], "1");

        let json = serde_json::to_value(GraphChange::Cleared).unwrap();
        assert_eq!(json["type"], "graphCleared");
    }

    #[test]
    fn graph_event_flattens_the_change() {
        let event = GraphEvent::now(GraphChange::EdgeDeleted("e1".into()));
        let json = serde_json::to_value(&event).unwrap();

        assert_eq!(json["type"], "edgeDeleted");
        assert_eq!(json["data"], "e1");
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn graph_data_accepts_minimal_payload() {
        let data: GraphData = serde_json::from_value(json!({
            "nodes": [node_fixture()],
            "edges": []
        }))
        .unwrap();
        assert_eq!(data.nodes.len(), 1);
        assert!(data.schema.is_none());
    }
}
