//! Change events emitted after every successful mutation

use super::edge::{Edge, EdgeId};
use super::node::{Node, NodeId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What changed in the graph.
///
/// Added/updated variants carry a copy of the record as stored after the
/// mutation; deleted variants carry only the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum GraphChange {
    NodeAdded(Node),
    NodeUpdated(Node),
    NodeDeleted(NodeId),
    EdgeAdded(Edge),
    EdgeUpdated(Edge),
    EdgeDeleted(EdgeId),
    #[serde(rename = "graphCleared")]
    Cleared,
}

impl GraphChange {
    /// Short kind tag, useful for logging and filtering
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NodeAdded(_) => "nodeAdded",
            Self::NodeUpdated(_) => "nodeUpdated",
            Self::NodeDeleted(_) => "nodeDeleted",
            Self::EdgeAdded(_) => "edgeAdded",
            Self::EdgeUpdated(_) => "edgeUpdated",
            Self::EdgeDeleted(_) => "edgeDeleted",
            Self::Cleared => "graphCleared",
        }
    }
}

/// A timestamped change notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEvent {
    #[serde(flatten)]
    pub change: GraphChange,
    pub timestamp: DateTime<Utc>,
}

impl GraphEvent {
    pub(crate) fn now(change: GraphChange) -> Self {
        Self {
            change,
            timestamp: Utc::now(),
        }
    }
}

/// Handle returned by `subscribe`, used to remove the listener later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&GraphEvent) + Send + Sync>;

/// Registered listeners, notified synchronously in registration order
#[derive(Default)]
pub(crate) struct ListenerSet {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl ListenerSet {
    pub(crate) fn subscribe(
        &mut self,
        listener: impl Fn(&GraphEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub(crate) fn emit(&self, event: &GraphEvent) {
        for (_, listener) in &self.listeners {
            listener(event);
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for ListenerSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerSet")
            .field("count", &self.listeners.len())
            .finish()
    }
}
