//! Core types for the knowledge-graph view
//!
//! These mirror the graph API payload (`nodes` / `edges`) and carry the
//! model-space position computed client-side by the layout pass.

use egui::Pos2;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::error::GraphError;

// =============================================================================
// NODE KIND
// =============================================================================

/// Closed set of node categories. Drives colour, render radius and layout ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    /// The queried root object; anchored at the canvas centre.
    ManagedObject,
    Service,
    Event,
    Dependency,
}

impl NodeKind {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::ManagedObject => "managed_object",
            NodeKind::Service => "service",
            NodeKind::Event => "event",
            NodeKind::Dependency => "dependency",
        }
    }

    pub fn all() -> &'static [NodeKind] {
        &[
            NodeKind::ManagedObject,
            NodeKind::Service,
            NodeKind::Event,
            NodeKind::Dependency,
        ]
    }
}

impl std::str::FromStr for NodeKind {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "managed_object" | "managedobject" => Ok(Self::ManagedObject),
            "service" => Ok(Self::Service),
            "event" => Ok(Self::Event),
            "dependency" => Ok(Self::Dependency),
            _ => Err(GraphError::UnknownKind(s.to_string())),
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical relationship types produced by the graph API.
pub mod edge_kind {
    pub const MANAGES: &str = "MANAGES";
    pub const AFFECTS: &str = "AFFECTS";
    pub const DEPENDS_ON: &str = "DEPENDS_ON";
}

// =============================================================================
// NODE / EDGE
// =============================================================================

/// A graph node.
///
/// `kind` is fixed at construction. `position` is written only by the
/// layout engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    kind: NodeKind,
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<Pos2>,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            properties: Map::new(),
            position: None,
        }
    }

    /// Builder: add a property
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    /// Model-space position, `None` until the layout pass has run
    pub fn position(&self) -> Option<Pos2> {
        self.position
    }

    pub(crate) fn set_position(&mut self, pos: Pos2) {
        self.position = Some(pos);
    }

    pub(crate) fn clear_position(&mut self) {
        self.position = None;
    }
}

/// A directed edge, rendered with an arrowhead at `target_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    #[serde(rename = "source")]
    pub source_id: String,
    #[serde(rename = "target")]
    pub target_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Edge {
    pub fn new(
        id: impl Into<String>,
        source_id: impl Into<String>,
        target_id: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            source_id: source_id.into(),
            target_id: target_id.into(),
            kind: kind.into(),
            label: None,
        }
    }

    /// Builder: set label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Text drawn at the edge midpoint
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.kind)
    }
}

// =============================================================================
// GRAPH
// =============================================================================

/// Graph snapshot. Node order is discovery order and doubles as draw order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Graph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get_node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// The layout anchor: first managed-object node
    pub fn center_node(&self) -> Option<&Node> {
        self.nodes
            .iter()
            .find(|n| n.kind() == NodeKind::ManagedObject)
    }

    pub fn count_kind(&self, kind: NodeKind) -> usize {
        self.nodes.iter().filter(|n| n.kind() == kind).count()
    }

    pub fn edges_of_kind<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.kind == kind)
    }

    /// True once every node has a position
    pub fn is_laid_out(&self) -> bool {
        self.nodes.iter().all(|n| n.position.is_some())
    }

    pub(crate) fn clear_positions(&mut self) {
        for node in &mut self.nodes {
            node.clear_position();
        }
    }

    /// Check node id uniqueness and edge referential integrity
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut ids = HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !ids.insert(node.id.as_str()) {
                return Err(GraphError::DuplicateNode(node.id.clone()));
            }
        }
        for edge in &self.edges {
            for endpoint in [&edge.source_id, &edge.target_id] {
                if !ids.contains(endpoint.as_str()) {
                    return Err(GraphError::DanglingEdge {
                        edge: edge.id.clone(),
                        endpoint: endpoint.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Drop duplicate nodes (first wins), duplicate edges and edges whose
    /// endpoints are missing. The result always passes [`Graph::validate`].
    pub fn sanitized(self) -> Self {
        let mut seen_nodes: HashSet<String> = HashSet::with_capacity(self.nodes.len());
        let mut nodes = Vec::with_capacity(self.nodes.len());
        for node in self.nodes {
            if seen_nodes.insert(node.id.clone()) {
                nodes.push(node);
            } else {
                tracing::warn!(node_id = %node.id, "dropping duplicate node");
            }
        }

        let mut seen_edges: HashSet<String> = HashSet::with_capacity(self.edges.len());
        let mut edges = Vec::with_capacity(self.edges.len());
        for edge in self.edges {
            if !seen_nodes.contains(&edge.source_id) || !seen_nodes.contains(&edge.target_id) {
                tracing::warn!(
                    edge_id = %edge.id,
                    source = %edge.source_id,
                    target = %edge.target_id,
                    "dropping edge with unknown endpoint"
                );
                continue;
            }
            if !seen_edges.insert(edge.id.clone()) {
                tracing::warn!(edge_id = %edge.id, "dropping duplicate edge");
                continue;
            }
            edges.push(edge);
        }

        Self { nodes, edges }
    }
}

// =============================================================================
// TESTS
// =============================================================================
