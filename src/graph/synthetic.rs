//! Deterministic stand-in graph used when the graph service is unavailable.
//!
//! The same root name always yields the same node ids, edge ids and
//! endpoints, so callers and tests can rely on the exact shape.

use super::types::{edge_kind, Edge, Graph, Node, NodeKind};
use crate::api::GraphQuery;

/// Event nodes attached to every synthetic root: (id, label, severity)
const EVENTS: &[(&str, &str, &str)] = &[
    ("evt-001", "CPU usage alert", "warning"),
    ("evt-002", "Response time anomaly", "critical"),
];

/// Dependency nodes: (id, label, endpoint)
const DEPENDENCIES: &[(&str, &str, &str)] =
    &[("dep-001", "External API", "https://api.external.com")];

/// Build the full synthetic graph for `root`
pub fn generate(root: &str) -> Graph {
    generate_for(&GraphQuery::new(root))
}

/// Build the synthetic graph, honouring the query's include flags
pub fn generate_for(query: &GraphQuery) -> Graph {
    let root = query.root.as_str();
    let mut nodes =
        vec![Node::new(root, root, NodeKind::ManagedObject).with_property("status", "active")];
    let mut edges = Vec::new();

    if query.include_services {
        let services = [
            ("api", "API", "running", ("port", serde_json::json!(8080))),
            ("db", "Database", "healthy", ("engine", serde_json::json!("postgresql"))),
            ("cache", "Cache", "healthy", ("engine", serde_json::json!("redis"))),
        ];
        for (suffix, title, status, (key, value)) in services {
            let id = format!("{root}-{suffix}");
            edges.push(
                Edge::new(format!("{root}-manages-{id}"), root, id.as_str(), edge_kind::MANAGES)
                    .with_label("manages"),
            );
            nodes.push(
                Node::new(id, format!("{root} {title}"), NodeKind::Service)
                    .with_property("status", status)
                    .with_property(key, value),
            );
        }
    }

    if query.include_events {
        for &(id, label, severity) in EVENTS {
            nodes.push(Node::new(id, label, NodeKind::Event).with_property("severity", severity));
            edges.push(
                Edge::new(format!("{id}-affects-{root}"), id, root, edge_kind::AFFECTS)
                    .with_label("affects"),
            );
        }
    }

    if query.include_dependencies {
        for &(id, label, endpoint) in DEPENDENCIES {
            nodes.push(
                Node::new(id, label, NodeKind::Dependency)
                    .with_property("type", "external")
                    .with_property("endpoint", endpoint),
            );
            edges.push(
                Edge::new(format!("{root}-depends-{id}"), root, id, edge_kind::DEPENDS_ON)
                    .with_label("depends on"),
            );
        }
    }

    Graph::new(nodes, edges)
}
