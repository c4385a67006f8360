//! API client for graph data
//!
//! The engine only sees the [`GraphSource`] trait. [`ApiClient`] implements
//! it against the knowledge-graph service (`POST /api/graph/managed-object`);
//! [`OfflineSource`] stands in when no service is configured.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::SourceError;
use crate::graph::{Edge, Graph, Node};

/// Traversal depth used when none is configured
pub const DEFAULT_DEPTH: u32 = 2;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// =============================================================================
// QUERY
// =============================================================================

/// What to fetch for a root object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphQuery {
    pub root: String,
    pub depth: u32,
    pub include_services: bool,
    pub include_events: bool,
    pub include_dependencies: bool,
}

impl GraphQuery {
    /// Query with default depth and every relation kind included
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            depth: DEFAULT_DEPTH,
            include_services: true,
            include_events: true,
            include_dependencies: true,
        }
    }

    /// Builder: set depth
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }
}

/// Anything that can answer `queryGraph(root, depth)`
pub trait GraphSource {
    fn query_graph(&self, query: &GraphQuery) -> Result<Graph, SourceError>;
}

impl<F> GraphSource for F
where
    F: Fn(&GraphQuery) -> Result<Graph, SourceError>,
{
    fn query_graph(&self, query: &GraphQuery) -> Result<Graph, SourceError> {
        self(query)
    }
}

/// Source used when no service is configured; every query fails
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineSource;

impl GraphSource for OfflineSource {
    fn query_graph(&self, _query: &GraphQuery) -> Result<Graph, SourceError> {
        Err(SourceError::Offline)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Serialize)]
struct ManagedObjectGraphRequest<'a> {
    managed_object: &'a str,
    depth: u32,
    include_events: bool,
    include_services: bool,
    include_dependencies: bool,
}

impl<'a> From<&'a GraphQuery> for ManagedObjectGraphRequest<'a> {
    fn from(query: &'a GraphQuery) -> Self {
        Self {
            managed_object: &query.root,
            depth: query.depth,
            include_events: query.include_events,
            include_services: query.include_services,
            include_dependencies: query.include_dependencies,
        }
    }
}

/// Response envelope shared by the service's endpoints
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// Payload of the managed-object graph endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ManagedObjectGraph {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    pub center_node: Option<String>,
    pub stats: Option<GraphStats>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub depth: u32,
}

impl From<ManagedObjectGraph> for Graph {
    fn from(payload: ManagedObjectGraph) -> Self {
        Graph::new(payload.nodes, payload.edges)
    }
}

/// Decode a managed-object graph response body
pub fn decode_graph_response(body: &str) -> Result<ManagedObjectGraph, SourceError> {
    let envelope: ApiResponse<ManagedObjectGraph> = serde_json::from_str(body)?;
    if !envelope.success {
        return Err(SourceError::Rejected(envelope.message));
    }
    envelope
        .data
        .ok_or_else(|| SourceError::Rejected("response carried no data".to_string()))
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

/// Blocking HTTP client for the knowledge-graph service
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, SourceError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch the graph centred on a managed object
    pub fn get_managed_object_graph(
        &self,
        query: &GraphQuery,
    ) -> Result<ManagedObjectGraph, SourceError> {
        let url = format!("{}/api/graph/managed-object", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&ManagedObjectGraphRequest::from(query))
            .send()?;

        if !response.status().is_success() {
            return Err(SourceError::Status(response.status().as_u16()));
        }

        let body = response.text()?;
        decode_graph_response(&body)
    }
}

impl GraphSource for ApiClient {
    fn query_graph(&self, query: &GraphQuery) -> Result<Graph, SourceError> {
        let payload = self.get_managed_object_graph(query)?;
        if let Some(stats) = payload.stats {
            tracing::debug!(
                root = %query.root,
                nodes = stats.node_count,
                edges = stats.edge_count,
                depth = stats.depth,
                "graph fetched"
            );
        }
        Ok(payload.into())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::NodeKind;

    const BODY: &str = r#"{
        "success": true,
        "message": "ok",
        "data": {
            "nodes": [
                {"id": "billing", "label": "billing", "type": "managed_object", "properties": {"status": "active"}},
                {"id": "billing-api", "label": "billing API", "type": "service", "properties": {"port": 8080}}
            ],
            "edges": [
                {"id": "billing-manages-billing-api", "source": "billing", "target": "billing-api", "type": "MANAGES", "label": "manages"}
            ],
            "center_node": "billing",
            "stats": {"node_count": 2, "edge_count": 1, "depth": 2}
        }
    }"#;

    #[test]
    fn test_decode_success() {
        let payload = decode_graph_response(BODY).unwrap();
        assert_eq!(payload.center_node.as_deref(), Some("billing"));
        assert_eq!(
            payload.stats,
            Some(GraphStats {
                node_count: 2,
                edge_count: 1,
                depth: 2
            })
        );

        let graph: Graph = payload.into();
        assert_eq!(graph.nodes[1].kind(), NodeKind::Service);
        assert_eq!(graph.nodes[1].properties["port"], 8080);
        assert!(graph.validate().is_ok());
    }

    #[test]
    fn test_decode_rejected() {
        let body = r#"{"success": false, "message": "not found", "data": null}"#;
        match decode_graph_response(body) {
            Err(SourceError::Rejected(msg)) => assert_eq!(msg, "not found"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            decode_graph_response("<html>"),
            Err(SourceError::Decode(_))
        ));
        let unknown_kind = r#"{"success": true, "data": {"nodes": [{"id": "x", "label": "x", "type": "planet"}]}}"#;
        assert!(matches!(
            decode_graph_response(unknown_kind),
            Err(SourceError::Decode(_))
        ));
    }

    #[test]
    fn test_request_body() {
        let query = GraphQuery::new("svc-a").with_depth(3);
        let body = serde_json::to_value(ManagedObjectGraphRequest::from(&query)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "managed_object": "svc-a",
                "depth": 3,
                "include_events": true,
                "include_services": true,
                "include_dependencies": true
            })
        );
    }

    #[test]
    fn test_offline_source_fails() {
        assert!(matches!(
            OfflineSource.query_graph(&GraphQuery::new("a")),
            Err(SourceError::Offline)
        ));
    }

    #[test]
    fn test_unreachable_service_is_transport_error() {
        let client =
            ApiClient::with_timeout("http://127.0.0.1:9/", Duration::from_millis(500)).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9");
        assert!(matches!(
            client.query_graph(&GraphQuery::new("svc-a")),
            Err(SourceError::Transport(_))
        ));
    }
}
