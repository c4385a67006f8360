//! Error types for graph loading, data acquisition and configuration.

use thiserror::Error;

/// Structural problems found in a graph snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Two nodes share the same id.
    #[error("duplicate node id: {0}")]
    DuplicateNode(String),

    /// An edge points at a node that is not in the snapshot.
    #[error("edge {edge} references unknown node {endpoint}")]
    DanglingEdge { edge: String, endpoint: String },

    /// Node kind outside the closed set.
    #[error("unknown node kind: {0}")]
    UnknownKind(String),
}

/// Failures of a [`GraphSource`](crate::api::GraphSource).
///
/// None of these reach the renderer: the engine degrades to the synthetic
/// graph instead.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Network / client error.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("HTTP {0}")]
    Status(u16),

    /// Server answered but flagged the request as failed.
    #[error("query rejected: {0}")]
    Rejected(String),

    /// Body could not be decoded into a graph.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// No backing service configured.
    #[error("no graph service configured")]
    Offline,
}

/// Configuration loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
