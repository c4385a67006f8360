//! TKG Graph Canvas
//!
//! Interactive topology view for the temporal knowledge graph: one managed
//! object, the services it manages, the events affecting it and its
//! dependencies. The engine is toolkit-agnostic; [`graph::GraphWidget`] hosts
//! it inside egui.

pub mod api;
pub mod config;
pub mod error;
pub mod graph;

pub use api::{ApiClient, GraphQuery, GraphSource, OfflineSource};
pub use config::EngineConfig;
pub use error::{ConfigError, GraphError, SourceError};
pub use graph::{
    // Core graph types
    Edge,
    Graph,
    // Engine and host integration
    GraphEngine,
    GraphWidget,
    Node,
    NodeKind,
    SelectionChange,
    Viewport,
};
