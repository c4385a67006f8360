//! Managed-Object Topology Graph
//!
//! Shows a managed object together with the services it manages, the events
//! that affect it and its external dependencies, laid out by a one-shot force
//! simulation on a pannable, zoomable 2D canvas.
//!
//! # Architecture
//!
//! ```text
//! root name
//!        │
//!        ▼
//! GraphSource (ApiClient, or synthetic fallback)
//!        │
//!        ▼
//! Graph (sanitized nodes/edges)
//!        │
//!        ▼
//! ForceLayout (positions written once per load)
//!        │
//!        ├──► GraphRenderer ──► Canvas (EguiCanvas / DrawList)
//!        │         │
//!        │         └──► grid → edges (arrows, labels) → nodes (halo, labels)
//!        │
//!        └──► InteractionController (pointer/wheel)
//!                    │
//!                    ▼
//!              Viewport (pan/zoom) + selection
//! ```
//!
//! # Usage
//!
//! ```ignore
//! let mut engine = GraphEngine::new(EngineConfig::from_env());
//! engine.query("svc-a");
//!
//! // In the host's event handlers:
//! engine.pointer_down(pos);
//! if let Some(change) = engine.take_selection_change() {
//!     // show details panel
//! }
//! ```

pub mod canvas;
pub mod colors;
pub mod force_sim;
pub mod input;
pub mod render;
pub mod synthetic;
pub mod types;
pub mod viewport;
pub mod widget;

pub use canvas::{Canvas, DrawCmd, DrawList, EguiCanvas};
pub use force_sim::{ForceConfig, ForceLayout};
pub use input::{hit_test, InteractionController, InteractionState};
pub use render::{GraphRenderer, RenderStyle};
pub use types::{edge_kind, Edge, Graph, Node, NodeKind};
pub use viewport::Viewport;
pub use widget::GraphWidget;

use egui::{Pos2, Vec2};

use crate::api::{ApiClient, GraphSource, OfflineSource};
use crate::config::EngineConfig;

// =============================================================================
// SELECTION OUTPUT
// =============================================================================

/// Selection notification for the host, polled via
/// [`GraphEngine::take_selection_change`]
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionChange {
    Selected(Node),
    Cleared,
}

// =============================================================================
// ENGINE
// =============================================================================

/// Owns the graph, the interaction state and the data source.
///
/// All calls are synchronous; `query` and `load` return only after layout has
/// finished.
pub struct GraphEngine {
    config: EngineConfig,
    source: Box<dyn GraphSource>,
    graph: Graph,
    layout: ForceLayout,
    renderer: GraphRenderer,
    controller: InteractionController,
    root: Option<String>,
    pending_change: Option<SelectionChange>,
}

impl std::fmt::Debug for GraphEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphEngine")
            .field("root", &self.root)
            .field("nodes", &self.graph.nodes.len())
            .field("edges", &self.graph.edges.len())
            .field("controller", &self.controller)
            .finish_non_exhaustive()
    }
}

impl GraphEngine {
    /// Engine whose source follows `config.api_base_url`
    pub fn new(config: EngineConfig) -> Self {
        let source: Box<dyn GraphSource> = match config.api_base_url.as_deref() {
            Some(url) => match ApiClient::new(url) {
                Ok(client) => Box::new(client),
                Err(err) => {
                    tracing::warn!(url, error = %err, "could not build API client, using synthetic graphs");
                    Box::new(OfflineSource)
                }
            },
            None => Box::new(OfflineSource),
        };
        Self::with_source(config, source)
    }

    /// Engine over an explicit source. Layout centre and surface size are
    /// taken from the config's canvas size.
    pub fn with_source(config: EngineConfig, source: Box<dyn GraphSource>) -> Self {
        let config = config.resolved();
        Self {
            layout: ForceLayout::new(config.layout.clone()),
            renderer: GraphRenderer::new(config.style.clone()),
            config,
            source,
            graph: Graph::default(),
            controller: InteractionController::new(),
            root: None,
            pending_change: None,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn viewport(&self) -> &Viewport {
        self.controller.viewport()
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    /// Root of the last successful query
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.controller
            .selection()
            .and_then(|id| self.graph.get_node(id))
    }

    /// Latest selection change since the previous call
    pub fn take_selection_change(&mut self) -> Option<SelectionChange> {
        self.pending_change.take()
    }

    // =========================================================================
    // DATA
    // =========================================================================

    /// Fetch and load the graph around `root`.
    ///
    /// A blank root does nothing and returns `false`. A failing source is
    /// replaced by the synthetic graph for the same query.
    pub fn query(&mut self, root: &str) -> bool {
        let root = root.trim();
        if root.is_empty() {
            tracing::debug!("ignoring blank graph query");
            return false;
        }

        let query = self.config.query_for(root);
        let graph = match self.source.query_graph(&query) {
            Ok(graph) => graph,
            Err(err) => {
                tracing::warn!(root, error = %err, "graph query failed, using synthetic graph");
                synthetic::generate_for(&query)
            }
        };

        self.root = Some(root.to_string());
        self.load(graph);
        true
    }

    /// Replace the graph, drop the selection and lay the new graph out
    pub fn load(&mut self, graph: Graph) {
        let mut graph = graph.sanitized();
        graph.clear_positions();
        self.layout.run(&mut graph);
        self.graph = graph;

        if self.controller.clear_selection() {
            self.pending_change = Some(SelectionChange::Cleared);
        }
        tracing::info!(
            nodes = self.graph.nodes.len(),
            edges = self.graph.edges.len(),
            "graph loaded"
        );
    }

    // =========================================================================
    // INTERACTION
    // =========================================================================

    pub fn pointer_down(&mut self, screen_pos: Pos2) -> bool {
        let before = self.controller.selection().map(str::to_owned);
        let changed = self.controller.pointer_down(screen_pos, &self.graph);
        self.note_selection(before);
        changed
    }

    pub fn pointer_move(&mut self, screen_pos: Pos2) -> bool {
        self.controller.pointer_move(screen_pos)
    }

    pub fn pointer_up(&mut self) -> bool {
        self.controller.pointer_up()
    }

    /// Select the node at `screen_pos` (or clear) without starting a pan
    pub fn select_at(&mut self, screen_pos: Pos2) -> bool {
        let changed = self.pointer_down(screen_pos);
        self.controller.pointer_up();
        changed
    }

    pub fn wheel(&mut self, delta_y: f32) -> bool {
        self.controller.wheel(delta_y)
    }

    pub fn pan(&mut self, dx: f32, dy: f32) -> bool {
        self.controller.pan_by(Vec2::new(dx, dy))
    }

    pub fn zoom(&mut self, factor: f32) -> bool {
        self.controller.zoom_by(factor)
    }

    pub fn reset_view(&mut self) -> bool {
        self.controller.reset_view()
    }

    pub fn clear_selection(&mut self) -> bool {
        let changed = self.controller.clear_selection();
        if changed {
            self.pending_change = Some(SelectionChange::Cleared);
        }
        changed
    }

    /// Redraw everything onto `canvas`
    pub fn render<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        self.renderer.render(
            canvas,
            &self.graph,
            self.controller.viewport(),
            self.controller.selection(),
        );
    }

    fn note_selection(&mut self, before: Option<String>) {
        if before.as_deref() == self.controller.selection() {
            return;
        }
        self.pending_change = Some(match self.selected_node() {
            Some(node) => SelectionChange::Selected(node.clone()),
            None => SelectionChange::Cleared,
        });
    }
}

impl Default for GraphEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

// =============================================================================
// TESTS
// =============================================================================
