//! Input handling - pointer and wheel interaction with the graph
//!
//! Two-state machine:
//! - `Idle`: pointer-down hit-tests nodes; a hit selects, a miss clears the
//!   selection and starts panning
//! - `Panning`: pointer-move drags the pan offset; pointer-up returns to Idle
//!
//! Wheel zoom works in either state. Nothing here touches the graph.

use egui::{Pos2, Vec2};

use super::colors::node_radius;
use super::types::Graph;
use super::viewport::Viewport;

// =============================================================================
// INTERACTION STATE
// =============================================================================

/// Pointer state
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InteractionState {
    #[default]
    Idle,
    /// Dragging the background; pan follows the pointer
    Panning {
        /// Screen position at pointer-down
        start_screen: Pos2,
        /// Pan offset at pointer-down
        start_pan: Vec2,
    },
}

// =============================================================================
// INTERACTION CONTROLLER
// =============================================================================

/// Owns the viewport and selection; turns raw input into changes to them.
///
/// Every handler returns `true` when the viewport or selection changed and
/// the view needs a repaint.
#[derive(Debug, Clone, Default)]
pub struct InteractionController {
    viewport: Viewport,
    selection: Option<String>,
    state: InteractionState,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn state(&self) -> InteractionState {
        self.state
    }

    pub fn is_panning(&self) -> bool {
        matches!(self.state, InteractionState::Panning { .. })
    }

    // =========================================================================
    // POINTER
    // =========================================================================

    /// Select the node under `screen_pos`, or clear selection and start panning
    pub fn pointer_down(&mut self, screen_pos: Pos2, graph: &Graph) -> bool {
        match hit_test(graph, &self.viewport, screen_pos) {
            Some(node_id) => {
                self.state = InteractionState::Idle;
                let changed = self.selection.as_deref() != Some(node_id);
                if changed {
                    tracing::debug!(node_id, "node selected");
                    self.selection = Some(node_id.to_string());
                }
                changed
            }
            None => {
                self.state = InteractionState::Panning {
                    start_screen: screen_pos,
                    start_pan: self.viewport.pan(),
                };
                self.selection.take().is_some()
            }
        }
    }

    /// Drag the pan offset while panning; no effect when idle
    pub fn pointer_move(&mut self, screen_pos: Pos2) -> bool {
        let InteractionState::Panning {
            start_screen,
            start_pan,
        } = self.state
        else {
            return false;
        };
        let pan = (screen_pos - start_screen) + start_pan;
        let changed = pan != self.viewport.pan();
        self.viewport.set_pan(pan);
        changed
    }

    /// End any pan gesture
    pub fn pointer_up(&mut self) -> bool {
        self.state = InteractionState::Idle;
        false
    }

    // =========================================================================
    // WHEEL / COMMANDS
    // =========================================================================

    /// Zoom in (negative delta) or out (positive delta); state unchanged
    pub fn wheel(&mut self, delta_y: f32) -> bool {
        self.viewport.apply_wheel(delta_y)
    }

    /// Multiply zoom by `factor` (clamped)
    pub fn zoom_by(&mut self, factor: f32) -> bool {
        self.viewport.zoom_by(factor)
    }

    /// Offset the pan by a screen-space delta
    pub fn pan_by(&mut self, delta: Vec2) -> bool {
        self.viewport.pan_by(delta);
        delta != Vec2::ZERO
    }

    /// Restore the initial viewport
    pub fn reset_view(&mut self) -> bool {
        let changed = self.viewport != Viewport::default();
        self.viewport.reset();
        changed
    }

    /// Drop the selection (e.g. when the graph is replaced)
    pub fn clear_selection(&mut self) -> bool {
        self.selection.take().is_some()
    }
}

// =============================================================================
// HIT TESTING
// =============================================================================

/// Node under a screen position.
///
/// Circle containment with each node's render radius. When nodes overlap
/// the one drawn last (topmost) wins.
pub fn hit_test<'g>(graph: &'g Graph, viewport: &Viewport, screen_pos: Pos2) -> Option<&'g str> {
    let model_pos = viewport.screen_to_model(screen_pos);

    // Reverse for top-first
    graph.nodes.iter().rev().find_map(|node| {
        let center = node.position()?;
        let radius = node_radius(node.kind());
        ((model_pos - center).length() <= radius).then_some(node.id.as_str())
    })
}

// =============================================================================
// TESTS
// =============================================================================
