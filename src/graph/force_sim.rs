//! Force-directed layout for the knowledge-graph view
//!
//! Runs once per loaded graph, synchronously, for a fixed number of steps.
//! There is no convergence check, so the cost is bounded and the result is
//! deterministic for a given input.
//!
//! Each step applies:
//! - Repulsion between all node pairs (inverse square law)
//! - Attraction along edges (linear in distance)
//! - A hard anchor that puts the managed-object node back on the centre
//!
//! Designed for tens of nodes; the pairwise repulsion pass is O(n²).
//!
//! # Usage
//! ```ignore
//! let layout = ForceLayout::new(ForceConfig::for_canvas(800.0, 600.0));
//! layout.run(&mut graph);
//! let root = graph.center_node().and_then(|n| n.position());
//! ```

use egui::{Pos2, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f32::consts::TAU;

use super::types::{Graph, NodeKind};

/// Direction used to separate nodes that sit on exactly the same point
const GOLDEN_ANGLE: f32 = 2.39996;

// =============================================================================
// LAYOUT CONFIG
// =============================================================================

/// Configuration for the force layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceConfig {
    /// Number of simulation steps (always run to completion)
    pub iterations: usize,

    /// Repulsion constant: force = repulsion / distance²
    pub repulsion: f32,

    /// Attraction constant: force = attraction * distance
    pub attraction: f32,

    /// Distance floor for the repulsion term
    pub min_distance: f32,

    /// Initial ring radius for service nodes
    pub service_ring: f32,

    /// Initial ring radius for event nodes
    pub event_ring: f32,

    /// Initial ring radius for dependency nodes
    pub dependency_ring: f32,

    /// Anchor point for the managed-object node (logical canvas centre).
    /// Not read from config files; derived from the canvas size.
    #[serde(skip)]
    pub center: Pos2,
}

/// Logical canvas size used when no other size is configured
pub const DEFAULT_CANVAS_WIDTH: f32 = 800.0;
pub const DEFAULT_CANVAS_HEIGHT: f32 = 600.0;

impl Default for ForceConfig {
    fn default() -> Self {
        Self {
            iterations: 100,
            repulsion: 5000.0,
            attraction: 0.01,
            min_distance: 10.0,
            service_ring: 150.0,
            event_ring: 200.0,
            dependency_ring: 250.0,
            center: Pos2::new(DEFAULT_CANVAS_WIDTH / 2.0, DEFAULT_CANVAS_HEIGHT / 2.0),
        }
    }
}

impl ForceConfig {
    /// Config anchored at the centre of a `width` x `height` canvas
    pub fn for_canvas(width: f32, height: f32) -> Self {
        Self {
            center: Pos2::new(width / 2.0, height / 2.0),
            ..Self::default()
        }
    }

    /// Initial ring radius for a node kind.
    ///
    /// Extra managed-object nodes (beyond the anchor) share the service ring.
    pub fn ring_radius(&self, kind: NodeKind) -> f32 {
        match kind {
            NodeKind::ManagedObject | NodeKind::Service => self.service_ring,
            NodeKind::Event => self.event_ring,
            NodeKind::Dependency => self.dependency_ring,
        }
    }
}

// =============================================================================
// FORCE LAYOUT
// =============================================================================

/// One-shot force-directed layout
#[derive(Debug, Clone, Default)]
pub struct ForceLayout {
    pub config: ForceConfig,
}

impl ForceLayout {
    pub fn new(config: ForceConfig) -> Self {
        Self { config }
    }

    /// Assign a position to every node of `graph`, in place.
    pub fn run(&self, graph: &mut Graph) {
        let n = graph.nodes.len();
        if n == 0 {
            return;
        }

        let anchor = graph
            .nodes
            .iter()
            .position(|node| node.kind() == NodeKind::ManagedObject);

        let mut positions = self.initial_positions(graph, anchor);

        let index: HashMap<&str, usize> = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (node.id.as_str(), i))
            .collect();
        let springs: Vec<(usize, usize)> = graph
            .edges
            .iter()
            .filter_map(|edge| {
                let source = index.get(edge.source_id.as_str())?;
                let target = index.get(edge.target_id.as_str())?;
                Some((*source, *target))
            })
            .collect();

        for _ in 0..self.config.iterations {
            self.step(&mut positions, &springs, anchor);
        }

        for (node, pos) in graph.nodes.iter_mut().zip(positions) {
            node.set_position(pos);
        }

        tracing::debug!(
            nodes = n,
            edges = springs.len(),
            iterations = self.config.iterations,
            "force layout complete"
        );
    }

    /// Anchor on the centre, everyone else on a ring by kind
    fn initial_positions(&self, graph: &Graph, anchor: Option<usize>) -> Vec<Pos2> {
        let n = graph.nodes.len() as f32;
        let center = self.config.center;

        graph
            .nodes
            .iter()
            .enumerate()
            .map(|(i, node)| {
                if Some(i) == anchor {
                    center
                } else {
                    let angle = TAU * (i as f32) / n;
                    center + Vec2::angled(angle) * self.config.ring_radius(node.kind())
                }
            })
            .collect()
    }

    /// One simulation step: repulsion, attraction, anchor
    fn step(&self, positions: &mut [Pos2], springs: &[(usize, usize)], anchor: Option<usize>) {
        let n = positions.len();

        // Repulsion between all pairs
        for i in 0..n {
            for j in (i + 1)..n {
                let delta = positions[j] - positions[i];
                let dist = delta.length();
                let dir = if dist > f32::EPSILON {
                    delta / dist
                } else {
                    Vec2::angled(GOLDEN_ANGLE * (i + j) as f32)
                };
                let dist = dist.max(self.config.min_distance);
                let push = dir * (self.config.repulsion / (dist * dist));

                positions[i] -= push;
                positions[j] += push;
            }
        }

        // Attraction along edges, split between both endpoints
        for &(source, target) in springs {
            if source == target {
                continue;
            }
            let delta = positions[target] - positions[source];
            let dist = delta.length();
            if dist <= f32::EPSILON {
                continue;
            }
            let pull = (delta / dist) * (self.config.attraction * dist * 0.5);

            positions[source] += pull;
            positions[target] -= pull;
        }

        if let Some(anchor) = anchor {
            positions[anchor] = self.config.center;
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
