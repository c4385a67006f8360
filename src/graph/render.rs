//! Rendering - draws grid, edges and nodes onto a [`Canvas`]
//!
//! A render pass is a pure function of `(Graph, Viewport, Selection)`: it
//! keeps no state between calls and can run on every state change.
//!
//! Draw order is fixed: grid → edges (line, arrow, label) → nodes (halo,
//! circle, label). Edges never cover a node or its selection halo.

use egui::{Align2, Pos2, Stroke, Vec2};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use super::canvas::Canvas;
use super::colors;
use super::force_sim::{DEFAULT_CANVAS_HEIGHT, DEFAULT_CANVAS_WIDTH};
use super::types::{Edge, Graph, Node};
use super::viewport::Viewport;

/// Upper bound on grid lines per axis
const MAX_GRID_LINES: usize = 2000;

// =============================================================================
// RENDER STYLE
// =============================================================================

/// Sizes used by the renderer, all in model units
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Logical surface size; the grid covers whatever part of it is visible.
    /// Derived from the configured canvas size.
    #[serde(skip)]
    pub surface_size: Vec2,
    pub grid_cell: f32,
    pub grid_width: f32,
    pub edge_width: f32,
    pub arrow_length: f32,
    /// Half the opening angle of the arrowhead, radians
    pub arrow_half_angle: f32,
    pub outline_width: f32,
    /// Extra radius of the selection halo over the node radius
    pub halo_padding: f32,
    pub node_label_size: f32,
    pub edge_label_size: f32,
    /// Gap between a node's rim and its label
    pub label_gap: f32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            surface_size: Vec2::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT),
            grid_cell: 50.0,
            grid_width: 1.0,
            edge_width: 2.0,
            arrow_length: 10.0,
            arrow_half_angle: PI / 6.0,
            outline_width: 2.0,
            halo_padding: 8.0,
            node_label_size: 12.0,
            edge_label_size: 10.0,
            label_gap: 4.0,
        }
    }
}

// =============================================================================
// GRAPH RENDERER
// =============================================================================

#[derive(Debug, Clone, Default)]
pub struct GraphRenderer {
    pub style: RenderStyle,
}

impl GraphRenderer {
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }

    /// Full redraw of `graph` through `viewport`, highlighting `selection`
    pub fn render<C: Canvas + ?Sized>(
        &self,
        canvas: &mut C,
        graph: &Graph,
        viewport: &Viewport,
        selection: Option<&str>,
    ) {
        canvas.clear(colors::BACKGROUND);
        canvas.set_transform(viewport.pan(), viewport.zoom());

        self.render_grid(canvas, viewport);

        for edge in &graph.edges {
            self.render_edge(canvas, graph, edge);
        }

        for node in &graph.nodes {
            self.render_node(canvas, node, selection == Some(node.id.as_str()));
        }
    }

    /// Uniform grid over the visible part of the surface, fixed cell size in
    /// model units
    fn render_grid<C: Canvas + ?Sized>(&self, canvas: &mut C, viewport: &Viewport) {
        let cell = self.style.grid_cell;
        if cell <= 0.0 {
            return;
        }
        let visible = viewport.visible_model_rect(self.style.surface_size);
        let stroke = Stroke::new(self.style.grid_width, colors::GRID_LINE);

        if let Some(columns) = grid_indices(visible.min.x, visible.max.x, cell) {
            for i in columns {
                let x = i as f32 * cell;
                canvas.line(
                    Pos2::new(x, visible.min.y),
                    Pos2::new(x, visible.max.y),
                    stroke,
                );
            }
        }

        if let Some(rows) = grid_indices(visible.min.y, visible.max.y, cell) {
            for i in rows {
                let y = i as f32 * cell;
                canvas.line(
                    Pos2::new(visible.min.x, y),
                    Pos2::new(visible.max.x, y),
                    stroke,
                );
            }
        }
    }

    /// Straight line, arrowhead on the target's rim, label at the midpoint
    fn render_edge<C: Canvas + ?Sized>(&self, canvas: &mut C, graph: &Graph, edge: &Edge) {
        let (Some(source), Some(target)) =
            (graph.get_node(&edge.source_id), graph.get_node(&edge.target_id))
        else {
            return;
        };
        let (Some(from), Some(to)) = (source.position(), target.position()) else {
            return;
        };

        canvas.line(
            from,
            to,
            Stroke::new(self.style.edge_width, colors::EDGE_LINE),
        );

        let delta = to - from;
        let dist = delta.length();
        if dist > f32::EPSILON {
            let angle = delta.y.atan2(delta.x);
            let rim = colors::node_radius(target.kind()).min(dist);
            let tip = to - delta / dist * rim;
            canvas.polygon(self.arrow_head(tip, angle), colors::EDGE_LINE);
        }

        let mid = from + delta * 0.5;
        canvas.text(
            mid,
            Align2::CENTER_CENTER,
            edge.display_label(),
            self.style.edge_label_size,
            colors::EDGE_LABEL,
        );
    }

    /// Triangle with its tip at `tip`, pointing along `angle`
    fn arrow_head(&self, tip: Pos2, angle: f32) -> Vec<Pos2> {
        let len = self.style.arrow_length;
        let half = self.style.arrow_half_angle;
        vec![
            tip,
            tip - Vec2::angled(angle - half) * len,
            tip - Vec2::angled(angle + half) * len,
        ]
    }

    /// Halo (if selected) under a filled, outlined circle, label below
    fn render_node<C: Canvas + ?Sized>(&self, canvas: &mut C, node: &Node, selected: bool) {
        let Some(center) = node.position() else {
            return;
        };
        let radius = colors::node_radius(node.kind());

        if selected {
            canvas.circle(
                center,
                radius + self.style.halo_padding,
                colors::halo_color(),
                Stroke::NONE,
            );
        }

        canvas.circle(
            center,
            radius,
            colors::node_fill(node.kind()),
            Stroke::new(self.style.outline_width, colors::NODE_OUTLINE),
        );

        canvas.text(
            center + Vec2::new(0.0, radius + self.style.label_gap),
            Align2::CENTER_TOP,
            &node.label,
            self.style.node_label_size,
            colors::NODE_LABEL,
        );
    }
}

/// Cell indices of the grid lines between `min` and `max`.
///
/// `None` when the span is not finite or would need more than
/// [`MAX_GRID_LINES`] lines.
fn grid_indices(min: f32, max: f32, cell: f32) -> Option<std::ops::RangeInclusive<i64>> {
    let first = (min / cell).ceil();
    let last = (max / cell).floor();
    if !first.is_finite() || !last.is_finite() || last - first > MAX_GRID_LINES as f32 {
        return None;
    }
    Some(first as i64..=last as i64)
}

/// Render with the default style
pub fn render<C: Canvas + ?Sized>(
    canvas: &mut C,
    graph: &Graph,
    viewport: &Viewport,
    selection: Option<&str>,
) {
    GraphRenderer::default().render(canvas, graph, viewport, selection);
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::canvas::{DrawCmd, DrawList};
    use crate::graph::force_sim::ForceLayout;
    use crate::graph::synthetic;
    use crate::graph::types::NodeKind;

    fn laid_out(root: &str) -> Graph {
        let mut graph = synthetic::generate(root);
        ForceLayout::default().run(&mut graph);
        graph
    }

    fn is_line_of(cmd: &DrawCmd, color: egui::Color32) -> bool {
        matches!(cmd, DrawCmd::Line { stroke, .. } if stroke.color == color)
    }

    #[test]
    fn test_starts_with_clear_and_transform() {
        let graph = laid_out("svc-a");
        let mut vp = Viewport::new();
        vp.set_pan(Vec2::new(12.0, -7.0));
        vp.zoom_by(1.5);

        let mut list = DrawList::new();
        render(&mut list, &graph, &vp, None);

        assert_eq!(list.commands[0], DrawCmd::Clear(colors::BACKGROUND));
        assert_eq!(
            list.commands[1],
            DrawCmd::Transform {
                pan: Vec2::new(12.0, -7.0),
                zoom: 1.5
            }
        );
    }

    #[test]
    fn test_draw_order_grid_edges_nodes() {
        let graph = laid_out("svc-a");
        let mut list = DrawList::new();
        render(&mut list, &graph, &Viewport::new(), Some("svc-a-db"));

        let last_grid = list
            .commands
            .iter()
            .rposition(|c| is_line_of(c, colors::GRID_LINE))
            .unwrap();
        let first_edge = list
            .commands
            .iter()
            .position(|c| is_line_of(c, colors::EDGE_LINE))
            .unwrap();
        let last_edge_part = list
            .commands
            .iter()
            .rposition(|c| {
                is_line_of(c, colors::EDGE_LINE) || matches!(c, DrawCmd::Polygon { .. })
            })
            .unwrap();
        let first_circle = list
            .commands
            .iter()
            .position(|c| matches!(c, DrawCmd::Circle { .. }))
            .unwrap();

        assert!(last_grid < first_edge);
        assert!(last_edge_part < first_circle);
    }

    #[test]
    fn test_one_arrow_per_edge() {
        let graph = laid_out("svc-a");
        let mut list = DrawList::new();
        render(&mut list, &graph, &Viewport::new(), None);

        let arrows = list
            .commands
            .iter()
            .filter(|c| matches!(c, DrawCmd::Polygon { points, .. } if points.len() == 3))
            .count();
        assert_eq!(arrows, graph.edges.len());
        assert!(list.texts().any(|t| t == "manages"));
    }

    #[test]
    fn test_arrow_tip_on_target_rim() {
        let graph = laid_out("svc-a");
        let mut list = DrawList::new();
        render(&mut list, &graph, &Viewport::new(), None);

        let dep = graph.get_node("dep-001").unwrap();
        let dep_pos = dep.position().unwrap();
        let rim = colors::node_radius(NodeKind::Dependency);
        let touches_rim = list.commands.iter().any(|c| match c {
            DrawCmd::Polygon { points, .. } => ((points[0] - dep_pos).length() - rim).abs() < 1e-3,
            _ => false,
        });
        assert!(touches_rim);
    }

    #[test]
    fn test_halo_only_for_selection() {
        let graph = laid_out("svc-a");
        let mut plain = DrawList::new();
        render(&mut plain, &graph, &Viewport::new(), None);
        assert_eq!(plain.circles().count(), graph.nodes.len());

        let mut selected = DrawList::new();
        render(&mut selected, &graph, &Viewport::new(), Some("evt-002"));
        assert_eq!(selected.circles().count(), graph.nodes.len() + 1);

        // Halo sits directly beneath the selected node's circle
        let pos = graph.get_node("evt-002").unwrap().position().unwrap();
        let at_node: Vec<&DrawCmd> = selected
            .circles()
            .filter(|c| matches!(c, DrawCmd::Circle { center, .. } if *center == pos))
            .collect();
        assert_eq!(at_node.len(), 2);
        match (at_node[0], at_node[1]) {
            (DrawCmd::Circle { radius: halo, fill, .. }, DrawCmd::Circle { radius, .. }) => {
                assert!(halo > radius);
                assert_eq!(*fill, colors::halo_color());
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_labels_below_nodes() {
        let graph = laid_out("svc-a");
        let mut list = DrawList::new();
        render(&mut list, &graph, &Viewport::new(), None);

        let root = graph.get_node("svc-a").unwrap().position().unwrap();
        let label = list
            .commands
            .iter()
            .find_map(|c| match c {
                DrawCmd::Text { text, pos, .. } if text == "svc-a" => Some(*pos),
                _ => None,
            })
            .unwrap();
        assert!(label.y > root.y + colors::node_radius(NodeKind::ManagedObject));
    }

    #[test]
    fn test_unpositioned_graph_draws_only_grid() {
        let graph = synthetic::generate("svc-a");
        let mut list = DrawList::new();
        render(&mut list, &graph, &Viewport::new(), None);

        assert_eq!(list.circles().count(), 0);
        assert!(list
            .commands
            .iter()
            .skip(2)
            .all(|c| is_line_of(c, colors::GRID_LINE)));
    }

    #[test]
    fn test_render_is_pure() {
        let graph = laid_out("svc-a");
        let vp = Viewport::new();
        let mut first = DrawList::new();
        let mut second = DrawList::new();
        render(&mut first, &graph, &vp, Some("svc-a"));
        render(&mut second, &graph, &vp, Some("svc-a"));
        assert_eq!(first.commands, second.commands);
    }

    #[test]
    fn test_grid_density_independent_of_zoom() {
        let graph = Graph::default();
        let mut vp = Viewport::new();
        vp.zoom_by(2.0);

        let mut list = DrawList::new();
        render(&mut list, &graph, &vp, None);

        let xs: Vec<f32> = list
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCmd::Line { from, to, stroke }
                    if stroke.color == colors::GRID_LINE && from.x == to.x =>
                {
                    Some(from.x)
                }
                _ => None,
            })
            .collect();
        assert!(xs.len() >= 2);
        for pair in xs.windows(2) {
            assert!((pair[1] - pair[0] - 50.0).abs() < 1e-3);
        }
    }

    #[test]
    fn test_grid_far_from_origin_is_bounded() {
        let graph = laid_out("svc-a");
        let mut vp = Viewport::new();
        vp.zoom_by(0.1);
        vp.pan_by(Vec2::new(-3.0e8, 0.0));

        let mut list = DrawList::new();
        render(&mut list, &graph, &vp, None);

        let grid_lines = list
            .commands
            .iter()
            .filter(|c| is_line_of(c, colors::GRID_LINE))
            .count();
        assert!(grid_lines > 0);
        assert!(grid_lines <= 2 * (MAX_GRID_LINES + 1));

        let mut unbounded = Viewport::new();
        unbounded.pan_by(Vec2::new(f32::INFINITY, 0.0));
        let mut list = DrawList::new();
        render(&mut list, &graph, &unbounded, None);
        assert!(list.len() < 2 * MAX_GRID_LINES + 100);
    }
}
