//! Colour palette and sizing for the graph view
//!
//! Every node kind has a fixed fill colour and render radius. The radius is
//! shared by the renderer and the hit test so clicks match what is drawn.

use egui::Color32;

use super::types::NodeKind;

// =============================================================================
// NODE KIND COLORS
// =============================================================================

/// Fill colour for a node kind
pub fn node_fill(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::ManagedObject => Color32::from_rgb(24, 144, 255), // Blue
        NodeKind::Service => Color32::from_rgb(82, 196, 26),        // Green
        NodeKind::Event => Color32::from_rgb(250, 140, 22),         // Orange
        NodeKind::Dependency => Color32::from_rgb(114, 46, 209),    // Purple
    }
}

/// Render radius (model units) for a node kind
pub fn node_radius(kind: NodeKind) -> f32 {
    match kind {
        NodeKind::ManagedObject => 30.0,
        NodeKind::Service => 25.0,
        NodeKind::Event => 20.0,
        NodeKind::Dependency => 22.0,
    }
}

/// Outline drawn around every node
pub const NODE_OUTLINE: Color32 = Color32::WHITE;

/// Selection halo, translucent version of the selection accent
pub fn halo_color() -> Color32 {
    Color32::from_rgba_unmultiplied(24, 144, 255, 77)
}

// =============================================================================
// SCENE COLORS
// =============================================================================

pub const BACKGROUND: Color32 = Color32::from_rgb(250, 250, 250);
pub const GRID_LINE: Color32 = Color32::from_rgb(235, 235, 235);
pub const EDGE_LINE: Color32 = Color32::from_rgb(153, 153, 153);
pub const EDGE_LABEL: Color32 = Color32::from_rgb(102, 102, 102);
pub const NODE_LABEL: Color32 = Color32::from_rgb(51, 51, 51);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds_are_distinct() {
        let fills: std::collections::HashSet<_> =
            NodeKind::all().iter().map(|k| node_fill(*k)).collect();
        assert_eq!(fills.len(), NodeKind::all().len());
    }

    #[test]
    fn test_root_is_largest() {
        for kind in NodeKind::all() {
            assert!(node_radius(*kind) <= node_radius(NodeKind::ManagedObject));
        }
    }

    #[test]
    fn test_halo_is_translucent() {
        assert!(halo_color().a() < 255);
    }
}
