//! egui host integration for [`GraphEngine`].
//!
//! The widget owns the engine, forwards pointer, wheel and keyboard input to
//! it and renders into the allocated rect through an [`EguiCanvas`]. Pointer
//! positions are converted to the logical surface before reaching the
//! engine, so hit testing matches what is drawn at any widget size.

use egui::{Align2, Color32, FontId, Key, Pos2, Response, Sense, Ui};

use super::canvas::EguiCanvas;
use super::viewport::{ZOOM_IN_FACTOR, ZOOM_OUT_FACTOR};
use super::GraphEngine;

const STATUS_COLOR: Color32 = Color32::from_rgb(96, 96, 96);

pub struct GraphWidget {
    engine: GraphEngine,
}

impl GraphWidget {
    pub fn new(engine: GraphEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &GraphEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut GraphEngine {
        &mut self.engine
    }

    /// Allocate the remaining space, handle input and draw the graph
    pub fn ui(&mut self, ui: &mut Ui) -> Response {
        let available = ui.available_size();
        let (response, painter) = ui.allocate_painter(available, Sense::click_and_drag());
        let screen_rect = response.rect;

        let surface_size = self.engine.config().style.surface_size;
        let mut canvas = EguiCanvas::new(&painter, screen_rect, surface_size);

        let mut needs_repaint = self.handle_pointer(ui, &response, &canvas);
        needs_repaint |= self.handle_keyboard(ui);

        self.engine.render(&mut canvas);
        self.render_status(&painter, screen_rect);

        if needs_repaint {
            ui.ctx().request_repaint();
        }
        response
    }

    fn handle_pointer(&mut self, ui: &Ui, response: &Response, canvas: &EguiCanvas<'_>) -> bool {
        let (pressed, down, released, pos, scroll) = ui.input(|i| {
            (
                i.pointer.primary_pressed(),
                i.pointer.primary_down(),
                i.pointer.primary_released(),
                i.pointer.interact_pos(),
                i.raw_scroll_delta.y,
            )
        });
        let logical = pos.map(|p| canvas.screen_to_logical(p));
        let mut needs_repaint = false;

        if let Some(point) = logical {
            if pressed && response.hovered() {
                needs_repaint |= self.engine.pointer_down(point);
            } else if down {
                needs_repaint |= self.engine.pointer_move(point);
            }
        }
        if released {
            needs_repaint |= self.engine.pointer_up();
        }

        // egui reports wheel-up as positive; the engine expects wheel-down positive
        if scroll != 0.0 && response.hovered() {
            needs_repaint |= self.engine.wheel(-scroll);
        }

        needs_repaint
    }

    fn handle_keyboard(&mut self, ui: &Ui) -> bool {
        let (escape, reset, zoom_in, zoom_out) = ui.input(|i| {
            (
                i.key_pressed(Key::Escape),
                i.key_pressed(Key::R) || i.key_pressed(Key::Num0),
                i.key_pressed(Key::Plus) || i.key_pressed(Key::Equals),
                i.key_pressed(Key::Minus),
            )
        });

        let mut needs_repaint = false;
        if escape {
            needs_repaint |= self.engine.clear_selection();
        }
        if reset {
            needs_repaint |= self.engine.reset_view();
        }
        if zoom_in {
            needs_repaint |= self.engine.zoom(ZOOM_IN_FACTOR);
        }
        if zoom_out {
            needs_repaint |= self.engine.zoom(ZOOM_OUT_FACTOR);
        }
        needs_repaint
    }

    fn render_status(&self, painter: &egui::Painter, screen_rect: egui::Rect) {
        let graph = self.engine.graph();
        let mut status = format!(
            "{} nodes | {} edges | {:.0}%",
            graph.nodes.len(),
            graph.edges.len(),
            self.engine.viewport().zoom() * 100.0
        );
        if let Some(node) = self.engine.selected_node() {
            status.push_str(&format!(" | {} ({})", node.label, node.kind()));
        }
        painter.text(
            Pos2::new(screen_rect.left() + 8.0, screen_rect.bottom() - 8.0),
            Align2::LEFT_BOTTOM,
            status,
            FontId::proportional(11.0),
            STATUS_COLOR,
        );
    }
}
