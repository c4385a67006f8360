//! Drawing surfaces for the graph renderer.
//!
//! The renderer talks to a [`Canvas`], never to egui directly. Two
//! implementations ship with the crate:
//! - [`DrawList`] records every call, so a render pass can be asserted on
//! - [`EguiCanvas`] forwards to an `egui::Painter`, applying the viewport
//!   transform itself (the painter has no transform stack)

use egui::{Align2, Color32, FontId, Pos2, Rect, Shape, Stroke, Vec2};

/// Immediate-mode drawing target.
///
/// After [`Canvas::set_transform`], every coordinate and size passed to the
/// drawing methods is in model space.
pub trait Canvas {
    /// Fill the whole surface
    fn clear(&mut self, color: Color32);

    /// Translate by `pan`, then scale by `zoom`
    fn set_transform(&mut self, pan: Vec2, zoom: f32);

    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke);

    /// Filled convex polygon
    fn polygon(&mut self, points: Vec<Pos2>, fill: Color32);

    fn circle(&mut self, center: Pos2, radius: f32, fill: Color32, stroke: Stroke);

    fn text(&mut self, pos: Pos2, anchor: Align2, text: &str, size: f32, color: Color32);
}

// =============================================================================
// DRAW LIST (recording canvas)
// =============================================================================

/// One recorded drawing call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear(Color32),
    Transform {
        pan: Vec2,
        zoom: f32,
    },
    Line {
        from: Pos2,
        to: Pos2,
        stroke: Stroke,
    },
    Polygon {
        points: Vec<Pos2>,
        fill: Color32,
    },
    Circle {
        center: Pos2,
        radius: f32,
        fill: Color32,
        stroke: Stroke,
    },
    Text {
        pos: Pos2,
        anchor: Align2,
        text: String,
        size: f32,
        color: Color32,
    },
}

/// Canvas that records calls instead of drawing
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCmd>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCmd> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCmd::Circle { .. }))
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCmd::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Index of the first text command with exactly `text`
    pub fn position_of_text(&self, text: &str) -> Option<usize> {
        self.commands
            .iter()
            .position(|c| matches!(c, DrawCmd::Text { text: t, .. } if t == text))
    }
}

impl Canvas for DrawList {
    fn clear(&mut self, color: Color32) {
        self.commands.push(DrawCmd::Clear(color));
    }

    fn set_transform(&mut self, pan: Vec2, zoom: f32) {
        self.commands.push(DrawCmd::Transform { pan, zoom });
    }

    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        self.commands.push(DrawCmd::Line { from, to, stroke });
    }

    fn polygon(&mut self, points: Vec<Pos2>, fill: Color32) {
        self.commands.push(DrawCmd::Polygon { points, fill });
    }

    fn circle(&mut self, center: Pos2, radius: f32, fill: Color32, stroke: Stroke) {
        self.commands.push(DrawCmd::Circle {
            center,
            radius,
            fill,
            stroke,
        });
    }

    fn text(&mut self, pos: Pos2, anchor: Align2, text: &str, size: f32, color: Color32) {
        self.commands.push(DrawCmd::Text {
            pos,
            anchor,
            text: text.to_string(),
            size,
            color,
        });
    }
}

// =============================================================================
// EGUI CANVAS
// =============================================================================

/// Canvas backed by an egui painter.
///
/// The logical surface (e.g. 800x600) is scaled uniformly to fit `screen_rect`,
/// so model coordinates stay independent of the widget's on-screen size.
pub struct EguiCanvas<'a> {
    painter: &'a egui::Painter,
    screen_rect: Rect,
    /// Logical-to-screen scale
    surface_scale: f32,
    pan: Vec2,
    zoom: f32,
}

impl<'a> EguiCanvas<'a> {
    pub fn new(painter: &'a egui::Painter, screen_rect: Rect, logical_size: Vec2) -> Self {
        let surface_scale = if logical_size.x > 0.0 && logical_size.y > 0.0 {
            (screen_rect.width() / logical_size.x).min(screen_rect.height() / logical_size.y)
        } else {
            1.0
        };
        Self {
            painter,
            screen_rect,
            surface_scale,
            pan: Vec2::ZERO,
            zoom: 1.0,
        }
    }

    /// Logical-surface position for a point on screen (inverse of the surface fit)
    pub fn screen_to_logical(&self, screen_pos: Pos2) -> Pos2 {
        ((screen_pos - self.screen_rect.min) / self.surface_scale).to_pos2()
    }

    fn to_screen(&self, model_pos: Pos2) -> Pos2 {
        let logical = model_pos.to_vec2() * self.zoom + self.pan;
        self.screen_rect.min + logical * self.surface_scale
    }

    fn scale(&self, model_len: f32) -> f32 {
        model_len * self.zoom * self.surface_scale
    }

    fn scale_stroke(&self, stroke: Stroke) -> Stroke {
        Stroke::new(self.scale(stroke.width), stroke.color)
    }
}

impl Canvas for EguiCanvas<'_> {
    fn clear(&mut self, color: Color32) {
        self.painter.rect_filled(self.screen_rect, 0.0, color);
    }

    fn set_transform(&mut self, pan: Vec2, zoom: f32) {
        self.pan = pan;
        self.zoom = zoom;
    }

    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        self.painter.line_segment(
            [self.to_screen(from), self.to_screen(to)],
            self.scale_stroke(stroke),
        );
    }

    fn polygon(&mut self, points: Vec<Pos2>, fill: Color32) {
        let points = points.into_iter().map(|p| self.to_screen(p)).collect();
        self.painter
            .add(Shape::convex_polygon(points, fill, Stroke::NONE));
    }

    fn circle(&mut self, center: Pos2, radius: f32, fill: Color32, stroke: Stroke) {
        self.painter.circle(
            self.to_screen(center),
            self.scale(radius),
            fill,
            self.scale_stroke(stroke),
        );
    }

    fn text(&mut self, pos: Pos2, anchor: Align2, text: &str, size: f32, color: Color32) {
        // Tiny fonts are unreadable and costly to lay out
        let font_size = self.scale(size);
        if font_size < 4.0 {
            return;
        }
        self.painter.text(
            self.to_screen(pos),
            anchor,
            text,
            FontId::proportional(font_size),
            color,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draw_list_records_in_order() {
        let mut list = DrawList::new();
        list.clear(Color32::WHITE);
        list.set_transform(Vec2::new(5.0, 5.0), 2.0);
        list.circle(Pos2::ZERO, 3.0, Color32::RED, Stroke::NONE);
        list.text(Pos2::ZERO, Align2::CENTER_TOP, "hello", 12.0, Color32::BLACK);

        assert_eq!(list.len(), 4);
        assert_eq!(list.commands[0], DrawCmd::Clear(Color32::WHITE));
        assert_eq!(list.circles().count(), 1);
        assert_eq!(list.position_of_text("hello"), Some(3));
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["hello"]);
    }
}
