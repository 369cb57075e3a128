use egui::{Color32, Pos2, Rect, Vec2};

use super::ToolKind;
use crate::geometry;

/// A stroke-class edit: freehand line, arrow, rectangle, or one of the
/// filter brushes. Defined by an ordered point list (at least one point).
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeAction {
    id: u64,
    tool: ToolKind,
    points: Vec<Pos2>,
    width: f32,
    color: Color32,
    intensity: Option<f32>,
}

impl StrokeAction {
    pub(crate) fn new(
        id: u64,
        tool: ToolKind,
        points: Vec<Pos2>,
        width: f32,
        color: Color32,
        intensity: Option<f32>,
    ) -> Self {
        debug_assert!(!points.is_empty(), "a stroke needs at least one point");
        Self {
            id,
            tool,
            points,
            width,
            color,
            intensity: if tool.is_filter() { intensity } else { None },
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn tool(&self) -> ToolKind {
        self.tool
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn color(&self) -> Color32 {
        self.color
    }

    /// Effect intensity in 1..=100 for filter strokes.
    pub fn intensity(&self) -> f32 {
        self.intensity.unwrap_or(50.0)
    }

    /// First and last point, the two points that define the shape of an
    /// arrow or rectangle. Extra recorded points are ignored for those kinds.
    pub fn endpoints(&self) -> (Pos2, Pos2) {
        let first = self.points[0];
        let last = *self.points.last().unwrap_or(&first);
        (first, last)
    }

    /// Axis-aligned box spanning all points.
    pub fn bounds(&self) -> Rect {
        geometry::bounds_of_points(&self.points, 0.0)
    }

    pub fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
    }

    /// Rewrite all points in place.
    pub fn set_points(&mut self, points: Vec<Pos2>) {
        debug_assert!(!points.is_empty(), "a stroke needs at least one point");
        self.points = points;
    }

    /// Reposition a single endpoint (arrow handles move only one end).
    pub fn set_endpoint(&mut self, last: bool, pos: Pos2) {
        if last {
            if let Some(point) = self.points.last_mut() {
                *point = pos;
            }
        } else if let Some(point) = self.points.first_mut() {
            *point = pos;
        }
    }

    /// Proportionally rescale every point of `original` into `new_rect`,
    /// relative to the original bounding box. Degenerate axes (a perfectly
    /// horizontal or vertical stroke) keep their coordinate on that axis
    /// anchored to the new box edge.
    pub fn scale_points_into(&mut self, original: &[Pos2], new_rect: Rect) {
        let old_rect = geometry::bounds_of_points(original, 0.0);
        if old_rect == Rect::NOTHING {
            return;
        }

        let points = original
            .iter()
            .map(|point| {
                let relative_x = if old_rect.width() > 0.0 {
                    (point.x - old_rect.min.x) / old_rect.width()
                } else {
                    0.0
                };
                let relative_y = if old_rect.height() > 0.0 {
                    (point.y - old_rect.min.y) / old_rect.height()
                } else {
                    0.0
                };

                Pos2::new(
                    new_rect.min.x + relative_x * new_rect.width(),
                    new_rect.min.y + relative_y * new_rect.height(),
                )
            })
            .collect();

        self.points = points;
    }
}
