use egui::{Pos2, Rect};

/// Squared distance between two points.
pub fn distance_sq(a: Pos2, b: Pos2) -> f32 {
    let d = b - a;
    d.x * d.x + d.y * d.y
}

/// Squared distance from a point to a line segment, via the clamped
/// projection formula. Used everywhere geometry proximity is needed so
/// erase and select hit radii agree.
pub fn distance_to_segment_sq(point: Pos2, seg_start: Pos2, seg_end: Pos2) -> f32 {
    let seg = seg_end - seg_start;
    let to_point = point - seg_start;

    let len_sq = seg.x * seg.x + seg.y * seg.y;
    if len_sq == 0.0 {
        return distance_sq(point, seg_start);
    }

    let t = ((to_point.x * seg.x + to_point.y * seg.y) / len_sq).clamp(0.0, 1.0);
    let projection = seg_start + seg * t;
    distance_sq(point, projection)
}

/// Axis-aligned bounding box of a point set, optionally padded on all sides.
///
/// Returns `Rect::NOTHING` for an empty set.
pub fn bounds_of_points(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}
