use egui::{Pos2, Rect, Vec2};

use crate::geometry::distance_to_segment_sq;

/// Plot callback: `(x, y, coverage)` with coverage in 0..=1. Primitives are
/// generic over the sink so the same code paints color onto the surface and
/// opacity onto the single-channel effect mask.
pub(crate) type Plot<'a> = &'a mut dyn FnMut(u32, u32, f32);

fn clamped_span(min: f32, max: f32, limit: u32) -> Option<(u32, u32)> {
    let lo = min.floor().max(0.0) as i64;
    let hi = max.ceil() as i64;
    if hi < 0 || lo >= limit as i64 {
        return None;
    }
    Some((lo as u32, (hi.min(limit as i64 - 1)) as u32))
}

/// Fill the capsule around segment `a`..`b` with the given radius: the thick
/// round-capped line segment every stroke is built from. Coverage falls off
/// linearly over one pixel at the rim.
pub(crate) fn fill_capsule(a: Pos2, b: Pos2, radius: f32, width: u32, height: u32, plot: Plot<'_>) {
    let pad = radius + 1.0;
    let (min_x, max_x) = match clamped_span(a.x.min(b.x) - pad, a.x.max(b.x) + pad, width) {
        Some(span) => span,
        None => return,
    };
    let (min_y, max_y) = match clamped_span(a.y.min(b.y) - pad, a.y.max(b.y) + pad, height) {
        Some(span) => span,
        None => return,
    };

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let center = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
            let d = distance_to_segment_sq(center, a, b).sqrt();
            let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
            if coverage > 0.0 {
                plot(x, y, coverage);
            }
        }
    }
}

/// Filled circle, a capsule with coincident endpoints.
pub(crate) fn fill_circle(center: Pos2, radius: f32, width: u32, height: u32, plot: Plot<'_>) {
    fill_capsule(center, center, radius, width, height, plot);
}

/// Stroke a polyline as a chain of capsules. A single point becomes a dot.
pub(crate) fn stroke_polyline(points: &[Pos2], stroke_width: f32, width: u32, height: u32, plot: Plot<'_>) {
    let radius = stroke_width / 2.0;
    match points {
        [] => {}
        [point] => fill_circle(*point, radius, width, height, plot),
        _ => {
            for pair in points.windows(2) {
                fill_capsule(pair[0], pair[1], radius, width, height, plot);
            }
        }
    }
}

/// Stroke the outline of the box spanned by two corner points.
pub(crate) fn stroke_rect_outline(rect: Rect, stroke_width: f32, width: u32, height: u32, plot: Plot<'_>) {
    let radius = stroke_width / 2.0;
    let corners = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
    ];
    for i in 0..4 {
        fill_capsule(corners[i], corners[(i + 1) % 4], radius, width, height, plot);
    }
}

/// Fill a triangle via half-plane edge distances, with the same one-pixel
/// coverage falloff as the capsules. Winding-independent.
pub(crate) fn fill_triangle(v0: Pos2, v1: Pos2, v2: Pos2, width: u32, height: u32, plot: Plot<'_>) {
    let min = Pos2::new(v0.x.min(v1.x).min(v2.x), v0.y.min(v1.y).min(v2.y));
    let max = Pos2::new(v0.x.max(v1.x).max(v2.x), v0.y.max(v1.y).max(v2.y));
    let (min_x, max_x) = match clamped_span(min.x - 1.0, max.x + 1.0, width) {
        Some(span) => span,
        None => return,
    };
    let (min_y, max_y) = match clamped_span(min.y - 1.0, max.y + 1.0, height) {
        Some(span) => span,
        None => return,
    };

    // Signed area fixes the winding so edge distances are positive inside.
    let area = (v1.x - v0.x) * (v2.y - v0.y) - (v1.y - v0.y) * (v2.x - v0.x);
    if area == 0.0 {
        return;
    }
    let sign = area.signum();

    let edge = |a: Pos2, b: Pos2, p: Pos2| -> f32 {
        let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
        let len = ((b.x - a.x).powi(2) + (b.y - a.y).powi(2)).sqrt().max(f32::EPSILON);
        sign * cross / len
    };

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let p = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
            let d = edge(v0, v1, p).min(edge(v1, v2, p)).min(edge(v2, v0, p));
            let coverage = (d + 0.5).clamp(0.0, 1.0);
            if coverage > 0.0 {
                plot(x, y, coverage);
            }
        }
    }
}

/// Dashed one-pixel outline around a rectangle, used for the selection and
/// erase hover feedback.
pub(crate) fn dashed_rect_outline(rect: Rect, width: u32, height: u32, plot: Plot<'_>) {
    const DASH_ON: f32 = 6.0;
    const DASH_OFF: f32 = 4.0;

    let corners = [
        rect.left_top(),
        rect.right_top(),
        rect.right_bottom(),
        rect.left_bottom(),
    ];

    // Carry the dash phase around the perimeter so corners do not restart it.
    let mut phase = 0.0f32;
    for i in 0..4 {
        let a = corners[i];
        let b = corners[(i + 1) % 4];
        let seg = b - a;
        let len = seg.length();
        if len == 0.0 {
            continue;
        }
        let dir = seg / len;

        let mut travelled = 0.0f32;
        while travelled < len {
            let cycle = phase % (DASH_ON + DASH_OFF);
            if cycle < DASH_ON {
                let run = (DASH_ON - cycle).min(len - travelled);
                let from = a + dir * travelled;
                let to = a + dir * (travelled + run);
                fill_capsule(from, to, 0.6, width, height, plot);
                travelled += run;
                phase += run;
            } else {
                let skip = (DASH_ON + DASH_OFF - cycle).min(len - travelled);
                travelled += skip;
                phase += skip;
            }
        }
    }
}

/// Arrow geometry shared by the renderer: `(indent, back_left, back_right)`
/// where the filled head triangle is `(tip, back_left, back_right)` and the
/// shaft runs from the first point to `indent`.
pub(crate) fn arrow_head(from: Pos2, tip: Pos2, stroke_width: f32) -> (Pos2, Pos2, Pos2) {
    let head_len = (stroke_width * 4.5).max(20.0);
    let half_angle = std::f32::consts::PI / 6.5;
    let angle = (tip.y - from.y).atan2(tip.x - from.x);

    let back_left = tip - Vec2::angled(angle - half_angle) * head_len;
    let back_right = tip - Vec2::angled(angle + half_angle) * head_len;
    let indent = tip - Vec2::angled(angle) * head_len * 0.8;

    (indent, back_left, back_right)
}
