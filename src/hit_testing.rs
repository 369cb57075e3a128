use egui::{Pos2, Rect};
use serde::{Deserialize, Serialize};

use crate::document::EditLog;
use crate::edit::{EditRef, StrokeAction, ToolKind};
use crate::geometry::{distance_sq, distance_to_segment_sq};

/// How close the pointer must be to a box edge or corner to grab it.
pub const HANDLE_HIT_DISTANCE: f32 = 8.0;

/// Drawn radius of an arrow endpoint handle.
pub const ARROW_HANDLE_RADIUS: f32 = 6.0;

/// Arrow endpoints accept hits a little beyond their drawn radius.
pub const ARROW_HANDLE_HIT_DISTANCE: f32 = ARROW_HANDLE_RADIUS + 10.0;

/// A named control zone on a selected edit.
///
/// The eight edge/corner handles resize, `Move` translates, and the two
/// endpoint handles exist only on arrows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
    Move,
    StartPoint,
    EndPoint,
}

impl Handle {
    pub fn is_corner(self) -> bool {
        matches!(
            self,
            Handle::TopLeft | Handle::TopRight | Handle::BottomLeft | Handle::BottomRight
        )
    }

    pub fn is_edge(self) -> bool {
        matches!(self, Handle::Top | Handle::Right | Handle::Bottom | Handle::Left)
    }

    pub fn is_endpoint(self) -> bool {
        matches!(self, Handle::StartPoint | Handle::EndPoint)
    }
}

/// Which collection the hit edit lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    Stroke,
    Region,
}

/// Result of a select/drag/resize query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectHit {
    pub id: u64,
    pub kind: EditKind,
    pub handle: Handle,
}

/// Result of an erase query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EraseHit {
    pub id: u64,
    pub kind: EditKind,
}

/// Which resize/move handle of `rect` is at `point`, if any. Corner checks
/// take priority over edges, which take priority over the interior.
pub fn resize_handle_at(point: Pos2, rect: Rect) -> Option<Handle> {
    if rect == Rect::NOTHING {
        return None;
    }

    let t = HANDLE_HIT_DISTANCE;
    let near = |a: Pos2, b: Pos2| (a.x - b.x).abs() <= t && (a.y - b.y).abs() <= t;

    if near(point, rect.left_top()) {
        return Some(Handle::TopLeft);
    }
    if near(point, rect.right_top()) {
        return Some(Handle::TopRight);
    }
    if near(point, rect.left_bottom()) {
        return Some(Handle::BottomLeft);
    }
    if near(point, rect.right_bottom()) {
        return Some(Handle::BottomRight);
    }

    let within_x = point.x >= rect.min.x - t && point.x <= rect.max.x + t;
    let within_y = point.y >= rect.min.y - t && point.y <= rect.max.y + t;

    if within_x && (point.y - rect.min.y).abs() <= t {
        return Some(Handle::Top);
    }
    if within_x && (point.y - rect.max.y).abs() <= t {
        return Some(Handle::Bottom);
    }
    if within_y && (point.x - rect.min.x).abs() <= t {
        return Some(Handle::Left);
    }
    if within_y && (point.x - rect.max.x).abs() <= t {
        return Some(Handle::Right);
    }

    if rect.contains(point) {
        return Some(Handle::Move);
    }

    None
}

/// The top-most edit (and which part of it) under `point` for the select
/// tool. Candidates are walked newest-first so the most recently created
/// edit wins among overlaps.
pub fn find_selectable_at(point: Pos2, log: &EditLog) -> Option<SelectHit> {
    let mut merged = log.chronological();
    merged.reverse();

    for edit in merged {
        match edit {
            EditRef::Region(region) => {
                if let Some(handle) = resize_handle_at(point, region.rect()) {
                    return Some(SelectHit {
                        id: region.id(),
                        kind: EditKind::Region,
                        handle,
                    });
                }
            }
            EditRef::Stroke(stroke) => {
                // Arrow endpoints are grabbable before the generic box handles.
                if stroke.tool() == ToolKind::Arrow {
                    let (first, last) = stroke.endpoints();
                    let hit_sq = ARROW_HANDLE_HIT_DISTANCE * ARROW_HANDLE_HIT_DISTANCE;
                    if distance_sq(point, first) <= hit_sq {
                        return Some(SelectHit {
                            id: stroke.id(),
                            kind: EditKind::Stroke,
                            handle: Handle::StartPoint,
                        });
                    }
                    if distance_sq(point, last) <= hit_sq {
                        return Some(SelectHit {
                            id: stroke.id(),
                            kind: EditKind::Stroke,
                            handle: Handle::EndPoint,
                        });
                    }
                }

                if let Some(handle) = resize_handle_at(point, stroke.bounds()) {
                    return Some(SelectHit {
                        id: stroke.id(),
                        kind: EditKind::Stroke,
                        handle,
                    });
                }
            }
        }
    }

    None
}

/// The top-most edit under `point` for the erase tool, using the same
/// newest-first priority as selection.
pub fn find_erase_target_at(point: Pos2, log: &EditLog) -> Option<EraseHit> {
    let mut merged = log.chronological();
    merged.reverse();

    for edit in merged {
        match edit {
            EditRef::Region(region) => {
                if region.rect().contains(point) {
                    return Some(EraseHit {
                        id: region.id(),
                        kind: EditKind::Region,
                    });
                }
            }
            EditRef::Stroke(stroke) => {
                if stroke_erase_hit(point, stroke) {
                    return Some(EraseHit {
                        id: stroke.id(),
                        kind: EditKind::Stroke,
                    });
                }
            }
        }
    }

    None
}

fn stroke_erase_hit(point: Pos2, stroke: &StrokeAction) -> bool {
    let radius = stroke.width() * 2.0;
    let radius_sq = radius * radius;
    let points = stroke.points();

    match stroke.tool() {
        ToolKind::Freehand | ToolKind::BlurBrush | ToolKind::PixelateBrush => {
            if points.len() == 1 {
                return distance_sq(point, points[0]) <= radius_sq;
            }
            points
                .windows(2)
                .any(|pair| distance_to_segment_sq(point, pair[0], pair[1]) <= radius_sq)
        }
        ToolKind::Arrow => {
            let (first, last) = stroke.endpoints();
            distance_to_segment_sq(point, first, last) <= radius_sq
        }
        ToolKind::Rectangle => {
            let (first, last) = stroke.endpoints();
            let rect = Rect::from_two_pos(first, last);
            let corners = [
                rect.left_top(),
                rect.right_top(),
                rect.right_bottom(),
                rect.left_bottom(),
            ];
            (0..4).any(|i| {
                distance_to_segment_sq(point, corners[i], corners[(i + 1) % 4]) <= radius_sq
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::pos2;

    #[test]
    fn corner_beats_edge_beats_interior() {
        let rect = Rect::from_min_max(pos2(10.0, 10.0), pos2(110.0, 60.0));

        assert_eq!(resize_handle_at(pos2(11.0, 11.0), rect), Some(Handle::TopLeft));
        assert_eq!(resize_handle_at(pos2(109.0, 59.0), rect), Some(Handle::BottomRight));
        assert_eq!(resize_handle_at(pos2(60.0, 11.0), rect), Some(Handle::Top));
        assert_eq!(resize_handle_at(pos2(11.0, 35.0), rect), Some(Handle::Left));
        assert_eq!(resize_handle_at(pos2(60.0, 35.0), rect), Some(Handle::Move));
        assert_eq!(resize_handle_at(pos2(200.0, 200.0), rect), None);
    }

    #[test]
    fn nothing_rect_has_no_handles() {
        assert_eq!(resize_handle_at(pos2(0.0, 0.0), Rect::NOTHING), None);
    }
}
