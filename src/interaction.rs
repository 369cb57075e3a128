use egui::{Pos2, Rect, Vec2};
use image::RgbaImage;
use log::{debug, info};

use crate::document::EditLog;
use crate::edit::{factory, StrokeAction, ToolKind};
use crate::error::EngineError;
use crate::geometry;
use crate::hit_testing::{self, EditKind, Handle, SelectHit};
use crate::id_generator::generate_id;
use crate::region_cache::RegionCache;
use crate::render::{Compositor, FeedbackState};
use crate::tools::{Tool, ToolSettings};

/// Resizes refuse to shrink either dimension below this.
pub const MIN_EDIT_SIZE: f32 = 10.0;

/// A pasted region lands offset from where it was marked.
const PASTE_OFFSET: Vec2 = Vec2::new(10.0, 10.0);

/// Everything the controller needs per call. The log, live tool settings
/// and render resources are owned by the application layer and lent in;
/// the controller keeps no ambient state beyond its own state machine.
pub struct EditorContext<'a> {
    pub log: &'a mut EditLog,
    pub settings: &'a mut ToolSettings,
    pub compositor: &'a mut Compositor,
    pub cache: &'a mut RegionCache,
    pub base: &'a RgbaImage,
}

/// Geometry captured at pointer-down so every drag update is computed from
/// the total delta, not accumulated increments.
#[derive(Debug, Clone)]
enum DragOrigin {
    Points(Vec<Pos2>),
    Rect(Rect),
}

#[derive(Debug, Clone)]
enum InteractionState {
    Idle,
    /// A drawing tool is laying down points.
    Creating { kind: ToolKind, points: Vec<Pos2> },
    /// The select tool grabbed an edit by one of its handles.
    Dragging {
        hit: SelectHit,
        start: Pos2,
        origin: DragOrigin,
    },
    /// The erase tool is held down and deletes on contact.
    Erasing,
    /// The copy-region tool is marking a rectangle.
    Marking { start: Pos2, current: Pos2 },
}

/// Pointer-event state machine that turns raw pointer input into edit log
/// mutations.
///
/// Once an interaction is active it stays active wherever the pointer
/// goes: moves outside the surface are processed and the release that
/// finalizes may happen anywhere. Releasing the pointer is the only way an
/// in-progress action ends.
pub struct InteractionController {
    state: InteractionState,
    feedback: FeedbackState,
}

impl Default for InteractionController {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionController {
    pub fn new() -> Self {
        Self {
            state: InteractionState::Idle,
            feedback: FeedbackState::default(),
        }
    }

    /// What the compositor should highlight this frame.
    pub fn feedback(&self) -> &FeedbackState {
        &self.feedback
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, InteractionState::Idle)
    }

    /// The in-progress stroke, rendered identically to a finalized one.
    pub fn preview_stroke(&self, settings: &ToolSettings) -> Option<StrokeAction> {
        match &self.state {
            InteractionState::Creating { kind, points } => Some(factory::create_stroke(
                0,
                *kind,
                points.clone(),
                settings.stroke_width,
                settings.color,
                Some(settings.intensity),
            )),
            _ => None,
        }
    }

    pub fn pointer_down(&mut self, pos: Pos2, ctx: &mut EditorContext<'_>) -> Result<(), EngineError> {
        match ctx.settings.tool {
            Tool::Select => {
                if let Some(hit) = hit_testing::find_selectable_at(pos, ctx.log) {
                    let origin = match hit.kind {
                        EditKind::Stroke => ctx
                            .log
                            .stroke_by_id(hit.id)
                            .map(|s| DragOrigin::Points(s.points().to_vec())),
                        EditKind::Region => {
                            ctx.log.region_by_id(hit.id).map(|r| DragOrigin::Rect(r.rect()))
                        }
                    };
                    if let Some(origin) = origin {
                        debug!("drag start: edit {} via {:?}", hit.id, hit.handle);
                        self.feedback.select_hover = None;
                        self.feedback.dragging = Some(hit);
                        self.state = InteractionState::Dragging { hit, start: pos, origin };
                    }
                }
            }
            Tool::Erase => {
                self.erase_at(pos, ctx);
                self.state = InteractionState::Erasing;
            }
            Tool::CopyRegion => {
                self.feedback.marquee = Some(Rect::from_two_pos(pos, pos));
                self.state = InteractionState::Marking { start: pos, current: pos };
            }
            _ => {
                if let Some(kind) = ctx.settings.tool.stroke_kind() {
                    self.state = InteractionState::Creating { kind, points: vec![pos] };
                }
            }
        }
        Ok(())
    }

    pub fn pointer_move(&mut self, pos: Pos2, ctx: &mut EditorContext<'_>) -> Result<(), EngineError> {
        match &mut self.state {
            InteractionState::Idle => self.update_hover(pos, ctx),
            InteractionState::Creating { kind, points } => {
                if kind.is_two_point() {
                    // Two-point shapes are exactly first + current.
                    points.truncate(1);
                    points.push(pos);
                } else {
                    points.push(pos);
                }
            }
            InteractionState::Dragging { hit, start, origin } => {
                let delta = pos - *start;
                apply_drag(ctx, *hit, delta, origin);
            }
            InteractionState::Erasing => self.erase_at(pos, ctx),
            InteractionState::Marking { start, current } => {
                *current = pos;
                self.feedback.marquee = Some(Rect::from_two_pos(*start, pos));
            }
        }
        Ok(())
    }

    pub fn pointer_up(&mut self, pos: Pos2, ctx: &mut EditorContext<'_>) -> Result<(), EngineError> {
        let finished = std::mem::replace(&mut self.state, InteractionState::Idle);
        match finished {
            InteractionState::Idle => {}
            InteractionState::Creating { kind, points } => {
                if kind.is_two_point() && points.len() < 2 {
                    // Never got a second point: discard, not an error.
                    debug!("discarding degenerate {kind:?} with {} point(s)", points.len());
                    return Ok(());
                }
                let stroke = factory::create_stroke(
                    generate_id(),
                    kind,
                    points,
                    ctx.settings.stroke_width,
                    ctx.settings.color,
                    Some(ctx.settings.intensity),
                );
                info!("finalized {kind:?} stroke {}", stroke.id());
                ctx.log.add_stroke(stroke);
            }
            InteractionState::Dragging { hit, .. } => {
                // Geometry was rewritten in place during the drag.
                debug!("drag end: edit {}", hit.id);
                self.feedback.dragging = None;
            }
            InteractionState::Erasing => {}
            InteractionState::Marking { start, .. } => {
                self.feedback.marquee = None;
                self.finalize_region_capture(Rect::from_two_pos(start, pos), ctx)?;
            }
        }
        Ok(())
    }

    /// With no interaction active, keep the hovered select/erase target
    /// current for the feedback layer.
    fn update_hover(&mut self, pos: Pos2, ctx: &EditorContext<'_>) {
        self.feedback.select_hover = match ctx.settings.tool {
            Tool::Select => hit_testing::find_selectable_at(pos, ctx.log),
            _ => None,
        };
        self.feedback.erase_hover = match ctx.settings.tool {
            Tool::Erase => hit_testing::find_erase_target_at(pos, ctx.log),
            _ => None,
        };
    }

    fn erase_at(&mut self, pos: Pos2, ctx: &mut EditorContext<'_>) {
        if let Some(hit) = hit_testing::find_erase_target_at(pos, ctx.log) {
            info!("erase: removing edit {}", hit.id);
            ctx.log.remove_by_id(hit.id);
            if hit.kind == EditKind::Region {
                ctx.cache.invalidate(hit.id);
            }
        }
        self.feedback.erase_hover = None;
    }

    /// Capture the marked rectangle of the composited surface as a new
    /// pasted region, then hand the user the select tool to place it.
    fn finalize_region_capture(&mut self, marked: Rect, ctx: &mut EditorContext<'_>) -> Result<(), EngineError> {
        // Clamp to the surface before cropping.
        let (sw, sh) = ctx.base.dimensions();
        let x = marked.min.x.floor().clamp(0.0, sw as f32) as i64;
        let y = marked.min.y.floor().clamp(0.0, sh as f32) as i64;
        let max_x = marked.max.x.ceil().clamp(0.0, sw as f32) as i64;
        let max_y = marked.max.y.ceil().clamp(0.0, sh as f32) as i64;
        let width = (max_x - x) as u32;
        let height = (max_y - y) as u32;

        if width == 0 || height == 0 {
            debug!("discarding zero-area region selection");
            return Ok(());
        }

        // Composite without preview or feedback so decorations are not
        // baked into the snapshot.
        ctx.compositor
            .render(ctx.base, ctx.log, ctx.cache, None, &FeedbackState::default())?;
        let pixels = ctx.compositor.snapshot_rect(x, y, width, height)?;

        let position = Pos2::new(x as f32, y as f32) + PASTE_OFFSET;
        let region = factory::create_region(generate_id(), pixels, position, width as f32, height as f32);
        info!("captured {width}x{height} region {} at {position:?}", region.id());
        ctx.log.add_region(region);

        // Completing a copy always drops the user back into select.
        ctx.settings.tool = Tool::Select;
        Ok(())
    }
}

/// Rewrite the grabbed edit's geometry from the drag origin and the total
/// pointer delta.
fn apply_drag(ctx: &mut EditorContext<'_>, hit: SelectHit, delta: Vec2, origin: &DragOrigin) {
    match (hit.kind, origin) {
        (EditKind::Stroke, DragOrigin::Points(original)) => {
            let Some(stroke) = ctx.log.stroke_by_id_mut(hit.id) else {
                return;
            };
            match hit.handle {
                Handle::Move => {
                    stroke.set_points(original.iter().map(|p| *p + delta).collect());
                }
                Handle::StartPoint | Handle::EndPoint => {
                    let last = hit.handle == Handle::EndPoint;
                    let index = if last { original.len() - 1 } else { 0 };
                    stroke.set_points(original.clone());
                    stroke.set_endpoint(last, original[index] + delta);
                }
                _ => {
                    let bounds = geometry::bounds_of_points(original, 0.0);
                    let new_rect = resize_rect(bounds, hit.handle, delta);
                    stroke.scale_points_into(original, new_rect);
                }
            }
        }
        (EditKind::Region, DragOrigin::Rect(original)) => {
            let Some(region) = ctx.log.region_by_id_mut(hit.id) else {
                return;
            };
            match hit.handle {
                Handle::Move => region.set_rect(original.translate(delta)),
                Handle::StartPoint | Handle::EndPoint => {}
                _ => {
                    region.set_rect(resize_rect(*original, hit.handle, delta));
                    ctx.cache.invalidate(hit.id);
                }
            }
        }
        // A stale hit whose edit changed variant can only happen if ids
        // were reused; ignore it.
        _ => {}
    }
}

/// New box for a corner/edge resize, clamped to the minimum dimension.
/// Edge handles move one side; corner handles move two.
fn resize_rect(original: Rect, handle: Handle, delta: Vec2) -> Rect {
    let mut rect = original;

    match handle {
        Handle::TopLeft | Handle::Left | Handle::BottomLeft => {
            rect.min.x = (original.min.x + delta.x).min(rect.max.x - MIN_EDIT_SIZE);
        }
        Handle::TopRight | Handle::Right | Handle::BottomRight => {
            rect.max.x = (original.max.x + delta.x).max(rect.min.x + MIN_EDIT_SIZE);
        }
        _ => {}
    }

    match handle {
        Handle::TopLeft | Handle::Top | Handle::TopRight => {
            rect.min.y = (original.min.y + delta.y).min(rect.max.y - MIN_EDIT_SIZE);
        }
        Handle::BottomLeft | Handle::Bottom | Handle::BottomRight => {
            rect.max.y = (original.max.y + delta.y).max(rect.min.y + MIN_EDIT_SIZE);
        }
        _ => {}
    }

    rect
}
