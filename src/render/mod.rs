use egui::{Color32, Pos2, Rect};
use image::{GrayImage, RgbaImage};
use log::trace;

mod effects;
mod raster;

use crate::document::EditLog;
use crate::edit::{EditRef, PastedRegion, StrokeAction, ToolKind};
use crate::error::EngineError;
use crate::hit_testing::{EditKind, EraseHit, Handle, SelectHit, ARROW_HANDLE_RADIUS};
use crate::region_cache::RegionCache;

/// Drag/select feedback renders in blue, erase feedback in red.
pub const SELECT_FEEDBACK_COLOR: Color32 = Color32::from_rgb(47, 111, 237);
pub const ERASE_FEEDBACK_COLOR: Color32 = Color32::from_rgb(229, 57, 53);

const GLOW_EXTENT: f32 = 8.0;
const GLOW_ALPHA: u8 = 110;
const HANDLE_HOVER_COLOR: Color32 = Color32::from_rgb(140, 180, 255);

/// Filter brushes paint a wider swath than their nominal stroke width.
const FILTER_WIDTH_FACTOR: f32 = 3.5;

/// What the interaction layer wants highlighted this frame. The compositor
/// only reads this; it never mutates the log.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedbackState {
    /// Edit the select tool is hovering, and which handle.
    pub select_hover: Option<SelectHit>,
    /// Edit the erase tool would delete.
    pub erase_hover: Option<EraseHit>,
    /// Edit currently being dragged or resized.
    pub dragging: Option<SelectHit>,
    /// Live copy-region marquee.
    pub marquee: Option<Rect>,
}

impl FeedbackState {
    pub fn is_clear(&self) -> bool {
        *self == Self::default()
    }

    /// Glow color for an edit, if any feedback applies to it. Erase hover
    /// wins over select so the user always sees what a click would delete.
    fn glow_color_for(&self, id: u64) -> Option<Color32> {
        if self.erase_hover.map(|hit| hit.id) == Some(id) {
            return Some(ERASE_FEEDBACK_COLOR);
        }
        if self.dragging.map(|hit| hit.id) == Some(id) || self.select_hover.map(|hit| hit.id) == Some(id) {
            return Some(SELECT_FEEDBACK_COLOR);
        }
        None
    }

    /// The select-tool hit driving outline/handle decorations: a drag in
    /// progress takes precedence over a mere hover.
    fn active_select(&self) -> Option<SelectHit> {
        self.dragging.or(self.select_hover)
    }
}

/// Deterministic full-frame compositor.
///
/// Every call redraws the base image plus the entire edit log in
/// chronological order, so order-dependent pixel effects (a blur painted
/// over an earlier pixelate sees the pixelated result) come out identical
/// on every recompute. Owns three reusable buffers (the output surface,
/// the single-channel effect mask, and the surface snapshot the filter
/// pipeline reads from), resized only when the base dimensions change and
/// never handed out across renders.
pub struct Compositor {
    surface: RgbaImage,
    mask: GrayImage,
    snapshot: RgbaImage,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

impl Compositor {
    pub fn new() -> Self {
        Self {
            surface: RgbaImage::new(0, 0),
            mask: GrayImage::new(0, 0),
            snapshot: RgbaImage::new(0, 0),
        }
    }

    /// Recompute the full surface: base image, then every edit oldest-first,
    /// then the in-progress preview stroke, then feedback decorations.
    pub fn render(
        &mut self,
        base: &RgbaImage,
        log: &EditLog,
        cache: &mut RegionCache,
        preview: Option<&StrokeAction>,
        feedback: &FeedbackState,
    ) -> Result<&RgbaImage, EngineError> {
        let (width, height) = base.dimensions();
        if width == 0 || height == 0 {
            return Err(EngineError::SurfaceUnavailable);
        }

        trace!("compositor: full recompute of {width}x{height} surface, {} edits", log.len());

        self.surface.clone_from(base);
        if self.mask.dimensions() != (width, height) {
            self.mask = GrayImage::new(width, height);
            self.snapshot = RgbaImage::new(width, height);
        }

        for edit in log.chronological() {
            if let Some(color) = feedback.glow_color_for(edit.id()) {
                draw_glow(&mut self.surface, edit, color);
            }
            match edit {
                EditRef::Region(region) => draw_region(&mut self.surface, region, cache),
                EditRef::Stroke(stroke) => {
                    draw_stroke(&mut self.surface, &mut self.mask, &mut self.snapshot, stroke)
                }
            }
        }

        // The preview goes through the same pipeline as a finalized stroke,
        // reading the surface as rendered so far.
        if let Some(stroke) = preview {
            draw_stroke(&mut self.surface, &mut self.mask, &mut self.snapshot, stroke);
        }

        draw_decorations(&mut self.surface, log, feedback);

        Ok(&self.surface)
    }

    /// The most recently composited surface.
    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    /// Extract an owned copy of a rectangle of the composited surface.
    /// Requests outside the surface are refused, not clipped.
    pub fn snapshot_rect(&self, x: i64, y: i64, width: u32, height: u32) -> Result<RgbaImage, EngineError> {
        let (sw, sh) = self.surface.dimensions();
        let out_of_bounds = x < 0
            || y < 0
            || width == 0
            || height == 0
            || x + width as i64 > sw as i64
            || y + height as i64 > sh as i64;
        if out_of_bounds {
            return Err(EngineError::PixelAccessDenied { x, y, width, height });
        }
        Ok(image::imageops::crop_imm(&self.surface, x as u32, y as u32, width, height).to_image())
    }
}

/// Source-over blend of a single pixel at the given coverage.
fn blend_pixel(surface: &mut RgbaImage, x: u32, y: u32, color: Color32, coverage: f32) {
    let alpha = color.a() as f32 / 255.0 * coverage;
    if alpha <= 0.0 {
        return;
    }
    let px = surface.get_pixel_mut(x, y);
    let inv = 1.0 - alpha;
    px[0] = (color.r() as f32 * alpha + px[0] as f32 * inv).round() as u8;
    px[1] = (color.g() as f32 * alpha + px[1] as f32 * inv).round() as u8;
    px[2] = (color.b() as f32 * alpha + px[2] as f32 * inv).round() as u8;
    px[3] = (255.0 * alpha + px[3] as f32 * inv).round() as u8;
}

fn draw_region(surface: &mut RgbaImage, region: &PastedRegion, cache: &mut RegionCache) {
    let pos = region.position();
    let scaled = cache.get_scaled(region);
    image::imageops::overlay(surface, scaled, pos.x.round() as i64, pos.y.round() as i64);
}

fn draw_stroke(surface: &mut RgbaImage, mask: &mut GrayImage, snapshot: &mut RgbaImage, stroke: &StrokeAction) {
    let (width, height) = surface.dimensions();
    let color = stroke.color();

    match stroke.tool() {
        ToolKind::Freehand => {
            let mut paint = |x: u32, y: u32, cov: f32| blend_pixel(surface, x, y, color, cov);
            raster::stroke_polyline(stroke.points(), stroke.width(), width, height, &mut paint);
        }
        ToolKind::Rectangle => {
            let (first, last) = stroke.endpoints();
            let mut paint = |x: u32, y: u32, cov: f32| blend_pixel(surface, x, y, color, cov);
            raster::stroke_rect_outline(Rect::from_two_pos(first, last), stroke.width(), width, height, &mut paint);
        }
        ToolKind::Arrow => {
            let (from, tip) = stroke.endpoints();
            let mut paint = |x: u32, y: u32, cov: f32| blend_pixel(surface, x, y, color, cov);
            if from == tip {
                raster::fill_circle(from, stroke.width() / 2.0, width, height, &mut paint);
                return;
            }
            let (indent, back_left, back_right) = raster::arrow_head(from, tip, stroke.width());
            raster::fill_capsule(from, indent, stroke.width() / 2.0, width, height, &mut paint);
            raster::fill_triangle(tip, back_left, back_right, width, height, &mut paint);
        }
        ToolKind::BlurBrush | ToolKind::PixelateBrush => {
            apply_filter_stroke(surface, mask, snapshot, stroke);
        }
    }
}

/// The order-dependent effect pipeline: brush the path into the mask,
/// snapshot the surface as rendered so far, run the effect on the snapshot,
/// and composite the result back through the mask.
fn apply_filter_stroke(surface: &mut RgbaImage, mask: &mut GrayImage, snapshot: &mut RgbaImage, stroke: &StrokeAction) {
    let (width, height) = surface.dimensions();

    for px in mask.pixels_mut() {
        px[0] = 0;
    }
    let effective_width = stroke.width() * FILTER_WIDTH_FACTOR;
    let mut brush = |x: u32, y: u32, cov: f32| {
        let px = mask.get_pixel_mut(x, y);
        px[0] = px[0].max((cov * 255.0).round() as u8);
    };
    raster::stroke_polyline(stroke.points(), effective_width, width, height, &mut brush);

    snapshot.clone_from(surface);

    match stroke.tool() {
        ToolKind::BlurBrush => {
            let radius = (stroke.intensity() / 100.0 * 40.0).max(1.0);
            effects::apply_blur(surface, snapshot, mask, radius);
        }
        ToolKind::PixelateBrush => {
            effects::apply_pixelate(surface, snapshot, mask, stroke.intensity());
        }
        _ => unreachable!("not a filter tool"),
    }
}

/// Soft halo behind an edit that is hovered or being dragged: the same
/// silhouette, slightly enlarged, in the feedback color.
fn draw_glow(surface: &mut RgbaImage, edit: EditRef<'_>, color: Color32) {
    let (width, height) = surface.dimensions();
    let glow = Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), GLOW_ALPHA);

    match edit {
        EditRef::Region(region) => {
            fill_rect(surface, region.rect().expand(GLOW_EXTENT / 2.0), glow);
        }
        EditRef::Stroke(stroke) => {
            let mut paint = |x: u32, y: u32, cov: f32| blend_pixel(surface, x, y, glow, cov);
            let glow_width = brush_width(stroke) + GLOW_EXTENT;
            match stroke.tool() {
                ToolKind::Rectangle => {
                    let (first, last) = stroke.endpoints();
                    raster::stroke_rect_outline(Rect::from_two_pos(first, last), glow_width, width, height, &mut paint);
                }
                ToolKind::Arrow => {
                    let (first, last) = stroke.endpoints();
                    raster::fill_capsule(first, last, glow_width / 2.0, width, height, &mut paint);
                }
                ToolKind::Freehand | ToolKind::BlurBrush | ToolKind::PixelateBrush => {
                    raster::stroke_polyline(stroke.points(), glow_width, width, height, &mut paint);
                }
            }
        }
    }
}

/// The swath a stroke actually paints: filter brushes cover 3.5x their
/// nominal width.
fn brush_width(stroke: &StrokeAction) -> f32 {
    if stroke.tool().is_filter() {
        stroke.width() * FILTER_WIDTH_FACTOR
    } else {
        stroke.width()
    }
}

fn fill_rect(surface: &mut RgbaImage, rect: Rect, color: Color32) {
    let (width, height) = surface.dimensions();
    let min_x = rect.min.x.floor().max(0.0) as u32;
    let min_y = rect.min.y.floor().max(0.0) as u32;
    let max_x = (rect.max.x.ceil() as i64).clamp(0, width as i64) as u32;
    let max_y = (rect.max.y.ceil() as i64).clamp(0, height as i64) as u32;

    for y in min_y..max_y {
        for x in min_x..max_x {
            blend_pixel(surface, x, y, color, 1.0);
        }
    }
}

/// Dashed outlines, marquee and arrow endpoint handles, drawn after every
/// edit so they sit on top of the stack.
fn draw_decorations(surface: &mut RgbaImage, log: &EditLog, feedback: &FeedbackState) {
    let (width, height) = surface.dimensions();

    if let Some(hit) = feedback.erase_hover {
        if let Some(rect) = outline_rect(log, hit.id, hit.kind) {
            let mut paint = |x: u32, y: u32, cov: f32| blend_pixel(surface, x, y, ERASE_FEEDBACK_COLOR, cov);
            raster::dashed_rect_outline(rect, width, height, &mut paint);
        }
    }

    if let Some(hit) = feedback.active_select() {
        if let Some(rect) = outline_rect(log, hit.id, hit.kind) {
            let mut paint = |x: u32, y: u32, cov: f32| blend_pixel(surface, x, y, SELECT_FEEDBACK_COLOR, cov);
            raster::dashed_rect_outline(rect, width, height, &mut paint);
        }

        // A selected arrow exposes its two endpoint handles.
        if hit.kind == EditKind::Stroke {
            if let Some(stroke) = log.stroke_by_id(hit.id) {
                if stroke.tool() == ToolKind::Arrow {
                    let (first, last) = stroke.endpoints();
                    draw_endpoint_handle(surface, first, hit.handle == Handle::StartPoint);
                    draw_endpoint_handle(surface, last, hit.handle == Handle::EndPoint);
                }
            }
        }
    }

    if let Some(marquee) = feedback.marquee {
        let mut paint = |x: u32, y: u32, cov: f32| blend_pixel(surface, x, y, SELECT_FEEDBACK_COLOR, cov);
        raster::dashed_rect_outline(marquee, width, height, &mut paint);
    }
}

/// Bounding box an outline decoration is drawn around: stroke boxes get
/// width-dependent padding, region boxes a fixed 8 px.
fn outline_rect(log: &EditLog, id: u64, kind: EditKind) -> Option<Rect> {
    match kind {
        EditKind::Stroke => {
            let stroke = log.stroke_by_id(id)?;
            let padding = (stroke.width() / 2.0 + 6.0).max(8.0);
            Some(stroke.bounds().expand(padding))
        }
        EditKind::Region => Some(log.region_by_id(id)?.rect().expand(8.0)),
    }
}

fn draw_endpoint_handle(surface: &mut RgbaImage, center: Pos2, hovered: bool) {
    let (width, height) = surface.dimensions();
    let color = if hovered { HANDLE_HOVER_COLOR } else { SELECT_FEEDBACK_COLOR };
    let mut paint = |x: u32, y: u32, cov: f32| blend_pixel(surface, x, y, color, cov);
    raster::fill_circle(center, ARROW_HANDLE_RADIUS, width, height, &mut paint);
}
