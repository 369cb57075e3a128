use egui::{Pos2, Rect, Vec2};
use image::RgbaImage;

/// A rectangle of pixels copied from the composited surface. The snapshot
/// is captured once at creation time and never re-read from the base image;
/// only position and drawn size are mutable afterwards.
#[derive(Clone, PartialEq)]
pub struct PastedRegion {
    id: u64,
    pixels: RgbaImage,
    position: Pos2,
    width: f32,
    height: f32,
}

// Custom Debug: the pixel buffer is not worth printing.
impl std::fmt::Debug for PastedRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PastedRegion")
            .field("id", &self.id)
            .field("snapshot", &format!("{}x{}", self.pixels.width(), self.pixels.height()))
            .field("position", &self.position)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

impl PastedRegion {
    pub(crate) fn new(id: u64, pixels: RgbaImage, position: Pos2, width: f32, height: f32) -> Self {
        Self {
            id,
            pixels,
            position,
            width,
            height,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    /// The immutable pixel snapshot captured at creation time.
    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn position(&self) -> Pos2 {
        self.position
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// The rectangle the region is currently drawn into.
    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.position, Vec2::new(self.width, self.height))
    }

    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    /// Move and resize in one step. Callers clamp to the minimum dimension
    /// before getting here.
    pub fn set_rect(&mut self, rect: Rect) {
        self.position = rect.min;
        self.width = rect.width();
        self.height = rect.height();
    }
}
