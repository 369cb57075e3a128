use egui::Rect;
use serde::{Deserialize, Serialize};

pub(crate) mod region;
pub(crate) mod stroke;

pub use region::PastedRegion;
pub use stroke::StrokeAction;

/// The drawing tool a stroke was made with. Rendering, bounds and
/// hit-testing each match exhaustively on this, so adding a kind is a
/// compile-time-checked, localized change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolKind {
    Freehand,
    Arrow,
    Rectangle,
    BlurBrush,
    PixelateBrush,
}

impl ToolKind {
    /// Blur and pixelate strokes go through the masked effect pipeline
    /// instead of being painted in a color.
    pub fn is_filter(self) -> bool {
        matches!(self, ToolKind::BlurBrush | ToolKind::PixelateBrush)
    }

    /// Arrows and rectangles are shaped by exactly their first and last
    /// points; everything else is a polyline.
    pub fn is_two_point(self) -> bool {
        matches!(self, ToolKind::Arrow | ToolKind::Rectangle)
    }
}

/// One entry in the edit log
#[derive(Debug, Clone, PartialEq)]
pub enum Edit {
    Stroke(StrokeAction),
    Region(PastedRegion),
}

impl Edit {
    pub fn id(&self) -> u64 {
        match self {
            Edit::Stroke(s) => s.id(),
            Edit::Region(r) => r.id(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            Edit::Stroke(s) => s.bounds(),
            Edit::Region(r) => r.rect(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Edit::Stroke(_) => "stroke",
            Edit::Region(_) => "region",
        }
    }
}

/// Borrowed view over either edit variant, used when the two collections
/// are merged into one chronological sequence.
#[derive(Debug, Clone, Copy)]
pub enum EditRef<'a> {
    Stroke(&'a StrokeAction),
    Region(&'a PastedRegion),
}

impl EditRef<'_> {
    pub fn id(&self) -> u64 {
        match self {
            EditRef::Stroke(s) => s.id(),
            EditRef::Region(r) => r.id(),
        }
    }

    pub fn bounds(&self) -> Rect {
        match self {
            EditRef::Stroke(s) => s.bounds(),
            EditRef::Region(r) => r.rect(),
        }
    }
}

/// Factory functions for creating edits
pub mod factory {
    use super::*;
    use egui::{Color32, Pos2};
    use image::RgbaImage;

    /// Create a new stroke action. Filter kinds keep their effect intensity;
    /// for other kinds it is ignored.
    pub fn create_stroke(
        id: u64,
        tool: ToolKind,
        points: Vec<Pos2>,
        width: f32,
        color: Color32,
        intensity: Option<f32>,
    ) -> StrokeAction {
        StrokeAction::new(id, tool, points, width, color, intensity)
    }

    /// Create a new pasted region from a pixel snapshot.
    pub fn create_region(id: u64, pixels: RgbaImage, position: Pos2, width: f32, height: f32) -> PastedRegion {
        PastedRegion::new(id, pixels, position, width, height)
    }
}
