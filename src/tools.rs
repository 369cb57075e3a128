use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::edit::ToolKind;

/// The currently active tool, supplied by the surrounding application as
/// live configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tool {
    Select,
    Freehand,
    Arrow,
    Rectangle,
    BlurBrush,
    PixelateBrush,
    Erase,
    CopyRegion,
}

impl Tool {
    /// The stroke kind this tool creates, if it is a drawing tool.
    pub fn stroke_kind(self) -> Option<ToolKind> {
        match self {
            Tool::Freehand => Some(ToolKind::Freehand),
            Tool::Arrow => Some(ToolKind::Arrow),
            Tool::Rectangle => Some(ToolKind::Rectangle),
            Tool::BlurBrush => Some(ToolKind::BlurBrush),
            Tool::PixelateBrush => Some(ToolKind::PixelateBrush),
            Tool::Select | Tool::Erase | Tool::CopyRegion => None,
        }
    }
}

/// Live drawing configuration owned by the application layer and passed
/// into the interaction controller per call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    pub tool: Tool,
    pub color: Color32,
    pub stroke_width: f32,
    /// Effect strength for the filter brushes, 1..=100.
    pub intensity: f32,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            tool: Tool::Freehand,
            color: Color32::RED,
            stroke_width: 4.0,
            intensity: 50.0,
        }
    }
}
