use egui::Vec2;
use image::RgbaImage;
use log::warn;

use crate::document::EditLog;
use crate::error::EngineError;
use crate::input::{PointerEvent, SurfaceMapping};
use crate::interaction::{EditorContext, InteractionController};
use crate::region_cache::RegionCache;
use crate::render::{Compositor, FeedbackState};
use crate::tools::ToolSettings;

/// Invoked with the composited surface when external image analysis is
/// requested.
pub type AnalysisHandler = Box<dyn FnMut(&RgbaImage)>;

/// The owning layer: a fixed base image for the session, the edit log, the
/// live tool configuration, and the render/interaction machinery wired
/// together. All work happens synchronously inside the pointer-event
/// methods; there is no background rendering.
pub struct Editor {
    base: RgbaImage,
    log: EditLog,
    settings: ToolSettings,
    cache: RegionCache,
    compositor: Compositor,
    controller: InteractionController,
    mapping: SurfaceMapping,
    analysis_handler: Option<AnalysisHandler>,
}

impl Editor {
    /// Start an editing session over a decoded base image. The image is
    /// immutable for the whole session; everything else is edits on top.
    pub fn new(base: RgbaImage) -> Self {
        let surface_size = Vec2::new(base.width() as f32, base.height() as f32);
        Self {
            base,
            log: EditLog::new(),
            settings: ToolSettings::default(),
            cache: RegionCache::new(),
            compositor: Compositor::new(),
            controller: InteractionController::new(),
            mapping: SurfaceMapping::identity(surface_size),
            analysis_handler: None,
        }
    }

    pub fn base(&self) -> &RgbaImage {
        &self.base
    }

    pub fn log(&self) -> &EditLog {
        &self.log
    }

    pub fn log_mut(&mut self) -> &mut EditLog {
        &mut self.log
    }

    pub fn settings(&self) -> &ToolSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ToolSettings {
        &mut self.settings
    }

    pub fn feedback(&self) -> &FeedbackState {
        self.controller.feedback()
    }

    /// Tell the editor how large the surface is currently displayed, so
    /// device coordinates can be translated to surface pixels.
    pub fn set_display_size(&mut self, display_size: Vec2) {
        self.mapping.display_size = display_size;
    }

    /// Route one pointer event through the interaction state machine.
    /// Render failures are non-fatal here: logged, then dropped.
    pub fn handle_pointer_event(&mut self, event: PointerEvent) {
        let pos = self.mapping.to_surface(event.position());
        let mut ctx = EditorContext {
            log: &mut self.log,
            settings: &mut self.settings,
            compositor: &mut self.compositor,
            cache: &mut self.cache,
            base: &self.base,
        };

        let result = match event {
            PointerEvent::Down { .. } => self.controller.pointer_down(pos, &mut ctx),
            PointerEvent::Moved { .. } => self.controller.pointer_move(pos, &mut ctx),
            PointerEvent::Up { .. } => self.controller.pointer_up(pos, &mut ctx),
        };

        if let Err(err) = result {
            warn!("pointer event dropped: {err}");
        }
    }

    /// Remove the most recently created edit, if any.
    pub fn undo(&mut self) -> Option<u64> {
        let removed = self.log.undo();
        if let Some(id) = removed {
            self.cache.invalidate(id);
        }
        removed
    }

    /// Composite the full edit stack (plus any in-progress stroke and
    /// hover feedback) and return the surface.
    pub fn composite(&mut self) -> Result<&RgbaImage, EngineError> {
        let regions = &self.log;
        self.cache
            .retain_ids(|id| regions.region_by_id(id).is_some());

        let preview = self.controller.preview_stroke(&self.settings);
        self.compositor.render(
            &self.base,
            &self.log,
            &mut self.cache,
            preview.as_ref(),
            self.controller.feedback(),
        )
    }

    /// Register the external image-analysis callback.
    pub fn set_analysis_handler(&mut self, handler: AnalysisHandler) {
        self.analysis_handler = Some(handler);
    }

    /// Run the analysis callback on the current composited surface, without
    /// preview or feedback decorations.
    pub fn request_analysis(&mut self) -> Result<(), EngineError> {
        self.compositor.render(
            &self.base,
            &self.log,
            &mut self.cache,
            None,
            &FeedbackState::default(),
        )?;
        if let Some(handler) = &mut self.analysis_handler {
            handler(self.compositor.surface());
        }
        Ok(())
    }
}
