use egui::{pos2, vec2, Color32, Pos2};
use image::{Rgba, RgbaImage};

use redline::edit::{factory, ToolKind};
use redline::{
    Compositor, EditLog, Editor, EditorContext, InteractionController, PointerEvent, RegionCache,
    Tool, ToolSettings, MIN_EDIT_SIZE,
};

/// Owns everything an [`EditorContext`] borrows, so tests can drive the
/// controller directly without the full editor layer.
struct Rig {
    log: EditLog,
    settings: ToolSettings,
    compositor: Compositor,
    cache: RegionCache,
    base: RgbaImage,
    controller: InteractionController,
}

impl Rig {
    fn new(width: u32, height: u32) -> Self {
        Self {
            log: EditLog::new(),
            settings: ToolSettings::default(),
            compositor: Compositor::new(),
            cache: RegionCache::new(),
            base: RgbaImage::from_pixel(width, height, Rgba([200, 200, 200, 255])),
            controller: InteractionController::new(),
        }
    }

    fn press(&mut self, x: f32, y: f32) {
        let pos = pos2(x, y);
        let mut ctx = EditorContext {
            log: &mut self.log,
            settings: &mut self.settings,
            compositor: &mut self.compositor,
            cache: &mut self.cache,
            base: &self.base,
        };
        self.controller.pointer_down(pos, &mut ctx).unwrap();
    }

    fn move_to(&mut self, x: f32, y: f32) {
        let pos = pos2(x, y);
        let mut ctx = EditorContext {
            log: &mut self.log,
            settings: &mut self.settings,
            compositor: &mut self.compositor,
            cache: &mut self.cache,
            base: &self.base,
        };
        self.controller.pointer_move(pos, &mut ctx).unwrap();
    }

    fn release(&mut self, x: f32, y: f32) {
        let pos = pos2(x, y);
        let mut ctx = EditorContext {
            log: &mut self.log,
            settings: &mut self.settings,
            compositor: &mut self.compositor,
            cache: &mut self.cache,
            base: &self.base,
        };
        self.controller.pointer_up(pos, &mut ctx).unwrap();
    }
}

fn points_of(log: &EditLog) -> Vec<Pos2> {
    log.strokes()[0].points().to_vec()
}

#[test]
fn freehand_drag_records_every_move() {
    let mut rig = Rig::new(100, 100);
    rig.press(10.0, 10.0);
    rig.move_to(15.0, 12.0);
    rig.move_to(20.0, 20.0);
    rig.release(20.0, 20.0);

    assert_eq!(rig.log.len(), 1);
    assert_eq!(points_of(&rig.log), vec![pos2(10.0, 10.0), pos2(15.0, 12.0), pos2(20.0, 20.0)]);
    assert!(rig.controller.is_idle());
}

#[test]
fn two_point_shapes_keep_only_first_and_current() {
    let mut rig = Rig::new(100, 100);
    rig.settings.tool = Tool::Arrow;
    rig.press(10.0, 10.0);
    rig.move_to(30.0, 30.0);
    rig.move_to(50.0, 40.0);
    rig.release(50.0, 40.0);

    assert_eq!(points_of(&rig.log), vec![pos2(10.0, 10.0), pos2(50.0, 40.0)]);
    assert_eq!(rig.log.strokes()[0].tool(), ToolKind::Arrow);
}

#[test]
fn click_without_drag_discards_a_two_point_shape() {
    let mut rig = Rig::new(100, 100);
    rig.settings.tool = Tool::Rectangle;
    rig.press(5.0, 5.0);
    rig.release(5.0, 5.0);

    assert!(rig.log.is_empty());
    assert!(rig.controller.is_idle());
}

#[test]
fn preview_matches_the_in_progress_stroke() {
    let mut rig = Rig::new(100, 100);
    rig.press(10.0, 10.0);
    rig.move_to(20.0, 15.0);

    let preview = rig.controller.preview_stroke(&rig.settings).unwrap();
    assert_eq!(preview.points(), &[pos2(10.0, 10.0), pos2(20.0, 15.0)]);
    assert_eq!(preview.width(), rig.settings.stroke_width);
    assert_eq!(preview.color(), rig.settings.color);

    rig.release(20.0, 15.0);
    assert!(rig.controller.preview_stroke(&rig.settings).is_none());
}

#[test]
fn copy_region_captures_offset_then_switches_to_select() {
    let mut rig = Rig::new(100, 100);
    rig.settings.tool = Tool::CopyRegion;
    rig.press(5.0, 5.0);
    rig.move_to(25.0, 25.0);
    assert!(rig.controller.feedback().marquee.is_some());
    rig.release(25.0, 25.0);

    assert!(rig.controller.feedback().marquee.is_none());
    assert_eq!(rig.settings.tool, Tool::Select);
    assert_eq!(rig.log.regions().len(), 1);

    let region = &rig.log.regions()[0];
    assert_eq!(region.position(), pos2(15.0, 15.0));
    assert_eq!(region.width(), 20.0);
    assert_eq!(region.height(), 20.0);
    assert_eq!(region.pixels().dimensions(), (20, 20));

    // Drag the pasted region from its interior.
    rig.press(25.0, 25.0);
    rig.move_to(30.0, 30.0);
    rig.release(30.0, 30.0);

    let region = &rig.log.regions()[0];
    assert_eq!(region.position(), pos2(20.0, 20.0));
    assert_eq!(region.width(), 20.0);
    assert_eq!(region.height(), 20.0);
}

#[test]
fn zero_area_mark_is_discarded() {
    let mut rig = Rig::new(100, 100);
    rig.settings.tool = Tool::CopyRegion;
    rig.press(10.0, 10.0);
    rig.release(10.0, 10.0);

    assert!(rig.log.is_empty());
    // No capture happened, so the tool does not switch.
    assert_eq!(rig.settings.tool, Tool::CopyRegion);
}

#[test]
fn corner_resize_is_invertible() {
    let mut rig = Rig::new(200, 200);
    let original = vec![pos2(20.0, 20.0), pos2(40.0, 30.0), pos2(60.0, 60.0)];
    rig.log.add_stroke(factory::create_stroke(
        1,
        ToolKind::Freehand,
        original.clone(),
        4.0,
        Color32::RED,
        None,
    ));
    rig.settings.tool = Tool::Select;

    // Pull the bottom-right corner out, then drag it straight back.
    rig.press(60.0, 60.0);
    rig.move_to(75.0, 70.0);
    rig.release(75.0, 70.0);
    assert_eq!(rig.log.strokes()[0].bounds().max, pos2(75.0, 70.0));

    rig.press(75.0, 70.0);
    rig.move_to(60.0, 60.0);
    rig.release(60.0, 60.0);

    for (restored, expected) in points_of(&rig.log).iter().zip(&original) {
        assert!((restored.x - expected.x).abs() < 1e-3);
        assert!((restored.y - expected.y).abs() < 1e-3);
    }
    // Stroke width never scales with a resize.
    assert_eq!(rig.log.strokes()[0].width(), 4.0);
}

#[test]
fn resize_clamps_to_minimum_size() {
    let mut rig = Rig::new(200, 200);
    rig.log.add_region(factory::create_region(
        1,
        RgbaImage::new(20, 20),
        pos2(40.0, 40.0),
        20.0,
        20.0,
    ));
    rig.settings.tool = Tool::Select;

    // Drag the right edge far past the left side.
    rig.press(60.0, 50.0);
    rig.move_to(-40.0, 50.0);
    rig.release(-40.0, 50.0);

    let rect = rig.log.regions()[0].rect();
    assert_eq!(rect.width(), MIN_EDIT_SIZE);
    assert_eq!(rect.height(), 20.0);
    assert_eq!(rect.min, pos2(40.0, 40.0));
}

#[test]
fn arrow_endpoint_drag_moves_one_end() {
    let mut rig = Rig::new(200, 200);
    rig.log.add_stroke(factory::create_stroke(
        1,
        ToolKind::Arrow,
        vec![pos2(20.0, 20.0), pos2(80.0, 80.0)],
        4.0,
        Color32::RED,
        None,
    ));
    rig.settings.tool = Tool::Select;

    rig.press(80.0, 80.0);
    rig.move_to(100.0, 60.0);
    rig.release(100.0, 60.0);

    assert_eq!(points_of(&rig.log), vec![pos2(20.0, 20.0), pos2(100.0, 60.0)]);
}

#[test]
fn held_eraser_deletes_on_contact() {
    let mut rig = Rig::new(200, 200);
    rig.log.add_stroke(factory::create_stroke(
        1,
        ToolKind::Freehand,
        vec![pos2(10.0, 10.0), pos2(30.0, 10.0)],
        4.0,
        Color32::RED,
        None,
    ));
    rig.log.add_stroke(factory::create_stroke(
        2,
        ToolKind::Freehand,
        vec![pos2(10.0, 100.0), pos2(30.0, 100.0)],
        4.0,
        Color32::RED,
        None,
    ));
    rig.settings.tool = Tool::Erase;

    rig.press(20.0, 10.0);
    assert_eq!(rig.log.len(), 1);
    // Sweep over the second stroke without releasing.
    rig.move_to(20.0, 60.0);
    rig.move_to(20.0, 100.0);
    rig.release(20.0, 100.0);

    assert!(rig.log.is_empty());
}

#[test]
fn erase_on_empty_canvas_is_a_noop() {
    let mut rig = Rig::new(100, 100);
    rig.settings.tool = Tool::Erase;
    rig.press(50.0, 50.0);
    rig.release(50.0, 50.0);
    assert!(rig.log.is_empty());
    assert!(rig.controller.is_idle());
}

#[test]
fn idle_moves_publish_hover_feedback() {
    let mut rig = Rig::new(100, 100);
    rig.log.add_stroke(factory::create_stroke(
        1,
        ToolKind::Freehand,
        vec![pos2(20.0, 20.0), pos2(60.0, 60.0)],
        4.0,
        Color32::RED,
        None,
    ));

    rig.settings.tool = Tool::Select;
    rig.move_to(40.0, 40.0);
    assert_eq!(rig.controller.feedback().select_hover.map(|h| h.id), Some(1));

    rig.settings.tool = Tool::Erase;
    rig.move_to(40.0, 42.0);
    assert_eq!(rig.controller.feedback().erase_hover.map(|h| h.id), Some(1));
    assert!(rig.controller.feedback().select_hover.is_none());

    rig.move_to(5.0, 90.0);
    assert!(rig.controller.feedback().erase_hover.is_none());
}

#[test]
fn editor_scales_display_coordinates_to_surface() {
    let base = RgbaImage::from_pixel(100, 100, Rgba([255, 255, 255, 255]));
    let mut editor = Editor::new(base);
    // Surface shown at twice its size: device (40, 40) is surface (20, 20).
    editor.set_display_size(vec2(200.0, 200.0));

    editor.handle_pointer_event(PointerEvent::Down { position: pos2(40.0, 40.0) });
    editor.handle_pointer_event(PointerEvent::Moved { position: pos2(80.0, 80.0) });
    editor.handle_pointer_event(PointerEvent::Up { position: pos2(80.0, 80.0) });

    assert_eq!(editor.log().strokes()[0].points(), &[pos2(20.0, 20.0), pos2(40.0, 40.0)]);

    let removed = editor.undo();
    assert!(removed.is_some());
    assert!(editor.log().is_empty());
}

#[test]
fn editor_analysis_sees_a_clean_composite() {
    let base = RgbaImage::from_pixel(32, 32, Rgba([255, 255, 255, 255]));
    let mut editor = Editor::new(base);

    let seen = std::rc::Rc::new(std::cell::Cell::new((0u32, 0u32)));
    let handle = seen.clone();
    editor.set_analysis_handler(Box::new(move |surface| {
        handle.set(surface.dimensions());
    }));

    editor.request_analysis().unwrap();
    assert_eq!(seen.get(), (32, 32));
}
