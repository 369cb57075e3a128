use egui::{pos2, Color32, Pos2};
use image::RgbaImage;

use redline::edit::{factory, ToolKind};
use redline::hit_testing;
use redline::{generate_id, EditLog, PastedRegion, StrokeAction};

fn stroke(id: u64, tool: ToolKind, points: Vec<Pos2>, width: f32) -> StrokeAction {
    factory::create_stroke(id, tool, points, width, Color32::RED, Some(50.0))
}

fn region(id: u64, x: f32, y: f32, size: u32) -> PastedRegion {
    factory::create_region(
        id,
        RgbaImage::new(size, size),
        pos2(x, y),
        size as f32,
        size as f32,
    )
}

#[test]
fn chronological_merges_both_collections_by_id() {
    let mut log = EditLog::new();
    log.add_stroke(stroke(3, ToolKind::Freehand, vec![pos2(0.0, 0.0)], 4.0));
    log.add_region(region(1, 10.0, 10.0, 8));
    log.add_stroke(stroke(2, ToolKind::Rectangle, vec![pos2(0.0, 0.0), pos2(5.0, 5.0)], 4.0));
    log.add_region(region(4, 20.0, 20.0, 8));

    let ids: Vec<u64> = log.chronological().iter().map(|e| e.id()).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[test]
fn generated_ids_are_strictly_increasing() {
    let a = generate_id();
    let b = generate_id();
    let c = generate_id();
    assert!(a < b && b < c);
}

#[test]
fn undo_removes_newest_across_collections() {
    let mut log = EditLog::new();
    log.add_stroke(stroke(1, ToolKind::Freehand, vec![pos2(0.0, 0.0)], 4.0));
    log.add_region(region(2, 10.0, 10.0, 8));

    assert_eq!(log.undo(), Some(2));
    assert!(log.region_by_id(2).is_none());
    assert_eq!(log.undo(), Some(1));
    assert!(log.is_empty());
    assert_eq!(log.undo(), None);
}

#[test]
fn remove_by_id_searches_both_collections() {
    let mut log = EditLog::new();
    log.add_stroke(stroke(1, ToolKind::Freehand, vec![pos2(0.0, 0.0)], 4.0));
    log.add_region(region(2, 10.0, 10.0, 8));

    assert!(log.remove_by_id(2));
    assert!(log.remove_by_id(1));
    assert!(!log.remove_by_id(99));
    assert!(log.is_empty());
}

#[test]
fn replace_keeps_slot_and_id() {
    let mut log = EditLog::new();
    log.add_stroke(stroke(1, ToolKind::Freehand, vec![pos2(0.0, 0.0)], 4.0));
    log.add_stroke(stroke(2, ToolKind::Freehand, vec![pos2(5.0, 5.0)], 4.0));

    let replacement = stroke(1, ToolKind::Freehand, vec![pos2(9.0, 9.0)], 4.0);
    log.replace_stroke(0, replacement);

    assert_eq!(log.strokes()[0].points(), &[pos2(9.0, 9.0)]);
    assert_eq!(log.strokes()[0].id(), 1);
    assert_eq!(log.strokes()[1].id(), 2);
}

#[test]
fn intensity_is_dropped_for_non_filter_strokes() {
    let colored = stroke(1, ToolKind::Freehand, vec![pos2(0.0, 0.0)], 4.0);
    let filtered = stroke(2, ToolKind::BlurBrush, vec![pos2(0.0, 0.0)], 4.0);
    // Non-filter strokes fall back to the default intensity.
    assert_eq!(colored.intensity(), 50.0);
    assert_eq!(filtered.intensity(), 50.0);

    let strong = factory::create_stroke(
        3,
        ToolKind::PixelateBrush,
        vec![pos2(0.0, 0.0)],
        4.0,
        Color32::RED,
        Some(90.0),
    );
    assert_eq!(strong.intensity(), 90.0);
}

// Draw a freehand stroke, then a rectangle, erase the rectangle by one of
// its sides, and undo the remaining stroke.
#[test]
fn erase_then_undo_empties_the_log() {
    let mut log = EditLog::new();
    log.add_stroke(stroke(1, ToolKind::Freehand, vec![pos2(10.0, 10.0), pos2(20.0, 20.0)], 8.0));
    log.add_stroke(stroke(2, ToolKind::Rectangle, vec![pos2(30.0, 30.0), pos2(60.0, 60.0)], 4.0));

    let ids: Vec<u64> = log.chronological().iter().map(|e| e.id()).collect();
    assert_eq!(ids, vec![1, 2]);

    // Near the rectangle's top side, far from the freehand stroke.
    let hit = hit_testing::find_erase_target_at(pos2(45.0, 31.0), &log).unwrap();
    assert_eq!(hit.id, 2);
    log.remove_by_id(hit.id);

    assert_eq!(log.undo(), Some(1));
    assert!(log.is_empty());
}
