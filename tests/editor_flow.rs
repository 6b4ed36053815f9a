//! End-to-end editing flows: create, snap, rasterize, undo, re-export.

use gfxui_core::item::{Item, Rect};
use gfxui_core::{
    pack_pixel, point_snap, snap_threshold, translate_item, CodeOptions, History, Pixels, Point,
    Project, Size,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn test_edit_undo_export_cycle() {
    init_logging();

    let mut project = Project::new();
    let mut history = History::new();

    let frame_id = project.add_frame(Some("Main".to_owned()), Some(Size::new(64, 32)));
    project.activate_frame(frame_id);
    history.track(project.frame(frame_id).unwrap());

    let rect_id = project
        .add_item(Item::Rect(Rect {
            size: Size::new(4, 4),
            color: 15,
            is_filled: true,
            ..Rect::default()
        }))
        .unwrap();
    history.save_state(project.frame_mut(frame_id).unwrap());

    // Drag the rect and commit a second state.
    {
        let frame = project.frame_mut(frame_id).unwrap();
        let item = frame.find_item_mut(rect_id).unwrap();
        translate_item(item, Point::new(10, 5), &gfxui_core::EmptyContext);
    }
    history.save_state(project.frame_mut(frame_id).unwrap());

    let code_moved = project.to_code(CodeOptions::default());
    assert!(code_moved.contains("display.fillRect(10, 5, 4, 4, 15);"));

    history.undo(project.frame_mut(frame_id).unwrap());
    let code_back = project.to_code(CodeOptions::default());
    assert!(code_back.contains("display.fillRect(0, 0, 4, 4, 15);"));

    history.redo(project.frame_mut(frame_id).unwrap());
    assert_eq!(project.to_code(CodeOptions::default()), code_moved);
}

#[test]
fn test_snapping_against_frame_and_items() {
    init_logging();

    let mut project = Project::new();
    let frame_id = project.add_frame(None, None);
    project.activate_frame(frame_id);
    project
        .add_item(Item::Rect(Rect {
            position: Point::new(20, 20),
            size: Size::new(10, 10),
            ..Rect::default()
        }))
        .unwrap();

    let frame = project.active_frame().unwrap();
    let mut targets: Vec<_> = frame
        .items_flat()
        .iter()
        .filter_map(|item| item.cached_bounds())
        .collect();
    targets.push(frame.bounds());

    let threshold = snap_threshold(frame.scale);
    assert_eq!(threshold, 1, "default zoom gives a 1px threshold");

    // Exactly threshold away does not snap, threshold - 1 does.
    let snap = point_snap(Point::new(21, 40), &targets, 2);
    assert_eq!(snap.amount, Point::new(-1, 0));
    let no_snap = point_snap(Point::new(22, 40), &targets, 2);
    assert_eq!(no_snap.amount, Point::ZERO);
}

#[test]
fn test_frame_rasterizes_like_the_generated_calls() {
    init_logging();

    let mut project = Project::new();
    let frame_id = project.add_frame(None, Some(Size::new(8, 8)));
    project.activate_frame(frame_id);
    project
        .add_item(Item::Rect(Rect {
            position: Point::new(1, 1),
            size: Size::new(3, 3),
            color: 15,
            is_filled: true,
            ..Rect::default()
        }))
        .unwrap();

    let mut pixels = Pixels::new();
    project.active_frame().unwrap().draw(&mut pixels, &project);
    assert_eq!(pixels.len(), 9);
    assert!(pixels.contains(&pack_pixel(1, 1)));
    assert!(pixels.contains(&pack_pixel(3, 3)));
    assert!(!pixels.contains(&pack_pixel(4, 4)));

    // The same artwork parsed back from code draws the same pixels.
    let parsed = Project::from_code(&project.to_code(CodeOptions::default()));
    let mut reparsed_pixels = Pixels::new();
    parsed.frames[0].draw(&mut reparsed_pixels, &parsed);
    assert_eq!(reparsed_pixels, pixels);
}
