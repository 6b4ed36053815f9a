use gfxui_core::item::{Bitmap, Circle, Group, Instance, Item, Line, Polygon, Rect, Text};
use gfxui_core::{
    pack_pixel, CodeOptions, CommentLevel, GfxFont, GfxGlyph, Pixels, Point, Project, Size,
};

fn test_font() -> GfxFont {
    GfxFont {
        name: "mini5pt".to_owned(),
        bytes: vec![0xff, 0x80, 0x1c, 0x71],
        glyphs: vec![
            GfxGlyph { byte_offset: 0, width: 3, height: 5, x_advance: 4, delta_x: 0, delta_y: -5 },
            GfxGlyph { byte_offset: 2, width: 3, height: 5, x_advance: 4, delta_x: 0, delta_y: -5 },
        ],
        ascii_start: 0x41,
        ascii_end: 0x42,
        y_advance: 7,
        baseline: 5,
        is_builtin: false,
    }
}

/// A project exercising every item variant, a font and a component instance.
fn test_project() -> Project {
    let mut project = Project::new();
    project.fonts.insert(test_font());

    let icon = project.add_component(Some("Icon".to_owned()), Some(Size::new(10, 10)));
    project.activate_frame(icon);
    project
        .add_item(Item::Rect(Rect {
            name: "Dot".to_owned(),
            size: Size::new(3, 3),
            color: 15,
            is_filled: true,
            ..Rect::default()
        }))
        .unwrap();

    let main = project.add_frame(Some("Main".to_owned()), Some(Size::new(128, 64)));
    project.activate_frame(main);

    let mut pixels = Pixels::new();
    pixels.insert(pack_pixel(20, 20));
    pixels.insert(pack_pixel(21, 21));
    pixels.insert(pack_pixel(28, 20));

    let items = [
        Item::Rect(Rect {
            name: "Border".to_owned(),
            size: Size::new(128, 64),
            color: 15,
            is_locked: true,
            ..Rect::default()
        }),
        Item::Rect(Rect {
            name: "Panel".to_owned(),
            position: Point::new(2, 2),
            size: Size::new(30, 20),
            radius: 4,
            color: 7,
            is_filled: true,
            ..Rect::default()
        }),
        Item::Line(Line {
            name: "Diagonal".to_owned(),
            from: Point::new(0, 63),
            to: Point::new(127, 0),
            color: 15,
            ..Line::default()
        }),
        Item::Circle(Circle {
            name: "Knob".to_owned(),
            center: Point::new(64, 32),
            radius: 9,
            color: 15,
            is_filled: true,
            is_hidden: true,
            ..Circle::default()
        }),
        Item::Polygon(Polygon {
            name: "Hex".to_owned(),
            center: Point::new(100, 40),
            radius: 8,
            sides: 6,
            rotation: 0.5,
            color: 15,
            ..Polygon::default()
        }),
        Item::Bitmap(Bitmap {
            name: "Sprite".to_owned(),
            pixels,
            color: 15,
            ..Bitmap::default()
        }),
        Item::Text(Text {
            name: "Label".to_owned(),
            position: Point::new(4, 50),
            content: "AB\n\"A\"".to_owned(),
            font: "mini5pt".to_owned(),
            color: 15,
            ..Text::default()
        }),
        Item::Instance(Instance {
            name: "IconHere".to_owned(),
            position: Point::new(110, 2),
            component_id: Some(icon),
            ..Instance::default()
        }),
    ];
    for item in items {
        project.add_item(item).unwrap();
    }

    // A group holding two freshly added rects.
    let a = project
        .add_item(Item::Rect(Rect {
            name: "A".to_owned(),
            position: Point::new(40, 8),
            size: Size::new(4, 4),
            color: 15,
            ..Rect::default()
        }))
        .unwrap();
    let b = project
        .add_item(Item::Rect(Rect {
            name: "B".to_owned(),
            position: Point::new(46, 8),
            size: Size::new(4, 4),
            color: 15,
            ..Rect::default()
        }))
        .unwrap();
    let children = vec![
        project.remove_item(b).unwrap(),
        project.remove_item(a).unwrap(),
    ];
    project
        .add_item(Item::Group(Group {
            name: "Pair".to_owned(),
            children,
            ..Group::default()
        }))
        .unwrap();

    project
}

#[test]
fn test_full_project_code_round_trip() {
    let project = test_project();
    let options = CodeOptions::default();
    let code = project.to_code(options);

    let parsed = Project::from_code(&code);
    assert_eq!(parsed.frames.len(), 1);
    assert_eq!(parsed.components.len(), 1);
    assert!(parsed.fonts.get("mini5pt").is_some());

    // A parsed project regenerates the exact same text: ids are fresh but
    // everything that is serialized matches field for field.
    assert_eq!(parsed.to_code(options), code);
}

#[test]
fn test_round_trip_preserves_structure_and_flags() {
    let code = test_project().to_code(CodeOptions::default());
    let parsed = Project::from_code(&code);

    let main = &parsed.frames[0];
    assert_eq!(main.name, "Main");
    assert_eq!(main.size, Size::new(128, 64));

    let group = main
        .children
        .iter()
        .find_map(|item| match item {
            Item::Group(group) => Some(group),
            _ => None,
        })
        .expect("group survives the round trip");
    assert_eq!(group.name, "Pair");
    assert_eq!(group.children.len(), 2);
    assert_eq!(group.children[0].name(), "B");

    let circle = main
        .children
        .iter()
        .find_map(|item| match item {
            Item::Circle(circle) => Some(circle),
            _ => None,
        })
        .expect("circle survives the round trip");
    assert!(circle.is_hidden);

    let text = main
        .children
        .iter()
        .find_map(|item| match item {
            Item::Text(text) => Some(text),
            _ => None,
        })
        .expect("text survives the round trip");
    assert_eq!(text.content, "AB\n\"A\"");
    assert_eq!(text.font, "mini5pt");

    let instance = main
        .children
        .iter()
        .find_map(|item| match item {
            Item::Instance(instance) => Some(instance),
            _ => None,
        })
        .expect("instance survives the round trip");
    assert_eq!(instance.component_id, Some(parsed.components[0].id));
}

#[test]
fn test_offset_mode_round_trip() {
    let project = test_project();
    let options = CodeOptions { include_offset: true, comments: CommentLevel::All };
    let code = project.to_code(options);
    assert!(code.contains("void drawFrameMain(int x, int y)"));
    assert!(code.contains("x + "));

    let parsed = Project::from_code(&code);
    let rect = parsed.frames[0]
        .children
        .iter()
        .find_map(|item| match item {
            Item::Rect(rect) if rect.name == "Panel" => Some(rect),
            _ => None,
        })
        .unwrap();
    assert_eq!(rect.position, Point::new(2, 2));

    assert_eq!(parsed.to_code(options), code);
}

#[test]
fn test_duplicate_names_are_disambiguated() {
    let mut project = Project::new();
    let frame = project.add_frame(Some("Main".to_owned()), None);
    project.activate_frame(frame);
    for _ in 0..3 {
        project.add_item(Item::Rect(Rect::default())).unwrap();
    }

    let code = project.to_code(CodeOptions::default());
    assert!(code.contains("// Rect\n"));
    assert!(code.contains("// Rect_1"));
    assert!(code.contains("// Rect_2"));

    let parsed = Project::from_code(&code);
    // Child 0 is topmost and is emitted last, so it parses back with the
    // highest suffix.
    let names: Vec<&str> = parsed.frames[0]
        .children
        .iter()
        .map(|item| item.name())
        .collect();
    assert_eq!(names, vec!["Rect_2", "Rect_1", "Rect"]);
}

#[test]
fn test_font_blocks_round_trip() {
    let mut project = Project::new();
    project.fonts.insert(test_font());
    let code = project.to_code(CodeOptions::default());
    assert!(code.contains("// font-start"));
    assert!(code.contains("const GFXfont mini5pt PROGMEM"));

    let parsed = Project::from_code(&code);
    let font = parsed.fonts.get("mini5pt").expect("font parsed back");
    assert_eq!(font.glyphs.len(), 2);
    assert_eq!(font.y_advance, 7);
}
