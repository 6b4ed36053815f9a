//! A single forward scan over generated source. At every cursor position the
//! recognizers are tried in a fixed priority order; anything no recognizer
//! consumes is skipped one character at a time and remembered as an ignored
//! span, so foreign text degrades the result instead of failing it.

use crate::geometry::Size;
use crate::item::{item_from_code, Item};
use crate::project::Project;
use crate::util::sanitize_identifier;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

static FONT_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^// font-start(?P<body>(?s:.+?))// font-end").expect("valid font block regex")
});

static FRAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^void draw(?P<kind>Frame|Component)(?P<ident>\w*)\((?P<fnargs>[^)]*)\)\s*\{(?: // (?P<name>[\w ]+) \((?P<settings>[^)]*)\))?",
    )
    .expect("valid frame header regex")
});

static FRAME_SIZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?P<width>\d+)x(?P<height>\d+)$").expect("valid size flag regex"));

/// Parse `code` into `project`, appending to whatever it already holds.
pub fn parse_into(project: &mut Project, code: &str) {
    let mut pos = 0;
    let mut frame_open = false;
    let mut group_stack: Vec<crate::Id> = Vec::new();
    let mut ignored: Vec<(usize, usize)> = Vec::new();
    let mut ignored_start: Option<usize> = None;

    let mut flush_ignored = |start: &mut Option<usize>, end: usize, spans: &mut Vec<(usize, usize)>| {
        if let Some(begin) = start.take() {
            spans.push((begin, end));
        }
    };

    while pos < code.len() {
        let input = &code[pos..];

        if let Some(captures) = FONT_BLOCK_RE.captures(input) {
            flush_ignored(&mut ignored_start, pos, &mut ignored);
            match project.fonts.add(&captures["body"]) {
                Ok(name) => log::debug!("parsed font {name}"),
                Err(err) => log::warn!("skipping font block: {err}"),
            }
            pos += captures[0].len();
            continue;
        }

        if !frame_open {
            if let Some(captures) = FRAME_RE.captures(input) {
                flush_ignored(&mut ignored_start, pos, &mut ignored);

                let name = captures
                    .name("name")
                    .map(|m| m.as_str().to_owned())
                    .or_else(|| {
                        let ident = &captures["ident"];
                        (!ident.is_empty()).then(|| ident.to_owned())
                    });
                let size = captures
                    .name("settings")
                    .and_then(|settings| parse_frame_settings(settings.as_str()));

                let id = if &captures["kind"] == "Component" {
                    project.add_component(name, size)
                } else {
                    project.add_frame(name, size)
                };
                project.activate_frame(id);
                frame_open = true;
                group_stack.clear();
                pos += captures[0].len();
            } else {
                ignored_start.get_or_insert(pos);
                pos += next_char_len(input);
            }
            continue;
        }

        if let Some((item, length)) = item_from_code(input) {
            flush_ignored(&mut ignored_start, pos, &mut ignored);
            let is_group = matches!(item, Item::Group(_));

            match project.add_item(item) {
                Ok(id) => {
                    if let Some(&group_id) = group_stack.last() {
                        reparent_into_group(project, id, group_id);
                    }
                    if is_group {
                        group_stack.push(id);
                    }
                }
                Err(err) => log::warn!("skipping item: {err}"),
            }
            pos += length;
            continue;
        }

        if let Some(rest) = input.strip_prefix("// group-end") {
            flush_ignored(&mut ignored_start, pos, &mut ignored);
            group_stack.pop();
            pos += input.len() - rest.len();
            continue;
        }

        if input.starts_with('}') {
            flush_ignored(&mut ignored_start, pos, &mut ignored);
            frame_open = false;
            group_stack.clear();
            pos += 1;
            continue;
        }

        ignored_start.get_or_insert(pos);
        pos += next_char_len(input);
    }
    flush_ignored(&mut ignored_start, code.len(), &mut ignored);

    for (start, end) in ignored {
        let span = code[start..end].trim();
        if !span.is_empty() {
            log::debug!("ignored {} bytes at offset {start}", end - start);
        }
    }

    resolve_instances(project);
}

fn next_char_len(input: &str) -> usize {
    input.chars().next().map_or(1, char::len_utf8)
}

/// Frame header settings are comma-separated flags; the only one currently
/// defined is the `<width>x<height>` size.
fn parse_frame_settings(settings: &str) -> Option<Size> {
    settings.split(',').map(str::trim).find_map(|flag| {
        let captures = FRAME_SIZE_RE.captures(flag)?;
        Some(Size::new(
            captures["width"].parse().ok()?,
            captures["height"].parse().ok()?,
        ))
    })
}

/// Move a freshly added item from the top of the frame's child list into the
/// open group, keeping the top-of-group position so z-order is preserved.
fn reparent_into_group(project: &mut Project, item_id: crate::Id, group_id: crate::Id) {
    let Some(frame) = project.active_frame_mut() else {
        return;
    };
    let Some(item) = frame.remove_item(item_id) else {
        return;
    };
    match frame.find_group_mut(group_id) {
        Some(group) => group.children.insert(0, item),
        // The group itself disappeared; put the item back at top level.
        None => frame.children.insert(0, item),
    }
}

/// Instances reference components by name in the generated text, and the
/// component may appear later in the file. Once the whole file is scanned,
/// swap names for ids; a missing component leaves the instance unresolved
/// and inert.
fn resolve_instances(project: &mut Project) {
    let by_identifier: HashMap<String, crate::Id> = project
        .components
        .iter()
        .map(|component| (sanitize_identifier(&component.name), component.id))
        .collect();

    let mut resolve = |item: &mut Item| {
        if let Item::Instance(instance) = item {
            let Some(name) = instance.component_name.as_deref() else {
                return;
            };
            match by_identifier.get(name) {
                Some(&id) => {
                    instance.component_id = Some(id);
                    instance.component_name = None;
                }
                None => log::debug!("unresolved component reference {name}"),
            }
        }
    };

    for frame in project.frames.iter_mut().chain(project.components.iter_mut()) {
        for_each_item_mut(&mut frame.children, &mut resolve);
    }
}

fn for_each_item_mut(items: &mut Vec<Item>, f: &mut impl FnMut(&mut Item)) {
    for item in items {
        f(item);
        if let Item::Group(group) = item {
            for_each_item_mut(&mut group.children, f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point;

    #[test]
    fn parses_frames_with_items() {
        let code = "\
void drawFrameMain() { // Main (32x16)
  display.fillRect(1, 2, 3, 4, 15); // Box
  display.drawLine(0, 0, 5, 5, 15); // Diagonal
};
";
        let project = Project::from_code(code);
        assert_eq!(project.frames.len(), 1);
        let frame = &project.frames[0];
        assert_eq!(frame.name, "Main");
        assert_eq!(frame.size, Size::new(32, 16));
        // Statements are parsed bottom-up into z-order: the first statement
        // is drawn first, so it ends up last in the child list.
        assert_eq!(frame.children[0].name(), "Diagonal");
        assert_eq!(frame.children[1].name(), "Box");
    }

    #[test]
    fn groups_reparent_their_items() {
        let code = "\
void drawFrameMain() { // Main (128x64)
  // group-start Overlay
  display.fillRect(0, 0, 2, 2, 15); // A
  display.fillRect(4, 0, 2, 2, 15); // B
  // group-end
  display.drawLine(0, 0, 9, 9, 15); // Below
};
";
        let project = Project::from_code(code);
        let frame = &project.frames[0];
        assert_eq!(frame.children.len(), 2);
        assert_eq!(frame.children[1].name(), "Overlay");

        let Item::Group(group) = &frame.children[1] else { panic!("expected a group") };
        assert_eq!(group.children.len(), 2);
        assert_eq!(group.children[0].name(), "A");
        assert_eq!(group.children[1].name(), "B");
    }

    #[test]
    fn instances_resolve_across_forward_references() {
        let code = "\
void drawFrameMain() { // Main (128x64)
  drawComponentIcon(5, 6); // Instance
};

void drawComponentIcon() { // Icon (10x10)
  display.fillRect(0, 0, 3, 3, 15); // Dot
};
";
        let project = Project::from_code(code);
        assert_eq!(project.components.len(), 1);
        let component_id = project.components[0].id;

        let Item::Instance(instance) = &project.frames[0].children[0] else {
            panic!("expected an instance")
        };
        assert_eq!(instance.component_id, Some(component_id));
        assert!(instance.component_name.is_none());
        assert_eq!(instance.position, Point::new(5, 6));
    }

    #[test]
    fn unknown_component_references_stay_unresolved() {
        let code = "\
void drawFrameMain() { // Main (128x64)
  drawComponentMissing(1, 1); // Instance
};
";
        let project = Project::from_code(code);
        let Item::Instance(instance) = &project.frames[0].children[0] else {
            panic!("expected an instance")
        };
        assert!(instance.component_id.is_none());
        assert_eq!(instance.component_name.as_deref(), Some("Missing"));
    }

    #[test]
    fn foreign_text_is_skipped() {
        let code = "\
#include <Arduino.h>
int main() { return 0; }

void drawFrameMain() { // Main (128x64)
  something_unknown(1, 2);
  display.fillRect(0, 0, 2, 2, 15); // Kept
};
";
        let project = Project::from_code(code);
        assert_eq!(project.frames.len(), 1);
        assert_eq!(project.frames[0].children.len(), 1);
        assert_eq!(project.frames[0].children[0].name(), "Kept");
    }

    #[test]
    fn frame_settings_parse_the_size_flag() {
        assert_eq!(parse_frame_settings("128x64"), Some(Size::new(128, 64)));
        assert_eq!(parse_frame_settings("foo, 10x20"), Some(Size::new(10, 20)));
        assert_eq!(parse_frame_settings("foo"), None);
    }
}
