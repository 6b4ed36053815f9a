use super::{parse_item_settings, serialize_item_settings, Item, ItemContext, META_RE};
use crate::codegen::{CodeContext, CommentLevel};
use crate::geometry::{Bounds, Point};
use crate::raster::PixelSink;
use crate::Id;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A container that exclusively owns its children. Groups have no geometry of
/// their own; bounds are the union of the visible descendants and are never
/// cached.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: Id,
    pub name: String,
    pub is_hidden: bool,
    pub is_locked: bool,
    pub children: Vec<Item>,
}

static GROUP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"^// group-start *{META_RE}")).expect("valid group regex")
});

impl Group {
    pub fn draw(&self, sink: &mut dyn PixelSink, ctx: &dyn ItemContext, offset: Point) {
        // Child 0 is topmost, so it is drawn last.
        for child in self.children.iter().rev() {
            child.draw(sink, ctx, offset);
        }
    }

    /// Union of all visible descendant bounds, or the empty sentinel when no
    /// descendant contributes geometry.
    pub fn bounds(&self, ctx: &dyn ItemContext) -> Bounds {
        let mut bounds = Bounds::empty();
        for child in &self.children {
            if child.is_hidden() {
                continue;
            }
            bounds = bounds.union(&child.bounds(ctx));
        }
        bounds
    }

    pub fn to_code(&self, ctx: &mut CodeContext<'_>) -> String {
        let unique_name = ctx.unique_name(&self.name);

        let mut lines = Vec::new();
        if ctx.options.comments != CommentLevel::None {
            let settings = serialize_item_settings(self.is_locked, self.is_hidden);
            if settings.is_empty() {
                lines.push(format!("// group-start {unique_name}"));
            } else {
                lines.push(format!("// group-start {unique_name} {settings}"));
            }
        }
        for child in self.children.iter().rev() {
            lines.push(child.to_code(ctx));
        }
        if ctx.options.comments != CommentLevel::None {
            lines.push("// group-end".to_owned());
        }
        lines.join("\n")
    }

    /// Matches only the opening sentinel; the parser re-parents the items
    /// that follow until the matching `// group-end`.
    pub fn from_code(code: &str) -> Option<(Item, usize)> {
        let captures = GROUP_RE.captures(code)?;
        let length = captures[0].len();

        let (is_locked, is_hidden) = parse_item_settings(
            captures.name("settings").map(|m| m.as_str()),
        );

        let item = Group {
            id: 0,
            name: captures
                .name("name")
                .map(|m| m.as_str().to_owned())
                .unwrap_or_default(),
            is_locked,
            is_hidden,
            children: Vec::new(),
        };

        Some((Item::Group(item), length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;
    use crate::item::{EmptyContext, Rect};

    fn group_of_rects() -> Group {
        let rect = |x: i32, y: i32| {
            Item::Rect(Rect {
                position: Point::new(x, y),
                size: Size::new(2, 2),
                ..Rect::default()
            })
        };
        Group {
            name: "Group".to_owned(),
            children: vec![rect(0, 0), rect(5, 5)],
            ..Group::default()
        }
    }

    #[test]
    fn bounds_union_skips_hidden_children() {
        let mut group = group_of_rects();
        assert_eq!(group.bounds(&EmptyContext).size(), Size::new(7, 7));

        if let Item::Rect(rect) = &mut group.children[1] {
            rect.is_hidden = true;
        }
        assert_eq!(group.bounds(&EmptyContext).size(), Size::new(2, 2));
    }

    #[test]
    fn empty_group_has_empty_bounds() {
        let group = Group::default();
        assert!(group.bounds(&EmptyContext).is_empty());
    }

    #[test]
    fn sentinel_parse_captures_flags() {
        let (item, length) = Group::from_code("// group-start Overlay (hidden)").unwrap();
        let Item::Group(group) = item else { panic!("expected a group") };
        assert_eq!(group.name, "Overlay");
        assert!(group.is_hidden);
        assert_eq!(length, "// group-start Overlay (hidden)".len());
    }
}
