use super::{
    arg, parse_item_args, parse_item_settings, serialize_item_settings, Item, COMMENT_RE, META_RE,
};
use crate::codegen::CodeContext;
use crate::geometry::{Bounds, Point, Size};
use crate::pixels::Color;
use crate::raster::{draw_line, PixelSink};
use crate::Id;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: Id,
    pub name: String,
    pub is_hidden: bool,
    pub is_locked: bool,
    pub bounds: Bounds,
    pub from: Point,
    pub to: Point,
    pub color: Color,
}

static LINE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^display\.drawLine\((?P<args>[^)\n]+)\);{COMMENT_RE}{META_RE}"
    ))
    .expect("valid line regex")
});

impl Line {
    pub fn draw(&self, sink: &mut dyn PixelSink, offset: Point) {
        draw_line(sink, self.from + offset, self.to + offset, self.color);
    }

    pub fn bounds(&self) -> Bounds {
        let left = self.from.x.min(self.to.x);
        let top = self.from.y.min(self.to.y);
        let right = self.from.x.max(self.to.x);
        let bottom = self.from.y.max(self.to.y);
        Bounds::new(
            Point::new(left, top),
            Size::new(right - left + 1, bottom - top + 1),
        )
    }

    pub fn to_code(&self, ctx: &mut CodeContext<'_>) -> String {
        let unique_name = ctx.unique_name(&self.name);
        let mut code = format!(
            "display.drawLine({}, {}, {}, {}, {});",
            ctx.coord_x(self.from.x),
            ctx.coord_y(self.from.y),
            ctx.coord_x(self.to.x),
            ctx.coord_y(self.to.y),
            self.color
        );
        code += &ctx.comment(
            &unique_name,
            &serialize_item_settings(self.is_locked, self.is_hidden),
        );
        code
    }

    pub fn from_code(code: &str) -> Option<(Item, usize)> {
        let captures = LINE_RE.captures(code)?;
        let length = captures[0].len();

        let args = parse_item_args(&captures["args"]);
        let (is_locked, is_hidden) = parse_item_settings(
            captures.name("settings").map(|m| m.as_str()),
        );

        let item = Line {
            id: 0,
            name: captures
                .name("name")
                .map(|m| m.as_str().to_owned())
                .unwrap_or_default(),
            from: Point::new(arg(&args, 0), arg(&args, 1)),
            to: Point::new(arg(&args, 2), arg(&args, 3)),
            color: arg(&args, 4) as Color,
            is_locked,
            is_hidden,
            bounds: Bounds::empty(),
        };

        Some((Item::Line(item), length))
    }
}
