use super::{
    arg, parse_item_args, parse_item_settings, serialize_item_settings, Item, COMMENT_RE, META_RE,
};
use crate::codegen::CodeContext;
use crate::geometry::{Bounds, Point, Size};
use crate::pixels::Color;
use crate::raster::{fill_circle, stroke_circle, PixelSink};
use crate::Id;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub id: Id,
    pub name: String,
    pub is_hidden: bool,
    pub is_locked: bool,
    pub bounds: Bounds,
    pub center: Point,
    pub radius: i32,
    pub color: Color,
    pub is_filled: bool,
}

static CIRCLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^display\.(?P<method>drawCircle|fillCircle)\((?P<args>[^)\n]+)\);{COMMENT_RE}{META_RE}"
    ))
    .expect("valid circle regex")
});

impl Circle {
    pub fn draw(&self, sink: &mut dyn PixelSink, offset: Point) {
        let center = self.center + offset;
        if self.is_filled {
            fill_circle(sink, center, self.radius, self.color);
        } else {
            stroke_circle(sink, center, self.radius, self.color);
        }
    }

    pub fn bounds(&self) -> Bounds {
        let position = self.center - Point::new(self.radius, self.radius);
        let side = self.radius * 2 + 1;
        Bounds::new(position, Size::new(side, side))
    }

    pub fn to_code(&self, ctx: &mut CodeContext<'_>) -> String {
        let unique_name = ctx.unique_name(&self.name);
        let method = if self.is_filled { "fillCircle" } else { "drawCircle" };
        let mut code = format!(
            "display.{method}({}, {}, {}, {});",
            ctx.coord_x(self.center.x),
            ctx.coord_y(self.center.y),
            self.radius,
            self.color
        );
        code += &ctx.comment(
            &unique_name,
            &serialize_item_settings(self.is_locked, self.is_hidden),
        );
        code
    }

    pub fn from_code(code: &str) -> Option<(Item, usize)> {
        let captures = CIRCLE_RE.captures(code)?;
        let length = captures[0].len();

        let args = parse_item_args(&captures["args"]);
        let (is_locked, is_hidden) = parse_item_settings(
            captures.name("settings").map(|m| m.as_str()),
        );

        let item = Circle {
            id: 0,
            name: captures
                .name("name")
                .map(|m| m.as_str().to_owned())
                .unwrap_or_default(),
            center: Point::new(arg(&args, 0), arg(&args, 1)),
            radius: arg(&args, 2),
            color: arg(&args, 3) as Color,
            is_filled: &captures["method"] == "fillCircle",
            is_locked,
            is_hidden,
            bounds: Bounds::empty(),
        };

        Some((Item::Circle(item), length))
    }
}
