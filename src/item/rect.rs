use super::{
    arg, parse_item_args, parse_item_settings, serialize_item_settings, Item, COMMENT_RE, META_RE,
};
use crate::codegen::CodeContext;
use crate::geometry::{Bounds, Point, Size};
use crate::pixels::Color;
use crate::raster::{
    draw_circle_helper, draw_horizontal_line, draw_vertical_line, fill_circle_helper, fill_rect,
    stroke_rect, PixelSink,
};
use crate::Id;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub id: Id,
    pub name: String,
    pub is_hidden: bool,
    pub is_locked: bool,
    pub bounds: Bounds,
    pub position: Point,
    pub size: Size,
    /// Corner radius; 0 draws a sharp rectangle.
    pub radius: i32,
    pub color: Color,
    pub is_filled: bool,
}

static RECT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^display\.(?P<method>drawRect|fillRect|drawRoundRect|fillRoundRect)\((?P<args>[^)\n]+)\);{COMMENT_RE}{META_RE}"
    ))
    .expect("valid rect regex")
});

impl Rect {
    pub fn draw(&self, sink: &mut dyn PixelSink, offset: Point) {
        if self.radius > 0 {
            self.draw_rounded(sink, offset);
        } else {
            let position = self.position + offset;
            if self.is_filled {
                fill_rect(sink, position, self.size, self.color);
            } else {
                stroke_rect(sink, position, self.size, self.color);
            }
        }
    }

    fn draw_rounded(&self, sink: &mut dyn PixelSink, offset: Point) {
        let Size { width: w, height: h } = self.size;
        let r = self.radius.min(w.min(h) / 2);
        let x = self.position.x + offset.x;
        let y = self.position.y + offset.y;
        let color = self.color;

        if self.is_filled {
            fill_rect(
                sink,
                Point::new(x + r, y),
                Size::new(w - 2 * r, h),
                color,
            );
            fill_circle_helper(sink, x + w - r - 1, y + r, r, 1, h - 2 * r - 1, color);
            fill_circle_helper(sink, x + r, y + r, r, 2, h - 2 * r - 1, color);
        } else {
            draw_horizontal_line(sink, x + r, y, w - 2 * r, color);
            draw_horizontal_line(sink, x + r, y + h - 1, w - 2 * r, color);
            draw_vertical_line(sink, x, y + r, h - 2 * r, color);
            draw_vertical_line(sink, x + w - 1, y + r, h - 2 * r, color);

            draw_circle_helper(sink, x + r, y + r, r, 1, color);
            draw_circle_helper(sink, x + w - r - 1, y + r, r, 2, color);
            draw_circle_helper(sink, x + w - r - 1, y + h - r - 1, r, 4, color);
            draw_circle_helper(sink, x + r, y + h - r - 1, r, 8, color);
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.position, self.size)
    }

    pub fn to_code(&self, ctx: &mut CodeContext<'_>) -> String {
        let unique_name = ctx.unique_name(&self.name);
        let x = ctx.coord_x(self.position.x);
        let y = ctx.coord_y(self.position.y);
        let Size { width, height } = self.size;

        let mut code = if self.radius > 0 {
            let method = if self.is_filled { "fillRoundRect" } else { "drawRoundRect" };
            format!(
                "display.{method}({x}, {y}, {width}, {height}, {}, {});",
                self.radius, self.color
            )
        } else {
            let method = if self.is_filled { "fillRect" } else { "drawRect" };
            format!("display.{method}({x}, {y}, {width}, {height}, {});", self.color)
        };

        code += &ctx.comment(
            &unique_name,
            &serialize_item_settings(self.is_locked, self.is_hidden),
        );
        code
    }

    pub fn from_code(code: &str) -> Option<(Item, usize)> {
        let captures = RECT_RE.captures(code)?;
        let length = captures[0].len();

        let method = &captures["method"];
        let args = parse_item_args(&captures["args"]);
        let (is_locked, is_hidden) = parse_item_settings(
            captures.name("settings").map(|m| m.as_str()),
        );

        let is_rounded = method == "drawRoundRect" || method == "fillRoundRect";
        let is_filled = method == "fillRect" || method == "fillRoundRect";

        let item = Rect {
            id: 0,
            name: captures
                .name("name")
                .map(|m| m.as_str().to_owned())
                .unwrap_or_default(),
            position: Point::new(arg(&args, 0), arg(&args, 1)),
            size: Size::new(arg(&args, 2), arg(&args, 3)),
            radius: if is_rounded { arg(&args, 4) } else { 0 },
            color: if is_rounded { arg(&args, 5) } else { arg(&args, 4) } as Color,
            is_filled,
            is_locked,
            is_hidden,
            bounds: Bounds::empty(),
        };

        Some((Item::Rect(item), length))
    }
}
