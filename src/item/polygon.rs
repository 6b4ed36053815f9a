use super::{
    parse_item_args, parse_item_settings, serialize_item_settings, Item, COMMENT_RE, META_RE,
};
use crate::codegen::CodeContext;
use crate::geometry::{Bounds, Point, Size};
use crate::pixels::Color;
use crate::raster::{draw_line, fill_triangle, polygon_points, PixelSink};
use crate::Id;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// A regular polygon. Unlike the other shapes this has no direct counterpart
/// in the display library, so its generated call targets a helper in the
/// `gfxui` namespace instead of `display`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    pub id: Id,
    pub name: String,
    pub is_hidden: bool,
    pub is_locked: bool,
    pub bounds: Bounds,
    pub center: Point,
    pub radius: i32,
    pub sides: u32,
    /// Radians, clockwise. Vertex 0 points up at rotation 0.
    pub rotation: f64,
    pub color: Color,
    pub is_filled: bool,
}

static POLYGON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^gfxui::(?P<method>drawRegularPolygon|fillRegularPolygon)\((?P<args>[^)\n]+)\);{COMMENT_RE}{META_RE}"
    ))
    .expect("valid polygon regex")
});

impl Polygon {
    pub fn draw(&self, sink: &mut dyn PixelSink, offset: Point) {
        let points = polygon_points(self.center, self.radius, self.sides, self.rotation);
        let sides = points.len();

        if self.is_filled {
            let center = self.center + offset;
            for i in 0..sides {
                let a = points[i] + offset;
                let b = points[(i + 1) % sides] + offset;
                fill_triangle(sink, center.x, center.y, a.x, a.y, b.x, b.y, self.color);
            }
        } else {
            for i in 0..sides {
                let from = points[i] + offset;
                let to = points[(i + 1) % sides] + offset;
                draw_line(sink, from, to, self.color);
            }
        }
    }

    pub fn bounds(&self) -> Bounds {
        let position = self.center - Point::new(self.radius, self.radius);
        let side = self.radius * 2 + 1;
        Bounds::new(position, Size::new(side, side))
    }

    pub fn to_code(&self, ctx: &mut CodeContext<'_>) -> String {
        let unique_name = ctx.unique_name(&self.name);
        let method = if self.is_filled { "fillRegularPolygon" } else { "drawRegularPolygon" };
        let mut code = format!(
            "gfxui::{method}({}, {}, {}, {}, {}, {});",
            ctx.coord_x(self.center.x),
            ctx.coord_y(self.center.y),
            self.sides,
            self.radius,
            self.rotation,
            self.color
        );
        code += &ctx.comment(
            &unique_name,
            &serialize_item_settings(self.is_locked, self.is_hidden),
        );
        code
    }

    pub fn from_code(code: &str) -> Option<(Item, usize)> {
        let captures = POLYGON_RE.captures(code)?;
        let length = captures[0].len();

        let args = parse_item_args(&captures["args"]);
        let (is_locked, is_hidden) = parse_item_settings(
            captures.name("settings").map(|m| m.as_str()),
        );
        let number = |index: usize| args.get(index).copied().unwrap_or(0.0);

        let item = Polygon {
            id: 0,
            name: captures
                .name("name")
                .map(|m| m.as_str().to_owned())
                .unwrap_or_default(),
            center: Point::new(number(0) as i32, number(1) as i32),
            sides: number(2).max(0.0) as u32,
            radius: number(3) as i32,
            rotation: number(4),
            color: number(5) as Color,
            is_filled: &captures["method"] == "fillRegularPolygon",
            is_locked,
            is_hidden,
            bounds: Bounds::empty(),
        };

        Some((Item::Polygon(item), length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::CodeOptions;
    use crate::pixels::Pixels;

    #[test]
    fn filled_polygon_covers_its_outline() {
        let polygon = Polygon {
            center: Point::new(20, 20),
            radius: 8,
            sides: 5,
            color: 15,
            ..Polygon::default()
        };
        let mut outline = Pixels::new();
        polygon.draw(&mut outline, Point::ZERO);

        let filled = Polygon { is_filled: true, ..polygon };
        let mut fill = Pixels::new();
        filled.draw(&mut fill, Point::ZERO);
        assert!(fill.len() > outline.len());
    }

    #[test]
    fn code_round_trip_keeps_rotation() {
        let polygon = Polygon {
            name: "Hex".to_owned(),
            center: Point::new(10, 12),
            radius: 6,
            sides: 6,
            rotation: 0.5,
            color: 15,
            is_filled: true,
            ..Polygon::default()
        };
        let mut ctx = CodeContext::new(CodeOptions::default(), &[]);
        let code = polygon.to_code(&mut ctx);
        assert_eq!(code, "gfxui::fillRegularPolygon(10, 12, 6, 6, 0.5, 15); // Hex");

        let (item, length) = Polygon::from_code(&code).unwrap();
        assert_eq!(length, code.len());
        let Item::Polygon(parsed) = item else { panic!("expected a polygon") };
        assert_eq!(parsed.sides, 6);
        assert_eq!(parsed.rotation, 0.5);
    }
}
