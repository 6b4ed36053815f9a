use super::{
    arg, parse_item_args, parse_item_settings, serialize_item_settings, Item, COMMENT_RE, META_RE,
};
use crate::codegen::CodeContext;
use crate::geometry::{Bounds, Point, Size};
use crate::pixels::{pack_pixel, unpack_pixel, Color, Pixels};
use crate::raster::{pack_bitmap_rows, unpack_bitmap_rows, PixelSink};
use crate::util::{parse_number, sanitize_identifier};
use crate::Id;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Free-form pixel art stored as a sparse set of packed coordinates. Exported
/// as a PROGMEM byte array plus a `drawBitmap` call covering the set's
/// bounding box.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Bitmap {
    pub id: Id,
    pub name: String,
    pub is_hidden: bool,
    pub is_locked: bool,
    pub bounds: Bounds,
    pub pixels: Pixels,
    pub color: Color,
}

static BITMAP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"^(?:static )?const byte (?P<ident>\w+)_bytes\[\]\s+PROGMEM\s+=\s+\{{(?P<bytes>[^}}]+)\}};\s*display\.drawBitmap\((?P<args>[^)\n]+)\);{COMMENT_RE}{META_RE}"
    ))
    .expect("valid bitmap regex")
});

impl Bitmap {
    pub fn draw(&self, sink: &mut dyn PixelSink, offset: Point) {
        for &pixel in &self.pixels {
            let point = unpack_pixel(pixel) + offset;
            sink.set_pixel(point.x, point.y, self.color);
        }
    }

    pub fn translate(&mut self, delta: Point) {
        self.pixels = self
            .pixels
            .iter()
            .map(|&pixel| {
                let point = unpack_pixel(pixel) + delta;
                pack_pixel(point.x, point.y)
            })
            .collect();
    }

    /// Extent of the pixel set, or the empty sentinel for no pixels.
    pub fn bounds(&self) -> Bounds {
        let mut points = self.pixels.iter().map(|&pixel| unpack_pixel(pixel));
        let Some(first) = points.next() else {
            return Bounds::empty();
        };

        let (mut left, mut top) = (first.x, first.y);
        let (mut right, mut bottom) = (first.x, first.y);
        for point in points {
            left = left.min(point.x);
            right = right.max(point.x);
            top = top.min(point.y);
            bottom = bottom.max(point.y);
        }
        Bounds::new(
            Point::new(left, top),
            Size::new(right - left + 1, bottom - top + 1),
        )
    }

    pub fn to_code(&self, ctx: &mut CodeContext<'_>) -> String {
        let bounds = self.bounds();
        let unique_name = ctx.unique_name(&self.name);
        let bytes_identifier = sanitize_identifier(&format!("{unique_name}_bytes"));
        let bytes = pack_bitmap_rows(&self.pixels, &bounds);

        let mut code = format!("static const byte {bytes_identifier}[] PROGMEM = {{\n");
        // 12 bytes per display row keeps lines at a readable width.
        for row in bytes.chunks(12) {
            code += "  ";
            for byte in row {
                code += &format!("0x{byte:02x}, ");
            }
            code += "\n";
        }
        code += "};\n";

        code += &format!(
            "display.drawBitmap({}, {}, {bytes_identifier}, {}, {}, {});",
            ctx.coord_x(bounds.x),
            ctx.coord_y(bounds.y),
            bounds.width,
            bounds.height,
            self.color
        );
        code += &ctx.comment(
            &unique_name,
            &serialize_item_settings(self.is_locked, self.is_hidden),
        );
        code
    }

    pub fn from_code(code: &str) -> Option<(Item, usize)> {
        let captures = BITMAP_RE.captures(code)?;
        let length = captures[0].len();

        let bytes: Vec<u8> = captures["bytes"]
            .split(',')
            .filter(|v| !v.trim().is_empty())
            .map(|v| parse_number(v) as u8)
            .collect();
        let args = parse_item_args(&captures["args"]);
        let (is_locked, is_hidden) = parse_item_settings(
            captures.name("settings").map(|m| m.as_str()),
        );

        // Argument 2 is the byte-array identifier, not a number.
        let origin = Point::new(arg(&args, 0), arg(&args, 1));
        let size = Size::new(arg(&args, 3), arg(&args, 4));

        let item = Bitmap {
            id: 0,
            name: captures
                .name("name")
                .map(|m| m.as_str().to_owned())
                .unwrap_or_default(),
            pixels: unpack_bitmap_rows(&bytes, origin, size),
            color: arg(&args, 5) as Color,
            is_locked,
            is_hidden,
            bounds: Bounds::empty(),
        };

        Some((Item::Bitmap(item), length))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::CodeOptions;

    fn l_shape() -> Bitmap {
        let mut pixels = Pixels::new();
        for y in 0..3 {
            pixels.insert(pack_pixel(4, 10 + y));
        }
        pixels.insert(pack_pixel(5, 12));
        Bitmap { pixels, color: 15, name: "Glyph".to_owned(), ..Bitmap::default() }
    }

    #[test]
    fn bounds_hug_the_pixel_extent() {
        let bitmap = l_shape();
        let bounds = bitmap.bounds();
        assert_eq!(bounds.top_left, Point::new(4, 10));
        assert_eq!(bounds.size(), Size::new(2, 3));
        assert!(Bitmap::default().bounds().is_empty());
    }

    #[test]
    fn translate_moves_every_pixel() {
        let mut bitmap = l_shape();
        bitmap.translate(Point::new(-4, -10));
        assert!(bitmap.pixels.contains(&pack_pixel(0, 0)));
        assert!(bitmap.pixels.contains(&pack_pixel(1, 2)));
        assert_eq!(bitmap.pixels.len(), 4);
    }

    #[test]
    fn code_round_trip_preserves_the_pixel_set() {
        let bitmap = l_shape();
        let mut ctx = CodeContext::new(CodeOptions::default(), &[]);
        let code = bitmap.to_code(&mut ctx);
        assert!(code.starts_with("static const byte Glyph_bytes[] PROGMEM = {"));
        assert!(code.contains("display.drawBitmap(4, 10, Glyph_bytes, 2, 3, 15); // Glyph"));

        let (item, length) = Bitmap::from_code(&code).unwrap();
        assert_eq!(length, code.len());
        let Item::Bitmap(parsed) = item else { panic!("expected a bitmap") };
        assert_eq!(parsed.pixels, bitmap.pixels);
    }
}
