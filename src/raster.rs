//! Integer drawing primitives matching the Adafruit GFX library step for
//! step, so the editor preview is pixel-exact with the generated code running
//! on the device. All rounding happens at final device coordinates; callers
//! apply offsets before invoking a primitive.

use crate::geometry::{Bounds, Point, Size};
use crate::pixels::{pack_pixel, Color, Pixels};
use std::mem;

/// Sink for emitted pixels. Decouples "draw to a preview" from "accumulate
/// into a pixel set" (used when a stroke must become bitmap data).
pub trait PixelSink {
    fn set_pixel(&mut self, x: i32, y: i32, color: Color);
}

/// Accumulate into a sparse pixel set, discarding color.
impl PixelSink for Pixels {
    fn set_pixel(&mut self, x: i32, y: i32, _color: Color) {
        self.insert(pack_pixel(x, y));
    }
}

/// Record pixels in emission order. Tools replay identical paths to add and
/// erase, so ordering is part of the contract.
impl PixelSink for Vec<(i32, i32)> {
    fn set_pixel(&mut self, x: i32, y: i32, _color: Color) {
        self.push((x, y));
    }
}

/// Bresenham line. Swaps to the steep axis when `|dy| > |dx|` and reorders
/// endpoints so pixels are emitted left to right, one per x step.
pub fn draw_line(sink: &mut dyn PixelSink, from: Point, to: Point, color: Color) {
    let (mut x0, mut y0) = (from.x, from.y);
    let (mut x1, mut y1) = (to.x, to.y);

    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    if steep {
        mem::swap(&mut x0, &mut y0);
        mem::swap(&mut x1, &mut y1);
    }
    if x0 > x1 {
        mem::swap(&mut x0, &mut x1);
        mem::swap(&mut y0, &mut y1);
    }

    let dx = x1 - x0;
    let dy = (y1 - y0).abs();
    let mut err = dx / 2;
    let y_step = if y0 < y1 { 1 } else { -1 };

    while x0 <= x1 {
        if steep {
            sink.set_pixel(y0, x0, color);
        } else {
            sink.set_pixel(x0, y0, color);
        }
        err -= dy;
        if err < 0 {
            y0 += y_step;
            err += dx;
        }
        x0 += 1;
    }
}

/// `width` pixels starting at (x, y).
pub fn draw_horizontal_line(sink: &mut dyn PixelSink, x: i32, y: i32, width: i32, color: Color) {
    draw_line(sink, Point::new(x, y), Point::new(x + width - 1, y), color);
}

/// `height` pixels starting at (x, y).
pub fn draw_vertical_line(sink: &mut dyn PixelSink, x: i32, y: i32, height: i32, color: Color) {
    draw_line(sink, Point::new(x, y), Point::new(x, y + height - 1), color);
}

/// The pixels of a line as a set, for pencil-style accumulation.
pub fn line_pixels(from: Point, to: Point) -> Pixels {
    let mut pixels = Pixels::new();
    draw_line(&mut pixels, from, to, 0);
    pixels
}

pub fn fill_rect(sink: &mut dyn PixelSink, position: Point, size: Size, color: Color) {
    for i in 0..size.width {
        draw_vertical_line(sink, position.x + i, position.y, size.height, color);
    }
}

pub fn stroke_rect(sink: &mut dyn PixelSink, position: Point, size: Size, color: Color) {
    let Point { x, y } = position;
    let Size { width: w, height: h } = size;
    draw_horizontal_line(sink, x, y, w, color);
    draw_horizontal_line(sink, x, y + h - 1, w, color);
    draw_vertical_line(sink, x, y, h, color);
    draw_vertical_line(sink, x + w - 1, y, h, color);
}

/// Midpoint circle outline: 4 axis-aligned seed pixels, then 8-way symmetric
/// points per step. At radius 0 only the seeds are emitted.
pub fn stroke_circle(sink: &mut dyn PixelSink, center: Point, r: i32, color: Color) {
    let (x0, y0) = (center.x, center.y);

    let mut f = 1 - r;
    let mut ddf_x = 1;
    let mut ddf_y = -2 * r;
    let mut x = 0;
    let mut y = r;

    sink.set_pixel(x0, y0 + r, color);
    sink.set_pixel(x0, y0 - r, color);
    sink.set_pixel(x0 + r, y0, color);
    sink.set_pixel(x0 - r, y0, color);

    while x < y {
        if f >= 0 {
            y -= 1;
            ddf_y += 2;
            f += ddf_y;
        }
        x += 1;
        ddf_x += 2;
        f += ddf_x;

        sink.set_pixel(x0 + x, y0 + y, color);
        sink.set_pixel(x0 - x, y0 + y, color);
        sink.set_pixel(x0 + x, y0 - y, color);
        sink.set_pixel(x0 - x, y0 - y, color);
        sink.set_pixel(x0 + y, y0 + x, color);
        sink.set_pixel(x0 - y, y0 + x, color);
        sink.set_pixel(x0 + y, y0 - x, color);
        sink.set_pixel(x0 - y, y0 - x, color);
    }
}

pub fn fill_circle(sink: &mut dyn PixelSink, center: Point, r: i32, color: Color) {
    draw_vertical_line(sink, center.x, center.y - r, 2 * r + 1, color);
    fill_circle_helper(sink, center.x, center.y, r, 3, 0, color);
}

/// Horizontal-span fill for one or both circle halves. `corners` bit 1 fills
/// the right half, bit 2 the left; `delta` stretches the spans vertically,
/// which is how rounded-rectangle bodies share this code.
pub fn fill_circle_helper(
    sink: &mut dyn PixelSink,
    x0: i32,
    y0: i32,
    r: i32,
    corners: u8,
    delta: i32,
    color: Color,
) {
    let mut f = 1 - r;
    let mut ddf_x = 1;
    let mut ddf_y = -2 * r;
    let mut x = 0;
    let mut y = r;
    let mut px = x;
    let mut py = y;

    let delta = delta + 1;

    while x < y {
        if f >= 0 {
            y -= 1;
            ddf_y += 2;
            f += ddf_y;
        }
        x += 1;
        ddf_x += 2;
        f += ddf_x;
        if x < y + 1 {
            if corners & 1 != 0 {
                draw_vertical_line(sink, x0 + x, y0 - y, 2 * y + delta, color);
            }
            if corners & 2 != 0 {
                draw_vertical_line(sink, x0 - x, y0 - y, 2 * y + delta, color);
            }
        }
        if y != py {
            if corners & 1 != 0 {
                draw_vertical_line(sink, x0 + py, y0 - px, 2 * px + delta, color);
            }
            if corners & 2 != 0 {
                draw_vertical_line(sink, x0 - py, y0 - px, 2 * px + delta, color);
            }
            py = y;
        }
        px = x;
    }
}

/// One quadrant of a circle outline, selected by `corner` bit mask
/// (1 = top-left, 2 = top-right, 4 = bottom-right, 8 = bottom-left). Used for
/// rounded-rectangle corners.
pub fn draw_circle_helper(
    sink: &mut dyn PixelSink,
    x0: i32,
    y0: i32,
    r: i32,
    corner: u8,
    color: Color,
) {
    let mut f = 1 - r;
    let mut ddf_x = 1;
    let mut ddf_y = -2 * r;
    let mut x = 0;
    let mut y = r;

    while x < y {
        if f >= 0 {
            y -= 1;
            ddf_y += 2;
            f += ddf_y;
        }
        x += 1;
        ddf_x += 2;
        f += ddf_x;
        if corner & 0x4 != 0 {
            sink.set_pixel(x0 + x, y0 + y, color);
            sink.set_pixel(x0 + y, y0 + x, color);
        }
        if corner & 0x2 != 0 {
            sink.set_pixel(x0 + x, y0 - y, color);
            sink.set_pixel(x0 + y, y0 - x, color);
        }
        if corner & 0x8 != 0 {
            sink.set_pixel(x0 - y, y0 + x, color);
            sink.set_pixel(x0 - x, y0 + y, color);
        }
        if corner & 0x1 != 0 {
            sink.set_pixel(x0 - y, y0 - x, color);
            sink.set_pixel(x0 - x, y0 - y, color);
        }
    }
}

/// Scanline triangle fill: vertices sorted by y, two edges walked with
/// running-sum slope accumulation and integer division, exactly mirroring the
/// reference library's rounding.
#[allow(clippy::too_many_arguments)]
pub fn fill_triangle(
    sink: &mut dyn PixelSink,
    mut x0: i32,
    mut y0: i32,
    mut x1: i32,
    mut y1: i32,
    mut x2: i32,
    mut y2: i32,
    color: Color,
) {
    // Sort coordinates by y order (y2 >= y1 >= y0).
    if y0 > y1 {
        mem::swap(&mut y0, &mut y1);
        mem::swap(&mut x0, &mut x1);
    }
    if y1 > y2 {
        mem::swap(&mut y2, &mut y1);
        mem::swap(&mut x2, &mut x1);
    }
    if y0 > y1 {
        mem::swap(&mut y0, &mut y1);
        mem::swap(&mut x0, &mut x1);
    }

    if y0 == y2 {
        // Degenerate: all on one scanline.
        let mut a = x0;
        let mut b = x0;
        if x1 < a {
            a = x1;
        } else if x1 > b {
            b = x1;
        }
        if x2 < a {
            a = x2;
        } else if x2 > b {
            b = x2;
        }
        draw_horizontal_line(sink, a, y0, b - a + 1, color);
        return;
    }

    let dx01 = x1 - x0;
    let dy01 = y1 - y0;
    let dx02 = x2 - x0;
    let dy02 = y2 - y0;
    let dx12 = x2 - x1;
    let dy12 = y2 - y1;
    let mut sa = 0;
    let mut sb = 0;

    // Upper part: scanline crossings for segments 0-1 and 0-2. A
    // flat-bottomed triangle (y1 == y2) includes scanline y1 here so the
    // second loop, which would divide by dy12 == 0, is skipped. Otherwise y1
    // is handled below, which likewise avoids dy01 == 0 for flat tops.
    let last = if y1 == y2 { y1 } else { y1 - 1 };

    let mut y = y0;
    while y <= last {
        let mut a = x0 + sa / dy01;
        let mut b = x0 + sb / dy02;
        sa += dx01;
        sb += dx02;
        if a > b {
            mem::swap(&mut a, &mut b);
        }
        draw_horizontal_line(sink, a, y, b - a + 1, color);
        y += 1;
    }

    // Lower part: segments 0-2 and 1-2.
    sa = dx12 * (y - y1);
    sb = dx02 * (y - y0);
    while y <= y2 {
        let mut a = x1 + sa / dy12;
        let mut b = x0 + sb / dy02;
        sa += dx12;
        sb += dx02;
        if a > b {
            mem::swap(&mut a, &mut b);
        }
        draw_horizontal_line(sink, a, y, b - a + 1, color);
        y += 1;
    }
}

/// Vertices of a regular polygon, floored to integer device coordinates.
/// Vertex 0 points "up" at rotation 0.
pub fn polygon_points(center: Point, radius: i32, sides: u32, rotation: f64) -> Vec<Point> {
    let sides = sides.max(3);
    let angle_per_side = std::f64::consts::TAU / sides as f64;

    (0..sides)
        .map(|i| {
            let angle = rotation + i as f64 * angle_per_side;
            Point::new(
                (center.x as f64 + radius as f64 * angle.sin()).floor() as i32,
                (center.y as f64 - radius as f64 * angle.cos()).floor() as i32,
            )
        })
        .collect()
}

/// Pack a pixel set into row-major bytes covering `bounds`: `ceil(width / 8)`
/// bytes per row, MSB first. A cleared bit means "pixel present"; the
/// inverted polarity is the display driver's contract and must be preserved.
pub fn pack_bitmap_rows(pixels: &Pixels, bounds: &Bounds) -> Vec<u8> {
    let bytes_per_row = (bounds.width.max(0) as usize).div_ceil(8);
    let total = bytes_per_row * bounds.height.max(0) as usize;
    // Padding bits stay 1 ("absent").
    let mut bytes = vec![0xffu8; total];

    for y in 0..bounds.height {
        for x in 0..bounds.width {
            let present = pixels.contains(&pack_pixel(bounds.left + x, bounds.top + y));
            let byte_index = y as usize * bytes_per_row + x as usize / 8;
            let bit = 7 - (x % 8) as u32;
            if present {
                bytes[byte_index] &= !(1 << bit);
            } else {
                bytes[byte_index] |= 1 << bit;
            }
        }
    }
    bytes
}

/// Inverse of [`pack_bitmap_rows`]: cleared bits become pixels at
/// `origin + (x, y)`. Missing trailing bytes read as 0xff (all absent).
pub fn unpack_bitmap_rows(bytes: &[u8], origin: Point, size: Size) -> Pixels {
    let bytes_per_row = (size.width.max(0) as usize).div_ceil(8);
    let mut pixels = Pixels::new();

    for y in 0..size.height {
        for x in 0..size.width {
            let byte_index = y as usize * bytes_per_row + x as usize / 8;
            let bit = 7 - (x % 8) as u32;
            let byte = bytes.get(byte_index).copied().unwrap_or(0xff);
            if byte & (1 << bit) == 0 {
                pixels.insert(pack_pixel(origin.x + x, origin.y + y));
            }
        }
    }
    pixels
}
