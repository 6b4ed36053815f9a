use crate::geometry::Point;
use std::collections::BTreeSet;

/// A 4-bit grayscale color index (0 = black, 15 = white).
pub type Color = u8;

/// A sparse pixel set keyed by [`pack_pixel`] values.
pub type Pixels = BTreeSet<u32>;

/// Pack a signed coordinate pair into one 32-bit key: x in the high 16 bits,
/// y in the low 16, each as one sign bit (1 = non-negative) plus a 15-bit
/// magnitude. Magnitudes beyond ±32767 are masked; the codec is only lossless
/// inside that range.
pub fn pack_pixel(x: i32, y: i32) -> u32 {
    let x_packed = (((x >= 0) as u32) << 15) | (x.unsigned_abs() & 0x7fff);
    let y_packed = (((y >= 0) as u32) << 15) | (y.unsigned_abs() & 0x7fff);
    (x_packed << 16) | y_packed
}

pub fn unpack_pixel_x(xy: u32) -> i32 {
    let packed = (xy >> 16) & 0xffff;
    let sign = if packed & 0x8000 != 0 { 1 } else { -1 };
    sign * (packed & 0x7fff) as i32
}

pub fn unpack_pixel_y(xy: u32) -> i32 {
    let packed = xy & 0xffff;
    let sign = if packed & 0x8000 != 0 { 1 } else { -1 };
    sign * (packed & 0x7fff) as i32
}

pub fn unpack_pixel(xy: u32) -> Point {
    Point::new(unpack_pixel_x(xy), unpack_pixel_y(xy))
}
