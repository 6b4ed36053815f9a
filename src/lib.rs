#![warn(clippy::all, rust_2018_idioms)]

pub mod codegen;
pub mod error;
pub mod font;
pub mod frame;
pub mod geometry;
pub mod history;
pub mod item;
pub mod parser;
pub mod pixels;
pub mod project;
pub mod raster;
pub mod snap;

mod util;

/// Unique identifier for frames, components and items. Monotonic within a
/// session, never reused.
pub type Id = u32;

pub use codegen::{CodeOptions, CommentLevel};
pub use error::{Error, Result};
pub use font::{FontRegistry, GfxFont, GfxGlyph};
pub use frame::Frame;
pub use geometry::{Bounds, Point, Size};
pub use history::{Debouncer, History};
pub use item::{translate_item, EmptyContext, Item, ItemContext};
pub use pixels::{pack_pixel, unpack_pixel, Color, Pixels};
pub use project::Project;
pub use raster::PixelSink;
pub use snap::{bounds_snap, point_snap, snap_threshold, Guide, Snap};
