//! The drawable item model. Items form a closed set of variants dispatched
//! by matching on [`Item`], so every item stays plain serializable data and
//! history can snapshot frames with a deep clone.

mod bitmap;
mod circle;
mod group;
mod instance;
mod line;
mod polygon;
mod rect;
mod text;

pub use bitmap::Bitmap;
pub use circle::Circle;
pub use group::Group;
pub use instance::Instance;
pub use line::Line;
pub use polygon::Polygon;
pub use rect::Rect;
pub use text::Text;

use crate::codegen::CodeContext;
use crate::font::GfxFont;
use crate::frame::Frame;
use crate::geometry::{Bounds, Point};
use crate::raster::PixelSink;
use crate::util::parse_number;
use crate::Id;
use serde::{Deserialize, Serialize};

/// Lookup capabilities items need at draw/bounds/code time. Instances resolve
/// their component and texts their font through this on every call, never
/// caching, so edits to the target take effect retroactively.
pub trait ItemContext {
    fn component(&self, id: Id) -> Option<&Frame>;
    fn font(&self, name: &str) -> Option<&GfxFont>;
}

/// A context that resolves nothing. Instances become inert and texts empty.
pub struct EmptyContext;

impl ItemContext for EmptyContext {
    fn component(&self, _id: Id) -> Option<&Frame> {
        None
    }

    fn font(&self, _name: &str) -> Option<&GfxFont> {
        None
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Item {
    Rect(Rect),
    Line(Line),
    Circle(Circle),
    Polygon(Polygon),
    Bitmap(Bitmap),
    Text(Text),
    Instance(Instance),
    Group(Group),
}

macro_rules! each_variant {
    ($self:expr, $inner:ident => $body:expr) => {
        match $self {
            Item::Rect($inner) => $body,
            Item::Line($inner) => $body,
            Item::Circle($inner) => $body,
            Item::Polygon($inner) => $body,
            Item::Bitmap($inner) => $body,
            Item::Text($inner) => $body,
            Item::Instance($inner) => $body,
            Item::Group($inner) => $body,
        }
    };
}

impl Item {
    pub fn id(&self) -> Id {
        each_variant!(self, item => item.id)
    }

    pub fn set_id(&mut self, id: Id) {
        each_variant!(self, item => item.id = id)
    }

    pub fn name(&self) -> &str {
        each_variant!(self, item => &item.name)
    }

    pub fn set_name(&mut self, name: String) {
        each_variant!(self, item => item.name = name)
    }

    pub fn is_hidden(&self) -> bool {
        each_variant!(self, item => item.is_hidden)
    }

    pub fn is_locked(&self) -> bool {
        each_variant!(self, item => item.is_locked)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Item::Rect(_) => "rect",
            Item::Line(_) => "line",
            Item::Circle(_) => "circle",
            Item::Polygon(_) => "polygon",
            Item::Bitmap(_) => "bitmap",
            Item::Text(_) => "text",
            Item::Instance(_) => "instance",
            Item::Group(_) => "group",
        }
    }

    /// The cached bounding box. Groups and instances derive bounds on demand
    /// and have no cache.
    pub fn cached_bounds(&self) -> Option<Bounds> {
        match self {
            Item::Rect(item) => Some(item.bounds),
            Item::Line(item) => Some(item.bounds),
            Item::Circle(item) => Some(item.bounds),
            Item::Polygon(item) => Some(item.bounds),
            Item::Bitmap(item) => Some(item.bounds),
            Item::Text(item) => Some(item.bounds),
            Item::Instance(_) | Item::Group(_) => None,
        }
    }

    pub fn set_cached_bounds(&mut self, bounds: Bounds) {
        match self {
            Item::Rect(item) => item.bounds = bounds,
            Item::Line(item) => item.bounds = bounds,
            Item::Circle(item) => item.bounds = bounds,
            Item::Polygon(item) => item.bounds = bounds,
            Item::Bitmap(item) => item.bounds = bounds,
            Item::Text(item) => item.bounds = bounds,
            Item::Instance(_) | Item::Group(_) => {}
        }
    }

    /// Compute the bounding box from the current geometry. Pure; does not
    /// touch the cache.
    pub fn bounds(&self, ctx: &dyn ItemContext) -> Bounds {
        match self {
            Item::Rect(item) => item.bounds(),
            Item::Line(item) => item.bounds(),
            Item::Circle(item) => item.bounds(),
            Item::Polygon(item) => item.bounds(),
            Item::Bitmap(item) => item.bounds(),
            Item::Text(item) => item.bounds(ctx),
            Item::Instance(item) => item.bounds(ctx),
            Item::Group(item) => item.bounds(ctx),
        }
    }

    /// Rasterize into `sink`. Hidden items draw nothing.
    pub fn draw(&self, sink: &mut dyn PixelSink, ctx: &dyn ItemContext, offset: Point) {
        if self.is_hidden() {
            return;
        }
        match self {
            Item::Rect(item) => item.draw(sink, offset),
            Item::Line(item) => item.draw(sink, offset),
            Item::Circle(item) => item.draw(sink, offset),
            Item::Polygon(item) => item.draw(sink, offset),
            Item::Bitmap(item) => item.draw(sink, offset),
            Item::Text(item) => item.draw(sink, ctx, offset),
            Item::Instance(item) => item.draw(sink, ctx, offset),
            Item::Group(item) => item.draw(sink, ctx, offset),
        }
    }

    /// Shift the stored geometry additively. The cached bounds are not
    /// touched; use [`translate_item`] for the full contract.
    pub fn translate(&mut self, delta: Point) {
        match self {
            Item::Rect(item) => item.position += delta,
            Item::Line(item) => {
                item.from += delta;
                item.to += delta;
            }
            Item::Circle(item) => item.center += delta,
            Item::Polygon(item) => item.center += delta,
            Item::Bitmap(item) => item.translate(delta),
            Item::Text(item) => item.position += delta,
            Item::Instance(item) => item.position += delta,
            Item::Group(item) => {
                // A rigid shift of the whole subtree, so every descendant's
                // cached box can be shifted instead of re-derived.
                for child in &mut item.children {
                    child.translate(delta);
                    if let Some(bounds) = child.cached_bounds() {
                        child.set_cached_bounds(bounds.translated(delta));
                    }
                }
            }
        }
    }

    /// Absolute reposition. The anchor differs per variant: circles and
    /// polygons interpret `position` as the bounding box's top left corner,
    /// not the center.
    pub fn move_to(&mut self, position: Point, ctx: &dyn ItemContext) {
        match self {
            Item::Rect(item) => item.position = position,
            Item::Text(item) => item.position = position,
            Item::Instance(item) => item.position = position,
            Item::Circle(item) => {
                item.center = position + Point::new(item.radius, item.radius);
            }
            Item::Polygon(item) => {
                item.center = position + Point::new(item.radius, item.radius);
            }
            Item::Line(_) | Item::Bitmap(_) | Item::Group(_) => {
                let delta = position - self.bounds(ctx).top_left;
                translate_item(self, delta, ctx);
            }
        }
    }

    /// Serialize to one statement (or statement sequence) of generated code.
    pub fn to_code(&self, ctx: &mut CodeContext<'_>) -> String {
        match self {
            Item::Rect(item) => item.to_code(ctx),
            Item::Line(item) => item.to_code(ctx),
            Item::Circle(item) => item.to_code(ctx),
            Item::Polygon(item) => item.to_code(ctx),
            Item::Bitmap(item) => item.to_code(ctx),
            Item::Text(item) => item.to_code(ctx),
            Item::Instance(item) => item.to_code(ctx),
            Item::Group(item) => item.to_code(ctx),
        }
    }
}

/// Translate geometry and keep the cached bounds coherent: an O(1) shift for
/// shapes whose box moves rigidly, a re-derivation for text (font metrics may
/// be unavailable) and nothing for containers, which never cache.
pub fn translate_item(item: &mut Item, delta: Point, ctx: &dyn ItemContext) {
    item.translate(delta);
    match item {
        Item::Text(_) => {
            let bounds = item.bounds(ctx);
            item.set_cached_bounds(bounds);
        }
        Item::Instance(_) | Item::Group(_) => {}
        _ => {
            if let Some(bounds) = item.cached_bounds() {
                item.set_cached_bounds(bounds.translated(delta));
            }
        }
    }
}

/// Try every variant's recognizer in a fixed order and return the parsed item
/// plus the exact number of bytes consumed. The patterns are mutually
/// exclusive on their call prefixes, so first match wins.
pub fn item_from_code(code: &str) -> Option<(Item, usize)> {
    type Recognizer = fn(&str) -> Option<(Item, usize)>;
    const RECOGNIZERS: [Recognizer; 8] = [
        Line::from_code,
        Rect::from_code,
        Polygon::from_code,
        Circle::from_code,
        Bitmap::from_code,
        Text::from_code,
        Instance::from_code,
        Group::from_code,
    ];
    RECOGNIZERS.iter().find_map(|parse| parse(code))
}

/// The trailing `ItemName (locked, hidden)` part of a statement comment.
pub(crate) const META_RE: &str = r"(?P<name>\w+(?: +\w+)*)? *(?:\((?P<settings>.*?)\))?";

/// Optional whitespace and `// ` between a statement and its meta comment.
pub(crate) const COMMENT_RE: &str = r"[ \t]*(?://[ \t]*)?";

pub(crate) fn parse_item_settings(settings: Option<&str>) -> (bool, bool) {
    let flags: Vec<&str> = settings
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .collect();
    let is_locked = flags.contains(&"locked");
    let is_hidden = flags.contains(&"hidden");
    (is_locked, is_hidden)
}

pub(crate) fn serialize_item_settings(is_locked: bool, is_hidden: bool) -> String {
    let mut flags = Vec::new();
    if is_locked {
        flags.push("locked");
    }
    if is_hidden {
        flags.push("hidden");
    }
    if flags.is_empty() {
        String::new()
    } else {
        format!("({})", flags.join(", "))
    }
}

/// Split a call argument list into numbers, tolerating the `x + <n>` and
/// `y + <n>` forms produced by the runtime-offset mode.
pub(crate) fn parse_item_args(args: &str) -> Vec<f64> {
    args.split(',')
        .map(|v| {
            let v = v.trim();
            let v = v
                .strip_prefix("x + ")
                .or_else(|| v.strip_prefix("y + "))
                .unwrap_or(v);
            parse_number(v)
        })
        .collect()
}

pub(crate) fn arg(args: &[f64], index: usize) -> i32 {
    args.get(index).copied().unwrap_or(0.0) as i32
}
